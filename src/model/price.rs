//! Price label helpers.
//!
//! The catalog carries pre-formatted BRL price labels (`"R$ 8,50"`). The core
//! never does currency arithmetic on labels; it parses them once into a
//! numeric unit price and keeps the label alongside for display.

/// Parse a price label such as `"R$ 8,50"` into a number (`8.5`).
///
/// Strips everything except digits, separators, and sign, then treats the
/// comma as a decimal point. Unparseable labels yield `0.0`.
pub fn parse_label(label: &str) -> f64 {
    let cleaned: String = label
        .chars()
        .filter(|c| c.is_ascii_digit() || matches!(c, ',' | '.' | '-'))
        .map(|c| if c == ',' { '.' } else { c })
        .collect();
    match cleaned.parse::<f64>() {
        Ok(n) if n.is_finite() => n,
        _ => 0.0,
    }
}

/// Format a numeric price as a display label (`8.5` → `"R$ 8.50"`).
///
/// This is the plain fallback format; locale-aware formatting is the UI's
/// concern.
pub fn format_label(price: f64) -> String {
    format!("R$ {price:.2}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_brl_labels() {
        assert_eq!(parse_label("R$ 8,50"), 8.5);
        assert_eq!(parse_label("R$ 3,00"), 3.0);
        assert_eq!(parse_label("12.75"), 12.75);
    }

    #[test]
    fn unparseable_labels_yield_zero() {
        assert_eq!(parse_label(""), 0.0);
        assert_eq!(parse_label("free!"), 0.0);
        assert_eq!(parse_label("R$"), 0.0);
    }

    #[test]
    fn formats_fallback_label() {
        assert_eq!(format_label(8.5), "R$ 8.50");
        assert_eq!(format_label(0.0), "R$ 0.00");
    }
}
