//! # Catalog Provider
//!
//! Read-only product listing: the builtin base menu merged with any
//! locally registered products, filtered by vendor tag. The core never
//! mutates catalog data; it copies fields into a cart line on add.
//!
//! The store is queried fresh on every call, so a product registered a
//! moment ago shows up in the next listing without any cache invalidation.

use std::sync::Arc;

use async_trait::async_trait;

use crate::model::{price, Product, Vendor};
use crate::store::{json, keys, LocalStore};

/// Read-only product listing seam.
#[async_trait]
pub trait CatalogProvider: Send + Sync + 'static {
    /// Products visible to the given storefront. Fails soft: a store fault
    /// yields the builtin base menu only.
    async fn list_items(&self, vendor: Option<Vendor>) -> Vec<Product>;
}

/// Catalog backed by the builtin menu plus locally registered products.
///
/// Locally registered products are listed first, mirroring how the
/// storefront screens present newest additions on top.
pub struct StoreCatalog<S> {
    store: Arc<S>,
    base: Vec<Product>,
    blocked_titles: Vec<String>,
}

impl<S: LocalStore> StoreCatalog<S> {
    pub fn new(store: Arc<S>, base: Vec<Product>) -> Self {
        Self {
            store,
            base,
            blocked_titles: Vec::new(),
        }
    }

    /// Hide products whose title contains any of `titles`
    /// (case-insensitive).
    pub fn with_blocked_titles(mut self, titles: impl IntoIterator<Item = String>) -> Self {
        self.blocked_titles = titles
            .into_iter()
            .map(|t| t.to_lowercase())
            .collect();
        self
    }

    fn is_blocked(&self, title: &str) -> bool {
        let normalized = title.to_lowercase();
        self.blocked_titles.iter().any(|b| normalized.contains(b))
    }
}

#[async_trait]
impl<S: LocalStore> CatalogProvider for StoreCatalog<S> {
    async fn list_items(&self, vendor: Option<Vendor>) -> Vec<Product> {
        let local: Vec<Product> = json::read_list_soft(self.store.as_ref(), keys::PRODUCTS).await;

        let mut items: Vec<Product> = local
            .into_iter()
            .filter(|p| match vendor {
                Some(v) => p.vendor == Some(v),
                None => true,
            })
            .filter(|p| !self.is_blocked(&p.title))
            .collect();

        items.extend(
            self.base
                .iter()
                .filter(|p| !self.is_blocked(&p.title))
                .cloned(),
        );
        items
    }
}

/// One builtin menu entry: id, title, BRL price label, description, asset,
/// category.
type MenuRow = (
    &'static str,
    &'static str,
    &'static str,
    &'static str,
    &'static str,
    &'static str,
);

const BASE_MENU: &[MenuRow] = &[
    ("1", "Assados", "R$ 8,50", "Delicioso assado feito na hora.", "assets/assados.png", "Comida"),
    ("2", "Misto quente", "R$ 6,00", "Clássico misto quente, com queijo e presunto.", "assets/misto.png", "Comida"),
    ("3", "Sanduiche natural", "R$ 9,00", "Sanduíche leve com recheio natural e verduras.", "assets/sanduichenatural.png", "Comida"),
    ("4", "Bauru", "R$ 7,50", "Tradicional bauru com pão francês.", "assets/bauru.png", "Comida"),
    ("5", "Pão de queijo", "R$ 3,00", "Pão de queijo quentinho e saboroso.", "assets/pao_de_queijo.png", "Comida"),
    ("6", "Achocolatado", "R$ 4,50", "Bebida achocolatada quente ou gelada.", "assets/achocolatado.png", "Bebida"),
    ("7", "Café com leite", "R$ 5,00", "Café com leite cremoso e quentinho.", "assets/cafe_com_leite.png", "Bebida"),
    ("8", "Bolo", "R$ 4,50", "Fatia de bolo macio e saboroso.", "assets/bolo.png", "Comida"),
    ("9", "Salada de fruta", "R$ 6,00", "Salada de frutas frescas e variadas.", "assets/salada_de_fruta.png", "Comida"),
    ("10", "Suco Prats", "R$ 5,50", "Suco natural Prats, gelado e refrescante.", "assets/suco_prats.png", "Bebida"),
    ("11", "Suco lata", "R$ 4,50", "Suco em lata com sabor intenso de frutas.", "assets/suco_lata.png", "Bebida"),
    ("12", "Chá Matte", "R$ 4,00", "Chá Matte Leão gelado e refrescante.", "assets/cha_matte.png", "Bebida"),
    ("13", "Água", "R$ 3,00", "Água mineral gelada e purificada.", "assets/agua.png", "Bebida"),
];

/// The builtin base menu, with unit prices parsed from the BRL labels.
pub fn builtin_menu() -> Vec<Product> {
    BASE_MENU
        .iter()
        .map(|(id, title, label, description, asset, category)| Product {
            id: (*id).to_string(),
            title: (*title).to_string(),
            unit_price: price::parse_label(label),
            price_label: (*label).to_string(),
            description: (*description).to_string(),
            image_ref: Some((*asset).to_string()),
            category: (*category).to_string(),
            vendor: None,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    fn local_product(id: &str, title: &str, vendor: Vendor) -> Product {
        Product {
            id: id.to_string(),
            title: title.to_string(),
            unit_price: 5.0,
            price_label: "R$ 5.00".to_string(),
            description: String::new(),
            image_ref: None,
            category: "Comida".to_string(),
            vendor: Some(vendor),
        }
    }

    async fn seed_products(store: &MemoryStore, products: &[Product]) {
        json::write(store, keys::PRODUCTS, &products.to_vec())
            .await
            .unwrap();
    }

    #[test]
    fn builtin_menu_parses_labels() {
        let menu = builtin_menu();
        assert_eq!(menu.len(), 13);
        let pq = menu.iter().find(|p| p.id == "5").unwrap();
        assert_eq!(pq.title, "Pão de queijo");
        assert_eq!(pq.unit_price, 3.0);
    }

    #[tokio::test]
    async fn local_products_come_first_and_filter_by_vendor() {
        let store = Arc::new(MemoryStore::default());
        seed_products(
            &store,
            &[
                local_product("p_1", "Coxinha", Vendor::Snackbar),
                local_product("p_2", "Torta", Vendor::SchoolCafe),
            ],
        )
        .await;
        let catalog = StoreCatalog::new(store, builtin_menu());

        let items = catalog.list_items(Some(Vendor::Snackbar)).await;
        assert_eq!(items[0].id, "p_1");
        assert_eq!(items.len(), 1 + 13);
        assert!(!items.iter().any(|p| p.id == "p_2"));
    }

    #[tokio::test]
    async fn blocked_titles_are_hidden() {
        let store = Arc::new(MemoryStore::default());
        seed_products(
            &store,
            &[local_product("p_9", "Bolo de Moranguinho", Vendor::Snackbar)],
        )
        .await;
        let catalog = StoreCatalog::new(store, builtin_menu())
            .with_blocked_titles(["moranguinho".to_string(), "água".to_string()]);

        let items = catalog.list_items(None).await;
        assert!(!items.iter().any(|p| p.id == "p_9"));
        assert!(!items.iter().any(|p| p.title == "Água"));
    }

    #[tokio::test]
    async fn listing_reads_the_store_fresh_each_call() {
        let store = Arc::new(MemoryStore::default());
        let catalog = StoreCatalog::new(store.clone(), Vec::new());

        assert!(catalog.list_items(None).await.is_empty());

        seed_products(
            &store,
            &[local_product("p_3", "Esfiha", Vendor::Snackbar)],
        )
        .await;
        assert_eq!(catalog.list_items(None).await.len(), 1);
    }
}
