//! # Product Types
//!
//! Catalog types for products already fetched from the Storefront API,
//! plus the pure helpers the storefront uses to present them
//! (title cleanup, categories, filtering, sorting).
//!
//! Fetching and caching the catalog is the caller's business.

use crate::item::{ProductRef, SelectedOption};
use crate::money::Money;
use regex::Regex;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::sync::OnceLock;

/// Stock level at or below which a variant counts as "low stock"
pub const LOW_STOCK_THRESHOLD: i64 = 5;

/// A product image
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductImage {
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alt_text: Option<String>,
}

/// A purchasable configuration of a product
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductVariant {
    /// Variant GID (e.g. "gid://shopify/ProductVariant/123")
    pub id: String,

    /// Variant label (e.g. "Large / Blue")
    pub title: String,

    /// Current price
    pub price: Money,

    /// Original price, when the variant is discounted
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub compare_at_price: Option<Money>,

    #[serde(default = "default_true")]
    pub available_for_sale: bool,

    /// Units in stock, if the storefront exposes inventory
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quantity_available: Option<i64>,

    #[serde(default)]
    pub selected_options: Vec<SelectedOption>,
}

fn default_true() -> bool {
    true
}

impl ProductVariant {
    /// In stock, but only a handful left
    pub fn is_low_stock(&self) -> bool {
        matches!(self.quantity_available, Some(q) if q > 0 && q <= LOW_STOCK_THRESHOLD)
    }
}

/// A product in the catalog
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// Product GID
    pub id: String,

    /// URL handle (e.g. "wireless-earbuds")
    pub handle: String,

    /// Display title as stored in the backend
    pub title: String,

    #[serde(default)]
    pub description: String,

    /// Free-form product type, used as the storefront category
    #[serde(default)]
    pub product_type: String,

    #[serde(default)]
    pub tags: Vec<String>,

    #[serde(default)]
    pub images: Vec<ProductImage>,

    #[serde(default)]
    pub variants: Vec<ProductVariant>,

    /// Lowest variant price
    pub price: Money,

    /// Lowest variant compare-at price
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub compare_at_price: Option<Money>,
}

impl Product {
    /// Create a product with a single default variant
    pub fn simple(
        id: impl Into<String>,
        handle: impl Into<String>,
        title: impl Into<String>,
        price: Money,
    ) -> Self {
        let id = id.into();
        let variant = ProductVariant {
            id: format!("{}-default", id),
            title: "Default Title".to_string(),
            price: price.clone(),
            compare_at_price: None,
            available_for_sale: true,
            quantity_available: None,
            selected_options: Vec::new(),
        };
        Self {
            id,
            handle: handle.into(),
            title: title.into(),
            description: String::new(),
            product_type: String::new(),
            tags: Vec::new(),
            images: Vec::new(),
            variants: vec![variant],
            price,
            compare_at_price: None,
        }
    }

    /// Builder: set product type
    pub fn with_product_type(mut self, product_type: impl Into<String>) -> Self {
        self.product_type = product_type.into();
        self
    }

    /// Builder: set compare-at price
    pub fn with_compare_at_price(mut self, price: Money) -> Self {
        self.compare_at_price = Some(price);
        self
    }

    /// Builder: add a tag
    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.push(tag.into());
        self
    }

    /// Builder: replace variants
    pub fn with_variants(mut self, variants: Vec<ProductVariant>) -> Self {
        self.variants = variants;
        self
    }

    /// The variant added by "quick add" buttons
    pub fn first_variant(&self) -> Option<&ProductVariant> {
        self.variants.first()
    }

    /// Find a variant by ID
    pub fn variant(&self, variant_id: &str) -> Option<&ProductVariant> {
        self.variants.iter().find(|v| v.id == variant_id)
    }

    pub fn featured_image(&self) -> Option<&ProductImage> {
        self.images.first()
    }

    /// Title without shipping-origin noise
    pub fn display_title(&self) -> String {
        clean_product_title(&self.title)
    }

    /// Whether the compare-at price is above the current price
    pub fn is_on_sale(&self) -> bool {
        self.compare_at_price
            .as_ref()
            .is_some_and(|compare| compare.amount > self.price.amount)
    }

    /// Percentage off the compare-at price, rounded
    pub fn discount_percent(&self) -> Option<u32> {
        let compare = self.compare_at_price.as_ref()?;
        if compare.amount <= self.price.amount || compare.amount.is_zero() {
            return None;
        }
        ((compare.amount - self.price.amount) / compare.amount * Decimal::ONE_HUNDRED)
            .round()
            .to_u32()
    }

    /// Reference stored on line items
    pub fn to_ref(&self) -> ProductRef {
        ProductRef {
            id: self.id.clone(),
            handle: self.handle.clone(),
            title: self.title.clone(),
        }
    }
}

fn shipping_suffix() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)\s*(?:[-–—]\s*)?(?:SHIPS?|SHIPPING)\s*FROM\s*[:\s]*\w+\s*")
            .unwrap_or_else(|e| panic!("invalid shipping suffix pattern: {e}"))
    })
}

/// Remove shipping-origin fragments like "- SHIP FROM: CHINA" from a title.
/// Only the ends are trimmed; spacing inside the title is left alone.
pub fn clean_product_title(title: &str) -> String {
    shipping_suffix().replace_all(title, "").trim().to_string()
}

/// Sort orders offered by the collections page
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ProductSort {
    /// Keep the backend's order
    #[default]
    Featured,
    PriceLow,
    PriceHigh,
    Title,
}

impl std::str::FromStr for ProductSort {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "featured" => Ok(ProductSort::Featured),
            "price-low" => Ok(ProductSort::PriceLow),
            "price-high" => Ok(ProductSort::PriceHigh),
            "title" => Ok(ProductSort::Title),
            other => Err(format!("unknown sort order: {}", other)),
        }
    }
}

/// Products fetched for one page of the storefront
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProductCatalog {
    pub products: Vec<Product>,
}

impl ProductCatalog {
    pub fn new(products: Vec<Product>) -> Self {
        Self { products }
    }

    /// Add a product to the catalog
    pub fn add(&mut self, product: Product) {
        self.products.push(product);
    }

    /// Find a product by ID
    pub fn get(&self, id: &str) -> Option<&Product> {
        self.products.iter().find(|p| p.id == id)
    }

    pub fn by_handle(&self, handle: &str) -> Option<&Product> {
        self.products.iter().find(|p| p.handle == handle)
    }

    /// Unique, trimmed product types, sorted
    pub fn categories(&self) -> Vec<String> {
        self.products
            .iter()
            .map(|p| p.product_type.trim())
            .filter(|t| !t.is_empty())
            .map(str::to_string)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Products whose type matches `category` case-insensitively.
    /// `None` means no filter.
    pub fn filter_by_category(&self, category: Option<&str>) -> Vec<&Product> {
        match category {
            None => self.products.iter().collect(),
            Some(category) => {
                let wanted = category.trim().to_lowercase();
                self.products
                    .iter()
                    .filter(|p| p.product_type.trim().to_lowercase() == wanted)
                    .collect()
            }
        }
    }

    /// Case-insensitive substring match on title and tags
    pub fn search(&self, query: &str) -> Vec<&Product> {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return self.products.iter().collect();
        }
        self.products
            .iter()
            .filter(|p| {
                p.title.to_lowercase().contains(&needle)
                    || p.tags.iter().any(|t| t.to_lowercase().contains(&needle))
            })
            .collect()
    }

    pub fn on_sale(&self) -> Vec<&Product> {
        self.products.iter().filter(|p| p.is_on_sale()).collect()
    }

    /// All products in the requested order. Sorting is stable.
    pub fn sorted(&self, sort: ProductSort) -> Vec<&Product> {
        let mut result: Vec<&Product> = self.products.iter().collect();
        match sort {
            ProductSort::Featured => {}
            ProductSort::PriceLow => result.sort_by(|a, b| a.price.amount.cmp(&b.price.amount)),
            ProductSort::PriceHigh => result.sort_by(|a, b| b.price.amount.cmp(&a.price.amount)),
            ProductSort::Title => result.sort_by_key(|p| p.display_title().to_lowercase()),
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn usd(amount: &str) -> Money {
        Money::parse(amount, "USD").unwrap()
    }

    fn catalog() -> ProductCatalog {
        ProductCatalog::new(vec![
            Product::simple("p1", "earbuds", "Wireless Earbuds - SHIP FROM: CHINA", usd("24.99"))
                .with_product_type("Audio")
                .with_tag("bluetooth"),
            Product::simple("p2", "lamp", "Desk Lamp", usd("12.00"))
                .with_product_type(" Home ")
                .with_compare_at_price(usd("20.00")),
            Product::simple("p3", "speaker", "Bass Speaker", usd("59.00")).with_product_type("audio"),
            Product::simple("p4", "mystery", "Mystery Box", usd("5.00")),
        ])
    }

    #[test]
    fn test_clean_product_title() {
        assert_eq!(
            clean_product_title("Wireless Earbuds - SHIP FROM: CHINA"),
            "Wireless Earbuds"
        );
        assert_eq!(clean_product_title("Phone Case ships from USA"), "Phone Case");
        assert_eq!(clean_product_title("Mat — Shipping From: EU"), "Mat");
        assert_eq!(clean_product_title("  Plain Title "), "Plain Title");
        assert_eq!(clean_product_title("Tote  Bag - Ships From US"), "Tote  Bag");
    }

    #[test]
    fn test_categories_unique_and_sorted() {
        assert_eq!(catalog().categories(), vec!["Audio", "Home", "audio"]);
    }

    #[test]
    fn test_filter_by_category_case_insensitive() {
        let catalog = catalog();
        let audio: Vec<_> = catalog
            .filter_by_category(Some("AUDIO"))
            .iter()
            .map(|p| p.id.as_str())
            .collect();
        assert_eq!(audio, vec!["p1", "p3"]);
        assert_eq!(catalog.filter_by_category(None).len(), 4);
    }

    #[test]
    fn test_search_matches_title_and_tags() {
        let catalog = catalog();
        assert_eq!(catalog.search("lamp").len(), 1);
        assert_eq!(catalog.search("BLUETOOTH")[0].id, "p1");
        assert_eq!(catalog.search("   ").len(), 4);
    }

    #[test]
    fn test_sorting() {
        let catalog = catalog();
        let low: Vec<_> = catalog.sorted(ProductSort::PriceLow).iter().map(|p| p.id.as_str()).collect();
        assert_eq!(low, vec!["p4", "p2", "p1", "p3"]);
        let high: Vec<_> = catalog.sorted(ProductSort::PriceHigh).iter().map(|p| p.id.as_str()).collect();
        assert_eq!(high, vec!["p3", "p1", "p2", "p4"]);
        let featured: Vec<_> = catalog.sorted(ProductSort::Featured).iter().map(|p| p.id.as_str()).collect();
        assert_eq!(featured, vec!["p1", "p2", "p3", "p4"]);
        assert_eq!("price-high".parse::<ProductSort>().unwrap(), ProductSort::PriceHigh);
        assert!("rating".parse::<ProductSort>().is_err());
    }

    #[test]
    fn test_sale_and_discount() {
        let catalog = catalog();
        let lamp = catalog.by_handle("lamp").unwrap();
        assert!(lamp.is_on_sale());
        assert_eq!(lamp.discount_percent(), Some(40));
        assert_eq!(catalog.on_sale().len(), 1);
        assert_eq!(catalog.get("p1").unwrap().discount_percent(), None);
    }

    #[test]
    fn test_low_stock() {
        let mut variant = catalog().products[0].variants[0].clone();
        variant.quantity_available = Some(3);
        assert!(variant.is_low_stock());
        variant.quantity_available = Some(0);
        assert!(!variant.is_low_stock());
        variant.quantity_available = None;
        assert!(!variant.is_low_stock());
    }
}
