//! # Line Items
//!
//! One row of the cart: a product variant and the quantity wanted.
//! Field names serialize in camelCase, which is also the persisted format.

use crate::money::Money;
use crate::product::{Product, ProductVariant};
use serde::{Deserialize, Serialize};

/// A chosen product option (e.g. `Size = Large`)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectedOption {
    pub name: String,
    pub value: String,
}

impl SelectedOption {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// Display reference to the parent product
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductRef {
    /// Product GID
    pub id: String,

    #[serde(default)]
    pub handle: String,

    /// Product title (denormalized for display)
    #[serde(default)]
    pub title: String,
}

/// A line item in the cart
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineItem {
    /// Variant ID; unique within a cart
    pub variant_id: String,

    /// Parent product (display only, not part of identity)
    #[serde(default)]
    pub product_ref: ProductRef,

    /// Variant label (e.g. "Large / Blue")
    #[serde(default)]
    pub variant_title: String,

    /// Price captured when the item was added
    pub unit_price: Money,

    /// Quantity, at least 1 once stored in a cart
    pub quantity: u32,

    /// Options that picked this variant, in display order
    #[serde(default)]
    pub selected_options: Vec<SelectedOption>,
}

impl LineItem {
    /// Create a bare line item
    pub fn new(variant_id: impl Into<String>, unit_price: Money, quantity: u32) -> Self {
        Self {
            variant_id: variant_id.into(),
            product_ref: ProductRef::default(),
            variant_title: String::new(),
            unit_price,
            quantity,
            selected_options: Vec::new(),
        }
    }

    /// Create a line item from a product variant, capturing its current price
    pub fn from_variant(product: &Product, variant: &ProductVariant, quantity: u32) -> Self {
        Self {
            variant_id: variant.id.clone(),
            product_ref: product.to_ref(),
            variant_title: variant.title.clone(),
            unit_price: variant.price.clone(),
            quantity,
            selected_options: variant.selected_options.clone(),
        }
    }

    /// Builder: set variant title
    pub fn with_variant_title(mut self, title: impl Into<String>) -> Self {
        self.variant_title = title.into();
        self
    }

    /// Builder: set parent product reference
    pub fn with_product(mut self, product_ref: ProductRef) -> Self {
        self.product_ref = product_ref;
        self
    }

    /// Builder: add a selected option
    pub fn with_option(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.selected_options.push(SelectedOption::new(name, value));
        self
    }

    /// Calculate the total price for this line item
    pub fn total(&self) -> Money {
        self.unit_price.times(self.quantity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::product::Product;

    #[test]
    fn test_line_item_total() {
        let item = LineItem::new("v1", Money::parse("10.00", "USD").unwrap(), 3);
        assert_eq!(item.total().display(), "$30.00");
    }

    #[test]
    fn test_from_variant_captures_price_and_options() {
        let mut product = Product::simple("p1", "tee", "Tee", Money::parse("15.00", "USD").unwrap());
        product.variants[0]
            .selected_options
            .push(SelectedOption::new("Size", "M"));

        let item = LineItem::from_variant(&product, &product.variants[0], 2);

        assert_eq!(item.variant_id, "p1-default");
        assert_eq!(item.product_ref.handle, "tee");
        assert_eq!(item.unit_price, product.price);
        assert_eq!(item.selected_options, vec![SelectedOption::new("Size", "M")]);
    }

    #[test]
    fn test_serialized_field_names() {
        let item = LineItem::new("gid://shopify/ProductVariant/1", Money::parse("4.00", "USD").unwrap(), 5)
            .with_variant_title("Default Title")
            .with_option("Color", "Red");

        let json = serde_json::to_value(&item).unwrap();
        assert_eq!(json["variantId"], "gid://shopify/ProductVariant/1");
        assert_eq!(json["unitPrice"]["amount"], "4.00");
        assert_eq!(json["selectedOptions"][0]["name"], "Color");
        assert!(json.get("productRef").is_some());
    }
}
