use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub type CartState = Vec<LineItem>;

/// A product as returned by `products/{id}`. Everything except the id is
/// carried along untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: u64,
    #[serde(flatten)]
    pub attributes: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stock {
    pub amount: i64,
}

/// A product held in the cart. `amount` is never below 1 while the item is
/// part of a cart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
    pub id: u64,
    pub amount: u32,
    #[serde(flatten)]
    pub attributes: Map<String, Value>,
}

impl LineItem {
    pub fn from_product(product: Product) -> Self {
        let mut attributes = product.attributes;
        attributes.remove("amount");

        LineItem {
            id: product.id,
            amount: 1,
            attributes,
        }
    }

    pub fn with_amount(&self, amount: u32) -> Self {
        LineItem {
            amount,
            ..self.clone()
        }
    }
}
