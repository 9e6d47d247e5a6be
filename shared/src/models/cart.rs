//! Cart Model
//!
//! The cart is owned by the server. The client only ever holds a cached
//! [`CartSnapshot`] that is replaced wholesale after each mutation.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::MenuItemSummary;

/// One item entry within a cart (distinct from the menu item it references)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLine {
    pub id: i64,
    pub menu_item: MenuItemSummary,
    /// Always >= 1 on the server side
    pub quantity: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customizations: Option<String>,
    /// Line subtotal as computed by the server
    #[serde(default)]
    pub subtotal: Decimal,
}

impl CartLine {
    pub fn menu_item_id(&self) -> i64 {
        self.menu_item.id
    }

    pub fn unit_price(&self) -> Decimal {
        self.menu_item.price
    }

    /// `unit_price × quantity`, unrounded; `None` on overflow
    pub fn line_total(&self) -> Option<Decimal> {
        self.unit_price().checked_mul(Decimal::from(self.quantity))
    }
}

/// Cached copy of the server cart
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartSnapshot {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(default)]
    pub items: Vec<CartLine>,
    /// Server-side sum of line subtotals (`total` on the wire)
    #[serde(rename = "total", default)]
    pub subtotal: Decimal,
}

impl CartSnapshot {
    /// Known-empty cart
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Total number of units across all lines
    pub fn item_count(&self) -> i64 {
        self.items.iter().map(|l| i64::from(l.quantity)).sum()
    }
}

/// Add item payload (`POST cart/items`)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItemRequest {
    pub menu_item_id: i64,
    pub quantity: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customizations: Option<String>,
}
