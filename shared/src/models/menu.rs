//! Menu Model

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Menu category, in display order
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
pub enum MenuCategory {
    SoupBase,
    SignatureFood,
    Meat,
    SideDish,
    #[serde(rename = "Beverages&Desserts")]
    BeveragesDesserts,
    #[default]
    #[serde(other)]
    Other,
}

impl MenuCategory {
    /// Fixed display order used by the menu page
    pub const DISPLAY_ORDER: [MenuCategory; 5] = [
        Self::SoupBase,
        Self::SignatureFood,
        Self::Meat,
        Self::SideDish,
        Self::BeveragesDesserts,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::SoupBase => "SoupBase",
            Self::SignatureFood => "SignatureFood",
            Self::Meat => "Meat",
            Self::SideDish => "SideDish",
            Self::BeveragesDesserts => "Beverages&Desserts",
            Self::Other => "Other",
        }
    }
}

impl fmt::Display for MenuCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn default_available() -> bool {
    true
}

/// Menu item (món ăn) as served by the kitchen service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MenuItem {
    #[serde(alias = "id", deserialize_with = "crate::util::lenient_i64")]
    pub food_id: i64,
    pub name: String,
    #[serde(default)]
    pub category: MenuCategory,
    /// Price in currency unit
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    #[serde(default = "default_available", alias = "is_available")]
    pub availability: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Create menu item payload (`POST /api/kitchen/menu`)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MenuItemCreate {
    pub food_id: String,
    pub name: String,
    pub category: MenuCategory,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    pub availability: bool,
    pub image: String,
    pub description: String,
}

/// Availability flip payload (`PATCH /api/kitchen/menu/:id`)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AvailabilityUpdate {
    pub availability: bool,
}

/// Group menu items by category in [`MenuCategory::DISPLAY_ORDER`].
///
/// Categories with no items are skipped; items outside the fixed set are
/// collected last under [`MenuCategory::Other`].
pub fn group_by_category(items: &[MenuItem]) -> Vec<(MenuCategory, Vec<&MenuItem>)> {
    MenuCategory::DISPLAY_ORDER
        .iter()
        .chain(std::iter::once(&MenuCategory::Other))
        .filter_map(|category| {
            let group: Vec<&MenuItem> = items.iter().filter(|i| i.category == *category).collect();
            (!group.is_empty()).then_some((*category, group))
        })
        .collect()
}
