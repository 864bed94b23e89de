//! Master item data: rarities, categories, and the loaded catalog.
use serde::{Deserialize, Serialize};

/// Item id reserved for synthesized sold-out placeholders.
pub const PLACEHOLDER_ITEM_ID: u32 = 0;

/// Ordered quality tier governing draw weight and display color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Rarity {
    Common,
    Rare,
    Unique,
    Legendary,
}

impl Rarity {
    /// All tiers in ascending quality order.
    pub const ALL: [Self; 4] = [Self::Common, Self::Rare, Self::Unique, Self::Legendary];

    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::Common => "common",
            Self::Rare => "rare",
            Self::Unique => "unique",
            Self::Legendary => "legendary",
        }
    }
}

/// Category discriminant for slot planning and pool selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemCategory {
    Card,
    Relic,
}

impl ItemCategory {
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::Card => "card",
            Self::Relic => "relic",
        }
    }
}

/// Category payload. Cards belong to a character; relics carry a shop flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ItemKind {
    Card { owner_character_id: u32 },
    Relic { shop_eligible: bool },
}

impl ItemKind {
    #[must_use]
    pub const fn category(self) -> ItemCategory {
        match self {
            Self::Card { .. } => ItemCategory::Card,
            Self::Relic { .. } => ItemCategory::Relic,
        }
    }
}

/// A single purchasable item. Immutable once loaded from master data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub id: u32,
    pub name: String,
    pub rarity: Rarity,
    pub price: u32,
    #[serde(flatten)]
    pub kind: ItemKind,
}

impl Item {
    #[must_use]
    pub const fn category(&self) -> ItemCategory {
        self.kind.category()
    }

    /// Whether this item was synthesized for an exhausted pool.
    #[must_use]
    pub const fn is_placeholder(&self) -> bool {
        self.id == PLACEHOLDER_ITEM_ID
    }
}

/// Container for the full master item list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct ItemCatalog {
    pub items: Vec<Item>,
}

impl ItemCatalog {
    /// Create an empty catalog (useful for tests)
    #[must_use]
    pub fn empty() -> Self {
        Self { items: Vec::new() }
    }

    /// Load the catalog from a JSON string
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON cannot be parsed into valid item data.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Create a catalog from pre-parsed items
    #[must_use]
    pub fn from_items(items: Vec<Item>) -> Self {
        Self { items }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
