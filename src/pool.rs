//! Per-session item pools: eligibility filtering, exclusion of the previous
//! draw, and without-replacement draws with sold-out placeholder fallback.
use std::collections::HashSet;

use rand::Rng;

use crate::config::PlaceholderPriceRange;
use crate::item::{Item, ItemCatalog, ItemCategory, ItemKind, PLACEHOLDER_ITEM_ID, Rarity};

const PLACEHOLDER_CARD_NAME: &str = "Sold-Out Card";
const PLACEHOLDER_RELIC_NAME: &str = "Sold-Out Relic";

/// Two disjoint multisets of eligible items, rebuilt at session start and
/// after each refresh.
#[derive(Debug, Clone, Default)]
pub struct ItemPool {
    cards: Vec<Item>,
    relics: Vec<Item>,
    excluded: HashSet<u32>,
}

impl ItemPool {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the exclusion set with ids shown in the previous draw.
    pub fn set_excluded<I: IntoIterator<Item = u32>>(&mut self, ids: I) {
        self.excluded = ids.into_iter().collect();
    }

    pub fn clear_excluded(&mut self) {
        self.excluded.clear();
    }

    /// Repartition the master list into the category pools.
    ///
    /// Cards are eligible when their owner is in the active party; relics when
    /// flagged shop-eligible and not already owned. Excluded ids are skipped.
    pub fn rebuild(&mut self, catalog: &ItemCatalog, party_ids: &[u32], owned_relic_ids: &[u32]) {
        self.cards.clear();
        self.relics.clear();

        for item in &catalog.items {
            if self.excluded.contains(&item.id) {
                continue;
            }
            match item.kind {
                ItemKind::Card { owner_character_id } => {
                    if party_ids.contains(&owner_character_id) {
                        self.cards.push(item.clone());
                    }
                }
                ItemKind::Relic { shop_eligible } => {
                    if shop_eligible && !owned_relic_ids.contains(&item.id) {
                        self.relics.push(item.clone());
                    }
                }
            }
        }
    }

    /// Number of items left in a category's pool.
    #[must_use]
    pub fn remaining(&self, category: ItemCategory) -> usize {
        match category {
            ItemCategory::Card => self.cards.len(),
            ItemCategory::Relic => self.relics.len(),
        }
    }

    /// Draw one item of the requested category and rarity without replacement.
    ///
    /// When the rarity is depleted the draw falls back to any rarity in the
    /// category; when the whole category is exhausted a placeholder is
    /// synthesized so a slot always has something to sell.
    pub fn draw<R: Rng>(
        &mut self,
        category: ItemCategory,
        rarity: Rarity,
        placeholder_price: PlaceholderPriceRange,
        rng: &mut R,
    ) -> Item {
        let pool = match category {
            ItemCategory::Card => &mut self.cards,
            ItemCategory::Relic => &mut self.relics,
        };

        if pool.is_empty() {
            log::warn!(
                "item pool exhausted for {}; substituting placeholder",
                category.key()
            );
            return placeholder_item(category, rarity, placeholder_price, rng);
        }

        let matching: Vec<usize> = pool
            .iter()
            .enumerate()
            .filter(|(_, item)| item.rarity == rarity)
            .map(|(idx, _)| idx)
            .collect();

        let chosen = if matching.is_empty() {
            // Rarity depleted; degrade to whatever the category still holds.
            rng.gen_range(0..pool.len())
        } else {
            matching[rng.gen_range(0..matching.len())]
        };

        pool.swap_remove(chosen)
    }
}

fn placeholder_item<R: Rng>(
    category: ItemCategory,
    rarity: Rarity,
    price_range: PlaceholderPriceRange,
    rng: &mut R,
) -> Item {
    let price = rng.gen_range(price_range.min..price_range.max);
    let (name, kind) = match category {
        ItemCategory::Card => (
            PLACEHOLDER_CARD_NAME,
            ItemKind::Card {
                owner_character_id: 0,
            },
        ),
        ItemCategory::Relic => (
            PLACEHOLDER_RELIC_NAME,
            ItemKind::Relic {
                shop_eligible: false,
            },
        ),
    };
    Item {
        id: PLACEHOLDER_ITEM_ID,
        name: name.to_string(),
        rarity,
        price,
        kind,
    }
}
