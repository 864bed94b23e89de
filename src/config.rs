//! Market tuning configuration: savings tiers, membership thresholds, and
//! per-level rarity weights. Loaded once, validated, never mutated at runtime.
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// One savings tier: reaching `savings` grants the paired bonuses.
/// A higher tier replaces a lower tier's bonuses; effects do not stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavingsTier {
    pub savings: u32,
    pub bonus_slots: u8,
    pub bonus_refreshes: u8,
}

/// Appearance weights per rarity for one membership level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RarityWeights {
    pub common: u32,
    pub rare: u32,
    pub unique: u32,
    pub legendary: u32,
}

impl RarityWeights {
    #[must_use]
    pub const fn total(&self) -> u32 {
        self.common + self.rare + self.unique + self.legendary
    }
}

/// Price range for synthesized sold-out placeholders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaceholderPriceRange {
    pub min: u32,
    pub max: u32,
}

impl Default for PlaceholderPriceRange {
    fn default() -> Self {
        Self {
            min: 100,
            max: 80_000,
        }
    }
}

/// Complete market configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarketConfig {
    /// Slots granted before any savings bonus.
    pub base_slot_count: usize,
    /// Ascending by `savings`; the last satisfied tier applies.
    pub savings_tiers: Vec<SavingsTier>,
    /// Ascending fee thresholds; index of the last satisfied entry is the level.
    pub membership_thresholds: Vec<u32>,
    /// One weight row per membership level, index 0 = level 0.
    pub rarity_weights: Vec<RarityWeights>,
    #[serde(default)]
    pub placeholder_price: PlaceholderPriceRange,
}

impl Default for MarketConfig {
    fn default() -> Self {
        Self {
            base_slot_count: 6,
            savings_tiers: vec![
                SavingsTier {
                    savings: 500,
                    bonus_slots: 2,
                    bonus_refreshes: 1,
                },
                SavingsTier {
                    savings: 1000,
                    bonus_slots: 4,
                    bonus_refreshes: 2,
                },
            ],
            membership_thresholds: vec![0, 1000, 3000, 6000],
            rarity_weights: vec![
                RarityWeights {
                    common: 70,
                    rare: 20,
                    unique: 9,
                    legendary: 1,
                },
                RarityWeights {
                    common: 55,
                    rare: 28,
                    unique: 14,
                    legendary: 3,
                },
                RarityWeights {
                    common: 40,
                    rare: 32,
                    unique: 21,
                    legendary: 7,
                },
                RarityWeights {
                    common: 25,
                    rare: 35,
                    unique: 28,
                    legendary: 12,
                },
            ],
            placeholder_price: PlaceholderPriceRange::default(),
        }
    }
}

/// Load-time configuration failures.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("no rarity weight rows configured")]
    NoRarityWeights,
    #[error("rarity weights for membership level {level} sum to zero")]
    ZeroRarityWeights { level: usize },
    #[error("savings tiers must be in ascending order")]
    UnsortedSavingsTiers,
    #[error("membership thresholds must be in ascending order")]
    UnsortedMembershipThresholds,
    #[error("placeholder price range is empty ({min}..{max})")]
    EmptyPlaceholderPriceRange { min: u32, max: u32 },
}

impl MarketConfig {
    /// Load the configuration from a JSON string
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON cannot be parsed.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Validate invariants that downstream draw logic relies on.
    ///
    /// # Errors
    ///
    /// Returns the first violated invariant. An all-zero weight row is a
    /// configuration error, not a runtime condition.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.rarity_weights.is_empty() {
            return Err(ConfigError::NoRarityWeights);
        }
        for (level, weights) in self.rarity_weights.iter().enumerate() {
            if weights.total() == 0 {
                return Err(ConfigError::ZeroRarityWeights { level });
            }
        }
        if !self
            .savings_tiers
            .windows(2)
            .all(|pair| pair[0].savings < pair[1].savings)
        {
            return Err(ConfigError::UnsortedSavingsTiers);
        }
        if !self
            .membership_thresholds
            .windows(2)
            .all(|pair| pair[0] < pair[1])
        {
            return Err(ConfigError::UnsortedMembershipThresholds);
        }
        if self.placeholder_price.min >= self.placeholder_price.max {
            return Err(ConfigError::EmptyPlaceholderPriceRange {
                min: self.placeholder_price.min,
                max: self.placeholder_price.max,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        MarketConfig::default().validate().unwrap();
    }

    #[test]
    fn zero_weight_row_fails_fast() {
        let mut config = MarketConfig::default();
        config.rarity_weights[1] = RarityWeights {
            common: 0,
            rare: 0,
            unique: 0,
            legendary: 0,
        };
        assert_eq!(
            config.validate(),
            Err(ConfigError::ZeroRarityWeights { level: 1 })
        );
    }

    #[test]
    fn unsorted_tiers_rejected() {
        let mut config = MarketConfig::default();
        config.savings_tiers.swap(0, 1);
        assert_eq!(config.validate(), Err(ConfigError::UnsortedSavingsTiers));

        let mut config = MarketConfig::default();
        config.membership_thresholds = vec![0, 3000, 1000];
        assert_eq!(
            config.validate(),
            Err(ConfigError::UnsortedMembershipThresholds)
        );
    }

    #[test]
    fn config_parses_from_json() {
        let json = r#"{
            "base_slot_count": 5,
            "savings_tiers": [
                { "savings": 300, "bonus_slots": 1, "bonus_refreshes": 1 }
            ],
            "membership_thresholds": [0, 500],
            "rarity_weights": [
                { "common": 90, "rare": 8, "unique": 2, "legendary": 0 },
                { "common": 70, "rare": 20, "unique": 9, "legendary": 1 }
            ]
        }"#;
        let config = MarketConfig::from_json(json).unwrap();
        config.validate().unwrap();
        assert_eq!(config.base_slot_count, 5);
        assert_eq!(config.placeholder_price, PlaceholderPriceRange::default());
    }

    #[test]
    fn empty_placeholder_range_rejected() {
        let mut config = MarketConfig::default();
        config.placeholder_price = PlaceholderPriceRange { min: 500, max: 500 };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::EmptyPlaceholderPriceRange { .. })
        ));
    }
}
