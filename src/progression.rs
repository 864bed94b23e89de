//! Savings and membership progression: pure threshold lookups plus the
//! weighted rarity roll used when stocking slots.
use rand::Rng;

use crate::config::{MarketConfig, RarityWeights, SavingsTier};
use crate::item::Rarity;

/// Bonuses granted by the highest satisfied savings tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SavingsEffect {
    pub bonus_slots: u8,
    pub bonus_refreshes: u8,
}

/// Combined result of the savings and membership lookups.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProgressionEffects {
    pub bonus_slots: u8,
    pub bonus_refreshes: u8,
    pub membership_level: usize,
}

/// Effect of the last tier whose threshold does not exceed `savings`.
/// Tiers replace each other; reaching a higher tier does not stack bonuses.
#[must_use]
pub fn savings_effect(tiers: &[SavingsTier], savings: u32) -> SavingsEffect {
    let mut effect = SavingsEffect::default();
    for tier in tiers {
        if savings < tier.savings {
            break;
        }
        effect = SavingsEffect {
            bonus_slots: tier.bonus_slots,
            bonus_refreshes: tier.bonus_refreshes,
        };
    }
    effect
}

/// Index of the last satisfied fee threshold, clamped so an out-of-range fee
/// never indexes past the configured weight rows.
#[must_use]
pub fn membership_level(thresholds: &[u32], weight_rows: usize, fee: u32) -> usize {
    let mut level = 0;
    for (idx, threshold) in thresholds.iter().enumerate() {
        if fee < *threshold {
            break;
        }
        level = idx;
    }
    level.min(weight_rows.saturating_sub(1))
}

/// Derive slot, refresh, and membership effects from the two monotonic
/// progression inputs. Deterministic and side-effect free; empty tables yield
/// zero bonuses and level 0.
#[must_use]
pub fn compute_effects(config: &MarketConfig, savings: u32, fee: u32) -> ProgressionEffects {
    let effect = savings_effect(&config.savings_tiers, savings);
    let level = membership_level(
        &config.membership_thresholds,
        config.rarity_weights.len(),
        fee,
    );
    ProgressionEffects {
        bonus_slots: effect.bonus_slots,
        bonus_refreshes: effect.bonus_refreshes,
        membership_level: level,
    }
}

/// Weighted rarity roll. Subtracts tier weights in ascending order; any
/// remainder falls to the top tier. Config validation rejects zero totals.
#[must_use]
pub fn roll_rarity<R: Rng>(weights: &RarityWeights, rng: &mut R) -> Rarity {
    let total = weights.total();
    if total == 0 {
        return Rarity::Common;
    }

    let mut roll = rng.gen_range(0..total);
    if roll < weights.common {
        return Rarity::Common;
    }
    roll -= weights.common;
    if roll < weights.rare {
        return Rarity::Rare;
    }
    roll -= weights.rare;
    if roll < weights.unique {
        return Rarity::Unique;
    }
    Rarity::Legendary
}
