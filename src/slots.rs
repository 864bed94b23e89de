//! Slot category planning: guaranteed minimum counts per category with a
//! uniformly shuffled layout.
use rand::Rng;
use rand::seq::SliceRandom;

use crate::item::ItemCategory;

/// Card slots guaranteed whenever the total allows the full block.
pub const GUARANTEED_CARD_SLOTS: usize = 3;
/// Relic slots guaranteed whenever the total allows the full block.
pub const GUARANTEED_RELIC_SLOTS: usize = 2;

const GUARANTEED_BLOCK: usize = GUARANTEED_CARD_SLOTS + GUARANTEED_RELIC_SLOTS;

/// Plan one category per slot.
///
/// Totals of at least the guaranteed block contain at least
/// [`GUARANTEED_CARD_SLOTS`] cards and [`GUARANTEED_RELIC_SLOTS`] relics with
/// the remainder assigned at random. The plan is truncated after the shuffle,
/// so smaller totals still produce exactly `total_slots` entries.
#[must_use]
pub fn plan_slot_categories<R: Rng>(total_slots: usize, rng: &mut R) -> Vec<ItemCategory> {
    let mut plan = Vec::with_capacity(total_slots.max(GUARANTEED_BLOCK));
    plan.extend(std::iter::repeat_n(
        ItemCategory::Card,
        GUARANTEED_CARD_SLOTS,
    ));
    plan.extend(std::iter::repeat_n(
        ItemCategory::Relic,
        GUARANTEED_RELIC_SLOTS,
    ));

    while plan.len() < total_slots {
        let category = if rng.gen_range(0..2) == 0 {
            ItemCategory::Card
        } else {
            ItemCategory::Relic
        };
        plan.push(category);
    }

    plan.shuffle(rng);
    plan.truncate(total_slots);
    plan
}
