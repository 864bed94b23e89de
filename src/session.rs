//! One black-market visit: slot stocking, refresh gating, the purchase flow,
//! and the savings bank. A session is created when the shop is entered and
//! discarded when it closes; the caller owns the wallet afterwards.
use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::config::{ConfigError, MarketConfig};
use crate::item::{Item, ItemCatalog};
use crate::pool::ItemPool;
use crate::progression::{compute_effects, roll_rarity, savings_effect};
use crate::slots::plan_slot_categories;

// Dialog keys --------------------------------------------------------------
pub const MSG_REFRESH_DISABLED: &str = "msg.refresh.disabled";
pub const MSG_REFRESH_LOCKED: &str = "msg.refresh.locked";
pub const MSG_REFRESH_RESTOCKED: &str = "msg.refresh.restocked";
pub const MSG_PURCHASE_COMPLETE: &str = "msg.purchase.complete";
pub const MSG_PURCHASE_NO_GOLD: &str = "msg.purchase.no-gold";
pub const MSG_PURCHASE_NO_SELECTION: &str = "msg.purchase.no-selection";
pub const MSG_DEPOSIT_COMPLETE: &str = "msg.bank.deposit.complete";
pub const MSG_DEPOSIT_NO_GOLD: &str = "msg.bank.deposit.no-gold";
pub const MSG_WITHDRAW_COMPLETE: &str = "msg.bank.withdraw.complete";
pub const MSG_WITHDRAW_NO_SAVINGS: &str = "msg.bank.withdraw.no-savings";
pub const MSG_WITHDRAW_BENEFITS_USED: &str = "msg.bank.withdraw.benefits-used";

/// Named audio cue for the platform layer to play.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AudioCue {
    BgmMarket,
    SfxDoor,
    SfxDoorbell,
    SfxCoin,
    SfxOpenSlot,
    VoEnter,
    VoBuyA,
    VoBuyB,
    VoDisabled,
    VoLocked,
    VoRefresh,
    VoExit,
}

impl AudioCue {
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::BgmMarket => "bgm.black-market",
            Self::SfxDoor => "sfx.door",
            Self::SfxDoorbell => "sfx.doorbell",
            Self::SfxCoin => "sfx.coin",
            Self::SfxOpenSlot => "sfx.open-slot",
            Self::VoEnter => "vo.enter",
            Self::VoBuyA => "vo.buy-1",
            Self::VoBuyB => "vo.buy-2",
            Self::VoDisabled => "vo.disabled",
            Self::VoLocked => "vo.locked",
            Self::VoRefresh => "vo.refresh",
            Self::VoExit => "vo.exit",
        }
    }
}

/// Cue lists stay inline for the common one-to-four cue case.
pub type CueSet = SmallVec<[AudioCue; 4]>;

/// Gate for the refresh button.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshState {
    /// Savings tier grants no refreshes.
    Disabled,
    /// Granted refreshes remain this session.
    Active,
    /// Every granted refresh has been consumed.
    Locked,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshResolution {
    Restocked,
    Disabled,
    Locked,
}

#[derive(Debug, Clone)]
pub struct RefreshOutcome {
    pub resolution: RefreshResolution,
    pub remaining_refreshes: u8,
    pub cues: CueSet,
    pub message_key: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PurchaseResolution {
    Purchased,
    InsufficientGold,
    NothingSelected,
}

#[derive(Debug, Clone)]
pub struct PurchaseOutcome {
    pub resolution: PurchaseResolution,
    /// The acquired item on success; the caller grants it to the player.
    pub item: Option<Item>,
    pub cues: CueSet,
    pub message_key: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BankResolution {
    Completed,
    InsufficientGold,
    InsufficientSavings,
    BenefitsInUse,
}

#[derive(Debug, Clone)]
pub struct BankOutcome {
    pub resolution: BankResolution,
    pub cues: CueSet,
    pub message_key: &'static str,
}

/// Read-only player data supplied by the platform layer when the shop opens.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct PlayerProfile {
    pub gold: i64,
    pub savings: u32,
    pub membership_fee: u32,
    #[serde(default)]
    pub party_character_ids: Vec<u32>,
    #[serde(default)]
    pub owned_relic_ids: Vec<u32>,
}

/// Mutable state for one shop visit.
#[derive(Debug, Clone)]
pub struct MarketSession {
    config: MarketConfig,
    catalog: ItemCatalog,
    party_character_ids: Vec<u32>,
    owned_relic_ids: Vec<u32>,
    gold: i64,
    savings: u32,
    membership_level: usize,
    bonus_slots: u8,
    granted_refreshes: u8,
    used_refreshes: u8,
    refresh_state: RefreshState,
    pool: ItemPool,
    slots: Vec<Option<Item>>,
    selected_slot: Option<usize>,
    rng: ChaCha20Rng,
}

const fn gate_for(granted: u8, used: u8) -> RefreshState {
    if granted == 0 {
        RefreshState::Disabled
    } else if used >= granted {
        RefreshState::Locked
    } else {
        RefreshState::Active
    }
}

impl MarketSession {
    /// Open a session: validate config, derive progression effects, and stock
    /// every slot.
    ///
    /// # Errors
    ///
    /// Returns an error when the configuration violates a load-time invariant.
    pub fn open(
        config: MarketConfig,
        catalog: ItemCatalog,
        profile: &PlayerProfile,
        seed: u64,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        let effects = compute_effects(&config, profile.savings, profile.membership_fee);
        log::debug!(
            "market open | savings {} fee {} -> slots +{} refreshes {} level {}",
            profile.savings,
            profile.membership_fee,
            effects.bonus_slots,
            effects.bonus_refreshes,
            effects.membership_level,
        );

        let mut session = Self {
            config,
            catalog,
            party_character_ids: profile.party_character_ids.clone(),
            owned_relic_ids: profile.owned_relic_ids.clone(),
            gold: profile.gold,
            savings: profile.savings,
            membership_level: effects.membership_level,
            bonus_slots: effects.bonus_slots,
            granted_refreshes: effects.bonus_refreshes,
            used_refreshes: 0,
            refresh_state: gate_for(effects.bonus_refreshes, 0),
            pool: ItemPool::new(),
            slots: Vec::new(),
            selected_slot: None,
            rng: ChaCha20Rng::seed_from_u64(seed),
        };
        session.restock(true);
        Ok(session)
    }

    /// Cues played when the shop door opens.
    #[must_use]
    pub fn opening_cues() -> CueSet {
        CueSet::from_slice(&[
            AudioCue::BgmMarket,
            AudioCue::SfxDoor,
            AudioCue::SfxDoorbell,
            AudioCue::VoEnter,
        ])
    }

    /// Cues played when the shop closes. The session is dropped afterwards;
    /// read the wallet back through [`Self::gold`] and [`Self::savings`] first.
    #[must_use]
    pub fn closing_cues() -> CueSet {
        CueSet::from_slice(&[AudioCue::SfxDoor, AudioCue::VoExit])
    }

    // -- accessors ---------------------------------------------------------

    #[must_use]
    pub const fn gold(&self) -> i64 {
        self.gold
    }

    #[must_use]
    pub const fn savings(&self) -> u32 {
        self.savings
    }

    #[must_use]
    pub const fn membership_level(&self) -> usize {
        self.membership_level
    }

    /// Number of satisfied savings tiers, for display.
    #[must_use]
    pub fn savings_display_level(&self) -> usize {
        self.config
            .savings_tiers
            .iter()
            .filter(|tier| self.savings >= tier.savings)
            .count()
    }

    /// Base slots plus the current savings bonus. May exceed `slots().len()`
    /// after a deposit crossed a tier; the gap is stocked on the next restock.
    #[must_use]
    pub fn total_slot_count(&self) -> usize {
        self.config.base_slot_count + usize::from(self.bonus_slots)
    }

    #[must_use]
    pub const fn remaining_refreshes(&self) -> u8 {
        self.granted_refreshes.saturating_sub(self.used_refreshes)
    }

    #[must_use]
    pub const fn refresh_state(&self) -> RefreshState {
        self.refresh_state
    }

    /// Slot contents; `None` marks a sold slot.
    #[must_use]
    pub fn slots(&self) -> &[Option<Item>] {
        &self.slots
    }

    #[must_use]
    pub const fn selected_slot(&self) -> Option<usize> {
        self.selected_slot
    }

    // -- purchase flow -----------------------------------------------------

    /// Record a slot selection and return its item for the purchase prompt.
    /// Sold and out-of-range slots yield `None` and leave the selection
    /// untouched. The UI plays [`AudioCue::SfxOpenSlot`] when the prompt opens.
    pub fn select_slot(&mut self, slot_index: usize) -> Option<&Item> {
        if self.slots.get(slot_index).is_some_and(Option::is_some) {
            self.selected_slot = Some(slot_index);
            self.slots[slot_index].as_ref()
        } else {
            None
        }
    }

    pub fn cancel_selection(&mut self) {
        self.selected_slot = None;
    }

    /// Charge the selected item and empty its slot. Rejections mutate nothing;
    /// an insufficient-gold rejection keeps the selection so the prompt stays
    /// open.
    pub fn confirm_purchase(&mut self) -> PurchaseOutcome {
        let Some(slot_index) = self.selected_slot else {
            return PurchaseOutcome {
                resolution: PurchaseResolution::NothingSelected,
                item: None,
                cues: CueSet::new(),
                message_key: MSG_PURCHASE_NO_SELECTION,
            };
        };
        let Some(price) = self.slots[slot_index].as_ref().map(|item| item.price) else {
            return PurchaseOutcome {
                resolution: PurchaseResolution::NothingSelected,
                item: None,
                cues: CueSet::new(),
                message_key: MSG_PURCHASE_NO_SELECTION,
            };
        };

        if self.gold < i64::from(price) {
            return PurchaseOutcome {
                resolution: PurchaseResolution::InsufficientGold,
                item: None,
                cues: CueSet::new(),
                message_key: MSG_PURCHASE_NO_GOLD,
            };
        }

        self.gold -= i64::from(price);
        let item = self.slots[slot_index].take();
        self.selected_slot = None;

        let buy_vo = if self.rng.gen_range(0..2) == 0 {
            AudioCue::VoBuyA
        } else {
            AudioCue::VoBuyB
        };
        PurchaseOutcome {
            resolution: PurchaseResolution::Purchased,
            item,
            cues: CueSet::from_slice(&[AudioCue::SfxCoin, buy_vo]),
            message_key: MSG_PURCHASE_COMPLETE,
        }
    }

    // -- refresh -----------------------------------------------------------

    /// Consume one refresh use and restock every unsold slot, excluding the
    /// ids shown before the refresh. Disabled and Locked gates reject with a
    /// voice line only.
    pub fn refresh(&mut self) -> RefreshOutcome {
        match self.refresh_state {
            RefreshState::Disabled => RefreshOutcome {
                resolution: RefreshResolution::Disabled,
                remaining_refreshes: self.remaining_refreshes(),
                cues: CueSet::from_slice(&[AudioCue::VoDisabled]),
                message_key: MSG_REFRESH_DISABLED,
            },
            RefreshState::Locked => RefreshOutcome {
                resolution: RefreshResolution::Locked,
                remaining_refreshes: self.remaining_refreshes(),
                cues: CueSet::from_slice(&[AudioCue::VoLocked]),
                message_key: MSG_REFRESH_LOCKED,
            },
            RefreshState::Active => {
                self.used_refreshes += 1;
                if self.remaining_refreshes() == 0 {
                    self.refresh_state = RefreshState::Locked;
                }

                let shown: Vec<u32> = self
                    .slots
                    .iter()
                    .flatten()
                    .filter(|item| !item.is_placeholder())
                    .map(|item| item.id)
                    .collect();
                self.pool.set_excluded(shown);
                self.restock(false);

                RefreshOutcome {
                    resolution: RefreshResolution::Restocked,
                    remaining_refreshes: self.remaining_refreshes(),
                    cues: CueSet::from_slice(&[AudioCue::VoRefresh]),
                    message_key: MSG_REFRESH_RESTOCKED,
                }
            }
        }
    }

    // -- savings bank ------------------------------------------------------

    /// Move gold into savings and recompute progression effects. A grown slot
    /// count is stocked on the next restock.
    pub fn deposit(&mut self, amount: u32) -> BankOutcome {
        if self.gold < i64::from(amount) {
            return BankOutcome {
                resolution: BankResolution::InsufficientGold,
                cues: CueSet::new(),
                message_key: MSG_DEPOSIT_NO_GOLD,
            };
        }
        self.gold -= i64::from(amount);
        self.savings = self.savings.saturating_add(amount);
        self.recompute_savings_effects();
        BankOutcome {
            resolution: BankResolution::Completed,
            cues: CueSet::from_slice(&[AudioCue::SfxCoin]),
            message_key: MSG_DEPOSIT_COMPLETE,
        }
    }

    /// Move savings back to gold, unless doing so would undo session progress
    /// that cannot be returned: refresh uses already consumed beyond the
    /// recomputed entitlement, or a slot-count reduction while a sold slot
    /// exists. Rejections mutate nothing.
    pub fn withdraw(&mut self, amount: u32) -> BankOutcome {
        if self.savings < amount {
            return BankOutcome {
                resolution: BankResolution::InsufficientSavings,
                cues: CueSet::new(),
                message_key: MSG_WITHDRAW_NO_SAVINGS,
            };
        }

        let expected_savings = self.savings - amount;
        let expected = savings_effect(&self.config.savings_tiers, expected_savings);
        let expected_total = self.config.base_slot_count + usize::from(expected.bonus_slots);
        let sold_count = self.slots.iter().filter(|slot| slot.is_none()).count();

        let refreshes_valid = expected.bonus_refreshes >= self.used_refreshes;
        let slots_valid = !(expected_total < self.total_slot_count() && sold_count > 0);
        if !(refreshes_valid && slots_valid) {
            return BankOutcome {
                resolution: BankResolution::BenefitsInUse,
                cues: CueSet::new(),
                message_key: MSG_WITHDRAW_BENEFITS_USED,
            };
        }

        self.savings = expected_savings;
        self.gold += i64::from(amount);
        self.slots.truncate(expected_total);
        if self
            .selected_slot
            .is_some_and(|slot_index| slot_index >= self.slots.len())
        {
            self.selected_slot = None;
        }
        self.recompute_savings_effects();
        BankOutcome {
            resolution: BankResolution::Completed,
            cues: CueSet::from_slice(&[AudioCue::SfxCoin]),
            message_key: MSG_WITHDRAW_COMPLETE,
        }
    }

    // -- internals ---------------------------------------------------------

    fn recompute_savings_effects(&mut self) {
        let effect = savings_effect(&self.config.savings_tiers, self.savings);
        self.bonus_slots = effect.bonus_slots;
        self.granted_refreshes = effect.bonus_refreshes;
        self.refresh_state = gate_for(self.granted_refreshes, self.used_refreshes);
    }

    /// Rebuild the pools and fill slots. Sold slots are refilled only when
    /// `refill_sold` is set; slots added since the last restock always fill.
    fn restock(&mut self, refill_sold: bool) {
        self.pool.rebuild(
            &self.catalog,
            &self.party_character_ids,
            &self.owned_relic_ids,
        );

        let total = self.total_slot_count();
        let prior_len = self.slots.len();
        self.slots.resize(total, None);

        let plan = plan_slot_categories(total, &mut self.rng);
        let weights = self.config.rarity_weights[self.membership_level];
        for (slot_index, category) in plan.into_iter().enumerate() {
            let sold = slot_index < prior_len && self.slots[slot_index].is_none();
            if sold && !refill_sold {
                continue;
            }
            let rarity = roll_rarity(&weights, &mut self.rng);
            let item = self.pool.draw(
                category,
                rarity,
                self.config.placeholder_price,
                &mut self.rng,
            );
            self.slots[slot_index] = Some(item);
        }
    }
}
