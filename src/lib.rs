//! Black Market Core
//!
//! Platform-agnostic shop logic for the black-market screen: progression-gated
//! slot and refresh entitlements, weighted item draws from depleting pools,
//! and the purchase/savings session. No UI or platform dependencies; the
//! rendering layer binds slot contents and plays the returned cue keys.

pub mod config;
pub mod item;
pub mod pool;
pub mod progression;
pub mod session;
pub mod slots;

// Re-export commonly used types
pub use config::{ConfigError, MarketConfig, PlaceholderPriceRange, RarityWeights, SavingsTier};
pub use item::{Item, ItemCatalog, ItemCategory, ItemKind, PLACEHOLDER_ITEM_ID, Rarity};
pub use pool::ItemPool;
pub use progression::{
    ProgressionEffects, SavingsEffect, compute_effects, membership_level, roll_rarity,
    savings_effect,
};
pub use session::{
    AudioCue, BankOutcome, BankResolution, CueSet, MarketSession, PlayerProfile, PurchaseOutcome,
    PurchaseResolution, RefreshOutcome, RefreshResolution, RefreshState,
};
pub use slots::{GUARANTEED_CARD_SLOTS, GUARANTEED_RELIC_SLOTS, plan_slot_categories};

/// Trait for abstracting master-data loading operations
/// Platform-specific implementations should provide this
pub trait MarketData {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Load the master item catalog from the platform-specific source
    ///
    /// # Errors
    ///
    /// Returns an error if the catalog cannot be loaded.
    fn load_catalog(&self) -> Result<ItemCatalog, Self::Error>;

    /// Load the market tuning configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration cannot be loaded or parsed.
    fn load_config(&self) -> Result<MarketConfig, Self::Error>;
}

/// Entry point for opening market sessions against a data source.
pub struct MarketEngine<D>
where
    D: MarketData,
{
    data: D,
}

impl<D> MarketEngine<D>
where
    D: MarketData,
{
    pub const fn new(data: D) -> Self {
        Self { data }
    }

    /// Load and validate market data, then open a stocked session for the
    /// given player.
    ///
    /// # Errors
    ///
    /// Returns an error if loading fails or the configuration is invalid.
    pub fn open_market(
        &self,
        profile: &PlayerProfile,
        seed: u64,
    ) -> Result<MarketSession, anyhow::Error>
    where
        D::Error: Into<anyhow::Error>,
    {
        let catalog = self.data.load_catalog().map_err(Into::into)?;
        let config = self.data.load_config().map_err(Into::into)?;
        let session = MarketSession::open(config, catalog, profile, seed)?;
        Ok(session)
    }
}
