//! Full-session scenarios across the public surface: enter, buy, refresh,
//! bank, and close.
use std::collections::HashSet;
use std::convert::Infallible;

use blackmarket_game::{
    BankResolution, Item, ItemCatalog, ItemKind, MarketConfig, MarketData, MarketEngine,
    MarketSession, PlayerProfile, PurchaseResolution, Rarity, RefreshResolution, RefreshState,
};

struct StaticData {
    catalog: ItemCatalog,
    config: MarketConfig,
}

impl MarketData for StaticData {
    type Error = Infallible;

    fn load_catalog(&self) -> Result<ItemCatalog, Self::Error> {
        Ok(self.catalog.clone())
    }

    fn load_config(&self) -> Result<MarketConfig, Self::Error> {
        Ok(self.config.clone())
    }
}

fn catalog() -> ItemCatalog {
    let mut items = Vec::new();
    for id in 1_u32..=30 {
        let rarity = match id % 4 {
            0 => Rarity::Legendary,
            1 => Rarity::Common,
            2 => Rarity::Rare,
            _ => Rarity::Unique,
        };
        items.push(Item {
            id,
            name: format!("card-{id}"),
            rarity,
            price: 300 + id * 25,
            kind: ItemKind::Card {
                owner_character_id: 1 + id % 3,
            },
        });
    }
    for id in 200_u32..=230 {
        items.push(Item {
            id,
            name: format!("relic-{id}"),
            rarity: if id % 3 == 0 {
                Rarity::Rare
            } else {
                Rarity::Common
            },
            price: 900 + id,
            kind: ItemKind::Relic {
                shop_eligible: id % 5 != 0,
            },
        });
    }
    ItemCatalog::from_items(items)
}

fn engine() -> MarketEngine<StaticData> {
    MarketEngine::new(StaticData {
        catalog: catalog(),
        config: MarketConfig::default(),
    })
}

fn profile() -> PlayerProfile {
    PlayerProfile {
        gold: 1_000_000,
        savings: 1000,
        membership_fee: 3000,
        party_character_ids: vec![1, 2, 3],
        owned_relic_ids: vec![200, 210],
    }
}

#[test]
fn session_stock_respects_category_minimums() {
    let session = engine().open_market(&profile(), 0xC0FFEE).unwrap();

    // savings 1000 reaches the top tier: base 6 + 4
    assert_eq!(session.total_slot_count(), 10);
    assert_eq!(session.membership_level(), 2);

    let cards = session
        .slots()
        .iter()
        .flatten()
        .filter(|item| matches!(item.kind, ItemKind::Card { .. }))
        .count();
    let relics = session.slots().len() - cards;
    assert!(cards >= 3, "expected at least 3 cards, got {cards}");
    assert!(relics >= 2, "expected at least 2 relics, got {relics}");
}

#[test]
fn same_seed_reproduces_the_same_stock() {
    let first = engine().open_market(&profile(), 42).unwrap();
    let second = engine().open_market(&profile(), 42).unwrap();
    assert_eq!(first.slots(), second.slots());

    let other = engine().open_market(&profile(), 43).unwrap();
    assert!(first.slots() != other.slots());
}

#[test]
fn owned_and_out_of_party_items_never_appear() {
    let narrow = PlayerProfile {
        party_character_ids: vec![2],
        ..profile()
    };
    let session = engine().open_market(&narrow, 5).unwrap();

    for item in session.slots().iter().flatten() {
        match item.kind {
            ItemKind::Card { owner_character_id } => {
                assert!(item.is_placeholder() || owner_character_id == 2);
            }
            ItemKind::Relic { .. } => {
                assert!(![200, 210].contains(&item.id));
            }
        }
    }
}

#[test]
fn buy_refresh_bank_round_trip() {
    let mut session = engine().open_market(&profile(), 0xBEEF).unwrap();
    let starting_gold = session.gold();

    // buy two items
    let mut spent = 0_i64;
    for slot_index in [0, 4] {
        let price = session.select_slot(slot_index).expect("slot stocked").price;
        let outcome = session.confirm_purchase();
        assert_eq!(outcome.resolution, PurchaseResolution::Purchased);
        spent += i64::from(price);
    }
    assert_eq!(session.gold(), starting_gold - spent);

    // two refreshes granted at the top tier, and sold slots stay empty
    assert_eq!(session.remaining_refreshes(), 2);
    let first = session.refresh();
    assert_eq!(first.resolution, RefreshResolution::Restocked);
    assert!(session.slots()[0].is_none());
    assert!(session.slots()[4].is_none());

    let second = session.refresh();
    assert_eq!(second.resolution, RefreshResolution::Restocked);
    assert_eq!(session.refresh_state(), RefreshState::Locked);
    assert_eq!(
        session.refresh().resolution,
        RefreshResolution::Locked,
        "exhausted refreshes must reject"
    );

    // benefits are spent, so shedding a tier is rejected without mutation
    let savings_before = session.savings();
    let rejected = session.withdraw(600);
    assert_eq!(rejected.resolution, BankResolution::BenefitsInUse);
    assert_eq!(session.savings(), savings_before);

    // depositing is always allowed while gold lasts
    let deposit = session.deposit(500);
    assert_eq!(deposit.resolution, BankResolution::Completed);
    assert_eq!(session.savings(), savings_before + 500);

    // wallet reads back for the caller before the session drops
    let closing = MarketSession::closing_cues();
    assert_eq!(closing.len(), 2);
    assert!(session.gold() < starting_gold);
}

#[test]
fn refresh_cycle_never_repeats_visible_ids() {
    let mut session = engine().open_market(&profile(), 99).unwrap();
    let before: HashSet<u32> = session
        .slots()
        .iter()
        .flatten()
        .filter(|item| !item.is_placeholder())
        .map(|item| item.id)
        .collect();

    session.refresh();
    let after: HashSet<u32> = session
        .slots()
        .iter()
        .flatten()
        .filter(|item| !item.is_placeholder())
        .map(|item| item.id)
        .collect();

    assert!(before.is_disjoint(&after));
    assert_eq!(after.len(), session.slots().len());
}

#[test]
fn tiny_catalog_degrades_to_placeholders() {
    let tiny = MarketEngine::new(StaticData {
        catalog: ItemCatalog::from_items(vec![Item {
            id: 1,
            name: "lone card".to_string(),
            rarity: Rarity::Common,
            price: 100,
            kind: ItemKind::Card {
                owner_character_id: 1,
            },
        }]),
        config: MarketConfig::default(),
    });
    let session = tiny.open_market(&profile(), 3).unwrap();

    // every slot is filled; all but one draw synthesized a placeholder
    assert!(session.slots().iter().all(Option::is_some));
    let real = session
        .slots()
        .iter()
        .flatten()
        .filter(|item| !item.is_placeholder())
        .count();
    assert_eq!(real, 1);
    for item in session.slots().iter().flatten() {
        assert!(item.price > 0);
    }
}
