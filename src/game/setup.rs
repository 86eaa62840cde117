//! Deck construction and opening hands
//!
//! Builds the card pool for a table, deals each player one guaranteed
//! neutralizer plus seven other cards, then shuffles the spare neutralizers
//! and every critical event into what is left.

use crate::core::{Card, Expansion, PlayerId};
use crate::game::{GameConfig, GameLogger, GameState};
use crate::{EngineError, Result};
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha12Rng;
use std::collections::{BTreeMap, BTreeSet};

/// Cards in an opening hand, the guaranteed neutralizer included
pub const HAND_SIZE: usize = 8;

/// Players covered by one copy of the base action and collection cards
const PLAYERS_PER_SET: usize = 5;

const BASE_SET: [(Card, usize); 11] = [
    (Card::Cancel, 5),
    (Card::Strike, 4),
    (Card::Evade, 4),
    (Card::Trade, 4),
    (Card::Reorder, 4),
    (Card::Insight, 4),
    (Card::Lynx, 3),
    (Card::Tabby, 3),
    (Card::Sphynx, 3),
    (Card::Calico, 3),
    (Card::Bengal, 3),
];

/// Cards shipped by an expansion pack
pub fn expansion_cards(expansion: Expansion) -> &'static [(Card, usize)] {
    match expansion {
        Expansion::Attack => &[
            (Card::TargetedAttack, 4),
            (Card::PersonalAttack, 3),
            (Card::AttackOfTheDead, 2),
            (Card::SuperSkip, 2),
            (Card::Reverse, 2),
        ],
        Expansion::Future => &[
            (Card::AlterFuture, 6),
            (Card::ShareFuture, 5),
            (Card::DrawBottom, 5),
            (Card::SwapTopBottom, 5),
            (Card::Bury, 4),
        ],
        Expansion::Theft => &[(Card::Mark, 4), (Card::StealDraw, 4), (Card::Stash, 4)],
        Expansion::Chaos => &[
            (Card::Fission, 3),
            (Card::Tribute, 3),
            (Card::Blackout, 3),
            (Card::Wildcard, 3),
        ],
        Expansion::Deity => &[
            (Card::Omniscience, 2),
            (Card::Miracle, 2),
            (Card::Smite, 3),
            (Card::Rapture, 2),
        ],
    }
}

/// Base game counts for a table of `player_count`
pub fn base_cards(player_count: usize) -> BTreeMap<Card, usize> {
    let sets = player_count.div_ceil(PLAYERS_PER_SET).max(1);
    let mut counts: BTreeMap<Card, usize> = BASE_SET.iter().map(|&(card, n)| (card, n * sets)).collect();
    counts.insert(Card::Critical, player_count.saturating_sub(1));
    counts.insert(Card::Neutralizer, player_count + 1);
    counts
}

/// Final per-card counts: base, enabled packs, then custom overrides
pub fn card_counts(player_count: usize, config: &GameConfig) -> BTreeMap<Card, usize> {
    let mut counts = base_cards(player_count);
    for &expansion in &config.expansions {
        for &(card, n) in expansion_cards(expansion) {
            *counts.entry(card).or_insert(0) += n;
        }
    }
    for (&card, &n) in &config.custom_cards {
        counts.insert(card, n);
    }
    counts
}

/// The unshuffled card pool for a table
pub fn build_deck(player_count: usize, config: &GameConfig) -> Vec<Card> {
    card_counts(player_count, config)
        .into_iter()
        .flat_map(|(card, n)| std::iter::repeat(card).take(n))
        .collect()
}

fn check_players(player_ids: &[PlayerId]) -> Result<()> {
    if player_ids.len() < 2 {
        return Err(EngineError::InvalidConfiguration(format!(
            "at least 2 players are required (got {})",
            player_ids.len()
        )));
    }
    let mut seen = BTreeSet::new();
    for id in player_ids {
        if !seen.insert(id) {
            return Err(EngineError::InvalidConfiguration(format!("duplicate player id {id}")));
        }
    }
    Ok(())
}

/// Build a fresh session state
pub fn initialize_state(player_ids: &[PlayerId], config: &GameConfig) -> Result<GameState> {
    check_players(player_ids)?;
    let player_count = player_ids.len();

    let mut pool = build_deck(player_count, config);
    let neutralizers: Vec<Card> = pool.iter().copied().filter(|&c| c == Card::Neutralizer).collect();
    let criticals: Vec<Card> = pool.iter().copied().filter(Card::is_critical).collect();
    pool.retain(|&c| c != Card::Neutralizer && !c.is_critical());

    if neutralizers.len() < player_count {
        return Err(EngineError::InvalidConfiguration(format!(
            "{} neutralizers cannot cover {} players",
            neutralizers.len(),
            player_count
        )));
    }
    if criticals.is_empty() {
        return Err(EngineError::InvalidConfiguration(
            "the deck needs at least one critical event".to_string(),
        ));
    }
    let needed = (HAND_SIZE - 1) * player_count;
    if pool.len() < needed {
        return Err(EngineError::InvalidConfiguration(format!(
            "{} dealable cards, {} needed for opening hands",
            pool.len(),
            needed
        )));
    }

    let mut rng = match config.seed {
        Some(seed) => ChaCha12Rng::seed_from_u64(seed),
        None => ChaCha12Rng::from_entropy(),
    };

    pool.shuffle(&mut rng);

    let mut hands = Vec::with_capacity(player_count);
    for _ in 0..player_count {
        let mut hand = vec![Card::Neutralizer];
        hand.extend(pool.drain(..HAND_SIZE - 1));
        hand.shuffle(&mut rng);
        hands.push(hand);
    }

    pool.extend(neutralizers.into_iter().skip(player_count));
    pool.extend(criticals);
    pool.shuffle(&mut rng);

    let mut state = GameState::new(player_ids, hands, pool, rng);
    state.allow_action_card_combos = config.allow_action_card_combos;
    state.expansions = config.expansions.clone();

    let mut logger = GameLogger::new(state.next_log_id, Default::default());
    let packs: Vec<String> = state.expansions.iter().map(Expansion::to_string).collect();
    logger.system(format!(
        "Game started with {} players, {} cards in the deck, expansions: {}",
        player_count,
        state.deck.len(),
        if packs.is_empty() { "none".to_string() } else { packs.join(", ") }
    ));
    state.next_log_id = logger.next_id();
    state.logs.extend(logger.into_entries());

    log::debug!(
        "initialized {} seats, deck {}, expansions {:?}",
        player_count,
        state.deck.len(),
        state.expansions
    );
    Ok(state)
}
