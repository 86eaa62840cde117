//! Main game state structure

use crate::core::{Card, Expansion, PlayerId, PlayerState};
use crate::game::logger::LogEntry;
use crate::game::toggle::PendingAction;
use crate::zones::Pile;
use crate::{EngineError, Result};
use rand::SeedableRng;
use rand_chacha::ChaCha12Rng;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Direction the turn travels around the table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlayDirection {
    #[default]
    Forward,
    Backward,
}

impl PlayDirection {
    pub fn reversed(self) -> Self {
        match self {
            PlayDirection::Forward => PlayDirection::Backward,
            PlayDirection::Backward => PlayDirection::Forward,
        }
    }

    /// Seat index one step from `index` around a table of `len`
    pub fn step(self, index: usize, len: usize) -> usize {
        match self {
            PlayDirection::Forward => (index + 1) % len,
            PlayDirection::Backward => (index + len - 1) % len,
        }
    }
}

/// A Trade waiting for its target to hand over a card
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingFavor {
    pub requester: PlayerId,
    pub target: PlayerId,
}

/// A peek waiting for its reordering to be committed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingAlter {
    pub player_id: PlayerId,
    pub count: usize,
    /// Share the Future: the next player sees the committed order
    pub is_share: bool,
    /// Cards revealed at play time, top first
    pub revealed: Vec<Card>,
}

/// Complete game state
///
/// This is the central structure that holds all session information. It is
/// cloned once per accepted action so a rejected action never leaves a
/// half-applied state behind.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    /// Draw pile, index 0 is the top
    pub deck: Pile,

    pub discard_pile: Pile,

    /// Seating order, fixed for the whole session
    pub player_order: Vec<PlayerId>,

    /// Index into `player_order` of the player whose turn it is
    pub current_turn_index: usize,

    pub play_direction: PlayDirection,

    /// Forced draws the current player still owes
    pub pending_draws: u32,

    /// Players in seating order
    pub players: Vec<PlayerState>,

    /// Last cancelable action, open to the cancel chain
    pub pending_action: Option<PendingAction>,

    pub pending_favor: Option<PendingFavor>,

    pub pending_alter: Option<PendingAlter>,

    /// Player who drew a critical event and must neutralize it
    pub pending_defuse: Option<PlayerId>,

    pub logs: Vec<LogEntry>,

    pub allow_action_card_combos: bool,

    pub expansions: BTreeSet<Expansion>,

    /// Id of the next log entry
    pub next_log_id: u64,

    /// Session-local random number generator (serializable for deterministic replay)
    pub rng: ChaCha12Rng,
}

impl GameState {
    /// Seat `player_ids` with the given hands and deck. Turn starts at seat 0.
    pub fn new(player_ids: &[PlayerId], hands: Vec<Vec<Card>>, deck: Vec<Card>, rng: ChaCha12Rng) -> Self {
        let players = player_ids
            .iter()
            .cloned()
            .zip(hands.into_iter().chain(std::iter::repeat_with(Vec::new)))
            .map(|(id, hand)| PlayerState::new(id, hand))
            .collect();

        GameState {
            deck: Pile::from_cards(deck),
            discard_pile: Pile::new(),
            player_order: player_ids.to_vec(),
            current_turn_index: 0,
            play_direction: PlayDirection::Forward,
            pending_draws: 1,
            players,
            pending_action: None,
            pending_favor: None,
            pending_alter: None,
            pending_defuse: None,
            logs: Vec::new(),
            allow_action_card_combos: false,
            expansions: BTreeSet::new(),
            next_log_id: 0,
            rng,
        }
    }

    /// Reseed the session RNG
    pub fn seed_rng(&mut self, seed: u64) {
        self.rng = ChaCha12Rng::seed_from_u64(seed);
    }

    pub fn player_count(&self) -> usize {
        self.player_order.len()
    }

    pub fn player_index(&self, id: &PlayerId) -> Option<usize> {
        self.player_order.iter().position(|p| p == id)
    }

    pub fn is_seated(&self, id: &PlayerId) -> bool {
        self.player_index(id).is_some()
    }

    /// Get a player by ID
    pub fn player(&self, id: &PlayerId) -> Result<&PlayerState> {
        self.players
            .iter()
            .find(|p| &p.player_id == id)
            .ok_or_else(|| EngineError::PlayerNotFound(id.to_string()))
    }

    /// Get a mutable player by ID
    pub fn player_mut(&mut self, id: &PlayerId) -> Result<&mut PlayerState> {
        self.players
            .iter_mut()
            .find(|p| &p.player_id == id)
            .ok_or_else(|| EngineError::PlayerNotFound(id.to_string()))
    }

    pub fn current_player_id(&self) -> &PlayerId {
        &self.player_order[self.current_turn_index]
    }

    pub fn is_current(&self, id: &PlayerId) -> bool {
        self.current_player_id() == id
    }

    pub fn is_alive(&self, id: &PlayerId) -> bool {
        self.player(id).map(|p| p.alive).unwrap_or(false)
    }

    pub fn alive_players(&self) -> impl Iterator<Item = &PlayerState> {
        self.players.iter().filter(|p| p.alive)
    }

    pub fn alive_count(&self) -> usize {
        self.alive_players().count()
    }

    pub fn dead_count(&self) -> usize {
        self.players.len() - self.alive_count()
    }

    /// Terminal once at most one player is left
    pub fn is_game_over(&self) -> bool {
        self.alive_count() <= 1
    }

    /// Surviving players once the game is over, empty otherwise
    pub fn winners(&self) -> Vec<PlayerId> {
        if !self.is_game_over() {
            return Vec::new();
        }
        self.alive_players().map(|p| p.player_id.clone()).collect()
    }

    /// Cards in deck, discard pile, hands and stashes
    pub fn total_cards(&self) -> usize {
        self.deck.len()
            + self.discard_pile.len()
            + self.players.iter().map(PlayerState::card_count).sum::<usize>()
    }

    /// Is any defuse, alter or favor resolution outstanding?
    pub fn is_gated(&self) -> bool {
        self.pending_defuse.is_some() || self.pending_alter.is_some() || self.pending_favor.is_some()
    }

    /// Move a played card out of `player`'s hand.
    ///
    /// The card lands on the discard pile, or in the marker's hand when the
    /// slot was marked by a living player. Returns the player who received it.
    pub fn discard_from_hand(&mut self, player: &PlayerId, card: Card) -> Result<Option<PlayerId>> {
        let (card, marker) = self
            .player_mut(player)?
            .remove_card(card)
            .ok_or_else(|| EngineError::MissingCard(card.to_string()))?;

        match marker {
            Some(marker) if self.is_alive(&marker) => {
                self.player_mut(&marker)?.hand.add(card);
                Ok(Some(marker))
            }
            _ => {
                self.discard_pile.push_top(card);
                Ok(None)
            }
        }
    }

    /// Move the card at `slot` of `from`'s hand into `to`'s hand
    pub fn transfer_slot(&mut self, from: &PlayerId, slot: usize, to: &PlayerId) -> Result<Card> {
        let (card, _) = self
            .player_mut(from)?
            .remove_slot(slot)
            .ok_or_else(|| EngineError::InvalidAction(format!("no card at slot {slot}")))?;
        self.player_mut(to)?.hand.add(card);
        Ok(card)
    }
}
