//! Cancel chain over the last cancelable action
//!
//! A Cancel never deletes the action it answers. It bumps the action's
//! toggle count and, by parity, either reverses the action's turn and draw
//! side effects or applies them again. Every cancelable kind supplies its
//! apply/reverse pair in [`PendingKind::reversible`].

use crate::core::PlayerId;
use crate::game::GameState;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Kinds of actions a Cancel can answer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PendingKind {
    Strike,
    TargetedAttack,
    Evade,
    Reorder,
    Trade,
    /// Recorded by a pack this build does not know
    #[serde(other)]
    Unknown,
}

impl fmt::Display for PendingKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PendingKind::Strike => "Strike",
            PendingKind::TargetedAttack => "Targeted Attack",
            PendingKind::Evade => "Evade",
            PendingKind::Reorder => "Reorder",
            PendingKind::Trade => "Trade",
            PendingKind::Unknown => "unknown action",
        };
        write!(f, "{name}")
    }
}

/// Turn and draw state captured before the action took effect
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingPayload {
    pub prior_turn_index: usize,
    pub prior_pending_draws: u32,
    #[serde(default)]
    pub target: Option<PlayerId>,
}

/// The last cancelable action. Its effect is active iff `toggle_count` is odd.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingAction {
    #[serde(rename = "type")]
    pub kind: PendingKind,
    pub initiator: PlayerId,
    pub payload: PendingPayload,
    pub toggle_count: u32,
}

impl PendingAction {
    /// Record an action as it takes effect (toggle count 1, active)
    pub fn new(kind: PendingKind, initiator: PlayerId, payload: PendingPayload) -> Self {
        PendingAction {
            kind,
            initiator,
            payload,
            toggle_count: 1,
        }
    }

    /// Record `kind` against the current turn and draw state
    pub fn capture(state: &GameState, kind: PendingKind, initiator: &PlayerId, target: Option<PlayerId>) -> Self {
        Self::new(
            kind,
            initiator.clone(),
            PendingPayload {
                prior_turn_index: state.current_turn_index,
                prior_pending_draws: state.pending_draws,
                target,
            },
        )
    }

    pub fn is_active(&self) -> bool {
        self.toggle_count % 2 == 1
    }
}

type Effect = fn(&mut GameState, &PendingAction);

/// Forward effect and its inverse
#[derive(Clone, Copy)]
pub struct Reversible {
    pub apply: Effect,
    pub reverse: Effect,
}

impl PendingKind {
    /// The apply/reverse pair for this kind, `None` for unknown kinds
    pub fn reversible(self) -> Option<Reversible> {
        let pair = match self {
            PendingKind::Strike => Reversible {
                apply: apply_strike,
                reverse: restore_turn,
            },
            PendingKind::TargetedAttack => Reversible {
                apply: apply_targeted_attack,
                reverse: restore_turn,
            },
            PendingKind::Evade => Reversible {
                apply: apply_evade,
                reverse: restore_turn,
            },
            PendingKind::Reorder => Reversible {
                apply: reshuffle,
                reverse: reshuffle,
            },
            PendingKind::Trade => Reversible {
                apply: open_favor,
                reverse: close_favor,
            },
            PendingKind::Unknown => return None,
        };
        Some(pair)
    }
}

fn restore_turn(state: &mut GameState, action: &PendingAction) {
    state.current_turn_index = action.payload.prior_turn_index;
    state.pending_draws = action.payload.prior_pending_draws;
}

fn apply_strike(state: &mut GameState, action: &PendingAction) {
    state.current_turn_index = action.payload.prior_turn_index;
    state.advance_turn();
    state.pending_draws = GameState::stacked_attack_draws(action.payload.prior_pending_draws);
}

fn apply_targeted_attack(state: &mut GameState, action: &PendingAction) {
    let draws = GameState::stacked_attack_draws(action.payload.prior_pending_draws);
    let target = action
        .payload
        .target
        .as_ref()
        .and_then(|t| state.player_index(t));
    match target {
        Some(index) => state.redirect_turn(index, draws),
        None => {
            state.current_turn_index = action.payload.prior_turn_index;
            state.advance_turn();
            state.pending_draws = draws;
        }
    }
}

fn apply_evade(state: &mut GameState, action: &PendingAction) {
    restore_turn(state, action);
    state.finish_one_draw();
}

fn reshuffle(state: &mut GameState, _action: &PendingAction) {
    state.deck.shuffle(&mut state.rng);
}

fn open_favor(state: &mut GameState, action: &PendingAction) {
    if let Some(target) = action.payload.target.clone() {
        state.pending_favor = Some(crate::game::PendingFavor {
            requester: action.initiator.clone(),
            target,
        });
    }
}

fn close_favor(state: &mut GameState, _action: &PendingAction) {
    state.pending_favor = None;
}

/// What a Cancel did to the pending action
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToggleOutcome {
    /// Effects undone; the action is suspended
    Reversed,
    /// Effects restored
    Reapplied,
    /// Unknown kind: count flipped, state untouched
    NoOp,
}

impl GameState {
    /// Apply a freshly played cancelable action and open the cancel window on it
    pub fn apply_pending(&mut self, action: PendingAction) {
        if let Some(pair) = action.kind.reversible() {
            (pair.apply)(self, &action);
        }
        self.pending_action = Some(action);
    }

    /// Flip the pending action. Returns `None` when nothing is pending.
    pub fn toggle_pending(&mut self) -> Option<ToggleOutcome> {
        let mut action = self.pending_action.take()?;
        action.toggle_count += 1;

        let outcome = match action.kind.reversible() {
            Some(pair) if action.is_active() => {
                (pair.apply)(self, &action);
                ToggleOutcome::Reapplied
            }
            Some(pair) => {
                (pair.reverse)(self, &action);
                ToggleOutcome::Reversed
            }
            None => {
                log::warn!(
                    "cancel on unknown pending action from {} ignored (toggle {})",
                    action.initiator,
                    action.toggle_count
                );
                ToggleOutcome::NoOp
            }
        };

        self.pending_action = Some(action);
        Some(outcome)
    }
}
