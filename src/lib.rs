//! Critical - rules engine for an elimination card game
//!
//! The engine holds no session state of its own: callers pass the current
//! [`GameState`] plus a player action and get back a new state and the log
//! entries the action produced. Expansion packs plug into an ordered handler
//! chain, and every player receives a sanitized view of the table.

pub mod core;
pub mod error;
pub mod game;
pub mod zones;

pub use error::{EngineError, Result};
pub use game::engine::{
    execute_action, get_available_actions, get_winners, is_game_over, sanitize_state_for_player,
    validate_action,
};
pub use game::{initialize_state, ActionContext, ActionResult, GameConfig, GameState};
