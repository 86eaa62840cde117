//! Game state, rules and the action pipeline

pub mod actions;
pub mod combo;
pub mod config;
pub mod controller;
pub mod draw;
pub mod engine;
pub mod game_loop;
pub mod logger;
pub mod packs;
pub mod random_controller;
pub mod sanitize;
pub mod setup;
pub mod state;
pub mod toggle;
pub mod turn;
pub mod validator;

pub use actions::{Action, ActionContext, ActionName};
pub use combo::ComboKind;
pub use config::GameConfig;
pub use controller::PlayerController;
pub use engine::{ActionResult, Engine};
pub use game_loop::{play_random_game, GameEndReason, GameLoop, GameResult};
pub use logger::{GameLogger, LogEntry, LogKind, LogScope, VerbosityLevel};
pub use random_controller::RandomController;
pub use sanitize::{CardView, PlayerStateView, PlayerView};
pub use setup::{build_deck, initialize_state, HAND_SIZE};
pub use state::{GameState, PendingAlter, PendingFavor, PlayDirection};
pub use toggle::{PendingAction, PendingKind, ToggleOutcome};
pub use validator::{legal_actions, validate};
