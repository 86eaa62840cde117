//! Core game types

pub mod card;
pub mod player;
pub mod types;

pub use card::{describe_cards, Card, CardCategory, Expansion};
pub use player::{MarkedCard, PlayerState, STASH_LIMIT};
pub use types::{PlayerId, Timestamp};
