//! Player controller trait
//!
//! A controller only ever sees its own sanitized [`PlayerView`] and the list
//! of legal actions. It cannot inspect hidden cards or mutate the game.

use crate::core::PlayerId;
use crate::game::actions::Action;
use crate::game::sanitize::PlayerView;

/// Decision maker for one seat
pub trait PlayerController {
    fn player_id(&self) -> &PlayerId;

    /// Pick one of `available` (never empty), or `None` to stay idle
    fn choose_action(&mut self, view: &PlayerView, available: &[Action]) -> Option<Action>;

    /// Called once when the game ends
    fn on_game_end(&mut self, _view: &PlayerView, _won: bool) {}
}
