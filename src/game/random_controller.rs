//! Random controller for self-play testing
//!
//! Picks uniformly among legal actions, with a bias toward drawing so games
//! finish in a reasonable number of actions.

use crate::core::PlayerId;
use crate::game::actions::{Action, Defuse, FavorGift};
use crate::game::controller::PlayerController;
use crate::game::sanitize::PlayerView;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Probability of drawing whenever a draw is legal
const DRAW_BIAS: f64 = 0.6;

/// A controller that makes random choices
pub struct RandomController {
    player_id: PlayerId,
    rng: StdRng,
}

impl RandomController {
    /// Create a random controller seeded from entropy
    pub fn new(player_id: PlayerId) -> Self {
        RandomController {
            player_id,
            rng: StdRng::from_entropy(),
        }
    }

    /// Create a random controller with a seeded RNG (for deterministic testing)
    pub fn with_seed(player_id: PlayerId, seed: u64) -> Self {
        RandomController {
            player_id,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Fill in the free numeric choices the legal-move list leaves at zero
    fn randomize(&mut self, action: Action, view: &PlayerView) -> Action {
        match action {
            Action::PlayNeutralizer(_) => Action::PlayNeutralizer(Defuse {
                position: self.rng.gen_range(0..=view.deck_count),
            }),
            Action::GiveFavor(_) => {
                let held = view
                    .players
                    .iter()
                    .find(|p| p.player_id == self.player_id)
                    .map(|p| p.hand.len())
                    .unwrap_or(0);
                Action::GiveFavor(FavorGift {
                    card_index: self.rng.gen_range(0..held.max(1)),
                })
            }
            other => other,
        }
    }
}

impl PlayerController for RandomController {
    fn player_id(&self) -> &PlayerId {
        &self.player_id
    }

    fn choose_action(&mut self, view: &PlayerView, available: &[Action]) -> Option<Action> {
        if available.is_empty() {
            return None;
        }
        if available.contains(&Action::DrawCard) && self.rng.gen_bool(DRAW_BIAS) {
            return Some(Action::DrawCard);
        }
        let index = self.rng.gen_range(0..available.len());
        Some(self.randomize(available[index].clone(), view))
    }
}
