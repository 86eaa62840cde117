//! Turn order and forced-draw bookkeeping

use crate::game::GameState;

impl GameState {
    /// Next alive seat after `index` in play direction.
    ///
    /// Tries at most one full lap, so a table with nobody alive returns `None`
    /// instead of spinning.
    pub fn next_alive_after(&self, index: usize) -> Option<usize> {
        let len = self.players.len();
        let mut idx = index;
        for _ in 0..len {
            idx = self.play_direction.step(idx, len);
            if self.players[idx].alive {
                return Some(idx);
            }
        }
        None
    }

    /// End the current turn: pass to the next alive seat owing one draw.
    ///
    /// Exactly one turn-ending transition calls this per action. The outgoing
    /// player's Blackout wears off here.
    pub fn advance_turn(&mut self) {
        let outgoing = self.current_turn_index;
        self.players[outgoing].blind = false;

        if let Some(next) = self.next_alive_after(outgoing) {
            self.current_turn_index = next;
        }
        self.pending_draws = 1;
    }

    /// Hand the turn to a specific seat with `draws` owed, without the generic advance
    pub fn redirect_turn(&mut self, index: usize, draws: u32) {
        let outgoing = self.current_turn_index;
        if outgoing != index {
            self.players[outgoing].blind = false;
        }
        self.current_turn_index = index;
        self.pending_draws = draws;
    }

    /// Draws an attack leaves on its victim: stacked extra turns carry over
    pub fn stacked_attack_draws(prior_pending_draws: u32) -> u32 {
        let carried = if prior_pending_draws > 1 { prior_pending_draws } else { 0 };
        carried + 2
    }

    /// Consume one draw obligation, advancing once none are left
    pub fn finish_one_draw(&mut self) {
        self.pending_draws = self.pending_draws.saturating_sub(1);
        if self.pending_draws == 0 {
            self.advance_turn();
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::core::PlayerId;
    use crate::game::{GameState, PlayDirection};
    use rand::SeedableRng;
    use rand_chacha::ChaCha12Rng;

    fn table(n: usize) -> GameState {
        let ids: Vec<PlayerId> = (1..=n).map(|i| PlayerId::new(format!("p{i}"))).collect();
        GameState::new(&ids, Vec::new(), Vec::new(), ChaCha12Rng::seed_from_u64(0))
    }

    #[test]
    fn test_advance_wraps_and_resets_draws() {
        let mut game = table(3);
        game.current_turn_index = 2;
        game.pending_draws = 0;
        game.advance_turn();
        assert_eq!(game.current_turn_index, 0);
        assert_eq!(game.pending_draws, 1);
    }

    #[test]
    fn test_advance_skips_dead_players() {
        let mut game = table(4);
        game.players[1].alive = false;
        game.players[2].alive = false;
        game.advance_turn();
        assert_eq!(game.current_turn_index, 3);
    }

    #[test]
    fn test_advance_backward() {
        let mut game = table(4);
        game.play_direction = PlayDirection::Backward;
        game.advance_turn();
        assert_eq!(game.current_turn_index, 3);
    }

    #[test]
    fn test_advance_with_nobody_alive_terminates() {
        let mut game = table(3);
        for p in game.players.iter_mut() {
            p.alive = false;
        }
        game.advance_turn();
        assert_eq!(game.current_turn_index, 0);
        assert_eq!(game.pending_draws, 1);
    }

    #[test]
    fn test_stacked_attack_draws() {
        assert_eq!(GameState::stacked_attack_draws(1), 2);
        assert_eq!(GameState::stacked_attack_draws(0), 2);
        assert_eq!(GameState::stacked_attack_draws(2), 4);
        assert_eq!(GameState::stacked_attack_draws(3), 5);
    }

    #[test]
    fn test_finish_one_draw() {
        let mut game = table(2);
        game.pending_draws = 2;
        game.finish_one_draw();
        assert_eq!(game.current_turn_index, 0);
        assert_eq!(game.pending_draws, 1);
        game.finish_one_draw();
        assert_eq!(game.current_turn_index, 1);
        assert_eq!(game.pending_draws, 1);
    }

    #[test]
    fn test_blind_wears_off_when_turn_passes() {
        let mut game = table(2);
        game.players[0].blind = true;
        game.players[1].blind = true;
        game.advance_turn();
        assert!(!game.players[0].blind);
        assert!(game.players[1].blind);
    }
}
