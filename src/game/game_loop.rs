//! Self-play game loop
//!
//! Drives a session with one [`PlayerController`] per seat until a single
//! player is left, nobody can move, or the action limit is hit. Each step
//! goes through the same [`Engine::apply`] path a networked session uses.

use crate::core::{PlayerId, Timestamp};
use crate::game::actions::{Action, ActionContext};
use crate::game::config::GameConfig;
use crate::game::controller::PlayerController;
use crate::game::engine::Engine;
use crate::game::logger::{print_entries, VerbosityLevel};
use crate::game::random_controller::RandomController;
use crate::game::sanitize::sanitize_state_for_player;
use crate::game::setup::initialize_state;
use crate::game::validator::legal_actions;
use crate::game::GameState;
use crate::{EngineError, Result};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha12Rng;

/// Chance that a player holding a Cancel answers out of turn
const DEFAULT_INTERRUPT_CHANCE: f64 = 0.25;

/// Result of running a game
#[derive(Debug, Clone)]
pub struct GameResult {
    /// Survivors once the game is over, empty otherwise
    pub winners: Vec<PlayerId>,
    pub actions_played: u32,
    pub end_reason: GameEndReason,
}

/// Reason the game ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GameEndReason {
    /// One player left standing
    LastSurvivor(PlayerId),
    /// The last eliminations left nobody alive
    NoSurvivors,
    /// Maximum action count reached
    ActionLimit,
    /// The acting player had no legal move or chose none
    Stalled(PlayerId),
}

/// Game loop manager
pub struct GameLoop {
    pub state: GameState,
    engine: Engine,
    /// Picks out-of-turn responders; separate from the session RNG
    rng: ChaCha12Rng,
    max_actions: u32,
    actions_played: u32,
    interrupt_chance: f64,
    pub verbosity: VerbosityLevel,
}

impl GameLoop {
    pub fn new(state: GameState, seed: u64) -> Self {
        GameLoop {
            state,
            engine: Engine::default(),
            rng: ChaCha12Rng::seed_from_u64(seed),
            max_actions: 5_000,
            actions_played: 0,
            interrupt_chance: DEFAULT_INTERRUPT_CHANCE,
            verbosity: VerbosityLevel::Silent,
        }
    }

    /// Set maximum actions before giving up
    pub fn with_max_actions(mut self, max_actions: u32) -> Self {
        self.max_actions = max_actions;
        self
    }

    pub fn with_verbosity(mut self, verbosity: VerbosityLevel) -> Self {
        self.verbosity = verbosity;
        self
    }

    pub fn with_interrupt_chance(mut self, chance: f64) -> Self {
        self.interrupt_chance = chance.clamp(0.0, 1.0);
        self
    }

    pub fn actions_played(&self) -> u32 {
        self.actions_played
    }

    /// Player whose resolution the game is waiting on
    fn primary_actor(&self) -> PlayerId {
        let state = &self.state;
        if let Some(defuser) = &state.pending_defuse {
            return defuser.clone();
        }
        if let Some(alter) = &state.pending_alter {
            return alter.player_id.clone();
        }
        if let Some(favor) = &state.pending_favor {
            return favor.target.clone();
        }
        state.current_player_id().clone()
    }

    /// The primary actor, or now and then someone answering with a Cancel
    fn next_actor(&mut self) -> PlayerId {
        let primary = self.primary_actor();
        let responders: Vec<PlayerId> = self
            .state
            .alive_players()
            .map(|p| p.player_id.clone())
            .filter(|id| id != &primary)
            .filter(|id| legal_actions(&self.state, id).contains(&Action::PlayCancel))
            .collect();

        if !responders.is_empty() && self.rng.gen_bool(self.interrupt_chance) {
            let index = self.rng.gen_range(0..responders.len());
            return responders[index].clone();
        }
        primary
    }

    fn finished(&self) -> Option<GameResult> {
        let end_reason = if self.state.is_game_over() {
            match self.state.winners().first() {
                Some(winner) => GameEndReason::LastSurvivor(winner.clone()),
                None => GameEndReason::NoSurvivors,
            }
        } else if self.actions_played >= self.max_actions {
            GameEndReason::ActionLimit
        } else {
            return None;
        };
        Some(self.result(end_reason))
    }

    fn result(&self, end_reason: GameEndReason) -> GameResult {
        GameResult {
            winners: self.state.winners(),
            actions_played: self.actions_played,
            end_reason,
        }
    }

    /// Run one action. Returns the result once the game has ended.
    pub fn step(&mut self, controllers: &mut [Box<dyn PlayerController>]) -> Result<Option<GameResult>> {
        if let Some(result) = self.finished() {
            return Ok(Some(result));
        }

        let actor = self.next_actor();
        let available = legal_actions(&self.state, &actor);
        let controller = controllers
            .iter_mut()
            .find(|c| c.player_id() == &actor)
            .ok_or_else(|| EngineError::PlayerNotFound(actor.to_string()))?;

        if available.is_empty() {
            return Ok(Some(self.result(GameEndReason::Stalled(actor))));
        }
        let view = sanitize_state_for_player(&self.state, &actor);
        let Some(action) = controller.choose_action(&view, &available) else {
            return Ok(Some(self.result(GameEndReason::Stalled(actor))));
        };

        let ctx = ActionContext::new(actor, Timestamp(u64::from(self.actions_played)));
        let (next, logs) = self.engine.apply(&self.state, &ctx, &action)?;
        print_entries(&logs, self.verbosity);
        self.state = next;
        self.actions_played += 1;

        Ok(self.finished())
    }

    /// Run until the game ends, then notify every controller
    pub fn run_game(&mut self, controllers: &mut [Box<dyn PlayerController>]) -> Result<GameResult> {
        let result = loop {
            if let Some(result) = self.step(controllers)? {
                break result;
            }
        };

        for controller in controllers.iter_mut() {
            let won = result.winners.contains(controller.player_id());
            let view = sanitize_state_for_player(&self.state, controller.player_id());
            controller.on_game_end(&view, won);
        }
        log::info!(
            "game finished after {} actions: {:?}",
            result.actions_played,
            result.end_reason
        );
        Ok(result)
    }
}

/// One random controller per seat, seeded from `seed`
pub fn random_controllers(player_ids: &[PlayerId], seed: u64) -> Vec<Box<dyn PlayerController>> {
    player_ids
        .iter()
        .enumerate()
        .map(|(i, id)| {
            Box::new(RandomController::with_seed(id.clone(), seed.wrapping_add(i as u64 + 1)))
                as Box<dyn PlayerController>
        })
        .collect()
}

/// Deal a seeded game and play it out with random controllers
pub fn play_random_game(
    player_ids: &[PlayerId],
    config: &GameConfig,
    seed: u64,
    max_actions: u32,
) -> Result<(GameState, GameResult)> {
    let config = config.clone().with_seed(seed);
    let state = initialize_state(player_ids, &config)?;
    let mut controllers = random_controllers(player_ids, seed);
    let mut game_loop = GameLoop::new(state, seed).with_max_actions(max_actions);
    let result = game_loop.run_game(&mut controllers)?;
    Ok((game_loop.state, result))
}
