//! Action pipeline: parse, validate, apply to a copy, collect logs
//!
//! The engine owns no game state. Each call takes the session's current
//! state and returns a new one, so a rejected action leaves the caller's
//! state untouched.

use crate::core::PlayerId;
use crate::game::actions::{Action, ActionContext, ActionName};
use crate::game::draw::DrawSource;
use crate::game::logger::{GameLogger, LogEntry};
use crate::game::packs::{default_handlers, CardHandler, HandlerCtx};
use crate::game::sanitize::PlayerView;
use crate::game::validator::{available_action_names, validate};
use crate::game::GameState;
use crate::{EngineError, Result};
use serde::Serialize;

/// Outcome of one submitted action
#[derive(Debug, Clone, Serialize)]
pub struct ActionResult {
    pub success: bool,
    /// The new state, present on success
    pub state: Option<GameState>,
    pub error: Option<String>,
    /// Entries appended by this action
    pub logs: Vec<LogEntry>,
}

impl ActionResult {
    fn accepted(state: GameState, logs: Vec<LogEntry>) -> Self {
        ActionResult {
            success: true,
            state: Some(state),
            error: None,
            logs,
        }
    }

    fn rejected(error: &EngineError) -> Self {
        ActionResult {
            success: false,
            state: None,
            error: Some(error.to_string()),
            logs: Vec::new(),
        }
    }
}

/// Rules engine with its ordered card handler chain
pub struct Engine {
    handlers: Vec<Box<dyn CardHandler>>,
}

impl Default for Engine {
    fn default() -> Self {
        Engine::new(default_handlers())
    }
}

impl Engine {
    pub fn new(handlers: Vec<Box<dyn CardHandler>>) -> Self {
        Engine { handlers }
    }

    pub fn handler_names(&self) -> Vec<&'static str> {
        self.handlers.iter().map(|h| h.name()).collect()
    }

    /// Would `action_name` with `payload` be accepted from `ctx.user_id`?
    pub fn validate(
        &self,
        state: &GameState,
        action_name: &str,
        ctx: &ActionContext,
        payload: serde_json::Value,
    ) -> Result<Action> {
        let action = Action::parse(action_name, payload)?;
        validate(state, &ctx.user_id, &action)?;
        Ok(action)
    }

    /// Parse, validate and apply one wire action
    pub fn execute(
        &self,
        state: &GameState,
        action_name: &str,
        ctx: &ActionContext,
        payload: serde_json::Value,
    ) -> ActionResult {
        let outcome = Action::parse(action_name, payload).and_then(|action| self.apply(state, ctx, &action));
        match outcome {
            Ok((next, logs)) => ActionResult::accepted(next, logs),
            Err(e) => {
                log::debug!("rejected {action_name} from {}: {e}", ctx.user_id);
                ActionResult::rejected(&e)
            }
        }
    }

    /// Apply an already parsed action, returning the new state and its log entries
    pub fn apply(&self, state: &GameState, ctx: &ActionContext, action: &Action) -> Result<(GameState, Vec<LogEntry>)> {
        validate(state, &ctx.user_id, action)?;

        let mut next = state.clone();
        // Only a Cancel can answer the pending action; anything else closes the window.
        if !matches!(action, Action::PlayCancel) {
            next.pending_action = None;
        }

        let mut logger = GameLogger::new(next.next_log_id, ctx.timestamp);
        {
            let mut hctx = HandlerCtx::new(&mut next, ctx.user_id.clone(), &mut logger);
            self.dispatch(&mut hctx, action)?;
        }

        next.next_log_id = logger.next_id();
        let logs = logger.into_entries();
        next.logs.extend(logs.iter().cloned());
        log::trace!("{} {} accepted, {} log entries", ctx.user_id, action.name(), logs.len());
        Ok((next, logs))
    }

    fn dispatch(&self, ctx: &mut HandlerCtx<'_>, action: &Action) -> Result<()> {
        match action {
            Action::DrawCard => ctx.resolve_draw(DrawSource::Top, "draws a card"),
            Action::PlayCard(play) => {
                for handler in &self.handlers {
                    if let Some(result) = handler.try_handle(ctx, play) {
                        return result;
                    }
                }
                Err(EngineError::InvalidAction(format!("no handler plays {}", play.card)))
            }
            Action::PlayCancel => ctx.play_cancel(),
            Action::PlayNeutralizer(defuse) => ctx.neutralize(defuse.position),
            Action::GiveFavor(gift) => ctx.give_favor(gift.card_index),
            Action::PlayCombo(combo) => ctx.play_combo(combo).map(|_| ()),
            Action::CommitAlterFuture(commit) => ctx.commit_alter_future(&commit.order),
            Action::UnstashCard(unstash) => ctx.unstash(unstash.card),
        }
    }
}

pub fn validate_action(
    state: &GameState,
    action_name: &str,
    ctx: &ActionContext,
    payload: serde_json::Value,
) -> bool {
    Engine::default().validate(state, action_name, ctx, payload).is_ok()
}

pub fn execute_action(
    state: &GameState,
    action_name: &str,
    ctx: &ActionContext,
    payload: serde_json::Value,
) -> ActionResult {
    Engine::default().execute(state, action_name, ctx, payload)
}

pub fn is_game_over(state: &GameState) -> bool {
    state.is_game_over()
}

pub fn get_winners(state: &GameState) -> Vec<PlayerId> {
    state.winners()
}

pub fn get_available_actions(state: &GameState, player: &PlayerId) -> Vec<ActionName> {
    available_action_names(state, player)
}

pub fn sanitize_state_for_player(state: &GameState, viewer: &PlayerId) -> PlayerView {
    crate::game::sanitize::sanitize_state_for_player(state, viewer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Card, Timestamp};
    use crate::game::packs::testing::{pid, table};
    use serde_json::json;

    fn ctx(user: &str) -> ActionContext {
        ActionContext::new(user, Timestamp(100))
    }

    #[test]
    fn test_rejection_leaves_state_untouched() {
        let game = table(2, vec![vec![Card::Strike], vec![]], vec![Card::Lynx]);
        let result = execute_action(&game, "draw_card", &ctx("p2"), json!({}));
        assert!(!result.success);
        assert!(result.state.is_none());
        assert_eq!(result.error.as_deref(), Some("Not your turn"));
        assert!(result.logs.is_empty());
        assert!(game.logs.is_empty());
    }

    #[test]
    fn test_unknown_action_and_bad_payload() {
        let game = table(2, vec![vec![], vec![]], vec![Card::Lynx]);
        assert!(!execute_action(&game, "fold", &ctx("p1"), json!({})).success);
        assert!(!execute_action(&game, "play_card", &ctx("p1"), json!({"card": 7})).success);
        assert!(!validate_action(&game, "play_neutralizer", &ctx("p1"), json!({"position": 0})));
        assert!(validate_action(&game, "draw_card", &ctx("p1"), serde_json::Value::Null));
    }

    #[test]
    fn test_logs_are_numbered_and_stamped() {
        let game = table(2, vec![vec![Card::Strike], vec![]], vec![Card::Lynx, Card::Tabby, Card::Bengal]);
        let first = execute_action(&game, "play_card", &ctx("p1"), json!({"card": "strike"}));
        assert!(first.success);
        let state = first.state.unwrap();
        assert_eq!(first.logs[0].id, "log-0");
        assert_eq!(first.logs[0].created_at, Timestamp(100));

        let second = execute_action(&state, "draw_card", &ctx("p2"), json!({}));
        let state = second.state.unwrap();
        assert_eq!(second.logs[0].id, "log-1");
        assert_eq!(state.logs.len(), 3);
        assert_eq!(state.next_log_id, 3);
    }

    #[test]
    fn test_non_cancel_action_closes_cancel_window() {
        let game = table(2, vec![vec![Card::Strike], vec![Card::Cancel]], vec![Card::Lynx; 3]);
        let state = execute_action(&game, "play_card", &ctx("p1"), json!({"card": "strike"}))
            .state
            .unwrap();
        assert!(state.pending_action.is_some());
        assert!(validate_action(&state, "play_cancel", &ctx("p2"), json!({})));

        let state = execute_action(&state, "draw_card", &ctx("p2"), json!({}))
            .state
            .unwrap();
        assert!(state.pending_action.is_none());
        assert!(!validate_action(&state, "play_cancel", &ctx("p2"), json!({})));
    }

    #[test]
    fn test_wildcard_alone_is_not_a_play() {
        let game = table(2, vec![vec![Card::Wildcard], vec![]], vec![Card::Lynx]);
        let result = execute_action(&game, "play_card", &ctx("p1"), json!({"card": "wildcard"}));
        assert!(!result.success);
    }

    #[test]
    fn test_surface_helpers() {
        let mut game = table(2, vec![vec![], vec![]], vec![Card::Lynx]);
        assert!(!is_game_over(&game));
        assert!(get_winners(&game).is_empty());
        assert_eq!(get_available_actions(&game, &pid("p1")), vec![ActionName::DrawCard]);

        game.players[0].alive = false;
        assert!(is_game_over(&game));
        assert_eq!(get_winners(&game), vec![pid("p2")]);
        assert!(get_available_actions(&game, &pid("p2")).is_empty());
        assert_eq!(Engine::default().handler_names().last(), Some(&"base"));
    }
}
