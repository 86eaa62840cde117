//! Base game actions: Strike, Evade, Trade, Reorder, Insight, Cancel

use super::{CardHandler, HandlerCtx};
use crate::core::{describe_cards, Card};
use crate::game::actions::CardPlay;
use crate::game::toggle::{PendingAction, PendingKind, ToggleOutcome};
use crate::{EngineError, Result};

/// Cards revealed by Insight
const INSIGHT_DEPTH: usize = 3;

/// Fallback handler for the base set, always last in the chain
pub struct BaseHandler;

impl CardHandler for BaseHandler {
    fn name(&self) -> &'static str {
        "base"
    }

    fn try_handle(&self, ctx: &mut HandlerCtx<'_>, play: &CardPlay) -> Option<Result<()>> {
        let result = match play.card {
            Card::Strike => strike(ctx),
            Card::Evade => evade(ctx),
            Card::Trade => trade(ctx, play),
            Card::Reorder => reorder(ctx),
            Card::Insight => insight(ctx),
            _ => return None,
        };
        Some(result)
    }
}

fn strike(ctx: &mut HandlerCtx<'_>) -> Result<()> {
    let actor = ctx.actor.clone();
    ctx.discard_played(Card::Strike)?;
    let action = PendingAction::capture(ctx.state, PendingKind::Strike, &actor, None);
    ctx.state.apply_pending(action);

    let victim = ctx.state.current_player_id().clone();
    ctx.logger.action(
        &actor,
        format!("{actor} plays Strike: {victim} must draw {}", ctx.state.pending_draws),
    );
    Ok(())
}

fn evade(ctx: &mut HandlerCtx<'_>) -> Result<()> {
    let actor = ctx.actor.clone();
    ctx.discard_played(Card::Evade)?;
    let action = PendingAction::capture(ctx.state, PendingKind::Evade, &actor, None);
    ctx.state.apply_pending(action);
    ctx.logger.action(&actor, format!("{actor} plays Evade and skips a draw"));
    Ok(())
}

fn trade(ctx: &mut HandlerCtx<'_>, play: &CardPlay) -> Result<()> {
    let actor = ctx.actor.clone();
    let (target, _) = ctx.target(play)?;
    ctx.discard_played(Card::Trade)?;
    let action = PendingAction::capture(ctx.state, PendingKind::Trade, &actor, Some(target.clone()));
    ctx.state.apply_pending(action);
    ctx.logger
        .action(&actor, format!("{actor} plays Trade: {target} must give {actor} a card"));
    Ok(())
}

fn reorder(ctx: &mut HandlerCtx<'_>) -> Result<()> {
    let actor = ctx.actor.clone();
    ctx.discard_played(Card::Reorder)?;
    let action = PendingAction::capture(ctx.state, PendingKind::Reorder, &actor, None);
    ctx.state.apply_pending(action);
    ctx.logger.action(&actor, format!("{actor} plays Reorder and shuffles the deck"));
    Ok(())
}

fn insight(ctx: &mut HandlerCtx<'_>) -> Result<()> {
    let actor = ctx.actor.clone();
    ctx.discard_played(Card::Insight)?;
    let top = ctx.state.deck.peek_top(INSIGHT_DEPTH).to_vec();
    ctx.logger
        .action(&actor, format!("{actor} plays Insight and looks at the top of the deck"));
    ctx.logger
        .private(&actor, format!("Top of the deck: {}", describe_cards(&top)));
    Ok(())
}

impl HandlerCtx<'_> {
    /// Play a Cancel against the pending action
    pub fn play_cancel(&mut self) -> Result<()> {
        let actor = self.actor.clone();
        self.discard_played(Card::Cancel)?;
        let outcome = self
            .state
            .toggle_pending()
            .ok_or_else(|| EngineError::InvalidAction("there is nothing to cancel".to_string()))?;

        let (kind, initiator) = match &self.state.pending_action {
            Some(pending) => (pending.kind, pending.initiator.clone()),
            None => return Ok(()),
        };
        let message = match outcome {
            ToggleOutcome::Reversed => format!("{actor} plays Cancel: {initiator}'s {kind} is cancelled"),
            ToggleOutcome::Reapplied => format!("{actor} plays Cancel: {initiator}'s {kind} is back in effect"),
            ToggleOutcome::NoOp => format!("{actor} plays Cancel on {initiator}'s {kind}"),
        };
        self.logger.action(&actor, message);
        if outcome == ToggleOutcome::NoOp {
            self.logger.system("The cancelled action is not recognised; nothing changes");
        }
        Ok(())
    }

    /// The favor target hands over a card of their choice (clamped index)
    pub fn give_favor(&mut self, card_index: usize) -> Result<()> {
        let actor = self.actor.clone();
        let favor = self
            .state
            .pending_favor
            .take()
            .ok_or_else(|| EngineError::InvalidAction("no favor is pending".to_string()))?;

        let requester = favor.requester;
        let hand_len = self.state.player(&actor)?.hand.len();
        if hand_len == 0 {
            self.logger
                .action(&actor, format!("{actor} has no card to give {requester}"));
            return Ok(());
        }
        let slot = card_index.min(hand_len - 1);
        let card = self.state.transfer_slot(&actor, slot, &requester)?;

        self.logger.action(&actor, format!("{actor} gives {requester} a card"));
        self.logger.private(&requester, format!("{actor} gave you {card}"));
        self.logger.private(&actor, format!("You gave {card} to {requester}"));
        Ok(())
    }
}
