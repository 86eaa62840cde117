//! Theft pack: Mark, Steal Draw, Stash

use super::{CardHandler, HandlerCtx};
use crate::core::{describe_cards, Card, STASH_LIMIT};
use crate::game::actions::CardPlay;
use crate::{EngineError, Result};

pub struct TheftPack;

impl CardHandler for TheftPack {
    fn name(&self) -> &'static str {
        "theft"
    }

    fn try_handle(&self, ctx: &mut HandlerCtx<'_>, play: &CardPlay) -> Option<Result<()>> {
        let result = match play.card {
            Card::Mark => mark(ctx, play),
            Card::StealDraw => steal_draw(ctx, play),
            Card::Stash => stash(ctx, play),
            _ => return None,
        };
        Some(result)
    }
}

fn mark(ctx: &mut HandlerCtx<'_>, play: &CardPlay) -> Result<()> {
    let actor = ctx.actor.clone();
    let (target, _) = ctx.target(play)?;
    let slots = ctx.state.player(&target)?.unmarked_slots();
    if slots.is_empty() {
        return Err(EngineError::InvalidTarget(format!("{target} has no card left to mark")));
    }
    ctx.discard_played(Card::Mark)?;

    let slot = slots[ctx.random_index(slots.len())];
    let victim = ctx.state.player_mut(&target)?;
    victim.mark(slot, actor.clone());
    let card = victim
        .hand
        .get(slot)
        .ok_or_else(|| EngineError::InvalidAction(format!("no card at slot {slot}")))?;

    ctx.logger
        .action(&actor, format!("{actor} plays Mark on one of {target}'s cards"));
    ctx.logger
        .private(&actor, format!("You marked {target}'s {card}"));
    Ok(())
}

fn steal_draw(ctx: &mut HandlerCtx<'_>, play: &CardPlay) -> Result<()> {
    let actor = ctx.actor.clone();
    let (target, _) = ctx.target(play)?;
    ctx.discard_played(Card::StealDraw)?;
    ctx.state.player_mut(&target)?.pending_steal_draw = Some(actor.clone());
    ctx.logger
        .action(&actor, format!("{actor} plays Steal Draw on {target}"));
    Ok(())
}

fn stash(ctx: &mut HandlerCtx<'_>, play: &CardPlay) -> Result<()> {
    let actor = ctx.actor.clone();
    if play.cards.is_empty() {
        return Err(EngineError::InvalidPayload("choose at least one card to stash".to_string()));
    }
    let room = STASH_LIMIT.saturating_sub(ctx.state.player(&actor)?.stash.len());
    if play.cards.len() > room {
        return Err(EngineError::InvalidAction(format!(
            "the stash holds at most {STASH_LIMIT} cards"
        )));
    }
    ctx.discard_played(Card::Stash)?;

    let player = ctx.state.player_mut(&actor)?;
    for &card in &play.cards {
        let (card, _) = player
            .remove_card(card)
            .ok_or_else(|| EngineError::MissingCard(card.to_string()))?;
        player.stash.add(card);
    }

    ctx.logger.action(
        &actor,
        format!("{actor} plays Stash and puts {} cards out of reach", play.cards.len()),
    );
    ctx.logger
        .private(&actor, format!("You stashed {}", describe_cards(&play.cards)));
    Ok(())
}

impl HandlerCtx<'_> {
    /// Move a stashed card back into the actor's hand
    pub fn unstash(&mut self, card: Card) -> Result<()> {
        let actor = self.actor.clone();
        let player = self.state.player_mut(&actor)?;
        let card = player
            .stash
            .take(card)
            .ok_or_else(|| EngineError::MissingCard(format!("{card} is not in the stash")))?;
        player.hand.add(card);
        self.logger
            .action(&actor, format!("{actor} takes a card back from their stash"));
        Ok(())
    }
}
