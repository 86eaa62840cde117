//! Chaos pack: Fission, Tribute, Blackout
//!
//! Wildcards belong to this pack too but are only ever played inside a
//! combo, so the handler never claims them.

use super::{CardHandler, HandlerCtx};
use crate::core::Card;
use crate::game::actions::CardPlay;
use crate::Result;

pub struct ChaosPack;

impl CardHandler for ChaosPack {
    fn name(&self) -> &'static str {
        "chaos"
    }

    fn try_handle(&self, ctx: &mut HandlerCtx<'_>, play: &CardPlay) -> Option<Result<()>> {
        let result = match play.card {
            Card::Fission => fission(ctx),
            Card::Tribute => tribute(ctx),
            Card::Blackout => blackout(ctx, play),
            _ => return None,
        };
        Some(result)
    }
}

/// Every critical event in the deck rises to the top over a reshuffled
/// remainder, then the turn ends
fn fission(ctx: &mut HandlerCtx<'_>) -> Result<()> {
    let actor = ctx.actor.clone();
    ctx.discard_played(Card::Fission)?;

    let criticals = ctx.state.deck.extract(|c| c.is_critical());
    let moved = criticals.len();
    let state = &mut *ctx.state;
    state.deck.shuffle(&mut state.rng);
    state.deck.prepend(criticals);

    ctx.state.pending_draws = 0;
    ctx.state.advance_turn();
    ctx.logger.action(
        &actor,
        format!("{actor} plays Fission: {moved} critical events rise to the top of the deck"),
    );
    Ok(())
}

fn tribute(ctx: &mut HandlerCtx<'_>) -> Result<()> {
    let actor = ctx.actor.clone();
    ctx.discard_played(Card::Tribute)?;

    let givers: Vec<_> = ctx
        .state
        .alive_players()
        .filter(|p| !p.hand.is_empty())
        .map(|p| p.player_id.clone())
        .collect();

    for giver in &givers {
        let len = ctx.state.player(giver)?.hand.len();
        let slot = ctx.random_index(len);
        if let Some((card, _)) = ctx.state.player_mut(giver)?.remove_slot(slot) {
            ctx.state.deck.push_top(card);
            ctx.logger.private(giver, format!("You paid {card} as tribute"));
        }
    }

    ctx.logger.action(
        &actor,
        format!("{actor} plays Tribute: {} cards go on top of the deck", givers.len()),
    );
    Ok(())
}

fn blackout(ctx: &mut HandlerCtx<'_>, play: &CardPlay) -> Result<()> {
    let actor = ctx.actor.clone();
    let (target, _) = ctx.target(play)?;
    ctx.discard_played(Card::Blackout)?;
    ctx.state.player_mut(&target)?.blind = true;
    ctx.logger
        .action(&actor, format!("{actor} plays Blackout on {target}"));
    Ok(())
}
