//! Future pack: Alter/Share the Future, Draw from the Bottom, Swap Top and
//! Bottom, Bury

use super::{CardHandler, HandlerCtx};
use crate::core::{describe_cards, Card};
use crate::game::actions::CardPlay;
use crate::game::draw::DrawSource;
use crate::game::PendingAlter;
use crate::{EngineError, Result};
use rustc_hash::FxHashMap;

/// Cards revealed by Alter and Share the Future
pub const ALTER_DEPTH: usize = 3;

pub struct FuturePack;

impl CardHandler for FuturePack {
    fn name(&self) -> &'static str {
        "future"
    }

    fn try_handle(&self, ctx: &mut HandlerCtx<'_>, play: &CardPlay) -> Option<Result<()>> {
        let result = match play.card {
            Card::AlterFuture => peek_for_alter(ctx, false),
            Card::ShareFuture => peek_for_alter(ctx, true),
            Card::DrawBottom => draw_bottom(ctx),
            Card::SwapTopBottom => swap_top_bottom(ctx),
            Card::Bury => bury(ctx),
            _ => return None,
        };
        Some(result)
    }
}

fn peek_for_alter(ctx: &mut HandlerCtx<'_>, is_share: bool) -> Result<()> {
    let actor = ctx.actor.clone();
    let card = if is_share { Card::ShareFuture } else { Card::AlterFuture };
    ctx.discard_played(card)?;

    let revealed = ctx.state.deck.peek_top(ALTER_DEPTH).to_vec();
    ctx.state.pending_alter = Some(PendingAlter {
        player_id: actor.clone(),
        count: revealed.len(),
        is_share,
        revealed: revealed.clone(),
    });

    ctx.logger.action(
        &actor,
        format!("{actor} plays {card} and rearranges the top {} cards", revealed.len()),
    );
    ctx.logger
        .private(&actor, format!("Top of the deck: {}", describe_cards(&revealed)));
    Ok(())
}

/// Same cards, same multiplicities?
pub fn is_permutation(a: &[Card], b: &[Card]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    let mut tally: FxHashMap<Card, i32> = FxHashMap::default();
    for &card in a {
        *tally.entry(card).or_insert(0) += 1;
    }
    for &card in b {
        *tally.entry(card).or_insert(0) -= 1;
    }
    tally.values().all(|&n| n == 0)
}

impl HandlerCtx<'_> {
    /// Write back the reordered top of the deck and lift the alter gate
    pub fn commit_alter_future(&mut self, order: &[Card]) -> Result<()> {
        let actor = self.actor.clone();
        let alter = self
            .state
            .pending_alter
            .take()
            .ok_or_else(|| EngineError::InvalidAction("no alter is pending".to_string()))?;

        if order.len() != alter.count || !is_permutation(order, &alter.revealed) {
            self.state.pending_alter = Some(alter);
            return Err(EngineError::InvalidPayload(
                "the new order must rearrange exactly the revealed cards".to_string(),
            ));
        }

        self.state.deck.replace_top(order);
        self.logger
            .action(&actor, format!("{actor} puts the top {} cards back", alter.count));

        if alter.is_share {
            let seat = self.state.current_turn_index;
            if let Some(next) = self.state.next_alive_after(seat) {
                let viewer = self.state.player_order[next].clone();
                if viewer != actor {
                    let top = self.state.deck.peek_top(alter.count).to_vec();
                    self.logger.private(
                        &viewer,
                        format!("{actor} shared the top of the deck: {}", describe_cards(&top)),
                    );
                }
            }
        }
        Ok(())
    }
}

fn draw_bottom(ctx: &mut HandlerCtx<'_>) -> Result<()> {
    ctx.discard_played(Card::DrawBottom)?;
    ctx.resolve_draw(DrawSource::Bottom, "plays Draw from the Bottom and draws the bottom card")
}

fn swap_top_bottom(ctx: &mut HandlerCtx<'_>) -> Result<()> {
    ctx.discard_played(Card::SwapTopBottom)?;
    ctx.state.deck.swap_ends();
    ctx.resolve_draw(DrawSource::Top, "plays Swap Top and Bottom and draws the new top card")
}

fn bury(ctx: &mut HandlerCtx<'_>) -> Result<()> {
    let actor = ctx.actor.clone();
    ctx.discard_played(Card::Bury)?;

    let card = ctx
        .state
        .deck
        .draw_top()
        .ok_or_else(|| EngineError::InvalidAction("the deck is empty".to_string()))?;
    ctx.state.pending_draws = ctx.state.pending_draws.saturating_sub(1);

    if card.is_critical() {
        return ctx.resolve_critical(card, "plays Bury");
    }

    let slot = ctx.random_index(ctx.state.deck.len() + 1);
    ctx.state.deck.insert_at(slot, card);
    ctx.logger
        .action(&actor, format!("{actor} plays Bury and hides the top card in the deck"));

    if ctx.state.pending_draws == 0 {
        ctx.state.advance_turn();
    }
    Ok(())
}
