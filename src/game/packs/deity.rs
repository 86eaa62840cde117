//! Deity pack: Omniscience, Miracle, Smite, Rapture

use super::{CardHandler, HandlerCtx};
use crate::core::{describe_cards, Card};
use crate::game::actions::CardPlay;
use crate::Result;

/// Draws Smite forces on its target
const SMITE_DRAWS: u32 = 3;

pub struct DeityPack;

impl CardHandler for DeityPack {
    fn name(&self) -> &'static str {
        "deity"
    }

    fn try_handle(&self, ctx: &mut HandlerCtx<'_>, play: &CardPlay) -> Option<Result<()>> {
        let result = match play.card {
            Card::Omniscience => omniscience(ctx),
            Card::Miracle => miracle(ctx),
            Card::Smite => smite(ctx, play),
            Card::Rapture => rapture(ctx),
            _ => return None,
        };
        Some(result)
    }
}

fn omniscience(ctx: &mut HandlerCtx<'_>) -> Result<()> {
    let actor = ctx.actor.clone();
    ctx.discard_played(Card::Omniscience)?;

    let seen: Vec<String> = ctx
        .state
        .alive_players()
        .filter(|p| p.player_id != actor)
        .map(|p| format!("{}: {}", p.player_id, describe_cards(p.hand.cards())))
        .collect();

    ctx.logger
        .action(&actor, format!("{actor} plays Omniscience and sees every hand"));
    ctx.logger.private(&actor, seen.join("; "));
    Ok(())
}

fn miracle(ctx: &mut HandlerCtx<'_>) -> Result<()> {
    let actor = ctx.actor.clone();
    ctx.discard_played(Card::Miracle)?;
    ctx.state.player_mut(&actor)?.hand.add(Card::Neutralizer);
    ctx.logger
        .action(&actor, format!("{actor} plays Miracle and gains a Neutralizer"));
    Ok(())
}

fn smite(ctx: &mut HandlerCtx<'_>, play: &CardPlay) -> Result<()> {
    let actor = ctx.actor.clone();
    let (target, index) = ctx.target(play)?;
    ctx.discard_played(Card::Smite)?;
    ctx.state.pending_draws = 0;
    ctx.state.redirect_turn(index, SMITE_DRAWS);
    ctx.logger.action(
        &actor,
        format!("{actor} plays Smite on {target}: {target} must draw {SMITE_DRAWS}"),
    );
    Ok(())
}

fn rapture(ctx: &mut HandlerCtx<'_>) -> Result<()> {
    let actor = ctx.actor.clone();
    ctx.discard_played(Card::Rapture)?;

    let victims: Vec<_> = ctx
        .state
        .alive_players()
        .filter(|p| p.player_id != actor && !p.hand.is_empty())
        .map(|p| p.player_id.clone())
        .collect();

    let mut taken = Vec::with_capacity(victims.len());
    for victim in &victims {
        let len = ctx.state.player(victim)?.hand.len();
        let slot = ctx.random_index(len);
        let card = ctx.state.transfer_slot(victim, slot, &actor)?;
        ctx.logger
            .private(victim, format!("{actor} took your {card} with Rapture"));
        taken.push(card);
    }

    ctx.logger.action(
        &actor,
        format!("{actor} plays Rapture and takes a card from {} players", victims.len()),
    );
    ctx.logger
        .private(&actor, format!("Rapture brought you {}", describe_cards(&taken)));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::packs::testing::{pid, run, table};
    use crate::game::LogScope;

    #[test]
    fn test_omniscience_reveals_privately() {
        let hands = vec![vec![Card::Omniscience], vec![Card::Lynx], vec![Card::Tabby, Card::Bengal]];
        let mut game = table(3, hands, vec![]);
        let (_, logger) = run(&DeityPack, &mut game, "p1", CardPlay::new(Card::Omniscience));
        let private = &logger.entries()[1];
        assert_eq!(private.scope, Some(LogScope::Private));
        assert_eq!(private.sender_id, Some(pid("p1")));
        assert_eq!(private.message, "p2: Lynx; p3: Tabby, Bengal");
    }

    #[test]
    fn test_miracle_grants_neutralizer() {
        let mut game = table(2, vec![vec![Card::Miracle], vec![]], vec![]);
        let total = game.total_cards();
        run(&DeityPack, &mut game, "p1", CardPlay::new(Card::Miracle)).0.unwrap().unwrap();
        assert_eq!(game.player(&pid("p1")).unwrap().hand.cards(), &[Card::Neutralizer]);
        assert_eq!(game.total_cards(), total + 1);
    }

    #[test]
    fn test_smite_hands_turn_to_target() {
        let mut game = table(3, vec![vec![Card::Smite], vec![], vec![]], vec![]);
        game.pending_draws = 2;
        run(&DeityPack, &mut game, "p1", CardPlay::at(Card::Smite, "p3")).0.unwrap().unwrap();
        assert_eq!(game.current_turn_index, 2);
        assert_eq!(game.pending_draws, 3);
    }

    #[test]
    fn test_rapture_takes_from_each_opponent() {
        let hands = vec![
            vec![Card::Rapture],
            vec![Card::Lynx],
            vec![],
            vec![Card::Tabby, Card::Tabby],
        ];
        let mut game = table(4, hands, vec![]);
        let (_, logger) = run(&DeityPack, &mut game, "p1", CardPlay::new(Card::Rapture));

        let p1 = game.player(&pid("p1")).unwrap();
        assert_eq!(p1.hand.len(), 2);
        assert!(p1.has_card(Card::Lynx));
        assert!(p1.has_card(Card::Tabby));
        assert_eq!(game.player(&pid("p4")).unwrap().hand.len(), 1);
        assert_eq!(logger.len(), 4);
    }
}
