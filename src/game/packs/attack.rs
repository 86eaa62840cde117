//! Attack pack: Targeted Attack, Personal Attack, Attack of the Dead,
//! Super Skip, Reverse

use super::{CardHandler, HandlerCtx};
use crate::core::Card;
use crate::game::actions::CardPlay;
use crate::game::toggle::{PendingAction, PendingKind};
use crate::Result;

/// Draws forced per eliminated player by Attack of the Dead
const DRAWS_PER_DEAD: u32 = 3;

const PERSONAL_ATTACK_DRAWS: u32 = 3;

pub struct AttackPack;

impl CardHandler for AttackPack {
    fn name(&self) -> &'static str {
        "attack"
    }

    fn try_handle(&self, ctx: &mut HandlerCtx<'_>, play: &CardPlay) -> Option<Result<()>> {
        let result = match play.card {
            Card::TargetedAttack => targeted_attack(ctx, play),
            Card::PersonalAttack => personal_attack(ctx),
            Card::AttackOfTheDead => attack_of_the_dead(ctx),
            Card::SuperSkip => super_skip(ctx),
            Card::Reverse => reverse(ctx),
            _ => return None,
        };
        Some(result)
    }
}

fn targeted_attack(ctx: &mut HandlerCtx<'_>, play: &CardPlay) -> Result<()> {
    let actor = ctx.actor.clone();
    let (target, _) = ctx.target(play)?;
    ctx.discard_played(Card::TargetedAttack)?;
    let action = PendingAction::capture(ctx.state, PendingKind::TargetedAttack, &actor, Some(target.clone()));
    ctx.state.apply_pending(action);
    ctx.logger.action(
        &actor,
        format!(
            "{actor} plays Targeted Attack on {target}: {target} must draw {}",
            ctx.state.pending_draws
        ),
    );
    Ok(())
}

fn personal_attack(ctx: &mut HandlerCtx<'_>) -> Result<()> {
    let actor = ctx.actor.clone();
    ctx.discard_played(Card::PersonalAttack)?;
    ctx.state.pending_draws = PERSONAL_ATTACK_DRAWS;
    ctx.logger.action(
        &actor,
        format!("{actor} plays Personal Attack and must draw {PERSONAL_ATTACK_DRAWS}"),
    );
    Ok(())
}

fn attack_of_the_dead(ctx: &mut HandlerCtx<'_>) -> Result<()> {
    let actor = ctx.actor.clone();
    ctx.discard_played(Card::AttackOfTheDead)?;
    let draws = (ctx.state.dead_count() as u32 * DRAWS_PER_DEAD).max(1);
    ctx.state.advance_turn();
    ctx.state.pending_draws = draws;

    let victim = ctx.state.current_player_id().clone();
    ctx.logger.action(
        &actor,
        format!("{actor} plays Attack of the Dead: {victim} must draw {draws}"),
    );
    Ok(())
}

fn super_skip(ctx: &mut HandlerCtx<'_>) -> Result<()> {
    let actor = ctx.actor.clone();
    ctx.discard_played(Card::SuperSkip)?;
    ctx.state.pending_draws = 0;
    ctx.state.advance_turn();
    ctx.logger
        .action(&actor, format!("{actor} plays Super Skip and ends their turn"));
    Ok(())
}

fn reverse(ctx: &mut HandlerCtx<'_>) -> Result<()> {
    let actor = ctx.actor.clone();
    ctx.discard_played(Card::Reverse)?;
    ctx.state.play_direction = ctx.state.play_direction.reversed();
    ctx.state.advance_turn();
    ctx.logger
        .action(&actor, format!("{actor} plays Reverse: play direction flips"));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::packs::testing::{pid, run, table};
    use crate::game::PlayDirection;

    #[test]
    fn test_targeted_attack_redirects() {
        let mut game = table(4, vec![vec![Card::TargetedAttack], vec![], vec![], vec![]], vec![]);
        let (result, logger) = run(&AttackPack, &mut game, "p1", CardPlay::at(Card::TargetedAttack, "p3"));
        result.unwrap().unwrap();

        assert_eq!(game.current_turn_index, 2);
        assert_eq!(game.pending_draws, 2);
        assert_eq!(game.pending_action.as_ref().unwrap().kind, PendingKind::TargetedAttack);
        assert_eq!(logger.len(), 1);
    }

    #[test]
    fn test_targeted_attack_carries_extra_turns() {
        let mut game = table(3, vec![vec![Card::TargetedAttack], vec![], vec![]], vec![]);
        game.pending_draws = 3;
        run(&AttackPack, &mut game, "p1", CardPlay::at(Card::TargetedAttack, "p2")).0.unwrap().unwrap();
        assert_eq!(game.pending_draws, 5);
    }

    #[test]
    fn test_personal_attack_keeps_turn() {
        let mut game = table(2, vec![vec![Card::PersonalAttack], vec![]], vec![]);
        run(&AttackPack, &mut game, "p1", CardPlay::new(Card::PersonalAttack)).0.unwrap().unwrap();
        assert_eq!(game.current_turn_index, 0);
        assert_eq!(game.pending_draws, 3);
    }

    #[test]
    fn test_attack_of_the_dead_counts_the_dead() {
        let mut game = table(4, vec![vec![Card::AttackOfTheDead, Card::AttackOfTheDead], vec![], vec![], vec![]], vec![]);
        run(&AttackPack, &mut game, "p1", CardPlay::new(Card::AttackOfTheDead)).0.unwrap().unwrap();
        assert_eq!(game.current_turn_index, 1);
        assert_eq!(game.pending_draws, 1);

        let mut game = table(4, vec![vec![Card::AttackOfTheDead], vec![], vec![], vec![]], vec![]);
        game.players[2].alive = false;
        game.players[3].alive = false;
        run(&AttackPack, &mut game, "p1", CardPlay::new(Card::AttackOfTheDead)).0.unwrap().unwrap();
        assert_eq!(game.current_turn_index, 1);
        assert_eq!(game.pending_draws, 6);
    }

    #[test]
    fn test_super_skip_clears_all_draws() {
        let mut game = table(2, vec![vec![Card::SuperSkip], vec![]], vec![]);
        game.pending_draws = 4;
        run(&AttackPack, &mut game, "p1", CardPlay::new(Card::SuperSkip)).0.unwrap().unwrap();
        assert_eq!(game.current_turn_index, 1);
        assert_eq!(game.pending_draws, 1);
    }

    #[test]
    fn test_reverse_uses_new_direction() {
        let mut game = table(4, vec![vec![Card::Reverse], vec![], vec![], vec![]], vec![]);
        run(&AttackPack, &mut game, "p1", CardPlay::new(Card::Reverse)).0.unwrap().unwrap();
        assert_eq!(game.play_direction, PlayDirection::Backward);
        assert_eq!(game.current_player_id(), &pid("p4"));
        assert_eq!(game.pending_draws, 1);
    }
}
