//! Card handlers
//!
//! Each pack is a [`CardHandler`] that claims the cards it knows and returns
//! `None` for everything else. The engine walks an ordered list of handlers
//! and the first one to claim a card resolves it, so packs never need to know
//! about each other.

pub mod attack;
pub mod base;
pub mod chaos;
pub mod deity;
pub mod future;
pub mod theft;

use crate::core::{Card, PlayerId};
use crate::game::actions::CardPlay;
use crate::game::{GameLogger, GameState};
use crate::{EngineError, Result};
use rand::Rng;

pub use attack::AttackPack;
pub use base::BaseHandler;
pub use chaos::ChaosPack;
pub use deity::DeityPack;
pub use future::FuturePack;
pub use theft::TheftPack;

/// What a handler may touch while resolving one action
pub struct HandlerCtx<'a> {
    pub state: &'a mut GameState,
    pub actor: PlayerId,
    pub logger: &'a mut GameLogger,
}

impl<'a> HandlerCtx<'a> {
    pub fn new(state: &'a mut GameState, actor: PlayerId, logger: &'a mut GameLogger) -> Self {
        HandlerCtx { state, actor, logger }
    }

    /// Move a played card from the actor's hand to the discard pile.
    ///
    /// A marked slot goes to its marker instead; that transfer gets its own
    /// system line.
    pub fn discard_played(&mut self, card: Card) -> Result<()> {
        let actor = self.actor.clone();
        if let Some(marker) = self.state.discard_from_hand(&actor, card)? {
            self.logger
                .system(format!("{actor}'s {card} was marked and goes to {marker}"));
        }
        Ok(())
    }

    /// Resolve the play's target to a seat index
    pub fn target(&self, play: &CardPlay) -> Result<(PlayerId, usize)> {
        let target = play
            .target
            .clone()
            .ok_or_else(|| EngineError::InvalidTarget(format!("{} needs a target", play.card)))?;
        let index = self
            .state
            .player_index(&target)
            .ok_or_else(|| EngineError::PlayerNotFound(target.to_string()))?;
        Ok((target, index))
    }

    /// Uniform index in `0..len`. `len` must be non-zero.
    pub fn random_index(&mut self, len: usize) -> usize {
        self.state.rng.gen_range(0..len)
    }
}

/// A strategy in the card dispatch chain
pub trait CardHandler {
    fn name(&self) -> &'static str;

    /// Resolve `play` if this handler owns the card, `None` otherwise
    fn try_handle(&self, ctx: &mut HandlerCtx<'_>, play: &CardPlay) -> Option<Result<()>>;
}

/// Dispatch order: expansion packs first, base game last
pub fn default_handlers() -> Vec<Box<dyn CardHandler>> {
    vec![
        Box::new(AttackPack),
        Box::new(FuturePack),
        Box::new(TheftPack),
        Box::new(ChaosPack),
        Box::new(DeityPack),
        Box::new(BaseHandler),
    ]
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use crate::core::Timestamp;
    use rand::SeedableRng;
    use rand_chacha::ChaCha12Rng;

    /// Table of `n` players named p1..pn with the given hands and deck
    pub fn table(n: usize, hands: Vec<Vec<Card>>, deck: Vec<Card>) -> GameState {
        let ids: Vec<PlayerId> = (1..=n).map(|i| PlayerId::new(format!("p{i}"))).collect();
        GameState::new(&ids, hands, deck, ChaCha12Rng::seed_from_u64(42))
    }

    pub fn pid(s: &str) -> PlayerId {
        PlayerId::new(s)
    }

    /// Run `handler` for `actor`, returning the outcome and the logs written
    pub fn run(
        handler: &dyn CardHandler,
        state: &mut GameState,
        actor: &str,
        play: CardPlay,
    ) -> (Option<Result<()>>, GameLogger) {
        let mut logger = GameLogger::new(0, Timestamp(0));
        let outcome = {
            let mut ctx = HandlerCtx::new(state, pid(actor), &mut logger);
            handler.try_handle(&mut ctx, &play)
        };
        (outcome, logger)
    }

    #[test]
    fn test_handlers_claim_disjoint_cards() {
        use crate::core::CardCategory;
        let handlers = default_handlers();
        let playable = [
            Card::Strike,
            Card::Evade,
            Card::Trade,
            Card::Reorder,
            Card::Insight,
            Card::TargetedAttack,
            Card::PersonalAttack,
            Card::AttackOfTheDead,
            Card::SuperSkip,
            Card::Reverse,
            Card::AlterFuture,
            Card::ShareFuture,
            Card::DrawBottom,
            Card::SwapTopBottom,
            Card::Bury,
            Card::Mark,
            Card::StealDraw,
            Card::Stash,
            Card::Fission,
            Card::Tribute,
            Card::Blackout,
            Card::Omniscience,
            Card::Miracle,
            Card::Smite,
            Card::Rapture,
        ];
        for card in playable {
            assert!(card.is_playable_alone());
            let deck = vec![Card::Lynx; 6];
            let hands = vec![
                vec![card, Card::Lynx, Card::Tabby, Card::Lynx],
                vec![Card::Tabby, Card::Bengal],
                vec![Card::Calico],
            ];
            let claims = handlers
                .iter()
                .filter(|h| {
                    let mut state = table(3, hands.clone(), deck.clone());
                    let play = CardPlay {
                        card,
                        target: Some(pid("p2")),
                        cards: vec![Card::Tabby],
                    };
                    run(h.as_ref(), &mut state, "p1", play).0.is_some()
                })
                .count();
            assert_eq!(claims, 1, "{card} claimed by {claims} handlers");
            let expected_base = card.category() == CardCategory::BaseAction;
            assert_eq!(card.expansion().is_none(), expected_base);
        }
    }
}
