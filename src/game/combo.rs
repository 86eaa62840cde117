//! Combo plays: pairs, trios and five-distinct sets

use crate::core::{describe_cards, Card, PlayerId};
use crate::game::actions::ComboPlay;
use crate::game::packs::HandlerCtx;
use crate::{EngineError, Result};
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::fmt;

/// Shape of a combo, decided by its cards
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComboKind {
    /// Two of a kind: steal a card by hand slot
    Pair,
    /// Three or more of a kind: name a card and take it if the target has one
    Trio,
    /// Five different cards: take any card from the discard pile
    FiveDistinct,
}

impl ComboKind {
    /// Pair and trio take from another player
    pub fn needs_target(&self) -> bool {
        !matches!(self, ComboKind::FiveDistinct)
    }
}

impl fmt::Display for ComboKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ComboKind::Pair => "pair",
            ComboKind::Trio => "trio",
            ComboKind::FiveDistinct => "five-card set",
        };
        write!(f, "{name}")
    }
}

/// Occurrences of each card
pub fn tally(cards: &[Card]) -> FxHashMap<Card, usize> {
    let mut counts = FxHashMap::default();
    for &card in cards {
        *counts.entry(card).or_insert(0) += 1;
    }
    counts
}

/// Can this card stand in a same-kind combo?
fn combinable(card: Card, allow_action_card_combos: bool) -> bool {
    if card.is_collection() {
        return true;
    }
    allow_action_card_combos && card.is_action()
}

/// Work out which combo `cards` form, if any.
///
/// Five different cards make a five-card set. Otherwise the cards must be
/// one kind, wildcards filling in: two make a pair, three or more a trio.
/// With action card combos allowed, three or more action cards of any
/// kinds also make a trio.
pub fn classify(cards: &[Card], allow_action_card_combos: bool) -> Result<ComboKind> {
    if cards.iter().any(|c| c.is_critical()) {
        return Err(EngineError::InvalidAction(
            "critical events cannot be part of a combo".to_string(),
        ));
    }
    if cards.len() == 5 && tally(cards).len() == 5 {
        return Ok(ComboKind::FiveDistinct);
    }

    let kind = match cards.len() {
        2 => ComboKind::Pair,
        n if n >= 3 => ComboKind::Trio,
        n => return Err(EngineError::InvalidAction(format!("{n} cards do not form a combo"))),
    };

    let real: SmallVec<[Card; 5]> = cards.iter().copied().filter(|c| !c.is_wildcard()).collect();
    let Some(&first) = real.first() else {
        return Err(EngineError::InvalidAction(
            "a combo needs at least one non-wildcard card".to_string(),
        ));
    };

    if real.iter().all(|&c| c == first) {
        if !combinable(first, allow_action_card_combos) {
            return Err(EngineError::InvalidAction(format!(
                "{first} cannot be played as a combo"
            )));
        }
        return Ok(kind);
    }

    if kind == ComboKind::Trio && allow_action_card_combos && real.iter().all(Card::is_action) {
        return Ok(ComboKind::Trio);
    }
    Err(EngineError::InvalidAction(format!(
        "{} is not a combo of one kind",
        describe_cards(cards)
    )))
}

impl HandlerCtx<'_> {
    /// Discard the combo cards and resolve its effect
    pub fn play_combo(&mut self, combo: &ComboPlay) -> Result<ComboKind> {
        let actor = self.actor.clone();
        let kind = classify(&combo.cards, self.state.allow_action_card_combos)?;

        if kind == ComboKind::FiveDistinct {
            let requested = combo.requested.ok_or_else(|| {
                EngineError::InvalidPayload("name a card to take from the discard pile".to_string())
            })?;
            if !self.state.discard_pile.contains(requested) {
                return Err(EngineError::MissingCard(format!(
                    "{requested} is not in the discard pile"
                )));
            }
        }

        for &card in &combo.cards {
            self.discard_played(card)?;
        }

        match kind {
            ComboKind::Pair => self.resolve_pair(&actor, combo)?,
            ComboKind::Trio => self.resolve_trio(&actor, combo)?,
            ComboKind::FiveDistinct => self.resolve_five(&actor, combo)?,
        }
        Ok(kind)
    }

    fn combo_target(&self, combo: &ComboPlay) -> Result<PlayerId> {
        let target = combo
            .target
            .clone()
            .ok_or_else(|| EngineError::InvalidTarget("a combo needs a target".to_string()))?;
        if !self.state.is_seated(&target) {
            return Err(EngineError::PlayerNotFound(target.to_string()));
        }
        Ok(target)
    }

    fn resolve_pair(&mut self, actor: &PlayerId, combo: &ComboPlay) -> Result<()> {
        let target = self.combo_target(combo)?;
        let len = self.state.player(&target)?.hand.len();
        if len == 0 {
            return Err(EngineError::InvalidTarget(format!("{target} has no cards")));
        }
        let slot = match combo.card_index {
            Some(index) => index.min(len - 1),
            None => self.random_index(len),
        };
        let card = self.state.transfer_slot(&target, slot, actor)?;

        self.logger
            .action(actor, format!("{actor} plays a pair and takes a card from {target}"));
        self.logger.private(actor, format!("You took {card} from {target}"));
        self.logger.private(&target, format!("{actor} took your {card}"));
        Ok(())
    }

    fn resolve_trio(&mut self, actor: &PlayerId, combo: &ComboPlay) -> Result<()> {
        let target = self.combo_target(combo)?;
        let requested = combo.requested.ok_or_else(|| {
            EngineError::InvalidPayload("a trio must name the card it asks for".to_string())
        })?;

        match self.state.player_mut(&target)?.remove_card(requested) {
            Some((card, _)) => {
                self.state.player_mut(actor)?.hand.add(card);
                self.logger.action(
                    actor,
                    format!("{actor} plays a trio and takes {card} from {target}"),
                );
            }
            None => {
                self.logger.action(
                    actor,
                    format!("{actor} plays a trio asking for {requested}, but {target} has none"),
                );
            }
        }
        Ok(())
    }

    fn resolve_five(&mut self, actor: &PlayerId, combo: &ComboPlay) -> Result<()> {
        let requested = combo.requested.ok_or_else(|| {
            EngineError::InvalidPayload("name a card to take from the discard pile".to_string())
        })?;
        let card = self
            .state
            .discard_pile
            .take(requested)
            .ok_or_else(|| EngineError::MissingCard(format!("{requested} is not in the discard pile")))?;
        self.state.player_mut(actor)?.hand.add(card);
        self.logger.action(
            actor,
            format!("{actor} plays five different cards and takes {card} from the discard pile"),
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Timestamp;
    use crate::game::packs::testing::{pid, table};
    use crate::game::{GameLogger, GameState};
    use smallvec::smallvec;

    fn combo(cards: &[Card], target: Option<&str>) -> ComboPlay {
        ComboPlay {
            cards: cards.iter().copied().collect(),
            target: target.map(pid),
            card_index: None,
            requested: None,
        }
    }

    fn play(game: &mut GameState, actor: &str, combo: &ComboPlay) -> Result<ComboKind> {
        let mut logger = GameLogger::new(0, Timestamp(0));
        HandlerCtx::new(game, pid(actor), &mut logger).play_combo(combo)
    }

    #[test]
    fn test_classify() {
        assert_eq!(classify(&[Card::Lynx, Card::Lynx], false), Ok(ComboKind::Pair));
        assert_eq!(classify(&[Card::Lynx, Card::Wildcard], false), Ok(ComboKind::Pair));
        assert_eq!(
            classify(&[Card::Tabby, Card::Tabby, Card::Wildcard, Card::Tabby], false),
            Ok(ComboKind::Trio)
        );
        let five = [Card::Lynx, Card::Tabby, Card::Strike, Card::Bengal, Card::Wildcard];
        assert_eq!(classify(&five, false), Ok(ComboKind::FiveDistinct));

        assert!(classify(&[Card::Lynx, Card::Tabby], false).is_err());
        assert!(classify(&[Card::Wildcard, Card::Wildcard], false).is_err());
        assert!(classify(&[Card::Lynx], false).is_err());
        assert!(classify(&[Card::Critical, Card::Critical], true).is_err());
    }

    #[test]
    fn test_action_combos_need_flag() {
        assert!(classify(&[Card::Strike, Card::Strike], false).is_err());
        assert_eq!(classify(&[Card::Strike, Card::Strike], true), Ok(ComboKind::Pair));
        assert!(classify(&[Card::Neutralizer, Card::Neutralizer], true).is_err());
    }

    #[test]
    fn test_five_of_a_kind_is_a_trio() {
        assert_eq!(classify(&[Card::Lynx; 5], false), Ok(ComboKind::Trio));
        assert_eq!(classify(&[Card::Calico; 6], false), Ok(ComboKind::Trio));
        let with_wildcards = [Card::Sphynx, Card::Wildcard, Card::Sphynx, Card::Wildcard, Card::Sphynx];
        assert_eq!(classify(&with_wildcards, false), Ok(ComboKind::Trio));
    }

    #[test]
    fn test_mixed_action_trio() {
        let mixed = [Card::Strike, Card::Evade, Card::Trade];
        assert_eq!(classify(&mixed, true), Ok(ComboKind::Trio));
        assert!(classify(&mixed, false).is_err());
        assert_eq!(
            classify(&[Card::Fission, Card::Strike, Card::Wildcard, Card::Mark], true),
            Ok(ComboKind::Trio)
        );

        assert!(classify(&[Card::Strike, Card::Evade], true).is_err());
        assert!(classify(&[Card::Strike, Card::Evade, Card::Neutralizer], true).is_err());
        assert!(classify(&[Card::Strike, Card::Evade, Card::Lynx], true).is_err());
    }

    #[test]
    fn test_mixed_action_trio_takes_named_card() {
        let hands = vec![
            vec![Card::Strike, Card::Evade, Card::Reorder],
            vec![Card::Neutralizer, Card::Lynx],
        ];
        let mut game = table(2, hands, vec![]);
        game.allow_action_card_combos = true;
        let mut trio = combo(&[Card::Strike, Card::Evade, Card::Reorder], Some("p2"));
        trio.requested = Some(Card::Lynx);

        assert_eq!(play(&mut game, "p1", &trio), Ok(ComboKind::Trio));
        assert_eq!(game.player(&pid("p1")).unwrap().hand.cards(), &[Card::Lynx]);
        assert_eq!(game.discard_pile.len(), 3);
    }

    #[test]
    fn test_pair_steals_clamped_slot() {
        let hands = vec![vec![Card::Lynx, Card::Lynx], vec![Card::Tabby, Card::Neutralizer]];
        let mut game = table(2, hands, vec![]);
        let mut pair = combo(&[Card::Lynx, Card::Lynx], Some("p2"));
        pair.card_index = Some(99);

        assert_eq!(play(&mut game, "p1", &pair), Ok(ComboKind::Pair));
        assert_eq!(game.player(&pid("p1")).unwrap().hand.cards(), &[Card::Neutralizer]);
        assert_eq!(game.player(&pid("p2")).unwrap().hand.cards(), &[Card::Tabby]);
        assert_eq!(game.discard_pile.count(Card::Lynx), 2);
    }

    #[test]
    fn test_trio_named_card() {
        let hands = vec![vec![Card::Bengal; 3], vec![Card::Tabby, Card::Neutralizer]];
        let mut game = table(2, hands, vec![]);
        let mut trio = combo(&[Card::Bengal; 3], Some("p2"));
        trio.requested = Some(Card::Neutralizer);

        play(&mut game, "p1", &trio).unwrap();
        assert_eq!(game.player(&pid("p1")).unwrap().hand.cards(), &[Card::Neutralizer]);
    }

    #[test]
    fn test_trio_miss_spends_the_cards() {
        let hands = vec![vec![Card::Bengal; 3], vec![Card::Tabby]];
        let mut game = table(2, hands, vec![]);
        let mut trio = combo(&[Card::Bengal; 3], Some("p2"));
        trio.requested = Some(Card::Neutralizer);

        let mut logger = GameLogger::new(0, Timestamp(0));
        HandlerCtx::new(&mut game, pid("p1"), &mut logger)
            .play_combo(&trio)
            .unwrap();
        assert!(game.player(&pid("p1")).unwrap().hand.is_empty());
        assert_eq!(game.discard_pile.len(), 3);
        assert!(logger.entries()[0].message.contains("has none"));
    }

    #[test]
    fn test_five_distinct_takes_from_discard() {
        let five = [Card::Lynx, Card::Tabby, Card::Sphynx, Card::Calico, Card::Bengal];
        let mut game = table(2, vec![five.to_vec(), vec![]], vec![]);
        game.discard_pile.push_top(Card::Neutralizer);

        let mut set = ComboPlay {
            cards: smallvec![Card::Lynx, Card::Tabby, Card::Sphynx, Card::Calico, Card::Bengal],
            target: None,
            card_index: None,
            requested: Some(Card::Lynx),
        };
        assert!(play(&mut game, "p1", &set).is_err());
        assert_eq!(game.player(&pid("p1")).unwrap().hand.len(), 5);

        set.requested = Some(Card::Neutralizer);
        assert_eq!(play(&mut game, "p1", &set), Ok(ComboKind::FiveDistinct));
        assert_eq!(game.player(&pid("p1")).unwrap().hand.cards(), &[Card::Neutralizer]);
        assert_eq!(game.discard_pile.len(), 5);
    }
}
