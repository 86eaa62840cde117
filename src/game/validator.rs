//! Action eligibility and legal-move enumeration
//!
//! `validate` is the only gate between a player's request and the state
//! machine. It never mutates; every rejection carries the reason as an
//! [`EngineError`].

use crate::core::{Card, PlayerId, STASH_LIMIT};
use crate::game::actions::{
    Action, ActionName, AlterCommit, CardPlay, ComboPlay, Defuse, FavorGift, Unstash,
};
use crate::game::combo::{classify, tally, ComboKind};
use crate::game::packs::future::is_permutation;
use crate::game::GameState;
use crate::zones::Pile;
use crate::{EngineError, Result};
use smallvec::{smallvec, SmallVec};

/// Does `hand` hold every card of `cards`, counting duplicates?
pub fn holds_all(hand: &Pile, cards: &[Card]) -> bool {
    tally(cards)
        .into_iter()
        .all(|(card, needed)| hand.count(card) >= needed)
}

/// Check whether `actor` may perform `action` in `state`
pub fn validate(state: &GameState, actor: &PlayerId, action: &Action) -> Result<()> {
    if state.is_game_over() {
        return Err(EngineError::GameOver);
    }
    let player = state.player(actor)?;
    if !player.alive {
        return Err(EngineError::InvalidAction(format!("{actor} has been eliminated")));
    }

    check_gates(state, actor, action)?;

    let anytime = matches!(action, Action::PlayCancel | Action::GiveFavor(_));
    if !anytime && !state.is_current(actor) {
        return Err(EngineError::NotYourTurn);
    }

    match action {
        Action::DrawCard => check_draw(state),
        Action::PlayCard(play) => check_card_play(state, actor, play),
        Action::PlayCancel => {
            if !player.has_card(Card::Cancel) {
                return Err(EngineError::MissingCard(Card::Cancel.to_string()));
            }
            if state.pending_action.is_none() {
                return Err(EngineError::InvalidAction("there is nothing to cancel".to_string()));
            }
            Ok(())
        }
        Action::PlayNeutralizer(_) => {
            if state.pending_defuse.as_ref() != Some(actor) {
                return Err(EngineError::InvalidAction("there is nothing to neutralize".to_string()));
            }
            if !player.has_card(Card::Neutralizer) {
                return Err(EngineError::MissingCard(Card::Neutralizer.to_string()));
            }
            Ok(())
        }
        Action::GiveFavor(_) => match &state.pending_favor {
            Some(favor) if &favor.target == actor => Ok(()),
            Some(_) => Err(EngineError::InvalidAction("the favor is not yours to give".to_string())),
            None => Err(EngineError::InvalidAction("no favor is pending".to_string())),
        },
        Action::PlayCombo(combo) => check_combo(state, actor, combo),
        Action::CommitAlterFuture(commit) => {
            let alter = match &state.pending_alter {
                Some(alter) if &alter.player_id == actor => alter,
                _ => return Err(EngineError::InvalidAction("no alter is pending".to_string())),
            };
            if commit.order.len() != alter.count || !is_permutation(&commit.order, &alter.revealed) {
                return Err(EngineError::InvalidPayload(
                    "the new order must rearrange exactly the revealed cards".to_string(),
                ));
            }
            Ok(())
        }
        Action::UnstashCard(unstash) => {
            if !player.stash.contains(unstash.card) {
                return Err(EngineError::MissingCard(format!("{} is not in the stash", unstash.card)));
            }
            Ok(())
        }
    }
}

/// Outstanding defuse, alter or favor resolutions block everything else
fn check_gates(state: &GameState, actor: &PlayerId, action: &Action) -> Result<()> {
    if let Some(defuser) = &state.pending_defuse {
        return match action {
            Action::PlayNeutralizer(_) if defuser == actor => Ok(()),
            _ => Err(EngineError::Gated(format!("{defuser} must neutralize a critical event"))),
        };
    }
    if let Some(alter) = &state.pending_alter {
        return match action {
            Action::CommitAlterFuture(_) if &alter.player_id == actor => Ok(()),
            _ => Err(EngineError::Gated(format!(
                "{} must put the top of the deck back",
                alter.player_id
            ))),
        };
    }
    if let Some(favor) = &state.pending_favor {
        return match action {
            Action::GiveFavor(_) if &favor.target == actor => Ok(()),
            Action::PlayCancel => Ok(()),
            _ => Err(EngineError::Gated(format!(
                "{} must give {} a card",
                favor.target, favor.requester
            ))),
        };
    }
    match action {
        Action::PlayNeutralizer(_) => Err(EngineError::InvalidAction("there is nothing to neutralize".to_string())),
        Action::CommitAlterFuture(_) => Err(EngineError::InvalidAction("no alter is pending".to_string())),
        Action::GiveFavor(_) => Err(EngineError::InvalidAction("no favor is pending".to_string())),
        _ => Ok(()),
    }
}

fn check_draw(state: &GameState) -> Result<()> {
    if state.pending_draws == 0 {
        return Err(EngineError::InvalidAction("no draws are owed".to_string()));
    }
    if state.deck.is_empty() {
        return Err(EngineError::InvalidAction("the deck is empty".to_string()));
    }
    Ok(())
}

/// Target seated, alive and not the actor
fn check_target<'a>(state: &GameState, actor: &PlayerId, target: Option<&'a PlayerId>) -> Result<&'a PlayerId> {
    let target = target.ok_or_else(|| EngineError::InvalidTarget("a target is required".to_string()))?;
    if !state.is_seated(target) {
        return Err(EngineError::PlayerNotFound(target.to_string()));
    }
    if target == actor {
        return Err(EngineError::InvalidTarget("you cannot target yourself".to_string()));
    }
    if !state.is_alive(target) {
        return Err(EngineError::InvalidTarget(format!("{target} has been eliminated")));
    }
    Ok(target)
}

fn check_card_play(state: &GameState, actor: &PlayerId, play: &CardPlay) -> Result<()> {
    let card = play.card;
    if !card.is_playable_alone() {
        return Err(EngineError::InvalidAction(format!("{card} cannot be played on its own")));
    }
    let player = state.player(actor)?;
    if !player.has_card(card) {
        return Err(EngineError::MissingCard(card.to_string()));
    }
    if card.needs_pending_draws() && state.pending_draws == 0 {
        return Err(EngineError::InvalidAction(format!("{card} needs a draw to skip")));
    }

    if card.needs_target() {
        let target = check_target(state, actor, play.target.as_ref())?;
        let victim = state.player(target)?;
        match card {
            Card::Trade if victim.hand.is_empty() => {
                return Err(EngineError::InvalidTarget(format!("{target} has no cards")));
            }
            Card::Mark if victim.unmarked_slots().is_empty() => {
                return Err(EngineError::InvalidTarget(format!("{target} has no card left to mark")));
            }
            _ => {}
        }
    }

    match card {
        Card::DrawBottom | Card::SwapTopBottom | Card::Bury if state.deck.is_empty() => {
            Err(EngineError::InvalidAction("the deck is empty".to_string()))
        }
        Card::Stash => {
            if play.cards.is_empty() {
                return Err(EngineError::InvalidPayload("choose at least one card to stash".to_string()));
            }
            if player.stash.len() + play.cards.len() > STASH_LIMIT {
                return Err(EngineError::InvalidAction(format!(
                    "the stash holds at most {STASH_LIMIT} cards"
                )));
            }
            let mut needed = play.cards.clone();
            needed.push(Card::Stash);
            if !holds_all(&player.hand, &needed) {
                return Err(EngineError::MissingCard("cards to stash".to_string()));
            }
            Ok(())
        }
        _ => Ok(()),
    }
}

fn check_combo(state: &GameState, actor: &PlayerId, combo: &ComboPlay) -> Result<()> {
    let kind = classify(&combo.cards, state.allow_action_card_combos)?;
    if combo.requested.is_some_and(|c| c.is_critical()) {
        return Err(EngineError::InvalidPayload("a critical event cannot be requested".to_string()));
    }
    if !holds_all(&state.player(actor)?.hand, &combo.cards) {
        return Err(EngineError::MissingCard("combo cards".to_string()));
    }

    if kind.needs_target() {
        let target = check_target(state, actor, combo.target.as_ref())?;
        if state.player(target)?.hand.is_empty() {
            return Err(EngineError::InvalidTarget(format!("{target} has no cards")));
        }
    }
    match kind {
        ComboKind::Pair => {}
        ComboKind::Trio => {
            if combo.requested.is_none() {
                return Err(EngineError::InvalidPayload("a trio must name the card it asks for".to_string()));
            }
        }
        ComboKind::FiveDistinct => {
            let requested = combo.requested.ok_or_else(|| {
                EngineError::InvalidPayload("name a card to take from the discard pile".to_string())
            })?;
            if !state.discard_pile.contains(requested) {
                return Err(EngineError::MissingCard(format!("{requested} is not in the discard pile")));
            }
        }
    }
    Ok(())
}

/// Candidate actions for `player`, one representative per distinct move
fn candidates(state: &GameState, player: &PlayerId) -> Vec<Action> {
    let Ok(seat) = state.player(player) else {
        return Vec::new();
    };
    let others: Vec<PlayerId> = state
        .alive_players()
        .filter(|p| &p.player_id != player)
        .map(|p| p.player_id.clone())
        .collect();

    let mut actions = vec![
        Action::DrawCard,
        Action::PlayCancel,
        Action::PlayNeutralizer(Defuse::default()),
        Action::GiveFavor(FavorGift::default()),
    ];

    if let Some(alter) = &state.pending_alter {
        actions.push(Action::CommitAlterFuture(AlterCommit {
            order: alter.revealed.clone(),
        }));
    }

    let mut held: Vec<Card> = seat.hand.iter().copied().collect();
    held.sort();
    held.dedup();

    for &card in held.iter().filter(|c| c.is_playable_alone()) {
        if card.needs_target() {
            actions.extend(others.iter().map(|t| Action::PlayCard(CardPlay::at(card, t.clone()))));
        } else if card == Card::Stash {
            if let Some(&other) = seat.hand.iter().find(|&&c| c != Card::Stash) {
                actions.push(Action::PlayCard(CardPlay {
                    card,
                    target: None,
                    cards: vec![other],
                }));
            }
        } else {
            actions.push(Action::PlayCard(CardPlay::new(card)));
        }
    }

    let holds_wildcard = seat.has_card(Card::Wildcard);
    for &card in held.iter().filter(|c| !c.is_wildcard()) {
        let count = seat.hand.count(card);
        let mut shapes: Vec<SmallVec<[Card; 5]>> = Vec::new();
        if count >= 2 {
            shapes.push(smallvec![card; 2]);
        } else if holds_wildcard {
            shapes.push(smallvec![card, Card::Wildcard]);
        }
        if count >= 3 {
            shapes.push(smallvec![card; 3]);
        }
        for cards in shapes {
            let requested = (cards.len() >= 3).then_some(Card::Neutralizer);
            for target in &others {
                actions.push(Action::PlayCombo(ComboPlay {
                    cards: cards.clone(),
                    target: Some(target.clone()),
                    card_index: None,
                    requested,
                }));
            }
        }
    }

    if state.allow_action_card_combos {
        let mixed: SmallVec<[Card; 5]> = held.iter().copied().filter(Card::is_action).take(3).collect();
        if mixed.len() == 3 {
            for target in &others {
                actions.push(Action::PlayCombo(ComboPlay {
                    cards: mixed.clone(),
                    target: Some(target.clone()),
                    card_index: None,
                    requested: Some(Card::Neutralizer),
                }));
            }
        }
    }

    let distinct: SmallVec<[Card; 5]> = held.iter().copied().filter(|c| !c.is_critical()).take(5).collect();
    if distinct.len() == 5 {
        if let Some(&requested) = state.discard_pile.iter().find(|c| !c.is_critical()) {
            actions.push(Action::PlayCombo(ComboPlay {
                cards: distinct,
                target: None,
                card_index: None,
                requested: Some(requested),
            }));
        }
    }

    let mut stashed: Vec<Card> = seat.stash.iter().copied().collect();
    stashed.sort();
    stashed.dedup();
    actions.extend(stashed.into_iter().map(|card| Action::UnstashCard(Unstash { card })));

    actions
}

/// Every action `player` could submit right now, with representative payloads
pub fn legal_actions(state: &GameState, player: &PlayerId) -> Vec<Action> {
    candidates(state, player)
        .into_iter()
        .filter(|action| validate(state, player, action).is_ok())
        .collect()
}

/// Names of the actions `player` may currently take, in canonical order
pub fn available_action_names(state: &GameState, player: &PlayerId) -> Vec<ActionName> {
    let legal = legal_actions(state, player);
    ActionName::ALL
        .into_iter()
        .filter(|name| legal.iter().any(|a| a.name() == *name))
        .collect()
}
