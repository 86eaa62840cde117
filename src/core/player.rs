//! Player representation

use crate::core::{Card, PlayerId};
use crate::zones::Pile;
use serde::{Deserialize, Serialize};

/// Cards a player may keep out of reach in their stash
pub const STASH_LIMIT: usize = 3;

/// A hand slot tagged by another player's Mark
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarkedCard {
    pub card_index: usize,
    pub marked_by: PlayerId,
}

/// Represents a seated player
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerState {
    pub player_id: PlayerId,

    pub hand: Pile,

    /// Still in the game?
    pub alive: bool,

    /// Protected cards, immune to favors, combos and theft
    pub stash: Pile,

    pub marked_cards: Vec<MarkedCard>,

    /// Thief who receives this player's next safe draw
    pub pending_steal_draw: Option<PlayerId>,

    /// Set by Blackout; presentation only
    pub blind: bool,
}

impl PlayerState {
    pub fn new(player_id: PlayerId, hand: Vec<Card>) -> Self {
        PlayerState {
            player_id,
            hand: Pile::from_cards(hand),
            alive: true,
            stash: Pile::new(),
            marked_cards: Vec::new(),
            pending_steal_draw: None,
            blind: false,
        }
    }

    pub fn has_card(&self, card: Card) -> bool {
        self.hand.contains(card)
    }

    /// Cards held in hand and stash
    pub fn card_count(&self) -> usize {
        self.hand.len() + self.stash.len()
    }

    /// Marker of a hand slot, if any
    pub fn marker_of(&self, index: usize) -> Option<&PlayerId> {
        self.marked_cards
            .iter()
            .find(|m| m.card_index == index)
            .map(|m| &m.marked_by)
    }

    /// Hand slots nobody has marked yet
    pub fn unmarked_slots(&self) -> Vec<usize> {
        (0..self.hand.len())
            .filter(|i| self.marker_of(*i).is_none())
            .collect()
    }

    pub fn mark(&mut self, card_index: usize, marked_by: PlayerId) {
        self.marked_cards.push(MarkedCard { card_index, marked_by });
    }

    /// Remove the card at a hand slot.
    ///
    /// Returns the card and the player who had marked that slot. The slot's
    /// mark is dropped and marks above it shift down by one.
    pub fn remove_slot(&mut self, index: usize) -> Option<(Card, Option<PlayerId>)> {
        let card = self.hand.remove_at(index)?;
        let marker = self
            .marked_cards
            .iter()
            .position(|m| m.card_index == index)
            .map(|pos| self.marked_cards.remove(pos).marked_by);
        for mark in self.marked_cards.iter_mut() {
            if mark.card_index > index {
                mark.card_index -= 1;
            }
        }
        Some((card, marker))
    }

    /// Remove the first copy of `card` from hand, see [`PlayerState::remove_slot`]
    pub fn remove_card(&mut self, card: Card) -> Option<(Card, Option<PlayerId>)> {
        let index = self.hand.position(card)?;
        self.remove_slot(index)
    }

    /// Drop every mark placed by `marker`
    pub fn clear_marks_by(&mut self, marker: &PlayerId) {
        self.marked_cards.retain(|m| &m.marked_by != marker);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn player(hand: Vec<Card>) -> PlayerState {
        PlayerState::new(PlayerId::new("p1"), hand)
    }

    #[test]
    fn test_player_creation() {
        let p = player(vec![Card::Neutralizer, Card::Lynx]);
        assert!(p.alive);
        assert_eq!(p.card_count(), 2);
        assert!(p.has_card(Card::Lynx));
        assert!(!p.blind);
        assert_eq!(p.pending_steal_draw, None);
    }

    #[test]
    fn test_remove_marked_slot_reports_marker() {
        let mut p = player(vec![Card::Lynx, Card::Strike, Card::Tabby]);
        p.mark(1, PlayerId::new("p2"));

        let (card, marker) = p.remove_slot(1).unwrap();
        assert_eq!(card, Card::Strike);
        assert_eq!(marker, Some(PlayerId::new("p2")));
        assert!(p.marked_cards.is_empty());
    }

    #[test]
    fn test_marks_above_removed_slot_shift_down() {
        let mut p = player(vec![Card::Lynx, Card::Strike, Card::Tabby, Card::Evade]);
        p.mark(0, PlayerId::new("p2"));
        p.mark(3, PlayerId::new("p3"));

        let (card, marker) = p.remove_slot(1).unwrap();
        assert_eq!(card, Card::Strike);
        assert_eq!(marker, None);
        assert_eq!(p.marker_of(0), Some(&PlayerId::new("p2")));
        assert_eq!(p.marker_of(2), Some(&PlayerId::new("p3")));
        assert_eq!(p.hand.get(2), Some(Card::Evade));
    }

    #[test]
    fn test_unmarked_slots() {
        let mut p = player(vec![Card::Lynx, Card::Strike, Card::Tabby]);
        p.mark(1, PlayerId::new("p2"));
        assert_eq!(p.unmarked_slots(), vec![0, 2]);
        p.clear_marks_by(&PlayerId::new("p2"));
        assert_eq!(p.unmarked_slots(), vec![0, 1, 2]);
    }
}
