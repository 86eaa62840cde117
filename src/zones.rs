//! Card containers (deck, discard pile, hands, stashes)
//!
//! Every container is an ordered pile where index 0 is the top. Hands use
//! the same type because hand slots are addressed by index (marks, favors,
//! pair steals).

use crate::core::Card;
use serde::{Deserialize, Serialize};

/// Ordered sequence of cards, index 0 = top
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Pile {
    cards: Vec<Card>,
}

impl Pile {
    pub fn new() -> Self {
        Pile { cards: Vec::new() }
    }

    pub fn from_cards(cards: Vec<Card>) -> Self {
        Pile { cards }
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Card> {
        self.cards.iter()
    }

    pub fn get(&self, index: usize) -> Option<Card> {
        self.cards.get(index).copied()
    }

    pub fn contains(&self, card: Card) -> bool {
        self.cards.contains(&card)
    }

    pub fn count(&self, card: Card) -> usize {
        self.cards.iter().filter(|&&c| c == card).count()
    }

    /// Index of the first copy of `card`
    pub fn position(&self, card: Card) -> Option<usize> {
        self.cards.iter().position(|&c| c == card)
    }

    /// Add to the end (hands and stashes grow at the end)
    pub fn add(&mut self, card: Card) {
        self.cards.push(card);
    }

    /// Place on top (index 0)
    pub fn push_top(&mut self, card: Card) {
        self.cards.insert(0, card);
    }

    /// Insert at `index`, clamped to `0..=len`. Returns the index used.
    pub fn insert_at(&mut self, index: usize, card: Card) -> usize {
        let index = index.min(self.cards.len());
        self.cards.insert(index, card);
        index
    }

    pub fn draw_top(&mut self) -> Option<Card> {
        if self.cards.is_empty() {
            None
        } else {
            Some(self.cards.remove(0))
        }
    }

    pub fn draw_bottom(&mut self) -> Option<Card> {
        self.cards.pop()
    }

    pub fn peek_top(&self, n: usize) -> &[Card] {
        &self.cards[..n.min(self.cards.len())]
    }

    /// Remove the card at `index`. Order of the remaining cards is preserved.
    pub fn remove_at(&mut self, index: usize) -> Option<Card> {
        if index < self.cards.len() {
            Some(self.cards.remove(index))
        } else {
            None
        }
    }

    /// Remove the first copy of `card`
    pub fn take(&mut self, card: Card) -> Option<Card> {
        let pos = self.position(card)?;
        self.remove_at(pos)
    }

    /// Swap the top and bottom cards. No-op below two cards.
    pub fn swap_ends(&mut self) {
        let len = self.cards.len();
        if len >= 2 {
            self.cards.swap(0, len - 1);
        }
    }

    /// Replace the top `order.len()` cards with `order`
    pub fn replace_top(&mut self, order: &[Card]) {
        let n = order.len().min(self.cards.len());
        self.cards.splice(0..n, order.iter().copied());
    }

    /// Remove every card matching `pred`, returning them in pile order
    pub fn extract(&mut self, pred: impl Fn(Card) -> bool) -> Vec<Card> {
        let (taken, kept): (Vec<Card>, Vec<Card>) = self.cards.iter().partition(|&&c| pred(c));
        self.cards = kept;
        taken
    }

    /// Put `cards` on top, keeping their order
    pub fn prepend(&mut self, cards: Vec<Card>) {
        self.cards.splice(0..0, cards);
    }

    pub fn shuffle(&mut self, rng: &mut impl rand::Rng) {
        use rand::seq::SliceRandom;
        self.cards.shuffle(rng);
    }
}

impl From<Vec<Card>> for Pile {
    fn from(cards: Vec<Card>) -> Self {
        Pile::from_cards(cards)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha12Rng;

    #[test]
    fn test_top_and_bottom() {
        let mut deck = Pile::from_cards(vec![Card::Strike, Card::Evade, Card::Critical]);

        assert_eq!(deck.peek_top(2), &[Card::Strike, Card::Evade]);
        assert_eq!(deck.draw_top(), Some(Card::Strike));
        assert_eq!(deck.draw_bottom(), Some(Card::Critical));
        assert_eq!(deck.len(), 1);
        assert_eq!(deck.draw_top(), Some(Card::Evade));
        assert!(deck.is_empty());
        assert_eq!(deck.draw_top(), None);
        assert_eq!(deck.draw_bottom(), None);
    }

    #[test]
    fn test_insert_is_clamped() {
        let mut deck = Pile::from_cards(vec![Card::Lynx, Card::Tabby]);
        assert_eq!(deck.insert_at(99, Card::Critical), 2);
        assert_eq!(deck.cards(), &[Card::Lynx, Card::Tabby, Card::Critical]);
        assert_eq!(deck.insert_at(0, Card::Neutralizer), 0);
        assert_eq!(deck.get(0), Some(Card::Neutralizer));
    }

    #[test]
    fn test_take_and_remove() {
        let mut hand = Pile::from_cards(vec![Card::Lynx, Card::Strike, Card::Lynx]);
        assert_eq!(hand.count(Card::Lynx), 2);
        assert_eq!(hand.take(Card::Lynx), Some(Card::Lynx));
        assert_eq!(hand.cards(), &[Card::Strike, Card::Lynx]);
        assert_eq!(hand.take(Card::Bengal), None);
        assert_eq!(hand.remove_at(5), None);
        assert_eq!(hand.remove_at(1), Some(Card::Lynx));
    }

    #[test]
    fn test_swap_and_replace() {
        let mut deck = Pile::from_cards(vec![Card::Strike, Card::Evade, Card::Trade, Card::Critical]);
        deck.swap_ends();
        assert_eq!(deck.cards(), &[Card::Critical, Card::Evade, Card::Trade, Card::Strike]);

        deck.replace_top(&[Card::Trade, Card::Critical, Card::Evade]);
        assert_eq!(deck.cards(), &[Card::Trade, Card::Critical, Card::Evade, Card::Strike]);
    }

    #[test]
    fn test_extract_and_prepend() {
        let mut deck = Pile::from_cards(vec![Card::Strike, Card::Critical, Card::Evade, Card::Critical]);
        let criticals = deck.extract(|c| c.is_critical());
        assert_eq!(criticals, vec![Card::Critical, Card::Critical]);
        assert_eq!(deck.cards(), &[Card::Strike, Card::Evade]);

        deck.prepend(criticals);
        assert_eq!(deck.cards(), &[Card::Critical, Card::Critical, Card::Strike, Card::Evade]);
    }

    #[test]
    fn test_shuffle_is_seeded() {
        let cards: Vec<Card> = Card::COLLECTION.iter().copied().cycle().take(20).collect();
        let mut a = Pile::from_cards(cards.clone());
        let mut b = Pile::from_cards(cards);
        a.shuffle(&mut ChaCha12Rng::seed_from_u64(7));
        b.shuffle(&mut ChaCha12Rng::seed_from_u64(7));
        assert_eq!(a, b);
        assert_eq!(a.len(), 20);
    }
}
