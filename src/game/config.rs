//! Session configuration

use crate::core::{Card, Expansion};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Options recognised by [`crate::initialize_state`]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Enabled expansion packs
    pub expansions: BTreeSet<Expansion>,

    /// Let identical action cards form pairs and trios
    pub allow_action_card_combos: bool,

    /// Absolute per-card counts replacing the computed ones
    pub custom_cards: BTreeMap<Card, usize>,

    /// RNG seed; `None` draws one from the OS
    pub seed: Option<u64>,
}

impl GameConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_expansion(mut self, expansion: Expansion) -> Self {
        self.expansions.insert(expansion);
        self
    }

    pub fn with_expansions(mut self, expansions: impl IntoIterator<Item = Expansion>) -> Self {
        self.expansions.extend(expansions);
        self
    }

    pub fn with_action_card_combos(mut self, allow: bool) -> Self {
        self.allow_action_card_combos = allow;
        self
    }

    pub fn with_custom_count(mut self, card: Card, count: usize) -> Self {
        self.custom_cards.insert(card, count);
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_from_json() {
        let json = r#"{
            "expansions": ["attack", "theft"],
            "allow_action_card_combos": true,
            "custom_cards": { "critical": 3, "strike": 0 }
        }"#;
        let config: GameConfig = serde_json::from_str(json).unwrap();

        assert!(config.expansions.contains(&Expansion::Attack));
        assert!(config.expansions.contains(&Expansion::Theft));
        assert_eq!(config.expansions.len(), 2);
        assert!(config.allow_action_card_combos);
        assert_eq!(config.custom_cards.get(&Card::Critical), Some(&3));
        assert_eq!(config.custom_cards.get(&Card::Strike), Some(&0));
        assert_eq!(config.seed, None);
    }

    #[test]
    fn test_empty_config_defaults() {
        let config: GameConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, GameConfig::default());
    }

    #[test]
    fn test_builder() {
        let config = GameConfig::new()
            .with_expansion(Expansion::Deity)
            .with_custom_count(Card::Neutralizer, 6)
            .with_seed(9);
        assert!(config.expansions.contains(&Expansion::Deity));
        assert_eq!(config.custom_cards[&Card::Neutralizer], 6);
        assert_eq!(config.seed, Some(9));
    }
}
