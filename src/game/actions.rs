//! Player actions and their wire payloads
//!
//! The session layer submits an action name plus a JSON payload. Both are
//! parsed into a typed [`Action`] before anything is validated.

use crate::core::{Card, PlayerId, Timestamp};
use crate::{EngineError, Result};
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::fmt;
use std::str::FromStr;

/// Names of the actions a player can submit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionName {
    DrawCard,
    PlayCard,
    PlayCancel,
    PlayNeutralizer,
    GiveFavor,
    PlayCombo,
    CommitAlterFuture,
    UnstashCard,
}

impl ActionName {
    pub const ALL: [ActionName; 8] = [
        ActionName::DrawCard,
        ActionName::PlayCard,
        ActionName::PlayCancel,
        ActionName::PlayNeutralizer,
        ActionName::GiveFavor,
        ActionName::PlayCombo,
        ActionName::CommitAlterFuture,
        ActionName::UnstashCard,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ActionName::DrawCard => "draw_card",
            ActionName::PlayCard => "play_card",
            ActionName::PlayCancel => "play_cancel",
            ActionName::PlayNeutralizer => "play_neutralizer",
            ActionName::GiveFavor => "give_favor",
            ActionName::PlayCombo => "play_combo",
            ActionName::CommitAlterFuture => "commit_alter_future",
            ActionName::UnstashCard => "unstash_card",
        }
    }
}

impl fmt::Display for ActionName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ActionName {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self> {
        ActionName::ALL
            .iter()
            .copied()
            .find(|name| name.as_str() == s)
            .ok_or_else(|| EngineError::UnknownAction(s.to_string()))
    }
}

/// Who is acting, and when. Only `user_id` and `timestamp` are read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionContext {
    pub user_id: PlayerId,
    #[serde(default)]
    pub room_id: Option<String>,
    #[serde(default)]
    pub session_id: Option<String>,
    #[serde(default)]
    pub timestamp: Timestamp,
}

impl ActionContext {
    pub fn new(user_id: impl Into<PlayerId>, timestamp: Timestamp) -> Self {
        ActionContext {
            user_id: user_id.into(),
            room_id: None,
            session_id: None,
            timestamp,
        }
    }
}

/// Payload of `play_card`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardPlay {
    pub card: Card,
    #[serde(default)]
    pub target: Option<PlayerId>,
    /// Cards moved by Stash
    #[serde(default)]
    pub cards: Vec<Card>,
}

impl CardPlay {
    pub fn new(card: Card) -> Self {
        CardPlay {
            card,
            target: None,
            cards: Vec::new(),
        }
    }

    pub fn at(card: Card, target: impl Into<PlayerId>) -> Self {
        CardPlay {
            card,
            target: Some(target.into()),
            cards: Vec::new(),
        }
    }
}

/// Payload of `play_combo`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComboPlay {
    pub cards: SmallVec<[Card; 5]>,
    #[serde(default)]
    pub target: Option<PlayerId>,
    /// Pair: hand slot to steal (clamped)
    #[serde(default)]
    pub card_index: Option<usize>,
    /// Trio: card named from the target's hand. Five-distinct: card taken from the discard pile.
    #[serde(default)]
    pub requested: Option<Card>,
}

/// Payload of `play_neutralizer`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Defuse {
    /// Deck index for the critical event, clamped to the deck size
    #[serde(default)]
    pub position: usize,
}

/// Payload of `give_favor`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FavorGift {
    #[serde(default)]
    pub card_index: usize,
}

/// Payload of `commit_alter_future`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlterCommit {
    /// New order of the revealed cards, top first
    pub order: Vec<Card>,
}

/// Payload of `unstash_card`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Unstash {
    pub card: Card,
}

/// A parsed player action
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    DrawCard,
    PlayCard(CardPlay),
    PlayCancel,
    PlayNeutralizer(Defuse),
    GiveFavor(FavorGift),
    PlayCombo(ComboPlay),
    CommitAlterFuture(AlterCommit),
    UnstashCard(Unstash),
}

fn payload<T: serde::de::DeserializeOwned>(name: ActionName, value: serde_json::Value) -> Result<T> {
    serde_json::from_value(value).map_err(|e| EngineError::InvalidPayload(format!("{name}: {e}")))
}

impl Action {
    /// Parse an action name and its JSON payload
    pub fn parse(name: &str, value: serde_json::Value) -> Result<Action> {
        let name: ActionName = name.parse()?;
        let value = if value.is_null() {
            serde_json::Value::Object(Default::default())
        } else {
            value
        };

        Ok(match name {
            ActionName::DrawCard => Action::DrawCard,
            ActionName::PlayCancel => Action::PlayCancel,
            ActionName::PlayCard => Action::PlayCard(payload(name, value)?),
            ActionName::PlayNeutralizer => Action::PlayNeutralizer(payload(name, value)?),
            ActionName::GiveFavor => Action::GiveFavor(payload(name, value)?),
            ActionName::PlayCombo => Action::PlayCombo(payload(name, value)?),
            ActionName::CommitAlterFuture => Action::CommitAlterFuture(payload(name, value)?),
            ActionName::UnstashCard => Action::UnstashCard(payload(name, value)?),
        })
    }

    pub fn name(&self) -> ActionName {
        match self {
            Action::DrawCard => ActionName::DrawCard,
            Action::PlayCard(_) => ActionName::PlayCard,
            Action::PlayCancel => ActionName::PlayCancel,
            Action::PlayNeutralizer(_) => ActionName::PlayNeutralizer,
            Action::GiveFavor(_) => ActionName::GiveFavor,
            Action::PlayCombo(_) => ActionName::PlayCombo,
            Action::CommitAlterFuture(_) => ActionName::CommitAlterFuture,
            Action::UnstashCard(_) => ActionName::UnstashCard,
        }
    }

    /// Payload as JSON, the inverse of [`Action::parse`]
    pub fn payload(&self) -> serde_json::Value {
        let value = match self {
            Action::DrawCard | Action::PlayCancel => Ok(serde_json::json!({})),
            Action::PlayCard(p) => serde_json::to_value(p),
            Action::PlayNeutralizer(p) => serde_json::to_value(p),
            Action::GiveFavor(p) => serde_json::to_value(p),
            Action::PlayCombo(p) => serde_json::to_value(p),
            Action::CommitAlterFuture(p) => serde_json::to_value(p),
            Action::UnstashCard(p) => serde_json::to_value(p),
        };
        value.unwrap_or(serde_json::Value::Null)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_action_names() {
        for name in ActionName::ALL {
            assert_eq!(name.as_str().parse::<ActionName>().unwrap(), name);
        }
        assert_eq!(
            "launch_rocket".parse::<ActionName>(),
            Err(EngineError::UnknownAction("launch_rocket".to_string()))
        );
    }

    #[test]
    fn test_parse_play_card() {
        let action = Action::parse("play_card", json!({ "card": "targeted_attack", "target": "p2" })).unwrap();
        assert_eq!(action, Action::PlayCard(CardPlay::at(Card::TargetedAttack, "p2")));
        assert_eq!(action.name(), ActionName::PlayCard);
    }

    #[test]
    fn test_parse_unit_actions_ignore_payload() {
        assert_eq!(Action::parse("draw_card", serde_json::Value::Null).unwrap(), Action::DrawCard);
        assert_eq!(Action::parse("play_cancel", json!({ "x": 1 })).unwrap(), Action::PlayCancel);
    }

    #[test]
    fn test_parse_defaults() {
        let action = Action::parse("play_neutralizer", json!({})).unwrap();
        assert_eq!(action, Action::PlayNeutralizer(Defuse { position: 0 }));
    }

    #[test]
    fn test_parse_combo() {
        let action = Action::parse(
            "play_combo",
            json!({ "cards": ["lynx", "lynx", "lynx"], "target": "p2", "requested": "neutralizer" }),
        )
        .unwrap();
        match action {
            Action::PlayCombo(combo) => {
                assert_eq!(combo.cards.len(), 3);
                assert_eq!(combo.requested, Some(Card::Neutralizer));
                assert_eq!(combo.card_index, None);
            }
            other => panic!("unexpected action {other:?}"),
        }
    }

    #[test]
    fn test_bad_payload() {
        let err = Action::parse("play_card", json!({ "card": "not_a_card" })).unwrap_err();
        assert!(matches!(err, EngineError::InvalidPayload(_)));
        let err = Action::parse("commit_alter_future", json!({})).unwrap_err();
        assert!(matches!(err, EngineError::InvalidPayload(_)));
    }

    #[test]
    fn test_payload_round_trip() {
        let action = Action::UnstashCard(Unstash { card: Card::Neutralizer });
        let parsed = Action::parse(action.name().as_str(), action.payload()).unwrap();
        assert_eq!(parsed, action);
    }
}
