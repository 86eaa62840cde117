//! Card kinds and categories
//!
//! Cards carry no per-instance state, so a card is just its kind. Two cards
//! of the same kind are interchangeable everywhere in the rules.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Optional rule packs layered on the base game
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Expansion {
    Attack,
    Future,
    Theft,
    Chaos,
    Deity,
}

impl Expansion {
    pub const ALL: [Expansion; 5] = [
        Expansion::Attack,
        Expansion::Future,
        Expansion::Theft,
        Expansion::Chaos,
        Expansion::Deity,
    ];
}

impl fmt::Display for Expansion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Expansion::Attack => "attack",
            Expansion::Future => "future",
            Expansion::Theft => "theft",
            Expansion::Chaos => "chaos",
            Expansion::Deity => "deity",
        };
        write!(f, "{name}")
    }
}

/// Rules category of a card
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CardCategory {
    /// The bomb: neutralize it or leave the game
    CriticalEvent,
    Neutralizer,
    BaseAction,
    PackAction(Expansion),
    Collection,
    Wildcard,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Card {
    Critical,
    Neutralizer,

    // Base actions
    Cancel,
    Strike,
    Evade,
    Trade,
    Reorder,
    Insight,

    // Collection cards
    Lynx,
    Tabby,
    Sphynx,
    Calico,
    Bengal,

    // Attack pack
    TargetedAttack,
    PersonalAttack,
    AttackOfTheDead,
    SuperSkip,
    Reverse,

    // Future pack
    AlterFuture,
    ShareFuture,
    DrawBottom,
    SwapTopBottom,
    Bury,

    // Theft pack
    Mark,
    StealDraw,
    Stash,

    // Chaos pack
    Fission,
    Tribute,
    Blackout,
    Wildcard,

    // Deity pack
    Omniscience,
    Miracle,
    Smite,
    Rapture,
}

impl Card {
    pub const COLLECTION: [Card; 5] = [Card::Lynx, Card::Tabby, Card::Sphynx, Card::Calico, Card::Bengal];

    pub fn category(&self) -> CardCategory {
        use Card::*;
        match self {
            Critical => CardCategory::CriticalEvent,
            Neutralizer => CardCategory::Neutralizer,
            Cancel | Strike | Evade | Trade | Reorder | Insight => CardCategory::BaseAction,
            Lynx | Tabby | Sphynx | Calico | Bengal => CardCategory::Collection,
            Wildcard => CardCategory::Wildcard,
            TargetedAttack | PersonalAttack | AttackOfTheDead | SuperSkip | Reverse => {
                CardCategory::PackAction(Expansion::Attack)
            }
            AlterFuture | ShareFuture | DrawBottom | SwapTopBottom | Bury => {
                CardCategory::PackAction(Expansion::Future)
            }
            Mark | StealDraw | Stash => CardCategory::PackAction(Expansion::Theft),
            Fission | Tribute | Blackout => CardCategory::PackAction(Expansion::Chaos),
            Omniscience | Miracle | Smite | Rapture => CardCategory::PackAction(Expansion::Deity),
        }
    }

    /// Pack that ships this card, `None` for the base set
    pub fn expansion(&self) -> Option<Expansion> {
        match self {
            Card::Wildcard => Some(Expansion::Chaos),
            _ => match self.category() {
                CardCategory::PackAction(pack) => Some(pack),
                _ => None,
            },
        }
    }

    pub fn is_critical(&self) -> bool {
        self.category() == CardCategory::CriticalEvent
    }

    pub fn is_collection(&self) -> bool {
        self.category() == CardCategory::Collection
    }

    pub fn is_wildcard(&self) -> bool {
        self.category() == CardCategory::Wildcard
    }

    /// Base or pack action card, Cancel included
    pub fn is_action(&self) -> bool {
        matches!(self.category(), CardCategory::BaseAction | CardCategory::PackAction(_))
    }

    /// Cards whose play consumes or ends the current draw obligation
    pub fn needs_pending_draws(&self) -> bool {
        use Card::*;
        matches!(
            self,
            Strike
                | Evade
                | TargetedAttack
                | PersonalAttack
                | AttackOfTheDead
                | SuperSkip
                | Reverse
                | DrawBottom
                | SwapTopBottom
                | Bury
                | Fission
                | Smite
        )
    }

    /// Cards that name another player as their target
    pub fn needs_target(&self) -> bool {
        use Card::*;
        matches!(self, Trade | TargetedAttack | Mark | StealDraw | Blackout | Smite)
    }

    /// Cards with a standalone effect for `play_card`
    pub fn is_playable_alone(&self) -> bool {
        match self.category() {
            CardCategory::BaseAction => *self != Card::Cancel,
            CardCategory::PackAction(_) => true,
            _ => false,
        }
    }

    pub fn name(&self) -> &'static str {
        use Card::*;
        match self {
            Critical => "Critical Event",
            Neutralizer => "Neutralizer",
            Cancel => "Cancel",
            Strike => "Strike",
            Evade => "Evade",
            Trade => "Trade",
            Reorder => "Reorder",
            Insight => "Insight",
            Lynx => "Lynx",
            Tabby => "Tabby",
            Sphynx => "Sphynx",
            Calico => "Calico",
            Bengal => "Bengal",
            TargetedAttack => "Targeted Attack",
            PersonalAttack => "Personal Attack",
            AttackOfTheDead => "Attack of the Dead",
            SuperSkip => "Super Skip",
            Reverse => "Reverse",
            AlterFuture => "Alter the Future",
            ShareFuture => "Share the Future",
            DrawBottom => "Draw from the Bottom",
            SwapTopBottom => "Swap Top and Bottom",
            Bury => "Bury",
            Mark => "Mark",
            StealDraw => "Steal Draw",
            Stash => "Stash",
            Fission => "Fission",
            Tribute => "Tribute",
            Blackout => "Blackout",
            Wildcard => "Wildcard",
            Omniscience => "Omniscience",
            Miracle => "Miracle",
            Smite => "Smite",
            Rapture => "Rapture",
        }
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Render a card list for log messages
pub fn describe_cards(cards: &[Card]) -> String {
    if cards.is_empty() {
        return "nothing".to_string();
    }
    cards.iter().map(Card::name).collect::<Vec<_>>().join(", ")
}
