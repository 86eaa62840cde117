//! Per-viewer projection of the game state
//!
//! The session layer broadcasts one [`PlayerView`] per participant. Nothing
//! a viewer is not entitled to see survives the projection: opponents' hands
//! and stashes become placeholders, the deck becomes a count, and private log
//! lines are filtered out. The RNG is never part of a view.

use crate::core::{Card, Expansion, MarkedCard, PlayerId, PlayerState};
use crate::game::logger::LogEntry;
use crate::game::state::{PendingAlter, PendingFavor, PlayDirection};
use crate::game::toggle::PendingAction;
use crate::game::GameState;
use crate::zones::Pile;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// A card slot as one viewer sees it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CardView {
    Hidden,
    Known(Card),
}

impl CardView {
    pub fn card(&self) -> Option<Card> {
        match self {
            CardView::Hidden => None,
            CardView::Known(card) => Some(*card),
        }
    }
}

fn reveal(pile: &Pile, visible: bool) -> Vec<CardView> {
    pile.iter()
        .map(|&card| if visible { CardView::Known(card) } else { CardView::Hidden })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerStateView {
    pub player_id: PlayerId,
    pub hand: Vec<CardView>,
    pub alive: bool,
    pub stash: Vec<CardView>,
    /// Only the marks the viewer placed
    pub marked_cards: Vec<MarkedCard>,
    pub pending_steal_draw: Option<PlayerId>,
    pub blind: bool,
}

impl PlayerStateView {
    fn project(player: &PlayerState, viewer: &PlayerId) -> Self {
        let own = &player.player_id == viewer;
        PlayerStateView {
            player_id: player.player_id.clone(),
            hand: reveal(&player.hand, own),
            alive: player.alive,
            stash: reveal(&player.stash, own),
            marked_cards: player
                .marked_cards
                .iter()
                .filter(|m| &m.marked_by == viewer)
                .cloned()
                .collect(),
            pending_steal_draw: player.pending_steal_draw.clone(),
            blind: player.blind,
        }
    }
}

/// Alter in progress; the revealed cards only reach the player reordering them
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PendingAlterView {
    pub player_id: PlayerId,
    pub count: usize,
    pub is_share: bool,
    pub revealed: Option<Vec<Card>>,
}

impl PendingAlterView {
    fn project(alter: &PendingAlter, viewer: &PlayerId) -> Self {
        PendingAlterView {
            player_id: alter.player_id.clone(),
            count: alter.count,
            is_share: alter.is_share,
            revealed: (&alter.player_id == viewer).then(|| alter.revealed.clone()),
        }
    }
}

/// The game state as seen by one player or spectator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerView {
    pub viewer: PlayerId,
    pub deck_count: usize,
    /// Hidden while the viewer is blinded by Blackout
    pub discard_pile: Vec<CardView>,
    pub player_order: Vec<PlayerId>,
    pub current_turn_index: usize,
    pub play_direction: PlayDirection,
    pub pending_draws: u32,
    pub players: Vec<PlayerStateView>,
    pub pending_action: Option<PendingAction>,
    pub pending_favor: Option<PendingFavor>,
    pub pending_alter: Option<PendingAlterView>,
    pub pending_defuse: Option<PlayerId>,
    pub logs: Vec<LogEntry>,
    pub allow_action_card_combos: bool,
    pub expansions: BTreeSet<Expansion>,
}

/// Project `state` for `viewer`. Spectators (unseated ids) see only public data.
pub fn sanitize_state_for_player(state: &GameState, viewer: &PlayerId) -> PlayerView {
    let seated = state.is_seated(viewer);
    let blind = state.player(viewer).map(|p| p.blind).unwrap_or(false);

    PlayerView {
        viewer: viewer.clone(),
        deck_count: state.deck.len(),
        discard_pile: reveal(&state.discard_pile, !blind),
        player_order: state.player_order.clone(),
        current_turn_index: state.current_turn_index,
        play_direction: state.play_direction,
        pending_draws: state.pending_draws,
        players: state
            .players
            .iter()
            .map(|p| PlayerStateView::project(p, viewer))
            .collect(),
        pending_action: state.pending_action.clone(),
        pending_favor: state.pending_favor.clone(),
        pending_alter: state
            .pending_alter
            .as_ref()
            .map(|a| PendingAlterView::project(a, viewer)),
        pending_defuse: state.pending_defuse.clone(),
        logs: state
            .logs
            .iter()
            .filter(|entry| entry.is_visible_to(viewer, seated))
            .cloned()
            .collect(),
        allow_action_card_combos: state.allow_action_card_combos,
        expansions: state.expansions.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Timestamp;
    use crate::game::packs::testing::{pid, table};
    use crate::game::GameLogger;

    fn sample() -> GameState {
        let hands = vec![
            vec![Card::Neutralizer, Card::Lynx],
            vec![Card::Strike, Card::Tabby, Card::Bengal],
        ];
        let mut game = table(2, hands, vec![Card::Critical, Card::Lynx, Card::Evade]);
        game.players[1].stash = vec![Card::Cancel].into();
        game.players[1].mark(2, pid("p1"));
        game.players[0].mark(0, pid("p2"));
        game.discard_pile.push_top(Card::Insight);

        let mut logger = GameLogger::new(0, Timestamp(5));
        logger.action(&pid("p1"), "p1 plays Insight");
        logger.players("Players only");
        logger.private(&pid("p1"), "Top of the deck: Critical Event");
        logger.private(&pid("p2"), "You marked p1's Neutralizer");
        game.logs = logger.into_entries();
        game
    }

    #[test]
    fn test_opponent_cards_hidden() {
        let game = sample();
        let view = sanitize_state_for_player(&game, &pid("p1"));

        assert_eq!(view.deck_count, 3);
        assert_eq!(view.players[0].hand, vec![CardView::Known(Card::Neutralizer), CardView::Known(Card::Lynx)]);
        assert_eq!(view.players[1].hand, vec![CardView::Hidden; 3]);
        assert_eq!(view.players[1].stash, vec![CardView::Hidden]);
        assert_eq!(view.discard_pile, vec![CardView::Known(Card::Insight)]);
    }

    #[test]
    fn test_marks_visible_to_marker_only() {
        let game = sample();
        let view = sanitize_state_for_player(&game, &pid("p1"));
        assert_eq!(view.players[1].marked_cards.len(), 1);
        assert!(view.players[0].marked_cards.is_empty());

        let view = sanitize_state_for_player(&game, &pid("p2"));
        assert!(view.players[1].marked_cards.is_empty());
        assert_eq!(view.players[0].marked_cards[0].card_index, 0);
    }

    #[test]
    fn test_log_scopes() {
        let game = sample();
        let messages = |viewer: &str| -> Vec<String> {
            sanitize_state_for_player(&game, &pid(viewer))
                .logs
                .into_iter()
                .map(|e| e.message)
                .collect()
        };

        assert_eq!(messages("p1"), vec!["p1 plays Insight", "Players only", "Top of the deck: Critical Event"]);
        assert_eq!(messages("p2"), vec!["p1 plays Insight", "Players only", "You marked p1's Neutralizer"]);
        assert_eq!(messages("spectator"), vec!["p1 plays Insight"]);
    }

    #[test]
    fn test_missing_scope_is_public() {
        let mut game = sample();
        for entry in game.logs.iter_mut() {
            entry.scope = None;
        }
        assert_eq!(sanitize_state_for_player(&game, &pid("spectator")).logs.len(), 4);
    }

    #[test]
    fn test_alter_cards_only_for_owner() {
        let mut game = sample();
        game.pending_alter = Some(PendingAlter {
            player_id: pid("p1"),
            count: 2,
            is_share: false,
            revealed: vec![Card::Critical, Card::Lynx],
        });
        let own = sanitize_state_for_player(&game, &pid("p1"));
        assert_eq!(own.pending_alter.unwrap().revealed, Some(vec![Card::Critical, Card::Lynx]));
        let other = sanitize_state_for_player(&game, &pid("p2"));
        assert_eq!(other.pending_alter.unwrap().revealed, None);
    }

    #[test]
    fn test_blind_viewer_loses_discard() {
        let mut game = sample();
        game.players[0].blind = true;
        let view = sanitize_state_for_player(&game, &pid("p1"));
        assert_eq!(view.discard_pile, vec![CardView::Hidden]);
        assert!(view.players[0].blind);
    }

    #[test]
    fn test_view_serializes_without_rng() {
        let view = sanitize_state_for_player(&sample(), &pid("p2"));
        let json = serde_json::to_value(&view).unwrap();
        assert!(json.get("rng").is_none());
        assert!(json.get("deck").is_none());
        assert_eq!(json["players"][0]["hand"][0], "hidden");
        assert_eq!(json["players"][1]["hand"][0], serde_json::json!({"known": "strike"}));
    }
}
