//! Drawing, critical events and elimination

use crate::core::{Card, PlayerId};
use crate::game::packs::HandlerCtx;
use crate::{EngineError, Result};

/// End of the deck a draw comes from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrawSource {
    Top,
    Bottom,
}

impl HandlerCtx<'_> {
    /// Draw one card for the actor and settle it.
    ///
    /// `how` completes the public line ("draws a card", "draws from the
    /// bottom").
    pub fn resolve_draw(&mut self, source: DrawSource, how: &str) -> Result<()> {
        let card = match source {
            DrawSource::Top => self.state.deck.draw_top(),
            DrawSource::Bottom => self.state.deck.draw_bottom(),
        }
        .ok_or_else(|| EngineError::InvalidAction("the deck is empty".to_string()))?;

        self.state.pending_draws = self.state.pending_draws.saturating_sub(1);

        if card.is_critical() {
            return self.resolve_critical(card, how);
        }

        let actor = self.actor.clone();
        let thief = self
            .state
            .player_mut(&actor)?
            .pending_steal_draw
            .take();

        match thief {
            Some(thief) if self.state.is_alive(&thief) => {
                self.state.player_mut(&thief)?.hand.add(card);
                self.logger
                    .action(&actor, format!("{actor} {how}, but {thief} steals it"));
                self.logger.private(&thief, format!("You stole {card} from {actor}'s draw"));
            }
            _ => {
                self.state.player_mut(&actor)?.hand.add(card);
                self.logger.action(&actor, format!("{actor} {how}"));
                self.logger.private(&actor, format!("You drew {card}"));
            }
        }

        if self.state.pending_draws == 0 {
            self.state.advance_turn();
        }
        Ok(())
    }

    /// The actor drew a critical event: defuse if possible, else eliminate
    pub fn resolve_critical(&mut self, card: Card, how: &str) -> Result<()> {
        let actor = self.actor.clone();
        let player = self.state.player_mut(&actor)?;

        if player.has_card(Card::Neutralizer) {
            player.hand.add(card);
            self.state.pending_defuse = Some(actor.clone());
            self.logger
                .action(&actor, format!("{actor} {how} and reveals a {card}!"));
            return Ok(());
        }

        self.state.discard_pile.push_top(card);
        self.logger.action(
            &actor,
            format!("{actor} {how} and reveals a {card} with no Neutralizer"),
        );
        self.eliminate(&actor)
    }

    /// Remove `player` from the game and pass the turn if it was theirs
    pub fn eliminate(&mut self, player: &PlayerId) -> Result<()> {
        let state = &mut *self.state;
        let seat = state.player_mut(player)?;
        seat.alive = false;
        seat.pending_steal_draw = None;

        for other in state.players.iter_mut() {
            if other.pending_steal_draw.as_ref() == Some(player) {
                other.pending_steal_draw = None;
            }
            other.clear_marks_by(player);
        }
        if state.pending_defuse.as_ref() == Some(player) {
            state.pending_defuse = None;
        }

        self.logger.system(format!("{player} has been eliminated"));

        if self.state.is_current(player) {
            self.state.advance_turn();
        }
        if self.state.is_game_over() {
            let winners = self.state.winners();
            match winners.first() {
                Some(winner) => self.logger.system(format!("Game over: {winner} wins")),
                None => self.logger.system("Game over: nobody survived"),
            }
        }
        Ok(())
    }

    /// Spend the held neutralizer and return the critical event to the deck
    pub fn neutralize(&mut self, position: usize) -> Result<()> {
        let actor = self.actor.clone();
        self.discard_played(Card::Neutralizer)?;
        let (critical, _) = self
            .state
            .player_mut(&actor)?
            .remove_card(Card::Critical)
            .ok_or_else(|| EngineError::MissingCard(Card::Critical.to_string()))?;

        let placed = self.state.deck.insert_at(position, critical);
        self.state.pending_defuse = None;

        self.logger.action(
            &actor,
            format!("{actor} plays a Neutralizer and hides the Critical Event back in the deck"),
        );
        self.logger
            .private(&actor, format!("You placed the Critical Event at position {placed}"));

        self.state.advance_turn();
        Ok(())
    }
}
