//! Game log entries and the per-action log sink
//!
//! Every accepted action appends entries to the session log. Entries carry a
//! visibility scope so the sanitizer can hide private reveals (peeks, stolen
//! cards) from everybody except the player they were meant for.

use crate::core::{PlayerId, Timestamp};
use serde::{Deserialize, Serialize};

/// What produced a log line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogKind {
    /// Engine bookkeeping (eliminations, turn changes, no-ops)
    System,
    /// A player's action
    Action,
    /// Free text addressed to a player
    Message,
}

/// Who may read a log line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogScope {
    #[default]
    All,
    /// Seated participants only (spectators excluded)
    Players,
    /// Only `sender_id`
    Private,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntry {
    pub id: String,
    pub kind: LogKind,
    pub message: String,
    pub created_at: Timestamp,
    /// Missing scope is treated as `all`
    #[serde(default)]
    pub scope: Option<LogScope>,
    pub sender_id: Option<PlayerId>,
}

impl LogEntry {
    /// Can `viewer` read this entry? `seated` is whether the viewer holds a seat.
    pub fn is_visible_to(&self, viewer: &PlayerId, seated: bool) -> bool {
        match self.scope.unwrap_or_default() {
            LogScope::All => true,
            LogScope::Players => seated,
            LogScope::Private => self.sender_id.as_ref() == Some(viewer),
        }
    }
}

/// Output verbosity for printed logs
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub enum VerbosityLevel {
    /// Silent - no output during game
    Silent = 0,
    /// Minimal - only system lines (eliminations, game outcome)
    Minimal = 1,
    /// Normal - every public line (default)
    #[default]
    Normal = 2,
    /// Verbose - private lines too (omniscient observer)
    Verbose = 3,
}

impl VerbosityLevel {
    /// Lowest verbosity at which `entry` is printed
    pub fn required_for(entry: &LogEntry) -> VerbosityLevel {
        match (entry.scope.unwrap_or_default(), entry.kind) {
            (LogScope::Private, _) => VerbosityLevel::Verbose,
            (_, LogKind::System) => VerbosityLevel::Minimal,
            _ => VerbosityLevel::Normal,
        }
    }
}

/// Collects the entries produced while resolving one action
///
/// Ids continue the session counter so they stay unique across actions.
#[derive(Debug, Clone)]
pub struct GameLogger {
    next_id: u64,
    created_at: Timestamp,
    entries: Vec<LogEntry>,
}

impl GameLogger {
    pub fn new(next_id: u64, created_at: Timestamp) -> Self {
        GameLogger {
            next_id,
            created_at,
            entries: Vec::new(),
        }
    }

    fn push(&mut self, kind: LogKind, scope: LogScope, sender_id: Option<PlayerId>, message: String) {
        let id = format!("log-{}", self.next_id);
        self.next_id += 1;
        self.entries.push(LogEntry {
            id,
            kind,
            message,
            created_at: self.created_at,
            scope: Some(scope),
            sender_id,
        });
    }

    /// Public line describing a player's action
    pub fn action(&mut self, actor: &PlayerId, message: impl Into<String>) {
        self.push(LogKind::Action, LogScope::All, Some(actor.clone()), message.into());
    }

    /// Public engine line
    pub fn system(&mut self, message: impl Into<String>) {
        self.push(LogKind::System, LogScope::All, None, message.into());
    }

    /// Line for seated players only
    pub fn players(&mut self, message: impl Into<String>) {
        self.push(LogKind::System, LogScope::Players, None, message.into());
    }

    /// Line only `viewer` may read
    pub fn private(&mut self, viewer: &PlayerId, message: impl Into<String>) {
        self.push(LogKind::Message, LogScope::Private, Some(viewer.clone()), message.into());
    }

    pub fn entries(&self) -> &[LogEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Next unused id, to be stored back in the session
    pub fn next_id(&self) -> u64 {
        self.next_id
    }

    pub fn into_entries(self) -> Vec<LogEntry> {
        self.entries
    }
}

/// Print entries allowed by `verbosity` to stdout
pub fn print_entries(entries: &[LogEntry], verbosity: VerbosityLevel) {
    for entry in entries {
        let required = VerbosityLevel::required_for(entry);
        if required > verbosity || verbosity == VerbosityLevel::Silent {
            continue;
        }
        match (entry.scope.unwrap_or_default(), &entry.sender_id) {
            (LogScope::Private, Some(viewer)) => println!("  [to {viewer}] {}", entry.message),
            _ if required == VerbosityLevel::Minimal => println!("{}", entry.message),
            _ => println!("  {}", entry.message),
        }
    }
}
