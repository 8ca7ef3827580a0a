//! Battle session
//!
//! One session hosts consecutive matches for the same set of connections:
//! - `lobby`: admission, start, departure, end-and-reset
//! - `turn`: action collection, completion, resolution, advancement
//!
//! Every operation is synchronous and returns the broadcasts it produced,
//! in order. Callers serialize access (see `crate::arena`).

mod lobby;
mod turn;

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::catalog::{Archetype, Catalog};
use crate::combat::{BonusSource, Participant, SubmittedAction};

pub use turn::{ActionRequest, TurnState};

/// Largest roster a session accepts
pub const MAX_PARTICIPANTS: usize = 6;

/// Smallest roster a match can start with
pub const MIN_PARTICIPANTS: usize = 2;

/// Session lifecycle phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Lobby,
    InProgress,
    Ended,
}

/// Messages broadcast to every joined participant
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Broadcast {
    LobbyUpdate(Vec<LobbyEntry>),
    GameStart,
    PlayersInfo(Vec<ParticipantView>),
    PlayersUpdate(Vec<ParticipantView>),
    StartTurn(u32),
    TurnResult(Vec<String>),
    /// Winner name, or `None` for a draw
    GameEnd(Option<String>),
}

/// Roster entry shown in the lobby
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LobbyEntry {
    pub name: String,
    pub archetype: Archetype,
}

/// Full participant state as published to clients and the operator
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParticipantView {
    pub name: String,
    pub archetype: Archetype,
    pub priority: u8,
    pub hp: i32,
    pub max_hp: i32,
    pub mp: i32,
    pub max_mp: i32,
    pub alive: bool,
    /// Rendered as `name(turns)` joined by `;`, or `none`
    pub effects: String,
}

impl From<&Participant> for ParticipantView {
    fn from(p: &Participant) -> Self {
        Self {
            name: p.name.clone(),
            archetype: p.archetype,
            priority: p.priority,
            hp: p.hp,
            max_hp: p.max_hp,
            mp: p.mp,
            max_mp: p.max_mp,
            alive: p.alive,
            effects: p.effects.to_string(),
        }
    }
}

/// Operator-facing snapshot of the session
#[derive(Debug, Clone, Serialize)]
pub struct SessionSnapshot {
    pub phase: Phase,
    pub turn: u32,
    pub participants: Vec<ParticipantView>,
    pub pending_actions: usize,
    pub matches_played: u64,
    pub started_at: Option<DateTime<Utc>>,
}

/// Session state: roster, phase, and the active turn
pub struct Session {
    phase: Phase,
    roster: Vec<Participant>,
    turn: u32,
    turn_state: TurnState,
    /// Actions for the active turn, in submission order
    pending: Vec<SubmittedAction>,
    catalog: Arc<Catalog>,
    bonus: Box<dyn BonusSource>,
    max_participants: usize,
    started_at: Option<DateTime<Utc>>,
    turns_resolved: u64,
    matches_played: u64,
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("phase", &self.phase)
            .field("turn", &self.turn)
            .field("turn_state", &self.turn_state)
            .field("roster", &self.roster.len())
            .field("pending", &self.pending.len())
            .finish()
    }
}

impl Session {
    /// Create a session in the lobby phase
    pub fn new(catalog: Arc<Catalog>, bonus: Box<dyn BonusSource>) -> Self {
        Self {
            phase: Phase::Lobby,
            roster: Vec::new(),
            turn: 0,
            turn_state: TurnState::Idle,
            pending: Vec::new(),
            catalog,
            bonus,
            max_participants: MAX_PARTICIPANTS,
            started_at: None,
            turns_resolved: 0,
            matches_played: 0,
        }
    }

    /// Limit the roster size (clamped to `MIN_PARTICIPANTS..=MAX_PARTICIPANTS`)
    pub fn with_max_participants(mut self, max: usize) -> Self {
        self.max_participants = max.clamp(MIN_PARTICIPANTS, MAX_PARTICIPANTS);
        self
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Current turn number (0 outside a match)
    pub fn turn(&self) -> u32 {
        self.turn
    }

    pub fn turn_state(&self) -> TurnState {
        self.turn_state
    }

    pub fn roster(&self) -> &[Participant] {
        &self.roster
    }

    pub fn participant(&self, name: &str) -> Option<&Participant> {
        self.roster.iter().find(|p| p.name == name)
    }

    /// Number of actions recorded for the active turn
    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    /// Total turns resolved over the session's lifetime
    pub fn turns_resolved(&self) -> u64 {
        self.turns_resolved
    }

    pub fn alive_count(&self) -> usize {
        self.roster.iter().filter(|p| p.alive).count()
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            phase: self.phase,
            turn: self.turn,
            participants: self.participant_views(),
            pending_actions: self.pending.len(),
            matches_played: self.matches_played,
            started_at: self.started_at,
        }
    }

    fn participant_views(&self) -> Vec<ParticipantView> {
        self.roster.iter().map(ParticipantView::from).collect()
    }

    fn lobby_entries(&self) -> Vec<LobbyEntry> {
        self.roster
            .iter()
            .map(|p| LobbyEntry {
                name: p.name.clone(),
                archetype: p.archetype,
            })
            .collect()
    }

    fn participant_mut(&mut self, name: &str) -> Option<&mut Participant> {
        self.roster.iter_mut().find(|p| p.name == name)
    }
}
