//! Lobby management
//!
//! Admission, match start, departure, and end-of-match reset.

use std::sync::LazyLock;

use regex::Regex;
use tracing::{debug, info};

use super::{Broadcast, Phase, Session, TurnState, MIN_PARTICIPANTS};
use crate::catalog::Archetype;
use crate::combat::{Participant, SubmittedAction};
use crate::error::{AdmissionError, StartError};

/// 1-16 characters, no wire delimiters or control characters
static NAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^|,\p{Cc}]{1,16}$").expect("name pattern is valid"));

/// Check a display name against the naming rules
pub fn is_valid_name(name: &str) -> bool {
    NAME_RE.is_match(name)
}

impl Session {
    /// Admit a participant to the lobby
    pub fn admit(&mut self, name: &str, archetype: &str) -> Result<Vec<Broadcast>, AdmissionError> {
        if self.phase != Phase::Lobby {
            return Err(AdmissionError::AlreadyInProgress);
        }
        if self.roster.len() >= self.max_participants {
            return Err(AdmissionError::RoomFull);
        }

        let name = name.trim();
        if !is_valid_name(name) {
            return Err(AdmissionError::InvalidName);
        }
        let archetype: Archetype = archetype
            .parse()
            .map_err(|_| AdmissionError::UnknownArchetype(archetype.trim().to_string()))?;

        if self.roster.iter().any(|p| p.name == name) {
            return Err(AdmissionError::DuplicateName);
        }

        let participant = Participant::new(name, self.catalog.profile(archetype));
        self.roster.push(participant);
        info!(
            "{} joined as {} ({}/{})",
            name,
            archetype,
            self.roster.len(),
            self.max_participants
        );

        Ok(vec![Broadcast::LobbyUpdate(self.lobby_entries())])
    }

    /// Start a match with the current roster
    pub fn start_match(&mut self) -> Result<Vec<Broadcast>, StartError> {
        if self.phase != Phase::Lobby {
            return Err(StartError::AlreadyInProgress);
        }
        if self.roster.len() < MIN_PARTICIPANTS {
            return Err(StartError::InsufficientPlayers {
                required: MIN_PARTICIPANTS,
                present: self.roster.len(),
            });
        }

        self.phase = Phase::InProgress;
        self.turn = 1;
        self.turn_state = TurnState::AwaitingActions(1);
        self.pending.clear();
        self.started_at = Some(chrono::Utc::now());
        info!("Match started with {} participants", self.roster.len());

        Ok(vec![
            Broadcast::GameStart,
            Broadcast::PlayersInfo(self.participant_views()),
            Broadcast::StartTurn(1),
        ])
    }

    /// Handle a participant's connection going away
    pub fn handle_departure(&mut self, name: &str) -> Vec<Broadcast> {
        match self.phase {
            Phase::Lobby => {
                let before = self.roster.len();
                self.roster.retain(|p| p.name != name);
                if self.roster.len() == before {
                    return Vec::new();
                }
                info!("{} left the lobby", name);
                vec![Broadcast::LobbyUpdate(self.lobby_entries())]
            }
            Phase::InProgress => {
                let already_submitted = self.pending.iter().any(|a| a.actor == name);
                let Some(participant) = self.participant_mut(name) else {
                    return Vec::new();
                };

                let was_alive = participant.alive;
                participant.departed = true;
                participant.mark_dead();
                let priority = participant.priority;
                info!("{} disconnected during the match", name);

                if was_alive && !already_submitted {
                    self.pending
                        .push(SubmittedAction::disconnect_skip(name, priority));
                }

                let mut broadcasts = vec![Broadcast::PlayersUpdate(self.participant_views())];
                broadcasts.extend(self.evaluate_turn());
                broadcasts
            }
            Phase::Ended => Vec::new(),
        }
    }

    /// Restore everyone for a new match and return to the lobby.
    ///
    /// Participants whose connection left during the match are dropped.
    pub fn end_and_reset(&mut self) -> Vec<Broadcast> {
        self.roster.retain(|p| !p.departed);
        for participant in &mut self.roster {
            participant.reset();
        }

        self.phase = Phase::Lobby;
        self.turn = 0;
        self.turn_state = TurnState::Idle;
        self.pending.clear();
        self.started_at = None;
        self.matches_played += 1;
        debug!("Session reset with {} participants", self.roster.len());

        vec![Broadcast::LobbyUpdate(self.lobby_entries())]
    }
}
