//! Submitted actions
//!
//! At most one per participant per turn, discarded once the turn resolves.

use serde::Serialize;

/// What a participant does this turn
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionKind {
    Attack,
    Defend,
    UseItem,
    /// Sent by a frozen or stunned participant
    ForcedSkip,
    /// Synthesized when a participant leaves mid-turn
    DisconnectSkip,
    /// Anything the client sent that we don't know
    Unrecognized(String),
}

impl ActionKind {
    /// Parse a wire kind. Disconnect skips can't be requested by clients.
    pub fn from_wire(kind: &str) -> ActionKind {
        match kind.trim() {
            "attack" => ActionKind::Attack,
            "defense" => ActionKind::Defend,
            "item" => ActionKind::UseItem,
            "paralyzed" => ActionKind::ForcedSkip,
            other => ActionKind::Unrecognized(other.to_string()),
        }
    }

    /// Wire name of the kind
    pub fn as_wire(&self) -> &str {
        match self {
            ActionKind::Attack => "attack",
            ActionKind::Defend => "defense",
            ActionKind::UseItem => "item",
            ActionKind::ForcedSkip => "paralyzed",
            ActionKind::DisconnectSkip => "skip",
            ActionKind::Unrecognized(kind) => kind,
        }
    }
}

/// A recorded action for the active turn
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmittedAction {
    pub actor: String,
    pub kind: ActionKind,
    pub target: Option<String>,
    /// Skill name for attacks, item name for items
    pub skill: Option<String>,
    /// Actor's archetype priority
    pub priority: u8,
}

impl SubmittedAction {
    /// Synthetic skip for a participant who left mid-turn
    pub fn disconnect_skip(actor: &str, priority: u8) -> Self {
        Self {
            actor: actor.to_string(),
            kind: ActionKind::DisconnectSkip,
            target: None,
            skill: None,
            priority,
        }
    }
}
