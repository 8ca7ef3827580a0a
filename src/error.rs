//! Error taxonomy
//!
//! Admission and start errors are reported to whoever asked. Action rejections
//! and protocol errors are only logged. Catalog and config errors are startup
//! failures.

use thiserror::Error;

use crate::combat::EffectType;

/// Reasons a `JOIN` is refused. The display text is the `JOIN_REJECTED` reason.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AdmissionError {
    #[error("match already in progress")]
    AlreadyInProgress,

    #[error("room is full")]
    RoomFull,

    #[error("name already taken")]
    DuplicateName,

    #[error("invalid name")]
    InvalidName,

    #[error("unknown archetype: {0}")]
    UnknownArchetype(String),

    #[error("already joined")]
    AlreadyJoined,
}

/// Reasons the operator cannot start a match
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StartError {
    #[error("at least {required} participants are required ({present} present)")]
    InsufficientPlayers { required: usize, present: usize },

    #[error("match already in progress")]
    AlreadyInProgress,
}

/// Why a submitted action was dropped
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ActionRejection {
    #[error("no match in progress")]
    NotInProgress,

    #[error("unknown participant")]
    UnknownParticipant,

    #[error("participant is dead")]
    Dead,

    #[error("action already submitted this turn")]
    AlreadySubmitted,

    #[error("participant is {0} and may only submit a forced skip")]
    Impaired(EffectType),

    #[error("connection is not bound to this participant")]
    NotYourParticipant,
}

/// Malformed inbound lines
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProtocolError {
    #[error("empty line")]
    Empty,

    #[error("unknown command: {0}")]
    UnknownCommand(String),

    #[error("{command} is missing field {field}")]
    MissingField {
        command: &'static str,
        field: &'static str,
    },
}

/// Catalog table failed validation
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CatalogError {
    #[error("archetype {0} has no skills")]
    NoSkills(String),

    #[error("archetype {archetype} lists skill {skill} twice")]
    DuplicateSkill { archetype: String, skill: String },

    #[error("archetypes {0} and {1} share priority {2}")]
    DuplicatePriority(String, String, u8),

    #[error("skill {0} has negative power or cost")]
    NegativeValue(String),

    #[error("archetype {0} is missing from the catalog")]
    MissingArchetype(String),
}

/// Configuration could not be loaded
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load configuration: {0}")]
    Load(#[from] Box<figment::Error>),

    #[error("configuration file not found: {0}")]
    MissingFile(std::path::PathBuf),

    #[error("max_participants must be between 2 and 6, got {0}")]
    MaxParticipants(usize),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        ConfigError::Load(Box::new(err))
    }
}
