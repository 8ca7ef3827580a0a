//! Line protocol
//!
//! Every message is one text line of `|`-separated fields. Participant
//! records inside a field use `,` as the inner separator.

use std::fmt;

use crate::combat::ActionKind;
use crate::error::ProtocolError;
use crate::session::{ActionRequest, Broadcast, LobbyEntry, ParticipantView};

/// Marker sent in `GAME_END` when nobody survived
pub const DRAW_MARKER: &str = "draw";

/// Commands a client can send
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientCommand {
    Join { name: String, archetype: String },
    Action(ActionRequest),
}

/// Parse one inbound line
pub fn parse_line(line: &str) -> Result<ClientCommand, ProtocolError> {
    let line = line.trim_end_matches(['\r', '\n']);
    if line.trim().is_empty() {
        return Err(ProtocolError::Empty);
    }

    let mut fields = line.split('|');
    let command = fields.next().unwrap_or_default().trim();

    match command {
        "JOIN" => {
            let name = required(fields.next(), "JOIN", "name")?;
            let archetype = required(fields.next(), "JOIN", "archetype")?;
            Ok(ClientCommand::Join {
                name: name.to_string(),
                archetype: archetype.to_string(),
            })
        }
        "ACTION" => {
            let actor = required(fields.next(), "ACTION", "name")?;
            let kind = required(fields.next(), "ACTION", "kind")?;
            let mut request = ActionRequest::new(actor, ActionKind::from_wire(kind));
            request.target = optional(fields.next());
            request.skill = optional(fields.next());
            Ok(ClientCommand::Action(request))
        }
        other => Err(ProtocolError::UnknownCommand(other.to_string())),
    }
}

fn required<'a>(
    field: Option<&'a str>,
    command: &'static str,
    name: &'static str,
) -> Result<&'a str, ProtocolError> {
    match field.map(str::trim) {
        Some(value) if !value.is_empty() => Ok(value),
        _ => Err(ProtocolError::MissingField {
            command,
            field: name,
        }),
    }
}

fn optional(field: Option<&str>) -> Option<String> {
    field
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}

/// Messages the server sends
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServerMessage {
    JoinSuccess,
    JoinRejected(String),
    LobbyUpdate(Vec<LobbyEntry>),
    GameStart,
    PlayersInfo(Vec<ParticipantView>),
    PlayersUpdate(Vec<ParticipantView>),
    StartTurn(u32),
    TurnResult(Vec<String>),
    GameEnd(Option<String>),
}

impl From<Broadcast> for ServerMessage {
    fn from(broadcast: Broadcast) -> Self {
        match broadcast {
            Broadcast::LobbyUpdate(entries) => ServerMessage::LobbyUpdate(entries),
            Broadcast::GameStart => ServerMessage::GameStart,
            Broadcast::PlayersInfo(views) => ServerMessage::PlayersInfo(views),
            Broadcast::PlayersUpdate(views) => ServerMessage::PlayersUpdate(views),
            Broadcast::StartTurn(turn) => ServerMessage::StartTurn(turn),
            Broadcast::TurnResult(lines) => ServerMessage::TurnResult(lines),
            Broadcast::GameEnd(winner) => ServerMessage::GameEnd(winner),
        }
    }
}

impl fmt::Display for ServerMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ServerMessage::JoinSuccess => write!(f, "JOIN_SUCCESS"),
            ServerMessage::JoinRejected(reason) => write!(f, "JOIN_REJECTED|{}", reason),
            ServerMessage::LobbyUpdate(entries) => {
                write!(f, "LOBBY_UPDATE")?;
                for entry in entries {
                    write!(f, "|{},{}", entry.name, entry.archetype)?;
                }
                Ok(())
            }
            ServerMessage::GameStart => write!(f, "GAME_START"),
            ServerMessage::PlayersInfo(views) => write_views(f, "PLAYERS_INFO", views),
            ServerMessage::PlayersUpdate(views) => write_views(f, "PLAYERS_UPDATE", views),
            ServerMessage::StartTurn(turn) => write!(f, "START_TURN|{}", turn),
            ServerMessage::TurnResult(lines) => {
                write!(f, "TURN_RESULT")?;
                for line in lines {
                    write!(f, "|{}", line)?;
                }
                Ok(())
            }
            ServerMessage::GameEnd(winner) => write!(
                f,
                "GAME_END|{}",
                winner.as_deref().unwrap_or(DRAW_MARKER)
            ),
        }
    }
}

fn write_views(f: &mut fmt::Formatter<'_>, tag: &str, views: &[ParticipantView]) -> fmt::Result {
    write!(f, "{}", tag)?;
    for v in views {
        write!(
            f,
            "|{},{},{},{},{},{},{},{},{}",
            v.name, v.archetype, v.priority, v.hp, v.max_hp, v.mp, v.max_mp, v.alive, v.effects
        )?;
    }
    Ok(())
}
