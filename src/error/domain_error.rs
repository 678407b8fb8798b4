use thiserror::Error;

use crate::room::phase_fsm::Phase;

#[derive(Clone, Debug, Error, PartialEq)]
pub enum DomainError {
    #[error("The room does not exist. RoomId: '{0}'.")]
    RoomNotFound(String),
    #[error("A room with the same id already exists. RoomId: '{0}'.")]
    RoomAlreadyExists(String),
    #[error("A player with the same id is already connected. PlayerId: '{0}'.")]
    PlayerIdInUse(String),
    #[error("Another player in the room already uses this nickname. Nickname: '{0}'.")]
    NicknameInUse(String),
    #[error("The player is not connected to the room. PlayerId: '{0}'.")]
    PlayerNotFound(String),
    #[error("The game in the room has already started. RoomId: '{0}'.")]
    RoomAlreadyStarted(String),
    #[error("The room is full. RoomId: '{0}', MaximumPlayers: '{1}'.")]
    RoomIsFull(String, usize),
    #[error("The operation is not valid in the current phase. Operation: '{operation}', ActualPhase: '{phase}'.")]
    InvalidPhaseOperation { operation: String, phase: Phase },
    #[error("The room cannot transition with the requested command. ActualPhase: '{0}', Command: '{1}'.")]
    InvalidPhaseTransition(Phase, String),
    #[error("Malformed vote skipped. PlayerId: '{player_id}', Category: '{category}', Reason: '{reason}'.")]
    MalformedVotePayload {
        player_id: String,
        category: String,
        reason: String,
    },
}
