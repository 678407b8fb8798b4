pub mod domain_error;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;

use self::domain_error::DomainError;

#[derive(Clone, Debug, Error, PartialEq)]
pub enum Error {
    #[error("Domain Error. Error: '{0}'.")]
    Domain(DomainError),
    #[error("Internal Error. Error: '{0}'.")]
    Internal(String),
    #[error("Received a bad formatted message. Message: '{1}', Error: '{0}'.")]
    UnprocessableMessage(String, String),
    #[error("The websocket with the player is closed. Reason: '{0}'.")]
    WebsocketClosed(String),
}

impl Error {
    pub fn log_and_create_internal(message: &str) -> Error {
        log::error!("{message}");
        Error::Internal(message.to_string())
    }

    /// Machine readable code sent to clients alongside the human readable detail.
    pub fn code(&self) -> &'static str {
        match self {
            Error::Domain(DomainError::RoomNotFound(_)) => "ROOM_NOT_FOUND",
            Error::Domain(DomainError::RoomAlreadyExists(_)) => "ROOM_ALREADY_EXISTS",
            Error::Domain(DomainError::PlayerIdInUse(_)) => "PLAYER_ID_IN_USE",
            Error::Domain(DomainError::NicknameInUse(_)) => "NICKNAME_IN_USE",
            Error::Domain(DomainError::PlayerNotFound(_)) => "PLAYER_NOT_FOUND",
            Error::Domain(DomainError::RoomAlreadyStarted(_)) => "ROOM_ALREADY_STARTED",
            Error::Domain(DomainError::RoomIsFull(_, _)) => "ROOM_IS_FULL",
            Error::Domain(DomainError::InvalidPhaseOperation { .. }) => "INVALID_PHASE_OPERATION",
            Error::Domain(DomainError::InvalidPhaseTransition(_, _)) => "INVALID_PHASE_TRANSITION",
            Error::Domain(DomainError::MalformedVotePayload { .. }) => "MALFORMED_VOTE_PAYLOAD",
            Error::Internal(_) => "INTERNAL_SERVER",
            Error::UnprocessableMessage(_, _) => "UNPROCESSABLE_MESSAGE",
            Error::WebsocketClosed(_) => "WEBSOCKET_CLOSED",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Error::Domain(DomainError::RoomNotFound(_)) => "The room does not exist",
            Error::Domain(DomainError::RoomAlreadyExists(_)) => "The room already exists",
            Error::Domain(DomainError::PlayerIdInUse(_)) => "The player id is already in use",
            Error::Domain(DomainError::NicknameInUse(_)) => "The nickname is already in use",
            Error::Domain(DomainError::PlayerNotFound(_)) => "The player does not exist",
            Error::Domain(DomainError::RoomAlreadyStarted(_)) => "The game has already started",
            Error::Domain(DomainError::RoomIsFull(_, _)) => "The room is full",
            Error::Domain(DomainError::InvalidPhaseOperation { .. }) => {
                "The operation is not valid in the current phase"
            }
            Error::Domain(DomainError::InvalidPhaseTransition(_, _)) => {
                "The room cannot transition with this command"
            }
            Error::Domain(DomainError::MalformedVotePayload { .. }) => "The vote is malformed",
            Error::Internal(_) => "Internal Server error",
            Error::UnprocessableMessage(_, _) => "The message could not be processed",
            Error::WebsocketClosed(_) => "The player websocket is closed",
        }
    }

    fn status_code(&self) -> StatusCode {
        match self {
            Error::Domain(DomainError::RoomNotFound(_))
            | Error::Domain(DomainError::PlayerNotFound(_)) => StatusCode::NOT_FOUND,
            Error::Domain(DomainError::RoomAlreadyExists(_))
            | Error::Domain(DomainError::PlayerIdInUse(_))
            | Error::Domain(DomainError::NicknameInUse(_))
            | Error::Domain(DomainError::RoomAlreadyStarted(_))
            | Error::Domain(DomainError::RoomIsFull(_, _))
            | Error::Domain(DomainError::InvalidPhaseOperation { .. })
            | Error::Domain(DomainError::InvalidPhaseTransition(_, _)) => StatusCode::CONFLICT,
            Error::Domain(DomainError::MalformedVotePayload { .. })
            | Error::UnprocessableMessage(_, _) => StatusCode::UNPROCESSABLE_ENTITY,
            Error::Internal(_) | Error::WebsocketClosed(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<DomainError> for Error {
    fn from(error: DomainError) -> Self {
        Error::Domain(error)
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ErrorResponse {
    r#type: &'static str,
    title: &'static str,
    detail: String,
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        (
            self.status_code(),
            Json(ErrorResponse {
                r#type: self.code(),
                title: self.title(),
                detail: self.to_string(),
            }),
        )
            .into_response()
    }
}
