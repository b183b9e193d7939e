//! Mapping of domain errors onto HTTP responses.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use pool_arena::{TournamentError, position::PositionError};
use serde::{Deserialize, Serialize};

/// JSON error body
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Error returned by every API handler
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error(transparent)]
    Tournament(#[from] TournamentError),

    #[error(transparent)]
    Position(#[from] PositionError),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    BadRequest(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Tournament(e) => match e {
                TournamentError::NotFound(_)
                | TournamentError::EntryNotFound(_)
                | TournamentError::PositionNotFound(_) => StatusCode::NOT_FOUND,
                TournamentError::NotEligible(_)
                | TournamentError::TournamentClosed
                | TournamentError::DuplicateEntry
                | TournamentError::PrizePoolFull
                | TournamentError::NotStarted
                | TournamentError::InvalidTransition { .. }
                | TournamentError::PositionNotOwned(_) => StatusCode::CONFLICT,
                TournamentError::InvalidTick { .. } | TournamentError::InvalidConfig(_) => {
                    StatusCode::UNPROCESSABLE_ENTITY
                }
                TournamentError::Unavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            },
            ApiError::Position(PositionError::NotFound(_)) | ApiError::NotFound(_) => {
                StatusCode::NOT_FOUND
            }
            ApiError::Position(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
        }
    }

    fn client_message(&self) -> String {
        match self {
            ApiError::Tournament(e) => e.client_message(),
            other => other.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, "Request failed");
        }

        (
            status,
            Json(ErrorResponse {
                error: self.client_message(),
            }),
        )
            .into_response()
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;
    use pool_arena::IneligibleReason;

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            ApiError::from(TournamentError::NotFound(7)).status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ApiError::from(TournamentError::NotEligible(IneligibleReason::OutOfRange)).status(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            ApiError::from(TournamentError::PrizePoolFull).status(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            ApiError::from(TournamentError::InvalidConfig("empty title".into())).status(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            ApiError::from(TournamentError::Unavailable(3)).status(),
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(
            ApiError::from(PositionError::InvalidValue(0)).status(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            ApiError::from(PositionError::NotFound(4)).status(),
            StatusCode::NOT_FOUND
        );
    }

    #[test]
    fn test_client_message_hides_internal_ids() {
        let message = ApiError::from(TournamentError::PositionNotOwned(42)).client_message();
        assert!(!message.contains("42"));
    }
}
