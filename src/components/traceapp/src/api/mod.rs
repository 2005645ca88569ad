//!
//! # Services provided by api
//!

/// Role-scoped REST gateways used by the organizations
pub mod gateway;

/// Submit/evaluate service of the ledger host
pub mod peer_server;

use crate::client::InvokeError;
use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use serde_json::json;
use std::fmt;
use tp_types::ContractError;

/// HTTP status a contract outcome is reported with.
pub fn status_of(e: &ContractError) -> StatusCode {
    match e {
        ContractError::NotFound(_) => StatusCode::NOT_FOUND,
        ContractError::AlreadyExists(_) | ContractError::Conflict(_) => {
            StatusCode::CONFLICT
        }
        ContractError::InvalidArgument(_) | ContractError::UnknownFunction(_) => {
            StatusCode::BAD_REQUEST
        }
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

// Ping route to check for liveness of API
#[allow(clippy::unnecessary_wraps)]
async fn ping() -> actix_web::Result<String> {
    Ok("success".into())
}

/// Failures surfaced by the gateway handlers.
#[derive(Debug)]
pub enum ApiError {
    Contract(ContractError),
    BadRequest(String),
    /// The peer could not be reached.
    Transport(String),
    Internal(String),
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ApiError::Contract(e) => write!(f, "{}", e),
            ApiError::BadRequest(m) | ApiError::Internal(m) => f.write_str(m),
            ApiError::Transport(m) => write!(f, "ledger host unavailable: {}", m),
        }
    }
}

impl From<InvokeError> for ApiError {
    fn from(e: InvokeError) -> Self {
        match e {
            InvokeError::Contract(e) => ApiError::Contract(e),
            InvokeError::Transport(m) => ApiError::Transport(m),
        }
    }
}

impl From<actix_web::error::BlockingError> for ApiError {
    fn from(e: actix_web::error::BlockingError) -> Self {
        ApiError::Internal(e.to_string())
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Contract(e) => status_of(e),
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Transport(_) => StatusCode::BAD_GATEWAY,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(json!({ "error": self.to_string() }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn contract_status_mapping() {
        assert_eq!(
            status_of(&ContractError::not_found("a")),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            status_of(&ContractError::already_exists("a")),
            StatusCode::CONFLICT
        );
        assert_eq!(
            status_of(&ContractError::Conflict("stale".into())),
            StatusCode::CONFLICT
        );
        assert_eq!(
            status_of(&ContractError::UnknownFunction("x".into())),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_of(&ContractError::Decode("x".into())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            ApiError::Transport("refused".into()).status_code(),
            StatusCode::BAD_GATEWAY
        );
    }
}
