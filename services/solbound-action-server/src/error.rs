//! HTTP error shaping
//!
//! Every failure becomes `400 {"message": ...}`. Only the exhausted and
//! invalid-account cases get their own message; everything else reads
//! "An error occurred" so upstream detail never reaches the caller.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use solbound_issuer::{MintError, GENERIC_FAILURE_MESSAGE};
use thiserror::Error;

/// Handler result type
pub type AppResult<T> = Result<T, AppError>;

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Mint(#[from] MintError),

    #[error("Malformed request body: {0}")]
    MalformedBody(String),
}

/// Error body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub message: String,
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        StatusCode::BAD_REQUEST
    }

    /// The message shown to callers
    pub fn public_message(&self) -> &'static str {
        match self {
            AppError::Mint(err) => err.public_message(),
            AppError::MalformedBody(_) => GENERIC_FAILURE_MESSAGE,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if let AppError::MalformedBody(detail) = &self {
            tracing::warn!(%detail, "Rejected request body");
        }

        let body = ErrorResponse {
            message: self.public_message().to_string(),
        };
        (self.status_code(), Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_error_bodies() {
        let cases = [
            (AppError::Mint(MintError::InventoryExhausted { total: 3 }), "All NFTS have been minted"),
            (
                AppError::Mint(MintError::InvalidRequesterIdentity { input: "x".to_string() }),
                "Invalid account provided",
            ),
            (
                AppError::Mint(MintError::RegistryUnavailable {
                    message: "connection refused to https://rpc.internal".to_string(),
                }),
                "An error occurred",
            ),
            (AppError::MalformedBody("EOF".to_string()), "An error occurred"),
        ];

        for (error, expected) in cases {
            let response = error.into_response();
            assert_eq!(response.status(), StatusCode::BAD_REQUEST);

            let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
            let body: ErrorResponse = serde_json::from_slice(&bytes).unwrap();
            assert_eq!(body.message, expected);
        }
    }
}
