use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::constants;

/// Asset server error types
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AssetError {
    /// No embedded file for the requested key, including keys that try to
    /// escape the configured resource group
    #[error("asset not found")]
    NotFound,
    /// Only GET and HEAD are answered under the prefix
    #[error("method not allowed")]
    MethodNotAllowed,
    /// The configured folder name selects no embedded file at all
    #[error("no embedded resource group named {0:?}")]
    EmptyGroup(String),
}

impl IntoResponse for AssetError {
    fn into_response(self) -> Response {
        match self {
            AssetError::NotFound | AssetError::EmptyGroup(_) => {
                StatusCode::NOT_FOUND.into_response()
            }
            AssetError::MethodNotAllowed => (
                StatusCode::METHOD_NOT_ALLOWED,
                [(header::ALLOW, constants::ALLOWED_METHODS)],
            )
                .into_response(),
        }
    }
}
