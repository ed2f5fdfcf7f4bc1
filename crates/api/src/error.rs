// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Error types for the API layer.

use varaamo_domain::DomainError;

/// API-level errors.
///
/// These are distinct from domain errors and represent the API contract.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ApiError {
    /// Invalid input was provided.
    #[error("Invalid input for field '{field}': {message}")]
    InvalidInput {
        /// The field that was invalid.
        field: String,
        /// A human-readable description of the error.
        message: String,
    },
    /// A domain rule was violated.
    #[error("Domain rule violation: {0}")]
    Domain(#[from] DomainError),
    /// The request document could not be read or the response written.
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl ApiError {
    /// Shorthand for `ApiError::InvalidInput`.
    pub fn invalid_input(field: &str, message: impl Into<String>) -> Self {
        Self::InvalidInput {
            field: field.to_string(),
            message: message.into(),
        }
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}
