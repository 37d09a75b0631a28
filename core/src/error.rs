//! Error type for the todos data-access layer.
//!
//! # Design
//! There is a single failure kind: the remote operation failed. Network
//! failures, rejected writes, undecodable bodies and missing rows all land in
//! `ApiError` with whatever message the remote side (or the transport)
//! supplied. `status` and `code` are kept for diagnostics only.

use serde::Deserialize;
use thiserror::Error;

use crate::http::HttpResponse;

/// A remote operation failed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct ApiError {
    /// HTTP status, when the failure came from a response.
    pub status: Option<u16>,
    /// Service error code (e.g. a Postgres SQLSTATE), when one was supplied.
    pub code: Option<String>,
    pub message: String,
}

/// Error body shape used by the table service.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    code: Option<String>,
    message: String,
}

impl ApiError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            status: None,
            code: None,
            message: message.into(),
        }
    }

    /// The request never produced a response.
    pub fn transport(err: impl std::fmt::Display) -> Self {
        Self::new(err.to_string())
    }

    /// A response arrived but its body did not decode into the expected rows.
    pub fn decode(err: impl std::fmt::Display) -> Self {
        Self::new(format!("invalid response body: {err}"))
    }

    /// Build the error for a non-success response, preferring the service's
    /// own `message` over the raw body.
    pub fn from_response(response: &HttpResponse) -> Self {
        let status = Some(response.status);
        match serde_json::from_str::<ErrorBody>(&response.body) {
            Ok(body) => Self {
                status,
                code: body.code,
                message: body.message,
            },
            Err(_) if response.body.trim().is_empty() => Self {
                status,
                code: None,
                message: format!("HTTP {}", response.status),
            },
            Err(_) => Self {
                status,
                code: None,
                message: response.body.clone(),
            },
        }
    }
}
