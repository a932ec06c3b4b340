// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

use reqwest::StatusCode;

use crate::types::Href;

/// Cloud client errors.
#[non_exhaustive]
#[derive(Debug, thiserror::Error)]
pub enum CloudError {
    /// Base URL or request path could not be parsed or resolved.
    #[error("URL error: {0}")]
    Url(String),

    /// The HTTP request could not be constructed.
    #[error("Invalid request: {0}")]
    Request(String),

    /// Network layer error.
    #[error("HTTP error: {0}")]
    Http(String),

    /// The response body could not be read.
    #[error("Failed to read response body: {0}")]
    Body(String),

    /// The response body is neither the expected document nor a fault envelope.
    #[error("error during XML decoding for response {body}: {reason}")]
    Decode {
        /// Status of the response carrying the body.
        status: StatusCode,
        /// Raw body, lossily decoded as UTF-8.
        body: String,
        /// Underlying parser error.
        reason: String,
    },

    /// The server answered with a fault envelope.
    #[error("exception: {exception}, message: {message}")]
    Server {
        /// Status of the response carrying the fault.
        status: StatusCode,
        /// Exception type reported by the server.
        exception: String,
        /// Human-readable message reported by the server.
        message: String,
    },

    /// Resource not found.
    #[error("Resource not found: {0}")]
    NotFound(Href),

    /// No system tag carries the requested display name.
    #[error("could not find system tag with name {0}")]
    TagNotFound(String),

    /// JSON encoding error.
    #[error("JSON error: {0}")]
    Json(String),

    /// XML writing error.
    #[error("XML error: {0}")]
    Xml(String),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),
}

impl CloudError {
    /// Returns the HTTP status of the response this error was decoded from, if any.
    #[must_use]
    pub const fn status(&self) -> Option<StatusCode> {
        match self {
            Self::Decode { status, .. } | Self::Server { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<quick_xml::Error> for CloudError {
    fn from(e: quick_xml::Error) -> Self {
        Self::Xml(e.to_string())
    }
}

impl From<std::io::Error> for CloudError {
    fn from(e: std::io::Error) -> Self {
        Self::Xml(format!("IO error: {e}"))
    }
}

impl From<serde_json::Error> for CloudError {
    fn from(e: serde_json::Error) -> Self {
        Self::Json(e.to_string())
    }
}

impl From<url::ParseError> for CloudError {
    fn from(e: url::ParseError) -> Self {
        Self::Url(e.to_string())
    }
}
