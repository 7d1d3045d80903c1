// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use k8s_openapi::apimachinery::pkg::apis::meta::v1::StatusDetails;
use std::fmt;
use std::time::Duration;
use thiserror::Error;

/// Boxed error coming out of a request executor.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("API error: {0}")]
    Api(StatusError),

    #[error("Transport error: {0}")]
    Transport(#[source] BoxError),

    #[error("Failed to serialize request body: {0}")]
    Serialize(#[source] serde_json::Error),

    #[error("Failed to decode response body: {0}")]
    Decode(#[source] serde_json::Error),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Watch stream error: {0}")]
    WatchStream(String),

    #[error("Failed to assemble HTTP request: {0}")]
    Http(#[from] http::Error),

    #[error("Timed out after {0:?} waiting for condition")]
    WaitTimeout(Duration),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// The decoded server error, if this is one
    pub fn status(&self) -> Option<&StatusError> {
        match self {
            Error::Api(status) => Some(status),
            _ => None,
        }
    }

    pub fn kind(&self) -> Option<ErrorKind> {
        self.status().map(|s| s.kind)
    }

    pub fn status_code(&self) -> Option<u16> {
        self.status().map(|s| s.code)
    }

    pub fn is_not_found(&self) -> bool {
        self.kind() == Some(ErrorKind::NotFound)
    }

    pub fn is_forbidden(&self) -> bool {
        self.kind() == Some(ErrorKind::Forbidden)
    }

    pub fn is_conflict(&self) -> bool {
        self.kind() == Some(ErrorKind::Conflict)
    }

    pub fn is_already_exists(&self) -> bool {
        self.kind() == Some(ErrorKind::AlreadyExists)
    }

    pub fn is_invalid(&self) -> bool {
        self.kind() == Some(ErrorKind::Invalid)
    }

    pub fn is_unauthorized(&self) -> bool {
        self.kind() == Some(ErrorKind::Unauthorized)
    }

    pub fn is_gone(&self) -> bool {
        self.kind() == Some(ErrorKind::Gone)
    }
}

impl From<StatusError> for Error {
    fn from(err: StatusError) -> Self {
        Error::Api(err)
    }
}

/// Classification of a failed API call, taken from the `Status` reason and
/// falling back to the HTTP status code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    NotFound,
    Forbidden,
    Conflict,
    AlreadyExists,
    Invalid,
    BadRequest,
    Unauthorized,
    Gone,
    MethodNotAllowed,
    TooManyRequests,
    Timeout,
    InternalError,
    ServiceUnavailable,
    Unknown,
}

impl ErrorKind {
    fn from_reason(reason: &str) -> Option<Self> {
        let kind = match reason {
            "NotFound" => Self::NotFound,
            "Forbidden" => Self::Forbidden,
            "Conflict" => Self::Conflict,
            "AlreadyExists" => Self::AlreadyExists,
            "Invalid" => Self::Invalid,
            "BadRequest" => Self::BadRequest,
            "Unauthorized" => Self::Unauthorized,
            "Gone" | "Expired" => Self::Gone,
            "MethodNotAllowed" => Self::MethodNotAllowed,
            "TooManyRequests" => Self::TooManyRequests,
            "Timeout" | "ServerTimeout" => Self::Timeout,
            "InternalError" => Self::InternalError,
            "ServiceUnavailable" => Self::ServiceUnavailable,
            _ => return None,
        };
        Some(kind)
    }

    fn from_code(code: u16) -> Self {
        match code {
            400 => Self::BadRequest,
            401 => Self::Unauthorized,
            403 => Self::Forbidden,
            404 => Self::NotFound,
            405 => Self::MethodNotAllowed,
            409 => Self::Conflict,
            410 => Self::Gone,
            422 => Self::Invalid,
            429 => Self::TooManyRequests,
            500 => Self::InternalError,
            503 => Self::ServiceUnavailable,
            504 => Self::Timeout,
            _ => Self::Unknown,
        }
    }

    /// Resolve the kind for a response. A known reason wins over the code.
    pub fn classify(reason: Option<&str>, code: u16) -> Self {
        reason
            .and_then(Self::from_reason)
            .unwrap_or_else(|| Self::from_code(code))
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// The (kind, namespace, name) triple a request addressed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResourceRef {
    pub resource: String,
    pub namespace: Option<String>,
    pub name: Option<String>,
}

impl fmt::Display for ResourceRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.namespace, &self.name) {
            (Some(ns), Some(name)) => write!(f, "{} {}/{}", self.resource, ns, name),
            (Some(ns), None) => write!(f, "{} in namespace {}", self.resource, ns),
            (None, Some(name)) => write!(f, "{} {}", self.resource, name),
            (None, None) => write!(f, "{}", self.resource),
        }
    }
}

pub use k8s_openapi::apimachinery::pkg::apis::meta::v1::Status;

/// A non-success response, decoded from the server's `Status` envelope.
#[derive(Debug, Clone, PartialEq)]
pub struct StatusError {
    pub kind: ErrorKind,
    pub code: u16,
    pub resource: ResourceRef,
    /// Raw reason as sent by the server, empty when absent
    pub reason: String,
    pub message: String,
    /// Extra data from the server, e.g. the field causes of an `Invalid` response
    pub details: Option<StatusDetails>,
}

impl StatusError {
    /// Build the error from a response status and its raw body.
    ///
    /// Bodies that are not a `Status` object are kept verbatim as the message.
    pub fn from_response(code: u16, body: &[u8], resource: ResourceRef) -> Self {
        match serde_json::from_slice::<Status>(body) {
            Ok(status) if status.reason.is_some() || status.message.is_some() => {
                Self::from_status(&status, code, resource)
            }
            _ => Self {
                kind: ErrorKind::classify(None, code),
                code,
                resource,
                reason: String::new(),
                message: String::from_utf8_lossy(body).trim().to_string(),
                details: None,
            },
        }
    }

    /// Build the error from a `Status` object, e.g. one carried by a watch event
    pub fn from_status(status: &Status, fallback_code: u16, resource: ResourceRef) -> Self {
        let code = status
            .code
            .and_then(|c| u16::try_from(c).ok())
            .unwrap_or(fallback_code);
        let reason = status.reason.clone().unwrap_or_default();
        Self {
            kind: ErrorKind::classify(status.reason.as_deref(), code),
            code,
            resource,
            reason,
            message: status.message.clone().unwrap_or_default(),
            details: status.details.clone(),
        }
    }
}

impl fmt::Display for StatusError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({}) on {}: {}",
            self.kind, self.code, self.resource, self.message
        )
    }
}

impl std::error::Error for StatusError {}
