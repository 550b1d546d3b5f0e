// ──────────────────────────────────────────────────────────────────────────────
// nextcloud-client · error
// ──────────────────────────────────────────────────────────────────────────────
// Crate-wide error type. Every wrapper operation returns `NcResult<T>`.
// ──────────────────────────────────────────────────────────────────────────────

use nextcloud_types::OcsCode;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Maximum number of body bytes kept in an error message.
pub const MAX_BODY_SNIPPET: usize = 500;

pub type NcResult<T> = Result<T, NextcloudError>;

#[derive(Debug, Error)]
pub enum NextcloudError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("HTTP transport error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{method} {url} → {status}: {body}")]
    Status {
        status: u16,
        method: String,
        url: String,
        body: String,
    },

    #[error("OCS status {statuscode} (HTTP {http_status}): {message}")]
    Ocs {
        http_status: u16,
        statuscode: u32,
        message: String,
    },

    #[error("unexpected response data: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("WebDAV XML parse error: {0}")]
    Xml(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Coarse classification of a failure, for callers deciding whether to
/// retry, re-authenticate or give up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    Network,
    Auth,
    NotFound,
    Conflict,
    RateLimited,
    InsufficientStorage,
    Maintenance,
    Server,
    Invalid,
    Parse,
    Other,
}

impl ErrorCategory {
    pub fn from_http_status(status: u16) -> Self {
        match status {
            401 | 403 => Self::Auth,
            404 => Self::NotFound,
            405 | 409 | 412 | 423 => Self::Conflict,
            429 => Self::RateLimited,
            503 => Self::Maintenance,
            507 => Self::InsufficientStorage,
            500..=599 => Self::Server,
            _ => Self::Other,
        }
    }
}

impl NextcloudError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Config(_) | Self::InvalidArgument(_) => ErrorCategory::Invalid,
            Self::Http(_) => ErrorCategory::Network,
            Self::Status { status, .. } => ErrorCategory::from_http_status(*status),
            Self::Ocs {
                http_status,
                statuscode,
                ..
            } => match i32::try_from(*statuscode).ok().and_then(OcsCode::from_i32) {
                Some(OcsCode::NotAuthorized) => ErrorCategory::Auth,
                Some(OcsCode::NotFound) => ErrorCategory::NotFound,
                Some(OcsCode::ServerError) | Some(OcsCode::UnknownError) => ErrorCategory::Server,
                // v2 endpoints mirror the HTTP status into `statuscode`.
                _ if (400..600).contains(statuscode) => {
                    ErrorCategory::from_http_status(*statuscode as u16)
                }
                _ => ErrorCategory::from_http_status(*http_status),
            },
            Self::Decode(_) | Self::Xml(_) => ErrorCategory::Parse,
            Self::Io(_) => ErrorCategory::Other,
        }
    }

    /// HTTP status of the failed reply, when one was received.
    pub fn http_status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            Self::Ocs { http_status, .. } => Some(*http_status),
            Self::Http(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.category() == ErrorCategory::NotFound
    }

    pub(crate) fn invalid(msg: impl Into<String>) -> Self {
        Self::InvalidArgument(msg.into())
    }
}

/// Cut a reply body down to [`MAX_BODY_SNIPPET`] bytes on a char boundary.
pub(crate) fn body_snippet(text: &str) -> String {
    if text.len() <= MAX_BODY_SNIPPET {
        return text.to_string();
    }
    let mut end = MAX_BODY_SNIPPET;
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    text[..end].to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ocs(http_status: u16, statuscode: u32) -> NextcloudError {
        NextcloudError::Ocs {
            http_status,
            statuscode,
            message: String::new(),
        }
    }

    #[test]
    fn ocs_codes_map_to_categories() {
        assert_eq!(ocs(200, 997).category(), ErrorCategory::Auth);
        assert_eq!(ocs(200, 998).category(), ErrorCategory::NotFound);
        assert_eq!(ocs(200, 996).category(), ErrorCategory::Server);
        assert_eq!(ocs(200, 999).category(), ErrorCategory::Server);
    }

    #[test]
    fn v2_status_codes_follow_http_table() {
        assert_eq!(ocs(404, 404).category(), ErrorCategory::NotFound);
        assert_eq!(ocs(403, 403).category(), ErrorCategory::Auth);
        assert_eq!(ocs(200, 102).category(), ErrorCategory::Other);
    }

    #[test]
    fn status_errors_use_http_table() {
        let err = NextcloudError::Status {
            status: 429,
            method: "GET".into(),
            url: "https://cloud.example.com".into(),
            body: String::new(),
        };
        assert_eq!(err.category(), ErrorCategory::RateLimited);
        assert_eq!(err.http_status(), Some(429));
        assert_eq!(ErrorCategory::from_http_status(507), ErrorCategory::InsufficientStorage);
        assert_eq!(ErrorCategory::from_http_status(502), ErrorCategory::Server);
        assert_eq!(ErrorCategory::from_http_status(405), ErrorCategory::Conflict);
    }

    #[test]
    fn local_errors_are_invalid() {
        assert_eq!(
            NextcloudError::invalid("missing share_with").category(),
            ErrorCategory::Invalid
        );
        assert!(!NextcloudError::Config("x".into()).is_not_found());
    }

    #[test]
    fn snippet_truncates_on_char_boundary() {
        let long = "é".repeat(400);
        let cut = body_snippet(&long);
        assert!(cut.len() <= MAX_BODY_SNIPPET);
        assert!(cut.chars().all(|c| c == 'é'));
        assert_eq!(body_snippet("short"), "short");
    }

    #[test]
    fn display_includes_ocs_details() {
        let err = NextcloudError::Ocs {
            http_status: 200,
            statuscode: 998,
            message: "Room not found".into(),
        };
        assert_eq!(err.to_string(), "OCS status 998 (HTTP 200): Room not found");
    }
}
