//! Error types for the SDS client.

use thiserror::Error;

/// Result type alias for SDS client operations.
pub type Result<T> = std::result::Result<T, SdsError>;

/// Errors that can occur while talking to the SDS service.
#[derive(Error, Debug)]
pub enum SdsError {
    /// A required identifier was missing or an entity was malformed.
    /// Raised before any request is sent.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// The service answered with a non-success status.
    #[error("{message}{}", .operation_id.as_ref().map(|id| format!(", OperationId {id}")).unwrap_or_default())]
    Service {
        status: u16,
        message: String,
        operation_id: Option<String>,
    },

    /// Transport error from the HTTP client.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The response body could not be decoded.
    #[error("Invalid response format: {0}")]
    InvalidResponse(String),

    /// The configured resource URL is unusable.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// Configuration file or settings are unusable.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Access token could not be obtained.
    #[error("Authentication failed: {0}")]
    Auth(String),
}

impl SdsError {
    /// HTTP status of a service error, if this is one.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Service { status, .. } => Some(*status),
            Self::Http(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// True for a 404 answer from the service.
    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }

    pub fn is_invalid_argument(&self) -> bool {
        matches!(self, Self::InvalidArgument(_))
    }
}

impl From<serde_json::Error> for SdsError {
    fn from(e: serde_json::Error) -> Self {
        Self::InvalidResponse(e.to_string())
    }
}

/// Fail with [`SdsError::InvalidArgument`] unless `value` can be used as
/// one URL path segment.
///
/// Empty and blank values are missing. `.` and `..` are dot-segments that
/// URL normalization would fold into the parent path.
pub(crate) fn require(value: &str, name: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(SdsError::InvalidArgument(format!("{name} is required")));
    }
    if value == "." || value == ".." {
        return Err(SdsError::InvalidArgument(format!(
            "{name} cannot be '{value}'"
        )));
    }
    Ok(())
}

/// Format an SDS error for display on a terminal.
pub fn format_sds_error(error: &SdsError) -> String {
    match error {
        SdsError::Service { status: 401, .. } => {
            "Authentication failed. Check the client id and secret.".to_string()
        }
        SdsError::Service { status: 403, .. } => {
            "Permission denied for this tenant or namespace.".to_string()
        }
        SdsError::Service { status: 404, message, .. } => format!("Not found. {message}"),
        SdsError::Service { status: 409, message, .. } => {
            format!("Conflict, the resource may already exist. {message}")
        }
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_require_rejects_blank() {
        assert!(require("", "namespace_id").unwrap_err().is_invalid_argument());
        assert!(require("   ", "namespace_id").is_err());
        assert!(require("ns1", "namespace_id").is_ok());
    }

    #[test]
    fn test_require_rejects_dot_segments() {
        assert!(require(".", "dataview_id").unwrap_err().is_invalid_argument());
        assert!(require("..", "dataview_id").unwrap_err().is_invalid_argument());
        assert!(require("...", "dataview_id").is_ok());
        assert!(require(".hidden", "dataview_id").is_ok());
    }

    #[test]
    fn test_service_error_display_includes_operation_id() {
        let err = SdsError::Service {
            status: 404,
            message: "Failed to get dataview, dv1. 404:Not Found".to_string(),
            operation_id: Some("op-1".to_string()),
        };
        assert_eq!(
            err.to_string(),
            "Failed to get dataview, dv1. 404:Not Found, OperationId op-1"
        );
        assert!(err.is_not_found());
    }

    #[test]
    fn test_service_error_display_without_operation_id() {
        let err = SdsError::Service {
            status: 500,
            message: "Failed to get dataviews. 500:Internal Server Error".to_string(),
            operation_id: None,
        };
        assert_eq!(err.to_string(), "Failed to get dataviews. 500:Internal Server Error");
        assert!(!err.is_not_found());
    }

    #[test]
    fn test_format_sds_error() {
        let err = SdsError::Service {
            status: 403,
            message: "x".to_string(),
            operation_id: None,
        };
        assert!(format_sds_error(&err).contains("Permission denied"));

        let err = SdsError::InvalidArgument("dataview_id is required".to_string());
        assert_eq!(format_sds_error(&err), "Invalid argument: dataview_id is required");
    }
}
