// HTTP API Error Types
use std::fmt;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::auth::{ConfigurationError, HashError, TokenError};
use crate::database::StoreError;

/// Entity a lookup can fail to find
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceKind {
    User,
    Budget,
    Category,
    Month,
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ResourceKind::User => "user",
            ResourceKind::Budget => "budget",
            ResourceKind::Category => "category",
            ResourceKind::Month => "month",
        };
        f.write_str(name)
    }
}

/// Every failure a request can end in.
///
/// The `Display` text is what the client sees. Variants wrapping an internal
/// cause keep it for logs only; see [`DomainError::detail`].
#[derive(Debug, Error)]
pub enum DomainError {
    // 419
    #[error("{0}")]
    Argument(String),

    // 400
    #[error("{0}")]
    Validation(String),

    // 401
    #[error("{0}")]
    Authentication(String),

    // 403
    #[error("{0}")]
    Authorization(String),

    #[error("Token has expired")]
    ExpiredToken,

    #[error("Invalid token signature")]
    InvalidSignature,

    #[error("Malformed token")]
    MalformedToken(String),

    // 404
    #[error("{message}")]
    ResourceLookup { resource: ResourceKind, message: String },

    // 409
    #[error("{0}")]
    Conflict(String),

    // 400
    #[error("{0}")]
    MissingFile(String),

    // 413
    #[error("{0}")]
    PayloadTooLarge(String),

    // 500
    #[error("{message}")]
    Storage {
        message: &'static str,
        #[source]
        source: StoreError,
    },

    #[error("Server configuration error")]
    Configuration(String),

    #[error("Internal server error")]
    Internal(anyhow::Error),
}

/// Argument errors use the non-standard 419 status.
const ARGUMENT_STATUS: u16 = 419;

impl DomainError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            DomainError::Argument(_) => {
                StatusCode::from_u16(ARGUMENT_STATUS).unwrap_or(StatusCode::BAD_REQUEST)
            }
            DomainError::Validation(_) | DomainError::MissingFile(_) => StatusCode::BAD_REQUEST,
            DomainError::Authentication(_)
            | DomainError::ExpiredToken
            | DomainError::InvalidSignature
            | DomainError::MalformedToken(_) => StatusCode::UNAUTHORIZED,
            DomainError::Authorization(_) => StatusCode::FORBIDDEN,
            DomainError::ResourceLookup { .. } => StatusCode::NOT_FOUND,
            DomainError::Conflict(_) => StatusCode::CONFLICT,
            DomainError::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            DomainError::Storage { .. } | DomainError::Configuration(_) | DomainError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Stable name of the error kind, used in logs
    pub fn kind(&self) -> &'static str {
        match self {
            DomainError::Argument(_) => "ArgumentError",
            DomainError::Validation(_) => "ValidationError",
            DomainError::Authentication(_) => "AuthenticationError",
            DomainError::Authorization(_) => "AuthorizationError",
            DomainError::ExpiredToken => "ExpiredTokenError",
            DomainError::InvalidSignature => "InvalidSignatureError",
            DomainError::MalformedToken(_) => "MalformedTokenError",
            DomainError::ResourceLookup { resource, .. } => match resource {
                ResourceKind::User => "UserLookupError",
                ResourceKind::Budget => "BudgetLookupError",
                ResourceKind::Category => "CategoryLookupError",
                ResourceKind::Month => "MonthLookupError",
            },
            DomainError::Conflict(_) => "ConflictError",
            DomainError::MissingFile(_) => "MissingFileError",
            DomainError::PayloadTooLarge(_) => "PayloadTooLargeError",
            DomainError::Storage { .. } => "StorageError",
            DomainError::Configuration(_) => "ConfigurationError",
            DomainError::Internal(_) => "InternalError",
        }
    }

    /// Internal detail for logs; never sent to the client.
    pub fn detail(&self) -> Option<String> {
        match self {
            DomainError::MalformedToken(reason) => Some(reason.clone()),
            DomainError::Storage { source, .. } => Some(source.to_string()),
            DomainError::Configuration(reason) => Some(reason.clone()),
            DomainError::Internal(err) => Some(format!("{err:#}")),
            _ => None,
        }
    }

    pub fn argument(message: impl Into<String>) -> Self {
        DomainError::Argument(message.into())
    }

    /// The standard "No <name> argument provided" error.
    pub fn missing_argument(name: &str) -> Self {
        DomainError::Argument(format!("No {name} argument provided"))
    }

    pub fn validation(message: impl Into<String>) -> Self {
        DomainError::Validation(message.into())
    }

    pub fn authentication(message: impl Into<String>) -> Self {
        DomainError::Authentication(message.into())
    }

    pub fn authorization(message: impl Into<String>) -> Self {
        DomainError::Authorization(message.into())
    }

    pub fn not_found(resource: ResourceKind, message: impl Into<String>) -> Self {
        DomainError::ResourceLookup { resource, message: message.into() }
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        DomainError::Conflict(message.into())
    }

    pub fn missing_file(message: impl Into<String>) -> Self {
        DomainError::MissingFile(message.into())
    }

    pub fn internal(err: impl Into<anyhow::Error>) -> Self {
        DomainError::Internal(err.into())
    }
}

pub type ApiResult<T> = Result<T, DomainError>;

impl From<TokenError> for DomainError {
    fn from(err: TokenError) -> Self {
        match err {
            TokenError::Malformed(reason) => DomainError::MalformedToken(reason),
            TokenError::InvalidSignature => DomainError::InvalidSignature,
            TokenError::Expired => DomainError::ExpiredToken,
            TokenError::Signing(reason) => DomainError::Configuration(reason),
        }
    }
}

impl From<HashError> for DomainError {
    fn from(err: HashError) -> Self {
        match err {
            HashError::InvalidInput(reason) => DomainError::Validation(reason.to_string()),
            other => DomainError::Internal(other.into()),
        }
    }
}

impl From<StoreError> for DomainError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Duplicate(ref key) => DomainError::Conflict(format!("{key} is already in use")),
            StoreError::NotFound(_) | StoreError::Unavailable(_) => DomainError::Storage {
                message: "A storage error occurred",
                source: err,
            },
        }
    }
}

impl From<ConfigurationError> for DomainError {
    fn from(err: ConfigurationError) -> Self {
        DomainError::Configuration(err.to_string())
    }
}

impl From<anyhow::Error> for DomainError {
    fn from(err: anyhow::Error) -> Self {
        DomainError::Internal(err)
    }
}

impl From<tokio::task::JoinError> for DomainError {
    fn from(err: tokio::task::JoinError) -> Self {
        DomainError::Internal(err.into())
    }
}

/// What the exception handler logs for a failed request.
///
/// Attached to the response as an extension so the detail survives the
/// conversion to a client-safe body.
#[derive(Debug, Clone)]
pub struct ErrorReport {
    pub kind: &'static str,
    pub status: StatusCode,
    pub detail: Option<String>,
}

impl From<&DomainError> for ErrorReport {
    fn from(err: &DomainError) -> Self {
        ErrorReport { kind: err.kind(), status: err.status_code(), detail: err.detail() }
    }
}

/// Render the `{"message": ...}` envelope with `status`.
pub fn message_response(status: StatusCode, message: impl Into<String>) -> Response {
    (status, Json(json!({ "message": message.into() }))).into_response()
}

impl IntoResponse for DomainError {
    fn into_response(self) -> Response {
        let report = ErrorReport::from(&self);
        let mut response = message_response(report.status, self.to_string());
        response.extensions_mut().insert(report);
        response
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[test]
    fn test_status_table() {
        let cases: Vec<(DomainError, u16)> = vec![
            (DomainError::missing_argument("email"), 419),
            (DomainError::validation("bad"), 400),
            (DomainError::authentication("no token"), 401),
            (DomainError::authorization("not yours"), 403),
            (DomainError::ExpiredToken, 401),
            (DomainError::InvalidSignature, 401),
            (DomainError::MalformedToken("x".into()), 401),
            (DomainError::not_found(ResourceKind::Budget, "missing"), 404),
            (DomainError::conflict("dup"), 409),
            (DomainError::missing_file("No file selected for uploading"), 400),
            (DomainError::PayloadTooLarge("Request body is too large".into()), 413),
            (StoreError::Unavailable("down".into()).into(), 500),
            (DomainError::Configuration("keys".into()), 500),
            (DomainError::internal(anyhow::anyhow!("boom")), 500),
        ];

        for (err, status) in cases {
            assert_eq!(err.status_code().as_u16(), status, "{}", err.kind());
        }
    }

    #[test]
    fn test_missing_argument_message() {
        assert_eq!(DomainError::missing_argument("email").to_string(), "No email argument provided");
    }

    #[test]
    fn test_token_errors_map_to_token_kinds() {
        assert_eq!(DomainError::from(TokenError::Expired).kind(), "ExpiredTokenError");
        assert_eq!(DomainError::from(TokenError::InvalidSignature).kind(), "InvalidSignatureError");
        assert_eq!(DomainError::from(TokenError::Malformed("x".into())).kind(), "MalformedTokenError");
    }

    #[test]
    fn test_store_duplicate_is_conflict() {
        let err: DomainError = StoreError::Duplicate("email a@b.com".into()).into();
        assert_eq!(err.status_code(), StatusCode::CONFLICT);
        assert_eq!(err.to_string(), "email a@b.com is already in use");
    }

    #[tokio::test]
    async fn test_body_is_message_only() {
        let response = DomainError::not_found(ResourceKind::User, "user a@b.com does not exist").into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(body_json(response).await, json!({ "message": "user a@b.com does not exist" }));
    }

    #[tokio::test]
    async fn test_internal_detail_not_leaked() {
        let err: DomainError = StoreError::Unavailable("connection refused at 10.0.0.7:5432".into()).into();
        let response = err.into_response();

        let report = response.extensions().get::<ErrorReport>().cloned().unwrap();
        assert_eq!(report.kind, "StorageError");
        assert!(report.detail.unwrap().contains("10.0.0.7"));

        let body = body_json(response).await;
        assert_eq!(body, json!({ "message": "A storage error occurred" }));
    }

    #[tokio::test]
    async fn test_argument_status_is_419() {
        let response = DomainError::missing_argument("password").into_response();
        assert_eq!(response.status().as_u16(), 419);
    }
}
