//! Typed error handling for the course library server
//!
//! This module provides the error hierarchy shared by the representation
//! pipeline and the HTTP layer, so callers can match on the failure category
//! instead of dealing with generic `anyhow::Error` values.
//!
//! # Error Categories
//!
//! - [`ValidationError`]: client-input faults (unknown shaping field, unknown
//!   sort property, unparseable media type)
//! - [`ConfigError`]: host-programming faults (missing property mapping,
//!   unreadable configuration)
//! - [`EntityError`]: resource lookups reported by the repository layer
//! - [`RequestError`]: malformed requests detected by the transport layer
//!
//! # Example
//!
//! ```rust,ignore
//! use course_library::prelude::*;
//!
//! match build_sort_instructions("name desc,rating", table) {
//!     Ok(instructions) => println!("{:?}", instructions),
//!     Err(ValidationError::UnknownSortProperty { property }) => {
//!         println!("cannot sort on {}", property);
//!     }
//!     Err(e) => eprintln!("Other error: {}", e),
//! }
//! ```

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use std::fmt;
use uuid::Uuid;

/// The main error type for the course library server
#[derive(Debug)]
pub enum ApiError {
    /// Client input could not be validated
    Validation(ValidationError),

    /// Host configuration is inconsistent
    Config(ConfigError),

    /// Resource-level failures
    Entity(EntityError),

    /// HTTP/Request errors
    Request(RequestError),

    /// Internal errors (should not happen in normal operation)
    Internal(String),
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::Validation(e) => write!(f, "{}", e),
            ApiError::Config(e) => write!(f, "{}", e),
            ApiError::Entity(e) => write!(f, "{}", e),
            ApiError::Request(e) => write!(f, "{}", e),
            ApiError::Internal(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for ApiError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ApiError::Validation(e) => Some(e),
            ApiError::Config(e) => Some(e),
            ApiError::Entity(e) => Some(e),
            ApiError::Request(e) => Some(e),
            ApiError::Internal(_) => None,
        }
    }
}

/// Error response structure for HTTP responses
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error code for programmatic handling
    pub code: String,
    /// Human-readable error message
    pub message: String,
    /// Optional additional details
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl ApiError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Entity(e) => e.status_code(),
            ApiError::Request(e) => e.status_code(),
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the error code for this error
    pub fn error_code(&self) -> &'static str {
        match self {
            ApiError::Validation(e) => e.error_code(),
            ApiError::Config(_) => "CONFIG_ERROR",
            ApiError::Entity(e) => e.error_code(),
            ApiError::Request(e) => e.error_code(),
            ApiError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Convert to an error response
    pub fn to_response(&self) -> ErrorResponse {
        ErrorResponse {
            code: self.error_code().to_string(),
            message: self.to_string(),
            details: self.details(),
        }
    }

    fn details(&self) -> Option<serde_json::Value> {
        match self {
            ApiError::Validation(ValidationError::UnknownField { field, shape }) => {
                Some(serde_json::json!({ "field": field, "shape": shape }))
            }
            ApiError::Validation(ValidationError::UnknownSortProperty { property }) => {
                Some(serde_json::json!({ "property": property }))
            }
            ApiError::Validation(ValidationError::InvalidMediaType { value, .. }) => {
                Some(serde_json::json!({ "media_type": value }))
            }
            ApiError::Entity(EntityError::NotFound { entity_type, id }) => {
                Some(serde_json::json!({
                    "entity_type": entity_type,
                    "id": id.to_string()
                }))
            }
            ApiError::Entity(EntityError::CollectionIncomplete { entity_type, missing }) => {
                Some(serde_json::json!({
                    "entity_type": entity_type,
                    "missing": missing.iter().map(Uuid::to_string).collect::<Vec<_>>()
                }))
            }
            _ => None,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        } else {
            tracing::debug!(error = %self, "request rejected");
        }
        let body = Json(self.to_response());
        (status, body).into_response()
    }
}

// =============================================================================
// Validation Errors
// =============================================================================

/// Client-input faults detected before any repository access
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// A requested shaping field is not declared on the output shape
    UnknownField { field: String, shape: String },

    /// A sort clause names a property with no mapping entry
    UnknownSortProperty { property: String },

    /// The requested media type does not follow the media type grammar
    InvalidMediaType { value: String, message: String },

    /// A request value could not be interpreted
    InvalidValue { field: String, message: String },
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::UnknownField { field, shape } => {
                write!(f, "Property '{}' wasn't found on type '{}'", field, shape)
            }
            ValidationError::UnknownSortProperty { property } => {
                write!(f, "Key mapping for '{}' was not found", property)
            }
            ValidationError::InvalidMediaType { value, message } => {
                write!(f, "'{}' is not a valid media type: {}", value, message)
            }
            ValidationError::InvalidValue { field, message } => {
                write!(f, "Invalid value for '{}': {}", field, message)
            }
        }
    }
}

impl std::error::Error for ValidationError {}

impl ValidationError {
    pub fn error_code(&self) -> &'static str {
        match self {
            ValidationError::UnknownField { .. } => "UNKNOWN_FIELD",
            ValidationError::UnknownSortProperty { .. } => "UNKNOWN_SORT_PROPERTY",
            ValidationError::InvalidMediaType { .. } => "INVALID_MEDIA_TYPE",
            ValidationError::InvalidValue { .. } => "VALIDATION_ERROR",
        }
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        ApiError::Validation(err)
    }
}

// =============================================================================
// Config Errors
// =============================================================================

/// Errors related to host configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// No mapping table was registered for a (source, destination) pair
    MissingMapping { source: String, destination: String },

    /// A mapping entry declares no physical properties
    EmptyMapping { logical_name: String },

    /// Failed to parse configuration
    ParseError {
        file: Option<String>,
        message: String,
    },

    /// Invalid value in configuration
    InvalidValue {
        field: String,
        value: String,
        message: String,
    },

    /// Configuration file not found
    FileNotFound { path: String },

    /// IO error while reading configuration
    IoError { message: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::MissingMapping {
                source,
                destination,
            } => {
                write!(
                    f,
                    "Cannot find exact property mapping instance for <{}, {}>",
                    source, destination
                )
            }
            ConfigError::EmptyMapping { logical_name } => {
                write!(
                    f,
                    "Property mapping '{}' must target at least one property",
                    logical_name
                )
            }
            ConfigError::ParseError { file, message } => {
                if let Some(file) = file {
                    write!(f, "Failed to parse config file '{}': {}", file, message)
                } else {
                    write!(f, "Failed to parse config: {}", message)
                }
            }
            ConfigError::InvalidValue {
                field,
                value,
                message,
            } => {
                write!(
                    f,
                    "Invalid value '{}' for field '{}': {}",
                    value, field, message
                )
            }
            ConfigError::FileNotFound { path } => {
                write!(f, "Configuration file not found: {}", path)
            }
            ConfigError::IoError { message } => {
                write!(f, "IO error: {}", message)
            }
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<ConfigError> for ApiError {
    fn from(err: ConfigError) -> Self {
        ApiError::Config(err)
    }
}

// =============================================================================
// Entity Errors
// =============================================================================

/// Errors related to resource lookups
#[derive(Debug)]
pub enum EntityError {
    /// Resource was not found
    NotFound { entity_type: String, id: Uuid },

    /// Some identities of a requested collection do not resolve
    CollectionIncomplete {
        entity_type: String,
        missing: Vec<Uuid>,
    },

    /// Repository operation failed
    OperationFailed {
        entity_type: String,
        operation: String,
        message: String,
    },
}

impl fmt::Display for EntityError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntityError::NotFound { entity_type, id } => {
                write!(f, "{} with id '{}' not found", entity_type, id)
            }
            EntityError::CollectionIncomplete {
                entity_type,
                missing,
            } => {
                write!(f, "{} {} of the collection not found", missing.len(), entity_type)
            }
            EntityError::OperationFailed {
                entity_type,
                operation,
                message,
            } => {
                write!(f, "Failed to {} {}: {}", operation, entity_type, message)
            }
        }
    }
}

impl std::error::Error for EntityError {}

impl EntityError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            EntityError::NotFound { .. } => StatusCode::NOT_FOUND,
            EntityError::CollectionIncomplete { .. } => StatusCode::NOT_FOUND,
            EntityError::OperationFailed { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            EntityError::NotFound { .. } => "ENTITY_NOT_FOUND",
            EntityError::CollectionIncomplete { .. } => "ENTITY_NOT_FOUND",
            EntityError::OperationFailed { .. } => "ENTITY_OPERATION_FAILED",
        }
    }
}

impl From<EntityError> for ApiError {
    fn from(err: EntityError) -> Self {
        ApiError::Entity(err)
    }
}

// =============================================================================
// Request Errors
// =============================================================================

/// Errors related to HTTP requests
#[derive(Debug)]
pub enum RequestError {
    /// Invalid entity ID format
    InvalidEntityId { id: String },

    /// Invalid request body
    InvalidBody { message: String },

    /// The request body was empty where content is required
    EmptyBody,
}

impl fmt::Display for RequestError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RequestError::InvalidEntityId { id } => {
                write!(f, "Invalid entity ID format: '{}'", id)
            }
            RequestError::InvalidBody { message } => {
                write!(f, "Invalid request body: {}", message)
            }
            RequestError::EmptyBody => write!(f, "Request body must not be empty"),
        }
    }
}

impl std::error::Error for RequestError {}

impl RequestError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            RequestError::InvalidEntityId { .. } => StatusCode::BAD_REQUEST,
            RequestError::InvalidBody { .. } => StatusCode::BAD_REQUEST,
            RequestError::EmptyBody => StatusCode::BAD_REQUEST,
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            RequestError::InvalidEntityId { .. } => "INVALID_ENTITY_ID",
            RequestError::InvalidBody { .. } => "INVALID_BODY",
            RequestError::EmptyBody => "EMPTY_BODY",
        }
    }
}

impl From<RequestError> for ApiError {
    fn from(err: RequestError) -> Self {
        ApiError::Request(err)
    }
}

// =============================================================================
// Conversions from external errors
// =============================================================================

/// Repository failures arrive as `anyhow::Error`
impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        match err.downcast::<ConfigError>() {
            Ok(config) => ApiError::Config(config),
            Err(err) => ApiError::Internal(err.to_string()),
        }
    }
}

/// A specialized Result type for course library operations
pub type ApiResult<T> = Result<T, ApiError>;
