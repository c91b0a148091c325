use thiserror::Error;

#[derive(Error, Debug)]
pub enum BookingError {
    #[error("User {id} not found")]
    UserNotFound { id: String },

    #[error("Property {id} not found")]
    PropertyNotFound { id: String },

    #[error("Booking {id} not found")]
    BookingNotFound { id: String },

    #[error("Invalid date: {message}")]
    InvalidDate { message: String },

    #[error("Entity with ID {id} already exists")]
    DuplicateId { id: String },

    #[error("Entity with ID {id} not found")]
    NotFound { id: String },

    #[error("Invalid entity: {message}")]
    InvalidEntity { message: String },

    #[error("Serialization failed: {message}")]
    SerializationFailed { message: String },

    #[error("Invalid nightly price: {price}")]
    InvalidPrice { price: f64 },

    #[error("Status transition {from} -> {to} is not allowed")]
    InvalidStatusTransition { from: String, to: String },

    #[error("Failed to {action}: {source}")]
    Operation {
        action: String,
        #[source]
        source: Box<BookingError>,
    },

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid configuration value for '{field}': {value} ({reason})")]
    InvalidConfigValue {
        field: String,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    NotFound,
    Validation,
    Storage,
    Serialization,
    Configuration,
}

impl BookingError {
    pub fn serialization(message: impl Into<String>) -> Self {
        BookingError::SerializationFailed {
            message: message.into(),
        }
    }

    pub fn invalid_date(message: impl Into<String>) -> Self {
        BookingError::InvalidDate {
            message: message.into(),
        }
    }

    /// Wraps a lower-level failure into a generic operation failure.
    ///
    /// Date validation and the `*NotFound` kinds are returned unchanged so
    /// callers can still branch on them.
    pub fn wrap(action: &str, error: BookingError) -> Self {
        match error {
            BookingError::InvalidDate { .. }
            | BookingError::UserNotFound { .. }
            | BookingError::PropertyNotFound { .. }
            | BookingError::BookingNotFound { .. } => error,
            other => {
                tracing::warn!("Failed to {}: {}", action, other);
                BookingError::Operation {
                    action: action.to_string(),
                    source: Box::new(other),
                }
            }
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            BookingError::UserNotFound { .. }
                | BookingError::PropertyNotFound { .. }
                | BookingError::BookingNotFound { .. }
                | BookingError::NotFound { .. }
        )
    }

    /// The innermost error, looking through `Operation` wrappers.
    pub fn root_cause(&self) -> &BookingError {
        match self {
            BookingError::Operation { source, .. } => source.root_cause(),
            other => other,
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self.root_cause() {
            BookingError::UserNotFound { .. }
            | BookingError::PropertyNotFound { .. }
            | BookingError::BookingNotFound { .. }
            | BookingError::NotFound { .. } => ErrorCategory::NotFound,
            BookingError::InvalidDate { .. }
            | BookingError::InvalidPrice { .. }
            | BookingError::InvalidStatusTransition { .. }
            | BookingError::InvalidEntity { .. } => ErrorCategory::Validation,
            BookingError::DuplicateId { .. } => ErrorCategory::Storage,
            BookingError::SerializationFailed { .. } => ErrorCategory::Serialization,
            BookingError::ConfigError { .. } | BookingError::InvalidConfigValue { .. } => {
                ErrorCategory::Configuration
            }
            BookingError::Operation { .. } => ErrorCategory::Storage,
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self.category() {
            ErrorCategory::NotFound => format!("Nothing found: {}", self),
            ErrorCategory::Validation => format!("Request rejected: {}", self),
            ErrorCategory::Storage => format!("Storage problem: {}", self),
            ErrorCategory::Serialization => format!("Could not read or write data file: {}", self),
            ErrorCategory::Configuration => format!("Check your configuration: {}", self),
        }
    }
}

pub type Result<T> = std::result::Result<T, BookingError>;
