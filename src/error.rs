//! Error types for the contact store.

/// Top-level error type for the service.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Database error: {0}")]
    Database(#[from] DatabaseError),

    #[error("Contact error: {0}")]
    Contact(#[from] ContactError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-related errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required configuration: {key}. {hint}")]
    MissingRequired { key: String, hint: String },

    #[error("Invalid configuration value for {key}: {message}")]
    InvalidValue { key: String, message: String },
}

/// Database-related errors.
#[derive(Debug, thiserror::Error)]
pub enum DatabaseError {
    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Query failed: {0}")]
    Query(String),

    #[error("Constraint violation: {0}")]
    Constraint(String),

    #[error("Migration failed: {0}")]
    Migration(String),
}

const SQLITE_CONSTRAINT: std::ffi::c_int = 19;

impl DatabaseError {
    /// Classify a libsql error raised by a statement.
    ///
    /// SQLite reports NOT NULL, CHECK and PRIMARY KEY failures as
    /// `SQLITE_CONSTRAINT` (extended codes share the low byte). Remote
    /// servers only relay the message text.
    pub fn from_statement(op: &str, err: libsql::Error) -> Self {
        let is_constraint = match &err {
            libsql::Error::SqliteFailure(code, _) => code & 0xff == SQLITE_CONSTRAINT,
            other => other.to_string().contains("constraint failed"),
        };
        if is_constraint {
            Self::Constraint(format!("{op}: {err}"))
        } else {
            Self::Query(format!("{op}: {err}"))
        }
    }
}

/// Why a contact payload was rejected.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Missing required field(s): {}", .0.join(", "))]
    MissingFields(Vec<&'static str>),

    #[error("Invalid request body: {0}")]
    MalformedBody(String),

    #[error("Contact rejected by storage")]
    Rejected,
}

/// Failures of the four contact operations, as seen by callers.
#[derive(Debug, thiserror::Error)]
pub enum ContactError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Contact {id} not found")]
    NotFound { id: String },

    #[error("Storage unavailable")]
    StorageUnavailable(#[source] DatabaseError),
}

impl From<DatabaseError> for ContactError {
    fn from(err: DatabaseError) -> Self {
        match err {
            DatabaseError::Constraint(_) => Self::Validation(ValidationError::Rejected),
            other => Self::StorageUnavailable(other),
        }
    }
}

/// Result type alias for the service.
pub type Result<T> = std::result::Result<T, Error>;
