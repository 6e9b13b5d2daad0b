//! Error types for Roster.

/// Errors that can occur while reading or resolving access lists.
///
/// `Locked` is a specialisation of access denial: [`Error::is_access_denied`]
/// matches it, and [`Error::is_locked`] matches nothing else.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// A named entity does not exist in the backing store.
    #[error("{kind} '{name}' not found")]
    NotFound {
        /// Entity kind ("access list", "lock", ...)
        kind: &'static str,
        /// Name that was looked up
        name: String,
    },

    /// The principal does not hold the requested assignment.
    #[error("access denied: {message}")]
    AccessDenied {
        /// Why access was denied
        message: String,
    },

    /// The principal is the target of at least one lock.
    #[error("access denied: user '{principal}' is currently locked")]
    Locked {
        /// Locked principal name
        principal: String,
    },

    /// A proposed hierarchy edit was rejected.
    #[error("Validation error: {message}")]
    Validation {
        /// What is wrong with the edit
        message: String,
    },

    /// Storage or lock backend failure.
    #[error("Backend error: {message}")]
    Backend {
        /// Human-readable error message
        message: String,
        /// Source error if available
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Configuration error
    #[error("Configuration error: {message}")]
    Config {
        /// What configuration is problematic
        message: String,
    },

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// TOML parse error
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),
}

/// Convenience `Result` type alias for Roster operations.
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Returns `true` if a named entity was missing.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::NotFound { .. })
    }

    /// Returns `true` for any access denial, including a locked principal.
    pub fn is_access_denied(&self) -> bool {
        matches!(self, Error::AccessDenied { .. } | Error::Locked { .. })
    }

    /// Returns `true` only when the denial was caused by a lock.
    ///
    /// Callers treat this as terminal: retrying will not help until the lock
    /// is lifted.
    pub fn is_locked(&self) -> bool {
        matches!(self, Error::Locked { .. })
    }

    /// Returns whether this error is retryable.
    pub fn is_retryable(&self) -> bool {
        match self {
            Error::Backend { .. } => true,
            Error::Io(_) => true,
            Error::NotFound { .. } => false,
            Error::AccessDenied { .. } => false,
            Error::Locked { .. } => false,
            Error::Validation { .. } => false,
            Error::Config { .. } => false,
            Error::Toml(_) => false,
        }
    }

    /// Creates a not-found error.
    pub fn not_found<S: Into<String>>(kind: &'static str, name: S) -> Self {
        Error::NotFound {
            kind,
            name: name.into(),
        }
    }

    /// Creates an access-denied error.
    pub fn access_denied<S: Into<String>>(message: S) -> Self {
        Error::AccessDenied {
            message: message.into(),
        }
    }

    /// Creates a locked-principal error.
    pub fn locked<S: Into<String>>(principal: S) -> Self {
        Error::Locked {
            principal: principal.into(),
        }
    }

    /// Creates a validation error.
    pub fn validation<S: Into<String>>(message: S) -> Self {
        Error::Validation {
            message: message.into(),
        }
    }

    /// Creates a backend error with a message.
    pub fn backend<S: Into<String>>(message: S) -> Self {
        Error::Backend {
            message: message.into(),
            source: None,
        }
    }

    /// Creates a backend error with a message and source error.
    pub fn backend_with_source<S, E>(message: S, source: E) -> Self
    where
        S: Into<String>,
        E: std::error::Error + Send + Sync + 'static,
    {
        Error::Backend {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Creates a new configuration error.
    pub fn config<S: Into<String>>(message: S) -> Self {
        Error::Config {
            message: message.into(),
        }
    }
}
