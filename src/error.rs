use std::error::Error;
use std::fmt;

/// Authentication and authorization failures.
///
/// Each variant merges several underlying causes; a
/// caller cannot tell them apart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthError {
    /// Unknown email, wrong password, or wrong claimed role at login
    InvalidCredentials,
    /// Missing, malformed, forged or expired token, or a token whose subject
    /// no longer resolves to an active principal
    InvalidToken,
    /// Authentic principal without the required role
    Forbidden,
}

impl fmt::Display for AuthError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidCredentials => write!(f, "Invalid credentials"),
            Self::InvalidToken => write!(f, "Could not validate credentials"),
            Self::Forbidden => write!(f, "Access denied: insufficient role"),
        }
    }
}

impl Error for AuthError {}

#[derive(Debug)]
pub enum SpectrumError {
    // Auth errors
    Auth(AuthError),
    MalformedDigest(String),

    // Storage errors
    StorageError(String),
    NotFound(String),
    Conflict(String),

    // Validation errors
    ValidationError(String),

    // System errors
    SystemError(String),

    // Configuration errors
    ConfigError(String),
}

impl fmt::Display for SpectrumError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Auth(err) => write!(f, "{}", err),
            Self::MalformedDigest(msg) => write!(f, "Stored password digest is malformed: {}", msg),
            Self::StorageError(msg) => write!(f, "Storage error: {}", msg),
            Self::NotFound(msg) => write!(f, "{}", msg),
            Self::Conflict(msg) => write!(f, "{}", msg),
            Self::ValidationError(msg) => write!(f, "Validation error: {}", msg),
            Self::SystemError(msg) => write!(f, "System error: {}", msg),
            Self::ConfigError(msg) => write!(f, "Configuration error: {}", msg),
        }
    }
}

impl Error for SpectrumError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Auth(err) => Some(err),
            _ => None,
        }
    }
}

impl From<AuthError> for SpectrumError {
    fn from(err: AuthError) -> Self {
        SpectrumError::Auth(err)
    }
}

impl warp::reject::Reject for SpectrumError {}

// Generic result type for SpectrumConnect
pub type Result<T> = std::result::Result<T, SpectrumError>;
