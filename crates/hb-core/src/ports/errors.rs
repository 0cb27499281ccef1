use thiserror::Error;

/// Failures of the persistent key-value store.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage read failed for `{key}`: {reason}")]
    Read { key: String, reason: String },

    #[error("storage write failed for `{key}`: {reason}")]
    Write { key: String, reason: String },

    #[error("storage serialization failed for `{key}`: {reason}")]
    Serialize { key: String, reason: String },
}

impl StorageError {
    pub fn read(key: &str, reason: impl ToString) -> Self {
        Self::Read {
            key: key.to_string(),
            reason: reason.to_string(),
        }
    }

    pub fn write(key: &str, reason: impl ToString) -> Self {
        Self::Write {
            key: key.to_string(),
            reason: reason.to_string(),
        }
    }
}

/// Failures of the API boundary.
///
/// The display text is what the screen layer shows the user, so
/// `Status` renders the server's own message when it sent one.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("{message}")]
    Status { status: u16, message: String },

    #[error("network error: {0}")]
    Transport(String),

    #[error("unexpected response: {0}")]
    Decode(String),

    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl ApiError {
    /// Build a status error, falling back to `API Error: <status>` when
    /// the server gave no usable message.
    pub fn from_status(status: u16, server_message: Option<String>) -> Self {
        let message = server_message
            .map(|m| m.trim().to_string())
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| format!("API Error: {status}"));
        Self::Status { status, message }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::InvalidCredentials) || matches!(self.status(), Some(401 | 403))
    }
}
