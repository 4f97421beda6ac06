use thiserror::Error;

/// Fallback when an error body is not JSON at all.
pub const UNKNOWN_ERROR: &str = "未知錯誤";
/// Fallback when an error body parses but carries no usable `detail`.
pub const REQUEST_FAILED: &str = "請求失敗";
pub const NETWORK_ERROR: &str = "網路錯誤，請檢查連線";

/// Normalized failure raised by the API client.
///
/// Every call either yields a decoded payload or one of these two kinds,
/// so callers only ever branch on "the server said no" versus "we never got
/// a usable answer".
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ApiError {
    #[error("{message}")]
    Http { status: u16, message: String },

    #[error("網路錯誤，請檢查連線")]
    Network { reason: String },
}

impl ApiError {
    pub fn network(reason: impl ToString) -> Self {
        ApiError::Network {
            reason: reason.to_string(),
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Http { status, .. } => Some(*status),
            ApiError::Network { .. } => None,
        }
    }

    /// Text suitable for showing to the end user.
    pub fn user_message(&self) -> String {
        self.to_string()
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(e: reqwest::Error) -> Self {
        ApiError::network(e)
    }
}

/// Locally refused modal actions. None of these ever reach the network.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ModalError {
    #[error("No registration session is open")]
    NotOpen,

    #[error("Required field is empty: {0}")]
    MissingField(&'static str),

    #[error("Participants must be a whole number between 1 and 5, got {0:?}")]
    InvalidParticipants(String),

    #[error("A submission is already in flight")]
    SubmissionInFlight,

    #[error("The form cannot be edited in the current state")]
    NotEditable,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid value for {key}: {value}")]
    InvalidValue { key: &'static str, value: String },

    #[error("Failed to build http client: {0}")]
    HttpClient(#[from] reqwest::Error),
}
