use thiserror::Error;

/// A remote table operation failed. Carries whatever the backend or the
/// transport reported.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum RemoteError {
    #[error("{message} (HTTP {status}{})", code_suffix(.code))]
    Api {
        status: u16,
        code: Option<String>,
        message: String,
        details: Option<String>,
        hint: Option<String>,
    },

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Unexpected response body: {0}")]
    Decode(String),
}

impl RemoteError {
    /// HTTP status of a backend rejection, if the request got that far.
    pub fn status(&self) -> Option<u16> {
        match self {
            RemoteError::Api { status, .. } => Some(*status),
            _ => None,
        }
    }
}

fn code_suffix(code: &Option<String>) -> String {
    code.as_deref()
        .map(|c| format!(", code {}", c))
        .unwrap_or_default()
}

impl From<reqwest::Error> for RemoteError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            RemoteError::Decode(err.to_string())
        } else {
            RemoteError::Transport(err.to_string())
        }
    }
}
