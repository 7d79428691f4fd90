use std::fmt::{Display, Formatter};

/// Result type used by the engine-link crate.
pub type Result<T> = std::result::Result<T, LinkError>;

/// Errors produced by the engine connection and wire codec.
#[derive(Debug)]
pub enum LinkError {
    Connect {
        url: String,
        source: tungstenite::Error,
    },
    Socket(tungstenite::Error),
    Encode(serde_json::Error),
}

impl Display for LinkError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Connect { url, source } => {
                write!(f, "engine connection failed: {url} ({source})")
            }
            Self::Socket(err) => write!(f, "engine socket error: {err}"),
            Self::Encode(err) => write!(f, "outbound message encoding failed: {err}"),
        }
    }
}

impl std::error::Error for LinkError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Connect { source, .. } => Some(source),
            Self::Socket(err) => Some(err),
            Self::Encode(err) => Some(err),
        }
    }
}

impl From<tungstenite::Error> for LinkError {
    fn from(value: tungstenite::Error) -> Self {
        Self::Socket(value)
    }
}

impl From<serde_json::Error> for LinkError {
    fn from(value: serde_json::Error) -> Self {
        Self::Encode(value)
    }
}
