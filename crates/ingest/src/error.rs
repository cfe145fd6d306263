use thiserror::Error;

pub type Result<T> = std::result::Result<T, IngestError>;

#[derive(Error, Debug)]
pub enum IngestError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("HTTP error: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("{location} responded with status {status}")]
    Transport { location: String, status: u16 },

    #[error("Parse error: {0}")]
    ParseError(#[from] serde_json::Error),

    #[error("Fallback unavailable: {0}")]
    FallbackUnavailable(String),
}

/// Operator-facing classification of a load failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    Transport,
    Parse,
    FallbackExhaustion,
}

impl IngestError {
    #[must_use]
    pub fn kind(&self) -> FailureKind {
        match self {
            Self::IoError(_) | Self::HttpError(_) | Self::Transport { .. } => FailureKind::Transport,
            Self::ParseError(_) => FailureKind::Parse,
            Self::FallbackUnavailable(_) => FailureKind::FallbackExhaustion,
        }
    }
}

impl FailureKind {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Transport => "transport",
            Self::Parse => "parse",
            Self::FallbackExhaustion => "fallback_exhaustion",
        }
    }
}
