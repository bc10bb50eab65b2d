use thiserror::Error;

/// Failure text the Bot API returns when a second poller competes for the
/// same bot token.
const POLLING_CONFLICT_MARKERS: &[&str] = &[
    "terminated by other getUpdates request",
    "TerminatedByOtherGetUpdates",
];

/// Typed error hierarchy for lookout.
///
/// Use at module boundaries (config validation, administrator delivery,
/// profile-data calls, transport intake). Internal/leaf functions can keep
/// using `anyhow::Result`; the `Internal` variant converts via `?`.
#[derive(Debug, Error)]
pub enum LookoutError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Delivery failed: {0}")]
    Delivery(String),

    #[error("Profile source error: {0}")]
    Source(String),

    #[error("Update intake conflict: {0}")]
    Conflict(String),

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl LookoutError {
    /// Whether this error must halt update intake. Only a competing consumer
    /// of the inbound channel qualifies; everything else is handled locally.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::Conflict(_))
    }

    /// Classify a raw transport failure message.
    pub fn from_transport_text(text: &str) -> Self {
        if is_polling_conflict(text) {
            Self::Conflict(text.to_string())
        } else {
            Self::Internal(anyhow::anyhow!("{}", text))
        }
    }
}

/// Returns true when the failure text reports another instance polling the
/// same token.
pub fn is_polling_conflict(text: &str) -> bool {
    POLLING_CONFLICT_MARKERS
        .iter()
        .any(|marker| text.contains(marker))
}
