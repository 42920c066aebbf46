//! Error types for onde-chat

use thiserror::Error;

/// Failure signal from the assistant collaborator.
///
/// These never escape the engine: both variants are translated into fixed
/// conversational replies, and the panel returns to accepting input.
#[derive(Debug, Clone, Error)]
pub enum AskError {
    /// The assistant answered with a non-success status.
    #[error("assistant returned status {0}")]
    Status(u16),

    /// The assistant could not be reached at all.
    #[error("assistant unreachable: {0}")]
    Unreachable(String),
}
