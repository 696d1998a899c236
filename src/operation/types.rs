//! Operation state and outcomes.

use crate::config::reasons;
use crate::slots::SlotRole;
use std::fmt;
use std::sync::Arc;

/// The two workflows the service offers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperationKind {
    Embed,
    Extract,
}

impl OperationKind {
    /// Reason shown when the service gives no usable message.
    pub fn fallback_reason(&self) -> &'static str {
        match self {
            OperationKind::Embed => reasons::EMBED_FAILED,
            OperationKind::Extract => reasons::EXTRACT_FAILED,
        }
    }

    pub(crate) fn index(&self) -> usize {
        match self {
            OperationKind::Embed => 0,
            OperationKind::Extract => 1,
        }
    }
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OperationKind::Embed => f.write_str("Embed"),
            OperationKind::Extract => f.write_str("Extract"),
        }
    }
}

/// Coarse lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperationStatus {
    Idle,
    InFlight,
    Succeeded,
    Failed,
}

/// Why an operation failed. Every variant renders to a display string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureReason {
    /// A required slot was empty; the service was not contacted.
    MissingInput(SlotRole),
    /// The request did not complete.
    Transport(String),
    /// The service reported an error message.
    Remote(String),
    /// The response could not be decoded.
    Malformed(OperationKind),
}

impl FailureReason {
    /// Text shown to the user.
    pub fn message(&self) -> String {
        match self {
            FailureReason::MissingInput(role) => format!("{} file is required", role.label()),
            FailureReason::Transport(detail) => {
                format!("{}: {}", reasons::NETWORK_ERROR, detail)
            }
            FailureReason::Remote(message) => message.clone(),
            FailureReason::Malformed(kind) => kind.fallback_reason().to_string(),
        }
    }
}

impl fmt::Display for FailureReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message())
    }
}

/// Successful embed: where to fetch the stego file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmbedResult {
    pub download_url: String,
    /// Server-side name of the stego file, when reported.
    pub filename: Option<String>,
}

/// Successful extract: the recovered secret held in memory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedPayload {
    /// Name to save the payload under. Never contains a path separator.
    pub suggested_filename: String,
    content: Arc<[u8]>,
}

impl ExtractedPayload {
    pub fn new(suggested_filename: impl Into<String>, content: Vec<u8>) -> Self {
        Self {
            suggested_filename: suggested_filename.into(),
            content: content.into(),
        }
    }

    pub fn content(&self) -> &[u8] {
        &self.content
    }

    pub fn size_bytes(&self) -> u64 {
        self.content.len() as u64
    }
}

/// Result carried by a succeeded operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OperationResult {
    Embedded(EmbedResult),
    Extracted(ExtractedPayload),
}

/// Lifecycle state with its payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OperationState {
    Idle,
    InFlight,
    Succeeded(OperationResult),
    Failed(FailureReason),
}

/// One embed or extract workflow instance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Operation {
    pub kind: OperationKind,
    /// Submission number within this kind; 0 for the initial idle state.
    pub sequence: u64,
    pub state: OperationState,
}

impl Operation {
    /// A fresh operation that has never been submitted.
    pub fn idle(kind: OperationKind) -> Self {
        Self {
            kind,
            sequence: 0,
            state: OperationState::Idle,
        }
    }

    pub fn status(&self) -> OperationStatus {
        match self.state {
            OperationState::Idle => OperationStatus::Idle,
            OperationState::InFlight => OperationStatus::InFlight,
            OperationState::Succeeded(_) => OperationStatus::Succeeded,
            OperationState::Failed(_) => OperationStatus::Failed,
        }
    }

    /// Succeeded or Failed.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self.state,
            OperationState::Succeeded(_) | OperationState::Failed(_)
        )
    }

    pub fn result(&self) -> Option<&OperationResult> {
        match &self.state {
            OperationState::Succeeded(result) => Some(result),
            _ => None,
        }
    }

    pub fn failure(&self) -> Option<&FailureReason> {
        match &self.state {
            OperationState::Failed(reason) => Some(reason),
            _ => None,
        }
    }
}
