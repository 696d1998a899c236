//! Turning operations into user-visible results.
//!
//! Everything here is derived from an [`Operation`]; nothing touches the
//! network. Saving an extracted payload is the only side effect and happens
//! only when asked for.

mod download;
mod preview;
mod share;

pub use download::save_payload;
pub use preview::{escape_markup, is_text_previewable, PayloadPreview};
pub use share::ShareLinks;

use crate::operation::{ExtractedPayload, Operation, OperationResult, OperationState};
use crate::slots::SlotRole;

/// Toast severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Success,
    Info,
    Danger,
}

impl NoticeLevel {
    pub fn class_name(&self) -> &'static str {
        match self {
            NoticeLevel::Success => "success",
            NoticeLevel::Info => "info",
            NoticeLevel::Danger => "danger",
        }
    }
}

/// Transient notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn new(level: NoticeLevel, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
        }
    }

    /// Notice for a slot that was just emptied.
    pub fn slot_cleared(role: SlotRole) -> Self {
        Self::new(NoticeLevel::Info, format!("{} file removed", role.label()))
    }
}

/// What the user sees for an operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Presentation {
    /// Nothing submitted yet.
    Idle,
    /// Request outstanding; submit control disabled.
    Busy,
    /// Stego file ready for download and sharing.
    Embedded {
        download_url: String,
        share: ShareLinks,
    },
    /// Secret recovered and held in memory.
    Extracted {
        preview: PayloadPreview,
        payload: ExtractedPayload,
    },
    /// Inline error message; no artifact.
    Failed { reason: String },
}

impl Presentation {
    /// Toast to raise when this presentation is first shown.
    pub fn notice(&self) -> Option<Notice> {
        match self {
            Presentation::Embedded { .. } => Some(Notice::new(
                NoticeLevel::Success,
                "Stego file created successfully",
            )),
            Presentation::Extracted { .. } => Some(Notice::new(
                NoticeLevel::Success,
                "Secret extracted successfully",
            )),
            Presentation::Failed { reason } => Some(Notice::new(NoticeLevel::Danger, reason.clone())),
            Presentation::Idle | Presentation::Busy => None,
        }
    }

    /// Whether the submit control should be disabled.
    pub fn is_busy(&self) -> bool {
        matches!(self, Presentation::Busy)
    }
}

/// Build the presentation for `operation`.
pub fn present(operation: &Operation) -> Presentation {
    match &operation.state {
        OperationState::Idle => Presentation::Idle,
        OperationState::InFlight => Presentation::Busy,
        OperationState::Failed(reason) => Presentation::Failed {
            reason: reason.message(),
        },
        OperationState::Succeeded(OperationResult::Embedded(result)) => Presentation::Embedded {
            download_url: result.download_url.clone(),
            share: ShareLinks::for_download(&result.download_url),
        },
        OperationState::Succeeded(OperationResult::Extracted(payload)) => {
            Presentation::Extracted {
                preview: PayloadPreview::for_payload(payload),
                payload: payload.clone(),
            }
        }
    }
}
