//! Payload capacity estimation for cover images.
//!
//! The estimate assumes one hidden bit per color channel per pixel, minus
//! the structural header the embedding format reserves. It is advisory: a
//! cover that is not an image, or that fails to decode, simply has no
//! estimate.

use crate::config::{CAPACITY_BASIS, CAPACITY_CHANNELS, CAPACITY_HEADER_BYTES};
use crate::error::Result;
use crate::slots::{human_size, FileSlots, SelectedFile, SlotRole};
use std::fmt;
use std::io::Cursor;
use tracing::debug;

/// Estimated number of secret bytes a cover can hold.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapacityEstimate {
    /// Estimated payload bytes, never negative.
    pub estimated_bytes: u64,
    /// Method the estimate is based on.
    pub basis: &'static str,
}

impl fmt::Display for CapacityEstimate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Estimated capacity: {} ({})",
            human_size(self.estimated_bytes),
            self.basis
        )
    }
}

/// Estimate capacity for an image of `width` x `height` pixels.
///
/// `max(0, floor(W * H * 3 / 8) - 8)`
pub fn estimate_from_dimensions(width: u32, height: u32) -> CapacityEstimate {
    let bits = width as u64 * height as u64 * CAPACITY_CHANNELS;
    CapacityEstimate {
        estimated_bytes: (bits / 8).saturating_sub(CAPACITY_HEADER_BYTES),
        basis: CAPACITY_BASIS,
    }
}

/// Estimate capacity for a cover file.
///
/// Returns `None` for non-image media types and for images whose
/// dimensions cannot be decoded. Decoding runs on the blocking pool.
pub async fn estimate(cover: &SelectedFile) -> Option<CapacityEstimate> {
    if !cover.is_image() {
        return None;
    }

    let file = cover.clone();
    let decoded = tokio::task::spawn_blocking(move || read_dimensions(file.content())).await;

    match decoded {
        Ok(Ok((width, height))) => Some(estimate_from_dimensions(width, height)),
        Ok(Err(e)) => {
            debug!(name = cover.name(), error = %e, "cover image did not decode");
            None
        }
        Err(e) => {
            debug!(name = cover.name(), error = %e, "capacity decode task failed");
            None
        }
    }
}

fn read_dimensions(content: &[u8]) -> Result<(u32, u32)> {
    let reader = image::ImageReader::new(Cursor::new(content)).with_guessed_format()?;
    Ok(reader.into_dimensions()?)
}

/// Latest capacity estimate for the cover slot.
///
/// An estimate is computed for a particular cover generation; if the cover
/// changed while decoding, the result is dropped instead of overwriting the
/// newer state.
#[derive(Debug, Default)]
pub struct CapacityTracker {
    latest: Option<CapacityEstimate>,
    generation: u64,
}

impl CapacityTracker {
    /// Create an empty tracker.
    pub fn new() -> Self {
        Self::default()
    }

    /// Compute and apply the estimate for the current cover.
    ///
    /// Convenience for callers that do not interleave other slot changes
    /// with the decode.
    pub async fn refresh(&mut self, slots: &FileSlots) -> Option<&CapacityEstimate> {
        let generation = slots.generation(SlotRole::Cover);
        let estimate = match slots.current(SlotRole::Cover) {
            Some(cover) => estimate(cover).await,
            None => None,
        };
        self.apply(slots, generation, estimate);
        self.current(slots)
    }

    /// Record `estimate`, computed for cover generation `computed_for`.
    ///
    /// Returns `false` and leaves state untouched when the cover has changed
    /// since.
    pub fn apply(
        &mut self,
        slots: &FileSlots,
        computed_for: u64,
        estimate: Option<CapacityEstimate>,
    ) -> bool {
        if slots.generation(SlotRole::Cover) != computed_for {
            debug!(
                computed_for,
                current = slots.generation(SlotRole::Cover),
                "discarding stale capacity estimate"
            );
            return false;
        }
        self.latest = estimate;
        self.generation = computed_for;
        true
    }

    /// Estimate for the current cover, if one has been applied.
    pub fn current(&self, slots: &FileSlots) -> Option<&CapacityEstimate> {
        if slots.generation(SlotRole::Cover) == self.generation {
            self.latest.as_ref()
        } else {
            None
        }
    }
}
