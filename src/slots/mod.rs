//! File selection state.
//!
//! Three logical slots (cover, secret, stego carrier) each hold at most one
//! selected file. Selecting replaces, clearing is idempotent.

mod file;
mod slot;

pub use file::{FileIcon, SelectedFile, OCTET_STREAM};
pub use slot::{human_size, FileSlots, SlotDescriptor, SlotRole};
