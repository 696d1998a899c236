//! Slot roles and the slot set.

use crate::slots::file::{FileIcon, SelectedFile};
use std::fmt;

/// Logical slot a file can be selected into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SlotRole {
    /// Carrier medium for embedding.
    Cover,
    /// Payload to hide.
    Secret,
    /// File carrying a hidden payload, for extraction.
    StegoCarrier,
}

impl SlotRole {
    /// All roles, in form order.
    pub const ALL: [SlotRole; 3] = [SlotRole::Cover, SlotRole::Secret, SlotRole::StegoCarrier];

    /// Multipart field name used by the service.
    pub fn field_name(&self) -> &'static str {
        match self {
            SlotRole::Cover => "cover",
            SlotRole::Secret => "secret",
            SlotRole::StegoCarrier => "stego",
        }
    }

    /// Human label.
    pub fn label(&self) -> &'static str {
        match self {
            SlotRole::Cover => "Cover",
            SlotRole::Secret => "Secret",
            SlotRole::StegoCarrier => "Stego",
        }
    }

    fn index(&self) -> usize {
        match self {
            SlotRole::Cover => 0,
            SlotRole::Secret => 1,
            SlotRole::StegoCarrier => 2,
        }
    }
}

impl fmt::Display for SlotRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Presentation data for an occupied slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotDescriptor {
    /// File name.
    pub name: String,
    /// Size formatted for humans.
    pub human_size: String,
    /// Icon category.
    pub icon: FileIcon,
}

impl SlotDescriptor {
    fn of(file: &SelectedFile) -> Self {
        Self {
            name: file.name().to_string(),
            human_size: human_size(file.size_bytes()),
            icon: file.icon(),
        }
    }

    /// Icon class name for styling.
    pub fn icon_class(&self) -> &'static str {
        self.icon.class_name()
    }
}

#[derive(Debug, Default)]
struct Slot {
    file: Option<SelectedFile>,
    generation: u64,
}

/// The three file slots of a page session.
#[derive(Debug, Default)]
pub struct FileSlots {
    slots: [Slot; 3],
}

impl FileSlots {
    /// Create empty slots.
    pub fn new() -> Self {
        Self::default()
    }

    /// Put `file` into `role`, replacing any previous occupant.
    pub fn select(&mut self, role: SlotRole, file: SelectedFile) -> SlotDescriptor {
        let descriptor = SlotDescriptor::of(&file);
        let slot = &mut self.slots[role.index()];
        slot.file = Some(file);
        slot.generation += 1;
        descriptor
    }

    /// Empty `role`. Returns whether a file was removed.
    pub fn clear(&mut self, role: SlotRole) -> bool {
        let slot = &mut self.slots[role.index()];
        match slot.file.take() {
            Some(_) => {
                slot.generation += 1;
                true
            }
            None => false,
        }
    }

    /// Current occupant of `role`.
    pub fn current(&self, role: SlotRole) -> Option<&SelectedFile> {
        self.slots[role.index()].file.as_ref()
    }

    /// Presentation data for `role`, absent when empty.
    pub fn descriptor(&self, role: SlotRole) -> Option<SlotDescriptor> {
        self.current(role).map(SlotDescriptor::of)
    }

    /// Counter bumped on every change of `role`'s occupant.
    ///
    /// Async work derived from a slot (capacity decode) compares this to
    /// decide whether its result is still current.
    pub fn generation(&self, role: SlotRole) -> u64 {
        self.slots[role.index()].generation
    }

    /// Whether `role` holds a file.
    pub fn is_occupied(&self, role: SlotRole) -> bool {
        self.current(role).is_some()
    }
}

/// Format a byte count: `N B`, one-decimal KB, or two-decimal MB.
pub fn human_size(bytes: u64) -> String {
    if bytes < 1024 {
        return format!("{} B", bytes);
    }
    let kb = bytes as f64 / 1024.0;
    if kb < 1024.0 {
        format!("{:.1} KB", kb)
    } else {
        format!("{:.2} MB", kb / 1024.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn file(name: &str, size: usize) -> SelectedFile {
        SelectedFile::with_guessed_type(name, vec![0u8; size])
    }

    #[test]
    fn test_human_size() {
        assert_eq!(human_size(0), "0 B");
        assert_eq!(human_size(1023), "1023 B");
        assert_eq!(human_size(1024), "1.0 KB");
        assert_eq!(human_size(1536), "1.5 KB");
        assert_eq!(human_size(1024 * 1024), "1.00 MB");
        assert_eq!(human_size(5 * 1024 * 1024 + 512 * 1024), "5.50 MB");
    }

    #[test]
    fn test_select_returns_descriptor() {
        let mut slots = FileSlots::new();
        let desc = slots.select(SlotRole::Cover, file("photo.png", 2048));

        assert_eq!(desc.name, "photo.png");
        assert_eq!(desc.human_size, "2.0 KB");
        assert_eq!(desc.icon, FileIcon::Image);
        assert_eq!(desc.icon_class(), "file-icon-image");
    }

    #[test]
    fn test_select_replaces_occupant() {
        let mut slots = FileSlots::new();
        slots.select(SlotRole::Secret, file("a.txt", 10));
        slots.select(SlotRole::Secret, file("b.pdf", 20));

        let current = slots.current(SlotRole::Secret).unwrap();
        assert_eq!(current.name(), "b.pdf");
        assert_eq!(current.size_bytes(), 20);
        assert_eq!(slots.generation(SlotRole::Secret), 2);
    }

    #[test]
    fn test_clear_is_idempotent() {
        let mut slots = FileSlots::new();
        assert!(!slots.clear(SlotRole::Cover));
        assert_eq!(slots.generation(SlotRole::Cover), 0);

        slots.select(SlotRole::Cover, file("c.png", 1));
        assert!(slots.clear(SlotRole::Cover));
        assert!(!slots.clear(SlotRole::Cover));
        assert!(slots.current(SlotRole::Cover).is_none());
        assert!(slots.descriptor(SlotRole::Cover).is_none());
    }

    #[test]
    fn test_roles_are_independent() {
        let mut slots = FileSlots::new();
        slots.select(SlotRole::StegoCarrier, file("s.png", 1));

        assert!(slots.is_occupied(SlotRole::StegoCarrier));
        assert!(!slots.is_occupied(SlotRole::Cover));
        assert_eq!(SlotRole::StegoCarrier.field_name(), "stego");
    }
}
