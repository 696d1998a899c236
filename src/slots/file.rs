//! Selected file handle: name, media type and content.

use crate::error::{Error, Result};
use std::fmt;
use std::path::Path;
use std::sync::Arc;

/// Media type used when nothing better can be sniffed.
pub const OCTET_STREAM: &str = "application/octet-stream";

/// A file picked by the user, held in memory.
#[derive(Clone)]
pub struct SelectedFile {
    name: String,
    media_type: String,
    content: Arc<[u8]>,
}

impl SelectedFile {
    /// Create a selection from in-memory content.
    pub fn new(name: impl Into<String>, media_type: impl Into<String>, content: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            media_type: media_type.into(),
            content: content.into(),
        }
    }

    /// Create a selection whose media type is guessed from `name`.
    pub fn with_guessed_type(name: impl Into<String>, content: Vec<u8>) -> Self {
        let name = name.into();
        let media_type = guess_media_type(&name);
        Self::new(name, media_type, content)
    }

    /// Read a file from disk into a selection.
    pub async fn from_path(path: &Path) -> Result<Self> {
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| Error::InvalidFilename(path.to_path_buf()))?
            .to_string();
        let content = tokio::fs::read(path).await?;
        Ok(Self::with_guessed_type(name, content))
    }

    /// File name without any directory part.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Media type, e.g. `image/png`.
    pub fn media_type(&self) -> &str {
        &self.media_type
    }

    /// Size in bytes.
    pub fn size_bytes(&self) -> u64 {
        self.content.len() as u64
    }

    /// Raw content.
    pub fn content(&self) -> &[u8] {
        &self.content
    }

    /// Whether the media type is `image/*`.
    pub fn is_image(&self) -> bool {
        self.media_type.starts_with("image/")
    }

    /// Icon category for this file.
    pub fn icon(&self) -> FileIcon {
        FileIcon::for_media_type(&self.media_type)
    }
}

impl fmt::Debug for SelectedFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SelectedFile")
            .field("name", &self.name)
            .field("media_type", &self.media_type)
            .field("size_bytes", &self.content.len())
            .finish()
    }
}

fn guess_media_type(name: &str) -> String {
    mime_guess::from_path(name)
        .first()
        .map(|m| m.essence_str().to_string())
        .unwrap_or_else(|| OCTET_STREAM.to_string())
}

/// Icon category shown next to a selected file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileIcon {
    Image,
    Audio,
    Video,
    Document,
}

impl FileIcon {
    /// Pick the icon from a media type prefix.
    pub fn for_media_type(media_type: &str) -> Self {
        match media_type.split('/').next() {
            Some("image") => FileIcon::Image,
            Some("audio") => FileIcon::Audio,
            Some("video") => FileIcon::Video,
            _ => FileIcon::Document,
        }
    }

    /// Stable class name for styling.
    pub fn class_name(&self) -> &'static str {
        match self {
            FileIcon::Image => "file-icon-image",
            FileIcon::Audio => "file-icon-audio",
            FileIcon::Video => "file-icon-video",
            FileIcon::Document => "file-icon-document",
        }
    }

    /// Glyph for terminal display.
    pub fn glyph(&self) -> &'static str {
        match self {
            FileIcon::Image => "🖼️",
            FileIcon::Audio => "🎵",
            FileIcon::Video => "🎬",
            FileIcon::Document => "📄",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_guessed_media_types() {
        assert_eq!(
            SelectedFile::with_guessed_type("cover.png", vec![]).media_type(),
            "image/png"
        );
        assert_eq!(
            SelectedFile::with_guessed_type("song.wav", vec![]).icon(),
            FileIcon::Audio
        );
        assert_eq!(
            SelectedFile::with_guessed_type("blob.zzqx", vec![]).media_type(),
            OCTET_STREAM
        );
    }

    #[test]
    fn test_icon_for_media_type() {
        assert_eq!(FileIcon::for_media_type("image/jpeg"), FileIcon::Image);
        assert_eq!(FileIcon::for_media_type("video/mp4"), FileIcon::Video);
        assert_eq!(FileIcon::for_media_type("text/plain"), FileIcon::Document);
        assert_eq!(FileIcon::for_media_type(""), FileIcon::Document);
    }

    #[tokio::test]
    async fn test_from_path_reads_content() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("notes.txt");
        std::fs::write(&path, b"hello").unwrap();

        let file = SelectedFile::from_path(&path).await.unwrap();
        assert_eq!(file.name(), "notes.txt");
        assert_eq!(file.size_bytes(), 5);
        assert_eq!(file.media_type(), "text/plain");
        assert!(!file.is_image());
    }

    #[tokio::test]
    async fn test_from_missing_path_is_io_error() {
        let dir = tempfile::TempDir::new().unwrap();
        let result = SelectedFile::from_path(&dir.path().join("absent.png")).await;
        assert!(matches!(result, Err(Error::Io(_))));
    }
}
