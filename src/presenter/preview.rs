//! Inline preview of an extracted payload.

use crate::config::TEXT_PREVIEW_EXTENSIONS;
use crate::operation::ExtractedPayload;
use std::path::Path;

/// How an extracted payload is shown before download.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PayloadPreview {
    /// Text content, markup-escaped.
    Text { escaped: String },
    /// Name and size only.
    FileInfo { name: String, size: String },
}

impl PayloadPreview {
    /// Choose and build the preview from the payload's file name.
    pub fn for_payload(payload: &ExtractedPayload) -> Self {
        if is_text_previewable(&payload.suggested_filename) {
            let text = String::from_utf8_lossy(payload.content());
            PayloadPreview::Text {
                escaped: escape_markup(&text),
            }
        } else {
            PayloadPreview::FileInfo {
                name: payload.suggested_filename.clone(),
                size: format!("{:.1} KB", payload.size_bytes() as f64 / 1024.0),
            }
        }
    }
}

/// Whether `filename` has one of the text-like extensions.
pub fn is_text_previewable(filename: &str) -> bool {
    Path::new(filename)
        .extension()
        .and_then(|e| e.to_str())
        .map(|ext| {
            TEXT_PREVIEW_EXTENSIONS
                .iter()
                .any(|t| t.eq_ignore_ascii_case(ext))
        })
        .unwrap_or(false)
}

/// Escape `&`, `<` and `>` so text cannot be read as markup.
pub fn escape_markup(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_extensions() {
        for name in ["a.txt", "b.JSON", "c.md", "d.Log"] {
            assert!(is_text_previewable(name), "{}", name);
        }
        for name in ["a.png", "b.txt.gz", "README", "secret.bin"] {
            assert!(!is_text_previewable(name), "{}", name);
        }
    }

    #[test]
    fn test_text_preview_is_escaped() {
        let payload = ExtractedPayload::new("notes.txt", b"<script>alert(1)</script> & co".to_vec());
        assert_eq!(
            PayloadPreview::for_payload(&payload),
            PayloadPreview::Text {
                escaped: "&lt;script&gt;alert(1)&lt;/script&gt; &amp; co".to_string()
            }
        );
    }

    #[test]
    fn test_binary_preview_shows_info() {
        let payload = ExtractedPayload::new("photo.jpg", vec![0; 2560]);
        assert_eq!(
            PayloadPreview::for_payload(&payload),
            PayloadPreview::FileInfo {
                name: "photo.jpg".to_string(),
                size: "2.5 KB".to_string()
            }
        );
    }
}
