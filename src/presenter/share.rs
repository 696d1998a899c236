//! Sharing links for a created stego file.

use crate::config::share;

/// Links that hand a download URL to other apps.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShareLinks {
    /// Plain message text containing the URL verbatim.
    pub message: String,
    /// `mailto:` link with subject and body.
    pub email: String,
    /// WhatsApp share link.
    pub whatsapp: String,
    /// Telegram share link.
    pub telegram: String,
}

impl ShareLinks {
    /// Build all variants for `download_url`.
    pub fn for_download(download_url: &str) -> Self {
        let message = format!("{}{}", share::MESSAGE_PREFIX, download_url);
        let text = urlencoding::encode(&message);

        Self {
            email: format!(
                "mailto:?subject={}&body={}",
                urlencoding::encode(share::EMAIL_SUBJECT),
                text
            ),
            whatsapp: format!("{}?text={}", share::WHATSAPP_URL, text),
            telegram: format!(
                "{}?url={}&text={}",
                share::TELEGRAM_URL,
                urlencoding::encode(download_url),
                text
            ),
            message,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_links_embed_url() {
        let links = ShareLinks::for_download("https://x/y.png");
        let encoded = "https%3A%2F%2Fx%2Fy.png";

        assert!(links.message.contains("https://x/y.png"));
        assert!(links.email.contains(encoded));
        assert!(links.whatsapp.contains(encoded));
        assert!(links.telegram.starts_with(&format!("https://t.me/share/url?url={}&text=", encoded)));
    }

    #[test]
    fn test_email_subject_encoded() {
        let links = ShareLinks::for_download("https://x/y.png");
        assert!(links.email.starts_with("mailto:?subject=Stegano%20stego-file&body=Here%20is"));
        assert!(links.whatsapp.starts_with("https://wa.me/?text=Here%20is%20your"));
    }
}
