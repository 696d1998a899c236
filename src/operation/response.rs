//! Response decoding into `Ok(result)` / `Err(reason)`.

use crate::config::FALLBACK_SECRET_FILENAME;
use crate::operation::types::{EmbedResult, ExtractedPayload, FailureReason, OperationKind};
use serde::Deserialize;

/// Raw response as seen by the controller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceResponse {
    pub status: u16,
    pub content_disposition: Option<String>,
    pub body: Vec<u8>,
}

impl ServiceResponse {
    /// A 2xx response.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// JSON response helper.
    pub fn json(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            content_disposition: None,
            body: body.into().into_bytes(),
        }
    }

    /// Attachment response helper.
    pub fn attachment(content_disposition: impl Into<String>, body: Vec<u8>) -> Self {
        Self {
            status: 200,
            content_disposition: Some(content_disposition.into()),
            body,
        }
    }
}

#[derive(Deserialize)]
struct EmbedBody {
    download_url: Option<String>,
    filename: Option<String>,
}

#[derive(Deserialize)]
struct ErrorBody {
    error: Option<String>,
}

/// Decode an `/api/embed` response.
pub fn decode_embed(response: &ServiceResponse) -> Result<EmbedResult, FailureReason> {
    if !response.is_success() {
        return Err(decode_error(OperationKind::Embed, &response.body));
    }

    let body: EmbedBody = serde_json::from_slice(&response.body)
        .map_err(|_| FailureReason::Malformed(OperationKind::Embed))?;
    match body.download_url {
        Some(download_url) if !download_url.is_empty() => Ok(EmbedResult {
            download_url,
            filename: body.filename,
        }),
        _ => Err(FailureReason::Malformed(OperationKind::Embed)),
    }
}

/// Decode an `/api/extract` response.
pub fn decode_extract(response: ServiceResponse) -> Result<ExtractedPayload, FailureReason> {
    if !response.is_success() {
        return Err(decode_error(OperationKind::Extract, &response.body));
    }

    let filename = response
        .content_disposition
        .as_deref()
        .and_then(content_disposition_filename)
        .unwrap_or_else(|| FALLBACK_SECRET_FILENAME.to_string());
    Ok(ExtractedPayload::new(filename, response.body))
}

/// Error message from a non-success body, or the kind's fallback.
fn decode_error(kind: OperationKind, body: &[u8]) -> FailureReason {
    match serde_json::from_slice::<ErrorBody>(body) {
        Ok(ErrorBody {
            error: Some(message),
        }) if !message.trim().is_empty() => FailureReason::Remote(message),
        _ => FailureReason::Malformed(kind),
    }
}

/// Filename named by a `Content-Disposition` header.
///
/// Prefers the RFC 5987 `filename*` form over plain `filename`. Only the
/// last path component is returned.
pub fn content_disposition_filename(header: &str) -> Option<String> {
    let mut plain = None;
    let mut extended = None;

    for param in header.split(';').map(str::trim) {
        let Some((key, value)) = param.split_once('=') else {
            continue;
        };
        match key.trim().to_ascii_lowercase().as_str() {
            "filename" => plain = Some(value.trim().trim_matches('"').to_string()),
            "filename*" => extended = decode_ext_value(value.trim()),
            _ => {}
        }
    }

    extended
        .into_iter()
        .chain(plain)
        .find_map(|name| last_component(&name))
}

/// `UTF-8''name%20here` -> `name here`.
fn decode_ext_value(value: &str) -> Option<String> {
    let (charset, rest) = value.split_once('\'')?;
    if !charset.eq_ignore_ascii_case("utf-8") {
        return None;
    }
    let (_language, encoded) = rest.split_once('\'')?;
    urlencoding::decode(encoded).ok().map(|s| s.into_owned())
}

fn last_component(name: &str) -> Option<String> {
    let base = name.rsplit(['/', '\\']).next()?.trim();
    match base {
        "" | "." | ".." => None,
        _ => Some(base.to_string()),
    }
}
