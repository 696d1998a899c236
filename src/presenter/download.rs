//! User-triggered download of an extracted payload.

use crate::error::{Error, Result};
use crate::operation::ExtractedPayload;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs::OpenOptions;
use tokio::io::AsyncWriteExt;
use tracing::{debug, info};

/// Numbered alternatives tried before giving up on a crowded directory.
const MAX_NAME_ATTEMPTS: u32 = 1000;

/// Write `payload` into `dir` under its suggested filename.
///
/// Existing files are never replaced: when the name is taken, `name (1).ext`,
/// `name (2).ext` and so on are tried instead. Returns the written path.
pub async fn save_payload(payload: &ExtractedPayload, dir: &Path) -> Result<PathBuf> {
    let name = Path::new(&payload.suggested_filename)
        .file_name()
        .map(Path::new)
        .ok_or_else(|| Error::InvalidFilename(PathBuf::from(&payload.suggested_filename)))?;

    for attempt in 0..MAX_NAME_ATTEMPTS {
        let path = dir.join(numbered(name, attempt));
        let mut file = match OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
            .await
        {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                debug!(path = %path.display(), "name taken, trying next");
                continue;
            }
            Err(e) => return Err(e.into()),
        };
        file.write_all(payload.content()).await?;
        file.flush().await?;
        info!(path = %path.display(), bytes = payload.size_bytes(), "payload saved");
        return Ok(path);
    }

    Err(Error::Io(std::io::Error::new(
        ErrorKind::AlreadyExists,
        format!(
            "no free name for {} in {}",
            name.display(),
            dir.display()
        ),
    )))
}

/// `notes.txt` for attempt 0, `notes (n).txt` afterwards.
fn numbered(name: &Path, attempt: u32) -> PathBuf {
    if attempt == 0 {
        return name.to_path_buf();
    }
    let stem = name.file_stem().unwrap_or(name.as_os_str()).to_string_lossy();
    match name.extension() {
        Some(ext) => PathBuf::from(format!("{} ({}).{}", stem, attempt, ext.to_string_lossy())),
        None => PathBuf::from(format!("{} ({})", stem, attempt)),
    }
}
