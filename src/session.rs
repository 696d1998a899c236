//! Simulated session and profile state.
//!
//! There is no real authentication. Login state, profile fields and the
//! theme preference live in a key-value store that is injected, so tests
//! use [`MemoryStore`] and the CLI persists to a [`JsonFileStore`].

use crate::error::{Error, Result};
use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};

/// Storage keys.
pub mod keys {
    pub const IS_LOGGED_IN: &str = "isLoggedIn";
    pub const USER_NAME: &str = "userName";
    pub const USER_ROLE: &str = "userRole";
    pub const USER_EMAIL: &str = "userEmail";
    pub const PROFILE_IMAGE: &str = "profileImage";
    pub const FILES_PROCESSED: &str = "filesProcessed";
    pub const THEME: &str = "theme";
}

const DEFAULT_USER_NAME: &str = "User";
const DEFAULT_USER_EMAIL: &str = "user@stegano.com";
const DEMO_USER_NAME: &str = "John Doe";

/// Flat string key-value storage.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: &str) -> Result<()>;
    fn remove(&mut self, key: &str) -> Result<()>;
}

/// In-memory store.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    entries: BTreeMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        self.entries.remove(key);
        Ok(())
    }
}

/// Store persisted as a flat JSON object, rewritten on every change.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    entries: BTreeMap<String, String>,
}

impl JsonFileStore {
    /// Open the store at `path`; a missing file is an empty store.
    pub fn open(path: &Path) -> Result<Self> {
        let entries = match std::fs::read_to_string(path) {
            Ok(raw) => serde_json::from_str(&raw)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => return Err(e.into()),
        };
        Ok(Self {
            path: path.to_path_buf(),
            entries,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn flush(&self) -> Result<()> {
        let raw = serde_json::to_string_pretty(&self.entries)?;
        std::fs::write(&self.path, raw)?;
        Ok(())
    }
}

impl KeyValueStore for JsonFileStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.entries.insert(key.to_string(), value.to_string());
        self.flush()
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        if self.entries.remove(key).is_some() {
            self.flush()?;
        }
        Ok(())
    }
}

/// Role shown on the profile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserRole {
    SecurityAnalyst,
    Administrator,
    Developer,
    User,
    /// Any other stored value, kept as-is.
    Other(String),
}

impl UserRole {
    pub fn parse(s: &str) -> Self {
        match s {
            "Security Analyst" => UserRole::SecurityAnalyst,
            "Administrator" => UserRole::Administrator,
            "Developer" => UserRole::Developer,
            "User" => UserRole::User,
            other => UserRole::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            UserRole::SecurityAnalyst => "Security Analyst",
            UserRole::Administrator => "Administrator",
            UserRole::Developer => "Developer",
            UserRole::User => "User",
            UserRole::Other(s) => s,
        }
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Color theme preference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Theme {
    #[default]
    Dark,
    Light,
}

impl Theme {
    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Dark => "dark",
            Theme::Light => "light",
        }
    }
}

/// Profile fields with defaults applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Profile {
    pub name: String,
    pub role: UserRole,
    pub email: String,
    /// Data URL of the avatar image.
    pub image: Option<String>,
    pub files_processed: u64,
}

impl Profile {
    /// Uppercased first letter of each word of the name.
    pub fn initials(&self) -> String {
        self.name
            .split_whitespace()
            .filter_map(|word| word.chars().next())
            .flat_map(char::to_uppercase)
            .collect()
    }
}

/// Typed access to session and profile state.
pub struct SessionService<S> {
    store: S,
}

impl<S: KeyValueStore> SessionService<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn is_logged_in(&self) -> bool {
        self.store.get(keys::IS_LOGGED_IN).as_deref() == Some("true")
    }

    /// Log in as the demo user.
    pub fn demo_login(&mut self) -> Result<Profile> {
        self.store.set(keys::IS_LOGGED_IN, "true")?;
        self.store.set(keys::USER_NAME, DEMO_USER_NAME)?;
        self.store
            .set(keys::USER_ROLE, UserRole::SecurityAnalyst.as_str())?;
        Ok(self.profile())
    }

    /// Clear login state. Email, avatar and theme are kept.
    pub fn logout(&mut self) -> Result<()> {
        self.store.remove(keys::IS_LOGGED_IN)?;
        self.store.remove(keys::USER_NAME)?;
        self.store.remove(keys::USER_ROLE)
    }

    pub fn profile(&self) -> Profile {
        Profile {
            name: self
                .store
                .get(keys::USER_NAME)
                .unwrap_or_else(|| DEFAULT_USER_NAME.to_string()),
            role: self
                .store
                .get(keys::USER_ROLE)
                .map(|r| UserRole::parse(&r))
                .unwrap_or(UserRole::Administrator),
            email: self
                .store
                .get(keys::USER_EMAIL)
                .unwrap_or_else(|| DEFAULT_USER_EMAIL.to_string()),
            image: self.store.get(keys::PROFILE_IMAGE),
            files_processed: self
                .store
                .get(keys::FILES_PROCESSED)
                .and_then(|v| v.parse().ok())
                .unwrap_or(0),
        }
    }

    /// Update name, email and role. Name and email must be non-empty.
    pub fn update_profile(&mut self, name: &str, email: &str, role: UserRole) -> Result<Profile> {
        let (name, email) = (name.trim(), email.trim());
        if name.is_empty() || email.is_empty() {
            return Err(Error::InvalidProfile(
                "Please fill in all required fields".to_string(),
            ));
        }
        self.store.set(keys::USER_NAME, name)?;
        self.store.set(keys::USER_EMAIL, email)?;
        self.store.set(keys::USER_ROLE, role.as_str())?;
        Ok(self.profile())
    }

    pub fn set_profile_image(&mut self, data_url: &str) -> Result<()> {
        self.store.set(keys::PROFILE_IMAGE, data_url)
    }

    /// Stored theme; anything but `light` reads as dark.
    pub fn theme(&self) -> Theme {
        match self.store.get(keys::THEME).as_deref() {
            Some("light") => Theme::Light,
            _ => Theme::Dark,
        }
    }

    pub fn set_theme(&mut self, theme: Theme) -> Result<()> {
        self.store.set(keys::THEME, theme.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults_when_empty() {
        let session = SessionService::new(MemoryStore::new());
        let profile = session.profile();

        assert!(!session.is_logged_in());
        assert_eq!(profile.name, "User");
        assert_eq!(profile.role, UserRole::Administrator);
        assert_eq!(profile.email, "user@stegano.com");
        assert_eq!(profile.image, None);
        assert_eq!(profile.files_processed, 0);
        assert_eq!(session.theme(), Theme::Dark);
    }

    #[test]
    fn test_demo_login_and_logout() {
        let mut session = SessionService::new(MemoryStore::new());
        session.set_theme(Theme::Light).unwrap();

        let profile = session.demo_login().unwrap();
        assert!(session.is_logged_in());
        assert_eq!(profile.name, "John Doe");
        assert_eq!(profile.role, UserRole::SecurityAnalyst);
        assert_eq!(profile.initials(), "JD");

        session.logout().unwrap();
        assert!(!session.is_logged_in());
        assert_eq!(session.profile().name, "User");
        assert_eq!(session.theme(), Theme::Light);
    }

    #[test]
    fn test_update_profile_requires_name_and_email() {
        let mut session = SessionService::new(MemoryStore::new());
        assert!(matches!(
            session.update_profile("", "a@b.c", UserRole::User),
            Err(Error::InvalidProfile(_))
        ));
        assert!(session.update_profile("Ada", "  ", UserRole::User).is_err());

        let profile = session
            .update_profile("ada lovelace", "ada@example.org", UserRole::Developer)
            .unwrap();
        assert_eq!(profile.email, "ada@example.org");
        assert_eq!(profile.role, UserRole::Developer);
        assert_eq!(profile.initials(), "AL");
    }

    #[test]
    fn test_unknown_role_preserved() {
        let mut store = MemoryStore::new();
        store.set(keys::USER_ROLE, "Auditor").unwrap();
        let session = SessionService::new(store);
        assert_eq!(session.profile().role.to_string(), "Auditor");
    }

    #[test]
    fn test_json_file_store_persists() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("session.json");

        let mut session = SessionService::new(JsonFileStore::open(&path).unwrap());
        session.demo_login().unwrap();
        session.set_profile_image("data:image/png;base64,AAAA").unwrap();
        drop(session);

        let session = SessionService::new(JsonFileStore::open(&path).unwrap());
        assert!(session.is_logged_in());
        assert_eq!(
            session.profile().image.as_deref(),
            Some("data:image/png;base64,AAAA")
        );
    }

    #[test]
    fn test_json_file_store_rejects_garbage() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("session.json");
        std::fs::write(&path, "not json").unwrap();

        assert!(matches!(
            JsonFileStore::open(&path),
            Err(Error::Serialization(_))
        ));
    }
}
