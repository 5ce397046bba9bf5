//! User profiles and the on-disk store that owns them.
//!
//! One pretty-printed JSON document per user lives at
//! `<profile_dir>/<username>.json`. Loading backfills fields that older
//! records lack; keys this build does not know about are carried through
//! untouched so a save never drops them.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::error::ProfileError;

pub const MAX_NAME_LEN: usize = 32;

// ── Device type ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, Hash, Default)]
pub enum DeviceType {
    Mobile,
    Slate,
    #[default]
    Compute,
}

impl DeviceType {
    pub const ALL: [DeviceType; 3] = [DeviceType::Mobile, DeviceType::Slate, DeviceType::Compute];

    pub fn label(self) -> &'static str {
        match self {
            DeviceType::Mobile => "Mobile",
            DeviceType::Slate => "Slate",
            DeviceType::Compute => "Compute",
        }
    }

    /// Anything unrecognised maps to `Compute`.
    pub fn from_label(s: &str) -> Self {
        match s {
            "Mobile" => DeviceType::Mobile,
            "Slate" => DeviceType::Slate,
            _ => DeviceType::Compute,
        }
    }

    pub fn tagline(self) -> &'static str {
        match self {
            DeviceType::Mobile => "Optimized for small screens",
            DeviceType::Slate => "Optimized for tablets/medium screens",
            DeviceType::Compute => "Optimized for desktops/large screens",
        }
    }

    pub fn emoji(self) -> &'static str {
        match self {
            DeviceType::Mobile => "📱",
            DeviceType::Slate => "💻",
            DeviceType::Compute => "🖥️",
        }
    }
}

impl fmt::Display for DeviceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl<'de> Deserialize<'de> for DeviceType {
    fn deserialize<D: Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
        let s = String::deserialize(d)?;
        Ok(DeviceType::from_label(&s))
    }
}

// ── Collaborator records ──────────────────────────────────────────────────────
//
// Entries must be JSON objects; anything else makes the whole record corrupt.
// Fields an app does not model ride along in `extra`.

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(default)]
pub struct Task {
    pub title: String,
    pub done: bool,
    pub created_at: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(default)]
pub struct MailMessage {
    pub from: String,
    pub to: String,
    pub subject: String,
    pub body: String,
    pub sent_at: String,
    pub read: bool,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

// ── Profile record ────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UserProfile {
    pub username: String,
    #[serde(default)]
    pub installed_apps: Vec<String>,
    #[serde(default)]
    pub tasks: Vec<Task>,
    #[serde(default)]
    pub bradmail_inbox: Vec<MailMessage>,
    #[serde(default)]
    pub bradmail_sent: Vec<MailMessage>,
    #[serde(default)]
    pub device_type: DeviceType,
    /// Keys written by something other than this build.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl UserProfile {
    pub fn new(username: &str) -> Self {
        Self {
            username: username.to_string(),
            installed_apps: Vec::new(),
            tasks: Vec::new(),
            bradmail_inbox: Vec::new(),
            bradmail_sent: Vec::new(),
            device_type: DeviceType::Compute,
            extra: Map::new(),
        }
    }
}

// ── Names ─────────────────────────────────────────────────────────────────────

/// A name that can be used verbatim as a file stem inside a fixed directory.
pub fn is_safe_name(name: &str) -> bool {
    !name.is_empty()
        && name.len() <= MAX_NAME_LEN
        && !name.starts_with('.')
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'))
}

pub fn validate_username(username: &str) -> Result<(), ProfileError> {
    if is_safe_name(username) {
        Ok(())
    } else {
        Err(ProfileError::InvalidUsername { username: username.to_string() })
    }
}

// ── Store ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct ProfileStore {
    dir: PathBuf,
}

impl ProfileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Creates the profile directory. Safe to call more than once.
    pub fn init(&self) -> Result<(), ProfileError> {
        std::fs::create_dir_all(&self.dir).map_err(|e| ProfileError::storage(&self.dir, e))
    }

    pub fn resolve_path(&self, username: &str) -> Result<PathBuf, ProfileError> {
        validate_username(username)?;
        Ok(self.dir.join(format!("{username}.json")))
    }

    pub fn exists(&self, username: &str) -> Result<bool, ProfileError> {
        Ok(self.resolve_path(username)?.is_file())
    }

    /// Loads `username`, creating and persisting a default record when none
    /// exists yet.
    pub fn load(&self, username: &str) -> Result<UserProfile, ProfileError> {
        let path = self.resolve_path(username)?;
        let raw = match std::fs::read_to_string(&path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                let profile = UserProfile::new(username);
                self.save(&profile)?;
                info!(user = username, "created profile");
                return Ok(profile);
            }
            Err(e) => return Err(ProfileError::storage(path, e)),
        };

        let profile: UserProfile = serde_json::from_str(&raw).map_err(|e| {
            warn!(user = username, error = %e, "unparsable profile");
            ProfileError::corrupt(username, e)
        })?;
        if profile.username != username {
            warn!(user = username, stored = %profile.username, "profile key mismatch");
            return Err(ProfileError::corrupt(
                username,
                format!("record belongs to '{}'", profile.username),
            ));
        }
        debug!(user = username, "loaded profile");
        Ok(profile)
    }

    pub fn save(&self, profile: &UserProfile) -> Result<(), ProfileError> {
        let path = self.resolve_path(&profile.username)?;
        let json = serde_json::to_string_pretty(profile)
            .map_err(|e| ProfileError::storage(&path, std::io::Error::new(ErrorKind::InvalidData, e)))?;
        std::fs::write(&path, json).map_err(|e| {
            warn!(user = %profile.username, error = %e, "profile save failed");
            ProfileError::storage(&path, e)
        })?;
        debug!(user = %profile.username, "saved profile");
        Ok(())
    }
}
