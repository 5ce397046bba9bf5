use anyhow::{Context, Result};
use crossterm::style::Color;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

// ── Paths ─────────────────────────────────────────────────────────────────────

pub const HOME_ENV: &str = "BRADOS_HOME";
pub const SETTINGS_FILE: &str = "brados.json";

/// Directory everything else is resolved against: `$BRADOS_HOME`, or the
/// current working directory.
pub fn base_dir() -> PathBuf {
    std::env::var_os(HOME_ENV)
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
        .or_else(|| std::env::current_dir().ok())
        .unwrap_or_else(|| PathBuf::from("."))
}

// ── JSON helpers ──────────────────────────────────────────────────────────────

pub fn load_json<T: for<'de> Deserialize<'de> + Default>(path: &Path) -> T {
    std::fs::read_to_string(path)
        .ok()
        .and_then(|s| serde_json::from_str(&s).ok())
        .unwrap_or_default()
}

pub fn save_json<T: Serialize>(path: &Path, data: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(data)?;
    std::fs::write(path, json).with_context(|| format!("writing {}", path.display()))
}

// ── Settings ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Settings {
    #[serde(default = "default_theme")]
    pub theme: String,
    #[serde(default = "default_pacing")]
    pub pacing: bool,
    #[serde(default = "default_profile_dir")]
    pub profile_dir: PathBuf,
    #[serde(default = "default_documents_dir")]
    pub documents_dir: PathBuf,
    #[serde(default = "default_log_file")]
    pub log_file: PathBuf,
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_theme() -> String {
    "Green (Default)".to_string()
}

const fn default_pacing() -> bool {
    true
}

fn default_profile_dir() -> PathBuf {
    PathBuf::from("user_profiles")
}

fn default_documents_dir() -> PathBuf {
    PathBuf::from("documents")
}

fn default_log_file() -> PathBuf {
    PathBuf::from("brados.log")
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            theme: default_theme(),
            pacing: default_pacing(),
            profile_dir: default_profile_dir(),
            documents_dir: default_documents_dir(),
            log_file: default_log_file(),
            log_level: default_log_level(),
        }
    }
}

// ── Resolved configuration ────────────────────────────────────────────────────

/// Settings plus the base directory they are resolved against. Built once at
/// start-up and handed to everything that needs it.
#[derive(Debug, Clone)]
pub struct Config {
    pub base: PathBuf,
    pub settings: Settings,
}

impl Config {
    /// Reads `brados.json` from the base directory. On first start the file
    /// is written out with defaults so it can be edited by hand.
    pub fn load() -> Result<Self> {
        let base = base_dir();
        let path = base.join(SETTINGS_FILE);
        let settings: Settings = load_json(&path);
        if !path.exists() {
            save_json(&path, &settings)?;
        }
        Ok(Self::with_base(base, settings))
    }

    pub fn with_base(base: impl Into<PathBuf>, settings: Settings) -> Self {
        Self { base: base.into(), settings }
    }

    fn resolve(&self, p: &Path) -> PathBuf {
        if p.is_absolute() {
            p.to_path_buf()
        } else {
            self.base.join(p)
        }
    }

    pub fn profile_dir(&self) -> PathBuf {
        self.resolve(&self.settings.profile_dir)
    }

    pub fn documents_dir(&self) -> PathBuf {
        self.resolve(&self.settings.documents_dir)
    }

    pub fn log_file(&self) -> PathBuf {
        self.resolve(&self.settings.log_file)
    }

    pub fn theme_color(&self) -> Color {
        theme_color(&self.settings.theme)
    }
}

// ── Themes ────────────────────────────────────────────────────────────────────

pub const THEMES: &[(&str, Color)] = &[
    ("Green (Default)", Color::Green),
    ("White", Color::White),
    ("Amber", Color::Yellow),
    ("Blue", Color::Blue),
    ("Red", Color::Red),
    ("Purple", Color::Magenta),
    ("Light Blue", Color::Cyan),
];

pub fn theme_color(name: &str) -> Color {
    THEMES
        .iter()
        .find(|(n, _)| *n == name)
        .map(|(_, c)| *c)
        .unwrap_or(Color::Green)
}

// ── Header ────────────────────────────────────────────────────────────────────

pub const HEADER_LINES: &[&str] = &[
    "BRAD SYSTEMS UNIFIED SHELL",
    "BradOS v0.1",
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_settings_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let settings: Settings = load_json(&dir.path().join(SETTINGS_FILE));
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn partial_settings_keep_defaults_for_absent_fields() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(SETTINGS_FILE);
        std::fs::write(&path, r#"{ "theme": "Amber", "pacing": false }"#).unwrap();
        let settings: Settings = load_json(&path);
        assert_eq!(settings.theme, "Amber");
        assert!(!settings.pacing);
        assert_eq!(settings.profile_dir, PathBuf::from("user_profiles"));
        assert_eq!(settings.log_level, "info");
    }

    #[test]
    fn relative_paths_resolve_against_base() {
        let cfg = Config::with_base("/srv/brad", Settings::default());
        assert_eq!(cfg.profile_dir(), PathBuf::from("/srv/brad/user_profiles"));
        assert_eq!(cfg.documents_dir(), PathBuf::from("/srv/brad/documents"));

        let mut settings = Settings::default();
        settings.profile_dir = PathBuf::from("/var/lib/brados");
        let cfg = Config::with_base("/srv/brad", settings);
        assert_eq!(cfg.profile_dir(), PathBuf::from("/var/lib/brados"));
    }

    #[test]
    fn unknown_theme_falls_back_to_green() {
        assert_eq!(theme_color("Amber"), Color::Yellow);
        assert_eq!(theme_color("Plaid"), Color::Green);
    }

    #[test]
    fn settings_round_trip_through_save_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(SETTINGS_FILE);
        let mut settings = Settings::default();
        settings.theme = "Blue".into();
        save_json(&path, &settings).unwrap();
        let back: Settings = load_json(&path);
        assert_eq!(back, settings);
    }
}
