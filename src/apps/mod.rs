//! The applications reachable from the main menu.
//!
//! Stateless apps get the console and configuration only. Profile-aware apps
//! additionally get the live profile and a save callback; they call it after
//! each change they want persisted.

use anyhow::Result;

use crate::config::Config;
use crate::error::ProfileError;
use crate::menu::AppId;
use crate::profile::UserProfile;
use crate::ui::Console;

pub mod browser;
pub mod calculator;
pub mod editor;
pub mod files;
pub mod games;
pub mod hub;
pub mod mail;
pub mod tasks;

/// Persists the given profile unconditionally.
pub type SaveFn<'a> = dyn FnMut(&UserProfile) -> Result<(), ProfileError> + 'a;

pub fn run_stateless(app: AppId, console: &mut dyn Console, config: &Config) -> Result<()> {
    match app {
        AppId::Calculator => calculator::run(console),
        AppId::GameCenter => games::run(console),
        AppId::FileBrowser => files::run(console),
        AppId::TextEditor => editor::run(console, &config.documents_dir()),
        AppId::Browser => browser::run(console),
        AppId::Mail | AppId::Hub | AppId::TaskManager => {
            anyhow::bail!("{} needs a profile", app.display_name())
        }
    }
}

pub fn run_profile_aware(
    app: AppId,
    console: &mut dyn Console,
    profile: &mut UserProfile,
    save: &mut SaveFn<'_>,
) -> Result<()> {
    match app {
        AppId::Mail => mail::run(console, profile, save),
        AppId::Hub => hub::run(console, profile, save),
        AppId::TaskManager => tasks::run(console, profile, save),
        _ => anyhow::bail!("{} does not take a profile", app.display_name()),
    }
}

/// Parses "cmd N" into the command and a 1-based index converted to 0-based.
pub(crate) fn split_indexed(input: &str) -> Option<(&str, usize)> {
    let mut parts = input.split_whitespace();
    let cmd = parts.next()?;
    let n: usize = parts.next()?.parse().ok()?;
    if parts.next().is_some() || n == 0 {
        return None;
    }
    Some((cmd, n - 1))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_indexed_parses_one_based_indices() {
        assert_eq!(split_indexed("d 3"), Some(("d", 2)));
        assert_eq!(split_indexed("  i   1 "), Some(("i", 0)));
        assert_eq!(split_indexed("d 0"), None);
        assert_eq!(split_indexed("d"), None);
        assert_eq!(split_indexed("d x"), None);
        assert_eq!(split_indexed("d 1 2"), None);
    }
}
