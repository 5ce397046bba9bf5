use anyhow::Result;
use tracing::info;

use super::{split_indexed, SaveFn};
use crate::profile::UserProfile;
use crate::ui::{flash_message, input_prompt, Console};

pub const CATALOG: &[(&str, &str)] = &[
    ("BradNews", "Headlines from around the Brad-verse"),
    ("BradWeather", "Forecasts, mostly sunny"),
    ("BradMusic", "Chiptune jukebox"),
    ("BradNotes", "Sticky notes for your desktop"),
    ("BradPhotos", "ASCII photo gallery"),
    ("BradChess", "Play chess against BradBot"),
];

pub fn is_installed(profile: &UserProfile, name: &str) -> bool {
    profile.installed_apps.iter().any(|a| a == name)
}

/// Returns false when the app was already installed.
pub fn install(profile: &mut UserProfile, name: &str) -> bool {
    if is_installed(profile, name) {
        return false;
    }
    profile.installed_apps.push(name.to_string());
    true
}

/// Returns false when the app was not installed.
pub fn uninstall(profile: &mut UserProfile, name: &str) -> bool {
    let before = profile.installed_apps.len();
    profile.installed_apps.retain(|a| a != name);
    profile.installed_apps.len() != before
}

pub fn run(console: &mut dyn Console, profile: &mut UserProfile, save: &mut SaveFn<'_>) -> Result<()> {
    loop {
        console.clear()?;
        console.header("BradHub 🌐🛍️")?;
        for (i, (name, blurb)) in CATALOG.iter().enumerate() {
            let mark = if is_installed(profile, name) { "[installed]" } else { "" };
            console.say(&format!("{}. {name:<12} {blurb} {mark}", i + 1))?;
        }
        console.say("\ni N = install, u N = uninstall, q = back")?;

        let input = input_prompt(console, "hub> ")?;
        if input.eq_ignore_ascii_case("q") {
            return Ok(());
        }
        let Some((cmd, idx)) = split_indexed(&input).filter(|(_, i)| *i < CATALOG.len()) else {
            flash_message(console, "Unknown command.", 800)?;
            continue;
        };
        let name = CATALOG[idx].0;
        match cmd {
            "i" => {
                if install(profile, name) {
                    save(profile)?;
                    info!(user = %profile.username, app = name, "installed");
                    flash_message(console, &format!("{name} installed. ✅"), 800)?;
                } else {
                    flash_message(console, &format!("{name} is already installed."), 800)?;
                }
            }
            "u" => {
                if uninstall(profile, name) {
                    save(profile)?;
                    info!(user = %profile.username, app = name, "uninstalled");
                    flash_message(console, &format!("{name} removed."), 800)?;
                } else {
                    flash_message(console, &format!("{name} is not installed."), 800)?;
                }
            }
            _ => flash_message(console, "Unknown command.", 800)?,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ProfileError;
    use crate::ui::testing::ScriptedConsole;

    #[test]
    fn install_is_not_duplicated() {
        let mut p = UserProfile::new("alice");
        assert!(install(&mut p, "BradNews"));
        assert!(!install(&mut p, "BradNews"));
        assert_eq!(p.installed_apps, vec!["BradNews".to_string()]);
        assert!(uninstall(&mut p, "BradNews"));
        assert!(!uninstall(&mut p, "BradNews"));
        assert!(p.installed_apps.is_empty());
    }

    #[test]
    fn only_real_changes_are_saved() {
        let mut p = UserProfile::new("alice");
        let mut saves = 0;
        let mut save = |_: &UserProfile| -> Result<(), ProfileError> {
            saves += 1;
            Ok(())
        };
        let mut c = ScriptedConsole::new(&["i 2", "i 2", "i 9", "u 1", "i 1", "u 2", "q"]);
        run(&mut c, &mut p, &mut save).unwrap();
        assert_eq!(saves, 3);
        assert_eq!(p.installed_apps, vec!["BradNews".to_string()]);
        assert!(c.saw("BradWeather is already installed."));
        assert!(c.saw("Unknown command."));
    }
}
