//! The interactive session: login → device selection → main menu, until
//! shutdown.
//!
//! State flow:
//!   Login ──> DeviceSelect ──> MainMenu <──> InApp
//!     ^                          │
//!     └──────── logout ──────────┤
//!                                └── shutdown ──> Terminated

use anyhow::Result;
use tracing::{info, warn};

use crate::apps;
use crate::config::Config;
use crate::error::ProfileError;
use crate::menu::{full_menu, AppId, HandlerKind, MenuAction, SystemCommand};
use crate::profile::{validate_username, DeviceType, ProfileStore, UserProfile};
use crate::ui::{flash_message, input_prompt, prompt_choice, wait_for_enter, Console};

pub const NEW_USER_SENTINEL: &str = "new";

#[derive(Debug)]
pub enum State {
    Login,
    DeviceSelect(UserProfile),
    MainMenu(UserProfile),
    InApp(UserProfile, AppId, HandlerKind),
    Terminated,
}

/// Checks a name offered during account creation.
pub fn check_new_username(store: &ProfileStore, username: &str) -> Result<(), ProfileError> {
    validate_username(username)?;
    if store.exists(username)? {
        return Err(ProfileError::DuplicateUsername { username: username.to_string() });
    }
    Ok(())
}

pub struct Session<'a> {
    store: &'a ProfileStore,
    config: &'a Config,
    console: &'a mut dyn Console,
}

impl<'a> Session<'a> {
    pub fn new(store: &'a ProfileStore, config: &'a Config, console: &'a mut dyn Console) -> Self {
        Self { store, config, console }
    }

    /// Runs until shutdown. Profile store failures end the session with an
    /// error.
    pub fn run(&mut self) -> Result<()> {
        let mut state = State::Login;
        loop {
            state = match state {
                State::Login => State::DeviceSelect(self.login()?),
                State::DeviceSelect(profile) => State::MainMenu(self.select_device(profile)?),
                State::MainMenu(profile) => self.main_menu(profile)?,
                State::InApp(profile, app, kind) => State::MainMenu(self.launch(profile, app, kind)?),
                State::Terminated => return Ok(()),
            };
        }
    }

    // ── Login ─────────────────────────────────────────────────────────────────

    fn login(&mut self) -> Result<UserProfile> {
        self.console.clear()?;
        self.console.header("Welcome to BradOS! 🚀")?;
        loop {
            let input = input_prompt(
                self.console,
                &format!("Enter your username (or type '{NEW_USER_SENTINEL}' to create): "),
            )?;
            let username = if input.eq_ignore_ascii_case(NEW_USER_SENTINEL) {
                self.claim_new_username()?
            } else {
                input
            };
            if let Err(e) = validate_username(&username) {
                self.console.say(&format!("{e} 🚫"))?;
                continue;
            }

            let profile = self.store.load(&username)?;
            info!(user = %profile.username, "logged in");
            flash_message(self.console, &format!("Welcome back, {}! 👋", profile.username), 1000)?;
            return Ok(profile);
        }
    }

    fn claim_new_username(&mut self) -> Result<String> {
        loop {
            let name = input_prompt(self.console, "Enter a new username: ")?;
            if name.is_empty() {
                self.console.say("Username cannot be empty. 🚫")?;
                continue;
            }
            match check_new_username(self.store, &name) {
                Ok(()) => return Ok(name),
                Err(ProfileError::DuplicateUsername { .. }) => {
                    self.console.say("Username already exists. Please choose another. ⚠️")?;
                }
                Err(e) => self.console.say(&format!("{e} 🚫"))?,
            }
        }
    }

    // ── Device selection ──────────────────────────────────────────────────────

    fn select_device(&mut self, mut profile: UserProfile) -> Result<UserProfile> {
        self.console.clear()?;
        self.console.header("Select Your BradOS Device Type")?;
        self.console.say("Which Brad Device are you using today?")?;
        for (i, device) in DeviceType::ALL.iter().enumerate() {
            self.console
                .say(&format!("{}. BradOS {device} {} ({})", i + 1, device.emoji(), device.tagline()))?;
        }

        let choice = prompt_choice(self.console, "Enter your choice: ", &["1", "2", "3"])?;
        let device = match choice.as_str() {
            "1" => DeviceType::Mobile,
            "2" => DeviceType::Slate,
            _ => DeviceType::Compute,
        };
        profile.device_type = device;
        self.store.save(&profile)?;
        info!(user = %profile.username, device = %device, "device selected");
        flash_message(self.console, &format!("BradOS is now running in {device} mode. 🎉"), 2000)?;
        Ok(profile)
    }

    // ── Main menu ─────────────────────────────────────────────────────────────

    fn main_menu(&mut self, profile: UserProfile) -> Result<State> {
        let device = profile.device_type;
        let menu = full_menu(device);

        self.console.clear()?;
        self.console.header(&format!("BradOS {device} {} - Main Menu 🏠", device.emoji()))?;
        self.console.say(&format!("Logged in as: {} | Device: {device}", profile.username))?;
        self.console.say("\n--- Applications ---")?;
        for entry in &menu.apps {
            self.console.say(&format!("{}. {}", entry.key, entry.name))?;
        }
        self.console.say("\n--- System Options ---")?;
        for cmd in &menu.commands {
            self.console.say(&format!("{}. {}", cmd.key(), cmd.label()))?;
        }
        self.console.say("----------------------")?;

        let choice = prompt_choice(self.console, "Enter your choice: ", &menu.keys())?;
        let Some(action) = menu.resolve(&choice) else {
            return Ok(State::MainMenu(profile));
        };

        Ok(match action {
            MenuAction::Launch(app, kind) => State::InApp(profile, app, kind),
            MenuAction::System(SystemCommand::Settings) => {
                self.console.header("System Settings ⚙️")?;
                self.console.say("System settings not yet implemented. Stay tuned! 🛠️")?;
                wait_for_enter(self.console)?;
                State::MainMenu(profile)
            }
            MenuAction::System(SystemCommand::ClearScreen) => {
                self.console.clear()?;
                State::MainMenu(profile)
            }
            MenuAction::System(SystemCommand::Logout) => {
                info!(user = %profile.username, "logged out");
                flash_message(self.console, "Logging out... Goodbye! 👋", 2000)?;
                State::Login
            }
            MenuAction::System(SystemCommand::Shutdown) => {
                info!(user = %profile.username, "shutdown");
                flash_message(self.console, "Shutting down BradOS... See you next time! 💤", 3000)?;
                self.console.clear()?;
                State::Terminated
            }
        })
    }

    // ── Apps ──────────────────────────────────────────────────────────────────

    fn launch(&mut self, mut profile: UserProfile, app: AppId, kind: HandlerKind) -> Result<UserProfile> {
        info!(user = %profile.username, app = ?app, "launching app");
        match kind {
            HandlerKind::Stateless => apps::run_stateless(app, self.console, self.config)?,
            HandlerKind::ProfileAware => {
                let store = self.store;
                let mut save = |p: &UserProfile| {
                    store.save(p).inspect_err(|e| warn!(error = %e, "save from app failed"))
                };
                apps::run_profile_aware(app, self.console, &mut profile, &mut save)?;
            }
        }
        self.console.pause(1000);
        Ok(profile)
    }
}
