//! Which applications a device shows, and under which keys.

use crate::profile::DeviceType;

// ── Applications ──────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AppId {
    Calculator,
    Mail,
    GameCenter,
    Hub,
    TaskManager,
    FileBrowser,
    TextEditor,
    Browser,
}

/// Calling convention for an app's handler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandlerKind {
    /// Runs without access to the profile.
    Stateless,
    /// Receives the live profile plus a save callback.
    ProfileAware,
}

impl AppId {
    pub fn display_name(self) -> &'static str {
        match self {
            AppId::Calculator => "Simple Calculator ➕➖",
            AppId::Mail => "BradMail 📧",
            AppId::GameCenter => "BradGame Center 🕹️",
            AppId::Hub => "BradHub 🌐🛍️",
            AppId::TaskManager => "Task Manager ✅📋",
            AppId::FileBrowser => "BradFileBrowser 📁",
            AppId::TextEditor => "BradTextEditor 📝",
            AppId::Browser => "BradBrowser 🌐",
        }
    }

    pub fn handler_kind(self) -> HandlerKind {
        match self {
            AppId::Mail | AppId::Hub | AppId::TaskManager => HandlerKind::ProfileAware,
            _ => HandlerKind::Stateless,
        }
    }
}

const MOBILE_APPS: &[AppId] = &[AppId::Mail, AppId::GameCenter, AppId::TaskManager, AppId::Browser];

const SLATE_APPS: &[AppId] = &[
    AppId::Calculator,
    AppId::Mail,
    AppId::GameCenter,
    AppId::TaskManager,
    AppId::Hub,
    AppId::FileBrowser,
    AppId::Browser,
];

const COMPUTE_APPS: &[AppId] = &[
    AppId::Calculator,
    AppId::Mail,
    AppId::GameCenter,
    AppId::Hub,
    AppId::TaskManager,
    AppId::FileBrowser,
    AppId::TextEditor,
    AppId::Browser,
];

fn device_apps(device: DeviceType) -> &'static [AppId] {
    match device {
        DeviceType::Mobile => MOBILE_APPS,
        DeviceType::Slate => SLATE_APPS,
        DeviceType::Compute => COMPUTE_APPS,
    }
}

// ── System commands ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SystemCommand {
    Settings,
    ClearScreen,
    Logout,
    Shutdown,
}

impl SystemCommand {
    pub const ALL: [SystemCommand; 4] = [
        SystemCommand::Settings,
        SystemCommand::ClearScreen,
        SystemCommand::Logout,
        SystemCommand::Shutdown,
    ];

    pub fn key(self) -> &'static str {
        match self {
            SystemCommand::Settings => "s",
            SystemCommand::ClearScreen => "c",
            SystemCommand::Logout => "l",
            SystemCommand::Shutdown => "x",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            SystemCommand::Settings => "System Settings ⚙️",
            SystemCommand::ClearScreen => "Clear Screen 🧹",
            SystemCommand::Logout => "Logout 🚪",
            SystemCommand::Shutdown => "Shutdown BradOS 🛑",
        }
    }
}

// ── Menu ──────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuEntry {
    pub key: String,
    pub app: AppId,
    pub name: &'static str,
    pub kind: HandlerKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuAction {
    Launch(AppId, HandlerKind),
    System(SystemCommand),
}

#[derive(Debug, Clone)]
pub struct Menu {
    pub apps: Vec<MenuEntry>,
    pub commands: Vec<SystemCommand>,
}

impl Menu {
    /// Every key the menu accepts, apps first.
    pub fn keys(&self) -> Vec<&str> {
        self.apps
            .iter()
            .map(|e| e.key.as_str())
            .chain(self.commands.iter().map(|c| c.key()))
            .collect()
    }

    pub fn resolve(&self, key: &str) -> Option<MenuAction> {
        if let Some(entry) = self.apps.iter().find(|e| e.key == key) {
            return Some(MenuAction::Launch(entry.app, entry.kind));
        }
        self.commands
            .iter()
            .find(|c| c.key() == key)
            .map(|c| MenuAction::System(*c))
    }
}

/// Apps for `device`, keyed "1".."n" in listing order.
pub fn available_apps(device: DeviceType) -> Vec<MenuEntry> {
    device_apps(device)
        .iter()
        .enumerate()
        .map(|(i, app)| MenuEntry {
            key: (i + 1).to_string(),
            app: *app,
            name: app.display_name(),
            kind: app.handler_kind(),
        })
        .collect()
}

pub fn full_menu(device: DeviceType) -> Menu {
    Menu {
        apps: available_apps(device),
        commands: SystemCommand::ALL.to_vec(),
    }
}
