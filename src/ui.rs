use anyhow::{bail, Context, Result};
use chrono::Local;
use crossterm::{
    cursor::MoveTo,
    execute, queue,
    style::{Attribute, Color, Print, ResetColor, SetAttribute, SetForegroundColor},
    terminal::{Clear, ClearType},
};
use std::io::{BufRead, Write};
use std::time::Duration;

use crate::config::{Config, HEADER_LINES};

// ── Console ───────────────────────────────────────────────────────────────────

/// Everything the shell and its apps need from the terminal. The session
/// loop and every app talk to this, never to stdin/stdout directly.
pub trait Console {
    fn clear(&mut self) -> Result<()>;

    fn header(&mut self, title: &str) -> Result<()>;

    fn say(&mut self, line: &str) -> Result<()>;

    /// Prints `prompt` and reads one line, without the trailing newline.
    /// A closed input stream is an error.
    fn read_line(&mut self, prompt: &str) -> Result<String>;

    /// Cosmetic delay.
    fn pause(&mut self, ms: u64);
}

// ── Terminal console ──────────────────────────────────────────────────────────

const SEPARATOR_WIDTH: usize = 48;

pub struct TerminalConsole {
    theme: Color,
    pacing: bool,
}

impl TerminalConsole {
    pub fn new(config: &Config) -> Self {
        Self {
            theme: config.theme_color(),
            pacing: config.settings.pacing,
        }
    }
}

impl Console for TerminalConsole {
    fn clear(&mut self) -> Result<()> {
        let mut out = std::io::stdout();
        execute!(out, Clear(ClearType::All), Clear(ClearType::Purge), MoveTo(0, 0))?;
        Ok(())
    }

    fn header(&mut self, title: &str) -> Result<()> {
        let mut out = std::io::stdout();
        let w = SEPARATOR_WIDTH;
        let sep = "=".repeat(w);
        queue!(out, SetForegroundColor(self.theme), SetAttribute(Attribute::Bold))?;
        for line in HEADER_LINES {
            queue!(out, Print(format!("{line:^w$}\r\n")))?;
        }
        queue!(
            out,
            SetAttribute(Attribute::NormalIntensity),
            Print(format!("{sep}\r\n")),
            SetAttribute(Attribute::Bold),
            Print(format!("{title:^w$}\r\n")),
            SetAttribute(Attribute::Reset),
            SetForegroundColor(self.theme),
            Print(format!("{sep}\r\n")),
            SetAttribute(Attribute::Dim),
            Print(format!("{}\r\n\r\n", Local::now().format("%A, %d. %B - %I:%M%p"))),
            SetAttribute(Attribute::Reset),
            ResetColor,
        )?;
        out.flush()?;
        Ok(())
    }

    fn say(&mut self, line: &str) -> Result<()> {
        let mut out = std::io::stdout();
        writeln!(out, "{line}")?;
        Ok(())
    }

    fn read_line(&mut self, prompt: &str) -> Result<String> {
        let mut out = std::io::stdout();
        write!(out, "{prompt}")?;
        out.flush()?;
        let mut buf = String::new();
        let n = std::io::stdin()
            .lock()
            .read_line(&mut buf)
            .context("reading from terminal")?;
        if n == 0 {
            bail!("input stream closed");
        }
        Ok(buf.trim_end_matches(&['\r', '\n'][..]).to_string())
    }

    fn pause(&mut self, ms: u64) {
        if self.pacing {
            std::thread::sleep(Duration::from_millis(ms));
        }
    }
}

// ── Prompts ───────────────────────────────────────────────────────────────────

/// Blocks until the trimmed input is one of `allowed`, re-prompting otherwise.
pub fn prompt_choice(console: &mut dyn Console, message: &str, allowed: &[&str]) -> Result<String> {
    loop {
        let input = console.read_line(message)?;
        let input = input.trim();
        if let Some(hit) = allowed.iter().find(|k| k.eq_ignore_ascii_case(input)) {
            return Ok(hit.to_string());
        }
        console.say(&format!("Invalid choice. Please pick one of: {}", allowed.join(", ")))?;
    }
}

pub fn input_prompt(console: &mut dyn Console, prompt: &str) -> Result<String> {
    Ok(console.read_line(prompt)?.trim().to_string())
}

pub fn wait_for_enter(console: &mut dyn Console) -> Result<()> {
    console.read_line("\nPress Enter to continue... ↩️")?;
    Ok(())
}

pub fn flash_message(console: &mut dyn Console, message: &str, ms: u64) -> Result<()> {
    console.say(message)?;
    console.pause(ms);
    Ok(())
}

// ── Scripted console ──────────────────────────────────────────────────────────


#[cfg(test)]
mod tests {
    use super::testing::ScriptedConsole;
    use super::*;

    #[test]
    fn prompt_choice_reprompts_until_valid() {
        let mut c = ScriptedConsole::new(&["9", "", " 2 "]);
        let got = prompt_choice(&mut c, "Enter your choice: ", &["1", "2", "3"]).unwrap();
        assert_eq!(got, "2");
        assert_eq!(c.remaining(), 0);
        assert_eq!(c.output.iter().filter(|l| l.starts_with("Invalid choice")).count(), 2);
    }

    #[test]
    fn prompt_choice_matches_letters_case_insensitively() {
        let mut c = ScriptedConsole::new(&["X"]);
        assert_eq!(prompt_choice(&mut c, "> ", &["1", "x"]).unwrap(), "x");
    }

    #[test]
    fn prompt_choice_fails_when_input_closes() {
        let mut c = ScriptedConsole::new(&["nope"]);
        assert!(prompt_choice(&mut c, "> ", &["1"]).is_err());
    }

    #[test]
    fn input_prompt_trims() {
        let mut c = ScriptedConsole::new(&["  alice \t"]);
        assert_eq!(input_prompt(&mut c, "name: ").unwrap(), "alice");
    }
}
