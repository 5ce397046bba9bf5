use anyhow::{Context, Result};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use crate::ui::{flash_message, input_prompt, wait_for_enter, Console};

const PREVIEW_LINES: usize = 20;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub name: String,
    pub is_dir: bool,
}

/// Visible entries of `dir`, directories first, then by case-insensitive name.
pub fn list_entries(dir: &Path) -> Result<Vec<Entry>> {
    let mut entries: Vec<Entry> = std::fs::read_dir(dir)
        .with_context(|| format!("reading {}", dir.display()))?
        .flatten()
        .filter_map(|e| {
            let name = e.file_name().to_string_lossy().into_owned();
            if name.starts_with('.') {
                return None;
            }
            let is_dir = e.file_type().map(|t| t.is_dir()).unwrap_or(false);
            Some(Entry { name, is_dir })
        })
        .collect();
    entries.sort_by(|a, b| {
        b.is_dir
            .cmp(&a.is_dir)
            .then_with(|| a.name.to_lowercase().cmp(&b.name.to_lowercase()))
    });
    Ok(entries)
}

pub fn preview(path: &Path, max_lines: usize) -> Result<Vec<String>> {
    let file = File::open(path).with_context(|| format!("reading {}", path.display()))?;
    BufReader::new(file)
        .split(b'\n')
        .take(max_lines)
        .map(|line| {
            let mut line = line.with_context(|| format!("reading {}", path.display()))?;
            if line.last() == Some(&b'\r') {
                line.pop();
            }
            Ok(String::from_utf8_lossy(&line).into_owned())
        })
        .collect()
}

pub struct FileBrowser {
    cwd: PathBuf,
}

impl FileBrowser {
    pub fn new(start: PathBuf) -> Self {
        Self { cwd: start }
    }

    pub fn cwd(&self) -> &Path {
        &self.cwd
    }

    pub fn up(&mut self) -> bool {
        match self.cwd.parent() {
            Some(p) => {
                self.cwd = p.to_path_buf();
                true
            }
            None => false,
        }
    }

    pub fn enter(&mut self, name: &str) {
        self.cwd.push(name);
    }
}

pub fn run(console: &mut dyn Console) -> Result<()> {
    let start = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    browse(console, FileBrowser::new(start))
}

pub fn browse(console: &mut dyn Console, mut fb: FileBrowser) -> Result<()> {
    loop {
        console.clear()?;
        console.header("BradFileBrowser 📁")?;
        console.say(&format!("📂 {}", fb.cwd().display()))?;
        let entries = match list_entries(fb.cwd()) {
            Ok(e) => e,
            Err(e) => {
                console.say(&format!("Cannot read directory: {e:#}"))?;
                Vec::new()
            }
        };
        if entries.is_empty() {
            console.say("(empty)")?;
        }
        for (i, e) in entries.iter().enumerate() {
            let icon = if e.is_dir { "📁" } else { "📄" };
            console.say(&format!("{}. {icon} {}", i + 1, e.name))?;
        }
        console.say("\nN = open, .. = up, ~ = home, q = back")?;

        let input = input_prompt(console, "files> ")?;
        match input.as_str() {
            "q" | "Q" => return Ok(()),
            ".." => {
                if !fb.up() {
                    flash_message(console, "Already at the top.", 600)?;
                }
            }
            "~" => match dirs::home_dir() {
                Some(home) => fb = FileBrowser::new(home),
                None => flash_message(console, "No home directory.", 600)?,
            },
            other => {
                let Some(entry) = other
                    .parse::<usize>()
                    .ok()
                    .and_then(|n| n.checked_sub(1))
                    .and_then(|i| entries.get(i))
                else {
                    flash_message(console, "Unknown command.", 600)?;
                    continue;
                };
                if entry.is_dir {
                    fb.enter(&entry.name);
                } else {
                    let path = fb.cwd().join(&entry.name);
                    console.say(&format!("--- {} ---", entry.name))?;
                    match preview(&path, PREVIEW_LINES) {
                        Ok(lines) => {
                            for l in lines {
                                console.say(&l)?;
                            }
                        }
                        Err(e) => console.say(&format!("Cannot open file: {e:#}"))?,
                    }
                    wait_for_enter(console)?;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::testing::ScriptedConsole;

    fn fixture() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("zeta")).unwrap();
        std::fs::create_dir(dir.path().join("Alpha")).unwrap();
        std::fs::write(dir.path().join("b.txt"), "first\nsecond\nthird\n").unwrap();
        std::fs::write(dir.path().join("a.txt"), "").unwrap();
        std::fs::write(dir.path().join(".secret"), "hidden").unwrap();
        std::fs::write(dir.path().join("zeta").join("inner.txt"), "deep").unwrap();
        dir
    }

    #[test]
    fn listing_puts_directories_first_and_hides_dotfiles() {
        let dir = fixture();
        let names: Vec<String> = list_entries(dir.path()).unwrap().into_iter().map(|e| e.name).collect();
        assert_eq!(names, vec!["Alpha", "zeta", "a.txt", "b.txt"]);
    }

    #[test]
    fn preview_is_capped() {
        let dir = fixture();
        assert_eq!(preview(&dir.path().join("b.txt"), 2).unwrap(), vec!["first", "second"]);
    }

    #[test]
    fn preview_handles_crlf_and_invalid_utf8() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("mixed.txt");
        std::fs::write(&path, b"one\r\ntw\xffo\nthree").unwrap();
        assert_eq!(preview(&path, 10).unwrap(), vec!["one", "tw\u{fffd}o", "three"]);
    }

    #[test]
    fn preview_of_a_long_file_returns_only_the_head() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("big.log");
        let body: String = (0..100_000).map(|i| format!("line {i}\n")).collect();
        std::fs::write(&path, body).unwrap();
        let head = preview(&path, PREVIEW_LINES).unwrap();
        assert_eq!(head.len(), PREVIEW_LINES);
        assert_eq!(head[0], "line 0");
        assert_eq!(head[PREVIEW_LINES - 1], format!("line {}", PREVIEW_LINES - 1));
    }

    #[test]
    fn navigate_into_directory_preview_and_back_up() {
        let dir = fixture();
        // zeta is entry 2; inside it inner.txt is entry 1
        let mut c = ScriptedConsole::new(&["2", "1", "", "..", "4", "", "q"]);
        browse(&mut c, FileBrowser::new(dir.path().to_path_buf())).unwrap();
        assert!(c.saw("deep"));
        assert!(c.saw("--- b.txt ---"));
        assert!(c.saw("third"));
        assert_eq!(c.remaining(), 0);
    }

    #[test]
    fn out_of_range_entry_is_unknown() {
        let dir = fixture();
        let mut c = ScriptedConsole::new(&["0", "99", "q"]);
        browse(&mut c, FileBrowser::new(dir.path().to_path_buf())).unwrap();
        assert_eq!(c.output.iter().filter(|l| l.as_str() == "Unknown command.").count(), 2);
    }
}
