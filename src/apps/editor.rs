//! Line editor for plain-text documents kept in the documents directory.
//!
//! Inside a document every line typed is appended; lines starting with `:`
//! are commands (`:p` print, `:d N` delete line N, `:w` save, `:q` quit,
//! `:wq` save and quit).

use anyhow::{Context, Result};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::debug;

use super::split_indexed;
use crate::profile::is_safe_name;
use crate::ui::{flash_message, input_prompt, prompt_choice, wait_for_enter, Console};

pub const DOC_EXT: &str = "txt";

#[derive(Debug)]
pub struct Document {
    path: PathBuf,
    pub lines: Vec<String>,
    dirty: bool,
}

impl Document {
    /// Opens `<dir>/<name>.txt`; a missing file starts an empty document.
    pub fn open(dir: &Path, name: &str) -> Result<Self> {
        if !is_safe_name(name) {
            anyhow::bail!("'{name}' is not a valid document name");
        }
        let path = dir.join(format!("{name}.{DOC_EXT}"));
        let lines = match std::fs::read_to_string(&path) {
            Ok(text) => text.lines().map(str::to_string).collect(),
            Err(e) if e.kind() == ErrorKind::NotFound => Vec::new(),
            Err(e) => return Err(e).with_context(|| format!("reading {}", path.display())),
        };
        Ok(Self { path, lines, dirty: false })
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn append(&mut self, line: &str) {
        self.lines.push(line.to_string());
        self.dirty = true;
    }

    pub fn delete(&mut self, idx: usize) -> Option<String> {
        if idx >= self.lines.len() {
            return None;
        }
        self.dirty = true;
        Some(self.lines.remove(idx))
    }

    pub fn save(&mut self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).with_context(|| format!("creating {}", parent.display()))?;
        }
        let mut text = self.lines.join("\n");
        if !text.is_empty() {
            text.push('\n');
        }
        std::fs::write(&self.path, text).with_context(|| format!("writing {}", self.path.display()))?;
        self.dirty = false;
        debug!(path = %self.path.display(), "document saved");
        Ok(())
    }
}

/// Document names (without extension) in `dir`, sorted.
pub fn list_documents(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = std::fs::read_dir(dir)
        .into_iter()
        .flatten()
        .flatten()
        .filter_map(|e| {
            let path = e.path();
            if path.extension().and_then(|x| x.to_str()) != Some(DOC_EXT) {
                return None;
            }
            path.file_stem().and_then(|s| s.to_str()).map(str::to_string)
        })
        .collect();
    names.sort();
    names
}

fn print_document(console: &mut dyn Console, doc: &Document) -> Result<()> {
    if doc.lines.is_empty() {
        return console.say("(empty document)");
    }
    for (i, line) in doc.lines.iter().enumerate() {
        console.say(&format!("{:>4} | {line}", i + 1))?;
    }
    Ok(())
}

fn edit(console: &mut dyn Console, mut doc: Document, name: &str) -> Result<()> {
    console.clear()?;
    console.header(&format!("BradTextEditor 📝 - {name}"))?;
    print_document(console, &doc)?;
    console.say("\nType to append. :p print, :d N delete, :w save, :q quit, :wq save+quit")?;
    loop {
        let line = console.read_line("> ")?;
        match line.trim() {
            ":p" => print_document(console, &doc)?,
            ":w" => {
                doc.save()?;
                console.say("Saved. 💾")?;
            }
            ":wq" => {
                doc.save()?;
                return flash_message(console, "Saved. 💾", 600);
            }
            ":q" => {
                if doc.is_dirty() {
                    let answer = prompt_choice(console, "Discard unsaved changes? (y/n): ", &["y", "n"])?;
                    if answer == "n" {
                        continue;
                    }
                }
                return Ok(());
            }
            cmd if cmd.starts_with(":d") => match split_indexed(&cmd[1..]) {
                Some(("d", idx)) => match doc.delete(idx) {
                    Some(gone) => console.say(&format!("Deleted: {gone}"))?,
                    None => console.say("No such line.")?,
                },
                _ => console.say("Usage: :d N")?,
            },
            cmd if cmd.starts_with(':') => console.say("Unknown command.")?,
            _ => doc.append(&line),
        }
    }
}

pub fn run(console: &mut dyn Console, docs_dir: &Path) -> Result<()> {
    loop {
        console.clear()?;
        console.header("BradTextEditor 📝")?;
        let docs = list_documents(docs_dir);
        if docs.is_empty() {
            console.say("No documents yet.")?;
        }
        for d in &docs {
            console.say(&format!("  • {d}"))?;
        }
        console.say("\no NAME = open or create, v NAME = view, q = back")?;

        let input = input_prompt(console, "editor> ")?;
        if input.eq_ignore_ascii_case("q") {
            return Ok(());
        }
        let (cmd, name) = input.split_once(' ').map(|(c, n)| (c, n.trim())).unwrap_or((input.as_str(), ""));
        match cmd {
            "o" | "v" => {
                let doc = match Document::open(docs_dir, name) {
                    Ok(doc) => doc,
                    Err(e) => {
                        flash_message(console, &format!("Error: {e:#}"), 800)?;
                        continue;
                    }
                };
                if cmd == "o" {
                    edit(console, doc, name)?;
                } else {
                    print_document(console, &doc)?;
                    wait_for_enter(console)?;
                }
            }
            _ => flash_message(console, "Unknown command.", 800)?,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::testing::ScriptedConsole;

    #[test]
    fn document_lifecycle() {
        let dir = tempfile::tempdir().unwrap();
        let docs = dir.path().join("documents");
        let mut doc = Document::open(&docs, "notes").unwrap();
        assert!(doc.lines.is_empty());
        doc.append("hello");
        doc.append("world");
        assert!(doc.is_dirty());
        doc.save().unwrap();
        assert!(!doc.is_dirty());

        assert_eq!(std::fs::read_to_string(docs.join("notes.txt")).unwrap(), "hello\nworld\n");
        assert_eq!(list_documents(&docs), vec!["notes".to_string()]);

        let mut again = Document::open(&docs, "notes").unwrap();
        assert_eq!(again.delete(0), Some("hello".to_string()));
        assert_eq!(again.delete(5), None);
        assert_eq!(again.lines, vec!["world".to_string()]);
    }

    #[test]
    fn unsafe_document_names_are_rejected() {
        let dir = tempfile::tempdir().unwrap();
        assert!(Document::open(dir.path(), "../escape").is_err());
        assert!(Document::open(dir.path(), "").is_err());
    }

    #[test]
    fn missing_documents_dir_lists_nothing() {
        let dir = tempfile::tempdir().unwrap();
        assert!(list_documents(&dir.path().join("nope")).is_empty());
    }

    #[test]
    fn interactive_edit_and_view() {
        let dir = tempfile::tempdir().unwrap();
        let docs = dir.path().to_path_buf();
        let mut c = ScriptedConsole::new(&[
            "o todo", "milk", "eggs", "bread", ":d 2", ":wq",
            "v todo", "",
            "o todo", "jam", ":q", "n", ":q", "y",
            "q",
        ]);
        run(&mut c, &docs).unwrap();

        assert_eq!(std::fs::read_to_string(docs.join("todo.txt")).unwrap(), "milk\nbread\n");
        assert!(c.saw("Deleted: eggs"));
        assert!(c.saw("   2 | bread"));
        assert_eq!(c.remaining(), 0);
    }

    #[test]
    fn bad_names_report_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let mut c = ScriptedConsole::new(&["o ../x", "zap", "q"]);
        run(&mut c, dir.path()).unwrap();
        assert!(c.saw("not a valid document name"));
        assert!(c.saw("Unknown command."));
    }
}
