use anyhow::Result;
use chrono::Local;

use super::{split_indexed, SaveFn};
use crate::profile::{Task, UserProfile};
use crate::ui::{flash_message, input_prompt, Console};

pub fn add_task(profile: &mut UserProfile, title: &str, created_at: String) -> bool {
    let title = title.trim();
    if title.is_empty() {
        return false;
    }
    profile.tasks.push(Task {
        title: title.to_string(),
        done: false,
        created_at,
        ..Task::default()
    });
    true
}

pub fn toggle_task(profile: &mut UserProfile, idx: usize) -> bool {
    match profile.tasks.get_mut(idx) {
        Some(t) => {
            t.done = !t.done;
            true
        }
        None => false,
    }
}

pub fn remove_task(profile: &mut UserProfile, idx: usize) -> Option<Task> {
    (idx < profile.tasks.len()).then(|| profile.tasks.remove(idx))
}

/// Drops completed tasks, returning how many were removed.
pub fn clear_completed(profile: &mut UserProfile) -> usize {
    let before = profile.tasks.len();
    profile.tasks.retain(|t| !t.done);
    before - profile.tasks.len()
}

pub fn run(console: &mut dyn Console, profile: &mut UserProfile, save: &mut SaveFn<'_>) -> Result<()> {
    loop {
        console.clear()?;
        console.header("Task Manager ✅📋")?;
        if profile.tasks.is_empty() {
            console.say("No tasks yet.")?;
        }
        for (i, t) in profile.tasks.iter().enumerate() {
            let mark = if t.done { "x" } else { " " };
            console.say(&format!("{}. [{mark}] {}", i + 1, t.title))?;
        }
        console.say("\na = add, d N = toggle done, r N = remove, c = clear completed, q = back")?;

        let input = input_prompt(console, "tasks> ")?;
        let changed = match input.as_str() {
            "q" | "Q" => return Ok(()),
            "a" => {
                let title = input_prompt(console, "Task title: ")?;
                let added = add_task(profile, &title, Local::now().to_rfc3339());
                if !added {
                    flash_message(console, "Task title cannot be empty. 🚫", 800)?;
                }
                added
            }
            "c" => {
                let n = clear_completed(profile);
                flash_message(console, &format!("Cleared {n} completed task(s)."), 600)?;
                n > 0
            }
            other => {
                let hit = match split_indexed(other) {
                    Some(("d", idx)) => toggle_task(profile, idx),
                    Some(("r", idx)) => remove_task(profile, idx).is_some(),
                    _ => {
                        flash_message(console, "Unknown command.", 800)?;
                        continue;
                    }
                };
                if !hit {
                    flash_message(console, "No such task.", 800)?;
                }
                hit
            }
        };
        if changed {
            save(profile)?;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ProfileError;
    use crate::ui::testing::ScriptedConsole;

    #[test]
    fn add_rejects_blank_titles() {
        let mut p = UserProfile::new("alice");
        assert!(!add_task(&mut p, "   ", "t0".into()));
        assert!(add_task(&mut p, " water plants ", "t0".into()));
        assert_eq!(p.tasks[0].title, "water plants");
    }

    #[test]
    fn toggle_remove_and_clear() {
        let mut p = UserProfile::new("alice");
        add_task(&mut p, "one", "t0".into());
        add_task(&mut p, "two", "t1".into());
        add_task(&mut p, "three", "t2".into());

        assert!(toggle_task(&mut p, 0));
        assert!(toggle_task(&mut p, 2));
        assert!(!toggle_task(&mut p, 3));
        assert_eq!(remove_task(&mut p, 1).map(|t| t.title), Some("two".to_string()));
        assert!(remove_task(&mut p, 5).is_none());
        assert_eq!(clear_completed(&mut p), 2);
        assert!(p.tasks.is_empty());
    }

    #[test]
    fn interactive_session_saves_after_each_change() {
        let mut p = UserProfile::new("alice");
        let mut snapshots: Vec<usize> = Vec::new();
        let mut save = |p: &UserProfile| -> Result<(), ProfileError> {
            snapshots.push(p.tasks.len());
            Ok(())
        };
        let mut c = ScriptedConsole::new(&["a", "feed cat", "a", "", "d 1", "d 7", "c", "q"]);
        run(&mut c, &mut p, &mut save).unwrap();

        assert_eq!(snapshots, vec![1, 1, 0]);
        assert!(p.tasks.is_empty());
        assert!(c.saw("Task title cannot be empty"));
        assert!(c.saw("No such task."));
    }

    #[test]
    fn save_failure_aborts_the_app() {
        let mut p = UserProfile::new("alice");
        let mut save = |_: &UserProfile| -> Result<(), ProfileError> {
            Err(ProfileError::storage("/nowhere", std::io::Error::other("disk full")))
        };
        let mut c = ScriptedConsole::new(&["a", "feed cat", "q"]);
        let err = run(&mut c, &mut p, &mut save).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ProfileError>(),
            Some(ProfileError::StorageUnavailable { .. })
        ));
    }
}
