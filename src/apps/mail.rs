use anyhow::Result;
use chrono::Local;
use serde_json::Map;
use tracing::info;

use super::SaveFn;
use crate::profile::{MailMessage, UserProfile};
use crate::ui::{flash_message, input_prompt, prompt_choice, wait_for_enter, Console};

/// Files a new message under `bradmail_sent`; a message to oneself is also
/// delivered to the inbox.
pub fn compose(profile: &mut UserProfile, to: &str, subject: &str, body: &str, sent_at: String) {
    let msg = MailMessage {
        from: profile.username.clone(),
        to: to.to_string(),
        subject: subject.to_string(),
        body: body.to_string(),
        sent_at,
        read: false,
        extra: Map::new(),
    };
    if msg.to == profile.username {
        profile.bradmail_inbox.push(msg.clone());
    }
    profile.bradmail_sent.push(MailMessage { read: true, ..msg });
}

pub fn unread_count(profile: &UserProfile) -> usize {
    profile.bradmail_inbox.iter().filter(|m| !m.read).count()
}

fn subject_or_placeholder(m: &MailMessage) -> &str {
    if m.subject.is_empty() {
        "(no subject)"
    } else {
        &m.subject
    }
}

fn show_message(console: &mut dyn Console, m: &MailMessage) -> Result<()> {
    console.say("")?;
    console.say(&format!("From:    {}", m.from))?;
    console.say(&format!("To:      {}", m.to))?;
    console.say(&format!("Date:    {}", m.sent_at))?;
    console.say(&format!("Subject: {}", subject_or_placeholder(m)))?;
    console.say("")?;
    for line in m.body.lines() {
        console.say(line)?;
    }
    Ok(())
}

fn inbox(console: &mut dyn Console, profile: &mut UserProfile, save: &mut SaveFn<'_>) -> Result<()> {
    loop {
        console.clear()?;
        console.header("BradMail - Inbox")?;
        if profile.bradmail_inbox.is_empty() {
            console.say("Your inbox is empty. 📭")?;
            return wait_for_enter(console);
        }
        for (i, m) in profile.bradmail_inbox.iter().enumerate() {
            let marker = if m.read { " " } else { "*" };
            console.say(&format!("{}. [{marker}] {} - {}", i + 1, m.from, subject_or_placeholder(m)))?;
        }
        let choice = input_prompt(console, "\nRead which message (Enter to go back): ")?;
        if choice.is_empty() {
            return Ok(());
        }
        let Some(idx) = choice.parse::<usize>().ok().filter(|n| (1..=profile.bradmail_inbox.len()).contains(n)) else {
            flash_message(console, "No such message.", 800)?;
            continue;
        };
        let msg = &mut profile.bradmail_inbox[idx - 1];
        if !msg.read {
            msg.read = true;
            save(profile)?;
        }
        show_message(console, &profile.bradmail_inbox[idx - 1])?;
        wait_for_enter(console)?;
    }
}

fn sent(console: &mut dyn Console, profile: &UserProfile) -> Result<()> {
    console.clear()?;
    console.header("BradMail - Sent")?;
    if profile.bradmail_sent.is_empty() {
        console.say("Nothing sent yet.")?;
    }
    for (i, m) in profile.bradmail_sent.iter().enumerate() {
        console.say(&format!("{}. To {} - {} ({})", i + 1, m.to, subject_or_placeholder(m), m.sent_at))?;
    }
    wait_for_enter(console)
}

fn compose_dialog(console: &mut dyn Console, profile: &mut UserProfile, save: &mut SaveFn<'_>) -> Result<()> {
    console.clear()?;
    console.header("BradMail - Compose")?;
    let to = input_prompt(console, "To: ")?;
    if to.is_empty() {
        return flash_message(console, "Recipient cannot be empty. 🚫", 800);
    }
    let subject = input_prompt(console, "Subject: ")?;
    console.say("Body (finish with a single '.' on its own line):")?;
    let mut body = Vec::new();
    loop {
        let line = console.read_line("")?;
        if line.trim() == "." {
            break;
        }
        body.push(line);
    }
    compose(profile, &to, &subject, &body.join("\n"), Local::now().to_rfc3339());
    save(profile)?;
    info!(user = %profile.username, to = %to, "mail sent");
    flash_message(console, &format!("Message sent to {to}. 📨"), 800)
}

pub fn run(console: &mut dyn Console, profile: &mut UserProfile, save: &mut SaveFn<'_>) -> Result<()> {
    loop {
        console.clear()?;
        console.header("BradMail 📧")?;
        console.say(&format!(
            "Inbox: {} ({} unread) | Sent: {}",
            profile.bradmail_inbox.len(),
            unread_count(profile),
            profile.bradmail_sent.len()
        ))?;
        console.say("1. Inbox")?;
        console.say("2. Sent")?;
        console.say("3. Compose")?;
        console.say("q. Back")?;
        match prompt_choice(console, "Enter your choice: ", &["1", "2", "3", "q"])?.as_str() {
            "1" => inbox(console, profile, save)?,
            "2" => sent(console, profile)?,
            "3" => compose_dialog(console, profile, save)?,
            _ => return Ok(()),
        }
    }
}
