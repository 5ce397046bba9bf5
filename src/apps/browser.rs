use anyhow::Result;

use crate::ui::{flash_message, input_prompt, Console};

pub const HOME: &str = "brad://home";
const SCHEME: &str = "brad://";

pub struct Page {
    pub title: &'static str,
    pub body: &'static [&'static str],
    pub links: &'static [&'static str],
}

static PAGES: &[(&str, Page)] = &[
    (
        "brad://home",
        Page {
            title: "BradNet Home",
            body: &["Welcome to BradNet, the offline web. 🌐", "Pick a link below to get started."],
            links: &["brad://news", "brad://help", "brad://about"],
        },
    ),
    (
        "brad://news",
        Page {
            title: "BradNews Today",
            body: &[
                "• BradOS now ships in Mobile, Slate and Compute editions.",
                "• BradHub catalogue grows to six apps.",
                "• Local weather: mostly sunny, 100% chance of Brad.",
            ],
            links: &["brad://home"],
        },
    ),
    (
        "brad://help",
        Page {
            title: "Using BradBrowser",
            body: &[
                "Type an address such as brad://news, or a link number.",
                "b goes back, h goes home, q returns to the main menu.",
            ],
            links: &["brad://home", "brad://about"],
        },
    ),
    (
        "brad://about",
        Page {
            title: "About BradOS",
            body: &["BradOS is a simulated operating system for your terminal."],
            links: &["brad://home"],
        },
    ),
];

/// Lower-cases the address and adds the `brad://` scheme if missing.
pub fn normalize(address: &str) -> String {
    let a = address.trim().to_lowercase();
    if a.starts_with(SCHEME) {
        a
    } else {
        format!("{SCHEME}{a}")
    }
}

pub fn lookup(url: &str) -> Option<&'static Page> {
    PAGES.iter().find(|(u, _)| *u == url).map(|(_, p)| p)
}

#[derive(Debug)]
pub struct History {
    current: String,
    back: Vec<String>,
}

impl Default for History {
    fn default() -> Self {
        Self::new()
    }
}

impl History {
    pub fn new() -> Self {
        Self { current: HOME.to_string(), back: Vec::new() }
    }

    pub fn current(&self) -> &str {
        &self.current
    }

    pub fn visit(&mut self, url: String) {
        if url != self.current {
            let prev = std::mem::replace(&mut self.current, url);
            self.back.push(prev);
        }
    }

    pub fn go_back(&mut self) -> bool {
        match self.back.pop() {
            Some(prev) => {
                self.current = prev;
                true
            }
            None => false,
        }
    }
}

fn render(console: &mut dyn Console, url: &str) -> Result<&'static [&'static str]> {
    console.say(&format!("🔗 {url}"))?;
    match lookup(url) {
        Some(page) => {
            console.say(&format!("\n# {}\n", page.title))?;
            for line in page.body {
                console.say(line)?;
            }
            console.say("")?;
            for (i, link) in page.links.iter().enumerate() {
                console.say(&format!("[{}] {link}", i + 1))?;
            }
            Ok(page.links)
        }
        None => {
            console.say("\n# 404 - Page not found")?;
            console.say("BradNet could not find that address.")?;
            Ok(&[])
        }
    }
}

pub fn run(console: &mut dyn Console) -> Result<()> {
    let mut history = History::new();
    loop {
        console.clear()?;
        console.header("BradBrowser 🌐")?;
        let links = render(console, history.current())?;

        let input = input_prompt(console, "\naddress (b back, h home, q quit)> ")?;
        match input.as_str() {
            "q" | "Q" => return Ok(()),
            "" => {}
            "b" => {
                if !history.go_back() {
                    flash_message(console, "No earlier page.", 800)?;
                }
            }
            "h" => history.visit(HOME.to_string()),
            other => match other.parse::<usize>() {
                Ok(n) if (1..=links.len()).contains(&n) => history.visit(links[n - 1].to_string()),
                Ok(_) => flash_message(console, "No such link.", 800)?,
                Err(_) => history.visit(normalize(other)),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::testing::ScriptedConsole;

    #[test]
    fn addresses_are_normalized() {
        assert_eq!(normalize("News"), "brad://news");
        assert_eq!(normalize(" brad://HELP "), "brad://help");
    }

    #[test]
    fn every_link_resolves() {
        for (_, page) in PAGES {
            for link in page.links {
                assert!(lookup(link).is_some(), "{link}");
            }
        }
    }

    #[test]
    fn history_goes_back_in_order() {
        let mut h = History::new();
        h.visit("brad://news".into());
        h.visit("brad://news".into());
        h.visit("brad://help".into());
        assert!(h.go_back());
        assert_eq!(h.current(), "brad://news");
        assert!(h.go_back());
        assert_eq!(h.current(), HOME);
        assert!(!h.go_back());
    }

    #[test]
    fn browsing_links_and_unknown_pages() {
        let mut c = ScriptedConsole::new(&["1", "nowhere", "b", "b", "b", "q"]);
        run(&mut c).unwrap();
        assert!(c.saw("# BradNews Today"));
        assert!(c.saw("# 404"));
        assert!(c.saw("No earlier page."));
    }

    #[test]
    fn out_of_range_link_stays_on_the_page() {
        let mut c = ScriptedConsole::new(&["9", "q"]);
        run(&mut c).unwrap();
        assert!(c.saw("No such link."));
        assert_eq!(c.output.iter().filter(|l| l.contains("# BradNet Home")).count(), 2);
    }
}
