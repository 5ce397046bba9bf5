use anyhow::Result;
use rand::Rng;
use std::cmp::Ordering;

use crate::ui::{input_prompt, prompt_choice, wait_for_enter, Console};

// ── Number guessing ───────────────────────────────────────────────────────────

pub const GUESS_MIN: u32 = 1;
pub const GUESS_MAX: u32 = 100;

/// Plays one round and returns the number of guesses taken, or `None` if the
/// player gave up.
pub fn guess_the_number<R: Rng>(console: &mut dyn Console, rng: &mut R) -> Result<Option<u32>> {
    let secret = rng.gen_range(GUESS_MIN..=GUESS_MAX);
    console.say(&format!("I'm thinking of a number between {GUESS_MIN} and {GUESS_MAX}. (q to give up)"))?;
    let mut tries = 0;
    loop {
        let input = input_prompt(console, "Your guess: ")?;
        if input.eq_ignore_ascii_case("q") {
            console.say(&format!("The number was {secret}."))?;
            return Ok(None);
        }
        let Ok(guess) = input.parse::<u32>() else {
            console.say("That's not a number.")?;
            continue;
        };
        tries += 1;
        match guess.cmp(&secret) {
            Ordering::Less => console.say("Higher! ⬆️")?,
            Ordering::Greater => console.say("Lower! ⬇️")?,
            Ordering::Equal => {
                console.say(&format!("Correct! You got it in {tries} tries. 🎉"))?;
                return Ok(Some(tries));
            }
        }
    }
}

// ── Rock, paper, scissors ─────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Hand {
    Rock,
    Paper,
    Scissors,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Win,
    Lose,
    Draw,
}

impl Hand {
    const ALL: [Hand; 3] = [Hand::Rock, Hand::Paper, Hand::Scissors];

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "r" | "rock" => Some(Hand::Rock),
            "p" | "paper" => Some(Hand::Paper),
            "s" | "scissors" => Some(Hand::Scissors),
            _ => None,
        }
    }

    fn beats(self, other: Hand) -> bool {
        matches!(
            (self, other),
            (Hand::Rock, Hand::Scissors) | (Hand::Paper, Hand::Rock) | (Hand::Scissors, Hand::Paper)
        )
    }

    pub fn against(self, other: Hand) -> Outcome {
        if self == other {
            Outcome::Draw
        } else if self.beats(other) {
            Outcome::Win
        } else {
            Outcome::Lose
        }
    }
}

pub fn rock_paper_scissors<R: Rng>(console: &mut dyn Console, rng: &mut R) -> Result<Outcome> {
    let player = loop {
        let input = input_prompt(console, "Rock, paper or scissors? (r/p/s): ")?;
        match Hand::parse(&input) {
            Some(h) => break h,
            None => console.say("Pick r, p or s.")?,
        }
    };
    let cpu = Hand::ALL[rng.gen_range(0..Hand::ALL.len())];
    let outcome = player.against(cpu);
    let verdict = match outcome {
        Outcome::Win => "You win! 🏆",
        Outcome::Lose => "BradBot wins. 🤖",
        Outcome::Draw => "It's a draw.",
    };
    console.say(&format!("You: {player:?}  BradBot: {cpu:?}. {verdict}"))?;
    Ok(outcome)
}

// ── Game center ───────────────────────────────────────────────────────────────

pub fn run(console: &mut dyn Console) -> Result<()> {
    let mut rng = rand::thread_rng();
    loop {
        console.clear()?;
        console.header("BradGame Center 🕹️")?;
        console.say("1. Guess the Number")?;
        console.say("2. Rock, Paper, Scissors")?;
        console.say("q. Back")?;
        match prompt_choice(console, "Enter your choice: ", &["1", "2", "q"])?.as_str() {
            "1" => {
                guess_the_number(console, &mut rng)?;
            }
            "2" => {
                rock_paper_scissors(console, &mut rng)?;
            }
            _ => return Ok(()),
        }
        wait_for_enter(console)?;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::testing::ScriptedConsole;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn hands_resolve_like_the_playground_game() {
        assert_eq!(Hand::Rock.against(Hand::Scissors), Outcome::Win);
        assert_eq!(Hand::Scissors.against(Hand::Rock), Outcome::Lose);
        assert_eq!(Hand::Paper.against(Hand::Rock), Outcome::Win);
        assert_eq!(Hand::Paper.against(Hand::Paper), Outcome::Draw);
        assert_eq!(Hand::parse(" Rock "), Some(Hand::Rock));
        assert_eq!(Hand::parse("lizard"), None);
    }

    #[test]
    fn guessing_converges_with_hints() {
        let secret = StdRng::seed_from_u64(7).gen_range(GUESS_MIN..=GUESS_MAX);
        let low = (secret - 1).max(GUESS_MIN).to_string();
        let exact = secret.to_string();
        let mut c = ScriptedConsole::new(&["abc", low.as_str(), exact.as_str()]);
        let tries = guess_the_number(&mut c, &mut StdRng::seed_from_u64(7)).unwrap();

        let expected = if secret == GUESS_MIN { 1 } else { 2 };
        assert_eq!(tries, Some(expected));
        assert!(c.saw("That's not a number."));
        assert!(c.saw("Correct!"));
    }

    #[test]
    fn giving_up_reveals_the_number() {
        let mut c = ScriptedConsole::new(&["q"]);
        let tries = guess_the_number(&mut c, &mut StdRng::seed_from_u64(1)).unwrap();
        assert_eq!(tries, None);
        assert!(c.saw("The number was"));
    }

    #[test]
    fn rps_reprompts_on_bad_hand() {
        let mut c = ScriptedConsole::new(&["lizard", "p"]);
        rock_paper_scissors(&mut c, &mut StdRng::seed_from_u64(3)).unwrap();
        assert!(c.saw("Pick r, p or s."));
        assert!(c.saw("You: Paper"));
    }
}
