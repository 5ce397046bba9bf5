use anyhow::Result;
use thiserror::Error;

use crate::ui::{input_prompt, Console};

#[derive(Debug, Error, PartialEq)]
pub enum CalcError {
    #[error("expected <number> <operator> <number>")]
    Malformed,
    #[error("'{0}' is not a number")]
    NotANumber(String),
    #[error("cannot divide by zero")]
    DivideByZero,
}

const OPERATORS: &[char] = &['+', '-', '*', '/', '%', '^'];

/// Evaluates a single binary expression such as `12.5 * -3`.
pub fn evaluate(expr: &str) -> Result<f64, CalcError> {
    let expr = expr.trim();
    // A leading sign belongs to the left operand, and so does an exponent sign.
    let mut prev = None;
    let (idx, op) = expr
        .char_indices()
        .find(|&(i, c)| {
            let exponent_sign = matches!(c, '+' | '-') && matches!(prev, Some('e' | 'E'));
            prev = Some(c);
            i > 0 && OPERATORS.contains(&c) && !exponent_sign
        })
        .ok_or(CalcError::Malformed)?;

    let lhs = expr[..idx].trim();
    let rhs = expr[idx + op.len_utf8()..].trim();
    if lhs.is_empty() || rhs.is_empty() {
        return Err(CalcError::Malformed);
    }
    let a = parse_operand(lhs)?;
    let b = parse_operand(rhs)?;

    match op {
        '+' => Ok(a + b),
        '-' => Ok(a - b),
        '*' => Ok(a * b),
        '/' if b == 0.0 => Err(CalcError::DivideByZero),
        '/' => Ok(a / b),
        '%' if b == 0.0 => Err(CalcError::DivideByZero),
        '%' => Ok(a % b),
        '^' => Ok(a.powf(b)),
        _ => Err(CalcError::Malformed),
    }
}

fn parse_operand(s: &str) -> Result<f64, CalcError> {
    s.parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| CalcError::NotANumber(s.to_string()))
}

pub fn format_number(v: f64) -> String {
    if v.fract() == 0.0 && v.abs() < 1e15 {
        format!("{}", v as i64)
    } else {
        format!("{v}")
    }
}

pub fn run(console: &mut dyn Console) -> Result<()> {
    console.clear()?;
    console.header("Simple Calculator ➕➖")?;
    console.say("Enter an expression like `7 * 6` (operators: + - * / % ^).")?;
    console.say("Type q to return to the main menu.")?;

    loop {
        let line = input_prompt(console, "calc> ")?;
        if line.eq_ignore_ascii_case("q") {
            return Ok(());
        }
        if line.is_empty() {
            continue;
        }
        match evaluate(&line) {
            Ok(v) => console.say(&format!("= {}", format_number(v)))?,
            Err(e) => console.say(&format!("Error: {e}"))?,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::testing::ScriptedConsole;

    #[test]
    fn basic_operations() {
        assert_eq!(evaluate("2 + 3"), Ok(5.0));
        assert_eq!(evaluate("10-4"), Ok(6.0));
        assert_eq!(evaluate("6 * 7"), Ok(42.0));
        assert_eq!(evaluate("9 / 2"), Ok(4.5));
        assert_eq!(evaluate("9 % 4"), Ok(1.0));
        assert_eq!(evaluate("2 ^ 10"), Ok(1024.0));
    }

    #[test]
    fn negative_operands() {
        assert_eq!(evaluate("-3 * 2"), Ok(-6.0));
        assert_eq!(evaluate("3 - -2"), Ok(5.0));
    }

    #[test]
    fn exponent_signs_stay_with_their_operand() {
        let v = evaluate("1e-5 + 2").unwrap();
        assert!((v - 2.00001).abs() < 1e-12);
        assert_eq!(evaluate("2E+3 - 1"), Ok(1999.0));
        assert_eq!(evaluate("3 * 1e-1"), Ok(3.0 * 1e-1));
        assert_eq!(evaluate("1e-5"), Err(CalcError::Malformed));
    }

    #[test]
    fn errors_are_reported() {
        assert_eq!(evaluate("1 / 0"), Err(CalcError::DivideByZero));
        assert_eq!(evaluate("1 % 0"), Err(CalcError::DivideByZero));
        assert_eq!(evaluate("42"), Err(CalcError::Malformed));
        assert_eq!(evaluate("4 +"), Err(CalcError::Malformed));
        assert_eq!(evaluate("a + 1"), Err(CalcError::NotANumber("a".into())));
    }

    #[test]
    fn integers_print_without_fraction() {
        assert_eq!(format_number(42.0), "42");
        assert_eq!(format_number(-6.0), "-6");
        assert_eq!(format_number(4.5), "4.5");
    }

    #[test]
    fn session_prints_results_until_quit() {
        let mut c = ScriptedConsole::new(&["6 * 7", "1 / 0", "q"]);
        run(&mut c).unwrap();
        assert!(c.saw("= 42"));
        assert!(c.saw("Error: cannot divide by zero"));
        assert_eq!(c.remaining(), 0);
    }
}
