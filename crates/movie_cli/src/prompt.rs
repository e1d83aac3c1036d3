//! Line-oriented prompting over any reader/writer pair.
//!
//! # Responsibility
//! - Read trimmed answers from the user.
//! - Re-prompt until year/rating values pass validation.
//!
//! # Invariants
//! - End of input yields `None`; prompts never loop forever on a closed stdin.

use movie_core::{LookupError, ManualDetails, ManualEntry, ValidationError, ValidationLimits};
use std::io::{BufRead, Write};

pub struct Prompter<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Prompter<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    /// Writes one line of output; write failures are ignored.
    pub fn say(&mut self, message: impl AsRef<str>) {
        let _ = writeln!(self.output, "{}", message.as_ref());
    }

    /// Asks a question and returns the trimmed answer, `None` on EOF.
    pub fn ask(&mut self, question: &str) -> Option<String> {
        let _ = write!(self.output, "{question}");
        let _ = self.output.flush();

        let mut line = String::new();
        match self.input.read_line(&mut line) {
            Ok(0) | Err(_) => None,
            Ok(_) => Some(line.trim().to_string()),
        }
    }

    /// Asks until `parse` accepts the answer.
    pub fn ask_valid<T>(
        &mut self,
        question: &str,
        parse: impl Fn(&str) -> Result<T, ValidationError>,
    ) -> Option<T> {
        loop {
            let answer = self.ask(question)?;
            match parse(&answer) {
                Ok(value) => return Some(value),
                Err(err) => self.say(format!("  {err}.")),
            }
        }
    }

    pub fn ask_year(&mut self, limits: &ValidationLimits) -> Option<i32> {
        self.ask_valid("  Enter year: ", |input| limits.parse_year(input))
    }

    pub fn ask_rating(&mut self, limits: &ValidationLimits) -> Option<f64> {
        let question = format!(
            "  Enter rating ({}-{}): ",
            limits.min_rating, limits.max_rating
        );
        self.ask_valid(&question, |input| limits.parse_rating(input))
    }

    #[cfg(test)]
    pub fn into_output(self) -> W {
        self.output
    }
}

impl<R: BufRead, W: Write> ManualEntry for Prompter<R, W> {
    fn request_details(
        &mut self,
        _title: &str,
        reason: &LookupError,
        limits: &ValidationLimits,
    ) -> Option<ManualDetails> {
        self.say(format!("\n  Could not fetch from API ({reason}). Enter manually:"));
        let year = self.ask_year(limits)?;
        let rating = self.ask_rating(limits)?;
        Some(ManualDetails { year, rating })
    }
}
