//! Interactive resolution of records the mapping cannot classify.
//!
//! The prompt/read cycle blocks the whole pipeline until a human responds.
//! That is intentional: this is a single-operator tool and classification is
//! human-in-the-loop. The exchange sits behind the [`Resolve`] trait so tests
//! and non-interactive runs can swap in [`ScriptedResolver`].

use crate::model::Record;
use crate::Result;
use anyhow::{anyhow, Context};
use std::collections::VecDeque;
use std::fmt::Write as _;
use std::io::Write as _;

/// The operator's answer for one unresolved record.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Resolution {
    /// The chosen internal category.
    pub category: String,
    /// When true, persist `source category -> {description -> category}`
    /// into the mapping so the record resolves automatically next time.
    pub learn: bool,
}

pub trait Resolve {
    /// Chooses a category for `record` from the ordered `taxonomy`.
    ///
    /// Implementations must not fail on invalid operator input; the only
    /// acceptable error is losing the input channel itself.
    fn resolve(&mut self, record: &Record, taxonomy: &[String]) -> Result<Resolution>;
}

/// Prompts the operator on the terminal with a 1-indexed list of the
/// taxonomy. The operator answers with an index, optionally suffixed with
/// `+` to also learn the choice as a rule. Anything else re-prompts; invalid
/// input never aborts the run.
#[derive(Debug, Default)]
pub struct TerminalResolver;

impl TerminalResolver {
    pub fn new() -> Self {
        Self
    }
}

impl Resolve for TerminalResolver {
    fn resolve(&mut self, record: &Record, taxonomy: &[String]) -> Result<Resolution> {
        let mut prompt = format!(
            "\nPick a category for ${} {} (add '+' suffix to save):\n",
            record.debit, record.description
        );
        for (ix, category) in taxonomy.iter().enumerate() {
            let _ = writeln!(prompt, "{}: {}", ix + 1, category);
        }
        prompt.push('\n');

        let stdin = std::io::stdin();
        loop {
            print!("{prompt}");
            std::io::stdout()
                .flush()
                .context("Unable to flush the prompt to the terminal")?;

            let mut line = String::new();
            let bytes = stdin
                .read_line(&mut line)
                .context("Unable to read from the terminal")?;
            if bytes == 0 {
                return Err(
                    anyhow!("The input stream closed before a category was chosen").into(),
                );
            }

            let answer = line.trim_end_matches(['\n', '\r']);
            let (choice, learn) = match answer.strip_suffix('+') {
                Some(rest) => (rest, true),
                None => (answer, false),
            };

            // The answer must be exactly the decimal index as listed, e.g.
            // "2", not "02" or " 2".
            let chosen = taxonomy
                .iter()
                .enumerate()
                .find(|(ix, _)| (ix + 1).to_string() == choice);
            match chosen {
                Some((_, category)) => {
                    return Ok(Resolution {
                        category: category.clone(),
                        learn,
                    })
                }
                None => println!("Sorry, that's not an option. Try again!"),
            }
        }
    }
}

/// Answers from a prepared queue, in order. Used by tests, and usable as a
/// non-interactive batch mode.
#[derive(Debug, Default)]
pub struct ScriptedResolver {
    answers: VecDeque<Resolution>,
}

impl ScriptedResolver {
    pub fn new(answers: impl IntoIterator<Item = Resolution>) -> Self {
        Self {
            answers: answers.into_iter().collect(),
        }
    }
}

impl Resolve for ScriptedResolver {
    fn resolve(&mut self, record: &Record, _taxonomy: &[String]) -> Result<Resolution> {
        match self.answers.pop_front() {
            Some(resolution) => Ok(resolution),
            None => Err(anyhow!(
                "No scripted resolution left for '{}' ({})",
                record.description,
                record.source_category
            )
            .into()),
        }
    }
}
