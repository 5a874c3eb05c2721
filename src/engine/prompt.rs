//! Interactive definitions from a terminal
//!
//! [`Prompter`] answers [`Definer`] requests by asking the operator whether an
//! item is crafted and, if so, collecting its ingredients. Bad answers are
//! reported and asked again; only a closed input stream ends the session.

use std::io::{self, BufRead, StdinLock, Stdout, Write};

use super::define::{Cause, Definer, Definition};
use super::error::{Result, ShopError};
use super::request::parse_ingredient_line;

/// Terminal-backed [`Definer`]
pub struct Prompter<R, W> {
    input: R,
    output: W,
}

impl Prompter<StdinLock<'static>, Stdout> {
    /// Prompt on the process's stdin/stdout
    pub fn stdio() -> Self {
        Self::new(io::stdin().lock(), io::stdout())
    }
}

impl<R: BufRead, W: Write> Prompter<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    /// Give back the output sink (handy for inspecting a transcript)
    pub fn into_output(self) -> W {
        self.output
    }

    fn read_line(&mut self, name: &str) -> Result<String> {
        self.output.flush()?;
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Err(ShopError::Prompt(name.to_string()));
        }
        Ok(line)
    }

    fn ask_yes_no(&mut self, question: &str, name: &str) -> Result<bool> {
        loop {
            write!(self.output, "{} (y/n): ", question)?;
            match self.read_line(name)?.trim().to_lowercase().as_str() {
                "y" => return Ok(true),
                "n" => return Ok(false),
                _ => continue,
            }
        }
    }

    fn collect_ingredients(&mut self, name: &str) -> Result<Vec<(String, u64)>> {
        writeln!(
            self.output,
            "Please key in a list of ingredients in the format <N> <Ingredient>"
        )?;

        loop {
            write!(self.output, "\tIngredient(s): ")?;
            let line = self.read_line(name)?;
            match parse_ingredient_line(&line) {
                Ok(requests) if requests.is_empty() => {
                    writeln!(self.output, "At least one ingredient is needed")?;
                }
                Ok(requests) => {
                    for request in &requests {
                        writeln!(self.output, "\t  {} x {}", request.count, request.name)?;
                    }
                    return Ok(requests.into_iter().map(|r| (r.name, r.count)).collect());
                }
                Err(e) if e.is_recoverable_input() => {
                    writeln!(self.output, "{}", e)?;
                }
                Err(e) => return Err(e),
            }
        }
    }
}

impl<R: BufRead, W: Write> Definer for Prompter<R, W> {
    fn define(&mut self, name: &str, cause: &Cause) -> Result<Definition> {
        match cause {
            Cause::Requested => {}
            Cause::Undefined => {
                writeln!(
                    self.output,
                    "{} not described in database, please define it",
                    name
                )?;
            }
            Cause::Ingredient { of } => {
                writeln!(
                    self.output,
                    "An ingredient of [{}] is not listed in the database [{}]. Please define it",
                    of, name
                )?;
            }
        }

        let question = format!(
            "Is [{}] a complex recipe? (i.e, built on other ingredients)",
            name
        );
        if !self.ask_yes_no(&question, name)? {
            return Ok(Definition::Basic);
        }

        writeln!(self.output, "Defining ingredients for {}:", name)?;
        Ok(Definition::Composite(self.collect_ingredients(name)?))
    }

    fn reject(&mut self, name: &str, error: ShopError) -> Result<()> {
        writeln!(self.output, "Cannot use that definition of {}: {}", name, error)?;
        Ok(())
    }
}
