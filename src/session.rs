use std::io::{BufRead, Write};

use crate::environment::{Environment, Int};
use crate::error::Error;
use crate::infix::render;
use crate::interpreter::evaluate;
use crate::parser::{ParserConfig, parse_with};
use crate::tokeniser::tokenise;

/// Reads expressions line by line, printing `<infix> = <value>` for each one
/// and a diagnostic for each failure.
pub struct Session<R, W, E> {
    env: Environment,
    config: ParserConfig,
    input: R,
    output: W,
    errors: E,
}

impl<R: BufRead, W: Write, E: Write> Session<R, W, E> {
    pub fn new(env: Environment, config: ParserConfig, input: R, output: W, errors: E) -> Self {
        Self {
            env,
            config,
            input,
            output,
            errors,
        }
    }

    /// Run one line through the pipeline. Blank and comment-only lines give `None`.
    pub fn process_line(&mut self, line: &str) -> Result<Option<(String, Int)>, Error> {
        let tokens = tokenise(line);
        if tokens.is_empty() {
            return Ok(None);
        }

        let tree = parse_with(tokens, self.config)?;
        let infix = render(&tree);
        let value = evaluate(&tree, &mut self.env)?;
        Ok(Some((infix, value)))
    }

    /// Read until the input runs out. A bad expression never ends the session.
    pub fn run(&mut self) -> std::io::Result<()> {
        writeln!(self.output, "Enter postfix expressions (CTRL-D to exit):")?;

        let mut buf = Vec::new();
        loop {
            write!(self.output, "> ")?;
            self.output.flush()?;

            buf.clear();
            if self.input.read_until(b'\n', &mut buf)? == 0 {
                writeln!(self.output)?;
                break;
            }

            // A line that is not UTF-8 is reported like any other bad line.
            let line = match std::str::from_utf8(&buf) {
                Ok(line) => line,
                Err(err) => {
                    writeln!(self.errors, "error: line is not valid UTF-8: {err}")?;
                    continue;
                }
            };
            let expr = line.trim_end_matches(['\n', '\r']).to_string();
            match self.process_line(&expr) {
                Ok(Some((infix, value))) => writeln!(self.output, "{infix} = {value}")?,
                Ok(None) => {}
                Err(err) => {
                    log::debug!("Rejected {expr:?}: {err:?}");
                    writeln!(self.errors, "error: {err}")?;
                }
            }
        }

        Ok(())
    }

    /// Hand back the environment once the session is over.
    pub fn into_env(self) -> Environment {
        self.env
    }
}
