use std::{
    fs::File,
    io::{BufRead, BufReader},
    path::Path,
};

use anyhow::{Context, Result, bail};

use crate::environment::{Environment, Int};
use crate::tokeniser::strip_comment;

/// Load `<name> <integer>` records from a symbol file into `env`.
/// Returns how many symbols were defined.
pub fn load_symbols(path: &Path, env: &mut Environment) -> Result<usize> {
    let file = File::open(path)
        .with_context(|| format!("Failed to open symbol file {}", path.display()))?;
    let count = load_symbols_from(BufReader::new(file), env)
        .with_context(|| format!("Failed to load symbol file {}", path.display()))?;
    log::info!("Loaded {count} symbol(s) from {}", path.display());
    Ok(count)
}

/// Load symbol records from any reader. Blank and comment lines are skipped;
/// anything else that isn't exactly a name and an integer is an error.
pub fn load_symbols_from(reader: impl BufRead, env: &mut Environment) -> Result<usize> {
    let mut count = 0;

    for (index, line) in reader.lines().enumerate() {
        let line_number = index + 1;
        let line = line.with_context(|| format!("Failed to read line {line_number}"))?;

        let mut fields = strip_comment(&line).split_whitespace();
        let (name, value) = match (fields.next(), fields.next(), fields.next()) {
            (None, _, _) => continue,
            (Some(name), Some(value), None) => (name, value),
            _ => bail!("Malformed symbol record on line {line_number}: {line:?}"),
        };

        let value: Int = value.parse().with_context(|| {
            format!("Invalid value for symbol '{name}' on line {line_number}: {value:?}")
        })?;
        env.define(name, value)
            .with_context(|| format!("Bad symbol on line {line_number}"))?;
        count += 1;
    }

    Ok(count)
}
