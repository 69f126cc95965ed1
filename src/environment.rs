use std::{collections::BTreeMap, io::Write};

use crate::error::EvalError;

/// The integer type every expression evaluates to.
pub type Int = i64;

/// Variable bindings for one session.
///
/// A name maps to exactly one value: defining a name that already exists
/// overwrites it in place.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Environment {
    symbols: BTreeMap<String, Int>,
}

/// Is this a legal symbol name? A letter followed by letters or digits.
pub fn is_valid_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() => chars.all(|c| c.is_ascii_alphanumeric()),
        _ => false,
    }
}

impl Environment {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `name` to `value`, replacing any existing binding.
    pub fn define(&mut self, name: &str, value: Int) -> Result<(), EvalError> {
        if !is_valid_name(name) {
            return Err(EvalError::InvalidSymbolName(name.to_string()));
        }

        if let Some(old) = self.symbols.insert(name.to_string(), value) {
            log::warn!("Redefined symbol '{name}': {old} -> {value}");
        }
        Ok(())
    }

    pub fn lookup(&self, name: &str) -> Option<Int> {
        self.symbols.get(name).copied()
    }

    /// Overwrite the value of an existing binding. Never creates one.
    pub fn assign(&mut self, name: &str, value: Int) -> Result<(), EvalError> {
        match self.symbols.get_mut(name) {
            Some(slot) => {
                *slot = value;
                Ok(())
            }
            None => Err(EvalError::UndefinedVariable(name.to_string())),
        }
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    /// Bindings in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, Int)> {
        self.symbols.iter().map(|(name, value)| (name.as_str(), *value))
    }

    /// Write a human readable listing of every binding.
    pub fn dump(&self, out: &mut impl Write) -> std::io::Result<()> {
        writeln!(out, "SYMBOL TABLE:")?;
        for (name, value) in self.iter() {
            writeln!(out, "\tName: {name}, Value: {value}")?;
        }
        Ok(())
    }
}
