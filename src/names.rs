//! Syntax rules for the names of declared arguments

use crate::error::ProgrammerError;
use once_cell::sync::Lazy;
use regex::Regex;

// At least two characters, so that a long name never looks like a short one
static ARGUMENT_NAME: Lazy<Regex> =
    Lazy::new(|| Regex::new("^[a-zA-Z][a-zA-Z0-9-]+$").expect("argument name pattern"));
static VERB_NAME: Lazy<Regex> =
    Lazy::new(|| Regex::new("^[a-zA-Z0-9-]+$").expect("verb name pattern"));
static PARAMETER_NAME: Lazy<Regex> =
    Lazy::new(|| Regex::new("^[a-zA-Z0-9-]+$").expect("parameter name pattern"));

/// Validates the name of a switch, option or positional argument
pub(crate) fn validate_argument_name(name: &str) -> Result<(), ProgrammerError> {
    validate(name, &ARGUMENT_NAME)
}

pub(crate) fn validate_verb_name(name: &str) -> Result<(), ProgrammerError> {
    validate(name, &VERB_NAME)
}

/// Validates the placeholder shown for an option's value in help, e.g. `<file>`
pub(crate) fn validate_parameter_name(name: &str) -> Result<(), ProgrammerError> {
    validate(name, &PARAMETER_NAME)
}

pub(crate) fn validate_short_name(short: char) -> Result<(), ProgrammerError> {
    if is_terminator(short) {
        return Err(ProgrammerError::InvalidShortName(short));
    }
    Ok(())
}

/// Returns whether `c` ends a long name, i.e. it could not be part of a single-letter name
pub(crate) fn is_terminator(c: char) -> bool {
    !c.is_ascii_alphanumeric()
}

fn validate(name: &str, pattern: &Regex) -> Result<(), ProgrammerError> {
    if !pattern.is_match(name) {
        return Err(ProgrammerError::InvalidName(name.to_string()));
    }
    Ok(())
}
