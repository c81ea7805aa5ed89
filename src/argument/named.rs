use super::{Header, Slot};
use crate::error::UserError;
use crate::names::is_terminator;
use itertools::Itertools;

/// Returns what follows the name in `token`, if `token` names the argument at all
///
/// The short form must be the whole token (`-a`). The long form may be followed by a
/// terminator and more text (`--alpha=value`), but not by another name character, so
/// `--alphabet` does not name `alpha`.
fn remainder<'t>(header: &Header, token: &'t str) -> Option<&'t str> {
    if let (Some(short), Some(rest)) = (header.short_name, token.strip_prefix('-')) {
        if rest.chars().exactly_one().ok() == Some(short) {
            return Some("");
        }
    }

    let rest = token.strip_prefix("--")?.strip_prefix(header.name.as_str())?;
    match rest.chars().next() {
        Some(c) if !is_terminator(c) => None,
        _ => Some(rest),
    }
}

fn claim<'t>(header: &Header, token: &'t str) -> Result<Option<&'t str>, UserError> {
    let Some(rest) = remainder(header, token) else {
        return Ok(None);
    };
    if header.supplied.get() {
        return Err(UserError::SuppliedMoreThanOnce(header.name.clone()));
    }
    header.supplied.set(true);
    tracing::trace!(name = %header.name, %token, "matched named argument");
    Ok(Some(rest))
}

pub(super) fn parse_switch(header: &Header, token: &str) -> Result<bool, UserError> {
    match claim(header, token)? {
        None => Ok(false),
        Some("") => Ok(true),
        Some(rest) => Err(UserError::UnexpectedCharacters {
            name: header.name.clone(),
            characters: rest.to_string(),
        }),
    }
}

pub(super) fn parse_option(header: &Header, slot: &dyn Slot, token: &str) -> Result<bool, UserError> {
    let Some(rest) = claim(header, token)? else {
        return Ok(false);
    };

    if rest.is_empty() {
        if !slot.realize_preset() {
            return Err(UserError::OptionRequiresValue(header.name.clone()));
        }
        return Ok(true);
    }

    let Some(text) = rest.strip_prefix('=') else {
        return Err(UserError::UnexpectedCharacters {
            name: header.name.clone(),
            characters: rest.to_string(),
        });
    };

    slot.realize(text).map_err(|cause| UserError::UnparsableValue {
        name: header.name.clone(),
        token: text.to_string(),
        cause,
    })?;
    Ok(true)
}

pub(super) fn switch_usage(header: &Header) -> String {
    match header.short_name {
        Some(short) => format!("-{short}, --{}", header.name),
        None => format!("--{}", header.name),
    }
}

pub(super) fn option_usage(header: &Header, parameter_name: Option<&str>, slot: &dyn Slot) -> String {
    let parameter = match parameter_name {
        Some(name) => format!("<{name}>"),
        None => format!("<{}>", slot.type_name()),
    };
    if slot.has_preset() {
        format!("{}[={parameter}]", switch_usage(header))
    } else {
        format!("{}={parameter}", switch_usage(header))
    }
}
