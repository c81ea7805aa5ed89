use super::{Header, Slot};
use crate::error::UserError;

/// Consumes `token` unless this positional already has a value or the token looks like a name
pub(super) fn parse_positional(
    header: &Header,
    slot: &dyn Slot,
    token: &str,
) -> Result<bool, UserError> {
    if header.supplied.get() || token.starts_with('-') {
        return Ok(false);
    }

    header.supplied.set(true);
    tracing::trace!(name = %header.name, %token, "matched positional argument");

    slot.realize(token).map_err(|cause| UserError::UnparsableValue {
        name: header.name.clone(),
        token: token.to_string(),
        cause,
    })?;
    Ok(true)
}
