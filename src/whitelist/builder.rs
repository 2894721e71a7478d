//! Command building
//!
//! Turns a [`CommandDefinition`] plus caller-supplied parameters into the
//! literal command string sent to the remote host.

use std::collections::BTreeMap;

use super::definition::CommandDefinition;
use crate::error::{GatewayError, Result};
use crate::ssh::sanitize::sanitize_parameter;

/// Caller-supplied parameter values, keyed by parameter name
pub type Parameters = BTreeMap<String, String>;

/// Build the command string for `def`
///
/// Every placeholder must have a value, and every supplied value (used or
/// not) must pass the sanitizer. Substitution happens only after both checks
/// succeed and is purely textual: the sanitizer's allow-list is the only
/// injection defense. Parameters no placeholder refers to are ignored.
pub fn build_command(def: &CommandDefinition, parameters: &Parameters) -> Result<String> {
    for placeholder in def.placeholders() {
        if !parameters.contains_key(placeholder) {
            return Err(GatewayError::MissingParameter {
                name: placeholder.to_string(),
                command: def.name.clone(),
                expected: def.parameter_names(),
            });
        }
    }

    for (name, value) in parameters {
        sanitize_parameter(value).map_err(|reason| GatewayError::InvalidParameter {
            name: name.clone(),
            reason,
        })?;
    }

    Ok(def.substitute(|name| parameters.get(name).map(String::as_str)))
}
