//! Batch validation of required request fields.

use crate::params::RequestParams;

/// Fields found missing by [`validate_required`], in check order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MissingFields {
    fields: Vec<String>,
}

impl MissingFields {
    /// Names of the missing fields.
    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    /// One human-readable message per missing field.
    pub fn messages(&self) -> Vec<String> {
        self.fields.iter().map(|field| missing_message(field)).collect()
    }
}

/// Diagnostic line reported for a missing field.
pub fn missing_message(field: &str) -> String {
    format!("`{field}` is missing.")
}

/// Checks that every required field is present and non-empty.
///
/// All fields are checked before failing, so the error lists every
/// missing field rather than only the first one.
///
/// # Errors
///
/// Returns [`MissingFields`] naming each absent or empty field.
pub fn validate_required(
    required: &[&str],
    params: &RequestParams,
) -> Result<(), MissingFields> {
    let fields: Vec<String> = required
        .iter()
        .filter(|field| params.non_empty(field).is_none())
        .map(|field| (*field).to_string())
        .collect();

    if fields.is_empty() {
        Ok(())
    } else {
        Err(MissingFields { fields })
    }
}
