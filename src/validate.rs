//! # Observation validation
//!
//! The portal has no validation endpoint, so the only business rule checked before a
//! submission is the airmass range of the elevation constraint
//! ([`validate_observation`]).
//!
//! Validation errors may come back nested (field → messages, or field → mapping of
//! sub-fields → messages). [`flatten_errors`] turns any such tree into the two buckets a form
//! can show: errors attached to a form field, and free-standing `"<key>: <message>"` strings.

use std::collections::BTreeMap;

use itertools::Itertools;

use crate::payload::ObservationPayload;

/// Lowest airmass accepted by the portal.
pub const AIRMASS_MIN: f64 = 1.0;
/// Highest airmass accepted by the portal.
pub const AIRMASS_MAX: f64 = 2.5;

/// Payload key → message.
pub type ValidationErrors = BTreeMap<String, String>;

/// Check the business rules the portal does not check for us
///
/// Arguments
/// ---------
/// * `payload`: a built observation payload
///
/// Return
/// ------
/// * payload key → human readable message, empty when the payload is valid
pub fn validate_observation(payload: &ObservationPayload) -> ValidationErrors {
    let mut errors = ValidationErrors::new();

    let is_airmass = payload
        .get_string("elevationType")
        .is_some_and(|t| t == "airmass");
    if !is_airmass {
        return errors;
    }

    let bound = |key: &str| payload.get(key).and_then(|v| v.as_f64());

    match bound("elevationMin") {
        Some(min) if min >= AIRMASS_MIN => {}
        Some(_) => {
            errors.insert("elevationMin".into(), "Airmass must be >= 1.0".into());
        }
        None => {
            errors.insert("elevationMin".into(), "Airmass must be a number".into());
        }
    }
    match bound("elevationMax") {
        Some(max) if max <= AIRMASS_MAX => {}
        Some(_) => {
            errors.insert("elevationMax".into(), "Airmass must be <= 2.5".into());
        }
        None => {
            errors.insert("elevationMax".into(), "Airmass must be a number".into());
        }
    }

    errors
}

/// A (possibly nested) validation error.
#[derive(Debug, Clone, PartialEq)]
pub enum ErrorTree {
    Message(String),
    List(Vec<ErrorTree>),
    Map(BTreeMap<String, ErrorTree>),
}

impl From<&str> for ErrorTree {
    fn from(message: &str) -> Self {
        ErrorTree::Message(message.to_string())
    }
}

/// Lift flat validation errors into an error tree.
pub fn error_tree(errors: &ValidationErrors) -> BTreeMap<String, ErrorTree> {
    errors
        .iter()
        .map(|(key, message)| (key.clone(), ErrorTree::Message(message.clone())))
        .collect()
}

/// Errors ready to be shown on a form.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FormErrors {
    /// Form field → messages.
    pub field_errors: BTreeMap<String, Vec<String>>,
    /// Messages not attached to a field, as `"<key>: <message>"`.
    pub non_field_errors: Vec<String>,
}

impl FormErrors {
    pub fn is_empty(&self) -> bool {
        self.field_errors.is_empty() && self.non_field_errors.is_empty()
    }

    pub fn add_field_error(&mut self, field: &str, message: impl Into<String>) {
        self.field_errors
            .entry(field.to_string())
            .or_default()
            .push(message.into());
    }

    /// Merge `other` into `self`, keeping message order.
    pub fn extend(&mut self, other: FormErrors) {
        for (field, messages) in other.field_errors {
            self.field_errors.entry(field).or_default().extend(messages);
        }
        self.non_field_errors.extend(other.non_field_errors);
    }

    /// All messages on one line each, field errors first.
    pub fn summary(&self) -> String {
        self.field_errors
            .iter()
            .flat_map(|(field, messages)| messages.iter().map(move |m| format!("{field}: {m}")))
            .chain(self.non_field_errors.iter().cloned())
            .join("\n")
    }
}

fn flatten_node(
    is_field: &dyn Fn(&str) -> bool,
    key: &str,
    node: &ErrorTree,
    errors: &mut FormErrors,
) {
    match node {
        ErrorTree::Message(message) => {
            if is_field(key) {
                errors.add_field_error(key, message.as_str());
            } else {
                errors.non_field_errors.push(format!("{key}: {message}"));
            }
        }
        ErrorTree::List(items) => {
            for item in items {
                flatten_node(is_field, key, item, errors);
            }
        }
        ErrorTree::Map(map) => {
            for (sub_key, sub_node) in map {
                flatten_node(is_field, sub_key, sub_node, errors);
            }
        }
    }
}

/// Flatten a nested error tree into form errors
///
/// Arguments
/// ---------
/// * `is_field`: tells whether a key names a field of the form
/// * `errors`: key → error tree
///
/// Return
/// ------
/// * messages under known fields as field errors, every other message as a
///   `"<key>: <message>"` non-field error; nested mappings use their own keys, nested
///   lists keep the enclosing key
pub fn flatten_errors(
    is_field: impl Fn(&str) -> bool,
    errors: &BTreeMap<String, ErrorTree>,
) -> FormErrors {
    let mut flat = FormErrors::default();
    for (key, node) in errors {
        flatten_node(&is_field, key, node, &mut flat);
    }
    flat
}
