use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

/// Render a number the way the portal has always received it: integral values keep a
/// trailing `.0` (`1.0`, `360.0`), others use the shortest exact representation (`17.25`).
pub fn format_number(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 && value.abs() < 1e16 {
        format!("{value:.1}")
    } else {
        value.to_string()
    }
}

/// A single request parameter.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum PayloadValue {
    Text(String),
    Number(f64),
}

impl PayloadValue {
    /// Numeric value of the parameter, parsing text when needed.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            PayloadValue::Text(text) => text.trim().parse().ok(),
            PayloadValue::Number(number) => Some(*number),
        }
    }
}

impl fmt::Display for PayloadValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PayloadValue::Text(text) => f.write_str(text),
            PayloadValue::Number(number) => f.write_str(&format_number(*number)),
        }
    }
}

impl From<&str> for PayloadValue {
    fn from(value: &str) -> Self {
        PayloadValue::Text(value.to_string())
    }
}

impl From<String> for PayloadValue {
    fn from(value: String) -> Self {
        PayloadValue::Text(value)
    }
}

impl From<f64> for PayloadValue {
    fn from(value: f64) -> Self {
        PayloadValue::Number(value)
    }
}

/// Parameters of one ToO trigger request, keyed by the portal's parameter names
/// (`prog`, `obsnum`, `target`, `ra`, `dec`, `posangle`, ...).
///
/// Serializes as a flat map, ready to be sent as query parameters. The `Debug` output
/// hides the `password` parameter.
#[derive(Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ObservationPayload {
    params: BTreeMap<String, PayloadValue>,
}

impl ObservationPayload {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: &str, value: impl Into<PayloadValue>) {
        self.params.insert(key.to_string(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&PayloadValue> {
        self.params.get(key)
    }

    /// Value of `key` rendered as a string.
    pub fn get_string(&self, key: &str) -> Option<String> {
        self.params.get(key).map(ToString::to_string)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.params.contains_key(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &PayloadValue)> {
        self.params.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.params.len()
    }

    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }
}

impl fmt::Debug for ObservationPayload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(self.params.iter().map(|(key, value)| {
                let shown = if key == "password" {
                    "***".to_string()
                } else {
                    value.to_string()
                };
                (key, shown)
            }))
            .finish()
    }
}
