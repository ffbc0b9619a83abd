//! Named external inputs passed to module derivatives.

use std::collections::BTreeMap;

/// Well-known input keys.
pub mod keys {
    /// Additional external heating power (fusion model).
    pub const HEATING_POWER: &str = "heating_power";
    /// Controller output applied as heating (fusion model).
    pub const CONTROL_HEATING: &str = "control_heating";
    /// Additional fuel injection rate (fusion model).
    pub const FUEL_FEED: &str = "fuel_feed";
    /// Offset added to the configured field strength (fusion model).
    pub const FIELD_STRENGTH: &str = "field_strength";
    /// Drive term of the field oscillator.
    pub const EM_DRIVE: &str = "em_drive";
}

/// Mapping from input name to value.
///
/// Lookups of absent keys yield `0.0`, and modules ignore keys they do not
/// know, so callers may pass a superset of what a module reads.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InputMap {
    values: BTreeMap<String, f64>,
}

impl InputMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, key: &str, value: f64) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(&mut self, key: &str, value: f64) {
        self.values.insert(key.to_string(), value);
    }

    /// Value for `key`, or `0.0` when absent.
    pub fn get(&self, key: &str) -> f64 {
        self.values.get(key).copied().unwrap_or(0.0)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.values.iter().map(|(k, v)| (k.as_str(), *v))
    }
}
