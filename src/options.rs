//! String-keyed, typed option values.
//!
//! This is the exchange format between the plugin and its host: the
//! settable options (`sample:mode`, `sample:seed`, `sample:rate`) and the
//! read-only reporting values (thread safety, supported modes) all travel
//! through an [`Options`] map.

use std::collections::HashMap;

/// A single typed option value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum OptionValue {
    Text(String),
    Integer(u64),
    Real(f64),
    TextList(Vec<String>),
}

impl OptionValue {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            OptionValue::Text(s) => Some(s.as_str()),
            _ => None,
        }
    }
    pub fn as_integer(&self) -> Option<u64> {
        match self {
            OptionValue::Integer(x) => Some(*x),
            _ => None,
        }
    }
    /// Integers promote to reals, matching how hosts pass whole-number rates.
    pub fn as_real(&self) -> Option<f64> {
        match self {
            OptionValue::Real(x) => Some(*x),
            OptionValue::Integer(x) => Some(*x as f64),
            _ => None,
        }
    }
    pub fn as_text_list(&self) -> Option<&[String]> {
        match self {
            OptionValue::TextList(items) => Some(items.as_slice()),
            _ => None,
        }
    }
}

/// A string-keyed bag of [`OptionValue`]s with typed accessors.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Options {
    #[serde(flatten)]
    values: HashMap<String, OptionValue>,
}

impl Options {
    pub fn new() -> Options {
        Options::default()
    }

    pub fn set(&mut self, key: &str, value: OptionValue) {
        self.values.insert(key.to_string(), value);
    }
    pub fn set_text(&mut self, key: &str, value: &str) {
        self.set(key, OptionValue::Text(value.to_string()));
    }
    pub fn set_integer(&mut self, key: &str, value: u64) {
        self.set(key, OptionValue::Integer(value));
    }
    pub fn set_real(&mut self, key: &str, value: f64) {
        self.set(key, OptionValue::Real(value));
    }
    pub fn set_text_list(&mut self, key: &str, values: &[&str]) {
        self.set(
            key,
            OptionValue::TextList(values.iter().map(|s| s.to_string()).collect()),
        );
    }

    pub fn get(&self, key: &str) -> Option<&OptionValue> {
        self.values.get(key)
    }
    pub fn get_text(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(|v| v.as_text())
    }
    pub fn get_integer(&self, key: &str) -> Option<u64> {
        self.get(key).and_then(|v| v.as_integer())
    }
    pub fn get_real(&self, key: &str) -> Option<f64> {
        self.get(key).and_then(|v| v.as_real())
    }
    pub fn get_text_list(&self, key: &str) -> Option<&[String]> {
        self.get(key).and_then(|v| v.as_text_list())
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}
