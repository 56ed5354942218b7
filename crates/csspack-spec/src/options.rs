//! Options handed to a stylesheet processor.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::ConfigError;

/// Key forced to the asset name before a processor is invoked.
pub const FROM_KEY: &str = "from";

/// Key forced to the asset name before a processor is invoked.
pub const TO_KEY: &str = "to";

/// A JSON object of processor options.
///
/// Kept as an open map: processors define their own option vocabulary and the
/// pipeline only ever touches the `from`/`to` keys.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProcessorOptions(Map<String, Value>);

impl ProcessorOptions {
    /// Creates an empty option set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds options from a JSON value, which must be an object.
    pub fn from_value(value: Value) -> Result<Self, ConfigError> {
        match value {
            Value::Object(map) => Ok(Self(map)),
            other => Err(ConfigError::OptionsNotObject(other.to_string())),
        }
    }

    /// Sets a top-level option, returning self for chaining.
    pub fn with(mut self, key: impl Into<String>, value: Value) -> Self {
        self.0.insert(key.into(), value);
        self
    }

    /// Returns a top-level option.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Follows a path of object keys and returns true if it ends at `true`.
    ///
    /// `is_enabled(&["discardComments", "removeAll"])` checks
    /// `{"discardComments": {"removeAll": true}}`.
    pub fn is_enabled(&self, path: &[&str]) -> bool {
        let Some((first, rest)) = path.split_first() else {
            return false;
        };
        let mut current = match self.0.get(*first) {
            Some(value) => value,
            None => return false,
        };
        for key in rest {
            current = match current.get(*key) {
                Some(value) => value,
                None => return false,
            };
        }
        current.as_bool() == Some(true)
    }

    /// Returns a copy with `from` and `to` both set to `destination`.
    ///
    /// Precedence: the forced keys always replace caller-supplied values of
    /// the same name; every other key is kept unchanged.
    pub fn with_forced_paths(&self, destination: &str) -> Self {
        let mut map = self.0.clone();
        map.insert(FROM_KEY.to_string(), Value::String(destination.to_string()));
        map.insert(TO_KEY.to_string(), Value::String(destination.to_string()));
        Self(map)
    }

    /// Returns the underlying map.
    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    /// Converts into a JSON value.
    pub fn into_value(self) -> Value {
        Value::Object(self.0)
    }

    /// Returns true if no option is set.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
