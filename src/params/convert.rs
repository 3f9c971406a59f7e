use serde_json::Value;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// A string-to-value conversion failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConvertError {
    /// Converter key the value was converted under.
    pub type_key: String,
    /// The raw value that failed to convert.
    pub value: String,
}

impl fmt::Display for ConvertError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "cannot convert '{}' to type '{}'",
            self.value, self.type_key
        )
    }
}

impl std::error::Error for ConvertError {}

/// A registered string-to-value converter.
pub type Converter = dyn Fn(&str) -> Result<Value, ConvertError> + Send + Sync;

/// Registry mapping parameter type keys to converter functions.
///
/// Replaces implicit "construct from a single string" conventions with an
/// explicit map, resolved against each route's parameter declarations when
/// the route table is built; an unregistered type key fails startup instead
/// of a request.
///
/// # Example
///
/// ```
/// use switchyard::params::ConverterRegistry;
///
/// let mut registry = ConverterRegistry::with_defaults();
/// registry.register("color", |raw| {
///     Ok(serde_json::json!({ "color": raw }))
/// });
/// assert!(registry.contains("color"));
/// ```
pub struct ConverterRegistry {
    converters: HashMap<String, Arc<Converter>>,
}

impl ConverterRegistry {
    /// Empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            converters: HashMap::new(),
        }
    }

    /// Registry pre-populated with the `string`, `integer`, `number`, and
    /// `boolean` converters.
    #[must_use]
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register("string", |raw| Ok(Value::String(raw.to_string())));
        registry.register("integer", |raw| {
            raw.parse::<i64>().map(Value::from).map_err(|_| ConvertError {
                type_key: "integer".to_string(),
                value: raw.to_string(),
            })
        });
        registry.register("number", |raw| {
            raw.parse::<f64>().map(Value::from).map_err(|_| ConvertError {
                type_key: "number".to_string(),
                value: raw.to_string(),
            })
        });
        registry.register("boolean", |raw| {
            raw.parse::<bool>().map(Value::from).map_err(|_| ConvertError {
                type_key: "boolean".to_string(),
                value: raw.to_string(),
            })
        });
        registry
    }

    /// Register a converter under a type key, replacing any previous one.
    pub fn register<F>(&mut self, type_key: impl Into<String>, converter: F)
    where
        F: Fn(&str) -> Result<Value, ConvertError> + Send + Sync + 'static,
    {
        self.converters.insert(type_key.into(), Arc::new(converter));
    }

    /// Whether a converter is registered for the key.
    #[must_use]
    pub fn contains(&self, type_key: &str) -> bool {
        self.converters.contains_key(type_key)
    }

    /// Convert a raw string under the given type key.
    pub fn convert(&self, type_key: &str, raw: &str) -> Result<Value, ConvertError> {
        match self.converters.get(type_key) {
            Some(converter) => converter(raw),
            None => Err(ConvertError {
                type_key: type_key.to_string(),
                value: raw.to_string(),
            }),
        }
    }
}

impl Default for ConverterRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}
