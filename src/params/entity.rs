use serde_json::{Map, Value};
use std::io::Read;
use std::sync::Arc;

use crate::fault::{Fault, MALFORMED_ENTITY};

/// Deserializes request bodies of one media type.
///
/// Codecs are external collaborators; the crate ships [`JsonBodyCodec`] as a
/// convenience since JSON is the common case, but hosting frameworks register
/// their own for anything else.
pub trait BodyCodec: Send + Sync {
    /// Media type this codec consumes, lowercase.
    fn media_type(&self) -> &str;

    /// Deserialize the body stream into a value.
    fn decode(&self, body: &mut dyn Read) -> Result<Value, Fault>;
}

/// Registry of body codecs keyed by media type.
#[derive(Default)]
pub struct CodecRegistry {
    codecs: Vec<Arc<dyn BodyCodec>>,
}

impl CodecRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self { codecs: Vec::new() }
    }

    /// Registry with only the JSON codec.
    #[must_use]
    pub fn with_json() -> Self {
        let mut registry = Self::new();
        registry.register(Arc::new(JsonBodyCodec));
        registry
    }

    pub fn register(&mut self, codec: Arc<dyn BodyCodec>) {
        self.codecs.push(codec);
    }

    /// First registered codec consuming the media type.
    #[must_use]
    pub fn for_media_type(&self, media_type: &str) -> Option<&Arc<dyn BodyCodec>> {
        self.codecs
            .iter()
            .find(|codec| codec.media_type().eq_ignore_ascii_case(media_type))
    }
}

/// Body codec for `application/json`.
pub struct JsonBodyCodec;

impl BodyCodec for JsonBodyCodec {
    fn media_type(&self) -> &str {
        "application/json"
    }

    fn decode(&self, body: &mut dyn Read) -> Result<Value, Fault> {
        serde_json::from_reader(body).map_err(|e| {
            Fault::new(&MALFORMED_ENTITY, format!("invalid JSON body: {e}")).with_status(400)
        })
    }
}

/// Structurally bind uniquely-named form fields into a JSON object.
///
/// Dotted field names are interpreted as nested property paths, so
/// `owner.address.city=Berlin` becomes `{"owner":{"address":{"city":
/// "Berlin"}}}`. Returns `None`, meaning "fall back to the body codec",
/// when there are no fields at all or any field is multi-valued.
#[must_use]
pub fn bind_form_entity(fields: &[(&str, &[String])]) -> Option<Value> {
    if fields.is_empty() {
        return None;
    }
    if fields.iter().any(|(_, values)| values.len() != 1) {
        return None;
    }

    let mut root = Map::new();
    for (name, values) in fields {
        insert_path(&mut root, name, Value::String(values[0].clone()));
    }
    Some(Value::Object(root))
}

fn insert_path(object: &mut Map<String, Value>, path: &str, value: Value) {
    match path.split_once('.') {
        None => {
            object.insert(path.to_string(), value);
        }
        Some((head, rest)) => {
            let child = object
                .entry(head.to_string())
                .or_insert_with(|| Value::Object(Map::new()));
            if let Value::Object(child) = child {
                insert_path(child, rest, value);
            }
        }
    }
}
