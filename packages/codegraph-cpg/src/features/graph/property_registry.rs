//! Edge property codecs
//!
//! Maps edge property keys to JSON-compatible encoders and decoders. A
//! registry is built once per translation run and passed by reference to
//! whoever renders or ingests edge properties.

use serde_json::{json, Map, Value};
use thiserror::Error;

use crate::shared::models::{Edge, EdgeId, EdgeProperties};

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PropertyError {
    #[error("unknown edge property '{0}'")]
    UnknownKey(String),

    #[error("edge property '{key}' expects {expected}")]
    InvalidValue { key: String, expected: &'static str },
}

type Encode = fn(&EdgeProperties) -> Option<Value>;
type Decode = fn(&mut EdgeProperties, &Value) -> Result<(), &'static str>;

#[derive(Clone, Copy)]
struct PropertyCodec {
    key: &'static str,
    encode: Encode,
    decode: Decode,
}

/// Explicitly constructed codec table for edge properties
#[derive(Clone, Default)]
pub struct EdgePropertyRegistry {
    codecs: Vec<PropertyCodec>,
}

impl EdgePropertyRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with codecs for `index`, `branch`, `unreachable` and `name`
    pub fn with_standard_properties() -> Self {
        let mut registry = Self::new();
        registry.register(
            "index",
            |p| p.index.map(Value::from),
            |p, v| {
                let n = v.as_u64().ok_or("an unsigned integer")?;
                p.index = Some(u32::try_from(n).map_err(|_| "a 32-bit index")?);
                Ok(())
            },
        );
        registry.register(
            "branch",
            |p| p.branch.map(Value::Bool),
            |p, v| {
                p.branch = Some(v.as_bool().ok_or("a boolean")?);
                Ok(())
            },
        );
        registry.register(
            "unreachable",
            |p| p.unreachable.then_some(Value::Bool(true)),
            |p, v| {
                p.unreachable = v.as_bool().ok_or("a boolean")?;
                Ok(())
            },
        );
        registry.register(
            "name",
            |p| p.name.clone().map(Value::String),
            |p, v| {
                p.name = Some(v.as_str().ok_or("a string")?.to_owned());
                Ok(())
            },
        );
        registry
    }

    /// Register a codec; re-registering a key replaces the previous codec.
    pub fn register(&mut self, key: &'static str, encode: Encode, decode: Decode) {
        self.codecs.retain(|c| c.key != key);
        self.codecs.push(PropertyCodec { key, encode, decode });
    }

    pub fn keys(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.codecs.iter().map(|c| c.key)
    }

    /// Render the set properties as a key/value map
    pub fn encode(&self, properties: &EdgeProperties) -> Map<String, Value> {
        self.codecs
            .iter()
            .filter_map(|codec| (codec.encode)(properties).map(|v| (codec.key.to_owned(), v)))
            .collect()
    }

    /// One edge as a JSON record with its encoded properties
    pub fn render(&self, id: EdgeId, edge: &Edge) -> Value {
        json!({
            "id": id.index(),
            "view": edge.view.as_str(),
            "source": edge.source.index(),
            "target": edge.target.index(),
            "properties": self.encode(&edge.properties),
        })
    }

    pub fn decode(&self, map: &Map<String, Value>) -> Result<EdgeProperties, PropertyError> {
        let mut properties = EdgeProperties::new();
        for (key, value) in map {
            let codec = self
                .codecs
                .iter()
                .find(|c| c.key == key)
                .ok_or_else(|| PropertyError::UnknownKey(key.clone()))?;
            (codec.decode)(&mut properties, value).map_err(|expected| {
                PropertyError::InvalidValue {
                    key: key.clone(),
                    expected,
                }
            })?;
        }
        Ok(properties)
    }
}

impl std::fmt::Debug for EdgePropertyRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.keys()).finish()
    }
}
