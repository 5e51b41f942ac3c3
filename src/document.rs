//! Opaque YAML document store.
//!
//! A [`Document`] wraps a parsed YAML tree and knows how to load itself from and
//! save itself to a file. Values are addressed by `.`-separated key paths, so
//! callers never touch the underlying YAML library directly.

use camino::Utf8Path;
use serde::{Serialize, de::DeserializeOwned};
use serde_yaml_ng::{Mapping, Value};
use std::fs;
use std::str::FromStr;
use thiserror::Error;

/// Errors produced by document loading and saving.
#[derive(Error, Debug)]
pub enum DocumentError {
    #[error("malformed YAML document: {0}")]
    Parse(#[from] serde_yaml_ng::Error),

    #[error("document I/O failed: {0}")]
    Io(#[from] std::io::Error),
}

/// A hierarchical key-value document backed by YAML.
///
/// An empty document serializes to `null` and round-trips back to empty.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Document {
    root: Value,
}

impl Document {
    /// Create an empty document.
    pub fn new() -> Self {
        Self::default()
    }

    /// Read and parse the file at `path`.
    pub fn load(path: &Utf8Path) -> Result<Self, DocumentError> {
        let contents = fs::read_to_string(path)?;
        contents.parse()
    }

    /// Serialize the document to `path`, overwriting any existing content.
    pub fn save(&self, path: &Utf8Path) -> Result<(), DocumentError> {
        let yaml = serde_yaml_ng::to_string(&self.root)?;
        fs::write(path, yaml)?;
        Ok(())
    }

    /// Look up a value by `.`-separated key path.
    pub fn get(&self, path: &str) -> Option<&Value> {
        let mut node = &self.root;
        for segment in path.split('.') {
            let key = Value::String(segment.to_string());
            node = node.as_mapping()?.get(&key)?;
        }
        Some(node)
    }

    /// Set a value by `.`-separated key path, creating intermediate mappings
    /// as needed. Non-mapping nodes along the path are replaced.
    pub fn set(&mut self, path: &str, value: impl Into<Value>) {
        let mut pending = Some(value.into());
        let mut node = &mut self.root;
        let mut segments = path.split('.').peekable();

        while let Some(segment) = segments.next() {
            if !node.is_mapping() {
                *node = Value::Mapping(Mapping::new());
            }

            if let Value::Mapping(map) = node {
                let key = Value::String(segment.to_string());

                if segments.peek().is_none() {
                    if let Some(value) = pending.take() {
                        map.insert(key, value);
                    }
                    return;
                }

                node = map.entry(key).or_insert(Value::Null);
            }
        }
    }

    /// True when the document holds no data.
    pub fn is_empty(&self) -> bool {
        match &self.root {
            Value::Null => true,
            Value::Mapping(map) => map.is_empty(),
            _ => false,
        }
    }

    /// Borrow the underlying YAML tree.
    pub fn value(&self) -> &Value {
        &self.root
    }

    /// Deserialize the whole document into a typed value.
    pub fn decode<T: DeserializeOwned>(&self) -> Result<T, DocumentError> {
        Ok(serde_yaml_ng::from_value(self.root.clone())?)
    }

    /// Build a document from a serializable value.
    pub fn encode<T: Serialize>(value: &T) -> Result<Self, DocumentError> {
        Ok(Self {
            root: serde_yaml_ng::to_value(value)?,
        })
    }
}

impl FromStr for Document {
    type Err = DocumentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // An empty source is a valid, empty document.
        if s.trim().is_empty() {
            return Ok(Self::new());
        }

        let root: Value = serde_yaml_ng::from_str(s)?;
        Ok(Self { root })
    }
}
