//! Bundled default resources.
//!
//! Defaults are addressed by the same relative path as their destination under
//! the data root, e.g. `config.yml` or `vouchers/example.yml`. The built-in set
//! is embedded at compile time from `resources/`; hosts can add or override
//! entries before handing the bundle to the file manager.

use indexmap::IndexMap;

/// Read-only seed content consulted when a destination file is missing.
#[derive(Debug, Clone, Default)]
pub struct DefaultsBundle {
    entries: IndexMap<String, Vec<u8>>,
}

impl DefaultsBundle {
    /// Create an empty bundle.
    pub fn new() -> Self {
        Self::default()
    }

    /// The defaults shipped with the plugin.
    pub fn builtin() -> Self {
        let mut bundle = Self::new();
        bundle
            .insert("config.yml", include_bytes!("../resources/config.yml").to_vec())
            .insert("data.yml", include_bytes!("../resources/data.yml").to_vec())
            .insert(
                "messages.yml",
                include_bytes!("../resources/messages.yml").to_vec(),
            )
            .insert("codes.yml", include_bytes!("../resources/codes.yml").to_vec())
            .insert(
                "vouchers/example.yml",
                include_bytes!("../resources/vouchers/example.yml").to_vec(),
            );
        bundle
    }

    /// Add or replace an entry.
    pub fn insert(&mut self, path: impl Into<String>, bytes: Vec<u8>) -> &mut Self {
        self.entries.insert(path.into(), bytes);
        self
    }

    /// Look up the bytes for a resource path.
    pub fn get(&self, path: &str) -> Option<&[u8]> {
        self.entries.get(path).map(Vec::as_slice)
    }

    pub fn contains(&self, path: &str) -> bool {
        self.entries.contains_key(path)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
