//! Registry for the fixed set of well-known plugin files.

use crate::defaults::DefaultsBundle;
use crate::document::{Document, DocumentError};
use anyhow::{Context, Result};
use camino::{Utf8Path, Utf8PathBuf};
use indexmap::IndexMap;
use std::fs;

/// Identifier for a well-known plugin file.
///
/// A plain tag: behavior lives in [`NamedFileRegistry`], not on the identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NamedFileId {
    Config,
    Data,
    Messages,
    VoucherCodes,
}

impl NamedFileId {
    /// Every identifier, in enumeration order.
    pub const ALL: [NamedFileId; 4] = [
        NamedFileId::Config,
        NamedFileId::Data,
        NamedFileId::Messages,
        NamedFileId::VoucherCodes,
    ];

    /// Destination file name under the data root.
    pub fn file_name(self) -> &'static str {
        match self {
            NamedFileId::Config => "config.yml",
            NamedFileId::Data => "data.yml",
            NamedFileId::Messages => "messages.yml",
            NamedFileId::VoucherCodes => "codes.yml",
        }
    }

    /// Path of the bundled default for this file.
    pub fn resource_path(self) -> &'static str {
        // Destinations mirror the bundle layout one-to-one.
        self.file_name()
    }
}

/// Manages bootstrap, load, save, and reload for the well-known files.
///
/// An identifier whose bootstrap failed has no backing document for the rest of
/// the setup pass; `get` returns `None` and `save` reports an error for it.
#[derive(Debug, Default)]
pub struct NamedFileRegistry {
    paths: IndexMap<NamedFileId, Utf8PathBuf>,
    documents: IndexMap<NamedFileId, Document>,
    verbose: bool,
}

impl NamedFileRegistry {
    pub fn new(verbose: bool) -> Self {
        Self {
            verbose,
            ..Self::default()
        }
    }

    pub fn set_verbose(&mut self, enabled: bool) {
        self.verbose = enabled;
    }

    /// Bootstrap missing destinations from `defaults` and load every file.
    ///
    /// Clears previously loaded state first. A copy or read failure skips that
    /// one identifier and continues with the next.
    pub fn setup(&mut self, root: &Utf8Path, defaults: &DefaultsBundle) {
        self.clear();

        for id in NamedFileId::ALL {
            let destination = root.join(id.file_name());

            if self.verbose {
                tracing::info!("Loading {}", id.file_name());
            }

            if !destination.exists() {
                if let Err(err) = bootstrap_copy(defaults, id.resource_path(), &destination) {
                    tracing::error!("Failed to bootstrap {}: {err:#}", id.file_name());
                    continue;
                }

                if self.verbose {
                    tracing::info!("Created {} from the bundled default", id.file_name());
                }
            }

            let document = match Document::load(&destination) {
                Ok(document) => document,
                Err(DocumentError::Parse(err)) => {
                    tracing::warn!("Could not parse {destination}, starting empty: {err}");
                    Document::new()
                }
                Err(err) => {
                    tracing::error!("Could not read {destination}: {err}");
                    continue;
                }
            };

            self.paths.insert(id, destination);
            self.documents.insert(id, document);

            if self.verbose {
                tracing::info!("Successfully loaded {}", id.file_name());
            }
        }
    }

    /// The loaded document for `id`, or `None` if setup skipped it.
    pub fn get(&self, id: NamedFileId) -> Option<&Document> {
        self.documents.get(&id)
    }

    pub fn get_mut(&mut self, id: NamedFileId) -> Option<&mut Document> {
        self.documents.get_mut(&id)
    }

    /// Write the in-memory document for `id` back to its destination.
    pub fn save(&self, id: NamedFileId) -> Result<()> {
        let (path, document) = match (self.paths.get(&id), self.documents.get(&id)) {
            (Some(path), Some(document)) => (path, document),
            _ => anyhow::bail!("{} has no backing document yet", id.file_name()),
        };

        document
            .save(path)
            .with_context(|| format!("could not save {}", id.file_name()))?;

        if self.verbose {
            tracing::info!("Successfully saved {}", id.file_name());
        }

        Ok(())
    }

    /// Replace the in-memory document for `id` from disk, discarding unsaved
    /// edits. A parse failure leaves the current document untouched.
    pub fn reload(&mut self, id: NamedFileId) {
        let Some(path) = self.paths.get(&id) else {
            if self.verbose {
                tracing::info!("{} has no backing document to reload", id.file_name());
            }
            return;
        };

        match Document::load(path) {
            Ok(document) => {
                self.documents.insert(id, document);

                if self.verbose {
                    tracing::info!("Successfully reloaded {}", id.file_name());
                }
            }
            Err(err) => tracing::warn!("Could not reload {}: {err}", id.file_name()),
        }
    }

    /// Reload every identifier in enumeration order. One failure never stops
    /// the rest of the batch.
    pub fn reload_all(&mut self) {
        for id in NamedFileId::ALL {
            self.reload(id);
        }
    }

    /// Drop all loaded documents and paths. Called on re-setup.
    pub fn clear(&mut self) {
        self.paths.clear();
        self.documents.clear();
    }
}

fn bootstrap_copy(defaults: &DefaultsBundle, resource: &str, destination: &Utf8Path) -> Result<()> {
    let bytes = defaults
        .get(resource)
        .with_context(|| format!("no bundled default for {resource}"))?;

    fs::write(destination, bytes).with_context(|| format!("failed to write {destination}"))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_enumeration_order_matches_destinations() {
        let names: Vec<&str> = NamedFileId::ALL.iter().map(|id| id.file_name()).collect();
        assert_eq!(names, ["config.yml", "data.yml", "messages.yml", "codes.yml"]);
    }

    #[test]
    fn test_get_before_setup_is_none() {
        let registry = NamedFileRegistry::default();
        assert!(registry.get(NamedFileId::Config).is_none());
    }

    #[test]
    fn test_save_without_backing_document_errors() {
        let registry = NamedFileRegistry::default();
        assert!(registry.save(NamedFileId::Data).is_err());
    }

    #[test]
    fn test_bootstrap_skips_id_with_missing_default() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let root = camino::Utf8PathBuf::try_from(temp_dir.path().to_path_buf()).unwrap();

        // Only config.yml has a default; the other three are skipped.
        let mut defaults = DefaultsBundle::new();
        defaults.insert("config.yml", b"Settings:\n  Prefix: 'v'\n".to_vec());

        let mut registry = NamedFileRegistry::default();
        registry.setup(&root, &defaults);

        assert!(registry.get(NamedFileId::Config).is_some());
        assert!(registry.get(NamedFileId::Data).is_none());
        assert!(registry.get(NamedFileId::Messages).is_none());
        assert!(registry.get(NamedFileId::VoucherCodes).is_none());
    }
}
