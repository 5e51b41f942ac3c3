//! Orchestrator over both file registries.

use crate::defaults::DefaultsBundle;
use crate::document::Document;
use crate::files::custom::{CustomFile, CustomFileRegistry};
use crate::files::named::{NamedFileId, NamedFileRegistry};
use anyhow::{Context, Result};
use camino::{Utf8Path, Utf8PathBuf};
use std::fs;

/// Single entry point for the plugin's on-disk files.
///
/// Owns the data root, the bundled defaults, and both registries. `setup` is
/// idempotent: every call fully rebuilds the in-memory state from disk.
#[derive(Debug)]
pub struct FileManager {
    data_root: Utf8PathBuf,
    legacy_root: Utf8PathBuf,
    defaults: DefaultsBundle,
    named: NamedFileRegistry,
    custom: CustomFileRegistry,
    verbose: bool,
}

impl FileManager {
    /// Create a manager rooted at `data_root`, with `legacy_root` checked once
    /// per setup for directory migration.
    pub fn new(
        data_root: impl Into<Utf8PathBuf>,
        legacy_root: impl Into<Utf8PathBuf>,
        defaults: DefaultsBundle,
    ) -> Self {
        Self {
            data_root: data_root.into(),
            legacy_root: legacy_root.into(),
            defaults,
            named: NamedFileRegistry::default(),
            custom: CustomFileRegistry::default(),
            verbose: false,
        }
    }

    /// Enable verbose diagnostics at construction time.
    pub fn with_verbose(mut self, enabled: bool) -> Self {
        self.set_verbose(enabled);
        self
    }

    /// Toggle info-level diagnostics for the whole subsystem. Warnings are
    /// always emitted.
    pub fn set_verbose(&mut self, enabled: bool) {
        self.verbose = enabled;
        self.named.set_verbose(enabled);
        self.custom.set_verbose(enabled);
    }

    pub fn is_verbose(&self) -> bool {
        self.verbose
    }

    pub fn data_root(&self) -> &Utf8Path {
        &self.data_root
    }

    /// Migrate the legacy directory, ensure the data root exists, then rebuild
    /// both registries from disk.
    ///
    /// Only a failure to create the data root is returned as an error; every
    /// other problem is logged and skipped.
    pub fn setup(&mut self) -> Result<()> {
        if self.legacy_root.exists() && !self.data_root.exists() {
            tracing::warn!("Renaming {} to {}", self.legacy_root, self.data_root);

            if let Err(err) = fs::rename(&self.legacy_root, &self.data_root) {
                tracing::warn!("Could not rename {}: {err}", self.legacy_root);
            }
        } else if self.legacy_root.exists() && self.data_root.exists() {
            tracing::warn!(
                "The folder {} already exists, which prevents {} from being renamed",
                self.data_root,
                self.legacy_root
            );
            tracing::warn!(
                "Delete or back up {} if you want it converted automatically",
                self.data_root
            );
            tracing::warn!(
                "Run the reload command after deleting or backing up {} if needed",
                self.data_root
            );
        }

        if !self.data_root.exists() {
            fs::create_dir_all(&self.data_root)
                .with_context(|| format!("failed to create data directory {}", self.data_root))?;
        }

        self.named.setup(&self.data_root, &self.defaults);
        self.custom.discover(&self.data_root, &self.defaults);
        Ok(())
    }

    /// Register a folder that holds custom files.
    pub fn register_home_folder(&mut self, name: impl Into<String>) -> &mut Self {
        self.custom.register_home_folder(name);
        self
    }

    pub fn unregister_home_folder(&mut self, name: &str) -> &mut Self {
        self.custom.unregister_home_folder(name);
        self
    }

    /// Register a file to generate when its home folder does not exist yet.
    pub fn register_auto_generate(
        &mut self,
        file_name: impl Into<String>,
        home_folder: impl Into<String>,
    ) -> &mut Self {
        self.custom.register_auto_generate(file_name, home_folder);
        self
    }

    pub fn unregister_auto_generate(&mut self, file_name: &str) -> &mut Self {
        self.custom.unregister_auto_generate(file_name);
        self
    }

    /// The loaded document for a well-known file, or `None` if setup skipped it.
    pub fn named(&self, id: NamedFileId) -> Option<&Document> {
        self.named.get(id)
    }

    pub fn named_mut(&mut self, id: NamedFileId) -> Option<&mut Document> {
        self.named.get_mut(id)
    }

    /// Case-insensitive lookup of a tracked custom file by its name without
    /// extension.
    pub fn custom(&self, name: &str) -> Option<&CustomFile> {
        self.custom.find(name)
    }

    pub fn custom_mut(&mut self, name: &str) -> Option<&mut CustomFile> {
        self.custom.find_mut(name)
    }

    /// All tracked custom files, in discovery order.
    pub fn custom_files(&self) -> &[CustomFile] {
        self.custom.tracked()
    }

    /// Write a well-known file's document back to disk.
    pub fn save_named(&self, id: NamedFileId) -> Result<()> {
        let result = self.named.save(id);

        if let Err(err) = &result {
            tracing::error!("Could not save {}: {err:#}", id.file_name());
        }

        result
    }

    /// Write a custom file's document back to disk.
    pub fn save_custom(&self, name: &str) -> bool {
        self.custom.save(name, &self.data_root)
    }

    /// Replace a well-known file's document from disk, discarding unsaved
    /// edits.
    pub fn reload_named(&mut self, id: NamedFileId) {
        self.named.reload(id);
    }

    /// Replace a custom file's document from disk.
    pub fn reload_custom(&mut self, name: &str) -> bool {
        self.custom.reload(name, &self.data_root)
    }

    /// Reload every tracked file: well-known files in enumeration order, then
    /// all custom files. Individual failures never stop the batch.
    pub fn reload_all(&mut self) {
        self.named.reload_all();
        self.custom.reload_all(&self.data_root);
    }
}
