//! Registry for dynamically discovered per-voucher files.

use crate::defaults::DefaultsBundle;
use crate::document::Document;
use camino::{Utf8Path, Utf8PathBuf};
use indexmap::IndexMap;
use std::fs;

/// Extension custom documents must carry to be tracked.
const EXTENSION: &str = ".yml";

/// A document discovered inside a registered home folder.
///
/// A file can be tracked without a backing document: the path never existed, or
/// its content failed to parse at discovery time. `exists` distinguishes that
/// state from an empty-but-present document.
#[derive(Debug, Clone)]
pub struct CustomFile {
    name: String,
    file_name: String,
    home_folder: String,
    document: Option<Document>,
}

impl CustomFile {
    fn new(file_name: &str, home_folder: &str, root: &Utf8Path) -> Self {
        let path = root.join(home_folder).join(file_name);

        let document = if path.exists() {
            match Document::load(&path) {
                Ok(document) => Some(document),
                Err(err) => {
                    tracing::warn!("Could not parse {path}: {err}");
                    None
                }
            }
        } else {
            None
        };

        Self {
            name: file_name.trim_end_matches(EXTENSION).to_string(),
            file_name: file_name.to_string(),
            home_folder: home_folder.to_string(),
            document,
        }
    }

    /// File name without the extension.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// File name with the extension.
    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    /// Name of the home folder the file lives in.
    pub fn home_folder(&self) -> &str {
        &self.home_folder
    }

    pub fn document(&self) -> Option<&Document> {
        self.document.as_ref()
    }

    pub fn document_mut(&mut self) -> Option<&mut Document> {
        self.document.as_mut()
    }

    /// True when the file has a backing document.
    pub fn exists(&self) -> bool {
        self.document.is_some()
    }

    fn path(&self, root: &Utf8Path) -> Utf8PathBuf {
        root.join(&self.home_folder).join(&self.file_name)
    }

    /// Write the in-memory document to disk. False when there is no backing
    /// document or the write fails.
    pub fn save(&self, root: &Utf8Path) -> bool {
        let Some(document) = &self.document else {
            tracing::warn!("{} has no backing document to save", self.file_name);
            return false;
        };

        match document.save(&self.path(root)) {
            Ok(()) => true,
            Err(err) => {
                tracing::error!("Could not save {}: {err}", self.file_name);
                false
            }
        }
    }

    /// Replace the in-memory document from disk, discarding unsaved edits.
    /// A no-op reporting false when the file never had a backing document.
    pub fn reload(&mut self, root: &Utf8Path) -> bool {
        if self.document.is_none() {
            tracing::warn!("{} has no backing document to reload", self.file_name);
            return false;
        }

        match Document::load(&self.path(root)) {
            Ok(document) => {
                self.document = Some(document);
                true
            }
            Err(err) => {
                tracing::warn!("Could not reload {}: {err}", self.file_name);
                false
            }
        }
    }
}

/// Tracks home folders and the custom files discovered inside them.
#[derive(Debug, Default)]
pub struct CustomFileRegistry {
    home_folders: Vec<String>,
    auto_generate: IndexMap<String, String>,
    files: Vec<CustomFile>,
    // Lowercased name -> position in `files`, rebuilt on every discovery pass.
    index: IndexMap<String, usize>,
    verbose: bool,
}

impl CustomFileRegistry {
    pub fn new(verbose: bool) -> Self {
        Self {
            verbose,
            ..Self::default()
        }
    }

    pub fn set_verbose(&mut self, enabled: bool) {
        self.verbose = enabled;
    }

    /// Register a folder to scan on the next discovery pass. Registering the
    /// same name again is a no-op.
    pub fn register_home_folder(&mut self, name: impl Into<String>) -> &mut Self {
        let name = name.into();
        if !self.home_folders.contains(&name) {
            self.home_folders.push(name);
        }
        self
    }

    pub fn unregister_home_folder(&mut self, name: &str) -> &mut Self {
        self.home_folders.retain(|folder| folder != name);
        self
    }

    /// Register a file to generate from the bundled defaults when its home
    /// folder does not exist yet. Re-registering a file name replaces its
    /// target folder.
    pub fn register_auto_generate(
        &mut self,
        file_name: impl Into<String>,
        home_folder: impl Into<String>,
    ) -> &mut Self {
        self.auto_generate.insert(file_name.into(), home_folder.into());
        self
    }

    pub fn unregister_auto_generate(&mut self, file_name: &str) -> &mut Self {
        self.auto_generate.shift_remove(file_name);
        self
    }

    /// Scan every registered home folder under `root`, rebuilding the tracked
    /// set from scratch. Missing folders are created and seeded from the
    /// auto-generate table.
    pub fn discover(&mut self, root: &Utf8Path, defaults: &DefaultsBundle) {
        self.clear();

        if self.home_folders.is_empty() {
            return;
        }

        if self.verbose {
            tracing::info!("Loading custom files");
        }

        let folders = self.home_folders.clone();
        for folder in &folders {
            let folder_path = root.join(folder);

            if folder_path.exists() {
                self.scan_folder(folder, &folder_path, root);
            } else {
                self.generate_folder(folder, &folder_path, root, defaults);
            }
        }

        if self.verbose {
            tracing::info!("Finished loading custom files");
        }
    }

    fn scan_folder(&mut self, folder: &str, folder_path: &Utf8Path, root: &Utf8Path) {
        let entries = match fs::read_dir(folder_path) {
            Ok(entries) => entries,
            Err(err) => {
                tracing::warn!("Could not list {folder_path}: {err}");
                return;
            }
        };

        for entry in entries.flatten() {
            let file_name = entry.file_name();
            let Some(file_name) = file_name.to_str() else {
                continue;
            };

            if !file_name.ends_with(EXTENSION) {
                continue;
            }

            self.track(CustomFile::new(file_name, folder, root));

            if self.verbose {
                tracing::info!("Loaded custom file: {folder}/{file_name}");
            }
        }
    }

    fn generate_folder(
        &mut self,
        folder: &str,
        folder_path: &Utf8Path,
        root: &Utf8Path,
        defaults: &DefaultsBundle,
    ) {
        if let Err(err) = fs::create_dir_all(folder_path) {
            tracing::warn!("Could not create {folder_path}: {err}");
            return;
        }

        if self.verbose {
            tracing::info!("The folder {folder}/ was not found so it was created");
        }

        // The registered folder name stays fixed for the whole pass; only the
        // file names come from the auto-generate table.
        let wanted: Vec<String> = self
            .auto_generate
            .iter()
            .filter(|(_, target)| target.eq_ignore_ascii_case(folder))
            .map(|(file_name, _)| file_name.clone())
            .collect();

        for file_name in wanted {
            let resource = format!("{folder}/{file_name}");
            let destination = folder_path.join(&file_name);

            let Some(bytes) = defaults.get(&resource) else {
                tracing::error!("No bundled default for {resource}");
                continue;
            };

            if let Err(err) = fs::write(&destination, bytes) {
                tracing::error!("Failed to create default file {folder}/{file_name}: {err}");
                continue;
            }

            if file_name.to_lowercase().ends_with(EXTENSION) {
                self.track(CustomFile::new(&file_name, folder, root));
            }

            if self.verbose {
                tracing::info!("Created new default file: {folder}/{file_name}");
            }
        }
    }

    fn track(&mut self, file: CustomFile) {
        // First tracked file wins a name collision, matching lookup order.
        self.index
            .entry(file.name().to_lowercase())
            .or_insert(self.files.len());
        self.files.push(file);
    }

    /// Case-insensitive lookup by name without extension.
    pub fn find(&self, name: &str) -> Option<&CustomFile> {
        self.index
            .get(&name.to_lowercase())
            .and_then(|&position| self.files.get(position))
    }

    pub fn find_mut(&mut self, name: &str) -> Option<&mut CustomFile> {
        let position = *self.index.get(&name.to_lowercase())?;
        self.files.get_mut(position)
    }

    /// Save the named file's document to disk. False on lookup miss or write
    /// failure.
    pub fn save(&self, name: &str, root: &Utf8Path) -> bool {
        let Some(file) = self.find(name) else {
            if self.verbose {
                tracing::info!("The file {name}{EXTENSION} could not be found");
            }
            return false;
        };

        let saved = file.save(root);

        if saved && self.verbose {
            tracing::info!("Successfully saved {}", file.file_name());
        }

        saved
    }

    /// Reload the named file's document from disk. False on lookup miss, an
    /// absent document, or a parse failure.
    pub fn reload(&mut self, name: &str, root: &Utf8Path) -> bool {
        let verbose = self.verbose;

        let Some(file) = self.find_mut(name) else {
            if verbose {
                tracing::info!("The file {name}{EXTENSION} could not be found");
            }
            return false;
        };

        let reloaded = file.reload(root);

        if reloaded && verbose {
            tracing::info!("Successfully reloaded {}", file.file_name());
        }

        reloaded
    }

    /// Reload every tracked file, ignoring individual failures.
    pub fn reload_all(&mut self, root: &Utf8Path) {
        for file in &mut self.files {
            file.reload(root);
        }
    }

    /// All tracked files, in discovery order.
    pub fn tracked(&self) -> &[CustomFile] {
        &self.files
    }

    /// Drop the tracked set. Folder and auto-generate registrations persist.
    pub fn clear(&mut self) {
        self.files.clear();
        self.index.clear();
    }
}
