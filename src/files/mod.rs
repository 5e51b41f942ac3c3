//! File lifecycle management for the plugin's data root.
//!
//! Two registries cover everything the plugin keeps on disk:
//!
//! - [`NamedFileRegistry`]: the fixed set of well-known files
//!   (`config.yml`, `data.yml`, `messages.yml`, `codes.yml`), bootstrapped
//!   from bundled defaults when missing.
//! - [`CustomFileRegistry`]: an open-ended set of per-voucher documents
//!   discovered inside registered home folders, with auto-generation of
//!   defaults into freshly created folders.
//!
//! [`FileManager`] owns both, plus the one-time legacy directory migration.
//! Hosts construct it with explicit paths and defaults, register folders, call
//! `setup`, and from then on read, save, and reload through it:
//!
//! ```ignore
//! use voucherfiles::{DefaultsBundle, FileManager, NamedFileId};
//!
//! let mut manager = FileManager::new(data_root, legacy_root, DefaultsBundle::builtin());
//! manager
//!     .register_home_folder("vouchers")
//!     .register_auto_generate("example.yml", "vouchers");
//! manager.setup()?;
//!
//! let prefix = manager
//!     .named(NamedFileId::Config)
//!     .and_then(|doc| doc.get("Settings.Prefix"));
//! ```
//!
//! Everything here is synchronous, single-threaded, blocking I/O. Failures are
//! logged and converted to skips, booleans, or `None`; nothing aborts the host.

pub mod custom;
pub mod manager;
pub mod named;

pub use custom::{CustomFile, CustomFileRegistry};
pub use manager::FileManager;
pub use named::{NamedFileId, NamedFileRegistry};
