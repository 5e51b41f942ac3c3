// voucherfiles - on-disk configuration and data management for the Vouchers plugin
//
// This is the library crate containing the file lifecycle core: document store,
// bundled defaults, and the named/custom file registries behind FileManager.

pub mod defaults;
pub mod document;
pub mod files;
pub mod logging;

// Re-export commonly used types for convenience
pub use defaults::DefaultsBundle;
pub use document::{Document, DocumentError};
pub use files::{CustomFile, CustomFileRegistry, FileManager, NamedFileId, NamedFileRegistry};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const CRATE_NAME: &str = env!("CARGO_PKG_NAME");
