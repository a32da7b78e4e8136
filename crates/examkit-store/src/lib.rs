//! examkit-store: persistent backends for examkit.
//!
//! A file-per-key JSON store, a folder backend built on it, and the TOML
//! configuration that says where the data lives.

pub mod config;
pub mod file;
pub mod folders;

pub use config::{load_config, load_config_from, ExamkitConfig};
pub use file::FileStore;
pub use folders::StoreFolderBackend;
