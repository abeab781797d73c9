// relink-common/src/lib.rs
pub mod config;
pub mod error;
pub mod manifest;
pub mod model;
pub mod path;

// Re-export key types
pub use config::Config;
pub use error::{RelinkError, Result};
pub use manifest::Manifest;
