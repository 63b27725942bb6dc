//! Parsing and validation of `vxir.toml` parser configuration files.
//!
//! Every section is optional; an absent file and an empty file both yield
//! [`ParserConfig::default`].

#![warn(missing_docs)]

pub mod error;
pub mod loader;
pub mod types;

pub use error::ConfigError;
pub use loader::{load_config, load_config_from_str, CONFIG_FILE_NAME};
pub use types::*;
