//! KDL configuration for Stratus.
//!
//! This crate handles:
//! - Profile files (`~/.stratus/config.kdl`)
//! - Variable interpolation in profile values
//! - Auth token lookup

pub mod error;
pub mod profile;
pub mod variables;

pub use error::{ConfigError, ConfigResult};
pub use profile::{ConfigFile, Profile, default_config_path, load_config, parse_config, parse_config_with};
pub use variables::Variables;
