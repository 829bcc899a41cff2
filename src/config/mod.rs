//! Configuration module.
//!
//! The library itself is configured through [`crate::list::EndlessList`] setters. This
//! module resolves the settings of the demo binary.

pub mod loader;

pub use loader::{
    apply_cli_overrides, apply_env_overrides, default_config_path, default_log_path,
    load_config_file, load_config_with_precedence, merge_config, CliOverrides, ConfigError,
    ConfigFile, LayoutKind, ResolvedConfig,
};
