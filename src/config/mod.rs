//! Configuration: types, default paths, XML loading and validation.

pub mod paths;
pub mod types;
mod validate;
pub mod xml;

pub use paths::{default_config_path, default_log_path, path_has_symlink_ancestor};
pub use types::{Config, LogLevel};
pub use xml::{create_template_config, load_config, load_config_from_xml_path};

/// Environment variable naming an explicit config file.
pub const CONFIG_ENV: &str = "CPMOVE_CONFIG";
/// Directory name used under the OS config and data dirs.
pub const APP_DIR: &str = "cpmove";
/// Principal used when neither config nor CLI names one.
pub const DEFAULT_PRINCIPAL: &str = "cli";
