//! Demo application configuration.
//!
//! The library itself is configured through [`PageController`] knobs at
//! runtime; this module only concerns the demo binary, which resolves its
//! settings through the usual precedence chain of defaults, config file,
//! environment variables and CLI flags.
//!
//! [`PageController`]: crate::controller::PageController

pub mod keybindings;
pub mod loader;

pub use keybindings::{KeyBindings, PagerAction};
pub use loader::{
    apply_cli_overrides, apply_env_overrides, default_config_path, default_log_path,
    load_config_file, load_config_with_precedence, merge_config, ConfigError, ConfigFile,
    ResolvedConfig,
};
