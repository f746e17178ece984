pub mod cli;
pub mod toml_config;

#[cfg(feature = "cli")]
mod args;

#[cfg(feature = "cli")]
pub use args::{CliConfig, Command};
