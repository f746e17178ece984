pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

pub use config::cli::LocalStorage;
pub use config::toml_config::TomlConfig;

#[cfg(feature = "cli")]
pub use config::{CliConfig, Command};

pub use core::{etl::EtlEngine, extract_pipeline::ExtractPipeline, morph_pipeline::MorphPipeline};
pub use domain::model::{LineSet, Point, Segment};
pub use utils::error::{Result, StickbugError};
