pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use crate::config::CliConfig;
pub use crate::config::TomlConfig;

pub use crate::adapters::SqliteStore;
pub use crate::core::{etl::EtlEngine, pipeline::RulePipeline};
pub use crate::domain::model::{InvalidNamePolicy, RunReport, Rule};
pub use crate::utils::error::{EtlError, Result};
