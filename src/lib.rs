pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use adapters::{FsLocator, YamlLoader};
pub use config::{OutputFormat, Settings};
pub use crate::core::{engine::GrabEngine, resolver::resolve};
pub use utils::error::{GrabError, Result};
