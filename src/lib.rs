pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use crate::config::cli::{CliConfig, Command};

pub use crate::adapters::ApiClient;
pub use crate::config::{ServiceSettings, TomlConfig};
pub use crate::core::{controller::FormController, view::FormView};
pub use crate::utils::error::{EmlakError, Result};
