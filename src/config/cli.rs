use crate::config::{ServiceSettings, TomlConfig};
use crate::utils::error::Result;
use clap::{Parser, Subcommand};

#[derive(Debug, Clone, Parser)]
#[command(name = "akilli-emlakci")]
#[command(about = "Estimate a house price from city, district, area and room counts")]
pub struct CliConfig {
    #[arg(long, env = "EMLAK_BASE_URL", help = "Base URL of the prediction service")]
    pub base_url: Option<String>,

    #[arg(long, help = "Request timeout in seconds (no timeout when omitted)")]
    pub timeout_seconds: Option<u64>,

    #[arg(long, short = 'c', help = "Path to a TOML config file")]
    pub config: Option<String>,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit logs as JSON")]
    pub json_logs: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// List every city and its districts
    Cities {
        #[arg(long, help = "Print the raw taxonomy as JSON")]
        json: bool,
    },
    /// Submit one prediction request and print the result
    Predict {
        #[arg(long, default_value = "")]
        il: String,
        #[arg(long, default_value = "")]
        ilce: String,
        #[arg(long, default_value = "")]
        metrekare: String,
        #[arg(long, default_value = "")]
        oda_sayisi: String,
        #[arg(long, default_value = "")]
        salon_sayisi: String,
    },
    /// Fill in the form interactively
    Form,
}

impl CliConfig {
    pub fn load_file(&self) -> Result<Option<TomlConfig>> {
        self.config
            .as_deref()
            .map(TomlConfig::from_file)
            .transpose()
    }

    /// Flags (and `EMLAK_BASE_URL`) override the config file, which overrides
    /// the built-in defaults.
    pub fn settings(&self, file: Option<&TomlConfig>) -> ServiceSettings {
        let mut settings = file.map(ServiceSettings::from).unwrap_or_default();

        if let Some(base_url) = &self.base_url {
            settings.base_url = base_url.clone();
        }
        if self.timeout_seconds.is_some() {
            settings.timeout_seconds = self.timeout_seconds;
        }

        settings
    }
}
