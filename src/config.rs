use anyhow::Result;
use config::{Config, Environment, File};
use serde::Deserialize;
use tracing::debug;

pub const DEFAULT_DATABASE_URL: &str = "sqlite://bankcore.db?mode=rwc";
pub const DEFAULT_SEED_BANK_NAME: &str = "Sberbank";

/// Runtime settings.
///
/// Sources, later ones winning: built-in defaults, an optional
/// `bankcore.toml` in the working directory, then the environment
/// (`DATABASE_URL`, `SEED_BANK_NAME`). A `.env` file is loaded into the
/// environment first.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Settings {
    pub database_url: String,
    pub seed_bank_name: String,
}

impl Settings {
    pub fn load() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_sources(Some("bankcore"))
    }

    fn from_sources(file: Option<&str>) -> Result<Self> {
        let mut builder = Config::builder()
            .set_default("database_url", DEFAULT_DATABASE_URL)?
            .set_default("seed_bank_name", DEFAULT_SEED_BANK_NAME)?;
        if let Some(file) = file {
            builder = builder.add_source(File::with_name(file).required(false));
        }
        let settings: Settings = builder
            .add_source(Environment::default())
            .build()?
            .try_deserialize()?;

        debug!(database_url = %settings.database_url, "Loaded settings");
        Ok(settings)
    }

    /// Replaces the database URL when one was given on the command line.
    pub fn with_database_url(mut self, database_url: Option<String>) -> Self {
        if let Some(database_url) = database_url {
            self.database_url = database_url;
        }
        self
    }
}
