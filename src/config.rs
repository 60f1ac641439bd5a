use crate::{Result, error::Error};
use figment::{
    Figment,
    providers::{Env, Serialized},
};
use serde::{Deserialize, Serialize};
use std::{path::PathBuf, time::Duration};
const ENV_KEYS: [&str; 6] = [
    "API_BASE_URL",
    "API_TIMEOUT",
    "INPUT_DIR",
    "OUTPUT_DIR",
    "LOG_LEVEL",
    "LOG_FILE",
];
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub api_base_url: String,
    pub api_timeout: u64,
    pub input_dir: PathBuf,
    pub output_dir: PathBuf,
    pub log_level: String,
    pub log_file: PathBuf,
}
impl Default for Settings {
    fn default() -> Self {
        Self {
            api_base_url: "https://api.example.com".to_string(),
            api_timeout: 30,
            input_dir: PathBuf::from("data/input"),
            output_dir: PathBuf::from("data/output"),
            log_level: "INFO".to_string(),
            log_file: PathBuf::from("logs/sheetflow.log"),
        }
    }
}
impl Settings {
    /// Loads `.env` when present, then layers the process environment over the defaults.
    pub fn load() -> Result<Self> {
        if let Err(e) = dotenvy::dotenv()
            && !e.not_found()
        {
            return Err(Error::Config(format!("cannot load .env: {e}")));
        }
        Self::from_figment(&Self::figment())
    }
    pub fn figment() -> Figment {
        Figment::from(Serialized::defaults(Self::default())).merge(Env::raw().only(&ENV_KEYS))
    }
    pub fn from_figment(figment: &Figment) -> Result<Self> {
        let mut settings: Self = figment
            .extract()
            .map_err(|e| Error::Config(e.to_string()))?;
        settings.log_level = settings.log_level.trim().to_ascii_uppercase();
        settings.validate()?;
        Ok(settings)
    }
    fn validate(&self) -> Result<()> {
        if self.api_timeout == 0 {
            return Err(Error::Config(
                "API_TIMEOUT must be a positive number of seconds".to_string(),
            ));
        }
        if self.api_base_url.trim().is_empty() {
            return Err(Error::Config("API_BASE_URL must not be empty".to_string()));
        }
        Ok(())
    }
    pub const fn timeout(&self) -> Duration {
        Duration::from_secs(self.api_timeout)
    }
}
