use std::path::Path;

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

const ENV_PREFIX: &str = "PUSH_REGISTRY";

#[derive(Debug, Clone, Deserialize)]
pub struct WebserverSettings {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(tag = "type")]
#[serde(rename_all = "lowercase")]
pub enum DatabaseSettings {
    InMemory,
    File { path: String },
    Sqlite { path: String },
}

fn default_timeout_secs() -> u64 {
    10
}

#[derive(Debug, Deserialize, Clone)]
#[serde(tag = "type")]
#[serde(rename_all = "lowercase")]
pub enum GatewaySettings {
    Fcm {
        /// Path to the Firebase service account key file
        service_account: String,
        #[serde(default = "default_timeout_secs")]
        timeout_secs: u64,
    },
    Apns {
        team_id: String,
        key_id: String,
        bundle_id: String,
        #[serde(rename = "private_key")]
        private_key_path: String,
        #[serde(default)]
        production: bool,
    },
    #[serde(alias = "log")]
    Dummy,
}

#[derive(Debug, Deserialize, Clone)]
pub struct NotificationSettings {
    /// Link opened by every dispatched notification
    pub deep_link: String,
    /// Upper bound on a single provider call made by the dispatch endpoint
    #[serde(default = "default_timeout_secs")]
    pub send_timeout_secs: u64,
    pub gateway: GatewaySettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub webserver: WebserverSettings,
    pub database: DatabaseSettings,
    pub notifications: NotificationSettings,
}

impl Settings {
    pub fn load() -> Result<Settings, ConfigError> {
        let settings = Config::builder()
            .add_source(File::with_name("settings"))
            .add_source(Environment::with_prefix(ENV_PREFIX).separator("__"))
            .build()?;

        settings.try_deserialize()
    }

    pub fn load_from_path(path: impl AsRef<Path>) -> Result<Settings, ConfigError> {
        let settings = Config::builder()
            .add_source(File::from(path.as_ref()))
            .add_source(Environment::with_prefix(ENV_PREFIX).separator("__"))
            .build()?;

        settings.try_deserialize()
    }
}
