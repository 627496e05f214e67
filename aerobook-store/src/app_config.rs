use aerobook_core::{PassengerPolicy, TravelerDefaults};
use serde::Deserialize;
use std::env;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub amadeus: AmadeusConfig,
    #[serde(default)]
    pub booking: BookingConfig,
    #[serde(default)]
    pub traveler_defaults: TravelerDefaults,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub port: u16,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

fn default_max_connections() -> u32 { 5 }

#[derive(Debug, Deserialize, Clone)]
pub struct AmadeusConfig {
    pub base_url: String,
    pub client_id: String,
    pub client_secret: String,
    /// Unset keeps the HTTP client's default (no timeout).
    pub request_timeout_seconds: Option<u64>,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct BookingConfig {
    #[serde(default)]
    pub passenger_policy: PassengerPolicy,
}

impl Config {
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let s = config::Config::builder()
            .add_source(config::File::with_name("config/default"))
            // Per-environment overrides, optional
            .add_source(config::File::with_name(&format!("config/{}", run_mode)).required(false))
            // Developer overrides, not checked in
            .add_source(config::File::with_name("config/local").required(false))
            // Secrets come from the environment, e.g. AEROBOOK__AMADEUS__CLIENT_SECRET
            .add_source(config::Environment::with_prefix("AEROBOOK").separator("__"))
            .build()?;

        s.try_deserialize()
    }
}
