use crate::forecast::TrainingConfig;
use std::{env, fmt::Display, path::PathBuf, str::FromStr, time::Duration};
use tracing::{info, warn};

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub data_path: PathBuf,
    pub forecast_months: usize,
    pub forecast_max_months: usize,
    pub forecast_epochs: usize,
    pub forecast_budget: Duration,
    pub otp_ttl: Duration,
}

impl Config {
    pub fn load() -> Self {
        Self {
            port: try_load("PORT", 8080),
            data_path: PathBuf::from(try_load("APP_DATA_PATH", String::from("data/state.json"))),
            forecast_months: try_load("FORECAST_MONTHS", 6),
            forecast_max_months: try_load("FORECAST_MAX_MONTHS", 24),
            forecast_epochs: try_load("FORECAST_EPOCHS", 500),
            forecast_budget: Duration::from_millis(try_load("FORECAST_BUDGET_MS", 250)),
            otp_ttl: Duration::from_secs(try_load("OTP_TTL_SECS", 300)),
        }
    }

    pub fn training(&self) -> TrainingConfig {
        TrainingConfig {
            epochs: self.forecast_epochs,
            budget: self.forecast_budget,
            ..TrainingConfig::default()
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 8080,
            data_path: PathBuf::from("data/state.json"),
            forecast_months: 6,
            forecast_max_months: 24,
            forecast_epochs: 500,
            forecast_budget: Duration::from_millis(250),
            otp_ttl: Duration::from_secs(300),
        }
    }
}

fn try_load<T>(key: &str, default: T) -> T
where
    T: FromStr + Display,
    T::Err: Display,
{
    match env::var(key) {
        Ok(raw) => parse_or(key, &raw, default),
        Err(_) => {
            info!("{key} not set, using default: {default}");
            default
        }
    }
}

fn parse_or<T>(key: &str, raw: &str, default: T) -> T
where
    T: FromStr + Display,
    T::Err: Display,
{
    raw.trim().parse().unwrap_or_else(|e| {
        warn!("Invalid {key} value {raw:?}: {e}, using default: {default}");
        default
    })
}
