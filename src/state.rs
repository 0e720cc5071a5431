use crate::config::Config;
use crate::forecast::{Forecaster, WindowedRegressor};
use crate::models::AppData;
use crate::otp::{MemoryTokenStore, OtpService};
use std::sync::Arc;
use tokio::sync::Mutex;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub data: Arc<Mutex<AppData>>,
    pub forecaster: Arc<dyn Forecaster>,
    pub otp: OtpService,
}

impl AppState {
    pub fn new(config: Config, data: AppData) -> Self {
        let forecaster = Arc::new(WindowedRegressor::new(config.training()));
        let otp = OtpService::new(Arc::new(MemoryTokenStore::new()), config.otp_ttl);
        Self::with_parts(config, data, forecaster, otp)
    }

    pub fn with_parts(
        config: Config,
        data: AppData,
        forecaster: Arc<dyn Forecaster>,
        otp: OtpService,
    ) -> Self {
        Self {
            config: Arc::new(config),
            data: Arc::new(Mutex::new(data)),
            forecaster,
            otp,
        }
    }
}
