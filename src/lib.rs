pub mod aggregate;
pub mod app;
pub mod config;
pub mod errors;
pub mod forecast;
pub mod handlers;
pub mod models;
pub mod month;
pub mod otp;
pub mod series;
pub mod state;
pub mod stats;
pub mod storage;
pub mod ui;

pub use app::router;
pub use config::Config;
pub use forecast::{Forecaster, TrainingConfig, WindowedRegressor};
pub use state::AppState;
pub use storage::load_data;
