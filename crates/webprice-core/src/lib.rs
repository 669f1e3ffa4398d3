pub mod app_config;
pub mod config;
pub mod fields;
pub mod records;

pub use app_config::{AnalysisSettings, AppConfig, Environment, Strategy};
pub use config::{load_app_config, load_app_config_from_env};
pub use fields::CanonicalField;
pub use records::{round_money, AdjustmentType, ProductRecord, Suggestion};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for environment variable {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}
