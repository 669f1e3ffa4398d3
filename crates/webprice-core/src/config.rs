use std::str::FromStr;

use rust_decimal::Decimal;

use crate::app_config::{AnalysisSettings, AppConfig, Environment, Strategy};
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but cannot be parsed or is out
/// of range.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files. Use it when
/// the caller manages env setup.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but cannot be parsed or is out
/// of range.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Every variable is optional; lookups are routed through `lookup` so tests
/// can use a plain `HashMap` instead of mutating the process environment.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::net::SocketAddr;

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let invalid = |var: &str, reason: String| ConfigError::InvalidEnvVar {
        var: var.to_string(),
        reason,
    };

    let parse_addr = |var: &str, default: &str| -> Result<SocketAddr, ConfigError> {
        or_default(var, default)
            .parse::<SocketAddr>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_count = |var: &str, default: &str| -> Result<usize, ConfigError> {
        let value = or_default(var, default)
            .parse::<usize>()
            .map_err(|e| invalid(var, e.to_string()))?;
        if value == 0 {
            return Err(invalid(var, "must be at least 1".to_string()));
        }
        Ok(value)
    };

    let parse_factor = |var: &str, default: &str| -> Result<Decimal, ConfigError> {
        let raw = or_default(var, default);
        let value = Decimal::from_str(raw.trim()).map_err(|e| invalid(var, e.to_string()))?;
        if value <= Decimal::ZERO || value > Decimal::ONE {
            return Err(invalid(var, format!("{value} is outside (0, 1]")));
        }
        Ok(value)
    };

    let env = parse_environment(&or_default("WEBPRICE_ENV", "development"))?;
    let bind_addr = parse_addr("WEBPRICE_BIND_ADDR", "127.0.0.1:5001")?;
    let log_level = or_default("WEBPRICE_LOG_LEVEL", "info");
    let max_upload_bytes = parse_count("WEBPRICE_MAX_UPLOAD_BYTES", "10485760")?;

    let raw_strategy = or_default("WEBPRICE_STRATEGY", "competitive");
    let strategy = Strategy::parse(&raw_strategy).ok_or_else(|| {
        invalid(
            "WEBPRICE_STRATEGY",
            format!("unknown strategy \"{raw_strategy}\" (expected competitive or margin-protection)"),
        )
    })?;

    let analysis = AnalysisSettings {
        strategy,
        competitive_factor: parse_factor("WEBPRICE_COMPETITIVE_FACTOR", "0.99")?,
        margin_factor: parse_factor("WEBPRICE_MARGIN_FACTOR", "0.99")?,
        protect_factor: parse_factor("WEBPRICE_PROTECT_FACTOR", "0.95")?,
        top_k: parse_count("WEBPRICE_TOP_K", "20")?,
        header_scan_depth: parse_count("WEBPRICE_HEADER_SCAN_DEPTH", "10")?,
    };

    Ok(AppConfig {
        env,
        bind_addr,
        log_level,
        max_upload_bytes,
        analysis,
    })
}

/// Parse a string into an `Environment` variant.
fn parse_environment(s: &str) -> Result<Environment, ConfigError> {
    match s {
        "development" => Ok(Environment::Development),
        "test" => Ok(Environment::Test),
        "production" => Ok(Environment::Production),
        other => Err(ConfigError::InvalidEnvVar {
            var: "WEBPRICE_ENV".to_string(),
            reason: format!("unknown environment \"{other}\""),
        }),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
