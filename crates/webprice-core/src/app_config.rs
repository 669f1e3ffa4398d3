use std::net::SocketAddr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

/// Which family of adjustment rules the engine applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Strategy {
    /// Lower losing prices towards the cheapest competitor and flag rows
    /// priced below it as margin opportunities.
    #[default]
    Competitive,
    /// Raise already-winning prices up to a fixed fraction of the next
    /// competitor.
    MarginProtection,
}

impl Strategy {
    /// Parses the kebab-case name used in env vars and CLI flags.
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "competitive" => Some(Self::Competitive),
            "margin-protection" | "margin_protection" => Some(Self::MarginProtection),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Competitive => "competitive",
            Self::MarginProtection => "margin-protection",
        }
    }

    /// Human-readable description reported alongside the insights summary.
    #[must_use]
    pub fn description(self) -> &'static str {
        match self {
            Self::Competitive => {
                "Competitiveness correction for losing products and margin optimization for products priced below the cheapest competitor"
            }
            Self::MarginProtection => {
                "Margin protection for winning products while staying below the next competitor"
            }
        }
    }
}

impl std::fmt::Display for Strategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Tunables for one ingestion-and-analysis call.
///
/// Every discount factor multiplies a competitor price; they are kept as
/// named settings because the business never settled on a single value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalysisSettings {
    pub strategy: Strategy,
    /// Factor applied to the cheapest competitor when lowering a losing price.
    pub competitive_factor: Decimal,
    /// Factor applied to the cheapest competitor when a price sits below it.
    pub margin_factor: Decimal,
    /// Factor applied to the next competitor when protecting a winning price.
    pub protect_factor: Decimal,
    /// Maximum number of suggestions returned for presentation.
    pub top_k: usize,
    /// Number of leading lines searched for the header row.
    pub header_scan_depth: usize,
}

impl Default for AnalysisSettings {
    fn default() -> Self {
        Self {
            strategy: Strategy::Competitive,
            competitive_factor: Decimal::new(99, 2),
            margin_factor: Decimal::new(99, 2),
            protect_factor: Decimal::new(95, 2),
            top_k: 20,
            header_scan_depth: 10,
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub env: Environment,
    pub bind_addr: SocketAddr,
    pub log_level: String,
    /// Upper bound on an uploaded file, in bytes.
    pub max_upload_bytes: usize,
    pub analysis: AnalysisSettings,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strategy_parse_accepts_both_spellings() {
        assert_eq!(Strategy::parse("competitive"), Some(Strategy::Competitive));
        assert_eq!(
            Strategy::parse("Margin-Protection"),
            Some(Strategy::MarginProtection)
        );
        assert_eq!(
            Strategy::parse("margin_protection"),
            Some(Strategy::MarginProtection)
        );
        assert_eq!(Strategy::parse("aggressive"), None);
    }

    #[test]
    fn strategy_display_round_trips_through_parse() {
        for strategy in [Strategy::Competitive, Strategy::MarginProtection] {
            assert_eq!(Strategy::parse(&strategy.to_string()), Some(strategy));
        }
    }

    #[test]
    fn default_settings_use_documented_factors() {
        let settings = AnalysisSettings::default();
        assert_eq!(settings.competitive_factor.to_string(), "0.99");
        assert_eq!(settings.margin_factor.to_string(), "0.99");
        assert_eq!(settings.protect_factor.to_string(), "0.95");
        assert_eq!(settings.top_k, 20);
        assert_eq!(settings.header_scan_depth, 10);
    }
}
