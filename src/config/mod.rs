use std::env;
use std::str::FromStr;

use crate::analysis::{AnalysisConfig, SpoilagePolicy, TransportRates};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Pretty,
    Json,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub host: String,
    pub port: u16,

    // Shared bearer token for /api routes; None disables the gate (dev mode)
    pub api_token: Option<String>,
    pub run_migrations: bool,
    pub log_format: LogFormat,

    pub analysis: AnalysisConfig,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Ok(Self {
            database_url: env::var("DATABASE_URL")
                .map_err(|_| anyhow::anyhow!("DATABASE_URL must be set"))?,
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".into())
                .parse()?,
            api_token: env::var("API_TOKEN").ok().filter(|t| !t.is_empty()),
            run_migrations: env_or("RUN_MIGRATIONS", true),
            log_format: log_format_from_env(),
            analysis: analysis_from_env(),
        })
    }
}

/// Log format selected by `LOG_FORMAT`; anything other than `json` is pretty.
pub fn log_format_from_env() -> LogFormat {
    match env::var("LOG_FORMAT").map(|v| v.to_lowercase()).as_deref() {
        Ok("json") => LogFormat::Json,
        _ => LogFormat::Pretty,
    }
}

/// Analysis constants, each overridable from the environment.
pub fn analysis_from_env() -> AnalysisConfig {
    let defaults = AnalysisConfig::default();
    let transport = defaults.transport;
    let spoilage = defaults.spoilage;

    AnalysisConfig {
        transport: TransportRates {
            base_rate_per_km: env_or("TRANSPORT_BASE_RATE", transport.base_rate_per_km),
            weight_factor_per_kg_km: env_or(
                "TRANSPORT_WEIGHT_FACTOR",
                transport.weight_factor_per_kg_km,
            ),
        },
        spoilage: SpoilagePolicy {
            avg_speed_kmh: env_or("AVG_TRANSIT_SPEED_KMH", spoilage.avg_speed_kmh),
            low_threshold_pct: env_or("SPOILAGE_LOW_PCT", spoilage.low_threshold_pct),
            medium_threshold_pct: env_or("SPOILAGE_MEDIUM_PCT", spoilage.medium_threshold_pct),
            medium_multiplier: env_or("SPOILAGE_MEDIUM_MULTIPLIER", spoilage.medium_multiplier),
            high_multiplier: env_or("SPOILAGE_HIGH_MULTIPLIER", spoilage.high_multiplier),
        },
        default_price_per_kg: env_or("DEFAULT_PRICE_PER_KG", defaults.default_price_per_kg),
        opportunity_limit: env_or("OPPORTUNITY_LIMIT", defaults.opportunity_limit),
    }
}

/// Parse `key` from the environment, falling back to `default` when unset
/// or unparseable.
fn env_or<T: FromStr>(key: &str, default: T) -> T {
    match env::var(key) {
        Ok(raw) => raw.trim().parse().unwrap_or_else(|_| {
            tracing::warn!(key, value = %raw, "Unparseable config value, using default");
            default
        }),
        Err(_) => default,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_env_or_parses_and_falls_back() {
        env::set_var("AGRIMARKET_TEST_SPEED", "55.5");
        env::set_var("AGRIMARKET_TEST_BAD", "fast");
        assert_eq!(env_or("AGRIMARKET_TEST_SPEED", 40.0), 55.5);
        assert_eq!(env_or("AGRIMARKET_TEST_BAD", 40.0), 40.0);
        assert_eq!(env_or("AGRIMARKET_TEST_UNSET_KEY", 7_i64), 7);
    }

    #[test]
    fn test_analysis_defaults_without_overrides() {
        let config = analysis_from_env();
        // Other tests never set the real keys.
        assert_eq!(config, AnalysisConfig::default());
    }
}
