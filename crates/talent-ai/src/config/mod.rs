use std::env;
use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;

use crate::workflows::screening::{ScoringConfig, ScoringConfigError};

const DEFAULT_HOST: &str = "127.0.0.1";
const DEFAULT_PORT: u16 = 3000;
const DEFAULT_LOG_LEVEL: &str = "info";

/// Deployment stage the service runs in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AppEnvironment {
    #[default]
    Development,
    Test,
    Production,
}

impl AppEnvironment {
    /// Unknown stage names fall back to development.
    fn parse(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "prod" | "production" => Self::Production,
            "test" | "ci" => Self::Test,
            _ => Self::Development,
        }
    }
}

/// Everything the service and CLI read from the environment.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub server: ServerConfig,
    pub telemetry: TelemetryConfig,
    pub scoring: ScoringConfig,
}

impl AppConfig {
    /// Load `.env` if present, then read the process environment.
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the configuration from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let vars = Vars(lookup);

        let environment = vars
            .get("APP_ENV")
            .map(|raw| AppEnvironment::parse(&raw))
            .unwrap_or_default();

        let server = ServerConfig {
            host: vars.get("APP_HOST").unwrap_or_else(|| DEFAULT_HOST.to_string()),
            port: match vars.get("APP_PORT") {
                Some(raw) => raw.trim().parse().map_err(|_| ConfigError::InvalidPort(raw))?,
                None => DEFAULT_PORT,
            },
        };

        let telemetry = TelemetryConfig {
            log_level: vars
                .get("APP_LOG_LEVEL")
                .unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_string()),
        };

        let mut scoring = ScoringConfig::default();
        if let Some(threshold) = vars.parse("SCREENING_QUALIFIED_THRESHOLD")? {
            scoring.qualified_threshold = threshold;
        }
        if let Some(multiplier) = vars.parse("SCREENING_MANDATORY_SKILL_MULTIPLIER")? {
            scoring.mandatory_skill_multiplier = multiplier;
        }
        if let Some(cap) = vars.parse("SCREENING_BONUS_CAP")? {
            scoring.default_bonus_cap = cap;
        }
        if let Some(cap) = vars.parse("SCREENING_PENALTY_CAP")? {
            scoring.default_penalty_cap = cap;
        }
        scoring.validate()?;

        Ok(Self {
            environment,
            server,
            telemetry,
            scoring,
        })
    }
}

struct Vars<F>(F);

impl<F> Vars<F>
where
    F: Fn(&str) -> Option<String>,
{
    /// Blank values count as unset.
    fn get(&self, key: &str) -> Option<String> {
        (self.0)(key).filter(|value| !value.trim().is_empty())
    }

    fn parse<T: FromStr>(&self, key: &'static str) -> Result<Option<T>, ConfigError> {
        self.get(key)
            .map(|raw| {
                raw.trim()
                    .parse::<T>()
                    .map_err(|_| ConfigError::InvalidNumber { key, value: raw })
            })
            .transpose()
    }
}

/// HTTP bind settings.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    /// `localhost` maps to the IPv4 loopback; anything else must be an IP literal.
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        let ip = if self.host.eq_ignore_ascii_case("localhost") {
            IpAddr::from([127, 0, 0, 1])
        } else {
            self.host.parse().map_err(|source| ConfigError::InvalidHost {
                host: self.host.clone(),
                source,
            })?
        };
        Ok(SocketAddr::new(ip, self.port))
    }
}

#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("APP_PORT must be a valid u16 (found '{0}')")]
    InvalidPort(String),
    #[error("APP_HOST '{host}' must be localhost or an IPv4/IPv6 address")]
    InvalidHost {
        host: String,
        source: std::net::AddrParseError,
    },
    #[error("{key} must be numeric (found '{value}')")]
    InvalidNumber { key: &'static str, value: String },
    #[error("invalid scoring configuration: {0}")]
    Scoring(#[from] ScoringConfigError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load_with(pairs: &[(&str, &str)]) -> Result<AppConfig, ConfigError> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect();
        AppConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_apply_when_nothing_is_set() {
        let config = load_with(&[]).expect("defaults load");
        assert_eq!(config.environment, AppEnvironment::Development);
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.telemetry.log_level, "info");
        assert_eq!(config.scoring, ScoringConfig::default());
    }

    #[test]
    fn localhost_resolves_to_loopback() {
        let config = load_with(&[("APP_HOST", "LocalHost"), ("APP_PORT", "8081")])
            .expect("config loads");
        let addr = config.server.socket_addr().expect("localhost resolves");
        assert_eq!(addr, SocketAddr::new(IpAddr::from([127, 0, 0, 1]), 8081));
    }

    #[test]
    fn hostnames_other_than_localhost_are_rejected() {
        let config = load_with(&[("APP_HOST", "screening.internal")]).expect("config loads");
        assert!(matches!(
            config.server.socket_addr(),
            Err(ConfigError::InvalidHost { .. })
        ));
    }

    #[test]
    fn environment_aliases_are_recognised() {
        let config = load_with(&[("APP_ENV", "prod")]).expect("config loads");
        assert_eq!(config.environment, AppEnvironment::Production);
        let config = load_with(&[("APP_ENV", "CI")]).expect("config loads");
        assert_eq!(config.environment, AppEnvironment::Test);
    }

    #[test]
    fn scoring_overrides_are_applied() {
        let config = load_with(&[
            ("SCREENING_QUALIFIED_THRESHOLD", "75"),
            ("SCREENING_MANDATORY_SKILL_MULTIPLIER", " 3 "),
            ("SCREENING_BONUS_CAP", ""),
        ])
        .expect("config loads");
        assert_eq!(config.scoring.qualified_threshold, 75);
        assert_eq!(config.scoring.mandatory_skill_multiplier, 3.0);
        assert_eq!(
            config.scoring.default_bonus_cap,
            ScoringConfig::default().default_bonus_cap
        );
    }

    #[test]
    fn invalid_values_are_reported() {
        assert!(matches!(
            load_with(&[("APP_PORT", "http")]),
            Err(ConfigError::InvalidPort(_))
        ));
        assert!(matches!(
            load_with(&[("SCREENING_QUALIFIED_THRESHOLD", "high")]),
            Err(ConfigError::InvalidNumber {
                key: "SCREENING_QUALIFIED_THRESHOLD",
                ..
            })
        ));
        assert!(matches!(
            load_with(&[("SCREENING_QUALIFIED_THRESHOLD", "120")]),
            Err(ConfigError::Scoring(_))
        ));
    }
}
