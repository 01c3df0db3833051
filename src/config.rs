// Runtime configuration, read from the environment (and `.env` via dotenv).
//
// **Environment Variables:**
// - `OPENAI_API_KEY` - Chat endpoint key (required)
// - `OPENAI_MODEL` - Model name (default: gpt-4.1)
// - `OPENAI_BASE_URL` - OpenAI-compatible base URL
// - `OPENAI_TEMPERATURE` - Sampling temperature (default: 0.2)
// - `CHAT_REPLY_TIMEOUT_SECS` - Per-turn reply timeout (default: 60)
// - `DRIVE_LOAD_TIMEOUT_SECS` - Time allowed to load a link (default: 120)
// - `DRIVE_FETCH_CONCURRENCY` - Parallel file fetches per folder (default: 8)
// - `DRIVE_RETAIN_CHARS` - Characters kept per file at load time (default: all)
// - `GOOGLE_ACCESS_TOKEN` - Ready-made OAuth token with drive.readonly scope
// - `GOOGLE_SERVICE_ACCOUNT_KEY` / `GOOGLE_SERVICE_ACCOUNT_JSON` - Service account
// - `DRIVE_LINK` - Link to load at startup instead of prompting

use crate::core::ai::chat_session::{DEFAULT_LOAD_TIMEOUT, DEFAULT_REPLY_TIMEOUT};
use crate::core::ai::{AiConfig, SessionConfig};
use crate::core::drive::folder_aggregator::DEFAULT_FETCH_CONCURRENCY;
use crate::core::drive::AggregatorConfig;
use crate::infra::ai::openai_client::OPENAI_BASE_URL;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing {0} environment variable")]
    Missing(&'static str),

    #[error("Invalid value for {name}: {value}")]
    Invalid { name: &'static str, value: String },

    #[error(
        "No Google credentials: set GOOGLE_ACCESS_TOKEN, GOOGLE_SERVICE_ACCOUNT_KEY \
         or GOOGLE_SERVICE_ACCOUNT_JSON"
    )]
    MissingGoogleCredentials,
}

/// Where the Drive bearer token comes from.
#[derive(Debug, Clone, PartialEq)]
pub enum AuthConfig {
    AccessToken(String),
    ServiceAccountFile(String),
    ServiceAccountJson(String),
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub openai_api_key: String,
    pub openai_base_url: String,
    pub session: SessionConfig,
    pub aggregator: AggregatorConfig,
    pub auth: AuthConfig,
    pub initial_link: Option<String>,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Builds the config from any name -> value lookup. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let openai_api_key = get("OPENAI_API_KEY").ok_or(ConfigError::Missing("OPENAI_API_KEY"))?;

        let defaults = AiConfig::default();
        let ai = AiConfig {
            model: get("OPENAI_MODEL").unwrap_or(defaults.model),
            temperature: parse_or(
                get("OPENAI_TEMPERATURE"),
                "OPENAI_TEMPERATURE",
                defaults.temperature,
            )?,
        };

        let reply_timeout = match get("CHAT_REPLY_TIMEOUT_SECS") {
            Some(v) => Duration::from_secs(parse(&v, "CHAT_REPLY_TIMEOUT_SECS")?),
            None => DEFAULT_REPLY_TIMEOUT,
        };

        let load_timeout = match get("DRIVE_LOAD_TIMEOUT_SECS") {
            Some(v) => Duration::from_secs(parse(&v, "DRIVE_LOAD_TIMEOUT_SECS")?),
            None => DEFAULT_LOAD_TIMEOUT,
        };

        let max_concurrent_fetches: usize = parse_or(
            get("DRIVE_FETCH_CONCURRENCY"),
            "DRIVE_FETCH_CONCURRENCY",
            DEFAULT_FETCH_CONCURRENCY,
        )?;
        if max_concurrent_fetches == 0 {
            return Err(ConfigError::Invalid {
                name: "DRIVE_FETCH_CONCURRENCY",
                value: "0".to_string(),
            });
        }

        let retain_chars = get("DRIVE_RETAIN_CHARS")
            .map(|v| parse::<usize>(&v, "DRIVE_RETAIN_CHARS"))
            .transpose()?;

        let auth = if let Some(token) = get("GOOGLE_ACCESS_TOKEN") {
            AuthConfig::AccessToken(token)
        } else if let Some(path) = get("GOOGLE_SERVICE_ACCOUNT_KEY") {
            AuthConfig::ServiceAccountFile(path)
        } else if let Some(json) = get("GOOGLE_SERVICE_ACCOUNT_JSON") {
            AuthConfig::ServiceAccountJson(json)
        } else {
            return Err(ConfigError::MissingGoogleCredentials);
        };

        Ok(Self {
            openai_api_key,
            openai_base_url: get("OPENAI_BASE_URL").unwrap_or_else(|| OPENAI_BASE_URL.to_string()),
            session: SessionConfig {
                ai,
                reply_timeout,
                load_timeout,
            },
            aggregator: AggregatorConfig {
                max_concurrent_fetches,
                retain_chars,
            },
            auth,
            initial_link: get("DRIVE_LINK"),
        })
    }
}

fn parse<T: std::str::FromStr>(value: &str, name: &'static str) -> Result<T, ConfigError> {
    value.trim().parse::<T>().map_err(|_| ConfigError::Invalid {
        name,
        value: value.to_string(),
    })
}

fn parse_or<T: std::str::FromStr>(
    value: Option<String>,
    name: &'static str,
    default: T,
) -> Result<T, ConfigError> {
    match value {
        Some(v) => parse(&v, name),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(vars: &[(&str, &str)]) -> Result<AppConfig, ConfigError> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|name| map.get(name).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config_from(&[("OPENAI_API_KEY", "sk-test"), ("GOOGLE_ACCESS_TOKEN", "ya29")])
            .unwrap();

        assert_eq!(config.session.ai.model, "gpt-4.1");
        assert_eq!(config.session.ai.temperature, 0.2);
        assert_eq!(config.session.reply_timeout, Duration::from_secs(60));
        assert_eq!(config.session.load_timeout, Duration::from_secs(120));
        assert_eq!(config.aggregator.max_concurrent_fetches, 8);
        assert_eq!(config.aggregator.retain_chars, None);
        assert_eq!(config.openai_base_url, OPENAI_BASE_URL);
        assert_eq!(config.auth, AuthConfig::AccessToken("ya29".to_string()));
        assert!(config.initial_link.is_none());
    }

    #[test]
    fn test_missing_api_key() {
        let result = config_from(&[("GOOGLE_ACCESS_TOKEN", "ya29")]);
        assert!(matches!(result, Err(ConfigError::Missing("OPENAI_API_KEY"))));
    }

    #[test]
    fn test_missing_google_credentials() {
        let result = config_from(&[("OPENAI_API_KEY", "sk-test")]);
        assert!(matches!(result, Err(ConfigError::MissingGoogleCredentials)));
    }

    #[test]
    fn test_access_token_wins_over_service_account() {
        let config = config_from(&[
            ("OPENAI_API_KEY", "sk-test"),
            ("GOOGLE_SERVICE_ACCOUNT_KEY", "/keys/sa.json"),
            ("GOOGLE_ACCESS_TOKEN", "ya29"),
        ])
        .unwrap();
        assert_eq!(config.auth, AuthConfig::AccessToken("ya29".to_string()));

        let config = config_from(&[
            ("OPENAI_API_KEY", "sk-test"),
            ("GOOGLE_SERVICE_ACCOUNT_KEY", "/keys/sa.json"),
            ("GOOGLE_ACCESS_TOKEN", "  "),
        ])
        .unwrap();
        assert_eq!(
            config.auth,
            AuthConfig::ServiceAccountFile("/keys/sa.json".to_string())
        );
    }

    #[test]
    fn test_overrides() {
        let config = config_from(&[
            ("OPENAI_API_KEY", "sk-test"),
            ("GOOGLE_SERVICE_ACCOUNT_JSON", "{}"),
            ("OPENAI_MODEL", "gpt-4o-mini"),
            ("OPENAI_TEMPERATURE", "0.7"),
            ("CHAT_REPLY_TIMEOUT_SECS", "5"),
            ("DRIVE_LOAD_TIMEOUT_SECS", "30"),
            ("DRIVE_FETCH_CONCURRENCY", "2"),
            ("DRIVE_RETAIN_CHARS", "1000"),
            ("DRIVE_LINK", "https://drive.google.com/drive/folders/x"),
        ])
        .unwrap();

        assert_eq!(config.session.ai.model, "gpt-4o-mini");
        assert_eq!(config.session.ai.temperature, 0.7);
        assert_eq!(config.session.reply_timeout, Duration::from_secs(5));
        assert_eq!(config.session.load_timeout, Duration::from_secs(30));
        assert_eq!(config.aggregator.max_concurrent_fetches, 2);
        assert_eq!(config.aggregator.retain_chars, Some(1000));
        assert_eq!(config.auth, AuthConfig::ServiceAccountJson("{}".to_string()));
        assert!(config.initial_link.is_some());
    }

    #[test]
    fn test_invalid_numbers_are_rejected() {
        let result = config_from(&[
            ("OPENAI_API_KEY", "sk-test"),
            ("GOOGLE_ACCESS_TOKEN", "ya29"),
            ("CHAT_REPLY_TIMEOUT_SECS", "soon"),
        ]);
        assert!(matches!(
            result,
            Err(ConfigError::Invalid { name: "CHAT_REPLY_TIMEOUT_SECS", .. })
        ));

        let result = config_from(&[
            ("OPENAI_API_KEY", "sk-test"),
            ("GOOGLE_ACCESS_TOKEN", "ya29"),
            ("DRIVE_FETCH_CONCURRENCY", "0"),
        ]);
        assert!(matches!(result, Err(ConfigError::Invalid { .. })));
    }
}
