use crate::error::{to_env_var, ConfigError};
use config::{Config, Environment};
use mockview::interview::InterviewPolicy;
use mockview::models::request::MAX_TEMPERATURE;
use mockview::providers::configs::{OpenAiProviderConfig, OPENAI_HOST, OPENAI_MODEL};
use serde::Deserialize;
use std::net::SocketAddr;
use std::time::Duration;

/// Accepted when `MOCKVIEW_PROVIDER__API_KEY` is not set
pub const FALLBACK_API_KEY_VAR: &str = "OPENAI_API_KEY";

#[derive(Debug, Deserialize)]
pub struct ServerSettings {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl ServerSettings {
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|e| ConfigError::InvalidValue {
                env_var: to_env_var("server.host"),
                reason: format!("{}", e),
            })
    }
}

#[derive(Debug, Deserialize)]
pub struct ProviderSettings {
    #[serde(default = "default_openai_host")]
    pub host: String,
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for ProviderSettings {
    fn default() -> Self {
        Self {
            host: default_openai_host(),
            api_key: None,
            model: default_model(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl ProviderSettings {
    pub fn into_config(self) -> OpenAiProviderConfig {
        OpenAiProviderConfig {
            host: self.host,
            api_key: self.api_key,
            model: self.model,
            timeout: Duration::from_secs(self.timeout_secs),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct InterviewSettings {
    #[serde(default = "default_max_turns")]
    pub max_turns: u32,
    #[serde(default = "default_follow_up_threshold")]
    pub follow_up_threshold: usize,
    #[serde(default = "default_max_follow_ups")]
    pub max_follow_ups: u32,
    #[serde(default = "default_history_limit")]
    pub history_limit: usize,
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
}

impl Default for InterviewSettings {
    fn default() -> Self {
        Self {
            max_turns: default_max_turns(),
            follow_up_threshold: default_follow_up_threshold(),
            max_follow_ups: default_max_follow_ups(),
            history_limit: default_history_limit(),
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
        }
    }
}

impl InterviewSettings {
    pub fn into_policy(self) -> InterviewPolicy {
        InterviewPolicy {
            max_turns: self.max_turns,
            follow_up_threshold: self.follow_up_threshold,
            max_follow_ups: self.max_follow_ups,
            history_limit: self.history_limit,
            temperature: self.temperature,
            max_tokens: self.max_tokens,
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |field: &str, reason: String| ConfigError::InvalidValue {
            env_var: to_env_var(field),
            reason,
        };

        if self.max_turns == 0 {
            return Err(invalid("interview.max_turns", "must be at least 1".into()));
        }
        if self.history_limit == 0 {
            return Err(invalid("interview.history_limit", "must be at least 1".into()));
        }
        if !(0.0..=MAX_TEMPERATURE).contains(&self.temperature) {
            return Err(invalid(
                "interview.temperature",
                format!("must be within [0, {}]", MAX_TEMPERATURE),
            ));
        }
        if self.max_tokens == 0 {
            return Err(invalid("interview.max_tokens", "must be at least 1".into()));
        }
        Ok(())
    }
}

#[derive(Debug, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub server: ServerSettings,
    #[serde(default)]
    pub provider: ProviderSettings,
    #[serde(default)]
    pub interview: InterviewSettings,
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        let mut settings = Self::load_and_validate()?;

        settings.provider.api_key = non_blank(settings.provider.api_key.take())
            .or_else(|| non_blank(std::env::var(FALLBACK_API_KEY_VAR).ok()));

        Ok(settings)
    }

    fn load_and_validate() -> Result<Self, ConfigError> {
        let config = Config::builder()
            .set_default("server.host", default_host())?
            .set_default("server.port", default_port())?
            .set_default("provider.host", default_openai_host())?
            .set_default("provider.model", default_model())?
            .add_source(
                Environment::with_prefix("MOCKVIEW")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let result: Result<Self, config::ConfigError> = config.try_deserialize();

        let settings = match result {
            Ok(settings) => settings,
            Err(err) => {
                tracing::debug!("Configuration error: {:?}", &err);

                let error_str = err.to_string();
                return if error_str.starts_with("missing field") {
                    let field = error_str
                        .trim_start_matches("missing field `")
                        .trim_end_matches('`');
                    Err(ConfigError::MissingEnvVar {
                        env_var: to_env_var(field),
                    })
                } else if let config::ConfigError::NotFound(field) = &err {
                    Err(ConfigError::MissingEnvVar {
                        env_var: to_env_var(field),
                    })
                } else {
                    Err(ConfigError::Other(err))
                };
            }
        };

        settings.interview.validate()?;
        Ok(settings)
    }
}

fn non_blank(key: Option<String>) -> Option<String> {
    key.map(|key| key.trim().to_string())
        .filter(|key| !key.is_empty())
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_openai_host() -> String {
    OPENAI_HOST.to_string()
}

fn default_model() -> String {
    OPENAI_MODEL.to_string()
}

fn default_timeout_secs() -> u64 {
    60
}

fn default_max_turns() -> u32 {
    InterviewPolicy::default().max_turns
}

fn default_follow_up_threshold() -> usize {
    InterviewPolicy::default().follow_up_threshold
}

fn default_max_follow_ups() -> u32 {
    InterviewPolicy::default().max_follow_ups
}

fn default_history_limit() -> usize {
    InterviewPolicy::default().history_limit
}

fn default_temperature() -> f32 {
    InterviewPolicy::default().temperature
}

fn default_max_tokens() -> u32 {
    InterviewPolicy::default().max_tokens
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::env;

    fn clean_env() {
        for (key, _) in env::vars() {
            if key.starts_with("MOCKVIEW_") {
                env::remove_var(&key);
            }
        }
        env::remove_var(FALLBACK_API_KEY_VAR);
    }

    #[test]
    #[serial]
    fn test_default_settings() {
        clean_env();

        let settings = Settings::new().unwrap();
        assert_eq!(settings.server.host, "127.0.0.1");
        assert_eq!(settings.server.port, 3000);
        assert_eq!(settings.provider.host, "https://api.openai.com");
        assert_eq!(settings.provider.model, "gpt-4o-mini");
        assert_eq!(settings.provider.api_key, None);
        assert_eq!(settings.interview.into_policy(), InterviewPolicy::default());
    }

    #[test]
    #[serial]
    fn test_environment_override() {
        clean_env();
        env::set_var("MOCKVIEW_SERVER__PORT", "8080");
        env::set_var("MOCKVIEW_PROVIDER__API_KEY", "test-key");
        env::set_var("MOCKVIEW_PROVIDER__HOST", "https://llm.internal");
        env::set_var("MOCKVIEW_PROVIDER__MODEL", "gpt-4o");
        env::set_var("MOCKVIEW_INTERVIEW__MAX_TURNS", "4");
        env::set_var("MOCKVIEW_INTERVIEW__TEMPERATURE", "0.2");

        let settings = Settings::new().unwrap();
        assert_eq!(settings.server.port, 8080);
        assert_eq!(settings.provider.api_key.as_deref(), Some("test-key"));
        assert_eq!(settings.provider.host, "https://llm.internal");
        assert_eq!(settings.provider.model, "gpt-4o");
        assert_eq!(settings.interview.max_turns, 4);
        assert_eq!(settings.interview.temperature, 0.2);

        clean_env();
    }

    #[test]
    #[serial]
    fn test_fallback_api_key() {
        clean_env();
        env::set_var(FALLBACK_API_KEY_VAR, "sk-fallback");

        let settings = Settings::new().unwrap();
        assert_eq!(settings.provider.api_key.as_deref(), Some("sk-fallback"));

        env::set_var("MOCKVIEW_PROVIDER__API_KEY", "sk-primary");
        let settings = Settings::new().unwrap();
        assert_eq!(settings.provider.api_key.as_deref(), Some("sk-primary"));

        clean_env();
    }

    #[test]
    #[serial]
    fn test_blank_api_key_is_missing() {
        clean_env();
        env::set_var("MOCKVIEW_PROVIDER__API_KEY", "   ");

        let settings = Settings::new().unwrap();
        assert_eq!(settings.provider.api_key, None);

        env::set_var(FALLBACK_API_KEY_VAR, "sk-fallback");
        let settings = Settings::new().unwrap();
        assert_eq!(settings.provider.api_key.as_deref(), Some("sk-fallback"));

        clean_env();
    }

    #[test]
    #[serial]
    fn test_invalid_temperature() {
        clean_env();
        env::set_var("MOCKVIEW_INTERVIEW__TEMPERATURE", "3.5");

        match Settings::new() {
            Err(ConfigError::InvalidValue { env_var, .. }) => {
                assert_eq!(env_var, "MOCKVIEW_INTERVIEW__TEMPERATURE")
            }
            other => panic!("Expected invalid value error, got {:?}", other),
        }

        clean_env();
    }

    #[test]
    #[serial]
    fn test_zero_max_turns() {
        clean_env();
        env::set_var("MOCKVIEW_INTERVIEW__MAX_TURNS", "0");

        assert!(matches!(
            Settings::new(),
            Err(ConfigError::InvalidValue { .. })
        ));

        clean_env();
    }

    #[test]
    fn test_socket_addr_conversion() {
        let server_settings = ServerSettings {
            host: "127.0.0.1".to_string(),
            port: 3000,
        };
        let addr = server_settings.socket_addr().unwrap();
        assert_eq!(addr.to_string(), "127.0.0.1:3000");

        let bad = ServerSettings {
            host: "not a host".to_string(),
            port: 3000,
        };
        assert!(bad.socket_addr().is_err());
    }

    #[test]
    fn test_provider_into_config() {
        let config = ProviderSettings {
            timeout_secs: 5,
            ..Default::default()
        }
        .into_config();
        assert_eq!(config.timeout, Duration::from_secs(5));
        assert_eq!(config.api_key, None);
    }
}
