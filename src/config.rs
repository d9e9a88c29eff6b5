use std::env;
use std::str::FromStr;

use anyhow::Context;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Json,
    Pretty,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub frontend_url: String,
    pub cors_extra_origins: Vec<String>,

    pub rate_limit_max_requests: u32,
    pub rate_limit_window_secs: u64,

    pub max_message_chars: u64,
    pub max_log_chars: u64,

    pub log_format: LogFormat,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".into(),
            port: 8080,
            frontend_url: "http://localhost:3000".into(),
            cors_extra_origins: vec![],
            rate_limit_max_requests: 30,
            rate_limit_window_secs: 60,
            max_message_chars: 4000,
            max_log_chars: 20000,
            log_format: LogFormat::Json,
        }
    }
}

fn parse_var<T>(name: &str, default: T) -> anyhow::Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(name) {
        Ok(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse()
            .with_context(|| format!("{name} must be a number, got {raw:?}")),
        _ => Ok(default),
    }
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        let defaults = Self::default();

        Ok(Self {
            host: env::var("HOST").unwrap_or(defaults.host),
            port: parse_var("PORT", defaults.port)?,
            frontend_url: env::var("FRONTEND_URL").unwrap_or(defaults.frontend_url),
            // In dev, also allow LAN access (e.g. testing from another device)
            cors_extra_origins: env::var("CORS_EXTRA_ORIGINS")
                .map(|extra| {
                    extra
                        .split(',')
                        .map(str::trim)
                        .filter(|o| !o.is_empty())
                        .map(String::from)
                        .collect()
                })
                .unwrap_or_default(),

            rate_limit_max_requests: parse_var(
                "RATE_LIMIT_MAX_REQUESTS",
                defaults.rate_limit_max_requests,
            )?,
            rate_limit_window_secs: parse_var(
                "RATE_LIMIT_WINDOW_SECS",
                defaults.rate_limit_window_secs,
            )?,

            max_message_chars: parse_var("MAX_MESSAGE_CHARS", defaults.max_message_chars)?,
            max_log_chars: parse_var("MAX_LOG_CHARS", defaults.max_log_chars)?,

            log_format: match env::var("LOG_FORMAT").as_deref() {
                Ok("pretty") => LogFormat::Pretty,
                _ => LogFormat::Json,
            },
        })
    }

    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_var_default_and_value() {
        env::remove_var("FITCOACH_TEST_UNSET");
        assert_eq!(parse_var("FITCOACH_TEST_UNSET", 7u32).unwrap(), 7);

        env::set_var("FITCOACH_TEST_PORT", " 9090 ");
        assert_eq!(parse_var("FITCOACH_TEST_PORT", 8080u16).unwrap(), 9090);
    }

    #[test]
    fn test_parse_var_rejects_garbage() {
        env::set_var("FITCOACH_TEST_BAD", "eighty");
        let err = parse_var("FITCOACH_TEST_BAD", 8080u16).unwrap_err();
        assert!(err.to_string().contains("FITCOACH_TEST_BAD"));
    }

    #[test]
    fn test_listen_addr() {
        let config = Config::default();
        assert_eq!(config.listen_addr(), "0.0.0.0:8080");
    }
}
