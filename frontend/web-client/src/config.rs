use feed_pagination::RefreshPolicy;
use session_transport::TransportConfig;

use crate::error::{ClientError, Result};

#[derive(Debug, Clone)]
pub struct Config {
    pub app: AppConfig,
    pub transport: TransportConfig,
    pub feed: FeedConfig,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub log_level: String,
    pub username: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Clone)]
pub struct FeedConfig {
    /// Fraction of the sentinel that must be on screen to load more
    pub visibility_threshold: f64,
    pub refresh_policy: RefreshPolicy,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            visibility_threshold: default_visibility_threshold(),
            refresh_policy: RefreshPolicy::default(),
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Ok(Config {
            app: AppConfig {
                log_level: std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
                username: std::env::var("INSTAMOC_USERNAME").ok(),
                password: std::env::var("INSTAMOC_PASSWORD").ok(),
            },
            transport: TransportConfig::from_env()?,
            feed: FeedConfig {
                visibility_threshold: match std::env::var("FEED_VISIBILITY_THRESHOLD") {
                    Ok(raw) => parse_visibility_threshold(&raw)?,
                    Err(_) => default_visibility_threshold(),
                },
                refresh_policy: match std::env::var("FEED_REFRESH_POLICY") {
                    Ok(raw) => raw.parse().map_err(ClientError::Config)?,
                    Err(_) => RefreshPolicy::default(),
                },
            },
        })
    }
}

fn default_visibility_threshold() -> f64 {
    0.0
}

/// A finite fraction in `[0.0, 1.0]`
fn parse_visibility_threshold(raw: &str) -> Result<f64> {
    let invalid = || ClientError::Config(format!("invalid FEED_VISIBILITY_THRESHOLD: {}", raw));
    let value: f64 = raw.trim().parse().map_err(|_| invalid())?;
    if !value.is_finite() || !(0.0..=1.0).contains(&value) {
        return Err(invalid());
    }
    Ok(value)
}
