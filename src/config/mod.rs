/// Application configuration module
use anyhow::bail;
use std::env;

pub const DEFAULT_APOD_API_URL: &str = "https://api.nasa.gov/planetary/apod";
pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub nasa_api_key: String,
    pub apod_api_url: String,
    pub bind_addr: String,
    /// Per-chain request cap, `None` means retry until a record is accepted
    pub max_attempts: Option<u32>,
    pub http_timeout_seconds: u64,
}

impl AppConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let nasa_api_key = lookup("NASA_API_KEY").unwrap_or_default();
        if nasa_api_key.trim().is_empty() {
            bail!("NASA_API_KEY is required");
        }

        let apod_api_url =
            lookup("APOD_API_URL").unwrap_or_else(|| DEFAULT_APOD_API_URL.to_string());

        let bind_addr = lookup("BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());

        let max_attempts = match parse_or(&lookup, "APOD_MAX_ATTEMPTS", 25u32) {
            0 => None,
            n => Some(n),
        };

        let http_timeout_seconds = parse_or(&lookup, "HTTP_TIMEOUT_SECONDS", 30);

        Ok(Self {
            nasa_api_key,
            apod_api_url,
            bind_addr,
            max_attempts,
            http_timeout_seconds,
        })
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> T
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    lookup(key)
        .and_then(|s| s.trim().parse().ok())
        .unwrap_or(default)
}
