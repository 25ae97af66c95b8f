use anyhow::{Context, Result, bail};
use serde::Deserialize;
use std::{env, fs, path::Path};

/// Per-call timeout applied to every outbound HTTP request.
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 10;

const REQUIRED_VARS: [&str; 5] = [
    "SUPABASE_URL",
    "SUPABASE_KEY",
    "GEMINI_API_KEY",
    "OPENWEATHER_API_KEY",
    "KAKAO_REST_API_KEY",
];

/// Runtime configuration: credentials for the four external services plus
/// HTTP tuning. Loaded from the environment by default, or from a TOML file
/// when one is given.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub supabase_url: String,
    pub supabase_key: String,
    pub gemini_api_key: String,
    pub openweather_api_key: String,
    pub kakao_rest_api_key: String,

    #[serde(default = "default_http_timeout_secs")]
    pub http_timeout_secs: u64,
}

fn default_http_timeout_secs() -> u64 {
    DEFAULT_HTTP_TIMEOUT_SECS
}

impl Config {
    /// Load from `path` when given, otherwise from environment variables.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::from_toml_path(path),
            None => Self::from_env(),
        }
    }

    /// Read the keys from environment variables, reporting every missing
    /// variable at once so startup fails with the full list.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    fn from_toml_path(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let cfg: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(cfg)
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let missing: Vec<&str> =
            REQUIRED_VARS.iter().copied().filter(|name| get(name).is_none()).collect();
        if !missing.is_empty() {
            bail!("Missing required environment variables: {}", missing.join(", "));
        }

        let http_timeout_secs = match get("HTTP_TIMEOUT_SECS") {
            Some(raw) => raw
                .trim()
                .parse()
                .with_context(|| format!("HTTP_TIMEOUT_SECS is not a number: {raw:?}"))?,
            None => DEFAULT_HTTP_TIMEOUT_SECS,
        };

        Ok(Self {
            supabase_url: get("SUPABASE_URL").unwrap_or_default(),
            supabase_key: get("SUPABASE_KEY").unwrap_or_default(),
            gemini_api_key: get("GEMINI_API_KEY").unwrap_or_default(),
            openweather_api_key: get("OPENWEATHER_API_KEY").unwrap_or_default(),
            kakao_rest_api_key: get("KAKAO_REST_API_KEY").unwrap_or_default(),
            http_timeout_secs,
        })
    }
}
