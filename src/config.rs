use crate::error::AppError;
use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

pub const DEFAULT_CACHE_TTL_SECS: u64 = 300;
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_REQUESTS_PER_SECOND: u32 = 5;

#[derive(Debug, Clone)]
pub struct Config {
    pub api_base_url: Option<String>,
    pub cache_ttl: Duration,
    pub http_timeout: Duration,
    pub requests_per_second: u32,
    pub rank_days: u32,
    pub rank_bracket: String,
    pub data_dir: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            api_base_url: None,
            cache_ttl: Duration::from_secs(DEFAULT_CACHE_TTL_SECS),
            http_timeout: Duration::from_secs(DEFAULT_HTTP_TIMEOUT_SECS),
            requests_per_second: DEFAULT_REQUESTS_PER_SECOND,
            rank_days: 1,
            rank_bracket: "all".to_string(),
            data_dir: default_data_dir(),
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, AppError> {
        dotenvy::dotenv().ok();

        let defaults = Config::default();

        let api_base_url = env::var("MLBB_API_URL")
            .ok()
            .filter(|url| !url.trim().is_empty())
            .map(|url| normalize_base_url(&url));

        let cache_ttl = parse_var("MLBB_CACHE_TTL_SECS")?
            .map(Duration::from_secs)
            .unwrap_or(defaults.cache_ttl);
        let http_timeout = parse_var("MLBB_HTTP_TIMEOUT_SECS")?
            .map(Duration::from_secs)
            .unwrap_or(defaults.http_timeout);
        let requests_per_second =
            parse_var("MLBB_REQUESTS_PER_SECOND")?.unwrap_or(defaults.requests_per_second);
        let rank_days = parse_var("MLBB_RANK_DAYS")?.unwrap_or(defaults.rank_days);
        let rank_bracket = env::var("MLBB_RANK_BRACKET").unwrap_or(defaults.rank_bracket);
        let data_dir = env::var("MLBB_DATA_DIR")
            .map(PathBuf::from)
            .unwrap_or(defaults.data_dir);

        Ok(Config {
            api_base_url,
            cache_ttl,
            http_timeout,
            requests_per_second,
            rank_days,
            rank_bracket,
            data_dir,
        })
    }

    pub fn stats_cache_path(&self) -> PathBuf {
        self.data_dir.join("stats_cache.json")
    }
}

fn default_data_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".mlbb_draft")
}

fn normalize_base_url(url: &str) -> String {
    let url = url.trim();
    if url.ends_with('/') {
        url.to_string()
    } else {
        format!("{}/", url)
    }
}

fn parse_var<T: FromStr>(name: &str) -> Result<Option<T>, AppError> {
    match env::var(name) {
        Ok(raw) => raw.trim().parse::<T>().map(Some).map_err(|_| {
            AppError::ConfigError(format!("{} has an invalid value: {:?}", name, raw))
        }),
        Err(_) => Ok(None),
    }
}
