use config::{Config as ConfigBuilder, ConfigError, Environment, File};
use lunchguide_menu::TargetPreset;
use lunchguide_neis::NeisSettings;
use serde::Deserialize;
use std::{env, time::Duration};

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub neis: NeisConfig,
    #[serde(default)]
    pub cache: CacheConfig,
    #[serde(default)]
    pub dashboard: DashboardConfig,
    #[serde(default)]
    pub observability: ObservabilityConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Deserialize, Clone)]
pub struct NeisConfig {
    pub base_url: String,
    /// Open API key. NEIS answers a handful of sample rows without one.
    #[serde(default)]
    pub key: String,
    #[serde(default)]
    pub atpt_code: String,
    #[serde(default)]
    pub school_code: String,
    pub timeout_secs: u64,
    pub page_size: u32,
}

impl NeisConfig {
    pub fn is_configured(&self) -> bool {
        !self.atpt_code.is_empty() && !self.school_code.is_empty()
    }

    pub fn settings(&self) -> NeisSettings {
        NeisSettings {
            base_url: self.base_url.to_owned(),
            key: self.key.to_owned(),
            atpt_code: self.atpt_code.to_owned(),
            school_code: self.school_code.to_owned(),
            page_size: self.page_size,
            timeout: Duration::from_secs(self.timeout_secs),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct CacheConfig {
    #[serde(default = "default_cache_ttl_secs")]
    pub ttl_secs: u64,
    #[serde(default = "default_cache_max_entries")]
    pub max_entries: usize,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl_secs: default_cache_ttl_secs(),
            max_entries: default_cache_max_entries(),
        }
    }
}

fn default_cache_ttl_secs() -> u64 {
    3600
}

fn default_cache_max_entries() -> usize {
    64
}

#[derive(Debug, Deserialize, Clone)]
pub struct DashboardConfig {
    /// Offset used to decide what "today" is.
    #[serde(default = "default_utc_offset_hours")]
    pub utc_offset_hours: i8,
    #[serde(default = "default_meal")]
    pub default_meal: String,
    #[serde(default = "default_preset")]
    pub default_preset: String,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            utc_offset_hours: default_utc_offset_hours(),
            default_meal: default_meal(),
            default_preset: default_preset(),
        }
    }
}

impl DashboardConfig {
    pub fn preset(&self) -> TargetPreset {
        self.default_preset.parse().unwrap_or_default()
    }
}

fn default_utc_offset_hours() -> i8 {
    9
}

fn default_meal() -> String {
    lunchguide_neis::LUNCH.to_string()
}

fn default_preset() -> String {
    TargetPreset::default().to_string()
}

#[derive(Debug, Deserialize, Clone)]
pub struct ObservabilityConfig {
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// Structured JSON lines instead of pretty console output.
    #[serde(default)]
    pub json: bool,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            json: false,
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Config {
    /// Load configuration from file and environment variables
    ///
    /// Priority (highest to lowest):
    /// 1. Legacy NEIS_KEY / NEIS_ATPT / NEIS_SCHUL variables
    /// 2. Environment variables (LUNCHGUIDE__NEIS__KEY, etc.)
    /// 3. Config file specified by path
    /// 4. Hardcoded defaults
    pub fn load(config_path: Option<String>) -> Result<Self, ConfigError> {
        let mut builder = ConfigBuilder::builder();

        builder = builder
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 3000)?
            .set_default("neis.base_url", "https://open.neis.go.kr")?
            .set_default("neis.timeout_secs", 10)?
            .set_default("neis.page_size", 100)?;

        let config_file_path = config_path
            .or_else(|| env::var("CONFIG_PATH").ok())
            .unwrap_or_else(|| "config/default.toml".to_string());

        if std::path::Path::new(&config_file_path).exists() {
            builder = builder.add_source(File::with_name(&config_file_path));
        }

        builder = builder.add_source(
            Environment::with_prefix("LUNCHGUIDE")
                .separator("__")
                .try_parsing(true),
        );

        if let Ok(key) = env::var("NEIS_KEY") {
            builder = builder.set_override("neis.key", key)?;
        }
        if let Ok(atpt) = env::var("NEIS_ATPT") {
            builder = builder.set_override("neis.atpt_code", atpt)?;
        }
        if let Ok(school) = env::var("NEIS_SCHUL") {
            builder = builder.set_override("neis.school_code", school)?;
        }

        builder.build()?.try_deserialize()
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.server.port == 0 {
            return Err("Server port must be greater than 0".to_string());
        }
        if self.neis.base_url.trim().is_empty() {
            return Err("NEIS base_url must not be empty".to_string());
        }
        if self.neis.page_size == 0 {
            return Err("NEIS page_size must be at least 1".to_string());
        }
        if self.cache.ttl_secs == 0 {
            return Err("Cache ttl_secs must be greater than 0".to_string());
        }
        if self.cache.max_entries == 0 {
            return Err("Cache max_entries must be at least 1".to_string());
        }
        if !(-14..=14).contains(&self.dashboard.utc_offset_hours) {
            return Err("Dashboard utc_offset_hours must be between -14 and 14".to_string());
        }
        if self.dashboard.default_preset.parse::<TargetPreset>().is_err() {
            return Err(format!(
                "Unknown dashboard default_preset: {}",
                self.dashboard.default_preset
            ));
        }
        Ok(())
    }
}
