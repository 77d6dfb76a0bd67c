use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::Path;

use crate::services::maps::DEFAULT_SCRIPT_URL;

/// Application configuration
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub server: ServerSettings,
    pub stores: StoresSettings,
    pub maps: MapsSettings,
    pub search: SearchSettings,
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
    pub workers: Option<usize>,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            workers: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StoresSettings {
    /// Root of the stores API, e.g. `http://localhost:8081/api`
    pub base_url: String,
    pub timeout_secs: u64,
    /// How many stores to request per search
    pub fetch_limit: u32,
}

impl Default for StoresSettings {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8081/api".to_string(),
            timeout_secs: 30,
            fetch_limit: 25,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MapsSettings {
    pub api_key: Option<String>,
    pub script_url: String,
    pub timeout_secs: u64,
}

impl Default for MapsSettings {
    fn default() -> Self {
        Self {
            api_key: None,
            script_url: DEFAULT_SCRIPT_URL.to_string(),
            timeout_secs: 10,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SearchSettings {
    pub default_limit: usize,
    pub max_limit: usize,
    /// Radius applied when the client sends a position but no radius
    pub default_radius_miles: f64,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            default_limit: 25,
            max_limit: 100,
            default_radius_miles: 10.0,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

fn default_log_level() -> String { "info".to_string() }
fn default_log_format() -> String { "json".to_string() }

impl Settings {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded in the following order (later overrides earlier):
    /// 1. Default values in the struct
    /// 2. Configuration file (config/default.toml)
    /// 3. Local overrides (config/local.toml)
    /// 4. Environment variables (prefixed with WRENCHIT_)
    pub fn load() -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))
            // e.g., WRENCHIT__STORES__BASE_URL -> stores.base_url
            .add_source(
                Environment::with_prefix("WRENCHIT")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let settings = substitute_env_vars(settings)?;

        settings.try_deserialize()
    }

    /// Load configuration from a custom path
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::from(path.as_ref()))
            .add_source(
                Environment::with_prefix("WRENCHIT")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        settings.try_deserialize()
    }
}

/// Apply the conventional deployment variables on top of the layered config
fn substitute_env_vars(settings: Config) -> Result<Config, ConfigError> {
    use std::env;

    let mut builder = Config::builder().add_source(settings);

    if let Ok(url) = env::var("STORES_API_URL") {
        builder = builder.set_override("stores.base_url", url)?;
    }
    if let Ok(port) = env::var("PORT") {
        if let Ok(port) = port.parse::<u16>() {
            builder = builder.set_override("server.port", i64::from(port))?;
        }
    }

    builder.build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_search_settings() {
        let search = SearchSettings::default();
        assert_eq!(search.default_limit, 25);
        assert_eq!(search.max_limit, 100);
        assert_eq!(search.default_radius_miles, 10.0);
    }

    #[test]
    fn test_default_logging() {
        let level = default_log_level();
        let format = default_log_format();
        assert_eq!(level, "info");
        assert_eq!(format, "json");
    }

    #[test]
    fn test_load_from_partial_file() {
        let path = std::env::temp_dir().join(format!("wrenchit-{}.toml", uuid::Uuid::new_v4()));
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, "[stores]\nbase_url = \"http://stores.test/api\"\n\n[search]\nmax_limit = 40").unwrap();

        let settings = Settings::load_from(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(settings.stores.base_url, "http://stores.test/api");
        assert_eq!(settings.stores.fetch_limit, 25);
        assert_eq!(settings.search.max_limit, 40);
        assert_eq!(settings.server.port, 8080);
        assert_eq!(settings.maps.script_url, DEFAULT_SCRIPT_URL);
    }
}
