use anyhow::Result;
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Main configuration structure for the correction desk
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct CorrectionDeskConfig {
    /// Progress label wording
    pub progress: ProgressConfig,
    /// Payload cache behaviour
    pub cache: CacheConfig,
    /// Logging settings
    pub observability: ObservabilityConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct ProgressConfig {
    /// Word before the position, e.g. "case 2/5"
    pub case_label: String,
    /// Word before the resolved counter, e.g. "(resolved 1)"
    pub resolved_label: String,
}

impl Default for ProgressConfig {
    fn default() -> Self {
        Self {
            case_label: "case".to_string(),
            resolved_label: "resolved".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Drop cached payloads when a session starts on a different record collection
    pub reset_on_new_collection: bool,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            reset_on_new_collection: true,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Default log level when RUST_LOG is not set
    pub log_level: String,
    /// Emit JSON lines instead of human readable output
    pub json_logs: bool,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            json_logs: true,
        }
    }
}

impl CorrectionDeskConfig {
    /// Load configuration from multiple sources with precedence:
    /// 1. Default values
    /// 2. Configuration file (correction-desk.toml)
    /// 3. Environment variables (prefixed with CORRECTION_DESK_)
    pub fn load() -> Result<Self> {
        Self::load_from(Path::new("correction-desk.toml"))
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let mut builder = Config::builder();

        if path.exists() {
            builder = builder.add_source(File::from(path));
        }

        builder = builder.add_source(
            Environment::with_prefix("CORRECTION_DESK")
                .separator("__")
                .try_parsing(true),
        );

        let config = builder.build()?;
        Ok(config.try_deserialize()?)
    }

    /// Save configuration to file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let toml_content = toml::to_string_pretty(self)?;
        std::fs::write(path, toml_content)?;
        Ok(())
    }

    /// Load .env file if it exists
    pub fn load_env_file() -> Result<()> {
        if Path::new(".env").exists() {
            dotenvy::dotenv()?;
            tracing::info!("Loaded environment variables from .env file");
        }
        Ok(())
    }
}

/// Global configuration instance
static CONFIG: std::sync::LazyLock<Result<CorrectionDeskConfig, anyhow::Error>> =
    std::sync::LazyLock::new(|| {
        let _ = CorrectionDeskConfig::load_env_file();
        CorrectionDeskConfig::load()
    });

/// Get the global configuration
pub fn config() -> Result<&'static CorrectionDeskConfig> {
    CONFIG
        .as_ref()
        .map_err(|e| anyhow::anyhow!("Failed to load configuration: {}", e))
}
