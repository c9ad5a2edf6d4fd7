use crate::core::report::ReportFormat;
use crate::domain::ports::ConfigProvider;
use crate::utils::error::{ProfitError, Result};
use crate::utils::validation::{validate_non_empty_string, validate_path, Validate};
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const DEFAULT_MARKETPLACES_DIR: &str = "./data/marketplaces";
pub const DEFAULT_SHIPPING_DIR: &str = "./data/shipping";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub data: DataConfig,
    pub defaults: Option<SelectionDefaults>,
    pub output: Option<OutputConfig>,
    pub logging: Option<LoggingConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataConfig {
    #[serde(default = "default_marketplaces_dir")]
    pub marketplaces_dir: String,
    #[serde(default = "default_shipping_dir")]
    pub shipping_dir: String,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            marketplaces_dir: default_marketplaces_dir(),
            shipping_dir: default_shipping_dir(),
        }
    }
}

fn default_marketplaces_dir() -> String {
    DEFAULT_MARKETPLACES_DIR.to_string()
}

fn default_shipping_dir() -> String {
    DEFAULT_SHIPPING_DIR.to_string()
}

/// Selections used when the command line leaves them out.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SelectionDefaults {
    pub marketplace: Option<String>,
    pub tier: Option<String>,
    pub carrier: Option<String>,
    pub service: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OutputConfig {
    pub format: Option<ReportFormat>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Compact,
    Json,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub format: Option<LogFormat>,
    /// Directory for daily `app_YYYYMMDD.log` files; stderr only when unset.
    pub directory: Option<String>,
}

impl AppConfig {
    /// Reads and parses a TOML config file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(ProfitError::IoError)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content)
            .map_err(|e| ProfitError::config(format!("TOML parsing error: {}", e)))
    }

    /// Replaces `${VAR}` with the environment value; unknown variables are left as-is.
    fn substitute_env_vars(content: &str) -> Result<String> {
        use regex::Regex;
        let re = Regex::new(r"\$\{([^}]+)\}")
            .map_err(|e| ProfitError::config(format!("env substitution pattern: {}", e)))?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn validate_config(&self) -> Result<()> {
        validate_path("data.marketplaces_dir", &self.data.marketplaces_dir)?;
        validate_path("data.shipping_dir", &self.data.shipping_dir)?;
        if let Some(dir) = self.log_directory() {
            validate_path("logging.directory", dir)?;
        }

        if let Some(defaults) = &self.defaults {
            let named = [
                ("defaults.marketplace", &defaults.marketplace),
                ("defaults.tier", &defaults.tier),
                ("defaults.carrier", &defaults.carrier),
                ("defaults.service", &defaults.service),
            ];
            for (field, value) in named {
                if let Some(value) = value {
                    validate_non_empty_string(field, value)?;
                }
            }
        }

        Ok(())
    }

    pub fn default_selection(&self) -> SelectionDefaults {
        self.defaults.clone().unwrap_or_default()
    }

    pub fn report_format(&self) -> Option<ReportFormat> {
        self.output.as_ref().and_then(|o| o.format)
    }

    pub fn log_format(&self) -> LogFormat {
        self.logging
            .as_ref()
            .and_then(|l| l.format)
            .unwrap_or_default()
    }

    pub fn log_directory(&self) -> Option<&str> {
        self.logging.as_ref().and_then(|l| l.directory.as_deref())
    }
}

impl ConfigProvider for AppConfig {
    fn marketplaces_dir(&self) -> &str {
        &self.data.marketplaces_dir
    }

    fn shipping_dir(&self) -> &str {
        &self.data.shipping_dir
    }
}

impl Validate for AppConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
