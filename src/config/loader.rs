use std::path::Path;
use tokio::fs;
use tracing::debug;

use super::LoadgridConfig;
use crate::error::{ErrorCode, LoadgridError, Result};

/// File formats a configuration can be written in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    Toml,
    Yaml,
    Json,
}

impl ConfigFormat {
    /// Pick the format from the file extension
    pub fn from_path(path: &Path) -> Result<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);
        match ext.as_deref() {
            Some("toml") => Ok(Self::Toml),
            Some("yaml") | Some("yml") => Ok(Self::Yaml),
            Some("json") => Ok(Self::Json),
            _ => Err(LoadgridError::config_with_code(
                ErrorCode::CONFIG_PARSE_ERROR,
                format!(
                    "unsupported configuration file '{}'; expected .toml, .yaml or .json",
                    path.display()
                ),
            )),
        }
    }
}

/// Parse configuration text without applying overrides or validation
pub fn parse_config(content: &str, format: ConfigFormat) -> Result<LoadgridConfig> {
    let parsed = match format {
        ConfigFormat::Toml => toml::from_str(content).map_err(|e| e.to_string()),
        ConfigFormat::Yaml => serde_yaml::from_str(content).map_err(|e| e.to_string()),
        ConfigFormat::Json => serde_json::from_str(content).map_err(|e| e.to_string()),
    };
    parsed.map_err(|e| {
        LoadgridError::config_with_code(
            ErrorCode::CONFIG_PARSE_ERROR,
            format!("invalid {format:?} configuration: {e}"),
        )
    })
}

/// Read, override from the environment and validate a configuration file
pub async fn load_config(path: &Path) -> Result<LoadgridConfig> {
    let format = ConfigFormat::from_path(path)?;
    let content = fs::read_to_string(path).await.map_err(|e| {
        let code = if e.kind() == std::io::ErrorKind::NotFound {
            ErrorCode::CONFIG_NOT_FOUND
        } else {
            ErrorCode::CONFIG_GENERIC
        };
        LoadgridError::config_with_code(code, format!("cannot read {}: {e}", path.display()))
    })?;

    let mut config = parse_config(&content, format)?;
    config.merge_env_vars();
    config.validate()?;
    debug!("Loaded configuration from {}", path.display());
    Ok(config)
}

/// Load `path` when given, otherwise start from defaults plus environment
pub async fn load_or_default(path: Option<&Path>) -> Result<LoadgridConfig> {
    match path {
        Some(path) => load_config(path).await,
        None => {
            let mut config = LoadgridConfig::new();
            config.merge_env_vars();
            config.validate()?;
            Ok(config)
        }
    }
}
