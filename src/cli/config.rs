// FILE: src/cli/config.rs

use crate::error::{ConvertError, Result};
use crate::types::OutputMode;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct ConfigFile {
    pub mode: Option<OutputMode>,
    pub style_prefix: Option<String>,
    pub custom_variables: Option<HashMap<String, String>>,
    pub debug: Option<bool>,
}

pub fn load(config_path: &str) -> Result<ConfigFile> {
    let config_content = fs::read_to_string(config_path).map_err(|e| {
        ConvertError::FileNotFound {
            path: format!("Config file {}: {}", config_path, e),
        }
    })?;

    let config = parse(config_path, &config_content)?;
    log::info!("Loaded configuration from {}", config_path);
    Ok(config)
}

fn parse(config_path: &str, content: &str) -> Result<ConfigFile> {
    if config_path.ends_with(".json") {
        serde_json::from_str(content)
            .map_err(|e| ConvertError::invalid_format(format!("Invalid JSON config: {}", e)))
    } else if config_path.ends_with(".toml") {
        toml::from_str(content)
            .map_err(|e| ConvertError::invalid_format(format!("Invalid TOML config: {}", e)))
    } else {
        Err(ConvertError::invalid_format(
            "Config file must be .json or .toml format",
        ))
    }
}
