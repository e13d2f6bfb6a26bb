use std::env;
use std::path::PathBuf;

use anyhow::{anyhow, Context};
use scoresheet_core::NotationTable;

use crate::clients::gemini::ModelConfig;

#[derive(Clone, Debug)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub artifact_dir: PathBuf,
    pub notation_table: NotationTable,
    pub image_root: Option<PathBuf>,
    pub http_timeout_secs: u64,
    pub model: ModelConfig,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from any key lookup; `from_env` passes the process environment.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let table_name = lookup("NOTATION_TABLE").unwrap_or_else(|| "legacy".to_string());
        let notation_table = NotationTable::from_name(&table_name)
            .ok_or_else(|| anyhow!("NOTATION_TABLE must be `legacy` or `general`, got `{table_name}`"))?;

        let api_key = lookup("GEMINI_API_KEY")
            .filter(|v| !v.trim().is_empty())
            .context("GEMINI_API_KEY must be set")?;

        Ok(Self {
            host: lookup("HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            port: lookup("PORT")
                .and_then(|v| v.parse().ok())
                .unwrap_or(8080),
            artifact_dir: lookup("ARTIFACT_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(".")),
            notation_table,
            image_root: lookup("IMAGE_ROOT")
                .filter(|v| !v.trim().is_empty())
                .map(PathBuf::from),
            http_timeout_secs: lookup("HTTP_TIMEOUT_SECS")
                .and_then(|v| v.parse().ok())
                .unwrap_or(120),
            model: ModelConfig {
                api_key,
                model: lookup("GEMINI_MODEL").unwrap_or_else(|| "gemini-2.0-flash".to_string()),
                endpoint: lookup("GEMINI_ENDPOINT")
                    .unwrap_or_else(|| "https://generativelanguage.googleapis.com/v1beta".to_string()),
            },
        })
    }
}
