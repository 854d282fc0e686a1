// tinsel-core/src/config.rs

//! Handles configuration structures and parsing for the library.

use anyhow::{anyhow, Context, Result};
use serde::Deserialize;
use std::path::PathBuf;
use url::Url;

/// Used when `[chat].endpoint` is not set.
pub const DEFAULT_CHAT_ENDPOINT: &str = "https://api.openai.com/v1/chat/completions";

#[derive(Deserialize, Debug, Clone)]
pub struct TinselConfig {
    pub chat: ChatConfig,
    #[serde(default)]
    pub inventory: InventoryConfig,
}

#[derive(Deserialize, Debug, Clone)]
pub struct ChatConfig {
    pub model_name: String,
    /// Name of the environment variable holding the API key. The key itself
    /// never appears in the config file.
    pub api_key_env_var: String,
    #[serde(default)]
    pub endpoint: Option<String>,
    #[serde(default)]
    pub parameters: Option<toml::Value>,
}

impl ChatConfig {
    pub fn endpoint(&self) -> &str {
        self.endpoint.as_deref().unwrap_or(DEFAULT_CHAT_ENDPOINT)
    }
}

/// Which persistence backend the inventory uses.
#[derive(Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    Sqlite,
    Json,
}

#[derive(Deserialize, Debug, Clone)]
pub struct InventoryConfig {
    #[serde(default = "default_backend")]
    pub backend: BackendKind,
    /// Overrides the platform data directory when set.
    #[serde(default)]
    pub data_dir: Option<PathBuf>,
}

fn default_backend() -> BackendKind {
    BackendKind::Sqlite
}

impl Default for InventoryConfig {
    fn default() -> Self {
        InventoryConfig {
            backend: default_backend(),
            data_dir: None,
        }
    }
}

impl TinselConfig {
    pub fn from_toml_str(config_toml_content: &str) -> Result<TinselConfig> {
        let config: TinselConfig = match toml::from_str(config_toml_content) {
            Ok(cfg) => cfg,
            Err(e) => {
                tracing::error!(error=%e, "Failed to parse TOML content");
                return Err(anyhow!(e))
                    .context("Failed to parse configuration TOML content. Check TOML syntax.");
            }
        };

        // --- Basic Checks ---
        if config.chat.model_name.trim().is_empty() {
            return Err(anyhow!("'chat.model_name' in config content is empty."));
        }
        if config.chat.api_key_env_var.trim().is_empty() {
            return Err(anyhow!("'chat.api_key_env_var' in config content is empty."));
        }
        if let Some(endpoint) = &config.chat.endpoint {
            if endpoint.trim().is_empty() {
                return Err(anyhow!("'chat.endpoint' in config content is empty."));
            }
            Url::parse(endpoint).with_context(|| {
                format!("Invalid URL format for 'chat.endpoint' ('{}').", endpoint)
            })?;
        }
        if let Some(params) = &config.chat.parameters {
            if !params.is_table() {
                return Err(anyhow!(
                    "'chat.parameters' has an invalid value. Expected a TOML table."
                ));
            }
        }

        tracing::info!("Successfully parsed and validated configuration.");
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_config_content() -> String {
        r#"
            [chat]
            model_name = "gpt-4o-mini"
            api_key_env_var = "OPENAI_API_KEY"
            endpoint = "https://example.com/v1/chat/completions"
            parameters = { temperature = 0.7 }

            [inventory]
            backend = "json"
        "#
        .to_string()
    }

    #[test]
    fn test_config_parse_success() {
        let content = valid_config_content();
        let result = TinselConfig::from_toml_str(&content);
        assert!(result.is_ok(), "Parse failed: {:?}\nContent:\n{}", result.err(), content);
        let config = result.unwrap();
        assert_eq!(config.chat.model_name, "gpt-4o-mini");
        assert_eq!(config.chat.api_key_env_var, "OPENAI_API_KEY");
        assert_eq!(config.chat.endpoint(), "https://example.com/v1/chat/completions");
        assert!(config.chat.parameters.is_some());
        assert_eq!(config.inventory.backend, BackendKind::Json);
        assert!(config.inventory.data_dir.is_none());
    }

    #[test]
    fn test_config_defaults() {
        let content = r#"
            [chat]
            model_name = "gpt-4o-mini"
            api_key_env_var = "OPENAI_API_KEY"
        "#;
        let config = TinselConfig::from_toml_str(content).unwrap();
        assert_eq!(config.chat.endpoint(), DEFAULT_CHAT_ENDPOINT);
        assert_eq!(config.inventory.backend, BackendKind::Sqlite);
    }

    #[test]
    fn test_config_empty_model_name() {
        let content = r#"
            [chat]
            model_name = "  "
            api_key_env_var = "OPENAI_API_KEY"
        "#;
        let result = TinselConfig::from_toml_str(content);
        assert!(result.is_err());
        let error_string = result.err().unwrap().to_string();
        assert!(
            error_string.contains("'chat.model_name'"),
            "Unexpected error message: {}",
            error_string
        );
    }

    #[test]
    fn test_config_invalid_endpoint_url() {
        let content = r#"
            [chat]
            model_name = "gpt-4o-mini"
            api_key_env_var = "OPENAI_API_KEY"
            endpoint = "not a url"
        "#;
        let result = TinselConfig::from_toml_str(content);
        assert!(result.is_err());
    }

    #[test]
    fn test_config_unknown_backend() {
        let content = r#"
            [chat]
            model_name = "gpt-4o-mini"
            api_key_env_var = "OPENAI_API_KEY"

            [inventory]
            backend = "coredata"
        "#;
        let result = TinselConfig::from_toml_str(content);
        assert!(result.is_err());
    }

    #[test]
    fn test_config_parameters_must_be_table() {
        let content = r#"
            [chat]
            model_name = "gpt-4o-mini"
            api_key_env_var = "OPENAI_API_KEY"
            parameters = "temperature"
        "#;
        let result = TinselConfig::from_toml_str(content);
        assert!(result.is_err());
    }
}
