// tinsel-core/src/api.rs

use anyhow::{Context, Result};
use reqwest::Client;
use serde_json::{json, to_value, Value};
use tracing::{debug, warn};

use crate::config::ChatConfig;
use crate::errors::ChatError;
use crate::models::chat::{ChatMessage, ChatResponse};

/// Client for the remote chat-completion endpoint.
///
/// One instance per session; issues exactly one POST per [`ChatClient::send`]
/// call. There is no timeout configuration, no retry, and no rate-limit
/// handling.
pub struct ChatClient {
    config: ChatConfig,
    http_client: Client,
    api_key: String,
}

impl ChatClient {
    pub fn new(config: ChatConfig, api_key: String) -> Result<Self> {
        if api_key.is_empty() {
            warn!(
                model = %config.model_name,
                "API key is empty. The chat call will likely fail."
            );
        }
        let http_client = Client::builder()
            .build()
            .context("Failed to build HTTP client for chat")?;
        Ok(Self {
            config,
            http_client,
            api_key,
        })
    }

    /// Sends one user message and returns the first choice's content.
    ///
    /// `Ok(None)` means the endpoint answered but produced no usable reply
    /// (zero choices, or a choice without content). Transport, API, and
    /// decode failures are surfaced as distinct [`ChatError`] kinds.
    pub async fn send(&self, text: &str) -> Result<Option<String>, ChatError> {
        let endpoint = self.config.endpoint();
        let request_body = build_chat_request(
            &self.config.model_name,
            text,
            self.config.parameters.as_ref(),
        );

        debug!(
            "Request URL: {}\nRequest JSON: {}",
            endpoint,
            serde_json::to_string_pretty(&request_body)
                .unwrap_or_else(|e| format!("Serialization error: {}", e))
        );

        let response = self
            .http_client
            .post(endpoint)
            .header("Content-Type", "application/json")
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&request_body)
            .send()
            .await
            .map_err(ChatError::Network)?;

        let status = response.status();
        let response_text = response.text().await.map_err(ChatError::Network)?;

        if !status.is_success() {
            debug!(
                "API request failed. Status: {}, Body: {}",
                status, response_text
            );
            return Err(ChatError::Api {
                status: status.as_u16(),
                body: response_text,
            });
        }

        let api_response = parse_chat_response(&response_text)?;
        match api_response.first_content() {
            Some(content) => Ok(Some(content.to_string())),
            None => {
                debug!("Response has an empty 'choices' array or no content.");
                Ok(None)
            }
        }
    }
}

/// Builds the request payload: a model identifier plus a message list holding
/// exactly one entry with role `user` and the input text verbatim. Optional
/// model parameters from the config table are flattened into the top-level
/// request map.
pub fn build_chat_request(
    model_name: &str,
    text: &str,
    parameters: Option<&toml::Value>,
) -> Value {
    let mut request_map = serde_json::Map::new();
    request_map.insert("model".to_string(), json!(model_name));
    request_map.insert("messages".to_string(), json!([ChatMessage::user(text)]));

    if let Some(parameters) = parameters.and_then(|p| p.as_table()) {
        for (key, value) in parameters {
            match to_value(value.clone()) {
                Ok(json_value) => {
                    request_map.insert(key.clone(), json_value);
                }
                Err(e) => warn!("Skipping unconvertible parameter '{}': {}", key, e),
            }
        }
    }
    Value::Object(request_map)
}

/// Parses a response body as the chat response shape. An empty or missing
/// `choices` array decodes successfully; only a malformed body is an error.
pub fn parse_chat_response(response_body: &str) -> Result<ChatResponse, ChatError> {
    serde_json::from_str::<ChatResponse>(response_body).map_err(|e| {
        debug!("Failed to deserialize chat response: {}", response_body);
        ChatError::Decode(e)
    })
}
