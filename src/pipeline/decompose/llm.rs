use serde::Deserialize;
use serde_json::json;

use super::DecomposeError;

/// Generative model client abstraction (allows mocking)
pub trait LlmClient {
    fn generate(&self, model: &str, prompt: &str) -> Result<String, DecomposeError>;
}

/// OpenAI-compatible chat-completions client. Works against any provider
/// exposing the `/chat/completions` shape (DeepSeek, Gemini's compatibility
/// endpoint, a local gateway).
pub struct ChatClient {
    base_url: String,
    api_key: Option<String>,
    client: reqwest::blocking::Client,
    timeout_secs: u64,
}

impl ChatClient {
    pub fn new(base_url: &str, api_key: Option<String>, timeout_secs: u64) -> Self {
        let client = reqwest::blocking::Client::builder()
            .timeout(std::time::Duration::from_secs(timeout_secs))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
            client,
            timeout_secs,
        }
    }
}

#[derive(Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Deserialize)]
struct ChatMessage {
    content: Option<String>,
}

impl LlmClient for ChatClient {
    fn generate(&self, model: &str, prompt: &str) -> Result<String, DecomposeError> {
        let url = format!("{}/chat/completions", self.base_url);
        let body = json!({
            "model": model,
            "messages": [{"role": "user", "content": prompt}],
            "response_format": {"type": "json_object"},
            "stream": false,
        });

        let mut request = self.client.post(&url).json(&body);
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request.send().map_err(|e| {
            if e.is_connect() {
                DecomposeError::Connection(self.base_url.clone())
            } else if e.is_timeout() {
                DecomposeError::HttpClient(format!(
                    "Request timed out after {}s",
                    self.timeout_secs
                ))
            } else {
                DecomposeError::HttpClient(e.to_string())
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(DecomposeError::Provider {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: ChatCompletionResponse = response
            .json()
            .map_err(|e| DecomposeError::ResponseParsing(e.to_string()))?;

        parsed
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or_else(|| DecomposeError::ResponseParsing("Completion had no content".into()))
    }
}

/// Mock model client for testing. Returns a configurable response.
pub struct MockLlmClient {
    response: String,
    fail: bool,
}

impl MockLlmClient {
    pub fn new(response: &str) -> Self {
        Self {
            response: response.to_string(),
            fail: false,
        }
    }

    /// A client whose every call fails at the transport layer.
    pub fn unreachable() -> Self {
        Self {
            response: String::new(),
            fail: true,
        }
    }
}

impl LlmClient for MockLlmClient {
    fn generate(&self, _model: &str, _prompt: &str) -> Result<String, DecomposeError> {
        if self.fail {
            return Err(DecomposeError::Connection("http://mock.test".into()));
        }
        Ok(self.response.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mock_client_returns_configured_response() {
        let client = MockLlmClient::new("[]");
        assert_eq!(client.generate("deepseek-chat", "prompt").unwrap(), "[]");
    }

    #[test]
    fn unreachable_mock_fails_with_connection_error() {
        let client = MockLlmClient::unreachable();
        assert!(matches!(
            client.generate("deepseek-chat", "prompt"),
            Err(DecomposeError::Connection(_))
        ));
    }

    #[test]
    fn chat_client_trims_trailing_slash() {
        let client = ChatClient::new("https://api.deepseek.com/", None, 30);
        assert_eq!(client.base_url, "https://api.deepseek.com");
    }

    #[test]
    fn chat_client_unreachable_maps_to_connection() {
        let client = ChatClient::new("http://127.0.0.1:9", None, 1);
        assert!(matches!(
            client.generate("deepseek-chat", "hi"),
            Err(DecomposeError::Connection(_)) | Err(DecomposeError::HttpClient(_))
        ));
    }
}
