use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::LlmError;
use crate::provider::{LlmProvider, Message};

/// Client for the `/chat/completions` endpoint of OpenAI and API-compatible services.
pub struct OpenAiProvider {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
    model: String,
    max_tokens: u32,
    pub(crate) provider_name: String,
}

impl fmt::Debug for OpenAiProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OpenAiProvider")
            .field("client", &"<reqwest::Client>")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("max_tokens", &self.max_tokens)
            .field("provider_name", &self.provider_name)
            .finish()
    }
}

impl Clone for OpenAiProvider {
    fn clone(&self) -> Self {
        Self {
            client: self.client.clone(),
            api_key: self.api_key.clone(),
            base_url: self.base_url.clone(),
            model: self.model.clone(),
            max_tokens: self.max_tokens,
            provider_name: self.provider_name.clone(),
        }
    }
}

impl OpenAiProvider {
    /// Create a provider whose HTTP client gives up after `request_timeout`.
    ///
    /// # Errors
    ///
    /// Returns [`LlmError::Http`] if the HTTP client cannot be built.
    pub fn new(
        api_key: String,
        mut base_url: String,
        model: String,
        max_tokens: u32,
        request_timeout: Duration,
    ) -> Result<Self, LlmError> {
        while base_url.ends_with('/') {
            base_url.pop();
        }
        Ok(Self {
            client: crate::http::build_client(request_timeout)?,
            api_key,
            base_url,
            model,
            max_tokens,
            provider_name: "openai".into(),
        })
    }

    async fn send_request(&self, messages: &[Message]) -> Result<String, LlmError> {
        if self.api_key.trim().is_empty() {
            return Err(LlmError::MissingApiKey {
                provider: self.provider_name.clone(),
            });
        }

        let api_messages = convert_messages(messages);
        let body = ChatRequest {
            model: &self.model,
            messages: &api_messages,
            max_tokens: self.max_tokens,
        };

        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await.map_err(LlmError::Http)?;

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            tracing::warn!(provider = %self.provider_name, "rate limited");
            return Err(LlmError::RateLimited);
        }

        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN
        {
            tracing::error!("{} API rejected credentials {status}: {text}", self.provider_name);
            return Err(LlmError::Unauthorized {
                provider: self.provider_name.clone(),
                status,
            });
        }

        if !status.is_success() {
            tracing::error!("{} API error {status}: {text}", self.provider_name);
            return Err(LlmError::Api {
                provider: self.provider_name.clone(),
                status,
            });
        }

        let resp: OpenAiChatResponse = serde_json::from_str(&text)?;

        if let Some(ref usage) = resp.usage {
            tracing::debug!(
                prompt_tokens = usage.prompt_tokens,
                completion_tokens = usage.completion_tokens,
                "{} API usage",
                self.provider_name
            );
        }

        resp.choices
            .into_iter()
            .next()
            .map(|c| c.message.content.unwrap_or_default())
            .ok_or(LlmError::EmptyResponse {
                provider: self.provider_name.clone(),
            })
    }
}

impl LlmProvider for OpenAiProvider {
    async fn chat(&self, messages: &[Message]) -> Result<String, LlmError> {
        self.send_request(messages).await
    }

    fn name(&self) -> &str {
        &self.provider_name
    }

    fn model(&self) -> &str {
        &self.model
    }
}

fn convert_messages(messages: &[Message]) -> Vec<ApiMessage<'_>> {
    messages
        .iter()
        .map(|msg| ApiMessage {
            role: msg.role.as_str(),
            content: &msg.content,
        })
        .collect()
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: &'a [ApiMessage<'a>],
    max_tokens: u32,
}

#[derive(Serialize)]
struct ApiMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct OpenAiChatResponse {
    choices: Vec<ChatChoice>,
    #[serde(default)]
    usage: Option<OpenAiUsage>,
}

#[derive(Deserialize)]
struct OpenAiUsage {
    #[serde(default)]
    prompt_tokens: u64,
    #[serde(default)]
    completion_tokens: u64,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Deserialize)]
struct ChatMessage {
    #[serde(default)]
    content: Option<String>,
}

#[cfg(test)]
mod tests {
    use wiremock::matchers::{bearer_token, body_partial_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;
    use crate::provider::Role;

    fn test_provider(base_url: &str) -> OpenAiProvider {
        OpenAiProvider::new(
            "key".into(),
            base_url.into(),
            "gpt-test".into(),
            256,
            Duration::from_secs(5),
        )
        .unwrap()
    }

    fn chat_body(content: &str) -> serde_json::Value {
        serde_json::json!({
            "choices": [{"message": {"role": "assistant", "content": content}}],
            "usage": {"prompt_tokens": 12, "completion_tokens": 3}
        })
    }

    #[test]
    fn base_url_strips_trailing_slash() {
        let p = test_provider("http://localhost:8080/v1///");
        assert_eq!(p.base_url, "http://localhost:8080/v1");
    }

    #[test]
    fn debug_redacts_api_key() {
        let p = OpenAiProvider::new(
            "sk-secret".into(),
            "http://x".into(),
            "m".into(),
            1,
            Duration::from_secs(5),
        )
        .unwrap();
        let debug = format!("{p:?}");
        assert!(!debug.contains("sk-secret"));
        assert!(debug.contains("<redacted>"));
    }

    #[test]
    fn name_and_model() {
        let p = test_provider("http://x");
        assert_eq!(p.name(), "openai");
        assert_eq!(p.model(), "gpt-test");
    }

    #[test]
    fn chat_request_serialization() {
        let msgs = [Message::new(Role::System, "sys"), Message::user("hi")];
        let api = convert_messages(&msgs);
        let body = ChatRequest {
            model: "m",
            messages: &api,
            max_tokens: 10,
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["model"], "m");
        assert_eq!(json["max_tokens"], 10);
        assert_eq!(json["messages"][0]["role"], "system");
        assert_eq!(json["messages"][1]["content"], "hi");
    }

    #[test]
    fn parse_response_with_null_content() {
        let json = r#"{"choices":[{"message":{"content":null}}]}"#;
        let resp: OpenAiChatResponse = serde_json::from_str(json).unwrap();
        assert!(resp.choices[0].message.content.is_none());
        assert!(resp.usage.is_none());
    }

    #[tokio::test]
    async fn chat_returns_first_choice() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .and(bearer_token("key"))
            .and(body_partial_json(serde_json::json!({"model": "gpt-test"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(chat_body("Quote B")))
            .expect(1)
            .mount(&server)
            .await;

        let p = test_provider(&server.uri());
        let out = p.chat(&[Message::user("which?")]).await.unwrap();
        assert_eq!(out, "Quote B");
    }

    #[tokio::test]
    async fn chat_empty_content_is_ok() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(chat_body("")))
            .mount(&server)
            .await;

        let out = test_provider(&server.uri())
            .chat(&[Message::user("q")])
            .await
            .unwrap();
        assert!(out.is_empty());
    }

    #[tokio::test]
    async fn chat_no_choices_is_empty_response() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({"choices": []})),
            )
            .mount(&server)
            .await;

        let err = test_provider(&server.uri())
            .chat(&[Message::user("q")])
            .await
            .unwrap_err();
        assert!(matches!(err, LlmError::EmptyResponse { .. }));
    }

    #[tokio::test]
    async fn chat_malformed_body_is_json_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&server)
            .await;

        let err = test_provider(&server.uri())
            .chat(&[Message::user("q")])
            .await
            .unwrap_err();
        assert!(matches!(err, LlmError::Json(_)));
    }

    #[tokio::test]
    async fn chat_401_is_unauthorized() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(401).set_body_string("invalid api key"))
            .mount(&server)
            .await;

        let err = test_provider(&server.uri())
            .chat(&[Message::user("q")])
            .await
            .unwrap_err();
        assert!(matches!(err, LlmError::Unauthorized { .. }));
    }

    #[tokio::test]
    async fn chat_429_is_not_retried() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(429))
            .expect(1)
            .mount(&server)
            .await;

        let err = test_provider(&server.uri())
            .chat(&[Message::user("q")])
            .await
            .unwrap_err();
        assert!(matches!(err, LlmError::RateLimited));
    }

    #[tokio::test]
    async fn chat_500_is_api_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let err = test_provider(&server.uri())
            .chat(&[Message::user("q")])
            .await
            .unwrap_err();
        assert!(matches!(err, LlmError::Api { status, .. } if status.as_u16() == 500));
    }

    #[tokio::test]
    async fn chat_without_key_makes_no_request() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(chat_body("x")))
            .expect(0)
            .mount(&server)
            .await;

        let p = OpenAiProvider::new(
            String::new(),
            server.uri(),
            "m".into(),
            1,
            Duration::from_secs(5),
        )
        .unwrap();
        let err = p.chat(&[Message::user("q")]).await.unwrap_err();
        assert!(matches!(err, LlmError::MissingApiKey { .. }));
    }

    #[tokio::test]
    async fn chat_unreachable_endpoint_is_transport_error() {
        let p = test_provider("http://127.0.0.1:1");
        let err = p.chat(&[Message::user("q")]).await.unwrap_err();
        assert!(err.is_transport(), "unexpected error: {err:?}");
    }

    #[tokio::test]
    async fn request_timeout_given_to_new_is_enforced() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(chat_body("late"))
                    .set_delay(Duration::from_secs(5)),
            )
            .mount(&server)
            .await;

        let p = OpenAiProvider::new(
            "key".into(),
            server.uri(),
            "gpt-test".into(),
            256,
            Duration::from_millis(200),
        )
        .unwrap();
        let err = p.chat(&[Message::user("q")]).await.unwrap_err();
        assert!(err.is_transport(), "unexpected error: {err:?}");
    }
}
