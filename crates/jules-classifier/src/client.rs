use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};

use jules_core::Intent;

use crate::types::{
    ChatCompletionRequest, ChatCompletionResponse, ChatMessage, ClassifierError,
};

const INTENT_SYSTEM_PROMPT: &str = "Analyze the following GitHub comment and classify its intent. Respond with a single word: 'Approved', 'ChangesRequested', or 'Commented'.";

const SUGGEST_SYSTEM_PROMPT: &str = "You are an expert software engineering manager. Rewrite the user's task description to be clear, structured, and actionable for an AI software engineer. Use markdown formatting. Ensure the output is only the rewritten description.";

const SUGGEST_FALLBACK: &str = "Sorry, I couldn't generate a suggestion.";

#[derive(Debug, Clone)]
/// Connection settings for the classification service.
pub struct ClassifierConfig {
    pub api_url: String,
    pub api_key: String,
    pub model: String,
    pub request_timeout_ms: u64,
}

#[derive(Debug, Clone)]
/// HTTP client for the OpenAI-compatible classification endpoint.
pub struct ClassifierClient {
    http: reqwest::Client,
    config: ClassifierConfig,
}

impl ClassifierClient {
    pub fn new(config: ClassifierConfig) -> Result<Self, ClassifierError> {
        if config.api_key.trim().is_empty() {
            return Err(ClassifierError::MissingApiKey);
        }

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        let bearer = format!("Bearer {}", config.api_key.trim());
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&bearer).map_err(|error| {
                ClassifierError::InvalidResponse(format!("invalid API key header: {error}"))
            })?,
        );

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_millis(config.request_timeout_ms.max(1)))
            .build()?;
        Ok(Self { http, config })
    }

    /// Classifies a comment into one of the fixed intent values.
    ///
    /// Verdicts outside the expected literals degrade to `Commented`;
    /// transport and status failures surface as errors so the caller never
    /// mutates labels on a failed classification.
    pub async fn classify(&self, comment: &str) -> Result<Intent, ClassifierError> {
        let verdict = self.chat(INTENT_SYSTEM_PROMPT, comment).await?;
        Ok(Intent::from_verdict(verdict.as_deref().unwrap_or_default()))
    }

    /// Rewrites a draft task description into an agent-ready prompt.
    pub async fn suggest_prompt(&self, draft: &str) -> Result<String, ClassifierError> {
        let suggestion = self.chat(SUGGEST_SYSTEM_PROMPT, draft).await?;
        Ok(suggestion
            .map(|text| text.trim().to_string())
            .filter(|text| !text.is_empty())
            .unwrap_or_else(|| SUGGEST_FALLBACK.to_string()))
    }

    async fn chat(&self, system: &str, user: &str) -> Result<Option<String>, ClassifierError> {
        let request = ChatCompletionRequest {
            model: self.config.model.clone(),
            messages: vec![ChatMessage::system(system), ChatMessage::user(user)],
        };

        let response = self
            .http
            .post(self.config.api_url.trim_end_matches('/'))
            .json(&request)
            .send()
            .await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ClassifierError::HttpStatus {
                status: status.as_u16(),
                body,
            });
        }

        let parsed = response
            .json::<ChatCompletionResponse>()
            .await
            .map_err(|error| ClassifierError::InvalidResponse(error.to_string()))?;
        Ok(parsed
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content))
    }
}

#[cfg(test)]
mod tests {
    use super::{ClassifierClient, ClassifierConfig, ClassifierError, INTENT_SYSTEM_PROMPT};
    use httpmock::prelude::*;
    use jules_core::Intent;
    use serde_json::json;

    fn build_client(base_url: &str) -> ClassifierClient {
        ClassifierClient::new(ClassifierConfig {
            api_url: format!("{base_url}/v1/chat/completions"),
            api_key: "classifier-key".to_string(),
            model: "TinyLlama-1.1B-Chat-v1.0".to_string(),
            request_timeout_ms: 2_000,
        })
        .expect("client should build")
    }

    fn completion_body(content: &str) -> serde_json::Value {
        json!({ "choices": [{ "message": { "content": content } }] })
    }

    #[test]
    fn unit_new_rejects_blank_api_key() {
        let result = ClassifierClient::new(ClassifierConfig {
            api_url: "http://localhost/v1/chat/completions".to_string(),
            api_key: "  ".to_string(),
            model: "model".to_string(),
            request_timeout_ms: 1_000,
        });
        assert!(matches!(result, Err(ClassifierError::MissingApiKey)));
    }

    #[tokio::test]
    async fn functional_classify_maps_known_verdicts() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(POST)
                .path("/v1/chat/completions")
                .header("authorization", "Bearer classifier-key")
                .json_body(json!({
                    "model": "TinyLlama-1.1B-Chat-v1.0",
                    "messages": [
                        { "role": "system", "content": INTENT_SYSTEM_PROMPT },
                        { "role": "user", "content": "Looks great, ship it" }
                    ]
                }));
            then.status(200).json_body(completion_body(" Approved "));
        });

        let client = build_client(&server.base_url());
        let intent = client.classify("Looks great, ship it").await.expect("intent");
        assert_eq!(intent, Intent::Approved);
        mock.assert();
    }

    #[tokio::test]
    async fn functional_classify_defaults_unknown_verdict_to_commented() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path("/v1/chat/completions");
            then.status(200).json_body(completion_body("LGTM with caveats"));
        });

        let client = build_client(&server.base_url());
        let intent = client.classify("hmm").await.expect("intent");
        assert_eq!(intent, Intent::Commented);
    }

    #[tokio::test]
    async fn regression_classify_defaults_missing_choices_to_commented() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path("/v1/chat/completions");
            then.status(200).json_body(json!({ "choices": [] }));
        });

        let client = build_client(&server.base_url());
        let intent = client.classify("hello").await.expect("intent");
        assert_eq!(intent, Intent::Commented);
    }

    #[tokio::test]
    async fn integration_classify_surfaces_non_success_status_as_error() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path("/v1/chat/completions");
            then.status(503).body("overloaded");
        });

        let client = build_client(&server.base_url());
        let error = client.classify("hello").await.expect_err("should fail");
        assert!(matches!(
            error,
            ClassifierError::HttpStatus { status: 503, .. }
        ));
    }

    #[tokio::test]
    async fn regression_classify_surfaces_malformed_json_as_error() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path("/v1/chat/completions");
            then.status(200).body("not json");
        });

        let client = build_client(&server.base_url());
        let error = client.classify("hello").await.expect_err("should fail");
        assert!(matches!(error, ClassifierError::InvalidResponse(_)));
    }

    #[tokio::test]
    async fn functional_suggest_prompt_returns_rewritten_description() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path("/v1/chat/completions");
            then.status(200)
                .json_body(completion_body("### Objective\nDo the thing."));
        });

        let client = build_client(&server.base_url());
        let suggestion = client.suggest_prompt("do thing").await.expect("suggestion");
        assert_eq!(suggestion, "### Objective\nDo the thing.");
    }

    #[tokio::test]
    async fn regression_suggest_prompt_falls_back_when_content_is_empty() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path("/v1/chat/completions");
            then.status(200).json_body(completion_body("   "));
        });

        let client = build_client(&server.base_url());
        let suggestion = client.suggest_prompt("do thing").await.expect("suggestion");
        assert_eq!(suggestion, "Sorry, I couldn't generate a suggestion.");
    }
}
