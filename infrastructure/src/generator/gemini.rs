//! Gemini response generator
//!
//! Calls the Gemini `generateContent` REST endpoint with the debate
//! transcript, the persona's system instruction and fixed sampling and
//! safety settings.

use crate::config::FileGeneratorConfig;
use async_trait::async_trait;
use debate_application::{GeneratorError, ResponseGenerator};
use debate_domain::{DebatePrompt, GenerationRequest, Speaker};
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use tracing::debug;

const API_KEY_HEADER: &str = "x-goog-api-key";
const SAFETY_THRESHOLD: &str = "BLOCK_MEDIUM_AND_ABOVE";
const SAFETY_CATEGORIES: [&str; 2] = ["HARM_CATEGORY_HARASSMENT", "HARM_CATEGORY_HATE_SPEECH"];

/// Sampling parameters sent with every request
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    pub max_output_tokens: u32,
    pub temperature: f32,
    pub top_p: f32,
    pub top_k: u32,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            max_output_tokens: 1000,
            temperature: 0.7,
            top_p: 0.8,
            top_k: 40,
        }
    }
}

/// Response generator backed by the Gemini HTTP API.
#[derive(Clone)]
pub struct GeminiResponseGenerator {
    client: Client,
    api_key: String,
    base_url: String,
    model: String,
    generation_config: GenerationConfig,
}

impl GeminiResponseGenerator {
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        let defaults = FileGeneratorConfig::default();
        Self {
            client: Client::new(),
            api_key: api_key.into(),
            base_url: defaults.base_url,
            model: model.into(),
            generation_config: GenerationConfig::default(),
        }
    }

    /// Build from the `[generator]` config section
    ///
    /// Fails with [`GeneratorError::MissingCredentials`] when no API key is
    /// configured inline or in the environment.
    pub fn from_config(config: &FileGeneratorConfig) -> Result<Self, GeneratorError> {
        let api_key = config
            .resolve_api_key()
            .ok_or_else(|| GeneratorError::MissingCredentials(config.api_key_env.clone()))?;

        Ok(Self::new(api_key, config.model.clone())
            .with_base_url(config.base_url.clone())
            .with_generation_config(GenerationConfig {
                max_output_tokens: config.max_output_tokens,
                temperature: config.temperature,
                top_p: config.top_p,
                top_k: config.top_k,
            }))
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_generation_config(mut self, generation_config: GenerationConfig) -> Self {
        self.generation_config = generation_config;
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn build_request(&self, request: &GenerationRequest) -> GenerateContentRequest {
        let mut contents = Vec::with_capacity(request.transcript.len() + 1);

        if request
            .transcript
            .first()
            .is_some_and(|turn| turn.speaker == Speaker::Agent)
        {
            contents.push(Content::text("user", DebatePrompt::opening_primer(&request.topic)));
        }

        contents.extend(request.transcript.iter().map(|turn| {
            let role = match turn.speaker {
                Speaker::User => "user",
                Speaker::Agent => "model",
            };
            Content::text(role, turn.text.clone())
        }));

        GenerateContentRequest {
            contents,
            system_instruction: Content {
                role: None,
                parts: vec![Part {
                    text: DebatePrompt::system_instruction(request),
                }],
            },
            generation_config: self.generation_config,
            safety_settings: SAFETY_CATEGORIES
                .iter()
                .map(|&category| SafetySetting {
                    category,
                    threshold: SAFETY_THRESHOLD,
                })
                .collect(),
        }
    }

    async fn send_request(&self, body: &GenerateContentRequest) -> Result<String, GeneratorError> {
        let url = format!("{}/{}:generateContent", self.base_url, self.model);

        let response = self
            .client
            .post(url)
            .header(API_KEY_HEADER, &self.api_key)
            .json(body)
            .send()
            .await
            .map_err(map_send_error)?;

        let status = response.status();
        if !status.is_success() {
            let body_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Failed to read Gemini error body".to_string());
            return Err(map_http_error(status, &body_text));
        }

        let parsed: GenerateContentResponse = response
            .json()
            .await
            .map_err(|err| GeneratorError::Other(format!("Failed to parse Gemini response: {err}")))?;

        extract_text_response(parsed)
    }
}

#[async_trait]
impl ResponseGenerator for GeminiResponseGenerator {
    fn name(&self) -> &str {
        "gemini"
    }

    async fn generate(&self, request: &GenerationRequest) -> Result<String, GeneratorError> {
        let body = self.build_request(request);
        debug!(
            "Gemini request: model={}, {} contents, round {}/{}",
            self.model,
            body.contents.len(),
            request.round,
            request.round_count
        );
        self.send_request(&body).await
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    contents: Vec<Content>,
    system_instruction: Content,
    generation_config: GenerationConfig,
    safety_settings: Vec<SafetySetting>,
}

#[derive(Debug, Serialize)]
struct Content {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<&'static str>,
    parts: Vec<Part>,
}

impl Content {
    fn text(role: &'static str, text: String) -> Self {
        Self {
            role: Some(role),
            parts: vec![Part { text }],
        }
    }
}

#[derive(Debug, Serialize)]
struct Part {
    text: String,
}

#[derive(Debug, Serialize)]
struct SafetySetting {
    category: &'static str,
    threshold: &'static str,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    candidates: Option<Vec<Candidate>>,
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    block_reason: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    content: Option<ContentResponse>,
    finish_reason: Option<String>,
}

#[derive(Deserialize)]
struct ContentResponse {
    #[serde(default)]
    parts: Vec<PartResponse>,
}

#[derive(Deserialize)]
struct PartResponse {
    text: Option<String>,
}

#[derive(Deserialize)]
struct ErrorWrapper {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    message: Option<String>,
    status: Option<String>,
}

fn extract_text_response(response: GenerateContentResponse) -> Result<String, GeneratorError> {
    if let Some(reason) = response.prompt_feedback.and_then(|f| f.block_reason) {
        return Err(GeneratorError::Blocked(reason));
    }

    let Some(candidate) = response.candidates.and_then(|c| c.into_iter().next()) else {
        return Err(GeneratorError::Empty);
    };

    let text: String = candidate
        .content
        .map(|content| {
            content
                .parts
                .into_iter()
                .filter_map(|part| part.text)
                .collect()
        })
        .unwrap_or_default();

    if !text.trim().is_empty() {
        return Ok(text);
    }
    match candidate.finish_reason.as_deref() {
        Some("SAFETY") => Err(GeneratorError::Blocked("SAFETY".to_string())),
        _ => Err(GeneratorError::Empty),
    }
}

/// Transport errors are reported without their URL.
fn map_send_error(err: reqwest::Error) -> GeneratorError {
    let transient = err.is_connect() || err.is_timeout();
    let message = format!("Gemini request failed: {}", err.without_url());
    if transient {
        GeneratorError::Transient(message)
    } else {
        GeneratorError::Other(message)
    }
}

fn map_http_error(status: StatusCode, body: &str) -> GeneratorError {
    let message = serde_json::from_str::<ErrorWrapper>(body)
        .map(|wrapper| {
            let status_text = wrapper.error.status.unwrap_or_default();
            let msg = wrapper.error.message.unwrap_or_else(|| body.to_string());
            if status_text.is_empty() {
                msg
            } else {
                format!("{status_text}: {msg}")
            }
        })
        .unwrap_or_else(|_| body.to_string());

    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
            GeneratorError::InvalidCredentials(message)
        }
        StatusCode::BAD_REQUEST if message.contains("API key") => {
            GeneratorError::InvalidCredentials(message)
        }
        StatusCode::REQUEST_TIMEOUT | StatusCode::TOO_MANY_REQUESTS => {
            GeneratorError::Transient(format!("{}: {}", status.as_u16(), message))
        }
        s if s.is_server_error() => {
            GeneratorError::Transient(format!("{}: {}", s.as_u16(), message))
        }
        s => GeneratorError::Other(format!("{}: {}", s.as_u16(), message)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use debate_domain::{Turn, TurnId};
    use serde_json::{Value, json};

    fn request(transcript: Vec<Turn>) -> GenerationRequest {
        GenerationRequest {
            topic: "X".to_string(),
            persona_name: "Socrates".to_string(),
            style_descriptor: "Question-based".to_string(),
            behavioral_prompt: "- Ask probing questions".to_string(),
            transcript,
            round: 1,
            round_count: 2,
        }
    }

    fn body_json(transcript: Vec<Turn>) -> Value {
        let generator = GeminiResponseGenerator::new("key", "gemini-1.5-flash");
        serde_json::to_value(generator.build_request(&request(transcript))).unwrap()
    }

    #[test]
    fn test_request_primes_user_before_greeting() {
        let body = body_json(vec![
            Turn::new(TurnId::new(1), Speaker::Agent, "Greetings"),
            Turn::new(TurnId::new(2), Speaker::User, "A1"),
        ]);

        let roles: Vec<&str> = body["contents"]
            .as_array()
            .unwrap()
            .iter()
            .map(|c| c["role"].as_str().unwrap())
            .collect();
        assert_eq!(roles, vec!["user", "model", "user"]);
        assert_eq!(body["contents"][1]["parts"][0]["text"], "Greetings");
        assert_eq!(body["contents"][2]["parts"][0]["text"], "A1");
    }

    #[test]
    fn test_request_carries_settings() {
        let body = body_json(vec![Turn::new(TurnId::new(1), Speaker::User, "A1")]);

        assert_eq!(body["contents"].as_array().unwrap().len(), 1);
        let instruction = body["systemInstruction"]["parts"][0]["text"].as_str().unwrap();
        assert!(instruction.starts_with("You are Socrates."));
        assert!(body["systemInstruction"].get("role").is_none());

        assert_eq!(body["generationConfig"]["maxOutputTokens"], 1000);
        assert_eq!(body["generationConfig"]["topK"], 40);
        assert_eq!(
            body["safetySettings"],
            json!([
                {"category": "HARM_CATEGORY_HARASSMENT", "threshold": "BLOCK_MEDIUM_AND_ABOVE"},
                {"category": "HARM_CATEGORY_HATE_SPEECH", "threshold": "BLOCK_MEDIUM_AND_ABOVE"}
            ])
        );
    }

    fn parse(value: Value) -> Result<String, GeneratorError> {
        extract_text_response(serde_json::from_value(value).unwrap())
    }

    #[test]
    fn test_extract_text_joins_parts() {
        let result = parse(json!({
            "candidates": [{"content": {"parts": [{"text": "Know "}, {"text": "thyself."}]}}]
        }));
        assert_eq!(result, Ok("Know thyself.".to_string()));
    }

    #[test]
    fn test_extract_blocked_and_empty() {
        assert_eq!(
            parse(json!({"promptFeedback": {"blockReason": "SAFETY"}})),
            Err(GeneratorError::Blocked("SAFETY".to_string()))
        );
        assert!(matches!(
            parse(json!({"candidates": [{"finishReason": "SAFETY"}]})),
            Err(GeneratorError::Blocked(_))
        ));
        assert_eq!(parse(json!({"candidates": []})), Err(GeneratorError::Empty));
        assert_eq!(
            parse(json!({"candidates": [{"content": {"parts": [{"text": "  "}]}, "finishReason": "STOP"}]})),
            Err(GeneratorError::Empty)
        );
    }

    #[test]
    fn test_map_http_error() {
        let bad_key = r#"{"error": {"code": 400, "message": "API key not valid. Please pass a valid API key.", "status": "INVALID_ARGUMENT"}}"#;
        assert!(matches!(
            map_http_error(StatusCode::BAD_REQUEST, bad_key),
            GeneratorError::InvalidCredentials(_)
        ));
        assert!(matches!(
            map_http_error(StatusCode::FORBIDDEN, "denied"),
            GeneratorError::InvalidCredentials(_)
        ));
        assert!(map_http_error(StatusCode::TOO_MANY_REQUESTS, "slow down").is_transient());
        assert!(map_http_error(StatusCode::SERVICE_UNAVAILABLE, "").is_transient());
        assert!(matches!(
            map_http_error(StatusCode::BAD_REQUEST, "malformed"),
            GeneratorError::Other(_)
        ));
    }

    #[tokio::test]
    async fn test_connect_failure_keeps_key_out_of_message() {
        let generator = GeminiResponseGenerator::new("SECRETKEY123", "gemini-1.5-flash")
            .with_base_url("http://127.0.0.1:1");

        let err = generator
            .generate(&request(vec![Turn::new(TurnId::new(1), Speaker::User, "A1")]))
            .await
            .unwrap_err();

        assert!(err.is_transient());
        assert!(!err.to_string().contains("SECRETKEY123"));
        let failure = debate_domain::GenerationFailure::from(err);
        assert!(!failure.message.contains("SECRETKEY123"));
        assert!(!failure.message.contains("generateContent"));
    }

    #[test]
    fn test_from_config_requires_key() {
        let config = FileGeneratorConfig {
            api_key: None,
            api_key_env: "DEBATE_TEST_DEFINITELY_UNSET".to_string(),
            ..Default::default()
        };
        assert_eq!(
            GeminiResponseGenerator::from_config(&config).err(),
            Some(GeneratorError::MissingCredentials(
                "DEBATE_TEST_DEFINITELY_UNSET".to_string()
            ))
        );

        let config = FileGeneratorConfig {
            api_key: Some("key".to_string()),
            model: "gemini-1.5-pro".to_string(),
            ..Default::default()
        };
        let generator = GeminiResponseGenerator::from_config(&config).unwrap();
        assert_eq!(generator.model(), "gemini-1.5-pro");
    }
}
