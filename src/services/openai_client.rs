use std::time::Duration;

use async_openai::{
    config::OpenAIConfig,
    types::{
        ChatCompletionRequestSystemMessageArgs, ChatCompletionRequestUserMessageArgs,
        CreateChatCompletionRequestArgs, ResponseFormat,
    },
    Client,
};
use async_trait::async_trait;
use backoff::ExponentialBackoffBuilder;
use serde::Deserialize;
use serde_aux::field_attributes::deserialize_number_from_string;

use crate::{
    domain::{ExtractionResult, SearchResult},
    error::ExtractionFailure,
};

const PROFILE_MATCH_PROMPT: &str = r#"You are an assistant that identifies LinkedIn profiles from web search results.
You receive a full name and web search results.
Your tasks:
1. Choose the single best LinkedIn profile URL for this person, only if it clearly matches.
2. Extract the person's role (job title) from the title/snippet.
3. Return a confidence score between 0 and 100.
If no clear linkedin.com/in profile is found: linkedin_profile = "not found", role = "", confidence = 0.
Respond ONLY in JSON with keys: linkedin_profile, role, confidence."#;

/// Picks the profile that matches a person out of their search results.
///
/// Implementations never fail: anything that goes wrong degrades to
/// [`ExtractionResult::not_found`].
#[async_trait]
pub trait ProfileExtractor: Send + Sync {
    async fn extract(&self, full_name: &str, results: &[SearchResult]) -> ExtractionResult;
}

pub struct OpenaiClient {
    client: Client<OpenAIConfig>,
    model: String,
    timeout: Duration,
}

#[derive(Deserialize)]
struct ProfileMatchReply {
    linkedin_profile: String,
    role: String,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    confidence: f64,
}

impl OpenaiClient {
    pub fn new(api_key: String, api_base: &str, model: String, timeout: Duration) -> Self {
        let config = OpenAIConfig::new()
            .with_api_key(api_key)
            .with_api_base(api_base.trim_end_matches('/'));
        // One call per record: the client's built-in retry on 429/5xx is off.
        let no_retry = ExponentialBackoffBuilder::new()
            .with_max_elapsed_time(Some(Duration::ZERO))
            .build();
        OpenaiClient {
            client: Client::with_config(config).with_backoff(no_retry),
            model,
            timeout,
        }
    }

    async fn get_profile_match_reply(
        &self,
        full_name: &str,
        results: &[SearchResult],
    ) -> Result<String, ExtractionFailure> {
        let request = CreateChatCompletionRequestArgs::default()
            .model(&self.model)
            .messages([
                ChatCompletionRequestSystemMessageArgs::default()
                    .content(PROFILE_MATCH_PROMPT)
                    .build()?
                    .into(),
                ChatCompletionRequestUserMessageArgs::default()
                    .content(build_user_message(full_name, results)?)
                    .build()?
                    .into(),
            ])
            .temperature(0.0)
            .response_format(ResponseFormat::JsonObject)
            .build()?;

        let response = tokio::time::timeout(self.timeout, self.client.chat().create(request))
            .await
            .map_err(|_| ExtractionFailure::Timeout(self.timeout.as_secs()))??;
        log::debug!("Response: {:?}", response);

        response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or(ExtractionFailure::EmptyReply)
    }
}

#[async_trait]
impl ProfileExtractor for OpenaiClient {
    async fn extract(&self, full_name: &str, results: &[SearchResult]) -> ExtractionResult {
        if results.is_empty() {
            log::info!("No search results for {}, skipping model call", full_name);
            return ExtractionResult::not_found();
        }

        let parsed = match self.get_profile_match_reply(full_name, results).await {
            Ok(reply) => parse_profile_match(&reply),
            Err(e) => Err(e),
        };

        match parsed {
            Ok(extraction) => extraction,
            Err(e) => {
                log::warn!("Extraction degraded to not found for {}: {}", full_name, e);
                ExtractionResult::not_found()
            }
        }
    }
}

fn build_user_message(
    full_name: &str,
    results: &[SearchResult],
) -> Result<String, serde_json::Error> {
    Ok(format!(
        "Full name: {}\nSearch results JSON: {}",
        full_name,
        serde_json::to_string(results)?
    ))
}

/// Reads the model's json reply into a normalized [`ExtractionResult`].
pub fn parse_profile_match(reply: &str) -> Result<ExtractionResult, ExtractionFailure> {
    let reply: ProfileMatchReply = serde_json::from_str(strip_code_fence(reply))?;

    if !reply.confidence.is_finite() || reply.confidence < 0.0 {
        return Err(ExtractionFailure::InvalidConfidence(
            reply.confidence.to_string(),
        ));
    }
    let confidence = reply.confidence.round().min(100.0) as u8;

    Ok(ExtractionResult::new(
        reply.linkedin_profile,
        reply.role,
        confidence,
    ))
}

fn strip_code_fence(reply: &str) -> &str {
    let trimmed = reply.trim();
    match trimmed
        .strip_prefix("```json")
        .or_else(|| trimmed.strip_prefix("```"))
        .and_then(|rest| rest.strip_suffix("```"))
    {
        Some(inner) => inner.trim(),
        None => trimmed,
    }
}
