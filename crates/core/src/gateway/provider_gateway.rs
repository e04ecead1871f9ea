use async_trait::async_trait;
use serde_json::{Value, json};
use tracing::{debug, info, warn};

use crate::{
    error::GatewayError,
    gateway::{
        Gateway,
        schema::{
            TranslationRequest, apply_translations, parse_transcript, parse_translations,
            transcript_schema, translation_schema,
        },
    },
    provider::GatewayConfig,
    types::Segment,
};

static TRANSCRIPT_PROMPT: &str = r#"
  You produce diarized transcripts for short Tamil videos.

  OUTPUT: Return ONLY valid JSON:
  {
    "segments": [
      {
        "id": "unique segment id",
        "startTime": 0.0,
        "endTime": 4.5,
        "tamilText": "Native Tamil script",
        "tanglishText": "The same words written in English characters",
        "score": 87,
        "speakerId": "Speaker 1"
      }
    ]
  }

  RULES:
  - Segments are chronological and do not overlap
  - startTime and endTime are seconds, endTime > startTime
  - tamilText and tanglishText carry the same spoken content
  - score is a number 1-100 rating how viral or engaging the segment is
  - speakerId is "Speaker 1" or "Speaker 2"
"#;

static TRANSLATION_PROMPT: &str = r#"
  You translate Tamil transcript segments to English, preserving the context across
  segments.

  INPUT: JSON array of {"id", "text"} pairs

  OUTPUT: Return ONLY valid JSON:
  {
    "translations": [
      { "id": "the input id", "englishText": "English translation" }
    ]
  }
"#;

/// [`Gateway`] backed by an OpenAI-compatible chat completion endpoint.
pub struct ProviderGateway {
    client: reqwest::Client,
    config: GatewayConfig,
    api_key: String,
}

impl ProviderGateway {
    /// Build a gateway reading the credential from the provider's environment variable.
    pub fn new(config: GatewayConfig) -> Result<Self, GatewayError> {
        let api_key = config.provider.validate_api_key()?;
        Self::with_api_key(config, api_key)
    }

    pub fn with_api_key(
        config: GatewayConfig,
        api_key: impl Into<String>,
    ) -> Result<Self, GatewayError> {
        let client = reqwest::Client::builder().timeout(config.timeout).build()?;
        Ok(Self {
            client,
            config,
            api_key: api_key.into(),
        })
    }

    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }

    /// Send one structured-output completion and return the message content.
    async fn complete(
        &self,
        system_prompt: &str,
        user_prompt: String,
        schema_name: &str,
        schema: Value,
    ) -> Result<String, GatewayError> {
        debug!(
            provider = self.config.provider.name(),
            model = self.config.model(),
            schema = schema_name,
            "sending completion request"
        );

        let response = self
            .client
            .post(self.config.api_url())
            .bearer_auth(&self.api_key)
            .json(&json!({
                "model": self.config.model(),
                "messages": [
                    {
                        "role": "system",
                        "content": system_prompt,
                    },
                    {
                        "role": "user",
                        "content": user_prompt,
                    },
                ],
                "response_format": {
                    "type": "json_schema",
                    "json_schema": {
                        "name": schema_name,
                        "schema": schema,
                    },
                },
                "temperature": self.config.temperature,
            }))
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            warn!(%status, "provider rejected completion request");
            return Err(GatewayError::Unavailable {
                reason: format!("{} returned {}: {}", self.config.provider.name(), status, body),
            });
        }

        extract_content(&body)
    }
}

/// Pull `choices[0].message.content` out of a chat completion body.
fn extract_content(body: &str) -> Result<String, GatewayError> {
    let response: Value = serde_json::from_str(body)?;
    response["choices"][0]["message"]["content"]
        .as_str()
        .map(str::to_string)
        .ok_or_else(|| GatewayError::ParseFailure {
            reason: format!("Invalid API response structure: {}", response),
        })
}

#[async_trait]
impl Gateway for ProviderGateway {
    async fn generate_transcripts(&self, media_name: &str) -> Result<Vec<Segment>, GatewayError> {
        let user_prompt = format!(
            "Generate a sample diarized transcript for a 30-second video called \"{}\". Create exactly {} segments.",
            media_name, self.config.segment_count
        );

        let content = self
            .complete(TRANSCRIPT_PROMPT, user_prompt, "transcript", transcript_schema())
            .await?;
        let segments = parse_transcript(&content)?;

        if segments.len() != self.config.segment_count {
            warn!(
                requested = self.config.segment_count,
                received = segments.len(),
                "provider returned a different number of segments"
            );
        }
        info!(media = media_name, segments = segments.len(), "transcript generated");

        Ok(segments)
    }

    async fn translate_segments(
        &self,
        segments: &[Segment],
    ) -> Result<Vec<Segment>, GatewayError> {
        let request: Vec<TranslationRequest> = segments.iter().map(Into::into).collect();
        let user_prompt = format!(
            "Translate the following Tamil segments to English.\n\nSegments: {}",
            serde_json::to_string(&request)?
        );

        let content = self
            .complete(TRANSLATION_PROMPT, user_prompt, "translation", translation_schema())
            .await?;
        let translations = parse_translations(&content)?;

        info!(
            requested = segments.len(),
            translated = translations.len(),
            "segments translated"
        );

        Ok(apply_translations(segments, &translations))
    }
}
