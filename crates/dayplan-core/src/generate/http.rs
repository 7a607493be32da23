//! HTTP generator for text-generation-inference style servers.
//!
//! Posts to `{endpoint}/generate` and reads `generated_text` from the reply,
//! accepting either a single object or a one-element array.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{GenerationError, GenerationRequest, GenerationResponse, Generator};

/// Input-token limit sent when the request allows truncation.
const TRUNCATE_INPUT_TOKENS: usize = 1024;
/// Longest error body kept in [`GenerationError::Status`].
const MAX_ERROR_BODY_CHARS: usize = 2_000;

/// HTTP generator configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HttpGeneratorConfig {
    /// Base URL of the service, without the `/generate` path.
    pub endpoint: String,
    /// Optional bearer token.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    /// Client-side request timeout in seconds.
    pub timeout_secs: u64,
}

impl HttpGeneratorConfig {
    pub const DEFAULT_ENDPOINT: &str = "http://localhost:8080";
}

impl Default for HttpGeneratorConfig {
    fn default() -> Self {
        Self {
            endpoint: Self::DEFAULT_ENDPOINT.to_string(),
            api_key: None,
            timeout_secs: 120,
        }
    }
}

/// Generator backed by an HTTP text generation endpoint.
pub struct HttpGenerator {
    client: reqwest::Client,
    config: HttpGeneratorConfig,
}

impl std::fmt::Debug for HttpGenerator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpGenerator")
            .field("endpoint", &self.config.endpoint)
            .finish()
    }
}

impl HttpGenerator {
    pub fn new(config: HttpGeneratorConfig) -> Result<Self, GenerationError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| GenerationError::Http(e.to_string()))?;
        Ok(Self { client, config })
    }

    fn generate_url(&self) -> String {
        format!("{}/generate", self.config.endpoint.trim_end_matches('/'))
    }
}

// Wire types

#[derive(Debug, Serialize)]
struct WireRequest<'a> {
    inputs: &'a str,
    parameters: WireParameters,
}

#[derive(Debug, Serialize)]
struct WireParameters {
    max_new_tokens: usize,
    temperature: f32,
    top_p: f32,
    do_sample: bool,
    return_full_text: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    truncate: Option<usize>,
}

#[derive(Debug, Deserialize)]
struct WireGenerated {
    generated_text: String,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum WireResponse {
    Single(WireGenerated),
    Batch(Vec<WireGenerated>),
}

impl<'a> WireRequest<'a> {
    fn from_request(request: &'a GenerationRequest) -> Self {
        Self {
            inputs: &request.prompt,
            parameters: WireParameters {
                max_new_tokens: request.max_output_length,
                temperature: request.temperature,
                top_p: request.top_p,
                do_sample: true,
                return_full_text: false,
                truncate: request.truncate.then_some(TRUNCATE_INPUT_TOKENS),
            },
        }
    }
}

/// Extract the completion text from a response body.
fn parse_generate_body(body: &str) -> Result<GenerationResponse, GenerationError> {
    let parsed: WireResponse = serde_json::from_str(body)
        .map_err(|e| GenerationError::MalformedResponse(e.to_string()))?;
    let text = match parsed {
        WireResponse::Single(generated) => generated.generated_text,
        WireResponse::Batch(mut batch) => {
            if batch.is_empty() {
                return Err(GenerationError::MalformedResponse(
                    "empty completion list".to_string(),
                ));
            }
            batch.swap_remove(0).generated_text
        }
    };
    Ok(GenerationResponse { text })
}

#[async_trait]
impl Generator for HttpGenerator {
    fn name(&self) -> &str {
        "http"
    }

    async fn generate(
        &self,
        request: &GenerationRequest,
    ) -> Result<GenerationResponse, GenerationError> {
        let url = self.generate_url();
        debug!(url = %url, prompt_chars = request.prompt.len(), "sending generation request");

        let mut builder = self
            .client
            .post(&url)
            .json(&WireRequest::from_request(request));
        if let Some(key) = &self.config.api_key {
            builder = builder.bearer_auth(key);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| GenerationError::Http(e.to_string()))?;
        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| GenerationError::Http(e.to_string()))?;

        if !status.is_success() {
            return Err(GenerationError::Status {
                status: status.as_u16(),
                body: body.chars().take(MAX_ERROR_BODY_CHARS).collect(),
            });
        }
        parse_generate_body(&body)
    }
}
