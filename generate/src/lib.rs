//! Completion fetcher: sends a prompt to one of a model's configured
//! inference endpoints, consumes the streamed response, and cleans the
//! generated text for display.

use futures_util::StreamExt;
use models::{
    Endpoint, EndpointPicker, GenerationOverrides, GenerationParameters, ModelConfig,
    RandomEndpointPicker,
};
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;
use tracing::debug;

mod decoder;
mod error;
mod sign;
mod trim;

pub use decoder::StreamDecoder;
pub use error::GenerateError;
pub use trim::{DEFAULT_SEP_TOKEN, END_OF_TEXT_TOKEN, START_OF_TEXT_TOKEN, clean_generated_text};

#[derive(Serialize)]
struct GenerateRequest<'a> {
    #[serde(flatten)]
    parameters: &'a GenerationParameters,
    /// Asks the server not to echo the prompt. Always forced on; a caller
    /// override cannot turn it back off.
    return_full_text: bool,
    inputs: &'a str,
}

#[derive(Deserialize)]
struct GeneratedText {
    generated_text: String,
}

/// Fetches completions for one model. Holds no per-call state; every
/// [`Generator::generate`] call is a single independent request.
pub struct Generator {
    client: reqwest::Client,
    model: ModelConfig,
    picker: Box<dyn EndpointPicker>,
    sep_token: String,
}

impl Generator {
    pub fn new(model: ModelConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            model,
            picker: Box::new(RandomEndpointPicker),
            sep_token: DEFAULT_SEP_TOKEN.to_string(),
        }
    }

    /// Replaces the endpoint selection strategy. Tests use this to pin the
    /// request to a known endpoint.
    pub fn with_picker(mut self, picker: Box<dyn EndpointPicker>) -> Self {
        self.picker = picker;
        self
    }

    pub fn with_sep_token(mut self, sep_token: impl Into<String>) -> Self {
        self.sep_token = sep_token.into();
        self
    }

    pub fn model(&self) -> &ModelConfig {
        &self.model
    }

    /// Requests a completion for `prompt` and returns the cleaned text.
    ///
    /// Defaults from the model profile are overwritten field-by-field by
    /// `overrides`. Exactly one outbound request is made; there are no
    /// retries. Cancelling `cancel` aborts the request or the body read and
    /// surfaces [`GenerateError::Cancelled`].
    pub async fn generate(
        &self,
        prompt: &str,
        overrides: Option<&GenerationOverrides>,
        cancel: CancellationToken,
    ) -> Result<String, GenerateError> {
        let parameters = match overrides {
            Some(overrides) => self.model.parameters.merged_with(overrides),
            None => self.model.parameters.clone(),
        };

        let endpoint = self
            .picker
            .pick(&self.model.endpoints)
            .ok_or(GenerateError::NoEndpoint)?;

        let body = serde_json::to_string(&GenerateRequest {
            parameters: &parameters,
            return_full_text: false,
            inputs: prompt,
        })?;

        let request = match endpoint {
            Endpoint::Sagemaker {
                url,
                access_key,
                secret_key,
                session_token,
                region,
                ..
            } => sign::signed_request(
                url,
                region,
                access_key,
                secret_key,
                session_token.as_deref(),
                body,
            )?,
            Endpoint::TextGeneration {
                url, authorization, ..
            } => self
                .client
                .post(url)
                .header(CONTENT_TYPE, "application/json")
                .header(AUTHORIZATION, authorization)
                .body(body)
                .build()?,
        };

        debug!(
            model = %self.model.id,
            url = %endpoint.url(),
            signed = endpoint.requires_signing(),
            "sending generation request"
        );

        let response = tokio::select! {
            _ = cancel.cancelled() => return Err(GenerateError::Cancelled),
            response = self.client.execute(request) => response?,
        };

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(GenerateError::Endpoint {
                status: status.as_u16(),
                body,
            });
        }

        // The body arrives as a byte stream; chunk boundaries can split
        // multi-byte characters, so decoding carries state across chunks.
        // The stream is dropped on every exit path below.
        let mut stream = response.bytes_stream();
        let mut decoder = StreamDecoder::new();
        let mut raw = String::new();
        loop {
            let chunk = tokio::select! {
                _ = cancel.cancelled() => return Err(GenerateError::Cancelled),
                chunk = stream.next() => chunk,
            };
            match chunk {
                Some(chunk) => decoder.decode(&chunk?, &mut raw),
                None => break,
            }
        }
        decoder.finish(&mut raw);

        if raw.is_empty() {
            return Err(GenerateError::EmptyResponse);
        }

        let outputs: Vec<GeneratedText> = serde_json::from_str(&raw)
            .map_err(|e| GenerateError::MalformedResponse(e.to_string()))?;
        let first = outputs
            .into_iter()
            .next()
            .ok_or_else(|| GenerateError::MalformedResponse("response array is empty".into()))?;

        debug!(model = %self.model.id, "generation complete");

        Ok(clean_generated_text(
            &first.generated_text,
            prompt,
            &self.sep_token,
            &parameters.stop,
        ))
    }
}
