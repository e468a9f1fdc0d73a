use serde::{Deserialize, Serialize};

pub mod endpoint;
pub mod picker;

pub use endpoint::Endpoint;
pub use picker::{EndpointPicker, FirstEndpointPicker, RandomEndpointPicker};

/// Sampling knobs sent to the inference endpoint alongside the prompt.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GenerationParameters {
    pub max_new_tokens: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub repetition_penalty: Option<f64>,
    pub stop: Vec<String>,
    pub temperature: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_k: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_p: Option<f64>,
    pub truncate: u32,
}

/// Per-call replacements for [`GenerationParameters`] fields. A set field
/// replaces the default wholesale; `stop` in particular is not merged with
/// the default stop list.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct GenerationOverrides {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_new_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub repetition_penalty: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stop: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_k: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_p: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub truncate: Option<u32>,
}

impl GenerationParameters {
    pub fn merged_with(&self, overrides: &GenerationOverrides) -> GenerationParameters {
        GenerationParameters {
            max_new_tokens: overrides.max_new_tokens.unwrap_or(self.max_new_tokens),
            repetition_penalty: overrides.repetition_penalty.or(self.repetition_penalty),
            stop: overrides.stop.clone().unwrap_or_else(|| self.stop.clone()),
            temperature: overrides.temperature.unwrap_or(self.temperature),
            top_k: overrides.top_k.or(self.top_k),
            top_p: overrides.top_p.or(self.top_p),
            truncate: overrides.truncate.unwrap_or(self.truncate),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PromptExample {
    pub prompt: String,
    pub title: String,
}

/// A served model: public display metadata, default generation parameters,
/// and the endpoint candidates requests are dispatched to. Endpoints carry
/// credentials and are never serialized back out.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ModelConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dataset_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dataset_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(default, skip_serializing)]
    pub endpoints: Vec<Endpoint>,
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model_url: Option<String>,
    pub name: String,
    pub parameters: GenerationParameters,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preprompt: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub prompt_examples: Vec<PromptExample>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub website_url: Option<String>,
}

/// A model that is no longer served but may still be referenced by stored
/// conversations.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct OldModel {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    pub id: String,
    pub name: String,
}
