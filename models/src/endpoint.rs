use serde::{Deserialize, Serialize};

fn default_weight() -> u32 {
    1
}

/// One inference endpoint candidate for a model. The `host` field in the
/// configuration discriminates how requests are authenticated: `tgi`
/// endpoints take a static `Authorization` header value, `sagemaker`
/// endpoints are SigV4-signed with the credentials configured here.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(tag = "host", rename_all = "lowercase")]
pub enum Endpoint {
    #[serde(rename = "tgi")]
    TextGeneration {
        url: String,
        authorization: String,
        #[serde(default = "default_weight")]
        weight: u32,
    },
    Sagemaker {
        url: String,
        access_key: String,
        secret_key: String,
        #[serde(default)]
        session_token: Option<String>,
        region: String,
        #[serde(default = "default_weight")]
        weight: u32,
    },
}

impl Endpoint {
    pub fn url(&self) -> &str {
        match self {
            Endpoint::TextGeneration { url, .. } => url,
            Endpoint::Sagemaker { url, .. } => url,
        }
    }

    pub fn weight(&self) -> u32 {
        match self {
            Endpoint::TextGeneration { weight, .. } => *weight,
            Endpoint::Sagemaker { weight, .. } => *weight,
        }
    }

    pub fn requires_signing(&self) -> bool {
        matches!(self, Endpoint::Sagemaker { .. })
    }
}
