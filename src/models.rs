use serde::{Deserialize, Serialize};

// Generate request body. The image field is accepted on the wire for
// compatibility but not fed into mesh synthesis.
#[derive(Deserialize, Clone, Default)]
pub struct GenerateRequest {
    #[serde(default)]
    pub prompt: String,
    #[serde(default)]
    pub image: Option<String>,
}

// Generate response format
#[derive(Serialize, Deserialize, Clone)]
pub struct GenerateResponse {
    pub success: bool,
    pub model_url: String,
    pub cached: bool,
    pub generation_time: f64,
    pub response_time: f64,
}
