use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::GenerationError;

// The completion must be bare JSON the repair pass can extract; the example
// cube pins the expected shape of the output
pub const SYSTEM_PROMPT: &str = r#"You are a CAD engineer who creates 3d models for 3d printing.
Respond with ONLY this exact JSON (nothing else, no markdown):
{"vertices":[[-1,-1,-1],[1,-1,-1],[1,1,-1],[-1,1,-1],[-1,-1,1],[1,-1,1],[1,1,1],[-1,1,1]], "faces":[[0,1,2],[0,2,3],[4,5,6],[4,6,7],[0,1,5],[0,5,4],[1,2,6],[1,6,5],[2,3,7],[2,7,6],[3,0,4],[3,4,7]]}
Make a simple version of the object. Use 8-60 vertices. All face numbers must be correct."#;

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    stream: bool,
    options: ChatOptions,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Serialize)]
struct ChatOptions {
    temperature: f32,
    num_predict: u32,
}

#[derive(Deserialize)]
struct ChatResponse {
    message: ChatResponseMessage,
}

#[derive(Deserialize)]
struct ChatResponseMessage {
    content: String,
}

// Client for the Ollama chat endpoint. Every call carries an explicit
// timeout so a hung model cannot block a request forever.
pub struct LlmClient {
    client: reqwest::Client,
    base_url: String,
    model: String,
    timeout: Duration,
}

impl LlmClient {
    pub fn new(base_url: String, model: String, timeout: Duration) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url,
            model,
            timeout,
        }
    }

    pub async fn generate_mesh_json(&self, prompt: &str) -> Result<String, GenerationError> {
        let request = ChatRequest {
            model: &self.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: SYSTEM_PROMPT,
                },
                ChatMessage {
                    role: "user",
                    content: prompt,
                },
            ],
            stream: false,
            options: ChatOptions {
                temperature: 0.5,
                num_predict: 1200,
            },
        };

        let response = self
            .client
            .post(format!("{}/api/chat", self.base_url))
            .timeout(self.timeout)
            .json(&request)
            .send()
            .await?
            .error_for_status()?;

        let body: ChatResponse = response.json().await?;
        if body.message.content.trim().is_empty() {
            return Err(GenerationError::EmptyCompletion);
        }
        Ok(body.message.content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn system_prompt_pins_the_output_contract() {
        assert!(SYSTEM_PROMPT.contains("vertices"));
        assert!(SYSTEM_PROMPT.contains("faces"));
        assert!(SYSTEM_PROMPT.contains("ONLY"));
    }

    #[tokio::test]
    async fn unreachable_server_is_a_model_error() {
        let client = LlmClient::new(
            "http://127.0.0.1:9".to_string(),
            "llama3.2:3b".to_string(),
            Duration::from_secs(1),
        );
        let err = client.generate_mesh_json("a cube").await.unwrap_err();
        assert!(matches!(err, GenerationError::Model(_)));
    }
}
