//! Secondary language-model provider: a local Ollama instance.
//!
//! Only consulted when Gemini fails; takes the flattened transcript as a
//! single prompt, non-streaming.

use anyhow::Result;
use serde::Deserialize;
use serde_json::json;

pub const DEFAULT_URL: &str = "http://127.0.0.1:11434";
pub const DEFAULT_MODEL: &str = "gemma3:12b";

#[derive(Debug, Deserialize)]
struct OllamaResponse {
    response: String,
}

pub async fn generate(
    client: &reqwest::Client,
    base_url: &str,
    model: &str,
    prompt: &str,
) -> Result<String> {
    let request_body = json!({
        "model": model,
        "prompt": prompt,
        "stream": false
    });

    let response = client
        .post(format!("{}/api/generate", base_url.trim_end_matches('/')))
        .json(&request_body)
        .send()
        .await?;

    if !response.status().is_success() {
        let status = response.status();
        let error_text = response.text().await.unwrap_or_default();
        tracing::error!("Ollama API error ({status}): {error_text}");
        return Err(anyhow::anyhow!("Ollama API error: {status}"));
    }

    let ollama_response: OllamaResponse = response.json().await?;
    Ok(ollama_response.response.trim().to_string())
}
