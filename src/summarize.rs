use log::debug;

use crate::config::{Backend, OPENAI_KEY_VAR, Settings};
use crate::language::display_name;
use crate::{Error, Result};

const OLLAMA: &str = "Ollama";
const OPENAI: &str = "OpenAI";

/// Build the instruction prompt sent verbatim to whichever backend is active
pub fn build_prompt(text: &str, output_language: &str) -> String {
    let language = display_name(output_language);
    format!(
        "Summarize the following video transcript in {language}.\n\
\n\
Do not restate the transcript. Write a structured summary in Markdown using these sections:\n\
\n\
## Key ideas\n\
The main points and arguments, as bullet points.\n\
\n\
## Tools and methods\n\
Tools, techniques, products or methods that are mentioned.\n\
\n\
## Insights\n\
Notable conclusions, lessons or recommendations.\n\
\n\
## Context\n\
Who is speaking, for which audience and in what setting, when it can be inferred.\n\
\n\
## Caveats\n\
Limitations, open disagreements, or claims that should be checked.\n\
\n\
## References\n\
Books, papers, people, links or other resources that are cited.\n\
\n\
Leave out a section when the transcript has nothing for it. The whole summary must be written in {language}.\n\
\n\
Transcript:\n\
{text}"
    )
}

/// Sends prompts to the configured backend, one request per call, no retries
#[derive(Debug, Clone)]
pub struct Summarizer {
    client: reqwest::Client,
    backend: Backend,
    model: String,
}

impl Summarizer {
    pub fn new(client: reqwest::Client, settings: &Settings) -> Self {
        Self {
            client,
            backend: settings.backend.clone(),
            model: settings.model.clone(),
        }
    }

    pub fn backend(&self) -> &Backend {
        &self.backend
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Summarize transcript text, writing the summary in `output_language`
    pub async fn summarize(&self, text: &str, output_language: &str) -> Result<String> {
        let prompt = build_prompt(text, output_language);

        match &self.backend {
            Backend::Ollama { endpoint } => self.generate_ollama(endpoint, &prompt).await,
            Backend::OpenAi { endpoint, api_key } => {
                let api_key = api_key.as_deref().ok_or(Error::MissingCredential(OPENAI_KEY_VAR))?;
                self.complete_openai(endpoint, api_key, &prompt).await
            }
        }
    }

    async fn generate_ollama(&self, endpoint: &str, prompt: &str) -> Result<String> {
        debug!("Summarizing via Ollama at {endpoint} with model {}", self.model);

        let body = serde_json::json!({
            "model": self.model,
            "prompt": prompt,
            "stream": false
        });

        let resp = self
            .client
            .post(endpoint)
            .json(&body)
            .send()
            .await
            .map_err(|e| request_failed(OLLAMA, e))?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            return Err(request_failed(OLLAMA, format!("{status}: {body}")));
        }

        let json: serde_json::Value = resp.json().await.map_err(|e| request_failed(OLLAMA, e))?;
        extract_ollama_text(&json)
    }

    async fn complete_openai(&self, endpoint: &str, api_key: &str, prompt: &str) -> Result<String> {
        debug!("Summarizing via OpenAI at {endpoint} with model {}", self.model);

        let body = serde_json::json!({
            "model": self.model,
            "messages": [
                {
                    "role": "user",
                    "content": prompt
                }
            ]
        });

        let resp = self
            .client
            .post(endpoint)
            .bearer_auth(api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| request_failed(OPENAI, e))?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            return Err(request_failed(OPENAI, format!("{status}: {body}")));
        }

        let json: serde_json::Value = resp.json().await.map_err(|e| request_failed(OPENAI, e))?;
        extract_openai_text(&json)
    }
}

fn request_failed(backend: &'static str, message: impl std::fmt::Display) -> Error {
    Error::BackendRequestFailed {
        backend,
        message: message.to_string(),
    }
}

fn extract_ollama_text(json: &serde_json::Value) -> Result<String> {
    json.get("response")
        .and_then(|r| r.as_str())
        .map(str::to_string)
        .ok_or_else(|| request_failed(OLLAMA, "unexpected response format"))
}

fn extract_openai_text(json: &serde_json::Value) -> Result<String> {
    json.get("choices")
        .and_then(|c| c.get(0))
        .and_then(|c| c.get("message"))
        .and_then(|m| m.get("content"))
        .and_then(|t| t.as_str())
        .map(|t| t.trim().to_string())
        .ok_or_else(|| request_failed(OPENAI, "unexpected response format"))
}
