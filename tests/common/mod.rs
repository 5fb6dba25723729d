#![allow(dead_code)]

use std::collections::HashMap;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::routing::post;
use axum::{Json, Router};
use serde_json::{Value, json};
use ytsum::config::{Backend, Settings};
use ytsum::youtube::TranscriptProvider;
use ytsum::{Error, Result, Segment, Transcript};

// ─── Transcript provider ─────────────────────────────────────────────────────

#[derive(Clone, Default)]
pub struct MockProvider {
    /// video ID -> (track language, snippet texts)
    pub tracks: HashMap<String, (String, Vec<String>)>,
    pub calls: Arc<Mutex<Vec<(String, Vec<String>)>>>,
}

impl MockProvider {
    pub fn with_track(mut self, video_id: &str, language: &str, snippets: &[&str]) -> Self {
        self.tracks.insert(
            video_id.to_string(),
            (language.to_string(), snippets.iter().map(|s| s.to_string()).collect()),
        );
        self
    }
}

impl TranscriptProvider for MockProvider {
    async fn fetch(&self, video_id: &str, languages: &[String]) -> Result<Transcript> {
        self.calls
            .lock()
            .unwrap()
            .push((video_id.to_string(), languages.to_vec()));

        match self.tracks.get(video_id) {
            Some((language, snippets)) if languages.contains(language) => Ok(Transcript {
                video_id: video_id.to_string(),
                title: format!("Video {video_id}"),
                language: language.clone(),
                segments: snippets
                    .iter()
                    .enumerate()
                    .map(|(i, text)| Segment {
                        text: text.clone(),
                        start: i as f64 * 2.0,
                        duration: 2.0,
                    })
                    .collect(),
            }),
            Some((language, _)) => Err(Error::TranscriptUnavailable {
                video_id: video_id.to_string(),
                languages: languages.to_vec(),
                available: vec![language.clone()],
            }),
            None => Err(Error::TranscriptUnavailable {
                video_id: video_id.to_string(),
                languages: languages.to_vec(),
                available: Vec::new(),
            }),
        }
    }
}

// ─── LLM backends ────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct Recorded {
    pub path: &'static str,
    pub body: Value,
    pub authorization: Option<String>,
}

type Requests = Arc<Mutex<Vec<Recorded>>>;

/// Local HTTP server standing in for both Ollama and OpenAI
pub struct MockLlm {
    pub addr: SocketAddr,
    pub requests: Requests,
}

impl MockLlm {
    pub async fn spawn() -> Self {
        let requests: Requests = Arc::new(Mutex::new(Vec::new()));
        let app = Router::new()
            .route("/api/generate", post(ollama))
            .route("/v1/chat/completions", post(openai))
            .route("/broken/api/generate", post(broken))
            .with_state(requests.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self { addr, requests }
    }

    pub fn url(&self, path: &str) -> String {
        format!("http://{}{path}", self.addr)
    }

    pub fn ollama(&self) -> Backend {
        Backend::Ollama {
            endpoint: self.url("/api/generate"),
        }
    }

    pub fn broken_ollama(&self) -> Backend {
        Backend::Ollama {
            endpoint: self.url("/broken/api/generate"),
        }
    }

    pub fn openai(&self, api_key: Option<&str>) -> Backend {
        Backend::OpenAi {
            endpoint: self.url("/v1/chat/completions"),
            api_key: api_key.map(str::to_string),
        }
    }

    pub fn recorded(&self) -> Vec<Recorded> {
        self.requests.lock().unwrap().clone()
    }
}

fn record(requests: &Requests, path: &'static str, headers: &HeaderMap, body: Value) {
    let authorization = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    requests.lock().unwrap().push(Recorded {
        path,
        body,
        authorization,
    });
}

async fn ollama(State(requests): State<Requests>, headers: HeaderMap, Json(body): Json<Value>) -> Json<Value> {
    let model = body["model"].clone();
    record(&requests, "/api/generate", &headers, body);
    Json(json!({ "model": model, "response": "ollama summary", "done": true }))
}

async fn openai(State(requests): State<Requests>, headers: HeaderMap, Json(body): Json<Value>) -> Json<Value> {
    record(&requests, "/v1/chat/completions", &headers, body);
    Json(json!({
        "choices": [
            { "message": { "role": "assistant", "content": "  openai summary\n" } }
        ]
    }))
}

async fn broken(State(requests): State<Requests>, headers: HeaderMap, Json(body): Json<Value>) -> (StatusCode, &'static str) {
    record(&requests, "/broken/api/generate", &headers, body);
    (StatusCode::INTERNAL_SERVER_ERROR, "model exploded")
}

pub fn settings(backend: Backend) -> Settings {
    Settings {
        backend,
        model: "test-model".to_string(),
        languages: vec!["en".to_string()],
        translate: "en".to_string(),
        transcript_dir: PathBuf::from("."),
    }
}
