use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("no transcript for video '{video_id}' in any of [{}] (available: [{}])", languages.join(", "), available.join(", "))]
    TranscriptUnavailable {
        video_id: String,
        languages: Vec<String>,
        available: Vec<String>,
    },

    #[error("transcript provider error: {0}")]
    TranscriptProvider(String),

    #[error("unsupported LLM backend: {0:?} (expected \"ollama\" or \"openai\")")]
    UnsupportedBackend(String),

    #[error("{0} is not set in the environment")]
    MissingCredential(&'static str),

    #[error("{backend} API call failed: {message}")]
    BackendRequestFailed { backend: &'static str, message: String },

    #[error("invalid config: {0}")]
    Config(String),
}

impl Error {
    /// Convenience for the transcript fetch path, where any transport failure is a provider error
    pub(crate) fn provider(err: impl std::fmt::Display) -> Self {
        Error::TranscriptProvider(err.to_string())
    }
}
