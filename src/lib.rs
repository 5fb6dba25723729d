pub mod artifact;
pub mod config;
pub mod error;
pub mod language;
pub mod logging;
pub mod output;
pub mod pipeline;
pub mod server;
pub mod summarize;
pub mod youtube;

pub use error::{Error, Result};

use reqwest::Url;
use serde::{Deserialize, Serialize};

/// Marker that identifies a watch URL rather than a bare video ID
const YOUTUBE_DOMAIN: &str = "youtube.com";

/// Query parameter carrying the video ID on watch URLs
const VIDEO_ID_PARAM: &str = "v";

/// A single timed transcript snippet
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    pub text: String,
    pub start: f64,
    pub duration: f64,
}

/// Complete transcript for a video, in the language track that was selected
#[derive(Debug, Clone, Serialize)]
pub struct Transcript {
    pub video_id: String,
    pub title: String,
    pub language: String,
    pub segments: Vec<Segment>,
}

impl Transcript {
    /// Flattened transcript text, snippets joined by a single space
    pub fn text(&self) -> String {
        output::render_text(self)
    }
}

/// Turn a watch URL or bare ID into the canonical video ID.
///
/// Inputs mentioning the YouTube domain are parsed as URLs and yield the value
/// of the `v` query parameter, or an empty string when it is missing. Anything
/// else is taken to already be an ID and is returned as-is. Never fails.
pub fn normalize_video_id(input: &str) -> String {
    let input = input.trim();

    if !input.contains(YOUTUBE_DOMAIN) {
        return input.to_string();
    }

    let url = Url::parse(input).or_else(|_| Url::parse(&format!("https://{input}")));

    match url {
        Ok(url) => url
            .query_pairs()
            .find(|(key, _)| key == VIDEO_ID_PARAM)
            .map(|(_, value)| value.into_owned())
            .unwrap_or_default(),
        Err(_) => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_watch_url() {
        assert_eq!(normalize_video_id("https://www.youtube.com/watch?v=DQdB7wFEygo"), "DQdB7wFEygo");
    }

    #[test]
    fn test_watch_url_with_time_offset() {
        assert_eq!(
            normalize_video_id("https://www.youtube.com/watch?v=DQdB7wFEygo&t=48s"),
            "DQdB7wFEygo"
        );
    }

    #[test]
    fn test_watch_url_param_order() {
        assert_eq!(
            normalize_video_id("https://www.youtube.com/watch?t=48s&list=PL123&v=DQdB7wFEygo"),
            "DQdB7wFEygo"
        );
    }

    #[test]
    fn test_bare_video_id() {
        assert_eq!(normalize_video_id("DQdB7wFEygo"), "DQdB7wFEygo");
    }

    #[test]
    fn test_watch_url_without_id() {
        assert_eq!(normalize_video_id("https://www.youtube.com/watch?t=48s"), "");
    }

    #[test]
    fn test_url_without_scheme() {
        assert_eq!(normalize_video_id("www.youtube.com/watch?v=DQdB7wFEygo"), "DQdB7wFEygo");
    }

    #[test]
    fn test_mobile_domain() {
        assert_eq!(normalize_video_id("https://m.youtube.com/watch?v=DQdB7wFEygo"), "DQdB7wFEygo");
    }

    #[test]
    fn test_whitespace_trimming() {
        assert_eq!(normalize_video_id("  DQdB7wFEygo  "), "DQdB7wFEygo");
    }

    #[test]
    fn test_malformed_id_passes_through() {
        assert_eq!(normalize_video_id("not-a-valid-id"), "not-a-valid-id");
    }

    #[test]
    fn test_idempotent() {
        let inputs = [
            "https://www.youtube.com/watch?v=DQdB7wFEygo&t=48s",
            "DQdB7wFEygo",
            "https://www.youtube.com/watch?t=48s",
            "",
        ];
        for input in inputs {
            let once = normalize_video_id(input);
            assert_eq!(normalize_video_id(&once), once, "input: {input}");
        }
    }

    #[test]
    fn test_transcript_text_joins_with_space() {
        let transcript = Transcript {
            video_id: "abc".to_string(),
            title: String::new(),
            language: "en".to_string(),
            segments: vec![
                Segment {
                    text: "Hello".to_string(),
                    start: 0.0,
                    duration: 1.0,
                },
                Segment {
                    text: "world".to_string(),
                    start: 1.0,
                    duration: 1.0,
                },
            ],
        };
        assert_eq!(transcript.text(), "Hello world");
    }
}
