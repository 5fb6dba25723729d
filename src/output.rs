use crate::{Segment, Transcript};

/// Render transcript as flat text, snippets joined by a single space
pub fn render_text(transcript: &Transcript) -> String {
    transcript
        .segments
        .iter()
        .map(|s| s.text.as_str())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Render snippets as a JSON array of `{text, start, duration}` records
pub fn render_json(segments: &[Segment]) -> serde_json::Result<String> {
    serde_json::to_string_pretty(segments)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_transcript() -> Transcript {
        Transcript {
            video_id: "test123".to_string(),
            title: "Test Video".to_string(),
            language: "en".to_string(),
            segments: vec![
                Segment {
                    text: "Hello world".to_string(),
                    start: 0.0,
                    duration: 1.5,
                },
                Segment {
                    text: "This is a test".to_string(),
                    start: 1.5,
                    duration: 2.0,
                },
            ],
        }
    }

    #[test]
    fn test_render_text() {
        let t = sample_transcript();
        assert_eq!(render_text(&t), "Hello world This is a test");
    }

    #[test]
    fn test_render_text_empty() {
        let t = Transcript {
            video_id: "empty".to_string(),
            title: "Empty".to_string(),
            language: "en".to_string(),
            segments: vec![],
        };
        assert_eq!(render_text(&t), "");
    }

    #[test]
    fn test_render_json_keeps_timing() {
        let t = sample_transcript();
        let json = render_json(&t.segments).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed[0]["text"], "Hello world");
        assert_eq!(parsed[1]["start"], 1.5);
        assert_eq!(parsed[1]["duration"], 2.0);
    }
}
