use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use log::{info, warn};
use serde::{Serialize, Serializer};

use crate::summarize::Summarizer;
use crate::youtube::TranscriptProvider;
use crate::{Error, Result, Transcript, artifact, normalize_video_id};

/// Error returned in place of a mapping when a batch names no videos
pub const NO_VIDEO_ID: &str = "No video ID provided.";

/// Per-video result as it appears in a batch response
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum VideoOutcome {
    Summarized { transcript: String, summary: String },
    Failed { error: String },
}

impl VideoOutcome {
    pub fn is_failed(&self) -> bool {
        matches!(self, VideoOutcome::Failed { .. })
    }
}

/// Outcomes keyed by canonical video ID, kept in input order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BatchResult {
    entries: Vec<(String, VideoOutcome)>,
}

impl BatchResult {
    /// Insert an outcome; a repeated ID keeps its first position and takes the newer outcome
    pub fn insert(&mut self, video_id: String, outcome: VideoOutcome) {
        match self.entries.iter_mut().find(|(id, _)| *id == video_id) {
            Some(entry) => entry.1 = outcome,
            None => self.entries.push((video_id, outcome)),
        }
    }

    pub fn get(&self, video_id: &str) -> Option<&VideoOutcome> {
        self.entries.iter().find(|(id, _)| id == video_id).map(|(_, outcome)| outcome)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &VideoOutcome)> {
        self.entries.iter().map(|(id, outcome)| (id.as_str(), outcome))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Serialize for BatchResult {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_map(self.entries.iter().map(|(id, outcome)| (id, outcome)))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum BatchResponse {
    Rejected { error: &'static str },
    Completed(BatchResult),
}

/// Normalize, resolve and summarize videos against one provider and backend
#[derive(Debug)]
pub struct Pipeline<P> {
    provider: P,
    summarizer: Summarizer,
    save_dir: Option<PathBuf>,
}

impl<P: TranscriptProvider> Pipeline<P> {
    pub fn new(provider: P, summarizer: Summarizer) -> Self {
        Self {
            provider,
            summarizer,
            save_dir: None,
        }
    }

    /// Save each resolved transcript's snippets under `dir`
    pub fn with_artifacts(mut self, dir: impl Into<PathBuf>) -> Self {
        self.save_dir = Some(dir.into());
        self
    }

    pub fn summarizer(&self) -> &Summarizer {
        &self.summarizer
    }

    /// Fetch the transcript of a canonical ID in the first available language.
    ///
    /// An empty ID is reported as unavailable without contacting the provider.
    pub async fn resolve(&self, video_id: &str, languages: &[String]) -> Result<Transcript> {
        self.resolve_saved(video_id, languages).await.map(|(transcript, _)| transcript)
    }

    /// Like [`Pipeline::resolve`], also returning where the snippets were written, if they were
    pub async fn resolve_saved(&self, video_id: &str, languages: &[String]) -> Result<(Transcript, Option<PathBuf>)> {
        if video_id.is_empty() {
            return Err(Error::TranscriptUnavailable {
                video_id: String::new(),
                languages: languages.to_vec(),
                available: Vec::new(),
            });
        }

        let transcript = self.provider.fetch(video_id, languages).await?;
        info!(
            "Resolved transcript for {video_id}: lang={} snippets={}",
            transcript.language,
            transcript.segments.len()
        );

        let saved = self
            .save_dir
            .as_deref()
            .and_then(|dir| artifact::save_best_effort(dir, &transcript));

        Ok((transcript, saved))
    }

    /// Run resolve and summarize for one canonical ID, folding any failure into the outcome
    pub async fn process(&self, video_id: &str, languages: &[String], translate: &str) -> VideoOutcome {
        match self.try_process(video_id, languages, translate).await {
            Ok((transcript, summary)) => VideoOutcome::Summarized { transcript, summary },
            Err(e) => {
                warn!("Failed to process {video_id:?}: {e}");
                VideoOutcome::Failed { error: e.to_string() }
            }
        }
    }

    async fn try_process(&self, video_id: &str, languages: &[String], translate: &str) -> Result<(String, String)> {
        let text = self.resolve(video_id, languages).await?.text();
        let summary = self.summarizer.summarize(&text, translate).await?;
        Ok((text, summary))
    }

    /// Process every reference in order; one failure never stops the rest
    pub async fn run_batch(&self, references: &[String], languages: &[String], translate: &str) -> BatchResponse {
        if references.is_empty() {
            return BatchResponse::Rejected { error: NO_VIDEO_ID };
        }

        let mut results = BatchResult::default();
        for reference in references {
            let video_id = normalize_video_id(reference);
            let outcome = self.process(&video_id, languages, translate).await;
            results.insert(video_id, outcome);
        }
        BatchResponse::Completed(results)
    }

    /// Print progress, transcript and summary for each reference in order.
    ///
    /// Failures become an `Error processing` line on `out` and the loop moves
    /// on. Details for `verbose` go to `diag`. Returns how many items failed.
    pub async fn report<O: Write, D: Write>(
        &self,
        references: &[String],
        languages: &[String],
        translate: &str,
        verbose: bool,
        out: &mut O,
        diag: &mut D,
    ) -> io::Result<usize> {
        let mut failures = 0;
        for reference in references {
            let video_id = normalize_video_id(reference);
            writeln!(out, "\n🎬 Processing video: {video_id}")?;

            let transcript = match self.resolve_saved(&video_id, languages).await {
                Ok((transcript, saved)) => {
                    if verbose {
                        writeln!(
                            diag,
                            "Video: {} ({})\nLanguage: {}\nSegments: {}",
                            transcript.title,
                            transcript.video_id,
                            transcript.language,
                            transcript.segments.len(),
                        )?;
                        if let Some(path) = saved {
                            writeln!(diag, "Transcript saved to: {}", path.display())?;
                        }
                    }
                    transcript
                }
                Err(e) => {
                    writeln!(out, "❌ Error processing {video_id}: {e}")?;
                    failures += 1;
                    continue;
                }
            };

            let text = transcript.text();
            writeln!(out, "\n📄 Transcript content:\n{text}")?;
            writeln!(
                out,
                "\n🧠 Generating summary in {translate} using {} ({})...",
                self.summarizer.model(),
                self.summarizer.backend()
            )?;

            match self.summarizer.summarize(&text, translate).await {
                Ok(summary) => writeln!(out, "\n📚 Summary:\n{summary}")?,
                Err(e) => {
                    writeln!(out, "❌ Error processing {video_id}: {e}")?;
                    failures += 1;
                }
            }
        }
        Ok(failures)
    }
}

/// Read one reference per line, skipping blank lines.
///
/// Lines that are not valid UTF-8 are decoded lossily so they fail on their
/// own later instead of aborting the read.
pub fn read_references<R: BufRead>(reader: R) -> Vec<String> {
    let mut references = Vec::new();
    for line in reader.split(b'\n') {
        match line {
            Ok(bytes) => {
                let line = String::from_utf8_lossy(&bytes);
                let line = line.trim();
                if !line.is_empty() {
                    references.push(line.to_string());
                }
            }
            Err(e) => {
                warn!("Stopped reading references: {e}");
                break;
            }
        }
    }
    references
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ok(summary: &str) -> VideoOutcome {
        VideoOutcome::Summarized {
            transcript: "t".to_string(),
            summary: summary.to_string(),
        }
    }

    #[test]
    fn test_batch_result_serializes_in_insertion_order() {
        let mut results = BatchResult::default();
        results.insert("zzz".to_string(), ok("last letter"));
        results.insert(
            "aaa".to_string(),
            VideoOutcome::Failed {
                error: "boom".to_string(),
            },
        );

        let json = serde_json::to_string(&results).unwrap();
        assert_eq!(
            json,
            r#"{"zzz":{"transcript":"t","summary":"last letter"},"aaa":{"error":"boom"}}"#
        );
    }

    #[test]
    fn test_batch_result_duplicate_keeps_position() {
        let mut results = BatchResult::default();
        results.insert("a".to_string(), ok("first"));
        results.insert("b".to_string(), ok("other"));
        results.insert("a".to_string(), ok("second"));

        assert_eq!(results.len(), 2);
        let ids: Vec<&str> = results.iter().map(|(id, _)| id).collect();
        assert_eq!(ids, vec!["a", "b"]);
        assert_eq!(results.get("a"), Some(&ok("second")));
    }

    #[test]
    fn test_rejected_response_shape() {
        let response = BatchResponse::Rejected { error: NO_VIDEO_ID };
        assert_eq!(
            serde_json::to_value(&response).unwrap(),
            serde_json::json!({"error": "No video ID provided."})
        );
    }

    #[test]
    fn test_read_references_skips_blank_lines() {
        let input = "DQdB7wFEygo\n\n   \n  https://www.youtube.com/watch?v=abc123  \r\n";
        assert_eq!(
            read_references(input.as_bytes()),
            vec!["DQdB7wFEygo", "https://www.youtube.com/watch?v=abc123"]
        );
    }

    #[test]
    fn test_read_references_survives_invalid_utf8() {
        let input: &[u8] = b"DQdB7wFEygo\n\xff\xfe\nabc123";
        let references = read_references(input);
        assert_eq!(references.len(), 3);
        assert_eq!(references[0], "DQdB7wFEygo");
        assert_eq!(references[1], "\u{FFFD}\u{FFFD}");
        assert_eq!(references[2], "abc123");
    }
}
