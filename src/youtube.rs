use std::future::Future;

use log::debug;
use regex::Regex;
use serde::Deserialize;

use crate::{Error, Result, Segment, Transcript};

const USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/131.0.0.0 Safari/537.36";

/// Kind marker YouTube puts on auto-generated caption tracks
const GENERATED_KIND: &str = "asr";

/// Source of timed transcripts for a video.
///
/// Implementations pick the first language in `languages` that has a track
/// and fail with [`Error::TranscriptUnavailable`] when none does.
pub trait TranscriptProvider {
    fn fetch(&self, video_id: &str, languages: &[String]) -> impl Future<Output = Result<Transcript>> + Send;
}

#[derive(Debug, Deserialize)]
struct InnerTubePlayerResponse {
    captions: Option<CaptionsData>,
    #[serde(rename = "videoDetails")]
    video_details: Option<VideoDetails>,
}

#[derive(Debug, Deserialize)]
struct VideoDetails {
    title: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CaptionsData {
    #[serde(rename = "playerCaptionsTracklistRenderer")]
    player_captions_tracklist_renderer: Option<CaptionTracklistRenderer>,
}

#[derive(Debug, Deserialize)]
struct CaptionTracklistRenderer {
    #[serde(rename = "captionTracks")]
    caption_tracks: Option<Vec<CaptionTrack>>,
}

#[derive(Debug, Clone, Deserialize)]
struct CaptionTrack {
    #[serde(rename = "baseUrl")]
    base_url: String,
    #[serde(rename = "languageCode")]
    language_code: String,
    kind: Option<String>,
}

impl CaptionTrack {
    fn is_generated(&self) -> bool {
        self.kind.as_deref() == Some(GENERATED_KIND)
    }
}

/// Fetches captions through YouTube's InnerTube player API
#[derive(Debug, Clone, Default)]
pub struct YouTubeProvider {
    client: reqwest::Client,
}

impl YouTubeProvider {
    pub fn new(client: reqwest::Client) -> Self {
        Self { client }
    }

    async fn player_response(&self, video_id: &str, hl: &str) -> Result<InnerTubePlayerResponse> {
        // Step 1: Fetch the watch page to get the InnerTube API key
        let watch_url = format!("https://www.youtube.com/watch?v={video_id}");
        debug!("Fetching watch page: {watch_url}");

        let page_html = self
            .client
            .get(&watch_url)
            .header("User-Agent", USER_AGENT)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(Error::provider)?
            .text()
            .await
            .map_err(Error::provider)?;

        let api_key = extract_api_key(&page_html)?;
        debug!("Extracted InnerTube API key: {api_key}");

        // Step 2: Call InnerTube player endpoint
        let player_url = format!("https://www.youtube.com/youtubei/v1/player?key={api_key}&prettyPrint=false");

        let body = serde_json::json!({
            "context": {
                "client": {
                    "hl": hl,
                    "gl": "US",
                    "clientName": "WEB",
                    "clientVersion": "2.20241126.01.00"
                }
            },
            "videoId": video_id
        });

        self.client
            .post(&player_url)
            .header("User-Agent", USER_AGENT)
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(Error::provider)?
            .json()
            .await
            .map_err(Error::provider)
    }
}

impl TranscriptProvider for YouTubeProvider {
    async fn fetch(&self, video_id: &str, languages: &[String]) -> Result<Transcript> {
        let hl = languages.first().map(String::as_str).unwrap_or("en");
        let resp = self.player_response(video_id, hl).await?;

        let title = resp
            .video_details
            .as_ref()
            .and_then(|vd| vd.title.clone())
            .unwrap_or_default();

        let tracks = resp
            .captions
            .and_then(|c| c.player_captions_tracklist_renderer)
            .and_then(|r| r.caption_tracks)
            .unwrap_or_default();

        let track = select_track(&tracks, languages).ok_or_else(|| Error::TranscriptUnavailable {
            video_id: video_id.to_string(),
            languages: languages.to_vec(),
            available: tracks.iter().map(|t| t.language_code.clone()).collect(),
        })?;
        debug!(
            "Using caption track: lang={} generated={}",
            track.language_code,
            track.is_generated()
        );

        // Step 3: Fetch the caption XML
        let caption_xml = self
            .client
            .get(&track.base_url)
            .header("User-Agent", USER_AGENT)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(Error::provider)?
            .text()
            .await
            .map_err(Error::provider)?;

        let segments = parse_caption_xml(&caption_xml)?;

        Ok(Transcript {
            video_id: video_id.to_string(),
            title,
            language: track.language_code.clone(),
            segments,
        })
    }
}

/// Pick the first requested language with a track, manual captions before generated ones
fn select_track<'a>(tracks: &'a [CaptionTrack], languages: &[String]) -> Option<&'a CaptionTrack> {
    languages.iter().find_map(|lang| {
        let (generated, manual): (Vec<&CaptionTrack>, Vec<&CaptionTrack>) = tracks
            .iter()
            .filter(|t| &t.language_code == lang)
            .partition(|t| t.is_generated());
        manual.into_iter().next().or_else(|| generated.into_iter().next())
    })
}

fn extract_api_key(html: &str) -> Result<String> {
    let re = Regex::new(r#""INNERTUBE_API_KEY"\s*:\s*"([^"]+)""#).map_err(Error::provider)?;
    if let Some(caps) = re.captures(html) {
        return Ok(caps[1].to_string());
    }

    // Fallback: try the newer pattern
    let re2 = Regex::new(r#"innertubeApiKey\s*[=:]\s*"([^"]+)""#).map_err(Error::provider)?;
    if let Some(caps) = re2.captures(html) {
        return Ok(caps[1].to_string());
    }

    Err(Error::TranscriptProvider(
        "could not extract InnerTube API key from watch page".to_string(),
    ))
}

fn parse_caption_xml(xml: &str) -> Result<Vec<Segment>> {
    use quick_xml::Reader;
    use quick_xml::events::Event;

    let mut reader = Reader::from_str(xml);
    let mut segments = Vec::new();
    let mut current_start: Option<f64> = None;
    let mut current_dur: Option<f64> = None;

    loop {
        match reader.read_event() {
            Ok(Event::Start(ref e)) if e.name().as_ref() == b"text" => {
                current_start = None;
                current_dur = None;
                for attr in e.attributes().flatten() {
                    match attr.key.as_ref() {
                        b"start" => current_start = String::from_utf8_lossy(&attr.value).parse::<f64>().ok(),
                        b"dur" => current_dur = String::from_utf8_lossy(&attr.value).parse::<f64>().ok(),
                        _ => {}
                    }
                }
            }
            Ok(Event::Text(ref e)) => {
                if let Some(start) = current_start.take() {
                    // Some tracks omit `dur` on the final cue
                    let duration = current_dur.take().unwrap_or_default();
                    let raw_text = e.unescape().unwrap_or_default().to_string();
                    let text = html_escape::decode_html_entities(&raw_text).trim().to_string();
                    if !text.is_empty() {
                        segments.push(Segment { text, start, duration });
                    }
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(Error::TranscriptProvider(format!("error parsing caption XML: {e}"))),
            _ => {}
        }
    }

    Ok(segments)
}
