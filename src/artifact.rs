use std::path::{Path, PathBuf};

use eyre::Result;
use log::{debug, warn};

use crate::Transcript;
use crate::output::render_json;

pub fn artifact_path(dir: &Path, video_id: &str) -> PathBuf {
    dir.join(format!("transcript-{video_id}.json"))
}

/// Write the raw snippets of a transcript next to other runs' artifacts.
pub fn save(dir: &Path, transcript: &Transcript) -> Result<PathBuf> {
    let path = artifact_path(dir, &transcript.video_id);
    std::fs::create_dir_all(dir)?;
    let data = render_json(&transcript.segments)?;
    std::fs::write(&path, data)?;
    debug!("Saved transcript: {}", path.display());
    Ok(path)
}

/// Like [`save`], but a failure is logged and swallowed.
pub fn save_best_effort(dir: &Path, transcript: &Transcript) -> Option<PathBuf> {
    match save(dir, transcript) {
        Ok(path) => Some(path),
        Err(e) => {
            warn!("Could not save transcript for {}: {e}", transcript.video_id);
            None
        }
    }
}
