pub mod config;
pub mod fetch;
pub mod normalize;
pub mod output;
pub mod summarize;
pub mod youtube;
pub mod ytdlp;

use serde::Serialize;

/// Where a transcript came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TranscriptSource {
    CaptionApi,
    SubtitleTrack,
    Upload,
}

/// Flattened plain-text transcript for a video.
///
/// `text` never contains timestamp lines or cue-index lines; timing
/// information is discarded when the transcript is produced.
#[derive(Debug, Clone, Serialize)]
pub struct Transcript {
    pub video_id: String,
    pub title: String,
    pub language: String,
    pub source: TranscriptSource,
    pub text: String,
}

/// Result of running the caption-fetch chain.
///
/// `Unavailable` is a normal outcome, not an error: the caller is expected
/// to offer the manual-upload path. `Blocked` means an anti-automation page
/// came back instead of captions and warrants different retry advice.
#[derive(Debug)]
pub enum FetchOutcome {
    Success(Transcript),
    Unavailable { available: Vec<String> },
    Blocked,
}

impl std::fmt::Display for TranscriptSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TranscriptSource::CaptionApi => write!(f, "caption-api"),
            TranscriptSource::SubtitleTrack => write!(f, "subtitle-track"),
            TranscriptSource::Upload => write!(f, "upload"),
        }
    }
}

/// Extract video ID from various YouTube URL formats
pub fn extract_video_id(input: &str) -> Option<String> {
    let input = input.trim();

    // Bare 11-character video ID
    if regex::Regex::new(r"^[a-zA-Z0-9_-]{11}$").unwrap().is_match(input) {
        return Some(input.to_string());
    }

    // watch?v=ID — any host, matching the v= query parameter wherever it appears
    if let Some(caps) = regex::Regex::new(r"[?&]v=([a-zA-Z0-9_-]{11})")
        .unwrap()
        .captures(input)
    {
        return Some(caps[1].to_string());
    }

    // youtu.be/ID
    if let Some(caps) = regex::Regex::new(r"youtu\.be/([a-zA-Z0-9_-]{11})")
        .unwrap()
        .captures(input)
    {
        return Some(caps[1].to_string());
    }

    // youtube.com/embed/ID
    if let Some(caps) = regex::Regex::new(r"youtube\.com/embed/([a-zA-Z0-9_-]{11})")
        .unwrap()
        .captures(input)
    {
        return Some(caps[1].to_string());
    }

    // youtube.com/shorts/ID
    if let Some(caps) = regex::Regex::new(r"youtube\.com/shorts/([a-zA-Z0-9_-]{11})")
        .unwrap()
        .captures(input)
    {
        return Some(caps[1].to_string());
    }

    None
}
