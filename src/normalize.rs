use regex::Regex;
use serde::Deserialize;

// json3 caption document: {"events":[{"segs":[{"utf8":"..."}]}]}
#[derive(Debug, Deserialize)]
struct SegmentDoc {
    #[serde(default)]
    events: Vec<CaptionEvent>,
}

#[derive(Debug, Deserialize)]
struct CaptionEvent {
    #[serde(default)]
    segs: Vec<CaptionSeg>,
}

#[derive(Debug, Deserialize)]
struct CaptionSeg {
    utf8: Option<String>,
}

/// Classified caption payload.
///
/// `Segments` is the structured json3 document; `Cues` is the line-oriented
/// timed-subtitle fallback. Every payload classifies as one of the two, so
/// normalization never fails: a json3 parse error is the trigger for the cue
/// path, not an error.
#[derive(Debug, PartialEq, Eq)]
pub enum ParsedPayload {
    Segments(Vec<String>),
    Cues(Vec<String>),
}

/// Classify a raw caption payload by attempting the json3 parse first.
pub fn classify(payload: &str) -> ParsedPayload {
    if let Ok(doc) = serde_json::from_str::<SegmentDoc>(payload) {
        let texts = doc
            .events
            .into_iter()
            .flat_map(|event| event.segs)
            .filter_map(|seg| seg.utf8)
            .filter(|text| !text.is_empty())
            .collect();
        return ParsedPayload::Segments(texts);
    }

    let timestamp = Regex::new(r"^\d+:\d+:\d+\.\d+").unwrap();
    let cue_index = Regex::new(r"^\d+$").unwrap();

    let lines = payload
        .lines()
        .filter(|line| {
            let line = line.trim();
            !line.is_empty() && !timestamp.is_match(line) && !cue_index.is_match(line)
        })
        .map(|line| line.to_string())
        .collect();
    ParsedPayload::Cues(lines)
}

/// Flatten a raw caption payload (json3 or timed-subtitle) to plain text.
/// Timestamp lines and cue-index lines never survive; idempotent on text
/// that is already plain.
pub fn normalize(payload: &str) -> String {
    match classify(payload) {
        ParsedPayload::Segments(texts) => texts.join(" "),
        ParsedPayload::Cues(lines) => lines.join(" "),
    }
}

/// Detect an anti-automation/error page returned in place of caption data.
pub fn is_error_page(text: &str) -> bool {
    let lower = text.trim().to_lowercase();
    lower.starts_with("<html") || lower.contains("<head>")
}
