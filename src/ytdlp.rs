use std::collections::BTreeMap;
use std::process::Command;

use eyre::{Result, bail};
use log::debug;
use serde::Deserialize;

use crate::fetch::StrategyOutcome;
use crate::normalize::{is_error_page, normalize};
use crate::youtube::USER_AGENT;
use crate::{Transcript, TranscriptSource};

#[derive(Debug, Default, Deserialize)]
struct VideoInfo {
    #[serde(default)]
    title: String,
    #[serde(default)]
    subtitles: BTreeMap<String, Vec<SubtitleTrack>>,
    #[serde(default)]
    automatic_captions: BTreeMap<String, Vec<SubtitleTrack>>,
}

#[derive(Debug, Deserialize)]
struct SubtitleTrack {
    url: String,
    #[serde(default)]
    ext: String,
}

/// Secondary strategy: extract subtitle-track metadata via yt-dlp, fetch the
/// raw payload for the requested language, and normalize it to plain text.
pub async fn fetch_subtitles(client: &reqwest::Client, video_id: &str, lang: &str) -> Result<StrategyOutcome> {
    let info = dump_video_info(video_id)?;

    // Manually authored tracks win over auto-generated ones
    let Some(track) = info
        .subtitles
        .get(lang)
        .and_then(|tracks| select_track(tracks))
        .or_else(|| info.automatic_captions.get(lang).and_then(|tracks| select_track(tracks)))
    else {
        let available = subtitle_languages(&info);
        debug!("No subtitle track for lang={lang}, available: {available:?}");
        return Ok(StrategyOutcome::NoTrack { available });
    };

    debug!("Fetching subtitle payload: ext={} url={}", track.ext, track.url);

    let payload = client
        .get(&track.url)
        .header("User-Agent", USER_AGENT)
        .send()
        .await?
        .error_for_status()?
        .text()
        .await?;

    payload_outcome(&payload, video_id, &info.title, lang)
}

/// Classify a fetched subtitle payload: blocked page, normalized transcript,
/// or failure when no text survives normalization.
fn payload_outcome(payload: &str, video_id: &str, title: &str, lang: &str) -> Result<StrategyOutcome> {
    if is_error_page(payload) {
        return Ok(StrategyOutcome::Blocked);
    }

    let text = normalize(payload);
    if text.is_empty() {
        bail!("subtitle track for video {video_id} yielded no text");
    }

    Ok(StrategyOutcome::Success(Transcript {
        video_id: video_id.to_string(),
        title: title.to_string(),
        language: lang.to_string(),
        source: TranscriptSource::SubtitleTrack,
        text,
    }))
}

fn dump_video_info(video_id: &str) -> Result<VideoInfo> {
    let url = format!("https://www.youtube.com/watch?v={video_id}");
    debug!("Extracting video info via yt-dlp: {url}");

    let output = Command::new("yt-dlp")
        .args(["--dump-json", "--skip-download", "--no-playlist", &url])
        .output();

    let output = match output {
        Ok(o) => o,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            bail!(
                "yt-dlp not found. Install it to enable the subtitle-track fallback:\n  \
                 pip install yt-dlp\n  \
                 or: brew install yt-dlp"
            );
        }
        Err(e) => bail!("failed to run yt-dlp: {e}"),
    };

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        bail!("yt-dlp exited with status {}: {}", output.status, stderr.trim());
    }

    Ok(serde_json::from_slice(&output.stdout)?)
}

/// Prefer payload formats the normalizer knows: json3, then vtt, then
/// whatever comes first.
fn select_track(tracks: &[SubtitleTrack]) -> Option<&SubtitleTrack> {
    tracks
        .iter()
        .find(|t| t.ext == "json3")
        .or_else(|| tracks.iter().find(|t| t.ext == "vtt"))
        .or_else(|| tracks.first())
}

fn subtitle_languages(info: &VideoInfo) -> Vec<String> {
    let mut langs: Vec<String> = info
        .subtitles
        .keys()
        .chain(info.automatic_captions.keys())
        .cloned()
        .collect();
    langs.sort();
    langs.dedup();
    langs
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_info(json: &str) -> VideoInfo {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_parse_dump_json_subtitles() {
        let info = parse_info(
            r#"{
                "title": "Test Video",
                "subtitles": {"en": [{"url": "https://example.com/en.vtt", "ext": "vtt"}]},
                "automatic_captions": {"de": [{"url": "https://example.com/de.json3", "ext": "json3"}]}
            }"#,
        );
        assert_eq!(info.title, "Test Video");
        assert_eq!(info.subtitles["en"][0].ext, "vtt");
        assert_eq!(info.automatic_captions["de"][0].ext, "json3");
    }

    #[test]
    fn test_parse_dump_json_missing_fields() {
        let info = parse_info(r#"{"id": "abc"}"#);
        assert!(info.title.is_empty());
        assert!(info.subtitles.is_empty());
        assert!(info.automatic_captions.is_empty());
    }

    #[test]
    fn test_select_track_prefers_json3_then_vtt() {
        let tracks: Vec<SubtitleTrack> = serde_json::from_str(
            r#"[
                {"url": "https://example.com/a.srv1", "ext": "srv1"},
                {"url": "https://example.com/a.vtt", "ext": "vtt"},
                {"url": "https://example.com/a.json3", "ext": "json3"}
            ]"#,
        )
        .unwrap();
        assert_eq!(select_track(&tracks).unwrap().ext, "json3");
        assert_eq!(select_track(&tracks[..2]).unwrap().ext, "vtt");
        assert_eq!(select_track(&tracks[..1]).unwrap().ext, "srv1");
    }

    #[test]
    fn test_subtitle_languages_union() {
        let info = parse_info(
            r#"{
                "subtitles": {"en": [], "fr": []},
                "automatic_captions": {"en": [], "de": []}
            }"#,
        );
        assert_eq!(
            subtitle_languages(&info),
            vec!["de".to_string(), "en".to_string(), "fr".to_string()]
        );
    }

    #[test]
    fn test_payload_outcome_json3_success() {
        let payload = r#"{"events":[{"segs":[{"utf8":"Hello"}]},{"segs":[{"utf8":"world"}]}]}"#;
        match payload_outcome(payload, "vid12345678", "Title", "en").unwrap() {
            StrategyOutcome::Success(t) => {
                assert_eq!(t.text, "Hello world");
                assert_eq!(t.source, TranscriptSource::SubtitleTrack);
            }
            other => panic!("expected Success, got {other:?}"),
        }
    }

    #[test]
    fn test_payload_outcome_error_page_is_blocked() {
        let payload = "<html><head>Error</head></html>";
        match payload_outcome(payload, "vid12345678", "Title", "en").unwrap() {
            StrategyOutcome::Blocked => {}
            other => panic!("expected Blocked, got {other:?}"),
        }
    }

    #[test]
    fn test_payload_outcome_empty_payload_is_error() {
        assert!(payload_outcome("", "vid12345678", "Title", "en").is_err());
    }
}
