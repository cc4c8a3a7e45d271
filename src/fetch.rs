use eyre::Result;
use log::debug;

use crate::{FetchOutcome, Transcript, youtube, ytdlp};

/// What a single strategy produced.
///
/// An `Err` from a strategy means the attempt itself failed (network,
/// subprocess, parse) and the chain falls through; `NoTrack` means the
/// strategy worked but found nothing for the requested language.
#[derive(Debug)]
pub enum StrategyOutcome {
    Success(Transcript),
    NoTrack { available: Vec<String> },
    Blocked,
}

#[derive(Debug, Clone, Copy)]
enum Strategy {
    CaptionApi,
    SubtitleTrack,
}

impl std::fmt::Display for Strategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Strategy::CaptionApi => write!(f, "caption-api"),
            Strategy::SubtitleTrack => write!(f, "subtitle-track"),
        }
    }
}

// The structured caption API yields already-clean text, so it goes first;
// the subtitle-track route needs normalization and is strictly a fallback.
// One attempt per strategy, sequential — the upstream rate-limits repeated
// automated requests.
const STRATEGIES: [Strategy; 2] = [Strategy::CaptionApi, Strategy::SubtitleTrack];

/// Run the caption-fetch chain for a video. Never fails the process: every
/// failure path degrades to an outcome the caller can present.
///
/// `no_fallback` stops the chain after the caption API.
pub async fn fetch_transcript(
    client: &reqwest::Client,
    video_id: &str,
    lang: &str,
    no_fallback: bool,
) -> FetchOutcome {
    let mut available: Vec<String> = Vec::new();
    let attempts = if no_fallback { 1 } else { STRATEGIES.len() };

    for strategy in STRATEGIES.iter().take(attempts) {
        let result = match strategy {
            Strategy::CaptionApi => youtube::fetch_captions(client, video_id, lang).await,
            Strategy::SubtitleTrack => ytdlp::fetch_subtitles(client, video_id, lang).await,
        };

        if let Some(outcome) = chain_step(*strategy, result, &mut available) {
            return outcome;
        }
    }

    exhausted(available)
}

/// Merge one strategy attempt into the chain: `Some` short-circuits with a
/// final outcome, `None` falls through to the next strategy. A blocked page
/// stops the chain — more automated requests won't help.
fn chain_step(
    strategy: Strategy,
    result: Result<StrategyOutcome>,
    available: &mut Vec<String>,
) -> Option<FetchOutcome> {
    match result {
        Ok(StrategyOutcome::Success(transcript)) => Some(FetchOutcome::Success(transcript)),
        Ok(StrategyOutcome::Blocked) => Some(FetchOutcome::Blocked),
        Ok(StrategyOutcome::NoTrack { available: langs }) => {
            debug!("Strategy {strategy} found no track for the requested language");
            available.extend(langs);
            None
        }
        Err(e) => {
            debug!("Strategy {strategy} failed: {e}");
            None
        }
    }
}

/// Every strategy fell through: no transcript, report which caption
/// languages exist.
fn exhausted(mut available: Vec<String>) -> FetchOutcome {
    available.sort();
    available.dedup();
    FetchOutcome::Unavailable { available }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::TranscriptSource;
    use eyre::eyre;

    fn transcript() -> Transcript {
        Transcript {
            video_id: "test1234567".to_string(),
            title: "Test Video".to_string(),
            language: "en".to_string(),
            source: TranscriptSource::CaptionApi,
            text: "Hello world".to_string(),
        }
    }

    #[test]
    fn test_success_short_circuits() {
        let mut available = Vec::new();
        let outcome = chain_step(
            Strategy::CaptionApi,
            Ok(StrategyOutcome::Success(transcript())),
            &mut available,
        );
        match outcome {
            Some(FetchOutcome::Success(t)) => assert_eq!(t.text, "Hello world"),
            other => panic!("expected Success, got {other:?}"),
        }
    }

    #[test]
    fn test_blocked_short_circuits() {
        let mut available = Vec::new();
        let outcome = chain_step(Strategy::SubtitleTrack, Ok(StrategyOutcome::Blocked), &mut available);
        assert!(matches!(outcome, Some(FetchOutcome::Blocked)));
    }

    #[test]
    fn test_no_track_falls_through_and_accumulates() {
        let mut available = Vec::new();
        let outcome = chain_step(
            Strategy::CaptionApi,
            Ok(StrategyOutcome::NoTrack {
                available: vec!["de".to_string(), "fr".to_string()],
            }),
            &mut available,
        );
        assert!(outcome.is_none());
        assert_eq!(available, vec!["de".to_string(), "fr".to_string()]);
    }

    #[test]
    fn test_error_falls_through() {
        let mut available = Vec::new();
        let outcome = chain_step(Strategy::CaptionApi, Err(eyre!("connection refused")), &mut available);
        assert!(outcome.is_none());
        assert!(available.is_empty());
    }

    #[test]
    fn test_both_strategies_failing_yields_unavailable() {
        let mut available = Vec::new();
        assert!(chain_step(Strategy::CaptionApi, Err(eyre!("network down")), &mut available).is_none());
        assert!(
            chain_step(
                Strategy::SubtitleTrack,
                Ok(StrategyOutcome::NoTrack { available: vec![] }),
                &mut available,
            )
            .is_none()
        );
        match exhausted(available) {
            FetchOutcome::Unavailable { available } => assert!(available.is_empty()),
            other => panic!("expected Unavailable, got {other:?}"),
        }
    }

    #[test]
    fn test_available_languages_deduped_across_strategies() {
        let mut available = Vec::new();
        chain_step(
            Strategy::CaptionApi,
            Ok(StrategyOutcome::NoTrack {
                available: vec!["fr".to_string(), "de".to_string()],
            }),
            &mut available,
        );
        chain_step(
            Strategy::SubtitleTrack,
            Ok(StrategyOutcome::NoTrack {
                available: vec!["de".to_string(), "es".to_string()],
            }),
            &mut available,
        );
        match exhausted(available) {
            FetchOutcome::Unavailable { available } => {
                assert_eq!(available, vec!["de".to_string(), "es".to_string(), "fr".to_string()]);
            }
            other => panic!("expected Unavailable, got {other:?}"),
        }
    }
}
