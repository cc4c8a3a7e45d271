use crate::Transcript;

/// Render transcript as plain text
pub fn render_text(transcript: &Transcript) -> String {
    transcript.text.clone()
}

/// Render transcript (with metadata) as pretty JSON
pub fn render_json(transcript: &Transcript) -> String {
    serde_json::to_string_pretty(transcript).unwrap_or_default()
}

/// Render a Markdown notes document: title heading, transcript, and the
/// summary section when one was generated.
pub fn render_markdown(transcript: &Transcript, summary: Option<&str>) -> String {
    let title = if transcript.title.is_empty() {
        transcript.video_id.as_str()
    } else {
        transcript.title.as_str()
    };

    let mut doc = format!("# {title}\n\n## Transcript\n\n{}\n", transcript.text);
    if let Some(summary) = summary {
        doc.push_str(&format!("\n## Summary\n\n{summary}\n"));
    }
    doc
}

/// First `max` characters of `text`, with an ellipsis when truncated.
pub fn preview(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        text.to_string()
    } else {
        let truncated: String = text.chars().take(max).collect();
        format!("{truncated}...")
    }
}
