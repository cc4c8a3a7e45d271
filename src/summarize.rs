use eyre::{Result, bail};
use log::debug;

use crate::Transcript;

const DEFAULT_SYSTEM_PROMPT: &str = "You are a helpful assistant that summarizes video transcripts. \
Provide a clear, structured summary that captures the key points, main arguments, and important details. \
Use bullet points for key takeaways.";

/// Summarize a transcript using an LLM
pub async fn summarize(client: &reqwest::Client, transcript: &Transcript, model: &str) -> Result<String> {
    if is_gemini_model(model) {
        summarize_gemini(client, &transcript.text, &transcript.title, model).await
    } else {
        summarize_openai(client, &transcript.text, &transcript.title, model).await
    }
}

fn is_gemini_model(model: &str) -> bool {
    model.starts_with("gemini")
}

fn user_message(transcript_text: &str, title: &str) -> String {
    format!("Summarize this transcript from the video \"{title}\" in concise notes:\n\n{transcript_text}")
}

async fn summarize_gemini(
    client: &reqwest::Client,
    transcript_text: &str,
    title: &str,
    model: &str,
) -> Result<String> {
    let api_key = std::env::var("GEMINI_API_KEY").map_err(|_| {
        eyre::eyre!("GEMINI_API_KEY environment variable not set (required for Gemini summarization)")
    })?;

    debug!("Summarizing via Gemini API with model {model}");

    let url = format!("https://generativelanguage.googleapis.com/v1beta/models/{model}:generateContent");

    let body = serde_json::json!({
        "systemInstruction": {
            "parts": [{"text": DEFAULT_SYSTEM_PROMPT}]
        },
        "contents": [
            {
                "role": "user",
                "parts": [{"text": user_message(transcript_text, title)}]
            }
        ]
    });

    let resp = client
        .post(&url)
        .header("x-goog-api-key", &api_key)
        .header("Content-Type", "application/json")
        .json(&body)
        .send()
        .await?;

    if !resp.status().is_success() {
        let status = resp.status();
        let body = resp.text().await.unwrap_or_default();
        bail!("Gemini API returned {status}: {body}");
    }

    let json: serde_json::Value = resp.json().await?;
    extract_gemini_text(&json)
}

fn extract_gemini_text(json: &serde_json::Value) -> Result<String> {
    if let Some(parts) = json
        .get("candidates")
        .and_then(|c| c.get(0))
        .and_then(|c| c.get("content"))
        .and_then(|c| c.get("parts"))
        .and_then(|p| p.as_array())
    {
        let text: String = parts
            .iter()
            .filter_map(|part| part.get("text")?.as_str().map(|s| s.to_string()))
            .collect::<Vec<_>>()
            .join("");
        if !text.is_empty() {
            return Ok(text);
        }
    }
    bail!("unexpected Gemini API response format");
}

async fn summarize_openai(client: &reqwest::Client, transcript_text: &str, title: &str, model: &str) -> Result<String> {
    let api_key = std::env::var("OPENAI_API_KEY")
        .map_err(|_| eyre::eyre!("OPENAI_API_KEY environment variable not set (required for OpenAI summarization)"))?;

    debug!("Summarizing via OpenAI API with model {model}");

    let body = serde_json::json!({
        "model": model,
        "messages": [
            {
                "role": "system",
                "content": DEFAULT_SYSTEM_PROMPT
            },
            {
                "role": "user",
                "content": user_message(transcript_text, title)
            }
        ]
    });

    let resp = client
        .post("https://api.openai.com/v1/chat/completions")
        .bearer_auth(&api_key)
        .header("Content-Type", "application/json")
        .json(&body)
        .send()
        .await?;

    if !resp.status().is_success() {
        let status = resp.status();
        let body = resp.text().await.unwrap_or_default();
        bail!("OpenAI API returned {status}: {body}");
    }

    let json: serde_json::Value = resp.json().await?;
    extract_openai_text(&json)
}

fn extract_openai_text(json: &serde_json::Value) -> Result<String> {
    if let Some(text) = json
        .get("choices")
        .and_then(|c| c.get(0))
        .and_then(|c| c.get("message"))
        .and_then(|m| m.get("content"))
        .and_then(|t| t.as_str())
    {
        return Ok(text.to_string());
    }
    bail!("unexpected OpenAI API response format");
}
