use std::io::{self, BufRead};
use std::path::PathBuf;
use std::process::Command;

use eyre::{Result, bail};
use log::info;

mod cli;

use cli::{Cli, OutputFormat};
use ytsum::{FetchOutcome, Transcript, TranscriptSource};

fn setup_logging() -> Result<()> {
    let log_dir = log_dir();
    std::fs::create_dir_all(&log_dir)?;
    let log_file = log_dir.join("ytsum.log");

    let target = Box::new(std::fs::OpenOptions::new().create(true).append(true).open(&log_file)?);

    env_logger::Builder::from_default_env()
        .target(env_logger::Target::Pipe(target))
        .init();

    info!("Logging initialized: {}", log_file.display());
    Ok(())
}

fn log_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("ytsum")
        .join("logs")
}

fn tool_version(name: &str) -> Option<String> {
    Command::new(name)
        .arg("--version")
        .output()
        .ok()
        .filter(|o| o.status.success())
        .map(|o| {
            String::from_utf8_lossy(&o.stdout)
                .trim()
                .lines()
                .next()
                .unwrap_or("")
                .to_string()
        })
}

fn build_after_help() -> String {
    let yt_dlp = tool_version("yt-dlp");

    let yt_dlp_line = match &yt_dlp {
        Some(v) => format!("  \x1b[32m✅\x1b[0m yt-dlp     {v}"),
        None => "  \x1b[31m❌\x1b[0m yt-dlp     (not found — needed for subtitle-track fallback)".to_string(),
    };

    let log_path = log_dir().join("ytsum.log");

    format!(
        "\nOPTIONAL TOOLS:\n{yt_dlp_line}\n\nLogs are written to: {}",
        log_path.display()
    )
}

/// Build a transcript from a manually supplied plain-text file.
fn load_transcript_file(path: &PathBuf, lang: &str) -> Result<Transcript> {
    let text = std::fs::read_to_string(path)?;
    let title = path
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_default();
    Ok(Transcript {
        video_id: String::new(),
        title,
        language: lang.to_string(),
        source: TranscriptSource::Upload,
        text,
    })
}

async fn handle_transcript(
    client: &reqwest::Client,
    transcript: &Transcript,
    cli: &Cli,
    model: &str,
) -> Result<()> {
    if cli.verbose {
        eprintln!(
            "Video: {} ({})\nSource: {}\nLanguage: {}\n\nTranscript preview:\n{}\n",
            transcript.title,
            transcript.video_id,
            transcript.source,
            transcript.language,
            ytsum::output::preview(&transcript.text, 1000),
        );
    }

    let summary = if cli.summarize {
        Some(ytsum::summarize::summarize(client, transcript, model).await?)
    } else {
        None
    };

    let rendered = match cli.format {
        OutputFormat::Text => ytsum::output::render_text(transcript),
        OutputFormat::Json => ytsum::output::render_json(transcript),
        OutputFormat::Markdown => ytsum::output::render_markdown(transcript, summary.as_deref()),
    };

    if let Some(ref path) = cli.output {
        std::fs::write(path, &rendered)?;
        if cli.verbose {
            eprintln!("Output written to: {}", path.display());
        }
    } else {
        println!("{rendered}");
    }

    if cli.format != OutputFormat::Markdown {
        if let Some(summary) = summary {
            println!("\n--- Summary ---\n{summary}");
        }
    }

    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    setup_logging()?;

    let after_help = build_after_help();
    let cmd = <Cli as clap::CommandFactory>::command().after_help(after_help);
    let matches = cmd.get_matches();
    let cli = <Cli as clap::FromArgMatches>::from_arg_matches(&matches)?;

    // Load config file (non-fatal if missing/invalid)
    let config = ytsum::config::Config::load().unwrap_or_default();

    // CLI flags take priority over config defaults
    let lang = cli
        .lang
        .clone()
        .or(config.default_lang)
        .unwrap_or_else(|| "en".to_string());
    let model = cli
        .model
        .clone()
        .or(config.default_model)
        .unwrap_or_else(|| "gemini-2.5-pro".to_string());

    if cli.verbose {
        let config_path = ytsum::config::config_path();
        if config_path.exists() {
            eprintln!("Config: {}", config_path.display());
        }
    }

    let client = reqwest::Client::new();

    // Manual-upload path: a plain-text transcript bypasses the fetch chain
    if let Some(ref path) = cli.transcript_file {
        let transcript = load_transcript_file(path, &lang)?;
        return handle_transcript(&client, &transcript, &cli, &model).await;
    }

    // Collect URLs: from arg or stdin
    let urls = if let Some(ref url) = cli.url {
        vec![url.clone()]
    } else {
        let stdin = io::stdin();
        stdin.lock().lines().collect::<Result<Vec<_>, _>>()?
    };

    if urls.is_empty() {
        bail!("no URL or video ID provided\n\nUsage: ytsum <URL>\n       echo <URL> | ytsum");
    }

    for url_input in &urls {
        let url_input = url_input.trim().to_string();
        if url_input.is_empty() {
            continue;
        }

        let video_id = ytsum::extract_video_id(&url_input)
            .ok_or_else(|| eyre::eyre!("could not extract video ID from: {url_input}\n\nSupported formats:\n  https://www.youtube.com/watch?v=ID\n  https://youtu.be/ID\n  https://www.youtube.com/embed/ID\n  https://www.youtube.com/shorts/ID\n  <11-character video ID>"))?;

        match ytsum::fetch::fetch_transcript(&client, &video_id, &lang, cli.no_fallback).await {
            FetchOutcome::Success(transcript) => {
                handle_transcript(&client, &transcript, &cli, &model).await?;
            }
            FetchOutcome::Blocked => {
                bail!(
                    "YouTube blocked the transcript request for {video_id} (anti-automation page detected)\n\n\
                     Wait a while before retrying, or try from a different network.\n\
                     A transcript file can be supplied directly: ytsum --transcript-file <path>"
                );
            }
            FetchOutcome::Unavailable { available } => {
                let mut msg = format!("no transcript available for {video_id} in language '{lang}'");
                if !available.is_empty() {
                    msg.push_str(&format!("\n\nCaption languages found: {}", available.join(", ")));
                    msg.push_str("\nRe-run with --lang <code> to use one of them.");
                }
                msg.push_str("\n\nA transcript file can be supplied directly: ytsum --transcript-file <path>");
                bail!(msg);
            }
        }
    }

    Ok(())
}
