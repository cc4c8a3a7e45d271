use clap::Parser;
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
    Markdown,
}

#[derive(Parser)]
#[command(name = "ytsum", about = "YouTube transcript fetcher and summarizer", version)]
pub struct Cli {
    /// YouTube video URL or video ID (reads from stdin if omitted)
    pub url: Option<String>,

    /// Summarize the transcript via LLM
    #[arg(short, long)]
    pub summarize: bool,

    /// Output format: text (default), json, markdown
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// Preferred caption language
    #[arg(short, long)]
    pub lang: Option<String>,

    /// Write output to file instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Use a transcript from a plain-text file instead of fetching captions
    #[arg(short, long)]
    pub transcript_file: Option<PathBuf>,

    /// Don't fall back to yt-dlp subtitle tracks if the caption API fails
    #[arg(long)]
    pub no_fallback: bool,

    /// LLM model for summarization
    #[arg(long)]
    pub model: Option<String>,

    /// Show extraction method, metadata, and a transcript preview
    #[arg(short, long)]
    pub verbose: bool,
}
