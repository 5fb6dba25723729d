use std::io;

use eyre::{Result, bail};
use log::{debug, warn};

use ytsum::config::{
    BACKEND_VAR, Config, DEFAULT_BACKEND, DEFAULT_MODEL, DEFAULT_OLLAMA_URL, MODEL_VAR, OLLAMA_URL_VAR,
    OPENAI_KEY_VAR, Settings, config_path,
};
use ytsum::pipeline::{Pipeline, read_references};
use ytsum::summarize::Summarizer;
use ytsum::youtube::YouTubeProvider;

mod cli;

use cli::Cli;

fn build_after_help() -> String {
    let log_path = ytsum::logging::log_path();

    format!(
        "\nENVIRONMENT:\n  \
         {BACKEND_VAR:<16} ollama | openai (default: {DEFAULT_BACKEND})\n  \
         {MODEL_VAR:<16} model name (default: {DEFAULT_MODEL})\n  \
         {OLLAMA_URL_VAR:<16} generate endpoint (default: {DEFAULT_OLLAMA_URL})\n  \
         {OPENAI_KEY_VAR:<16} required for the openai backend\n\n\
         Config file: {}\nLogs are written to: {}",
        config_path().display(),
        log_path.display()
    )
}

#[tokio::main]
async fn main() -> Result<()> {
    let _ = dotenvy::dotenv();
    ytsum::logging::setup_file_logging()?;

    let after_help = build_after_help();
    let cmd = <Cli as clap::CommandFactory>::command().after_help(after_help);
    let matches = cmd.get_matches();
    let cli = <Cli as clap::FromArgMatches>::from_arg_matches(&matches)?;

    // Config file problems are non-fatal: fall back to environment and defaults
    let config = Config::load().unwrap_or_else(|e| {
        warn!("Ignoring config file: {e}");
        Config::default()
    });
    let settings = Settings::from_env(&config)?;
    debug!("Settings: {settings:?}");

    // CLI flags take priority over configured defaults
    let languages = cli
        .languages
        .clone()
        .filter(|langs| !langs.is_empty())
        .unwrap_or_else(|| settings.languages.clone());
    let translate = cli
        .translate
        .clone()
        .filter(|t| !t.trim().is_empty())
        .unwrap_or_else(|| settings.translate.clone());

    if cli.verbose {
        let path = config_path();
        if path.exists() {
            eprintln!("Config: {}", path.display());
        }
        eprintln!("Backend: {} ({})", settings.backend.name(), settings.model);
        eprintln!("Languages: {}", languages.join(", "));
    }

    let client = reqwest::Client::new();
    let summarizer = Summarizer::new(client.clone(), &settings);
    let mut pipeline = Pipeline::new(YouTubeProvider::new(client), summarizer);
    if !cli.no_save {
        pipeline = pipeline.with_artifacts(&settings.transcript_dir);
    }

    // Collect references: from args or stdin
    let references: Vec<String> = if cli.video_ids.is_empty() {
        read_references(io::stdin().lock())
    } else {
        cli.video_ids
            .iter()
            .map(|r| r.trim().to_string())
            .filter(|r| !r.is_empty())
            .collect()
    };

    if references.is_empty() {
        bail!("no URL or video ID provided\n\nUsage: ytsum <URL>...\n       echo <URL> | ytsum");
    }

    let failures = pipeline
        .report(
            &references,
            &languages,
            &translate,
            cli.verbose,
            &mut io::stdout().lock(),
            &mut io::stderr().lock(),
        )
        .await?;

    if failures == references.len() {
        bail!("all {failures} video(s) failed");
    }
    Ok(())
}
