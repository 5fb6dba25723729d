use clap::Parser;

#[derive(Parser)]
#[command(
    name = "ytsum",
    about = "Summarize YouTube videos from their transcripts with an LLM",
    version = env!("GIT_DESCRIBE"),
)]
pub struct Cli {
    /// YouTube video URLs or IDs (reads one per line from stdin if omitted)
    pub video_ids: Vec<String>,

    /// Transcript languages to try, in priority order
    #[arg(short, long, num_args = 1..)]
    pub languages: Option<Vec<String>>,

    /// Language to write the summary in
    #[arg(short, long)]
    pub translate: Option<String>,

    /// Don't save the raw transcript JSON
    #[arg(long)]
    pub no_save: bool,

    /// Show the selected track and configuration details
    #[arg(short, long)]
    pub verbose: bool,
}
