use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "movies", version)]
#[command(about = "Terminal movie catalog backed by SQLite", long_about = None)]
pub struct Cli {
    /// SQLite database file (default: data/movies.db)
    #[arg(long)]
    pub db: Option<PathBuf>,

    /// HTML template used by "Generate website"
    #[arg(long)]
    pub template: Option<PathBuf>,

    /// Output file for the generated website
    #[arg(long)]
    pub output: Option<PathBuf>,

    /// Directory for rolling log files
    #[arg(long)]
    pub log_dir: Option<PathBuf>,

    /// Log level: trace|debug|info|warn|error
    #[arg(long)]
    pub log_level: Option<String>,

    /// Skip OMDb lookups and always enter movie details manually
    #[arg(long)]
    pub offline: bool,
}
