use clap::Parser;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "vidcarve")]
#[command(author, version, about = "Extract embedded MP4 videos from game asset archives")]
pub struct Cli {
    /// Asset file, or directory scanned recursively
    #[arg(short, long)]
    pub input: PathBuf,

    /// Output directory, created if missing
    #[arg(short, long)]
    pub out: PathBuf,

    /// Path to config file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Asset dumper executable (overrides the config file)
    #[arg(long)]
    pub dumper: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}
