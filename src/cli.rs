use clap::Parser;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "ffbatch")]
#[command(about = "Batch HEVC converter with hardware acceleration", long_about = None)]
pub struct Cli {
    /// Directory to scan for video files (defaults to current directory)
    #[arg(value_name = "INPUT_DIR")]
    pub input_dir: Option<PathBuf>,

    /// Directory for converted files (defaults to ./transcoded)
    #[arg(value_name = "OUTPUT_DIR")]
    pub output_dir: Option<PathBuf>,
}

pub fn parse() -> Cli {
    Cli::parse()
}
