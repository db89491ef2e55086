use std::path::PathBuf;
use std::process::ExitCode;

use tracing_subscriber::EnvFilter;

use ffbatch::cli;
use ffbatch::config::Settings;
use ffbatch::engine::{batch, cleanup, ffmpeg_info, hardware};

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .init();

    let cli = cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!("{err:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: cli::Cli) -> anyhow::Result<()> {
    let settings = Settings::default();

    // Setup phase: any failure here aborts before a single file is touched.
    ffmpeg_info::ensure_tools()?;
    let profile = hardware::resolve(&settings)?;
    cleanup::install_interrupt_handler()?;

    let input_dir = cli.input_dir.unwrap_or_else(|| PathBuf::from("."));
    let output_dir = cli
        .output_dir
        .unwrap_or_else(|| PathBuf::from("./transcoded"));

    batch::run(&input_dir, &output_dir, &profile, &settings)?;
    Ok(())
}
