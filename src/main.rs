//! Triband CLI - Three-Band Equalizer
//!
//! Command-line interface for the Triband equalizer engine.

use clap::Parser;
use env_logger::Env;
use log::info;

use triband::cli::commands::{self, GainOverrides};
use triband::cli::{Cli, Commands};

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(Env::default().default_filter_or(default_filter)).init();

    info!("Triband v{}", env!("CARGO_PKG_VERSION"));

    let result = match cli.command {
        Commands::Process {
            input,
            output,
            low,
            mid,
            high,
            preset,
            config,
        } => commands::process(
            &input,
            &output,
            GainOverrides { low, mid, high },
            preset.as_deref(),
            config.as_deref(),
        ),
        Commands::Analyze { input, config } => commands::analyze(&input, config.as_deref()),
        Commands::Bands { config } => commands::bands(config.as_deref()),
        Commands::InitConfig { path, force } => commands::init_config(&path, force),
    };

    if let Err(e) = &result {
        for suggestion in e.recovery_suggestions() {
            eprintln!("hint: {}", suggestion);
        }
    }
    result.map_err(|e| {
        let code = e.error_code();
        anyhow::Error::new(e).context(format!("triband failed [{}]", code))
    })
}
