// SPDX-License-Identifier: AGPL-3.0-or-later
//! richdesc - convert rich description fields from the command line

mod cli;
mod commands;

use anyhow::Result;
use clap::Parser;
use cli::{Args, Command};
use commands::ConvertOptions;
use tracing::debug;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    let args = Args::parse();

    // RUST_LOG wins over --verbose
    let env_filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if args.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("warn")
    };

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    debug!("Logging initialized (verbose={})", args.verbose);

    let mut stdout = std::io::stdout().lock();
    match args.command {
        Command::Convert {
            input,
            output,
            from,
            to,
            config,
            strict,
        } => commands::run_convert(
            ConvertOptions {
                input: input.as_deref(),
                output: output.as_deref(),
                from: from.map(Into::into),
                to: to.map(Into::into),
                config: config.as_deref(),
                strict,
            },
            &mut stdout,
        ),
        Command::Describe { input, config } => {
            commands::run_describe(input.as_deref(), config.as_deref(), &mut stdout)
        }
        Command::Formats => commands::run_formats(&mut stdout),
    }
}
