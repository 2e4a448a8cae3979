mod cli;
mod commands;
mod config;
mod error;
mod output;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use subnetly_core::{JsonFileRepository, SubnetStore};

use crate::cli::{Cli, Command};
use crate::error::CliError;

#[tokio::main]
async fn main() {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Setup tracing based on verbosity
    init_tracing(cli.global.verbose);

    // Dispatch and handle errors with proper exit codes
    if let Err(err) = run(cli).await {
        let code = err.exit_code();
        eprintln!("{:?}", miette::Report::new(err));
        std::process::exit(code);
    }
}

fn init_tracing(verbosity: u8) {
    let filter = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

async fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        // Config commands don't need settings or a data file
        Command::Config(args) => commands::config_cmd::handle(args, &cli.global),

        // Shell completions generation
        Command::Completions(args) => {
            use clap::CommandFactory;
            use clap_complete::generate;

            let mut cmd = Cli::command();
            generate(args.shell, &mut cmd, "subnetly", &mut std::io::stdout());
            Ok(())
        }

        // Pure arithmetic, no store
        Command::Cidr(args) => {
            let settings = config::resolve_settings(&cli.global, &config::load_config_or_default())?;
            commands::cidr::handle(args, &settings)
        }

        // All other commands run against the subnet store
        cmd => {
            let cfg = config::load_config_or_default();
            let settings = config::resolve_settings(&cli.global, &cfg)?;

            tracing::debug!(
                profile = %settings.profile_name,
                data_file = %settings.data_file.display(),
                "opening subnet store"
            );
            let store = SubnetStore::open(
                JsonFileRepository::new(&settings.data_file),
                settings.store_options,
            )
            .await
            .map_err(|e| CliError::from(e).with_data_file(&settings.data_file))?;

            tracing::debug!(command = ?cmd, "dispatching command");
            commands::dispatch(cmd, &store, &settings)
                .await
                .map_err(|e| e.with_data_file(&settings.data_file))
        }
    }
}
