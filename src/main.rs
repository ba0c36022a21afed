// ABOUTME: Entry point for the paulenv CLI application.
// ABOUTME: Parses arguments, loads settings, and dispatches to command handlers.

mod cli;
mod commands;

use clap::Parser;
use cli::{Cli, Commands, VolumeAction};
use paulenv::config::Settings;
use paulenv::engine::CancelToken;
use paulenv::error::Result;
use paulenv::output::Output;
use paulenv::types::ProjectEntry;
use std::env;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // RUST_LOG wins over the verbose flag when set.
    let default_level = if cli.verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    let mut output = Output::new(cli.output.into());

    if let Err(e) = run(cli, &mut output).await {
        output.error(&e.to_string());
        std::process::exit(1);
    }
}

async fn run(cli: Cli, output: &mut Output) -> Result<()> {
    let settings = load_settings(&cli)?;

    let cancel = CancelToken::new();
    let interactive = matches!(cli.command, Commands::Run { .. } | Commands::Join { .. });
    watch_interrupts(cancel.clone(), interactive);

    let engine = commands::connect(&settings, cancel, output).await?;
    let engine = engine.as_ref();

    match cli.command {
        Commands::Info => commands::info(engine, output).await,
        Commands::List { resource } => commands::list(engine, resource, output).await,
        Commands::Status { project } => commands::status(engine, &project, output).await,
        Commands::Build {
            project,
            dotfiles_dir,
        } => {
            let entry = ProjectEntry::new(project.project, project.compose_file, project.env_file);
            commands::build(engine, &entry, &dotfiles_dir, output).await
        }
        Commands::Run { project, args } => {
            let entry = ProjectEntry::new(project.project, project.compose_file, project.env_file);
            commands::run(engine, &entry, &args).await
        }
        Commands::Join { container_id, args } => {
            commands::join(engine, &container_id, &args).await
        }
        Commands::Volume { action } => match action {
            VolumeAction::Create { name } => commands::create_volume(engine, &name, output).await,
            VolumeAction::Rm { name } => commands::remove_volume(engine, &name, output).await,
        },
        Commands::Clean { project } => commands::clean(engine, &project, output).await,
        Commands::Prune => commands::prune(engine, output).await,
    }
}

/// Config file (explicit or discovered), then `PAULENV_ENGINE`, then `--engine`.
fn load_settings(cli: &Cli) -> Result<Settings> {
    let settings = match &cli.config {
        Some(path) => Settings::load(path)?,
        None => Settings::discover(&env::current_dir()?)?,
    };
    Ok(settings
        .with_env_overrides()?
        .with_engine(cli.engine.map(Into::into)))
}

/// Route Ctrl-C to the cancel token.
///
/// Interactive sessions receive the interrupt themselves through the
/// terminal, so it is only swallowed here to keep paulenv alive until the
/// container exits.
fn watch_interrupts(cancel: CancelToken, interactive: bool) {
    tokio::spawn(async move {
        while tokio::signal::ctrl_c().await.is_ok() {
            if interactive {
                continue;
            }
            tracing::debug!("interrupt received, cancelling");
            cancel.cancel();
        }
    });
}
