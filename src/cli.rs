// ABOUTME: Command-line interface definition using clap derive macros.
// ABOUTME: Defines all subcommands and their arguments.

use clap::{Parser, Subcommand, ValueEnum};
use paulenv::engine::EngineKind;
use paulenv::output::OutputMode;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "paulenv")]
#[command(about = "Containerized per-project development environments on Podman or Docker")]
#[command(version)]
pub struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Configuration file (defaults to paulenv.yml in the current directory)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Container engine to use instead of detecting one
    #[arg(short, long, global = true, value_enum)]
    pub engine: Option<EngineArg>,

    /// Output format
    #[arg(short, long, global = true, value_enum, default_value_t = OutputArg::Normal)]
    pub output: OutputArg,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show the detected container engine and its version
    Info,

    /// List paulenv resources known to the engine
    List {
        #[arg(value_enum)]
        resource: Resource,
    },

    /// Show whether a project's image has been built, and when
    Status {
        /// Project name
        project: String,
    },

    /// Build a project's image
    Build {
        #[command(flatten)]
        project: ProjectArgs,

        /// Dotfiles directory, relative to the compose file
        #[arg(long, default_value = "dotfiles")]
        dotfiles_dir: PathBuf,
    },

    /// Start a throwaway container for a project
    Run {
        #[command(flatten)]
        project: ProjectArgs,

        /// Arguments passed to the container entrypoint
        #[arg(last = true)]
        args: Vec<String>,
    },

    /// Open a session in a running paulenv container
    Join {
        /// Container id, as shown by `paulenv list containers`
        container_id: String,

        /// Arguments passed to the container entrypoint
        #[arg(last = true)]
        args: Vec<String>,
    },

    /// Manage named volumes
    Volume {
        #[command(subcommand)]
        action: VolumeAction,
    },

    /// Remove a project's containers, networks and images
    Clean {
        /// Project name
        project: String,
    },

    /// Prune the paulenv build cache
    Prune,
}

#[derive(clap::Args)]
pub struct ProjectArgs {
    /// Project name
    #[arg(short, long)]
    pub project: String,

    /// Compose file of the project
    #[arg(long)]
    pub compose_file: PathBuf,

    /// Env file of the project
    #[arg(long)]
    pub env_file: PathBuf,
}

#[derive(Subcommand)]
pub enum VolumeAction {
    /// Create a named volume
    Create { name: String },
    /// Remove a named volume
    Rm { name: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Resource {
    Images,
    Containers,
    Volumes,
    Networks,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum EngineArg {
    Podman,
    Docker,
}

impl From<EngineArg> for EngineKind {
    fn from(arg: EngineArg) -> Self {
        match arg {
            EngineArg::Podman => EngineKind::Podman,
            EngineArg::Docker => EngineKind::Docker,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputArg {
    Normal,
    Quiet,
    Json,
}

impl From<OutputArg> for OutputMode {
    fn from(arg: OutputArg) -> Self {
        match arg {
            OutputArg::Normal => OutputMode::Normal,
            OutputArg::Quiet => OutputMode::Quiet,
            OutputArg::Json => OutputMode::Json,
        }
    }
}
