//! Stratus CLI tool.

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;
use url::Url;

mod commands;

use commands::{
    Connection, commits::CommitCommand, deployments::DeploymentCommand,
    pipelines::PipelineCommand, projects::ProjectCommand, repositories::RepositoryCommand,
    work_requests::WorkRequestCommand,
};

#[derive(Parser)]
#[command(name = "stratus")]
#[command(about = "Stratus DevOps CLI", long_about = None)]
struct Cli {
    /// Profile file (defaults to ~/.stratus/config.kdl)
    #[arg(long, env = "STRATUS_CONFIG", global = true)]
    config: Option<PathBuf>,

    /// Profile to use
    #[arg(long, env = "STRATUS_PROFILE", global = true)]
    profile: Option<String>,

    /// Override the profile's endpoint
    #[arg(long, env = "STRATUS_ENDPOINT", global = true)]
    endpoint: Option<Url>,

    /// Bearer token, overriding the profile
    #[arg(long, env = "STRATUS_AUTH_TOKEN", hide_env_values = true, global = true)]
    auth_token: Option<String>,

    /// Emit logs as JSON
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage projects
    Projects {
        #[command(subcommand)]
        command: ProjectCommand,
    },
    /// Manage code repositories
    Repositories {
        #[command(subcommand)]
        command: RepositoryCommand,
    },
    /// Inspect commits and diffs
    Commits {
        #[command(subcommand)]
        command: CommitCommand,
    },
    /// Manage build pipelines and their stages
    Pipelines {
        #[command(subcommand)]
        command: PipelineCommand,
    },
    /// Run and cancel deployments
    Deployments {
        #[command(subcommand)]
        command: DeploymentCommand,
    },
    /// Inspect work requests
    WorkRequests {
        #[command(subcommand)]
        command: WorkRequestCommand,
    },
    /// Validate a profile file
    ValidateConfig {
        /// Path to the profile file
        path: Option<PathBuf>,
    },
}

fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.log_json);

    let connection = Connection {
        config: cli.config,
        profile: cli.profile,
        endpoint: cli.endpoint,
        auth_token: cli.auth_token,
    };

    match cli.command {
        Commands::Projects { command } => {
            commands::projects::run(&connection.context()?, command).await?;
        }
        Commands::Repositories { command } => {
            commands::repositories::run(&connection.context()?, command).await?;
        }
        Commands::Commits { command } => {
            commands::commits::run(&connection.context()?, command).await?;
        }
        Commands::Pipelines { command } => {
            commands::pipelines::run(&connection.context()?, command).await?;
        }
        Commands::Deployments { command } => {
            commands::deployments::run(&connection.context()?, command).await?;
        }
        Commands::WorkRequests { command } => {
            commands::work_requests::run(&connection.context()?, command).await?;
        }
        Commands::ValidateConfig { path } => {
            commands::validate_config(path.or(connection.config))?;
        }
    }

    Ok(())
}
