//! Repository commands.

use anyhow::Result;
use clap::Subcommand;
use stratus_client::{DevopsApi, RequestOptions};
use stratus_core::ResourceId;
use stratus_core::models::{CreateRepositoryDetails, UpdateRepositoryDetails};

use super::{Context, WaitArgs, empty_response_json, print_model, report, response_json};

#[derive(Subcommand)]
pub enum RepositoryCommand {
    /// Show a repository
    Get { id: ResourceId },
    /// Create a hosted repository
    Create {
        #[arg(long)]
        name: String,
        #[arg(long)]
        project_id: ResourceId,
        #[arg(long)]
        default_branch: Option<String>,
        #[arg(long)]
        description: Option<String>,
        #[command(flatten)]
        wait: WaitArgs,
    },
    /// Update a repository
    Update {
        id: ResourceId,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        default_branch: Option<String>,
        #[arg(long)]
        description: Option<String>,
        #[command(flatten)]
        wait: WaitArgs,
    },
    /// Delete a repository
    Delete {
        id: ResourceId,
        #[command(flatten)]
        wait: WaitArgs,
    },
}

pub async fn run(ctx: &Context, command: RepositoryCommand) -> Result<()> {
    match command {
        RepositoryCommand::Get { id } => {
            let response = ctx
                .client()
                .get_repository(&id, &RequestOptions::default())
                .await?;
            print_model(&response.data)
        }
        RepositoryCommand::Create {
            name,
            project_id,
            default_branch,
            description,
            wait,
        } => {
            let details = CreateRepositoryDetails {
                default_branch,
                description,
                ..CreateRepositoryDetails::hosted(name, project_id)
            };
            let result = ctx
                .ops
                .create_repository_and_wait_for_state(
                    &details,
                    &wait.targets(),
                    &wait.options(),
                    wait.waiter(ctx.waiter),
                )
                .await;
            report(result, response_json)
        }
        RepositoryCommand::Update {
            id,
            name,
            default_branch,
            description,
            wait,
        } => {
            let details = UpdateRepositoryDetails {
                name,
                default_branch,
                description,
                ..Default::default()
            };
            let result = ctx
                .ops
                .update_repository_and_wait_for_state(
                    &id,
                    &details,
                    &wait.targets(),
                    &wait.options(),
                    wait.waiter(ctx.waiter),
                )
                .await;
            report(result, response_json)
        }
        RepositoryCommand::Delete { id, wait } => {
            let result = ctx
                .ops
                .delete_repository_and_wait_for_state(
                    &id,
                    &wait.targets(),
                    &wait.options(),
                    wait.waiter(ctx.waiter),
                )
                .await;
            report(result, empty_response_json)
        }
    }
}
