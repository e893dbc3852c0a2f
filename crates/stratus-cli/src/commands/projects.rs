//! Project commands.

use anyhow::Result;
use clap::Subcommand;
use futures::TryStreamExt;
use serde_json::Value;
use stratus_client::{DevopsApi, ListProjectsRequest, RequestOptions, list_all_projects};
use stratus_core::models::{
    CreateProjectDetails, NotificationConfig, ProjectLifecycleState, UpdateProjectDetails,
};
use stratus_core::{Model, ResourceId};

use super::{
    Context, WaitArgs, empty_response_json, print_json, print_model, report, response_json,
};

#[derive(Subcommand)]
pub enum ProjectCommand {
    /// Show a project
    Get { id: ResourceId },
    /// List projects in a compartment
    List {
        #[arg(long)]
        compartment_id: ResourceId,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        lifecycle_state: Option<ProjectLifecycleState>,
        #[arg(long)]
        limit: Option<u32>,
        /// Page token from a previous listing
        #[arg(long)]
        page: Option<String>,
        /// Follow every page
        #[arg(long)]
        all: bool,
    },
    /// Create a project
    Create {
        #[arg(long)]
        name: String,
        #[arg(long)]
        compartment_id: ResourceId,
        /// Notification topic
        #[arg(long)]
        topic_id: ResourceId,
        #[arg(long)]
        description: Option<String>,
        #[command(flatten)]
        wait: WaitArgs,
    },
    /// Update a project
    Update {
        id: ResourceId,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        topic_id: Option<ResourceId>,
        #[command(flatten)]
        wait: WaitArgs,
    },
    /// Delete a project
    Delete {
        id: ResourceId,
        #[command(flatten)]
        wait: WaitArgs,
    },
}

pub async fn run(ctx: &Context, command: ProjectCommand) -> Result<()> {
    match command {
        ProjectCommand::Get { id } => {
            let response = ctx.client().get_project(&id, &RequestOptions::default()).await?;
            print_model(&response.data)
        }
        ProjectCommand::List {
            compartment_id,
            name,
            lifecycle_state,
            limit,
            page,
            all,
        } => {
            let request = ListProjectsRequest {
                name,
                lifecycle_state,
                limit,
                page,
                ..ListProjectsRequest::new(compartment_id)
            };
            if all {
                let projects: Vec<_> =
                    list_all_projects(ctx.client(), request, RequestOptions::default())
                        .try_collect()
                        .await?;
                let items = projects
                    .iter()
                    .map(|project| project.to_value())
                    .collect::<stratus_core::Result<Vec<_>>>()?;
                print_json(&Value::Array(items))
            } else {
                let response = ctx
                    .client()
                    .list_projects(&request, &RequestOptions::default())
                    .await?;
                if let Some(page) = &response.headers.opc_next_page {
                    eprintln!("more results: --page token {}", page);
                }
                print_model(&response.data)
            }
        }
        ProjectCommand::Create {
            name,
            compartment_id,
            topic_id,
            description,
            wait,
        } => {
            let details = CreateProjectDetails {
                description,
                ..CreateProjectDetails::new(name, compartment_id, topic_id)
            };
            let result = ctx
                .ops
                .create_project_and_wait_for_state(
                    &details,
                    &wait.targets(),
                    &wait.options(),
                    wait.waiter(ctx.waiter),
                )
                .await;
            report(result, response_json)
        }
        ProjectCommand::Update {
            id,
            description,
            topic_id,
            wait,
        } => {
            let details = UpdateProjectDetails {
                description,
                notification_config: topic_id.map(|topic_id| NotificationConfig { topic_id }),
                ..Default::default()
            };
            let result = ctx
                .ops
                .update_project_and_wait_for_state(
                    &id,
                    &details,
                    &wait.targets(),
                    &wait.options(),
                    wait.waiter(ctx.waiter),
                )
                .await;
            report(result, response_json)
        }
        ProjectCommand::Delete { id, wait } => {
            let result = ctx
                .ops
                .delete_project_and_wait_for_state(
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
