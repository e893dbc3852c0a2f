//! Build pipeline commands.

use anyhow::Result;
use clap::Subcommand;
use stratus_client::{DevopsApi, RequestOptions};
use stratus_core::ResourceId;
use stratus_core::models::{
    BuildPipelineParameter, BuildPipelineParameterCollection, CreateBuildPipelineDetails,
};

use super::{
    Context, WaitArgs, empty_response_json, parse_key_val, print_model, report, response_json,
};

#[derive(Subcommand)]
pub enum PipelineCommand {
    /// Show a build pipeline
    Get { id: ResourceId },
    /// Create a build pipeline
    Create {
        #[arg(long)]
        project_id: ResourceId,
        #[arg(long)]
        display_name: Option<String>,
        #[arg(long)]
        description: Option<String>,
        /// Pipeline parameter with its default value
        #[arg(long = "param", value_name = "NAME=DEFAULT", value_parser = parse_key_val)]
        params: Vec<(String, String)>,
        #[command(flatten)]
        wait: WaitArgs,
    },
    /// Delete a build pipeline
    Delete {
        id: ResourceId,
        #[command(flatten)]
        wait: WaitArgs,
    },
    /// Show a build pipeline stage
    GetStage { id: ResourceId },
    /// Delete a build pipeline stage
    DeleteStage {
        id: ResourceId,
        #[command(flatten)]
        wait: WaitArgs,
    },
}

pub async fn run(ctx: &Context, command: PipelineCommand) -> Result<()> {
    match command {
        PipelineCommand::Get { id } => {
            let response = ctx
                .client()
                .get_build_pipeline(&id, &RequestOptions::default())
                .await?;
            print_model(&response.data)
        }
        PipelineCommand::Create {
            project_id,
            display_name,
            description,
            params,
            wait,
        } => {
            let parameters = (!params.is_empty()).then(|| BuildPipelineParameterCollection {
                items: params
                    .into_iter()
                    .map(|(name, default_value)| BuildPipelineParameter {
                        name,
                        default_value,
                        description: None,
                    })
                    .collect(),
            });
            let details = CreateBuildPipelineDetails {
                display_name,
                description,
                build_pipeline_parameters: parameters,
                ..CreateBuildPipelineDetails::new(project_id)
            };
            let result = ctx
                .ops
                .create_build_pipeline_and_wait_for_state(
                    &details,
                    &wait.targets(),
                    &wait.options(),
                    wait.waiter(ctx.waiter),
                )
                .await;
            report(result, response_json)
        }
        PipelineCommand::Delete { id, wait } => {
            let result = ctx
                .ops
                .delete_build_pipeline_and_wait_for_state(
                    &id,
                    &wait.targets(),
                    &wait.options(),
                    wait.waiter(ctx.waiter),
                )
                .await;
            report(result, empty_response_json)
        }
        PipelineCommand::GetStage { id } => {
            let response = ctx
                .client()
                .get_build_pipeline_stage(&id, &RequestOptions::default())
                .await?;
            print_model(&response.data)
        }
        PipelineCommand::DeleteStage { id, wait } => {
            let result = ctx
                .ops
                .delete_build_pipeline_stage_and_wait_for_state(
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
