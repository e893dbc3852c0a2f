//! Deployment commands.

use anyhow::Result;
use clap::Subcommand;
use stratus_client::{DevopsApi, RequestOptions};
use stratus_core::ResourceId;
use stratus_core::models::{
    CreateDeploymentCommon, CreateDeploymentDetails, CreateSingleStageRedeploymentDetails,
    DeploymentArgumentCollection,
};

use super::{Context, WaitArgs, parse_key_val, print_model, report, response_json};

#[derive(Subcommand)]
pub enum DeploymentCommand {
    /// Show a deployment
    Get { id: ResourceId },
    /// Start a deployment
    Create {
        #[arg(long)]
        pipeline_id: ResourceId,
        /// Deploy only this stage
        #[arg(long)]
        stage_id: Option<ResourceId>,
        /// Re-run this earlier deployment
        #[arg(long)]
        previous_deployment_id: Option<ResourceId>,
        #[arg(long)]
        display_name: Option<String>,
        /// Deployment argument
        #[arg(long = "arg", value_name = "NAME=VALUE", value_parser = parse_key_val)]
        args: Vec<(String, String)>,
        #[command(flatten)]
        wait: WaitArgs,
    },
    /// Cancel a running deployment
    Cancel {
        id: ResourceId,
        #[arg(long)]
        reason: Option<String>,
        #[command(flatten)]
        wait: WaitArgs,
    },
}

/// Pick the deployment variant from which ids were given.
fn create_details(
    pipeline_id: ResourceId,
    stage_id: Option<ResourceId>,
    previous_deployment_id: Option<ResourceId>,
) -> CreateDeploymentDetails {
    match (stage_id, previous_deployment_id) {
        (Some(deploy_stage_id), Some(previous_deployment_id)) => {
            CreateDeploymentDetails::SingleStageRedeployment(CreateSingleStageRedeploymentDetails {
                common: CreateDeploymentCommon::new(pipeline_id),
                previous_deployment_id,
                deploy_stage_id,
            })
        }
        (Some(stage_id), None) => CreateDeploymentDetails::single_stage(pipeline_id, stage_id),
        (None, Some(previous)) => CreateDeploymentDetails::redeploy(pipeline_id, previous),
        (None, None) => CreateDeploymentDetails::pipeline(pipeline_id),
    }
}

pub async fn run(ctx: &Context, command: DeploymentCommand) -> Result<()> {
    match command {
        DeploymentCommand::Get { id } => {
            let response = ctx
                .client()
                .get_deployment(&id, &RequestOptions::default())
                .await?;
            print_model(&response.data)
        }
        DeploymentCommand::Create {
            pipeline_id,
            stage_id,
            previous_deployment_id,
            display_name,
            args,
            wait,
        } => {
            let mut details = create_details(pipeline_id, stage_id, previous_deployment_id);
            let common = details.common_mut();
            common.display_name = display_name;
            if !args.is_empty() {
                common.deployment_arguments = Some(DeploymentArgumentCollection::from_pairs(args));
            }
            let result = ctx
                .ops
                .create_deployment_and_wait_for_state(
                    &details,
                    &wait.targets(),
                    &wait.options(),
                    wait.waiter(ctx.waiter),
                )
                .await;
            report(result, response_json)
        }
        DeploymentCommand::Cancel { id, reason, wait } => {
            let result = ctx
                .ops
                .cancel_deployment_and_wait_for_state(
                    &id,
                    reason.as_deref(),
                    &wait.targets(),
                    &wait.options(),
                    wait.waiter(ctx.waiter),
                )
                .await;
            report(result, response_json)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stratus_core::models::DeploymentType;

    fn id(value: &str) -> ResourceId {
        ResourceId::new(value).unwrap()
    }

    #[test]
    fn test_create_details_picks_variant() {
        let cases = [
            (None, None, DeploymentType::PipelineDeployment),
            (Some(id("ds1")), None, DeploymentType::SingleStageDeployment),
            (None, Some(id("d0")), DeploymentType::PipelineRedeployment),
            (Some(id("ds1")), Some(id("d0")), DeploymentType::SingleStageRedeployment),
        ];
        for (stage, previous, expected) in cases {
            let details = create_details(id("dp1"), stage, previous);
            assert_eq!(details.deployment_type(), expected);
        }
    }
}
