//! Work request commands.

use anyhow::Result;
use clap::Subcommand;
use stratus_client::{DevopsApi, RequestOptions};
use stratus_core::ResourceId;
use stratus_core::models::WorkRequest;
use stratus_waiter::{NotFoundPolicy, Observation, TargetStates, wait_for_states};

use super::{Context, print_model};

#[derive(Subcommand)]
pub enum WorkRequestCommand {
    /// Show a work request
    Get { id: ResourceId },
    /// Poll a work request until it reaches one of the given states
    Wait {
        id: ResourceId,
        /// Defaults to SUCCEEDED, FAILED and CANCELED
        #[arg(long = "wait-for", value_name = "STATE")]
        wait_for: Vec<String>,
    },
}

pub async fn run(ctx: &Context, command: WorkRequestCommand) -> Result<()> {
    match command {
        WorkRequestCommand::Get { id } => {
            let response = ctx
                .client()
                .get_work_request(&id, &RequestOptions::default())
                .await?;
            print_model(&response.data)
        }
        WorkRequestCommand::Wait { id, wait_for } => {
            let targets = if wait_for.is_empty() {
                TargetStates::new(["SUCCEEDED", "FAILED", "CANCELED"])
            } else {
                TargetStates::new(&wait_for)
            };
            let client = ctx.client();
            let id = &id;
            let poll = move || async move {
                let response = client.get_work_request(id, &RequestOptions::default()).await?;
                Ok::<_, stratus_core::Error>(Observation::Found(response.data))
            };
            let waited = wait_for_states(ctx.waiter, &targets, NotFoundPolicy::Fail, poll).await?;
            eprintln!(
                "reached after {} polls in {:.1}s",
                waited.attempts,
                waited.elapsed.as_secs_f64()
            );
            let work_request: WorkRequest = waited.outcome.into_resource().ok_or_else(|| {
                anyhow::anyhow!("work request {} disappeared while waiting", id)
            })?;
            print_model(&work_request)
        }
    }
}
