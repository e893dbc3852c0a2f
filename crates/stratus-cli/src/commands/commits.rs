//! Commit and diff commands.

use anyhow::Result;
use clap::Subcommand;
use stratus_client::{DevopsApi, RequestOptions};
use stratus_core::ResourceId;

use super::{Context, print_model};

#[derive(Subcommand)]
pub enum CommitCommand {
    /// Show a commit
    Get {
        #[arg(long)]
        repository_id: ResourceId,
        commit_id: String,
    },
    /// Diff two versions of a repository
    Diff {
        #[arg(long)]
        repository_id: ResourceId,
        #[arg(long)]
        base: String,
        #[arg(long)]
        target: String,
        /// Print per-file line counts instead of the full diff
        #[arg(long)]
        stat: bool,
    },
}

pub async fn run(ctx: &Context, command: CommitCommand) -> Result<()> {
    match command {
        CommitCommand::Get {
            repository_id,
            commit_id,
        } => {
            let response = ctx
                .client()
                .get_commit(&repository_id, &commit_id, &RequestOptions::default())
                .await?;
            print_model(&response.data)
        }
        CommitCommand::Diff {
            repository_id,
            base,
            target,
            stat,
        } => {
            let response = ctx
                .client()
                .list_commit_diffs(&repository_id, &base, &target, &RequestOptions::default())
                .await?;
            if !stat {
                return print_model(&response.data);
            }
            for diff in &response.data.items {
                let path = diff
                    .new_path
                    .as_deref()
                    .or(diff.old_path.as_deref())
                    .unwrap_or("<unknown>");
                if diff.is_binary == Some(true) {
                    println!("{}  (binary)", path);
                    continue;
                }
                let (added, removed) = diff.line_counts();
                println!("{}  +{} -{}", path, added, removed);
            }
            Ok(())
        }
    }
}
