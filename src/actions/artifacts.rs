use clap::{Parser, Subcommand};

use crate::{commands::Flags, model::ArtifactType};

use super::RunOrJobArgs;

/// Manage the artifacts.
#[derive(Debug, Clone, Parser)]
pub struct ArtifactsArgs {
	/// Artifacts subcommand
	#[command(subcommand)]
	pub action: ArtifactsAction,
}

#[derive(Debug, Clone, Subcommand)]
pub enum ArtifactsAction {
	List(ListArgs),
}

/// List the artifacts of a run or job.
///
/// Logs, screenshots, and files are listed one after the other, each printed as its own
/// document. If one of them fails to list, the others are still listed, and the command fails at
/// the end.
#[derive(Debug, Clone, Parser)]
pub struct ListArgs {
	#[command(flatten)]
	pub filter: RunOrJobArgs,

	/// Type of the artifact.
	///
	/// Accepted for compatibility, but all types are always listed.
	#[arg(long = "type", value_name = "TYPE", env = "DF_ARTIFACT_TYPE")]
	pub artifact_type: Option<ArtifactType>,
}

pub fn invocation(args: ArtifactsArgs) -> (&'static str, Flags) {
	match args.action {
		ArtifactsAction::List(args) => (
			"list",
			Flags {
				artifact_type: args.artifact_type,
				..args.filter.into()
			},
		),
	}
}
