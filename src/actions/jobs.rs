use clap::{Parser, Subcommand};

use crate::commands::Flags;

use super::RunArg;

/// Manage the jobs.
#[derive(Debug, Clone, Parser)]
pub struct JobsArgs {
	/// Jobs subcommand
	#[command(subcommand)]
	pub action: JobsAction,
}

#[derive(Debug, Clone, Subcommand)]
pub enum JobsAction {
	/// List the jobs of a run.
	List(RunArg),
}

pub fn invocation(args: JobsArgs) -> (&'static str, Flags) {
	match args.action {
		JobsAction::List(args) => ("list", args.into()),
	}
}
