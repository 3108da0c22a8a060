use clap::{Parser, Subcommand};

use crate::commands::Flags;

use super::RunOrJobArgs;

/// Manage the suites.
#[derive(Debug, Clone, Parser)]
pub struct SuitesArgs {
	/// Suites subcommand
	#[command(subcommand)]
	pub action: SuitesAction,
}

#[derive(Debug, Clone, Subcommand)]
pub enum SuitesAction {
	/// List the suites of a run or job.
	List(RunOrJobArgs),
}

pub fn invocation(args: SuitesArgs) -> (&'static str, Flags) {
	match args.action {
		SuitesAction::List(args) => ("list", args.into()),
	}
}
