use clap::{Parser, Subcommand};

use crate::commands::Flags;

use super::RunArg;

/// Manage the problems.
#[derive(Debug, Clone, Parser)]
pub struct ProblemsArgs {
	/// Problems subcommand
	#[command(subcommand)]
	pub action: ProblemsAction,
}

#[derive(Debug, Clone, Subcommand)]
pub enum ProblemsAction {
	/// List the unique problems of a run.
	///
	/// Problems are grouped by result, with the number of times each was seen and the devices it
	/// was seen on.
	List(RunArg),
}

pub fn invocation(args: ProblemsArgs) -> (&'static str, Flags) {
	match args.action {
		ProblemsAction::List(args) => ("list", args.into()),
	}
}
