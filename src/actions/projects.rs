use clap::{Parser, Subcommand};

use crate::commands::Flags;

use super::NoArgs;

/// Manage the projects.
#[derive(Debug, Clone, Parser)]
pub struct ProjectsArgs {
	/// Projects subcommand
	#[command(subcommand)]
	pub action: ProjectsAction,
}

#[derive(Debug, Clone, Subcommand)]
pub enum ProjectsAction {
	/// List the projects of the account.
	List(NoArgs),
}

pub fn invocation(args: ProjectsArgs) -> (&'static str, Flags) {
	match args.action {
		ProjectsAction::List(args) => ("list", args.into()),
	}
}
