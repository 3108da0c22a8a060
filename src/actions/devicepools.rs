use clap::{Parser, Subcommand};

use crate::commands::Flags;

use super::ProjectArg;

/// Manage the device pools.
#[derive(Debug, Clone, Parser)]
pub struct DevicepoolsArgs {
	/// Device pools subcommand
	#[command(subcommand)]
	pub action: DevicepoolsAction,
}

#[derive(Debug, Clone, Subcommand)]
pub enum DevicepoolsAction {
	/// List the device pools of a project.
	///
	/// This includes both the curated pools managed by Device Farm and the private pools of the
	/// project.
	List(ProjectArg),
}

pub fn invocation(args: DevicepoolsArgs) -> (&'static str, Flags) {
	match args.action {
		DevicepoolsAction::List(args) => ("list", args.into()),
	}
}
