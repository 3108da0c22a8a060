use clap::{Parser, Subcommand};

use crate::commands::Flags;

use super::NoArgs;

/// Manage the devices.
#[derive(Debug, Clone, Parser)]
pub struct DevicesArgs {
	/// Devices subcommand
	#[command(subcommand)]
	pub action: DevicesAction,
}

#[derive(Debug, Clone, Subcommand)]
pub enum DevicesAction {
	/// List every device available for testing.
	List(NoArgs),
}

pub fn invocation(args: DevicesArgs) -> (&'static str, Flags) {
	match args.action {
		DevicesAction::List(args) => ("list", args.into()),
	}
}
