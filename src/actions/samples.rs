use clap::{Parser, Subcommand};

use crate::commands::Flags;

use super::NoArgs;

/// Manage the samples.
#[derive(Debug, Clone, Parser)]
pub struct SamplesArgs {
	/// Samples subcommand
	#[command(subcommand)]
	pub action: SamplesAction,
}

#[derive(Debug, Clone, Subcommand)]
pub enum SamplesAction {
	/// List the samples.
	///
	/// Not implemented yet: this does nothing.
	List(NoArgs),
}

pub fn invocation(args: SamplesArgs) -> (&'static str, Flags) {
	match args.action {
		SamplesAction::List(args) => ("list", args.into()),
	}
}
