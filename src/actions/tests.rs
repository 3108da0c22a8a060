use clap::{Parser, Subcommand};

use crate::commands::Flags;

use super::RunArg;

/// Manage the tests.
#[derive(Debug, Clone, Parser)]
pub struct TestsArgs {
	/// Tests subcommand
	#[command(subcommand)]
	pub action: TestsAction,
}

#[derive(Debug, Clone, Subcommand)]
pub enum TestsAction {
	/// List the tests of a run.
	List(RunArg),
}

pub fn invocation(args: TestsArgs) -> (&'static str, Flags) {
	match args.action {
		TestsAction::List(args) => ("list", args.into()),
	}
}
