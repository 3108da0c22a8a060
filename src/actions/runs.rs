use clap::{Parser, Subcommand};

use crate::{commands::Flags, model::TestType};

use super::ProjectArg;

/// Manage the runs.
#[derive(Debug, Clone, Parser)]
pub struct RunsArgs {
	/// Runs subcommand
	#[command(subcommand)]
	pub action: RunsAction,
}

#[derive(Debug, Clone, Subcommand)]
pub enum RunsAction {
	/// List the runs of a project.
	List(ProjectArg),
	Schedule(ScheduleArgs),
}

/// Schedule a run.
///
/// Runs the app upload against every device of the device pool, using the given test type and,
/// unless it's a built-in test, the test package upload.
#[derive(Debug, Clone, Parser)]
pub struct ScheduleArgs {
	#[command(flatten)]
	pub project: ProjectArg,

	/// Device pool ARN or device pool name.
	#[arg(long, value_name = "ARN", env = "DF_DEVICE_POOL")]
	pub device_pool: Option<String>,

	/// Name to give to the run that is scheduled.
	#[arg(long, env = "DF_RUN_NAME")]
	pub name: Option<String>,

	/// Type of test to run.
	#[arg(long, value_name = "TYPE", env = "DF_TEST_TYPE", required = true)]
	pub test_type: TestType,

	/// ARN or name of the test package upload to schedule.
	///
	/// Built-in test types don't need one.
	#[arg(long, value_name = "ARN", env = "DF_TEST")]
	pub test: Option<String>,

	/// ARN or name of the app upload to schedule.
	#[arg(long, value_name = "ARN", env = "DF_APP")]
	pub app: Option<String>,
}

pub fn invocation(args: RunsArgs) -> (&'static str, Flags) {
	match args.action {
		RunsAction::List(args) => ("list", args.into()),
		RunsAction::Schedule(args) => (
			"schedule",
			Flags {
				project: args.project.project,
				device_pool: args.device_pool,
				name: args.name,
				test_type: Some(args.test_type),
				test: args.test,
				app: args.app,
				..Flags::default()
			},
		),
	}
}
