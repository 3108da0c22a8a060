use std::io::stdout;

use clap::{Parser, Subcommand};
use miette::Result;
use tracing::debug;

use crate::{
	args::Args,
	aws::{self, devicefarm::DeviceFarmGateway},
	commands::{self, Flags},
};

pub use context::Context;
pub mod context;

macro_rules! resources {
	(
		$(
			$modname:ident => $enumname:ident($argname:ident)
		),+
	) => {
		$(
			pub mod $modname;
		)*

		#[derive(Debug, Clone, Subcommand)]
		pub enum Action {
			$(
				$enumname($modname::$argname),
			)*
		}

		pub async fn run(args: Args) -> Result<()> {
			debug!(version=%env!("CARGO_PKG_VERSION"), "starting up");
			let (noun, (verb, flags)) = match args.action {
				$(
					Action::$enumname(args) => (stringify!($modname), $modname::invocation(args)),
				)*
			};

			let config = aws::init(&args.aws).await?;
			let gateway = DeviceFarmGateway::new(&config);
			commands::dispatch(&gateway, noun, verb, &flags, &mut stdout(), Context::new()).await
		}
	};
}

resources! {
	artifacts => Artifacts(ArtifactsArgs),
	devicepools => Devicepools(DevicepoolsArgs),
	devices => Devices(DevicesArgs),
	jobs => Jobs(JobsArgs),
	problems => Problems(ProblemsArgs),
	projects => Projects(ProjectsArgs),
	runs => Runs(RunsArgs),
	samples => Samples(SamplesArgs),
	suites => Suites(SuitesArgs),
	tests => Tests(TestsArgs),
	upload => Upload(UploadArgs)
}

/// Scope to a project.
#[derive(Debug, Clone, Default, Parser)]
pub struct ProjectArg {
	/// Project ARN or project description.
	#[arg(long, value_name = "ARN", env = "DF_PROJECT")]
	pub project: Option<String>,
}

/// Scope to a run.
#[derive(Debug, Clone, Default, Parser)]
pub struct RunArg {
	/// Run ARN or run description.
	#[arg(long, value_name = "ARN", env = "DF_RUN")]
	pub run: Option<String>,
}

/// Scope to a run, or to a single job of a run.
///
/// When both are given, the run wins.
#[derive(Debug, Clone, Default, Parser)]
pub struct RunOrJobArgs {
	/// Run ARN or run description.
	///
	/// Takes precedence over `--job`.
	#[arg(long, value_name = "ARN", env = "DF_RUN")]
	pub run: Option<String>,

	/// Job ARN or job description.
	#[arg(long, value_name = "ARN", env = "DF_JOB")]
	pub job: Option<String>,
}

/// Commands that take no flags.
#[derive(Debug, Clone, Default, Parser)]
pub struct NoArgs {}

impl From<NoArgs> for Flags {
	fn from(_: NoArgs) -> Self {
		Self::default()
	}
}

impl From<ProjectArg> for Flags {
	fn from(arg: ProjectArg) -> Self {
		Self {
			project: arg.project,
			..Self::default()
		}
	}
}

impl From<RunArg> for Flags {
	fn from(arg: RunArg) -> Self {
		Self {
			run: arg.run,
			..Self::default()
		}
	}
}

impl From<RunOrJobArgs> for Flags {
	fn from(args: RunOrJobArgs) -> Self {
		Self {
			run: args.run,
			job: args.job,
			..Self::default()
		}
	}
}
