//! The dispatch table: every (noun, verb) the tool understands, the flags each one reads, and
//! the handler that turns those flags into gateway calls.

use std::{io::Write, path::PathBuf, time::Duration};

use futures::future::BoxFuture;
use miette::{miette, IntoDiagnostic, Result};
use serde::Serialize;
use tracing::{debug, error, info, warn};

use crate::{
	actions::Context,
	gateway::Gateway,
	model::{Artifact, ArtifactType, ScheduleRequest, TestType, UploadRequest, UploadType},
	upload::UploadPipeline,
};

/// A flag a command can read.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Flag {
	Project,
	Run,
	Job,
	ArtifactType,
	DevicePool,
	Name,
	TestType,
	Test,
	App,
	UploadType,
	File,
	Upload,
	WriteTimeout,
}

impl Flag {
	pub fn name(self) -> &'static str {
		match self {
			Self::Project => "--project",
			Self::Run => "--run",
			Self::Job => "--job",
			Self::ArtifactType | Self::UploadType => "--type",
			Self::DevicePool => "--device-pool",
			Self::Name => "--name",
			Self::TestType => "--test-type",
			Self::Test => "--test",
			Self::App => "--app",
			Self::File => "--file",
			Self::Upload => "--upload",
			Self::WriteTimeout => "--write-timeout",
		}
	}
}

/// Flag values for one invocation, with environment fallbacks already applied.
#[derive(Clone, Debug, Default)]
pub struct Flags {
	pub project: Option<String>,
	pub run: Option<String>,
	pub job: Option<String>,
	pub artifact_type: Option<ArtifactType>,
	pub device_pool: Option<String>,
	pub name: Option<String>,
	pub test_type: Option<TestType>,
	pub test: Option<String>,
	pub app: Option<String>,
	pub upload_type: Option<UploadType>,
	pub file: Option<PathBuf>,
	pub upload: Option<String>,
	pub write_timeout: Option<Duration>,
}

impl Flags {
	/// The value of an identifier flag, if it was given at all.
	pub fn identifier(&self, flag: Flag) -> Option<&str> {
		match flag {
			Flag::Project => self.project.as_deref(),
			Flag::Run => self.run.as_deref(),
			Flag::Job => self.job.as_deref(),
			Flag::DevicePool => self.device_pool.as_deref(),
			Flag::Name => self.name.as_deref(),
			Flag::Test => self.test.as_deref(),
			Flag::App => self.app.as_deref(),
			Flag::Upload => self.upload.as_deref(),
			Flag::ArtifactType
			| Flag::TestType
			| Flag::UploadType
			| Flag::File
			| Flag::WriteTimeout => None,
		}
	}

	/// The identifier passed for `flag`, or the empty string.
	pub fn id(&self, flag: Flag) -> &str {
		self.identifier(flag).unwrap_or_default()
	}

	fn is_set(&self, flag: Flag) -> bool {
		match flag {
			Flag::ArtifactType => self.artifact_type.is_some(),
			Flag::TestType => self.test_type.is_some(),
			Flag::UploadType => self.upload_type.is_some(),
			Flag::File => self.file.is_some(),
			Flag::WriteTimeout => self.write_timeout.is_some(),
			other => self.identifier(other).is_some(),
		}
	}
}

/// Pick the filter identifier from candidates in precedence order.
///
/// The first non-empty value wins and the rest are ignored, conflicting or not. With nothing
/// given the result is empty, and is forwarded as such.
pub fn resolve<'a>(candidates: &[(&'static str, Option<&'a str>)]) -> &'a str {
	for &(flag, value) in candidates {
		if let Some(value) = value.filter(|v| !v.is_empty()) {
			debug!(flag, value, "resolved filter");
			return value;
		}
	}

	debug!("no filter given");
	""
}

pub type Handler = for<'a> fn(Invocation<'a>) -> BoxFuture<'a, Result<()>>;

/// One row of the dispatch table.
pub struct CommandSpec {
	pub noun: &'static str,
	pub verb: &'static str,
	/// Identifier flags the filter is resolved from, most specific first.
	pub filter: &'static [Flag],
	pub required: &'static [Flag],
	pub optional: &'static [Flag],
	pub handler: Handler,
}

impl CommandSpec {
	pub fn accepts(&self, flag: Flag) -> bool {
		self.filter.contains(&flag) || self.required.contains(&flag) || self.optional.contains(&flag)
	}
}

/// Everything a handler gets to work with.
pub struct Invocation<'a> {
	pub spec: &'static CommandSpec,
	pub gateway: &'a dyn Gateway,
	pub flags: &'a Flags,
	pub out: &'a mut (dyn Write + Send),
	pub ctx: Context,
}

impl<'a> Invocation<'a> {
	/// Resolve this command's filter flags into a single identifier.
	pub fn filter(&self) -> &'a str {
		let flags: &'a Flags = self.flags;
		let candidates: Vec<_> = self
			.spec
			.filter
			.iter()
			.map(|&flag| (flag.name(), flags.identifier(flag)))
			.collect();
		resolve(&candidates)
	}

	fn render<T: Serialize + ?Sized>(&mut self, value: &T) -> Result<()> {
		serde_json::to_writer_pretty(&mut *self.out, value).into_diagnostic()?;
		writeln!(self.out).into_diagnostic()?;
		self.out.flush().into_diagnostic()
	}
}

pub static COMMANDS: &[CommandSpec] = &[
	CommandSpec {
		noun: "projects",
		verb: "list",
		filter: &[],
		required: &[],
		optional: &[],
		handler: list_projects,
	},
	CommandSpec {
		noun: "artifacts",
		verb: "list",
		filter: &[Flag::Run, Flag::Job],
		required: &[],
		optional: &[Flag::ArtifactType],
		handler: list_artifacts,
	},
	CommandSpec {
		noun: "devicepools",
		verb: "list",
		filter: &[Flag::Project],
		required: &[],
		optional: &[],
		handler: list_device_pools,
	},
	CommandSpec {
		noun: "devices",
		verb: "list",
		filter: &[],
		required: &[],
		optional: &[],
		handler: list_devices,
	},
	CommandSpec {
		noun: "jobs",
		verb: "list",
		filter: &[Flag::Run],
		required: &[],
		optional: &[],
		handler: list_jobs,
	},
	CommandSpec {
		noun: "runs",
		verb: "list",
		filter: &[Flag::Project],
		required: &[],
		optional: &[],
		handler: list_runs,
	},
	CommandSpec {
		noun: "runs",
		verb: "schedule",
		filter: &[],
		required: &[Flag::TestType],
		optional: &[
			Flag::Project,
			Flag::DevicePool,
			Flag::Name,
			Flag::Test,
			Flag::App,
		],
		handler: schedule_run,
	},
	CommandSpec {
		noun: "samples",
		verb: "list",
		filter: &[],
		required: &[],
		optional: &[],
		handler: not_implemented,
	},
	CommandSpec {
		noun: "suites",
		verb: "list",
		filter: &[Flag::Run, Flag::Job],
		required: &[],
		optional: &[],
		handler: list_suites,
	},
	CommandSpec {
		noun: "tests",
		verb: "list",
		filter: &[Flag::Run],
		required: &[],
		optional: &[],
		handler: list_tests,
	},
	CommandSpec {
		noun: "problems",
		verb: "list",
		filter: &[Flag::Run],
		required: &[],
		optional: &[],
		handler: list_problems,
	},
	CommandSpec {
		noun: "upload",
		verb: "create",
		filter: &[],
		required: &[Flag::UploadType],
		optional: &[Flag::Project, Flag::Name],
		handler: create_upload,
	},
	CommandSpec {
		noun: "upload",
		verb: "file",
		filter: &[],
		required: &[Flag::File, Flag::UploadType],
		optional: &[Flag::Project, Flag::WriteTimeout],
		handler: upload_file,
	},
	CommandSpec {
		noun: "upload",
		verb: "list",
		filter: &[Flag::Project],
		required: &[],
		optional: &[],
		handler: list_uploads,
	},
	CommandSpec {
		noun: "upload",
		verb: "info",
		filter: &[Flag::Upload],
		required: &[],
		optional: &[],
		handler: upload_info,
	},
];

pub fn lookup(noun: &str, verb: &str) -> Option<&'static CommandSpec> {
	COMMANDS
		.iter()
		.find(|spec| spec.noun == noun && spec.verb == verb)
}

/// Run one command against the gateway, writing its results to `out`.
///
/// Pairs that aren't in the table are accepted and do nothing. This only holds for callers of
/// the library: the binary's argument parser rejects unknown subcommands before they get here.
pub async fn dispatch(
	gateway: &dyn Gateway,
	noun: &str,
	verb: &str,
	flags: &Flags,
	out: &mut (dyn Write + Send),
	ctx: Context,
) -> Result<()> {
	let Some(spec) = lookup(noun, verb) else {
		warn!(noun, verb, "unknown command, nothing to do");
		return Ok(());
	};

	if let Some(missing) = spec.required.iter().find(|flag| !flags.is_set(**flag)) {
		return Err(miette!(
			"{noun} {verb} needs {} (or its environment variable)",
			missing.name()
		));
	}

	debug!(noun, verb, ?flags, "dispatching");
	(spec.handler)(Invocation {
		spec,
		gateway,
		flags,
		out,
		ctx,
	})
	.await
}

fn not_implemented(inv: Invocation<'_>) -> BoxFuture<'_, Result<()>> {
	Box::pin(async move {
		warn!(
			noun = inv.spec.noun,
			verb = inv.spec.verb,
			"not implemented yet"
		);
		Ok(())
	})
}

fn list_projects(mut inv: Invocation<'_>) -> BoxFuture<'_, Result<()>> {
	Box::pin(async move {
		let projects = inv.gateway.list_projects().await?;
		inv.render(&projects)
	})
}

fn list_device_pools(mut inv: Invocation<'_>) -> BoxFuture<'_, Result<()>> {
	Box::pin(async move {
		let filter = inv.filter();
		let pools = inv.gateway.list_device_pools(filter).await?;
		inv.render(&pools)
	})
}

fn list_devices(mut inv: Invocation<'_>) -> BoxFuture<'_, Result<()>> {
	Box::pin(async move {
		let devices = inv.gateway.list_devices().await?;
		inv.render(&devices)
	})
}

fn list_jobs(mut inv: Invocation<'_>) -> BoxFuture<'_, Result<()>> {
	Box::pin(async move {
		let filter = inv.filter();
		let jobs = inv.gateway.list_jobs(filter).await?;
		inv.render(&jobs)
	})
}

fn list_runs(mut inv: Invocation<'_>) -> BoxFuture<'_, Result<()>> {
	Box::pin(async move {
		let filter = inv.filter();
		let runs = inv.gateway.list_runs(filter).await?;
		inv.render(&runs)
	})
}

fn list_suites(mut inv: Invocation<'_>) -> BoxFuture<'_, Result<()>> {
	Box::pin(async move {
		let filter = inv.filter();
		let suites = inv.gateway.list_suites(filter).await?;
		inv.render(&suites)
	})
}

fn list_tests(mut inv: Invocation<'_>) -> BoxFuture<'_, Result<()>> {
	Box::pin(async move {
		let filter = inv.filter();
		let tests = inv.gateway.list_tests(filter).await?;
		inv.render(&tests)
	})
}

fn list_problems(mut inv: Invocation<'_>) -> BoxFuture<'_, Result<()>> {
	Box::pin(async move {
		let filter = inv.filter();
		let problems = inv.gateway.list_unique_problems(filter).await?;
		inv.render(&problems)
	})
}

fn list_uploads(mut inv: Invocation<'_>) -> BoxFuture<'_, Result<()>> {
	Box::pin(async move {
		let filter = inv.filter();
		let uploads = inv.gateway.list_uploads(filter).await?;
		inv.render(&uploads)
	})
}

fn upload_info(mut inv: Invocation<'_>) -> BoxFuture<'_, Result<()>> {
	Box::pin(async move {
		let filter = inv.filter();
		let upload = inv.gateway.get_upload(filter).await?;
		inv.render(&upload)
	})
}

#[derive(Debug, Serialize)]
struct ArtifactListing<'a> {
	#[serde(rename = "type")]
	kind: ArtifactType,
	artifacts: &'a [Artifact],
}

/// Lists every artifact category, one call each, printing each as it comes back.
///
/// A failing category doesn't stop the others; the first failure is returned at the end.
fn list_artifacts(mut inv: Invocation<'_>) -> BoxFuture<'_, Result<()>> {
	Box::pin(async move {
		let filter = inv.filter().to_owned();
		if let Some(requested) = inv.flags.artifact_type {
			debug!(%requested, "listing all artifact types regardless of --type");
		}

		let mut first_failure = None;
		for kind in ArtifactType::ALL {
			match inv.gateway.list_artifacts(&filter, kind).await {
				Ok(artifacts) => inv.render(&ArtifactListing {
					kind,
					artifacts: &artifacts,
				})?,
				Err(err) => {
					error!(%kind, "listing artifacts failed: {err}");
					first_failure.get_or_insert(err);
				}
			}
		}

		match first_failure {
			Some(err) => Err(err.into()),
			None => Ok(()),
		}
	})
}

fn schedule_run(mut inv: Invocation<'_>) -> BoxFuture<'_, Result<()>> {
	Box::pin(async move {
		let flags = inv.flags;
		let test_type = flags
			.test_type
			.ok_or_else(|| miette!("missing {}", Flag::TestType.name()))?;
		let test_upload = flags.identifier(Flag::Test).filter(|t| !t.is_empty());
		if test_upload.is_none() && test_type.needs_package() {
			warn!(%test_type, "no test package given, the service will likely reject this run");
		}

		let request = ScheduleRequest {
			name: flags.id(Flag::Name).into(),
			project: flags.id(Flag::Project).into(),
			app_upload: flags.id(Flag::App).into(),
			device_pool: flags.id(Flag::DevicePool).into(),
			test_type,
			test_upload: test_upload.map(Into::into),
		};

		let run = inv.gateway.schedule_run(&request).await?;
		info!(arn = ?run.execution.arn, "run scheduled");
		inv.render(&run)
	})
}

fn create_upload(mut inv: Invocation<'_>) -> BoxFuture<'_, Result<()>> {
	Box::pin(async move {
		let flags = inv.flags;
		let request = UploadRequest {
			name: flags.id(Flag::Name).into(),
			project: flags.id(Flag::Project).into(),
			kind: flags
				.upload_type
				.ok_or_else(|| miette!("missing {}", Flag::UploadType.name()))?,
			content_type: None,
		};

		let upload = inv.gateway.create_upload(&request).await?;
		inv.render(&upload)
	})
}

fn upload_file(mut inv: Invocation<'_>) -> BoxFuture<'_, Result<()>> {
	Box::pin(async move {
		let flags = inv.flags;
		let path = flags
			.file
			.as_deref()
			.ok_or_else(|| miette!("missing {}", Flag::File.name()))?;
		let kind = flags
			.upload_type
			.ok_or_else(|| miette!("missing {}", Flag::UploadType.name()))?;

		let mut pipeline = UploadPipeline::new(inv.gateway, flags.write_timeout)?
			.with_progress(inv.ctx.data_bar(0));
		let outcome = pipeline
			.upload_file(path, flags.id(Flag::Project), kind)
			.await?;
		inv.render(&outcome)
	})
}
