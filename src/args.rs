use std::{env::var, fs::metadata, io::stderr, path::PathBuf};

use clap::{ArgAction, Parser, ValueEnum, ValueHint};
use miette::{bail, Result};
use tracing::{debug, warn};
use tracing_appender::{non_blocking, non_blocking::WorkerGuard, rolling};

use crate::aws::AwsArgs;

/// Interact with AWS Device Farm from the command line.
///
/// Results are printed to stdout as JSON. Every flag can also be given through the environment
/// variable named in its help; a flag given on the command line wins over the environment.
#[derive(Debug, Clone, Parser)]
#[command(
	author,
	version,
	after_help = "Want more detail? Try the long '--help' flag!",
	after_long_help = "Didn't expect this much output? Use the short '-h' flag to get short help."
)]
#[cfg_attr(debug_assertions, command(before_help = "⚠ DEBUG BUILD ⚠"))]
pub struct Args {
	/// When to use terminal colours
	///
	/// You can also set the NO_COLOR environment variable to disable colours.
	#[arg(long, default_value = "auto", value_name = "MODE", alias = "colour")]
	pub color: ColourMode,

	/// Set diagnostic log level
	///
	/// This enables diagnostic logging, which is useful for investigating bugs or looking at what
	/// is sent to Device Farm. Use multiple times to increase verbosity. Goes up to '-vvvvv'.
	///
	/// You may want to use with '--log-file' to avoid polluting your terminal.
	///
	/// Setting $RUST_LOG also works, and takes precedence, but is not recommended unless you know
	/// what you're doing. However, using $RUST_LOG is the only way to get logs from before these
	/// options are parsed.
	#[arg(
		long,
		short,
		action = ArgAction::Count,
		num_args = 0,
		default_value = "0",
	)]
	pub verbose: u8,

	/// Write diagnostic logs to a file
	///
	/// This writes diagnostic logs to a file, instead of the terminal, in JSON format.
	///
	/// If the path provided is a directory, a file will be created in that directory. The file name
	/// will be the current date and time, in the format 'devicefarm.YYYY-MM-DDTHH-MM-SSZ.log'.
	#[arg(
		long,
		num_args = 0..=1,
		default_missing_value = ".",
		value_hint = ValueHint::AnyPath,
		value_name = "PATH",
	)]
	pub log_file: Option<PathBuf>,

	/// Omit timestamps in logs
	///
	/// This option is ignored if the log file is set, or when using $RUST_LOG (as logging is
	/// initialized before arguments are parsed in that case).
	#[arg(long)]
	pub log_timeless: bool,

	#[command(flatten)]
	pub aws: AwsArgs,

	/// What to do
	#[command(subcommand)]
	pub action: crate::actions::Action,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, ValueEnum)]
pub enum ColourMode {
	Auto,
	Always,
	Never,
}

pub fn get_args() -> Result<(Args, Option<WorkerGuard>)> {
	let prearg_logs = logging_preargs();
	if prearg_logs {
		warn!("⚠ RUST_LOG environment variable set, logging options have no effect");
	}

	debug!("parsing arguments");
	let mut args = Args::parse();

	// https://no-color.org/
	if var("NO_COLOR").is_ok() {
		args.color = ColourMode::Never;
	} else if enable_ansi_support::enable_ansi_support().is_err() {
		args.color = ColourMode::Never;
	}

	let log_guard = if !prearg_logs {
		Some(logging_postargs(&args)?)
	} else {
		None
	};

	debug!(?args, "got arguments");
	Ok((args, log_guard))
}

pub fn logging_preargs() -> bool {
	let Ok(filter) = var("RUST_LOG") else {
		return false;
	};

	match tracing_subscriber::fmt().with_writer(stderr).try_init() {
		Ok(()) => {
			debug!(RUST_LOG=%filter, "logging configured from RUST_LOG");
			true
		}
		Err(e) => {
			eprintln!("Failed to initialise logging with RUST_LOG, falling back\n{e}");
			false
		}
	}
}

pub fn logging_postargs(args: &Args) -> Result<WorkerGuard> {
	let (log_writer, guard) = if let Some(file) = &args.log_file {
		let is_dir = metadata(file).map_or(false, |info| info.is_dir());
		let (dir, filename) = if is_dir {
			(
				file.to_owned(),
				PathBuf::from(format!(
					"devicefarm.{}.log",
					chrono::Utc::now().format("%Y-%m-%dT%H-%M-%SZ")
				)),
			)
		} else if let (Some(parent), Some(file_name)) = (file.parent(), file.file_name()) {
			(parent.into(), PathBuf::from(file_name))
		} else {
			bail!("Failed to determine log file name");
		};

		non_blocking(rolling::never(dir, filename))
	} else {
		non_blocking(stderr())
	};

	let mut builder = tracing_subscriber::fmt().with_env_filter(match args.verbose {
		0 => "warn,devicefarm_cli=info",
		1 => "info,devicefarm_cli=debug",
		2 => "debug",
		3 => "debug,devicefarm_cli=trace",
		_ => "trace",
	});

	match args.color {
		ColourMode::Never => {
			builder = builder.with_ansi(false);
		}
		ColourMode::Always => {
			builder = builder.with_ansi(true);
		}
		ColourMode::Auto => {}
	}

	if args.verbose > 0 {
		use tracing_subscriber::fmt::format::FmtSpan;
		builder = builder.with_span_events(FmtSpan::NEW | FmtSpan::CLOSE);
	}

	match if args.log_file.is_some() {
		builder.json().with_writer(log_writer).try_init()
	} else if args.verbose > 3 {
		builder.pretty().with_writer(log_writer).try_init()
	} else if args.log_timeless {
		builder.without_time().with_writer(log_writer).try_init()
	} else {
		builder.with_writer(log_writer).try_init()
	} {
		Ok(()) => debug!("logging initialised"),
		Err(e) => eprintln!("Failed to initialise logging, continuing with none\n{e}"),
	}

	Ok(guard)
}

#[test]
fn verify_cli() {
	use clap::CommandFactory;
	Args::command().debug_assert()
}

#[test]
fn explicit_flag_is_parsed() {
	let args = Args::try_parse_from([
		"devicefarm-cli",
		"jobs",
		"list",
		"--run",
		"arn:aws:devicefarm:us-west-2:123:run:abc/def",
	])
	.unwrap();
	let crate::actions::Action::Jobs(jobs) = args.action else {
		panic!("expected jobs, got {:?}", args.action);
	};
	let (verb, flags) = crate::actions::jobs::invocation(jobs);
	assert_eq!(verb, "list");
	assert_eq!(
		flags.run.as_deref(),
		Some("arn:aws:devicefarm:us-west-2:123:run:abc/def")
	);
}

#[test]
fn unknown_test_type_is_rejected() {
	let err = Args::try_parse_from([
		"devicefarm-cli",
		"runs",
		"schedule",
		"--test-type",
		"ESPRESSO_MAYBE",
	])
	.unwrap_err();
	assert_eq!(err.kind(), clap::error::ErrorKind::InvalidValue);
}

#[test]
fn artifact_type_is_typed() {
	let args = temp_env::with_var_unset("DF_RUN", || {
		Args::try_parse_from([
			"devicefarm-cli",
			"artifacts",
			"list",
			"--job",
			"arn:job",
			"--type",
			"SCREENSHOT",
		])
	})
	.unwrap();
	let crate::actions::Action::Artifacts(artifacts) = args.action else {
		panic!("expected artifacts, got {:?}", args.action);
	};
	let (verb, flags) = crate::actions::artifacts::invocation(artifacts);
	assert_eq!(verb, "list");
	assert_eq!(flags.job.as_deref(), Some("arn:job"));
	assert_eq!(flags.run, None);
	assert_eq!(
		flags.artifact_type,
		Some(crate::model::ArtifactType::Screenshot)
	);
}

#[test]
fn run_from_environment() {
	let args = temp_env::with_var("DF_RUN", Some("arn:env"), || {
		Args::try_parse_from(["devicefarm-cli", "jobs", "list"])
	})
	.unwrap();
	let crate::actions::Action::Jobs(jobs) = args.action else {
		panic!("expected jobs, got {:?}", args.action);
	};
	let (_, flags) = crate::actions::jobs::invocation(jobs);
	assert_eq!(flags.run.as_deref(), Some("arn:env"));
}

#[test]
fn flag_beats_environment() {
	let args = temp_env::with_var("DF_RUN", Some("arn:env"), || {
		Args::try_parse_from(["devicefarm-cli", "jobs", "list", "--run", "arn:flag"])
	})
	.unwrap();
	let crate::actions::Action::Jobs(jobs) = args.action else {
		panic!("expected jobs, got {:?}", args.action);
	};
	let (_, flags) = crate::actions::jobs::invocation(jobs);
	assert_eq!(flags.run.as_deref(), Some("arn:flag"));
}

#[test]
fn required_type_from_environment() {
	let args = temp_env::with_vars(
		[
			("DF_UPLOAD_TYPE", Some("ANDROID_APP")),
			("DF_PROJECT", Some("arn:project")),
			("DF_UPLOAD_NAME", None),
		],
		|| Args::try_parse_from(["devicefarm-cli", "upload", "create"]),
	)
	.unwrap();
	let crate::actions::Action::Upload(upload) = args.action else {
		panic!("expected upload, got {:?}", args.action);
	};
	let (verb, flags) = crate::actions::upload::invocation(upload);
	assert_eq!(verb, "create");
	assert_eq!(
		flags.upload_type,
		Some(crate::model::UploadType::AndroidApp)
	);
	assert_eq!(flags.project.as_deref(), Some("arn:project"));
	assert_eq!(flags.name, None);
}

#[test]
fn schedule_flags_from_environment() {
	let args = temp_env::with_vars(
		[
			("DF_TEST_TYPE", Some("BUILTIN_FUZZ")),
			("DF_DEVICE_POOL", Some("arn:pool")),
			("DF_RUN_NAME", Some("nightly")),
			("DF_TEST", Some("arn:test")),
			("DF_APP", Some("arn:app")),
		],
		|| Args::try_parse_from(["devicefarm-cli", "runs", "schedule"]),
	)
	.unwrap();
	let crate::actions::Action::Runs(runs) = args.action else {
		panic!("expected runs, got {:?}", args.action);
	};
	let (verb, flags) = crate::actions::runs::invocation(runs);
	assert_eq!(verb, "schedule");
	assert_eq!(flags.test_type, Some(crate::model::TestType::BuiltinFuzz));
	assert_eq!(flags.device_pool.as_deref(), Some("arn:pool"));
	assert_eq!(flags.name.as_deref(), Some("nightly"));
	assert_eq!(flags.test.as_deref(), Some("arn:test"));
	assert_eq!(flags.app.as_deref(), Some("arn:app"));
}

#[test]
fn every_subcommand_is_in_the_table() {
	use clap::CommandFactory;
	let cmd = Args::command();
	for noun in cmd.get_subcommands() {
		for verb in noun.get_subcommands() {
			assert!(
				crate::commands::lookup(noun.get_name(), verb.get_name()).is_some(),
				"{} {} has no handler",
				noun.get_name(),
				verb.get_name()
			);
		}
	}
}
