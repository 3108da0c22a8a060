use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueHint};

use crate::{commands::Flags, model::UploadType};

use super::ProjectArg;

/// Manage the uploads.
#[derive(Debug, Clone, Parser)]
pub struct UploadArgs {
	/// Upload subcommand
	#[command(subcommand)]
	pub action: UploadAction,
}

#[derive(Debug, Clone, Subcommand)]
pub enum UploadAction {
	Create(CreateArgs),
	File(FileArgs),
	Info(InfoArgs),
	/// List the uploads of a project.
	List(ProjectArg),
}

/// Create an upload.
///
/// This only registers the upload with Device Farm; the returned URL is where its contents must
/// then be written. Use `upload file` to do both in one go.
#[derive(Debug, Clone, Parser)]
pub struct CreateArgs {
	#[command(flatten)]
	pub project: ProjectArg,

	/// Name of the upload.
	#[arg(long, env = "DF_UPLOAD_NAME")]
	pub name: Option<String>,

	/// Type of upload.
	#[arg(long = "type", value_name = "TYPE", env = "DF_UPLOAD_TYPE", required = true)]
	pub upload_type: UploadType,
}

/// Upload a file.
///
/// Registers an upload named after the file, then writes the whole file to the URL Device Farm
/// returns for it. The file is read into memory first.
///
/// If the write fails, the upload stays registered on the Device Farm side, without contents.
/// It is not retried nor cleaned up.
#[derive(Debug, Clone, Parser)]
pub struct FileArgs {
	#[command(flatten)]
	pub project: ProjectArg,

	/// Path to the file to upload.
	#[arg(long, value_name = "PATH", value_hint = ValueHint::FilePath, env = "DF_FILE", required = true)]
	pub file: PathBuf,

	/// Type of upload.
	#[arg(long = "type", value_name = "TYPE", env = "DF_UPLOAD_TYPE", required = true)]
	pub upload_type: UploadType,

	/// Give up on the write after this long.
	///
	/// Takes a duration with a unit, like `90s`, `10m` or `1h`. By default there is no limit.
	#[arg(long, value_name = "DURATION", env = "DF_WRITE_TIMEOUT")]
	pub write_timeout: Option<humantime::Duration>,
}

/// Show an upload.
///
/// Includes its processing status, and any message Device Farm has about it.
#[derive(Debug, Clone, Parser)]
pub struct InfoArgs {
	/// Upload ARN.
	#[arg(long, value_name = "ARN", env = "DF_UPLOAD")]
	pub upload: Option<String>,
}

pub fn invocation(args: UploadArgs) -> (&'static str, Flags) {
	match args.action {
		UploadAction::Create(args) => (
			"create",
			Flags {
				name: args.name,
				upload_type: Some(args.upload_type),
				..args.project.into()
			},
		),
		UploadAction::File(args) => (
			"file",
			Flags {
				file: Some(args.file),
				upload_type: Some(args.upload_type),
				write_timeout: args.write_timeout.map(Into::into),
				..args.project.into()
			},
		),
		UploadAction::Info(args) => (
			"info",
			Flags {
				upload: args.upload,
				..Flags::default()
			},
		),
		UploadAction::List(args) => ("list", args.into()),
	}
}
