use std::{error::Error as StdError, path::PathBuf};

use aws_sdk_devicefarm::{
	config::http::HttpResponse,
	error::{DisplayErrorContext, ProvideErrorMetadata, SdkError},
};

pub type BoxError = Box<dyn StdError + Send + Sync + 'static>;

/// Why a command failed.
///
/// None of these are retried: they end the command where they're raised, except inside the
/// artifact fan-out where each category fails on its own.
#[derive(Debug, thiserror::Error, miette::Diagnostic)]
pub enum Error {
	#[error("failed to {action} {}", .path.display())]
	#[diagnostic(code(devicefarm::local_io))]
	LocalIo {
		action: &'static str,
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},

	#[error("{operation} was rejected{}: {message}", .code.as_deref().map(|c| format!(" ({c})")).unwrap_or_default())]
	#[diagnostic(code(devicefarm::remote_request))]
	RemoteRequest {
		operation: &'static str,
		code: Option<String>,
		message: String,
	},

	#[error("{operation} could not reach {target}")]
	#[diagnostic(code(devicefarm::transport))]
	Transport {
		operation: &'static str,
		target: String,
		#[source]
		source: BoxError,
	},

	#[error("write target {url:?} is malformed: {reason}")]
	#[diagnostic(
		code(devicefarm::url_malformed),
		help("the target must be used exactly as issued; request a new upload")
	)]
	UrlMalformed { url: String, reason: String },
}

impl Error {
	/// Sort an SDK failure into a rejected request or a transport failure.
	pub fn from_sdk<E>(operation: &'static str, err: SdkError<E, HttpResponse>) -> Self
	where
		E: ProvideErrorMetadata + StdError + Send + Sync + 'static,
	{
		match err {
			SdkError::ServiceError(service) => {
				let err = service.into_err();
				Self::RemoteRequest {
					operation,
					code: err.code().map(ToOwned::to_owned),
					message: err
						.message()
						.map_or_else(|| DisplayErrorContext(&err).to_string(), ToOwned::to_owned),
				}
			}
			other => Self::Transport {
				operation,
				target: "AWS Device Farm".into(),
				source: DisplayErrorContext(other).to_string().into(),
			},
		}
	}

	pub fn is_local_io(&self) -> bool {
		matches!(self, Self::LocalIo { .. })
	}

	pub fn is_remote_request(&self) -> bool {
		matches!(self, Self::RemoteRequest { .. })
	}

	pub fn is_transport(&self) -> bool {
		matches!(self, Self::Transport { .. })
	}

	pub fn is_url_malformed(&self) -> bool {
		matches!(self, Self::UrlMalformed { .. })
	}
}

#[test]
fn remote_request_message_includes_code() {
	let err = Error::RemoteRequest {
		operation: "ListJobs",
		code: Some("ArgumentException".into()),
		message: "Invalid ARN".into(),
	};
	assert_eq!(
		err.to_string(),
		"ListJobs was rejected (ArgumentException): Invalid ARN"
	);
}

#[test]
fn remote_request_message_without_code() {
	let err = Error::RemoteRequest {
		operation: "storage write",
		code: None,
		message: "HTTP 403".into(),
	};
	assert_eq!(err.to_string(), "storage write was rejected: HTTP 403");
}
