//! Uploading a local file: register it with the service, then write its bytes to the one-time
//! target the service hands back.

use std::{path::Path, time::Duration};

use bytes::Bytes;
use indicatif::ProgressBar;
use reqwest::{
	header::{CONTENT_LENGTH, CONTENT_TYPE},
	Client, Url,
};
use serde::Serialize;
use tokio::{fs::File, io::AsyncReadExt};
use tracing::{debug, info, instrument, warn};

use crate::{
	error::Error,
	gateway::Gateway,
	model::{Upload, UploadRequest, UploadType},
};

/// The only content type uploads are registered and written with.
pub const OCTET_STREAM: &str = "application/octet-stream";

/// A pre-signed write target, split into the parts that must survive reuse unchanged.
///
/// The signature covers the exact path and query the service issued. Both are kept as the raw
/// bytes found in the target; nothing is decoded, re-encoded, or reordered.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WriteTarget {
	origin: String,
	path: String,
	query: String,
}

impl WriteTarget {
	pub fn parse(url: &str) -> Result<Self, Error> {
		let malformed = |reason: &str| Error::UrlMalformed {
			url: url.into(),
			reason: reason.into(),
		};

		let Some((scheme, rest)) = url.split_once("://") else {
			return Err(malformed("no scheme"));
		};
		if !(scheme.eq_ignore_ascii_case("http") || scheme.eq_ignore_ascii_case("https")) {
			return Err(malformed("scheme must be http or https"));
		}

		let Some(path_start) = rest.find(|c| c == '/' || c == '?') else {
			return Err(malformed("no object path"));
		};
		let (host, path_and_query) = rest.split_at(path_start);
		if host.is_empty() {
			return Err(malformed("no host"));
		}

		let Some((path, query)) = path_and_query.split_once('?') else {
			return Err(malformed("no query string, so no signature"));
		};
		if path.len() <= 1 {
			return Err(malformed("no object path"));
		}
		if query.is_empty() {
			return Err(malformed("empty query string, so no signature"));
		}
		if query.contains('#') {
			return Err(malformed("fragment after the query string"));
		}

		Ok(Self {
			origin: format!("{}://{host}", scheme.to_ascii_lowercase()),
			path: path.into(),
			query: query.into(),
		})
	}

	/// Scheme and authority, eg `https://bucket.s3.amazonaws.com`.
	pub fn origin(&self) -> &str {
		&self.origin
	}

	/// The bucket/key path, starting with `/`.
	pub fn path(&self) -> &str {
		&self.path
	}

	/// The query string exactly as issued, without the leading `?`.
	pub fn query(&self) -> &str {
		&self.query
	}

	/// Put the parts back together into a request URL.
	///
	/// Fails rather than sending a request whose path or query would differ from the issued ones.
	pub fn to_url(&self) -> Result<Url, Error> {
		let raw = format!("{}{}?{}", self.origin, self.path, self.query);
		let url = Url::parse(&raw).map_err(|err| Error::UrlMalformed {
			url: raw.clone(),
			reason: err.to_string(),
		})?;

		if url.path() != self.path || url.query() != Some(self.query.as_str()) {
			return Err(Error::UrlMalformed {
				url: raw,
				reason: "path or query would be re-encoded".into(),
			});
		}

		Ok(url)
	}
}

/// Where an upload is in its lifecycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum UploadState {
	/// Registered with the service; the write target was granted.
	Created,
	/// Bytes are being written to the target.
	Transferring,
	/// Storage acknowledged the write.
	Completed,
	/// Nothing more will happen. A registered upload stays registered, and empty.
	Failed,
}

/// What storage answered to the write.
#[derive(Clone, Debug, Serialize)]
pub struct StorageResponse {
	pub status: u16,
	pub headers: Vec<(String, String)>,
	pub body: String,
}

#[derive(Clone, Debug, Serialize)]
pub struct UploadOutcome {
	pub upload: Upload,
	pub bytes: u64,
	pub storage: StorageResponse,
}

/// Drives one upload from local file to storage.
///
/// Every step runs once and in order. There is no retry, no resume, and no cleanup of an upload
/// that was registered but never written.
pub struct UploadPipeline<'g> {
	gateway: &'g dyn Gateway,
	client: Client,
	progress: Option<ProgressBar>,
	states: Vec<UploadState>,
}

impl<'g> UploadPipeline<'g> {
	/// Without a timeout the write waits as long as the transport lets it.
	pub fn new(gateway: &'g dyn Gateway, timeout: Option<Duration>) -> Result<Self, Error> {
		let mut client = Client::builder().user_agent(crate::APP_NAME);
		if let Some(timeout) = timeout {
			client = client.timeout(timeout);
		}

		Ok(Self {
			gateway,
			client: client.build().map_err(|err| Error::Transport {
				operation: "storage write",
				target: "HTTP client".into(),
				source: Box::new(err),
			})?,
			progress: None,
			states: Vec::new(),
		})
	}

	pub fn with_progress(mut self, bar: ProgressBar) -> Self {
		self.progress = Some(bar);
		self
	}

	/// Every state this pipeline went through, in order.
	pub fn states(&self) -> &[UploadState] {
		&self.states
	}

	pub fn state(&self) -> Option<UploadState> {
		self.states.last().copied()
	}

	fn transition(&mut self, state: UploadState) {
		info!(?state, "upload state");
		self.states.push(state);
	}

	/// Register `path` as an upload of `kind` in `project` and write its contents.
	#[instrument(skip(self))]
	pub async fn upload_file(
		&mut self,
		path: &Path,
		project: &str,
		kind: UploadType,
	) -> Result<UploadOutcome, Error> {
		let res = self.run(path, project, kind).await;
		if res.is_err() {
			self.transition(UploadState::Failed);
			if let Some(bar) = &self.progress {
				bar.abandon();
			}
		}
		res
	}

	async fn run(
		&mut self,
		path: &Path,
		project: &str,
		kind: UploadType,
	) -> Result<UploadOutcome, Error> {
		let contents = read_file(path).await?;
		let name = path
			.file_name()
			.map(|name| name.to_string_lossy().into_owned())
			.ok_or_else(|| Error::LocalIo {
				action: "name an upload after",
				path: path.into(),
				source: std::io::Error::new(std::io::ErrorKind::InvalidInput, "no file name"),
			})?;

		let upload = self
			.gateway
			.create_upload(&UploadRequest {
				name,
				project: project.into(),
				kind,
				content_type: Some(OCTET_STREAM.into()),
			})
			.await?;
		self.transition(UploadState::Created);
		debug!(?upload, "registered upload");

		let target = upload.url.as_deref().ok_or_else(|| Error::UrlMalformed {
			url: String::new(),
			reason: "the service returned no write target".into(),
		})?;
		let target = WriteTarget::parse(target)?;
		debug!(
			origin = target.origin(),
			path = target.path(),
			"split write target"
		);

		self.transition(UploadState::Transferring);
		let bytes = contents.len() as u64;
		if let Some(bar) = &self.progress {
			bar.set_length(bytes);
			bar.set_message(path.display().to_string());
			bar.tick();
		}

		let storage = self.write(&target, contents).await?;
		if let Some(bar) = &self.progress {
			bar.inc(bytes);
			bar.abandon(); // finish, leaving the completed bar in place
		}

		self.transition(UploadState::Completed);
		Ok(UploadOutcome {
			upload,
			bytes,
			storage,
		})
	}

	async fn write(&self, target: &WriteTarget, contents: Bytes) -> Result<StorageResponse, Error> {
		let url = target.to_url()?;
		let len = contents.len();

		info!(origin = target.origin(), bytes = len, "writing upload to storage");
		let transport = |err: reqwest::Error| Error::Transport {
			operation: "storage write",
			target: target.origin().into(),
			source: Box::new(err),
		};

		let res = self
			.client
			.put(url)
			.header(CONTENT_TYPE, OCTET_STREAM)
			.header(CONTENT_LENGTH, len)
			.body(contents)
			.send()
			.await
			.map_err(transport)?;

		let status = res.status();
		let headers = res
			.headers()
			.iter()
			.map(|(name, value)| {
				(
					name.to_string(),
					String::from_utf8_lossy(value.as_bytes()).into_owned(),
				)
			})
			.collect();
		let body = res.text().await.map_err(transport)?;
		debug!(%status, ?headers, %body, "storage response");

		if !status.is_success() {
			return Err(Error::RemoteRequest {
				operation: "storage write",
				code: Some(status.as_str().into()),
				message: if body.is_empty() {
					status.to_string()
				} else {
					body
				},
			});
		}

		Ok(StorageResponse {
			status: status.as_u16(),
			headers,
			body,
		})
	}
}

async fn read_file(path: &Path) -> Result<Bytes, Error> {
	let io = |action| move |source| Error::LocalIo {
		action,
		path: path.into(),
		source,
	};

	let mut file = File::open(path).await.map_err(io("open"))?;
	let size = file.metadata().await.map_err(io("stat"))?.len();

	let mut contents = Vec::with_capacity(usize::try_from(size).unwrap_or_default());
	file.read_to_end(&mut contents).await.map_err(io("read"))?;
	if contents.len() as u64 != size {
		warn!(
			expected = size,
			actual = contents.len(),
			"file changed size while reading"
		);
	}

	Ok(contents.into())
}

#[test]
fn split_signed_target() {
	let target = WriteTarget::parse(
		"https://prod-us-west-2-uploads.s3-us-west-2.amazonaws.com/arn%3Aaws%3Adevicefarm/app.apk?X-Amz-Algorithm=AWS4-HMAC-SHA256&X-Amz-Date=20151007T000000Z&X-Amz-Signature=ab%2Fcd",
	)
	.unwrap();
	assert_eq!(
		target.origin(),
		"https://prod-us-west-2-uploads.s3-us-west-2.amazonaws.com"
	);
	assert_eq!(target.path(), "/arn%3Aaws%3Adevicefarm/app.apk");
	assert_eq!(
		target.query(),
		"X-Amz-Algorithm=AWS4-HMAC-SHA256&X-Amz-Date=20151007T000000Z&X-Amz-Signature=ab%2Fcd"
	);
}

#[test]
fn split_keeps_query_order_and_repeats() {
	let target = WriteTarget::parse("https://host/bucket/key?b=2&a=1&a=0&Expires=99").unwrap();
	assert_eq!(target.path(), "/bucket/key");
	assert_eq!(target.query(), "b=2&a=1&a=0&Expires=99");
}

#[test]
fn split_keeps_port_in_origin() {
	let target = WriteTarget::parse("http://127.0.0.1:9000/bucket/key?Sig=abc").unwrap();
	assert_eq!(target.origin(), "http://127.0.0.1:9000");
	assert_eq!(target.path(), "/bucket/key");
}

#[test]
fn scheme_is_case_insensitive() {
	let target = WriteTarget::parse("HTTPS://s3-host/bucket/key?Sig=abc").unwrap();
	assert_eq!(target.origin(), "https://s3-host");
	assert_eq!(target.path(), "/bucket/key");
	assert_eq!(target.to_url().unwrap().as_str(), "https://s3-host/bucket/key?Sig=abc");
}

#[test]
fn split_only_at_first_question_mark() {
	let target = WriteTarget::parse("https://host/key?Sig=a?b&Expires=1").unwrap();
	assert_eq!(target.path(), "/key");
	assert_eq!(target.query(), "Sig=a?b&Expires=1");
}

#[test]
fn reconstructed_url_is_byte_identical() {
	let raw = "https://s3-host/bucket/some%20key.apk?Sig=abc%2B%3D&Expires=99&x-amz-meta=a,b";
	let target = WriteTarget::parse(raw).unwrap();
	let url = target.to_url().unwrap();
	assert_eq!(url.path(), "/bucket/some%20key.apk");
	assert_eq!(url.query(), Some("Sig=abc%2B%3D&Expires=99&x-amz-meta=a,b"));
	assert_eq!(url.as_str(), raw);
}

#[test]
fn reject_targets_without_parts() {
	for bad in [
		"s3-host/bucket/key?Sig=abc",
		"ftp://s3-host/bucket/key?Sig=abc",
		"https:///bucket/key?Sig=abc",
		"https://s3-host",
		"https://s3-host/?Sig=abc",
		"https://s3-host?Sig=abc",
		"https://s3-host/bucket/key",
		"https://s3-host/bucket/key?",
		"https://s3-host/bucket/key?Sig=abc#frag",
	] {
		let err = WriteTarget::parse(bad).unwrap_err();
		assert!(err.is_url_malformed(), "{bad}: {err}");
	}
}

#[test]
fn refuse_to_send_reencoded_path() {
	let target = WriteTarget::parse("https://s3-host/bucket/has space?Sig=abc").unwrap();
	assert!(target.to_url().unwrap_err().is_url_malformed());
}
