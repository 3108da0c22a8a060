use std::io::Write;

use devicefarm_cli::{
	model::UploadType,
	upload::{UploadPipeline, UploadState, OCTET_STREAM},
};
use httpmock::MockServer;
use tempfile::NamedTempFile;

mod common;
use common::FakeGateway;

fn app_file(contents: &[u8]) -> NamedTempFile {
	let mut file = NamedTempFile::new().unwrap();
	file.write_all(contents).unwrap();
	file.flush().unwrap();
	file
}

#[tokio::test]
async fn writes_to_the_issued_target() {
	let server = MockServer::start_async().await;
	let mock = server
		.mock_async(|when, then| {
			when.method("PUT")
				.path("/bucket/key")
				.query_param("Sig", "abc")
				.query_param("Expires", "99")
				.header("content-type", OCTET_STREAM)
				.header("content-length", "11")
				.body("hello world");
			then.status(200).header("etag", "\"5eb63bbbe01eeed093cb22bb8f5acdc3\"");
		})
		.await;

	let file = app_file(b"hello world");
	let gateway = FakeGateway::new().with_upload_url(format!(
		"{}/bucket/key?Sig=abc&Expires=99",
		server.base_url()
	));
	let mut pipeline = UploadPipeline::new(&gateway, None).unwrap();
	let outcome = pipeline
		.upload_file(file.path(), "arn:project", UploadType::AndroidApp)
		.await
		.unwrap();

	mock.assert_async().await;
	assert_eq!(outcome.bytes, 11);
	assert_eq!(outcome.storage.status, 200);
	assert!(outcome
		.storage
		.headers
		.iter()
		.any(|(name, value)| name == "etag" && value.contains("5eb63bbb")));
	assert_eq!(
		pipeline.states(),
		[
			UploadState::Created,
			UploadState::Transferring,
			UploadState::Completed
		]
	);

	let name = file.path().file_name().unwrap().to_string_lossy();
	assert_eq!(
		gateway.calls(),
		[format!("create_upload {name} arn:project ANDROID_APP {OCTET_STREAM}")]
	);
}

#[tokio::test]
async fn missing_file_registers_nothing() {
	let gateway = FakeGateway::new().with_upload_url("http://127.0.0.1:9/bucket/key?Sig=abc");
	let dir = tempfile::tempdir().unwrap();
	let mut pipeline = UploadPipeline::new(&gateway, None).unwrap();

	let err = pipeline
		.upload_file(&dir.path().join("nope.apk"), "", UploadType::AndroidApp)
		.await
		.unwrap_err();

	assert!(err.is_local_io(), "{err}");
	assert!(gateway.calls().is_empty());
	assert_eq!(pipeline.states(), [UploadState::Failed]);
}

#[tokio::test]
async fn rejected_registration_writes_nothing() {
	let file = app_file(b"apk");
	let gateway = FakeGateway::new()
		.failing("create_upload")
		.with_upload_url("http://127.0.0.1:9/bucket/key?Sig=abc");
	let mut pipeline = UploadPipeline::new(&gateway, None).unwrap();

	let err = pipeline
		.upload_file(file.path(), "arn:project", UploadType::IosApp)
		.await
		.unwrap_err();

	assert!(err.is_remote_request(), "{err}");
	assert_eq!(gateway.calls().len(), 1);
	assert_eq!(pipeline.states(), [UploadState::Failed]);
}

#[tokio::test]
async fn storage_refusal_fails_the_upload() {
	let server = MockServer::start_async().await;
	let mock = server
		.mock_async(|when, then| {
			when.method("PUT").path("/bucket/key");
			then.status(403).body("<Error><Code>AccessDenied</Code></Error>");
		})
		.await;

	let file = app_file(b"apk bytes");
	let gateway = FakeGateway::new()
		.with_upload_url(format!("{}/bucket/key?Sig=expired", server.base_url()));
	let mut pipeline = UploadPipeline::new(&gateway, None).unwrap();

	let err = pipeline
		.upload_file(file.path(), "arn:project", UploadType::AndroidApp)
		.await
		.unwrap_err();

	mock.assert_async().await;
	assert!(err.is_remote_request(), "{err}");
	assert!(err.to_string().contains("AccessDenied"), "{err}");
	assert_eq!(
		pipeline.states(),
		[
			UploadState::Created,
			UploadState::Transferring,
			UploadState::Failed
		]
	);
}

#[tokio::test]
async fn malformed_target_is_not_written() {
	let file = app_file(b"apk");
	let gateway = FakeGateway::new().with_upload_url("https://s3-host/bucket/key");
	let mut pipeline = UploadPipeline::new(&gateway, None).unwrap();

	let err = pipeline
		.upload_file(file.path(), "", UploadType::AndroidApp)
		.await
		.unwrap_err();

	assert!(err.is_url_malformed(), "{err}");
	assert_eq!(pipeline.states(), [UploadState::Created, UploadState::Failed]);
}

#[tokio::test]
async fn no_target_at_all() {
	let file = app_file(b"apk");
	let gateway = FakeGateway::new();
	let mut pipeline = UploadPipeline::new(&gateway, None).unwrap();

	let err = pipeline
		.upload_file(file.path(), "", UploadType::AndroidApp)
		.await
		.unwrap_err();

	assert!(err.is_url_malformed(), "{err}");
}
