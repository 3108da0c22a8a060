use devicefarm_cli::{
	commands::{dispatch, Flags},
	model::{ArtifactType, TestType, UploadType},
	Context,
};
use serde_json::Value;

mod common;
use common::FakeGateway;

async fn run(
	gateway: &FakeGateway,
	noun: &str,
	verb: &str,
	flags: Flags,
) -> (miette::Result<()>, Vec<u8>) {
	let mut out = Vec::new();
	let res = dispatch(gateway, noun, verb, &flags, &mut out, Context::new()).await;
	(res, out)
}

fn documents(out: &[u8]) -> Vec<Value> {
	serde_json::Deserializer::from_slice(out)
		.into_iter::<Value>()
		.collect::<Result<_, _>>()
		.unwrap()
}

#[tokio::test]
async fn projects_are_printed() {
	let gateway = FakeGateway::new().with_projects(&["alpha", "beta"]);
	let (res, out) = run(&gateway, "projects", "list", Flags::default()).await;
	res.unwrap();

	assert_eq!(gateway.calls(), ["list_projects"]);
	let docs = documents(&out);
	assert_eq!(docs.len(), 1);
	let names: Vec<_> = docs[0]
		.as_array()
		.unwrap()
		.iter()
		.map(|p| p["name"].as_str().unwrap())
		.collect();
	assert_eq!(names, ["alpha", "beta"]);
}

#[tokio::test]
async fn artifacts_fan_out_in_order() {
	let gateway = FakeGateway::new();
	let flags = Flags {
		run: Some("arn:X".into()),
		artifact_type: Some(ArtifactType::Screenshot),
		..Flags::default()
	};
	let (res, out) = run(&gateway, "artifacts", "list", flags).await;
	res.unwrap();

	assert_eq!(
		gateway.calls(),
		[
			"list_artifacts LOG arn:X",
			"list_artifacts SCREENSHOT arn:X",
			"list_artifacts FILE arn:X",
		]
	);
	let kinds: Vec<_> = documents(&out)
		.iter()
		.map(|doc| doc["type"].as_str().unwrap().to_owned())
		.collect();
	assert_eq!(kinds, ["LOG", "SCREENSHOT", "FILE"]);
}

#[tokio::test]
async fn artifacts_keep_going_after_a_failed_category() {
	let gateway = FakeGateway::new().failing("list_artifacts SCREENSHOT");
	let flags = Flags {
		job: Some("arn:job".into()),
		..Flags::default()
	};
	let (res, out) = run(&gateway, "artifacts", "list", flags).await;

	let err = res.unwrap_err();
	assert!(err.to_string().contains("Invalid ARN"), "{err}");
	assert_eq!(gateway.calls().len(), 3);
	let kinds: Vec<_> = documents(&out)
		.iter()
		.map(|doc| doc["type"].as_str().unwrap().to_owned())
		.collect();
	assert_eq!(kinds, ["LOG", "FILE"]);
}

#[tokio::test]
async fn run_wins_over_job() {
	let gateway = FakeGateway::new();
	let flags = Flags {
		run: Some("arn:run".into()),
		job: Some("arn:job".into()),
		..Flags::default()
	};
	let (res, _) = run(&gateway, "suites", "list", flags).await;
	res.unwrap();
	assert_eq!(gateway.calls(), ["list_suites arn:run"]);
}

#[tokio::test]
async fn empty_run_falls_back_to_job() {
	let gateway = FakeGateway::new();
	let flags = Flags {
		run: Some(String::new()),
		job: Some("arn:job".into()),
		..Flags::default()
	};
	let (res, _) = run(&gateway, "suites", "list", flags).await;
	res.unwrap();
	assert_eq!(gateway.calls(), ["list_suites arn:job"]);
}

#[tokio::test]
async fn missing_filter_is_forwarded_empty() {
	let gateway = FakeGateway::new();
	let (res, _) = run(&gateway, "jobs", "list", Flags::default()).await;
	res.unwrap();
	assert_eq!(gateway.calls(), ["list_jobs "]);
}

#[tokio::test]
async fn rejected_listing_prints_nothing() {
	let gateway = FakeGateway::new().failing("list_jobs");
	let flags = Flags {
		run: Some("bad".into()),
		..Flags::default()
	};
	let (res, out) = run(&gateway, "jobs", "list", flags).await;

	let err = res.unwrap_err();
	assert_eq!(
		err.to_string(),
		"fake was rejected (ArgumentException): Invalid ARN"
	);
	assert!(out.is_empty());
}

#[tokio::test]
async fn schedule_passes_every_flag() {
	let gateway = FakeGateway::new();
	let flags = Flags {
		project: Some("arn:project".into()),
		device_pool: Some("arn:pool".into()),
		name: Some("nightly".into()),
		test_type: Some(TestType::Instrumentation),
		test: Some("arn:test-package".into()),
		app: Some("arn:app".into()),
		..Flags::default()
	};
	let (res, out) = run(&gateway, "runs", "schedule", flags).await;
	res.unwrap();

	assert_eq!(
		gateway.calls(),
		["schedule_run nightly arn:project arn:app arn:pool INSTRUMENTATION arn:test-package"]
	);
	assert_eq!(documents(&out)[0]["arn"], "arn:run:new");
}

#[tokio::test]
async fn schedule_needs_a_test_type() {
	let gateway = FakeGateway::new();
	let (res, _) = run(&gateway, "runs", "schedule", Flags::default()).await;
	assert!(res.unwrap_err().to_string().contains("--test-type"));
	assert!(gateway.calls().is_empty());
}

#[tokio::test]
async fn upload_create_registers_without_content_type() {
	let gateway = FakeGateway::new();
	let flags = Flags {
		project: Some("arn:project".into()),
		name: Some("app.apk".into()),
		upload_type: Some(UploadType::AndroidApp),
		..Flags::default()
	};
	let (res, out) = run(&gateway, "upload", "create", flags).await;
	res.unwrap();

	assert_eq!(
		gateway.calls(),
		["create_upload app.apk arn:project ANDROID_APP -"]
	);
	assert_eq!(documents(&out)[0]["status"], "INITIALIZED");
}

#[tokio::test]
async fn upload_info_looks_up_one_upload() {
	let gateway = FakeGateway::new();
	let flags = Flags {
		upload: Some("arn:upload".into()),
		..Flags::default()
	};
	let (res, _) = run(&gateway, "upload", "info", flags).await;
	res.unwrap();
	assert_eq!(gateway.calls(), ["get_upload arn:upload"]);
}

#[tokio::test]
async fn upload_file_needs_a_file() {
	let gateway = FakeGateway::new();
	let flags = Flags {
		upload_type: Some(UploadType::AndroidApp),
		..Flags::default()
	};
	let (res, _) = run(&gateway, "upload", "file", flags).await;
	assert!(res.unwrap_err().to_string().contains("--file"));
	assert!(gateway.calls().is_empty());
}

#[tokio::test]
async fn samples_do_nothing() {
	let gateway = FakeGateway::new();
	let (res, out) = run(&gateway, "samples", "list", Flags::default()).await;
	res.unwrap();
	assert!(gateway.calls().is_empty());
	assert!(out.is_empty());
}

#[tokio::test]
async fn unknown_command_is_a_no_op() {
	let gateway = FakeGateway::new();
	let (res, out) = run(&gateway, "widgets", "list", Flags::default()).await;
	res.unwrap();
	assert!(gateway.calls().is_empty());
	assert!(out.is_empty());
}

#[tokio::test]
async fn each_listing_calls_its_gateway_method() {
	let project = || Flags {
		project: Some("arn:P".into()),
		..Flags::default()
	};
	let run_flags = || Flags {
		run: Some("arn:R".into()),
		..Flags::default()
	};

	let cases = [
		("devicepools", "list", project(), "list_device_pools arn:P"),
		("devices", "list", Flags::default(), "list_devices"),
		("runs", "list", project(), "list_runs arn:P"),
		("tests", "list", run_flags(), "list_tests arn:R"),
		("problems", "list", run_flags(), "list_unique_problems arn:R"),
		("jobs", "list", run_flags(), "list_jobs arn:R"),
		("upload", "list", project(), "list_uploads arn:P"),
	];

	for (noun, verb, flags, expected) in cases {
		let gateway = FakeGateway::new();
		let (res, out) = run(&gateway, noun, verb, flags).await;
		res.unwrap();
		assert_eq!(gateway.calls(), [expected], "{noun} {verb}");
		assert_eq!(documents(&out).len(), 1, "{noun} {verb}");
	}
}

#[tokio::test]
async fn listings_ignore_flags_outside_their_filter() {
	let gateway = FakeGateway::new();
	let flags = Flags {
		project: Some("arn:P".into()),
		job: Some("arn:J".into()),
		..Flags::default()
	};
	let (res, _) = run(&gateway, "tests", "list", flags).await;
	res.unwrap();
	assert_eq!(gateway.calls(), ["list_tests "]);
}
