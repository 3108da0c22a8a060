//! Records returned by the Device Farm gateway, and the closed enumerations accepted at the
//! command line.
//!
//! Identifiers are kept as opaque strings: the service accepts either an ARN or a label in most
//! places, and nothing here tries to tell them apart.

use std::fmt;

use clap::ValueEnum;
use serde::Serialize;

/// Category of artifact a listing can be scoped to.
///
/// The remote listing accepts exactly one category per call, so listing "all" artifacts means
/// querying each of these in turn, in declaration order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, ValueEnum)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[value(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ArtifactType {
	Log,
	Screenshot,
	File,
}

impl ArtifactType {
	/// Every category, in the order listings are issued and printed.
	pub const ALL: [Self; 3] = [Self::Log, Self::Screenshot, Self::File];

	pub fn as_str(self) -> &'static str {
		match self {
			Self::Log => "LOG",
			Self::Screenshot => "SCREENSHOT",
			Self::File => "FILE",
		}
	}
}

impl fmt::Display for ArtifactType {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

/// Kind of file an upload holds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, ValueEnum)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[value(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UploadType {
	AndroidApp,
	IosApp,
	ExternalData,
	AppiumJavaJunitTestPackage,
	AppiumJavaTestngTestPackage,
	CalabashTestPackage,
	InstrumentationTestPackage,
	UiautomatorTestPackage,
	XctestTestPackage,
}

impl UploadType {
	pub fn as_str(self) -> &'static str {
		match self {
			Self::AndroidApp => "ANDROID_APP",
			Self::IosApp => "IOS_APP",
			Self::ExternalData => "EXTERNAL_DATA",
			Self::AppiumJavaJunitTestPackage => "APPIUM_JAVA_JUNIT_TEST_PACKAGE",
			Self::AppiumJavaTestngTestPackage => "APPIUM_JAVA_TESTNG_TEST_PACKAGE",
			Self::CalabashTestPackage => "CALABASH_TEST_PACKAGE",
			Self::InstrumentationTestPackage => "INSTRUMENTATION_TEST_PACKAGE",
			Self::UiautomatorTestPackage => "UIAUTOMATOR_TEST_PACKAGE",
			Self::XctestTestPackage => "XCTEST_TEST_PACKAGE",
		}
	}
}

impl fmt::Display for UploadType {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

/// Kind of test a run executes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, ValueEnum)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[value(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TestType {
	BuiltinFuzz,
	BuiltinExplorer,
	AppiumJavaJunit,
	AppiumJavaTestng,
	Calabash,
	Instrumentation,
	Uiautomation,
	Uiautomator,
	Xctest,
}

impl TestType {
	pub fn as_str(self) -> &'static str {
		match self {
			Self::BuiltinFuzz => "BUILTIN_FUZZ",
			Self::BuiltinExplorer => "BUILTIN_EXPLORER",
			Self::AppiumJavaJunit => "APPIUM_JAVA_JUNIT",
			Self::AppiumJavaTestng => "APPIUM_JAVA_TESTNG",
			Self::Calabash => "CALABASH",
			Self::Instrumentation => "INSTRUMENTATION",
			Self::Uiautomation => "UIAUTOMATION",
			Self::Uiautomator => "UIAUTOMATOR",
			Self::Xctest => "XCTEST",
		}
	}

	/// Built-in tests run without a test package.
	pub fn needs_package(self) -> bool {
		!matches!(self, Self::BuiltinFuzz | Self::BuiltinExplorer)
	}
}

impl fmt::Display for TestType {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Project {
	pub arn: Option<String>,
	pub name: Option<String>,
	pub default_job_timeout_minutes: Option<i32>,
	pub created: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct DevicePool {
	pub arn: Option<String>,
	pub name: Option<String>,
	pub description: Option<String>,
	/// CURATED pools are managed by Device Farm, PRIVATE ones by the account owner.
	pub kind: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Device {
	pub arn: Option<String>,
	pub name: Option<String>,
	pub manufacturer: Option<String>,
	pub model: Option<String>,
	pub platform: Option<String>,
	pub os: Option<String>,
	pub form_factor: Option<String>,
}

/// An upload as the service knows it.
///
/// The `url` is the one-time write target while the upload is still waiting for its bytes.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Upload {
	pub arn: Option<String>,
	pub name: Option<String>,
	pub kind: Option<String>,
	pub status: Option<String>,
	pub content_type: Option<String>,
	pub url: Option<String>,
	pub message: Option<String>,
	pub created: Option<String>,
}

/// Status, result, and timing shared by runs, jobs, suites, and tests.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Execution {
	pub arn: Option<String>,
	pub name: Option<String>,
	pub kind: Option<String>,
	pub status: Option<String>,
	pub result: Option<String>,
	pub message: Option<String>,
	pub created: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Run {
	#[serde(flatten)]
	pub execution: Execution,
	pub platform: Option<String>,
	pub total_jobs: Option<i32>,
	pub completed_jobs: Option<i32>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Job {
	#[serde(flatten)]
	pub execution: Execution,
	pub device: Option<String>,
}

pub type Suite = Execution;
pub type Test = Execution;

/// A distinct problem seen during a run, with how many times it occurred.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Problem {
	pub result: String,
	pub message: Option<String>,
	pub occurrences: usize,
	pub devices: Vec<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Artifact {
	pub arn: Option<String>,
	pub name: Option<String>,
	pub kind: Option<String>,
	pub extension: Option<String>,
	pub url: Option<String>,
}

/// Everything needed to schedule a run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScheduleRequest {
	pub name: String,
	pub project: String,
	pub app_upload: String,
	pub device_pool: String,
	pub test_type: TestType,
	pub test_upload: Option<String>,
}

/// Everything needed to register an upload.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UploadRequest {
	pub name: String,
	pub project: String,
	pub kind: UploadType,
	pub content_type: Option<String>,
}
