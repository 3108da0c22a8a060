#![allow(dead_code)]

use std::sync::Mutex;

use async_trait::async_trait;
use devicefarm_cli::{
	error::Error,
	gateway::Gateway,
	model::{
		Artifact, ArtifactType, Device, DevicePool, Execution, Job, Problem, Project, Run,
		ScheduleRequest, Suite, Test, Upload, UploadRequest,
	},
};

/// A gateway that records every call it gets and answers from canned data.
#[derive(Debug, Default)]
pub struct FakeGateway {
	calls: Mutex<Vec<String>>,
	/// Calls whose name starts with one of these fail with a rejection.
	pub failing: Vec<&'static str>,
	/// Write target handed back by `create_upload`.
	pub upload_url: Option<String>,
	pub projects: Vec<Project>,
}

impl FakeGateway {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn failing(mut self, call: &'static str) -> Self {
		self.failing.push(call);
		self
	}

	pub fn with_upload_url(mut self, url: impl Into<String>) -> Self {
		self.upload_url = Some(url.into());
		self
	}

	pub fn with_projects(mut self, names: &[&str]) -> Self {
		self.projects = names
			.iter()
			.map(|name| Project {
				arn: Some(format!("arn:aws:devicefarm:us-west-2:123456789012:project:{name}")),
				name: Some((*name).into()),
				..Default::default()
			})
			.collect();
		self
	}

	pub fn calls(&self) -> Vec<String> {
		self.calls.lock().unwrap().clone()
	}

	fn record(&self, call: String) -> Result<(), Error> {
		let fails = self.failing.iter().any(|f| call.starts_with(f));
		self.calls.lock().unwrap().push(call);
		if fails {
			Err(Error::RemoteRequest {
				operation: "fake",
				code: Some("ArgumentException".into()),
				message: "Invalid ARN".into(),
			})
		} else {
			Ok(())
		}
	}
}

fn execution(arn: &str) -> Execution {
	Execution {
		arn: Some(arn.into()),
		..Default::default()
	}
}

#[async_trait]
impl Gateway for FakeGateway {
	async fn list_projects(&self) -> Result<Vec<Project>, Error> {
		self.record("list_projects".into())?;
		Ok(self.projects.clone())
	}

	async fn list_device_pools(&self, project: &str) -> Result<Vec<DevicePool>, Error> {
		self.record(format!("list_device_pools {project}"))?;
		Ok(Vec::new())
	}

	async fn list_devices(&self) -> Result<Vec<Device>, Error> {
		self.record("list_devices".into())?;
		Ok(Vec::new())
	}

	async fn list_uploads(&self, project: &str) -> Result<Vec<Upload>, Error> {
		self.record(format!("list_uploads {project}"))?;
		Ok(Vec::new())
	}

	async fn list_runs(&self, project: &str) -> Result<Vec<Run>, Error> {
		self.record(format!("list_runs {project}"))?;
		Ok(Vec::new())
	}

	async fn list_tests(&self, run: &str) -> Result<Vec<Test>, Error> {
		self.record(format!("list_tests {run}"))?;
		Ok(Vec::new())
	}

	async fn list_unique_problems(&self, run: &str) -> Result<Vec<Problem>, Error> {
		self.record(format!("list_unique_problems {run}"))?;
		Ok(Vec::new())
	}

	async fn list_suites(&self, filter: &str) -> Result<Vec<Suite>, Error> {
		self.record(format!("list_suites {filter}"))?;
		Ok(vec![execution(&format!("{filter}/suite"))])
	}

	async fn list_jobs(&self, run: &str) -> Result<Vec<Job>, Error> {
		self.record(format!("list_jobs {run}"))?;
		Ok(vec![Job {
			execution: execution(&format!("{run}/job")),
			device: Some("Pixel".into()),
		}])
	}

	async fn list_artifacts(
		&self,
		filter: &str,
		kind: ArtifactType,
	) -> Result<Vec<Artifact>, Error> {
		self.record(format!("list_artifacts {kind} {filter}"))?;
		Ok(vec![Artifact {
			name: Some(format!("{kind} artifact")),
			..Default::default()
		}])
	}

	async fn create_upload(&self, request: &UploadRequest) -> Result<Upload, Error> {
		self.record(format!(
			"create_upload {} {} {} {}",
			request.name,
			request.project,
			request.kind,
			request.content_type.as_deref().unwrap_or("-")
		))?;
		Ok(Upload {
			arn: Some("arn:aws:devicefarm:us-west-2:123456789012:upload:abc".into()),
			name: Some(request.name.clone()),
			kind: Some(request.kind.to_string()),
			status: Some("INITIALIZED".into()),
			url: self.upload_url.clone(),
			..Default::default()
		})
	}

	async fn get_upload(&self, upload: &str) -> Result<Upload, Error> {
		self.record(format!("get_upload {upload}"))?;
		Ok(Upload {
			arn: Some(upload.into()),
			status: Some("SUCCEEDED".into()),
			..Default::default()
		})
	}

	async fn schedule_run(&self, request: &ScheduleRequest) -> Result<Run, Error> {
		self.record(format!(
			"schedule_run {} {} {} {} {} {}",
			request.name,
			request.project,
			request.app_upload,
			request.device_pool,
			request.test_type,
			request.test_upload.as_deref().unwrap_or("-")
		))?;
		Ok(Run {
			execution: execution("arn:run:new"),
			..Default::default()
		})
	}
}
