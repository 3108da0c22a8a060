use async_trait::async_trait;
use aws_config::SdkConfig;
use aws_sdk_devicefarm::{
	primitives::{DateTime, DateTimeFormat},
	types, Client,
};
use tracing::{debug, instrument};

use crate::{
	error::Error,
	gateway::Gateway,
	model::{
		Artifact, ArtifactType, Device, DevicePool, Execution, Job, Problem, Project, Run,
		ScheduleRequest, Suite, Test, Upload, UploadRequest,
	},
};

/// The gateway backed by the real service.
#[derive(Clone, Debug)]
pub struct DeviceFarmGateway {
	client: Client,
}

impl DeviceFarmGateway {
	pub fn new(config: &SdkConfig) -> Self {
		Self {
			client: Client::new(config),
		}
	}
}

#[async_trait]
impl Gateway for DeviceFarmGateway {
	#[instrument(level = "debug", skip(self))]
	async fn list_projects(&self) -> Result<Vec<Project>, Error> {
		let resp = self
			.client
			.list_projects()
			.send()
			.await
			.map_err(|err| Error::from_sdk("ListProjects", err))?;
		Ok(resp.projects().iter().map(project).collect())
	}

	#[instrument(level = "debug", skip(self))]
	async fn list_device_pools(&self, project: &str) -> Result<Vec<DevicePool>, Error> {
		let resp = self
			.client
			.list_device_pools()
			.arn(project)
			.send()
			.await
			.map_err(|err| Error::from_sdk("ListDevicePools", err))?;
		Ok(resp.device_pools().iter().map(device_pool).collect())
	}

	#[instrument(level = "debug", skip(self))]
	async fn list_devices(&self) -> Result<Vec<Device>, Error> {
		let resp = self
			.client
			.list_devices()
			.send()
			.await
			.map_err(|err| Error::from_sdk("ListDevices", err))?;
		Ok(resp.devices().iter().map(device).collect())
	}

	#[instrument(level = "debug", skip(self))]
	async fn list_uploads(&self, project: &str) -> Result<Vec<Upload>, Error> {
		let resp = self
			.client
			.list_uploads()
			.arn(project)
			.send()
			.await
			.map_err(|err| Error::from_sdk("ListUploads", err))?;
		Ok(resp.uploads().iter().map(upload).collect())
	}

	#[instrument(level = "debug", skip(self))]
	async fn list_runs(&self, project: &str) -> Result<Vec<Run>, Error> {
		let resp = self
			.client
			.list_runs()
			.arn(project)
			.send()
			.await
			.map_err(|err| Error::from_sdk("ListRuns", err))?;
		Ok(resp.runs().iter().map(run).collect())
	}

	#[instrument(level = "debug", skip(self))]
	async fn list_tests(&self, run: &str) -> Result<Vec<Test>, Error> {
		let resp = self
			.client
			.list_tests()
			.arn(run)
			.send()
			.await
			.map_err(|err| Error::from_sdk("ListTests", err))?;
		Ok(resp
			.tests()
			.iter()
			.map(|t| Execution {
				arn: owned(t.arn()),
				name: owned(t.name()),
				kind: t.r#type().map(|k| k.as_str().to_owned()),
				status: t.status().map(|s| s.as_str().to_owned()),
				result: t.result().map(|r| r.as_str().to_owned()),
				message: owned(t.message()),
				created: timestamp(t.created()),
			})
			.collect())
	}

	#[instrument(level = "debug", skip(self))]
	async fn list_unique_problems(&self, run: &str) -> Result<Vec<Problem>, Error> {
		let resp = self
			.client
			.list_unique_problems()
			.arn(run)
			.send()
			.await
			.map_err(|err| Error::from_sdk("ListUniqueProblems", err))?;

		let mut problems = Vec::new();
		for (result, uniques) in resp.unique_problems().into_iter().flatten() {
			for unique in uniques {
				problems.push(Problem {
					result: result.as_str().to_owned(),
					message: owned(unique.message()),
					occurrences: unique.problems().len(),
					devices: unique
						.problems()
						.iter()
						.filter_map(|p| p.device().and_then(|d| d.name()))
						.map(ToOwned::to_owned)
						.collect(),
				});
			}
		}

		// the service hands these back as a map
		problems.sort_by(|a, b| a.result.cmp(&b.result).then(a.message.cmp(&b.message)));
		Ok(problems)
	}

	#[instrument(level = "debug", skip(self))]
	async fn list_suites(&self, filter: &str) -> Result<Vec<Suite>, Error> {
		let resp = self
			.client
			.list_suites()
			.arn(filter)
			.send()
			.await
			.map_err(|err| Error::from_sdk("ListSuites", err))?;
		Ok(resp
			.suites()
			.iter()
			.map(|s| Execution {
				arn: owned(s.arn()),
				name: owned(s.name()),
				kind: s.r#type().map(|k| k.as_str().to_owned()),
				status: s.status().map(|s| s.as_str().to_owned()),
				result: s.result().map(|r| r.as_str().to_owned()),
				message: owned(s.message()),
				created: timestamp(s.created()),
			})
			.collect())
	}

	#[instrument(level = "debug", skip(self))]
	async fn list_jobs(&self, run: &str) -> Result<Vec<Job>, Error> {
		let resp = self
			.client
			.list_jobs()
			.arn(run)
			.send()
			.await
			.map_err(|err| Error::from_sdk("ListJobs", err))?;
		Ok(resp
			.jobs()
			.iter()
			.map(|j| Job {
				execution: Execution {
					arn: owned(j.arn()),
					name: owned(j.name()),
					kind: j.r#type().map(|k| k.as_str().to_owned()),
					status: j.status().map(|s| s.as_str().to_owned()),
					result: j.result().map(|r| r.as_str().to_owned()),
					message: owned(j.message()),
					created: timestamp(j.created()),
				},
				device: j.device().and_then(|d| d.name()).map(ToOwned::to_owned),
			})
			.collect())
	}

	#[instrument(level = "debug", skip(self))]
	async fn list_artifacts(
		&self,
		filter: &str,
		kind: ArtifactType,
	) -> Result<Vec<Artifact>, Error> {
		let category = match kind {
			ArtifactType::Log => types::ArtifactCategory::Log,
			ArtifactType::Screenshot => types::ArtifactCategory::Screenshot,
			ArtifactType::File => types::ArtifactCategory::File,
		};

		let resp = self
			.client
			.list_artifacts()
			.arn(filter)
			.r#type(category)
			.send()
			.await
			.map_err(|err| Error::from_sdk("ListArtifacts", err))?;
		Ok(resp
			.artifacts()
			.iter()
			.map(|a| Artifact {
				arn: owned(a.arn()),
				name: owned(a.name()),
				kind: a.r#type().map(|k| k.as_str().to_owned()),
				extension: owned(a.extension()),
				url: owned(a.url()),
			})
			.collect())
	}

	#[instrument(level = "debug", skip(self))]
	async fn create_upload(&self, request: &UploadRequest) -> Result<Upload, Error> {
		let resp = self
			.client
			.create_upload()
			.name(&request.name)
			.project_arn(&request.project)
			.r#type(types::UploadType::from(request.kind.as_str()))
			.set_content_type(request.content_type.clone())
			.send()
			.await
			.map_err(|err| Error::from_sdk("CreateUpload", err))?;
		let created = resp.upload().map(upload).unwrap_or_default();
		debug!(arn = ?created.arn, "upload registered");
		Ok(created)
	}

	#[instrument(level = "debug", skip(self))]
	async fn get_upload(&self, arn: &str) -> Result<Upload, Error> {
		let resp = self
			.client
			.get_upload()
			.arn(arn)
			.send()
			.await
			.map_err(|err| Error::from_sdk("GetUpload", err))?;
		Ok(resp.upload().map(upload).unwrap_or_default())
	}

	#[instrument(level = "debug", skip(self))]
	async fn schedule_run(&self, request: &ScheduleRequest) -> Result<Run, Error> {
		let test = types::ScheduleRunTest::builder()
			.r#type(types::TestType::from(request.test_type.as_str()))
			.set_test_package_arn(request.test_upload.clone())
			.build()
			.map_err(|err| Error::RemoteRequest {
				operation: "ScheduleRun",
				code: None,
				message: err.to_string(),
			})?;

		let resp = self
			.client
			.schedule_run()
			.name(&request.name)
			.project_arn(&request.project)
			.app_arn(&request.app_upload)
			.device_pool_arn(&request.device_pool)
			.test(test)
			.send()
			.await
			.map_err(|err| Error::from_sdk("ScheduleRun", err))?;
		Ok(resp.run().map(run).unwrap_or_default())
	}
}

fn owned(s: Option<&str>) -> Option<String> {
	s.map(ToOwned::to_owned)
}

fn timestamp(time: Option<&DateTime>) -> Option<String> {
	time.and_then(|t| t.fmt(DateTimeFormat::DateTime).ok())
}

fn project(p: &types::Project) -> Project {
	Project {
		arn: owned(p.arn()),
		name: owned(p.name()),
		default_job_timeout_minutes: p.default_job_timeout_minutes(),
		created: timestamp(p.created()),
	}
}

fn device_pool(p: &types::DevicePool) -> DevicePool {
	DevicePool {
		arn: owned(p.arn()),
		name: owned(p.name()),
		description: owned(p.description()),
		kind: p.r#type().map(|k| k.as_str().to_owned()),
	}
}

fn device(d: &types::Device) -> Device {
	Device {
		arn: owned(d.arn()),
		name: owned(d.name()),
		manufacturer: owned(d.manufacturer()),
		model: owned(d.model()),
		platform: d.platform().map(|p| p.as_str().to_owned()),
		os: owned(d.os()),
		form_factor: d.form_factor().map(|f| f.as_str().to_owned()),
	}
}

fn upload(u: &types::Upload) -> Upload {
	Upload {
		arn: owned(u.arn()),
		name: owned(u.name()),
		kind: u.r#type().map(|k| k.as_str().to_owned()),
		status: u.status().map(|s| s.as_str().to_owned()),
		content_type: owned(u.content_type()),
		url: owned(u.url()),
		message: owned(u.message()),
		created: timestamp(u.created()),
	}
}

fn run(r: &types::Run) -> Run {
	Run {
		execution: Execution {
			arn: owned(r.arn()),
			name: owned(r.name()),
			kind: r.r#type().map(|k| k.as_str().to_owned()),
			status: r.status().map(|s| s.as_str().to_owned()),
			result: r.result().map(|s| s.as_str().to_owned()),
			message: owned(r.message()),
			created: timestamp(r.created()),
		},
		platform: r.platform().map(|p| p.as_str().to_owned()),
		total_jobs: r.total_jobs(),
		completed_jobs: r.completed_jobs(),
	}
}
