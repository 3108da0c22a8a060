use async_trait::async_trait;

use crate::{
	error::Error,
	model::{
		Artifact, ArtifactType, Device, DevicePool, Job, Problem, Project, Run, ScheduleRequest,
		Suite, Test, Upload, UploadRequest,
	},
};

/// The remote side of every command.
///
/// One method per remote action. Calls are independent round trips: nothing is cached or
/// retried here, and an empty listing is a success. Only [`create_upload`](Gateway::create_upload)
/// and [`schedule_run`](Gateway::schedule_run) change remote state.
///
/// Filters are passed through untouched, including the empty string, which the service reads
/// as "unscoped" or rejects as it sees fit.
#[async_trait]
pub trait Gateway: Send + Sync {
	async fn list_projects(&self) -> Result<Vec<Project>, Error>;
	async fn list_device_pools(&self, project: &str) -> Result<Vec<DevicePool>, Error>;
	async fn list_devices(&self) -> Result<Vec<Device>, Error>;
	async fn list_uploads(&self, project: &str) -> Result<Vec<Upload>, Error>;
	async fn list_runs(&self, project: &str) -> Result<Vec<Run>, Error>;
	async fn list_tests(&self, run: &str) -> Result<Vec<Test>, Error>;
	async fn list_unique_problems(&self, run: &str) -> Result<Vec<Problem>, Error>;
	async fn list_suites(&self, filter: &str) -> Result<Vec<Suite>, Error>;
	async fn list_jobs(&self, run: &str) -> Result<Vec<Job>, Error>;
	async fn list_artifacts(&self, filter: &str, kind: ArtifactType)
		-> Result<Vec<Artifact>, Error>;
	async fn create_upload(&self, request: &UploadRequest) -> Result<Upload, Error>;
	async fn get_upload(&self, upload: &str) -> Result<Upload, Error>;
	async fn schedule_run(&self, request: &ScheduleRequest) -> Result<Run, Error>;
}
