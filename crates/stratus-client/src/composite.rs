//! Action-and-wait operations.
//!
//! Each method issues one mutating call and, when target states are given,
//! polls until the affected resource or its work request reaches one of
//! them. How each operation observes completion is declared in its
//! [`OperationPlan`].

use std::future::Future;

use stratus_core::models::{
    BuildPipeline, BuildPipelineStage, CreateBuildPipelineDetails, CreateDeploymentDetails,
    CreateProjectDetails, CreateRepositoryDetails, Deployment, Project, Repository,
    UpdateProjectDetails, UpdateRepositoryDetails, WorkRequest,
};
use stratus_core::{Error, Lifecycle, ResourceId, Result};
use stratus_waiter::{
    NotFoundPolicy, Observation, TargetStates, WaitOutcome, Waited, WaiterConfig, wait_for_states,
};
use tracing::{debug, info};

use crate::api::DevopsApi;
use crate::response::{ApiResponse, RequestOptions, ResponseHeaders};

/// What a composite call produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionOutcome<I, P> {
    /// No target states were requested; the initial response, unpolled.
    Issued(I),
    /// The polled handle reached a target state.
    Reached(P),
    /// The resource is gone, which deletes treat as done.
    Gone,
}

impl<I, P> ActionOutcome<I, P> {
    pub fn is_gone(&self) -> bool {
        matches!(self, ActionOutcome::Gone)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum CompositeError<I> {
    /// The mutating call itself failed.
    #[error(transparent)]
    Operation(Error),

    /// The mutating call succeeded but waiting did not.
    #[error("operation succeeded but waiting failed: {source}")]
    Waiting {
        partial: I,
        #[source]
        source: Error,
    },
}

impl<I> CompositeError<I> {
    /// The initial response, when the mutating call got that far.
    pub fn partial(&self) -> Option<&I> {
        match self {
            CompositeError::Operation(_) => None,
            CompositeError::Waiting { partial, .. } => Some(partial),
        }
    }

    pub fn into_partial(self) -> Option<I> {
        match self {
            CompositeError::Operation(_) => None,
            CompositeError::Waiting { partial, .. } => Some(partial),
        }
    }

    pub fn error(&self) -> &Error {
        match self {
            CompositeError::Operation(source) | CompositeError::Waiting { source, .. } => source,
        }
    }
}

pub type CompositeResult<I, P> = std::result::Result<ActionOutcome<I, P>, CompositeError<I>>;

/// What a composite operation polls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollTarget {
    /// The work request named by the `opc-work-request-id` header.
    WorkRequest,
    /// The resource returned by the mutating call.
    Resource,
    /// The resource as fetched before the mutating call.
    PrefetchedResource,
}

/// Declared polling behaviour of one composite operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OperationPlan {
    pub name: &'static str,
    pub poll: PollTarget,
    pub not_found: NotFoundPolicy,
}

impl OperationPlan {
    const fn new(name: &'static str, poll: PollTarget, not_found: NotFoundPolicy) -> Self {
        Self {
            name,
            poll,
            not_found,
        }
    }

    pub const CREATE_PROJECT: Self =
        Self::new("create_project", PollTarget::WorkRequest, NotFoundPolicy::Fail);
    pub const UPDATE_PROJECT: Self =
        Self::new("update_project", PollTarget::WorkRequest, NotFoundPolicy::Fail);
    pub const DELETE_PROJECT: Self =
        Self::new("delete_project", PollTarget::WorkRequest, NotFoundPolicy::Fail);
    pub const CREATE_REPOSITORY: Self =
        Self::new("create_repository", PollTarget::Resource, NotFoundPolicy::Fail);
    pub const UPDATE_REPOSITORY: Self =
        Self::new("update_repository", PollTarget::Resource, NotFoundPolicy::Fail);
    pub const DELETE_REPOSITORY: Self = Self::new(
        "delete_repository",
        PollTarget::PrefetchedResource,
        NotFoundPolicy::Succeed,
    );
    pub const CREATE_BUILD_PIPELINE: Self =
        Self::new("create_build_pipeline", PollTarget::WorkRequest, NotFoundPolicy::Fail);
    pub const DELETE_BUILD_PIPELINE: Self =
        Self::new("delete_build_pipeline", PollTarget::WorkRequest, NotFoundPolicy::Fail);
    pub const DELETE_BUILD_PIPELINE_STAGE: Self = Self::new(
        "delete_build_pipeline_stage",
        PollTarget::PrefetchedResource,
        NotFoundPolicy::Succeed,
    );
    pub const CREATE_DEPLOYMENT: Self =
        Self::new("create_deployment", PollTarget::Resource, NotFoundPolicy::Fail);
    pub const CANCEL_DEPLOYMENT: Self =
        Self::new("cancel_deployment", PollTarget::Resource, NotFoundPolicy::Fail);

    pub const ALL: &'static [OperationPlan] = &[
        Self::CREATE_PROJECT,
        Self::UPDATE_PROJECT,
        Self::DELETE_PROJECT,
        Self::CREATE_REPOSITORY,
        Self::UPDATE_REPOSITORY,
        Self::DELETE_REPOSITORY,
        Self::CREATE_BUILD_PIPELINE,
        Self::DELETE_BUILD_PIPELINE,
        Self::DELETE_BUILD_PIPELINE_STAGE,
        Self::CREATE_DEPLOYMENT,
        Self::CANCEL_DEPLOYMENT,
    ];
}

/// Action-and-wait calls over any [`DevopsApi`].
pub struct CompositeOperations<A> {
    client: A,
}

impl<A: DevopsApi> CompositeOperations<A> {
    pub fn new(client: A) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &A {
        &self.client
    }

    /// Create a project and wait on its work request.
    pub async fn create_project_and_wait_for_state(
        &self,
        details: &CreateProjectDetails,
        targets: &TargetStates,
        opts: &RequestOptions,
        config: WaiterConfig,
    ) -> CompositeResult<ApiResponse<Project>, WorkRequest> {
        let plan = OperationPlan::CREATE_PROJECT;
        let response = self
            .client
            .create_project(details, opts)
            .await
            .map_err(CompositeError::Operation)?;
        self.wait_on_work_request(plan, response, targets, config).await
    }

    pub async fn update_project_and_wait_for_state(
        &self,
        id: &ResourceId,
        details: &UpdateProjectDetails,
        targets: &TargetStates,
        opts: &RequestOptions,
        config: WaiterConfig,
    ) -> CompositeResult<ApiResponse<Project>, WorkRequest> {
        let plan = OperationPlan::UPDATE_PROJECT;
        let response = self
            .client
            .update_project(id, details, opts)
            .await
            .map_err(CompositeError::Operation)?;
        self.wait_on_work_request(plan, response, targets, config).await
    }

    pub async fn delete_project_and_wait_for_state(
        &self,
        id: &ResourceId,
        targets: &TargetStates,
        opts: &RequestOptions,
        config: WaiterConfig,
    ) -> CompositeResult<ApiResponse<()>, WorkRequest> {
        let plan = OperationPlan::DELETE_PROJECT;
        let response = match self.client.delete_project(id, opts).await {
            Ok(response) => response,
            Err(e) if e.is_not_found() => return Ok(already_gone(plan, id)),
            Err(e) => return Err(CompositeError::Operation(e)),
        };
        self.wait_on_work_request(plan, response, targets, config).await
    }

    pub async fn create_repository_and_wait_for_state(
        &self,
        details: &CreateRepositoryDetails,
        targets: &TargetStates,
        opts: &RequestOptions,
        config: WaiterConfig,
    ) -> CompositeResult<ApiResponse<Repository>, Repository> {
        let plan = OperationPlan::CREATE_REPOSITORY;
        let response = self
            .client
            .create_repository(details, opts)
            .await
            .map_err(CompositeError::Operation)?;
        let id = response.data.id.clone();
        let id = &id;
        self.wait_on_resource(plan, response, targets, config, move || self.poll_repository(id))
            .await
    }

    pub async fn update_repository_and_wait_for_state(
        &self,
        id: &ResourceId,
        details: &UpdateRepositoryDetails,
        targets: &TargetStates,
        opts: &RequestOptions,
        config: WaiterConfig,
    ) -> CompositeResult<ApiResponse<Repository>, Repository> {
        let plan = OperationPlan::UPDATE_REPOSITORY;
        let response = self
            .client
            .update_repository(id, details, opts)
            .await
            .map_err(CompositeError::Operation)?;
        let id = response.data.id.clone();
        let id = &id;
        self.wait_on_resource(plan, response, targets, config, move || self.poll_repository(id))
            .await
    }

    /// Delete a repository and wait until it is deleted or gone.
    pub async fn delete_repository_and_wait_for_state(
        &self,
        id: &ResourceId,
        targets: &TargetStates,
        opts: &RequestOptions,
        config: WaiterConfig,
    ) -> CompositeResult<ApiResponse<()>, Repository> {
        let plan = OperationPlan::DELETE_REPOSITORY;
        let prefetched = match self.client.get_repository(id, &RequestOptions::default()).await {
            Ok(response) => response.data,
            Err(e) if e.is_not_found() => return Ok(already_gone(plan, id)),
            Err(e) => return Err(CompositeError::Operation(e)),
        };
        let response = match self.client.delete_repository(id, opts).await {
            Ok(response) => response,
            Err(e) if e.is_not_found() => return Ok(already_gone(plan, id)),
            Err(e) => return Err(CompositeError::Operation(e)),
        };
        let poll_id = &prefetched.id;
        self.wait_on_resource(plan, response, targets, config, move || self.poll_repository(poll_id))
            .await
    }

    pub async fn create_build_pipeline_and_wait_for_state(
        &self,
        details: &CreateBuildPipelineDetails,
        targets: &TargetStates,
        opts: &RequestOptions,
        config: WaiterConfig,
    ) -> CompositeResult<ApiResponse<BuildPipeline>, WorkRequest> {
        let plan = OperationPlan::CREATE_BUILD_PIPELINE;
        let response = self
            .client
            .create_build_pipeline(details, opts)
            .await
            .map_err(CompositeError::Operation)?;
        self.wait_on_work_request(plan, response, targets, config).await
    }

    pub async fn delete_build_pipeline_and_wait_for_state(
        &self,
        id: &ResourceId,
        targets: &TargetStates,
        opts: &RequestOptions,
        config: WaiterConfig,
    ) -> CompositeResult<ApiResponse<()>, WorkRequest> {
        let plan = OperationPlan::DELETE_BUILD_PIPELINE;
        let response = match self.client.delete_build_pipeline(id, opts).await {
            Ok(response) => response,
            Err(e) if e.is_not_found() => return Ok(already_gone(plan, id)),
            Err(e) => return Err(CompositeError::Operation(e)),
        };
        self.wait_on_work_request(plan, response, targets, config).await
    }

    pub async fn delete_build_pipeline_stage_and_wait_for_state(
        &self,
        id: &ResourceId,
        targets: &TargetStates,
        opts: &RequestOptions,
        config: WaiterConfig,
    ) -> CompositeResult<ApiResponse<()>, BuildPipelineStage> {
        let plan = OperationPlan::DELETE_BUILD_PIPELINE_STAGE;
        let prefetched = match self
            .client
            .get_build_pipeline_stage(id, &RequestOptions::default())
            .await
        {
            Ok(response) => response.data,
            Err(e) if e.is_not_found() => return Ok(already_gone(plan, id)),
            Err(e) => return Err(CompositeError::Operation(e)),
        };
        let response = match self.client.delete_build_pipeline_stage(id, opts).await {
            Ok(response) => response,
            Err(e) if e.is_not_found() => return Ok(already_gone(plan, id)),
            Err(e) => return Err(CompositeError::Operation(e)),
        };
        let poll_id = prefetched.id().clone();
        let poll_id = &poll_id;
        self.wait_on_resource(plan, response, targets, config, move || self.poll_stage(poll_id))
            .await
    }

    pub async fn create_deployment_and_wait_for_state(
        &self,
        details: &CreateDeploymentDetails,
        targets: &TargetStates,
        opts: &RequestOptions,
        config: WaiterConfig,
    ) -> CompositeResult<ApiResponse<Deployment>, Deployment> {
        let plan = OperationPlan::CREATE_DEPLOYMENT;
        let response = self
            .client
            .create_deployment(details, opts)
            .await
            .map_err(CompositeError::Operation)?;
        let id = response.data.id().clone();
        let id = &id;
        self.wait_on_resource(plan, response, targets, config, move || self.poll_deployment(id))
            .await
    }

    pub async fn cancel_deployment_and_wait_for_state(
        &self,
        id: &ResourceId,
        reason: Option<&str>,
        targets: &TargetStates,
        opts: &RequestOptions,
        config: WaiterConfig,
    ) -> CompositeResult<ApiResponse<Deployment>, Deployment> {
        let plan = OperationPlan::CANCEL_DEPLOYMENT;
        let response = self
            .client
            .cancel_deployment(id, reason, opts)
            .await
            .map_err(CompositeError::Operation)?;
        let id = response.data.id().clone();
        let id = &id;
        self.wait_on_resource(plan, response, targets, config, move || self.poll_deployment(id))
            .await
    }

    async fn poll_repository(&self, id: &ResourceId) -> Result<Observation<Repository>> {
        let response = self
            .client
            .get_repository(id, &RequestOptions::default())
            .await?;
        Ok(Observation::Found(response.data))
    }

    async fn poll_stage(&self, id: &ResourceId) -> Result<Observation<BuildPipelineStage>> {
        let response = self
            .client
            .get_build_pipeline_stage(id, &RequestOptions::default())
            .await?;
        Ok(Observation::Found(response.data))
    }

    async fn poll_deployment(&self, id: &ResourceId) -> Result<Observation<Deployment>> {
        let response = self
            .client
            .get_deployment(id, &RequestOptions::default())
            .await?;
        Ok(Observation::Found(response.data))
    }

    async fn wait_on_resource<T, P, F, Fut>(
        &self,
        plan: OperationPlan,
        issued: ApiResponse<T>,
        targets: &TargetStates,
        config: WaiterConfig,
        poll: F,
    ) -> CompositeResult<ApiResponse<T>, P>
    where
        P: Lifecycle,
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<Observation<P>>>,
    {
        debug_assert_ne!(plan.poll, PollTarget::WorkRequest, "{}", plan.name);
        if targets.is_empty() {
            debug!(operation = plan.name, "No target states, returning initial response");
            return Ok(ActionOutcome::Issued(issued));
        }
        debug!(operation = plan.name, poll = ?plan.poll, "Waiting on resource");
        let waited = wait_for_states(config, targets, plan.not_found, poll).await;
        finish(plan, issued, waited)
    }

    async fn wait_on_work_request<T>(
        &self,
        plan: OperationPlan,
        issued: ApiResponse<T>,
        targets: &TargetStates,
        config: WaiterConfig,
    ) -> CompositeResult<ApiResponse<T>, WorkRequest> {
        debug_assert_eq!(plan.poll, PollTarget::WorkRequest, "{}", plan.name);
        if targets.is_empty() {
            debug!(operation = plan.name, "No target states, returning initial response");
            return Ok(ActionOutcome::Issued(issued));
        }
        let work_request_id = match work_request_id(&issued.headers) {
            Ok(id) => id,
            Err(source) => {
                return Err(CompositeError::Waiting {
                    partial: issued,
                    source,
                });
            }
        };
        debug!(operation = plan.name, work_request_id = %work_request_id, "Waiting on work request");

        let client = &self.client;
        let id = &work_request_id;
        let waited = wait_for_states(config, targets, plan.not_found, move || async move {
            let response = client
                .get_work_request(id, &RequestOptions::default())
                .await?;
            Ok::<_, Error>(Observation::Found(response.data))
        })
        .await;
        finish(plan, issued, waited)
    }
}

fn work_request_id(headers: &ResponseHeaders) -> Result<ResourceId> {
    let raw = headers
        .opc_work_request_id
        .as_deref()
        .ok_or(Error::MissingHeader("opc-work-request-id"))?;
    ResourceId::new(raw)
}

fn already_gone<I, P>(plan: OperationPlan, id: &ResourceId) -> ActionOutcome<I, P> {
    info!(operation = plan.name, id = %id, "Resource already gone");
    ActionOutcome::Gone
}

fn finish<I, P>(plan: OperationPlan, issued: I, waited: Result<Waited<P>>) -> CompositeResult<I, P> {
    match waited {
        Ok(waited) => {
            debug!(
                operation = plan.name,
                attempts = waited.attempts,
                "Composite operation complete"
            );
            Ok(match waited.outcome {
                WaitOutcome::Reached(resource) => ActionOutcome::Reached(resource),
                WaitOutcome::Gone => ActionOutcome::Gone,
            })
        }
        Err(source) => Err(CompositeError::Waiting {
            partial: issued,
            source,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::ListProjectsRequest;
    use async_trait::async_trait;
    use serde_json::json;
    use std::collections::VecDeque;
    use std::sync::Mutex;
    use std::time::Duration;
    use stratus_core::Model;
    use stratus_core::models::{DiffCollection, ProjectCollection, RepositoryCommit};

    /// Scripted API. Each queue yields its front until one item is left,
    /// which then repeats. A `None` repository or stage state answers 404.
    #[derive(Default)]
    struct FakeApi {
        work_request_header: Option<&'static str>,
        delete_not_found: bool,
        work_requests: Mutex<VecDeque<&'static str>>,
        repositories: Mutex<VecDeque<Option<&'static str>>>,
        stages: Mutex<VecDeque<Option<&'static str>>>,
        deployments: Mutex<VecDeque<&'static str>>,
        calls: Mutex<Vec<&'static str>>,
    }

    impl FakeApi {
        fn record(&self, call: &'static str) {
            self.calls.lock().unwrap().push(call);
        }

        fn count(&self, call: &str) -> usize {
            self.calls.lock().unwrap().iter().filter(|c| **c == call).count()
        }

        fn calls(&self) -> Vec<&'static str> {
            self.calls.lock().unwrap().clone()
        }

        fn headers(&self) -> ResponseHeaders {
            ResponseHeaders {
                status: 200,
                opc_work_request_id: self.work_request_header.map(String::from),
                ..Default::default()
            }
        }
    }

    fn next<T: Copy>(queue: &Mutex<VecDeque<T>>) -> T {
        let mut queue = queue.lock().unwrap();
        if queue.len() > 1 {
            queue.pop_front().unwrap()
        } else {
            *queue.front().unwrap()
        }
    }

    fn not_found() -> Error {
        Error::Service {
            status: 404,
            code: "NotAuthorizedOrNotFound".into(),
            message: "not found".into(),
            opc_request_id: None,
        }
    }

    fn unexpected<T>() -> Result<T> {
        Err(Error::InvalidInput("unexpected call".into()))
    }

    fn project() -> Project {
        Project::from_value(json!({
            "id": "p1",
            "name": "demo",
            "notificationConfig": {"topicId": "t1"},
            "compartmentId": "c1"
        }))
        .unwrap()
    }

    fn repository(state: &str) -> Repository {
        Repository::from_value(json!({
            "id": "r1",
            "compartmentId": "c1",
            "projectId": "p1",
            "lifecycleState": state
        }))
        .unwrap()
    }

    fn deployment(state: &str) -> Deployment {
        Deployment::from_value(json!({
            "deploymentType": "PIPELINE_DEPLOYMENT",
            "id": "d1",
            "deployPipelineId": "dp1",
            "lifecycleState": state
        }))
        .unwrap()
    }

    fn build_pipeline() -> BuildPipeline {
        BuildPipeline::from_value(json!({
            "id": "bp1",
            "projectId": "p1",
            "compartmentId": "c1"
        }))
        .unwrap()
    }

    fn wait_stage(state: &str) -> BuildPipelineStage {
        BuildPipelineStage::from_value(json!({
            "buildPipelineStageType": "WAIT",
            "id": "s1",
            "buildPipelineId": "bp1",
            "lifecycleState": state,
            "waitCriteria": {"waitType": "ABSOLUTE_WAIT", "waitDuration": "PT10M"}
        }))
        .unwrap()
    }

    fn work_request(status: &str) -> WorkRequest {
        WorkRequest::from_value(json!({
            "id": "wr1",
            "operationType": "CREATE_PROJECT",
            "status": status,
            "compartmentId": "c1",
            "resources": [],
            "timeAccepted": "2024-03-01T10:00:00Z"
        }))
        .unwrap()
    }

    #[async_trait]
    impl DevopsApi for FakeApi {
        async fn get_project(&self, _: &ResourceId, _: &RequestOptions) -> Result<ApiResponse<Project>> {
            unexpected()
        }

        async fn create_project(
            &self,
            _: &CreateProjectDetails,
            _: &RequestOptions,
        ) -> Result<ApiResponse<Project>> {
            self.record("create_project");
            Ok(ApiResponse::new(project(), self.headers()))
        }

        async fn update_project(
            &self,
            _: &ResourceId,
            _: &UpdateProjectDetails,
            _: &RequestOptions,
        ) -> Result<ApiResponse<Project>> {
            self.record("update_project");
            Ok(ApiResponse::new(project(), self.headers()))
        }

        async fn delete_project(&self, _: &ResourceId, _: &RequestOptions) -> Result<ApiResponse<()>> {
            self.record("delete_project");
            if self.delete_not_found {
                return Err(not_found());
            }
            Ok(ApiResponse::new((), self.headers()))
        }

        async fn list_projects(
            &self,
            _: &ListProjectsRequest,
            _: &RequestOptions,
        ) -> Result<ApiResponse<ProjectCollection>> {
            unexpected()
        }

        async fn get_repository(&self, _: &ResourceId, _: &RequestOptions) -> Result<ApiResponse<Repository>> {
            self.record("get_repository");
            match next(&self.repositories) {
                Some(state) => Ok(ApiResponse::new(repository(state), self.headers())),
                None => Err(not_found()),
            }
        }

        async fn create_repository(
            &self,
            _: &CreateRepositoryDetails,
            _: &RequestOptions,
        ) -> Result<ApiResponse<Repository>> {
            self.record("create_repository");
            Ok(ApiResponse::new(repository("CREATING"), self.headers()))
        }

        async fn update_repository(
            &self,
            _: &ResourceId,
            _: &UpdateRepositoryDetails,
            _: &RequestOptions,
        ) -> Result<ApiResponse<Repository>> {
            self.record("update_repository");
            Ok(ApiResponse::new(repository("UPDATING"), self.headers()))
        }

        async fn delete_repository(&self, _: &ResourceId, _: &RequestOptions) -> Result<ApiResponse<()>> {
            self.record("delete_repository");
            if self.delete_not_found {
                return Err(not_found());
            }
            Ok(ApiResponse::new((), self.headers()))
        }

        async fn get_commit(
            &self,
            _: &ResourceId,
            _: &str,
            _: &RequestOptions,
        ) -> Result<ApiResponse<RepositoryCommit>> {
            unexpected()
        }

        async fn list_commit_diffs(
            &self,
            _: &ResourceId,
            _: &str,
            _: &str,
            _: &RequestOptions,
        ) -> Result<ApiResponse<DiffCollection>> {
            unexpected()
        }

        async fn get_build_pipeline(
            &self,
            _: &ResourceId,
            _: &RequestOptions,
        ) -> Result<ApiResponse<BuildPipeline>> {
            unexpected()
        }

        async fn create_build_pipeline(
            &self,
            _: &CreateBuildPipelineDetails,
            _: &RequestOptions,
        ) -> Result<ApiResponse<BuildPipeline>> {
            self.record("create_build_pipeline");
            Ok(ApiResponse::new(build_pipeline(), self.headers()))
        }

        async fn delete_build_pipeline(&self, _: &ResourceId, _: &RequestOptions) -> Result<ApiResponse<()>> {
            self.record("delete_build_pipeline");
            if self.delete_not_found {
                return Err(not_found());
            }
            Ok(ApiResponse::new((), self.headers()))
        }

        async fn get_build_pipeline_stage(
            &self,
            _: &ResourceId,
            _: &RequestOptions,
        ) -> Result<ApiResponse<BuildPipelineStage>> {
            self.record("get_build_pipeline_stage");
            match next(&self.stages) {
                Some(state) => Ok(ApiResponse::new(wait_stage(state), self.headers())),
                None => Err(not_found()),
            }
        }

        async fn delete_build_pipeline_stage(
            &self,
            _: &ResourceId,
            _: &RequestOptions,
        ) -> Result<ApiResponse<()>> {
            self.record("delete_build_pipeline_stage");
            if self.delete_not_found {
                return Err(not_found());
            }
            Ok(ApiResponse::new((), self.headers()))
        }

        async fn get_deployment(&self, _: &ResourceId, _: &RequestOptions) -> Result<ApiResponse<Deployment>> {
            self.record("get_deployment");
            Ok(ApiResponse::new(deployment(next(&self.deployments)), self.headers()))
        }

        async fn create_deployment(
            &self,
            _: &CreateDeploymentDetails,
            _: &RequestOptions,
        ) -> Result<ApiResponse<Deployment>> {
            self.record("create_deployment");
            Ok(ApiResponse::new(deployment("ACCEPTED"), self.headers()))
        }

        async fn cancel_deployment(
            &self,
            _: &ResourceId,
            _: Option<&str>,
            _: &RequestOptions,
        ) -> Result<ApiResponse<Deployment>> {
            self.record("cancel_deployment");
            Ok(ApiResponse::new(deployment("CANCELING"), self.headers()))
        }

        async fn get_work_request(&self, _: &ResourceId, _: &RequestOptions) -> Result<ApiResponse<WorkRequest>> {
            self.record("get_work_request");
            Ok(ApiResponse::new(work_request(next(&self.work_requests)), self.headers()))
        }
    }

    fn create_details() -> CreateProjectDetails {
        CreateProjectDetails::new(
            "demo",
            ResourceId::new("c1").unwrap(),
            ResourceId::new("t1").unwrap(),
        )
    }

    fn id(value: &str) -> ResourceId {
        ResourceId::new(value).unwrap()
    }

    #[tokio::test(start_paused = true)]
    async fn test_empty_targets_skip_polling() {
        let ops = CompositeOperations::new(FakeApi {
            work_request_header: Some("wr1"),
            work_requests: Mutex::new(VecDeque::from(["IN_PROGRESS"])),
            ..Default::default()
        });

        let outcome = ops
            .create_project_and_wait_for_state(
                &create_details(),
                &TargetStates::none(),
                &RequestOptions::default(),
                WaiterConfig::default(),
            )
            .await
            .unwrap();

        let ActionOutcome::Issued(response) = outcome else {
            panic!("expected the initial response");
        };
        assert_eq!(response.data, project());
        assert_eq!(ops.client().count("get_work_request"), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_create_project_waits_on_work_request() {
        let ops = CompositeOperations::new(FakeApi {
            work_request_header: Some("wr1"),
            work_requests: Mutex::new(VecDeque::from(["ACCEPTED", "IN_PROGRESS", "SUCCEEDED"])),
            ..Default::default()
        });

        let outcome = ops
            .create_project_and_wait_for_state(
                &create_details(),
                &TargetStates::new(["succeeded", "failed"]),
                &RequestOptions::default(),
                WaiterConfig::default(),
            )
            .await
            .unwrap();

        let ActionOutcome::Reached(wr) = outcome else {
            panic!("expected the finished work request");
        };
        assert_eq!(wr.lifecycle_state(), Some("SUCCEEDED"));
        assert_eq!(ops.client().count("get_work_request"), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_missing_work_request_header_keeps_partial() {
        let ops = CompositeOperations::new(FakeApi::default());

        let err = ops
            .update_project_and_wait_for_state(
                &id("p1"),
                &UpdateProjectDetails::default(),
                &TargetStates::new(["SUCCEEDED"]),
                &RequestOptions::default(),
                WaiterConfig::default(),
            )
            .await
            .unwrap_err();

        assert!(matches!(err.error(), Error::MissingHeader("opc-work-request-id")));
        assert_eq!(err.partial().map(|r| &r.data), Some(&project()));
    }

    #[tokio::test(start_paused = true)]
    async fn test_timeout_keeps_partial() {
        let ops = CompositeOperations::new(FakeApi {
            repositories: Mutex::new(VecDeque::from([Some("CREATING")])),
            ..Default::default()
        });

        let err = ops
            .create_repository_and_wait_for_state(
                &CreateRepositoryDetails::hosted("app", id("p1")),
                &TargetStates::new(["ACTIVE"]),
                &RequestOptions::default(),
                WaiterConfig::default().with_max_wait(Duration::from_secs(5)),
            )
            .await
            .unwrap_err();

        assert!(matches!(
            err.error(),
            Error::WaitTimeout { last_state: Some(state), .. } if state == "CREATING"
        ));
        let partial = err.into_partial().unwrap();
        assert_eq!(partial.data.id.as_str(), "r1");
    }

    #[tokio::test(start_paused = true)]
    async fn test_delete_repository_not_found_is_success() {
        let ops = CompositeOperations::new(FakeApi {
            repositories: Mutex::new(VecDeque::from([Some("ACTIVE"), Some("DELETING"), None])),
            ..Default::default()
        });

        let outcome = ops
            .delete_repository_and_wait_for_state(
                &id("r1"),
                &TargetStates::new(["DELETED"]),
                &RequestOptions::default(),
                WaiterConfig::default(),
            )
            .await
            .unwrap();

        assert!(outcome.is_gone());
        // Prefetch, then two polls.
        assert_eq!(ops.client().count("get_repository"), 3);
        assert_eq!(ops.client().count("delete_repository"), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_delete_of_missing_resource_is_success() {
        let ops = CompositeOperations::new(FakeApi {
            delete_not_found: true,
            ..Default::default()
        });

        let outcome = ops
            .delete_project_and_wait_for_state(
                &id("p1"),
                &TargetStates::new(["SUCCEEDED"]),
                &RequestOptions::default(),
                WaiterConfig::default(),
            )
            .await
            .unwrap();
        assert!(outcome.is_gone());
        assert_eq!(ops.client().count("get_work_request"), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_create_deployment_polls_deployment() {
        let ops = CompositeOperations::new(FakeApi {
            deployments: Mutex::new(VecDeque::from(["IN_PROGRESS", "Succeeded"])),
            ..Default::default()
        });

        let outcome = ops
            .create_deployment_and_wait_for_state(
                &CreateDeploymentDetails::pipeline(id("dp1")),
                &TargetStates::new(["SUCCEEDED"]),
                &RequestOptions::default(),
                WaiterConfig::default(),
            )
            .await
            .unwrap();

        let ActionOutcome::Reached(deployment) = outcome else {
            panic!("expected a finished deployment");
        };
        assert_eq!(deployment.id().as_str(), "d1");
        assert_eq!(ops.client().count("get_deployment"), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_delete_stage_waits_until_gone() {
        let ops = CompositeOperations::new(FakeApi {
            stages: Mutex::new(VecDeque::from([Some("ACTIVE"), Some("DELETING"), None])),
            ..Default::default()
        });

        let outcome = ops
            .delete_build_pipeline_stage_and_wait_for_state(
                &id("s1"),
                &TargetStates::new(["DELETED"]),
                &RequestOptions::default(),
                WaiterConfig::default(),
            )
            .await
            .unwrap();

        assert!(outcome.is_gone());
        assert_eq!(
            ops.client().calls(),
            [
                "get_build_pipeline_stage",
                "delete_build_pipeline_stage",
                "get_build_pipeline_stage",
                "get_build_pipeline_stage",
            ]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_delete_stage_reaches_failed_state() {
        let ops = CompositeOperations::new(FakeApi {
            stages: Mutex::new(VecDeque::from([Some("ACTIVE"), Some("DELETING"), Some("FAILED")])),
            ..Default::default()
        });

        let outcome = ops
            .delete_build_pipeline_stage_and_wait_for_state(
                &id("s1"),
                &TargetStates::new(["DELETED", "FAILED"]),
                &RequestOptions::default(),
                WaiterConfig::default(),
            )
            .await
            .unwrap();

        let ActionOutcome::Reached(stage) = outcome else {
            panic!("expected the failed stage");
        };
        assert!(matches!(stage, BuildPipelineStage::Wait(_)));
        assert_eq!(stage.lifecycle_state(), Some("FAILED"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_delete_stage_missing_before_delete() {
        let ops = CompositeOperations::new(FakeApi {
            stages: Mutex::new(VecDeque::from([None])),
            ..Default::default()
        });

        let outcome = ops
            .delete_build_pipeline_stage_and_wait_for_state(
                &id("s1"),
                &TargetStates::new(["DELETED"]),
                &RequestOptions::default(),
                WaiterConfig::default(),
            )
            .await
            .unwrap();

        assert!(outcome.is_gone());
        assert_eq!(ops.client().count("delete_build_pipeline_stage"), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_deployment_polls_until_canceled() {
        let ops = CompositeOperations::new(FakeApi {
            deployments: Mutex::new(VecDeque::from(["CANCELING", "CANCELED"])),
            ..Default::default()
        });

        let outcome = ops
            .cancel_deployment_and_wait_for_state(
                &id("d1"),
                Some("rollback"),
                &TargetStates::new(["CANCELED"]),
                &RequestOptions::default(),
                WaiterConfig::default(),
            )
            .await
            .unwrap();

        let ActionOutcome::Reached(deployment) = outcome else {
            panic!("expected a canceled deployment");
        };
        assert_eq!(deployment.lifecycle_state(), Some("CANCELED"));
        assert_eq!(ops.client().calls()[0], "cancel_deployment");
        assert_eq!(ops.client().count("get_deployment"), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_build_pipeline_create_and_delete_wait_on_work_request() {
        let ops = CompositeOperations::new(FakeApi {
            work_request_header: Some("wr1"),
            work_requests: Mutex::new(VecDeque::from(["IN_PROGRESS", "SUCCEEDED"])),
            ..Default::default()
        });

        let outcome = ops
            .create_build_pipeline_and_wait_for_state(
                &CreateBuildPipelineDetails::new(id("p1")),
                &TargetStates::new(["SUCCEEDED"]),
                &RequestOptions::default(),
                WaiterConfig::default(),
            )
            .await
            .unwrap();
        let ActionOutcome::Reached(wr) = outcome else {
            panic!("expected the finished work request");
        };
        assert_eq!(wr.lifecycle_state(), Some("SUCCEEDED"));

        let outcome = ops
            .delete_build_pipeline_and_wait_for_state(
                &id("bp1"),
                &TargetStates::new(["SUCCEEDED"]),
                &RequestOptions::default(),
                WaiterConfig::default(),
            )
            .await
            .unwrap();
        assert!(matches!(outcome, ActionOutcome::Reached(_)));
        assert_eq!(ops.client().count("create_build_pipeline"), 1);
        assert_eq!(ops.client().count("delete_build_pipeline"), 1);
        assert_eq!(ops.client().count("get_work_request"), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_delete_of_missing_build_pipeline_is_success() {
        let ops = CompositeOperations::new(FakeApi {
            delete_not_found: true,
            ..Default::default()
        });

        let outcome = ops
            .delete_build_pipeline_and_wait_for_state(
                &id("bp1"),
                &TargetStates::new(["SUCCEEDED"]),
                &RequestOptions::default(),
                WaiterConfig::default(),
            )
            .await
            .unwrap();
        assert!(outcome.is_gone());
    }

    /// Runs the operation named by `plan` until its first target state.
    async fn run_plan(ops: &CompositeOperations<FakeApi>, plan: OperationPlan) -> bool {
        let targets = TargetStates::new(["SUCCEEDED", "ACTIVE", "CANCELED"]);
        let opts = RequestOptions::default();
        let config = WaiterConfig::default();
        match plan.name {
            "create_project" => ops
                .create_project_and_wait_for_state(&create_details(), &targets, &opts, config)
                .await
                .is_ok(),
            "update_project" => ops
                .update_project_and_wait_for_state(
                    &id("p1"),
                    &UpdateProjectDetails::default(),
                    &targets,
                    &opts,
                    config,
                )
                .await
                .is_ok(),
            "delete_project" => ops
                .delete_project_and_wait_for_state(&id("p1"), &targets, &opts, config)
                .await
                .is_ok(),
            "create_repository" => ops
                .create_repository_and_wait_for_state(
                    &CreateRepositoryDetails::hosted("app", id("p1")),
                    &targets,
                    &opts,
                    config,
                )
                .await
                .is_ok(),
            "update_repository" => ops
                .update_repository_and_wait_for_state(
                    &id("r1"),
                    &UpdateRepositoryDetails::default(),
                    &targets,
                    &opts,
                    config,
                )
                .await
                .is_ok(),
            "delete_repository" => ops
                .delete_repository_and_wait_for_state(&id("r1"), &targets, &opts, config)
                .await
                .is_ok(),
            "create_build_pipeline" => ops
                .create_build_pipeline_and_wait_for_state(
                    &CreateBuildPipelineDetails::new(id("p1")),
                    &targets,
                    &opts,
                    config,
                )
                .await
                .is_ok(),
            "delete_build_pipeline" => ops
                .delete_build_pipeline_and_wait_for_state(&id("bp1"), &targets, &opts, config)
                .await
                .is_ok(),
            "delete_build_pipeline_stage" => ops
                .delete_build_pipeline_stage_and_wait_for_state(&id("s1"), &targets, &opts, config)
                .await
                .is_ok(),
            "create_deployment" => ops
                .create_deployment_and_wait_for_state(
                    &CreateDeploymentDetails::pipeline(id("dp1")),
                    &targets,
                    &opts,
                    config,
                )
                .await
                .is_ok(),
            "cancel_deployment" => ops
                .cancel_deployment_and_wait_for_state(&id("d1"), None, &targets, &opts, config)
                .await
                .is_ok(),
            other => panic!("no operation named {other}"),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_each_operation_polls_its_declared_target() {
        for plan in OperationPlan::ALL {
            let ops = CompositeOperations::new(FakeApi {
                work_request_header: Some("wr1"),
                work_requests: Mutex::new(VecDeque::from(["SUCCEEDED"])),
                repositories: Mutex::new(VecDeque::from([Some("ACTIVE")])),
                stages: Mutex::new(VecDeque::from([Some("ACTIVE")])),
                deployments: Mutex::new(VecDeque::from(["SUCCEEDED"])),
                ..Default::default()
            });
            assert!(run_plan(&ops, *plan).await, "{}", plan.name);

            let calls = ops.client().calls();
            let action = calls
                .iter()
                .position(|call| *call == plan.name)
                .unwrap_or_else(|| panic!("{} never issued", plan.name));
            let polls = &calls[action + 1..];
            assert!(!polls.is_empty(), "{} never polled", plan.name);

            let observed = if action > 0 {
                assert_eq!(calls[..action], polls[..1], "{}", plan.name);
                PollTarget::PrefetchedResource
            } else if polls.iter().all(|call| *call == "get_work_request") {
                PollTarget::WorkRequest
            } else {
                assert!(polls.iter().all(|call| call.starts_with("get_")), "{}", plan.name);
                PollTarget::Resource
            };
            assert_eq!(observed, plan.poll, "{}", plan.name);
        }
    }

    #[test]
    fn test_only_prefetched_deletes_succeed_on_not_found() {
        for plan in OperationPlan::ALL {
            let expected = if plan.poll == PollTarget::PrefetchedResource {
                NotFoundPolicy::Succeed
            } else {
                NotFoundPolicy::Fail
            };
            assert_eq!(plan.not_found, expected, "{}", plan.name);
        }
    }
}
