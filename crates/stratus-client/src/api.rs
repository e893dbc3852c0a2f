//! The DevOps API surface.

use async_trait::async_trait;
use stratus_core::models::{
    BuildPipeline, BuildPipelineStage, CreateBuildPipelineDetails, CreateDeploymentDetails,
    CreateProjectDetails, CreateRepositoryDetails, Deployment, DiffCollection, Project,
    ProjectCollection, ProjectLifecycleState, Repository, RepositoryCommit, UpdateProjectDetails,
    UpdateRepositoryDetails, WorkRequest,
};
use stratus_core::{ResourceId, Result};

use crate::response::{ApiResponse, RequestOptions};

/// Filters and paging for `list_projects`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListProjectsRequest {
    pub compartment_id: ResourceId,
    pub name: Option<String>,
    pub lifecycle_state: Option<ProjectLifecycleState>,
    pub limit: Option<u32>,
    /// Token from a previous page's `opc-next-page` header.
    pub page: Option<String>,
}

impl ListProjectsRequest {
    pub fn new(compartment_id: ResourceId) -> Self {
        Self {
            compartment_id,
            name: None,
            lifecycle_state: None,
            limit: None,
            page: None,
        }
    }

    pub(crate) fn query(&self) -> Vec<(&'static str, String)> {
        let mut query = vec![("compartmentId", self.compartment_id.to_string())];
        if let Some(name) = &self.name {
            query.push(("name", name.clone()));
        }
        if let Some(state) = &self.lifecycle_state {
            query.push(("lifecycleState", state.to_string()));
        }
        if let Some(limit) = self.limit {
            query.push(("limit", limit.to_string()));
        }
        if let Some(page) = &self.page {
            query.push(("page", page.clone()));
        }
        query
    }
}

/// Operations on DevOps resources.
///
/// Not-found responses surface as errors for which
/// [`stratus_core::Error::is_not_found`] is true.
#[async_trait]
pub trait DevopsApi: Send + Sync {
    async fn get_project(&self, id: &ResourceId, opts: &RequestOptions) -> Result<ApiResponse<Project>>;

    async fn create_project(
        &self,
        details: &CreateProjectDetails,
        opts: &RequestOptions,
    ) -> Result<ApiResponse<Project>>;

    async fn update_project(
        &self,
        id: &ResourceId,
        details: &UpdateProjectDetails,
        opts: &RequestOptions,
    ) -> Result<ApiResponse<Project>>;

    async fn delete_project(&self, id: &ResourceId, opts: &RequestOptions) -> Result<ApiResponse<()>>;

    async fn list_projects(
        &self,
        request: &ListProjectsRequest,
        opts: &RequestOptions,
    ) -> Result<ApiResponse<ProjectCollection>>;

    async fn get_repository(&self, id: &ResourceId, opts: &RequestOptions) -> Result<ApiResponse<Repository>>;

    async fn create_repository(
        &self,
        details: &CreateRepositoryDetails,
        opts: &RequestOptions,
    ) -> Result<ApiResponse<Repository>>;

    async fn update_repository(
        &self,
        id: &ResourceId,
        details: &UpdateRepositoryDetails,
        opts: &RequestOptions,
    ) -> Result<ApiResponse<Repository>>;

    async fn delete_repository(&self, id: &ResourceId, opts: &RequestOptions) -> Result<ApiResponse<()>>;

    async fn get_commit(
        &self,
        repository_id: &ResourceId,
        commit_id: &str,
        opts: &RequestOptions,
    ) -> Result<ApiResponse<RepositoryCommit>>;

    /// Diffs between two refs or commits of a repository.
    async fn list_commit_diffs(
        &self,
        repository_id: &ResourceId,
        base_version: &str,
        target_version: &str,
        opts: &RequestOptions,
    ) -> Result<ApiResponse<DiffCollection>>;

    async fn get_build_pipeline(
        &self,
        id: &ResourceId,
        opts: &RequestOptions,
    ) -> Result<ApiResponse<BuildPipeline>>;

    async fn create_build_pipeline(
        &self,
        details: &CreateBuildPipelineDetails,
        opts: &RequestOptions,
    ) -> Result<ApiResponse<BuildPipeline>>;

    async fn delete_build_pipeline(&self, id: &ResourceId, opts: &RequestOptions) -> Result<ApiResponse<()>>;

    async fn get_build_pipeline_stage(
        &self,
        id: &ResourceId,
        opts: &RequestOptions,
    ) -> Result<ApiResponse<BuildPipelineStage>>;

    async fn delete_build_pipeline_stage(
        &self,
        id: &ResourceId,
        opts: &RequestOptions,
    ) -> Result<ApiResponse<()>>;

    async fn get_deployment(&self, id: &ResourceId, opts: &RequestOptions) -> Result<ApiResponse<Deployment>>;

    async fn create_deployment(
        &self,
        details: &CreateDeploymentDetails,
        opts: &RequestOptions,
    ) -> Result<ApiResponse<Deployment>>;

    async fn cancel_deployment(
        &self,
        id: &ResourceId,
        reason: Option<&str>,
        opts: &RequestOptions,
    ) -> Result<ApiResponse<Deployment>>;

    async fn get_work_request(&self, id: &ResourceId, opts: &RequestOptions) -> Result<ApiResponse<WorkRequest>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_query() {
        let mut request = ListProjectsRequest::new(ResourceId::new("c1").unwrap());
        request.lifecycle_state = Some(ProjectLifecycleState::Active);
        request.page = Some("next-2".into());
        assert_eq!(
            request.query(),
            vec![
                ("compartmentId", "c1".to_string()),
                ("lifecycleState", "ACTIVE".to_string()),
                ("page", "next-2".to_string()),
            ]
        );
    }
}
