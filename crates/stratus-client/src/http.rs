//! reqwest implementation of [`DevopsApi`].

use async_trait::async_trait;
use reqwest::{Method, RequestBuilder, Response, StatusCode};
use serde_json::{Value, json};
use std::time::Duration;
use stratus_config::Profile;
use stratus_core::models::{
    BuildPipeline, BuildPipelineStage, CreateBuildPipelineDetails, CreateDeploymentDetails,
    CreateProjectDetails, CreateRepositoryDetails, Deployment, DiffCollection, Project,
    ProjectCollection, Repository, RepositoryCommit, UpdateProjectDetails,
    UpdateRepositoryDetails, WorkRequest,
};
use stratus_core::{Error, Model, ResourceId, Result};
use tracing::{debug, warn};
use url::Url;

use crate::api::{DevopsApi, ListProjectsRequest};
use crate::response::{
    ApiResponse, ETAG, IF_MATCH, OPC_NEXT_PAGE, OPC_REQUEST_ID, OPC_RETRY_TOKEN,
    OPC_WORK_REQUEST_ID, RequestOptions, ResponseHeaders,
};

/// DevOps API client over HTTPS with bearer-token auth.
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: reqwest::Client,
    endpoint: Url,
    auth_token: Option<String>,
}

impl HttpClient {
    pub fn new(endpoint: Url, auth_token: Option<String>, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("stratus/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| Error::Transport(e.to_string()))?;

        Ok(Self {
            client,
            endpoint,
            auth_token,
        })
    }

    pub fn from_profile(profile: &Profile) -> Result<Self> {
        let token = profile
            .auth_token()
            .map_err(|e| Error::InvalidInput(e.to_string()))?;
        Self::new(profile.endpoint.clone(), token, profile.timeout)
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    fn url(&self, segments: &[&str]) -> Result<Url> {
        let path = segments
            .iter()
            .map(|s| urlencoding::encode(s).into_owned())
            .collect::<Vec<_>>()
            .join("/");
        let base = self.endpoint.as_str().trim_end_matches('/');
        Url::parse(&format!("{}/{}", base, path))
            .map_err(|e| Error::InvalidInput(format!("bad request URL: {}", e)))
    }

    fn request(&self, method: Method, url: Url, opts: &RequestOptions) -> RequestBuilder {
        debug!(method = %method, url = %url, "Sending request");
        let mut builder = self
            .client
            .request(method, url)
            .header("Accept", "application/json");
        if let Some(token) = &self.auth_token {
            builder = builder.bearer_auth(token);
        }
        if let Some(id) = &opts.opc_request_id {
            builder = builder.header(OPC_REQUEST_ID, id);
        }
        if let Some(etag) = &opts.if_match {
            builder = builder.header(IF_MATCH, etag);
        }
        builder
    }

    /// A POST that carries a retry token, generated if the caller gave none.
    fn post(&self, url: Url, body: &Value, opts: &RequestOptions) -> RequestBuilder {
        self.request(Method::POST, url, opts)
            .header(OPC_RETRY_TOKEN, opts.retry_token_or_new())
            .json(body)
    }

    async fn execute(&self, builder: RequestBuilder) -> Result<(ResponseHeaders, String)> {
        let response = builder
            .send()
            .await
            .map_err(|e| Error::Transport(e.to_string()))?;

        let headers = response_headers(&response);
        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| Error::Transport(e.to_string()))?;

        if !status.is_success() {
            let err = service_error(status, &text, headers.opc_request_id.clone());
            if status.is_server_error() {
                warn!(status = status.as_u16(), error = %err, "Service error");
            } else {
                debug!(status = status.as_u16(), error = %err, "Request rejected");
            }
            return Err(err);
        }

        Ok((headers, text))
    }

    async fn send<T: Model>(&self, builder: RequestBuilder) -> Result<ApiResponse<T>> {
        let (headers, text) = self.execute(builder).await?;
        Ok(ApiResponse::new(T::from_json(&text)?, headers))
    }

    async fn send_empty(&self, builder: RequestBuilder) -> Result<ApiResponse<()>> {
        let (headers, _) = self.execute(builder).await?;
        Ok(ApiResponse::new((), headers))
    }
}

fn header(response: &Response, name: &str) -> Option<String> {
    response
        .headers()
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(|s| s.to_string())
}

fn response_headers(response: &Response) -> ResponseHeaders {
    ResponseHeaders {
        status: response.status().as_u16(),
        opc_request_id: header(response, OPC_REQUEST_ID),
        opc_work_request_id: header(response, OPC_WORK_REQUEST_ID),
        opc_next_page: header(response, OPC_NEXT_PAGE),
        etag: header(response, ETAG),
    }
}

/// Build a service error from a `{"code": ..., "message": ...}` body, falling
/// back to the status line when the body is not JSON.
fn service_error(status: StatusCode, body: &str, opc_request_id: Option<String>) -> Error {
    let parsed: Option<Value> = serde_json::from_str(body).ok();
    let field = |name: &str| {
        parsed
            .as_ref()
            .and_then(|v| v.get(name))
            .and_then(Value::as_str)
            .map(str::to_string)
    };

    let reason = status.canonical_reason().unwrap_or("Unknown");
    let code = field("code").unwrap_or_else(|| reason.replace(' ', ""));
    let message = field("message").unwrap_or_else(|| {
        if body.trim().is_empty() {
            reason.to_string()
        } else {
            body.trim().to_string()
        }
    });

    Error::Service {
        status: status.as_u16(),
        code,
        message,
        opc_request_id,
    }
}

#[async_trait]
impl DevopsApi for HttpClient {
    async fn get_project(&self, id: &ResourceId, opts: &RequestOptions) -> Result<ApiResponse<Project>> {
        let url = self.url(&["projects", id.as_str()])?;
        self.send(self.request(Method::GET, url, opts)).await
    }

    async fn create_project(
        &self,
        details: &CreateProjectDetails,
        opts: &RequestOptions,
    ) -> Result<ApiResponse<Project>> {
        let url = self.url(&["projects"])?;
        self.send(self.post(url, &details.to_value()?, opts)).await
    }

    async fn update_project(
        &self,
        id: &ResourceId,
        details: &UpdateProjectDetails,
        opts: &RequestOptions,
    ) -> Result<ApiResponse<Project>> {
        let url = self.url(&["projects", id.as_str()])?;
        let builder = self.request(Method::PUT, url, opts).json(&details.to_value()?);
        self.send(builder).await
    }

    async fn delete_project(&self, id: &ResourceId, opts: &RequestOptions) -> Result<ApiResponse<()>> {
        let url = self.url(&["projects", id.as_str()])?;
        self.send_empty(self.request(Method::DELETE, url, opts)).await
    }

    async fn list_projects(
        &self,
        request: &ListProjectsRequest,
        opts: &RequestOptions,
    ) -> Result<ApiResponse<ProjectCollection>> {
        let url = self.url(&["projects"])?;
        let builder = self.request(Method::GET, url, opts).query(&request.query());
        self.send(builder).await
    }

    async fn get_repository(&self, id: &ResourceId, opts: &RequestOptions) -> Result<ApiResponse<Repository>> {
        let url = self.url(&["repositories", id.as_str()])?;
        self.send(self.request(Method::GET, url, opts)).await
    }

    async fn create_repository(
        &self,
        details: &CreateRepositoryDetails,
        opts: &RequestOptions,
    ) -> Result<ApiResponse<Repository>> {
        let url = self.url(&["repositories"])?;
        self.send(self.post(url, &details.to_value()?, opts)).await
    }

    async fn update_repository(
        &self,
        id: &ResourceId,
        details: &UpdateRepositoryDetails,
        opts: &RequestOptions,
    ) -> Result<ApiResponse<Repository>> {
        let url = self.url(&["repositories", id.as_str()])?;
        let builder = self.request(Method::PUT, url, opts).json(&details.to_value()?);
        self.send(builder).await
    }

    async fn delete_repository(&self, id: &ResourceId, opts: &RequestOptions) -> Result<ApiResponse<()>> {
        let url = self.url(&["repositories", id.as_str()])?;
        self.send_empty(self.request(Method::DELETE, url, opts)).await
    }

    async fn get_commit(
        &self,
        repository_id: &ResourceId,
        commit_id: &str,
        opts: &RequestOptions,
    ) -> Result<ApiResponse<RepositoryCommit>> {
        let url = self.url(&["repositories", repository_id.as_str(), "commits", commit_id])?;
        self.send(self.request(Method::GET, url, opts)).await
    }

    async fn list_commit_diffs(
        &self,
        repository_id: &ResourceId,
        base_version: &str,
        target_version: &str,
        opts: &RequestOptions,
    ) -> Result<ApiResponse<DiffCollection>> {
        let url = self.url(&["repositories", repository_id.as_str(), "diffs"])?;
        let builder = self
            .request(Method::GET, url, opts)
            .query(&[("baseVersion", base_version), ("targetVersion", target_version)]);
        self.send(builder).await
    }

    async fn get_build_pipeline(
        &self,
        id: &ResourceId,
        opts: &RequestOptions,
    ) -> Result<ApiResponse<BuildPipeline>> {
        let url = self.url(&["buildPipelines", id.as_str()])?;
        self.send(self.request(Method::GET, url, opts)).await
    }

    async fn create_build_pipeline(
        &self,
        details: &CreateBuildPipelineDetails,
        opts: &RequestOptions,
    ) -> Result<ApiResponse<BuildPipeline>> {
        let url = self.url(&["buildPipelines"])?;
        self.send(self.post(url, &details.to_value()?, opts)).await
    }

    async fn delete_build_pipeline(&self, id: &ResourceId, opts: &RequestOptions) -> Result<ApiResponse<()>> {
        let url = self.url(&["buildPipelines", id.as_str()])?;
        self.send_empty(self.request(Method::DELETE, url, opts)).await
    }

    async fn get_build_pipeline_stage(
        &self,
        id: &ResourceId,
        opts: &RequestOptions,
    ) -> Result<ApiResponse<BuildPipelineStage>> {
        let url = self.url(&["buildPipelineStages", id.as_str()])?;
        self.send(self.request(Method::GET, url, opts)).await
    }

    async fn delete_build_pipeline_stage(
        &self,
        id: &ResourceId,
        opts: &RequestOptions,
    ) -> Result<ApiResponse<()>> {
        let url = self.url(&["buildPipelineStages", id.as_str()])?;
        self.send_empty(self.request(Method::DELETE, url, opts)).await
    }

    async fn get_deployment(&self, id: &ResourceId, opts: &RequestOptions) -> Result<ApiResponse<Deployment>> {
        let url = self.url(&["deployments", id.as_str()])?;
        self.send(self.request(Method::GET, url, opts)).await
    }

    async fn create_deployment(
        &self,
        details: &CreateDeploymentDetails,
        opts: &RequestOptions,
    ) -> Result<ApiResponse<Deployment>> {
        let url = self.url(&["deployments"])?;
        self.send(self.post(url, &details.to_value()?, opts)).await
    }

    async fn cancel_deployment(
        &self,
        id: &ResourceId,
        reason: Option<&str>,
        opts: &RequestOptions,
    ) -> Result<ApiResponse<Deployment>> {
        let url = self.url(&["deployments", id.as_str(), "actions", "cancel"])?;
        let body = match reason {
            Some(reason) => json!({ "reason": reason }),
            None => json!({}),
        };
        self.send(self.post(url, &body, opts)).await
    }

    async fn get_work_request(&self, id: &ResourceId, opts: &RequestOptions) -> Result<ApiResponse<WorkRequest>> {
        let url = self.url(&["workRequests", id.as_str()])?;
        self.send(self.request(Method::GET, url, opts)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(endpoint: &str) -> HttpClient {
        HttpClient::new(Url::parse(endpoint).unwrap(), None, Duration::from_secs(5)).unwrap()
    }

    #[test]
    fn test_url_joins_and_encodes_segments() {
        let client = client("https://devops.example.com/20210630/");
        let url = client
            .url(&["repositories", "r1", "commits", "feature/x"])
            .unwrap();
        assert_eq!(
            url.as_str(),
            "https://devops.example.com/20210630/repositories/r1/commits/feature%2Fx"
        );
    }

    #[test]
    fn test_service_error_from_json_body() {
        let err = service_error(
            StatusCode::CONFLICT,
            r#"{"code": "IncorrectState", "message": "project is deleting"}"#,
            Some("req-1".into()),
        );
        assert!(matches!(
            &err,
            Error::Service { status: 409, code, message, .. }
                if code == "IncorrectState" && message == "project is deleting"
        ));
        assert_eq!(err.opc_request_id(), Some("req-1"));
        assert!(!err.is_not_found());
    }

    #[test]
    fn test_service_error_without_body() {
        let err = service_error(StatusCode::NOT_FOUND, "", None);
        assert!(err.is_not_found());
        assert!(matches!(
            &err,
            Error::Service { code, message, .. } if code == "NotFound" && message == "Not Found"
        ));
    }
}
