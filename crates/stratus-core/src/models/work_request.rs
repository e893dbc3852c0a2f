//! Work requests track asynchronous operations on resources.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::model::{Lifecycle, Model};
use crate::schema::{FieldKind, FieldSpec, ModelSchema};
use crate::{ResourceId, Timestamp, wire_enum};

wire_enum! {
    pub enum OperationType {
        CreateProject => "CREATE_PROJECT",
        UpdateProject => "UPDATE_PROJECT",
        DeleteProject => "DELETE_PROJECT",
        MoveProject => "MOVE_PROJECT",
        CreateRepository => "CREATE_REPOSITORY",
        UpdateRepository => "UPDATE_REPOSITORY",
        DeleteRepository => "DELETE_REPOSITORY",
        CreateBuildPipeline => "CREATE_BUILD_PIPELINE",
        UpdateBuildPipeline => "UPDATE_BUILD_PIPELINE",
        DeleteBuildPipeline => "DELETE_BUILD_PIPELINE",
        CreateBuildPipelineStage => "CREATE_BUILD_PIPELINE_STAGE",
        UpdateBuildPipelineStage => "UPDATE_BUILD_PIPELINE_STAGE",
        DeleteBuildPipelineStage => "DELETE_BUILD_PIPELINE_STAGE",
        CreateDeployment => "CREATE_DEPLOYMENT",
        CancelDeployment => "CANCEL_DEPLOYMENT",
    }
}

wire_enum! {
    pub enum OperationStatus {
        Accepted => "ACCEPTED",
        InProgress => "IN_PROGRESS",
        Waiting => "WAITING",
        Failed => "FAILED",
        Succeeded => "SUCCEEDED",
        Canceling => "CANCELING",
        Canceled => "CANCELED",
    }
}

wire_enum! {
    /// What the work request did to a resource.
    pub enum ActionType {
        Created => "CREATED",
        Updated => "UPDATED",
        Deleted => "DELETED",
        InProgress => "IN_PROGRESS",
        Failed => "FAILED",
    }
}

/// A resource touched by a work request.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkRequestResource {
    pub entity_type: String,
    pub action_type: ActionType,
    pub identifier: ResourceId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entity_uri: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<BTreeMap<String, String>>,
}

impl Model for WorkRequestResource {
    fn schema() -> &'static ModelSchema {
        static SCHEMA: ModelSchema = ModelSchema {
            name: "WorkRequestResource",
            parent: None,
            fields: &[
                FieldSpec::required("entity_type", "entityType", FieldKind::String),
                FieldSpec::required("action_type", "actionType", FieldKind::Enum),
                FieldSpec::required("identifier", "identifier", FieldKind::String),
                FieldSpec::optional("entity_uri", "entityUri", FieldKind::String),
                FieldSpec::optional("metadata", "metadata", FieldKind::Map(&FieldKind::String)),
            ],
        };
        &SCHEMA
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkRequest {
    pub id: ResourceId,
    pub operation_type: OperationType,
    pub status: OperationStatus,
    pub compartment_id: ResourceId,
    pub resources: Vec<WorkRequestResource>,
    /// Whole percent, 0 to 100.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub percent_complete: Option<i64>,
    pub time_accepted: Timestamp,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_started: Option<Timestamp>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_finished: Option<Timestamp>,
}

impl WorkRequest {
    /// Identifier of the first resource of the given entity type, e.g. the new
    /// project created by a `CREATE_PROJECT` request.
    pub fn resource_id(&self, entity_type: &str) -> Option<&ResourceId> {
        self.resources
            .iter()
            .find(|r| r.entity_type.eq_ignore_ascii_case(entity_type))
            .map(|r| &r.identifier)
    }
}

impl Model for WorkRequest {
    fn schema() -> &'static ModelSchema {
        static SCHEMA: ModelSchema = ModelSchema {
            name: "WorkRequest",
            parent: None,
            fields: &[
                FieldSpec::required("id", "id", FieldKind::String),
                FieldSpec::required("operation_type", "operationType", FieldKind::Enum),
                FieldSpec::required("status", "status", FieldKind::Enum),
                FieldSpec::required("compartment_id", "compartmentId", FieldKind::String),
                FieldSpec::required(
                    "resources",
                    "resources",
                    FieldKind::List(&FieldKind::Object(WorkRequestResource::schema)),
                ),
                FieldSpec::optional("percent_complete", "percentComplete", FieldKind::Integer),
                FieldSpec::required("time_accepted", "timeAccepted", FieldKind::Timestamp),
                FieldSpec::optional("time_started", "timeStarted", FieldKind::Timestamp),
                FieldSpec::optional("time_finished", "timeFinished", FieldKind::Timestamp),
            ],
        };
        &SCHEMA
    }
}

impl Lifecycle for WorkRequest {
    fn lifecycle_state(&self) -> Option<&str> {
        Some(self.status.as_str())
    }
}
