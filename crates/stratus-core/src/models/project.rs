//! Projects group repositories, pipelines and deployments.

use serde::{Deserialize, Serialize};

use super::{DEFINED_TAGS, DefinedTags, FREEFORM_TAGS, FreeformTags};
use crate::model::{Lifecycle, Model};
use crate::schema::{FieldKind, FieldSpec, ModelSchema};
use crate::{ResourceId, Timestamp, wire_enum};

wire_enum! {
    /// Lifecycle state of a project.
    pub enum ProjectLifecycleState {
        Creating => "CREATING",
        Updating => "UPDATING",
        Active => "ACTIVE",
        Deleting => "DELETING",
        Deleted => "DELETED",
        Failed => "FAILED",
    }
}

/// Where project notifications are published.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationConfig {
    pub topic_id: ResourceId,
}

impl Model for NotificationConfig {
    fn schema() -> &'static ModelSchema {
        static SCHEMA: ModelSchema = ModelSchema {
            name: "NotificationConfig",
            parent: None,
            fields: &[FieldSpec::required("topic_id", "topicId", FieldKind::String)],
        };
        &SCHEMA
    }
}

/// A DevOps project.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: ResourceId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,
    pub notification_config: NotificationConfig,
    pub compartment_id: ResourceId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_created: Option<Timestamp>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_updated: Option<Timestamp>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lifecycle_state: Option<ProjectLifecycleState>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lifecycle_details: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub freeform_tags: Option<FreeformTags>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub defined_tags: Option<DefinedTags>,
}

impl Model for Project {
    fn schema() -> &'static ModelSchema {
        static SCHEMA: ModelSchema = ModelSchema {
            name: "Project",
            parent: None,
            fields: &[
                FieldSpec::required("id", "id", FieldKind::String),
                FieldSpec::required("name", "name", FieldKind::String),
                FieldSpec::optional("description", "description", FieldKind::String),
                FieldSpec::optional("namespace", "namespace", FieldKind::String),
                FieldSpec::required(
                    "notification_config",
                    "notificationConfig",
                    FieldKind::Object(NotificationConfig::schema),
                ),
                FieldSpec::required("compartment_id", "compartmentId", FieldKind::String),
                FieldSpec::optional("time_created", "timeCreated", FieldKind::Timestamp),
                FieldSpec::optional("time_updated", "timeUpdated", FieldKind::Timestamp),
                FieldSpec::optional("lifecycle_state", "lifecycleState", FieldKind::Enum),
                FieldSpec::optional("lifecycle_details", "lifecycleDetails", FieldKind::String),
                FieldSpec::optional("freeform_tags", "freeformTags", FREEFORM_TAGS),
                FieldSpec::optional("defined_tags", "definedTags", DEFINED_TAGS),
            ],
        };
        &SCHEMA
    }
}

impl Lifecycle for Project {
    fn lifecycle_state(&self) -> Option<&str> {
        self.lifecycle_state.as_ref().map(ProjectLifecycleState::as_str)
    }
}

/// A project as returned by list calls.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectSummary {
    pub id: ResourceId,
    pub name: String,
    pub compartment_id: ResourceId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_created: Option<Timestamp>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lifecycle_state: Option<ProjectLifecycleState>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub freeform_tags: Option<FreeformTags>,
}

impl Model for ProjectSummary {
    fn schema() -> &'static ModelSchema {
        static SCHEMA: ModelSchema = ModelSchema {
            name: "ProjectSummary",
            parent: None,
            fields: &[
                FieldSpec::required("id", "id", FieldKind::String),
                FieldSpec::required("name", "name", FieldKind::String),
                FieldSpec::required("compartment_id", "compartmentId", FieldKind::String),
                FieldSpec::optional("description", "description", FieldKind::String),
                FieldSpec::optional("time_created", "timeCreated", FieldKind::Timestamp),
                FieldSpec::optional("lifecycle_state", "lifecycleState", FieldKind::Enum),
                FieldSpec::optional("freeform_tags", "freeformTags", FREEFORM_TAGS),
            ],
        };
        &SCHEMA
    }
}

/// One page of projects.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectCollection {
    pub items: Vec<ProjectSummary>,
}

impl Model for ProjectCollection {
    fn schema() -> &'static ModelSchema {
        static SCHEMA: ModelSchema = ModelSchema {
            name: "ProjectCollection",
            parent: None,
            fields: &[FieldSpec::required(
                "items",
                "items",
                FieldKind::List(&FieldKind::Object(ProjectSummary::schema)),
            )],
        };
        &SCHEMA
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateProjectDetails {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub notification_config: NotificationConfig,
    pub compartment_id: ResourceId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub freeform_tags: Option<FreeformTags>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub defined_tags: Option<DefinedTags>,
}

impl CreateProjectDetails {
    pub fn new(name: impl Into<String>, compartment_id: ResourceId, topic_id: ResourceId) -> Self {
        Self {
            name: name.into(),
            description: None,
            notification_config: NotificationConfig { topic_id },
            compartment_id,
            freeform_tags: None,
            defined_tags: None,
        }
    }
}

impl Model for CreateProjectDetails {
    fn schema() -> &'static ModelSchema {
        static SCHEMA: ModelSchema = ModelSchema {
            name: "CreateProjectDetails",
            parent: None,
            fields: &[
                FieldSpec::required("name", "name", FieldKind::String),
                FieldSpec::optional("description", "description", FieldKind::String),
                FieldSpec::required(
                    "notification_config",
                    "notificationConfig",
                    FieldKind::Object(NotificationConfig::schema),
                ),
                FieldSpec::required("compartment_id", "compartmentId", FieldKind::String),
                FieldSpec::optional("freeform_tags", "freeformTags", FREEFORM_TAGS),
                FieldSpec::optional("defined_tags", "definedTags", DEFINED_TAGS),
            ],
        };
        &SCHEMA
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProjectDetails {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notification_config: Option<NotificationConfig>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub freeform_tags: Option<FreeformTags>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub defined_tags: Option<DefinedTags>,
}

impl Model for UpdateProjectDetails {
    fn schema() -> &'static ModelSchema {
        static SCHEMA: ModelSchema = ModelSchema {
            name: "UpdateProjectDetails",
            parent: None,
            fields: &[
                FieldSpec::optional("description", "description", FieldKind::String),
                FieldSpec::optional(
                    "notification_config",
                    "notificationConfig",
                    FieldKind::Object(NotificationConfig::schema),
                ),
                FieldSpec::optional("freeform_tags", "freeformTags", FREEFORM_TAGS),
                FieldSpec::optional("defined_tags", "definedTags", DEFINED_TAGS),
            ],
        };
        &SCHEMA
    }
}
