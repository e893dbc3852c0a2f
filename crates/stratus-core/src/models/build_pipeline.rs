//! Build pipelines.

use serde::{Deserialize, Serialize};

use super::{DEFINED_TAGS, DefinedTags, FREEFORM_TAGS, FreeformTags};
use crate::model::{Lifecycle, Model};
use crate::schema::{FieldKind, FieldSpec, ModelSchema};
use crate::{ResourceId, Timestamp, wire_enum};

wire_enum! {
    pub enum BuildPipelineLifecycleState {
        Creating => "CREATING",
        Updating => "UPDATING",
        Active => "ACTIVE",
        Inactive => "INACTIVE",
        Deleting => "DELETING",
        Deleted => "DELETED",
        Failed => "FAILED",
    }
}

/// A parameter passed to every run of the pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildPipelineParameter {
    pub name: String,
    pub default_value: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Model for BuildPipelineParameter {
    fn schema() -> &'static ModelSchema {
        static SCHEMA: ModelSchema = ModelSchema {
            name: "BuildPipelineParameter",
            parent: None,
            fields: &[
                FieldSpec::required("name", "name", FieldKind::String),
                FieldSpec::required("default_value", "defaultValue", FieldKind::String),
                FieldSpec::optional("description", "description", FieldKind::String),
            ],
        };
        &SCHEMA
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildPipelineParameterCollection {
    pub items: Vec<BuildPipelineParameter>,
}

impl Model for BuildPipelineParameterCollection {
    fn schema() -> &'static ModelSchema {
        static SCHEMA: ModelSchema = ModelSchema {
            name: "BuildPipelineParameterCollection",
            parent: None,
            fields: &[FieldSpec::required(
                "items",
                "items",
                FieldKind::List(&FieldKind::Object(BuildPipelineParameter::schema)),
            )],
        };
        &SCHEMA
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildPipeline {
    pub id: ResourceId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub project_id: ResourceId,
    pub compartment_id: ResourceId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_created: Option<Timestamp>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_updated: Option<Timestamp>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lifecycle_state: Option<BuildPipelineLifecycleState>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lifecycle_details: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub build_pipeline_parameters: Option<BuildPipelineParameterCollection>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub freeform_tags: Option<FreeformTags>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub defined_tags: Option<DefinedTags>,
}

impl Model for BuildPipeline {
    fn schema() -> &'static ModelSchema {
        static SCHEMA: ModelSchema = ModelSchema {
            name: "BuildPipeline",
            parent: None,
            fields: &[
                FieldSpec::required("id", "id", FieldKind::String),
                FieldSpec::optional("display_name", "displayName", FieldKind::String),
                FieldSpec::optional("description", "description", FieldKind::String),
                FieldSpec::required("project_id", "projectId", FieldKind::String),
                FieldSpec::required("compartment_id", "compartmentId", FieldKind::String),
                FieldSpec::optional("time_created", "timeCreated", FieldKind::Timestamp),
                FieldSpec::optional("time_updated", "timeUpdated", FieldKind::Timestamp),
                FieldSpec::optional("lifecycle_state", "lifecycleState", FieldKind::Enum),
                FieldSpec::optional("lifecycle_details", "lifecycleDetails", FieldKind::String),
                FieldSpec::optional(
                    "build_pipeline_parameters",
                    "buildPipelineParameters",
                    FieldKind::Object(BuildPipelineParameterCollection::schema),
                ),
                FieldSpec::optional("freeform_tags", "freeformTags", FREEFORM_TAGS),
                FieldSpec::optional("defined_tags", "definedTags", DEFINED_TAGS),
            ],
        };
        &SCHEMA
    }
}

impl Lifecycle for BuildPipeline {
    fn lifecycle_state(&self) -> Option<&str> {
        self.lifecycle_state
            .as_ref()
            .map(BuildPipelineLifecycleState::as_str)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateBuildPipelineDetails {
    pub project_id: ResourceId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub build_pipeline_parameters: Option<BuildPipelineParameterCollection>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub freeform_tags: Option<FreeformTags>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub defined_tags: Option<DefinedTags>,
}

impl CreateBuildPipelineDetails {
    pub fn new(project_id: ResourceId) -> Self {
        Self {
            project_id,
            display_name: None,
            description: None,
            build_pipeline_parameters: None,
            freeform_tags: None,
            defined_tags: None,
        }
    }
}

impl Model for CreateBuildPipelineDetails {
    fn schema() -> &'static ModelSchema {
        static SCHEMA: ModelSchema = ModelSchema {
            name: "CreateBuildPipelineDetails",
            parent: None,
            fields: &[
                FieldSpec::required("project_id", "projectId", FieldKind::String),
                FieldSpec::optional("display_name", "displayName", FieldKind::String),
                FieldSpec::optional("description", "description", FieldKind::String),
                FieldSpec::optional(
                    "build_pipeline_parameters",
                    "buildPipelineParameters",
                    FieldKind::Object(BuildPipelineParameterCollection::schema),
                ),
                FieldSpec::optional("freeform_tags", "freeformTags", FREEFORM_TAGS),
                FieldSpec::optional("defined_tags", "definedTags", DEFINED_TAGS),
            ],
        };
        &SCHEMA
    }
}
