//! Build pipeline stages, a polymorphic family keyed by
//! `buildPipelineStageType`.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{DEFINED_TAGS, DefinedTags, FREEFORM_TAGS, FreeformTags};
use crate::model::{Lifecycle, Model};
use crate::registry::{Registry, Variant, polymorphic_serde};
use crate::schema::{FieldKind, FieldSpec, ModelSchema};
use crate::{ResourceId, Result, Timestamp, wire_enum};

wire_enum! {
    pub enum BuildPipelineStageType {
        Build => "BUILD",
        DeliverArtifact => "DELIVER_ARTIFACT",
        TriggerDeploymentPipeline => "TRIGGER_DEPLOYMENT_PIPELINE",
        Wait => "WAIT",
    }
}

wire_enum! {
    pub enum BuildPipelineStageLifecycleState {
        Creating => "CREATING",
        Updating => "UPDATING",
        Active => "ACTIVE",
        Deleting => "DELETING",
        Deleted => "DELETED",
        Failed => "FAILED",
    }
}

wire_enum! {
    pub enum BuildSourceConnectionType {
        Github => "GITHUB",
        Gitlab => "GITLAB",
        Bitbucket => "BITBUCKET_CLOUD",
        DevopsCodeRepository => "DEVOPS_CODE_REPOSITORY",
    }
}

wire_enum! {
    pub enum WaitType {
        AbsoluteWait => "ABSOLUTE_WAIT",
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StagePredecessor {
    pub id: ResourceId,
}

impl Model for StagePredecessor {
    fn schema() -> &'static ModelSchema {
        static SCHEMA: ModelSchema = ModelSchema {
            name: "BuildPipelineStagePredecessor",
            parent: None,
            fields: &[FieldSpec::required("id", "id", FieldKind::String)],
        };
        &SCHEMA
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StagePredecessorCollection {
    pub items: Vec<StagePredecessor>,
}

impl Model for StagePredecessorCollection {
    fn schema() -> &'static ModelSchema {
        static SCHEMA: ModelSchema = ModelSchema {
            name: "BuildPipelineStagePredecessorCollection",
            parent: None,
            fields: &[FieldSpec::required(
                "items",
                "items",
                FieldKind::List(&FieldKind::Object(StagePredecessor::schema)),
            )],
        };
        &SCHEMA
    }
}

/// Fields shared by every stage type.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StageCommon {
    pub id: ResourceId,
    pub build_pipeline_id: ResourceId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_id: Option<ResourceId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub compartment_id: Option<ResourceId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_created: Option<Timestamp>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_updated: Option<Timestamp>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lifecycle_state: Option<BuildPipelineStageLifecycleState>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lifecycle_details: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub build_pipeline_stage_predecessor_collection: Option<StagePredecessorCollection>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub freeform_tags: Option<FreeformTags>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub defined_tags: Option<DefinedTags>,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildSource {
    pub name: String,
    pub connection_type: BuildSourceConnectionType,
    pub repository_url: String,
    pub branch: String,
}

impl Model for BuildSource {
    fn schema() -> &'static ModelSchema {
        static SCHEMA: ModelSchema = ModelSchema {
            name: "BuildSource",
            parent: None,
            fields: &[
                FieldSpec::required("name", "name", FieldKind::String),
                FieldSpec::required("connection_type", "connectionType", FieldKind::Enum),
                FieldSpec::required("repository_url", "repositoryUrl", FieldKind::String),
                FieldSpec::required("branch", "branch", FieldKind::String),
            ],
        };
        &SCHEMA
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildSourceCollection {
    pub items: Vec<BuildSource>,
}

impl Model for BuildSourceCollection {
    fn schema() -> &'static ModelSchema {
        static SCHEMA: ModelSchema = ModelSchema {
            name: "BuildSourceCollection",
            parent: None,
            fields: &[FieldSpec::required(
                "items",
                "items",
                FieldKind::List(&FieldKind::Object(BuildSource::schema)),
            )],
        };
        &SCHEMA
    }
}

/// Runs a build spec on a managed runner.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildStage {
    #[serde(flatten)]
    pub common: StageCommon,
    pub image: String,
    pub build_source_collection: BuildSourceCollection,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub build_spec_file: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stage_execution_timeout_in_seconds: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub primary_build_source: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeliverArtifact {
    pub artifact_name: String,
    pub artifact_id: ResourceId,
}

impl Model for DeliverArtifact {
    fn schema() -> &'static ModelSchema {
        static SCHEMA: ModelSchema = ModelSchema {
            name: "DeliverArtifact",
            parent: None,
            fields: &[
                FieldSpec::required("artifact_name", "artifactName", FieldKind::String),
                FieldSpec::required("artifact_id", "artifactId", FieldKind::String),
            ],
        };
        &SCHEMA
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeliverArtifactCollection {
    pub items: Vec<DeliverArtifact>,
}

impl Model for DeliverArtifactCollection {
    fn schema() -> &'static ModelSchema {
        static SCHEMA: ModelSchema = ModelSchema {
            name: "DeliverArtifactCollection",
            parent: None,
            fields: &[FieldSpec::required(
                "items",
                "items",
                FieldKind::List(&FieldKind::Object(DeliverArtifact::schema)),
            )],
        };
        &SCHEMA
    }
}

/// Publishes build outputs to artifact storage.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeliverArtifactStage {
    #[serde(flatten)]
    pub common: StageCommon,
    pub deliver_artifact_collection: DeliverArtifactCollection,
}

/// Starts a deployment pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TriggerDeploymentStage {
    #[serde(flatten)]
    pub common: StageCommon,
    pub deploy_pipeline_id: ResourceId,
    pub is_pass_all_parameters_enabled: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WaitCriteria {
    pub wait_type: WaitType,
    /// ISO 8601 duration, e.g. `PT10M`.
    pub wait_duration: String,
}

impl Model for WaitCriteria {
    fn schema() -> &'static ModelSchema {
        static SCHEMA: ModelSchema = ModelSchema {
            name: "WaitCriteria",
            parent: None,
            fields: &[
                FieldSpec::required("wait_type", "waitType", FieldKind::Enum),
                FieldSpec::required("wait_duration", "waitDuration", FieldKind::String),
            ],
        };
        &SCHEMA
    }
}

/// Pauses the pipeline for a fixed duration.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WaitStage {
    #[serde(flatten)]
    pub common: StageCommon,
    pub wait_criteria: WaitCriteria,
}

/// A stage whose type this SDK version does not know.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnrecognizedStage {
    pub build_pipeline_stage_type: BuildPipelineStageType,
    #[serde(flatten)]
    pub common: StageCommon,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum BuildPipelineStage {
    Build(BuildStage),
    DeliverArtifact(DeliverArtifactStage),
    TriggerDeployment(TriggerDeploymentStage),
    Wait(WaitStage),
    Other(UnrecognizedStage),
}

impl BuildPipelineStage {
    pub fn registry() -> &'static Registry<BuildPipelineStage> {
        &STAGE_REGISTRY
    }

    pub fn stage_type(&self) -> BuildPipelineStageType {
        match self {
            Self::Build(_) => BuildPipelineStageType::Build,
            Self::DeliverArtifact(_) => BuildPipelineStageType::DeliverArtifact,
            Self::TriggerDeployment(_) => BuildPipelineStageType::TriggerDeploymentPipeline,
            Self::Wait(_) => BuildPipelineStageType::Wait,
            Self::Other(stage) => stage.build_pipeline_stage_type.clone(),
        }
    }

    pub fn common(&self) -> &StageCommon {
        match self {
            Self::Build(stage) => &stage.common,
            Self::DeliverArtifact(stage) => &stage.common,
            Self::TriggerDeployment(stage) => &stage.common,
            Self::Wait(stage) => &stage.common,
            Self::Other(stage) => &stage.common,
        }
    }

    pub fn id(&self) -> &ResourceId {
        &self.common().id
    }
}

impl Model for BuildPipelineStage {
    fn schema() -> &'static ModelSchema {
        base_schema()
    }

    fn from_value(value: Value) -> Result<Self> {
        STAGE_REGISTRY.decode(value)
    }

    fn to_value(&self) -> Result<Value> {
        let tag = self.stage_type();
        match self {
            Self::Build(stage) => STAGE_REGISTRY.encode(tag.as_str(), stage),
            Self::DeliverArtifact(stage) => STAGE_REGISTRY.encode(tag.as_str(), stage),
            Self::TriggerDeployment(stage) => STAGE_REGISTRY.encode(tag.as_str(), stage),
            Self::Wait(stage) => STAGE_REGISTRY.encode(tag.as_str(), stage),
            Self::Other(stage) => STAGE_REGISTRY.encode(tag.as_str(), stage),
        }
    }
}

polymorphic_serde!(BuildPipelineStage);

impl Lifecycle for BuildPipelineStage {
    fn lifecycle_state(&self) -> Option<&str> {
        self.common()
            .lifecycle_state
            .as_ref()
            .map(BuildPipelineStageLifecycleState::as_str)
    }
}

fn base_schema() -> &'static ModelSchema {
    static SCHEMA: ModelSchema = ModelSchema {
        name: "BuildPipelineStage",
        parent: None,
        fields: &[
            FieldSpec::required(
                "build_pipeline_stage_type",
                "buildPipelineStageType",
                FieldKind::Enum,
            ),
            FieldSpec::required("id", "id", FieldKind::String),
            FieldSpec::required("build_pipeline_id", "buildPipelineId", FieldKind::String),
            FieldSpec::optional("display_name", "displayName", FieldKind::String),
            FieldSpec::optional("description", "description", FieldKind::String),
            FieldSpec::optional("project_id", "projectId", FieldKind::String),
            FieldSpec::optional("compartment_id", "compartmentId", FieldKind::String),
            FieldSpec::optional("time_created", "timeCreated", FieldKind::Timestamp),
            FieldSpec::optional("time_updated", "timeUpdated", FieldKind::Timestamp),
            FieldSpec::optional("lifecycle_state", "lifecycleState", FieldKind::Enum),
            FieldSpec::optional("lifecycle_details", "lifecycleDetails", FieldKind::String),
            FieldSpec::optional(
                "build_pipeline_stage_predecessor_collection",
                "buildPipelineStagePredecessorCollection",
                FieldKind::Object(StagePredecessorCollection::schema),
            ),
            FieldSpec::optional("freeform_tags", "freeformTags", FREEFORM_TAGS),
            FieldSpec::optional("defined_tags", "definedTags", DEFINED_TAGS),
        ],
    };
    &SCHEMA
}

fn build_schema() -> &'static ModelSchema {
    static SCHEMA: ModelSchema = ModelSchema {
        name: "BuildStage",
        parent: Some(base_schema),
        fields: &[
            FieldSpec::required("image", "image", FieldKind::String),
            FieldSpec::required(
                "build_source_collection",
                "buildSourceCollection",
                FieldKind::Object(BuildSourceCollection::schema),
            ),
            FieldSpec::optional("build_spec_file", "buildSpecFile", FieldKind::String),
            FieldSpec::optional(
                "stage_execution_timeout_in_seconds",
                "stageExecutionTimeoutInSeconds",
                FieldKind::Integer,
            ),
            FieldSpec::optional("primary_build_source", "primaryBuildSource", FieldKind::String),
        ],
    };
    &SCHEMA
}

fn deliver_artifact_schema() -> &'static ModelSchema {
    static SCHEMA: ModelSchema = ModelSchema {
        name: "DeliverArtifactStage",
        parent: Some(base_schema),
        fields: &[FieldSpec::required(
            "deliver_artifact_collection",
            "deliverArtifactCollection",
            FieldKind::Object(DeliverArtifactCollection::schema),
        )],
    };
    &SCHEMA
}

fn trigger_deployment_schema() -> &'static ModelSchema {
    static SCHEMA: ModelSchema = ModelSchema {
        name: "TriggerDeploymentStage",
        parent: Some(base_schema),
        fields: &[
            FieldSpec::required("deploy_pipeline_id", "deployPipelineId", FieldKind::String),
            FieldSpec::required(
                "is_pass_all_parameters_enabled",
                "isPassAllParametersEnabled",
                FieldKind::Boolean,
            ),
        ],
    };
    &SCHEMA
}

fn wait_schema() -> &'static ModelSchema {
    static SCHEMA: ModelSchema = ModelSchema {
        name: "WaitStage",
        parent: Some(base_schema),
        fields: &[FieldSpec::required(
            "wait_criteria",
            "waitCriteria",
            FieldKind::Object(WaitCriteria::schema),
        )],
    };
    &SCHEMA
}

fn build_build(value: Value) -> Result<BuildPipelineStage> {
    Ok(BuildPipelineStage::Build(serde_json::from_value(value)?))
}

fn build_deliver_artifact(value: Value) -> Result<BuildPipelineStage> {
    Ok(BuildPipelineStage::DeliverArtifact(serde_json::from_value(value)?))
}

fn build_trigger_deployment(value: Value) -> Result<BuildPipelineStage> {
    Ok(BuildPipelineStage::TriggerDeployment(serde_json::from_value(value)?))
}

fn build_wait(value: Value) -> Result<BuildPipelineStage> {
    Ok(BuildPipelineStage::Wait(serde_json::from_value(value)?))
}

fn build_other(value: Value) -> Result<BuildPipelineStage> {
    Ok(BuildPipelineStage::Other(serde_json::from_value(value)?))
}

static STAGE_REGISTRY: Registry<BuildPipelineStage> = Registry {
    family: "BuildPipelineStage",
    discriminator: "build_pipeline_stage_type",
    discriminator_wire: "buildPipelineStageType",
    fallback: Variant {
        tag: "",
        schema: base_schema,
        build: build_other,
    },
    variants: &[
        Variant {
            tag: "BUILD",
            schema: build_schema,
            build: build_build,
        },
        Variant {
            tag: "DELIVER_ARTIFACT",
            schema: deliver_artifact_schema,
            build: build_deliver_artifact,
        },
        Variant {
            tag: "TRIGGER_DEPLOYMENT_PIPELINE",
            schema: trigger_deployment_schema,
            build: build_trigger_deployment,
        },
        Variant {
            tag: "WAIT",
            schema: wait_schema,
            build: build_wait,
        },
    ],
};
