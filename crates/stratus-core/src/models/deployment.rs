//! Deployments and deployment requests, both polymorphic on `deploymentType`.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{DEFINED_TAGS, DefinedTags, FREEFORM_TAGS, FreeformTags};
use crate::model::{Lifecycle, Model};
use crate::registry::{Registry, Variant, polymorphic_serde};
use crate::schema::{FieldKind, FieldSpec, ModelSchema};
use crate::{ResourceId, Result, Timestamp, wire_enum};

wire_enum! {
    pub enum DeploymentType {
        PipelineDeployment => "PIPELINE_DEPLOYMENT",
        PipelineRedeployment => "PIPELINE_REDEPLOYMENT",
        SingleStageDeployment => "SINGLE_STAGE_DEPLOYMENT",
        SingleStageRedeployment => "SINGLE_STAGE_REDEPLOYMENT",
    }
}

wire_enum! {
    pub enum DeploymentLifecycleState {
        Accepted => "ACCEPTED",
        InProgress => "IN_PROGRESS",
        Failed => "FAILED",
        Succeeded => "SUCCEEDED",
        Canceling => "CANCELING",
        Canceled => "CANCELED",
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeploymentArgument {
    pub name: String,
    pub value: String,
}

impl Model for DeploymentArgument {
    fn schema() -> &'static ModelSchema {
        static SCHEMA: ModelSchema = ModelSchema {
            name: "DeploymentArgument",
            parent: None,
            fields: &[
                FieldSpec::required("name", "name", FieldKind::String),
                FieldSpec::required("value", "value", FieldKind::String),
            ],
        };
        &SCHEMA
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeploymentArgumentCollection {
    pub items: Vec<DeploymentArgument>,
}

impl DeploymentArgumentCollection {
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            items: pairs
                .into_iter()
                .map(|(name, value)| DeploymentArgument {
                    name: name.into(),
                    value: value.into(),
                })
                .collect(),
        }
    }
}

impl Model for DeploymentArgumentCollection {
    fn schema() -> &'static ModelSchema {
        static SCHEMA: ModelSchema = ModelSchema {
            name: "DeploymentArgumentCollection",
            parent: None,
            fields: &[FieldSpec::required(
                "items",
                "items",
                FieldKind::List(&FieldKind::Object(DeploymentArgument::schema)),
            )],
        };
        &SCHEMA
    }
}

/// Fields shared by every deployment type.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeploymentCommon {
    pub id: ResourceId,
    pub deploy_pipeline_id: ResourceId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_id: Option<ResourceId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub compartment_id: Option<ResourceId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_created: Option<Timestamp>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_updated: Option<Timestamp>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lifecycle_state: Option<DeploymentLifecycleState>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lifecycle_details: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deployment_arguments: Option<DeploymentArgumentCollection>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub freeform_tags: Option<FreeformTags>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub defined_tags: Option<DefinedTags>,
}

/// Runs every stage of the deployment pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PipelineDeployment {
    #[serde(flatten)]
    pub common: DeploymentCommon,
}

/// Re-runs a previous pipeline deployment.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PipelineRedeployment {
    #[serde(flatten)]
    pub common: DeploymentCommon,
    pub previous_deployment_id: ResourceId,
}

/// Runs a single stage of the deployment pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SingleStageDeployment {
    #[serde(flatten)]
    pub common: DeploymentCommon,
    pub deploy_stage_id: ResourceId,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SingleStageRedeployment {
    #[serde(flatten)]
    pub common: DeploymentCommon,
    pub previous_deployment_id: ResourceId,
    pub deploy_stage_id: ResourceId,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnrecognizedDeployment {
    pub deployment_type: DeploymentType,
    #[serde(flatten)]
    pub common: DeploymentCommon,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Deployment {
    Pipeline(PipelineDeployment),
    PipelineRedeployment(PipelineRedeployment),
    SingleStage(SingleStageDeployment),
    SingleStageRedeployment(SingleStageRedeployment),
    Other(UnrecognizedDeployment),
}

impl Deployment {
    pub fn registry() -> &'static Registry<Deployment> {
        &DEPLOYMENT_REGISTRY
    }

    pub fn deployment_type(&self) -> DeploymentType {
        match self {
            Self::Pipeline(_) => DeploymentType::PipelineDeployment,
            Self::PipelineRedeployment(_) => DeploymentType::PipelineRedeployment,
            Self::SingleStage(_) => DeploymentType::SingleStageDeployment,
            Self::SingleStageRedeployment(_) => DeploymentType::SingleStageRedeployment,
            Self::Other(deployment) => deployment.deployment_type.clone(),
        }
    }

    pub fn common(&self) -> &DeploymentCommon {
        match self {
            Self::Pipeline(d) => &d.common,
            Self::PipelineRedeployment(d) => &d.common,
            Self::SingleStage(d) => &d.common,
            Self::SingleStageRedeployment(d) => &d.common,
            Self::Other(d) => &d.common,
        }
    }

    pub fn id(&self) -> &ResourceId {
        &self.common().id
    }
}

impl Model for Deployment {
    fn schema() -> &'static ModelSchema {
        deployment_base_schema()
    }

    fn from_value(value: Value) -> Result<Self> {
        DEPLOYMENT_REGISTRY.decode(value)
    }

    fn to_value(&self) -> Result<Value> {
        let tag = self.deployment_type();
        match self {
            Self::Pipeline(d) => DEPLOYMENT_REGISTRY.encode(tag.as_str(), d),
            Self::PipelineRedeployment(d) => DEPLOYMENT_REGISTRY.encode(tag.as_str(), d),
            Self::SingleStage(d) => DEPLOYMENT_REGISTRY.encode(tag.as_str(), d),
            Self::SingleStageRedeployment(d) => DEPLOYMENT_REGISTRY.encode(tag.as_str(), d),
            Self::Other(d) => DEPLOYMENT_REGISTRY.encode(tag.as_str(), d),
        }
    }
}

polymorphic_serde!(Deployment);

impl Lifecycle for Deployment {
    fn lifecycle_state(&self) -> Option<&str> {
        self.common()
            .lifecycle_state
            .as_ref()
            .map(DeploymentLifecycleState::as_str)
    }
}

fn deployment_base_schema() -> &'static ModelSchema {
    static SCHEMA: ModelSchema = ModelSchema {
        name: "Deployment",
        parent: None,
        fields: &[
            FieldSpec::required("deployment_type", "deploymentType", FieldKind::Enum),
            FieldSpec::required("id", "id", FieldKind::String),
            FieldSpec::required("deploy_pipeline_id", "deployPipelineId", FieldKind::String),
            FieldSpec::optional("display_name", "displayName", FieldKind::String),
            FieldSpec::optional("project_id", "projectId", FieldKind::String),
            FieldSpec::optional("compartment_id", "compartmentId", FieldKind::String),
            FieldSpec::optional("time_created", "timeCreated", FieldKind::Timestamp),
            FieldSpec::optional("time_updated", "timeUpdated", FieldKind::Timestamp),
            FieldSpec::optional("lifecycle_state", "lifecycleState", FieldKind::Enum),
            FieldSpec::optional("lifecycle_details", "lifecycleDetails", FieldKind::String),
            FieldSpec::optional(
                "deployment_arguments",
                "deploymentArguments",
                FieldKind::Object(DeploymentArgumentCollection::schema),
            ),
            FieldSpec::optional("freeform_tags", "freeformTags", FREEFORM_TAGS),
            FieldSpec::optional("defined_tags", "definedTags", DEFINED_TAGS),
        ],
    };
    &SCHEMA
}

fn pipeline_deployment_schema() -> &'static ModelSchema {
    static SCHEMA: ModelSchema = ModelSchema {
        name: "DeployPipelineDeployment",
        parent: Some(deployment_base_schema),
        fields: &[],
    };
    &SCHEMA
}

fn pipeline_redeployment_schema() -> &'static ModelSchema {
    static SCHEMA: ModelSchema = ModelSchema {
        name: "DeployPipelineRedeployment",
        parent: Some(deployment_base_schema),
        fields: &[FieldSpec::required(
            "previous_deployment_id",
            "previousDeploymentId",
            FieldKind::String,
        )],
    };
    &SCHEMA
}

fn single_stage_deployment_schema() -> &'static ModelSchema {
    static SCHEMA: ModelSchema = ModelSchema {
        name: "SingleDeployStageDeployment",
        parent: Some(deployment_base_schema),
        fields: &[FieldSpec::required("deploy_stage_id", "deployStageId", FieldKind::String)],
    };
    &SCHEMA
}

fn single_stage_redeployment_schema() -> &'static ModelSchema {
    static SCHEMA: ModelSchema = ModelSchema {
        name: "SingleDeployStageRedeployment",
        parent: Some(deployment_base_schema),
        fields: &[
            FieldSpec::required("previous_deployment_id", "previousDeploymentId", FieldKind::String),
            FieldSpec::required("deploy_stage_id", "deployStageId", FieldKind::String),
        ],
    };
    &SCHEMA
}

fn build_pipeline_deployment(value: Value) -> Result<Deployment> {
    Ok(Deployment::Pipeline(serde_json::from_value(value)?))
}

fn build_pipeline_redeployment(value: Value) -> Result<Deployment> {
    Ok(Deployment::PipelineRedeployment(serde_json::from_value(value)?))
}

fn build_single_stage_deployment(value: Value) -> Result<Deployment> {
    Ok(Deployment::SingleStage(serde_json::from_value(value)?))
}

fn build_single_stage_redeployment(value: Value) -> Result<Deployment> {
    Ok(Deployment::SingleStageRedeployment(serde_json::from_value(value)?))
}

fn build_other_deployment(value: Value) -> Result<Deployment> {
    Ok(Deployment::Other(serde_json::from_value(value)?))
}

static DEPLOYMENT_REGISTRY: Registry<Deployment> = Registry {
    family: "Deployment",
    discriminator: "deployment_type",
    discriminator_wire: "deploymentType",
    fallback: Variant {
        tag: "",
        schema: deployment_base_schema,
        build: build_other_deployment,
    },
    variants: &[
        Variant {
            tag: "PIPELINE_DEPLOYMENT",
            schema: pipeline_deployment_schema,
            build: build_pipeline_deployment,
        },
        Variant {
            tag: "PIPELINE_REDEPLOYMENT",
            schema: pipeline_redeployment_schema,
            build: build_pipeline_redeployment,
        },
        Variant {
            tag: "SINGLE_STAGE_DEPLOYMENT",
            schema: single_stage_deployment_schema,
            build: build_single_stage_deployment,
        },
        Variant {
            tag: "SINGLE_STAGE_REDEPLOYMENT",
            schema: single_stage_redeployment_schema,
            build: build_single_stage_redeployment,
        },
    ],
};

/// Fields shared by every deployment request.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateDeploymentCommon {
    pub deploy_pipeline_id: ResourceId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deployment_arguments: Option<DeploymentArgumentCollection>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub freeform_tags: Option<FreeformTags>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub defined_tags: Option<DefinedTags>,
}

impl CreateDeploymentCommon {
    pub fn new(deploy_pipeline_id: ResourceId) -> Self {
        Self {
            deploy_pipeline_id,
            display_name: None,
            deployment_arguments: None,
            freeform_tags: None,
            defined_tags: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePipelineDeploymentDetails {
    #[serde(flatten)]
    pub common: CreateDeploymentCommon,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePipelineRedeploymentDetails {
    #[serde(flatten)]
    pub common: CreateDeploymentCommon,
    pub previous_deployment_id: ResourceId,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSingleStageDeploymentDetails {
    #[serde(flatten)]
    pub common: CreateDeploymentCommon,
    pub deploy_stage_id: ResourceId,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSingleStageRedeploymentDetails {
    #[serde(flatten)]
    pub common: CreateDeploymentCommon,
    pub previous_deployment_id: ResourceId,
    pub deploy_stage_id: ResourceId,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnrecognizedCreateDeploymentDetails {
    pub deployment_type: DeploymentType,
    #[serde(flatten)]
    pub common: CreateDeploymentCommon,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CreateDeploymentDetails {
    Pipeline(CreatePipelineDeploymentDetails),
    PipelineRedeployment(CreatePipelineRedeploymentDetails),
    SingleStage(CreateSingleStageDeploymentDetails),
    SingleStageRedeployment(CreateSingleStageRedeploymentDetails),
    Other(UnrecognizedCreateDeploymentDetails),
}

impl CreateDeploymentDetails {
    pub fn registry() -> &'static Registry<CreateDeploymentDetails> {
        &CREATE_DEPLOYMENT_REGISTRY
    }

    /// Deploy the whole pipeline.
    pub fn pipeline(deploy_pipeline_id: ResourceId) -> Self {
        Self::Pipeline(CreatePipelineDeploymentDetails {
            common: CreateDeploymentCommon::new(deploy_pipeline_id),
        })
    }

    /// Deploy a single stage of the pipeline.
    pub fn single_stage(deploy_pipeline_id: ResourceId, deploy_stage_id: ResourceId) -> Self {
        Self::SingleStage(CreateSingleStageDeploymentDetails {
            common: CreateDeploymentCommon::new(deploy_pipeline_id),
            deploy_stage_id,
        })
    }

    /// Re-run a previous deployment.
    pub fn redeploy(deploy_pipeline_id: ResourceId, previous_deployment_id: ResourceId) -> Self {
        Self::PipelineRedeployment(CreatePipelineRedeploymentDetails {
            common: CreateDeploymentCommon::new(deploy_pipeline_id),
            previous_deployment_id,
        })
    }

    pub fn deployment_type(&self) -> DeploymentType {
        match self {
            Self::Pipeline(_) => DeploymentType::PipelineDeployment,
            Self::PipelineRedeployment(_) => DeploymentType::PipelineRedeployment,
            Self::SingleStage(_) => DeploymentType::SingleStageDeployment,
            Self::SingleStageRedeployment(_) => DeploymentType::SingleStageRedeployment,
            Self::Other(details) => details.deployment_type.clone(),
        }
    }

    pub fn common_mut(&mut self) -> &mut CreateDeploymentCommon {
        match self {
            Self::Pipeline(d) => &mut d.common,
            Self::PipelineRedeployment(d) => &mut d.common,
            Self::SingleStage(d) => &mut d.common,
            Self::SingleStageRedeployment(d) => &mut d.common,
            Self::Other(d) => &mut d.common,
        }
    }
}

impl Model for CreateDeploymentDetails {
    fn schema() -> &'static ModelSchema {
        create_base_schema()
    }

    fn from_value(value: Value) -> Result<Self> {
        CREATE_DEPLOYMENT_REGISTRY.decode(value)
    }

    fn to_value(&self) -> Result<Value> {
        let tag = self.deployment_type();
        match self {
            Self::Pipeline(d) => CREATE_DEPLOYMENT_REGISTRY.encode(tag.as_str(), d),
            Self::PipelineRedeployment(d) => CREATE_DEPLOYMENT_REGISTRY.encode(tag.as_str(), d),
            Self::SingleStage(d) => CREATE_DEPLOYMENT_REGISTRY.encode(tag.as_str(), d),
            Self::SingleStageRedeployment(d) => {
                CREATE_DEPLOYMENT_REGISTRY.encode(tag.as_str(), d)
            }
            Self::Other(d) => CREATE_DEPLOYMENT_REGISTRY.encode(tag.as_str(), d),
        }
    }
}

polymorphic_serde!(CreateDeploymentDetails);

fn create_base_schema() -> &'static ModelSchema {
    static SCHEMA: ModelSchema = ModelSchema {
        name: "CreateDeploymentDetails",
        parent: None,
        fields: &[
            FieldSpec::required("deployment_type", "deploymentType", FieldKind::Enum),
            FieldSpec::required("deploy_pipeline_id", "deployPipelineId", FieldKind::String),
            FieldSpec::optional("display_name", "displayName", FieldKind::String),
            FieldSpec::optional(
                "deployment_arguments",
                "deploymentArguments",
                FieldKind::Object(DeploymentArgumentCollection::schema),
            ),
            FieldSpec::optional("freeform_tags", "freeformTags", FREEFORM_TAGS),
            FieldSpec::optional("defined_tags", "definedTags", DEFINED_TAGS),
        ],
    };
    &SCHEMA
}

fn create_pipeline_schema() -> &'static ModelSchema {
    static SCHEMA: ModelSchema = ModelSchema {
        name: "CreateDeployPipelineDeploymentDetails",
        parent: Some(create_base_schema),
        fields: &[],
    };
    &SCHEMA
}

fn create_pipeline_redeployment_schema() -> &'static ModelSchema {
    static SCHEMA: ModelSchema = ModelSchema {
        name: "CreateDeployPipelineRedeploymentDetails",
        parent: Some(create_base_schema),
        fields: &[FieldSpec::required(
            "previous_deployment_id",
            "previousDeploymentId",
            FieldKind::String,
        )],
    };
    &SCHEMA
}

fn create_single_stage_schema() -> &'static ModelSchema {
    static SCHEMA: ModelSchema = ModelSchema {
        name: "CreateSingleDeployStageDeploymentDetails",
        parent: Some(create_base_schema),
        fields: &[FieldSpec::required("deploy_stage_id", "deployStageId", FieldKind::String)],
    };
    &SCHEMA
}

fn create_single_stage_redeployment_schema() -> &'static ModelSchema {
    static SCHEMA: ModelSchema = ModelSchema {
        name: "CreateSingleDeployStageRedeploymentDetails",
        parent: Some(create_base_schema),
        fields: &[
            FieldSpec::required("previous_deployment_id", "previousDeploymentId", FieldKind::String),
            FieldSpec::required("deploy_stage_id", "deployStageId", FieldKind::String),
        ],
    };
    &SCHEMA
}

fn build_create_pipeline(value: Value) -> Result<CreateDeploymentDetails> {
    Ok(CreateDeploymentDetails::Pipeline(serde_json::from_value(value)?))
}

fn build_create_pipeline_redeployment(value: Value) -> Result<CreateDeploymentDetails> {
    Ok(CreateDeploymentDetails::PipelineRedeployment(
        serde_json::from_value(value)?,
    ))
}

fn build_create_single_stage(value: Value) -> Result<CreateDeploymentDetails> {
    Ok(CreateDeploymentDetails::SingleStage(serde_json::from_value(value)?))
}

fn build_create_single_stage_redeployment(value: Value) -> Result<CreateDeploymentDetails> {
    Ok(CreateDeploymentDetails::SingleStageRedeployment(
        serde_json::from_value(value)?,
    ))
}

fn build_create_other(value: Value) -> Result<CreateDeploymentDetails> {
    Ok(CreateDeploymentDetails::Other(serde_json::from_value(value)?))
}

static CREATE_DEPLOYMENT_REGISTRY: Registry<CreateDeploymentDetails> = Registry {
    family: "CreateDeploymentDetails",
    discriminator: "deployment_type",
    discriminator_wire: "deploymentType",
    fallback: Variant {
        tag: "",
        schema: create_base_schema,
        build: build_create_other,
    },
    variants: &[
        Variant {
            tag: "PIPELINE_DEPLOYMENT",
            schema: create_pipeline_schema,
            build: build_create_pipeline,
        },
        Variant {
            tag: "PIPELINE_REDEPLOYMENT",
            schema: create_pipeline_redeployment_schema,
            build: build_create_pipeline_redeployment,
        },
        Variant {
            tag: "SINGLE_STAGE_DEPLOYMENT",
            schema: create_single_stage_schema,
            build: build_create_single_stage,
        },
        Variant {
            tag: "SINGLE_STAGE_REDEPLOYMENT",
            schema: create_single_stage_redeployment_schema,
            build: build_create_single_stage_redeployment,
        },
    ],
};

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_each_deployment_type_resolves() {
        let expected = [
            ("PIPELINE_DEPLOYMENT", "DeployPipelineDeployment"),
            ("PIPELINE_REDEPLOYMENT", "DeployPipelineRedeployment"),
            ("SINGLE_STAGE_DEPLOYMENT", "SingleDeployStageDeployment"),
            ("SINGLE_STAGE_REDEPLOYMENT", "SingleDeployStageRedeployment"),
            ("CANARY_DEPLOYMENT", "Deployment"),
        ];
        for (tag, name) in expected {
            let payload = json!({"deploymentType": tag});
            assert_eq!(
                Deployment::registry()
                    .type_name(payload.as_object().unwrap())
                    .unwrap(),
                name
            );
        }
    }

    #[test]
    fn test_decode_single_stage_deployment() {
        let payload = json!({
            "deploymentType": "SINGLE_STAGE_DEPLOYMENT",
            "id": "d1",
            "deployPipelineId": "dp1",
            "deployStageId": "ds1",
            "lifecycleState": "IN_PROGRESS",
            "deploymentArguments": {"items": [{"name": "IMAGE_TAG", "value": "1.4.2"}]}
        });
        let deployment = Deployment::from_value(payload.clone()).unwrap();
        assert_eq!(
            deployment.deployment_type(),
            DeploymentType::SingleStageDeployment
        );
        assert_eq!(deployment.lifecycle_state(), Some("IN_PROGRESS"));
        let Deployment::SingleStage(single) = &deployment else {
            panic!("expected single stage deployment");
        };
        assert_eq!(single.deploy_stage_id.as_str(), "ds1");
        assert_eq!(deployment.to_value().unwrap(), payload);
    }

    #[test]
    fn test_unknown_lifecycle_and_type() {
        let deployment = Deployment::from_value(json!({
            "deploymentType": "CANARY_DEPLOYMENT",
            "id": "d2",
            "deployPipelineId": "dp1",
            "lifecycleState": "PAUSED"
        }))
        .unwrap();
        assert_eq!(deployment.lifecycle_state(), Some("PAUSED"));
        assert!(deployment.deployment_type().is_unknown());
        assert_eq!(deployment.id().as_str(), "d2");
    }

    #[test]
    fn test_create_details_encode_with_tag() {
        let mut details = CreateDeploymentDetails::single_stage(
            ResourceId::new("dp1").unwrap(),
            ResourceId::new("ds1").unwrap(),
        );
        details.common_mut().deployment_arguments = Some(DeploymentArgumentCollection::from_pairs([
            ("IMAGE_TAG", "1.4.2"),
        ]));

        let value = details.to_value().unwrap();
        assert_eq!(
            value,
            json!({
                "deploymentType": "SINGLE_STAGE_DEPLOYMENT",
                "deployPipelineId": "dp1",
                "deployStageId": "ds1",
                "deploymentArguments": {"items": [{"name": "IMAGE_TAG", "value": "1.4.2"}]}
            })
        );
        assert_eq!(CreateDeploymentDetails::from_value(value).unwrap(), details);
    }

    #[test]
    fn test_redeploy_requires_previous_deployment() {
        let err = CreateDeploymentDetails::from_value(json!({
            "deployment_type": "PIPELINE_REDEPLOYMENT",
            "deploy_pipeline_id": "dp1"
        }))
        .unwrap_err();
        assert!(matches!(
            err,
            crate::Error::MissingField {
                field: "previous_deployment_id",
                ..
            }
        ));
    }
}
