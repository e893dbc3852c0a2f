//! Code repositories hosted in (or mirrored into) a project.

use serde::{Deserialize, Serialize};

use super::{DEFINED_TAGS, DefinedTags, FREEFORM_TAGS, FreeformTags};
use crate::model::{Lifecycle, Model};
use crate::schema::{FieldKind, FieldSpec, ModelSchema};
use crate::{ResourceId, Timestamp, wire_enum};

wire_enum! {
    pub enum RepositoryType {
        Mirrored => "MIRRORED",
        Hosted => "HOSTED",
        Forked => "FORKED",
    }
}

wire_enum! {
    pub enum RepositoryLifecycleState {
        Active => "ACTIVE",
        Creating => "CREATING",
        Deleting => "DELETING",
        Deleted => "DELETED",
        Failed => "FAILED",
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Repository {
    pub id: ResourceId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub compartment_id: ResourceId,
    pub project_id: ResourceId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ssh_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub http_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_branch: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repository_type: Option<RepositoryType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_created: Option<Timestamp>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_updated: Option<Timestamp>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lifecycle_state: Option<RepositoryLifecycleState>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lifecycle_details: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub branch_count: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub commit_count: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size_in_bytes: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub freeform_tags: Option<FreeformTags>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub defined_tags: Option<DefinedTags>,
}

impl Model for Repository {
    fn schema() -> &'static ModelSchema {
        static SCHEMA: ModelSchema = ModelSchema {
            name: "Repository",
            parent: None,
            fields: &[
                FieldSpec::required("id", "id", FieldKind::String),
                FieldSpec::optional("name", "name", FieldKind::String),
                FieldSpec::required("compartment_id", "compartmentId", FieldKind::String),
                FieldSpec::required("project_id", "projectId", FieldKind::String),
                FieldSpec::optional("namespace", "namespace", FieldKind::String),
                FieldSpec::optional("project_name", "projectName", FieldKind::String),
                FieldSpec::optional("ssh_url", "sshUrl", FieldKind::String),
                FieldSpec::optional("http_url", "httpUrl", FieldKind::String),
                FieldSpec::optional("description", "description", FieldKind::String),
                FieldSpec::optional("default_branch", "defaultBranch", FieldKind::String),
                FieldSpec::optional("repository_type", "repositoryType", FieldKind::Enum),
                FieldSpec::optional("time_created", "timeCreated", FieldKind::Timestamp),
                FieldSpec::optional("time_updated", "timeUpdated", FieldKind::Timestamp),
                FieldSpec::optional("lifecycle_state", "lifecycleState", FieldKind::Enum),
                FieldSpec::optional("lifecycle_details", "lifecycleDetails", FieldKind::String),
                FieldSpec::optional("branch_count", "branchCount", FieldKind::Integer),
                FieldSpec::optional("commit_count", "commitCount", FieldKind::Integer),
                FieldSpec::optional("size_in_bytes", "sizeInBytes", FieldKind::Integer),
                FieldSpec::optional("freeform_tags", "freeformTags", FREEFORM_TAGS),
                FieldSpec::optional("defined_tags", "definedTags", DEFINED_TAGS),
            ],
        };
        &SCHEMA
    }
}

impl Lifecycle for Repository {
    fn lifecycle_state(&self) -> Option<&str> {
        self.lifecycle_state
            .as_ref()
            .map(RepositoryLifecycleState::as_str)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateRepositoryDetails {
    pub name: String,
    pub project_id: ResourceId,
    pub repository_type: RepositoryType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_branch: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub freeform_tags: Option<FreeformTags>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub defined_tags: Option<DefinedTags>,
}

impl CreateRepositoryDetails {
    /// A hosted repository with no optional settings.
    pub fn hosted(name: impl Into<String>, project_id: ResourceId) -> Self {
        Self {
            name: name.into(),
            project_id,
            repository_type: RepositoryType::Hosted,
            default_branch: None,
            description: None,
            freeform_tags: None,
            defined_tags: None,
        }
    }
}

impl Model for CreateRepositoryDetails {
    fn schema() -> &'static ModelSchema {
        static SCHEMA: ModelSchema = ModelSchema {
            name: "CreateRepositoryDetails",
            parent: None,
            fields: &[
                FieldSpec::required("name", "name", FieldKind::String),
                FieldSpec::required("project_id", "projectId", FieldKind::String),
                FieldSpec::required("repository_type", "repositoryType", FieldKind::Enum),
                FieldSpec::optional("default_branch", "defaultBranch", FieldKind::String),
                FieldSpec::optional("description", "description", FieldKind::String),
                FieldSpec::optional("freeform_tags", "freeformTags", FREEFORM_TAGS),
                FieldSpec::optional("defined_tags", "definedTags", DEFINED_TAGS),
            ],
        };
        &SCHEMA
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateRepositoryDetails {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_branch: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub freeform_tags: Option<FreeformTags>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub defined_tags: Option<DefinedTags>,
}

impl Model for UpdateRepositoryDetails {
    fn schema() -> &'static ModelSchema {
        static SCHEMA: ModelSchema = ModelSchema {
            name: "UpdateRepositoryDetails",
            parent: None,
            fields: &[
                FieldSpec::optional("name", "name", FieldKind::String),
                FieldSpec::optional("description", "description", FieldKind::String),
                FieldSpec::optional("default_branch", "defaultBranch", FieldKind::String),
                FieldSpec::optional("freeform_tags", "freeformTags", FREEFORM_TAGS),
                FieldSpec::optional("defined_tags", "definedTags", DEFINED_TAGS),
            ],
        };
        &SCHEMA
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_decode_repository() {
        let repo = Repository::from_value(json!({
            "id": "r1",
            "name": "storefront-web",
            "compartmentId": "c1",
            "projectId": "p1",
            "sshUrl": "ssh://devops.example.com/storefront-web",
            "repositoryType": "HOSTED",
            "lifecycleState": "CREATING",
            "commitCount": 12
        }))
        .unwrap();

        assert_eq!(repo.repository_type, Some(RepositoryType::Hosted));
        assert_eq!(repo.lifecycle_state(), Some("CREATING"));
        assert_eq!(repo.commit_count, Some(12));
    }

    #[test]
    fn test_integer_fields_reject_strings() {
        let err = Repository::from_value(json!({
            "id": "r1",
            "compartmentId": "c1",
            "projectId": "p1",
            "commitCount": "12"
        }))
        .unwrap_err();
        assert!(matches!(
            err,
            crate::Error::InvalidField {
                field: "commit_count",
                ..
            }
        ));
    }

    #[test]
    fn test_create_details_require_type() {
        let err = CreateRepositoryDetails::from_value(json!({"name": "x", "projectId": "p1"}))
            .unwrap_err();
        assert!(matches!(
            err,
            crate::Error::MissingField {
                field: "repository_type",
                ..
            }
        ));

        let details = CreateRepositoryDetails::hosted("x", ResourceId::new("p1").unwrap());
        assert_eq!(
            details.to_value().unwrap(),
            json!({"name": "x", "projectId": "p1", "repositoryType": "HOSTED"})
        );
    }
}
