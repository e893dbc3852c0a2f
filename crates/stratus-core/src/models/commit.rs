//! Commits and diffs of a repository.

use serde::{Deserialize, Serialize};

use super::{FREEFORM_TAGS, FreeformTags};
use crate::model::Model;
use crate::schema::{FieldKind, FieldSpec, ModelSchema};
use crate::{Timestamp, wire_enum};

wire_enum! {
    pub enum DiffSectionType {
        Added => "ADDED",
        Removed => "REMOVED",
        Context => "CONTEXT",
        Conflict => "CONFLICT",
    }
}

wire_enum! {
    /// Which side of a merge conflict a line belongs to.
    pub enum ConflictMarker {
        Base => "BASE",
        Target => "TARGET",
        Source => "SOURCE",
    }
}

/// A single commit.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RepositoryCommit {
    pub commit_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub commit_message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author_email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub committer_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub committer_email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_commit_ids: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_created: Option<Timestamp>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tree_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub freeform_tags: Option<FreeformTags>,
}

impl RepositoryCommit {
    /// First line of the commit message.
    pub fn summary(&self) -> Option<&str> {
        self.commit_message
            .as_deref()
            .and_then(|message| message.lines().next())
    }

    pub fn is_merge(&self) -> bool {
        self.parent_commit_ids
            .as_ref()
            .is_some_and(|parents| parents.len() > 1)
    }
}

impl Model for RepositoryCommit {
    fn schema() -> &'static ModelSchema {
        static SCHEMA: ModelSchema = ModelSchema {
            name: "RepositoryCommit",
            parent: None,
            fields: &[
                FieldSpec::required("commit_id", "commitId", FieldKind::String),
                FieldSpec::optional("commit_message", "commitMessage", FieldKind::String),
                FieldSpec::optional("author_name", "authorName", FieldKind::String),
                FieldSpec::optional("author_email", "authorEmail", FieldKind::String),
                FieldSpec::optional("committer_name", "committerName", FieldKind::String),
                FieldSpec::optional("committer_email", "committerEmail", FieldKind::String),
                FieldSpec::optional(
                    "parent_commit_ids",
                    "parentCommitIds",
                    FieldKind::List(&FieldKind::String),
                ),
                FieldSpec::optional("time_created", "timeCreated", FieldKind::Timestamp),
                FieldSpec::optional("tree_id", "treeId", FieldKind::String),
                FieldSpec::optional("freeform_tags", "freeformTags", FREEFORM_TAGS),
            ],
        };
        &SCHEMA
    }
}

/// One line of a diff section.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiffLineDetails {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub old_line: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub new_line: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub conflict_marker: Option<ConflictMarker>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line: Option<String>,
}

impl Model for DiffLineDetails {
    fn schema() -> &'static ModelSchema {
        static SCHEMA: ModelSchema = ModelSchema {
            name: "DiffLineDetails",
            parent: None,
            fields: &[
                FieldSpec::optional("old_line", "oldLine", FieldKind::Integer),
                FieldSpec::optional("new_line", "newLine", FieldKind::Integer),
                FieldSpec::optional("conflict_marker", "conflictMarker", FieldKind::Enum),
                FieldSpec::optional("line", "line", FieldKind::String),
            ],
        };
        &SCHEMA
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiffSection {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub r#type: Option<DiffSectionType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lines: Option<Vec<DiffLineDetails>>,
}

impl Model for DiffSection {
    fn schema() -> &'static ModelSchema {
        static SCHEMA: ModelSchema = ModelSchema {
            name: "DiffSection",
            parent: None,
            fields: &[
                FieldSpec::optional("type", "type", FieldKind::Enum),
                FieldSpec::optional(
                    "lines",
                    "lines",
                    FieldKind::List(&FieldKind::Object(DiffLineDetails::schema)),
                ),
            ],
        };
        &SCHEMA
    }
}

/// A contiguous hunk of a file diff.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiffChunk {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub old_line: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub old_span: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub new_line: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub new_span: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub diff_sections: Option<Vec<DiffSection>>,
}

impl Model for DiffChunk {
    fn schema() -> &'static ModelSchema {
        static SCHEMA: ModelSchema = ModelSchema {
            name: "DiffChunk",
            parent: None,
            fields: &[
                FieldSpec::optional("old_line", "oldLine", FieldKind::Integer),
                FieldSpec::optional("old_span", "oldSpan", FieldKind::Integer),
                FieldSpec::optional("new_line", "newLine", FieldKind::Integer),
                FieldSpec::optional("new_span", "newSpan", FieldKind::Integer),
                FieldSpec::optional(
                    "diff_sections",
                    "diffSections",
                    FieldKind::List(&FieldKind::Object(DiffSection::schema)),
                ),
            ],
        };
        &SCHEMA
    }
}

/// Diff of one file between two commits.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiffSummary {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub old_path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub new_path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub old_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub new_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub changes: Option<Vec<DiffChunk>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_binary: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub are_conflicts_in_file: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_large: Option<bool>,
}

impl DiffSummary {
    /// Number of added and removed lines across all chunks.
    pub fn line_counts(&self) -> (usize, usize) {
        let mut added = 0;
        let mut removed = 0;
        let sections = self
            .changes
            .iter()
            .flatten()
            .flat_map(|chunk| chunk.diff_sections.iter().flatten());
        for section in sections {
            let lines = section.lines.as_ref().map_or(0, Vec::len);
            match section.r#type {
                Some(DiffSectionType::Added) => added += lines,
                Some(DiffSectionType::Removed) => removed += lines,
                _ => {}
            }
        }
        (added, removed)
    }
}

impl Model for DiffSummary {
    fn schema() -> &'static ModelSchema {
        static SCHEMA: ModelSchema = ModelSchema {
            name: "DiffSummary",
            parent: None,
            fields: &[
                FieldSpec::optional("old_path", "oldPath", FieldKind::String),
                FieldSpec::optional("new_path", "newPath", FieldKind::String),
                FieldSpec::optional("old_id", "oldId", FieldKind::String),
                FieldSpec::optional("new_id", "newId", FieldKind::String),
                FieldSpec::optional(
                    "changes",
                    "changes",
                    FieldKind::List(&FieldKind::Object(DiffChunk::schema)),
                ),
                FieldSpec::optional("is_binary", "isBinary", FieldKind::Boolean),
                FieldSpec::optional("are_conflicts_in_file", "areConflictsInFile", FieldKind::Boolean),
                FieldSpec::optional("is_large", "isLarge", FieldKind::Boolean),
            ],
        };
        &SCHEMA
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiffCollection {
    pub items: Vec<DiffSummary>,
}

impl Model for DiffCollection {
    fn schema() -> &'static ModelSchema {
        static SCHEMA: ModelSchema = ModelSchema {
            name: "DiffCollection",
            parent: None,
            fields: &[FieldSpec::required(
                "items",
                "items",
                FieldKind::List(&FieldKind::Object(DiffSummary::schema)),
            )],
        };
        &SCHEMA
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn diff_json() -> serde_json::Value {
        json!({
            "oldPath": "src/main.rs",
            "newPath": "src/main.rs",
            "isBinary": false,
            "changes": [{
                "oldLine": 10,
                "oldSpan": 2,
                "newLine": 10,
                "newSpan": 3,
                "diffSections": [
                    {"type": "CONTEXT", "lines": [{"oldLine": 10, "newLine": 10, "line": "fn main() {"}]},
                    {"type": "REMOVED", "lines": [{"oldLine": 11, "line": "    old();"}]},
                    {"type": "ADDED", "lines": [
                        {"newLine": 11, "line": "    new();"},
                        {"newLine": 12, "line": "    more();"}
                    ]}
                ]
            }]
        })
    }

    #[test]
    fn test_nested_diff_round_trip() {
        let diff = DiffSummary::from_value(diff_json()).unwrap();
        assert_eq!(diff.line_counts(), (2, 1));
        assert_eq!(diff.to_value().unwrap(), diff_json());
    }

    #[test]
    fn test_nested_native_spelling() {
        let diff = DiffSummary::from_value(json!({
            "old_path": "a",
            "changes": [{"diff_sections": [{"type": "ADDED", "lines": [{"new_line": 1}]}]}]
        }))
        .unwrap();
        let changes = diff.changes.unwrap();
        let sections = changes[0].diff_sections.as_ref().unwrap();
        let section = &sections[0];
        assert_eq!(section.r#type, Some(DiffSectionType::Added));
        assert_eq!(section.lines.as_ref().unwrap()[0].new_line, Some(1));
    }

    #[test]
    fn test_commit_helpers() {
        let commit = RepositoryCommit::from_value(json!({
            "commitId": "abc123",
            "commitMessage": "Merge branch 'feature'\n\nDetails",
            "parentCommitIds": ["p1", "p2"]
        }))
        .unwrap();
        assert_eq!(commit.summary(), Some("Merge branch 'feature'"));
        assert!(commit.is_merge());
    }
}
