//! Resource identifiers.

use derive_more::Display;
use serde::{Deserialize, Serialize};

use crate::Error;

/// Identifier of a resource managed by the service (project, repository,
/// pipeline, deployment, work request, ...).
///
/// Identifiers are opaque to the client. The only constraint checked locally is
/// that they are non-empty and contain no whitespace, since they are used as
/// URL path segments.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Display)]
#[serde(transparent)]
#[display("{_0}")]
pub struct ResourceId(String);

impl ResourceId {
    /// Create a validated ResourceId.
    pub fn new(value: impl Into<String>) -> Result<Self, Error> {
        let value = value.into();
        if value.is_empty() {
            return Err(Error::InvalidInput("resource id must not be empty".to_string()));
        }
        if value.chars().any(char::is_whitespace) {
            return Err(Error::InvalidInput(format!(
                "resource id contains whitespace: {:?}",
                value
            )));
        }
        Ok(Self(value))
    }

    /// Get the identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for ResourceId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<ResourceId> for String {
    fn from(id: ResourceId) -> Self {
        id.0
    }
}

impl std::str::FromStr for ResourceId {
    type Err = Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Self::new(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid_id() {
        let id: ResourceId = "ocid1.devopsproject.oc1..aaaa".parse().unwrap();
        assert_eq!(id.as_str(), "ocid1.devopsproject.oc1..aaaa");
        assert_eq!(id.to_string(), "ocid1.devopsproject.oc1..aaaa");
    }

    #[test]
    fn test_reject_empty_and_whitespace() {
        assert!(ResourceId::new("").is_err());
        assert!(ResourceId::new("ocid1 x").is_err());
    }

    #[test]
    fn test_serde_is_transparent() {
        let id = ResourceId::new("abc").unwrap();
        assert_eq!(serde_json::to_value(&id).unwrap(), serde_json::json!("abc"));
        let back: ResourceId = serde_json::from_value(serde_json::json!("abc")).unwrap();
        assert_eq!(back, id);
    }
}
