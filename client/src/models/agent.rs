use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

use super::{Facts, Pagination, Tags};

/// A managed endpoint registered with Arc
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Agent {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub agent_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub organization: Option<String>,
    /// Only the facts requested through `show_facts`, when any were
    #[serde(skip_serializing_if = "Option::is_none")]
    pub facts: Option<Facts>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Tags>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_with: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_by: Option<String>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

/// One page of agents
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Agents {
    pub data: Vec<Agent>,
    pub pagination: Option<Pagination>,
}

impl Agents {
    pub fn new(data: Vec<Agent>, pagination: Pagination) -> Self {
        Self {
            data,
            pagination: Some(pagination),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_known_and_unknown_fields() {
        let raw = r#"{
            "agent_id": "darwin",
            "project": "p-1",
            "organization": "o-1",
            "facts": {"hostname": "darwin", "memory_total": 16384},
            "tags": {"pool": "green"},
            "created_at": "2016-03-01T12:05:29.37214Z",
            "updated_with": "arc",
            "region": "eu-de-1"
        }"#;

        let agent: Agent = serde_json::from_str(raw).unwrap();

        assert_eq!(agent.agent_id.as_deref(), Some("darwin"));
        assert_eq!(agent.project.as_deref(), Some("p-1"));
        let facts = agent.facts.as_ref().unwrap();
        assert_eq!(facts.get_str("hostname"), Some("darwin"));
        assert_eq!(facts.get("memory_total"), Some(&Value::from(16384)));
        assert_eq!(agent.tags.as_ref().and_then(|t| t.get("pool")), Some("green"));
        assert!(agent.created_at.is_some());
        assert!(agent.updated_at.is_none());
        assert_eq!(agent.extra.get("region"), Some(&Value::from("eu-de-1")));
    }

    #[test]
    fn missing_facts_stay_absent() {
        let agent: Agent = serde_json::from_str(r#"{"agent_id": "a"}"#).unwrap();
        assert!(agent.facts.is_none());
        assert!(agent.tags.is_none());
        assert!(agent.extra.is_empty());
    }
}
