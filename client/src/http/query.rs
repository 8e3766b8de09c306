use serde::Serialize;
use serde_json::{Map, Value};

use crate::constants::api_error::MASKED_TOKEN;

/// Filters and paging for agent listings
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ListAgentsQuery {
    /// Server-side filter expression, e.g. `@os = 'darwin'`
    pub filter: String,
    /// Fact names to embed in every returned agent
    pub show_facts: Vec<String>,
    pub page: u32,
    pub per_page: u32,
}

impl ListAgentsQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn filter(mut self, filter: impl Into<String>) -> Self {
        self.filter = filter.into();
        self
    }

    pub fn show_facts<I, S>(mut self, facts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.show_facts = facts.into_iter().map(Into::into).collect();
        self
    }

    pub fn page(mut self, page: u32) -> Self {
        self.page = page;
        self
    }

    pub fn per_page(mut self, per_page: u32) -> Self {
        self.per_page = per_page;
        self
    }
}

/// Filters and paging for job listings
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ListJobsQuery {
    /// Only jobs targeting this agent; empty for all
    pub agent_id: String,
    pub page: u32,
    pub per_page: u32,
}

impl ListJobsQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn agent_id(mut self, agent_id: impl Into<String>) -> Self {
        self.agent_id = agent_id.into();
        self
    }

    pub fn page(mut self, page: u32) -> Self {
        self.page = page;
        self
    }

    pub fn per_page(mut self, per_page: u32) -> Self {
        self.per_page = per_page;
        self
    }
}

/// Comma-separated fact selection as the `facts` query parameter expects it
pub(crate) fn join_facts(facts: &[String]) -> String {
    facts.join(",")
}

/// Echo of a call's arguments for synthetic error documents.
/// The token is masked, but an empty one is kept empty so a missing token stays visible.
pub(crate) struct Parameters(Map<String, Value>);

impl Parameters {
    pub fn new(token: &str) -> Self {
        let shown = if token.is_empty() { "" } else { MASKED_TOKEN };
        let mut map = Map::new();
        map.insert("token".to_string(), Value::from(shown));
        Self(map)
    }

    pub fn with(mut self, key: &str, value: impl Serialize) -> Self {
        let value = serde_json::to_value(value).unwrap_or(Value::Null);
        self.0.insert(key.to_string(), value);
        self
    }

    pub fn into_value(self) -> Value {
        Value::Object(self.0)
    }
}
