use reqwest::{Client, Method, StatusCode, Url};
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, info, warn};

use super::query::{join_facts, ListAgentsQuery, ListJobsQuery, Parameters};
use super::request::{send, ApiRequest, ApiResponse, RequestError};
use crate::config::ClientConfig;
use crate::constants::http::{API_BASE_PATH, DEFAULT_TIMEOUT};
use crate::constants::resources::{AGENTS, FACTS, JOBS, LOG, TAGS};
use crate::errors::{ApiError, ArcError};
use crate::models::{Agent, Agents, Facts, Job, JobRequest, Jobs, Tags};

/// Client for the Arc fleet API.
///
/// Every operation comes in two forms:
///
/// - the plain form (`list_agents`, `find_job`, ...) never fails; it logs the
///   problem with `warn!` and returns an empty value (`Agents::default()`, `None`,
///   `false` or `""`). The warning goes through `tracing` only and is visible
///   once the application installs a subscriber, as the `arc` binary does on stderr
/// - the `try_` form validates its required arguments before sending anything
///   and returns a structured [`ApiError`] on any failure
///
/// Each call is a single request bounded by the client timeout. Nothing is retried.
#[derive(Debug, Clone)]
pub struct ArcClient {
    api_server_url: Url,
    timeout: Duration,
    http: Client,
}

#[derive(Debug, Deserialize)]
struct JobCreated {
    request_id: String,
}

impl ArcClient {
    /// Client for the server at `api_server_url` with the default 10 second timeout.
    /// Only the scheme, host and port of the URL are used.
    pub fn new(api_server_url: &str) -> Result<Self, ArcError> {
        Self::with_timeout(api_server_url, None)
    }

    /// `None` falls back to the default timeout
    pub fn with_timeout(api_server_url: &str, timeout: Option<Duration>) -> Result<Self, ArcError> {
        let api_server_url = api_base_url(api_server_url)?;
        let timeout = timeout.unwrap_or(DEFAULT_TIMEOUT);

        let http = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ArcError::ClientBuild {
                reason: e.to_string(),
            })?;

        debug!(
            "Arc client configured for {} (timeout {}s)",
            api_server_url,
            timeout.as_secs()
        );

        Ok(Self {
            api_server_url,
            timeout,
            http,
        })
    }

    pub fn from_config(config: &ClientConfig) -> Result<Self, ArcError> {
        Self::with_timeout(&config.api_server_url, config.timeout())
    }

    /// Versioned base URL, e.g. `https://arc-app/api/v1/`
    pub fn api_server_url(&self) -> &str {
        self.api_server_url.as_str()
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    // === Agents ===

    pub async fn list_agents(&self, token: &str, query: &ListAgentsQuery) -> Agents {
        lenient("listing agents", self.get_all_agents(token, query).await).unwrap_or_default()
    }

    pub async fn try_list_agents(
        &self,
        token: &str,
        query: &ListAgentsQuery,
    ) -> Result<Agents, ApiError> {
        self.get_all_agents(token, query).await.map_err(|e| {
            e.into_api_error(
                Parameters::new(token)
                    .with("filter", &query.filter)
                    .with("show_facts", &query.show_facts)
                    .with("page", query.page)
                    .with("per_page", query.per_page)
                    .into_value(),
            )
        })
    }

    pub async fn find_agent(&self, token: &str, agent_id: &str, show_facts: &[String]) -> Option<Agent> {
        lenient("finding an agent", self.get_agent(token, agent_id, show_facts).await)
    }

    pub async fn try_find_agent(
        &self,
        token: &str,
        agent_id: &str,
        show_facts: &[String],
    ) -> Result<Agent, ApiError> {
        self.get_agent(token, agent_id, show_facts).await.map_err(|e| {
            e.into_api_error(
                Parameters::new(token)
                    .with("agent_id", agent_id)
                    .with("show_facts", show_facts)
                    .into_value(),
            )
        })
    }

    pub async fn show_agent_facts(&self, token: &str, agent_id: &str) -> Option<Facts> {
        lenient("listing agent facts", self.get_all_facts(token, agent_id).await)
    }

    pub async fn try_show_agent_facts(&self, token: &str, agent_id: &str) -> Result<Facts, ApiError> {
        self.get_all_facts(token, agent_id)
            .await
            .map_err(|e| e.into_api_error(agent_parameters(token, agent_id)))
    }

    /// `true` only when the server answered 200
    pub async fn delete_agent(&self, token: &str, agent_id: &str) -> bool {
        lenient("deleting an agent", self.remove_agent(token, agent_id).await).unwrap_or(false)
    }

    pub async fn try_delete_agent(&self, token: &str, agent_id: &str) -> Result<bool, ApiError> {
        self.remove_agent(token, agent_id)
            .await
            .map_err(|e| e.into_api_error(agent_parameters(token, agent_id)))
    }

    // === Tags ===

    pub async fn show_agent_tags(&self, token: &str, agent_id: &str) -> Option<Tags> {
        lenient("showing agent tags", self.show_tags_from_agent(token, agent_id).await)
    }

    pub async fn try_show_agent_tags(&self, token: &str, agent_id: &str) -> Result<Tags, ApiError> {
        self.show_tags_from_agent(token, agent_id)
            .await
            .map_err(|e| e.into_api_error(agent_parameters(token, agent_id)))
    }

    pub async fn add_agent_tags(&self, token: &str, agent_id: &str, tags: &Tags) -> bool {
        lenient("adding agent tags", self.add_tags_to_agent(token, agent_id, tags).await).is_some()
    }

    pub async fn try_add_agent_tags(
        &self,
        token: &str,
        agent_id: &str,
        tags: &Tags,
    ) -> Result<(), ApiError> {
        self.add_tags_to_agent(token, agent_id, tags).await.map_err(|e| {
            e.into_api_error(
                Parameters::new(token)
                    .with("agent_id", agent_id)
                    .with("tags", tags)
                    .into_value(),
            )
        })
    }

    pub async fn delete_agent_tag(&self, token: &str, agent_id: &str, key: &str) -> bool {
        lenient("deleting an agent tag", self.remove_tag_from_agent(token, agent_id, key).await).is_some()
    }

    pub async fn try_delete_agent_tag(
        &self,
        token: &str,
        agent_id: &str,
        key: &str,
    ) -> Result<(), ApiError> {
        self.remove_tag_from_agent(token, agent_id, key).await.map_err(|e| {
            e.into_api_error(
                Parameters::new(token)
                    .with("agent_id", agent_id)
                    .with("key", key)
                    .into_value(),
            )
        })
    }

    // === Jobs ===

    pub async fn list_jobs(&self, token: &str, query: &ListJobsQuery) -> Jobs {
        lenient("listing jobs", self.get_all_jobs(token, query).await).unwrap_or_default()
    }

    pub async fn try_list_jobs(&self, token: &str, query: &ListJobsQuery) -> Result<Jobs, ApiError> {
        self.get_all_jobs(token, query).await.map_err(|e| {
            e.into_api_error(
                Parameters::new(token)
                    .with("filter_by_agent_id", &query.agent_id)
                    .with("page", query.page)
                    .with("per_page", query.per_page)
                    .into_value(),
            )
        })
    }

    pub async fn find_job(&self, token: &str, job_id: &str) -> Option<Job> {
        lenient("finding a job", self.get_job(token, job_id).await)
    }

    pub async fn try_find_job(&self, token: &str, job_id: &str) -> Result<Job, ApiError> {
        self.get_job(token, job_id)
            .await
            .map_err(|e| e.into_api_error(job_parameters(token, job_id)))
    }

    /// Raw log text; empty on failure
    pub async fn find_job_log(&self, token: &str, job_id: &str) -> String {
        lenient("getting a job log", self.get_job_log(token, job_id).await).unwrap_or_default()
    }

    pub async fn try_find_job_log(&self, token: &str, job_id: &str) -> Result<String, ApiError> {
        self.get_job_log(token, job_id)
            .await
            .map_err(|e| e.into_api_error(job_parameters(token, job_id)))
    }

    /// Request id of the scheduled job; empty on failure
    pub async fn execute_job(&self, token: &str, request: &JobRequest) -> String {
        lenient("executing a job", self.run_job(token, request).await).unwrap_or_default()
    }

    pub async fn try_execute_job(&self, token: &str, request: &JobRequest) -> Result<String, ApiError> {
        self.run_job(token, request).await.map_err(|e| {
            e.into_api_error(Parameters::new(token).with("options", request).into_value())
        })
    }

    // === Requests ===

    async fn get_all_agents(&self, token: &str, query: &ListAgentsQuery) -> Result<Agents, RequestError> {
        require("token", token)?;

        let request = ApiRequest::new(Method::GET, self.endpoint(&[AGENTS]))
            .query("q", &query.filter)
            .query("page", &query.page.to_string())
            .query("per_page", &query.per_page.to_string())
            .query("facts", &join_facts(&query.show_facts));

        let response = self.send(token, request).await?;
        let agents: Vec<Agent> = response.decode()?;
        Ok(Agents::new(agents, response.pagination()))
    }

    async fn get_agent(&self, token: &str, agent_id: &str, show_facts: &[String]) -> Result<Agent, RequestError> {
        require("token", token)?;
        require_segment("agent_id", agent_id)?;

        let request = ApiRequest::new(Method::GET, self.endpoint(&[AGENTS, agent_id]))
            .query("facts", &join_facts(show_facts));

        self.send(token, request).await?.decode()
    }

    async fn get_all_facts(&self, token: &str, agent_id: &str) -> Result<Facts, RequestError> {
        require("token", token)?;
        require_segment("agent_id", agent_id)?;

        let request = ApiRequest::new(Method::GET, self.endpoint(&[AGENTS, agent_id, FACTS]));
        self.send(token, request).await?.decode()
    }

    async fn remove_agent(&self, token: &str, agent_id: &str) -> Result<bool, RequestError> {
        require("token", token)?;
        require_segment("agent_id", agent_id)?;

        let request = ApiRequest::new(Method::DELETE, self.endpoint(&[AGENTS, agent_id]));
        let response = self.send(token, request).await?;
        Ok(response.status() == StatusCode::OK)
    }

    async fn show_tags_from_agent(&self, token: &str, agent_id: &str) -> Result<Tags, RequestError> {
        require("token", token)?;
        require_segment("agent_id", agent_id)?;

        let request = ApiRequest::new(Method::GET, self.endpoint(&[AGENTS, agent_id, TAGS]));
        self.send(token, request).await?.decode()
    }

    async fn add_tags_to_agent(&self, token: &str, agent_id: &str, tags: &Tags) -> Result<(), RequestError> {
        require("token", token)?;
        require_segment("agent_id", agent_id)?;

        let pairs = tags
            .pairs()
            .into_iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        let request = ApiRequest::new(Method::POST, self.endpoint(&[AGENTS, agent_id, TAGS])).form(pairs);
        self.send(token, request).await?;
        info!("Added {} tag(s) to agent {}", tags.len(), agent_id);
        Ok(())
    }

    async fn remove_tag_from_agent(&self, token: &str, agent_id: &str, key: &str) -> Result<(), RequestError> {
        require("token", token)?;
        require_segment("agent_id", agent_id)?;
        require_segment("key", key)?;

        let request = ApiRequest::new(Method::DELETE, self.endpoint(&[AGENTS, agent_id, TAGS, key]));
        self.send(token, request).await?;
        info!("Removed tag {} from agent {}", key, agent_id);
        Ok(())
    }

    async fn get_all_jobs(&self, token: &str, query: &ListJobsQuery) -> Result<Jobs, RequestError> {
        require("token", token)?;

        let request = ApiRequest::new(Method::GET, self.endpoint(&[JOBS]))
            .query("page", &query.page.to_string())
            .query("per_page", &query.per_page.to_string())
            .query("agent_id", &query.agent_id);

        let response = self.send(token, request).await?;
        let jobs: Vec<Job> = response.decode()?;
        Ok(Jobs::new(jobs, response.pagination()))
    }

    async fn get_job(&self, token: &str, job_id: &str) -> Result<Job, RequestError> {
        require("token", token)?;
        require_segment("job_id", job_id)?;

        let request = ApiRequest::new(Method::GET, self.endpoint(&[JOBS, job_id]));
        self.send(token, request).await?.decode()
    }

    async fn get_job_log(&self, token: &str, job_id: &str) -> Result<String, RequestError> {
        require("token", token)?;
        require_segment("job_id", job_id)?;

        let request = ApiRequest::new(Method::GET, self.endpoint(&[JOBS, job_id, LOG]));
        Ok(self.send(token, request).await?.into_text())
    }

    async fn run_job(&self, token: &str, job: &JobRequest) -> Result<String, RequestError> {
        require("token", token)?;

        let body = serde_json::to_value(job).map_err(|e| RequestError::encode(e.to_string()))?;
        let request = ApiRequest::new(Method::POST, self.endpoint(&[JOBS])).json(body);

        let created: JobCreated = self.send(token, request).await?.decode()?;
        info!("Job {} scheduled on agent {}", created.request_id, job.to);
        Ok(created.request_id)
    }

    async fn send(&self, token: &str, request: ApiRequest) -> Result<ApiResponse, RequestError> {
        send(&self.http, token, request).await
    }

    /// Base URL extended by percent-encoded path segments
    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.api_server_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }
}

/// Run the safe form of an operation: log the failure and hand back nothing
fn lenient<T>(operation: &str, result: Result<T, RequestError>) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(e) if e.pointer().is_empty() => {
            warn!("Caught error {}: {}", operation, e);
            None
        }
        Err(e) => {
            warn!("Caught error {} ({}): {}", operation, e.pointer(), e);
            None
        }
    }
}

fn require(field: &'static str, value: &str) -> Result<(), RequestError> {
    if value.trim().is_empty() {
        return Err(RequestError::missing(field));
    }
    Ok(())
}

/// Like `require`, for values that become a URL path segment. `.` and `..`
/// would be dropped from the path and address the parent collection instead.
fn require_segment(field: &'static str, value: &str) -> Result<(), RequestError> {
    require(field, value)?;
    if matches!(value, "." | "..") {
        return Err(RequestError::invalid_segment(field, value));
    }
    Ok(())
}

fn agent_parameters(token: &str, agent_id: &str) -> serde_json::Value {
    Parameters::new(token).with("agent_id", agent_id).into_value()
}

fn job_parameters(token: &str, job_id: &str) -> serde_json::Value {
    Parameters::new(token).with("job_id", job_id).into_value()
}

fn api_base_url(raw: &str) -> Result<Url, ArcError> {
    let invalid = |reason: String| ArcError::InvalidArgument {
        field: "api_server_url".to_string(),
        reason,
    };

    let url = Url::parse(raw).map_err(|e| invalid(format!("'{}' is not a valid URL: {}", raw, e)))?;

    if !matches!(url.scheme(), "http" | "https") || url.host_str().is_none() {
        return Err(invalid(format!("'{}' is not an HTTP(S) URL", raw)));
    }

    url.join(API_BASE_PATH).map_err(|e| invalid(e.to_string()))
}
