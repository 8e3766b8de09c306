pub mod config;
pub mod constants;
pub mod errors;
pub mod http;
pub mod models;

// Re-export commonly used types
pub use config::{ClientConfig, ConfigManager, PartialConfig};
pub use errors::{ApiError, ArcError, ConfigError};
pub use http::{ArcClient, ListAgentsQuery, ListJobsQuery};
pub use models::{Agent, Agents, Facts, Job, JobRequest, JobState, Jobs, Pagination, Tag, Tags, User};
