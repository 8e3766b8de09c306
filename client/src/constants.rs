//! Central repository for wire-level names and default values
//!
//! Organized by category so the transport, the models and the configuration
//! loader agree on header names, paths and timeouts.

use std::time::Duration;

/// HTTP client constants
pub mod http {
    use super::Duration;

    /// Default timeout for a single request to the Arc API
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

    /// Versioned base path every resource lives under
    pub const API_BASE_PATH: &str = "/api/v1/";

    /// Header carrying the authentication token
    pub const AUTH_TOKEN_HEADER: &str = "x-auth-token";

    /// Response header with the total number of pages
    pub const PAGINATION_PAGES_HEADER: &str = "pagination-pages";

    /// Response header with the total number of elements
    pub const PAGINATION_ELEMENTS_HEADER: &str = "pagination-elements";
}

/// Resource path segments below the base path
pub mod resources {
    pub const AGENTS: &str = "agents";
    pub const FACTS: &str = "facts";
    pub const TAGS: &str = "tags";
    pub const JOBS: &str = "jobs";
    pub const LOG: &str = "log";
}

/// Job status spellings reported by the server
pub mod job_status {
    /// Every spelling the server uses for a finished job
    pub const COMPLETED: &[&str] = &["complete", "completed"];

    pub const FAILED: &str = "failed";
}

/// Synthetic error values used when the server did not supply an error body
pub mod api_error {
    /// Status used when no HTTP status is available
    pub const GENERIC_STATUS: &str = "API Error";

    /// Length of the generated correlation id
    pub const ID_LEN: usize = 8;

    /// Replacement for the auth token in echoed request parameters
    pub const MASKED_TOKEN: &str = "***";
}

/// Environment variables that override file configuration
pub mod env {
    pub const API_SERVER_URL: &str = "ARC_API_SERVER_URL";
    pub const AUTH_TOKEN: &str = "ARC_AUTH_TOKEN";
    pub const TIMEOUT_SECONDS: &str = "ARC_TIMEOUT_SECONDS";
}
