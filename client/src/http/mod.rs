//! HTTP communication with the Arc API server
//!
//! # Architecture
//!
//! ```text
//! ArcClient::try_find_agent ─┐
//!                            ├─> ApiRequest ─> send() ─> ApiResponse ─> decode
//! ArcClient::find_agent ─────┘                  │
//!                                          RequestError
//!                                  ┌────────────┴────────────┐
//!                            warn! + sentinel          ApiError (strict)
//! ```
//!
//! Requests go to `<origin>/api/v1/<resource>` with the token in `X-Auth-Token`.
//! Listing totals come back in the `Pagination-Pages` and `Pagination-Elements` headers.

pub mod client;
pub mod query;
pub(crate) mod request;

pub use client::ArcClient;
pub use query::{ListAgentsQuery, ListJobsQuery};
