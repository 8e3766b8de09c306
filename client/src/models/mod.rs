//! Value objects decoded from Arc API responses
//!
//! Every field is optional: a value is present only if the server sent it.
//! Entities keep unknown fields in an `extra` map so nothing the server
//! reports is dropped on the way through.

pub mod agent;
pub mod fact;
pub mod job;
pub mod pagination;
pub mod tag;
pub mod user;

pub use agent::{Agent, Agents};
pub use fact::Facts;
pub use job::{Job, JobRequest, JobState, Jobs};
pub use pagination::Pagination;
pub use tag::{Tag, Tags};
pub use user::User;
