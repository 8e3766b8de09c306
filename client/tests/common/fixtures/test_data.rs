//! Common test data and constants

use serde_json::{json, Value};
use uuid::Uuid;

/// Token the mock server accepts
pub const TOKEN: &str = "valid-token";

/// Token the mock server rejects with 401
pub const BAD_TOKEN: &str = "expired-token";

/// Generate a random job request id for testing
pub fn random_job_id() -> String {
    Uuid::new_v4().to_string()
}

pub mod agents {
    pub const DARWIN: &str = "darwin";
    pub const LINUX: &str = "linux-01";
    pub const MISSING: &str = "does-not-exist";
}

pub fn agent_json(agent_id: &str) -> Value {
    json!({
        "agent_id": agent_id,
        "display_name": agent_id,
        "project": "p-test",
        "organization": "o-test",
        "created_at": "2016-03-01T12:05:29.37214Z",
        "updated_at": "2016-03-02T08:00:00Z",
        "updated_with": "1f3d",
        "updated_by": "darwin"
    })
}

pub fn agent_with_facts_json(agent_id: &str) -> Value {
    let mut agent = agent_json(agent_id);
    agent["facts"] = json!({"os": "darwin", "hostname": agent_id});
    agent
}

pub fn job_json(request_id: &str, status: &str) -> Value {
    json!({
        "version": 1,
        "sender": "windows",
        "request_id": request_id,
        "to": agents::DARWIN,
        "timeout": 60,
        "agent": "execute",
        "action": "script",
        "payload": "echo Script start",
        "status": status,
        "created_at": "2016-03-01T12:05:29.37214Z",
        "updated_at": "2016-03-01T12:05:30.1Z",
        "user": {
            "id": "u-1",
            "name": "arc_admin",
            "email": "admin@example.com",
            "domain_id": "d-1",
            "domain_name": "monsoon",
            "roles": ["admin"]
        }
    })
}

/// Error document in the shape the Arc server sends
pub fn error_document(status: &str, code: u16, title: &str, pointer: &str) -> Value {
    json!({
        "id": "83e940c4-7199-407f-8985-3cae72237ef1",
        "status": status,
        "code": code,
        "title": title,
        "detail": format!("{} (test fixture)", title),
        "source": {"pointer": pointer, "parameter": "map[]"}
    })
}
