//! Unit tests for the structured API error document

use arc_client::ApiError;

const UNAUTHORIZED: &str = r#"{"id":"83e940c4-7199-407f-8985-3cae72237ef1","status":"Unauthorized","code":401,"title":"Not authorized.","detail":"Authorization: Identity status invalid. Invalid is not Confirmed","source":{"pointer":"(GET) /api/v1/agents?q=&page=0&per_page=0&facts=","parameter":"map[]"}}"#;

#[test]
fn test_assigns_values_from_server_document() {
    let err = ApiError::from_json(UNAUTHORIZED);

    assert_eq!(err.json_data(), UNAUTHORIZED);
    assert_eq!(err.id(), Some("83e940c4-7199-407f-8985-3cae72237ef1"));
    assert_eq!(err.status(), Some("Unauthorized"));
    assert_eq!(err.code(), Some(401));
    assert_eq!(err.title(), Some("Not authorized."));
    assert_eq!(
        err.detail(),
        Some("Authorization: Identity status invalid. Invalid is not Confirmed")
    );
    assert_eq!(
        err.source(),
        "(GET) /api/v1/agents?q=&page=0&per_page=0&facts= - map[]"
    );
    assert_eq!(
        err.to_string(),
        "Not authorized. Authorization: Identity status invalid. Invalid is not Confirmed"
    );
}

#[test]
fn test_missing_fields_are_none() {
    let err = ApiError::from_json(r#"{"title":"Only a title"}"#);

    assert_eq!(err.id(), None);
    assert_eq!(err.code(), None);
    assert_eq!(err.detail(), None);
    assert_eq!(err.source(), " - ");
    assert_eq!(err.to_string(), "Only a title ");
}

#[test]
fn test_structured_parameter_is_rendered_as_json() {
    let err = ApiError::from_json(
        r#"{"source":{"pointer":"(DELETE) /api/v1/agents/darwin","parameter":{"agent_id":"darwin"}}}"#,
    );

    assert_eq!(
        err.source(),
        r#"(DELETE) /api/v1/agents/darwin - {"agent_id":"darwin"}"#
    );
}

#[test]
fn test_non_json_body_is_kept_verbatim() {
    let err = ApiError::from_json("502 Bad Gateway");

    assert_eq!(err.json_data(), "502 Bad Gateway");
    assert_eq!(err.title(), None);
    assert_eq!(err.to_string(), "502 Bad Gateway");
}

#[test]
fn test_json_array_is_not_an_error_object() {
    let err = ApiError::from_json("[1,2]");
    assert_eq!(err.status(), None);
    assert_eq!(err.to_string(), "[1,2]");
}
