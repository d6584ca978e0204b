use reqwest::Method;
use serde_json::{json, Value};
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use shared_database::postgrest::{StoreClient, StoreError};

#[tokio::test]
async fn requests_carry_the_api_key() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/doctors"))
        .and(header("apikey", "secret-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    let client = StoreClient::new(&server.uri(), "secret-key");
    let rows: Vec<Value> = client
        .request(Method::GET, "/rest/v1/doctors", None)
        .await
        .unwrap();

    assert!(rows.is_empty());
}

#[tokio::test]
async fn conflict_maps_to_unique_violation() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/rest/v1/visits"))
        .respond_with(ResponseTemplate::new(409).set_body_json(json!({
            "message": "duplicate key value violates unique constraint"
        })))
        .mount(&server)
        .await;

    let client = StoreClient::new(&server.uri(), "secret-key");
    let err = client
        .request::<Vec<Value>>(Method::POST, "/rest/v1/visits", Some(json!({})))
        .await
        .unwrap_err();

    assert!(matches!(err, StoreError::UniqueViolation(_)));
}

#[tokio::test]
async fn missing_rows_map_to_not_found() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/unknown"))
        .respond_with(ResponseTemplate::new(404).set_body_string("relation does not exist"))
        .mount(&server)
        .await;

    let client = StoreClient::new(&server.uri(), "secret-key");
    let err = client
        .request::<Vec<Value>>(Method::GET, "/rest/v1/unknown", None)
        .await
        .unwrap_err();

    assert!(matches!(err, StoreError::NotFound(_)));
}

#[tokio::test]
async fn auth_failures_map_to_auth() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/doctors"))
        .respond_with(ResponseTemplate::new(401).set_body_string("invalid api key"))
        .mount(&server)
        .await;

    let client = StoreClient::new(&server.uri(), "bad-key");
    let err = client
        .request::<Vec<Value>>(Method::GET, "/rest/v1/doctors", None)
        .await
        .unwrap_err();

    assert!(matches!(err, StoreError::Auth(_)));
}
