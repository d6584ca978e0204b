use serde_json::json;
use wiremock::matchers::{body_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use shared_utils::test_utils::{MockStoreRows, TestConfig};
use visit_cell::models::VisitError;
use visit_cell::services::cancellation::BulkCancellationService;

async fn mount_patient(server: &MockServer, id: i64) {
    Mock::given(method("GET"))
        .and(path("/rest/v1/patients"))
        .and(query_param("id", format!("eq.{}", id)))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            MockStoreRows::patient(id, "Olga", "Petrova")
        ])))
        .mount(server)
        .await;
}

#[tokio::test]
async fn cancels_only_scheduled_visits_and_reports_count() {
    let server = MockServer::start().await;
    mount_patient(&server, 5).await;

    // The store filter takes care of skipping the completed visit; the
    // batch update returns the three rows it touched.
    Mock::given(method("PATCH"))
        .and(path("/rest/v1/visits"))
        .and(query_param("patient_id", "eq.5"))
        .and(query_param("status", "eq.scheduled"))
        .and(body_json(json!({ "status": "cancelled" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            MockStoreRows::visit(1, 5, 7, "2024-06-03", "09:00:00", "cancelled"),
            MockStoreRows::visit(2, 5, 7, "2024-06-10", "09:30:00", "cancelled"),
            MockStoreRows::visit(3, 5, 8, "2024-06-11", "10:00:00", "cancelled"),
        ])))
        .mount(&server)
        .await;

    let config = TestConfig::with_store_url(&server.uri()).to_app_config();
    let service = BulkCancellationService::new(&config);

    let outcome = service.cancel_for_patient(5).await.unwrap();
    assert_eq!(outcome.cancelled, 3);
    assert_eq!(outcome.patient_id, 5);
}

#[tokio::test]
async fn zero_affected_is_informational_not_an_error() {
    let server = MockServer::start().await;
    mount_patient(&server, 5).await;

    Mock::given(method("PATCH"))
        .and(path("/rest/v1/visits"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    let config = TestConfig::with_store_url(&server.uri()).to_app_config();
    let service = BulkCancellationService::new(&config);

    let outcome = service.cancel_for_patient(5).await.unwrap();
    assert_eq!(outcome.cancelled, 0);
}

#[tokio::test]
async fn second_run_affects_nothing() {
    let server = MockServer::start().await;
    mount_patient(&server, 5).await;

    // First batch flips two rows; once they are cancelled the scheduled
    // filter no longer matches them.
    Mock::given(method("PATCH"))
        .and(path("/rest/v1/visits"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            MockStoreRows::visit(1, 5, 7, "2024-06-03", "09:00:00", "cancelled"),
            MockStoreRows::visit(2, 5, 7, "2024-06-10", "09:30:00", "cancelled"),
        ])))
        .up_to_n_times(1)
        .mount(&server)
        .await;

    Mock::given(method("PATCH"))
        .and(path("/rest/v1/visits"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    let config = TestConfig::with_store_url(&server.uri()).to_app_config();
    let service = BulkCancellationService::new(&config);

    let first = service.cancel_for_patient(5).await.unwrap();
    assert_eq!(first.cancelled, 2);

    let second = service.cancel_for_patient(5).await.unwrap();
    assert_eq!(second.cancelled, 0);
}

#[tokio::test]
async fn unknown_patient_is_not_found() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/patients"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    let config = TestConfig::with_store_url(&server.uri()).to_app_config();
    let service = BulkCancellationService::new(&config);

    let err = service.cancel_for_patient(99).await.unwrap_err();
    assert!(matches!(err, VisitError::PatientNotFound));
}
