use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use report_cell::models::ReportError;
use report_cell::services::reports::ReportService;
use shared_utils::test_utils::{MockStoreRows, TestConfig};

async fn mount_table(server: &MockServer, table: &str, rows: serde_json::Value) {
    Mock::given(method("GET"))
        .and(path(format!("/rest/v1/{}", table)))
        .respond_with(ResponseTemplate::new(200).set_body_json(rows))
        .mount(server)
        .await;
}

#[tokio::test]
async fn doctor_stats_aggregate_per_status_and_order_by_volume() {
    // Reports must read from the client store only: nothing is mounted on
    // the default store, so any read routed there would fail the test.
    let default_store = MockServer::start().await;
    let client_store = MockServer::start().await;

    mount_table(
        &client_store,
        "doctors",
        json!([
            MockStoreRows::doctor(7, "Anna", "Karlova", true),
            MockStoreRows::doctor(8, "Ivan", "Orlov", true),
        ]),
    )
    .await;
    mount_table(
        &client_store,
        "specialties",
        json!([MockStoreRows::specialty(1, "Therapist")]),
    )
    .await;
    mount_table(
        &client_store,
        "visits",
        json!([
            MockStoreRows::visit(1, 5, 8, "2024-06-03", "09:00:00", "completed"),
            MockStoreRows::visit(2, 5, 8, "2024-06-10", "09:30:00", "scheduled"),
            MockStoreRows::visit(3, 6, 8, "2024-06-11", "10:00:00", "cancelled"),
            MockStoreRows::visit(4, 6, 7, "2024-06-12", "11:00:00", "scheduled"),
        ]),
    )
    .await;

    let config =
        TestConfig::with_store_urls(&default_store.uri(), &client_store.uri()).to_app_config();
    let service = ReportService::new(&config);

    let stats = service.doctor_stats().await.unwrap();
    assert_eq!(stats.len(), 2);

    // Doctor 8 has three visits and sorts first.
    assert_eq!(stats[0].doctor_id, 8);
    assert_eq!(stats[0].total_visits, 3);
    assert_eq!(stats[0].completed_visits, 1);
    assert_eq!(stats[0].scheduled_visits, 1);
    assert_eq!(stats[0].cancelled_visits, 1);
    assert_eq!(
        stats[0].first_visit_date.unwrap().to_string(),
        "2024-06-03"
    );
    assert_eq!(stats[0].last_visit_date.unwrap().to_string(), "2024-06-11");

    assert_eq!(stats[1].doctor_id, 7);
    assert_eq!(stats[1].total_visits, 1);
}

#[tokio::test]
async fn next_visits_for_unknown_doctor_is_not_found() {
    let default_store = MockServer::start().await;
    let client_store = MockServer::start().await;

    mount_table(&client_store, "doctors", json!([])).await;

    let config =
        TestConfig::with_store_urls(&default_store.uri(), &client_store.uri()).to_app_config();
    let service = ReportService::new(&config);

    let err = service.next_visits(99).await.unwrap_err();
    assert!(matches!(err, ReportError::DoctorNotFound));
}

#[tokio::test]
async fn next_visits_resolve_patient_names() {
    let default_store = MockServer::start().await;
    let client_store = MockServer::start().await;

    mount_table(
        &client_store,
        "doctors",
        json!([MockStoreRows::doctor(7, "Anna", "Karlova", true)]),
    )
    .await;
    mount_table(
        &client_store,
        "visits",
        json!([
            MockStoreRows::visit(1, 5, 7, "2030-01-07", "09:00:00", "scheduled"),
        ]),
    )
    .await;
    mount_table(
        &client_store,
        "patients",
        json!([MockStoreRows::patient(5, "Olga", "Petrova")]),
    )
    .await;

    let config =
        TestConfig::with_store_urls(&default_store.uri(), &client_store.uri()).to_app_config();
    let service = ReportService::new(&config);

    let rows = service.next_visits(7).await.unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].patient, "Petrova Olga");
}

#[tokio::test]
async fn home_summary_counts_and_recent_rows() {
    let default_store = MockServer::start().await;
    let client_store = MockServer::start().await;

    mount_table(
        &client_store,
        "doctors",
        json!([MockStoreRows::doctor(7, "Anna", "Karlova", true)]),
    )
    .await;
    mount_table(
        &client_store,
        "patients",
        json!([
            MockStoreRows::patient(5, "Olga", "Petrova"),
            MockStoreRows::patient(6, "Boris", "Ivanov"),
        ]),
    )
    .await;
    mount_table(
        &client_store,
        "visits",
        json!([
            MockStoreRows::visit(1, 5, 7, "2024-06-03", "09:00:00", "completed"),
        ]),
    )
    .await;
    mount_table(&client_store, "diagnoses", json!([])).await;

    let config =
        TestConfig::with_store_urls(&default_store.uri(), &client_store.uri()).to_app_config();
    let service = ReportService::new(&config);

    let summary = service.home_summary().await.unwrap();
    assert_eq!(summary.doctor_count, 1);
    assert_eq!(summary.patient_count, 2);
    assert_eq!(summary.recent_visits.len(), 1);
    assert_eq!(summary.recent_visits[0].patient, "Petrova Olga");
    assert_eq!(summary.recent_visits[0].diagnosis, "-");
}
