use std::sync::Arc;

use axum::extract::{Json, State};
use chrono::{NaiveDate, NaiveTime};
use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use shared_models::error::AppError;
use shared_models::week::WeekDay;
use shared_utils::test_utils::{MockStoreRows, TestConfig};
use visit_cell::handlers::create_visit;
use visit_cell::models::CreateVisitRequest;

#[tokio::test]
async fn slot_conflict_is_reported_as_a_field_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/patients"))
        .and(query_param("id", "eq.5"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            MockStoreRows::patient(5, "Olga", "Petrova")
        ])))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/doctors"))
        .and(query_param("id", "eq.7"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            MockStoreRows::doctor(7, "Anna", "Karlova", true)
        ])))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/doctor_schedules"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            MockStoreRows::schedule(1, 7, "monday", "09:00:00", "12:00:00")
        ])))
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/rest/v1/visits"))
        .respond_with(ResponseTemplate::new(409).set_body_json(json!({
            "message": "duplicate key value violates unique constraint"
        })))
        .mount(&server)
        .await;

    let state = Arc::new(TestConfig::with_store_url(&server.uri()).to_app_config());

    let result = create_visit(
        State(state),
        Json(CreateVisitRequest {
            patient_id: 5,
            doctor_id: 7,
            visit_day: WeekDay::Monday,
            visit_date: NaiveDate::from_ymd_opt(2024, 6, 3).unwrap(),
            visit_time: "10:00:00".parse::<NaiveTime>().unwrap(),
            diagnosis_id: None,
        }),
    )
    .await;

    // The losing side of a booking race gets the same recoverable shape
    // as any other validation failure.
    match result {
        Err(AppError::Validation(errors)) => {
            assert!(errors.fields.contains_key("visit_time"));
        }
        other => panic!("expected validation error, got {:?}", other.map(|j| j.0)),
    }
}
