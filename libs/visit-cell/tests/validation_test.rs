use chrono::{NaiveDate, NaiveTime};
use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use shared_models::week::WeekDay;
use shared_utils::test_utils::{MockStoreRows, TestConfig};
use visit_cell::models::{VisitCandidate, VisitError, VisitStatus};
use visit_cell::services::validation::VisitValidator;

fn candidate(doctor_id: i64, time: &str) -> VisitCandidate {
    VisitCandidate {
        patient_id: 5,
        doctor_id,
        visit_day: WeekDay::Monday,
        visit_date: NaiveDate::from_ymd_opt(2024, 6, 3).unwrap(),
        visit_time: time.parse::<NaiveTime>().unwrap(),
        diagnosis_id: None,
        status: VisitStatus::Scheduled,
    }
}

async fn mount_doctor(server: &MockServer, id: i64, is_available: bool) {
    Mock::given(method("GET"))
        .and(path("/rest/v1/doctors"))
        .and(query_param("id", format!("eq.{}", id)))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            MockStoreRows::doctor(id, "Anna", "Karlova", is_available)
        ])))
        .mount(server)
        .await;
}

/// Monday 09:00-12:00 working hours for the given doctor: the schedule
/// row is returned only when the queried time falls inside the interval,
/// mirroring the store-side filter.
async fn mount_monday_morning_schedule(server: &MockServer, doctor_id: i64, covered: &[&str]) {
    for time in covered {
        Mock::given(method("GET"))
            .and(path("/rest/v1/doctor_schedules"))
            .and(query_param("doctor_id", format!("eq.{}", doctor_id)))
            .and(query_param("day", "eq.monday"))
            .and(query_param("start_time", format!("lte.{}", time)))
            .and(query_param("end_time", format!("gt.{}", time)))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                MockStoreRows::schedule(1, doctor_id, "monday", "09:00:00", "12:00:00")
            ])))
            .mount(server)
            .await;
    }

    // Anything else is outside working hours.
    Mock::given(method("GET"))
        .and(path("/rest/v1/doctor_schedules"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(server)
        .await;
}

#[tokio::test]
async fn visit_inside_working_hours_is_accepted() {
    let server = MockServer::start().await;
    mount_doctor(&server, 7, true).await;
    mount_monday_morning_schedule(&server, 7, &["09:30:00"]).await;

    let config = TestConfig::with_store_url(&server.uri()).to_app_config();
    let validator = VisitValidator::new(&config);

    let result = validator.validate(&candidate(7, "09:30:00")).await;
    assert!(result.is_ok());
}

#[tokio::test]
async fn visit_at_end_of_interval_is_rejected() {
    let server = MockServer::start().await;
    mount_doctor(&server, 7, true).await;
    // 12:00 is the end of the interval; end is exclusive, so no coverage.
    mount_monday_morning_schedule(&server, 7, &[]).await;

    let config = TestConfig::with_store_url(&server.uri()).to_app_config();
    let validator = VisitValidator::new(&config);

    let err = validator.validate(&candidate(7, "12:00:00")).await.unwrap_err();
    match err {
        VisitError::ValidationFailed(errors) => {
            assert_eq!(
                errors.fields["visit_time"],
                vec!["Doctor does not work on this day or time"]
            );
        }
        other => panic!("expected validation failure, got {:?}", other),
    }
}

#[tokio::test]
async fn off_grid_time_is_rejected() {
    let server = MockServer::start().await;
    mount_doctor(&server, 7, true).await;
    // 09:15 is inside working hours but off the 30 minute grid.
    mount_monday_morning_schedule(&server, 7, &["09:15:00"]).await;

    let config = TestConfig::with_store_url(&server.uri()).to_app_config();
    let validator = VisitValidator::new(&config);

    let err = validator.validate(&candidate(7, "09:15:00")).await.unwrap_err();
    match err {
        VisitError::ValidationFailed(errors) => {
            assert_eq!(
                errors.fields["visit_time"],
                vec!["Visit time must fall on a 30 minute slot"]
            );
            assert!(!errors.fields.contains_key("doctor_id"));
        }
        other => panic!("expected validation failure, got {:?}", other),
    }
}

#[tokio::test]
async fn unavailable_doctor_is_rejected_even_inside_schedule() {
    let server = MockServer::start().await;
    mount_doctor(&server, 7, false).await;
    mount_monday_morning_schedule(&server, 7, &["09:30:00"]).await;

    let config = TestConfig::with_store_url(&server.uri()).to_app_config();
    let validator = VisitValidator::new(&config);

    let err = validator.validate(&candidate(7, "09:30:00")).await.unwrap_err();
    match err {
        VisitError::ValidationFailed(errors) => {
            assert_eq!(
                errors.fields["doctor_id"],
                vec!["Doctor is temporarily unavailable for booking"]
            );
        }
        other => panic!("expected validation failure, got {:?}", other),
    }
}

#[tokio::test]
async fn all_failures_are_reported_together() {
    let server = MockServer::start().await;
    mount_doctor(&server, 7, false).await;
    // No schedule rows at all: coverage fails alongside the other checks.
    mount_monday_morning_schedule(&server, 7, &[]).await;

    let config = TestConfig::with_store_url(&server.uri()).to_app_config();
    let validator = VisitValidator::new(&config);

    let err = validator.validate(&candidate(7, "09:15:00")).await.unwrap_err();
    match err {
        VisitError::ValidationFailed(errors) => {
            // Off-grid and out-of-hours both land on visit_time.
            assert_eq!(errors.fields["visit_time"].len(), 2);
            assert_eq!(errors.fields["doctor_id"].len(), 1);
        }
        other => panic!("expected validation failure, got {:?}", other),
    }
}

#[tokio::test]
async fn unknown_doctor_is_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/rest/v1/doctors"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    let config = TestConfig::with_store_url(&server.uri()).to_app_config();
    let validator = VisitValidator::new(&config);

    let err = validator.validate(&candidate(99, "09:30:00")).await.unwrap_err();
    assert!(matches!(err, VisitError::DoctorNotFound));
}
