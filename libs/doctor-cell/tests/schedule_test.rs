use chrono::NaiveTime;
use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use doctor_cell::models::{CreateScheduleRequest, DoctorError};
use doctor_cell::services::schedule::ScheduleService;
use shared_models::week::WeekDay;
use shared_utils::test_utils::{MockStoreRows, TestConfig};

fn t(value: &str) -> NaiveTime {
    value.parse().unwrap()
}

async fn mount_doctor(server: &MockServer, id: i64) {
    Mock::given(method("GET"))
        .and(path("/rest/v1/doctors"))
        .and(query_param("id", format!("eq.{}", id)))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            MockStoreRows::doctor(id, "Anna", "Karlova", true)
        ])))
        .mount(server)
        .await;
}

#[tokio::test]
async fn create_schedule_persists_interval() {
    let server = MockServer::start().await;
    mount_doctor(&server, 7).await;

    Mock::given(method("POST"))
        .and(path("/rest/v1/doctor_schedules"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!([
            MockStoreRows::schedule(1, 7, "monday", "09:00:00", "12:00:00")
        ])))
        .mount(&server)
        .await;

    let config = TestConfig::with_store_url(&server.uri()).to_app_config();
    let service = ScheduleService::new(&config);

    let schedule = service
        .create_schedule(
            7,
            CreateScheduleRequest {
                day: WeekDay::Monday,
                start_time: t("09:00:00"),
                end_time: t("12:00:00"),
            },
        )
        .await
        .unwrap();

    assert_eq!(schedule.doctor_id, 7);
    assert_eq!(schedule.day, WeekDay::Monday);
}

#[tokio::test]
async fn inverted_interval_is_rejected_before_the_store() {
    let server = MockServer::start().await;

    let config = TestConfig::with_store_url(&server.uri()).to_app_config();
    let service = ScheduleService::new(&config);

    let err = service
        .create_schedule(
            7,
            CreateScheduleRequest {
                day: WeekDay::Monday,
                start_time: t("12:00:00"),
                end_time: t("09:00:00"),
            },
        )
        .await
        .unwrap_err();

    assert!(matches!(err, DoctorError::InvalidInterval));
}

#[tokio::test]
async fn second_schedule_for_same_day_conflicts() {
    let server = MockServer::start().await;
    mount_doctor(&server, 7).await;

    // One working interval per (doctor, day); the unique index rejects a
    // second row.
    Mock::given(method("POST"))
        .and(path("/rest/v1/doctor_schedules"))
        .respond_with(ResponseTemplate::new(409).set_body_json(json!({
            "message": "duplicate key value violates unique constraint"
        })))
        .mount(&server)
        .await;

    let config = TestConfig::with_store_url(&server.uri()).to_app_config();
    let service = ScheduleService::new(&config);

    let err = service
        .create_schedule(
            7,
            CreateScheduleRequest {
                day: WeekDay::Monday,
                start_time: t("13:00:00"),
                end_time: t("17:00:00"),
            },
        )
        .await
        .unwrap_err();

    assert!(matches!(err, DoctorError::DuplicateScheduleDay));
}

#[tokio::test]
async fn find_covering_queries_the_interval_filters() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/doctor_schedules"))
        .and(query_param("doctor_id", "eq.7"))
        .and(query_param("day", "eq.monday"))
        .and(query_param("start_time", "lte.09:30:00"))
        .and(query_param("end_time", "gt.09:30:00"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            MockStoreRows::schedule(1, 7, "monday", "09:00:00", "12:00:00")
        ])))
        .mount(&server)
        .await;

    let config = TestConfig::with_store_url(&server.uri()).to_app_config();
    let service = ScheduleService::new(&config);

    let covering = service
        .find_covering(7, WeekDay::Monday, t("09:30:00"))
        .await
        .unwrap();

    assert!(covering.is_some());
    assert!(covering.unwrap().covers(t("09:30:00")));
}

#[tokio::test]
async fn find_covering_returns_none_outside_hours() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/doctor_schedules"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    let config = TestConfig::with_store_url(&server.uri()).to_app_config();
    let service = ScheduleService::new(&config);

    let covering = service
        .find_covering(7, WeekDay::Sunday, t("09:30:00"))
        .await
        .unwrap();

    assert!(covering.is_none());
}
