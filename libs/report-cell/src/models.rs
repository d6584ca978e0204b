use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

/// Per-doctor visit totals, one row per doctor, busiest first.
#[derive(Debug, Clone, Serialize)]
pub struct DoctorStatsRow {
    pub doctor_id: i64,
    pub doctor: String,
    pub specialty: String,
    pub total_visits: i64,
    pub completed_visits: i64,
    pub scheduled_visits: i64,
    pub cancelled_visits: i64,
    pub first_visit_date: Option<NaiveDate>,
    pub last_visit_date: Option<NaiveDate>,
}

/// Upcoming visit row for one doctor, from today onward.
#[derive(Debug, Clone, Serialize)]
pub struct NextVisitRow {
    pub visit_date: NaiveDate,
    pub visit_time: NaiveTime,
    pub patient: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct RecentVisitRow {
    pub id: i64,
    pub patient: String,
    pub doctor: String,
    pub visit_date: NaiveDate,
    pub visit_time: NaiveTime,
    pub diagnosis: String,
    pub status: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct HomeSummary {
    pub doctor_count: usize,
    pub patient_count: usize,
    pub today_visits: usize,
    pub recent_visits: Vec<RecentVisitRow>,
}

#[derive(Debug, Deserialize)]
pub struct NextVisitsQuery {
    pub doctor_id: i64,
}

#[derive(Debug)]
pub enum ReportError {
    DoctorNotFound,
    DatabaseError(String),
}

impl std::fmt::Display for ReportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReportError::DoctorNotFound => write!(f, "Doctor not found"),
            ReportError::DatabaseError(msg) => write!(f, "Database error: {}", msg),
        }
    }
}

impl std::error::Error for ReportError {}
