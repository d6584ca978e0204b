use chrono::NaiveTime;
use serde::{Deserialize, Serialize};

use shared_models::week::WeekDay;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Doctor {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub specialty_id: i64,
    pub phone: Option<String>,
    pub is_available: bool,
}

impl Doctor {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.last_name, self.first_name)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Specialty {
    pub id: i64,
    pub name: String,
}

/// One contiguous working interval per (doctor, day); the store enforces
/// the pair's uniqueness.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DoctorSchedule {
    pub id: i64,
    pub doctor_id: i64,
    pub day: WeekDay,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
}

impl DoctorSchedule {
    /// Working-hours coverage, start inclusive, end exclusive.
    pub fn covers(&self, time: NaiveTime) -> bool {
        self.start_time <= time && time < self.end_time
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateDoctorRequest {
    pub first_name: String,
    pub last_name: String,
    pub specialty_id: i64,
    pub phone: Option<String>,
    pub is_available: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateDoctorRequest {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub specialty_id: Option<i64>,
    pub phone: Option<String>,
    pub is_available: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateSpecialtyRequest {
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateScheduleRequest {
    pub day: WeekDay,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateScheduleRequest {
    pub start_time: Option<NaiveTime>,
    pub end_time: Option<NaiveTime>,
}

/// Flat display row for the doctor listing.
#[derive(Debug, Clone, Serialize)]
pub struct DoctorListRow {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub specialty: String,
    pub phone: Option<String>,
    pub is_available: bool,
}

/// Flat display row for the cross-doctor schedule listing.
#[derive(Debug, Clone, Serialize)]
pub struct ScheduleListRow {
    pub doctor: String,
    pub specialty: String,
    pub day: WeekDay,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
}

#[derive(Debug)]
pub enum DoctorError {
    NotFound,
    SpecialtyNotFound,
    ScheduleNotFound,
    DuplicateScheduleDay,
    InvalidInterval,
    DatabaseError(String),
}

impl std::fmt::Display for DoctorError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DoctorError::NotFound => write!(f, "Doctor not found"),
            DoctorError::SpecialtyNotFound => write!(f, "Specialty not found"),
            DoctorError::ScheduleNotFound => write!(f, "Schedule not found"),
            DoctorError::DuplicateScheduleDay => {
                write!(f, "Doctor already has a schedule for this day")
            }
            DoctorError::InvalidInterval => write!(f, "Start time must be before end time"),
            DoctorError::DatabaseError(msg) => write!(f, "Database error: {}", msg),
        }
    }
}

impl std::error::Error for DoctorError {}
