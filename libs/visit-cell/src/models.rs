use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

use shared_models::error::ValidationErrors;
use shared_models::week::WeekDay;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VisitStatus {
    Scheduled,
    Completed,
    Cancelled,
}

impl VisitStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            VisitStatus::Scheduled => "scheduled",
            VisitStatus::Completed => "completed",
            VisitStatus::Cancelled => "cancelled",
        }
    }
}

impl std::fmt::Display for VisitStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Visit {
    pub id: i64,
    pub patient_id: i64,
    pub doctor_id: i64,
    pub visit_day: WeekDay,
    pub visit_date: NaiveDate,
    pub visit_time: NaiveTime,
    pub diagnosis_id: Option<i64>,
    pub status: VisitStatus,
    pub created: NaiveDate,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Diagnosis {
    pub id: i64,
    pub name: String,
}

/// Prescription issued during a visit. Owned by the visit; removed with it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Recipe {
    pub id: i64,
    pub visit_id: i64,
    pub drug: String,
    pub instructions: Option<String>,
}

/// A visit as proposed by the operator, before any store write. The
/// validator works on this shape for both creates and edits.
#[derive(Debug, Clone)]
pub struct VisitCandidate {
    pub patient_id: i64,
    pub doctor_id: i64,
    pub visit_day: WeekDay,
    pub visit_date: NaiveDate,
    pub visit_time: NaiveTime,
    pub diagnosis_id: Option<i64>,
    pub status: VisitStatus,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateVisitRequest {
    pub patient_id: i64,
    pub doctor_id: i64,
    pub visit_day: WeekDay,
    pub visit_date: NaiveDate,
    pub visit_time: NaiveTime,
    pub diagnosis_id: Option<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateVisitRequest {
    pub patient_id: Option<i64>,
    pub doctor_id: Option<i64>,
    pub visit_day: Option<WeekDay>,
    pub visit_date: Option<NaiveDate>,
    pub visit_time: Option<NaiveTime>,
    pub diagnosis_id: Option<Option<i64>>,
    pub status: Option<VisitStatus>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateDiagnosisRequest {
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateRecipeRequest {
    pub drug: String,
    pub instructions: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BulkCancelRequest {
    pub patient_id: i64,
}

/// Result of a bulk cancellation run. Zero affected visits is an
/// informational outcome, not a failure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BulkCancelOutcome {
    pub patient_id: i64,
    pub cancelled: usize,
}

/// Flat display row for the visit listing.
#[derive(Debug, Clone, Serialize)]
pub struct VisitListRow {
    pub id: i64,
    pub patient: String,
    pub doctor: String,
    pub visit_date: NaiveDate,
    pub visit_time: NaiveTime,
    pub diagnosis: String,
    pub status: VisitStatus,
}

#[derive(Debug)]
pub enum VisitError {
    /// One or more scheduling rules failed; all offending fields are
    /// reported together.
    ValidationFailed(ValidationErrors),
    /// Store-level uniqueness on (doctor, date, time) rejected the write.
    SlotAlreadyBooked,
    DoctorNotFound,
    PatientNotFound,
    VisitNotFound,
    DiagnosisNotFound,
    RecipeNotFound,
    DatabaseError(String),
}

impl std::fmt::Display for VisitError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            VisitError::ValidationFailed(errors) => write!(f, "Validation failed: {}", errors),
            VisitError::SlotAlreadyBooked => {
                write!(f, "The doctor already has a visit at this date and time")
            }
            VisitError::DoctorNotFound => write!(f, "Doctor not found"),
            VisitError::PatientNotFound => write!(f, "Patient not found"),
            VisitError::VisitNotFound => write!(f, "Visit not found"),
            VisitError::DiagnosisNotFound => write!(f, "Diagnosis not found"),
            VisitError::RecipeNotFound => write!(f, "Prescription not found"),
            VisitError::DatabaseError(msg) => write!(f, "Database error: {}", msg),
        }
    }
}

impl std::error::Error for VisitError {}
