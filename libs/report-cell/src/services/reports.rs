use std::collections::HashMap;

use chrono::Utc;
use futures::try_join;
use reqwest::Method;
use tracing::debug;

use doctor_cell::models::{Doctor, Specialty};
use patient_cell::models::Patient;
use shared_config::AppConfig;
use shared_database::routing::{EntityGroup, StoreRouter};
use visit_cell::models::{Diagnosis, Visit, VisitStatus};

use crate::models::{
    DoctorStatsRow, HomeSummary, NextVisitRow, RecentVisitRow, ReportError,
};

/// Read-only reporting over the `client` store. Aggregation happens here,
/// on fetched rows; nothing in this service ever writes.
pub struct ReportService {
    store: StoreRouter,
}

impl ReportService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            store: StoreRouter::new(config),
        }
    }

    pub async fn home_summary(&self) -> Result<HomeSummary, ReportError> {
        debug!("Building home summary");

        let store = self.store.read(EntityGroup::ReferenceReadOnly);
        let today = Utc::now().date_naive().format("%Y-%m-%d").to_string();
        let today_path = format!("/rest/v1/visits?visit_date=eq.{}&select=id", today);

        let (doctors, patients, today_visits, recent, diagnoses): (
            Vec<Doctor>,
            Vec<Patient>,
            Vec<serde_json::Value>,
            Vec<Visit>,
            Vec<Diagnosis>,
        ) = try_join!(
            store.request(Method::GET, "/rest/v1/doctors", None),
            store.request(Method::GET, "/rest/v1/patients", None),
            store.request(Method::GET, &today_path, None),
            store.request(
                Method::GET,
                "/rest/v1/visits?order=visit_date.desc,visit_time.desc&limit=10",
                None,
            ),
            store.request(Method::GET, "/rest/v1/diagnoses", None),
        )
        .map_err(|e| ReportError::DatabaseError(e.to_string()))?;

        let doctor_names: HashMap<i64, String> =
            doctors.iter().map(|d| (d.id, d.full_name())).collect();
        let patient_names: HashMap<i64, String> =
            patients.iter().map(|p| (p.id, p.full_name())).collect();
        let diagnosis_names: HashMap<i64, String> =
            diagnoses.into_iter().map(|d| (d.id, d.name)).collect();

        let recent_visits = recent
            .into_iter()
            .map(|v| RecentVisitRow {
                id: v.id,
                patient: patient_names
                    .get(&v.patient_id)
                    .cloned()
                    .unwrap_or_else(|| "-".to_string()),
                doctor: doctor_names
                    .get(&v.doctor_id)
                    .cloned()
                    .unwrap_or_else(|| "-".to_string()),
                visit_date: v.visit_date,
                visit_time: v.visit_time,
                diagnosis: v
                    .diagnosis_id
                    .and_then(|id| diagnosis_names.get(&id).cloned())
                    .unwrap_or_else(|| "-".to_string()),
                status: v.status.to_string(),
            })
            .collect();

        Ok(HomeSummary {
            doctor_count: doctors.len(),
            patient_count: patients.len(),
            today_visits: today_visits.len(),
            recent_visits,
        })
    }

    pub async fn doctor_stats(&self) -> Result<Vec<DoctorStatsRow>, ReportError> {
        debug!("Building doctor statistics report");

        let store = self.store.read(EntityGroup::ReferenceReadOnly);

        let (doctors, specialties, visits): (Vec<Doctor>, Vec<Specialty>, Vec<Visit>) = try_join!(
            store.request(Method::GET, "/rest/v1/doctors", None),
            store.request(Method::GET, "/rest/v1/specialties", None),
            store.request(Method::GET, "/rest/v1/visits", None),
        )
        .map_err(|e| ReportError::DatabaseError(e.to_string()))?;

        let specialty_names: HashMap<i64, String> =
            specialties.into_iter().map(|s| (s.id, s.name)).collect();

        let mut by_doctor: HashMap<i64, Vec<&Visit>> = HashMap::new();
        for visit in &visits {
            by_doctor.entry(visit.doctor_id).or_default().push(visit);
        }

        let mut rows: Vec<DoctorStatsRow> = doctors
            .into_iter()
            .map(|d| {
                let doctor_visits = by_doctor.get(&d.id).map(Vec::as_slice).unwrap_or(&[]);
                let count_with = |status: VisitStatus| {
                    doctor_visits.iter().filter(|v| v.status == status).count() as i64
                };

                DoctorStatsRow {
                    doctor_id: d.id,
                    specialty: specialty_names
                        .get(&d.specialty_id)
                        .cloned()
                        .unwrap_or_else(|| "-".to_string()),
                    doctor: d.full_name(),
                    total_visits: doctor_visits.len() as i64,
                    completed_visits: count_with(VisitStatus::Completed),
                    scheduled_visits: count_with(VisitStatus::Scheduled),
                    cancelled_visits: count_with(VisitStatus::Cancelled),
                    first_visit_date: doctor_visits.iter().map(|v| v.visit_date).min(),
                    last_visit_date: doctor_visits.iter().map(|v| v.visit_date).max(),
                }
            })
            .collect();

        rows.sort_by(|a, b| b.total_visits.cmp(&a.total_visits));

        Ok(rows)
    }

    pub async fn next_visits(&self, doctor_id: i64) -> Result<Vec<NextVisitRow>, ReportError> {
        debug!("Building next-visits report for doctor {}", doctor_id);

        let store = self.store.read(EntityGroup::ReferenceReadOnly);

        let doctor_path = format!("/rest/v1/doctors?id=eq.{}", doctor_id);
        let doctor: Vec<Doctor> = store
            .request(Method::GET, &doctor_path, None)
            .await
            .map_err(|e| ReportError::DatabaseError(e.to_string()))?;
        if doctor.is_empty() {
            return Err(ReportError::DoctorNotFound);
        }

        let today = Utc::now().date_naive().format("%Y-%m-%d").to_string();
        let visits_path = format!(
            "/rest/v1/visits?doctor_id=eq.{}&visit_date=gte.{}&order=visit_date.asc,visit_time.asc",
            doctor_id, today
        );

        let (visits, patients): (Vec<Visit>, Vec<Patient>) = try_join!(
            store.request(Method::GET, &visits_path, None),
            store.request(Method::GET, "/rest/v1/patients", None),
        )
        .map_err(|e| ReportError::DatabaseError(e.to_string()))?;

        let patient_names: HashMap<i64, String> = patients
            .into_iter()
            .map(|p| (p.id, p.full_name()))
            .collect();

        let rows = visits
            .into_iter()
            .map(|v| NextVisitRow {
                visit_date: v.visit_date,
                visit_time: v.visit_time,
                patient: patient_names
                    .get(&v.patient_id)
                    .cloned()
                    .unwrap_or_else(|| "-".to_string()),
            })
            .collect();

        Ok(rows)
    }
}
