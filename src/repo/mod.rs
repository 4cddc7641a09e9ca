pub mod sqlite;
pub mod sqlite_queries;

use crate::models;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// Filters for appointment listings. `tutor_id` is set by the booking
/// engine for tutor callers; it is never taken from request input.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AppointmentFilter {
    pub status: Option<models::appointment::AppointmentStatus>,
    pub date_from: Option<DateTime<Utc>>,
    pub date_to: Option<DateTime<Utc>>,
    pub pet_id: Option<i64>,
    pub tutor_id: Option<i64>,
}

/// Result of the transactional check-then-insert.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CreateAppointmentOutcome {
    Created(i64),
    SlotTaken,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AppRepo {
    async fn get_user_by_email(&self, email: &str)
    -> anyhow::Result<Option<models::user_app::User>>;

    async fn get_pet(&self, pet_id: i64) -> anyhow::Result<Option<models::pet::Pet>>;

    async fn get_veterinarian(
        &self,
        veterinarian_id: i64,
    ) -> anyhow::Result<Option<models::veterinarian::Veterinarian>>;

    async fn get_service(
        &self,
        service_id: i64,
    ) -> anyhow::Result<Option<models::service::Service>>;

    /// Non-terminal appointments of the veterinarian whose window
    /// `[scheduled_at, scheduled_at + duration)` intersects `[start, end)`.
    async fn find_overlapping_appointments(
        &self,
        veterinarian_id: i64,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> anyhow::Result<Vec<models::appointment::Appointment>>;

    /// Inserts the appointment after re-running the overlap check inside
    /// the same transaction, so two concurrent bookings for one slot can
    /// never both land.
    async fn create_appointment(
        &self,
        new: &models::appointment::NewAppointment,
        window_end: DateTime<Utc>,
    ) -> anyhow::Result<CreateAppointmentOutcome>;

    async fn get_appointment(
        &self,
        appointment_id: i64,
    ) -> anyhow::Result<Option<models::appointment::Appointment>>;

    async fn get_appointment_detail(
        &self,
        appointment_id: i64,
    ) -> anyhow::Result<Option<models::appointment::AppointmentDetail>>;

    async fn update_appointment_status(
        &self,
        appointment_id: i64,
        status: models::appointment::AppointmentStatus,
        notes: Option<String>,
    ) -> anyhow::Result<()>;

    /// Appointment details matching the filter, ascending by `scheduled_at`.
    async fn list_appointments(
        &self,
        filter: &AppointmentFilter,
    ) -> anyhow::Result<Vec<models::appointment::AppointmentDetail>>;
}

pub type ImplAppRepo = Box<dyn AppRepo>;
