//! # Booking Engine
//!
//! Validates booking requests, detects scheduling conflicts and governs
//! appointment status transitions under role-based rules. All state
//! lives in the repository; every operation takes the authenticated
//! caller explicitly.

use derive_more::{Display, Error};

use crate::{
    front::forms::booking::{CreateBookingForm, ListBookingsQuery},
    models::{
        appointment::{AppointmentDetail, AppointmentStatus, NewAppointment},
        user_app::CallerIdentity,
    },
    repo::{self, AppointmentFilter, CreateAppointmentOutcome},
};

#[derive(Debug, Display, Error)]
pub enum BookingError {
    #[display("pet not found")]
    PetNotFound,
    #[display("veterinarian not found or inactive")]
    VeterinarianUnavailable,
    #[display("service not found or inactive")]
    ServiceUnavailable,
    #[display("appointment not found")]
    AppointmentNotFound,
    #[display("caller may not act on this appointment")]
    PermissionDenied,
    #[display("tutors may only cancel appointments")]
    TutorsOnlyCancel,
    #[display("the veterinarian already has an appointment within this window")]
    SlotConflict,
    #[display("appointment cannot move from {from} to {to}")]
    InvalidTransition {
        from: AppointmentStatus,
        to: AppointmentStatus,
    },
    #[display("booking storage failure: {_0}")]
    Internal(#[error(not(source))] String),
}

impl From<anyhow::Error> for BookingError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(err.to_string())
    }
}

/// Creates an appointment for a pet/veterinarian/service triple.
///
/// Checks run in order, first failure wins: pet existence, tutor
/// ownership, veterinarian active, service active, slot overlap. The
/// repository re-runs the overlap check transactionally on insert, so a
/// concurrent booking racing past the pre-check still loses cleanly.
pub async fn create_booking(
    caller: &CallerIdentity,
    form: &CreateBookingForm,
    repo: &repo::ImplAppRepo,
) -> Result<AppointmentDetail, BookingError> {
    let pet = repo
        .get_pet(form.pet_id)
        .await?
        .ok_or(BookingError::PetNotFound)?;

    if !caller.role.is_staff() && pet.tutor_id != caller.id {
        return Err(BookingError::PermissionDenied);
    }

    let veterinarian = repo
        .get_veterinarian(form.veterinarian_id)
        .await?
        .filter(|v| v.is_active)
        .ok_or(BookingError::VeterinarianUnavailable)?;

    let service = repo
        .get_service(form.service_id)
        .await?
        .filter(|s| s.is_active)
        .ok_or(BookingError::ServiceUnavailable)?;

    let window_end = service.window_end(form.data_hora);
    let overlapping = repo
        .find_overlapping_appointments(veterinarian.id, form.data_hora, window_end)
        .await?;
    if !overlapping.is_empty() {
        return Err(BookingError::SlotConflict);
    }

    let new = NewAppointment {
        pet_id: pet.id,
        veterinarian_id: veterinarian.id,
        service_id: service.id,
        scheduled_at: form.data_hora,
        notes: form.observacoes.clone(),
    };

    match repo.create_appointment(&new, window_end).await? {
        CreateAppointmentOutcome::Created(appointment_id) => repo
            .get_appointment_detail(appointment_id)
            .await?
            .ok_or_else(|| BookingError::Internal("created appointment not readable".into())),
        CreateAppointmentOutcome::SlotTaken => Err(BookingError::SlotConflict),
    }
}

/// Moves an appointment to `new_status`.
///
/// Existence is checked before any role rule. Tutors may only cancel,
/// and only for their own pet. The restricted transition graph applies
/// to every role, staff and admins included.
pub async fn transition_status(
    caller: &CallerIdentity,
    appointment_id: i64,
    new_status: AppointmentStatus,
    notes: Option<String>,
    repo: &repo::ImplAppRepo,
) -> Result<AppointmentDetail, BookingError> {
    let appointment = repo
        .get_appointment(appointment_id)
        .await?
        .ok_or(BookingError::AppointmentNotFound)?;

    if !caller.role.is_staff() {
        let pet = repo
            .get_pet(appointment.pet_id)
            .await?
            .ok_or_else(|| BookingError::Internal("appointment references missing pet".into()))?;

        if pet.tutor_id != caller.id {
            return Err(BookingError::PermissionDenied);
        }
        if new_status != AppointmentStatus::Cancelled {
            return Err(BookingError::TutorsOnlyCancel);
        }
    }

    if !appointment.status.can_transition_to(new_status) {
        return Err(BookingError::InvalidTransition {
            from: appointment.status,
            to: new_status,
        });
    }

    repo.update_appointment_status(appointment_id, new_status, notes)
        .await?;

    repo.get_appointment_detail(appointment_id)
        .await?
        .ok_or_else(|| BookingError::Internal("updated appointment not readable".into()))
}

/// Cancellation is a status change, never a delete.
pub async fn cancel_booking(
    caller: &CallerIdentity,
    appointment_id: i64,
    repo: &repo::ImplAppRepo,
) -> Result<AppointmentDetail, BookingError> {
    transition_status(
        caller,
        appointment_id,
        AppointmentStatus::Cancelled,
        None,
        repo,
    )
    .await
}

pub async fn get_booking(
    caller: &CallerIdentity,
    appointment_id: i64,
    repo: &repo::ImplAppRepo,
) -> Result<AppointmentDetail, BookingError> {
    let detail = repo
        .get_appointment_detail(appointment_id)
        .await?
        .ok_or(BookingError::AppointmentNotFound)?;

    if !caller.role.is_staff() && detail.pet.tutor.id != caller.id {
        return Err(BookingError::PermissionDenied);
    }

    Ok(detail)
}

/// Lists appointments ascending by start time. Tutor callers are scoped
/// to their own pets no matter what filters they supply.
pub async fn list_bookings(
    caller: &CallerIdentity,
    query: &ListBookingsQuery,
    repo: &repo::ImplAppRepo,
) -> Result<Vec<AppointmentDetail>, BookingError> {
    let filter = AppointmentFilter {
        status: query.status,
        date_from: query.date_from,
        date_to: query.date_to,
        pet_id: query.pet_id,
        tutor_id: (!caller.role.is_staff()).then_some(caller.id),
    };

    Ok(repo.list_appointments(&filter).await?)
}
