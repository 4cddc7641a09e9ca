use chrono::{DateTime, Utc};
use derive_more::Display;
use serde::{Deserialize, Serialize};

use crate::models::{
    payment::PaymentSummary, pet::PetSummary, service::ServiceSummary,
    veterinarian::VeterinarianSummary,
};

#[derive(Debug, Clone, Copy, Default, Deserialize, Serialize, PartialEq, Eq, Display)]
#[serde(rename_all = "snake_case")]
pub enum AppointmentStatus {
    #[default]
    #[display("scheduled")]
    Scheduled,
    #[display("confirmed")]
    Confirmed,
    #[display("completed")]
    Completed,
    #[display("cancelled")]
    Cancelled,
}

impl AppointmentStatus {
    /// Completed and Cancelled are terminal; no transition leaves them.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Cancelled)
    }

    /// Restricted transition graph, enforced for every caller role:
    /// Scheduled -> {Confirmed, Cancelled}, Confirmed -> {Completed, Cancelled}.
    pub fn can_transition_to(&self, next: Self) -> bool {
        matches!(
            (self, next),
            (Self::Scheduled, Self::Confirmed)
                | (Self::Scheduled, Self::Cancelled)
                | (Self::Confirmed, Self::Completed)
                | (Self::Confirmed, Self::Cancelled)
        )
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Appointment {
    pub id: i64,
    pub pet_id: i64,
    pub veterinarian_id: i64,
    pub service_id: i64,
    pub scheduled_at: DateTime<Utc>,
    pub notes: Option<String>,
    pub status: AppointmentStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields needed to insert a new appointment; status is always Scheduled.
#[derive(Debug, Clone, PartialEq)]
pub struct NewAppointment {
    pub pet_id: i64,
    pub veterinarian_id: i64,
    pub service_id: i64,
    pub scheduled_at: DateTime<Utc>,
    pub notes: Option<String>,
}

/// Appointment with the resolved pet/veterinarian/service summaries the
/// API responds with, plus the payment record when one exists.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AppointmentDetail {
    #[serde(flatten)]
    pub appointment: Appointment,
    pub pet: PetSummary,
    pub veterinarian: VeterinarianSummary,
    pub service: ServiceSummary,
    pub payment: Option<PaymentSummary>,
}

#[cfg(test)]
mod tests {
    use super::AppointmentStatus::*;

    #[test]
    fn test_scheduled_transitions() {
        assert!(Scheduled.can_transition_to(Confirmed));
        assert!(Scheduled.can_transition_to(Cancelled));
        assert!(!Scheduled.can_transition_to(Completed));
        assert!(!Scheduled.can_transition_to(Scheduled));
    }

    #[test]
    fn test_confirmed_transitions() {
        assert!(Confirmed.can_transition_to(Completed));
        assert!(Confirmed.can_transition_to(Cancelled));
        assert!(!Confirmed.can_transition_to(Scheduled));
    }

    #[test]
    fn test_terminal_statuses_have_no_exit() {
        for terminal in [Completed, Cancelled] {
            assert!(terminal.is_terminal());
            for next in [Scheduled, Confirmed, Completed, Cancelled] {
                assert!(!terminal.can_transition_to(next));
            }
        }
    }

    #[test]
    fn test_status_serde_round_trip() {
        let status: super::AppointmentStatus = serde_json::from_str("\"confirmed\"").unwrap();
        assert_eq!(status, Confirmed);
        assert_eq!(status.to_string(), "confirmed");
    }
}
