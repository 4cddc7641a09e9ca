use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::models::appointment::AppointmentStatus;

/// Body of `POST /appointments`. Field names follow the public API
/// contract (`dataHora`, `observacoes`).
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateBookingForm {
    pub pet_id: i64,
    pub veterinarian_id: i64,
    pub service_id: i64,
    pub data_hora: DateTime<Utc>,
    pub observacoes: Option<String>,
}

/// Body of `PUT /appointments/{id}`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateStatusForm {
    pub status: AppointmentStatus,
    pub observacoes: Option<String>,
}

/// Query string of `GET /appointments`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListBookingsQuery {
    pub status: Option<AppointmentStatus>,
    pub date_from: Option<DateTime<Utc>>,
    pub date_to: Option<DateTime<Utc>>,
    pub pet_id: Option<i64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_form_accepts_api_field_names() {
        let form: CreateBookingForm = serde_json::from_str(
            r#"{"petId":1,"veterinarianId":2,"serviceId":3,
                "dataHora":"2025-09-10T10:00:00Z","observacoes":"first visit"}"#,
        )
        .unwrap();

        assert_eq!(form.pet_id, 1);
        assert_eq!(form.veterinarian_id, 2);
        assert_eq!(form.service_id, 3);
        assert_eq!(form.observacoes.as_deref(), Some("first visit"));
    }

    #[test]
    fn test_create_form_rejects_bad_datetime() {
        let result = serde_json::from_str::<CreateBookingForm>(
            r#"{"petId":1,"veterinarianId":2,"serviceId":3,"dataHora":"not-a-date"}"#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_update_form_rejects_unknown_status() {
        assert!(serde_json::from_str::<UpdateStatusForm>(r#"{"status":"rescheduled"}"#).is_err());
        let form: UpdateStatusForm = serde_json::from_str(r#"{"status":"cancelled"}"#).unwrap();
        assert_eq!(form.status, AppointmentStatus::Cancelled);
    }
}
