use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;

use crate::models::user_app::TutorSummary;

/// Pet record; read-only from the booking engine's perspective.
#[derive(Debug, Clone, Default)]
pub struct Pet {
    pub id: i64,
    pub pet_name: String,
    pub species: String,
    pub breed: Option<String>,
    pub birthday: Option<NaiveDate>,
    pub tutor_id: i64,
    pub clinic_id: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Projection embedded into appointment responses.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PetSummary {
    pub id: i64,
    pub pet_name: String,
    pub species: String,
    pub tutor: TutorSummary,
}
