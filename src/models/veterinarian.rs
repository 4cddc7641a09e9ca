use chrono::{DateTime, Utc};
use serde::Serialize;

/// Veterinarian record; only active veterinarians may receive new bookings.
#[derive(Debug, Clone, Default)]
pub struct Veterinarian {
    pub id: i64,
    pub full_name: String,
    pub crmv: String,
    pub specialty: Option<String>,
    pub clinic_id: i64,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VeterinarianSummary {
    pub id: i64,
    pub full_name: String,
    pub crmv: String,
    pub specialty: Option<String>,
}
