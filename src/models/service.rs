use chrono::{DateTime, Duration, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

/// Clinic service; `duration_min` determines the width of the booking
/// window an appointment occupies on a veterinarian's calendar.
#[derive(Debug, Clone, Default)]
pub struct Service {
    pub id: i64,
    pub service_name: String,
    pub description: Option<String>,
    pub base_price: Decimal,
    pub duration_min: i64,
    pub clinic_id: i64,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Service {
    /// End of the half-open window `[start, start + duration_min)`.
    pub fn window_end(&self, start: DateTime<Utc>) -> DateTime<Utc> {
        start + Duration::minutes(self.duration_min)
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceSummary {
    pub id: i64,
    pub service_name: String,
    pub base_price: Decimal,
    pub duration_min: i64,
}
