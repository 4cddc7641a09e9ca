use chrono::{DateTime, Utc};
use derive_more::Display;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq, Display)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    #[default]
    #[display("pending")]
    Pending,
    #[display("paid")]
    Paid,
    #[display("refunded")]
    Refunded,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq, Display)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    #[default]
    #[display("cash")]
    Cash,
    #[display("card")]
    Card,
    #[display("pix")]
    Pix,
}

/// Optional one-to-one payment attached to an appointment. The booking
/// engine only reads it for the detail projection.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentSummary {
    pub id: i64,
    pub amount: Decimal,
    pub method: PaymentMethod,
    pub status: PaymentStatus,
    pub paid_at: Option<DateTime<Utc>>,
}
