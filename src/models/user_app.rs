use chrono::{DateTime, Utc};
use derive_more::Display;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Display, Default)]
pub enum Role {
    #[default]
    #[serde(rename = "tutor")]
    #[display("tutor")]
    Tutor,
    #[serde(rename = "clinic_staff")]
    #[display("clinic_staff")]
    ClinicStaff,
    #[serde(rename = "clinic_admin")]
    #[display("clinic_admin")]
    ClinicAdmin,
    #[serde(rename = "global_admin")]
    #[display("global_admin")]
    GlobalAdmin,
}

impl Role {
    /// Staff, clinic admins and global admins share the elevated
    /// scheduling privileges; tutors are scoped to their own pets.
    pub fn is_staff(&self) -> bool {
        !matches!(self, Role::Tutor)
    }
}

/// Account record as stored; `password_hash` never leaves the repo layer.
#[derive(Debug, Clone)]
pub struct User {
    pub id: i64,
    pub full_name: String,
    pub email: String,
    pub password_hash: String,
    pub role: Role,
    pub is_enabled: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Authenticated caller, resolved once per request from the identity
/// cookie and threaded explicitly into every booking operation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CallerIdentity {
    pub id: i64,
    pub role: Role,
}

impl From<&User> for CallerIdentity {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            role: user.role,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TutorSummary {
    pub id: i64,
    pub full_name: String,
}
