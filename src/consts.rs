pub const IDENTITY_COOKIE_NAME: &str = "caller_id";
pub const SESSION_COOKIE_NAME: &str = "vet-agenda-session";

pub const MAX_AGE_COOKIES: i64 = chrono::TimeDelta::hours(4).num_seconds();
