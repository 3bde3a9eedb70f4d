use chrono::{DateTime, Utc};

/// Identifier for an end user. Free-form; never validated against a user table.
pub type UserId = String;

/// Identifier for a workflow session, `{user_id}_{workflow}_{unix_ts}`.
pub type SessionId = String;

/// Fixed agent identity reported to the remote memory service.
pub const MEMORY_AGENT_ID: &str = "fitola_fitness_coach";

/// Service name reported by the health endpoints.
pub const SERVICE_NAME: &str = "fitola-backend";

/// Current wall-clock time in UTC.
pub fn now() -> DateTime<Utc> {
    Utc::now()
}

/// RFC 3339 timestamp for the current instant.
pub fn now_iso() -> String {
    Utc::now().to_rfc3339()
}

/// Unix timestamp in fractional seconds, used to build session ids.
pub fn unix_timestamp(at: DateTime<Utc>) -> f64 {
    at.timestamp_micros() as f64 / 1_000_000.0
}
