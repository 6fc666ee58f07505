//! Session lifetime rules.
//!
//! Both servers store opaque session tokens in the database; whether a token
//! is still live is a pure function of its age, so the check lives here and
//! the stores stay dumb.

use chrono::{DateTime, Duration, Utc};

/// Sessions older than this are treated as absent even if still stored.
pub const SESSION_TTL_HOURS: i64 = 24;

/// Whether a session created at `created_at` has expired as of `now`.
#[must_use]
pub fn is_session_expired(created_at: DateTime<Utc>, now: DateTime<Utc>) -> bool {
    now - created_at > Duration::hours(SESSION_TTL_HOURS)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fresh_session_is_live() {
        let now = Utc::now();
        assert!(!is_session_expired(now, now));
        assert!(!is_session_expired(now - Duration::hours(23), now));
    }

    #[test]
    fn test_exact_ttl_is_still_live() {
        let now = Utc::now();
        assert!(!is_session_expired(now - Duration::hours(SESSION_TTL_HOURS), now));
    }

    #[test]
    fn test_old_session_is_expired() {
        let now = Utc::now();
        assert!(is_session_expired(
            now - Duration::hours(SESSION_TTL_HOURS) - Duration::seconds(1),
            now
        ));
    }
}
