//! Time utilities for Custodia.
//!
//! All timestamps are Unix epoch seconds (u64).

/// Return the current time as seconds since Unix epoch.
pub fn now_secs() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

/// Convert epoch seconds to an RFC 3339 string.
pub fn secs_to_rfc3339(secs: u64) -> String {
    let dt =
        chrono::DateTime::from_timestamp(secs as i64, 0).unwrap_or(chrono::DateTime::UNIX_EPOCH);
    dt.to_rfc3339()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_secs_to_rfc3339_epoch() {
        assert_eq!(secs_to_rfc3339(0), "1970-01-01T00:00:00+00:00");
    }

    #[test]
    fn test_secs_to_rfc3339_known_instant() {
        assert_eq!(secs_to_rfc3339(1_700_000_000), "2023-11-14T22:13:20+00:00");
    }

    #[test]
    fn test_now_secs_is_past_epoch() {
        assert!(now_secs() > 1_700_000_000);
    }
}
