/// Returns the current Unix timestamp in milliseconds.
pub fn current_unix_timestamp_ms() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis()
        .try_into()
        .unwrap_or(u64::MAX)
}

/// Parses an RFC 3339 timestamp into Unix milliseconds.
///
/// Pre-epoch or unparseable values yield `None`; callers ordering by
/// creation time treat those as the oldest possible entries.
pub fn parse_rfc3339_to_unix_ms(raw: &str) -> Option<u64> {
    let parsed = chrono::DateTime::parse_from_rfc3339(raw.trim()).ok()?;
    u64::try_from(parsed.timestamp_millis()).ok()
}

#[cfg(test)]
mod tests {
    use super::{current_unix_timestamp_ms, parse_rfc3339_to_unix_ms};

    #[test]
    fn unit_parse_rfc3339_to_unix_ms_handles_utc_and_offsets() {
        assert_eq!(
            parse_rfc3339_to_unix_ms("1970-01-01T00:00:01Z"),
            Some(1_000)
        );
        assert_eq!(
            parse_rfc3339_to_unix_ms("1970-01-01T01:00:01+01:00"),
            Some(1_000)
        );
    }

    #[test]
    fn regression_parse_rfc3339_to_unix_ms_rejects_garbage_and_pre_epoch() {
        assert_eq!(parse_rfc3339_to_unix_ms("yesterday"), None);
        assert_eq!(parse_rfc3339_to_unix_ms("1969-12-31T23:59:59Z"), None);
    }

    #[test]
    fn unit_current_unix_timestamp_ms_is_monotonic_enough() {
        let first = current_unix_timestamp_ms();
        let second = current_unix_timestamp_ms();
        assert!(second >= first);
    }
}
