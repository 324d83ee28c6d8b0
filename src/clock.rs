//! Helpers for getting the current date on the server.

use time::{Date, OffsetDateTime, UtcOffset};

/// Get today's date in the server's local timezone.
///
/// Falls back to UTC when the local offset cannot be determined, which can
/// happen on multi-threaded Unix processes where reading the environment is
/// unsound.
pub(crate) fn today_local() -> Date {
    let offset = UtcOffset::current_local_offset().unwrap_or(UtcOffset::UTC);

    OffsetDateTime::now_utc().to_offset(offset).date()
}

#[cfg(test)]
mod clock_tests {
    use time::{Duration, OffsetDateTime};

    use super::today_local;

    #[test]
    fn today_is_within_a_day_of_utc() {
        let today = today_local();
        let utc_today = OffsetDateTime::now_utc().date();

        let difference = today - utc_today;
        assert!(difference.abs() <= Duration::days(1));
    }
}
