//! Text formatting helpers shared by the view-model builders.
//!
//! All functions are pure: the current time is always passed in.

use std::sync::atomic::{AtomicU64, Ordering};

use chrono::{DateTime, Local, NaiveDateTime, TimeZone};

const CLOCK_FORMAT: &str = "%I:%M %p";

const NAIVE_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

/// Hour:minute label for a backend timestamp, e.g. `06:05 PM`.
///
/// Timestamps with an offset are converted to local time; naive timestamps
/// are taken as wall-clock time. Anything unparseable is shown as sent.
pub fn clock_label(timestamp: &str) -> String {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(timestamp) {
        return parsed.with_timezone(&Local).format(CLOCK_FORMAT).to_string();
    }

    NAIVE_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(timestamp, format).ok())
        .map(|naive| naive.format(CLOCK_FORMAT).to_string())
        .unwrap_or_else(|| timestamp.to_string())
}

/// Hour:minute label for a local instant given in epoch milliseconds
pub fn clock_label_at(now_millis: u64) -> String {
    local_time(now_millis)
        .map(|time| time.format(CLOCK_FORMAT).to_string())
        .unwrap_or_default()
}

/// Date and time label used in downloaded file headers
pub fn datetime_label_at(now_millis: u64) -> String {
    local_time(now_millis)
        .map(|time| time.format("%m/%d/%Y, %I:%M:%S %p").to_string())
        .unwrap_or_default()
}

fn local_time(now_millis: u64) -> Option<DateTime<Local>> {
    let millis = i64::try_from(now_millis).ok()?;
    Local.timestamp_millis_opt(millis).single()
}

pub fn default_session_name(now_millis: u64) -> String {
    format!("session_{now_millis}")
}

pub fn download_filename(prefix: &str, stamp: u64, extension: &str) -> String {
    format!("{prefix}-{stamp}.{extension}")
}

/// Strictly increasing download stamps.
///
/// Follows the clock, but two downloads in the same millisecond still get
/// distinct stamps.
#[derive(Debug, Default)]
pub struct StampSequence {
    last: AtomicU64,
}

impl StampSequence {
    pub fn next(&self, now_millis: u64) -> u64 {
        let mut last = self.last.load(Ordering::SeqCst);
        loop {
            let candidate = now_millis.max(last.saturating_add(1));
            match self
                .last
                .compare_exchange(last, candidate, Ordering::SeqCst, Ordering::SeqCst)
            {
                Ok(_) => return candidate,
                Err(actual) => last = actual,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn naive_timestamps_are_wall_clock() {
        assert_eq!(clock_label("2024-05-01T18:05:00"), "06:05 PM");
        assert_eq!(clock_label("2024-05-01T09:30:12.123456"), "09:30 AM");
        assert_eq!(clock_label("2024-05-01 00:15:00"), "12:15 AM");
    }

    #[test]
    fn unparseable_timestamps_render_verbatim() {
        assert_eq!(clock_label("dusk"), "dusk");
        assert_eq!(clock_label(""), "");
    }

    #[test]
    fn offset_timestamps_convert_to_local_time() {
        let expected = DateTime::parse_from_rfc3339("2024-05-01T18:05:00Z")
            .unwrap()
            .with_timezone(&Local)
            .format("%I:%M %p")
            .to_string();
        assert_eq!(clock_label("2024-05-01T18:05:00Z"), expected);
    }

    #[test]
    fn stamps_strictly_increase_within_one_millisecond() {
        let stamps = StampSequence::default();
        let first = stamps.next(1_000);
        let second = stamps.next(1_000);
        let third = stamps.next(999);
        let fourth = stamps.next(5_000);

        assert_eq!(first, 1_000);
        assert!(second > first);
        assert!(third > second);
        assert_eq!(fourth, 5_000);
        assert_eq!(
            download_filename("lora-dataset", second, "json"),
            "lora-dataset-1001.json"
        );
    }

    #[test]
    fn session_name_uses_epoch_millis() {
        assert_eq!(default_session_name(1_714_586_700_000), "session_1714586700000");
    }
}
