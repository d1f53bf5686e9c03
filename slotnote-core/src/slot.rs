//! Time slots selected on the calendar.

use chrono::{DateTime, Duration, SubsecRound, Utc};

use crate::error::{SlotnoteError, SlotnoteResult};

/// A start/end range on the calendar, the anchor for a new note.
///
/// Instants are kept at millisecond precision, which is what the stored
/// format can carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Slot {
    start: DateTime<Utc>,
    end: DateTime<Utc>,
}

impl Slot {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> SlotnoteResult<Self> {
        if end < start {
            return Err(SlotnoteError::InvalidSlot {
                start: start.to_rfc3339(),
                reason: format!("end {} is before start", end.to_rfc3339()),
            });
        }

        Ok(Slot {
            start: start.trunc_subsecs(3),
            end: end.trunc_subsecs(3),
        })
    }

    /// Slot starting at `start` and lasting `length`.
    pub fn starting_at(start: DateTime<Utc>, length: Duration) -> SlotnoteResult<Self> {
        let end = start
            .checked_add_signed(length)
            .ok_or_else(|| SlotnoteError::InvalidSlot {
                start: start.to_rfc3339(),
                reason: format!("a length of {length} puts the end out of range"),
            })?;
        Self::new(start, end)
    }

    pub fn start(&self) -> DateTime<Utc> {
        self.start
    }

    pub fn end(&self) -> DateTime<Utc> {
        self.end
    }

    pub fn duration(&self) -> Duration {
        self.end - self.start
    }

    /// Whether this slot overlaps the half-open range `[from, to)`.
    pub fn overlaps(&self, from: DateTime<Utc>, to: DateTime<Utc>) -> bool {
        overlaps(self.start, self.end, from, to)
    }
}

/// Whether `[start, end)` overlaps `[from, to)`. A zero-length range counts
/// as the single instant `start`.
pub fn overlaps(
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    from: DateTime<Utc>,
    to: DateTime<Utc>,
) -> bool {
    if start == end {
        return start >= from && start < to;
    }
    start < to && end > from
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_rejects_end_before_start() {
        let start = Utc.with_ymd_and_hms(2025, 3, 20, 10, 0, 0).unwrap();
        let end = Utc.with_ymd_and_hms(2025, 3, 20, 9, 0, 0).unwrap();
        assert!(matches!(
            Slot::new(start, end),
            Err(SlotnoteError::InvalidSlot { .. })
        ));
    }

    #[test]
    fn test_zero_length_slot_is_allowed() {
        let at = Utc.with_ymd_and_hms(2025, 3, 20, 10, 0, 0).unwrap();
        let slot = Slot::new(at, at).unwrap();
        assert_eq!(slot.duration(), Duration::zero());
    }

    #[test]
    fn test_truncates_to_milliseconds() {
        let start = Utc.timestamp_nanos(1_742_464_800_123_456_789);
        let slot = Slot::starting_at(start, Duration::minutes(30)).unwrap();
        assert_eq!(slot.start().timestamp_subsec_nanos(), 123_000_000);
        assert_eq!(slot.end().timestamp_subsec_nanos(), 123_000_000);
    }

    #[test]
    fn test_overlaps() {
        let start = Utc.with_ymd_and_hms(2025, 3, 20, 10, 0, 0).unwrap();
        let slot = Slot::starting_at(start, Duration::minutes(30)).unwrap();

        assert!(slot.overlaps(start - Duration::hours(1), start + Duration::minutes(1)));
        assert!(!slot.overlaps(start + Duration::hours(1), start + Duration::hours(2)));
        assert!(!slot.overlaps(start - Duration::hours(1), start));
        // Ending exactly where the range begins is not an overlap.
        assert!(!slot.overlaps(slot.end(), slot.end() + Duration::days(1)));
    }

    #[test]
    fn test_zero_length_slot_overlaps_at_its_instant() {
        let at = Utc.with_ymd_and_hms(2025, 3, 21, 0, 0, 0).unwrap();
        let slot = Slot::new(at, at).unwrap();

        assert!(slot.overlaps(at, at + Duration::days(1)));
        assert!(!slot.overlaps(at - Duration::days(1), at));
    }

    #[test]
    fn test_starting_at_rejects_overflowing_length() {
        let start = Utc.with_ymd_and_hms(2025, 3, 20, 10, 0, 0).unwrap();
        let length = Duration::try_days(100_000_000).unwrap();

        let err = Slot::starting_at(start, length).unwrap_err();
        assert!(matches!(err, SlotnoteError::InvalidSlot { .. }));
        assert!(err.to_string().contains("out of range"));
    }
}
