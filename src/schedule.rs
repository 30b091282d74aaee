//! ==============================================================================
//! schedule.rs - hourly time axis in local (fixed offset) time
//! ==============================================================================
//!
//! purpose:
//!     builds the ordered list of instants the feeder will generate readings for.
//!     one instant per local hour, from local midnight on the start date up to
//!     the last completed local hour. each instant gets a random minute/second
//!     offset so timestamps never land exactly on the hour.
//!
//! relationships:
//!     - used by: main.rs (builds the axis once at startup)
//!     - produces: ScheduledInstant, consumed by generator.rs and dispatch.rs
//!
//! ==============================================================================

use crate::error::ScheduleError;

use chrono::{
    DateTime, Datelike, Duration, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, TimeZone,
    Timelike, Utc,
};
use rand::Rng;

/// india standard time, UTC+05:30
pub const IST_OFFSET_MINUTES: i32 = 330;

/// one sample instant with its local calendar fields precomputed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScheduledInstant {
    pub utc: DateTime<Utc>,
    /// wall clock time at the site
    pub local: NaiveDateTime,
    /// local calendar day, the key for day-level state
    pub day_key: NaiveDate,
    /// 0-based local month
    pub month: u32,
    /// local hour of day (0-23)
    pub hour: u32,
}

impl ScheduledInstant {
    pub fn from_utc(utc: DateTime<Utc>, offset: FixedOffset) -> Self {
        let local = utc.with_timezone(&offset).naive_local();
        Self {
            utc,
            local,
            day_key: local.date(),
            month: local.month0(),
            hour: local.hour(),
        }
    }
}

/// parameters of the time axis
#[derive(Debug, Clone)]
pub struct TimeAxis {
    /// first local day (sampling starts at its midnight)
    pub start_date: NaiveDate,
    pub offset: FixedOffset,
    /// optional cap on the number of instants
    pub limit: Option<usize>,
}

impl TimeAxis {
    pub fn new(start_date: NaiveDate, utc_offset_minutes: i32) -> Result<Self, ScheduleError> {
        let offset = FixedOffset::east_opt(utc_offset_minutes * 60)
            .ok_or(ScheduleError::InvalidOffset(utc_offset_minutes))?;
        Ok(Self {
            start_date,
            offset,
            limit: None,
        })
    }

    pub fn with_limit(mut self, limit: Option<usize>) -> Self {
        self.limit = limit;
        self
    }

    /// local start of the current hour at `now`
    pub fn end_bound(&self, now: DateTime<Utc>) -> NaiveDateTime {
        let local = now.with_timezone(&self.offset).naive_local();
        let hour = NaiveTime::from_hms_opt(local.hour(), 0, 0).unwrap_or_default();
        local.date().and_time(hour)
    }

    /// build the instants from the start date up to the last completed local hour at `now`
    pub fn instants<R: Rng + ?Sized>(
        &self,
        now: DateTime<Utc>,
        rng: &mut R,
    ) -> Result<Vec<ScheduledInstant>, ScheduleError> {
        let start = self.start_date.and_time(NaiveTime::default());
        let end = self.end_bound(now);
        if start > end {
            return Err(ScheduleError::StartAfterEnd { start, end });
        }

        let step = Duration::hours(1);
        let latest_in_hour = Duration::minutes(59) + Duration::seconds(59);
        let capacity = ((end - start).num_hours() + 1) as usize;
        let capacity = self.limit.map_or(capacity, |n| n.min(capacity));
        let mut instants = Vec::with_capacity(capacity);

        let mut hour_start = start;
        while hour_start <= end && instants.len() < capacity {
            let minute = rng.gen_range(0..60);
            let second = rng.gen_range(0..60);
            let mut candidate = hour_start + Duration::minutes(minute) + Duration::seconds(second);
            if candidate > end {
                candidate = end.min(hour_start + latest_in_hour);
            }

            let local_minus_utc = Duration::seconds(self.offset.local_minus_utc() as i64);
            let utc = Utc.from_utc_datetime(&(candidate - local_minus_utc));
            instants.push(ScheduledInstant::from_utc(utc, self.offset));
            hour_start += step;
        }

        Ok(instants)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::HashSet;

    fn axis() -> TimeAxis {
        TimeAxis::new(NaiveDate::from_ymd_opt(2025, 7, 1).unwrap(), IST_OFFSET_MINUTES).unwrap()
    }

    fn utc(s: &str) -> DateTime<Utc> {
        DateTime::parse_from_rfc3339(s).unwrap().with_timezone(&Utc)
    }

    #[test]
    fn test_one_instant_per_local_hour() {
        let mut rng = StdRng::seed_from_u64(1);
        // 2025-07-03 10:45 IST
        let now = utc("2025-07-03T05:15:00Z");
        let instants = axis().instants(now, &mut rng).unwrap();

        // jul 1 00:00 .. jul 3 10:00 inclusive
        assert_eq!(instants.len(), 24 * 2 + 11);

        let hours: HashSet<_> = instants.iter().map(|i| (i.day_key, i.hour)).collect();
        assert_eq!(hours.len(), instants.len());

        for pair in instants.windows(2) {
            assert!(pair[0].utc < pair[1].utc);
        }
    }

    #[test]
    fn test_spans_start_to_last_completed_hour() {
        let mut rng = StdRng::seed_from_u64(2);
        let now = utc("2025-07-02T00:10:00Z"); // 05:40 IST
        let instants = axis().instants(now, &mut rng).unwrap();

        let first = instants.first().unwrap();
        assert_eq!(first.day_key, NaiveDate::from_ymd_opt(2025, 7, 1).unwrap());
        assert_eq!(first.hour, 0);

        // the final hour is clamped to the end bound, i.e. 05:00 IST exactly
        let last = instants.last().unwrap();
        assert_eq!(last.local, axis().end_bound(now));
        assert_eq!(last.hour, 5);
        assert!(last.utc <= now);
    }

    #[test]
    fn test_local_fields_follow_offset() {
        let instant = ScheduledInstant::from_utc(
            utc("2025-06-30T18:31:00Z"),
            FixedOffset::east_opt(IST_OFFSET_MINUTES * 60).unwrap(),
        );
        assert_eq!(instant.day_key, NaiveDate::from_ymd_opt(2025, 7, 1).unwrap());
        assert_eq!(instant.month, 6);
        assert_eq!(instant.hour, 0);
    }

    #[test]
    fn test_limit_truncates() {
        let mut rng = StdRng::seed_from_u64(3);
        let now = utc("2025-07-10T00:00:00Z");
        let instants = axis().with_limit(Some(5)).instants(now, &mut rng).unwrap();
        assert_eq!(instants.len(), 5);
        assert_eq!(instants[4].hour, 4);
    }

    #[test]
    fn test_start_after_now_is_an_error() {
        let mut rng = StdRng::seed_from_u64(4);
        let now = utc("2025-06-01T00:00:00Z");
        let err = axis().instants(now, &mut rng).unwrap_err();
        assert!(matches!(err, ScheduleError::StartAfterEnd { .. }));
    }

    #[test]
    fn test_invalid_offset() {
        let date = NaiveDate::from_ymd_opt(2025, 7, 1).unwrap();
        assert_eq!(
            TimeAxis::new(date, 24 * 60).unwrap_err(),
            ScheduleError::InvalidOffset(24 * 60)
        );
    }
}
