use serde::{Deserialize, Serialize};
use time::{Duration, OffsetDateTime, PrimitiveDateTime, UtcOffset};

/// Look-back windows offered by the history and dashboard endpoints.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimeRange {
    LastDay,
    #[default]
    #[serde(rename = "last_7_days")]
    Last7Days,
    #[serde(rename = "last_15_days")]
    Last15Days,
    #[serde(rename = "last_30_days")]
    Last30Days,
    #[serde(rename = "last_3_months")]
    Last3Months,
    #[serde(rename = "last_6_months")]
    Last6Months,
    #[serde(rename = "last_12_months")]
    Last12Months,
    AllTime,
}

impl TimeRange {
    pub fn days(self) -> Option<i64> {
        match self {
            TimeRange::LastDay => Some(1),
            TimeRange::Last7Days => Some(7),
            TimeRange::Last15Days => Some(15),
            TimeRange::Last30Days => Some(30),
            TimeRange::Last3Months => Some(90),
            TimeRange::Last6Months => Some(180),
            TimeRange::Last12Months => Some(365),
            TimeRange::AllTime => None,
        }
    }

    /// Inclusive lower bound: local midnight of `today - days`.
    pub fn start(self, now: OffsetDateTime, offset: UtcOffset) -> OffsetDateTime {
        match self.days() {
            Some(days) => {
                let today = now.to_offset(offset).date();
                (today - Duration::days(days))
                    .midnight()
                    .assume_offset(offset)
            }
            None => OffsetDateTime::UNIX_EPOCH,
        }
    }
}

/// Drop the zone from an instant after moving it into the reporting offset.
pub fn to_local(at: OffsetDateTime, offset: UtcOffset) -> PrimitiveDateTime {
    let local = at.to_offset(offset);
    PrimitiveDateTime::new(local.date(), local.time())
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::{datetime, offset};

    #[test]
    fn default_is_last_week() {
        assert_eq!(TimeRange::default(), TimeRange::Last7Days);
    }

    #[test]
    fn parses_query_values() {
        let r: TimeRange = serde_json::from_str(r#""last_3_months""#).unwrap();
        assert_eq!(r, TimeRange::Last3Months);
        let r: TimeRange = serde_json::from_str(r#""all_time""#).unwrap();
        assert_eq!(r, TimeRange::AllTime);
        let r: TimeRange = serde_json::from_str(r#""last_day""#).unwrap();
        assert_eq!(r, TimeRange::LastDay);
        assert!(serde_json::from_str::<TimeRange>(r#""fortnight""#).is_err());
    }

    #[test]
    fn start_is_local_midnight() {
        let now = datetime!(2024-05-10 01:30 UTC);
        let start = TimeRange::Last7Days.start(now, offset!(-5));
        // 2024-05-09 20:30 local, minus seven days
        assert_eq!(start, datetime!(2024-05-02 00:00 -5));
        assert_eq!(TimeRange::LastDay.start(now, UtcOffset::UTC), datetime!(2024-05-09 00:00 UTC));
    }

    #[test]
    fn all_time_starts_at_epoch() {
        let now = datetime!(2024-05-10 12:00 UTC);
        assert_eq!(TimeRange::AllTime.start(now, UtcOffset::UTC), OffsetDateTime::UNIX_EPOCH);
    }

    #[test]
    fn to_local_shifts_date() {
        let at = datetime!(2024-05-10 02:15 UTC);
        assert_eq!(to_local(at, offset!(-5)), datetime!(2024-05-09 21:15));
    }
}
