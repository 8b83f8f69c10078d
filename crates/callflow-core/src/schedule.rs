//! Time rules and the time window matcher.
//!
//! A [`TimeRule`] describes one window during which a routing edge is
//! eligible. Rules come in two flavors:
//!
//! - **Specific-date rules** carry a literal calendar range (a holiday,
//!   a one-off override). When the date bound fails, the whole rule
//!   fails, and the day-of-week field is never consulted.
//! - **Recurring rules** carry a day-of-week plus an optional
//!   time-of-day window, evaluated only when no specific date is set.
//!
//! Matching is pure and deterministic: `(rule, instant) -> bool` with
//! no side effects, which makes this the unit-testing surface for all
//! calendar and clock edge cases.
//!
//! The wire format uses provisioning-API conventions that are
//! normalized during deserialization: date bounds of `"now"` /
//! `"never"` mean "not a specific-date rule", a day-of-week of `"*"`
//! (or a numeric string) is accepted alongside plain integers, and
//! anything outside `1..=7` is rejected up front rather than silently
//! coerced at match time.

use chrono::{Datelike, NaiveDate, NaiveDateTime, NaiveTime, Timelike};
use serde::{Deserialize, Serialize};

/// One eligibility window on a routing edge's schedule.
///
/// An empty rule (all fields unset) matches every instant.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TimeRule {
    /// First day of a specific-date range, inclusive. `None` for
    /// recurring rules (the wire sentinels `"now"`/`"never"` map here).
    #[serde(with = "date_bound", skip_serializing_if = "Option::is_none")]
    pub start_date: Option<NaiveDate>,
    /// Last day of a specific-date range, inclusive. `None` leaves the
    /// range unbounded above.
    #[serde(with = "date_bound", skip_serializing_if = "Option::is_none")]
    pub end_date: Option<NaiveDate>,
    /// ISO day of week, `1` = Monday through `7` = Sunday. `None`
    /// (or `"*"` on the wire) matches any day.
    #[serde(with = "day_of_week", skip_serializing_if = "Option::is_none")]
    pub day_of_week: Option<u8>,
    /// Start of the daily window, inclusive, minute resolution.
    #[serde(with = "time_bound", skip_serializing_if = "Option::is_none")]
    pub start_time: Option<NaiveTime>,
    /// End of the daily window, inclusive, minute resolution. An end
    /// earlier than the start never matches: windows do not wrap past
    /// midnight.
    #[serde(with = "time_bound", skip_serializing_if = "Option::is_none")]
    pub end_time: Option<NaiveTime>,
}

impl TimeRule {
    /// Whether this rule is bound to a literal calendar range rather
    /// than a weekly recurrence.
    pub fn is_specific_date(&self) -> bool {
        self.start_date.is_some()
    }

    /// Evaluates this rule against a simulated instant.
    ///
    /// The instant's time-of-day is truncated to minute resolution
    /// before comparison, so `17:00:30` still falls inside a window
    /// ending at `17:00`.
    pub fn matches(&self, instant: NaiveDateTime) -> bool {
        if let Some(start) = self.start_date {
            let date = instant.date();
            if date < start {
                return false;
            }
            if let Some(end) = self.end_date {
                if date > end {
                    return false;
                }
            }
        } else if let Some(day) = self.day_of_week {
            // chrono numbers Monday 1 .. Sunday 7, same as the wire.
            if instant.weekday().number_from_monday() != u32::from(day) {
                return false;
            }
        }

        if let (Some(start), Some(end)) = (self.start_time, self.end_time) {
            let minute = truncate_to_minute(instant.time());
            if minute < start || minute > end {
                return false;
            }
        }

        true
    }
}

fn truncate_to_minute(time: NaiveTime) -> NaiveTime {
    NaiveTime::from_hms_opt(time.hour(), time.minute(), 0).unwrap_or(time)
}

mod date_bound {
    use chrono::NaiveDate;
    use serde::{Deserialize, Deserializer, Serializer};

    const FORMAT: &str = "%Y-%m-%d";

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = Option::<String>::deserialize(deserializer)?;
        match raw.as_deref().map(str::trim) {
            None | Some("") | Some("now") | Some("never") => Ok(None),
            Some(text) => NaiveDate::parse_from_str(text, FORMAT)
                .map(Some)
                .map_err(|_| {
                    serde::de::Error::custom(format!("invalid date bound: {text:?}"))
                }),
        }
    }

    pub fn serialize<S>(value: &Option<NaiveDate>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(date) => serializer.serialize_str(&date.format(FORMAT).to_string()),
            None => serializer.serialize_none(),
        }
    }
}

mod day_of_week {
    use serde::{Deserialize, Deserializer, Serializer};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(i64),
        Text(String),
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<u8>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let day = match Option::<Raw>::deserialize(deserializer)? {
            None => return Ok(None),
            Some(Raw::Number(n)) => n,
            Some(Raw::Text(text)) => {
                let text = text.trim();
                if text.is_empty() || text == "*" {
                    return Ok(None);
                }
                text.parse::<i64>().map_err(|_| {
                    serde::de::Error::custom(format!("invalid day of week: {text:?}"))
                })?
            }
        };

        if (1..=7).contains(&day) {
            Ok(Some(day as u8))
        } else {
            Err(serde::de::Error::custom(format!(
                "day of week out of range 1-7: {day}"
            )))
        }
    }

    pub fn serialize<S>(value: &Option<u8>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(day) => serializer.serialize_u8(*day),
            None => serializer.serialize_none(),
        }
    }
}

mod time_bound {
    use chrono::NaiveTime;
    use serde::{Deserialize, Deserializer, Serializer};

    const FORMAT: &str = "%H:%M";

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<NaiveTime>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = Option::<String>::deserialize(deserializer)?;
        match raw.as_deref().map(str::trim) {
            None | Some("") => Ok(None),
            Some(text) => NaiveTime::parse_from_str(text, FORMAT)
                .or_else(|_| NaiveTime::parse_from_str(text, "%H:%M:%S"))
                .map(Some)
                .map_err(|_| {
                    serde::de::Error::custom(format!("invalid time bound: {text:?}"))
                }),
        }
    }

    pub fn serialize<S>(value: &Option<NaiveTime>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(time) => serializer.serialize_str(&time.format(FORMAT).to_string()),
            None => serializer.serialize_none(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_sentinels_normalize_to_none() {
        let rule: TimeRule = serde_json::from_str(
            r#"{"startDate": "now", "endDate": "never", "dayOfWeek": "*"}"#,
        )
        .unwrap();
        assert_eq!(rule, TimeRule::default());
        assert!(!rule.is_specific_date());
    }

    #[test]
    fn test_wire_day_of_week_accepts_number_and_string() {
        let rule: TimeRule = serde_json::from_str(r#"{"dayOfWeek": 3}"#).unwrap();
        assert_eq!(rule.day_of_week, Some(3));

        let rule: TimeRule = serde_json::from_str(r#"{"dayOfWeek": "7"}"#).unwrap();
        assert_eq!(rule.day_of_week, Some(7));
    }

    #[test]
    fn test_wire_day_of_week_out_of_range_rejected() {
        assert!(serde_json::from_str::<TimeRule>(r#"{"dayOfWeek": 0}"#).is_err());
        assert!(serde_json::from_str::<TimeRule>(r#"{"dayOfWeek": 8}"#).is_err());
        assert!(serde_json::from_str::<TimeRule>(r#"{"dayOfWeek": "mon"}"#).is_err());
    }

    #[test]
    fn test_wire_full_rule_parses() {
        let rule: TimeRule = serde_json::from_str(
            r#"{"startDate": "2024-12-24", "endDate": "2024-12-26",
                "startTime": "08:00", "endTime": "18:00"}"#,
        )
        .unwrap();
        assert!(rule.is_specific_date());
        assert_eq!(rule.start_date, NaiveDate::from_ymd_opt(2024, 12, 24));
        assert_eq!(rule.end_time, NaiveTime::from_hms_opt(18, 0, 0));
    }

    #[test]
    fn test_wire_garbage_date_rejected() {
        assert!(serde_json::from_str::<TimeRule>(r#"{"startDate": "12/24/2024"}"#).is_err());
    }

    #[test]
    fn test_serialize_round_trip() {
        let rule: TimeRule = serde_json::from_str(
            r#"{"dayOfWeek": 5, "startTime": "09:00", "endTime": "17:00"}"#,
        )
        .unwrap();
        let json = serde_json::to_string(&rule).unwrap();
        let back: TimeRule = serde_json::from_str(&json).unwrap();
        assert_eq!(rule, back);
    }
}
