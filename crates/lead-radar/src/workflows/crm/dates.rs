use chrono::{
    DateTime, Duration, LocalResult, NaiveDate, NaiveDateTime, SecondsFormat, TimeZone, Utc,
};
use chrono_tz::Tz;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Date anchor as stored by the backend: either a plain calendar day or an absolute instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LeadDate {
    Day(NaiveDate),
    Instant(DateTime<Utc>),
}

impl LeadDate {
    /// Accepts RFC 3339, database timestamps (`2024-05-01 10:00:00+00`) and `YYYY-MM-DD`.
    pub fn parse(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return None;
        }

        if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
            return Some(Self::Instant(dt.with_timezone(&Utc)));
        }

        for format in ["%Y-%m-%d %H:%M:%S%.f%#z", "%Y-%m-%dT%H:%M:%S%.f%#z"] {
            if let Ok(dt) = DateTime::parse_from_str(trimmed, format) {
                return Some(Self::Instant(dt.with_timezone(&Utc)));
            }
        }

        for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
            if let Ok(naive) = NaiveDateTime::parse_from_str(trimmed, format) {
                return Some(Self::Instant(naive.and_utc()));
            }
        }

        NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
            .ok()
            .map(Self::Day)
    }

    /// Calendar day in `tz`. Plain days are already calendar days and are returned as-is.
    pub fn calendar_day(&self, tz: &Tz) -> NaiveDate {
        match self {
            Self::Day(day) => *day,
            Self::Instant(instant) => instant.with_timezone(tz).date_naive(),
        }
    }

    /// Absolute instant; plain days resolve to local midnight in `tz`.
    pub fn instant(&self, tz: &Tz) -> DateTime<Utc> {
        match self {
            Self::Instant(instant) => *instant,
            Self::Day(day) => {
                let midnight = day.and_hms_opt(0, 0, 0).unwrap_or_default();
                match tz.from_local_datetime(&midnight) {
                    LocalResult::Single(local) | LocalResult::Ambiguous(local, _) => {
                        local.with_timezone(&Utc)
                    }
                    // DST gap at midnight: the day starts an hour later.
                    LocalResult::None => tz
                        .from_local_datetime(&(midnight + Duration::hours(1)))
                        .earliest()
                        .map(|local| local.with_timezone(&Utc))
                        .unwrap_or_else(|| midnight.and_utc()),
                }
            }
        }
    }

    /// Fractional days elapsed from this anchor until `now` (negative for future anchors).
    pub fn days_since(&self, now: DateTime<Utc>, tz: &Tz) -> f64 {
        let elapsed = now - self.instant(tz);
        elapsed.num_seconds() as f64 / 86_400.0
    }

    /// ISO text used for lexicographic comparisons and serialization.
    pub fn sort_key(&self) -> String {
        match self {
            Self::Day(day) => day.format("%Y-%m-%d").to_string(),
            Self::Instant(instant) => instant.to_rfc3339_opts(SecondsFormat::Millis, true),
        }
    }
}

impl fmt::Display for LeadDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.sort_key())
    }
}

impl Serialize for LeadDate {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.sort_key())
    }
}

impl<'de> Deserialize<'de> for LeadDate {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        LeadDate::parse(&raw)
            .ok_or_else(|| serde::de::Error::custom(format!("'{raw}' is not a recognised date")))
    }
}
