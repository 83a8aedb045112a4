use super::snapshot::SnapshotError;
use crate::workflows::crm::{BaseLead, LeadDate, PipelineStatus};
use chrono::{DateTime, Duration, NaiveDate, Utc};
use chrono_tz::Tz;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

/// Days after today still covered by the waiting-return window.
pub const WAITING_RETURN_WINDOW_DAYS: i64 = 3;

/// Zero-padded `YYYY-MM-DD` day in a specific timezone. Ordering is plain string ordering.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct DayKey(String);

impl DayKey {
    pub fn of(day: NaiveDate) -> Self {
        Self(day.format("%Y-%m-%d").to_string())
    }

    pub fn of_date(date: &LeadDate, tz: &Tz) -> Self {
        Self::of(date.calendar_day(tz))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DayKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Parsed IANA zones, built once at startup and passed by reference.
#[derive(Debug, Clone)]
pub struct TimezoneRegistry {
    default_name: String,
    zones: BTreeMap<String, Tz>,
}

impl TimezoneRegistry {
    pub fn new(default_name: &str) -> Result<Self, SnapshotError> {
        Self::with_zones(default_name, [])
    }

    /// Registry preloaded with extra zones in addition to the default.
    pub fn with_zones<'a>(
        default_name: &str,
        extra: impl IntoIterator<Item = &'a str>,
    ) -> Result<Self, SnapshotError> {
        let default_name = default_name.trim();
        let mut zones = BTreeMap::new();
        zones.insert(default_name.to_string(), parse_zone(default_name)?);
        for name in extra {
            let name = name.trim();
            zones.insert(name.to_string(), parse_zone(name)?);
        }

        Ok(Self {
            default_name: default_name.to_string(),
            zones,
        })
    }

    pub fn default_name(&self) -> &str {
        &self.default_name
    }

    /// Resolves a requested zone name, falling back to the default when none is given.
    /// Unregistered names are parsed for this call only.
    pub fn resolve(&self, name: Option<&str>) -> Result<(String, Tz), SnapshotError> {
        let name = name
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .unwrap_or(self.default_name.as_str());

        match self.zones.get(name) {
            Some(tz) => Ok((name.to_string(), *tz)),
            None => parse_zone(name).map(|tz| (name.to_string(), tz)),
        }
    }
}

fn parse_zone(name: &str) -> Result<Tz, SnapshotError> {
    name.parse::<Tz>()
        .map_err(|_| SnapshotError::UnknownTimezone(name.to_string()))
}

/// "Now" pinned to a timezone, with today's day-key precomputed.
#[derive(Debug, Clone)]
pub struct CalendarContext {
    pub now: DateTime<Utc>,
    pub tz: Tz,
    pub today: DayKey,
    pub waiting_window_end: DayKey,
}

impl CalendarContext {
    pub fn new(now: DateTime<Utc>, tz: Tz) -> Self {
        let local_day = now.with_timezone(&tz).date_naive();
        let today = DayKey::of(local_day);
        // Calendar days, not elapsed hours, so DST shifts cannot stretch the window.
        let waiting_window_end =
            DayKey::of(local_day + Duration::days(WAITING_RETURN_WINDOW_DAYS));
        Self {
            now,
            tz,
            today,
            waiting_window_end,
        }
    }

    pub fn day_key(&self, date: &LeadDate) -> DayKey {
        DayKey::of_date(date, &self.tz)
    }

    pub fn days_since(&self, date: &LeadDate) -> f64 {
        date.days_since(self.now, &self.tz)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DueState {
    DueToday,
    Overdue,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DueAnchor {
    NextAction,
    ChaseDue,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DueClassification {
    pub state: DueState,
    pub anchor: DueAnchor,
    pub day: DayKey,
}

/// Due-today / overdue classification against the lead's single effective anchor.
/// A lead is never both due today and overdue.
pub fn classify_due(lead: &BaseLead, calendar: &CalendarContext) -> Option<DueClassification> {
    if lead.status_pipeline == PipelineStatus::Closed {
        return None;
    }

    let (anchor, date) = match (lead.next_action(), lead.chase_anchor()) {
        (Some(date), _) => (DueAnchor::NextAction, date),
        (None, Some(date)) => (DueAnchor::ChaseDue, date),
        (None, None) => return None,
    };

    let day = calendar.day_key(date);
    let state = if day == calendar.today {
        DueState::DueToday
    } else if day < calendar.today {
        DueState::Overdue
    } else {
        return None;
    };

    Some(DueClassification { state, anchor, day })
}

/// Awaiting-reply leads whose chase date falls within `[today, today + 3 days]`.
/// Independent of `classify_due`: a chase due today is both due and waiting.
pub fn is_waiting_return(lead: &BaseLead, calendar: &CalendarContext) -> bool {
    if lead.status_pipeline != PipelineStatus::AwaitingReply {
        return false;
    }

    lead.chase_due_at.as_ref().map_or(false, |date| {
        let day = calendar.day_key(date);
        day >= calendar.today && day <= calendar.waiting_window_end
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sao_paulo() -> Tz {
        "America/Sao_Paulo".parse().expect("zone")
    }

    fn instant(raw: &str) -> DateTime<Utc> {
        DateTime::parse_from_rfc3339(raw)
            .expect("rfc3339")
            .with_timezone(&Utc)
    }

    fn date(raw: &str) -> LeadDate {
        LeadDate::parse(raw).expect("lead date")
    }

    #[test]
    fn today_uses_local_calendar_day() {
        let calendar = CalendarContext::new(instant("2024-05-02T01:30:00Z"), sao_paulo());
        assert_eq!(calendar.today.as_str(), "2024-05-01");
        assert_eq!(calendar.waiting_window_end.as_str(), "2024-05-04");

        let utc: Tz = "UTC".parse().expect("zone");
        let calendar = CalendarContext::new(instant("2024-05-02T01:30:00Z"), utc);
        assert_eq!(calendar.today.as_str(), "2024-05-02");
    }

    #[test]
    fn waiting_window_counts_calendar_days_across_dst() {
        // Clocks spring forward on 2024-03-10 in New York; local now is 2024-03-07 23:30.
        let new_york: Tz = "America/New_York".parse().expect("zone");
        let calendar = CalendarContext::new(instant("2024-03-08T04:30:00Z"), new_york);
        assert_eq!(calendar.today.as_str(), "2024-03-07");
        assert_eq!(calendar.waiting_window_end.as_str(), "2024-03-10");

        let mut lead = BaseLead::new("l1", "Ana", PipelineStatus::AwaitingReply);
        lead.chase_due_at = Some(date("2024-03-10"));
        assert!(is_waiting_return(&lead, &calendar));
        lead.chase_due_at = Some(date("2024-03-11"));
        assert!(!is_waiting_return(&lead, &calendar));
    }

    #[test]
    fn next_action_today_is_due() {
        let calendar = CalendarContext::new(instant("2024-05-01T15:00:00Z"), sao_paulo());
        let mut lead = BaseLead::new("l1", "Ana", PipelineStatus::InConversation);
        lead.next_action_at = Some(date("2024-05-01T23:59:00Z"));

        let due = classify_due(&lead, &calendar).expect("classified");
        assert_eq!(due.state, DueState::DueToday);
        assert_eq!(due.anchor, DueAnchor::NextAction);
    }

    #[test]
    fn chase_due_applies_only_without_next_action() {
        let calendar = CalendarContext::new(instant("2024-05-01T15:00:00Z"), sao_paulo());
        let mut lead = BaseLead::new("l1", "Ana", PipelineStatus::AwaitingReply);
        lead.chase_due_at = Some(date("2024-04-29"));

        let overdue = classify_due(&lead, &calendar).expect("classified");
        assert_eq!(overdue.state, DueState::Overdue);
        assert_eq!(overdue.anchor, DueAnchor::ChaseDue);

        lead.next_action_at = Some(date("2024-05-10"));
        assert!(classify_due(&lead, &calendar).is_none());
    }

    #[test]
    fn chase_due_ignored_outside_followup_stages() {
        let calendar = CalendarContext::new(instant("2024-05-01T15:00:00Z"), sao_paulo());
        let mut lead = BaseLead::new("l1", "Ana", PipelineStatus::Proposal);
        lead.chase_due_at = Some(date("2024-04-29"));
        assert!(classify_due(&lead, &calendar).is_none());
    }

    #[test]
    fn closed_leads_are_not_classified() {
        let calendar = CalendarContext::new(instant("2024-05-01T15:00:00Z"), sao_paulo());
        let mut lead = BaseLead::new("l1", "Ana", PipelineStatus::Closed);
        lead.next_action_at = Some(date("2024-04-01"));
        assert!(classify_due(&lead, &calendar).is_none());
    }

    #[test]
    fn waiting_return_window_is_inclusive() {
        let calendar = CalendarContext::new(instant("2024-05-01T15:00:00Z"), sao_paulo());
        let mut lead = BaseLead::new("l1", "Ana", PipelineStatus::AwaitingReply);

        for (raw, expected) in [
            ("2024-04-30", false),
            ("2024-05-01", true),
            ("2024-05-04", true),
            ("2024-05-05", false),
        ] {
            lead.chase_due_at = Some(date(raw));
            assert_eq!(is_waiting_return(&lead, &calendar), expected, "{raw}");
        }

        lead.status_pipeline = PipelineStatus::Contacted;
        lead.chase_due_at = Some(date("2024-05-02"));
        assert!(!is_waiting_return(&lead, &calendar));
    }

    #[test]
    fn registry_resolves_default_and_rejects_unknown() {
        let registry = TimezoneRegistry::with_zones("America/Sao_Paulo", ["UTC"]).expect("registry");
        let (name, _) = registry.resolve(None).expect("default");
        assert_eq!(name, "America/Sao_Paulo");
        let (name, tz) = registry.resolve(Some(" America/Manaus ")).expect("parsed on demand");
        assert_eq!(name, "America/Manaus");
        assert_eq!(tz, chrono_tz::America::Manaus);

        let err = registry.resolve(Some("Nowhere/Land")).expect_err("unknown zone");
        assert!(matches!(err, SnapshotError::UnknownTimezone(ref zone) if zone == "Nowhere/Land"));
    }
}
