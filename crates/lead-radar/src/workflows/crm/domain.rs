use super::dates::LeadDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// Identifier wrapper for CRM leads.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LeadId(pub String);

impl fmt::Display for LeadId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for LeadId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// Position of a lead in the sales funnel, in funnel order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PipelineStatus {
    NewMatch,
    Contacted,
    InConversation,
    AwaitingReply,
    VisitScheduled,
    Proposal,
    Closed,
}

impl PipelineStatus {
    pub const fn ordered() -> [Self; 7] {
        [
            Self::NewMatch,
            Self::Contacted,
            Self::InConversation,
            Self::AwaitingReply,
            Self::VisitScheduled,
            Self::Proposal,
            Self::Closed,
        ]
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::NewMatch => "new_match",
            Self::Contacted => "contacted",
            Self::InConversation => "in_conversation",
            Self::AwaitingReply => "awaiting_reply",
            Self::VisitScheduled => "visit_scheduled",
            Self::Proposal => "proposal",
            Self::Closed => "closed",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::NewMatch => "Novo match",
            Self::Contacted => "Contatado",
            Self::InConversation => "Em conversa",
            Self::AwaitingReply => "Aguardando retorno",
            Self::VisitScheduled => "Visita agendada",
            Self::Proposal => "Proposta",
            Self::Closed => "Fechado",
        }
    }

    /// Looks up a backend status string, accepting the legacy `awaiting_response` alias.
    pub fn parse(raw: &str) -> Option<Self> {
        let value = raw.trim().to_ascii_lowercase();
        if value == "awaiting_response" {
            return Some(Self::AwaitingReply);
        }
        Self::ordered()
            .into_iter()
            .find(|status| status.as_str() == value)
    }

    /// Stages where a chase-due date stands in for a missing next action.
    pub const fn is_followup(self) -> bool {
        matches!(self, Self::Contacted | Self::AwaitingReply)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClosedOutcome {
    Won,
    Lost,
}

impl ClosedOutcome {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "won" => Some(Self::Won),
            "lost" => Some(Self::Lost),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactInfo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

/// Canonical lead record produced by the snapshot normalizer. Never mutated by the engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BaseLead {
    pub id: LeadId,
    pub name: String,
    pub status_pipeline: PipelineStatus,
    /// Raw status text when the backend sent something outside the known pipeline.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unrecognized_status: Option<String>,
    pub closed_outcome: Option<ClosedOutcome>,
    pub lost_reason: Option<String>,
    pub contact: Option<ContactInfo>,
    pub added_at: Option<LeadDate>,
    pub created_at: Option<LeadDate>,
    pub next_action_at: Option<LeadDate>,
    pub chase_due_at: Option<LeadDate>,
    pub next_followup_at: Option<LeadDate>,
    pub last_contact_at: Option<LeadDate>,
    pub last_reply_at: Option<LeadDate>,
    pub last_status_change_at: Option<LeadDate>,
    pub context_description: Option<String>,
}

impl BaseLead {
    /// Bare lead with only identity and stage populated.
    pub fn new(id: impl Into<String>, name: impl Into<String>, status: PipelineStatus) -> Self {
        Self {
            id: LeadId(id.into()),
            name: name.into(),
            status_pipeline: status,
            unrecognized_status: None,
            closed_outcome: None,
            lost_reason: None,
            contact: None,
            added_at: None,
            created_at: None,
            next_action_at: None,
            chase_due_at: None,
            next_followup_at: None,
            last_contact_at: None,
            last_reply_at: None,
            last_status_change_at: None,
            context_description: None,
        }
    }

    /// The single canonical next-action date: `next_action_at`, then `next_followup_at`.
    pub fn next_action(&self) -> Option<&LeadDate> {
        self.next_action_at
            .as_ref()
            .or(self.next_followup_at.as_ref())
    }

    /// Chase-due date, only when the lead is in a followup stage without a next action.
    pub fn chase_anchor(&self) -> Option<&LeadDate> {
        if self.status_pipeline.is_followup() && self.next_action().is_none() {
            self.chase_due_at.as_ref()
        } else {
            None
        }
    }

    pub fn added(&self) -> Option<&LeadDate> {
        self.added_at.as_ref().or(self.created_at.as_ref())
    }

    /// Last touch point: contact, then status change, then creation.
    pub fn last_touch(&self) -> Option<&LeadDate> {
        self.last_contact_at
            .as_ref()
            .or(self.last_status_change_at.as_ref())
            .or_else(|| self.added())
    }

    pub fn first_name(&self) -> Option<&str> {
        self.name.split_whitespace().next()
    }

    pub fn is_lost(&self) -> bool {
        self.closed_outcome == Some(ClosedOutcome::Lost)
    }

    pub fn is_won(&self) -> bool {
        self.status_pipeline == PipelineStatus::Closed
            && self.closed_outcome == Some(ClosedOutcome::Won)
    }
}

/// Saved search attached to a lead. Absent bounds mean no constraint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeadFilter {
    pub active: bool,
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
    pub min_bedrooms: Option<f64>,
    pub min_bathrooms: Option<f64>,
    pub min_parking: Option<f64>,
    pub min_area_m2: Option<f64>,
    pub max_area_m2: Option<f64>,
    #[serde(default)]
    pub neighborhoods: BTreeSet<String>,
    #[serde(default)]
    pub property_types: BTreeSet<String>,
}

impl Default for LeadFilter {
    fn default() -> Self {
        Self {
            active: true,
            min_price: None,
            max_price: None,
            min_bedrooms: None,
            min_bathrooms: None,
            min_parking: None,
            min_area_m2: None,
            max_area_m2: None,
            neighborhoods: BTreeSet::new(),
            property_types: BTreeSet::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn day(y: i32, m: u32, d: u32) -> LeadDate {
        LeadDate::Day(NaiveDate::from_ymd_opt(y, m, d).expect("valid date"))
    }

    #[test]
    fn status_lookup_accepts_legacy_alias() {
        assert_eq!(
            PipelineStatus::parse("awaiting_response"),
            Some(PipelineStatus::AwaitingReply)
        );
        assert_eq!(
            PipelineStatus::parse(" Visit_Scheduled "),
            Some(PipelineStatus::VisitScheduled)
        );
        assert_eq!(PipelineStatus::parse("archived"), None);
    }

    #[test]
    fn next_action_prefers_explicit_date() {
        let mut lead = BaseLead::new("l1", "Ana", PipelineStatus::Contacted);
        lead.next_followup_at = Some(day(2024, 5, 3));
        assert_eq!(lead.next_action(), Some(&day(2024, 5, 3)));

        lead.next_action_at = Some(day(2024, 5, 2));
        assert_eq!(lead.next_action(), Some(&day(2024, 5, 2)));
    }

    #[test]
    fn chase_anchor_requires_followup_stage_and_no_next_action() {
        let mut lead = BaseLead::new("l1", "Ana", PipelineStatus::AwaitingReply);
        lead.chase_due_at = Some(day(2024, 5, 1));
        assert!(lead.chase_anchor().is_some());

        lead.next_followup_at = Some(day(2024, 5, 9));
        assert!(lead.chase_anchor().is_none());

        let mut talking = BaseLead::new("l2", "Bia", PipelineStatus::InConversation);
        talking.chase_due_at = Some(day(2024, 5, 1));
        assert!(talking.chase_anchor().is_none());
    }

    #[test]
    fn last_touch_falls_back_to_creation() {
        let mut lead = BaseLead::new("l1", "Ana", PipelineStatus::NewMatch);
        lead.created_at = Some(day(2024, 4, 1));
        assert_eq!(lead.last_touch(), Some(&day(2024, 4, 1)));

        lead.last_status_change_at = Some(day(2024, 4, 10));
        assert_eq!(lead.last_touch(), Some(&day(2024, 4, 10)));
    }
}
