use super::super::calendar::{DayKey, DueAnchor};
use super::super::messages::Tone;
use super::summary::SnapshotSummary;
use crate::workflows::crm::{BaseLead, LeadDate, LeadId, PipelineStatus};
use serde::Serialize;
use std::collections::BTreeMap;

/// Lead as listed in the due-today, overdue and waiting-return buckets.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LeadEntryView {
    pub id: LeadId,
    pub name: String,
    pub status: PipelineStatus,
    pub status_label: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub anchor: Option<DueAnchor>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_day: Option<DayKey>,
    pub next_action_at: Option<LeadDate>,
    pub chase_due_at: Option<LeadDate>,
    pub last_contact_at: Option<LeadDate>,
}

impl LeadEntryView {
    pub(crate) fn new(lead: &BaseLead, anchor: Option<DueAnchor>, due_day: Option<DayKey>) -> Self {
        Self {
            id: lead.id.clone(),
            name: lead.name.clone(),
            status: lead.status_pipeline,
            status_label: lead.status_pipeline.label(),
            anchor,
            due_day,
            next_action_at: lead.next_action().copied(),
            chase_due_at: lead.chase_due_at,
            last_contact_at: lead.last_contact_at,
        }
    }
}

/// Ranked lead with its score and rationale.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LeadScoreView {
    pub id: LeadId,
    pub name: String,
    pub score: u8,
    pub bullets: Vec<String>,
    pub opportunity_count: usize,
    pub price_drop_count: usize,
    pub status: PipelineStatus,
    pub status_label: &'static str,
    pub next_action_at: Option<LeadDate>,
    pub chase_due_at: Option<LeadDate>,
    pub last_contact_at: Option<LeadDate>,
}

/// Everything the assistant screen needs from one run. Maps are ordered so the same
/// snapshot always serializes to the same bytes.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AssistantPayload {
    pub generated_at: String,
    pub timezone: String,
    pub today: DayKey,
    pub due_today: Vec<LeadEntryView>,
    pub overdue: Vec<LeadEntryView>,
    pub waiting_return: Vec<LeadEntryView>,
    pub scores: Vec<LeadScoreView>,
    pub messages: BTreeMap<LeadId, BTreeMap<Tone, String>>,
    pub summary: SnapshotSummary,
}

impl AssistantPayload {
    pub fn message(&self, lead_id: &LeadId, tone: Tone) -> Option<&str> {
        self.messages
            .get(lead_id)
            .and_then(|by_tone| by_tone.get(&tone))
            .map(String::as_str)
    }
}
