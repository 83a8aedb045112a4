//! Lead assistant: due-date buckets, priority scores and outreach drafts computed from a
//! CRM snapshot, plus the HTTP routes and question router that serve them.

pub mod calendar;
pub mod engine;
pub mod intent;
pub mod messages;
pub mod report;
pub mod router;
pub(crate) mod scoring;
pub mod snapshot;

#[cfg(test)]
mod tests;

pub use calendar::{
    classify_due, is_waiting_return, CalendarContext, DayKey, DueAnchor, DueClassification,
    DueState, TimezoneRegistry, WAITING_RETURN_WINDOW_DAYS,
};
pub use engine::{AssistantEngine, AssistantLimits, AssistantRequest};
pub use intent::{answer_question, classify_question, AssistantAnswer, AssistantIntent};
pub use messages::{format_brl, render_message, MessageBucket, Tone};
pub use report::{
    AssistantPayload, LeadEntryView, LeadScoreView, PipelineCountEntry, SnapshotSummary,
};
pub use router::{assistant_router, AskRequest, SnapshotRequest};
pub use scoring::{rank_leads_by_score, score_lead, ScoreCard, ScoredLead};
pub use snapshot::{DroppedRows, LeadSnapshot, SnapshotError, SnapshotRows};
