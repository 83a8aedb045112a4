use super::calendar::{classify_due, is_waiting_return, CalendarContext, DueState, TimezoneRegistry};
use super::messages::{render_message, Tone};
use super::report::{AssistantPayload, LeadEntryView, LeadScoreView, SnapshotSummary};
use super::scoring::{rank_leads_by_score, score_lead, ScoredLead};
use super::snapshot::{LeadSnapshot, SnapshotError};
use crate::config::{AssistantConfig, DEFAULT_CANDIDATE_LIMIT, DEFAULT_SCORE_LIMIT};
use crate::workflows::listings::count_opportunities;
use chrono::{DateTime, SecondsFormat, Utc};
use std::collections::BTreeMap;
use tracing::info;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AssistantLimits {
    /// Default number of ranked leads returned.
    pub score_limit: usize,
    /// Maximum listings from the pool considered for opportunity matching.
    pub candidate_limit: usize,
}

impl Default for AssistantLimits {
    fn default() -> Self {
        Self {
            score_limit: DEFAULT_SCORE_LIMIT,
            candidate_limit: DEFAULT_CANDIDATE_LIMIT,
        }
    }
}

/// Per-run parameters. `now` is always supplied by the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssistantRequest {
    pub now: DateTime<Utc>,
    pub timezone: Option<String>,
    pub score_limit: Option<usize>,
}

impl AssistantRequest {
    pub fn at(now: DateTime<Utc>) -> Self {
        Self {
            now,
            timezone: None,
            score_limit: None,
        }
    }
}

/// Stateless pipeline turning a lead snapshot into the assistant payload.
#[derive(Debug, Clone)]
pub struct AssistantEngine {
    registry: TimezoneRegistry,
    limits: AssistantLimits,
}

impl AssistantEngine {
    pub fn new(registry: TimezoneRegistry, limits: AssistantLimits) -> Self {
        Self { registry, limits }
    }

    pub fn from_config(config: &AssistantConfig) -> Result<Self, SnapshotError> {
        let registry = TimezoneRegistry::new(&config.timezone)?;
        Ok(Self::new(
            registry,
            AssistantLimits {
                score_limit: config.score_limit,
                candidate_limit: config.candidate_limit,
            },
        ))
    }

    pub fn registry(&self) -> &TimezoneRegistry {
        &self.registry
    }

    pub fn limits(&self) -> AssistantLimits {
        self.limits
    }

    pub fn run(
        &self,
        snapshot: &LeadSnapshot,
        request: &AssistantRequest,
    ) -> Result<AssistantPayload, SnapshotError> {
        let (timezone, tz) = self.registry.resolve(request.timezone.as_deref())?;
        let calendar = CalendarContext::new(request.now, tz);
        let score_limit = request
            .score_limit
            .filter(|limit| *limit > 0)
            .unwrap_or(self.limits.score_limit);

        let pool_size = snapshot.listings.len().min(self.limits.candidate_limit);
        let pool = &snapshot.listings[..pool_size];

        let mut due_today = Vec::new();
        let mut overdue = Vec::new();
        let mut waiting_return = Vec::new();
        let mut messages = BTreeMap::new();
        let mut scored = Vec::with_capacity(snapshot.leads.len());

        for lead in &snapshot.leads {
            let filter = snapshot.filter_for(&lead.id);
            let opportunities = count_opportunities(filter, pool);
            let card = score_lead(lead, opportunities, &calendar);

            if let Some(due) = classify_due(lead, &calendar) {
                let entry = LeadEntryView::new(lead, Some(due.anchor), Some(due.day));
                match due.state {
                    DueState::DueToday => due_today.push(entry),
                    DueState::Overdue => overdue.push(entry),
                }

                let drafts: BTreeMap<Tone, String> = Tone::ordered()
                    .into_iter()
                    .map(|tone| (tone, render_message(lead, tone, filter)))
                    .collect();
                messages.insert(lead.id.clone(), drafts);
            }

            if is_waiting_return(lead, &calendar) {
                let day = lead.chase_due_at.as_ref().map(|date| calendar.day_key(date));
                waiting_return.push(LeadEntryView::new(lead, None, day));
            }

            scored.push(ScoredLead {
                lead,
                card,
                opportunities,
            });
        }

        // Oldest obligations first; input order breaks ties.
        overdue.sort_by(|left, right| left.due_day.cmp(&right.due_day));
        waiting_return.sort_by(|left, right| left.due_day.cmp(&right.due_day));

        let scores: Vec<LeadScoreView> = rank_leads_by_score(scored, Some(score_limit))
            .into_iter()
            .map(|entry| LeadScoreView {
                id: entry.lead.id.clone(),
                name: entry.lead.name.clone(),
                score: entry.card.score,
                bullets: entry.card.bullets,
                opportunity_count: entry.opportunities.count,
                price_drop_count: entry.opportunities.price_drops,
                status: entry.lead.status_pipeline,
                status_label: entry.lead.status_pipeline.label(),
                next_action_at: entry.lead.next_action().copied(),
                chase_due_at: entry.lead.chase_due_at,
                last_contact_at: entry.lead.last_contact_at,
            })
            .collect();

        let mut summary = SnapshotSummary::of(snapshot, pool_size);
        summary.due_today = due_today.len();
        summary.overdue = overdue.len();
        summary.waiting_return = waiting_return.len();

        info!(
            timezone = %timezone,
            today = %calendar.today,
            leads = summary.leads,
            due_today = summary.due_today,
            overdue = summary.overdue,
            waiting_return = summary.waiting_return,
            dropped = summary.dropped_rows.total(),
            "assistant snapshot evaluated"
        );

        Ok(AssistantPayload {
            generated_at: request.now.to_rfc3339_opts(SecondsFormat::Millis, true),
            timezone,
            today: calendar.today.clone(),
            due_today,
            overdue,
            waiting_return,
            scores,
            messages,
            summary,
        })
    }
}
