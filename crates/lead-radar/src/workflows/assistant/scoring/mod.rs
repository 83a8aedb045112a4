mod rules;

use super::calendar::CalendarContext;
use crate::config::DEFAULT_SCORE_LIMIT;
use crate::workflows::crm::BaseLead;
use crate::workflows::listings::OpportunityMatch;
use serde::Serialize;
use std::cmp::Ordering;

pub const MAX_SCORE: i32 = 100;
pub const MAX_BULLETS: usize = 5;
pub const MIN_BULLETS: usize = 3;

pub(crate) const PRIORITIZATION_BASIS: &str =
    "Priorização baseada em recência, follow-ups, conversas e oportunidades.";
pub(crate) const NO_URGENT_SIGNAL: &str = "Nenhum sinal urgente no momento.";

const LOST_BULLETS: [&str; 3] = [
    "Lead marcado como perdido.",
    "Sem ações de prospecção recomendadas.",
    "Reative o lead somente se houver novo interesse.",
];

/// Bounded priority score with the rationale bullets that explain it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScoreCard {
    pub score: u8,
    pub bullets: Vec<String>,
}

/// Scores one lead. Lost deals short-circuit to zero.
pub fn score_lead(
    lead: &BaseLead,
    opportunities: OpportunityMatch,
    calendar: &CalendarContext,
) -> ScoreCard {
    if lead.is_lost() {
        return ScoreCard {
            score: 0,
            bullets: LOST_BULLETS.iter().map(|text| text.to_string()).collect(),
        };
    }

    let mut components = rules::contributions(lead, opportunities, calendar);
    let total: i32 = components.iter().map(|component| component.points).sum();
    let score = u8::try_from(total.clamp(0, MAX_SCORE)).unwrap_or_default();

    // Stable: equal points keep evaluation order.
    components.sort_by(|left, right| right.points.cmp(&left.points));
    let mut bullets: Vec<String> = components
        .into_iter()
        .take(MAX_BULLETS)
        .map(|component| component.rationale)
        .collect();

    let fillers = [
        format!("Etapa atual: {}.", lead.status_pipeline.label()),
        PRIORITIZATION_BASIS.to_string(),
        NO_URGENT_SIGNAL.to_string(),
    ];
    for filler in fillers {
        if bullets.len() >= MIN_BULLETS {
            break;
        }
        bullets.push(filler);
    }

    ScoreCard { score, bullets }
}

/// A lead paired with its score, as fed to the ranking.
#[derive(Debug, Clone)]
pub struct ScoredLead<'a> {
    pub lead: &'a BaseLead,
    pub card: ScoreCard,
    pub opportunities: OpportunityMatch,
}

impl ScoredLead<'_> {
    /// Earlier of the next-action and chase-due dates, compared as ISO text.
    pub fn due_anchor_key(&self) -> Option<String> {
        let next_action = self.lead.next_action().map(|date| date.sort_key());
        let chase_due = self.lead.chase_due_at.as_ref().map(|date| date.sort_key());
        match (next_action, chase_due) {
            (Some(left), Some(right)) => Some(left.min(right)),
            (left, right) => left.or(right),
        }
    }
}

/// Sorts by score, highest first; equal scores go to the earlier due anchor, and leads
/// without any anchor trail. `None` applies the default limit.
pub fn rank_leads_by_score<'a>(
    mut scored: Vec<ScoredLead<'a>>,
    limit: Option<usize>,
) -> Vec<ScoredLead<'a>> {
    scored.sort_by(|left, right| {
        right
            .card
            .score
            .cmp(&left.card.score)
            .then_with(|| compare_anchors(left.due_anchor_key(), right.due_anchor_key()))
    });
    scored.truncate(limit.unwrap_or(DEFAULT_SCORE_LIMIT));
    scored
}

fn compare_anchors(left: Option<String>, right: Option<String>) -> Ordering {
    match (left, right) {
        (Some(left), Some(right)) => left.cmp(&right),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}
