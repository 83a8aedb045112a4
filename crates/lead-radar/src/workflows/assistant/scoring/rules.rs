use super::super::calendar::{classify_due, CalendarContext, DueAnchor, DueState};
use crate::workflows::crm::{BaseLead, LeadDate, PipelineStatus};
use crate::workflows::listings::OpportunityMatch;

/// Points earned by one signal, with the rationale shown to the agent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ScoreContribution {
    pub points: i32,
    pub rationale: String,
}

impl ScoreContribution {
    fn new(points: i32, rationale: impl Into<String>) -> Self {
        Self {
            points,
            rationale: rationale.into(),
        }
    }
}

pub(crate) const OPPORTUNITY_POINTS_EACH: i32 = 5;
pub(crate) const OPPORTUNITY_POINTS_CAP: i32 = 15;
pub(crate) const WON_PENALTY: i32 = -30;

/// Evaluates every signal independently, in a fixed order that ranking ties fall back to.
pub(crate) fn contributions(
    lead: &BaseLead,
    opportunities: OpportunityMatch,
    calendar: &CalendarContext,
) -> Vec<ScoreContribution> {
    let mut components = Vec::new();

    if let Some(days) = lead.added().and_then(|date| elapsed_days(date, calendar)) {
        let recency = if days <= 1.0 {
            Some((15, "Lead novo: entrou nas últimas 24 horas."))
        } else if days <= 3.0 {
            Some((12, "Lead recente: entrou há até 3 dias."))
        } else if days <= 7.0 {
            Some((8, "Entrou na base nesta semana."))
        } else if days <= 14.0 {
            Some((4, "Entrou na base nas últimas duas semanas."))
        } else {
            None
        };
        if let Some((points, text)) = recency {
            components.push(ScoreContribution::new(points, text));
        }
    }

    if let Some(days) = lead.last_touch().and_then(|date| elapsed_days(date, calendar)) {
        let points = if days >= 7.0 {
            15
        } else if days >= 4.0 {
            10
        } else if days >= 2.0 {
            6
        } else {
            0
        };
        if points > 0 {
            components.push(ScoreContribution::new(
                points,
                format!("Sem contato há {} dias.", days.floor() as i64),
            ));
        }
    }

    if let Some(due) = classify_due(lead, calendar) {
        let subject = match due.anchor {
            DueAnchor::NextAction => "Próxima ação",
            DueAnchor::ChaseDue => "Follow-up de cobrança",
        };
        let contribution = match due.state {
            DueState::Overdue => {
                ScoreContribution::new(25, format!("{subject} atrasada desde {}.", due.day))
            }
            DueState::DueToday => ScoreContribution::new(20, format!("{subject} vence hoje.")),
        };
        components.push(contribution);
    }

    if lead.status_pipeline == PipelineStatus::InConversation {
        components.push(ScoreContribution::new(10, "Conversa ativa em andamento."));
    }

    if opportunities.count > 0 {
        let count = i32::try_from(opportunities.count).unwrap_or(i32::MAX);
        let points = count
            .saturating_mul(OPPORTUNITY_POINTS_EACH)
            .min(OPPORTUNITY_POINTS_CAP);
        components.push(ScoreContribution::new(points, opportunity_text(opportunities)));
    }

    if let Some(days) = lead
        .last_reply_at
        .as_ref()
        .and_then(|date| elapsed_days(date, calendar))
    {
        if days <= 1.0 {
            components.push(ScoreContribution::new(10, "Respondeu nas últimas 24 horas."));
        } else if days <= 3.0 {
            components.push(ScoreContribution::new(6, "Respondeu nos últimos 3 dias."));
        }
    }

    if lead.is_won() {
        components.push(ScoreContribution::new(
            WON_PENALTY,
            "Negócio já ganho: manter apenas o relacionamento.",
        ));
    }

    components
}

/// Days since a past anchor. Future-dated anchors carry no recency signal.
fn elapsed_days(date: &LeadDate, calendar: &CalendarContext) -> Option<f64> {
    Some(calendar.days_since(date)).filter(|days| *days >= 0.0)
}

fn opportunity_text(found: OpportunityMatch) -> String {
    let mut text = if found.count == 1 {
        "1 imóvel compatível com a busca salva".to_string()
    } else {
        format!("{} imóveis compatíveis com a busca salva", found.count)
    };
    match found.price_drops {
        0 => {}
        1 => text.push_str(" (1 com redução de preço)"),
        drops => text.push_str(&format!(" ({drops} com redução de preço)")),
    }
    text.push('.');
    text
}
