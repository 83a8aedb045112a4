use super::messages::Tone;
use super::report::{AssistantPayload, LeadEntryView};
use crate::workflows::crm::LeadId;
use crate::workflows::listings::fold_label;
use serde::Serialize;

const PRIORITY_PREVIEW: usize = 5;

/// Slice of the payload a free-text question is routed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AssistantIntent {
    Overdue,
    DueToday,
    WaitingReturn,
    Priorities,
    Message { tone: Tone },
    Summary,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AssistantAnswer {
    pub intent: AssistantIntent,
    pub text: String,
    pub lead_ids: Vec<LeadId>,
}

struct KeywordTable {
    message: &'static [&'static str],
    curt: &'static [&'static str],
    friendly: &'static [&'static str],
    overdue: &'static [&'static str],
    due_today: &'static [&'static str],
    waiting: &'static [&'static str],
    priorities: &'static [&'static str],
}

// Folded prefixes, matched against the start of each word.
static KEYWORDS: KeywordTable = KeywordTable {
    message: &["mensag", "message", "escrev", "redig", "rascunho", "draft", "write", "texto"],
    curt: &["curt", "diret", "rapid", "short", "brief"],
    friendly: &["amigav", "descontraid", "informal", "casual", "friendly", "leve"],
    overdue: &["atrasad", "vencid", "overdue", "late", "pendenc"],
    due_today: &["hoje", "today"],
    waiting: &["aguardand", "retorno", "esperand", "waiting", "reply", "resposta"],
    priorities: &[
        "priorid", "prioriz", "priorit", "ranking", "top", "melhor", "quent", "hot", "foco",
        "focar",
    ],
};

pub fn classify_question(question: &str) -> AssistantIntent {
    let folded = fold_label(question);
    let words: Vec<&str> = folded
        .split(|c: char| !c.is_alphanumeric())
        .filter(|word| !word.is_empty())
        .collect();
    let mentions = |table: &[&str]| {
        words
            .iter()
            .any(|word| table.iter().any(|prefix| word.starts_with(prefix)))
    };

    let table = &KEYWORDS;
    if mentions(table.message) {
        let tone = if mentions(table.curt) {
            Tone::Curt
        } else if mentions(table.friendly) {
            Tone::Friendly
        } else {
            Tone::Professional
        };
        AssistantIntent::Message { tone }
    } else if mentions(table.overdue) {
        AssistantIntent::Overdue
    } else if mentions(table.due_today) {
        AssistantIntent::DueToday
    } else if mentions(table.waiting) {
        AssistantIntent::WaitingReturn
    } else if mentions(table.priorities) {
        AssistantIntent::Priorities
    } else {
        AssistantIntent::Summary
    }
}

/// Routes a free-text question to a payload slice and phrases the answer.
pub fn answer_question(question: &str, payload: &AssistantPayload) -> AssistantAnswer {
    let intent = classify_question(question);
    match intent {
        AssistantIntent::Overdue => bucket_answer(
            intent,
            &payload.overdue,
            "Nenhum lead atrasado. Bom trabalho!",
            |count| {
                format!(
                    "{count} {} com ação atrasada",
                    plural(count, "lead", "leads")
                )
            },
        ),
        AssistantIntent::DueToday => bucket_answer(
            intent,
            &payload.due_today,
            "Nenhuma ação vence hoje.",
            |count| format!("{count} {} com ação para hoje", plural(count, "lead", "leads")),
        ),
        AssistantIntent::WaitingReturn => bucket_answer(
            intent,
            &payload.waiting_return,
            "Nenhum lead aguardando retorno nos próximos dias.",
            |count| {
                format!(
                    "{count} {} aguardando retorno",
                    plural(count, "lead", "leads")
                )
            },
        ),
        AssistantIntent::Priorities => priorities_answer(payload),
        AssistantIntent::Message { tone } => message_answer(question, tone, payload),
        AssistantIntent::Summary => summary_answer(payload),
    }
}

fn bucket_answer(
    intent: AssistantIntent,
    entries: &[LeadEntryView],
    empty: &str,
    heading: impl Fn(usize) -> String,
) -> AssistantAnswer {
    if entries.is_empty() {
        return AssistantAnswer {
            intent,
            text: empty.to_string(),
            lead_ids: Vec::new(),
        };
    }

    let names: Vec<String> = entries
        .iter()
        .map(|entry| match &entry.due_day {
            Some(day) => format!("{} ({day})", entry.name),
            None => entry.name.clone(),
        })
        .collect();

    AssistantAnswer {
        intent,
        text: format!("{}: {}.", heading(entries.len()), names.join(", ")),
        lead_ids: entries.iter().map(|entry| entry.id.clone()).collect(),
    }
}

fn priorities_answer(payload: &AssistantPayload) -> AssistantAnswer {
    let top: Vec<_> = payload.scores.iter().take(PRIORITY_PREVIEW).collect();
    if top.is_empty() {
        return AssistantAnswer {
            intent: AssistantIntent::Priorities,
            text: "Nenhum lead para priorizar.".to_string(),
            lead_ids: Vec::new(),
        };
    }

    let ranked: Vec<String> = top
        .iter()
        .enumerate()
        .map(|(position, entry)| format!("{}. {} ({})", position + 1, entry.name, entry.score))
        .collect();

    AssistantAnswer {
        intent: AssistantIntent::Priorities,
        text: format!("Prioridades: {}.", ranked.join("; ")),
        lead_ids: top.iter().map(|entry| entry.id.clone()).collect(),
    }
}

/// Drafts go to the lead named in the question, else the most urgent lead with a draft.
fn message_answer(question: &str, tone: Tone, payload: &AssistantPayload) -> AssistantAnswer {
    let intent = AssistantIntent::Message { tone };
    let folded = fold_label(question);
    let candidates: Vec<&LeadEntryView> = payload
        .overdue
        .iter()
        .chain(payload.due_today.iter())
        .collect();

    let named = candidates.iter().copied().find(|entry| {
        entry
            .name
            .split_whitespace()
            .next()
            .map(fold_label)
            .map_or(false, |first| {
                folded
                    .split(|c: char| !c.is_alphanumeric())
                    .any(|word| word == first)
            })
    });

    let chosen = named.or_else(|| candidates.first().copied());
    let draft = chosen.and_then(|entry| {
        payload
            .message(&entry.id, tone)
            .map(|text| (entry, text.to_string()))
    });

    match draft {
        Some((entry, text)) => AssistantAnswer {
            intent,
            text: format!("Mensagem ({}) para {}:\n{}", tone.label(), entry.name, text),
            lead_ids: vec![entry.id.clone()],
        },
        None => AssistantAnswer {
            intent,
            text: "Nenhum lead com ação para hoje ou atrasada, então não há mensagens sugeridas."
                .to_string(),
            lead_ids: Vec::new(),
        },
    }
}

fn summary_answer(payload: &AssistantPayload) -> AssistantAnswer {
    let summary = &payload.summary;
    AssistantAnswer {
        intent: AssistantIntent::Summary,
        text: format!(
            "Resumo de {}: {} {} na base, {} {}, {} para hoje e {} aguardando retorno.",
            payload.today,
            summary.leads,
            plural(summary.leads, "lead", "leads"),
            summary.overdue,
            plural(summary.overdue, "atrasado", "atrasados"),
            summary.due_today,
            summary.waiting_return,
        ),
        lead_ids: Vec::new(),
    }
}

fn plural<'a>(count: usize, singular: &'a str, plural: &'a str) -> &'a str {
    if count == 1 {
        singular
    } else {
        plural
    }
}
