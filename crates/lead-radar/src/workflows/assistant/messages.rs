use crate::workflows::crm::{BaseLead, LeadFilter, PipelineStatus};
use serde::{Deserialize, Serialize};

pub const FALLBACK_FIRST_NAME: &str = "cliente";
pub const FALLBACK_REGION: &str = "sua região de interesse";
pub const FALLBACK_PRICE: &str = "dentro do seu orçamento";

/// Voice used when drafting an outreach message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tone {
    Curt,
    Professional,
    Friendly,
}

impl Tone {
    pub const fn ordered() -> [Self; 3] {
        [Self::Curt, Self::Professional, Self::Friendly]
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Curt => "curt",
            Self::Professional => "professional",
            Self::Friendly => "friendly",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Curt => "Direto",
            Self::Professional => "Profissional",
            Self::Friendly => "Amigável",
        }
    }
}

/// Template families. Late funnel stages share the conversation templates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MessageBucket {
    NewMatch,
    Contacted,
    InConversation,
    AwaitingReply,
}

impl From<PipelineStatus> for MessageBucket {
    fn from(status: PipelineStatus) -> Self {
        match status {
            PipelineStatus::NewMatch => Self::NewMatch,
            PipelineStatus::Contacted => Self::Contacted,
            PipelineStatus::AwaitingReply => Self::AwaitingReply,
            PipelineStatus::InConversation
            | PipelineStatus::VisitScheduled
            | PipelineStatus::Proposal
            | PipelineStatus::Closed => Self::InConversation,
        }
    }
}

fn template(bucket: MessageBucket, tone: Tone) -> &'static str {
    match (bucket, tone) {
        (MessageBucket::NewMatch, Tone::Curt) => {
            "Oi {first_name}, separei imóveis em {region_focus} {price_focus}. Posso enviar?"
        }
        (MessageBucket::NewMatch, Tone::Professional) => {
            "Olá {first_name}, tudo bem? Encontrei opções em {region_focus} {price_focus} que combinam com a sua busca. Gostaria de receber os detalhes?"
        }
        (MessageBucket::NewMatch, Tone::Friendly) => {
            "Oi {first_name}! Achei uns imóveis em {region_focus} {price_focus} que têm tudo a ver com você. Quer dar uma olhada?"
        }
        (MessageBucket::Contacted, Tone::Curt) => {
            "Oi {first_name}, conseguiu ver as opções em {region_focus}? Tenho novidades {price_focus}."
        }
        (MessageBucket::Contacted, Tone::Professional) => {
            "Olá {first_name}, retomando nosso contato: sigo acompanhando imóveis em {region_focus} {price_focus}. Podemos conversar sobre os próximos passos?"
        }
        (MessageBucket::Contacted, Tone::Friendly) => {
            "Oi {first_name}, tudo certo? Continuo de olho em {region_focus} {price_focus} pra você. Me conta o que achou!"
        }
        (MessageBucket::InConversation, Tone::Curt) => {
            "{first_name}, novas opções em {region_focus} {price_focus}. Agendamos?"
        }
        (MessageBucket::InConversation, Tone::Professional) => {
            "Olá {first_name}, dando sequência à nossa conversa, selecionei alternativas em {region_focus} {price_focus}. Qual o melhor horário para avançarmos?"
        }
        (MessageBucket::InConversation, Tone::Friendly) => {
            "Oi {first_name}! Seguindo nosso papo, separei mais opções em {region_focus} {price_focus}. Bora marcar uma visita?"
        }
        (MessageBucket::AwaitingReply, Tone::Curt) => {
            "Oi {first_name}, sigo no aguardo do seu retorno sobre {region_focus}."
        }
        (MessageBucket::AwaitingReply, Tone::Professional) => {
            "Olá {first_name}, passando para saber se teve a oportunidade de avaliar as opções em {region_focus} {price_focus}. Fico à disposição."
        }
        (MessageBucket::AwaitingReply, Tone::Friendly) => {
            "Oi {first_name}, tudo bem? Fiquei curioso pra saber o que achou das opções em {region_focus}. Qualquer coisa é só chamar!"
        }
    }
}

/// Drafts an outreach message. Placeholders degrade to generic text when the lead
/// has no usable name or saved search.
pub fn render_message(lead: &BaseLead, tone: Tone, filter: Option<&LeadFilter>) -> String {
    let bucket = MessageBucket::from(lead.status_pipeline);
    template(bucket, tone)
        .replace("{first_name}", lead.first_name().unwrap_or(FALLBACK_FIRST_NAME))
        .replace("{region_focus}", &region_focus(filter))
        .replace("{price_focus}", &price_focus(filter))
}

pub(crate) fn region_focus(filter: Option<&LeadFilter>) -> String {
    let regions: Vec<&str> = filter
        .map(|filter| {
            filter
                .neighborhoods
                .iter()
                .map(|name| name.trim())
                .filter(|name| !name.is_empty())
                .take(2)
                .collect()
        })
        .unwrap_or_default();

    if regions.is_empty() {
        FALLBACK_REGION.to_string()
    } else {
        regions.join(" e ")
    }
}

pub(crate) fn price_focus(filter: Option<&LeadFilter>) -> String {
    let bound = |value: Option<f64>| value.filter(|value| value.is_finite() && *value > 0.0);
    let (min, max) = filter
        .map(|filter| (bound(filter.min_price), bound(filter.max_price)))
        .unwrap_or((None, None));

    match (min, max) {
        (Some(min), Some(max)) => format!("entre {} e {}", format_brl(min), format_brl(max)),
        (Some(min), None) => format!("a partir de {}", format_brl(min)),
        (None, Some(max)) => format!("até {}", format_brl(max)),
        (None, None) => FALLBACK_PRICE.to_string(),
    }
}

/// Whole reais with `.` as the thousands separator, e.g. `R$ 1.250.000`.
pub fn format_brl(amount: f64) -> String {
    let rounded = amount.round().max(0.0) as u64;
    let digits = rounded.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (index, digit) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(digit);
    }
    format!("R$ {grouped}")
}
