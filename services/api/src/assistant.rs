use crate::infra::{load_snapshot, SnapshotFiles};
use chrono::Utc;
use clap::Args;
use lead_radar::config::AppConfig;
use lead_radar::error::AppError;
use lead_radar::workflows::assistant::{
    answer_question, AssistantEngine, AssistantPayload, AssistantRequest, LeadEntryView, Tone,
};
use lead_radar::workflows::crm::LeadDate;
use std::path::PathBuf;

#[derive(Args, Debug)]
pub(crate) struct SnapshotInputArgs {
    /// JSON array of lead rows
    #[arg(long)]
    pub(crate) leads: PathBuf,
    /// JSON array of saved-search rows
    #[arg(long)]
    pub(crate) filters: Option<PathBuf>,
    /// Listing pool as a JSON array or a search-screen CSV export
    #[arg(long)]
    pub(crate) listings: Option<PathBuf>,
    /// Evaluation instant (RFC 3339, or YYYY-MM-DD for local midnight). Defaults to now.
    #[arg(long, value_parser = crate::infra::parse_now)]
    pub(crate) now: Option<LeadDate>,
    /// IANA timezone for day boundaries. Defaults to APP_TIMEZONE.
    #[arg(long)]
    pub(crate) timezone: Option<String>,
    /// Number of ranked leads to show
    #[arg(long)]
    pub(crate) limit: Option<usize>,
}

#[derive(Args, Debug)]
pub(crate) struct ReportArgs {
    #[command(flatten)]
    pub(crate) input: SnapshotInputArgs,
    /// Print the raw JSON payload instead of the text report
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Args, Debug)]
pub(crate) struct AskArgs {
    #[command(flatten)]
    pub(crate) input: SnapshotInputArgs,
    /// Question for the assistant, e.g. "quem está atrasado?"
    #[arg(long)]
    pub(crate) question: String,
    /// Print the answer as JSON
    #[arg(long)]
    pub(crate) json: bool,
}

pub(crate) fn run_assistant_report(args: ReportArgs) -> Result<(), AppError> {
    let payload = build_payload(&args.input)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&payload)?);
    } else {
        render_report(&payload);
    }

    Ok(())
}

pub(crate) fn run_assistant_ask(args: AskArgs) -> Result<(), AppError> {
    let payload = build_payload(&args.input)?;
    let answer = answer_question(&args.question, &payload);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&answer)?);
    } else {
        println!("{}", answer.text);
    }

    Ok(())
}

fn build_payload(input: &SnapshotInputArgs) -> Result<AssistantPayload, AppError> {
    let config = AppConfig::load()?;
    let engine = AssistantEngine::from_config(&config.assistant)?;

    let snapshot = load_snapshot(&SnapshotFiles {
        leads: input.leads.clone(),
        filters: input.filters.clone(),
        listings: input.listings.clone(),
    })?;

    let request = request_for(input, &engine)?;
    Ok(engine.run(&snapshot, &request)?)
}

/// Plain `--now` days resolve to midnight in the requested zone, not in UTC.
fn request_for(
    input: &SnapshotInputArgs,
    engine: &AssistantEngine,
) -> Result<AssistantRequest, AppError> {
    let (_, tz) = engine.registry().resolve(input.timezone.as_deref())?;
    Ok(AssistantRequest {
        now: input.now.map_or_else(Utc::now, |now| now.instant(&tz)),
        timezone: input.timezone.clone(),
        score_limit: input.limit,
    })
}

fn render_report(payload: &AssistantPayload) {
    println!("Assistente de leads | {} ({})", payload.today, payload.timezone);
    render_bucket("Atrasados", &payload.overdue);
    render_bucket("Para hoje", &payload.due_today);
    render_bucket("Aguardando retorno", &payload.waiting_return);

    println!("\nPrioridades");
    if payload.scores.is_empty() {
        println!("  (nenhum lead)");
    }
    for (position, entry) in payload.scores.iter().enumerate() {
        let opportunities = if entry.opportunity_count > 0 {
            format!(" | {} oportunidade(s)", entry.opportunity_count)
        } else {
            String::new()
        };
        println!(
            "  {}. {} [{}] score {}{}",
            position + 1,
            entry.name,
            entry.status_label,
            entry.score,
            opportunities
        );
        for bullet in &entry.bullets {
            println!("     - {bullet}");
        }
    }

    if !payload.messages.is_empty() {
        println!("\nMensagens sugeridas");
        for (lead_id, drafts) in &payload.messages {
            println!("  {lead_id}");
            for tone in Tone::ordered() {
                if let Some(text) = drafts.get(&tone) {
                    println!("    {}: {}", tone.label(), text);
                }
            }
        }
    }

    let summary = &payload.summary;
    println!(
        "\n{} leads | {} buscas salvas | {} imóveis considerados | {} linhas descartadas",
        summary.leads,
        summary.filters,
        summary.listings_considered,
        summary.dropped_rows.total()
    );
    if summary.unrecognized_statuses > 0 {
        println!(
            "Aviso: {} lead(s) com status desconhecido tratados como \"Novo match\".",
            summary.unrecognized_statuses
        );
    }
}

fn render_bucket(title: &str, entries: &[LeadEntryView]) {
    println!("\n{title} ({})", entries.len());
    for entry in entries {
        match &entry.due_day {
            Some(day) => println!("  - {} [{}] {}", entry.name, entry.status_label, day),
            None => println!("  - {} [{}]", entry.name, entry.status_label),
        }
    }
}
