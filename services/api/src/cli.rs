use crate::assistant::{run_assistant_ask, run_assistant_report, AskArgs, ReportArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use lead_radar::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Lead Radar",
    about = "Prioritize CRM leads and draft outreach messages from the command line",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Run the lead assistant over exported snapshot files
    Assistant {
        #[command(subcommand)]
        command: AssistantCommand,
    },
}

#[derive(Subcommand, Debug)]
enum AssistantCommand {
    /// Print due-today, overdue and waiting-return buckets, ranked scores and drafts
    Report(ReportArgs),
    /// Answer a free-text question about the snapshot
    Ask(AskArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Assistant {
            command: AssistantCommand::Report(args),
        } => run_assistant_report(args),
        Command::Assistant {
            command: AssistantCommand::Ask(args),
        } => run_assistant_ask(args),
    }
}
