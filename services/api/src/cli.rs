use crate::demo::{run_demo, run_transcript_report, DemoArgs, TranscriptReportArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use grade_advisor::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Grade Advisor",
    about = "Compute transcript averages and the points failing modules still need",
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
    /// Work with exported transcripts
    Transcript {
        #[command(subcommand)]
        command: TranscriptCommand,
    },
    /// Print a report for a built-in sample transcript
    Demo(DemoArgs),
}

#[derive(Subcommand, Debug)]
enum TranscriptCommand {
    /// Generate averages, status and remediation guidance from a CSV export
    Report(TranscriptReportArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
    /// Serve averages only, without remediation planning
    #[arg(long)]
    pub(crate) disable_engine: bool,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Transcript {
            command: TranscriptCommand::Report(args),
        } => run_transcript_report(args),
        Command::Demo(args) => run_demo(args),
    }
}
