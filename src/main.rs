use clap::Parser;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

use joinmatch::cli::{Cli, Commands, ConfigAction, ReportAction};
use joinmatch::commands::{
    cmd_config_path, cmd_config_show, cmd_events, cmd_rankings, cmd_report_accept,
    cmd_report_reject, cmd_reports, cmd_user_block, cmd_users,
};

/// Log to stderr, filtered by `JOINMATCH_LOG` (default: warn).
fn init_tracing() {
    let filter = EnvFilter::try_from_env("JOINMATCH_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .try_init();
}

#[tokio::main]
async fn main() -> ExitCode {
    init_tracing();
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Events {
            filters,
            pages,
            output,
        } => cmd_events(filters.into(), pages, output.into()).await,

        Commands::Reports {
            action,
            pages,
            output,
        } => match action {
            None => cmd_reports(pages, output.into()).await,
            Some(ReportAction::Accept { report_id }) => {
                cmd_report_accept(report_id, output.into()).await
            }
            Some(ReportAction::Reject { report_id }) => {
                cmd_report_reject(report_id, output.into()).await
            }
        },

        Commands::Users { query, output } => cmd_users(&query.join(" "), output.into()).await,
        Commands::Block { user_id, output } => cmd_user_block(user_id, output.into()).await,

        Commands::Rankings {
            kind,
            limit,
            output,
        } => cmd_rankings(kind, limit, output.into()).await,

        Commands::Config { action } => match action {
            ConfigAction::Show { output } => cmd_config_show(output.into()),
            ConfigAction::Path { output } => cmd_config_path(output.into()),
        },
    };

    match result {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}", e);
            ExitCode::FAILURE
        }
    }
}
