use owo_colors::OwoColorize;
use serde_json::json;

use super::{CommandOutput, OutputOptions, drain_pages, load_client};
use crate::api::ReportedEventFeed;
use crate::config::Config;
use crate::display::{list_footer, reports_table};
use crate::error::Result;
use crate::feed::ListController;
use crate::filters::FilterState;

/// List the moderator's reported-events queue.
pub async fn cmd_reports(pages: u32, output: OutputOptions) -> Result<()> {
    let config = Config::load()?;
    let client = load_client(&config)?;
    let controller = ListController::with_label(
        ReportedEventFeed::reported_events(client),
        config.page_size,
        "reports",
    )?;

    let first = controller.reset(FilterState::new());
    drain_pages(&controller, Some(first), pages.max(1)).await?;

    let state = controller.snapshot();
    let text = if state.accumulated.is_empty() {
        "No reported events.".to_string()
    } else {
        format!(
            "{}\n{}",
            reports_table(&state.accumulated),
            list_footer("reports", state.accumulated.len(), state.phase())
        )
    };

    CommandOutput::new(json!({
        "has_more": !state.is_exhausted,
        "reports": state.accumulated,
    }))
    .with_text(text)
    .print(output)
}

pub async fn cmd_report_accept(report_id: i64, output: OutputOptions) -> Result<()> {
    let client = load_client(&Config::load()?)?;
    client.accept_event_report(report_id).await?;

    CommandOutput::new(json!({ "report_id": report_id, "action": "accepted" }))
        .with_text(format!("Accepted report {}", report_id.to_string().cyan()))
        .print(output)
}

pub async fn cmd_report_reject(report_id: i64, output: OutputOptions) -> Result<()> {
    let client = load_client(&Config::load()?)?;
    client.reject_event_report(report_id).await?;

    CommandOutput::new(json!({ "report_id": report_id, "action": "rejected" }))
        .with_text(format!("Rejected report {}", report_id.to_string().cyan()))
        .print(output)
}
