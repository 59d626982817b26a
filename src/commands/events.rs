use serde_json::json;

use super::{CommandOutput, OutputOptions, drain_pages, load_client};
use crate::api::EventFeed;
use crate::config::Config;
use crate::display::{events_table, list_footer};
use crate::error::Result;
use crate::feed::{FilterCoordinator, ListController};
use crate::filters::EventFilters;

/// Browse events matching `filters`, loading up to `pages` pages.
pub async fn cmd_events(filters: EventFilters, pages: u32, output: OutputOptions) -> Result<()> {
    filters.validate()?;

    let config = Config::load()?;
    let client = load_client(&config)?;
    let controller =
        ListController::with_label(EventFeed::events(client), config.page_size, "events")?;

    let mut coordinator = FilterCoordinator::new(controller.clone(), filters.to_filter_state());
    let first = coordinator.refresh();
    drain_pages(&controller, first, pages.max(1)).await?;

    let state = controller.snapshot();
    let phase = state.phase();

    let text = if state.accumulated.is_empty() {
        "No events match these filters.".to_string()
    } else {
        format!(
            "{}\n{}",
            events_table(&state.accumulated),
            list_footer("events", state.accumulated.len(), phase)
        )
    };

    CommandOutput::new(json!({
        "filters": coordinator.filters().to_string(),
        "pages_loaded": state.next_page_index,
        "has_more": !state.is_exhausted,
        "events": state.accumulated,
    }))
    .with_text(text)
    .print(output)
}
