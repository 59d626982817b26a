use owo_colors::OwoColorize;
use serde_json::json;

use super::{CommandOutput, OutputOptions, load_client};
use crate::api::UserSearch;
use crate::config::Config;
use crate::display::users_table;
use crate::error::{JoinMatchError, Result};
use crate::search::{DebouncedSearch, SearchOutcome};

/// Search users by name.
///
/// Runs through the same debounced controller the interactive search box
/// uses, flushed immediately since the whole query is known up front.
pub async fn cmd_users(query: &str, output: OutputOptions) -> Result<()> {
    if query.trim().is_empty() {
        return Err(JoinMatchError::InvalidInput(
            "Search query cannot be empty".to_string(),
        ));
    }

    let config = Config::load()?;
    let client = load_client(&config)?;
    let search = DebouncedSearch::with_window(UserSearch::new(client), config.search_debounce());

    // The returned timer is superseded by the flush below.
    let _ = search.set_query(query);
    if let SearchOutcome::Failed(message) = search.flush().await {
        return Err(JoinMatchError::Fetch {
            what: "users",
            message,
        });
    }

    let state = search.snapshot();
    let text = if state.results.is_empty() {
        format!("No users match \"{}\".", query.trim())
    } else {
        format!(
            "{}\n\n{} result(s)",
            users_table(&state.results),
            state.results.len()
        )
    };

    CommandOutput::new(json!({
        "query": state.last_dispatched_query,
        "users": state.results,
    }))
    .with_text(text)
    .print(output)
}

pub async fn cmd_user_block(user_id: i64, output: OutputOptions) -> Result<()> {
    let client = load_client(&Config::load()?)?;
    client.block_user(user_id).await?;

    CommandOutput::new(json!({ "user_id": user_id, "action": "blocked" }))
        .with_text(format!("Blocked user {}", user_id.to_string().cyan()))
        .print(output)
}
