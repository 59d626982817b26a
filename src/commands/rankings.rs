use owo_colors::OwoColorize;
use serde_json::json;

use super::{CommandOutput, OutputOptions, load_client};
use crate::api::RankingKind;
use crate::config::Config;
use crate::display::rankings_table;
use crate::error::{JoinMatchError, Result};

pub async fn cmd_rankings(kind: RankingKind, limit: u32, output: OutputOptions) -> Result<()> {
    if limit == 0 {
        return Err(JoinMatchError::InvalidInput(
            "limit must be greater than zero".to_string(),
        ));
    }

    let client = load_client(&Config::load()?)?;
    let entries = client.rankings(kind, limit).await?;

    let text = if entries.is_empty() {
        format!("No {kind} ranking yet.")
    } else {
        format!(
            "{}\n{}",
            format!("Top {kind}").cyan().bold(),
            rankings_table(&entries)
        )
    };

    CommandOutput::new(json!({
        "kind": kind,
        "entries": entries,
    }))
    .with_text(text)
    .print(output)
}
