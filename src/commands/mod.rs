//! Subcommands of the `joinmatch` binary.

mod config;
mod events;
mod rankings;
mod reports;
mod users;

pub use config::{cmd_config_path, cmd_config_show};
pub use events::cmd_events;
pub use rankings::cmd_rankings;
pub use reports::{cmd_report_accept, cmd_report_reject, cmd_reports};
pub use users::{cmd_user_block, cmd_users};

use std::sync::Arc;

use serde_json::Value;

use crate::api::BackendClient;
use crate::config::Config;
use crate::error::{JoinMatchError, Result};
use crate::feed::{ListController, LoadOutcome, PageFetcher, PageLoad};

/// Output flags shared by every subcommand.
#[derive(Debug, Clone, Copy, Default)]
pub struct OutputOptions {
    pub json: bool,
}

/// A command result with a JSON form and an optional human-readable form.
pub struct CommandOutput {
    json: Value,
    text: Option<String>,
}

impl CommandOutput {
    pub fn new(json: Value) -> Self {
        Self { json, text: None }
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    pub fn print(self, output: OutputOptions) -> Result<()> {
        match self.text {
            Some(text) if !output.json => {
                println!("{text}");
                Ok(())
            }
            _ => print_json(&self.json),
        }
    }
}

pub fn print_json(value: &Value) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

pub(crate) fn load_client(config: &Config) -> Result<Arc<BackendClient>> {
    Ok(Arc::new(BackendClient::from_config(config)?))
}

/// Await `first`, then keep loading until `pages` pages are applied, the
/// list is exhausted, or a page fails.
pub async fn drain_pages<P: PageFetcher>(
    controller: &ListController<P>,
    first: Option<PageLoad<P>>,
    pages: u32,
) -> Result<u32> {
    let Some(first) = first else {
        return Ok(0);
    };

    let mut loaded = 0;
    let mut next = Some(first);
    while let Some(load) = next {
        match load.await {
            LoadOutcome::Applied { .. } => loaded += 1,
            LoadOutcome::Failed(message) => {
                return Err(JoinMatchError::Fetch {
                    what: controller.label(),
                    message,
                });
            }
            LoadOutcome::Stale => break,
        }
        if loaded >= pages {
            break;
        }
        next = controller.load_next();
    }
    Ok(loaded)
}
