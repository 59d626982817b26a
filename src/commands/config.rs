//! Configuration commands.
//!
//! - `config show`: Display the effective configuration
//! - `config path`: Print where the config file is read from

use owo_colors::OwoColorize;
use serde_json::json;

use super::{CommandOutput, OutputOptions};
use crate::config::Config;
use crate::error::Result;

/// Show the effective configuration, with environment overrides applied
pub fn cmd_config_show(output: OutputOptions) -> Result<()> {
    let config = Config::load()?;
    let token_configured = config.auth_token().is_some();

    let json_output = json!({
        "api_url": config.api_url(),
        "auth": {
            "token_configured": token_configured,
            "user_id": config.auth.user_id,
            "username": config.auth.username,
        },
        "page_size": config.page_size,
        "search_debounce_ms": config.search_debounce_ms,
        "request_timeout": config.request_timeout,
        "config_file": Config::config_path().to_string_lossy(),
    });

    let mut text_output = String::new();
    text_output.push_str(&format!("{}\n\n", "Configuration:".cyan().bold()));
    text_output.push_str(&format!("{}: {}\n", "api_url".cyan(), config.api_url()));

    // Never print the token itself
    let token_status = if token_configured {
        "configured".green().to_string()
    } else {
        "not configured".dimmed().to_string()
    };
    text_output.push_str(&format!("{}:\n", "auth".cyan()));
    text_output.push_str(&format!("  token: {token_status}\n"));
    match config.auth.user_id {
        Some(id) => text_output.push_str(&format!("  user_id: {id}\n")),
        None => text_output.push_str(&format!("  user_id: {}\n", "anonymous".dimmed())),
    }
    if let Some(ref username) = config.auth.username {
        text_output.push_str(&format!("  username: {username}\n"));
    }

    text_output.push('\n');
    text_output.push_str(&format!("{}: {}\n", "page_size".cyan(), config.page_size));
    text_output.push_str(&format!(
        "{}: {}ms\n",
        "search_debounce".cyan(),
        config.search_debounce_ms
    ));
    text_output.push_str(&format!(
        "{}: {}s\n",
        "request_timeout".cyan(),
        config.request_timeout
    ));

    text_output.push('\n');
    text_output.push_str(&format!(
        "{}",
        format!("Config file: {}", Config::config_path().display()).dimmed()
    ));

    CommandOutput::new(json_output)
        .with_text(text_output)
        .print(output)
}

pub fn cmd_config_path(output: OutputOptions) -> Result<()> {
    let path = Config::config_path();
    CommandOutput::new(json!({
        "path": path.to_string_lossy(),
        "exists": path.exists(),
    }))
    .with_text(path.display().to_string())
    .print(output)
}
