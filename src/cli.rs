use clap::{Args, Parser, Subcommand};
use jiff::civil::Date;

use crate::api::RankingKind;
use crate::commands::OutputOptions;
use crate::filters::{EventFilters, SortDirection};

#[derive(Parser)]
#[command(name = "joinmatch")]
#[command(about = "Browse JoinMatch events, reports, users and rankings")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Browse events, page by page
    #[command(visible_alias = "e")]
    Events {
        #[command(flatten)]
        filters: EventFilterArgs,

        /// Number of pages to load
        #[arg(long, default_value_t = 1)]
        pages: u32,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// Moderator queue of reported events
    Reports {
        #[command(subcommand)]
        action: Option<ReportAction>,

        /// Number of pages to load
        #[arg(long, default_value_t = 1)]
        pages: u32,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// Search users by name
    #[command(visible_alias = "u")]
    Users {
        /// Search text
        query: Vec<String>,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// Block a user (moderators only)
    Block {
        user_id: i64,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// Show a rating leaderboard
    Rankings {
        /// users, organizers or events
        kind: RankingKind,

        /// Number of entries
        #[arg(short, long, default_value_t = 10)]
        limit: u32,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// Inspect configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
pub enum ReportAction {
    /// Accept a report
    Accept {
        report_id: i64,
    },
    /// Reject a report
    Reject {
        report_id: i64,
    },
}

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Show the effective configuration
    Show {
        #[command(flatten)]
        output: OutputArgs,
    },
    /// Print the config file path
    Path {
        #[command(flatten)]
        output: OutputArgs,
    },
}

#[derive(Args, Debug, Clone, Copy, Default)]
pub struct OutputArgs {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

impl From<OutputArgs> for OutputOptions {
    fn from(args: OutputArgs) -> Self {
        OutputOptions { json: args.json }
    }
}

#[derive(Args, Debug, Clone, Default)]
pub struct EventFilterArgs {
    /// Only events in this city
    #[arg(long)]
    pub city: Option<String>,

    /// Only this sport, e.g. "Football"
    #[arg(long)]
    pub sport: Option<String>,

    /// Earliest event date (YYYY-MM-DD)
    #[arg(long)]
    pub from: Option<Date>,

    /// Latest event date (YYYY-MM-DD)
    #[arg(long)]
    pub to: Option<Date>,

    #[arg(long)]
    pub min_price: Option<f64>,

    #[arg(long)]
    pub max_price: Option<f64>,

    /// Only free events
    #[arg(long)]
    pub free: bool,

    /// Only events with free places
    #[arg(long)]
    pub available: bool,

    /// Free-text search in event names
    #[arg(short, long)]
    pub search: Option<String>,

    /// Field to sort by, e.g. eventDate
    #[arg(long)]
    pub sort_by: Option<String>,

    /// asc or desc
    #[arg(long, default_value = "asc")]
    pub direction: SortDirection,
}

impl From<EventFilterArgs> for EventFilters {
    fn from(args: EventFilterArgs) -> Self {
        EventFilters {
            city: args.city,
            sport_type: args.sport,
            date_from: args.from,
            date_to: args.to,
            min_price: args.min_price,
            max_price: args.max_price,
            free_only: args.free,
            available_only: args.available,
            search: args.search,
            sort_by: args.sort_by,
            direction: args.direction,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_events_args_parse() {
        let cli = Cli::try_parse_from([
            "joinmatch",
            "events",
            "--city",
            "Kraków",
            "--from",
            "2026-11-01",
            "--free",
            "--pages",
            "3",
            "--direction",
            "desc",
        ])
        .unwrap();

        let Commands::Events {
            filters, pages, ..
        } = cli.command
        else {
            panic!("expected events command");
        };
        assert_eq!(pages, 3);

        let filters = EventFilters::from(filters);
        assert_eq!(filters.city.as_deref(), Some("Kraków"));
        assert_eq!(filters.date_from, Some(jiff::civil::date(2026, 11, 1)));
        assert!(filters.free_only);
        assert_eq!(filters.direction, SortDirection::Desc);
    }

    #[test]
    fn test_rankings_kind_parse() {
        let cli = Cli::try_parse_from(["joinmatch", "rankings", "organizers", "-l", "5"]).unwrap();
        match cli.command {
            Commands::Rankings { kind, limit, .. } => {
                assert_eq!(kind, RankingKind::Organizers);
                assert_eq!(limit, 5);
            }
            _ => panic!("expected rankings command"),
        }
    }

    #[test]
    fn test_rejects_bad_date() {
        assert!(Cli::try_parse_from(["joinmatch", "events", "--from", "tomorrow"]).is_err());
    }

    #[test]
    fn test_report_action_parse() {
        let cli = Cli::try_parse_from(["joinmatch", "reports", "accept", "12"]).unwrap();
        match cli.command {
            Commands::Reports {
                action: Some(ReportAction::Accept { report_id }),
                ..
            } => assert_eq!(report_id, 12),
            _ => panic!("expected reports accept"),
        }
    }
}
