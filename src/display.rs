//! Terminal rendering of lists, search results and leaderboards.

use owo_colors::OwoColorize;
use tabled::settings::Style;
use tabled::{Table, Tabled};

use crate::api::{EventSummary, RankingEntry, ReportedEvent, UserSummary};
use crate::feed::ListPhase;

const DASH: &str = "-";

/// A row in the event browser table
#[derive(Tabled)]
struct EventRow {
    #[tabled(rename = "ID")]
    id: i64,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Sport")]
    sport: String,
    #[tabled(rename = "City")]
    city: String,
    #[tabled(rename = "Date")]
    date: String,
    #[tabled(rename = "Cost")]
    cost: String,
    #[tabled(rename = "Places")]
    places: String,
}

/// A row in the reported events table
#[derive(Tabled)]
struct ReportRow {
    #[tabled(rename = "Report")]
    report_id: i64,
    #[tabled(rename = "Event")]
    event: String,
    #[tabled(rename = "Reporter")]
    reporter: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Reason")]
    reason: String,
}

#[derive(Tabled)]
struct UserRow {
    #[tabled(rename = "ID")]
    id: i64,
    #[tabled(rename = "Username")]
    username: String,
    #[tabled(rename = "Name")]
    name: String,
}

#[derive(Tabled)]
struct RankingRow {
    #[tabled(rename = "#")]
    position: usize,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Rating")]
    rating: String,
    #[tabled(rename = "Votes")]
    votes: u32,
}

fn or_dash(value: Option<&str>) -> String {
    value.unwrap_or(DASH).to_string()
}

fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        text.to_string()
    } else {
        let head: String = text.chars().take(max.saturating_sub(3)).collect();
        format!("{head}...")
    }
}

fn render<R: Tabled>(rows: Vec<R>) -> String {
    let mut table = Table::new(rows);
    table.with(Style::rounded());
    table.to_string()
}

pub fn events_table(events: &[EventSummary]) -> String {
    let rows = events
        .iter()
        .map(|event| EventRow {
            id: event.event_id,
            name: truncate(&event.event_name, 40),
            sport: or_dash(event.sport_type_name.as_deref()),
            city: or_dash(event.city.as_deref()),
            date: or_dash(event.event_date.as_deref()),
            cost: match event.cost {
                Some(_) if event.is_free() => "free".to_string(),
                Some(cost) => format!("{cost:.2}"),
                None => DASH.to_string(),
            },
            places: match (event.free_places(), event.max_participants) {
                (Some(free), Some(max)) => format!("{free}/{max}"),
                _ => DASH.to_string(),
            },
        })
        .collect();
    render::<EventRow>(rows)
}

pub fn reports_table(reports: &[ReportedEvent]) -> String {
    let rows = reports
        .iter()
        .map(|report| ReportRow {
            report_id: report.report_id,
            event: match report.event_name.as_deref() {
                Some(name) => format!("{} ({})", truncate(name, 30), report.event_id),
                None => report.event_id.to_string(),
            },
            reporter: or_dash(report.reporter_username.as_deref()),
            status: or_dash(report.report_status.as_deref()),
            reason: report
                .description
                .as_deref()
                .map(|d| truncate(d, 50))
                .unwrap_or_else(|| DASH.to_string()),
        })
        .collect();
    render::<ReportRow>(rows)
}

pub fn users_table(users: &[UserSummary]) -> String {
    let rows = users
        .iter()
        .map(|user| UserRow {
            id: user.id,
            username: user.username.clone(),
            name: user.display_name(),
        })
        .collect();
    render::<UserRow>(rows)
}

pub fn rankings_table(entries: &[RankingEntry]) -> String {
    let rows = entries
        .iter()
        .enumerate()
        .map(|(i, entry)| RankingRow {
            position: i + 1,
            name: entry.name.clone(),
            rating: format!("{:.2}", entry.average_rating),
            votes: entry.rating_count,
        })
        .collect();
    render::<RankingRow>(rows)
}

/// Summary line printed under a list, e.g. "Loaded 40 events (more available)".
pub fn list_footer(label: &str, count: usize, phase: ListPhase) -> String {
    let suffix = match phase {
        ListPhase::Exhausted => "end of list",
        ListPhase::Error => "stopped on error",
        _ => "more available",
    };
    format!("Loaded {count} {label} ({suffix})")
        .dimmed()
        .to_string()
}

/// Colored one-word rendering of a list phase.
pub fn format_phase(phase: ListPhase) -> String {
    match phase {
        ListPhase::Idle => "idle".dimmed().to_string(),
        ListPhase::LoadingFirst | ListPhase::LoadingMore => "loading".cyan().to_string(),
        ListPhase::Exhausted => "complete".green().to_string(),
        ListPhase::Error => "error".red().to_string(),
    }
}
