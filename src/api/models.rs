//! Response DTOs for the endpoints this crate consumes.
//!
//! Fields the backend may omit are optional so a sparse row never fails a
//! whole page.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{JoinMatchError, Result};

/// One row of the event browser.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventSummary {
    #[serde(alias = "id")]
    pub event_id: i64,
    pub event_name: String,
    #[serde(default)]
    pub sport_type_name: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub sport_object_name: Option<String>,
    /// ISO 8601 start time
    #[serde(default)]
    pub event_date: Option<String>,
    #[serde(default)]
    pub cost: Option<f64>,
    #[serde(default)]
    pub max_participants: Option<u32>,
    #[serde(default)]
    pub booked_participants: Option<u32>,
    #[serde(default)]
    pub status: Option<String>,
}

impl EventSummary {
    pub fn is_free(&self) -> bool {
        self.cost.is_none_or(|c| c <= 0.0)
    }

    /// Free places, when both counters are known.
    pub fn free_places(&self) -> Option<u32> {
        match (self.max_participants, self.booked_participants) {
            (Some(max), Some(booked)) => Some(max.saturating_sub(booked)),
            _ => None,
        }
    }
}

/// An entry of the moderator's reported-events queue.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportedEvent {
    #[serde(alias = "id")]
    pub report_id: i64,
    pub event_id: i64,
    #[serde(default)]
    pub event_name: Option<String>,
    #[serde(default)]
    pub reporter_username: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub report_status: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
}

/// A user as returned by search and moderator listings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSummary {
    #[serde(alias = "userId")]
    pub id: i64,
    pub username: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub surname: Option<String>,
    #[serde(default)]
    pub url_of_picture: Option<String>,
}

impl UserSummary {
    /// "Name Surname", falling back to the username.
    pub fn display_name(&self) -> String {
        let full = [self.name.as_deref(), self.surname.as_deref()]
            .into_iter()
            .flatten()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join(" ");
        if full.is_empty() {
            self.username.clone()
        } else {
            full
        }
    }
}

/// A position in one of the rating leaderboards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RankingEntry {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub average_rating: f64,
    #[serde(default)]
    pub rating_count: u32,
}

/// Which leaderboard to fetch from `/rankings/{kind}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RankingKind {
    Users,
    Organizers,
    Events,
}

impl RankingKind {
    pub fn path_segment(&self) -> &'static str {
        match self {
            RankingKind::Users => "users",
            RankingKind::Organizers => "organizers",
            RankingKind::Events => "events",
        }
    }
}

impl fmt::Display for RankingKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.path_segment())
    }
}

impl FromStr for RankingKind {
    type Err = JoinMatchError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "users" | "user" => Ok(RankingKind::Users),
            "organizers" | "organizer" => Ok(RankingKind::Organizers),
            "events" | "event" => Ok(RankingKind::Events),
            _ => Err(JoinMatchError::InvalidInput(format!(
                "unknown ranking '{s}', expected 'users', 'organizers' or 'events'"
            ))),
        }
    }
}
