use chrono::{DateTime as ChronoDateTime, Utc};
use mongodb::bson::{oid::ObjectId, DateTime, Document};
use serde::{Deserialize, Serialize};

use super::event::EventStatus;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SportType {
    Football,
    Cricket,
    Basketball,
    Volleyball,
    Badminton,
    TableTennis,
    Chess,
}

impl SportType {
    pub fn as_str(&self) -> &'static str {
        match self {
            SportType::Football => "FOOTBALL",
            SportType::Cricket => "CRICKET",
            SportType::Basketball => "BASKETBALL",
            SportType::Volleyball => "VOLLEYBALL",
            SportType::Badminton => "BADMINTON",
            SportType::TableTennis => "TABLE_TENNIS",
            SportType::Chess => "CHESS",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TournamentStatus {
    Upcoming,
    Ongoing,
    Completed,
}

impl TournamentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TournamentStatus::Upcoming => "UPCOMING",
            TournamentStatus::Ongoing => "ONGOING",
            TournamentStatus::Completed => "COMPLETED",
        }
    }

    /// Tournaments share the date-window rule with events.
    pub fn derive(now: DateTime, start: DateTime, end: DateTime) -> Self {
        match EventStatus::derive(now, start, end) {
            EventStatus::Upcoming => TournamentStatus::Upcoming,
            EventStatus::Ongoing => TournamentStatus::Ongoing,
            EventStatus::Completed => TournamentStatus::Completed,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tournament {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub name: String,
    pub sport_type: SportType,
    pub start_date: DateTime,
    pub end_date: DateTime,
    pub venue: String,
    pub status: TournamentStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub winner: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub runner_up: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub best_player: Option<String>,
    #[serde(default)]
    pub images: Vec<String>,
    pub description: String,
    pub created_by: ObjectId,
    #[serde(default)]
    pub is_deleted: bool,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

#[derive(Debug, Clone, Serialize)]
pub struct TournamentResponse {
    pub id: String,
    pub name: String,
    pub sport_type: SportType,
    pub start_date: ChronoDateTime<Utc>,
    pub end_date: ChronoDateTime<Utc>,
    pub venue: String,
    pub status: TournamentStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub winner: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub runner_up: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub best_player: Option<String>,
    pub images: Vec<String>,
    pub description: String,
    pub created_by: String,
    pub created_at: ChronoDateTime<Utc>,
}

impl From<Tournament> for TournamentResponse {
    fn from(t: Tournament) -> Self {
        TournamentResponse {
            id: t.id.to_hex(),
            name: t.name,
            sport_type: t.sport_type,
            start_date: t.start_date.to_chrono(),
            end_date: t.end_date.to_chrono(),
            venue: t.venue,
            status: t.status,
            winner: t.winner,
            runner_up: t.runner_up,
            best_player: t.best_player,
            images: t.images,
            description: t.description,
            created_by: t.created_by.to_hex(),
            created_at: t.created_at.to_chrono(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerShowcase {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub user: ObjectId,
    pub sport_type: SportType,
    #[serde(default)]
    pub achievements: Vec<String>,
    #[serde(default)]
    pub total_matches: i32,
    /// Free-form per-sport stats (goals, wickets, rating, ...).
    #[serde(default)]
    pub stats: Document,
    pub image: String,
    #[serde(default)]
    pub is_featured: bool,
    pub created_by: ObjectId,
    #[serde(default)]
    pub is_deleted: bool,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

#[derive(Debug, Clone, Serialize)]
pub struct PlayerShowcaseResponse {
    pub id: String,
    pub user: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_name: Option<String>,
    pub sport_type: SportType,
    pub achievements: Vec<String>,
    pub total_matches: i32,
    pub stats: serde_json::Value,
    pub image: String,
    pub is_featured: bool,
    pub created_at: ChronoDateTime<Utc>,
}

impl From<PlayerShowcase> for PlayerShowcaseResponse {
    fn from(p: PlayerShowcase) -> Self {
        let stats = serde_json::to_value(&p.stats).unwrap_or(serde_json::Value::Null);
        PlayerShowcaseResponse {
            id: p.id.to_hex(),
            user: p.user.to_hex(),
            user_name: None,
            sport_type: p.sport_type,
            achievements: p.achievements,
            total_matches: p.total_matches,
            stats,
            image: p.image,
            is_featured: p.is_featured,
            created_at: p.created_at.to_chrono(),
        }
    }
}
