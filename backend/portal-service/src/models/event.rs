use chrono::{DateTime as ChronoDateTime, Utc};
use mongodb::bson::{oid::ObjectId, DateTime};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EventCategory {
    Seminar,
    Workshop,
    Competition,
    Cultural,
    Reunion,
    Other,
}

impl EventCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventCategory::Seminar => "SEMINAR",
            EventCategory::Workshop => "WORKSHOP",
            EventCategory::Competition => "COMPETITION",
            EventCategory::Cultural => "CULTURAL",
            EventCategory::Reunion => "REUNION",
            EventCategory::Other => "OTHER",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EventStatus {
    Upcoming,
    Ongoing,
    Completed,
}

impl EventStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventStatus::Upcoming => "UPCOMING",
            EventStatus::Ongoing => "ONGOING",
            EventStatus::Completed => "COMPLETED",
        }
    }

    /// Status is derived from the event window, never stored stale.
    pub fn derive(now: DateTime, start: DateTime, end: DateTime) -> Self {
        if now < start {
            EventStatus::Upcoming
        } else if now > end {
            EventStatus::Completed
        } else {
            EventStatus::Ongoing
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub title: String,
    pub description: String,
    pub location: String,
    pub category: EventCategory,
    pub start_date: DateTime,
    pub end_date: DateTime,
    pub status: EventStatus,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub attachments: Vec<String>,
    #[serde(default)]
    pub is_featured: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub registration_link: Option<String>,
    pub created_by: ObjectId,
    #[serde(default)]
    pub is_deleted: bool,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

#[derive(Debug, Clone, Serialize)]
pub struct EventResponse {
    pub id: String,
    pub title: String,
    pub description: String,
    pub location: String,
    pub category: EventCategory,
    pub start_date: ChronoDateTime<Utc>,
    pub end_date: ChronoDateTime<Utc>,
    pub status: EventStatus,
    pub images: Vec<String>,
    pub attachments: Vec<String>,
    pub is_featured: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub registration_link: Option<String>,
    pub created_by: String,
    pub created_at: ChronoDateTime<Utc>,
}

impl From<Event> for EventResponse {
    fn from(e: Event) -> Self {
        EventResponse {
            id: e.id.to_hex(),
            title: e.title,
            description: e.description,
            location: e.location,
            category: e.category,
            start_date: e.start_date.to_chrono(),
            end_date: e.end_date.to_chrono(),
            status: e.status,
            images: e.images,
            attachments: e.attachments,
            is_featured: e.is_featured,
            registration_link: e.registration_link,
            created_by: e.created_by.to_hex(),
            created_at: e.created_at.to_chrono(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ts(millis: i64) -> DateTime {
        DateTime::from_millis(millis)
    }

    #[test]
    fn test_status_derivation() {
        let start = ts(1_000);
        let end = ts(2_000);
        assert_eq!(EventStatus::derive(ts(500), start, end), EventStatus::Upcoming);
        assert_eq!(EventStatus::derive(ts(1_500), start, end), EventStatus::Ongoing);
        assert_eq!(EventStatus::derive(ts(2_500), start, end), EventStatus::Completed);
    }

    #[test]
    fn test_status_boundaries_are_ongoing() {
        let start = ts(1_000);
        let end = ts(2_000);
        assert_eq!(EventStatus::derive(start, start, end), EventStatus::Ongoing);
        assert_eq!(EventStatus::derive(end, start, end), EventStatus::Ongoing);
    }
}
