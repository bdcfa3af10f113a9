use chrono::{DateTime as ChronoDateTime, Utc};
use mongodb::bson::{oid::ObjectId, DateTime};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BlogStatus {
    Pending,
    Published,
    Rejected,
}

impl BlogStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BlogStatus::Pending => "PENDING",
            BlogStatus::Published => "PUBLISHED",
            BlogStatus::Rejected => "REJECTED",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Blog {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub title: String,
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cover_image: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    pub author: ObjectId,
    pub status: BlogStatus,
    #[serde(default)]
    pub is_deleted: bool,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

#[derive(Debug, Clone, Serialize)]
pub struct BlogResponse {
    pub id: String,
    pub title: String,
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cover_image: Option<String>,
    pub tags: Vec<String>,
    pub author: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author_name: Option<String>,
    pub status: BlogStatus,
    pub created_at: ChronoDateTime<Utc>,
}

impl From<Blog> for BlogResponse {
    fn from(b: Blog) -> Self {
        BlogResponse {
            id: b.id.to_hex(),
            title: b.title,
            content: b.content,
            cover_image: b.cover_image,
            tags: b.tags,
            author: b.author.to_hex(),
            author_name: None,
            status: b.status,
            created_at: b.created_at.to_chrono(),
        }
    }
}
