use chrono::{DateTime as ChronoDateTime, Utc};
use mongodb::bson::{oid::ObjectId, DateTime};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NoticeCategory {
    General,
    Academic,
    Administrative,
    Exam,
    Scholarship,
}

impl NoticeCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            NoticeCategory::General => "GENERAL",
            NoticeCategory::Academic => "ACADEMIC",
            NoticeCategory::Administrative => "ADMINISTRATIVE",
            NoticeCategory::Exam => "EXAM",
            NoticeCategory::Scholarship => "SCHOLARSHIP",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TargetAudience {
    Student,
    Teacher,
    Both,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AchievementCategory {
    Cp,
    Research,
    Hackathon,
    Sports,
    Other,
}

impl AchievementCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            AchievementCategory::Cp => "CP",
            AchievementCategory::Research => "RESEARCH",
            AchievementCategory::Hackathon => "HACKATHON",
            AchievementCategory::Sports => "SPORTS",
            AchievementCategory::Other => "OTHER",
        }
    }
}

/// One slide of the homepage hero carousel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeroSlide {
    pub image: String,
    pub title: String,
    #[serde(default)]
    pub subtitle: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub cta_text: String,
    #[serde(default)]
    pub cta_link: String,
}

/// Singleton homepage document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteContent {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    #[serde(default)]
    pub hero_slides: Vec<HeroSlide>,
    pub updated_by: ObjectId,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

#[derive(Debug, Clone, Serialize)]
pub struct SiteContentResponse {
    pub hero_slides: Vec<HeroSlide>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_by: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<ChronoDateTime<Utc>>,
}

impl From<SiteContent> for SiteContentResponse {
    fn from(c: SiteContent) -> Self {
        SiteContentResponse {
            hero_slides: c.hero_slides,
            updated_by: Some(c.updated_by.to_hex()),
            updated_at: Some(c.updated_at.to_chrono()),
        }
    }
}

impl SiteContentResponse {
    /// What `GET /homepage` returns before any slide has been saved.
    pub fn empty() -> Self {
        SiteContentResponse {
            hero_slides: vec![],
            updated_by: None,
            updated_at: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Notice {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub attachments: Vec<String>,
    pub publish_date: DateTime,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expiry_date: Option<DateTime>,
    #[serde(default)]
    pub is_pinned: bool,
    pub category: NoticeCategory,
    pub target_audience: TargetAudience,
    #[serde(default)]
    pub is_important: bool,
    #[serde(default = "default_true")]
    pub should_send_email: bool,
    pub created_by: ObjectId,
    #[serde(default)]
    pub is_deleted: bool,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, Serialize)]
pub struct NoticeResponse {
    pub id: String,
    pub title: String,
    pub description: String,
    pub attachments: Vec<String>,
    pub publish_date: ChronoDateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expiry_date: Option<ChronoDateTime<Utc>>,
    pub is_pinned: bool,
    pub category: NoticeCategory,
    pub target_audience: TargetAudience,
    pub is_important: bool,
    pub created_by: String,
    pub created_at: ChronoDateTime<Utc>,
}

impl From<Notice> for NoticeResponse {
    fn from(n: Notice) -> Self {
        NoticeResponse {
            id: n.id.to_hex(),
            title: n.title,
            description: n.description,
            attachments: n.attachments,
            publish_date: n.publish_date.to_chrono(),
            expiry_date: n.expiry_date.map(|d| d.to_chrono()),
            is_pinned: n.is_pinned,
            category: n.category,
            target_audience: n.target_audience,
            is_important: n.is_important,
            created_by: n.created_by.to_hex(),
            created_at: n.created_at.to_chrono(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Achievement {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub title: String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub team_name: Option<String>,
    pub competition_name: String,
    pub position: String,
    pub image: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub achieved_by: Option<ObjectId>,
    pub date: DateTime,
    pub category: AchievementCategory,
    pub created_by: ObjectId,
    #[serde(default)]
    pub is_deleted: bool,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

#[derive(Debug, Clone, Serialize)]
pub struct AchievementResponse {
    pub id: String,
    pub title: String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub team_name: Option<String>,
    pub competition_name: String,
    pub position: String,
    pub image: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub achieved_by: Option<String>,
    pub date: ChronoDateTime<Utc>,
    pub category: AchievementCategory,
    pub created_by: String,
    pub created_at: ChronoDateTime<Utc>,
}

impl From<Achievement> for AchievementResponse {
    fn from(a: Achievement) -> Self {
        AchievementResponse {
            id: a.id.to_hex(),
            title: a.title,
            description: a.description,
            team_name: a.team_name,
            competition_name: a.competition_name,
            position: a.position,
            image: a.image,
            achieved_by: a.achieved_by.map(|id| id.to_hex()),
            date: a.date.to_chrono(),
            category: a.category,
            created_by: a.created_by.to_hex(),
            created_at: a.created_at.to_chrono(),
        }
    }
}
