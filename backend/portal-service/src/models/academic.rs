use chrono::{DateTime as ChronoDateTime, Utc};
use mongodb::bson::{oid::ObjectId, DateTime};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CourseType {
    Theory,
    Lab,
}

impl CourseType {
    pub fn as_str(&self) -> &'static str {
        match self {
            CourseType::Theory => "THEORY",
            CourseType::Lab => "LAB",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AcademicLevel {
    Undergraduate,
    Postgraduate,
}

impl AcademicLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            AcademicLevel::Undergraduate => "UNDERGRADUATE",
            AcademicLevel::Postgraduate => "POSTGRADUATE",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AcademicAchievementType {
    Publication,
    Award,
    Grant,
    Competition,
}

impl AcademicAchievementType {
    pub fn as_str(&self) -> &'static str {
        match self {
            AcademicAchievementType::Publication => "PUBLICATION",
            AcademicAchievementType::Award => "AWARD",
            AcademicAchievementType::Grant => "GRANT",
            AcademicAchievementType::Competition => "COMPETITION",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StatCategory {
    Research,
    Student,
    Faculty,
    Alumni,
}

impl StatCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            StatCategory::Research => "RESEARCH",
            StatCategory::Student => "STUDENT",
            StatCategory::Faculty => "FACULTY",
            StatCategory::Alumni => "ALUMNI",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Course {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub course_code: String,
    pub title: String,
    pub credits: f64,
    #[serde(rename = "type")]
    pub course_type: CourseType,
    pub level: AcademicLevel,
    pub semester: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub syllabus_url: Option<String>,
    pub description: String,
    #[serde(default)]
    pub is_deleted: bool,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

#[derive(Debug, Clone, Serialize)]
pub struct CourseResponse {
    pub id: String,
    pub course_code: String,
    pub title: String,
    pub credits: f64,
    #[serde(rename = "type")]
    pub course_type: CourseType,
    pub level: AcademicLevel,
    pub semester: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub syllabus_url: Option<String>,
    pub description: String,
}

impl From<Course> for CourseResponse {
    fn from(c: Course) -> Self {
        CourseResponse {
            id: c.id.to_hex(),
            course_code: c.course_code,
            title: c.title,
            credits: c.credits,
            course_type: c.course_type,
            level: c.level,
            semester: c.semester,
            syllabus_url: c.syllabus_url,
            description: c.description,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AcademicAchievement {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub title: String,
    #[serde(rename = "type")]
    pub achievement_type: AcademicAchievementType,
    pub description: String,
    pub date: DateTime,
    #[serde(default)]
    pub attachments: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<ObjectId>,
    pub created_by: ObjectId,
    #[serde(default)]
    pub is_deleted: bool,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

#[derive(Debug, Clone, Serialize)]
pub struct AcademicAchievementResponse {
    pub id: String,
    pub title: String,
    #[serde(rename = "type")]
    pub achievement_type: AcademicAchievementType,
    pub description: String,
    pub date: ChronoDateTime<Utc>,
    pub attachments: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<String>,
    pub created_by: String,
}

impl From<AcademicAchievement> for AcademicAchievementResponse {
    fn from(a: AcademicAchievement) -> Self {
        AcademicAchievementResponse {
            id: a.id.to_hex(),
            title: a.title,
            achievement_type: a.achievement_type,
            description: a.description,
            date: a.date.to_chrono(),
            attachments: a.attachments,
            user: a.user.map(|id| id.to_hex()),
            created_by: a.created_by.to_hex(),
        }
    }
}

/// A headline number shown on the academics page ("120+ publications").
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AcademicStat {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub label: String,
    pub value: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    pub category: StatCategory,
    #[serde(default)]
    pub is_deleted: bool,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

#[derive(Debug, Clone, Serialize)]
pub struct AcademicStatResponse {
    pub id: String,
    pub label: String,
    pub value: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    pub category: StatCategory,
}

impl From<AcademicStat> for AcademicStatResponse {
    fn from(s: AcademicStat) -> Self {
        AcademicStatResponse {
            id: s.id.to_hex(),
            label: s.label,
            value: s.value,
            icon: s.icon,
            category: s.category,
        }
    }
}
