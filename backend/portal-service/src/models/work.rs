use chrono::{DateTime as ChronoDateTime, Utc};
use mongodb::bson::{oid::ObjectId, DateTime};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WorkStatus {
    Pending,
    InProgress,
    Completed,
    Cancelled,
}

impl WorkStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            WorkStatus::Pending => "PENDING",
            WorkStatus::InProgress => "IN_PROGRESS",
            WorkStatus::Completed => "COMPLETED",
            WorkStatus::Cancelled => "CANCELLED",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WorkVisibility {
    Private,
    PublicToSociety,
}

impl WorkVisibility {
    pub fn as_str(&self) -> &'static str {
        match self {
            WorkVisibility::Private => "PRIVATE",
            WorkVisibility::PublicToSociety => "PUBLIC_TO_SOCIETY",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkAssignment {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub title: String,
    pub description: String,
    pub society: ObjectId,
    pub assigned_to: ObjectId,
    pub assigned_by: ObjectId,
    pub deadline: DateTime,
    pub status: WorkStatus,
    pub visibility: WorkVisibility,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub feedback: Option<String>,
    #[serde(default)]
    pub is_deleted: bool,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

/// Assignment row with assignee/assigner/society display names joined in
/// where the caller needs them.
#[derive(Debug, Clone, Serialize)]
pub struct WorkAssignmentResponse {
    pub id: String,
    pub title: String,
    pub description: String,
    pub society: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub society_name: Option<String>,
    pub assigned_to: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assigned_to_name: Option<String>,
    pub assigned_by: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assigned_by_name: Option<String>,
    pub deadline: ChronoDateTime<Utc>,
    pub status: WorkStatus,
    pub visibility: WorkVisibility,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub feedback: Option<String>,
    pub created_at: ChronoDateTime<Utc>,
}

impl From<WorkAssignment> for WorkAssignmentResponse {
    fn from(w: WorkAssignment) -> Self {
        WorkAssignmentResponse {
            id: w.id.to_hex(),
            title: w.title,
            description: w.description,
            society: w.society.to_hex(),
            society_name: None,
            assigned_to: w.assigned_to.to_hex(),
            assigned_to_name: None,
            assigned_by: w.assigned_by.to_hex(),
            assigned_by_name: None,
            deadline: w.deadline.to_chrono(),
            status: w.status,
            visibility: w.visibility,
            feedback: w.feedback,
            created_at: w.created_at.to_chrono(),
        }
    }
}
