use chrono::{DateTime as ChronoDateTime, Utc};
use mongodb::bson::{oid::ObjectId, DateTime};
use serde::{Deserialize, Serialize};

use super::user::SocialLinks;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SocietyCategory {
    Technical,
    Cultural,
    Sports,
    Social,
}

impl SocietyCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            SocietyCategory::Technical => "TECHNICAL",
            SocietyCategory::Cultural => "CULTURAL",
            SocietyCategory::Sports => "SPORTS",
            SocietyCategory::Social => "SOCIAL",
        }
    }
}

/// Committee designations, ordered by authority. The numeric rank drives
/// the work-assignment hierarchy check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MemberDesignation {
    President,
    VicePresident,
    GeneralSecretary,
    AssistantGeneralSecretary,
    OrganizingSecretary,
    PublicationSecretary,
    SportsSecretary,
    ExecutiveMember,
}

impl MemberDesignation {
    pub fn as_str(&self) -> &'static str {
        match self {
            MemberDesignation::President => "PRESIDENT",
            MemberDesignation::VicePresident => "VICE_PRESIDENT",
            MemberDesignation::GeneralSecretary => "GENERAL_SECRETARY",
            MemberDesignation::AssistantGeneralSecretary => "ASSISTANT_GENERAL_SECRETARY",
            MemberDesignation::OrganizingSecretary => "ORGANIZING_SECRETARY",
            MemberDesignation::PublicationSecretary => "PUBLICATION_SECRETARY",
            MemberDesignation::SportsSecretary => "SPORTS_SECRETARY",
            MemberDesignation::ExecutiveMember => "EXECUTIVE_MEMBER",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Society {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub name: String,
    pub description: String,
    pub logo: String,
    pub founded_date: DateTime,
    pub category: SocietyCategory,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub social_links: Option<SocialLinks>,
    pub created_by: ObjectId,
    #[serde(default)]
    pub is_deleted: bool,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

#[derive(Debug, Clone, Serialize)]
pub struct SocietyResponse {
    pub id: String,
    pub name: String,
    pub description: String,
    pub logo: String,
    pub founded_date: ChronoDateTime<Utc>,
    pub category: SocietyCategory,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub social_links: Option<SocialLinks>,
    pub created_by: String,
    pub created_at: ChronoDateTime<Utc>,
}

impl From<Society> for SocietyResponse {
    fn from(s: Society) -> Self {
        SocietyResponse {
            id: s.id.to_hex(),
            name: s.name,
            description: s.description,
            logo: s.logo,
            founded_date: s.founded_date.to_chrono(),
            category: s.category,
            social_links: s.social_links,
            created_by: s.created_by.to_hex(),
            created_at: s.created_at.to_chrono(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SocietyMember {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub society: ObjectId,
    pub user: ObjectId,
    pub designation: MemberDesignation,
    pub tenure_start: DateTime,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tenure_end: Option<DateTime>,
    #[serde(default = "default_true")]
    pub is_current: bool,
    #[serde(default)]
    pub achievements: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    pub created_by: ObjectId,
    #[serde(default)]
    pub is_deleted: bool,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

fn default_true() -> bool {
    true
}

/// Member row with the referenced user's display fields joined in.
#[derive(Debug, Clone, Serialize)]
pub struct SocietyMemberResponse {
    pub id: String,
    pub society: String,
    pub user: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_profile_image: Option<String>,
    pub designation: MemberDesignation,
    pub tenure_start: ChronoDateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tenure_end: Option<ChronoDateTime<Utc>>,
    pub is_current: bool,
    pub achievements: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

impl From<SocietyMember> for SocietyMemberResponse {
    fn from(m: SocietyMember) -> Self {
        SocietyMemberResponse {
            id: m.id.to_hex(),
            society: m.society.to_hex(),
            user: m.user.to_hex(),
            user_name: None,
            user_email: None,
            user_profile_image: None,
            designation: m.designation,
            tenure_start: m.tenure_start.to_chrono(),
            tenure_end: m.tenure_end.map(|d| d.to_chrono()),
            is_current: m.is_current,
            achievements: m.achievements,
            image: m.image,
        }
    }
}
