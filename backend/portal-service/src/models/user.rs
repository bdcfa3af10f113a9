use chrono::{DateTime as ChronoDateTime, Utc};
use mongodb::bson::{oid::ObjectId, DateTime};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UserRole {
    Student,
    Teacher,
    Admin,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Student => "STUDENT",
            UserRole::Teacher => "TEACHER",
            UserRole::Admin => "ADMIN",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UserStatus {
    Active,
    Inactive,
    Suspended,
}

impl UserStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserStatus::Active => "ACTIVE",
            UserStatus::Inactive => "INACTIVE",
            UserStatus::Suspended => "SUSPENDED",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UserPermission {
    ManageUsers,
    ManageContent,
    ManageSocieties,
    ManageApplications,
    ViewEmailLogs,
    ManageAccounts,
    ManageAchievements,
    ManageNotices,
    ManageEvents,
    ManageResearch,
    ManageBlogs,
    ManageWork,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NotificationPreferences {
    #[serde(default)]
    pub notices: Vec<String>,
    #[serde(default)]
    pub events: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SocialLinks {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub facebook: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub github: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub linkedin: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instagram: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Experience {
    pub title: String,
    pub company: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    pub start_date: DateTime,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<DateTime>,
    #[serde(default)]
    pub current: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Research {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub publication_link: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub journal: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub publication_date: Option<DateTime>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StudentProject {
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub github_link: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub live_link: Option<String>,
    #[serde(default)]
    pub technologies: Vec<String>,
}

/// Student-specific profile embedded in the user document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StudentProfile {
    pub student_id: String,
    pub batch: String,
    pub session: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cgpa: Option<f64>,
    pub enrollment_year: i32,
    #[serde(default)]
    pub projects: Vec<StudentProject>,
    #[serde(default)]
    pub is_alumni: bool,
}

/// Teacher-specific profile embedded in the user document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TeacherProfile {
    pub designation: String,
    #[serde(default = "default_department")]
    pub department: String,
    #[serde(default)]
    pub research_interests: Vec<String>,
    #[serde(default)]
    pub publications: Vec<String>,
}

fn default_department() -> String {
    "Computer Science and Engineering".to_string()
}

/// One collection holds all roles; `student`/`teacher` carry the
/// role-specific fields. Verification code fields and the password hash
/// stay server-side only.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub role: UserRole,
    #[serde(default)]
    pub permissions: Vec<UserPermission>,
    pub phone: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile_image: Option<String>,
    pub status: UserStatus,
    #[serde(default)]
    pub is_email_verified: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub verification_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub verification_code_expires: Option<DateTime>,
    #[serde(default)]
    pub notification_preferences: NotificationPreferences,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub social_links: Option<SocialLinks>,
    #[serde(default)]
    pub experiences: Vec<Experience>,
    #[serde(default)]
    pub researches: Vec<Research>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub student: Option<StudentProfile>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub teacher: Option<TeacherProfile>,
    #[serde(default)]
    pub is_deleted: bool,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

impl User {
    pub fn has_permission(&self, permission: UserPermission) -> bool {
        self.permissions.contains(&permission)
    }
}

/// Sanitized user representation returned by the API.
#[derive(Debug, Clone, Serialize)]
pub struct UserResponse {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: UserRole,
    pub permissions: Vec<UserPermission>,
    pub phone: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile_image: Option<String>,
    pub status: UserStatus,
    pub is_email_verified: bool,
    pub notification_preferences: NotificationPreferences,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub social_links: Option<SocialLinks>,
    pub experiences: Vec<Experience>,
    pub researches: Vec<Research>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub student: Option<StudentProfile>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub teacher: Option<TeacherProfile>,
    pub created_at: ChronoDateTime<Utc>,
    pub updated_at: ChronoDateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(u: User) -> Self {
        UserResponse {
            id: u.id.to_hex(),
            name: u.name,
            email: u.email,
            role: u.role,
            permissions: u.permissions,
            phone: u.phone,
            profile_image: u.profile_image,
            status: u.status,
            is_email_verified: u.is_email_verified,
            notification_preferences: u.notification_preferences,
            social_links: u.social_links,
            experiences: u.experiences,
            researches: u.researches,
            student: u.student,
            teacher: u.teacher,
            created_at: u.created_at.to_chrono(),
            updated_at: u.updated_at.to_chrono(),
        }
    }
}

/// Minimal public listing entry (faculty directory and similar).
#[derive(Debug, Clone, Serialize)]
pub struct PublicUser {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: UserRole,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile_image: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub social_links: Option<SocialLinks>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub teacher: Option<TeacherProfile>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub student: Option<StudentProfile>,
}

impl From<User> for PublicUser {
    fn from(u: User) -> Self {
        PublicUser {
            id: u.id.to_hex(),
            name: u.name,
            email: u.email,
            role: u.role,
            profile_image: u.profile_image,
            social_links: u.social_links,
            teacher: u.teacher,
            student: u.student,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mongodb::bson;

    fn sample_user() -> User {
        User {
            id: ObjectId::new(),
            name: "Jane".into(),
            email: "jane@univ.edu".into(),
            password_hash: "$argon2id$stub".into(),
            role: UserRole::Student,
            permissions: vec![UserPermission::ManageNotices],
            phone: "0170".into(),
            profile_image: None,
            status: UserStatus::Active,
            is_email_verified: true,
            verification_code: None,
            verification_code_expires: None,
            notification_preferences: NotificationPreferences::default(),
            social_links: None,
            experiences: vec![],
            researches: vec![],
            student: None,
            teacher: None,
            is_deleted: false,
            created_at: DateTime::now(),
            updated_at: DateTime::now(),
        }
    }

    #[test]
    fn test_role_round_trips_as_screaming_snake_case() {
        let bson = bson::to_bson(&UserRole::Student).unwrap();
        assert_eq!(bson, bson::Bson::String("STUDENT".into()));
        let back: UserRole = bson::from_bson(bson::Bson::String("TEACHER".into())).unwrap();
        assert_eq!(back, UserRole::Teacher);
    }

    #[test]
    fn test_user_response_hides_sensitive_fields() {
        let user = sample_user();
        let resp = UserResponse::from(user);
        let json = serde_json::to_value(&resp).unwrap();
        assert!(json.get("password_hash").is_none());
        assert!(json.get("verification_code").is_none());
    }

    #[test]
    fn test_has_permission() {
        let user = sample_user();
        assert!(user.has_permission(UserPermission::ManageNotices));
        assert!(!user.has_permission(UserPermission::ManageEvents));
    }
}
