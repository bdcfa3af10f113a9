use actix_multipart::Multipart;
use actix_web::{web, HttpResponse};
use mongodb::bson::{doc, to_bson, DateTime};
use mongodb::Database;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::db::user_repo;
use crate::error::{AppError, Result};
use crate::middleware::AuthUser;
use crate::models::{
    Experience, NotificationPreferences, PublicUser, Research, SocialLinks, StudentProject,
    UserPermission, UserResponse, UserRole, UserStatus,
};
use crate::security::password;
use crate::services::uploads::{Cloudinary, UploadForm};

#[derive(Debug, Deserialize)]
pub struct ListUsersQuery {
    pub role: Option<UserRole>,
    pub status: Option<UserStatus>,
    pub search: Option<String>,
}

/// GET /api/users (admin)
pub async fn list_users(
    db: web::Data<Database>,
    user: AuthUser,
    query: web::Query<ListUsersQuery>,
) -> Result<HttpResponse> {
    user.authorize(&[UserRole::Admin], &[UserPermission::ManageUsers])?;

    let users = user_repo::list(
        db.get_ref(),
        query.role,
        query.status,
        query.search.as_deref(),
    )
    .await?;

    let users: Vec<UserResponse> = users.into_iter().map(Into::into).collect();
    Ok(HttpResponse::Ok().json(users))
}

#[derive(Debug, Deserialize, Serialize, Validate)]
pub struct BulkUserEntry {
    #[validate(length(min = 2))]
    pub name: String,

    #[validate(email)]
    pub email: String,

    #[validate(length(min = 8))]
    pub password: String,

    #[validate(length(min = 6))]
    pub phone: String,

    pub role: UserRole,

    // Student fields
    pub student_id: Option<String>,
    pub batch: Option<String>,
    pub session: Option<String>,
    pub enrollment_year: Option<i32>,

    // Teacher fields
    pub designation: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct BulkCreateRequest {
    #[validate(length(min = 1))]
    pub users: Vec<BulkUserEntry>,
}

#[derive(Debug, Serialize)]
pub struct BulkCreateRow {
    pub email: String,
    pub outcome: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

/// POST /api/users/bulk-create (admin)
/// Admin-added accounts start active and verified; duplicates are skipped
/// and reported per row.
pub async fn bulk_create_users(
    db: web::Data<Database>,
    user: AuthUser,
    req: web::Json<BulkCreateRequest>,
) -> Result<HttpResponse> {
    user.authorize(&[UserRole::Admin], &[UserPermission::ManageAccounts])?;
    req.validate()?;

    let mut rows = Vec::with_capacity(req.users.len());

    for entry in &req.users {
        if user_repo::find_by_email(db.get_ref(), &entry.email).await?.is_some() {
            rows.push(BulkCreateRow {
                email: entry.email.clone(),
                outcome: "skipped".into(),
                reason: Some("email already exists".into()),
            });
            continue;
        }

        if let Some(student_id) = &entry.student_id {
            if user_repo::find_by_student_id(db.get_ref(), student_id).await?.is_some() {
                rows.push(BulkCreateRow {
                    email: entry.email.clone(),
                    outcome: "skipped".into(),
                    reason: Some("student id already exists".into()),
                });
                continue;
            }
        }

        let now = DateTime::now();
        let mut new_user = crate::models::User {
            id: mongodb::bson::oid::ObjectId::new(),
            name: entry.name.clone(),
            email: entry.email.to_lowercase(),
            password_hash: password::hash_password(&entry.password)?,
            role: entry.role,
            permissions: vec![],
            phone: entry.phone.clone(),
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
            created_at: now,
            updated_at: now,
        };

        match entry.role {
            UserRole::Student => {
                let (Some(student_id), Some(batch), Some(session), Some(enrollment_year)) = (
                    entry.student_id.clone(),
                    entry.batch.clone(),
                    entry.session.clone(),
                    entry.enrollment_year,
                ) else {
                    rows.push(BulkCreateRow {
                        email: entry.email.clone(),
                        outcome: "skipped".into(),
                        reason: Some("missing student fields".into()),
                    });
                    continue;
                };
                new_user.student = Some(crate::models::StudentProfile {
                    student_id,
                    batch,
                    session,
                    cgpa: None,
                    enrollment_year,
                    projects: vec![],
                    is_alumni: false,
                });
            }
            UserRole::Teacher => {
                let Some(designation) = entry.designation.clone() else {
                    rows.push(BulkCreateRow {
                        email: entry.email.clone(),
                        outcome: "skipped".into(),
                        reason: Some("missing designation".into()),
                    });
                    continue;
                };
                new_user.teacher = Some(crate::models::TeacherProfile {
                    designation,
                    department: "Computer Science and Engineering".to_string(),
                    research_interests: vec![],
                    publications: vec![],
                });
            }
            UserRole::Admin => {}
        }

        user_repo::create_user(db.get_ref(), &new_user).await?;
        rows.push(BulkCreateRow {
            email: entry.email.clone(),
            outcome: "created".into(),
            reason: None,
        });
    }

    Ok(HttpResponse::Created().json(rows))
}

/// GET /api/users/faculty (public)
pub async fn get_faculty(db: web::Data<Database>) -> Result<HttpResponse> {
    let users = user_repo::list_faculty(db.get_ref()).await?;
    let users: Vec<PublicUser> = users.into_iter().map(Into::into).collect();
    Ok(HttpResponse::Ok().json(users))
}

/// GET /api/users/students (authenticated)
pub async fn get_students(db: web::Data<Database>, _user: AuthUser) -> Result<HttpResponse> {
    let users = user_repo::list_students(db.get_ref()).await?;
    let users: Vec<PublicUser> = users.into_iter().map(Into::into).collect();
    Ok(HttpResponse::Ok().json(users))
}

#[derive(Debug, Deserialize)]
pub struct UpdateStatusRequest {
    pub status: UserStatus,
}

/// PATCH /api/users/{id}/status (admin)
pub async fn update_user_status(
    db: web::Data<Database>,
    user: AuthUser,
    path: web::Path<String>,
    req: web::Json<UpdateStatusRequest>,
) -> Result<HttpResponse> {
    user.authorize(&[UserRole::Admin], &[UserPermission::ManageAccounts])?;

    let id = super::parse_object_id(&path.into_inner())?;
    let updated = user_repo::update_status(db.get_ref(), id, req.status)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

    Ok(HttpResponse::Ok().json(UserResponse::from(updated)))
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateUserRequest {
    #[validate(length(min = 2))]
    pub name: Option<String>,

    #[validate(length(min = 6))]
    pub phone: Option<String>,

    pub status: Option<UserStatus>,
    pub permissions: Option<Vec<UserPermission>>,
    pub designation: Option<String>,
}

/// PATCH /api/users/{id} (admin)
pub async fn update_user(
    db: web::Data<Database>,
    user: AuthUser,
    path: web::Path<String>,
    req: web::Json<UpdateUserRequest>,
) -> Result<HttpResponse> {
    user.authorize(&[UserRole::Admin], &[UserPermission::ManageUsers])?;
    req.validate()?;

    let id = super::parse_object_id(&path.into_inner())?;

    let mut set = doc! {};
    if let Some(name) = &req.name {
        set.insert("name", name);
    }
    if let Some(phone) = &req.phone {
        set.insert("phone", phone);
    }
    if let Some(status) = req.status {
        set.insert("status", status.as_str());
    }
    if let Some(permissions) = &req.permissions {
        set.insert("permissions", to_bson(permissions)?);
    }
    if let Some(designation) = &req.designation {
        set.insert("teacher.designation", designation);
    }

    if set.is_empty() {
        return Err(AppError::BadRequest("Nothing to update".to_string()));
    }

    let updated = user_repo::update_fields(db.get_ref(), id, set)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

    Ok(HttpResponse::Ok().json(UserResponse::from(updated)))
}

/// PATCH /api/users/me (authenticated, multipart)
/// Profile fields arrive as form fields; complex values are JSON-encoded.
pub async fn update_my_profile(
    db: web::Data<Database>,
    uploader: web::Data<Cloudinary>,
    user: AuthUser,
    payload: Multipart,
) -> Result<HttpResponse> {
    let form = UploadForm::from_multipart(payload, 1).await?;

    let mut set = doc! {};

    if let Some(name) = form.text("name") {
        if name.len() < 2 {
            return Err(AppError::Validation("Name is too short".to_string()));
        }
        set.insert("name", name);
    }
    if let Some(phone) = form.text("phone") {
        set.insert("phone", phone);
    }
    if let Some(value) = form.text("social_links") {
        let links: SocialLinks = super::parse_json_field(value, "social_links")?;
        set.insert("social_links", to_bson(&links)?);
    }
    if let Some(value) = form.text("notification_preferences") {
        let preferences: NotificationPreferences =
            super::parse_json_field(value, "notification_preferences")?;
        set.insert("notification_preferences", to_bson(&preferences)?);
    }
    if let Some(value) = form.text("experiences") {
        let experiences: Vec<Experience> = super::parse_json_field(value, "experiences")?;
        set.insert("experiences", to_bson(&experiences)?);
    }
    if let Some(value) = form.text("researches") {
        let researches: Vec<Research> = super::parse_json_field(value, "researches")?;
        set.insert("researches", to_bson(&researches)?);
    }
    if let Some(value) = form.text("projects") {
        let projects: Vec<StudentProject> = super::parse_json_field(value, "projects")?;
        set.insert("student.projects", to_bson(&projects)?);
    }

    if let Some(file) = form.first_file() {
        let asset = uploader.upload(file, "users").await?;
        set.insert("profile_image", asset.secure_url);
    }

    if set.is_empty() {
        return Err(AppError::BadRequest("Nothing to update".to_string()));
    }

    let updated = user_repo::update_fields(db.get_ref(), user.id, set)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

    Ok(HttpResponse::Ok().json(UserResponse::from(updated)))
}

/// DELETE /api/users/{id} (admin)
pub async fn delete_user(
    db: web::Data<Database>,
    user: AuthUser,
    path: web::Path<String>,
) -> Result<HttpResponse> {
    user.authorize(&[UserRole::Admin], &[UserPermission::ManageUsers])?;

    let id = super::parse_object_id(&path.into_inner())?;
    if id == user.id {
        return Err(AppError::BadRequest(
            "You cannot delete your own account".to_string(),
        ));
    }

    if !user_repo::soft_delete(db.get_ref(), id).await? {
        return Err(AppError::NotFound("User not found".to_string()));
    }

    Ok(HttpResponse::Ok().json(serde_json::json!({ "message": "User deleted successfully" })))
}
