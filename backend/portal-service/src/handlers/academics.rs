use actix_multipart::Multipart;
use actix_web::{web, HttpResponse};
use mongodb::bson::{doc, oid::ObjectId, DateTime};
use mongodb::Database;
use serde::Deserialize;
use validator::Validate;

use crate::db::academic_repo;
use crate::error::{AppError, Result};
use crate::middleware::AuthUser;
use crate::models::{
    AcademicAchievement, AcademicAchievementResponse, AcademicAchievementType, AcademicLevel,
    AcademicStatResponse, Course, CourseResponse, CourseType, StatCategory, UserPermission,
    UserRole,
};
use crate::services::uploads::{Cloudinary, UploadForm};

// Courses ------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct CourseListQuery {
    pub level: Option<AcademicLevel>,
    pub semester: Option<i32>,
}

/// GET /api/academic/courses (public)
pub async fn get_courses(
    db: web::Data<Database>,
    query: web::Query<CourseListQuery>,
) -> Result<HttpResponse> {
    let courses = academic_repo::list_courses(
        db.get_ref(),
        query.level.map(|l| l.as_str()),
        query.semester,
    )
    .await?;
    let courses: Vec<CourseResponse> = courses.into_iter().map(Into::into).collect();
    Ok(HttpResponse::Ok().json(courses))
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateCourseRequest {
    #[validate(length(min = 2, max = 20))]
    pub course_code: String,

    #[validate(length(min = 2, max = 200))]
    pub title: String,

    #[validate(range(min = 0.5, max = 10.0))]
    pub credits: f64,

    #[serde(rename = "type")]
    pub course_type: CourseType,

    pub level: AcademicLevel,

    #[validate(range(min = 1, max = 12))]
    pub semester: i32,

    #[validate(url)]
    pub syllabus_url: Option<String>,

    #[validate(length(min = 10))]
    pub description: String,
}

/// POST /api/academic/courses (admin)
pub async fn create_course(
    db: web::Data<Database>,
    user: AuthUser,
    req: web::Json<CreateCourseRequest>,
) -> Result<HttpResponse> {
    user.authorize(&[UserRole::Admin], &[UserPermission::ManageContent])?;
    req.validate()?;

    if academic_repo::find_course_by_code(db.get_ref(), &req.course_code)
        .await?
        .is_some()
    {
        return Err(AppError::Conflict(format!(
            "Course {} already exists",
            req.course_code
        )));
    }

    let now = DateTime::now();
    let course = Course {
        id: ObjectId::new(),
        course_code: req.course_code.clone(),
        title: req.title.clone(),
        credits: req.credits,
        course_type: req.course_type,
        level: req.level,
        semester: req.semester,
        syllabus_url: req.syllabus_url.clone(),
        description: req.description.clone(),
        is_deleted: false,
        created_at: now,
        updated_at: now,
    };

    academic_repo::create_course(db.get_ref(), &course).await?;

    Ok(HttpResponse::Created().json(CourseResponse::from(course)))
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateCourseRequest {
    #[validate(length(min = 2, max = 200))]
    pub title: Option<String>,

    #[validate(range(min = 0.5, max = 10.0))]
    pub credits: Option<f64>,

    #[serde(rename = "type")]
    pub course_type: Option<CourseType>,

    pub level: Option<AcademicLevel>,

    #[validate(range(min = 1, max = 12))]
    pub semester: Option<i32>,

    #[validate(url)]
    pub syllabus_url: Option<String>,

    #[validate(length(min = 10))]
    pub description: Option<String>,
}

/// PATCH /api/academic/courses/{id} (admin)
pub async fn update_course(
    db: web::Data<Database>,
    user: AuthUser,
    path: web::Path<String>,
    req: web::Json<UpdateCourseRequest>,
) -> Result<HttpResponse> {
    user.authorize(&[UserRole::Admin], &[])?;
    req.validate()?;

    let id = super::parse_object_id(&path.into_inner())?;

    let mut set = doc! {};
    if let Some(title) = &req.title {
        set.insert("title", title);
    }
    if let Some(credits) = req.credits {
        set.insert("credits", credits);
    }
    if let Some(course_type) = req.course_type {
        set.insert("type", course_type.as_str());
    }
    if let Some(level) = req.level {
        set.insert("level", level.as_str());
    }
    if let Some(semester) = req.semester {
        set.insert("semester", semester);
    }
    if let Some(syllabus_url) = &req.syllabus_url {
        set.insert("syllabus_url", syllabus_url);
    }
    if let Some(description) = &req.description {
        set.insert("description", description);
    }

    if set.is_empty() {
        return Err(AppError::BadRequest("Nothing to update".to_string()));
    }

    let updated = academic_repo::update_course(db.get_ref(), id, set)
        .await?
        .ok_or_else(|| AppError::NotFound("Course not found".to_string()))?;

    Ok(HttpResponse::Ok().json(CourseResponse::from(updated)))
}

/// DELETE /api/academic/courses/{id} (admin)
pub async fn delete_course(
    db: web::Data<Database>,
    user: AuthUser,
    path: web::Path<String>,
) -> Result<HttpResponse> {
    user.authorize(&[UserRole::Admin], &[])?;

    let id = super::parse_object_id(&path.into_inner())?;
    if !academic_repo::soft_delete_course(db.get_ref(), id).await? {
        return Err(AppError::NotFound("Course not found".to_string()));
    }

    Ok(HttpResponse::Ok().json(serde_json::json!({ "message": "Course deleted successfully" })))
}

// Achievements -------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct AcademicAchievementQuery {
    #[serde(rename = "type")]
    pub achievement_type: Option<AcademicAchievementType>,
}

/// GET /api/academic/achievements (public)
pub async fn get_academic_achievements(
    db: web::Data<Database>,
    query: web::Query<AcademicAchievementQuery>,
) -> Result<HttpResponse> {
    let achievements =
        academic_repo::list_achievements(db.get_ref(), query.achievement_type.map(|t| t.as_str()))
            .await?;
    let achievements: Vec<AcademicAchievementResponse> =
        achievements.into_iter().map(Into::into).collect();
    Ok(HttpResponse::Ok().json(achievements))
}

/// POST /api/academic/achievements (admin/teacher, multipart)
pub async fn create_academic_achievement(
    db: web::Data<Database>,
    uploader: web::Data<Cloudinary>,
    user: AuthUser,
    payload: Multipart,
) -> Result<HttpResponse> {
    user.authorize(
        &[UserRole::Admin, UserRole::Teacher],
        &[UserPermission::ManageAchievements],
    )?;

    let form = UploadForm::from_multipart(payload, 5).await?;

    let required = |name: &str| -> Result<String> {
        form.text(name)
            .filter(|v| !v.is_empty())
            .map(|v| v.to_string())
            .ok_or_else(|| AppError::Validation(format!("{} is required", name)))
    };

    let title = required("title")?;
    let description = required("description")?;
    let achievement_type: AcademicAchievementType =
        super::parse_enum(&required("type")?, "type")?;
    let date = super::parse_datetime(&required("date")?)?;

    let achievement_user = match form.text("user") {
        Some(value) if !value.is_empty() => Some(super::parse_object_id(value)?),
        _ => None,
    };

    let attachments = uploader
        .upload_all(&form.files_named("attachments"), "academic/achievements")
        .await?;

    let now = DateTime::now();
    let achievement = AcademicAchievement {
        id: ObjectId::new(),
        title,
        achievement_type,
        description,
        date,
        attachments,
        user: achievement_user,
        created_by: user.id,
        is_deleted: false,
        created_at: now,
        updated_at: now,
    };

    academic_repo::create_achievement(db.get_ref(), &achievement).await?;

    Ok(HttpResponse::Created().json(AcademicAchievementResponse::from(achievement)))
}

// Stats --------------------------------------------------------------------

/// GET /api/academic/stats (public)
pub async fn get_stats(db: web::Data<Database>) -> Result<HttpResponse> {
    let stats = academic_repo::list_stats(db.get_ref()).await?;
    let stats: Vec<AcademicStatResponse> = stats.into_iter().map(Into::into).collect();
    Ok(HttpResponse::Ok().json(stats))
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpsertStatRequest {
    #[validate(length(min = 1, max = 100))]
    pub label: String,

    #[validate(length(min = 1, max = 50))]
    pub value: String,

    pub icon: Option<String>,
    pub category: StatCategory,
}

/// POST /api/academic/stats (admin) — upsert by label.
pub async fn upsert_stat(
    db: web::Data<Database>,
    user: AuthUser,
    req: web::Json<UpsertStatRequest>,
) -> Result<HttpResponse> {
    user.authorize(&[UserRole::Admin], &[UserPermission::ManageContent])?;
    req.validate()?;

    let stat = academic_repo::upsert_stat(
        db.get_ref(),
        &req.label,
        &req.value,
        req.icon.as_deref(),
        req.category.as_str(),
    )
    .await?;

    Ok(HttpResponse::Ok().json(AcademicStatResponse::from(stat)))
}
