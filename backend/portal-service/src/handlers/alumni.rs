use actix_multipart::Multipart;
use actix_web::{web, HttpResponse};
use mongodb::bson::{doc, oid::ObjectId, DateTime};
use mongodb::Database;
use serde::Deserialize;

use crate::db::alumni_repo;
use crate::error::{AppError, Result};
use crate::middleware::AuthUser;
use crate::models::{Alumni, AlumniResponse, UserPermission, UserRole};
use crate::services::uploads::{Cloudinary, UploadForm};

#[derive(Debug, Deserialize)]
pub struct AlumniListQuery {
    pub batch: Option<String>,
}

/// GET /api/alumni (public)
pub async fn get_alumni(
    db: web::Data<Database>,
    query: web::Query<AlumniListQuery>,
) -> Result<HttpResponse> {
    let entries = alumni_repo::list(db.get_ref(), query.batch.as_deref()).await?;
    let entries: Vec<AlumniResponse> = entries.into_iter().map(Into::into).collect();
    Ok(HttpResponse::Ok().json(entries))
}

/// GET /api/alumni/{id} (public)
pub async fn get_alumni_by_id(
    db: web::Data<Database>,
    path: web::Path<String>,
) -> Result<HttpResponse> {
    let id = super::parse_object_id(&path.into_inner())?;
    let entry = alumni_repo::find(db.get_ref(), id)
        .await?
        .ok_or_else(|| AppError::NotFound("Alumni not found".to_string()))?;
    Ok(HttpResponse::Ok().json(AlumniResponse::from(entry)))
}

/// POST /api/alumni (admin, multipart with `profile_image`)
pub async fn create_alumni(
    db: web::Data<Database>,
    uploader: web::Data<Cloudinary>,
    user: AuthUser,
    payload: Multipart,
) -> Result<HttpResponse> {
    user.authorize(&[UserRole::Admin], &[UserPermission::ManageContent])?;

    let form = UploadForm::from_multipart(payload, 1).await?;

    let required = |name: &str| -> Result<String> {
        form.text(name)
            .filter(|v| !v.is_empty())
            .map(|v| v.to_string())
            .ok_or_else(|| AppError::Validation(format!("{} is required", name)))
    };

    let name = required("name")?;
    let batch = required("batch")?;
    let current_company = required("current_company")?;
    let current_position = required("current_position")?;
    let description = required("description")?;
    let quote = required("quote")?;

    let previous_companies: Vec<String> = match form.text("previous_companies") {
        Some(value) if !value.is_empty() => {
            super::parse_json_field(value, "previous_companies")?
        }
        _ => vec![],
    };

    let profile_image = match form.first_file() {
        Some(file) => uploader.upload(file, "alumni").await?.secure_url,
        None => return Err(AppError::Validation("profile_image is required".to_string())),
    };

    let optional = |name: &str| form.text(name).filter(|v| !v.is_empty()).map(String::from);

    let now = DateTime::now();
    let entry = Alumni {
        id: ObjectId::new(),
        name,
        batch,
        current_company,
        current_position,
        previous_companies,
        profile_image,
        description,
        quote,
        linkedin: optional("linkedin"),
        facebook: optional("facebook"),
        instagram: optional("instagram"),
        email: optional("email").map(|e| e.to_lowercase()),
        is_deleted: false,
        created_at: now,
        updated_at: now,
    };

    alumni_repo::create(db.get_ref(), &entry).await?;

    Ok(HttpResponse::Created().json(AlumniResponse::from(entry)))
}

/// PATCH /api/alumni/{id} (admin, multipart; image optional)
pub async fn update_alumni(
    db: web::Data<Database>,
    uploader: web::Data<Cloudinary>,
    user: AuthUser,
    path: web::Path<String>,
    payload: Multipart,
) -> Result<HttpResponse> {
    user.authorize(&[UserRole::Admin], &[UserPermission::ManageContent])?;

    let id = super::parse_object_id(&path.into_inner())?;
    let form = UploadForm::from_multipart(payload, 1).await?;

    let mut set = doc! {};
    for field in [
        "name",
        "batch",
        "current_company",
        "current_position",
        "description",
        "quote",
        "linkedin",
        "facebook",
        "instagram",
        "email",
    ] {
        if let Some(value) = form.text(field) {
            if !value.is_empty() {
                set.insert(field, value);
            }
        }
    }
    if let Some(value) = form.text("previous_companies") {
        let companies: Vec<String> = super::parse_json_field(value, "previous_companies")?;
        set.insert("previous_companies", companies);
    }
    if let Some(file) = form.first_file() {
        let asset = uploader.upload(file, "alumni").await?;
        set.insert("profile_image", asset.secure_url);
    }

    if set.is_empty() {
        return Err(AppError::BadRequest("Nothing to update".to_string()));
    }

    let updated = alumni_repo::update(db.get_ref(), id, set)
        .await?
        .ok_or_else(|| AppError::NotFound("Alumni not found".to_string()))?;

    Ok(HttpResponse::Ok().json(AlumniResponse::from(updated)))
}

/// DELETE /api/alumni/{id} (admin)
pub async fn delete_alumni(
    db: web::Data<Database>,
    user: AuthUser,
    path: web::Path<String>,
) -> Result<HttpResponse> {
    user.authorize(&[UserRole::Admin], &[UserPermission::ManageContent])?;

    let id = super::parse_object_id(&path.into_inner())?;
    if !alumni_repo::soft_delete(db.get_ref(), id).await? {
        return Err(AppError::NotFound("Alumni not found".to_string()));
    }

    Ok(HttpResponse::Ok().json(serde_json::json!({ "message": "Alumni deleted successfully" })))
}
