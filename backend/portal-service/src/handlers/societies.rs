use actix_multipart::Multipart;
use actix_web::{web, HttpResponse};
use mongodb::bson::{doc, oid::ObjectId, to_bson, DateTime};
use mongodb::Database;
use serde::Deserialize;
use std::collections::HashMap;

use crate::db::{society_repo, user_repo};
use crate::error::{AppError, Result};
use crate::middleware::AuthUser;
use crate::models::{
    MemberDesignation, SocialLinks, Society, SocietyCategory, SocietyMember,
    SocietyMemberResponse, SocietyResponse, UserPermission, UserRole,
};
use crate::services::uploads::{Cloudinary, UploadForm};

#[derive(Debug, Deserialize)]
pub struct SocietyListQuery {
    pub category: Option<SocietyCategory>,
}

/// GET /api/societies (public)
pub async fn get_societies(
    db: web::Data<Database>,
    query: web::Query<SocietyListQuery>,
) -> Result<HttpResponse> {
    let societies =
        society_repo::list(db.get_ref(), query.category.map(|c| c.as_str())).await?;
    let societies: Vec<SocietyResponse> = societies.into_iter().map(Into::into).collect();
    Ok(HttpResponse::Ok().json(societies))
}

/// GET /api/societies/{id} (public)
pub async fn get_society_by_id(
    db: web::Data<Database>,
    path: web::Path<String>,
) -> Result<HttpResponse> {
    let id = super::parse_object_id(&path.into_inner())?;
    let society = society_repo::find(db.get_ref(), id)
        .await?
        .ok_or_else(|| AppError::NotFound("Society not found".to_string()))?;
    Ok(HttpResponse::Ok().json(SocietyResponse::from(society)))
}

/// POST /api/societies (admin, multipart with `logo`)
pub async fn create_society(
    db: web::Data<Database>,
    uploader: web::Data<Cloudinary>,
    user: AuthUser,
    payload: Multipart,
) -> Result<HttpResponse> {
    user.authorize(&[UserRole::Admin], &[UserPermission::ManageSocieties])?;

    let form = UploadForm::from_multipart(payload, 1).await?;

    let required = |name: &str| -> Result<String> {
        form.text(name)
            .filter(|v| !v.is_empty())
            .map(|v| v.to_string())
            .ok_or_else(|| AppError::Validation(format!("{} is required", name)))
    };

    let name = required("name")?;
    let description = required("description")?;
    let founded_date = super::parse_datetime(&required("founded_date")?)?;
    let category = match form.text("category") {
        Some(value) => super::parse_enum(value, "category")?,
        None => SocietyCategory::Technical,
    };
    let social_links: Option<SocialLinks> = match form.text("social_links") {
        Some(value) if !value.is_empty() => Some(super::parse_json_field(value, "social_links")?),
        _ => None,
    };

    let logo = match form.first_file() {
        Some(file) => uploader.upload(file, "societies").await?.secure_url,
        None => return Err(AppError::Validation("logo is required".to_string())),
    };

    let now = DateTime::now();
    let society = Society {
        id: ObjectId::new(),
        name,
        description,
        logo,
        founded_date,
        category,
        social_links,
        created_by: user.id,
        is_deleted: false,
        created_at: now,
        updated_at: now,
    };

    society_repo::create(db.get_ref(), &society).await?;

    Ok(HttpResponse::Created().json(SocietyResponse::from(society)))
}

/// PATCH /api/societies/{id} (admin, multipart; logo optional)
pub async fn update_society(
    db: web::Data<Database>,
    uploader: web::Data<Cloudinary>,
    user: AuthUser,
    path: web::Path<String>,
    payload: Multipart,
) -> Result<HttpResponse> {
    user.authorize(&[UserRole::Admin], &[UserPermission::ManageSocieties])?;

    let id = super::parse_object_id(&path.into_inner())?;
    let form = UploadForm::from_multipart(payload, 1).await?;

    let mut set = doc! {};
    for field in ["name", "description"] {
        if let Some(value) = form.text(field) {
            if !value.is_empty() {
                set.insert(field, value);
            }
        }
    }
    if let Some(value) = form.text("founded_date") {
        if !value.is_empty() {
            set.insert("founded_date", super::parse_datetime(value)?);
        }
    }
    if let Some(value) = form.text("category") {
        let category: SocietyCategory = super::parse_enum(value, "category")?;
        set.insert("category", category.as_str());
    }
    if let Some(value) = form.text("social_links") {
        let links: SocialLinks = super::parse_json_field(value, "social_links")?;
        set.insert("social_links", to_bson(&links)?);
    }
    if let Some(file) = form.first_file() {
        let asset = uploader.upload(file, "societies").await?;
        set.insert("logo", asset.secure_url);
    }

    if set.is_empty() {
        return Err(AppError::BadRequest("Nothing to update".to_string()));
    }

    let updated = society_repo::update(db.get_ref(), id, set)
        .await?
        .ok_or_else(|| AppError::NotFound("Society not found".to_string()))?;

    Ok(HttpResponse::Ok().json(SocietyResponse::from(updated)))
}

#[derive(Debug, Deserialize)]
pub struct MemberListQuery {
    pub is_current: Option<bool>,
}

/// GET /api/societies/{id}/members (public)
/// User display fields are joined in for the committee page.
pub async fn get_members(
    db: web::Data<Database>,
    path: web::Path<String>,
    query: web::Query<MemberListQuery>,
) -> Result<HttpResponse> {
    let society_id = super::parse_object_id(&path.into_inner())?;
    let members =
        society_repo::list_members(db.get_ref(), society_id, query.is_current).await?;

    let user_ids: Vec<ObjectId> = members.iter().map(|m| m.user).collect();
    let users = user_repo::find_many_by_ids(db.get_ref(), &user_ids).await?;
    let users: HashMap<ObjectId, _> = users.into_iter().map(|u| (u.id, u)).collect();

    let members: Vec<SocietyMemberResponse> = members
        .into_iter()
        .map(|m| {
            let user = users.get(&m.user);
            let mut response = SocietyMemberResponse::from(m);
            if let Some(user) = user {
                response.user_name = Some(user.name.clone());
                response.user_email = Some(user.email.clone());
                response.user_profile_image = user.profile_image.clone();
            }
            response
        })
        .collect();

    Ok(HttpResponse::Ok().json(members))
}

/// POST /api/societies/{id}/members (admin, multipart; `image` optional)
pub async fn add_member(
    db: web::Data<Database>,
    uploader: web::Data<Cloudinary>,
    user: AuthUser,
    path: web::Path<String>,
    payload: Multipart,
) -> Result<HttpResponse> {
    user.authorize(&[UserRole::Admin], &[UserPermission::ManageSocieties])?;

    let society_id = super::parse_object_id(&path.into_inner())?;
    society_repo::find(db.get_ref(), society_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Society not found".to_string()))?;

    let form = UploadForm::from_multipart(payload, 1).await?;

    let member_user = super::parse_object_id(
        form.text("user")
            .ok_or_else(|| AppError::Validation("user is required".to_string()))?,
    )?;
    let designation: MemberDesignation = super::parse_enum(
        form.text("designation")
            .ok_or_else(|| AppError::Validation("designation is required".to_string()))?,
        "designation",
    )?;
    let tenure_start = super::parse_datetime(
        form.text("tenure_start")
            .ok_or_else(|| AppError::Validation("tenure_start is required".to_string()))?,
    )?;
    let tenure_end = match form.text("tenure_end") {
        Some(value) if !value.is_empty() => Some(super::parse_datetime(value)?),
        _ => None,
    };
    let achievements: Vec<String> = match form.text("achievements") {
        Some(value) if !value.is_empty() => super::parse_json_field(value, "achievements")?,
        _ => vec![],
    };

    let image = match form.first_file() {
        Some(file) => Some(uploader.upload(file, "societies/members").await?.secure_url),
        None => None,
    };

    let now = DateTime::now();
    let member = SocietyMember {
        id: ObjectId::new(),
        society: society_id,
        user: member_user,
        designation,
        tenure_start,
        tenure_end,
        is_current: form.text("is_current").map(super::parse_bool).unwrap_or(true),
        achievements,
        image,
        created_by: user.id,
        is_deleted: false,
        created_at: now,
        updated_at: now,
    };

    society_repo::add_member(db.get_ref(), &member).await?;

    Ok(HttpResponse::Created().json(SocietyMemberResponse::from(member)))
}

#[derive(Debug, Deserialize)]
pub struct UpdateMemberRequest {
    pub designation: Option<MemberDesignation>,
    pub tenure_start: Option<String>,
    pub tenure_end: Option<String>,
    pub is_current: Option<bool>,
    pub achievements: Option<Vec<String>>,
}

/// PATCH /api/societies/members/{member_id} (admin)
pub async fn update_member(
    db: web::Data<Database>,
    user: AuthUser,
    path: web::Path<String>,
    req: web::Json<UpdateMemberRequest>,
) -> Result<HttpResponse> {
    user.authorize(&[UserRole::Admin], &[UserPermission::ManageSocieties])?;

    let member_id = super::parse_object_id(&path.into_inner())?;

    let mut set = doc! {};
    if let Some(designation) = req.designation {
        set.insert("designation", designation.as_str());
    }
    if let Some(value) = &req.tenure_start {
        set.insert("tenure_start", super::parse_datetime(value)?);
    }
    if let Some(value) = &req.tenure_end {
        set.insert("tenure_end", super::parse_datetime(value)?);
    }
    if let Some(is_current) = req.is_current {
        set.insert("is_current", is_current);
    }
    if let Some(achievements) = &req.achievements {
        set.insert("achievements", achievements.clone());
    }

    if set.is_empty() {
        return Err(AppError::BadRequest("Nothing to update".to_string()));
    }

    let updated = society_repo::update_member(db.get_ref(), member_id, set)
        .await?
        .ok_or_else(|| AppError::NotFound("Member record not found".to_string()))?;

    Ok(HttpResponse::Ok().json(SocietyMemberResponse::from(updated)))
}

/// DELETE /api/societies/members/{member_id} (admin)
pub async fn remove_member(
    db: web::Data<Database>,
    user: AuthUser,
    path: web::Path<String>,
) -> Result<HttpResponse> {
    user.authorize(&[UserRole::Admin], &[UserPermission::ManageSocieties])?;

    let member_id = super::parse_object_id(&path.into_inner())?;
    if !society_repo::soft_delete_member(db.get_ref(), member_id).await? {
        return Err(AppError::NotFound("Member record not found".to_string()));
    }

    Ok(HttpResponse::Ok().json(serde_json::json!({ "message": "Member removed successfully" })))
}
