use actix_multipart::Multipart;
use actix_web::{web, HttpResponse};
use mongodb::bson::{doc, DateTime};
use mongodb::Database;
use serde::Deserialize;

use crate::db::event_repo::{self, EventFilter};
use crate::error::{AppError, Result};
use crate::middleware::AuthUser;
use crate::models::{Event, EventCategory, EventResponse, EventStatus, UserPermission, UserRole};
use crate::services::uploads::{Cloudinary, UploadForm};

#[derive(Debug, Deserialize)]
pub struct EventListQuery {
    pub status: Option<EventStatus>,
    pub category: Option<EventCategory>,
    pub is_featured: Option<bool>,
    pub search_term: Option<String>,
}

/// GET /api/events (public)
pub async fn get_events(
    db: web::Data<Database>,
    query: web::Query<EventListQuery>,
) -> Result<HttpResponse> {
    let events = event_repo::list(
        db.get_ref(),
        EventFilter {
            status: query.status.map(|s| s.as_str()),
            category: query.category.map(|c| c.as_str()),
            is_featured: query.is_featured,
            search_term: query.search_term.as_deref(),
        },
    )
    .await?;

    let events: Vec<EventResponse> = events.into_iter().map(Into::into).collect();
    Ok(HttpResponse::Ok().json(events))
}

/// GET /api/events/upcoming (public)
pub async fn get_upcoming_events(db: web::Data<Database>) -> Result<HttpResponse> {
    let events = event_repo::list_upcoming(db.get_ref()).await?;
    let events: Vec<EventResponse> = events.into_iter().map(Into::into).collect();
    Ok(HttpResponse::Ok().json(events))
}

/// GET /api/events/ongoing (public)
pub async fn get_ongoing_events(db: web::Data<Database>) -> Result<HttpResponse> {
    let events = event_repo::list_ongoing(db.get_ref()).await?;
    let events: Vec<EventResponse> = events.into_iter().map(Into::into).collect();
    Ok(HttpResponse::Ok().json(events))
}

/// GET /api/events/{id} (public)
pub async fn get_event_by_id(
    db: web::Data<Database>,
    path: web::Path<String>,
) -> Result<HttpResponse> {
    let id = super::parse_object_id(&path.into_inner())?;
    let event = event_repo::find(db.get_ref(), id)
        .await?
        .ok_or_else(|| AppError::NotFound("Event not found".to_string()))?;
    Ok(HttpResponse::Ok().json(EventResponse::from(event)))
}

/// POST /api/events (admin, multipart with `images` and `attachments`)
pub async fn create_event(
    db: web::Data<Database>,
    uploader: web::Data<Cloudinary>,
    user: AuthUser,
    payload: Multipart,
) -> Result<HttpResponse> {
    user.authorize(&[UserRole::Admin], &[UserPermission::ManageEvents])?;

    let form = UploadForm::from_multipart(payload, 20).await?;

    let required = |name: &str| -> Result<String> {
        form.text(name)
            .filter(|v| !v.is_empty())
            .map(|v| v.to_string())
            .ok_or_else(|| AppError::Validation(format!("{} is required", name)))
    };

    let title = required("title")?;
    let description = required("description")?;
    let location = required("location")?;
    let start_date = super::parse_datetime(&required("start_date")?)?;
    let end_date = super::parse_datetime(&required("end_date")?)?;

    if end_date < start_date {
        return Err(AppError::Validation(
            "end_date must not be before start_date".to_string(),
        ));
    }

    let category = match form.text("category") {
        Some(value) => super::parse_enum(value, "category")?,
        None => EventCategory::Other,
    };

    let images = uploader
        .upload_all(&form.files_named("images"), "events/images")
        .await?;
    let attachments = uploader
        .upload_all(&form.files_named("attachments"), "events/attachments")
        .await?;

    let now = DateTime::now();
    let event = Event {
        id: mongodb::bson::oid::ObjectId::new(),
        title,
        description,
        location,
        category,
        start_date,
        end_date,
        status: EventStatus::derive(now, start_date, end_date),
        images,
        attachments,
        is_featured: form
            .text("is_featured")
            .map(super::parse_bool)
            .unwrap_or(false),
        registration_link: form
            .text("registration_link")
            .filter(|v| !v.is_empty())
            .map(|v| v.to_string()),
        created_by: user.id,
        is_deleted: false,
        created_at: now,
        updated_at: now,
    };

    event_repo::create(db.get_ref(), &event).await?;

    Ok(HttpResponse::Created().json(EventResponse::from(event)))
}

/// PUT /api/events/{id} (admin, multipart)
/// New uploads are appended to the existing image/attachment arrays.
pub async fn update_event(
    db: web::Data<Database>,
    uploader: web::Data<Cloudinary>,
    user: AuthUser,
    path: web::Path<String>,
    payload: Multipart,
) -> Result<HttpResponse> {
    user.authorize(&[UserRole::Admin], &[UserPermission::ManageEvents])?;

    let id = super::parse_object_id(&path.into_inner())?;
    let existing = event_repo::find(db.get_ref(), id)
        .await?
        .ok_or_else(|| AppError::NotFound("Event not found".to_string()))?;

    let form = UploadForm::from_multipart(payload, 20).await?;

    let mut set = doc! {};
    for field in ["title", "description", "location", "registration_link"] {
        if let Some(value) = form.text(field) {
            if !value.is_empty() {
                set.insert(field, value);
            }
        }
    }
    if let Some(value) = form.text("category") {
        let category: EventCategory = super::parse_enum(value, "category")?;
        set.insert("category", category.as_str());
    }

    // Date changes re-derive the status.
    let start_date = match form.text("start_date") {
        Some(value) if !value.is_empty() => {
            let dt = super::parse_datetime(value)?;
            set.insert("start_date", dt);
            dt
        }
        _ => existing.start_date,
    };
    let end_date = match form.text("end_date") {
        Some(value) if !value.is_empty() => {
            let dt = super::parse_datetime(value)?;
            set.insert("end_date", dt);
            dt
        }
        _ => existing.end_date,
    };
    set.insert(
        "status",
        EventStatus::derive(DateTime::now(), start_date, end_date).as_str(),
    );

    if let Some(value) = form.text("is_featured") {
        set.insert("is_featured", super::parse_bool(value));
    }

    let new_images = uploader
        .upload_all(&form.files_named("images"), "events/images")
        .await?;
    if !new_images.is_empty() {
        let mut images = existing.images.clone();
        images.extend(new_images);
        set.insert("images", images);
    }

    let new_attachments = uploader
        .upload_all(&form.files_named("attachments"), "events/attachments")
        .await?;
    if !new_attachments.is_empty() {
        let mut attachments = existing.attachments.clone();
        attachments.extend(new_attachments);
        set.insert("attachments", attachments);
    }

    let updated = event_repo::update(db.get_ref(), id, set)
        .await?
        .ok_or_else(|| AppError::NotFound("Event not found".to_string()))?;

    Ok(HttpResponse::Ok().json(EventResponse::from(updated)))
}

/// DELETE /api/events/{id} (admin)
pub async fn delete_event(
    db: web::Data<Database>,
    user: AuthUser,
    path: web::Path<String>,
) -> Result<HttpResponse> {
    user.authorize(&[UserRole::Admin], &[UserPermission::ManageEvents])?;

    let id = super::parse_object_id(&path.into_inner())?;
    if !event_repo::soft_delete(db.get_ref(), id).await? {
        return Err(AppError::NotFound("Event not found".to_string()));
    }

    Ok(HttpResponse::Ok().json(serde_json::json!({ "message": "Event deleted successfully" })))
}
