use actix_multipart::Multipart;
use actix_web::{web, HttpResponse};
use mongodb::bson::{doc, oid::ObjectId, DateTime};
use mongodb::Database;
use serde::Deserialize;
use std::collections::HashMap;

use crate::db::{sports_repo, user_repo};
use crate::error::{AppError, Result};
use crate::middleware::AuthUser;
use crate::models::{
    PlayerShowcase, PlayerShowcaseResponse, SportType, Tournament, TournamentResponse,
    TournamentStatus, UserPermission, UserRole,
};
use crate::services::uploads::{Cloudinary, UploadForm};

#[derive(Debug, Deserialize)]
pub struct TournamentListQuery {
    pub sport_type: Option<SportType>,
    pub status: Option<TournamentStatus>,
}

/// GET /api/sports/tournaments (public)
pub async fn get_tournaments(
    db: web::Data<Database>,
    query: web::Query<TournamentListQuery>,
) -> Result<HttpResponse> {
    let tournaments = sports_repo::list_tournaments(
        db.get_ref(),
        query.sport_type.map(|s| s.as_str()),
        query.status.map(|s| s.as_str()),
    )
    .await?;

    let tournaments: Vec<TournamentResponse> = tournaments.into_iter().map(Into::into).collect();
    Ok(HttpResponse::Ok().json(tournaments))
}

/// GET /api/sports/tournaments/{id} (public)
pub async fn get_tournament_by_id(
    db: web::Data<Database>,
    path: web::Path<String>,
) -> Result<HttpResponse> {
    let id = super::parse_object_id(&path.into_inner())?;
    let tournament = sports_repo::find_tournament(db.get_ref(), id)
        .await?
        .ok_or_else(|| AppError::NotFound("Tournament not found".to_string()))?;
    Ok(HttpResponse::Ok().json(TournamentResponse::from(tournament)))
}

/// POST /api/sports/tournaments (admin, multipart)
pub async fn create_tournament(
    db: web::Data<Database>,
    uploader: web::Data<Cloudinary>,
    user: AuthUser,
    payload: Multipart,
) -> Result<HttpResponse> {
    user.authorize(&[UserRole::Admin], &[UserPermission::ManageContent])?;

    let form = UploadForm::from_multipart(payload, 10).await?;

    let required = |name: &str| -> Result<String> {
        form.text(name)
            .filter(|v| !v.is_empty())
            .map(|v| v.to_string())
            .ok_or_else(|| AppError::Validation(format!("{} is required", name)))
    };

    let name = required("name")?;
    let description = required("description")?;
    let venue = required("venue")?;
    let sport_type: SportType = super::parse_enum(&required("sport_type")?, "sport_type")?;
    let start_date = super::parse_datetime(&required("start_date")?)?;
    let end_date = super::parse_datetime(&required("end_date")?)?;

    if end_date < start_date {
        return Err(AppError::Validation(
            "end_date must not be before start_date".to_string(),
        ));
    }

    let images = uploader
        .upload_all(&form.files_named("images"), "sports/tournaments")
        .await?;

    let optional = |name: &str| form.text(name).filter(|v| !v.is_empty()).map(String::from);

    let now = DateTime::now();
    let tournament = Tournament {
        id: ObjectId::new(),
        name,
        sport_type,
        start_date,
        end_date,
        venue,
        status: TournamentStatus::derive(now, start_date, end_date),
        winner: optional("winner"),
        runner_up: optional("runner_up"),
        best_player: optional("best_player"),
        images,
        description,
        created_by: user.id,
        is_deleted: false,
        created_at: now,
        updated_at: now,
    };

    sports_repo::create_tournament(db.get_ref(), &tournament).await?;

    Ok(HttpResponse::Created().json(TournamentResponse::from(tournament)))
}

/// PUT /api/sports/tournaments/{id} (admin, multipart)
pub async fn update_tournament(
    db: web::Data<Database>,
    uploader: web::Data<Cloudinary>,
    user: AuthUser,
    path: web::Path<String>,
    payload: Multipart,
) -> Result<HttpResponse> {
    user.authorize(&[UserRole::Admin], &[UserPermission::ManageContent])?;

    let id = super::parse_object_id(&path.into_inner())?;
    let existing = sports_repo::find_tournament(db.get_ref(), id)
        .await?
        .ok_or_else(|| AppError::NotFound("Tournament not found".to_string()))?;

    let form = UploadForm::from_multipart(payload, 10).await?;

    let mut set = doc! {};
    for field in ["name", "description", "venue", "winner", "runner_up", "best_player"] {
        if let Some(value) = form.text(field) {
            if !value.is_empty() {
                set.insert(field, value);
            }
        }
    }
    if let Some(value) = form.text("sport_type") {
        let sport_type: SportType = super::parse_enum(value, "sport_type")?;
        set.insert("sport_type", sport_type.as_str());
    }

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
        TournamentStatus::derive(DateTime::now(), start_date, end_date).as_str(),
    );

    let new_images = uploader
        .upload_all(&form.files_named("images"), "sports/tournaments")
        .await?;
    if !new_images.is_empty() {
        let mut images = existing.images.clone();
        images.extend(new_images);
        set.insert("images", images);
    }

    let updated = sports_repo::update_tournament(db.get_ref(), id, set)
        .await?
        .ok_or_else(|| AppError::NotFound("Tournament not found".to_string()))?;

    Ok(HttpResponse::Ok().json(TournamentResponse::from(updated)))
}

/// DELETE /api/sports/tournaments/{id} (admin)
pub async fn delete_tournament(
    db: web::Data<Database>,
    user: AuthUser,
    path: web::Path<String>,
) -> Result<HttpResponse> {
    user.authorize(&[UserRole::Admin], &[UserPermission::ManageContent])?;

    let id = super::parse_object_id(&path.into_inner())?;
    if !sports_repo::soft_delete_tournament(db.get_ref(), id).await? {
        return Err(AppError::NotFound("Tournament not found".to_string()));
    }

    Ok(HttpResponse::Ok()
        .json(serde_json::json!({ "message": "Tournament deleted successfully" })))
}

// Player showcases ---------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct ShowcaseListQuery {
    pub sport_type: Option<SportType>,
    pub is_featured: Option<bool>,
}

/// GET /api/sports/players (public)
pub async fn get_showcases(
    db: web::Data<Database>,
    query: web::Query<ShowcaseListQuery>,
) -> Result<HttpResponse> {
    let showcases = sports_repo::list_showcases(
        db.get_ref(),
        query.sport_type.map(|s| s.as_str()),
        query.is_featured,
    )
    .await?;

    let user_ids: Vec<ObjectId> = showcases.iter().map(|s| s.user).collect();
    let users: HashMap<ObjectId, String> = user_repo::find_many_by_ids(db.get_ref(), &user_ids)
        .await?
        .into_iter()
        .map(|u| (u.id, u.name))
        .collect();

    let showcases: Vec<PlayerShowcaseResponse> = showcases
        .into_iter()
        .map(|s| {
            let user = s.user;
            let mut response = PlayerShowcaseResponse::from(s);
            response.user_name = users.get(&user).cloned();
            response
        })
        .collect();

    Ok(HttpResponse::Ok().json(showcases))
}

/// POST /api/sports/players (admin, multipart with `image`)
pub async fn create_showcase(
    db: web::Data<Database>,
    uploader: web::Data<Cloudinary>,
    user: AuthUser,
    payload: Multipart,
) -> Result<HttpResponse> {
    user.authorize(&[UserRole::Admin], &[UserPermission::ManageContent])?;

    let form = UploadForm::from_multipart(payload, 1).await?;

    let player = super::parse_object_id(
        form.text("user")
            .ok_or_else(|| AppError::Validation("user is required".to_string()))?,
    )?;
    let sport_type: SportType = super::parse_enum(
        form.text("sport_type")
            .ok_or_else(|| AppError::Validation("sport_type is required".to_string()))?,
        "sport_type",
    )?;

    let achievements: Vec<String> = match form.text("achievements") {
        Some(value) if !value.is_empty() => super::parse_json_field(value, "achievements")?,
        _ => vec![],
    };
    let stats: mongodb::bson::Document = match form.text("stats") {
        Some(value) if !value.is_empty() => {
            let json: serde_json::Value = super::parse_json_field(value, "stats")?;
            mongodb::bson::to_document(&json)
                .map_err(|e| AppError::BadRequest(format!("Invalid stats: {}", e)))?
        }
        _ => mongodb::bson::Document::new(),
    };
    let total_matches = form
        .text("total_matches")
        .and_then(|v| v.parse().ok())
        .unwrap_or(0);

    let image = match form.first_file() {
        Some(file) => uploader.upload(file, "sports/players").await?.secure_url,
        None => return Err(AppError::Validation("image is required".to_string())),
    };

    let now = DateTime::now();
    let showcase = PlayerShowcase {
        id: ObjectId::new(),
        user: player,
        sport_type,
        achievements,
        total_matches,
        stats,
        image,
        is_featured: form
            .text("is_featured")
            .map(super::parse_bool)
            .unwrap_or(false),
        created_by: user.id,
        is_deleted: false,
        created_at: now,
        updated_at: now,
    };

    sports_repo::create_showcase(db.get_ref(), &showcase).await?;

    Ok(HttpResponse::Created().json(PlayerShowcaseResponse::from(showcase)))
}

#[derive(Debug, Deserialize)]
pub struct UpdateShowcaseRequest {
    pub achievements: Option<Vec<String>>,
    pub total_matches: Option<i32>,
    pub stats: Option<serde_json::Value>,
    pub is_featured: Option<bool>,
}

/// PATCH /api/sports/players/{id} (admin)
pub async fn update_showcase(
    db: web::Data<Database>,
    user: AuthUser,
    path: web::Path<String>,
    req: web::Json<UpdateShowcaseRequest>,
) -> Result<HttpResponse> {
    user.authorize(&[UserRole::Admin], &[UserPermission::ManageContent])?;

    let id = super::parse_object_id(&path.into_inner())?;

    let mut set = doc! {};
    if let Some(achievements) = &req.achievements {
        set.insert("achievements", achievements.clone());
    }
    if let Some(total_matches) = req.total_matches {
        set.insert("total_matches", total_matches);
    }
    if let Some(stats) = &req.stats {
        let stats = mongodb::bson::to_document(stats)
            .map_err(|e| AppError::BadRequest(format!("Invalid stats: {}", e)))?;
        set.insert("stats", stats);
    }
    if let Some(is_featured) = req.is_featured {
        set.insert("is_featured", is_featured);
    }

    if set.is_empty() {
        return Err(AppError::BadRequest("Nothing to update".to_string()));
    }

    let updated = sports_repo::update_showcase(db.get_ref(), id, set)
        .await?
        .ok_or_else(|| AppError::NotFound("Player showcase not found".to_string()))?;

    Ok(HttpResponse::Ok().json(PlayerShowcaseResponse::from(updated)))
}

/// DELETE /api/sports/players/{id} (admin)
pub async fn delete_showcase(
    db: web::Data<Database>,
    user: AuthUser,
    path: web::Path<String>,
) -> Result<HttpResponse> {
    user.authorize(&[UserRole::Admin], &[UserPermission::ManageContent])?;

    let id = super::parse_object_id(&path.into_inner())?;
    if !sports_repo::soft_delete_showcase(db.get_ref(), id).await? {
        return Err(AppError::NotFound("Player showcase not found".to_string()));
    }

    Ok(HttpResponse::Ok()
        .json(serde_json::json!({ "message": "Player showcase deleted successfully" })))
}
