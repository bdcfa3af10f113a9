use actix_multipart::Multipart;
use actix_web::{web, HttpResponse};
use mongodb::bson::DateTime;
use mongodb::Database;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::db::{content_repo, user_repo};
use crate::error::{AppError, Result};
use crate::middleware::AuthUser;
use crate::models::{
    Achievement, AchievementCategory, AchievementResponse, HeroSlide, Notice, NoticeCategory,
    NoticeResponse, SiteContentResponse, TargetAudience, UserPermission, UserRole,
};
use crate::services::email::EmailService;
use crate::services::notifications::{self, ContentKind, NotificationContent};
use crate::services::uploads::{Cloudinary, UploadForm};

// Homepage -----------------------------------------------------------------

/// One mutation of the hero slide deck, decoded from the form fields.
#[derive(Debug, Default)]
pub struct SlideMutation {
    pub delete_index: Option<usize>,
    pub edit_index: Option<usize>,
    pub title: String,
    pub subtitle: String,
    pub description: String,
    pub cta_text: String,
    pub cta_link: String,
    pub new_image: Option<String>,
}

/// Index fields arrive as free text; anything non-numeric means "absent".
pub fn parse_index(value: Option<&str>) -> Option<usize> {
    match value {
        None => None,
        Some("" | "undefined" | "null") => None,
        Some(v) => v.parse().ok(),
    }
}

/// Apply delete, then edit-or-append, in a single request:
/// - a valid `delete_index` removes that slide;
/// - a new image either replaces the slide at `edit_index` or, when no
///   deletion was requested, appends a new slide;
/// - without a new image, `edit_index` + title rewrites the text fields
///   and keeps the existing image.
/// Out-of-range indices are ignored.
pub fn apply_slide_mutation(mut slides: Vec<HeroSlide>, m: SlideMutation) -> Vec<HeroSlide> {
    if let Some(idx) = m.delete_index {
        if idx < slides.len() {
            slides.remove(idx);
        }
    }

    if let Some(image) = m.new_image {
        let slide = HeroSlide {
            image,
            title: if m.title.is_empty() {
                "New Slide".to_string()
            } else {
                m.title.clone()
            },
            subtitle: m.subtitle.clone(),
            description: m.description.clone(),
            cta_text: m.cta_text.clone(),
            cta_link: m.cta_link.clone(),
        };

        match m.edit_index {
            Some(idx) if idx < slides.len() => slides[idx] = slide,
            Some(_) => {}
            None => {
                if m.delete_index.is_none() {
                    slides.push(slide);
                }
            }
        }
    } else if !m.title.is_empty() {
        if let Some(idx) = m.edit_index {
            if idx < slides.len() {
                let existing_image = slides[idx].image.clone();
                slides[idx] = HeroSlide {
                    image: existing_image,
                    title: m.title,
                    subtitle: m.subtitle,
                    description: m.description,
                    cta_text: m.cta_text,
                    cta_link: m.cta_link,
                };
            }
        }
    }

    slides
}

/// GET /api/content/homepage (public)
pub async fn get_homepage(db: web::Data<Database>) -> Result<HttpResponse> {
    let homepage = content_repo::find_homepage(db.get_ref()).await?;
    let response = homepage
        .map(SiteContentResponse::from)
        .unwrap_or_else(SiteContentResponse::empty);
    Ok(HttpResponse::Ok().json(response))
}

/// PUT /api/content/homepage (admin, multipart)
pub async fn update_homepage(
    db: web::Data<Database>,
    uploader: web::Data<Cloudinary>,
    user: AuthUser,
    payload: Multipart,
) -> Result<HttpResponse> {
    user.authorize(&[UserRole::Admin], &[UserPermission::ManageContent])?;

    let form = UploadForm::from_multipart(payload, 5).await?;

    let new_image = match form.first_file() {
        Some(file) => Some(uploader.upload(file, "homepage").await?.secure_url),
        None => None,
    };

    let text = |name: &str| form.text(name).unwrap_or_default().to_string();
    let mutation = SlideMutation {
        delete_index: parse_index(form.text("delete_slide_index")),
        edit_index: parse_index(form.text("edit_slide_index")),
        title: text("title"),
        subtitle: text("subtitle"),
        description: text("description"),
        cta_text: text("cta_text"),
        cta_link: text("cta_link"),
        new_image,
    };

    let current = content_repo::find_homepage(db.get_ref())
        .await?
        .map(|c| c.hero_slides)
        .unwrap_or_default();

    let slides = apply_slide_mutation(current, mutation);
    let saved = content_repo::save_homepage(db.get_ref(), &slides, user.id).await?;

    Ok(HttpResponse::Ok().json(SiteContentResponse::from(saved)))
}

// Notices ------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct NoticeListQuery {
    pub category: Option<NoticeCategory>,
}

/// GET /api/content/notices (public)
pub async fn get_notices(
    db: web::Data<Database>,
    query: web::Query<NoticeListQuery>,
) -> Result<HttpResponse> {
    let category = query.category.map(|c| c.as_str());
    let notices = content_repo::list_notices(db.get_ref(), category).await?;
    let notices: Vec<NoticeResponse> = notices.into_iter().map(Into::into).collect();
    Ok(HttpResponse::Ok().json(notices))
}

/// GET /api/content/notices/{id} (public)
pub async fn get_notice_by_id(
    db: web::Data<Database>,
    path: web::Path<String>,
) -> Result<HttpResponse> {
    let id = super::parse_object_id(&path.into_inner())?;
    let notice = content_repo::find_notice(db.get_ref(), id)
        .await?
        .ok_or_else(|| AppError::NotFound("Notice not found".to_string()))?;
    Ok(HttpResponse::Ok().json(NoticeResponse::from(notice)))
}

#[derive(Debug, Serialize)]
pub struct CreateNoticeResponse {
    pub notice: NoticeResponse,
    pub notification: notifications::NotificationOutcome,
}

/// POST /api/content/notices (multipart)
pub async fn create_notice(
    db: web::Data<Database>,
    uploader: web::Data<Cloudinary>,
    email_service: web::Data<EmailService>,
    user: AuthUser,
    payload: Multipart,
) -> Result<HttpResponse> {
    user.authorize(
        &[UserRole::Admin, UserRole::Student, UserRole::Teacher],
        &[UserPermission::ManageNotices],
    )?;

    let form = UploadForm::from_multipart(payload, 5).await?;

    let title = form
        .text("title")
        .filter(|t| !t.is_empty())
        .ok_or_else(|| AppError::Validation("title is required".to_string()))?
        .to_string();
    let description = form
        .text("description")
        .filter(|d| !d.is_empty())
        .ok_or_else(|| AppError::Validation("description is required".to_string()))?
        .to_string();

    let category = match form.text("category") {
        Some(value) => super::parse_enum(value, "category")?,
        None => NoticeCategory::General,
    };
    let target_audience = match form.text("target_audience") {
        Some(value) => super::parse_enum(value, "target_audience")?,
        None => TargetAudience::Both,
    };
    let expiry_date = match form.text("expiry_date") {
        Some(value) if !value.is_empty() => Some(super::parse_datetime(value)?),
        _ => None,
    };

    let attachments = uploader
        .upload_all(&form.files_named("attachments"), "notices")
        .await?;

    let now = DateTime::now();
    let notice = Notice {
        id: mongodb::bson::oid::ObjectId::new(),
        title,
        description,
        attachments,
        publish_date: now,
        expiry_date,
        is_pinned: form.text("is_pinned").map(super::parse_bool).unwrap_or(false),
        category,
        target_audience,
        is_important: form
            .text("is_important")
            .map(super::parse_bool)
            .unwrap_or(false),
        should_send_email: form
            .text("should_send_email")
            .map(super::parse_bool)
            .unwrap_or(true),
        created_by: user.id,
        is_deleted: false,
        created_at: now,
        updated_at: now,
    };

    content_repo::create_notice(db.get_ref(), &notice).await?;

    let notification = notifications::notify_interested_users(
        db.get_ref(),
        email_service.get_ref(),
        ContentKind::Notice,
        &NotificationContent {
            title: notice.title.clone(),
            id: notice.id.to_hex(),
            category: notice.category.as_str().to_string(),
            target_audience: Some(notice.target_audience),
            should_send_email: notice.should_send_email,
            is_important: notice.is_important,
        },
    )
    .await?;

    Ok(HttpResponse::Created().json(CreateNoticeResponse {
        notice: notice.into(),
        notification,
    }))
}

/// DELETE /api/content/notices/{id} (admin)
pub async fn delete_notice(
    db: web::Data<Database>,
    user: AuthUser,
    path: web::Path<String>,
) -> Result<HttpResponse> {
    user.authorize(
        &[UserRole::Admin],
        &[UserPermission::ManageNotices, UserPermission::ManageContent],
    )?;

    let id = super::parse_object_id(&path.into_inner())?;
    if !content_repo::soft_delete_notice(db.get_ref(), id).await? {
        return Err(AppError::NotFound("Notice not found".to_string()));
    }

    Ok(HttpResponse::Ok().json(serde_json::json!({ "message": "Notice deleted successfully" })))
}

// Achievements -------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct AchievementListQuery {
    pub category: Option<AchievementCategory>,
    pub achieved_by: Option<String>,
}

/// GET /api/content/achievements (public)
pub async fn get_achievements(
    db: web::Data<Database>,
    query: web::Query<AchievementListQuery>,
) -> Result<HttpResponse> {
    let achieved_by = match &query.achieved_by {
        Some(id) => Some(super::parse_object_id(id)?),
        None => None,
    };

    let achievements = content_repo::list_achievements(
        db.get_ref(),
        query.category.map(|c| c.as_str()),
        achieved_by,
    )
    .await?;

    let achievements: Vec<AchievementResponse> =
        achievements.into_iter().map(Into::into).collect();
    Ok(HttpResponse::Ok().json(achievements))
}

/// GET /api/content/achievements/{id} (public)
pub async fn get_achievement_by_id(
    db: web::Data<Database>,
    path: web::Path<String>,
) -> Result<HttpResponse> {
    let id = super::parse_object_id(&path.into_inner())?;
    let achievement = content_repo::find_achievement(db.get_ref(), id)
        .await?
        .ok_or_else(|| AppError::NotFound("Achievement not found".to_string()))?;
    Ok(HttpResponse::Ok().json(AchievementResponse::from(achievement)))
}

/// POST /api/content/achievements (multipart)
pub async fn create_achievement(
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
    let competition_name = required("competition_name")?;
    let position = required("position")?;
    let date = super::parse_datetime(&required("date")?)?;

    let category = match form.text("category") {
        Some(value) => super::parse_enum(value, "category")?,
        None => AchievementCategory::Cp,
    };
    let achieved_by = match form.text("achieved_by") {
        Some(value) if !value.is_empty() => Some(super::parse_object_id(value)?),
        _ => None,
    };

    let image = match form.first_file() {
        Some(file) => uploader.upload(file, "achievements").await?.secure_url,
        None => return Err(AppError::Validation("image is required".to_string())),
    };

    let now = DateTime::now();
    let achievement = Achievement {
        id: mongodb::bson::oid::ObjectId::new(),
        title,
        description,
        team_name: form.text("team_name").map(|s| s.to_string()),
        competition_name,
        position,
        image,
        achieved_by,
        date,
        category,
        created_by: user.id,
        is_deleted: false,
        created_at: now,
        updated_at: now,
    };

    content_repo::create_achievement(db.get_ref(), &achievement).await?;

    Ok(HttpResponse::Created().json(AchievementResponse::from(achievement)))
}

/// DELETE /api/content/achievements/{id} (admin)
pub async fn delete_achievement(
    db: web::Data<Database>,
    user: AuthUser,
    path: web::Path<String>,
) -> Result<HttpResponse> {
    user.authorize(
        &[UserRole::Admin],
        &[UserPermission::ManageAchievements, UserPermission::ManageContent],
    )?;

    let id = super::parse_object_id(&path.into_inner())?;
    if !content_repo::soft_delete_achievement(db.get_ref(), id).await? {
        return Err(AppError::NotFound("Achievement not found".to_string()));
    }

    Ok(HttpResponse::Ok()
        .json(serde_json::json!({ "message": "Achievement deleted successfully" })))
}

// Admin broadcast ----------------------------------------------------------

#[derive(Debug, Deserialize, Validate)]
pub struct SendMessageRequest {
    #[validate(length(min = 1))]
    pub title: String,

    #[validate(length(min = 1))]
    pub content: String,

    /// STUDENT, TEACHER or BOTH
    pub target: TargetAudience,

    /// Any of "EMAIL" and "NOTICE"
    #[validate(length(min = 1))]
    pub methods: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct EmailBlastOutcome {
    pub total: usize,
    pub success: usize,
}

#[derive(Debug, Serialize)]
pub struct SendMessageResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<EmailBlastOutcome>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notice: Option<NoticeResponse>,
}

/// POST /api/content/send-message (admin)
pub async fn send_message(
    db: web::Data<Database>,
    email_service: web::Data<EmailService>,
    user: AuthUser,
    req: web::Json<SendMessageRequest>,
) -> Result<HttpResponse> {
    user.authorize(&[UserRole::Admin], &[])?;
    req.validate()?;

    let mut response = SendMessageResponse {
        email: None,
        notice: None,
    };

    let role = match req.target {
        TargetAudience::Student => Some(UserRole::Student),
        TargetAudience::Teacher => Some(UserRole::Teacher),
        TargetAudience::Both => None,
    };

    if req.methods.iter().any(|m| m == "EMAIL") {
        let targets = user_repo::list_broadcast_targets(db.get_ref(), role).await?;
        let mut success = 0;
        for target in &targets {
            match email_service
                .send_broadcast_email(&target.email, &target.name, &req.title, &req.content)
                .await
            {
                Ok(()) => success += 1,
                Err(e) => {
                    tracing::warn!(email = %target.email, error = %e, "broadcast email failed")
                }
            }
        }
        response.email = Some(EmailBlastOutcome {
            total: targets.len(),
            success,
        });
    }

    if req.methods.iter().any(|m| m == "NOTICE") {
        let now = DateTime::now();
        let notice = Notice {
            id: mongodb::bson::oid::ObjectId::new(),
            title: req.title.clone(),
            description: req.content.clone(),
            attachments: vec![],
            publish_date: now,
            expiry_date: None,
            is_pinned: false,
            category: NoticeCategory::Administrative,
            target_audience: req.target,
            is_important: true,
            // Emails were already handled above when requested.
            should_send_email: false,
            created_by: user.id,
            is_deleted: false,
            created_at: now,
            updated_at: now,
        };
        content_repo::create_notice(db.get_ref(), &notice).await?;
        response.notice = Some(notice.into());
    }

    Ok(HttpResponse::Ok().json(response))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn slide(title: &str) -> HeroSlide {
        HeroSlide {
            image: format!("https://cdn.example.com/{title}.jpg"),
            title: title.to_string(),
            subtitle: String::new(),
            description: String::new(),
            cta_text: String::new(),
            cta_link: String::new(),
        }
    }

    #[test]
    fn test_parse_index_variants() {
        assert_eq!(parse_index(None), None);
        assert_eq!(parse_index(Some("")), None);
        assert_eq!(parse_index(Some("undefined")), None);
        assert_eq!(parse_index(Some("null")), None);
        assert_eq!(parse_index(Some("abc")), None);
        assert_eq!(parse_index(Some("2")), Some(2));
        assert_eq!(parse_index(Some("0")), Some(0));
    }

    #[test]
    fn test_append_new_slide_with_image() {
        let slides = apply_slide_mutation(
            vec![slide("a")],
            SlideMutation {
                new_image: Some("https://cdn.example.com/new.jpg".into()),
                title: "Fresh".into(),
                ..Default::default()
            },
        );
        assert_eq!(slides.len(), 2);
        assert_eq!(slides[1].title, "Fresh");
    }

    #[test]
    fn test_untitled_new_slide_gets_default_title() {
        let slides = apply_slide_mutation(
            vec![],
            SlideMutation {
                new_image: Some("img".into()),
                ..Default::default()
            },
        );
        assert_eq!(slides[0].title, "New Slide");
    }

    #[test]
    fn test_edit_replaces_slide_and_image() {
        let slides = apply_slide_mutation(
            vec![slide("a"), slide("b")],
            SlideMutation {
                edit_index: Some(1),
                new_image: Some("updated".into()),
                title: "B2".into(),
                ..Default::default()
            },
        );
        assert_eq!(slides.len(), 2);
        assert_eq!(slides[1].title, "B2");
        assert_eq!(slides[1].image, "updated");
    }

    #[test]
    fn test_text_only_edit_keeps_image() {
        let original = slide("a");
        let slides = apply_slide_mutation(
            vec![original.clone()],
            SlideMutation {
                edit_index: Some(0),
                title: "Renamed".into(),
                subtitle: "sub".into(),
                ..Default::default()
            },
        );
        assert_eq!(slides[0].title, "Renamed");
        assert_eq!(slides[0].subtitle, "sub");
        assert_eq!(slides[0].image, original.image);
    }

    #[test]
    fn test_delete_by_index() {
        let slides = apply_slide_mutation(
            vec![slide("a"), slide("b"), slide("c")],
            SlideMutation {
                delete_index: Some(1),
                ..Default::default()
            },
        );
        assert_eq!(slides.len(), 2);
        assert_eq!(slides[0].title, "a");
        assert_eq!(slides[1].title, "c");
    }

    #[test]
    fn test_out_of_range_indices_are_ignored() {
        let slides = apply_slide_mutation(
            vec![slide("a")],
            SlideMutation {
                delete_index: Some(9),
                edit_index: Some(9),
                title: "ignored".into(),
                ..Default::default()
            },
        );
        assert_eq!(slides.len(), 1);
        assert_eq!(slides[0].title, "a");
    }

    #[test]
    fn test_delete_with_upload_does_not_append() {
        // A request that deletes a slide and carries a file replaces
        // nothing unless an edit index is present.
        let slides = apply_slide_mutation(
            vec![slide("a"), slide("b")],
            SlideMutation {
                delete_index: Some(0),
                new_image: Some("img".into()),
                title: "x".into(),
                ..Default::default()
            },
        );
        assert_eq!(slides.len(), 1);
        assert_eq!(slides[0].title, "b");
    }
}
