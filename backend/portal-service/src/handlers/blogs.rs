use actix_web::{web, HttpResponse};
use mongodb::bson::{oid::ObjectId, DateTime};
use mongodb::Database;
use serde::Deserialize;
use std::collections::HashMap;
use validator::Validate;

use crate::db::{blog_repo, user_repo};
use crate::error::{AppError, Result};
use crate::middleware::AuthUser;
use crate::models::{Blog, BlogResponse, BlogStatus, UserPermission, UserRole};

#[derive(Debug, Deserialize, Validate)]
pub struct CreateBlogRequest {
    #[validate(length(min = 3, max = 200))]
    pub title: String,

    #[validate(length(min = 10))]
    pub content: String,

    #[validate(url)]
    pub cover_image: Option<String>,

    #[serde(default)]
    pub tags: Vec<String>,
}

async fn join_author_names(
    db: &Database,
    blogs: Vec<Blog>,
) -> Result<Vec<BlogResponse>> {
    let mut author_ids: Vec<ObjectId> = blogs.iter().map(|b| b.author).collect();
    author_ids.sort();
    author_ids.dedup();

    let authors: HashMap<ObjectId, String> = user_repo::find_many_by_ids(db, &author_ids)
        .await?
        .into_iter()
        .map(|u| (u.id, u.name))
        .collect();

    Ok(blogs
        .into_iter()
        .map(|b| {
            let author = b.author;
            let mut response = BlogResponse::from(b);
            response.author_name = authors.get(&author).cloned();
            response
        })
        .collect())
}

/// POST /api/blogs (authenticated) — every submission starts PENDING.
pub async fn create_blog(
    db: web::Data<Database>,
    user: AuthUser,
    req: web::Json<CreateBlogRequest>,
) -> Result<HttpResponse> {
    req.validate()?;

    let now = DateTime::now();
    let blog = Blog {
        id: ObjectId::new(),
        title: req.title.clone(),
        content: req.content.clone(),
        cover_image: req.cover_image.clone(),
        tags: req.tags.clone(),
        author: user.id,
        status: BlogStatus::Pending,
        is_deleted: false,
        created_at: now,
        updated_at: now,
    };

    blog_repo::create(db.get_ref(), &blog).await?;

    let mut response = BlogResponse::from(blog);
    response.author_name = Some(user.name);

    Ok(HttpResponse::Created().json(response))
}

/// GET /api/blogs (public) — published posts only.
pub async fn get_published_blogs(db: web::Data<Database>) -> Result<HttpResponse> {
    let blogs = blog_repo::list_by_status(db.get_ref(), BlogStatus::Published).await?;
    let response = join_author_names(db.get_ref(), blogs).await?;
    Ok(HttpResponse::Ok().json(response))
}

/// GET /api/blogs/pending (admin) — moderation queue.
pub async fn get_pending_blogs(db: web::Data<Database>, user: AuthUser) -> Result<HttpResponse> {
    user.authorize(&[UserRole::Admin], &[UserPermission::ManageBlogs])?;

    let blogs = blog_repo::list_by_status(db.get_ref(), BlogStatus::Pending).await?;
    let response = join_author_names(db.get_ref(), blogs).await?;
    Ok(HttpResponse::Ok().json(response))
}

/// GET /api/blogs/my (authenticated)
pub async fn get_my_blogs(db: web::Data<Database>, user: AuthUser) -> Result<HttpResponse> {
    let blogs = blog_repo::list_by_author(db.get_ref(), user.id).await?;
    let blogs: Vec<BlogResponse> = blogs.into_iter().map(Into::into).collect();
    Ok(HttpResponse::Ok().json(blogs))
}

/// GET /api/blogs/{id} (public)
pub async fn get_blog_by_id(
    db: web::Data<Database>,
    path: web::Path<String>,
) -> Result<HttpResponse> {
    let id = super::parse_object_id(&path.into_inner())?;
    let blog = blog_repo::find(db.get_ref(), id)
        .await?
        .ok_or_else(|| AppError::NotFound("Blog post not found".to_string()))?;

    let response = join_author_names(db.get_ref(), vec![blog]).await?;
    let response = response
        .into_iter()
        .next()
        .ok_or_else(|| AppError::NotFound("Blog post not found".to_string()))?;

    Ok(HttpResponse::Ok().json(response))
}

#[derive(Debug, Deserialize)]
pub struct VerifyBlogRequest {
    pub status: BlogStatus,
}

/// PATCH /api/blogs/{id}/verify (admin) — publish or reject.
pub async fn verify_blog(
    db: web::Data<Database>,
    user: AuthUser,
    path: web::Path<String>,
    req: web::Json<VerifyBlogRequest>,
) -> Result<HttpResponse> {
    user.authorize(&[UserRole::Admin], &[UserPermission::ManageBlogs])?;

    if req.status == BlogStatus::Pending {
        return Err(AppError::BadRequest(
            "Verification must publish or reject the post".to_string(),
        ));
    }

    let id = super::parse_object_id(&path.into_inner())?;
    let updated = blog_repo::set_status(db.get_ref(), id, req.status)
        .await?
        .ok_or_else(|| AppError::NotFound("Blog post not found".to_string()))?;

    Ok(HttpResponse::Ok().json(BlogResponse::from(updated)))
}

/// DELETE /api/blogs/{id} — author or admin only.
pub async fn delete_blog(
    db: web::Data<Database>,
    user: AuthUser,
    path: web::Path<String>,
) -> Result<HttpResponse> {
    let id = super::parse_object_id(&path.into_inner())?;
    let blog = blog_repo::find(db.get_ref(), id)
        .await?
        .ok_or_else(|| AppError::NotFound("Blog post not found".to_string()))?;

    if blog.author != user.id && !user.is_admin() {
        return Err(AppError::Authorization(
            "You are not authorized to delete this blog".to_string(),
        ));
    }

    blog_repo::soft_delete(db.get_ref(), id).await?;

    Ok(HttpResponse::Ok().json(serde_json::json!({ "message": "Blog deleted successfully" })))
}
