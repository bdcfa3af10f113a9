use actix_web::{web, HttpResponse};
use mongodb::bson::{doc, oid::ObjectId, DateTime};
use mongodb::Database;
use serde::Deserialize;
use validator::Validate;

use crate::db::product_repo;
use crate::error::{AppError, Result};
use crate::middleware::AuthUser;
use crate::models::{Product, ProductResponse, UserPermission, UserRole};

#[derive(Debug, Deserialize, Validate)]
pub struct CreateProductRequest {
    #[validate(length(min = 1, max = 100))]
    pub name: String,

    #[serde(default)]
    pub description: String,

    #[validate(url)]
    pub link: String,

    #[validate(url)]
    pub icon: Option<String>,

    #[serde(default)]
    pub order: i32,

    pub is_active: Option<bool>,
}

/// GET /api/products (public) — active products in display order.
pub async fn get_products(db: web::Data<Database>) -> Result<HttpResponse> {
    let products = product_repo::list_active(db.get_ref()).await?;
    let products: Vec<ProductResponse> = products.into_iter().map(Into::into).collect();
    Ok(HttpResponse::Ok().json(products))
}

/// GET /api/products/all (admin) — inactive entries included.
pub async fn get_all_products(db: web::Data<Database>, user: AuthUser) -> Result<HttpResponse> {
    user.authorize(&[UserRole::Admin], &[UserPermission::ManageContent])?;

    let products = product_repo::list_all(db.get_ref()).await?;
    let products: Vec<ProductResponse> = products.into_iter().map(Into::into).collect();
    Ok(HttpResponse::Ok().json(products))
}

/// POST /api/products (admin)
pub async fn create_product(
    db: web::Data<Database>,
    user: AuthUser,
    req: web::Json<CreateProductRequest>,
) -> Result<HttpResponse> {
    user.authorize(&[UserRole::Admin], &[UserPermission::ManageContent])?;
    req.validate()?;

    let now = DateTime::now();
    let product = Product {
        id: ObjectId::new(),
        name: req.name.clone(),
        description: req.description.clone(),
        link: req.link.clone(),
        icon: req.icon.clone(),
        is_active: req.is_active.unwrap_or(true),
        order: req.order,
        created_by: user.id,
        is_deleted: false,
        created_at: now,
        updated_at: now,
    };

    product_repo::create(db.get_ref(), &product).await?;

    Ok(HttpResponse::Created().json(ProductResponse::from(product)))
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateProductRequest {
    #[validate(length(min = 1, max = 100))]
    pub name: Option<String>,

    pub description: Option<String>,

    #[validate(url)]
    pub link: Option<String>,

    #[validate(url)]
    pub icon: Option<String>,

    pub order: Option<i32>,
    pub is_active: Option<bool>,
}

/// PATCH /api/products/{id} (admin)
pub async fn update_product(
    db: web::Data<Database>,
    user: AuthUser,
    path: web::Path<String>,
    req: web::Json<UpdateProductRequest>,
) -> Result<HttpResponse> {
    user.authorize(&[UserRole::Admin], &[UserPermission::ManageContent])?;
    req.validate()?;

    let id = super::parse_object_id(&path.into_inner())?;

    let mut set = doc! {};
    if let Some(name) = &req.name {
        set.insert("name", name);
    }
    if let Some(description) = &req.description {
        set.insert("description", description);
    }
    if let Some(link) = &req.link {
        set.insert("link", link);
    }
    if let Some(icon) = &req.icon {
        set.insert("icon", icon);
    }
    if let Some(order) = req.order {
        set.insert("order", order);
    }
    if let Some(is_active) = req.is_active {
        set.insert("is_active", is_active);
    }

    if set.is_empty() {
        return Err(AppError::BadRequest("Nothing to update".to_string()));
    }

    let updated = product_repo::update(db.get_ref(), id, set)
        .await?
        .ok_or_else(|| AppError::NotFound("Product not found".to_string()))?;

    Ok(HttpResponse::Ok().json(ProductResponse::from(updated)))
}

/// DELETE /api/products/{id} (admin)
pub async fn delete_product(
    db: web::Data<Database>,
    user: AuthUser,
    path: web::Path<String>,
) -> Result<HttpResponse> {
    user.authorize(&[UserRole::Admin], &[UserPermission::ManageContent])?;

    let id = super::parse_object_id(&path.into_inner())?;
    if !product_repo::soft_delete(db.get_ref(), id).await? {
        return Err(AppError::NotFound("Product not found".to_string()));
    }

    Ok(HttpResponse::Ok().json(serde_json::json!({ "message": "Product deleted successfully" })))
}
