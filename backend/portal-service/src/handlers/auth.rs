use actix_web::{web, HttpResponse};
use mongodb::Database;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::config::Config;
use crate::db::user_repo;
use crate::error::{AppError, Result};
use crate::middleware::AuthUser;
use crate::models::UserResponse;
use crate::security::jwt::TokenPair;
use crate::services::auth as auth_service;
use crate::services::auth::{StudentRegistration, TeacherRegistration};
use crate::services::email::EmailService;

#[derive(Debug, Deserialize, Validate)]
pub struct RegisterStudentRequest {
    #[validate(length(min = 2, max = 100))]
    pub name: String,

    #[validate(email)]
    pub email: String,

    #[validate(length(min = 8))]
    pub password: String,

    #[validate(length(min = 6, max = 20))]
    pub phone: String,

    #[validate(length(min = 1))]
    pub student_id: String,

    #[validate(length(min = 1))]
    pub batch: String,

    #[validate(length(min = 1))]
    pub session: String,

    #[validate(range(min = 1990, max = 2100))]
    pub enrollment_year: i32,

    pub cgpa: Option<f64>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct RegisterTeacherRequest {
    #[validate(length(min = 2, max = 100))]
    pub name: String,

    #[validate(email)]
    pub email: String,

    #[validate(length(min = 8))]
    pub password: String,

    #[validate(length(min = 6, max = 20))]
    pub phone: String,

    #[validate(length(min = 2))]
    pub designation: String,

    pub department: Option<String>,

    #[serde(default)]
    pub research_interests: Vec<String>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email)]
    pub email: String,

    #[validate(length(min = 1))]
    pub password: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct VerifyEmailRequest {
    #[validate(email)]
    pub email: String,

    #[validate(length(equal = 6))]
    pub code: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct EmailOnlyRequest {
    #[validate(email)]
    pub email: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct ResetPasswordRequest {
    #[validate(email)]
    pub email: String,

    #[validate(length(equal = 6))]
    pub code: String,

    #[validate(length(min = 8))]
    pub new_password: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct ChangePasswordRequest {
    #[validate(length(min = 1))]
    pub old_password: String,

    #[validate(length(min = 8))]
    pub new_password: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct RefreshRequest {
    #[validate(length(min = 1))]
    pub refresh_token: String,
}

#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub user: UserResponse,
    pub tokens: TokenPair,
}

#[derive(Debug, Serialize)]
pub struct RegistrationResponse {
    pub user: UserResponse,
    pub message: String,
}

/// POST /api/auth/register/student
pub async fn register_student(
    db: web::Data<Database>,
    config: web::Data<Config>,
    email_service: web::Data<EmailService>,
    req: web::Json<RegisterStudentRequest>,
) -> Result<HttpResponse> {
    req.validate()?;
    let req = req.into_inner();

    let outcome = auth_service::register_student(
        db.get_ref(),
        &config.registration,
        email_service.get_ref(),
        StudentRegistration {
            name: req.name,
            email: req.email,
            password: req.password,
            phone: req.phone,
            student_id: req.student_id,
            batch: req.batch,
            session: req.session,
            enrollment_year: req.enrollment_year,
            cgpa: req.cgpa,
        },
    )
    .await?;

    Ok(HttpResponse::Created().json(RegistrationResponse {
        user: outcome.user.into(),
        message: outcome.message,
    }))
}

/// POST /api/auth/register/teacher
pub async fn register_teacher(
    db: web::Data<Database>,
    config: web::Data<Config>,
    email_service: web::Data<EmailService>,
    req: web::Json<RegisterTeacherRequest>,
) -> Result<HttpResponse> {
    req.validate()?;
    let req = req.into_inner();

    let outcome = auth_service::register_teacher(
        db.get_ref(),
        &config.registration,
        email_service.get_ref(),
        TeacherRegistration {
            name: req.name,
            email: req.email,
            password: req.password,
            phone: req.phone,
            designation: req.designation,
            department: req.department,
            research_interests: req.research_interests,
        },
    )
    .await?;

    Ok(HttpResponse::Created().json(RegistrationResponse {
        user: outcome.user.into(),
        message: outcome.message,
    }))
}

/// POST /api/auth/login
pub async fn login(
    db: web::Data<Database>,
    req: web::Json<LoginRequest>,
) -> Result<HttpResponse> {
    req.validate()?;

    let (user, tokens) = auth_service::login(db.get_ref(), &req.email, &req.password).await?;

    Ok(HttpResponse::Ok().json(AuthResponse {
        user: user.into(),
        tokens,
    }))
}

/// POST /api/auth/verify-email
pub async fn verify_email(
    db: web::Data<Database>,
    req: web::Json<VerifyEmailRequest>,
) -> Result<HttpResponse> {
    req.validate()?;

    let (user, tokens) = auth_service::verify_email(db.get_ref(), &req.email, &req.code).await?;

    Ok(HttpResponse::Ok().json(AuthResponse {
        user: user.into(),
        tokens,
    }))
}

/// POST /api/auth/resend-code
pub async fn resend_code(
    db: web::Data<Database>,
    email_service: web::Data<EmailService>,
    req: web::Json<EmailOnlyRequest>,
) -> Result<HttpResponse> {
    req.validate()?;

    let message =
        auth_service::resend_code(db.get_ref(), email_service.get_ref(), &req.email).await?;

    Ok(HttpResponse::Ok().json(serde_json::json!({ "message": message })))
}

/// POST /api/auth/forgot-password
pub async fn forgot_password(
    db: web::Data<Database>,
    email_service: web::Data<EmailService>,
    req: web::Json<EmailOnlyRequest>,
) -> Result<HttpResponse> {
    req.validate()?;

    let message =
        auth_service::forgot_password(db.get_ref(), email_service.get_ref(), &req.email).await?;

    Ok(HttpResponse::Ok().json(serde_json::json!({ "message": message })))
}

/// POST /api/auth/reset-password
pub async fn reset_password(
    db: web::Data<Database>,
    req: web::Json<ResetPasswordRequest>,
) -> Result<HttpResponse> {
    req.validate()?;

    let message =
        auth_service::reset_password(db.get_ref(), &req.email, &req.code, &req.new_password)
            .await?;

    Ok(HttpResponse::Ok().json(serde_json::json!({ "message": message })))
}

/// POST /api/auth/change-password (authenticated)
pub async fn change_password(
    db: web::Data<Database>,
    user: AuthUser,
    req: web::Json<ChangePasswordRequest>,
) -> Result<HttpResponse> {
    req.validate()?;

    let message = auth_service::change_password(
        db.get_ref(),
        user.id,
        &req.old_password,
        &req.new_password,
    )
    .await?;

    Ok(HttpResponse::Ok().json(serde_json::json!({ "message": message })))
}

/// GET /api/auth/me (authenticated)
pub async fn get_me(db: web::Data<Database>, user: AuthUser) -> Result<HttpResponse> {
    let user = user_repo::find_by_id(db.get_ref(), user.id)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

    Ok(HttpResponse::Ok().json(UserResponse::from(user)))
}

/// POST /api/auth/logout
/// Tokens are stateless; the client drops them.
pub async fn logout() -> Result<HttpResponse> {
    Ok(HttpResponse::Ok().json(serde_json::json!({ "message": "Logged out successfully" })))
}

/// POST /api/auth/refresh
pub async fn refresh_token(
    db: web::Data<Database>,
    req: web::Json<RefreshRequest>,
) -> Result<HttpResponse> {
    req.validate()?;

    let (user, tokens) = auth_service::refresh_tokens(db.get_ref(), &req.refresh_token).await?;

    Ok(HttpResponse::Ok().json(AuthResponse {
        user: user.into(),
        tokens,
    }))
}
