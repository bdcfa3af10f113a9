/// Registration, login and the verification-code flows.
use mongodb::bson::{oid::ObjectId, DateTime};
use mongodb::Database;

use crate::config::RegistrationConfig;
use crate::db::user_repo;
use crate::error::{AppError, Result};
use crate::models::{
    NotificationPreferences, StudentProfile, TeacherProfile, User, UserRole, UserStatus,
};
use crate::security::jwt::{self, TokenPair};
use crate::security::password;
use crate::security::verification::{
    code_expiry_from_now, generate_verification_code, is_code_expired,
};
use crate::services::email::EmailService;

pub struct StudentRegistration {
    pub name: String,
    pub email: String,
    pub password: String,
    pub phone: String,
    pub student_id: String,
    pub batch: String,
    pub session: String,
    pub enrollment_year: i32,
    pub cgpa: Option<f64>,
}

pub struct TeacherRegistration {
    pub name: String,
    pub email: String,
    pub password: String,
    pub phone: String,
    pub designation: String,
    pub department: Option<String>,
    pub research_interests: Vec<String>,
}

pub struct RegistrationOutcome {
    pub user: User,
    pub message: String,
}

fn new_user_document(
    name: String,
    email: String,
    password_hash: String,
    phone: String,
    role: UserRole,
    status: UserStatus,
    verification_code: String,
) -> User {
    let now = DateTime::now();
    User {
        id: ObjectId::new(),
        name,
        email: email.to_lowercase(),
        password_hash,
        role,
        permissions: vec![],
        phone,
        profile_image: None,
        status,
        is_email_verified: false,
        verification_code: Some(verification_code),
        verification_code_expires: Some(code_expiry_from_now()),
        notification_preferences: NotificationPreferences::default(),
        social_links: None,
        experiences: vec![],
        researches: vec![],
        student: None,
        teacher: None,
        is_deleted: false,
        created_at: now,
        updated_at: now,
    }
}

pub async fn register_student(
    db: &Database,
    registration: &RegistrationConfig,
    email_service: &EmailService,
    data: StudentRegistration,
) -> Result<RegistrationOutcome> {
    if let Some(existing) = user_repo::find_by_email(db, &data.email).await? {
        if !existing.is_email_verified {
            return Err(AppError::Conflict(
                "User with this email already exists but is not verified. Please check your email for the verification code.".to_string(),
            ));
        }
        return Err(AppError::Conflict(
            "User with this email already exists. If you have forgotten your password or were added by an admin, please use the \"Forgot Password\" feature on the login page.".to_string(),
        ));
    }

    // The student id must be unique across every account, whatever its role.
    if user_repo::find_by_student_id(db, &data.student_id).await?.is_some() {
        return Err(AppError::Conflict(format!(
            "A student account with ID {} already exists. If you were added by admin, please contact them to reset your password instead of registering again.",
            data.student_id
        )));
    }

    let code = generate_verification_code();
    let is_official = registration.is_official_email(&data.email);
    let status = if is_official {
        UserStatus::Active
    } else {
        UserStatus::Inactive
    };

    let password_hash = password::hash_password(&data.password)?;
    let mut user = new_user_document(
        data.name,
        data.email,
        password_hash,
        data.phone,
        UserRole::Student,
        status,
        code.clone(),
    );
    user.student = Some(StudentProfile {
        student_id: data.student_id,
        batch: data.batch,
        session: data.session,
        cgpa: data.cgpa,
        enrollment_year: data.enrollment_year,
        projects: vec![],
        is_alumni: false,
    });

    user_repo::create_user(db, &user).await?;

    email_service
        .send_verification_email(&user.email, "Confirm Your Email", &code)
        .await?;

    let message = if is_official {
        "Registration successful. Please verify your email to activate your account.".to_string()
    } else {
        "Registration successful. Verify your email. Note: External accounts require Admin approval.".to_string()
    };

    Ok(RegistrationOutcome { user, message })
}

pub async fn register_teacher(
    db: &Database,
    registration: &RegistrationConfig,
    email_service: &EmailService,
    data: TeacherRegistration,
) -> Result<RegistrationOutcome> {
    if user_repo::find_by_email(db, &data.email).await?.is_some() {
        return Err(AppError::Conflict(
            "User with this email already exists. If you have forgotten your password or were added by an admin, please use the \"Forgot Password\" feature on the login page.".to_string(),
        ));
    }

    let code = generate_verification_code();
    let is_official = registration.is_official_email(&data.email);
    let status = if is_official {
        UserStatus::Active
    } else {
        UserStatus::Inactive
    };

    let password_hash = password::hash_password(&data.password)?;
    let mut user = new_user_document(
        data.name,
        data.email,
        password_hash,
        data.phone,
        UserRole::Teacher,
        status,
        code.clone(),
    );
    user.teacher = Some(TeacherProfile {
        designation: data.designation,
        department: data
            .department
            .unwrap_or_else(|| "Computer Science and Engineering".to_string()),
        research_interests: data.research_interests,
        publications: vec![],
    });

    user_repo::create_user(db, &user).await?;

    email_service
        .send_verification_email(&user.email, "Confirm Your Email", &code)
        .await?;

    let message = if is_official {
        "Registration successful. Please verify your email.".to_string()
    } else {
        "Registration successful. Verify your email. External accounts require Admin approval.".to_string()
    };

    Ok(RegistrationOutcome { user, message })
}

pub async fn login(db: &Database, email: &str, pass: &str) -> Result<(User, TokenPair)> {
    let user = user_repo::find_by_email(db, email).await?;

    let user = match user {
        Some(user) if password::verify_password(pass, &user.password_hash)? => user,
        _ => {
            return Err(AppError::Authentication(
                "Invalid email or password".to_string(),
            ))
        }
    };

    if !user.is_email_verified {
        return Err(AppError::Authorization(
            "Please verify your email address before logging in. Check your email for the verification code.".to_string(),
        ));
    }

    if user.status != UserStatus::Active {
        return Err(AppError::Authentication(
            "Your account is not active. Please contact admin.".to_string(),
        ));
    }

    let tokens = jwt::generate_token_pair(user.id, user.role, &user.email)
        .map_err(|e| AppError::Internal(e.to_string()))?;

    Ok((user, tokens))
}

pub async fn verify_email(db: &Database, email: &str, code: &str) -> Result<(User, TokenPair)> {
    let user = user_repo::find_by_email(db, email)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

    if user.is_email_verified {
        return Err(AppError::BadRequest("Email is already verified".to_string()));
    }

    let (stored_code, expires) = match (&user.verification_code, user.verification_code_expires) {
        (Some(code), Some(expires)) => (code.clone(), expires),
        _ => {
            return Err(AppError::BadRequest(
                "No verification code found. Please request a new one.".to_string(),
            ))
        }
    };

    if is_code_expired(expires) {
        return Err(AppError::BadRequest(
            "Verification code has expired. Please request a new one.".to_string(),
        ));
    }

    if stored_code != code {
        return Err(AppError::BadRequest("Invalid verification code".to_string()));
    }

    user_repo::mark_email_verified(db, user.id).await?;
    tracing::info!(email = %user.email, "email verified");

    let tokens = jwt::generate_token_pair(user.id, user.role, &user.email)
        .map_err(|e| AppError::Internal(e.to_string()))?;

    let mut user = user;
    user.is_email_verified = true;
    user.verification_code = None;
    user.verification_code_expires = None;

    Ok((user, tokens))
}

pub async fn resend_code(
    db: &Database,
    email_service: &EmailService,
    email: &str,
) -> Result<String> {
    let user = user_repo::find_by_email(db, email)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

    if user.is_email_verified {
        return Err(AppError::BadRequest("Email is already verified".to_string()));
    }

    let code = generate_verification_code();
    user_repo::set_verification_code(db, user.id, &code, code_expiry_from_now()).await?;

    email_service
        .send_verification_email(&user.email, "Confirm Your Email", &code)
        .await?;

    Ok("Verification code has been resent to your email".to_string())
}

pub async fn forgot_password(
    db: &Database,
    email_service: &EmailService,
    email: &str,
) -> Result<String> {
    let user = user_repo::find_by_email(db, email)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

    let code = generate_verification_code();
    user_repo::set_verification_code(db, user.id, &code, code_expiry_from_now()).await?;

    email_service
        .send_verification_email(&user.email, "Reset Your Password", &code)
        .await?;

    Ok("Password reset code sent to email".to_string())
}

pub async fn reset_password(
    db: &Database,
    email: &str,
    code: &str,
    new_password: &str,
) -> Result<String> {
    let user = user_repo::find_by_email(db, email)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

    match (&user.verification_code, user.verification_code_expires) {
        (Some(stored), Some(expires)) => {
            if stored != code {
                return Err(AppError::BadRequest("Invalid verification code".to_string()));
            }
            if is_code_expired(expires) {
                return Err(AppError::BadRequest("Verification code expired".to_string()));
            }
        }
        _ => {
            return Err(AppError::BadRequest("Invalid verification code".to_string()));
        }
    }

    let password_hash = password::hash_password(new_password)?;
    user_repo::update_password(db, user.id, &password_hash).await?;

    Ok("Password reset successfully".to_string())
}

pub async fn change_password(
    db: &Database,
    user_id: ObjectId,
    old_password: &str,
    new_password: &str,
) -> Result<String> {
    let user = user_repo::find_by_id(db, user_id)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

    if !password::verify_password(old_password, &user.password_hash)? {
        return Err(AppError::Authentication(
            "Invalid current password".to_string(),
        ));
    }

    let password_hash = password::hash_password(new_password)?;
    user_repo::update_password(db, user.id, &password_hash).await?;

    Ok("Password updated successfully".to_string())
}

/// Exchange a valid refresh token for a fresh pair.
pub async fn refresh_tokens(db: &Database, refresh_token: &str) -> Result<(User, TokenPair)> {
    let data = jwt::validate_refresh_token(refresh_token)
        .map_err(|_| AppError::Authentication("Invalid token or token expired.".to_string()))?;

    let user_id = ObjectId::parse_str(&data.claims.sub)
        .map_err(|_| AppError::Authentication("Invalid user ID in token".to_string()))?;

    let user = user_repo::find_by_id(db, user_id)
        .await?
        .ok_or_else(|| {
            AppError::Authentication("The user belonging to this token no longer exists.".to_string())
        })?;

    if user.status != UserStatus::Active {
        return Err(AppError::Authentication(
            "Your account is not active. Please contact admin.".to_string(),
        ));
    }

    let tokens = jwt::generate_token_pair(user.id, user.role, &user.email)
        .map_err(|e| AppError::Internal(e.to_string()))?;

    Ok((user, tokens))
}
