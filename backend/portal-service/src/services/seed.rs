/// Startup seeding of the initial admin account.
use mongodb::bson::{oid::ObjectId, DateTime};
use mongodb::Database;

use crate::config::AdminSeedConfig;
use crate::db::user_repo;
use crate::error::Result;
use crate::models::{NotificationPreferences, User, UserRole, UserStatus};
use crate::security::password;

/// Ensure an admin account exists. No-op when the configured email is
/// already registered.
pub async fn seed_admin(db: &Database, config: &AdminSeedConfig) -> Result<()> {
    if user_repo::find_by_email(db, &config.email).await?.is_some() {
        return Ok(());
    }

    let now = DateTime::now();
    let admin = User {
        id: ObjectId::new(),
        name: config.name.clone(),
        email: config.email.to_lowercase(),
        password_hash: password::hash_password(&config.password)?,
        role: UserRole::Admin,
        permissions: vec![],
        phone: config.phone.clone(),
        profile_image: None,
        status: UserStatus::Active,
        is_email_verified: true,
        verification_code: None,
        verification_code_expires: None,
        notification_preferences: NotificationPreferences::default(),
        social_links: None,
        experiences: vec![],
        researches: vec![],
        student: None,
        teacher: None,
        is_deleted: false,
        created_at: now,
        updated_at: now,
    };

    user_repo::create_user(db, &admin).await?;
    tracing::info!(email = %admin.email, "admin user seeded");

    Ok(())
}
