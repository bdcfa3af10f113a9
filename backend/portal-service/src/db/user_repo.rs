/// User repository - all database operations for accounts
use futures_util::TryStreamExt;
use mongodb::{
    bson::{doc, oid::ObjectId, DateTime, Document},
    options::{FindOneAndUpdateOptions, FindOptions, ReturnDocument},
    Collection, Database,
};

use crate::models::{User, UserRole, UserStatus};

pub fn users(db: &Database) -> Collection<User> {
    db.collection("users")
}

fn not_deleted() -> Document {
    doc! { "is_deleted": { "$ne": true } }
}

/// Insert a fully-built user document.
pub async fn create_user(db: &Database, user: &User) -> Result<(), mongodb::error::Error> {
    users(db).insert_one(user, None).await?;
    Ok(())
}

/// Find a user by email (case-insensitive; addresses are stored lowercased).
pub async fn find_by_email(
    db: &Database,
    email: &str,
) -> Result<Option<User>, mongodb::error::Error> {
    let mut filter = not_deleted();
    filter.insert("email", email.to_lowercase());
    users(db).find_one(filter, None).await
}

pub async fn find_by_id(
    db: &Database,
    id: ObjectId,
) -> Result<Option<User>, mongodb::error::Error> {
    let mut filter = not_deleted();
    filter.insert("_id", id);
    users(db).find_one(filter, None).await
}

/// Find any account carrying the given student id, across all roles.
pub async fn find_by_student_id(
    db: &Database,
    student_id: &str,
) -> Result<Option<User>, mongodb::error::Error> {
    let mut filter = not_deleted();
    filter.insert("student.student_id", student_id);
    users(db).find_one(filter, None).await
}

/// Admin listing with optional role/status/search filters.
pub async fn list(
    db: &Database,
    role: Option<UserRole>,
    status: Option<UserStatus>,
    search: Option<&str>,
) -> Result<Vec<User>, mongodb::error::Error> {
    let mut filter = not_deleted();
    if let Some(role) = role {
        filter.insert("role", role.as_str());
    }
    if let Some(status) = status {
        filter.insert("status", status.as_str());
    }
    if let Some(term) = search {
        filter.insert(
            "$or",
            vec![
                doc! { "name": { "$regex": term, "$options": "i" } },
                doc! { "email": { "$regex": term, "$options": "i" } },
                doc! { "student.student_id": { "$regex": term, "$options": "i" } },
            ],
        );
    }

    let options = FindOptions::builder().sort(doc! { "created_at": -1 }).build();
    users(db).find(filter, options).await?.try_collect().await
}

/// Active teachers for the public faculty directory.
pub async fn list_faculty(db: &Database) -> Result<Vec<User>, mongodb::error::Error> {
    let mut filter = not_deleted();
    filter.insert("role", UserRole::Teacher.as_str());
    filter.insert("status", UserStatus::Active.as_str());

    let options = FindOptions::builder().sort(doc! { "name": 1 }).build();
    users(db).find(filter, options).await?.try_collect().await
}

pub async fn list_students(db: &Database) -> Result<Vec<User>, mongodb::error::Error> {
    let mut filter = not_deleted();
    filter.insert("role", UserRole::Student.as_str());

    let options = FindOptions::builder()
        .sort(doc! { "student.student_id": 1 })
        .build();
    users(db).find(filter, options).await?.try_collect().await
}

/// Recipients for a notification category. Important notices bypass the
/// preference filter; an audience role narrows the set further.
pub async fn list_notification_targets(
    db: &Database,
    preference_field: &str,
    category: Option<&str>,
    role: Option<UserRole>,
) -> Result<Vec<User>, mongodb::error::Error> {
    let mut filter = not_deleted();
    filter.insert("is_email_verified", true);
    if let Some(category) = category {
        filter.insert(preference_field, category);
    }
    if let Some(role) = role {
        filter.insert("role", role.as_str());
    }
    users(db).find(filter, None).await?.try_collect().await
}

/// Active accounts for an admin broadcast (optionally one role).
pub async fn list_broadcast_targets(
    db: &Database,
    role: Option<UserRole>,
) -> Result<Vec<User>, mongodb::error::Error> {
    let mut filter = not_deleted();
    filter.insert("status", UserStatus::Active.as_str());
    if let Some(role) = role {
        filter.insert("role", role.as_str());
    }
    users(db).find(filter, None).await?.try_collect().await
}

/// Fetch a batch of users by id (for joining display names into lists).
pub async fn find_many_by_ids(
    db: &Database,
    ids: &[ObjectId],
) -> Result<Vec<User>, mongodb::error::Error> {
    if ids.is_empty() {
        return Ok(vec![]);
    }
    let mut filter = not_deleted();
    filter.insert("_id", doc! { "$in": ids.to_vec() });
    users(db).find(filter, None).await?.try_collect().await
}

/// Apply a `$set` update and return the updated document.
pub async fn update_fields(
    db: &Database,
    id: ObjectId,
    mut set: Document,
) -> Result<Option<User>, mongodb::error::Error> {
    set.insert("updated_at", DateTime::now());
    let mut filter = not_deleted();
    filter.insert("_id", id);

    let options = FindOneAndUpdateOptions::builder()
        .return_document(ReturnDocument::After)
        .build();
    users(db)
        .find_one_and_update(filter, doc! { "$set": set }, options)
        .await
}

/// Store a fresh verification code with its expiry.
pub async fn set_verification_code(
    db: &Database,
    id: ObjectId,
    code: &str,
    expires: DateTime,
) -> Result<(), mongodb::error::Error> {
    users(db)
        .update_one(
            doc! { "_id": id },
            doc! { "$set": {
                "verification_code": code,
                "verification_code_expires": expires,
                "updated_at": DateTime::now(),
            }},
            None,
        )
        .await?;
    Ok(())
}

/// Mark the email verified and clear the one-shot code.
pub async fn mark_email_verified(
    db: &Database,
    id: ObjectId,
) -> Result<(), mongodb::error::Error> {
    users(db)
        .update_one(
            doc! { "_id": id },
            doc! {
                "$set": { "is_email_verified": true, "updated_at": DateTime::now() },
                "$unset": { "verification_code": "", "verification_code_expires": "" },
            },
            None,
        )
        .await?;
    Ok(())
}

/// Replace the password hash and clear any outstanding code.
pub async fn update_password(
    db: &Database,
    id: ObjectId,
    password_hash: &str,
) -> Result<(), mongodb::error::Error> {
    users(db)
        .update_one(
            doc! { "_id": id },
            doc! {
                "$set": { "password_hash": password_hash, "updated_at": DateTime::now() },
                "$unset": { "verification_code": "", "verification_code_expires": "" },
            },
            None,
        )
        .await?;
    Ok(())
}

pub async fn update_status(
    db: &Database,
    id: ObjectId,
    status: UserStatus,
) -> Result<Option<User>, mongodb::error::Error> {
    update_fields(db, id, doc! { "status": status.as_str() }).await
}

/// Soft delete; the account disappears from every read path.
pub async fn soft_delete(db: &Database, id: ObjectId) -> Result<bool, mongodb::error::Error> {
    let result = users(db)
        .update_one(
            doc! { "_id": id, "is_deleted": { "$ne": true } },
            doc! { "$set": { "is_deleted": true, "updated_at": DateTime::now() } },
            None,
        )
        .await?;
    Ok(result.modified_count > 0)
}
