use futures_util::TryStreamExt;
use mongodb::{
    bson::{doc, oid::ObjectId, DateTime, Document},
    options::{FindOneAndUpdateOptions, FindOptions, ReturnDocument},
    Collection, Database,
};

use crate::models::{WorkAssignment, WorkVisibility};

pub fn assignments(db: &Database) -> Collection<WorkAssignment> {
    db.collection("work_assignments")
}

fn not_deleted() -> Document {
    doc! { "is_deleted": { "$ne": true } }
}

pub async fn create(
    db: &Database,
    assignment: &WorkAssignment,
) -> Result<(), mongodb::error::Error> {
    assignments(db).insert_one(assignment, None).await?;
    Ok(())
}

pub async fn find(
    db: &Database,
    id: ObjectId,
) -> Result<Option<WorkAssignment>, mongodb::error::Error> {
    let mut filter = not_deleted();
    filter.insert("_id", id);
    assignments(db).find_one(filter, None).await
}

/// Everything assigned to one user, nearest deadline first.
pub async fn list_for_assignee(
    db: &Database,
    user_id: ObjectId,
) -> Result<Vec<WorkAssignment>, mongodb::error::Error> {
    let mut filter = not_deleted();
    filter.insert("assigned_to", user_id);

    let options = FindOptions::builder().sort(doc! { "deadline": 1 }).build();
    assignments(db).find(filter, options).await?.try_collect().await
}

/// Society view: admins see everything; members see their own plus the
/// assignments published to the whole society.
pub async fn list_for_society(
    db: &Database,
    society_id: ObjectId,
    viewer: ObjectId,
    is_admin: bool,
) -> Result<Vec<WorkAssignment>, mongodb::error::Error> {
    let mut filter = not_deleted();
    filter.insert("society", society_id);
    if !is_admin {
        filter.insert(
            "$or",
            vec![
                doc! { "assigned_to": viewer },
                doc! { "visibility": WorkVisibility::PublicToSociety.as_str() },
            ],
        );
    }

    let options = FindOptions::builder().sort(doc! { "deadline": 1 }).build();
    assignments(db).find(filter, options).await?.try_collect().await
}

pub async fn list_all(db: &Database) -> Result<Vec<WorkAssignment>, mongodb::error::Error> {
    let options = FindOptions::builder().sort(doc! { "created_at": -1 }).build();
    assignments(db)
        .find(not_deleted(), options)
        .await?
        .try_collect()
        .await
}

pub async fn update_status(
    db: &Database,
    id: ObjectId,
    status: &str,
    feedback: Option<&str>,
) -> Result<Option<WorkAssignment>, mongodb::error::Error> {
    let mut set = doc! { "status": status, "updated_at": DateTime::now() };
    if let Some(feedback) = feedback {
        set.insert("feedback", feedback);
    }

    let mut filter = not_deleted();
    filter.insert("_id", id);

    let options = FindOneAndUpdateOptions::builder()
        .return_document(ReturnDocument::After)
        .build();
    assignments(db)
        .find_one_and_update(filter, doc! { "$set": set }, options)
        .await
}
