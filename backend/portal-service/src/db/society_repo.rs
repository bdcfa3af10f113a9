use futures_util::TryStreamExt;
use mongodb::{
    bson::{doc, oid::ObjectId, DateTime, Document},
    options::{FindOneAndUpdateOptions, FindOptions, ReturnDocument},
    Collection, Database,
};

use crate::models::{Society, SocietyMember};

pub fn societies(db: &Database) -> Collection<Society> {
    db.collection("societies")
}

pub fn members(db: &Database) -> Collection<SocietyMember> {
    db.collection("society_members")
}

fn not_deleted() -> Document {
    doc! { "is_deleted": { "$ne": true } }
}

// Societies ----------------------------------------------------------------

pub async fn create(db: &Database, society: &Society) -> Result<(), mongodb::error::Error> {
    societies(db).insert_one(society, None).await?;
    Ok(())
}

pub async fn list(
    db: &Database,
    category: Option<&str>,
) -> Result<Vec<Society>, mongodb::error::Error> {
    let mut filter = not_deleted();
    if let Some(category) = category {
        filter.insert("category", category);
    }
    let options = FindOptions::builder().sort(doc! { "name": 1 }).build();
    societies(db).find(filter, options).await?.try_collect().await
}

pub async fn find(db: &Database, id: ObjectId) -> Result<Option<Society>, mongodb::error::Error> {
    let mut filter = not_deleted();
    filter.insert("_id", id);
    societies(db).find_one(filter, None).await
}

pub async fn update(
    db: &Database,
    id: ObjectId,
    mut set: Document,
) -> Result<Option<Society>, mongodb::error::Error> {
    set.insert("updated_at", DateTime::now());
    let mut filter = not_deleted();
    filter.insert("_id", id);

    let options = FindOneAndUpdateOptions::builder()
        .return_document(ReturnDocument::After)
        .build();
    societies(db)
        .find_one_and_update(filter, doc! { "$set": set }, options)
        .await
}

// Members ------------------------------------------------------------------

pub async fn add_member(
    db: &Database,
    member: &SocietyMember,
) -> Result<(), mongodb::error::Error> {
    members(db).insert_one(member, None).await?;
    Ok(())
}

pub async fn list_members(
    db: &Database,
    society_id: ObjectId,
    is_current: Option<bool>,
) -> Result<Vec<SocietyMember>, mongodb::error::Error> {
    let mut filter = not_deleted();
    filter.insert("society", society_id);
    if let Some(current) = is_current {
        filter.insert("is_current", current);
    }

    let options = FindOptions::builder()
        .sort(doc! { "tenure_start": -1 })
        .build();
    members(db).find(filter, options).await?.try_collect().await
}

/// Current committee record for a user in a society. Drives the
/// work-assignment hierarchy check.
pub async fn find_current_member(
    db: &Database,
    society_id: ObjectId,
    user_id: ObjectId,
) -> Result<Option<SocietyMember>, mongodb::error::Error> {
    let mut filter = not_deleted();
    filter.insert("society", society_id);
    filter.insert("user", user_id);
    filter.insert("is_current", true);
    members(db).find_one(filter, None).await
}

pub async fn update_member(
    db: &Database,
    member_id: ObjectId,
    mut set: Document,
) -> Result<Option<SocietyMember>, mongodb::error::Error> {
    set.insert("updated_at", DateTime::now());
    let mut filter = not_deleted();
    filter.insert("_id", member_id);

    let options = FindOneAndUpdateOptions::builder()
        .return_document(ReturnDocument::After)
        .build();
    members(db)
        .find_one_and_update(filter, doc! { "$set": set }, options)
        .await
}

pub async fn soft_delete_member(
    db: &Database,
    member_id: ObjectId,
) -> Result<bool, mongodb::error::Error> {
    let result = members(db)
        .update_one(
            doc! { "_id": member_id, "is_deleted": { "$ne": true } },
            doc! { "$set": { "is_deleted": true, "updated_at": DateTime::now() } },
            None,
        )
        .await?;
    Ok(result.modified_count > 0)
}
