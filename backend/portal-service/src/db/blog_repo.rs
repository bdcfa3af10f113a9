use futures_util::TryStreamExt;
use mongodb::{
    bson::{doc, oid::ObjectId, DateTime, Document},
    options::{FindOneAndUpdateOptions, FindOptions, ReturnDocument},
    Collection, Database,
};

use crate::models::{Blog, BlogStatus};

pub fn blogs(db: &Database) -> Collection<Blog> {
    db.collection("blogs")
}

fn not_deleted() -> Document {
    doc! { "is_deleted": { "$ne": true } }
}

pub async fn create(db: &Database, blog: &Blog) -> Result<(), mongodb::error::Error> {
    blogs(db).insert_one(blog, None).await?;
    Ok(())
}

pub async fn find(db: &Database, id: ObjectId) -> Result<Option<Blog>, mongodb::error::Error> {
    let mut filter = not_deleted();
    filter.insert("_id", id);
    blogs(db).find_one(filter, None).await
}

pub async fn list_by_status(
    db: &Database,
    status: BlogStatus,
) -> Result<Vec<Blog>, mongodb::error::Error> {
    let mut filter = not_deleted();
    filter.insert("status", status.as_str());

    let options = FindOptions::builder().sort(doc! { "created_at": -1 }).build();
    blogs(db).find(filter, options).await?.try_collect().await
}

pub async fn list_by_author(
    db: &Database,
    author: ObjectId,
) -> Result<Vec<Blog>, mongodb::error::Error> {
    let mut filter = not_deleted();
    filter.insert("author", author);

    let options = FindOptions::builder().sort(doc! { "created_at": -1 }).build();
    blogs(db).find(filter, options).await?.try_collect().await
}

/// Moderation verdict: publish or reject.
pub async fn set_status(
    db: &Database,
    id: ObjectId,
    status: BlogStatus,
) -> Result<Option<Blog>, mongodb::error::Error> {
    let mut filter = not_deleted();
    filter.insert("_id", id);

    let options = FindOneAndUpdateOptions::builder()
        .return_document(ReturnDocument::After)
        .build();
    blogs(db)
        .find_one_and_update(
            filter,
            doc! { "$set": { "status": status.as_str(), "updated_at": DateTime::now() } },
            options,
        )
        .await
}

pub async fn soft_delete(db: &Database, id: ObjectId) -> Result<bool, mongodb::error::Error> {
    let result = blogs(db)
        .update_one(
            doc! { "_id": id, "is_deleted": { "$ne": true } },
            doc! { "$set": { "is_deleted": true, "updated_at": DateTime::now() } },
            None,
        )
        .await?;
    Ok(result.modified_count > 0)
}
