use futures_util::TryStreamExt;
use mongodb::{
    bson::{doc, oid::ObjectId, DateTime, Document},
    options::{FindOneAndUpdateOptions, FindOptions, ReturnDocument},
    Collection, Database,
};

use crate::models::Alumni;

pub fn alumni(db: &Database) -> Collection<Alumni> {
    db.collection("alumni")
}

fn not_deleted() -> Document {
    doc! { "is_deleted": { "$ne": true } }
}

pub async fn create(db: &Database, entry: &Alumni) -> Result<(), mongodb::error::Error> {
    alumni(db).insert_one(entry, None).await?;
    Ok(())
}

pub async fn list(
    db: &Database,
    batch: Option<&str>,
) -> Result<Vec<Alumni>, mongodb::error::Error> {
    let mut filter = not_deleted();
    if let Some(batch) = batch {
        filter.insert("batch", batch);
    }

    let options = FindOptions::builder()
        .sort(doc! { "batch": -1, "name": 1 })
        .build();
    alumni(db).find(filter, options).await?.try_collect().await
}

pub async fn find(db: &Database, id: ObjectId) -> Result<Option<Alumni>, mongodb::error::Error> {
    let mut filter = not_deleted();
    filter.insert("_id", id);
    alumni(db).find_one(filter, None).await
}

pub async fn update(
    db: &Database,
    id: ObjectId,
    mut set: Document,
) -> Result<Option<Alumni>, mongodb::error::Error> {
    set.insert("updated_at", DateTime::now());
    let mut filter = not_deleted();
    filter.insert("_id", id);

    let options = FindOneAndUpdateOptions::builder()
        .return_document(ReturnDocument::After)
        .build();
    alumni(db)
        .find_one_and_update(filter, doc! { "$set": set }, options)
        .await
}

pub async fn soft_delete(db: &Database, id: ObjectId) -> Result<bool, mongodb::error::Error> {
    let result = alumni(db)
        .update_one(
            doc! { "_id": id, "is_deleted": { "$ne": true } },
            doc! { "$set": { "is_deleted": true, "updated_at": DateTime::now() } },
            None,
        )
        .await?;
    Ok(result.modified_count > 0)
}
