use futures_util::TryStreamExt;
use mongodb::{
    bson::{doc, oid::ObjectId, DateTime, Document},
    options::{FindOneAndUpdateOptions, FindOptions, ReturnDocument},
    Collection, Database,
};

use crate::models::Product;

pub fn products(db: &Database) -> Collection<Product> {
    db.collection("products")
}

fn not_deleted() -> Document {
    doc! { "is_deleted": { "$ne": true } }
}

pub async fn create(db: &Database, product: &Product) -> Result<(), mongodb::error::Error> {
    products(db).insert_one(product, None).await?;
    Ok(())
}

/// Public listing: active products in display order.
pub async fn list_active(db: &Database) -> Result<Vec<Product>, mongodb::error::Error> {
    let mut filter = not_deleted();
    filter.insert("is_active", true);

    let options = FindOptions::builder().sort(doc! { "order": 1 }).build();
    products(db).find(filter, options).await?.try_collect().await
}

/// Admin listing: everything that is not deleted.
pub async fn list_all(db: &Database) -> Result<Vec<Product>, mongodb::error::Error> {
    let options = FindOptions::builder().sort(doc! { "order": 1 }).build();
    products(db)
        .find(not_deleted(), options)
        .await?
        .try_collect()
        .await
}

pub async fn find(db: &Database, id: ObjectId) -> Result<Option<Product>, mongodb::error::Error> {
    let mut filter = not_deleted();
    filter.insert("_id", id);
    products(db).find_one(filter, None).await
}

pub async fn update(
    db: &Database,
    id: ObjectId,
    mut set: Document,
) -> Result<Option<Product>, mongodb::error::Error> {
    set.insert("updated_at", DateTime::now());
    let mut filter = not_deleted();
    filter.insert("_id", id);

    let options = FindOneAndUpdateOptions::builder()
        .return_document(ReturnDocument::After)
        .build();
    products(db)
        .find_one_and_update(filter, doc! { "$set": set }, options)
        .await
}

pub async fn soft_delete(db: &Database, id: ObjectId) -> Result<bool, mongodb::error::Error> {
    let result = products(db)
        .update_one(
            doc! { "_id": id, "is_deleted": { "$ne": true } },
            doc! { "$set": { "is_deleted": true, "updated_at": DateTime::now() } },
            None,
        )
        .await?;
    Ok(result.modified_count > 0)
}
