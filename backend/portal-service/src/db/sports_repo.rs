use futures_util::TryStreamExt;
use mongodb::{
    bson::{doc, oid::ObjectId, DateTime, Document},
    options::{FindOneAndUpdateOptions, FindOptions, ReturnDocument},
    Collection, Database,
};

use crate::models::{PlayerShowcase, Tournament};

pub fn tournaments(db: &Database) -> Collection<Tournament> {
    db.collection("tournaments")
}

pub fn showcases(db: &Database) -> Collection<PlayerShowcase> {
    db.collection("player_showcases")
}

fn not_deleted() -> Document {
    doc! { "is_deleted": { "$ne": true } }
}

// Tournaments --------------------------------------------------------------

pub async fn create_tournament(
    db: &Database,
    tournament: &Tournament,
) -> Result<(), mongodb::error::Error> {
    tournaments(db).insert_one(tournament, None).await?;
    Ok(())
}

pub async fn list_tournaments(
    db: &Database,
    sport_type: Option<&str>,
    status: Option<&str>,
) -> Result<Vec<Tournament>, mongodb::error::Error> {
    let mut filter = not_deleted();
    if let Some(sport_type) = sport_type {
        filter.insert("sport_type", sport_type);
    }
    if let Some(status) = status {
        filter.insert("status", status);
    }

    let options = FindOptions::builder().sort(doc! { "start_date": -1 }).build();
    tournaments(db).find(filter, options).await?.try_collect().await
}

pub async fn find_tournament(
    db: &Database,
    id: ObjectId,
) -> Result<Option<Tournament>, mongodb::error::Error> {
    let mut filter = not_deleted();
    filter.insert("_id", id);
    tournaments(db).find_one(filter, None).await
}

pub async fn update_tournament(
    db: &Database,
    id: ObjectId,
    mut set: Document,
) -> Result<Option<Tournament>, mongodb::error::Error> {
    set.insert("updated_at", DateTime::now());
    let mut filter = not_deleted();
    filter.insert("_id", id);

    let options = FindOneAndUpdateOptions::builder()
        .return_document(ReturnDocument::After)
        .build();
    tournaments(db)
        .find_one_and_update(filter, doc! { "$set": set }, options)
        .await
}

pub async fn soft_delete_tournament(
    db: &Database,
    id: ObjectId,
) -> Result<bool, mongodb::error::Error> {
    let result = tournaments(db)
        .update_one(
            doc! { "_id": id, "is_deleted": { "$ne": true } },
            doc! { "$set": { "is_deleted": true, "updated_at": DateTime::now() } },
            None,
        )
        .await?;
    Ok(result.modified_count > 0)
}

// Player showcases ---------------------------------------------------------

pub async fn create_showcase(
    db: &Database,
    showcase: &PlayerShowcase,
) -> Result<(), mongodb::error::Error> {
    showcases(db).insert_one(showcase, None).await?;
    Ok(())
}

pub async fn list_showcases(
    db: &Database,
    sport_type: Option<&str>,
    is_featured: Option<bool>,
) -> Result<Vec<PlayerShowcase>, mongodb::error::Error> {
    let mut filter = not_deleted();
    if let Some(sport_type) = sport_type {
        filter.insert("sport_type", sport_type);
    }
    if let Some(featured) = is_featured {
        filter.insert("is_featured", featured);
    }

    let options = FindOptions::builder()
        .sort(doc! { "is_featured": -1, "created_at": -1 })
        .build();
    showcases(db).find(filter, options).await?.try_collect().await
}

pub async fn update_showcase(
    db: &Database,
    id: ObjectId,
    mut set: Document,
) -> Result<Option<PlayerShowcase>, mongodb::error::Error> {
    set.insert("updated_at", DateTime::now());
    let mut filter = not_deleted();
    filter.insert("_id", id);

    let options = FindOneAndUpdateOptions::builder()
        .return_document(ReturnDocument::After)
        .build();
    showcases(db)
        .find_one_and_update(filter, doc! { "$set": set }, options)
        .await
}

pub async fn soft_delete_showcase(
    db: &Database,
    id: ObjectId,
) -> Result<bool, mongodb::error::Error> {
    let result = showcases(db)
        .update_one(
            doc! { "_id": id, "is_deleted": { "$ne": true } },
            doc! { "$set": { "is_deleted": true, "updated_at": DateTime::now() } },
            None,
        )
        .await?;
    Ok(result.modified_count > 0)
}
