use futures_util::TryStreamExt;
use mongodb::{
    bson::{doc, oid::ObjectId, DateTime, Document},
    options::{FindOneAndUpdateOptions, FindOptions, ReturnDocument},
    Collection, Database,
};

use crate::models::Event;

pub fn events(db: &Database) -> Collection<Event> {
    db.collection("events")
}

fn not_deleted() -> Document {
    doc! { "is_deleted": { "$ne": true } }
}

#[derive(Debug, Default)]
pub struct EventFilter<'a> {
    pub status: Option<&'a str>,
    pub category: Option<&'a str>,
    pub is_featured: Option<bool>,
    pub search_term: Option<&'a str>,
}

pub async fn create(db: &Database, event: &Event) -> Result<(), mongodb::error::Error> {
    events(db).insert_one(event, None).await?;
    Ok(())
}

pub async fn list(
    db: &Database,
    filter_opts: EventFilter<'_>,
) -> Result<Vec<Event>, mongodb::error::Error> {
    let mut filter = not_deleted();
    if let Some(status) = filter_opts.status {
        filter.insert("status", status);
    }
    if let Some(category) = filter_opts.category {
        filter.insert("category", category);
    }
    if let Some(featured) = filter_opts.is_featured {
        filter.insert("is_featured", featured);
    }
    if let Some(term) = filter_opts.search_term {
        filter.insert(
            "$or",
            vec![
                doc! { "title": { "$regex": term, "$options": "i" } },
                doc! { "description": { "$regex": term, "$options": "i" } },
                doc! { "location": { "$regex": term, "$options": "i" } },
            ],
        );
    }

    let options = FindOptions::builder().sort(doc! { "start_date": 1 }).build();
    events(db).find(filter, options).await?.try_collect().await
}

/// Events whose window has not opened yet.
pub async fn list_upcoming(db: &Database) -> Result<Vec<Event>, mongodb::error::Error> {
    let mut filter = not_deleted();
    filter.insert("start_date", doc! { "$gt": DateTime::now() });

    let options = FindOptions::builder().sort(doc! { "start_date": 1 }).build();
    events(db).find(filter, options).await?.try_collect().await
}

/// Events currently inside their window.
pub async fn list_ongoing(db: &Database) -> Result<Vec<Event>, mongodb::error::Error> {
    let now = DateTime::now();
    let mut filter = not_deleted();
    filter.insert("start_date", doc! { "$lte": now });
    filter.insert("end_date", doc! { "$gte": now });

    let options = FindOptions::builder().sort(doc! { "start_date": 1 }).build();
    events(db).find(filter, options).await?.try_collect().await
}

pub async fn find(db: &Database, id: ObjectId) -> Result<Option<Event>, mongodb::error::Error> {
    let mut filter = not_deleted();
    filter.insert("_id", id);
    events(db).find_one(filter, None).await
}

pub async fn update(
    db: &Database,
    id: ObjectId,
    mut set: Document,
) -> Result<Option<Event>, mongodb::error::Error> {
    set.insert("updated_at", DateTime::now());
    let mut filter = not_deleted();
    filter.insert("_id", id);

    let options = FindOneAndUpdateOptions::builder()
        .return_document(ReturnDocument::After)
        .build();
    events(db)
        .find_one_and_update(filter, doc! { "$set": set }, options)
        .await
}

pub async fn soft_delete(db: &Database, id: ObjectId) -> Result<bool, mongodb::error::Error> {
    let result = events(db)
        .update_one(
            doc! { "_id": id, "is_deleted": { "$ne": true } },
            doc! { "$set": { "is_deleted": true, "updated_at": DateTime::now() } },
            None,
        )
        .await?;
    Ok(result.modified_count > 0)
}
