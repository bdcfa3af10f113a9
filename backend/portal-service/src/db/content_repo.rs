/// Homepage, notices and achievements
use futures_util::TryStreamExt;
use mongodb::{
    bson::{doc, oid::ObjectId, to_bson, Bson, DateTime, Document},
    options::{FindOneAndUpdateOptions, FindOptions, ReturnDocument},
    Collection, Database,
};

use crate::models::{Achievement, HeroSlide, Notice, SiteContent};

pub fn site_content(db: &Database) -> Collection<SiteContent> {
    db.collection("site_content")
}

pub fn notices(db: &Database) -> Collection<Notice> {
    db.collection("notices")
}

pub fn achievements(db: &Database) -> Collection<Achievement> {
    db.collection("achievements")
}

fn not_deleted() -> Document {
    doc! { "is_deleted": { "$ne": true } }
}

// Homepage -----------------------------------------------------------------

/// The homepage is a singleton document.
pub async fn find_homepage(db: &Database) -> Result<Option<SiteContent>, mongodb::error::Error> {
    site_content(db).find_one(doc! {}, None).await
}

/// Replace the slide deck, creating the singleton on first write.
pub async fn save_homepage(
    db: &Database,
    slides: &[HeroSlide],
    updated_by: ObjectId,
) -> Result<SiteContent, mongodb::error::Error> {
    let slides_bson = to_bson(slides).unwrap_or(Bson::Array(vec![]));
    let now = DateTime::now();

    let options = FindOneAndUpdateOptions::builder()
        .upsert(true)
        .return_document(ReturnDocument::After)
        .build();

    let updated = site_content(db)
        .find_one_and_update(
            doc! {},
            doc! {
                "$set": {
                    "hero_slides": slides_bson,
                    "updated_by": updated_by,
                    "updated_at": now,
                },
                "$setOnInsert": { "created_at": now },
            },
            options,
        )
        .await?;

    // Upsert with ReturnDocument::After always yields a document.
    updated.ok_or_else(|| {
        mongodb::error::Error::custom("homepage upsert returned no document".to_string())
    })
}

// Notices ------------------------------------------------------------------

pub async fn create_notice(db: &Database, notice: &Notice) -> Result<(), mongodb::error::Error> {
    notices(db).insert_one(notice, None).await?;
    Ok(())
}

/// Pinned first, then newest publish date.
pub async fn list_notices(
    db: &Database,
    category: Option<&str>,
) -> Result<Vec<Notice>, mongodb::error::Error> {
    let mut filter = not_deleted();
    if let Some(category) = category {
        filter.insert("category", category);
    }

    let options = FindOptions::builder()
        .sort(doc! { "is_pinned": -1, "publish_date": -1 })
        .build();
    notices(db).find(filter, options).await?.try_collect().await
}

pub async fn find_notice(
    db: &Database,
    id: ObjectId,
) -> Result<Option<Notice>, mongodb::error::Error> {
    let mut filter = not_deleted();
    filter.insert("_id", id);
    notices(db).find_one(filter, None).await
}

pub async fn soft_delete_notice(
    db: &Database,
    id: ObjectId,
) -> Result<bool, mongodb::error::Error> {
    let result = notices(db)
        .update_one(
            doc! { "_id": id, "is_deleted": { "$ne": true } },
            doc! { "$set": { "is_deleted": true, "updated_at": DateTime::now() } },
            None,
        )
        .await?;
    Ok(result.modified_count > 0)
}

// Achievements -------------------------------------------------------------

pub async fn create_achievement(
    db: &Database,
    achievement: &Achievement,
) -> Result<(), mongodb::error::Error> {
    achievements(db).insert_one(achievement, None).await?;
    Ok(())
}

pub async fn list_achievements(
    db: &Database,
    category: Option<&str>,
    achieved_by: Option<ObjectId>,
) -> Result<Vec<Achievement>, mongodb::error::Error> {
    let mut filter = not_deleted();
    if let Some(category) = category {
        filter.insert("category", category);
    }
    if let Some(achieved_by) = achieved_by {
        filter.insert("achieved_by", achieved_by);
    }

    let options = FindOptions::builder().sort(doc! { "date": -1 }).build();
    achievements(db)
        .find(filter, options)
        .await?
        .try_collect()
        .await
}

pub async fn find_achievement(
    db: &Database,
    id: ObjectId,
) -> Result<Option<Achievement>, mongodb::error::Error> {
    let mut filter = not_deleted();
    filter.insert("_id", id);
    achievements(db).find_one(filter, None).await
}

pub async fn soft_delete_achievement(
    db: &Database,
    id: ObjectId,
) -> Result<bool, mongodb::error::Error> {
    let result = achievements(db)
        .update_one(
            doc! { "_id": id, "is_deleted": { "$ne": true } },
            doc! { "$set": { "is_deleted": true, "updated_at": DateTime::now() } },
            None,
        )
        .await?;
    Ok(result.modified_count > 0)
}
