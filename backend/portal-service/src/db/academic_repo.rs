use futures_util::TryStreamExt;
use mongodb::{
    bson::{doc, oid::ObjectId, DateTime, Document},
    options::{FindOneAndUpdateOptions, FindOptions, ReturnDocument},
    Collection, Database,
};

use crate::models::{AcademicAchievement, AcademicStat, Course};

pub fn courses(db: &Database) -> Collection<Course> {
    db.collection("courses")
}

pub fn achievements(db: &Database) -> Collection<AcademicAchievement> {
    db.collection("academic_achievements")
}

pub fn stats(db: &Database) -> Collection<AcademicStat> {
    db.collection("academic_stats")
}

fn not_deleted() -> Document {
    doc! { "is_deleted": { "$ne": true } }
}

// Courses ------------------------------------------------------------------

pub async fn create_course(db: &Database, course: &Course) -> Result<(), mongodb::error::Error> {
    courses(db).insert_one(course, None).await?;
    Ok(())
}

pub async fn find_course_by_code(
    db: &Database,
    course_code: &str,
) -> Result<Option<Course>, mongodb::error::Error> {
    let mut filter = not_deleted();
    filter.insert("course_code", course_code);
    courses(db).find_one(filter, None).await
}

pub async fn list_courses(
    db: &Database,
    level: Option<&str>,
    semester: Option<i32>,
) -> Result<Vec<Course>, mongodb::error::Error> {
    let mut filter = not_deleted();
    if let Some(level) = level {
        filter.insert("level", level);
    }
    if let Some(semester) = semester {
        filter.insert("semester", semester);
    }

    let options = FindOptions::builder()
        .sort(doc! { "semester": 1, "course_code": 1 })
        .build();
    courses(db).find(filter, options).await?.try_collect().await
}

pub async fn update_course(
    db: &Database,
    id: ObjectId,
    mut set: Document,
) -> Result<Option<Course>, mongodb::error::Error> {
    set.insert("updated_at", DateTime::now());
    let mut filter = not_deleted();
    filter.insert("_id", id);

    let options = FindOneAndUpdateOptions::builder()
        .return_document(ReturnDocument::After)
        .build();
    courses(db)
        .find_one_and_update(filter, doc! { "$set": set }, options)
        .await
}

pub async fn soft_delete_course(
    db: &Database,
    id: ObjectId,
) -> Result<bool, mongodb::error::Error> {
    let result = courses(db)
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
    achievement: &AcademicAchievement,
) -> Result<(), mongodb::error::Error> {
    achievements(db).insert_one(achievement, None).await?;
    Ok(())
}

pub async fn list_achievements(
    db: &Database,
    achievement_type: Option<&str>,
) -> Result<Vec<AcademicAchievement>, mongodb::error::Error> {
    let mut filter = not_deleted();
    if let Some(achievement_type) = achievement_type {
        filter.insert("type", achievement_type);
    }

    let options = FindOptions::builder().sort(doc! { "date": -1 }).build();
    achievements(db)
        .find(filter, options)
        .await?
        .try_collect()
        .await
}

// Stats --------------------------------------------------------------------

pub async fn list_stats(db: &Database) -> Result<Vec<AcademicStat>, mongodb::error::Error> {
    let options = FindOptions::builder().sort(doc! { "category": 1 }).build();
    stats(db)
        .find(not_deleted(), options)
        .await?
        .try_collect()
        .await
}

/// Stats are upserted by label; the page shows one value per label.
pub async fn upsert_stat(
    db: &Database,
    label: &str,
    value: &str,
    icon: Option<&str>,
    category: &str,
) -> Result<AcademicStat, mongodb::error::Error> {
    let now = DateTime::now();
    let mut set = doc! {
        "value": value,
        "category": category,
        "updated_at": now,
        "is_deleted": false,
    };
    if let Some(icon) = icon {
        set.insert("icon", icon);
    }

    let options = FindOneAndUpdateOptions::builder()
        .upsert(true)
        .return_document(ReturnDocument::After)
        .build();

    let updated = stats(db)
        .find_one_and_update(
            doc! { "label": label },
            doc! {
                "$set": set,
                "$setOnInsert": { "created_at": now },
            },
            options,
        )
        .await?;

    updated.ok_or_else(|| {
        mongodb::error::Error::custom("stat upsert returned no document".to_string())
    })
}
