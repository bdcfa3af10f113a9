use mongodb::{
    bson::doc,
    options::{ClientOptions, IndexOptions},
    Client, Database, IndexModel,
};

pub mod academic_repo;
pub mod alumni_repo;
pub mod blog_repo;
pub mod content_repo;
pub mod event_repo;
pub mod product_repo;
pub mod society_repo;
pub mod sports_repo;
pub mod user_repo;
pub mod work_repo;

/// Connect to the MongoDB deployment and verify it responds.
pub async fn connect(uri: &str, db_name: &str) -> Result<Database, mongodb::error::Error> {
    let mut options = ClientOptions::parse(uri).await?;
    options.app_name = Some("portal-service".to_string());

    let client = Client::with_options(options)?;
    let db = client.database(db_name);

    // Fail fast on an unreachable deployment.
    db.run_command(doc! { "ping": 1 }, None).await?;

    Ok(db)
}

/// Create the unique indexes the data model relies on. Safe to run on
/// every startup; MongoDB treats existing identical indexes as a no-op.
pub async fn ensure_indexes(db: &Database) -> Result<(), mongodb::error::Error> {
    let unique = |keys| {
        IndexModel::builder()
            .keys(keys)
            .options(IndexOptions::builder().unique(true).build())
            .build()
    };

    user_repo::users(db)
        .create_index(unique(doc! { "email": 1 }), None)
        .await?;

    // Sparse: only student documents carry a student id.
    user_repo::users(db)
        .create_index(
            IndexModel::builder()
                .keys(doc! { "student.student_id": 1 })
                .options(IndexOptions::builder().unique(true).sparse(true).build())
                .build(),
            None,
        )
        .await?;

    academic_repo::courses(db)
        .create_index(unique(doc! { "course_code": 1 }), None)
        .await?;

    society_repo::societies(db)
        .create_index(unique(doc! { "name": 1 }), None)
        .await?;

    product_repo::products(db)
        .create_index(
            IndexModel::builder()
                .keys(doc! { "is_active": 1, "is_deleted": 1, "order": 1 })
                .build(),
            None,
        )
        .await?;

    Ok(())
}
