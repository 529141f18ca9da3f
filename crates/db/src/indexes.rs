use mongodb::{Database, IndexModel, options::IndexOptions};
use tracing::info;

pub async fn ensure_indexes(db: &Database) -> Result<(), mongodb::error::Error> {
    // Users
    create_indexes(
        db,
        "users",
        vec![
            index_unique(bson::doc! { "email": 1 }),
            index(bson::doc! { "role": 1 }),
        ],
    )
    .await?;

    // Collaborator links
    create_indexes(
        db,
        "collaborator_links",
        vec![
            index(bson::doc! { "student_id": 1, "collaborator_id": 1 }),
            index(bson::doc! { "collaborator_id": 1, "status": 1 }),
            index(bson::doc! { "student_id": 1, "status": 1 }),
        ],
    )
    .await?;

    // Colleges
    create_indexes(
        db,
        "colleges",
        vec![
            index(bson::doc! { "user_id": 1, "created_at": -1 }),
            index(bson::doc! { "user_id": 1, "deadline": 1 }),
        ],
    )
    .await?;

    // Tasks
    create_indexes(
        db,
        "tasks",
        vec![
            index(bson::doc! { "user_id": 1, "status": 1, "created_at": -1 }),
            index(bson::doc! { "user_id": 1, "due_date": 1 }),
            index(bson::doc! { "user_id": 1, "college_id": 1 }),
        ],
    )
    .await?;

    // Essays
    create_indexes(
        db,
        "essays",
        vec![
            index(bson::doc! { "user_id": 1, "created_at": -1 }),
            index(bson::doc! { "user_id": 1, "college_id": 1 }),
        ],
    )
    .await?;

    // Documents
    create_indexes(
        db,
        "documents",
        vec![index(bson::doc! { "user_id": 1, "created_at": -1 })],
    )
    .await?;

    // Scholarships
    create_indexes(
        db,
        "scholarships",
        vec![
            index(bson::doc! { "user_id": 1, "created_at": -1 }),
            index(bson::doc! { "user_id": 1, "deadline": 1 }),
        ],
    )
    .await?;

    info!("All indexes ensured");
    Ok(())
}

fn index(keys: bson::Document) -> IndexModel {
    IndexModel::builder().keys(keys).build()
}

fn index_unique(keys: bson::Document) -> IndexModel {
    IndexModel::builder()
        .keys(keys)
        .options(IndexOptions::builder().unique(true).build())
        .build()
}

async fn create_indexes(
    db: &Database,
    collection: &str,
    indexes: Vec<IndexModel>,
) -> Result<(), mongodb::error::Error> {
    db.collection::<bson::Document>(collection)
        .create_indexes(indexes)
        .await?;
    info!(collection, "Indexes created");
    Ok(())
}
