use crate::{
    auth, db,
    models::{CreatedTitle, MediaType, NewTitle, Profile, Subtype, TitleStatus},
    store::{CatalogStore, DbStore},
};

pub async fn memory_db() -> sea_orm::DatabaseConnection {
    db::connect_and_migrate("sqlite::memory:").await.unwrap()
}

pub async fn user(db: &sea_orm::DatabaseConnection, username: &str) -> Profile {
    let email = format!("{username}@example.com");
    auth::register(db, username, &email, "correct horse", 8).await.unwrap()
}

pub async fn store_with_user() -> (DbStore, String) {
    let db = memory_db().await;
    let eren = user(&db, "eren").await;
    (DbStore::new(db), eren.id)
}

/// Title row plus its default subtype row, as a completed submission leaves them.
pub async fn seeded_title(
    store: &DbStore,
    user_id: &str,
    media_type: MediaType,
    known_as: &str,
) -> CreatedTitle {
    let title = NewTitle {
        media_type,
        native_title: known_as.to_string(),
        known_as: known_as.to_string(),
        synopsis: None,
        status: TitleStatus::Finished,
        cover_image_url: None,
        release_date: None,
        end_date: None,
        created_by: user_id.to_string(),
        updated_by: user_id.to_string(),
        created_at: 1,
        updated_at: 1,
    };
    let created = store.insert_title(&title).await.unwrap();
    store.insert_subtype(&created.id, &Subtype::defaults(media_type)).await.unwrap();
    created
}
