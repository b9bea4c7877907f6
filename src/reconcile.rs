use std::time::Duration;

use tracing::{debug, info, warn};

use crate::{
    auth::now_sec,
    error::StoreError,
    store::{CatalogStore, DbStore},
};

/// Deletes titles that have no subtype row and were created at least
/// `grace_secs` before `now`. Newer titles are skipped because their
/// subtype insert may still be in flight. Returns how many were removed.
pub async fn sweep_orphans(
    store: &DbStore,
    now: i64,
    grace_secs: i64,
) -> Result<usize, StoreError> {
    let orphans = store.orphaned_titles(now - grace_secs).await?;

    for (title_id, media_type) in &orphans {
        warn!(title_id = %title_id, media_type = media_type.as_str(), "removing orphaned title");
        store.delete_title(title_id).await?;
    }

    Ok(orphans.len())
}

pub async fn run(store: DbStore, every: Duration, grace_secs: i64) {
    let mut ticker = tokio::time::interval(every);
    loop {
        ticker.tick().await;
        match sweep_orphans(&store, now_sec(), grace_secs).await {
            Ok(0) => debug!("no orphaned titles"),
            Ok(removed) => info!(removed, "orphan sweep finished"),
            Err(err) => warn!(error = %err, "orphan sweep failed"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        models::{MediaType, NewTitle, Subtype, TitleStatus},
        testing::store_with_user,
    };

    fn title(media_type: MediaType, user: &str, created_at: i64) -> NewTitle {
        NewTitle {
            media_type,
            native_title: "Kimi no Na wa".into(),
            known_as: "Your Name".into(),
            synopsis: None,
            status: TitleStatus::Finished,
            cover_image_url: None,
            release_date: None,
            end_date: None,
            created_by: user.into(),
            updated_by: user.into(),
            created_at,
            updated_at: created_at,
        }
    }

    #[tokio::test]
    async fn removes_only_old_titles_without_subtype() {
        let (store, user) = store_with_user().await;

        let healthy = store.insert_title(&title(MediaType::Film, &user, 100)).await.unwrap();
        store.insert_subtype(&healthy.id, &Subtype::defaults(MediaType::Film)).await.unwrap();
        let orphan = store.insert_title(&title(MediaType::Song, &user, 100)).await.unwrap();
        let fresh = store.insert_title(&title(MediaType::Book, &user, 990)).await.unwrap();

        let removed = sweep_orphans(&store, 1_000, 60).await.unwrap();

        assert_eq!(removed, 1);
        assert!(store.find_title_by_short_id(healthy.short_id).await.unwrap().is_some());
        assert!(store.find_title_by_short_id(orphan.short_id).await.unwrap().is_none());
        assert!(store.find_title_by_short_id(fresh.short_id).await.unwrap().is_some());
    }
}
