use std::collections::HashMap;

use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set,
    sea_query::OnConflict,
};
use tracing::{debug, info};

use crate::{
    auth::now_sec,
    entities::{stalks, users},
    error::StoreError,
    models::{Connection, Profile},
};

/// Which end of an edge a listing is about.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Direction {
    /// Users the subject stalks.
    Stalking,
    /// Users who stalk the subject.
    Stalkers,
}

pub async fn find_profile(
    db: &DatabaseConnection,
    username: &str,
) -> Result<Option<Profile>, StoreError> {
    let user = users::Entity::find().filter(users::Column::Username.eq(username)).one(db).await?;
    Ok(user.map(Profile::from))
}

pub async fn is_stalking(
    db: &DatabaseConnection,
    stalker_id: &str,
    stalked_id: &str,
) -> Result<bool, StoreError> {
    let count = stalks::Entity::find()
        .filter(stalks::Column::StalkerId.eq(stalker_id))
        .filter(stalks::Column::StalkedId.eq(stalked_id))
        .count(db)
        .await?;
    Ok(count > 0)
}

/// Adds the edge `stalker -> stalked`. Existing edges are left untouched.
pub async fn stalk(
    db: &DatabaseConnection,
    stalker_id: &str,
    stalked_id: &str,
) -> Result<(), StoreError> {
    if stalker_id == stalked_id {
        return Err(StoreError::Rejected("You cannot stalk yourself.".into()));
    }

    let edge = stalks::ActiveModel {
        id: Default::default(),
        stalker_id: Set(stalker_id.to_string()),
        stalked_id: Set(stalked_id.to_string()),
        created_at: Set(now_sec()),
    };

    let inserted = stalks::Entity::insert(edge)
        .on_conflict(
            OnConflict::columns([stalks::Column::StalkerId, stalks::Column::StalkedId])
                .do_nothing()
                .to_owned(),
        )
        .exec_without_returning(db)
        .await?;

    if inserted > 0 {
        info!(stalker = %stalker_id, stalked = %stalked_id, "stalk added");
    } else {
        debug!(stalker = %stalker_id, stalked = %stalked_id, "already stalking");
    }
    Ok(())
}

pub async fn unstalk(
    db: &DatabaseConnection,
    stalker_id: &str,
    stalked_id: &str,
) -> Result<(), StoreError> {
    let res = stalks::Entity::delete_many()
        .filter(stalks::Column::StalkerId.eq(stalker_id))
        .filter(stalks::Column::StalkedId.eq(stalked_id))
        .exec(db)
        .await?;
    debug!(
        stalker = %stalker_id,
        stalked = %stalked_id,
        removed = res.rows_affected,
        "stalk removed"
    );
    Ok(())
}

/// The other end of every edge touching `user_id` in `direction`, oldest
/// edge first.
pub async fn connections(
    db: &DatabaseConnection,
    user_id: &str,
    direction: Direction,
) -> Result<Vec<Connection>, StoreError> {
    let mine = match direction {
        Direction::Stalking => stalks::Column::StalkerId,
        Direction::Stalkers => stalks::Column::StalkedId,
    };

    let edges = stalks::Entity::find()
        .filter(mine.eq(user_id))
        .order_by_asc(stalks::Column::CreatedAt)
        .all(db)
        .await?;
    if edges.is_empty() {
        return Ok(Vec::new());
    }

    let other_id = |edge: &stalks::Model| match direction {
        Direction::Stalking => edge.stalked_id.clone(),
        Direction::Stalkers => edge.stalker_id.clone(),
    };

    let ids: Vec<String> = edges.iter().map(other_id).collect();
    let mut profiles: HashMap<String, Profile> = users::Entity::find()
        .filter(users::Column::Id.is_in(ids))
        .all(db)
        .await?
        .into_iter()
        .map(|u| (u.id.clone(), Profile::from(u)))
        .collect();

    Ok(edges
        .iter()
        .filter_map(|edge| {
            profiles
                .remove(&other_id(edge))
                .map(|profile| Connection { profile, since: edge.created_at })
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{memory_db, user};

    #[tokio::test]
    async fn stalk_is_directed_and_idempotent() {
        let db = memory_db().await;
        let eren = user(&db, "eren").await;
        let levi = user(&db, "levi").await;

        stalk(&db, &eren.id, &levi.id).await.unwrap();
        stalk(&db, &eren.id, &levi.id).await.unwrap();

        assert!(is_stalking(&db, &eren.id, &levi.id).await.unwrap());
        assert!(!is_stalking(&db, &levi.id, &eren.id).await.unwrap());

        let stalking = connections(&db, &eren.id, Direction::Stalking).await.unwrap();
        assert_eq!(stalking.len(), 1);
        assert_eq!(stalking[0].profile.username, "levi");

        let stalkers = connections(&db, &levi.id, Direction::Stalkers).await.unwrap();
        assert_eq!(stalkers.len(), 1);
        assert_eq!(stalkers[0].profile.username, "eren");
    }

    #[tokio::test]
    async fn cannot_stalk_self() {
        let db = memory_db().await;
        let eren = user(&db, "eren").await;
        assert!(stalk(&db, &eren.id, &eren.id).await.is_err());
        assert!(connections(&db, &eren.id, Direction::Stalking).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn unstalk_removes_only_that_edge() {
        let db = memory_db().await;
        let eren = user(&db, "eren").await;
        let levi = user(&db, "levi").await;
        let hange = user(&db, "hange").await;

        stalk(&db, &eren.id, &levi.id).await.unwrap();
        stalk(&db, &hange.id, &levi.id).await.unwrap();
        unstalk(&db, &eren.id, &levi.id).await.unwrap();

        let stalkers = connections(&db, &levi.id, Direction::Stalkers).await.unwrap();
        let names: Vec<_> = stalkers.iter().map(|c| c.profile.username.as_str()).collect();
        assert_eq!(names, ["hange"]);
    }

    #[tokio::test]
    async fn find_profile_by_username() {
        let db = memory_db().await;
        user(&db, "armin").await;
        assert_eq!(find_profile(&db, "armin").await.unwrap().unwrap().username, "armin");
        assert!(find_profile(&db, "annie").await.unwrap().is_none());
    }
}
