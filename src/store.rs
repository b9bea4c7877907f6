use sea_orm::{
    ActiveValue::NotSet, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
    QuerySelect, Set,
    sea_query::{Alias, Expr, Query},
};

use crate::{
    entities::{
        albums, books, content_ratings, dramas, films, mangas, shorts, songs, specials,
        stage_plays, titles, tv_segments, tv_shows,
    },
    error::StoreError,
    extras,
    models::{
        AlbumDetails, CreatedTitle, FilmDetails, MediaType, NewTitle, RuntimeDetails,
        StagePlayDetails, Subtype, TitleDetail, TitleExtras, TitleStatus, TitleSummary,
        TvShowDetails,
    },
};

/// Write side of the catalog used by title creation. The generic row and the
/// subtype row are separate calls; nothing here is transactional.
#[async_trait::async_trait]
pub trait CatalogStore: Send + Sync {
    async fn insert_title(&self, title: &NewTitle) -> Result<CreatedTitle, StoreError>;

    async fn insert_subtype(&self, title_id: &str, subtype: &Subtype) -> Result<(), StoreError>;

    async fn delete_title(&self, title_id: &str) -> Result<(), StoreError>;
}

#[derive(Clone)]
pub struct DbStore {
    db: DatabaseConnection,
}

impl DbStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    pub fn db(&self) -> &DatabaseConnection {
        &self.db
    }

    pub async fn find_title_by_short_id(
        &self,
        short_id: i32,
    ) -> Result<Option<TitleDetail>, StoreError> {
        let Some(row) = titles::Entity::find_by_id(short_id).one(&self.db).await? else {
            return Ok(None);
        };

        let media_type = parse_media_type(&row.media_type)?;
        let subtype = self.find_subtype(&row.id, media_type).await?;

        let content_rating = match subtype {
            Some(Subtype::Film(FilmDetails { content_rating_id: Some(rating_id), .. })) => {
                content_ratings::Entity::find_by_id(rating_id)
                    .one(&self.db)
                    .await?
                    .map(|r| r.label)
            },
            _ => None,
        };

        // Only films carry the link-table metadata.
        let extras = if media_type == MediaType::Film {
            extras::load(&self.db, &row.id).await?
        } else {
            TitleExtras::default()
        };

        Ok(Some(TitleDetail {
            id: row.id,
            short_id: row.short_id,
            media_type,
            status: parse_status(&row.status)?,
            native_title: row.native_title,
            known_as: row.known_as,
            synopsis: row.synopsis,
            cover_image_url: row.cover_image_url,
            release_date: row.release_date,
            end_date: row.end_date,
            subtype,
            content_rating,
            extras,
        }))
    }

    /// Newest titles first.
    pub async fn recent_titles(&self, limit: u64) -> Result<Vec<TitleSummary>, StoreError> {
        let rows = titles::Entity::find()
            .order_by_desc(titles::Column::ShortId)
            .limit(limit)
            .all(&self.db)
            .await?;

        let mut out = Vec::with_capacity(rows.len());
        for row in rows {
            let (Ok(media_type), Ok(status)) =
                (parse_media_type(&row.media_type), parse_status(&row.status))
            else {
                tracing::warn!(title_id = %row.id, "skipping title with unknown enum value");
                continue;
            };
            out.push(TitleSummary {
                short_id: row.short_id,
                media_type,
                status,
                native_title: row.native_title,
                known_as: row.known_as,
            });
        }
        Ok(out)
    }

    /// Titles created at or before `cutoff` with no row in their subtype
    /// table. One anti-join per media type.
    pub async fn orphaned_titles(
        &self,
        cutoff: i64,
    ) -> Result<Vec<(String, MediaType)>, StoreError> {
        let mut orphans = Vec::new();

        for media_type in MediaType::ALL {
            let table = Alias::new(media_type.subtype_table());
            let has_subtype = Query::select()
                .expr(Expr::val(1))
                .from(table.clone())
                .and_where(
                    Expr::col((table, Alias::new("title_id")))
                        .equals((titles::Entity, titles::Column::Id)),
                )
                .to_owned();

            let ids: Vec<String> = titles::Entity::find()
                .select_only()
                .column(titles::Column::Id)
                .filter(titles::Column::MediaType.eq(media_type.as_str()))
                .filter(titles::Column::CreatedAt.lte(cutoff))
                .filter(Expr::exists(has_subtype).not())
                .into_tuple()
                .all(&self.db)
                .await?;

            orphans.extend(ids.into_iter().map(|id| (id, media_type)));
        }

        Ok(orphans)
    }

    pub async fn find_subtype(
        &self,
        title_id: &str,
        media_type: MediaType,
    ) -> Result<Option<Subtype>, StoreError> {
        let id = title_id.to_string();
        let subtype = match media_type {
            MediaType::Film => films::Entity::find_by_id(id).one(&self.db).await?.map(|f| {
                Subtype::Film(FilmDetails {
                    total_duration: f.total_duration,
                    content_rating_id: f.content_rating_id,
                })
            }),
            MediaType::TvShow => tv_shows::Entity::find_by_id(id).one(&self.db).await?.map(|s| {
                Subtype::TvShow(TvShowDetails {
                    episode_count: s.episode_count,
                    episode_duration: s.episode_duration,
                })
            }),
            MediaType::Drama => {
                dramas::Entity::find_by_id(id).one(&self.db).await?.map(|_| Subtype::Drama)
            },
            MediaType::Special => {
                specials::Entity::find_by_id(id).one(&self.db).await?.map(|_| Subtype::Special)
            },
            MediaType::Short => {
                shorts::Entity::find_by_id(id).one(&self.db).await?.map(|_| Subtype::Short)
            },
            MediaType::Manga => {
                mangas::Entity::find_by_id(id).one(&self.db).await?.map(|_| Subtype::Manga)
            },
            MediaType::Book => {
                books::Entity::find_by_id(id).one(&self.db).await?.map(|_| Subtype::Book)
            },
            MediaType::Album => albums::Entity::find_by_id(id).one(&self.db).await?.map(|a| {
                Subtype::Album(AlbumDetails {
                    track_count: a.track_count,
                    total_duration: a.total_duration,
                })
            }),
            MediaType::Song => songs::Entity::find_by_id(id)
                .one(&self.db)
                .await?
                .map(|s| Subtype::Song(RuntimeDetails { duration: s.duration })),
            MediaType::TvSegment => tv_segments::Entity::find_by_id(id)
                .one(&self.db)
                .await?
                .map(|s| Subtype::TvSegment(RuntimeDetails { duration: s.duration })),
            MediaType::StagePlay => stage_plays::Entity::find_by_id(id)
                .one(&self.db)
                .await?
                .map(|s| Subtype::StagePlay(StagePlayDetails { total_duration: s.total_duration })),
        };
        Ok(subtype)
    }
}

#[async_trait::async_trait]
impl CatalogStore for DbStore {
    async fn insert_title(&self, title: &NewTitle) -> Result<CreatedTitle, StoreError> {
        let id = uuid::Uuid::new_v4().to_string();
        let model = titles::ActiveModel {
            short_id: NotSet,
            id: Set(id.clone()),
            media_type: Set(title.media_type.as_str().to_string()),
            native_title: Set(title.native_title.clone()),
            known_as: Set(title.known_as.clone()),
            synopsis: Set(title.synopsis.clone()),
            status: Set(title.status.as_str().to_string()),
            cover_image_url: Set(title.cover_image_url.clone()),
            release_date: Set(title.release_date.map(|d| d.to_string())),
            end_date: Set(title.end_date.map(|d| d.to_string())),
            created_by: Set(title.created_by.clone()),
            updated_by: Set(title.updated_by.clone()),
            created_at: Set(title.created_at),
            updated_at: Set(title.updated_at),
        };

        let res = titles::Entity::insert(model).exec(&self.db).await?;
        Ok(CreatedTitle { id, short_id: res.last_insert_id })
    }

    async fn insert_subtype(&self, title_id: &str, subtype: &Subtype) -> Result<(), StoreError> {
        let title_id = Set(title_id.to_string());
        match *subtype {
            Subtype::Film(d) => {
                let model = films::ActiveModel {
                    title_id,
                    total_duration: Set(d.total_duration),
                    content_rating_id: Set(d.content_rating_id),
                };
                films::Entity::insert(model).exec_without_returning(&self.db).await?;
            },
            Subtype::TvShow(d) => {
                let model = tv_shows::ActiveModel {
                    title_id,
                    episode_count: Set(d.episode_count),
                    episode_duration: Set(d.episode_duration),
                };
                tv_shows::Entity::insert(model).exec_without_returning(&self.db).await?;
            },
            Subtype::Drama => {
                dramas::Entity::insert(dramas::ActiveModel { title_id })
                    .exec_without_returning(&self.db)
                    .await?;
            },
            Subtype::Special => {
                specials::Entity::insert(specials::ActiveModel { title_id })
                    .exec_without_returning(&self.db)
                    .await?;
            },
            Subtype::Short => {
                shorts::Entity::insert(shorts::ActiveModel { title_id })
                    .exec_without_returning(&self.db)
                    .await?;
            },
            Subtype::Manga => {
                mangas::Entity::insert(mangas::ActiveModel { title_id })
                    .exec_without_returning(&self.db)
                    .await?;
            },
            Subtype::Book => {
                books::Entity::insert(books::ActiveModel { title_id })
                    .exec_without_returning(&self.db)
                    .await?;
            },
            Subtype::Album(d) => {
                let model = albums::ActiveModel {
                    title_id,
                    track_count: Set(d.track_count),
                    total_duration: Set(d.total_duration),
                };
                albums::Entity::insert(model).exec_without_returning(&self.db).await?;
            },
            Subtype::Song(d) => {
                let model = songs::ActiveModel { title_id, duration: Set(d.duration) };
                songs::Entity::insert(model).exec_without_returning(&self.db).await?;
            },
            Subtype::TvSegment(d) => {
                let model = tv_segments::ActiveModel { title_id, duration: Set(d.duration) };
                tv_segments::Entity::insert(model).exec_without_returning(&self.db).await?;
            },
            Subtype::StagePlay(d) => {
                let model =
                    stage_plays::ActiveModel { title_id, total_duration: Set(d.total_duration) };
                stage_plays::Entity::insert(model).exec_without_returning(&self.db).await?;
            },
        }
        Ok(())
    }

    async fn delete_title(&self, title_id: &str) -> Result<(), StoreError> {
        titles::Entity::delete_many()
            .filter(titles::Column::Id.eq(title_id))
            .exec(&self.db)
            .await?;
        Ok(())
    }
}

fn parse_media_type(value: &str) -> Result<MediaType, StoreError> {
    MediaType::from_db(value)
        .ok_or_else(|| StoreError::Rejected(format!("unknown media type {value}")))
}

fn parse_status(value: &str) -> Result<TitleStatus, StoreError> {
    TitleStatus::from_db(value)
        .ok_or_else(|| StoreError::Rejected(format!("unknown status {value}")))
}
