use sea_orm_migration::{prelude::*, schema::*};

use crate::m20250601_000002_create_titles::{ContentRatings, Titles};

/// Subtype tables keyed by `titles.id`, with their integer counters.
const SUBTYPES: [(&str, &[&str]); 11] = [
    ("films", &["total_duration"]),
    ("tv_shows", &["episode_count", "episode_duration"]),
    ("dramas", &[]),
    ("specials", &[]),
    ("shorts", &[]),
    ("mangas", &[]),
    ("books", &[]),
    ("albums", &["track_count", "total_duration"]),
    ("songs", &["duration"]),
    ("tv_segments", &["duration"]),
    ("stage_plays", &["total_duration"]),
];

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        for (name, counters) in SUBTYPES {
            manager.create_table(subtype_table(name, counters)).await?;
        }
        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        for (name, _) in SUBTYPES.iter().rev() {
            manager.drop_table(Table::drop().table(Alias::new(*name)).to_owned()).await?;
        }
        Ok(())
    }
}

fn subtype_table(name: &str, counters: &[&str]) -> TableCreateStatement {
    let mut table = Table::create();
    table
        .table(Alias::new(name))
        .if_not_exists()
        .col(string(Subtype::TitleId).primary_key());

    for counter in counters {
        table.col(integer(Alias::new(*counter)).default(0));
    }

    if name == "films" {
        table.col(integer_null(Subtype::ContentRatingId)).foreign_key(
            ForeignKey::create()
                .name("fk_films_content_rating")
                .from(Alias::new(name), Subtype::ContentRatingId)
                .to(ContentRatings::Table, ContentRatings::RatingId)
                .on_delete(ForeignKeyAction::SetNull),
        );
    }

    table.foreign_key(
        ForeignKey::create()
            .name(format!("fk_{name}_title"))
            .from(Alias::new(name), Subtype::TitleId)
            .to(Titles::Table, Titles::Id)
            .on_delete(ForeignKeyAction::Cascade),
    );

    table
}

#[derive(DeriveIden)]
enum Subtype {
    TitleId,
    ContentRatingId,
}
