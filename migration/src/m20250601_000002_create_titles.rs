use sea_orm_migration::{prelude::*, schema::*};

use crate::m20250601_000001_create_users::Users;

const RATINGS: [&str; 5] = ["G", "PG", "PG-13", "R", "NC-17"];

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Titles::Table)
                    .if_not_exists()
                    .col(pk_auto(Titles::ShortId))
                    .col(string_uniq(Titles::Id))
                    .col(string(Titles::MediaType))
                    .col(string(Titles::NativeTitle))
                    .col(string(Titles::KnownAs))
                    .col(text_null(Titles::Synopsis))
                    .col(string(Titles::Status))
                    .col(string_null(Titles::CoverImageUrl))
                    .col(string_null(Titles::ReleaseDate))
                    .col(string_null(Titles::EndDate))
                    .col(string(Titles::CreatedBy))
                    .col(string(Titles::UpdatedBy))
                    .col(big_integer(Titles::CreatedAt))
                    .col(big_integer(Titles::UpdatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_titles_created_by")
                            .from(Titles::Table, Titles::CreatedBy)
                            .to(Users::Table, Users::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_titles_updated_by")
                            .from(Titles::Table, Titles::UpdatedBy)
                            .to(Users::Table, Users::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_titles_created_at")
                    .table(Titles::Table)
                    .col(Titles::CreatedAt)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(ContentRatings::Table)
                    .if_not_exists()
                    .col(pk_auto(ContentRatings::RatingId))
                    .col(string_uniq(ContentRatings::Label))
                    .to_owned(),
            )
            .await?;

        let mut seed = Query::insert();
        seed.into_table(ContentRatings::Table).columns([ContentRatings::Label]);
        for label in RATINGS {
            seed.values_panic([label.into()]);
        }
        manager.exec_stmt(seed).await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(ContentRatings::Table).to_owned()).await?;
        manager.drop_table(Table::drop().table(Titles::Table).to_owned()).await?;
        Ok(())
    }
}

#[derive(DeriveIden)]
pub(crate) enum Titles {
    Table,
    ShortId,
    Id,
    MediaType,
    NativeTitle,
    KnownAs,
    Synopsis,
    Status,
    CoverImageUrl,
    ReleaseDate,
    EndDate,
    CreatedBy,
    UpdatedBy,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
pub(crate) enum ContentRatings {
    Table,
    RatingId,
    Label,
}
