use sea_orm_migration::{prelude::*, schema::*};

use crate::m20250601_000002_create_titles::Titles;

/// Creation order; dropped in reverse.
const TABLES: [&str; 9] = [
    "countries",
    "languages",
    "companies",
    "media_alt_titles",
    "media_external_links",
    "media_countries",
    "media_languages",
    "media_related_titles",
    "media_companies",
];

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        for (table, id) in [
            (Lookup::Countries, Lookup::CountryId),
            (Lookup::Languages, Lookup::LanguageId),
            (Lookup::Companies, Lookup::CompanyId),
        ] {
            manager
                .create_table(
                    Table::create()
                        .table(table)
                        .if_not_exists()
                        .col(pk_auto(id))
                        .col(string_uniq(Lookup::Name))
                        .to_owned(),
                )
                .await?;
        }

        manager
            .create_table(
                Table::create()
                    .table(MediaAltTitles::Table)
                    .if_not_exists()
                    .col(pk_auto(MediaAltTitles::Id))
                    .col(string(MediaAltTitles::TitleId))
                    .col(string(MediaAltTitles::AltTitle))
                    .foreign_key(&mut title_fk("fk_media_alt_titles_title", MediaAltTitles::Table))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(MediaExternalLinks::Table)
                    .if_not_exists()
                    .col(pk_auto(MediaExternalLinks::Id))
                    .col(string(MediaExternalLinks::TitleId))
                    .col(string_null(MediaExternalLinks::LinkLabel))
                    .col(string(MediaExternalLinks::Url))
                    .foreign_key(&mut title_fk(
                        "fk_media_external_links_title",
                        MediaExternalLinks::Table,
                    ))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                link_table("media_countries", MediaCountries::Table, MediaCountries::CountryId)
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_media_countries_country")
                            .from(MediaCountries::Table, MediaCountries::CountryId)
                            .to(Lookup::Countries, Lookup::CountryId)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                link_table("media_languages", MediaLanguages::Table, MediaLanguages::LanguageId)
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_media_languages_language")
                            .from(MediaLanguages::Table, MediaLanguages::LanguageId)
                            .to(Lookup::Languages, Lookup::LanguageId)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(MediaRelatedTitles::Table)
                    .if_not_exists()
                    .col(string(MediaRelatedTitles::TitleId))
                    .col(string(MediaRelatedTitles::RelatedTitleId))
                    .primary_key(
                        Index::create()
                            .col(MediaRelatedTitles::TitleId)
                            .col(MediaRelatedTitles::RelatedTitleId),
                    )
                    .foreign_key(&mut title_fk(
                        "fk_media_related_titles_title",
                        MediaRelatedTitles::Table,
                    ))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_media_related_titles_related")
                            .from(MediaRelatedTitles::Table, MediaRelatedTitles::RelatedTitleId)
                            .to(Titles::Table, Titles::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(MediaCompanies::Table)
                    .if_not_exists()
                    .col(pk_auto(MediaCompanies::Id))
                    .col(string(MediaCompanies::TitleId))
                    .col(integer(MediaCompanies::CompanyId))
                    .col(string_null(MediaCompanies::Role))
                    .foreign_key(&mut title_fk("fk_media_companies_title", MediaCompanies::Table))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_media_companies_company")
                            .from(MediaCompanies::Table, MediaCompanies::CompanyId)
                            .to(Lookup::Companies, Lookup::CompanyId)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        for name in TABLES.iter().rev() {
            manager.drop_table(Table::drop().table(Alias::new(*name)).to_owned()).await?;
        }
        Ok(())
    }
}

fn title_fk<T: IntoIden + 'static>(name: &str, table: T) -> ForeignKeyCreateStatement {
    ForeignKey::create()
        .name(name)
        .from(table, Alias::new("title_id"))
        .to(Titles::Table, Titles::Id)
        .on_delete(ForeignKeyAction::Cascade)
        .to_owned()
}

/// `(title_id, <lookup>_id)` join table keyed on both columns.
fn link_table<T, C>(name: &str, table: T, lookup_id: C) -> TableCreateStatement
where
    T: IntoIden + Copy + 'static,
    C: IntoIden + Copy + 'static,
{
    Table::create()
        .table(table)
        .if_not_exists()
        .col(string(Alias::new("title_id")))
        .col(integer(lookup_id))
        .primary_key(Index::create().col(Alias::new("title_id")).col(lookup_id))
        .foreign_key(&mut title_fk(&format!("fk_{name}_title"), table))
        .to_owned()
}

#[derive(DeriveIden, Clone, Copy)]
enum Lookup {
    Countries,
    CountryId,
    Languages,
    LanguageId,
    Companies,
    CompanyId,
    Name,
}

#[derive(DeriveIden, Clone, Copy)]
enum MediaAltTitles {
    Table,
    Id,
    TitleId,
    AltTitle,
}

#[derive(DeriveIden, Clone, Copy)]
enum MediaExternalLinks {
    Table,
    Id,
    TitleId,
    LinkLabel,
    Url,
}

#[derive(DeriveIden, Clone, Copy)]
enum MediaCountries {
    Table,
    CountryId,
}

#[derive(DeriveIden, Clone, Copy)]
enum MediaLanguages {
    Table,
    LanguageId,
}

#[derive(DeriveIden, Clone, Copy)]
enum MediaRelatedTitles {
    Table,
    TitleId,
    RelatedTitleId,
}

#[derive(DeriveIden, Clone, Copy)]
enum MediaCompanies {
    Table,
    Id,
    TitleId,
    CompanyId,
    Role,
}
