//! Film metadata stored in the `media_*` link tables: alternate titles,
//! countries, languages, external links, related titles and companies.

use std::collections::HashMap;

use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder};

use crate::{
    entities::{
        companies, countries, languages, media_alt_titles, media_companies, media_countries,
        media_external_links, media_languages, media_related_titles, titles,
    },
    error::StoreError,
    models::{CompanyCredit, ExternalLink, RelatedTitle, TitleExtras},
};

pub async fn load(db: &DatabaseConnection, title_id: &str) -> Result<TitleExtras, StoreError> {
    let (alt_titles, countries, languages, external_links, related, companies) =
        futures::try_join!(
            alt_titles(db, title_id),
            country_names(db, title_id),
            language_names(db, title_id),
            external_links(db, title_id),
            related_titles(db, title_id),
            company_credits(db, title_id),
        )?;

    Ok(TitleExtras { alt_titles, countries, languages, external_links, related, companies })
}

async fn alt_titles(
    db: &DatabaseConnection,
    title_id: &str,
) -> Result<Vec<String>, StoreError> {
    let rows = media_alt_titles::Entity::find()
        .filter(media_alt_titles::Column::TitleId.eq(title_id))
        .order_by_asc(media_alt_titles::Column::Id)
        .all(db)
        .await?;
    Ok(rows.into_iter().map(|r| r.alt_title).collect())
}

async fn country_names(
    db: &DatabaseConnection,
    title_id: &str,
) -> Result<Vec<String>, StoreError> {
    let ids: Vec<i32> = media_countries::Entity::find()
        .filter(media_countries::Column::TitleId.eq(title_id))
        .all(db)
        .await?
        .into_iter()
        .map(|r| r.country_id)
        .collect();
    if ids.is_empty() {
        return Ok(Vec::new());
    }

    let rows = countries::Entity::find()
        .filter(countries::Column::CountryId.is_in(ids))
        .order_by_asc(countries::Column::Name)
        .all(db)
        .await?;
    Ok(rows.into_iter().map(|c| c.name).collect())
}

async fn language_names(
    db: &DatabaseConnection,
    title_id: &str,
) -> Result<Vec<String>, StoreError> {
    let ids: Vec<i32> = media_languages::Entity::find()
        .filter(media_languages::Column::TitleId.eq(title_id))
        .all(db)
        .await?
        .into_iter()
        .map(|r| r.language_id)
        .collect();
    if ids.is_empty() {
        return Ok(Vec::new());
    }

    let rows = languages::Entity::find()
        .filter(languages::Column::LanguageId.is_in(ids))
        .order_by_asc(languages::Column::Name)
        .all(db)
        .await?;
    Ok(rows.into_iter().map(|l| l.name).collect())
}

async fn external_links(
    db: &DatabaseConnection,
    title_id: &str,
) -> Result<Vec<ExternalLink>, StoreError> {
    let rows = media_external_links::Entity::find()
        .filter(media_external_links::Column::TitleId.eq(title_id))
        .order_by_asc(media_external_links::Column::Id)
        .all(db)
        .await?;
    Ok(rows.into_iter().map(|l| ExternalLink { label: l.link_label, url: l.url }).collect())
}

async fn related_titles(
    db: &DatabaseConnection,
    title_id: &str,
) -> Result<Vec<RelatedTitle>, StoreError> {
    let ids: Vec<String> = media_related_titles::Entity::find()
        .filter(media_related_titles::Column::TitleId.eq(title_id))
        .all(db)
        .await?
        .into_iter()
        .map(|r| r.related_title_id)
        .collect();
    if ids.is_empty() {
        return Ok(Vec::new());
    }

    let rows = titles::Entity::find()
        .filter(titles::Column::Id.is_in(ids))
        .order_by_asc(titles::Column::ShortId)
        .all(db)
        .await?;
    Ok(rows
        .into_iter()
        .map(|t| RelatedTitle {
            short_id: t.short_id,
            native_title: t.native_title,
            known_as: t.known_as,
        })
        .collect())
}

async fn company_credits(
    db: &DatabaseConnection,
    title_id: &str,
) -> Result<Vec<CompanyCredit>, StoreError> {
    let credits = media_companies::Entity::find()
        .filter(media_companies::Column::TitleId.eq(title_id))
        .order_by_asc(media_companies::Column::Id)
        .all(db)
        .await?;
    if credits.is_empty() {
        return Ok(Vec::new());
    }

    let ids: Vec<i32> = credits.iter().map(|c| c.company_id).collect();
    let names: HashMap<i32, String> = companies::Entity::find()
        .filter(companies::Column::CompanyId.is_in(ids))
        .all(db)
        .await?
        .into_iter()
        .map(|c| (c.company_id, c.name))
        .collect();

    Ok(credits
        .into_iter()
        .filter_map(|c| {
            let name = names.get(&c.company_id)?.clone();
            Some(CompanyCredit { name, role: c.role })
        })
        .collect())
}
