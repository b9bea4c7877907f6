use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "titles")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub short_id: i32,
    #[sea_orm(unique)]
    pub id: String,
    pub media_type: String,
    pub native_title: String,
    pub known_as: String,
    pub synopsis: Option<String>,
    pub status: String,
    pub cover_image_url: Option<String>,
    pub release_date: Option<String>,
    pub end_date: Option<String>,
    pub created_by: String,
    pub updated_by: String,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
