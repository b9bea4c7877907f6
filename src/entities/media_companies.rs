use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "media_companies")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub title_id: String,
    pub company_id: i32,
    /// Free text such as "Production" or "Distribution".
    pub role: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
