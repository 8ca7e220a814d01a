//! 学生资料实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "profiles")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    #[sea_orm(unique)]
    pub user_id: i64,
    pub parent_first_name: Option<String>,
    pub parent_last_name: Option<String>,
    pub current_class: Option<String>,
    pub credits: i32,
    pub updated_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::UserId",
        to = "super::users::Column::Id"
    )]
    User,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_profile(self) -> crate::models::profiles::entities::Profile {
        use crate::models::profiles::entities::{ClassLevel, Profile};
        use chrono::{DateTime, Utc};

        Profile {
            id: self.id,
            user_id: self.user_id,
            parent_first_name: self.parent_first_name,
            parent_last_name: self.parent_last_name,
            current_class: self
                .current_class
                .and_then(|c| c.parse::<ClassLevel>().ok()),
            credits: self.credits,
            updated_at: DateTime::<Utc>::from_timestamp(self.updated_at, 0).unwrap_or_default(),
        }
    }
}
