//! 练习实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "exercises")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub user_id: i64,
    pub title: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub text: Option<String>,
    pub statement_image: String,
    pub answer_image: Option<String>,
    pub submitted_at: i64,
    pub status: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub correction_text: Option<String>,
    pub correction_image: Option<String>,
    pub correction_audio: Option<String>,
    pub corrected_at: Option<i64>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::UserId",
        to = "super::users::Column::Id"
    )]
    Owner,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Owner.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

// 从数据库模型转换为业务模型
impl Model {
    pub fn into_exercise(self) -> crate::models::exercises::entities::Exercise {
        use crate::models::exercises::entities::{CorrectionStatus, Exercise};
        use chrono::{DateTime, Utc};

        Exercise {
            id: self.id,
            user_id: self.user_id,
            title: self.title,
            text: self.text,
            statement_image: self.statement_image,
            answer_image: self.answer_image,
            submitted_at: DateTime::<Utc>::from_timestamp(self.submitted_at, 0)
                .unwrap_or_default(),
            status: self
                .status
                .parse::<CorrectionStatus>()
                .unwrap_or(CorrectionStatus::Uncorrected),
            correction_text: self.correction_text,
            correction_image: self.correction_image,
            correction_audio: self.correction_audio,
            corrected_at: self
                .corrected_at
                .and_then(|ts| DateTime::<Utc>::from_timestamp(ts, 0)),
        }
    }
}
