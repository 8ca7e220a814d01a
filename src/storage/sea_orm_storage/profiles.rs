use super::SeaOrmStorage;
use crate::entity::profiles::{Column, Entity as Profiles};
use crate::entity::users::{ActiveModel as UserActiveModel, Entity as Users};
use crate::errors::{PortalError, Result};
use crate::models::{
    profiles::{entities::Profile, requests::UpdatePersonalInfoRequest},
    users::responses::UserWithProfile,
};
use sea_orm::sea_query::Expr;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, Set, TransactionTrait};

impl SeaOrmStorage {
    /// 通过账号 ID 获取资料
    pub async fn get_profile_by_user_id_impl(&self, user_id: i64) -> Result<Option<Profile>> {
        let result = Profiles::find()
            .filter(Column::UserId.eq(user_id))
            .one(&self.db)
            .await
            .map_err(|e| PortalError::database_operation(format!("查询资料失败: {e}")))?;

        Ok(result.map(|m| m.into_profile()))
    }

    /// 更新个人信息，账号与资料在同一事务中写入
    pub async fn update_personal_info_impl(
        &self,
        user_id: i64,
        update: UpdatePersonalInfoRequest,
    ) -> Result<Option<UserWithProfile>> {
        let now = chrono::Utc::now().timestamp();

        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| PortalError::database_operation(format!("开启事务失败: {e}")))?;

        let Some(user) = Users::find_by_id(user_id)
            .one(&txn)
            .await
            .map_err(|e| PortalError::database_operation(format!("查询账号失败: {e}")))?
        else {
            return Ok(None);
        };

        let mut user: UserActiveModel = user.into();
        user.username = Set(update.username);
        user.email = Set(update.email);
        user.first_name = Set(update.first_name);
        user.last_name = Set(update.last_name);
        user.updated_at = Set(now);

        let user = user
            .update(&txn)
            .await
            .map_err(|e| PortalError::database_operation(format!("更新账号失败: {e}")))?;

        let profile = Profiles::find()
            .filter(Column::UserId.eq(user_id))
            .one(&txn)
            .await
            .map_err(|e| PortalError::database_operation(format!("查询资料失败: {e}")))?;

        let profile = match profile {
            Some(profile) => {
                let mut profile: crate::entity::profiles::ActiveModel = profile.into();
                profile.parent_first_name = Set(update.parent_first_name);
                profile.parent_last_name = Set(update.parent_last_name);
                profile.current_class = Set(Some(update.current_class.to_string()));
                profile.updated_at = Set(now);
                Some(
                    profile.update(&txn).await.map_err(|e| {
                        PortalError::database_operation(format!("更新资料失败: {e}"))
                    })?,
                )
            }
            None => None,
        };

        txn.commit()
            .await
            .map_err(|e| PortalError::database_operation(format!("提交事务失败: {e}")))?;

        Ok(Some(UserWithProfile {
            user: user.into_user(),
            profile: profile.map(|p| p.into_profile()),
        }))
    }

    /// 调整积分；减少时以 0 为下限
    pub async fn adjust_credits_impl(&self, user_id: i64, delta: i32) -> Result<Option<Profile>> {
        let now = chrono::Utc::now().timestamp();

        let expr = if delta >= 0 {
            Expr::cust(format!("credits + {delta}"))
        } else {
            let amount = delta.unsigned_abs();
            Expr::cust(format!(
                "CASE WHEN credits > {amount} THEN credits - {amount} ELSE 0 END"
            ))
        };

        Profiles::update_many()
            .col_expr(Column::Credits, expr)
            .col_expr(Column::UpdatedAt, Expr::value(now))
            .filter(Column::UserId.eq(user_id))
            .exec(&self.db)
            .await
            .map_err(|e| PortalError::database_operation(format!("更新积分失败: {e}")))?;

        self.get_profile_by_user_id_impl(user_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::{create_student, memory_storage};
    use crate::models::profiles::entities::ClassLevel;
    use crate::models::profiles::requests::UpdatePersonalInfoRequest;

    #[tokio::test]
    async fn test_increment_and_decrement_floor_at_zero() {
        let storage = memory_storage().await;
        let user = create_student(&storage, "emma", 1).await;

        let profile = storage.adjust_credits_impl(user.id, 1).await.unwrap().unwrap();
        assert_eq!(profile.credits, 2);

        for expected in [1, 0, 0, 0] {
            let profile = storage
                .adjust_credits_impl(user.id, -1)
                .await
                .unwrap()
                .unwrap();
            assert_eq!(profile.credits, expected);
        }
    }

    #[tokio::test]
    async fn test_adjust_credits_unknown_user() {
        let storage = memory_storage().await;
        assert!(storage.adjust_credits_impl(404, 1).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_update_personal_info() {
        let storage = memory_storage().await;
        let user = create_student(&storage, "jules", 1).await;

        let updated = storage
            .update_personal_info_impl(
                user.id,
                UpdatePersonalInfoRequest {
                    username: "jules_b".to_string(),
                    email: "jules.b@example.com".to_string(),
                    first_name: "Jules".to_string(),
                    last_name: "Bernard".to_string(),
                    parent_first_name: None,
                    parent_last_name: Some("Bernard".to_string()),
                    current_class: ClassLevel::Terminale,
                },
            )
            .await
            .unwrap()
            .unwrap();

        assert_eq!(updated.user.username, "jules_b");
        let profile = updated.profile.unwrap();
        assert_eq!(profile.current_class, Some(ClassLevel::Terminale));
        assert_eq!(profile.parent_first_name, None);
        // 积分不受个人信息更新影响
        assert_eq!(profile.credits, 1);
    }
}
