use super::SeaOrmStorage;
use crate::entity::profiles::{ActiveModel as ProfileActiveModel, Entity as Profiles};
use crate::entity::users::{ActiveModel, Column, Entity as Users};
use crate::errors::{PortalError, Result};
use crate::models::{
    PaginationInfo,
    users::{
        entities::{User, UserStatus},
        requests::{CreateUserRequest, UserListQuery},
        responses::{UserListResponse, UserWithProfile},
    },
};
use crate::utils::escape_like_pattern;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    Set, TransactionTrait,
};

impl SeaOrmStorage {
    /// 创建账号及其资料（同一事务）
    pub async fn create_user_impl(&self, req: CreateUserRequest) -> Result<User> {
        let now = chrono::Utc::now().timestamp();

        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| PortalError::database_operation(format!("开启事务失败: {e}")))?;

        let model = ActiveModel {
            username: Set(req.username),
            email: Set(req.email),
            password_hash: Set(req.password),
            first_name: Set(req.first_name),
            last_name: Set(req.last_name),
            role: Set(req.role.to_string()),
            status: Set(req.status.to_string()),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let user = model
            .insert(&txn)
            .await
            .map_err(|e| PortalError::database_operation(format!("创建账号失败: {e}")))?;

        let profile = ProfileActiveModel {
            user_id: Set(user.id),
            parent_first_name: Set(req.profile.parent_first_name),
            parent_last_name: Set(req.profile.parent_last_name),
            current_class: Set(req.profile.current_class.map(|c| c.to_string())),
            credits: Set(req.profile.credits.max(0)),
            updated_at: Set(now),
            ..Default::default()
        };

        profile
            .insert(&txn)
            .await
            .map_err(|e| PortalError::database_operation(format!("创建资料失败: {e}")))?;

        txn.commit()
            .await
            .map_err(|e| PortalError::database_operation(format!("提交事务失败: {e}")))?;

        Ok(user.into_user())
    }

    /// 通过 ID 获取账号
    pub async fn get_user_by_id_impl(&self, id: i64) -> Result<Option<User>> {
        let result = Users::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| PortalError::database_operation(format!("查询账号失败: {e}")))?;

        Ok(result.map(|m| m.into_user()))
    }

    /// 通过用户名获取账号
    pub async fn get_user_by_username_impl(&self, username: &str) -> Result<Option<User>> {
        let result = Users::find()
            .filter(Column::Username.eq(username))
            .one(&self.db)
            .await
            .map_err(|e| PortalError::database_operation(format!("查询账号失败: {e}")))?;

        Ok(result.map(|m| m.into_user()))
    }

    /// 通过邮箱获取账号
    pub async fn get_user_by_email_impl(&self, email: &str) -> Result<Option<User>> {
        let result = Users::find()
            .filter(Column::Email.eq(email))
            .one(&self.db)
            .await
            .map_err(|e| PortalError::database_operation(format!("查询账号失败: {e}")))?;

        Ok(result.map(|m| m.into_user()))
    }

    /// 通过用户名或邮箱获取账号
    pub async fn get_user_by_username_or_email_impl(
        &self,
        identifier: &str,
    ) -> Result<Option<User>> {
        let result = Users::find()
            .filter(
                Condition::any()
                    .add(Column::Username.eq(identifier))
                    .add(Column::Email.eq(identifier)),
            )
            .one(&self.db)
            .await
            .map_err(|e| PortalError::database_operation(format!("查询账号失败: {e}")))?;

        Ok(result.map(|m| m.into_user()))
    }

    /// 分页列出账号及资料
    pub async fn list_users_with_pagination_impl(
        &self,
        query: UserListQuery,
    ) -> Result<UserListResponse> {
        let page = query.page.max(1) as u64;
        let size = query.size.clamp(1, 100) as u64;

        let mut select = Users::find();

        // 搜索条件
        if let Some(ref search) = query.search
            && !search.trim().is_empty()
        {
            let escaped = escape_like_pattern(search.trim());
            select = select.filter(
                Condition::any()
                    .add(Column::Username.contains(&escaped))
                    .add(Column::Email.contains(&escaped))
                    .add(Column::FirstName.contains(&escaped))
                    .add(Column::LastName.contains(&escaped)),
            );
        }

        // 角色筛选
        if let Some(ref role) = query.role {
            select = select.filter(Column::Role.eq(role.to_string()));
        }

        // 状态筛选
        if let Some(ref status) = query.status {
            select = select.filter(Column::Status.eq(status.to_string()));
        }

        // 排序
        select = select.order_by_desc(Column::CreatedAt).order_by_desc(Column::Id);

        let paginator = select.find_also_related(Profiles).paginate(&self.db, size);
        let total = paginator
            .num_items()
            .await
            .map_err(|e| PortalError::database_operation(format!("查询账号总数失败: {e}")))?;

        let pages = paginator
            .num_pages()
            .await
            .map_err(|e| PortalError::database_operation(format!("查询账号页数失败: {e}")))?;

        let rows = paginator
            .fetch_page(page - 1)
            .await
            .map_err(|e| PortalError::database_operation(format!("查询账号列表失败: {e}")))?;

        Ok(UserListResponse {
            items: rows
                .into_iter()
                .map(|(user, profile)| UserWithProfile {
                    user: user.into_user(),
                    profile: profile.map(|p| p.into_profile()),
                })
                .collect(),
            pagination: PaginationInfo {
                page: page as i64,
                page_size: size as i64,
                total: total as i64,
                total_pages: pages as i64,
            },
        })
    }

    /// 更新最后登录时间
    pub async fn update_last_login_impl(&self, id: i64) -> Result<bool> {
        let now = chrono::Utc::now().timestamp();

        let result = Users::update_many()
            .col_expr(Column::LastLogin, sea_orm::sea_query::Expr::value(now))
            .filter(Column::Id.eq(id))
            .exec(&self.db)
            .await
            .map_err(|e| PortalError::database_operation(format!("更新最后登录时间失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }

    /// 切换激活状态
    pub async fn toggle_user_active_impl(&self, id: i64) -> Result<Option<User>> {
        let Some(user) = Users::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| PortalError::database_operation(format!("查询账号失败: {e}")))?
        else {
            return Ok(None);
        };

        let current: UserStatus = user.status.parse().unwrap_or(UserStatus::Inactive);
        let mut model: ActiveModel = user.into();
        model.status = Set(current.toggled().to_string());
        model.updated_at = Set(chrono::Utc::now().timestamp());

        let updated = model
            .update(&self.db)
            .await
            .map_err(|e| PortalError::database_operation(format!("更新账号状态失败: {e}")))?;

        Ok(Some(updated.into_user()))
    }

    /// 统计账号数量
    pub async fn count_users_impl(&self) -> Result<u64> {
        let count = Users::find()
            .count(&self.db)
            .await
            .map_err(|e| PortalError::database_operation(format!("统计账号数量失败: {e}")))?;

        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::{create_student, memory_storage};
    use crate::models::users::entities::{UserRole, UserStatus};
    use crate::models::users::requests::UserListQuery;

    #[tokio::test]
    async fn test_new_account_is_inactive_with_profile() {
        let storage = memory_storage().await;
        let user = create_student(&storage, "lea", 1).await;

        assert_eq!(user.status, UserStatus::Inactive);
        assert_eq!(user.role, UserRole::Student);
        let profile = storage
            .get_profile_by_user_id_impl(user.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(profile.credits, 1);
    }

    #[tokio::test]
    async fn test_lookup_by_username_or_email() {
        let storage = memory_storage().await;
        let user = create_student(&storage, "hugo", 1).await;

        let by_name = storage
            .get_user_by_username_or_email_impl("hugo")
            .await
            .unwrap();
        let by_email = storage
            .get_user_by_username_or_email_impl("hugo@example.com")
            .await
            .unwrap();
        assert_eq!(by_name.map(|u| u.id), Some(user.id));
        assert_eq!(by_email.map(|u| u.id), Some(user.id));
        assert!(
            storage
                .get_user_by_username_or_email_impl("nobody")
                .await
                .unwrap()
                .is_none()
        );
    }

    #[tokio::test]
    async fn test_toggle_active_flips_status() {
        let storage = memory_storage().await;
        let user = create_student(&storage, "ines", 1).await;

        let toggled = storage.toggle_user_active_impl(user.id).await.unwrap();
        assert_eq!(toggled.map(|u| u.status), Some(UserStatus::Active));

        let toggled = storage.toggle_user_active_impl(user.id).await.unwrap();
        assert_eq!(toggled.map(|u| u.status), Some(UserStatus::Inactive));

        assert!(storage.toggle_user_active_impl(9999).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_list_users_with_search() {
        let storage = memory_storage().await;
        create_student(&storage, "nathan", 1).await;
        create_student(&storage, "zoe", 1).await;

        let result = storage
            .list_users_with_pagination_impl(UserListQuery {
                page: 1,
                size: 10,
                role: None,
                status: None,
                search: Some("zo".to_string()),
            })
            .await
            .unwrap();

        assert_eq!(result.pagination.total, 1);
        assert_eq!(result.items[0].user.username, "zoe");
        assert_eq!(result.items[0].profile.as_ref().map(|p| p.credits), Some(1));
        assert_eq!(storage.count_users_impl().await.unwrap(), 2);
    }
}
