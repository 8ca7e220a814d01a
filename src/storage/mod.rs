use std::sync::Arc;

use crate::models::{
    PaginationQuery,
    common::pagination::PaginatedResponse,
    contact::{entities::ContactMessage, requests::ContactRequest},
    exercises::{
        entities::Exercise,
        requests::{CorrectionUpdate, ExerciseListQuery, NewExercise, PhotoUpdate},
        responses::ExerciseListResponse,
    },
    profiles::{entities::Profile, requests::UpdatePersonalInfoRequest},
    users::{
        entities::User,
        requests::{CreateUserRequest, UserListQuery},
        responses::{UserListResponse, UserWithProfile},
    },
};

use crate::errors::Result;

pub mod sea_orm_storage;

#[async_trait::async_trait]
pub trait Storage: Send + Sync {
    /// 账号管理方法
    // 创建账号（同时创建资料）
    async fn create_user(&self, user: CreateUserRequest) -> Result<User>;
    // 通过ID获取账号
    async fn get_user_by_id(&self, id: i64) -> Result<Option<User>>;
    // 通过用户名获取账号
    async fn get_user_by_username(&self, username: &str) -> Result<Option<User>>;
    // 通过邮箱获取账号
    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>>;
    // 通过用户名或邮箱获取账号
    async fn get_user_by_username_or_email(&self, identifier: &str) -> Result<Option<User>>;
    // 列出账号及资料
    async fn list_users_with_pagination(&self, query: UserListQuery) -> Result<UserListResponse>;
    // 切换账号激活状态
    async fn toggle_user_active(&self, id: i64) -> Result<Option<User>>;
    // 更新最后登录时间
    async fn update_last_login(&self, id: i64) -> Result<bool>;
    // 统计账号数量
    async fn count_users(&self) -> Result<u64>;

    /// 资料管理方法
    async fn get_profile_by_user_id(&self, user_id: i64) -> Result<Option<Profile>>;
    // 更新个人信息（账号字段与资料字段一起提交）
    async fn update_personal_info(
        &self,
        user_id: i64,
        update: UpdatePersonalInfoRequest,
    ) -> Result<Option<UserWithProfile>>;
    // 调整积分，结果不低于 0
    async fn adjust_credits(&self, user_id: i64, delta: i32) -> Result<Option<Profile>>;

    /// 练习管理方法
    // 扣除一次积分并创建练习，积分不足时返回 InsufficientCredits
    async fn create_exercise_with_debit(&self, exercise: NewExercise) -> Result<Exercise>;
    async fn get_exercise_by_id(&self, id: i64) -> Result<Option<Exercise>>;
    // 某账号的全部练习，按提交时间倒序
    async fn list_user_exercises(&self, user_id: i64) -> Result<Vec<Exercise>>;
    async fn list_exercises_with_pagination(
        &self,
        query: ExerciseListQuery,
    ) -> Result<ExerciseListResponse>;
    async fn update_exercise_photos(
        &self,
        id: i64,
        update: PhotoUpdate,
    ) -> Result<Option<Exercise>>;
    async fn update_correction(
        &self,
        id: i64,
        update: CorrectionUpdate,
    ) -> Result<Option<Exercise>>;
    async fn delete_exercise(&self, id: i64) -> Result<bool>;

    /// 联系留言方法
    async fn create_contact_message(
        &self,
        user_id: Option<i64>,
        message: ContactRequest,
    ) -> Result<ContactMessage>;
    async fn list_contact_messages(
        &self,
        query: PaginationQuery,
    ) -> Result<PaginatedResponse<ContactMessage>>;
}

pub async fn create_storage() -> Result<Arc<dyn Storage>> {
    let storage = sea_orm_storage::SeaOrmStorage::new_async().await?;
    Ok(Arc::new(storage))
}
