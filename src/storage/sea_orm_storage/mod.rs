//! SeaORM 存储实现
//!
//! 统一的数据库存储层，支持 SQLite、PostgreSQL 和 MySQL。

mod contact;
mod exercises;
mod profiles;
mod users;

use crate::config::AppConfig;
use crate::errors::{PortalError, Result};
use migration::{Migrator, MigratorTrait};
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use std::time::Duration;
use tracing::info;

/// SeaORM 存储实现
#[derive(Clone)]
pub struct SeaOrmStorage {
    pub(crate) db: DatabaseConnection,
}

impl SeaOrmStorage {
    /// 按全局配置创建存储实例
    pub async fn new_async() -> Result<Self> {
        let config = AppConfig::get();
        Self::connect(
            &config.database.url,
            config.database.pool_size,
            config.database.timeout,
        )
        .await
    }

    /// 连接数据库并运行迁移
    pub async fn connect(url: &str, pool_size: u32, timeout: u64) -> Result<Self> {
        let db_url = Self::build_database_url(url)?;

        // 根据数据库类型选择连接方式
        let db = if db_url.starts_with("sqlite:") {
            Self::connect_sqlite(&db_url, pool_size, timeout).await?
        } else {
            Self::connect_generic(&db_url, pool_size, timeout).await?
        };

        // 运行迁移
        Migrator::up(&db, None)
            .await
            .map_err(|e| PortalError::database_operation(format!("数据库迁移失败: {e}")))?;

        info!("SeaORM 存储初始化完成，数据库: {}", db_url);

        Ok(Self { db })
    }

    /// SQLite 专用连接（WAL + pragma 优化）
    async fn connect_sqlite(url: &str, pool_size: u32, timeout: u64) -> Result<DatabaseConnection> {
        use sea_orm::SqlxSqliteConnector;
        use sea_orm::sqlx::sqlite::{
            SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous,
        };
        use std::str::FromStr;

        let mut opt = SqliteConnectOptions::from_str(url)
            .map_err(|e| PortalError::database_config(format!("SQLite URL 解析失败: {e}")))?
            .create_if_missing(true)
            .foreign_keys(true)
            .busy_timeout(Duration::from_secs(5));

        // 内存库不支持 WAL
        if !url.contains(":memory:") {
            opt = opt
                .journal_mode(SqliteJournalMode::Wal)
                .synchronous(SqliteSynchronous::Normal)
                .pragma("cache_size", "-64000")
                .pragma("temp_store", "memory")
                .pragma("wal_autocheckpoint", "1000");
        }

        let pool = SqlitePoolOptions::new()
            .max_connections(pool_size)
            .min_connections(1)
            .test_before_acquire(true)
            .acquire_timeout(Duration::from_secs(timeout))
            .idle_timeout(Duration::from_secs(300))
            .connect_with(opt)
            .await
            .map_err(|e| PortalError::database_connection(format!("SQLite 连接失败: {e}")))?;

        Ok(SqlxSqliteConnector::from_sqlx_sqlite_pool(pool))
    }

    /// 通用连接（PostgreSQL、MySQL 等）
    async fn connect_generic(
        url: &str,
        pool_size: u32,
        timeout: u64,
    ) -> Result<DatabaseConnection> {
        let mut opt = ConnectOptions::new(url);
        opt.max_connections(pool_size)
            .min_connections(1)
            .connect_timeout(Duration::from_secs(timeout))
            .acquire_timeout(Duration::from_secs(timeout))
            .idle_timeout(Duration::from_secs(600))
            .max_lifetime(Duration::from_secs(1800))
            .sqlx_logging(false)
            .sqlx_logging_level(tracing::log::LevelFilter::Debug);

        Database::connect(opt)
            .await
            .map_err(|e| PortalError::database_connection(format!("无法连接到数据库: {e}")))
    }

    /// 从 URL 自动推断数据库类型并构建连接 URL
    fn build_database_url(url: &str) -> Result<String> {
        if url.starts_with("sqlite:") {
            Ok(url.to_string())
        } else if url.ends_with(".db") || url.ends_with(".sqlite") {
            Ok(format!("sqlite://{url}?mode=rwc"))
        } else if url == ":memory:" {
            Ok("sqlite::memory:".to_string())
        } else if url.starts_with("postgres://")
            || url.starts_with("postgresql://")
            || url.starts_with("mysql://")
            || url.starts_with("mariadb://")
        {
            Ok(url.to_string())
        } else {
            Err(PortalError::database_config(format!(
                "无法从 URL 推断数据库类型: {url}. 支持: sqlite://, postgres://, mysql://, 或 .db/.sqlite 文件路径"
            )))
        }
    }
}

// Storage trait 实现
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
use crate::storage::Storage;
use async_trait::async_trait;

#[async_trait]
impl Storage for SeaOrmStorage {
    // 账号模块
    async fn create_user(&self, user: CreateUserRequest) -> Result<User> {
        self.create_user_impl(user).await
    }

    async fn get_user_by_id(&self, id: i64) -> Result<Option<User>> {
        self.get_user_by_id_impl(id).await
    }

    async fn get_user_by_username(&self, username: &str) -> Result<Option<User>> {
        self.get_user_by_username_impl(username).await
    }

    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>> {
        self.get_user_by_email_impl(email).await
    }

    async fn get_user_by_username_or_email(&self, identifier: &str) -> Result<Option<User>> {
        self.get_user_by_username_or_email_impl(identifier).await
    }

    async fn list_users_with_pagination(&self, query: UserListQuery) -> Result<UserListResponse> {
        self.list_users_with_pagination_impl(query).await
    }

    async fn toggle_user_active(&self, id: i64) -> Result<Option<User>> {
        self.toggle_user_active_impl(id).await
    }

    async fn update_last_login(&self, id: i64) -> Result<bool> {
        self.update_last_login_impl(id).await
    }

    async fn count_users(&self) -> Result<u64> {
        self.count_users_impl().await
    }

    // 资料模块
    async fn get_profile_by_user_id(&self, user_id: i64) -> Result<Option<Profile>> {
        self.get_profile_by_user_id_impl(user_id).await
    }

    async fn update_personal_info(
        &self,
        user_id: i64,
        update: UpdatePersonalInfoRequest,
    ) -> Result<Option<UserWithProfile>> {
        self.update_personal_info_impl(user_id, update).await
    }

    async fn adjust_credits(&self, user_id: i64, delta: i32) -> Result<Option<Profile>> {
        self.adjust_credits_impl(user_id, delta).await
    }

    // 练习模块
    async fn create_exercise_with_debit(&self, exercise: NewExercise) -> Result<Exercise> {
        self.create_exercise_with_debit_impl(exercise).await
    }

    async fn get_exercise_by_id(&self, id: i64) -> Result<Option<Exercise>> {
        self.get_exercise_by_id_impl(id).await
    }

    async fn list_user_exercises(&self, user_id: i64) -> Result<Vec<Exercise>> {
        self.list_user_exercises_impl(user_id).await
    }

    async fn list_exercises_with_pagination(
        &self,
        query: ExerciseListQuery,
    ) -> Result<ExerciseListResponse> {
        self.list_exercises_with_pagination_impl(query).await
    }

    async fn update_exercise_photos(
        &self,
        id: i64,
        update: PhotoUpdate,
    ) -> Result<Option<Exercise>> {
        self.update_exercise_photos_impl(id, update).await
    }

    async fn update_correction(
        &self,
        id: i64,
        update: CorrectionUpdate,
    ) -> Result<Option<Exercise>> {
        self.update_correction_impl(id, update).await
    }

    async fn delete_exercise(&self, id: i64) -> Result<bool> {
        self.delete_exercise_impl(id).await
    }

    // 联系留言模块
    async fn create_contact_message(
        &self,
        user_id: Option<i64>,
        message: ContactRequest,
    ) -> Result<ContactMessage> {
        self.create_contact_message_impl(user_id, message).await
    }

    async fn list_contact_messages(
        &self,
        query: PaginationQuery,
    ) -> Result<PaginatedResponse<ContactMessage>> {
        self.list_contact_messages_impl(query).await
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::SeaOrmStorage;
    use crate::models::profiles::entities::ClassLevel;
    use crate::models::profiles::requests::CreateProfileRequest;
    use crate::models::users::entities::{User, UserRole, UserStatus};
    use crate::models::users::requests::CreateUserRequest;

    /// 内存数据库，单连接保证所有查询共享同一个库
    pub async fn memory_storage() -> SeaOrmStorage {
        SeaOrmStorage::connect("sqlite::memory:", 1, 5)
            .await
            .expect("in-memory storage")
    }

    pub fn student_request(username: &str, credits: i32) -> CreateUserRequest {
        CreateUserRequest {
            username: username.to_string(),
            email: format!("{username}@example.com"),
            password: "hashed".to_string(),
            first_name: "Camille".to_string(),
            last_name: "Durand".to_string(),
            role: UserRole::Student,
            status: UserStatus::Inactive,
            profile: CreateProfileRequest {
                parent_first_name: Some("Claire".to_string()),
                parent_last_name: Some("Durand".to_string()),
                current_class: Some(ClassLevel::Troisieme),
                credits,
            },
        }
    }

    pub async fn create_student(storage: &SeaOrmStorage, username: &str, credits: i32) -> User {
        storage
            .create_user_impl(student_request(username, credits))
            .await
            .expect("create student")
    }
}
