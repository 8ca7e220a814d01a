use crate::cache::{MokaCacheWrapper, ObjectCache};
use crate::config::{AppConfig, Argon2Config};
use crate::errors::{PortalError, Result};
use crate::models::profiles::requests::CreateProfileRequest;
use crate::models::users::entities::{User, UserRole, UserStatus};
use crate::models::users::requests::CreateUserRequest;
use crate::services::MediaStore;
use crate::storage::Storage;
use crate::utils::password::hash_password_with;
use std::sync::Arc;
use tracing::{debug, info, warn};

pub const ADMIN_USERNAME: &str = "admin";

pub struct StartupContext {
    pub storage: Arc<dyn Storage>,
    pub cache: Arc<dyn ObjectCache>,
    pub media: MediaStore,
}

/// 生成随机密码
fn generate_random_password(length: usize) -> String {
    use rand::Rng;
    const CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789!@#$%";
    let mut rng = rand::rng();
    (0..length)
        .map(|_| {
            let idx = rng.random_range(0..CHARSET.len());
            CHARSET[idx] as char
        })
        .collect()
}

/// 数据库为空时创建超级管理员
///
/// 返回新建的账号；已有账号时返回 None。
pub async fn seed_admin(
    storage: &Arc<dyn Storage>,
    password: &str,
    argon2: &Argon2Config,
) -> Result<Option<User>> {
    let count = storage.count_users().await?;
    if count > 0 {
        debug!(
            "Database already has {} account(s), skipping admin seed",
            count
        );
        return Ok(None);
    }

    info!("No accounts found in database, creating default admin account...");

    let admin_request = CreateUserRequest {
        username: ADMIN_USERNAME.to_string(),
        email: "admin@localhost".to_string(),
        password: hash_password_with(password, argon2)?,
        first_name: "Admin".to_string(),
        last_name: "Portal".to_string(),
        role: UserRole::Admin,
        status: UserStatus::Active,
        profile: CreateProfileRequest {
            parent_first_name: None,
            parent_last_name: None,
            current_class: None,
            credits: 0,
        },
    };

    let user = storage.create_user(admin_request).await?;
    info!(
        "Default admin account created successfully (ID: {}, username: {})",
        user.id, user.username
    );
    Ok(Some(user))
}

// 优先使用环境变量中的密码，否则生成随机密码并打印
fn admin_password() -> String {
    std::env::var("ADMIN_PASSWORD").unwrap_or_else(|_| {
        let pwd = generate_random_password(16);
        warn!("==========================================================");
        warn!("  ADMIN PASSWORD NOT SET - USING GENERATED PASSWORD");
        warn!("  Generated admin password: {}", pwd);
        warn!("  Please save this password or set ADMIN_PASSWORD env var");
        warn!("==========================================================");
        pwd
    })
}

/// 准备服务器启动的上下文
/// 包括存储、缓存与媒体目录
pub async fn prepare_server_startup() -> Result<StartupContext> {
    let config = AppConfig::get();

    rustls::crypto::ring::default_provider()
        .install_default()
        .map_err(|_| PortalError::database_config("Failed to install rustls crypto provider"))?;

    let storage = crate::storage::create_storage().await?;
    warn!("Storage backend initialized and migrations completed");

    // 初始化默认管理员账号（如果需要）
    if storage.count_users().await? == 0
        && let Err(e) = seed_admin(&storage, &admin_password(), &config.argon2).await
    {
        warn!("Failed to create admin account: {}", e);
    }

    let cache: Arc<dyn ObjectCache> = Arc::new(MokaCacheWrapper::new(&config.cache));
    warn!("Cache backend initialized");

    let media = MediaStore::new(&config.upload.dir);
    media.ensure_dirs()?;
    warn!("Media directory ready at {}", media.root().display());

    Ok(StartupContext {
        storage,
        cache,
        media,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::sea_orm_storage::test_support::memory_storage;
    use crate::utils::password::verify_password;

    fn fast_argon2() -> Argon2Config {
        Argon2Config {
            memory_cost: 1024,
            time_cost: 1,
            parallelism: 1,
        }
    }

    #[tokio::test]
    async fn test_seed_admin_only_on_empty_database() {
        let storage: Arc<dyn Storage> = Arc::new(memory_storage().await);

        let admin = seed_admin(&storage, "s3cret-admin", &fast_argon2())
            .await
            .unwrap()
            .unwrap();
        assert!(admin.is_superuser());
        assert!(admin.is_active());

        let stored = storage
            .get_user_by_username(ADMIN_USERNAME)
            .await
            .unwrap()
            .unwrap();
        assert!(verify_password("s3cret-admin", &stored.password_hash));

        let again = seed_admin(&storage, "other", &fast_argon2()).await.unwrap();
        assert!(again.is_none());
        assert_eq!(storage.count_users().await.unwrap(), 1);
    }

    #[test]
    fn test_generated_password_length() {
        assert_eq!(generate_random_password(16).chars().count(), 16);
    }
}
