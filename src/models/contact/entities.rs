use serde::{Deserialize, Serialize};

/// 联系留言
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContactMessage {
    pub id: i64,
    // 已登录时记录留言账号
    pub user_id: Option<i64>,
    pub name: String,
    pub email: String,
    pub subject: String,
    pub message: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
}
