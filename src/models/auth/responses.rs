use crate::models::profiles::entities::Profile;
use crate::models::users::entities::User;
use serde::Serialize;

// 登录响应
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub access_token: String,
    pub expires_in: i64,
    pub user: User,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, Serialize)]
pub struct RefreshTokenResponse {
    pub access_token: String,
    pub expires_in: i64,
}

// 注册成功响应，账号待激活
#[derive(Debug, Serialize)]
pub struct RegisterResponse {
    pub user: User,
    pub pending_activation: bool,
}

#[derive(Debug, Serialize)]
pub struct UserInfoResponse {
    pub user: User,
    pub profile: Option<Profile>,
}
