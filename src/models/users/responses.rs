use super::entities::User;
use crate::models::common::PaginationInfo;
use crate::models::profiles::entities::Profile;
use serde::Serialize;

// 账号及其资料
#[derive(Debug, Clone, Serialize)]
pub struct UserWithProfile {
    pub user: User,
    pub profile: Option<Profile>,
}

// 账号列表响应
#[derive(Debug, Serialize)]
pub struct UserListResponse {
    pub items: Vec<UserWithProfile>,
    pub pagination: PaginationInfo,
}
