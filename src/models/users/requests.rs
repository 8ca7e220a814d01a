use super::entities::{UserRole, UserStatus};
use crate::models::common::PaginationQuery;
use crate::models::profiles::requests::CreateProfileRequest;
use serde::Deserialize;

// 账号查询参数（来自HTTP请求）
#[derive(Debug, Deserialize)]
pub struct UserListParams {
    #[serde(flatten)]
    pub pagination: PaginationQuery,
    pub role: Option<UserRole>,
    pub status: Option<UserStatus>,
    pub search: Option<String>,
}

// 账号创建请求（存储层），password 为已哈希的密码
#[derive(Debug, Clone)]
pub struct CreateUserRequest {
    pub username: String,
    pub email: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
    pub role: UserRole,
    pub status: UserStatus,
    pub profile: CreateProfileRequest,
}

// 账号列表查询参数（用于存储层）
#[derive(Debug, Clone)]
pub struct UserListQuery {
    pub page: i64,
    pub size: i64,
    pub role: Option<UserRole>,
    pub status: Option<UserStatus>,
    pub search: Option<String>,
}

impl From<UserListParams> for UserListQuery {
    fn from(params: UserListParams) -> Self {
        Self {
            page: params.pagination.page,
            size: params.pagination.size,
            role: params.role,
            status: params.status,
            search: params.search,
        }
    }
}
