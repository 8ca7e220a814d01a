//! 数据模型定义
//!
//! 业务实体、请求与响应结构，与 `entity` 中的数据库实体分离。

pub mod auth;
pub mod common;
pub mod contact;
pub mod exercises;
pub mod profiles;
pub mod users;

pub use common::{ApiResponse, PaginationInfo, PaginationQuery};

/// 程序启动时间
#[derive(Debug, Clone)]
pub struct AppStartTime {
    pub start_datetime: chrono::DateTime<chrono::Utc>,
}

/// 响应错误码
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ErrorCode {
    Success = 0,

    // 通用错误
    BadRequest = 1000,
    Unauthorized = 1001,
    Forbidden = 1003,
    NotFound = 1004,
    InternalServerError = 1005,
    RateLimitExceeded = 1029,

    // 认证相关
    AuthFailed = 2000,
    AccountInactive = 2001,
    RegisterFailed = 2002,

    // 账号相关
    UserNotFound = 3000,
    UserNameInvalid = 3001,
    UserEmailInvalid = 3002,
    UserNameAlreadyExists = 3003,
    UserEmailAlreadyExists = 3004,
    UserPasswordMismatch = 3005,
    UserPasswordInvalid = 3006,
    UserUpdateFailed = 3007,
    RequiredFieldMissing = 3008,

    // 文件相关
    FileNotFound = 4000,
    FileUploadFailed = 4001,
    FileTypeNotAllowed = 4002,
    FileSizeExceeded = 4003,
    ImageDecodeFailed = 4004,

    // 练习相关
    ExerciseNotFound = 5000,
    ExerciseCreateFailed = 5001,
    ExerciseUpdateFailed = 5002,
    ExerciseDeleteFailed = 5003,
    InsufficientCredits = 5004,
    InvalidCorrectionStatus = 5005,

    // 联系留言
    ContactMessageFailed = 6000,
}
