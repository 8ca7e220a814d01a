use super::entities::ClassLevel;
use serde::Deserialize;

// 新建资料（注册时随账号一起创建）
#[derive(Debug, Clone)]
pub struct CreateProfileRequest {
    pub parent_first_name: Option<String>,
    pub parent_last_name: Option<String>,
    pub current_class: Option<ClassLevel>,
    pub credits: i32,
}

// 个人信息更新请求
#[derive(Debug, Clone, Deserialize)]
pub struct UpdatePersonalInfoRequest {
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    #[serde(default)]
    pub parent_first_name: Option<String>,
    #[serde(default)]
    pub parent_last_name: Option<String>,
    pub current_class: ClassLevel,
}
