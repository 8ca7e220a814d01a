use serde::Deserialize;

use crate::models::profiles::entities::ClassLevel;

// 用户登录请求（来自HTTP请求）
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    /// 用户名或邮箱
    pub username: String,
    /// 密码
    pub password: String,
    /// 是否记住我
    #[serde(default)]
    pub remember_me: bool,
}

// 注册请求，缺省字段按空串处理，由服务层统一报告缺失
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub password_confirm: String,
    #[serde(default)]
    pub parent_first_name: String,
    #[serde(default)]
    pub parent_last_name: String,
    pub current_class: Option<ClassLevel>,
}

impl RegisterRequest {
    /// 返回第一个为空的必填字段名
    pub fn first_missing_field(&self) -> Option<&'static str> {
        [
            ("username", &self.username),
            ("email", &self.email),
            ("first_name", &self.first_name),
            ("last_name", &self.last_name),
            ("password", &self.password),
            ("password_confirm", &self.password_confirm),
            ("parent_first_name", &self.parent_first_name),
            ("parent_last_name", &self.parent_last_name),
        ]
        .into_iter()
        .find(|(_, value)| value.trim().is_empty())
        .map(|(name, _)| name)
        .or_else(|| self.current_class.is_none().then_some("current_class"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full_request() -> RegisterRequest {
        RegisterRequest {
            username: "lucie_m".to_string(),
            email: "lucie@example.com".to_string(),
            first_name: "Lucie".to_string(),
            last_name: "Martin".to_string(),
            password: "Secret123".to_string(),
            password_confirm: "Secret123".to_string(),
            parent_first_name: "Anne".to_string(),
            parent_last_name: "Martin".to_string(),
            current_class: Some(ClassLevel::Seconde),
        }
    }

    #[test]
    fn test_complete_request_has_no_missing_field() {
        assert_eq!(full_request().first_missing_field(), None);
    }

    #[test]
    fn test_missing_fields_are_reported_in_order() {
        let mut req = full_request();
        req.email = "   ".to_string();
        req.parent_last_name.clear();
        assert_eq!(req.first_missing_field(), Some("email"));

        let mut req = full_request();
        req.current_class = None;
        assert_eq!(req.first_missing_field(), Some("current_class"));
    }
}
