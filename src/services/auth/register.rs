use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::config::CreditsConfig;
use crate::models::auth::{RegisterRequest, responses::RegisterResponse};
use crate::models::profiles::requests::CreateProfileRequest;
use crate::models::users::entities::{UserRole, UserStatus};
use crate::models::users::requests::CreateUserRequest;
use crate::models::{ApiResponse, ErrorCode};
use crate::storage::Storage;
use crate::utils::password::hash_password;
use crate::utils::validate::{validate_email, validate_name, validate_password, validate_username};

use super::AuthService;

fn bad_request(code: ErrorCode, message: impl Into<String>) -> HttpResponse {
    HttpResponse::BadRequest().json(ApiResponse::error_empty(code, message))
}

// 字段格式校验，返回第一个错误
fn validate_register_request(req: &RegisterRequest) -> Result<(), HttpResponse> {
    if let Some(field) = req.first_missing_field() {
        return Err(bad_request(
            ErrorCode::RequiredFieldMissing,
            format!("Field '{field}' is required"),
        ));
    }

    validate_username(req.username.trim())
        .map_err(|msg| bad_request(ErrorCode::UserNameInvalid, msg))?;
    validate_email(req.email.trim()).map_err(|msg| bad_request(ErrorCode::UserEmailInvalid, msg))?;

    for (field, value) in [
        ("first_name", &req.first_name),
        ("last_name", &req.last_name),
        ("parent_first_name", &req.parent_first_name),
        ("parent_last_name", &req.parent_last_name),
    ] {
        validate_name(value.trim())
            .map_err(|msg| bad_request(ErrorCode::BadRequest, format!("{field}: {msg}")))?;
    }

    if req.password != req.password_confirm {
        return Err(bad_request(
            ErrorCode::UserPasswordMismatch,
            "The two passwords do not match",
        ));
    }

    let policy = validate_password(&req.password);
    if !policy.is_valid {
        return Err(bad_request(
            ErrorCode::UserPasswordInvalid,
            policy.error_message(),
        ));
    }

    Ok(())
}

// 新注册账号：学生角色，待激活，初始积分取自配置
fn new_account_request(
    req: &RegisterRequest,
    username: String,
    email: String,
    password_hash: String,
    credits: &CreditsConfig,
) -> CreateUserRequest {
    CreateUserRequest {
        username,
        email,
        password: password_hash,
        first_name: req.first_name.trim().to_string(),
        last_name: req.last_name.trim().to_string(),
        role: UserRole::Student,
        status: UserStatus::Inactive,
        profile: CreateProfileRequest {
            parent_first_name: Some(req.parent_first_name.trim().to_string()),
            parent_last_name: Some(req.parent_last_name.trim().to_string()),
            current_class: req.current_class,
            credits: credits.initial,
        },
    }
}

pub async fn handle_register(
    service: &AuthService,
    register_request: RegisterRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);
    let config = service.get_config();

    // 1. 格式校验
    if let Err(response) = validate_register_request(&register_request) {
        return Ok(response);
    }

    let username = register_request.username.trim().to_string();
    let email = register_request.email.trim().to_string();

    // 2. 检查用户名与邮箱是否已存在
    if let Err(response) = check_username_exists(&storage, &username).await {
        return Ok(response);
    }
    if let Err(response) = check_email_exists(&storage, &email).await {
        return Ok(response);
    }

    // 3. 哈希密码
    let password_hash = match hash_password(&register_request.password) {
        Ok(hash) => hash,
        Err(e) => {
            return Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::RegisterFailed,
                    format!("Password hashing failed: {e}"),
                )),
            );
        }
    };

    // 4. 创建待激活账号及资料
    let create_request = new_account_request(
        &register_request,
        username,
        email,
        password_hash,
        &config.credits,
    );

    match storage.create_user(create_request).await {
        Ok(user) => {
            tracing::info!("Registered account {} pending activation", user.username);
            Ok(HttpResponse::Created().json(ApiResponse::success(
                RegisterResponse {
                    user,
                    pending_activation: true,
                },
                "Registration received, the account will be activated by the staff",
            )))
        }
        Err(e) => Ok(
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::RegisterFailed,
                format!("Register failed: {e}"),
            )),
        ),
    }
}

async fn check_username_exists(
    storage: &Arc<dyn Storage>,
    username: &str,
) -> Result<(), HttpResponse> {
    match storage.get_user_by_username(username).await {
        Ok(Some(_)) => Err(HttpResponse::Conflict().json(ApiResponse::error_empty(
            ErrorCode::UserNameAlreadyExists,
            "Username already exists",
        ))),
        Ok(None) => Ok(()),
        Err(e) => Err(
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::RegisterFailed,
                format!("Register failed: {e}"),
            )),
        ),
    }
}

async fn check_email_exists(storage: &Arc<dyn Storage>, email: &str) -> Result<(), HttpResponse> {
    match storage.get_user_by_email(email).await {
        Ok(Some(_)) => Err(HttpResponse::Conflict().json(ApiResponse::error_empty(
            ErrorCode::UserEmailAlreadyExists,
            "Email already exists",
        ))),
        Ok(None) => Ok(()),
        Err(e) => Err(
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::RegisterFailed,
                format!("Register failed: {e}"),
            )),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::profiles::entities::ClassLevel;

    fn valid_request() -> RegisterRequest {
        RegisterRequest {
            username: "lucas".to_string(),
            email: "lucas@example.com".to_string(),
            first_name: "Lucas".to_string(),
            last_name: "Martin".to_string(),
            password: "cahier2024".to_string(),
            password_confirm: "cahier2024".to_string(),
            parent_first_name: "Anne".to_string(),
            parent_last_name: "Martin".to_string(),
            current_class: Some(ClassLevel::Troisieme),
        }
    }

    #[test]
    fn test_valid_request_passes() {
        assert!(validate_register_request(&valid_request()).is_ok());
    }

    #[test]
    fn test_rejections_are_bad_requests() {
        let mut missing = valid_request();
        missing.parent_last_name.clear();

        let mut mismatch = valid_request();
        mismatch.password_confirm = "cahier2025".to_string();

        let mut bad_email = valid_request();
        bad_email.email = "lucas.example.com".to_string();

        let mut bad_username = valid_request();
        bad_username.username = "lu cas".to_string();

        let mut weak = valid_request();
        weak.password = "12345678".to_string();
        weak.password_confirm = "12345678".to_string();

        for req in [missing, mismatch, bad_email, bad_username, weak] {
            let response = validate_register_request(&req).unwrap_err();
            assert_eq!(response.status(), actix_web::http::StatusCode::BAD_REQUEST);
        }
    }

    #[test]
    fn test_initial_credits_default_to_one() {
        assert_eq!(CreditsConfig::default().initial, 1);
    }

    #[tokio::test]
    async fn test_registered_account_is_inactive_with_initial_credits() {
        use crate::storage::sea_orm_storage::test_support::memory_storage;

        let req = valid_request();
        let create = new_account_request(
            &req,
            req.username.clone(),
            req.email.clone(),
            "hashed".to_string(),
            &CreditsConfig::default(),
        );
        assert_eq!(create.role, UserRole::Student);
        assert_eq!(create.status, UserStatus::Inactive);
        assert_eq!(create.profile.credits, 1);

        let storage = memory_storage().await;
        let user = storage.create_user(create).await.unwrap();
        let stored = storage.get_user_by_id_impl(user.id).await.unwrap().unwrap();
        assert_eq!(stored.status, UserStatus::Inactive);

        let profile = storage
            .get_profile_by_user_id_impl(user.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(profile.credits, 1);
        assert_eq!(profile.current_class, Some(ClassLevel::Troisieme));
    }

    #[test]
    fn test_configured_initial_credits_are_used() {
        let req = valid_request();
        let create = new_account_request(
            &req,
            "lucas".to_string(),
            "lucas@example.com".to_string(),
            "hashed".to_string(),
            &CreditsConfig { initial: 3 },
        );
        assert_eq!(create.profile.credits, 3);
        assert_eq!(create.profile.parent_first_name.as_deref(), Some("Anne"));
    }
}
