use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::ProfileService;
use crate::middlewares::RequireJWT;
use crate::models::profiles::requests::UpdatePersonalInfoRequest;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::invalidate_account_cache;
use crate::utils::validate::{validate_email, validate_name, validate_username};

// 去除空白，空的可选字段视为未填写
fn normalize(mut update: UpdatePersonalInfoRequest) -> UpdatePersonalInfoRequest {
    update.username = update.username.trim().to_string();
    update.email = update.email.trim().to_string();
    update.first_name = update.first_name.trim().to_string();
    update.last_name = update.last_name.trim().to_string();
    update.parent_first_name = update
        .parent_first_name
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty());
    update.parent_last_name = update
        .parent_last_name
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty());
    update
}

fn validate(update: &UpdatePersonalInfoRequest) -> Result<(), HttpResponse> {
    let bad_request =
        |code, msg: &str| HttpResponse::BadRequest().json(ApiResponse::error_empty(code, msg));

    validate_username(&update.username)
        .map_err(|msg| bad_request(ErrorCode::UserNameInvalid, msg))?;
    validate_email(&update.email).map_err(|msg| bad_request(ErrorCode::UserEmailInvalid, msg))?;
    validate_name(&update.first_name).map_err(|msg| bad_request(ErrorCode::BadRequest, msg))?;
    validate_name(&update.last_name).map_err(|msg| bad_request(ErrorCode::BadRequest, msg))?;
    for value in [&update.parent_first_name, &update.parent_last_name]
        .into_iter()
        .flatten()
    {
        validate_name(value).map_err(|msg| bad_request(ErrorCode::BadRequest, msg))?;
    }
    Ok(())
}

pub async fn update_personal_info(
    service: &ProfileService,
    update: UpdatePersonalInfoRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let Some(user_id) = RequireJWT::extract_user_id(request) else {
        return Ok(HttpResponse::Unauthorized().json(ApiResponse::error_empty(
            ErrorCode::Unauthorized,
            "Unauthorized access, please login",
        )));
    };

    let update = normalize(update);
    if let Err(response) = validate(&update) {
        return Ok(response);
    }

    let storage = service.get_storage(request);

    // 用户名与邮箱唯一（排除自己）
    match storage.get_user_by_username(&update.username).await {
        Ok(Some(other)) if other.id != user_id => {
            return Ok(HttpResponse::Conflict().json(ApiResponse::error_empty(
                ErrorCode::UserNameAlreadyExists,
                "Username already exists",
            )));
        }
        Ok(_) => {}
        Err(e) => {
            return Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::UserUpdateFailed,
                    format!("Profile update failed: {e}"),
                )),
            );
        }
    }

    match storage.get_user_by_email(&update.email).await {
        Ok(Some(other)) if other.id != user_id => {
            return Ok(HttpResponse::Conflict().json(ApiResponse::error_empty(
                ErrorCode::UserEmailAlreadyExists,
                "Email already exists",
            )));
        }
        Ok(_) => {}
        Err(e) => {
            return Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::UserUpdateFailed,
                    format!("Profile update failed: {e}"),
                )),
            );
        }
    }

    match storage.update_personal_info(user_id, update).await {
        Ok(Some(updated)) => {
            invalidate_account_cache(request).await;
            Ok(HttpResponse::Ok().json(ApiResponse::success(
                updated,
                "Personal information updated",
            )))
        }
        Ok(None) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::UserNotFound,
            "Account not found",
        ))),
        Err(e) => Ok(
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::UserUpdateFailed,
                format!("Profile update failed: {e}"),
            )),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::profiles::entities::ClassLevel;

    fn request() -> UpdatePersonalInfoRequest {
        UpdatePersonalInfoRequest {
            username: " camille ".to_string(),
            email: "camille@example.com ".to_string(),
            first_name: "Camille".to_string(),
            last_name: "Petit".to_string(),
            parent_first_name: Some("  ".to_string()),
            parent_last_name: Some("Petit".to_string()),
            current_class: ClassLevel::Seconde,
        }
    }

    #[test]
    fn test_normalize_trims_and_drops_blank_optionals() {
        let update = normalize(request());
        assert_eq!(update.username, "camille");
        assert_eq!(update.email, "camille@example.com");
        assert_eq!(update.parent_first_name, None);
        assert_eq!(update.parent_last_name.as_deref(), Some("Petit"));
        assert!(validate(&update).is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_email() {
        let mut update = normalize(request());
        update.email = "camille".to_string();
        assert!(validate(&update).is_err());
    }
}
