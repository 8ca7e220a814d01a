use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::StaffService;
use crate::middlewares::RequireJWT;
use crate::models::users::requests::UserListQuery;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::invalidate_account_cache;

pub async fn list_accounts(
    service: &StaffService,
    request: &HttpRequest,
    query: UserListQuery,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    match storage.list_users_with_pagination(query).await {
        Ok(response) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            response,
            "Accounts retrieved successfully",
        ))),
        Err(e) => Ok(
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::InternalServerError,
                format!("Failed to list accounts: {e}"),
            )),
        ),
    }
}

pub async fn adjust_credits(
    service: &StaffService,
    request: &HttpRequest,
    user_id: i64,
    delta: i32,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    match storage.adjust_credits(user_id, delta).await {
        Ok(Some(profile)) => {
            tracing::info!(
                "Credits of user {} adjusted by {}, now {}",
                user_id,
                delta,
                profile.credits
            );
            Ok(HttpResponse::Ok().json(ApiResponse::success(profile, "Credits updated")))
        }
        Ok(None) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::UserNotFound,
            "Profile not found",
        ))),
        Err(e) => Ok(
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::UserUpdateFailed,
                format!("Failed to update credits: {e}"),
            )),
        ),
    }
}

pub async fn toggle_active(
    service: &StaffService,
    request: &HttpRequest,
    user_id: i64,
) -> ActixResult<HttpResponse> {
    let Some(operator) = RequireJWT::extract_user(request) else {
        return Ok(HttpResponse::Unauthorized().json(ApiResponse::error_empty(
            ErrorCode::Unauthorized,
            "Unauthorized access, please login",
        )));
    };

    if !operator.is_superuser() {
        return Ok(HttpResponse::Forbidden().json(ApiResponse::error_empty(
            ErrorCode::Forbidden,
            "Only a superuser can activate or deactivate accounts",
        )));
    }

    // 防止管理员停用自己
    if operator.id == user_id {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::BadRequest,
            "You cannot deactivate your own account",
        )));
    }

    let storage = service.get_storage(request);
    match storage.toggle_user_active(user_id).await {
        Ok(Some(user)) => {
            invalidate_account_cache(request).await;
            tracing::info!(
                "Account {} set to {} by {}",
                user.username,
                user.status,
                operator.username
            );
            Ok(HttpResponse::Ok().json(ApiResponse::success(user, "Account status updated")))
        }
        Ok(None) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::UserNotFound,
            "Account not found",
        ))),
        Err(e) => Ok(
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::UserUpdateFailed,
                format!("Failed to update account: {e}"),
            )),
        ),
    }
}
