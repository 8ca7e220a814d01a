use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::StaffService;
use crate::models::exercises::requests::ExerciseListQuery;
use crate::models::{ApiResponse, ErrorCode};

pub async fn list_exercises(
    service: &StaffService,
    request: &HttpRequest,
    query: ExerciseListQuery,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    match storage.list_exercises_with_pagination(query).await {
        Ok(response) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            response,
            "Exercises retrieved successfully",
        ))),
        Err(e) => Ok(
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::InternalServerError,
                format!("Failed to list exercises: {e}"),
            )),
        ),
    }
}

pub async fn list_user_exercises(
    service: &StaffService,
    request: &HttpRequest,
    user_id: i64,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    match storage.get_user_by_id(user_id).await {
        Ok(Some(_)) => {}
        Ok(None) => {
            return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
                ErrorCode::UserNotFound,
                "Account not found",
            )));
        }
        Err(e) => {
            return Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    format!("Failed to load account: {e}"),
                )),
            );
        }
    }

    match storage.list_user_exercises(user_id).await {
        Ok(exercises) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            exercises,
            "Exercises retrieved successfully",
        ))),
        Err(e) => Ok(
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::InternalServerError,
                format!("Failed to list exercises: {e}"),
            )),
        ),
    }
}
