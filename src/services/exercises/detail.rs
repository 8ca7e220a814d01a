use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{ExerciseService, can_view};
use crate::middlewares::RequireJWT;
use crate::models::{ApiResponse, ErrorCode};

pub async fn get_exercise(
    service: &ExerciseService,
    request: &HttpRequest,
    exercise_id: i64,
) -> ActixResult<HttpResponse> {
    let Some(user) = RequireJWT::extract_user(request) else {
        return Ok(HttpResponse::Unauthorized().json(ApiResponse::error_empty(
            ErrorCode::Unauthorized,
            "Unauthorized access, please login",
        )));
    };

    let storage = service.get_storage(request);
    match storage.get_exercise_by_id(exercise_id).await {
        // 无权查看时同样返回 404
        Ok(Some(exercise)) if can_view(&user, &exercise) => Ok(HttpResponse::Ok().json(
            ApiResponse::success(exercise, "Exercise retrieved successfully"),
        )),
        Ok(_) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::ExerciseNotFound,
            "Exercise not found",
        ))),
        Err(e) => Ok(
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::InternalServerError,
                format!("Failed to load exercise: {e}"),
            )),
        ),
    }
}
