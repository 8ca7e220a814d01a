use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{ExerciseService, can_view};
use crate::middlewares::RequireJWT;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::media::MediaStore;

pub async fn delete_exercise(
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

    let exercise = match storage.get_exercise_by_id(exercise_id).await {
        Ok(Some(exercise)) if can_view(&user, &exercise) => exercise,
        Ok(_) => {
            return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
                ErrorCode::ExerciseNotFound,
                "Exercise not found",
            )));
        }
        Err(e) => {
            return Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::ExerciseDeleteFailed,
                    format!("Failed to load exercise: {e}"),
                )),
            );
        }
    };

    // 只有提交者本人可以删除
    if exercise.user_id != user.id {
        return Ok(HttpResponse::Forbidden().json(ApiResponse::error_empty(
            ErrorCode::Forbidden,
            "Only the owner can delete this exercise",
        )));
    }

    match storage.delete_exercise(exercise_id).await {
        Ok(_) => {
            MediaStore::from_request(request).remove_all(exercise.media_paths());
            tracing::info!("Exercise {} deleted by user {}", exercise_id, user.id);
            Ok(HttpResponse::Ok().json(ApiResponse::success_empty("Exercise deleted")))
        }
        Err(e) => Ok(
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::ExerciseDeleteFailed,
                format!("Failed to delete exercise: {e}"),
            )),
        ),
    }
}
