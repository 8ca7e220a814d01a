use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, http::header};

use super::{ExerciseService, can_view};
use crate::errors::PortalError;
use crate::middlewares::RequireJWT;
use crate::models::exercises::entities::MediaSlot;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::media::{MediaStore, content_type_for};

fn not_found() -> HttpResponse {
    HttpResponse::NotFound().json(ApiResponse::error_empty(
        ErrorCode::FileNotFound,
        "File not found",
    ))
}

pub async fn download_media(
    service: &ExerciseService,
    request: &HttpRequest,
    exercise_id: i64,
    slot: MediaSlot,
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
        Ok(_) => return Ok(not_found()),
        Err(e) => {
            return Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    format!("Failed to load exercise: {e}"),
                )),
            );
        }
    };

    let Some(path) = exercise.media_path(slot) else {
        return Ok(not_found());
    };

    match MediaStore::from_request(request).read(path) {
        Ok(bytes) => Ok(HttpResponse::Ok()
            .insert_header((header::CONTENT_TYPE, content_type_for(path)))
            .insert_header(("Cache-Control", "private, max-age=3600"))
            .body(bytes)),
        Err(PortalError::NotFound(_)) => Ok(not_found()),
        Err(e) => {
            tracing::error!("{}", e);
            Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    "File read failed",
                )),
            )
        }
    }
}
