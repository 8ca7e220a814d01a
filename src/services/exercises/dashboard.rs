use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::ExerciseService;
use crate::middlewares::RequireJWT;
use crate::models::exercises::responses::DashboardResponse;
use crate::models::{ApiResponse, ErrorCode};

pub async fn dashboard(
    service: &ExerciseService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let Some(user_id) = RequireJWT::extract_user_id(request) else {
        return Ok(HttpResponse::Unauthorized().json(ApiResponse::error_empty(
            ErrorCode::Unauthorized,
            "Unauthorized access, please login",
        )));
    };

    let storage = service.get_storage(request);

    let credits = match storage.get_profile_by_user_id(user_id).await {
        Ok(profile) => profile.map(|p| p.credits).unwrap_or(0),
        Err(e) => {
            return Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    format!("Failed to load profile: {e}"),
                )),
            );
        }
    };

    match storage.list_user_exercises(user_id).await {
        Ok(exercises) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            DashboardResponse { credits, exercises },
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
