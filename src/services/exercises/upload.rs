use actix_multipart::Multipart;
use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{DEFAULT_TITLE, ExerciseService};
use crate::config::AppConfig;
use crate::errors::PortalError;
use crate::middlewares::RequireJWT;
use crate::models::exercises::requests::NewExercise;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::media::{MediaKind, MediaStore, MultipartForm, media_error_response, store_photo};

fn insufficient_credits() -> HttpResponse {
    HttpResponse::Forbidden().json(ApiResponse::error_empty(
        ErrorCode::InsufficientCredits,
        "No credits left, please contact us to top up",
    ))
}

pub async fn upload_exercise(
    service: &ExerciseService,
    request: &HttpRequest,
    payload: Multipart,
) -> ActixResult<HttpResponse> {
    let Some(user_id) = RequireJWT::extract_user_id(request) else {
        return Ok(HttpResponse::Unauthorized().json(ApiResponse::error_empty(
            ErrorCode::Unauthorized,
            "Unauthorized access, please login",
        )));
    };

    let config = AppConfig::get();
    let mut form = match MultipartForm::read(payload, config.upload.max_size).await {
        Ok(form) => form,
        Err(e) => return Ok(e.into_response()),
    };

    let Some(statement) = form.take_file("photo_statement") else {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::RequiredFieldMissing,
            "Field 'photo_statement' is required",
        )));
    };
    let answer = form.take_file("photo_answer");

    let storage = service.get_storage(request);

    // 处理图片前先检查积分，扣除仍以事务中的条件更新为准
    match storage.get_profile_by_user_id(user_id).await {
        Ok(Some(profile)) if profile.credits > 0 => {}
        Ok(_) => return Ok(insufficient_credits()),
        Err(e) => {
            return Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::ExerciseCreateFailed,
                    format!("Failed to load profile: {e}"),
                )),
            );
        }
    }

    let media = MediaStore::from_request(request);

    let statement_image = match store_photo(media.clone(), MediaKind::Statement, statement.data).await
    {
        Ok(path) => path,
        Err(e) => return Ok(media_error_response(&e)),
    };

    let answer_image = match answer {
        Some(answer) => match store_photo(media.clone(), MediaKind::Answer, answer.data).await {
            Ok(path) => Some(path),
            Err(e) => {
                media.remove_all([statement_image.as_str()]);
                return Ok(media_error_response(&e));
            }
        },
        None => None,
    };

    let new_exercise = NewExercise {
        user_id,
        title: form.text("title").unwrap_or_else(|| DEFAULT_TITLE.to_string()),
        text: form.text("text"),
        statement_image: statement_image.clone(),
        answer_image: answer_image.clone(),
    };

    match storage.create_exercise_with_debit(new_exercise).await {
        Ok(exercise) => {
            tracing::info!("Exercise {} submitted by user {}", exercise.id, user_id);
            Ok(HttpResponse::Created().json(ApiResponse::success(
                exercise,
                "Exercise submitted successfully",
            )))
        }
        Err(e) => {
            // 事务失败时清理已保存的文件
            media.remove_all(
                std::iter::once(statement_image.as_str()).chain(answer_image.as_deref()),
            );
            match e {
                PortalError::InsufficientCredits(_) => Ok(insufficient_credits()),
                other => Ok(
                    HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                        ErrorCode::ExerciseCreateFailed,
                        format!("Failed to submit exercise: {other}"),
                    )),
                ),
            }
        }
    }
}
