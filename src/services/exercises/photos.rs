use actix_multipart::Multipart;
use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{ExerciseService, can_view};
use crate::config::AppConfig;
use crate::middlewares::RequireJWT;
use crate::models::exercises::requests::PhotoUpdate;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::media::{MediaKind, MediaStore, MultipartForm, media_error_response, store_photo};

pub async fn update_photos(
    service: &ExerciseService,
    request: &HttpRequest,
    exercise_id: i64,
    payload: Multipart,
) -> ActixResult<HttpResponse> {
    let Some(user) = RequireJWT::extract_user(request) else {
        return Ok(HttpResponse::Unauthorized().json(ApiResponse::error_empty(
            ErrorCode::Unauthorized,
            "Unauthorized access, please login",
        )));
    };

    let storage = service.get_storage(request);

    let exercise = match storage.get_exercise_by_id(exercise_id).await {
        Ok(Some(exercise)) => exercise,
        Ok(None) => {
            return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
                ErrorCode::ExerciseNotFound,
                "Exercise not found",
            )));
        }
        Err(e) => {
            return Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::ExerciseUpdateFailed,
                    format!("Failed to load exercise: {e}"),
                )),
            );
        }
    };

    if !can_view(&user, &exercise) {
        return Ok(HttpResponse::Forbidden().json(ApiResponse::error_empty(
            ErrorCode::Forbidden,
            "You are not allowed to modify this exercise",
        )));
    }

    let mut form = match MultipartForm::read(payload, AppConfig::get().upload.max_size).await {
        Ok(form) => form,
        Err(e) => return Ok(e.into_response()),
    };

    let statement = form.take_file("photo_statement");
    let answer = form.take_file("photo_answer");
    if statement.is_none() && answer.is_none() {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::RequiredFieldMissing,
            "Provide 'photo_statement' and/or 'photo_answer'",
        )));
    }

    let media = MediaStore::from_request(request);
    let mut update = PhotoUpdate::default();

    if let Some(file) = statement {
        match store_photo(media.clone(), MediaKind::Statement, file.data).await {
            Ok(path) => update.statement_image = Some(path),
            Err(e) => return Ok(media_error_response(&e)),
        }
    }

    if let Some(file) = answer {
        match store_photo(media.clone(), MediaKind::Answer, file.data).await {
            Ok(path) => update.answer_image = Some(path),
            Err(e) => {
                media.remove_all(update.statement_image.as_deref());
                return Ok(media_error_response(&e));
            }
        }
    }

    // 新文件写入成功后再删除旧文件
    let mut replaced = Vec::new();
    if update.statement_image.is_some() {
        replaced.push(exercise.statement_image.clone());
    }
    if update.answer_image.is_some()
        && let Some(old) = &exercise.answer_image
    {
        replaced.push(old.clone());
    }
    let stored: Vec<String> = update
        .statement_image
        .iter()
        .chain(update.answer_image.iter())
        .cloned()
        .collect();

    match storage.update_exercise_photos(exercise_id, update).await {
        Ok(Some(updated)) => {
            media.remove_all(replaced.iter().map(String::as_str));
            Ok(HttpResponse::Ok().json(ApiResponse::success(updated, "Photos updated")))
        }
        Ok(None) => {
            media.remove_all(stored.iter().map(String::as_str));
            Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
                ErrorCode::ExerciseNotFound,
                "Exercise not found",
            )))
        }
        Err(e) => {
            media.remove_all(stored.iter().map(String::as_str));
            Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::ExerciseUpdateFailed,
                    format!("Failed to update photos: {e}"),
                )),
            )
        }
    }
}
