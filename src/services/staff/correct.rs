use actix_multipart::Multipart;
use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use uuid::Uuid;

use super::StaffService;
use crate::config::AppConfig;
use crate::errors::{PortalError, Result};
use crate::models::exercises::entities::CorrectionStatus;
use crate::models::exercises::requests::CorrectionUpdate;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::media::{
    MediaKind, MediaStore, MultipartForm, UploadedFile, media_error_response, store_photo,
};
use crate::utils::{extension_of, validate_magic_bytes};

/// 批改音频原样保存为 `<uuid><ext>`，扩展名须在白名单内且内容与之匹配
fn store_audio(media: &MediaStore, file: &UploadedFile, allowed: &[String]) -> Result<String> {
    let extension = extension_of(&file.file_name);
    if !allowed.iter().any(|t| t.eq_ignore_ascii_case(&extension)) {
        return Err(PortalError::validation(format!(
            "Audio type '{extension}' is not allowed"
        )));
    }
    if !validate_magic_bytes(&file.data, &extension) {
        return Err(PortalError::validation(
            "Audio content does not match its extension",
        ));
    }

    let file_name = format!("{}{}", Uuid::new_v4(), extension);
    media.save(MediaKind::AudioCorrection, &file_name, &file.data)
}

pub async fn correct_exercise(
    service: &StaffService,
    request: &HttpRequest,
    exercise_id: i64,
    payload: Multipart,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);
    let config = AppConfig::get();

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

    let mut form = match MultipartForm::read(payload, config.upload.max_size).await {
        Ok(form) => form,
        Err(e) => return Ok(e.into_response()),
    };

    let status = match form.text("status").map(|s| s.parse::<CorrectionStatus>()) {
        Some(Ok(status)) => Some(status),
        Some(Err(msg)) => {
            return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
                ErrorCode::InvalidCorrectionStatus,
                msg,
            )));
        }
        None => None,
    };

    let media = MediaStore::from_request(request);

    let mut update = CorrectionUpdate {
        status,
        correction_text: form.text("text_correction"),
        ..Default::default()
    };

    if let Some(audio) = form.take_file("audio_correction") {
        match store_audio(&media, &audio, &config.upload.allowed_audio_types) {
            Ok(path) => update.correction_audio = Some(path),
            Err(e) => return Ok(media_error_response(&e)),
        }
    }

    if let Some(photo) = form.take_file("photo_correction") {
        match store_photo(media.clone(), MediaKind::Correction, photo.data).await {
            Ok(path) => update.correction_image = Some(path),
            Err(e) => {
                media.remove_all(update.correction_audio.as_deref());
                return Ok(media_error_response(&e));
            }
        }
    }

    // 被替换的旧文件
    let mut replaced = Vec::new();
    if update.correction_image.is_some()
        && let Some(old) = &exercise.correction_image
    {
        replaced.push(old.clone());
    }
    if update.correction_audio.is_some()
        && let Some(old) = &exercise.correction_audio
    {
        replaced.push(old.clone());
    }
    let stored: Vec<String> = update
        .correction_image
        .iter()
        .chain(update.correction_audio.iter())
        .cloned()
        .collect();

    match storage.update_correction(exercise_id, update).await {
        Ok(Some(updated)) => {
            media.remove_all(replaced.iter().map(String::as_str));
            tracing::info!(
                "Exercise {} correction saved, status {}",
                exercise_id,
                updated.status
            );
            Ok(HttpResponse::Ok().json(ApiResponse::success(updated, "Correction saved")))
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
                    format!("Failed to save correction: {e}"),
                )),
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_store() -> MediaStore {
        MediaStore::new(std::env::temp_dir().join(format!("portal-audio-{}", Uuid::new_v4())))
    }

    fn allowed() -> Vec<String> {
        vec![".mp3".to_string(), ".wav".to_string()]
    }

    #[test]
    fn test_audio_is_stored_with_uuid_name() {
        let store = temp_store();
        let file = UploadedFile {
            file_name: "Remarques.MP3".to_string(),
            data: b"ID3\x04\x00\x00audio".to_vec(),
        };

        let path = store_audio(&store, &file, &allowed()).unwrap();
        assert!(path.starts_with("audio_corrections/"));
        assert!(path.ends_with(".mp3"));
        assert_eq!(store.read(&path).unwrap(), file.data);

        std::fs::remove_dir_all(store.root()).unwrap();
    }

    #[test]
    fn test_audio_rejections() {
        let store = temp_store();
        let not_allowed = UploadedFile {
            file_name: "voice.ogg".to_string(),
            data: b"OggS\x00".to_vec(),
        };
        assert!(matches!(
            store_audio(&store, &not_allowed, &allowed()),
            Err(PortalError::Validation(_))
        ));

        let disguised = UploadedFile {
            file_name: "voice.wav".to_string(),
            data: b"MZ\x90\x00".to_vec(),
        };
        assert!(matches!(
            store_audio(&store, &disguised, &allowed()),
            Err(PortalError::Validation(_))
        ));
        assert!(!store.root().exists());
    }
}
