use actix_multipart::Multipart;
use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares::{self, RateLimit};
use crate::models::exercises::entities::MediaSlot;
use crate::services::ExerciseService;

static EXERCISE_SERVICE: Lazy<ExerciseService> = Lazy::new(ExerciseService::new_lazy);

pub async fn dashboard(request: HttpRequest) -> ActixResult<HttpResponse> {
    EXERCISE_SERVICE.dashboard(&request).await
}

pub async fn upload_exercise(request: HttpRequest, payload: Multipart) -> ActixResult<HttpResponse> {
    EXERCISE_SERVICE.upload_exercise(&request, payload).await
}

pub async fn get_exercise(request: HttpRequest, path: web::Path<i64>) -> ActixResult<HttpResponse> {
    EXERCISE_SERVICE
        .get_exercise(&request, path.into_inner())
        .await
}

pub async fn delete_exercise(
    request: HttpRequest,
    path: web::Path<i64>,
) -> ActixResult<HttpResponse> {
    EXERCISE_SERVICE
        .delete_exercise(&request, path.into_inner())
        .await
}

pub async fn update_photos(
    request: HttpRequest,
    path: web::Path<i64>,
    payload: Multipart,
) -> ActixResult<HttpResponse> {
    EXERCISE_SERVICE
        .update_photos(&request, path.into_inner(), payload)
        .await
}

pub async fn download_media(
    request: HttpRequest,
    path: web::Path<(i64, MediaSlot)>,
) -> ActixResult<HttpResponse> {
    let (exercise_id, slot) = path.into_inner();
    EXERCISE_SERVICE
        .download_media(&request, exercise_id, slot)
        .await
}

// 配置路由
pub fn configure_exercise_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/exercises")
            .wrap(middlewares::RequireJWT)
            .route("", web::get().to(dashboard))
            .service(
                web::resource("/upload")
                    .wrap(RateLimit::upload())
                    .route(web::post().to(upload_exercise)),
            )
            .route("/{id}", web::get().to(get_exercise))
            .route("/{id}", web::delete().to(delete_exercise))
            // 表单提交的删除
            .route("/{id}/delete", web::post().to(delete_exercise))
            .route("/{id}/photos", web::put().to(update_photos))
            .route("/{id}/photos", web::post().to(update_photos))
            .route("/{id}/media/{slot}", web::get().to(download_media)),
    );
}
