use actix_multipart::Multipart;
use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares::{self, RateLimit};
use crate::models::exercises::requests::ExerciseListParams;
use crate::models::users::{entities::UserRole, requests::UserListParams};
use crate::services::StaffService;

static STAFF_SERVICE: Lazy<StaffService> = Lazy::new(StaffService::new_lazy);

pub async fn list_exercises(
    request: HttpRequest,
    query: web::Query<ExerciseListParams>,
) -> ActixResult<HttpResponse> {
    STAFF_SERVICE
        .list_exercises(&request, query.into_inner().into())
        .await
}

pub async fn correct_exercise(
    request: HttpRequest,
    path: web::Path<i64>,
    payload: Multipart,
) -> ActixResult<HttpResponse> {
    STAFF_SERVICE
        .correct_exercise(&request, path.into_inner(), payload)
        .await
}

pub async fn list_accounts(
    request: HttpRequest,
    query: web::Query<UserListParams>,
) -> ActixResult<HttpResponse> {
    STAFF_SERVICE
        .list_accounts(&request, query.into_inner().into())
        .await
}

pub async fn list_user_exercises(
    request: HttpRequest,
    path: web::Path<i64>,
) -> ActixResult<HttpResponse> {
    STAFF_SERVICE
        .list_user_exercises(&request, path.into_inner())
        .await
}

pub async fn increment_credits(
    request: HttpRequest,
    path: web::Path<i64>,
) -> ActixResult<HttpResponse> {
    STAFF_SERVICE
        .adjust_credits(&request, path.into_inner(), 1)
        .await
}

pub async fn decrement_credits(
    request: HttpRequest,
    path: web::Path<i64>,
) -> ActixResult<HttpResponse> {
    STAFF_SERVICE
        .adjust_credits(&request, path.into_inner(), -1)
        .await
}

pub async fn toggle_active(request: HttpRequest, path: web::Path<i64>) -> ActixResult<HttpResponse> {
    STAFF_SERVICE
        .toggle_active(&request, path.into_inner())
        .await
}

// 配置路由
pub fn configure_staff_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/staff")
            .wrap(middlewares::RequireJWT)
            .service(
                web::scope("")
                    .wrap(middlewares::RequireRole::new_any(UserRole::staff_roles()))
                    .route("/exercises", web::get().to(list_exercises))
                    .service(
                        web::resource("/exercises/{id}/correction")
                            .wrap(RateLimit::upload())
                            .route(web::post().to(correct_exercise)),
                    )
                    .route("/users", web::get().to(list_accounts))
                    .route("/users/{id}/exercises", web::get().to(list_user_exercises))
                    .route(
                        "/users/{id}/credits/increment",
                        web::post().to(increment_credits),
                    )
                    .route(
                        "/users/{id}/credits/decrement",
                        web::post().to(decrement_credits),
                    )
                    .route("/users/{id}/toggle-active", web::post().to(toggle_active)),
            ),
    );
}
