use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::profiles::requests::UpdatePersonalInfoRequest;
use crate::services::ProfileService;

static PROFILE_SERVICE: Lazy<ProfileService> = Lazy::new(ProfileService::new_lazy);

pub async fn get_profile(request: HttpRequest) -> ActixResult<HttpResponse> {
    PROFILE_SERVICE.get_profile(&request).await
}

pub async fn update_profile(
    request: HttpRequest,
    update: web::Json<UpdatePersonalInfoRequest>,
) -> ActixResult<HttpResponse> {
    PROFILE_SERVICE
        .update_personal_info(update.into_inner(), &request)
        .await
}

pub fn configure_profile_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/profile")
            .wrap(middlewares::RequireJWT)
            .route("", web::get().to(get_profile))
            .route("", web::put().to(update_profile)),
    );
}
