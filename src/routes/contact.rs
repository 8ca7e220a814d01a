use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares::{self, RateLimit};
use crate::models::PaginationQuery;
use crate::models::contact::requests::ContactRequest;
use crate::models::users::entities::UserRole;
use crate::services::ContactService;

static CONTACT_SERVICE: Lazy<ContactService> = Lazy::new(ContactService::new_lazy);

pub async fn submit_message(
    request: HttpRequest,
    message: web::Json<ContactRequest>,
) -> ActixResult<HttpResponse> {
    CONTACT_SERVICE.submit(&request, message.into_inner()).await
}

pub async fn list_messages(
    request: HttpRequest,
    query: web::Query<PaginationQuery>,
) -> ActixResult<HttpResponse> {
    CONTACT_SERVICE.list(&request, query.into_inner()).await
}

pub fn configure_contact_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/contact")
            .service(
                web::resource("")
                    .wrap(RateLimit::contact())
                    .route(web::post().to(submit_message)),
            )
            .service(
                web::scope("/messages")
                    .wrap(middlewares::RequireRole::new_any(UserRole::staff_roles()))
                    .wrap(middlewares::RequireJWT)
                    .route("", web::get().to(list_messages)),
            ),
    );
}
