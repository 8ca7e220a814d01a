pub mod auth;

pub mod profile;

pub mod exercises;

pub mod staff;

pub mod contact;

use actix_web::HttpResponse;

use crate::models::{ApiResponse, ErrorCode};

pub use auth::configure_auth_routes;
pub use contact::configure_contact_routes;
pub use exercises::configure_exercise_routes;
pub use profile::configure_profile_routes;
pub use staff::configure_staff_routes;

// 未匹配的路径
pub async fn not_found() -> HttpResponse {
    HttpResponse::NotFound().json(ApiResponse::error_empty(
        ErrorCode::NotFound,
        "Resource not found",
    ))
}
