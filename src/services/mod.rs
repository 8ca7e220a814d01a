pub mod auth;
pub mod contact;
pub mod exercises;
pub mod media;
pub mod profile;
pub mod staff;

use actix_web::{HttpRequest, web};
use std::sync::Arc;

use crate::cache::ObjectCache;

pub use auth::AuthService;
pub use contact::ContactService;
pub use exercises::ExerciseService;
pub use media::MediaStore;
pub use profile::ProfileService;
pub use staff::StaffService;

/// 账号信息变更后清空认证缓存
pub(crate) async fn invalidate_account_cache(request: &HttpRequest) {
    if let Some(cache) = request.app_data::<web::Data<Arc<dyn ObjectCache>>>() {
        cache.invalidate_all().await;
    }
}
