pub mod list;
pub mod submit;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::models::PaginationQuery;
use crate::models::contact::requests::ContactRequest;
use crate::storage::Storage;

pub struct ContactService {
    storage: Option<Arc<dyn Storage>>,
}

impl ContactService {
    pub fn new_lazy() -> Self {
        Self { storage: None }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> Arc<dyn Storage> {
        if let Some(storage) = &self.storage {
            storage.clone()
        } else {
            request
                .app_data::<actix_web::web::Data<Arc<dyn Storage>>>()
                .expect("Storage not found in app data")
                .get_ref()
                .clone()
        }
    }

    // 提交留言，无需登录
    pub async fn submit(
        &self,
        request: &HttpRequest,
        message: ContactRequest,
    ) -> ActixResult<HttpResponse> {
        submit::submit_message(self, request, message).await
    }

    pub async fn list(
        &self,
        request: &HttpRequest,
        query: PaginationQuery,
    ) -> ActixResult<HttpResponse> {
        list::list_messages(self, request, query).await
    }
}
