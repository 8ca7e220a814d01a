pub mod accounts;
pub mod correct;
pub mod exercises;

use actix_multipart::Multipart;
use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::models::exercises::requests::ExerciseListQuery;
use crate::models::users::requests::UserListQuery;
use crate::storage::Storage;

pub struct StaffService {
    storage: Option<Arc<dyn Storage>>,
}

impl StaffService {
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

    // 按批改状态分页列出练习
    pub async fn list_exercises(
        &self,
        request: &HttpRequest,
        query: ExerciseListQuery,
    ) -> ActixResult<HttpResponse> {
        exercises::list_exercises(self, request, query).await
    }

    // 某个学生的全部练习
    pub async fn list_user_exercises(
        &self,
        request: &HttpRequest,
        user_id: i64,
    ) -> ActixResult<HttpResponse> {
        exercises::list_user_exercises(self, request, user_id).await
    }

    // 提交批改
    pub async fn correct_exercise(
        &self,
        request: &HttpRequest,
        exercise_id: i64,
        payload: Multipart,
    ) -> ActixResult<HttpResponse> {
        correct::correct_exercise(self, request, exercise_id, payload).await
    }

    pub async fn list_accounts(
        &self,
        request: &HttpRequest,
        query: UserListQuery,
    ) -> ActixResult<HttpResponse> {
        accounts::list_accounts(self, request, query).await
    }

    // 积分 +1 / -1
    pub async fn adjust_credits(
        &self,
        request: &HttpRequest,
        user_id: i64,
        delta: i32,
    ) -> ActixResult<HttpResponse> {
        accounts::adjust_credits(self, request, user_id, delta).await
    }

    // 切换账号激活状态，仅限超级管理员
    pub async fn toggle_active(
        &self,
        request: &HttpRequest,
        user_id: i64,
    ) -> ActixResult<HttpResponse> {
        accounts::toggle_active(self, request, user_id).await
    }
}
