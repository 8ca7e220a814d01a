pub mod dashboard;
pub mod delete;
pub mod detail;
pub mod media;
pub mod photos;
pub mod upload;

use actix_multipart::Multipart;
use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::models::exercises::entities::{Exercise, MediaSlot};
use crate::models::users::entities::User;
use crate::storage::Storage;

/// 默认标题
pub const DEFAULT_TITLE: &str = "Untitled";

pub struct ExerciseService {
    storage: Option<Arc<dyn Storage>>,
}

impl ExerciseService {
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

    // 学生面板：剩余积分与自己的练习
    pub async fn dashboard(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        dashboard::dashboard(self, request).await
    }

    // 提交练习，扣除一次积分
    pub async fn upload_exercise(
        &self,
        request: &HttpRequest,
        payload: Multipart,
    ) -> ActixResult<HttpResponse> {
        upload::upload_exercise(self, request, payload).await
    }

    pub async fn get_exercise(
        &self,
        request: &HttpRequest,
        exercise_id: i64,
    ) -> ActixResult<HttpResponse> {
        detail::get_exercise(self, request, exercise_id).await
    }

    pub async fn delete_exercise(
        &self,
        request: &HttpRequest,
        exercise_id: i64,
    ) -> ActixResult<HttpResponse> {
        delete::delete_exercise(self, request, exercise_id).await
    }

    // 替换题目/答案照片
    pub async fn update_photos(
        &self,
        request: &HttpRequest,
        exercise_id: i64,
        payload: Multipart,
    ) -> ActixResult<HttpResponse> {
        photos::update_photos(self, request, exercise_id, payload).await
    }

    // 下载练习中的媒体文件
    pub async fn download_media(
        &self,
        request: &HttpRequest,
        exercise_id: i64,
        slot: MediaSlot,
    ) -> ActixResult<HttpResponse> {
        media::download_media(self, request, exercise_id, slot).await
    }
}

/// 提交者本人或工作人员可以查看
pub(crate) fn can_view(user: &User, exercise: &Exercise) -> bool {
    exercise.user_id == user.id || user.is_staff()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::exercises::entities::CorrectionStatus;
    use crate::models::users::entities::{UserRole, UserStatus};

    fn user(id: i64, role: UserRole) -> User {
        let now = chrono::Utc::now();
        User {
            id,
            username: format!("user{id}"),
            email: format!("user{id}@example.com"),
            password_hash: String::new(),
            first_name: "A".to_string(),
            last_name: "B".to_string(),
            role,
            status: UserStatus::Active,
            last_login: None,
            created_at: now,
            updated_at: now,
        }
    }

    fn exercise(owner: i64) -> Exercise {
        Exercise {
            id: 1,
            user_id: owner,
            title: DEFAULT_TITLE.to_string(),
            text: None,
            statement_image: "statements/a.jpg".to_string(),
            answer_image: None,
            submitted_at: chrono::Utc::now(),
            status: CorrectionStatus::Uncorrected,
            correction_text: None,
            correction_image: None,
            correction_audio: None,
            corrected_at: None,
        }
    }

    #[test]
    fn test_visibility() {
        let exercise = exercise(1);
        assert!(can_view(&user(1, UserRole::Student), &exercise));
        assert!(!can_view(&user(2, UserRole::Student), &exercise));
        assert!(can_view(&user(3, UserRole::Staff), &exercise));
        assert!(can_view(&user(4, UserRole::Admin), &exercise));
    }
}
