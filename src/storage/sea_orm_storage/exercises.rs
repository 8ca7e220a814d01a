use super::SeaOrmStorage;
use crate::entity::exercises::{ActiveModel, Column, Entity as Exercises};
use crate::entity::profiles::{Column as ProfileColumn, Entity as Profiles};
use crate::errors::{PortalError, Result};
use crate::models::{
    PaginationInfo,
    exercises::{
        entities::{CorrectionStatus, Exercise},
        requests::{CorrectionUpdate, ExerciseListQuery, NewExercise, PhotoUpdate},
        responses::ExerciseListResponse,
    },
};
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set,
    TransactionTrait,
};

impl SeaOrmStorage {
    /// 扣除一次积分并创建练习
    ///
    /// 扣减使用带条件的 UPDATE（`credits > 0`），与插入处于同一事务，
    /// 并发提交不会让积分变为负数。
    pub async fn create_exercise_with_debit_impl(&self, req: NewExercise) -> Result<Exercise> {
        let now = chrono::Utc::now().timestamp();

        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| PortalError::database_operation(format!("开启事务失败: {e}")))?;

        let debit = Profiles::update_many()
            .col_expr(ProfileColumn::Credits, Expr::cust("credits - 1"))
            .col_expr(ProfileColumn::UpdatedAt, Expr::value(now))
            .filter(ProfileColumn::UserId.eq(req.user_id))
            .filter(ProfileColumn::Credits.gt(0))
            .exec(&txn)
            .await
            .map_err(|e| PortalError::database_operation(format!("扣除积分失败: {e}")))?;

        if debit.rows_affected == 0 {
            txn.rollback()
                .await
                .map_err(|e| PortalError::database_operation(format!("回滚事务失败: {e}")))?;
            return Err(PortalError::insufficient_credits(
                "No credits left to submit an exercise",
            ));
        }

        let model = ActiveModel {
            user_id: Set(req.user_id),
            title: Set(req.title),
            text: Set(req.text),
            statement_image: Set(req.statement_image),
            answer_image: Set(req.answer_image),
            submitted_at: Set(now),
            status: Set(CorrectionStatus::Uncorrected.to_string()),
            ..Default::default()
        };

        let exercise = model
            .insert(&txn)
            .await
            .map_err(|e| PortalError::database_operation(format!("创建练习失败: {e}")))?;

        txn.commit()
            .await
            .map_err(|e| PortalError::database_operation(format!("提交事务失败: {e}")))?;

        Ok(exercise.into_exercise())
    }

    /// 通过 ID 获取练习
    pub async fn get_exercise_by_id_impl(&self, id: i64) -> Result<Option<Exercise>> {
        let result = Exercises::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| PortalError::database_operation(format!("查询练习失败: {e}")))?;

        Ok(result.map(|m| m.into_exercise()))
    }

    /// 列出某账号的全部练习
    pub async fn list_user_exercises_impl(&self, user_id: i64) -> Result<Vec<Exercise>> {
        let result = Exercises::find()
            .filter(Column::UserId.eq(user_id))
            .order_by_desc(Column::SubmittedAt)
            .order_by_desc(Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| PortalError::database_operation(format!("查询练习列表失败: {e}")))?;

        Ok(result.into_iter().map(|m| m.into_exercise()).collect())
    }

    /// 分页列出练习
    pub async fn list_exercises_with_pagination_impl(
        &self,
        query: ExerciseListQuery,
    ) -> Result<ExerciseListResponse> {
        let page = query.page.max(1) as u64;
        let size = query.size.clamp(1, 100) as u64;

        let mut select = Exercises::find();

        if let Some(user_id) = query.user_id {
            select = select.filter(Column::UserId.eq(user_id));
        }

        if let Some(status) = query.status {
            select = select.filter(Column::Status.eq(status.to_string()));
        }

        select = select
            .order_by_desc(Column::SubmittedAt)
            .order_by_desc(Column::Id);

        let paginator = select.paginate(&self.db, size);
        let total = paginator
            .num_items()
            .await
            .map_err(|e| PortalError::database_operation(format!("查询练习总数失败: {e}")))?;

        let pages = paginator
            .num_pages()
            .await
            .map_err(|e| PortalError::database_operation(format!("查询练习页数失败: {e}")))?;

        let exercises = paginator
            .fetch_page(page - 1)
            .await
            .map_err(|e| PortalError::database_operation(format!("查询练习列表失败: {e}")))?;

        Ok(ExerciseListResponse {
            items: exercises.into_iter().map(|m| m.into_exercise()).collect(),
            pagination: PaginationInfo {
                page: page as i64,
                page_size: size as i64,
                total: total as i64,
                total_pages: pages as i64,
            },
        })
    }

    /// 替换题目/答案照片
    pub async fn update_exercise_photos_impl(
        &self,
        id: i64,
        update: PhotoUpdate,
    ) -> Result<Option<Exercise>> {
        let Some(existing) = Exercises::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| PortalError::database_operation(format!("查询练习失败: {e}")))?
        else {
            return Ok(None);
        };

        let mut model: ActiveModel = existing.into();

        if let Some(statement_image) = update.statement_image {
            model.statement_image = Set(statement_image);
        }

        if let Some(answer_image) = update.answer_image {
            model.answer_image = Set(Some(answer_image));
        }

        let updated = model
            .update(&self.db)
            .await
            .map_err(|e| PortalError::database_operation(format!("更新练习照片失败: {e}")))?;

        Ok(Some(updated.into_exercise()))
    }

    /// 写入批改结果
    ///
    /// 状态首次变为 corrected 时记录批改时间，之后保持不变。
    pub async fn update_correction_impl(
        &self,
        id: i64,
        update: CorrectionUpdate,
    ) -> Result<Option<Exercise>> {
        let Some(existing) = Exercises::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| PortalError::database_operation(format!("查询练习失败: {e}")))?
        else {
            return Ok(None);
        };

        let stamp_corrected =
            update.status == Some(CorrectionStatus::Corrected) && existing.corrected_at.is_none();

        let mut model: ActiveModel = existing.into();

        if let Some(status) = update.status {
            model.status = Set(status.to_string());
        }

        if let Some(text) = update.correction_text {
            model.correction_text = Set(Some(text));
        }

        if let Some(image) = update.correction_image {
            model.correction_image = Set(Some(image));
        }

        if let Some(audio) = update.correction_audio {
            model.correction_audio = Set(Some(audio));
        }

        if stamp_corrected {
            model.corrected_at = Set(Some(chrono::Utc::now().timestamp()));
        }

        let updated = model
            .update(&self.db)
            .await
            .map_err(|e| PortalError::database_operation(format!("更新批改失败: {e}")))?;

        Ok(Some(updated.into_exercise()))
    }

    /// 删除练习
    pub async fn delete_exercise_impl(&self, id: i64) -> Result<bool> {
        let result = Exercises::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(|e| PortalError::database_operation(format!("删除练习失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::super::SeaOrmStorage;
    use super::super::test_support::{create_student, memory_storage};
    use crate::errors::PortalError;
    use crate::models::exercises::entities::CorrectionStatus;
    use crate::models::exercises::requests::{
        CorrectionUpdate, ExerciseListQuery, NewExercise, PhotoUpdate,
    };

    fn new_exercise(user_id: i64, title: &str) -> NewExercise {
        NewExercise {
            user_id,
            title: title.to_string(),
            text: Some("Exercice 3 page 42".to_string()),
            statement_image: format!("statements/{title}.jpg"),
            answer_image: None,
        }
    }

    async fn credits_of(storage: &SeaOrmStorage, user_id: i64) -> i32 {
        storage
            .get_profile_by_user_id_impl(user_id)
            .await
            .unwrap()
            .unwrap()
            .credits
    }

    #[tokio::test]
    async fn test_each_submission_debits_one_credit() {
        let storage = memory_storage().await;
        let user = create_student(&storage, "louis", 3).await;

        let first = storage
            .create_exercise_with_debit_impl(new_exercise(user.id, "a"))
            .await
            .unwrap();
        assert_eq!(first.status, CorrectionStatus::Uncorrected);
        assert!(first.corrected_at.is_none());
        assert_eq!(credits_of(&storage, user.id).await, 2);

        storage
            .create_exercise_with_debit_impl(new_exercise(user.id, "b"))
            .await
            .unwrap();
        assert_eq!(credits_of(&storage, user.id).await, 1);
    }

    #[tokio::test]
    async fn test_zero_credit_submission_is_rejected_without_insert() {
        let storage = memory_storage().await;
        let user = create_student(&storage, "manon", 1).await;

        storage
            .create_exercise_with_debit_impl(new_exercise(user.id, "first"))
            .await
            .unwrap();
        assert_eq!(credits_of(&storage, user.id).await, 0);

        let err = storage
            .create_exercise_with_debit_impl(new_exercise(user.id, "second"))
            .await
            .unwrap_err();
        assert!(matches!(err, PortalError::InsufficientCredits(_)));

        let exercises = storage.list_user_exercises_impl(user.id).await.unwrap();
        assert_eq!(exercises.len(), 1);
        assert_eq!(exercises[0].title, "first");
        assert_eq!(credits_of(&storage, user.id).await, 0);
    }

    #[tokio::test]
    async fn test_corrected_at_is_stamped_once() {
        let storage = memory_storage().await;
        let user = create_student(&storage, "chloe", 2).await;
        let exercise = storage
            .create_exercise_with_debit_impl(new_exercise(user.id, "maths"))
            .await
            .unwrap();

        let pending = storage
            .update_correction_impl(
                exercise.id,
                CorrectionUpdate {
                    status: Some(CorrectionStatus::Pending),
                    ..Default::default()
                },
            )
            .await
            .unwrap()
            .unwrap();
        assert!(pending.corrected_at.is_none());

        let corrected = storage
            .update_correction_impl(
                exercise.id,
                CorrectionUpdate {
                    status: Some(CorrectionStatus::Corrected),
                    correction_text: Some("Bien".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap()
            .unwrap();
        let stamped = corrected.corrected_at.expect("stamped on first correction");

        tokio::time::sleep(std::time::Duration::from_millis(1100)).await;

        let again = storage
            .update_correction_impl(
                exercise.id,
                CorrectionUpdate {
                    status: Some(CorrectionStatus::Corrected),
                    correction_text: Some("Très bien".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap()
            .unwrap();
        assert_eq!(again.corrected_at, Some(stamped));
        assert_eq!(again.correction_text.as_deref(), Some("Très bien"));
    }

    #[tokio::test]
    async fn test_list_by_status_and_photo_update() {
        let storage = memory_storage().await;
        let user = create_student(&storage, "adam", 2).await;
        let a = storage
            .create_exercise_with_debit_impl(new_exercise(user.id, "a"))
            .await
            .unwrap();
        storage
            .create_exercise_with_debit_impl(new_exercise(user.id, "b"))
            .await
            .unwrap();
        storage
            .update_correction_impl(
                a.id,
                CorrectionUpdate {
                    status: Some(CorrectionStatus::Pending),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        let uncorrected = storage
            .list_exercises_with_pagination_impl(ExerciseListQuery {
                page: 1,
                size: 10,
                user_id: None,
                status: Some(CorrectionStatus::Uncorrected),
            })
            .await
            .unwrap();
        assert_eq!(uncorrected.pagination.total, 1);
        assert_eq!(uncorrected.items[0].title, "b");

        let updated = storage
            .update_exercise_photos_impl(
                a.id,
                PhotoUpdate {
                    statement_image: None,
                    answer_image: Some("answers/new.jpg".to_string()),
                },
            )
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.statement_image, "statements/a.jpg");
        assert_eq!(updated.answer_image.as_deref(), Some("answers/new.jpg"));

        assert!(storage.delete_exercise_impl(a.id).await.unwrap());
        assert!(!storage.delete_exercise_impl(a.id).await.unwrap());
    }
}
