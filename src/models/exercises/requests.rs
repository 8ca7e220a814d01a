use super::entities::CorrectionStatus;
use crate::models::common::PaginationQuery;
use serde::Deserialize;

/// 新练习（存储层），图片已归一化并落盘
#[derive(Debug, Clone)]
pub struct NewExercise {
    pub user_id: i64,
    pub title: String,
    pub text: Option<String>,
    pub statement_image: String,
    pub answer_image: Option<String>,
}

/// 批改更新（存储层），None 表示保持原值
#[derive(Debug, Clone, Default)]
pub struct CorrectionUpdate {
    pub status: Option<CorrectionStatus>,
    pub correction_text: Option<String>,
    pub correction_image: Option<String>,
    pub correction_audio: Option<String>,
}

/// 照片替换（存储层）
#[derive(Debug, Clone, Default)]
pub struct PhotoUpdate {
    pub statement_image: Option<String>,
    pub answer_image: Option<String>,
}

/// 按状态列出练习（HTTP 请求）
#[derive(Debug, Clone, Deserialize)]
pub struct ExerciseListParams {
    #[serde(flatten)]
    pub pagination: PaginationQuery,
    pub status: Option<CorrectionStatus>,
}

// 用于存储层的内部查询参数
#[derive(Debug, Clone)]
pub struct ExerciseListQuery {
    pub page: i64,
    pub size: i64,
    pub user_id: Option<i64>,
    pub status: Option<CorrectionStatus>,
}

impl From<ExerciseListParams> for ExerciseListQuery {
    fn from(params: ExerciseListParams) -> Self {
        Self {
            page: params.pagination.page,
            size: params.pagination.size,
            user_id: None,
            status: params.status,
        }
    }
}
