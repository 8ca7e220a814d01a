use super::entities::Exercise;
use crate::models::common::PaginationInfo;
use serde::Serialize;

// 学生面板：剩余次数与自己的练习
#[derive(Debug, Serialize)]
pub struct DashboardResponse {
    pub credits: i32,
    pub exercises: Vec<Exercise>,
}

#[derive(Debug, Serialize)]
pub struct ExerciseListResponse {
    pub items: Vec<Exercise>,
    pub pagination: PaginationInfo,
}
