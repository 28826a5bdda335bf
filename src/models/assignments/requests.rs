use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::models::assignments::entities::AssignmentStatus;

/// 创建作业请求
#[derive(Debug, Clone, Deserialize)]
pub struct CreateAssignmentRequest {
    pub title: String,
    pub description: Option<String>,
    pub due_date: Option<DateTime<Utc>>, // ISO 8601 格式，如 "2026-01-24T12:00:00Z"
    pub max_score: Option<i32>,
    pub status: Option<AssignmentStatus>,
}

/// 更新作业请求，未提供的字段保持不变
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateAssignmentRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub due_date: Option<DateTime<Utc>>,
    pub max_score: Option<i32>,
    pub status: Option<AssignmentStatus>,
}

/// 变更作业状态请求
#[derive(Debug, Clone, Deserialize)]
pub struct ChangeStatusRequest {
    pub status: AssignmentStatus,
}

/// 作业列表查询参数（HTTP 请求）
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AssignmentListParams {
    pub page: Option<u64>,
    pub size: Option<u64>,
    pub creator_id: Option<i64>,
    pub status: Option<AssignmentStatus>,
    pub search: Option<String>,
}

/// 即将截止作业查询参数
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DueSoonParams {
    pub hours: Option<i64>,
}

// 用于存储层的内部查询参数
#[derive(Debug, Clone, Default)]
pub struct AssignmentListQuery {
    pub page: u64,
    pub size: u64,
    pub creator_id: Option<i64>,
    pub status: Option<AssignmentStatus>,
    pub search: Option<String>,
}
