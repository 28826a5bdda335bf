//! 数据模型定义
//!
//! 业务实体、请求与响应结构，以及统一的 API 响应码。

pub mod assignments;
pub mod common;
pub mod files;
pub mod submissions;
pub mod users;

pub use common::pagination::{PaginatedResponse, PaginationInfo};
pub use common::response::ApiResponse;

use serde::{Deserialize, Serialize};

/// 程序启动时间
#[derive(Debug, Clone)]
pub struct AppStartTime {
    pub start_datetime: chrono::DateTime<chrono::Utc>,
}

/// API 响应码
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorCode {
    Success = 0,

    // 通用错误
    BadRequest = 1000,
    Unauthorized = 1001,
    Forbidden = 1003,
    NotFound = 1004,
    InternalServerError = 1005,
    ServiceUnavailable = 1006,
    Conflict = 1009,

    // 作业相关
    AssignmentNotFound = 3000,
    AssignmentInvalidState = 3001,

    // 提交相关
    SubmissionNotFound = 4000,
    SubmissionAlreadyExists = 4001,
    SubmissionDeadlinePassed = 4002,
    SubmissionInvalidState = 4003,
    SubmissionScoreInvalid = 4004,

    // 文件相关
    FileNotFound = 5000,
}
