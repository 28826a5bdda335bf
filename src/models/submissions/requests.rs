use serde::Deserialize;

/// 提交作业请求
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateSubmissionRequest {
    pub content: Option<String>,
    pub file_path: Option<String>,
}

/// 修改提交请求。`file_path` 为空时保留原文件
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateSubmissionRequest {
    pub content: Option<String>,
    pub file_path: Option<String>,
}

/// 批改请求
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GradeSubmissionRequest {
    pub score: Option<i32>,
    pub feedback: Option<String>,
}
