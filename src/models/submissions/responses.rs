use serde::Serialize;

use crate::models::assignments::entities::Assignment;
use crate::models::submissions::entities::Submission;

/// 提交结果：提交本身加上所属作业的标题与满分
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SubmissionResult {
    #[serde(flatten)]
    pub submission: Submission,
    pub assignment_title: String,
    pub max_score: Option<i32>,
}

impl SubmissionResult {
    pub fn new(submission: Submission, assignment: &Assignment) -> Self {
        Self {
            submission,
            assignment_title: assignment.title.clone(),
            max_score: assignment.max_score,
        }
    }
}

/// 提交列表响应
#[derive(Debug, Clone, Serialize)]
pub struct SubmissionListResponse {
    pub items: Vec<Submission>,
}

impl From<Vec<Submission>> for SubmissionListResponse {
    fn from(items: Vec<Submission>) -> Self {
        Self { items }
    }
}
