use serde::{Serialize, Serializer};
use uuid::Uuid;

use crate::models::PaginatedResponse;
use crate::models::assignments::entities::Assignment;
use crate::models::submissions::entities::{Submission, SubmissionStatus};

pub type AssignmentListResponse = PaginatedResponse<Assignment>;

/// 学生视角的作业，附带本人的提交状态（未提交时均为空）
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StudentAssignment {
    #[serde(flatten)]
    pub assignment: Assignment,
    pub submission_id: Option<Uuid>,
    pub submission_status: Option<SubmissionStatus>,
    pub score: Option<i32>,
    pub submitted_at: Option<chrono::DateTime<chrono::Utc>>,
    pub graded_at: Option<chrono::DateTime<chrono::Utc>>,
}

impl StudentAssignment {
    pub fn new(assignment: Assignment, submission: Option<&Submission>) -> Self {
        Self {
            assignment,
            submission_id: submission.map(|s| s.id),
            submission_status: submission.map(|s| s.status),
            score: submission.and_then(|s| s.score),
            submitted_at: submission.map(|s| s.submitted_at),
            graded_at: submission.and_then(|s| s.graded_at),
        }
    }
}

pub type StudentAssignmentListResponse = PaginatedResponse<StudentAssignment>;

/// 作业统计
///
/// `average_score` 保留原始精度，序列化时四舍五入到两位小数。
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AssignmentStatistics {
    pub assignment_id: Uuid,
    pub title: String,
    pub max_score: Option<i32>,
    pub total_submissions: u64,
    pub graded_submissions: u64,
    pub pending_submissions: u64,
    #[serde(serialize_with = "serialize_two_decimals")]
    pub average_score: f64,
    pub min_score: Option<i32>,
    pub max_achieved_score: Option<i32>,
}

fn serialize_two_decimals<S>(value: &f64, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_f64((value * 100.0).round() / 100.0)
}
