use tracing::{debug, info};
use uuid::Uuid;

use super::SubmissionService;
use crate::errors::{AssignmentError, Result};
use crate::models::submissions::entities::{Submission, SubmissionStatus};
use crate::models::submissions::requests::GradeSubmissionRequest;
use crate::models::users::entities::Principal;
use crate::services::permissions;

/// 批改提交
///
/// 检查顺序：提交存在 → 作业存在 → 批改权限 → 状态 → 分数范围。
/// 写入是以 `status = submitted` 为条件的更新，并发批改只有一个成功。
pub async fn grade_submission(
    service: &SubmissionService,
    principal: &Principal,
    id: Uuid,
    req: GradeSubmissionRequest,
) -> Result<Submission> {
    let submission = service.load_submission(id).await?;
    let assignment = service.load_assignment(submission.assignment_id).await?;

    if !permissions::can_grade_submission(principal, Some(&submission), Some(&assignment)) {
        debug!("用户 {} 无权批改提交 {}", principal.id, id);
        return Err(AssignmentError::access_denied("没有批改该提交的权限"));
    }

    if submission.status != SubmissionStatus::Submitted {
        return Err(AssignmentError::invalid_state(format!(
            "当前状态为 {}，不能批改",
            submission.status
        )));
    }

    if let Some(score) = req.score {
        if score < 0 {
            return Err(AssignmentError::validation("分数不能为负数"));
        }
        if let Some(max_score) = assignment.max_score
            && score > max_score
        {
            return Err(AssignmentError::validation(format!(
                "分数不能超过满分 {max_score}"
            )));
        }
    }

    let graded = service
        .storage()
        .grade_submission(id, req.score, req.feedback, principal.id)
        .await?
        .ok_or_else(|| AssignmentError::invalid_state("提交已被批改"))?;

    info!(
        "提交已批改: submission={}, score={:?}, grader={}",
        id, graded.score, principal.id
    );
    Ok(graded)
}
