use tracing::{debug, info};
use uuid::Uuid;

use super::SubmissionService;
use crate::errors::{AssignmentError, Result};
use crate::models::submissions::entities::{Submission, SubmissionStatus};
use crate::models::submissions::requests::UpdateSubmissionRequest;
use crate::models::users::entities::Principal;
use crate::services::permissions;

/// 修改自己的提交，仅限未批改且未过截止时间
pub async fn update_submission(
    service: &SubmissionService,
    principal: &Principal,
    id: Uuid,
    req: UpdateSubmissionRequest,
) -> Result<Submission> {
    let submission = service.load_submission(id).await?;

    if !(permissions::can_access_submission(principal, Some(&submission))
        && submission.student_id == principal.id)
    {
        debug!("用户 {} 无权修改提交 {}", principal.id, id);
        return Err(AssignmentError::access_denied("只能修改自己的提交"));
    }

    if submission.status != SubmissionStatus::Submitted {
        return Err(AssignmentError::invalid_state(format!(
            "当前状态为 {}，不能修改",
            submission.status
        )));
    }

    let assignment = service.load_assignment(submission.assignment_id).await?;
    if assignment.is_past_due(chrono::Utc::now()) {
        return Err(AssignmentError::deadline_passed("作业已过截止时间"));
    }

    let updated = service
        .storage()
        .update_submission_content(id, req)
        .await?
        .ok_or_else(|| AssignmentError::invalid_state("提交已被批改，不能修改"))?;

    info!("提交已修改: submission={}, student={}", id, principal.id);
    Ok(updated)
}
