use tracing::{debug, info};
use uuid::Uuid;

use super::SubmissionService;
use crate::errors::{AssignmentError, Result};
use crate::models::submissions::entities::Submission;
use crate::models::submissions::requests::CreateSubmissionRequest;
use crate::models::users::entities::Principal;
use crate::services::permissions;

pub async fn submit(
    service: &SubmissionService,
    principal: &Principal,
    assignment_id: Uuid,
    req: CreateSubmissionRequest,
) -> Result<Submission> {
    let assignment = service.load_assignment(assignment_id).await?;

    if !(permissions::can_access_assignment(principal, Some(&assignment))
        && permissions::is_student_capable(principal))
    {
        debug!("用户 {} 无权提交作业 {}", principal.id, assignment_id);
        return Err(AssignmentError::access_denied("没有提交该作业的权限"));
    }

    if assignment.is_past_due(chrono::Utc::now()) {
        return Err(AssignmentError::deadline_passed("作业已过截止时间"));
    }

    if service
        .storage()
        .submission_exists(assignment_id, principal.id)
        .await?
    {
        return Err(AssignmentError::duplicate_submission(
            "该作业已提交，请修改已有提交",
        ));
    }

    // 并发提交由存储层唯一约束兜底，冲突同样返回 DuplicateSubmission
    let submission = service
        .storage()
        .create_submission(assignment_id, principal.id, req)
        .await?;

    info!(
        "作业已提交: submission={}, assignment={}, student={}",
        submission.id, assignment_id, principal.id
    );

    Ok(submission)
}
