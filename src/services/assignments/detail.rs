use tracing::debug;
use uuid::Uuid;

use super::AssignmentService;
use crate::errors::{AssignmentError, Result};
use crate::models::assignments::entities::Assignment;
use crate::models::files::entities::AssignmentFile;
use crate::models::submissions::entities::Submission;
use crate::models::users::entities::Principal;
use crate::services::permissions;

pub async fn get_assignment(
    service: &AssignmentService,
    principal: &Principal,
    id: Uuid,
) -> Result<Assignment> {
    let assignment = service.load_assignment(id).await?;

    if !permissions::can_access_assignment(principal, Some(&assignment)) {
        debug!("用户 {} 无权查看作业 {}", principal.id, id);
        return Err(AssignmentError::access_denied("没有查看该作业的权限"));
    }

    Ok(assignment)
}

/// 列出作业下的提交，学生只能看到自己的
pub async fn list_submissions(
    service: &AssignmentService,
    principal: &Principal,
    id: Uuid,
) -> Result<Vec<Submission>> {
    let assignment = get_assignment(service, principal, id).await?;

    let submissions = service
        .storage()
        .list_submissions_by_assignment(assignment.id)
        .await?;

    Ok(submissions
        .into_iter()
        .filter(|s| permissions::can_access_submission(principal, Some(s)))
        .collect())
}

pub async fn list_files(
    service: &AssignmentService,
    principal: &Principal,
    id: Uuid,
) -> Result<Vec<AssignmentFile>> {
    let assignment = get_assignment(service, principal, id).await?;
    service.storage().list_assignment_files(assignment.id).await
}
