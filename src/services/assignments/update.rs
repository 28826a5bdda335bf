use tracing::{debug, info};
use uuid::Uuid;

use super::AssignmentService;
use super::create::validate_fields;
use crate::errors::{AssignmentError, Result};
use crate::models::assignments::entities::{Assignment, AssignmentStatus};
use crate::models::assignments::requests::UpdateAssignmentRequest;
use crate::models::users::entities::Principal;
use crate::services::permissions;

/// 修改作业字段，包括状态，不受状态流转表约束
pub async fn update_assignment(
    service: &AssignmentService,
    principal: &Principal,
    id: Uuid,
    mut req: UpdateAssignmentRequest,
) -> Result<Assignment> {
    let assignment = service.load_assignment(id).await?;

    if !permissions::can_modify_assignment(principal, Some(&assignment)) {
        debug!("用户 {} 无权修改作业 {}", principal.id, id);
        return Err(AssignmentError::access_denied("只能修改自己创建的作业"));
    }

    validate_fields(req.title.as_deref(), req.max_score)?;
    req.title = req.title.map(|t| t.trim().to_string());

    let updated = service
        .storage()
        .update_assignment(id, req)
        .await?
        .ok_or_else(|| AssignmentError::not_found(format!("作业不存在: {id}")))?;

    info!("作业已更新: id={}, by={}", id, principal.id);
    Ok(updated)
}

/// 按流转表切换作业状态
pub async fn change_status(
    service: &AssignmentService,
    principal: &Principal,
    id: Uuid,
    status: AssignmentStatus,
) -> Result<Assignment> {
    let assignment = service.load_assignment(id).await?;

    if !permissions::can_modify_assignment(principal, Some(&assignment)) {
        debug!("用户 {} 无权变更作业 {} 的状态", principal.id, id);
        return Err(AssignmentError::access_denied("只能变更自己创建的作业"));
    }

    if !assignment.status.can_transition_to(status) {
        return Err(AssignmentError::invalid_state(format!(
            "作业状态不能从 {} 变更为 {}",
            assignment.status, status
        )));
    }

    if assignment.status == status {
        return Ok(assignment);
    }

    // 条件更新，期间状态被他人修改则视为状态冲突
    let updated = service
        .storage()
        .transition_assignment_status(id, assignment.status, status)
        .await?
        .ok_or_else(|| AssignmentError::invalid_state("作业状态已被修改，请刷新后重试"))?;

    info!(
        "作业状态已变更: id={}, {} -> {}",
        id, assignment.status, updated.status
    );
    Ok(updated)
}
