use tracing::{debug, info};
use uuid::Uuid;

use super::AssignmentService;
use crate::errors::{AssignmentError, Result};
use crate::models::users::entities::Principal;
use crate::services::permissions;

/// 删除作业，提交与文件一并删除
pub async fn delete_assignment(
    service: &AssignmentService,
    principal: &Principal,
    id: Uuid,
) -> Result<()> {
    let assignment = service.load_assignment(id).await?;

    if !permissions::can_modify_assignment(principal, Some(&assignment)) {
        debug!("用户 {} 无权删除作业 {}", principal.id, id);
        return Err(AssignmentError::access_denied("只能删除自己创建的作业"));
    }

    if !service.storage().delete_assignment(id).await? {
        return Err(AssignmentError::not_found(format!("作业不存在: {id}")));
    }

    info!("作业已删除: id={}, by={}", id, principal.id);
    Ok(())
}
