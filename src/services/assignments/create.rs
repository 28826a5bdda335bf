use tracing::{debug, info};

use super::AssignmentService;
use crate::errors::{AssignmentError, Result};
use crate::models::assignments::entities::Assignment;
use crate::models::assignments::requests::CreateAssignmentRequest;
use crate::models::users::entities::Principal;
use crate::services::permissions;

/// 校验标题与满分
pub(crate) fn validate_fields(title: Option<&str>, max_score: Option<i32>) -> Result<()> {
    if let Some(title) = title
        && title.trim().is_empty()
    {
        return Err(AssignmentError::validation("作业标题不能为空"));
    }
    if let Some(max_score) = max_score
        && max_score < 0
    {
        return Err(AssignmentError::validation("满分不能为负数"));
    }
    Ok(())
}

pub async fn create_assignment(
    service: &AssignmentService,
    principal: &Principal,
    mut req: CreateAssignmentRequest,
) -> Result<Assignment> {
    if !permissions::is_teacher(principal) {
        debug!("用户 {} 无权创建作业", principal.id);
        return Err(AssignmentError::access_denied("只有教师可以创建作业"));
    }

    validate_fields(Some(&req.title), req.max_score)?;
    req.title = req.title.trim().to_string();

    let assignment = service
        .storage()
        .create_assignment(principal.id, req)
        .await?;

    info!(
        "作业已创建: id={}, creator={}, status={}",
        assignment.id, assignment.creator_id, assignment.status
    );

    Ok(assignment)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::assignments::entities::AssignmentStatus;
    use crate::services::assignments::test_support::*;

    fn request(title: &str, max_score: Option<i32>) -> CreateAssignmentRequest {
        CreateAssignmentRequest {
            title: title.to_string(),
            description: None,
            due_date: None,
            max_score,
            status: None,
        }
    }

    #[tokio::test]
    async fn test_teacher_creates_draft_by_default() {
        let service = AssignmentService::new(memory());
        let assignment = service
            .create(&teacher(2), request("  Essay  ", Some(100)))
            .await
            .unwrap();
        assert_eq!(assignment.creator_id, 2);
        assert_eq!(assignment.status, AssignmentStatus::Draft);
        assert_eq!(assignment.title, "Essay");
    }

    #[tokio::test]
    async fn test_direct_publish_allowed() {
        let service = AssignmentService::new(memory());
        let mut req = request("Essay", None);
        req.status = Some(AssignmentStatus::Published);
        let assignment = service.create(&teacher(2), req).await.unwrap();
        assert_eq!(assignment.status, AssignmentStatus::Published);
    }

    #[tokio::test]
    async fn test_student_cannot_create() {
        let service = AssignmentService::new(memory());
        let err = service
            .create(&student(4), request("Essay", None))
            .await
            .unwrap_err();
        assert!(matches!(err, AssignmentError::AccessDenied(_)));
    }

    #[tokio::test]
    async fn test_rejects_negative_max_score_and_blank_title() {
        let service = AssignmentService::new(memory());
        let err = service
            .create(&teacher(2), request("Essay", Some(-1)))
            .await
            .unwrap_err();
        assert!(matches!(err, AssignmentError::Validation(_)));

        let err = service
            .create(&teacher(2), request("   ", None))
            .await
            .unwrap_err();
        assert!(matches!(err, AssignmentError::Validation(_)));
    }
}
