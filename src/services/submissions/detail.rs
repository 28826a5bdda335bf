use tracing::debug;
use uuid::Uuid;

use super::SubmissionService;
use crate::errors::{AssignmentError, Result};
use crate::models::submissions::entities::Submission;
use crate::models::submissions::responses::SubmissionResult;
use crate::models::users::entities::Principal;
use crate::services::permissions;

pub async fn get_submission(
    service: &SubmissionService,
    principal: &Principal,
    id: Uuid,
) -> Result<Submission> {
    let submission = service.load_submission(id).await?;

    if !permissions::can_access_submission(principal, Some(&submission)) {
        debug!("用户 {} 无权查看提交 {}", principal.id, id);
        return Err(AssignmentError::access_denied("没有查看该提交的权限"));
    }

    Ok(submission)
}

/// 提交结果，附带作业标题与满分。仅提交者、作业创建者和管理员可查看
pub async fn get_submission_result(
    service: &SubmissionService,
    principal: &Principal,
    id: Uuid,
) -> Result<SubmissionResult> {
    let submission = service.load_submission(id).await?;
    let assignment = service.load_assignment(submission.assignment_id).await?;

    let is_submitter = submission.student_id == principal.id;
    if !(is_submitter || permissions::can_modify_assignment(principal, Some(&assignment))) {
        debug!("用户 {} 无权查看提交结果 {}", principal.id, id);
        return Err(AssignmentError::access_denied(
            "只能查看自己的提交或自己创建的作业的提交",
        ));
    }

    Ok(SubmissionResult::new(submission, &assignment))
}

/// 调用者自己在某作业下的提交，没有提交时返回 None
pub async fn get_my_submission(
    service: &SubmissionService,
    principal: &Principal,
    assignment_id: Uuid,
) -> Result<Option<Submission>> {
    let assignment = service.load_assignment(assignment_id).await?;

    if !permissions::can_access_assignment(principal, Some(&assignment)) {
        return Err(AssignmentError::access_denied("没有访问该作业的权限"));
    }

    service
        .storage()
        .get_submission_by_assignment_and_student(assignment_id, principal.id)
        .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::assignments::entities::AssignmentStatus;
    use crate::models::submissions::requests::CreateSubmissionRequest;
    use crate::services::assignments::test_support::*;

    #[tokio::test]
    async fn test_get_respects_ownership() {
        let storage = memory();
        let a = seed_assignment(&storage, 2, AssignmentStatus::Published, None, None).await;
        let service = SubmissionService::new(storage);
        let s = service
            .submit(&student(4), a.id, CreateSubmissionRequest::default())
            .await
            .unwrap();

        assert_eq!(service.get(&student(4), s.id).await.unwrap().id, s.id);
        assert!(service.get(&teacher(9), s.id).await.is_ok());
        assert!(service.get(&admin(), s.id).await.is_ok());

        let err = service.get(&student(5), s.id).await.unwrap_err();
        assert!(matches!(err, AssignmentError::AccessDenied(_)));
    }

    #[tokio::test]
    async fn test_not_found_before_access_denied() {
        let service = SubmissionService::new(memory());
        let err = service.get(&student(5), Uuid::new_v4()).await.unwrap_err();
        assert!(matches!(err, AssignmentError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_submission_result() {
        let storage = memory();
        let a = seed_assignment(&storage, 2, AssignmentStatus::Published, None, Some(100)).await;
        let service = SubmissionService::new(storage);
        let s = service
            .submit(&student(4), a.id, CreateSubmissionRequest::default())
            .await
            .unwrap();

        let result = service.get_result(&student(4), s.id).await.unwrap();
        assert_eq!(result.submission.id, s.id);
        assert_eq!(result.assignment_title, "Essay");
        assert_eq!(result.max_score, Some(100));

        assert!(service.get_result(&teacher(2), s.id).await.is_ok());
        assert!(service.get_result(&admin(), s.id).await.is_ok());

        // 其他教师虽能查看提交，但不能查看结果
        for outsider in [teacher(9), student(5)] {
            let err = service.get_result(&outsider, s.id).await.unwrap_err();
            assert!(matches!(err, AssignmentError::AccessDenied(_)));
        }

        let err = service.get_result(&student(5), Uuid::new_v4()).await.unwrap_err();
        assert!(matches!(err, AssignmentError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_get_mine() {
        let storage = memory();
        let a = seed_assignment(&storage, 2, AssignmentStatus::Published, None, None).await;
        let service = SubmissionService::new(storage);

        assert!(service.get_mine(&student(4), a.id).await.unwrap().is_none());

        let s = service
            .submit(&student(4), a.id, CreateSubmissionRequest::default())
            .await
            .unwrap();
        let mine = service.get_mine(&student(4), a.id).await.unwrap();
        assert_eq!(mine.map(|m| m.id), Some(s.id));
        assert!(service.get_mine(&student(5), a.id).await.unwrap().is_none());
    }
}
