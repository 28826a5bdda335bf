use tracing::debug;

use super::SubmissionService;
use crate::errors::{AssignmentError, Result};
use crate::models::submissions::entities::Submission;
use crate::models::users::entities::Principal;
use crate::services::permissions;

/// 调用者自己的提交，按提交时间倒序
pub async fn list_for_student(
    service: &SubmissionService,
    principal: &Principal,
) -> Result<Vec<Submission>> {
    service
        .storage()
        .list_submissions_by_student(principal.id)
        .await
}

/// 调用者所建作业下待批改的提交
pub async fn list_pending_for_teacher(
    service: &SubmissionService,
    principal: &Principal,
) -> Result<Vec<Submission>> {
    if !permissions::is_teacher(principal) {
        debug!("用户 {} 无权查看待批改列表", principal.id);
        return Err(AssignmentError::access_denied("只有教师可以查看待批改的提交"));
    }

    service
        .storage()
        .list_pending_submissions_by_creator(principal.id)
        .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::assignments::entities::AssignmentStatus;
    use crate::models::submissions::entities::SubmissionStatus;
    use crate::models::submissions::requests::{CreateSubmissionRequest, GradeSubmissionRequest};
    use crate::services::assignments::test_support::*;

    #[tokio::test]
    async fn test_list_for_student_newest_first() {
        let storage = memory();
        let first = seed_assignment(&storage, 2, AssignmentStatus::Published, None, None).await;
        let second = seed_assignment(&storage, 2, AssignmentStatus::Published, None, None).await;
        let service = SubmissionService::new(storage);

        let s1 = service
            .submit(&student(4), first.id, CreateSubmissionRequest::default())
            .await
            .unwrap();
        tokio::time::sleep(std::time::Duration::from_millis(5)).await;
        let s2 = service
            .submit(&student(4), second.id, CreateSubmissionRequest::default())
            .await
            .unwrap();
        service
            .submit(&student(5), first.id, CreateSubmissionRequest::default())
            .await
            .unwrap();

        let mine = service.list_for_student(&student(4)).await.unwrap();
        let ids: Vec<_> = mine.iter().map(|s| s.id).collect();
        assert_eq!(ids, vec![s2.id, s1.id]);
    }

    #[tokio::test]
    async fn test_pending_only_for_own_assignments() {
        let storage = memory();
        let own = seed_assignment(&storage, 2, AssignmentStatus::Published, None, Some(100)).await;
        let other = seed_assignment(&storage, 3, AssignmentStatus::Published, None, None).await;
        let service = SubmissionService::new(storage);

        let graded = service
            .submit(&student(4), own.id, CreateSubmissionRequest::default())
            .await
            .unwrap();
        let pending = service
            .submit(&student(5), own.id, CreateSubmissionRequest::default())
            .await
            .unwrap();
        service
            .submit(&student(4), other.id, CreateSubmissionRequest::default())
            .await
            .unwrap();
        service
            .grade(
                &teacher(2),
                graded.id,
                GradeSubmissionRequest {
                    score: Some(90),
                    feedback: None,
                },
            )
            .await
            .unwrap();

        let list = service.list_pending_for_teacher(&teacher(2)).await.unwrap();
        assert_eq!(list.len(), 1);
        assert_eq!(list[0].id, pending.id);
        assert_eq!(list[0].status, SubmissionStatus::Submitted);

        let err = service
            .list_pending_for_teacher(&student(4))
            .await
            .unwrap_err();
        assert!(matches!(err, AssignmentError::AccessDenied(_)));
    }
}
