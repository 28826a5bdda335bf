use std::collections::HashMap;

use tracing::debug;
use uuid::Uuid;

use super::AssignmentService;
use crate::errors::{AssignmentError, Result};
use crate::models::assignments::entities::{Assignment, AssignmentStatus};
use crate::models::assignments::requests::{AssignmentListParams, AssignmentListQuery};
use crate::models::assignments::responses::{
    AssignmentListResponse, StudentAssignment, StudentAssignmentListResponse,
};
use crate::models::submissions::entities::Submission;
use crate::models::{PaginatedResponse, PaginationInfo};
use crate::models::users::entities::Principal;
use crate::services::permissions;

/// 按调用者可见范围列出作业
pub async fn list_visible(
    service: &AssignmentService,
    principal: &Principal,
    params: AssignmentListParams,
) -> Result<AssignmentListResponse> {
    let (page, size) = service.config.clamp_page(params.page, params.size);

    let status = if permissions::is_teacher(principal) {
        params.status
    } else {
        // 非教师只能看到已发布的作业
        match params.status {
            None | Some(AssignmentStatus::Published) => Some(AssignmentStatus::Published),
            Some(_) => {
                return Ok(AssignmentListResponse {
                    items: Vec::new(),
                    pagination: PaginationInfo::new(page, size, 0),
                });
            }
        }
    };

    let query = AssignmentListQuery {
        page,
        size,
        creator_id: params.creator_id,
        status,
        search: params.search,
    };

    service
        .storage()
        .list_assignments_with_pagination(query)
        .await
}

/// 学生的作业列表：已发布的作业，附带本人的提交状态
pub async fn list_my_assignments(
    service: &AssignmentService,
    principal: &Principal,
    params: AssignmentListParams,
) -> Result<StudentAssignmentListResponse> {
    if !permissions::is_student_capable(principal) {
        debug!("用户 {} 无权查看学生作业列表", principal.id);
        return Err(AssignmentError::access_denied("只有学生可以查看自己的作业列表"));
    }

    let (page, size) = service.config.clamp_page(params.page, params.size);
    let query = AssignmentListQuery {
        page,
        size,
        creator_id: params.creator_id,
        status: Some(AssignmentStatus::Published),
        search: params.search,
    };
    let assignments = service
        .storage()
        .list_assignments_with_pagination(query)
        .await?;

    let submissions: HashMap<Uuid, Submission> = service
        .storage()
        .list_submissions_by_student(principal.id)
        .await?
        .into_iter()
        .map(|s| (s.assignment_id, s))
        .collect();

    let items = assignments
        .items
        .into_iter()
        .map(|a| {
            let submission = submissions.get(&a.id);
            StudentAssignment::new(a, submission)
        })
        .collect();

    Ok(PaginatedResponse {
        items,
        pagination: assignments.pagination,
    })
}

/// 即将截止的已发布作业（仅教师）
pub async fn list_due_soon(
    service: &AssignmentService,
    principal: &Principal,
    hours: Option<i64>,
) -> Result<Vec<Assignment>> {
    if !permissions::is_teacher(principal) {
        debug!("用户 {} 无权查看即将截止的作业", principal.id);
        return Err(AssignmentError::access_denied("只有教师可以查看即将截止的作业"));
    }

    let hours = hours.unwrap_or(service.config.due_soon_hours);
    if hours <= 0 {
        return Err(AssignmentError::validation("时间窗口必须为正数"));
    }

    let now = chrono::Utc::now();
    service
        .storage()
        .list_published_assignments_due_between(now, now + chrono::Duration::hours(hours))
        .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::assignments::test_support::*;

    #[tokio::test]
    async fn test_student_sees_only_published() {
        let storage = memory();
        seed_assignment(&storage, 2, AssignmentStatus::Draft, None, None).await;
        seed_assignment(&storage, 2, AssignmentStatus::Published, None, None).await;
        seed_assignment(&storage, 2, AssignmentStatus::Closed, None, None).await;
        let service = AssignmentService::new(storage);

        let visible = service
            .list_visible(&student(4), AssignmentListParams::default())
            .await
            .unwrap();
        assert_eq!(visible.pagination.total, 1);
        assert!(
            visible
                .items
                .iter()
                .all(|a| a.status == AssignmentStatus::Published)
        );

        let drafts = service
            .list_visible(
                &student(4),
                AssignmentListParams {
                    status: Some(AssignmentStatus::Draft),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert!(drafts.items.is_empty());

        let all = service
            .list_visible(&teacher(3), AssignmentListParams::default())
            .await
            .unwrap();
        assert_eq!(all.pagination.total, 3);
    }

    #[tokio::test]
    async fn test_my_assignments_carry_own_submission() {
        use crate::models::submissions::entities::SubmissionStatus;
        use crate::models::submissions::requests::CreateSubmissionRequest;

        let storage = memory();
        let done = seed_assignment(&storage, 2, AssignmentStatus::Published, None, None).await;
        let open = seed_assignment(&storage, 2, AssignmentStatus::Published, None, None).await;
        seed_assignment(&storage, 2, AssignmentStatus::Draft, None, None).await;
        let mine = storage
            .create_submission(done.id, 4, CreateSubmissionRequest::default())
            .await
            .unwrap();
        storage
            .create_submission(open.id, 5, CreateSubmissionRequest::default())
            .await
            .unwrap();
        let service = AssignmentService::new(storage);

        let list = service
            .list_my_assignments(&student(4), AssignmentListParams::default())
            .await
            .unwrap();
        assert_eq!(list.pagination.total, 2);

        let done_view = list.items.iter().find(|v| v.assignment.id == done.id).unwrap();
        assert_eq!(done_view.submission_id, Some(mine.id));
        assert_eq!(done_view.submission_status, Some(SubmissionStatus::Submitted));

        // 其他学生的提交不会出现在这里
        let open_view = list.items.iter().find(|v| v.assignment.id == open.id).unwrap();
        assert!(open_view.submission_id.is_none());
        assert!(open_view.submission_status.is_none());

        let nobody = Principal::new(9, std::iter::empty());
        let err = service
            .list_my_assignments(&nobody, AssignmentListParams::default())
            .await
            .unwrap_err();
        assert!(matches!(err, AssignmentError::AccessDenied(_)));
    }

    #[tokio::test]
    async fn test_huge_page_number_returns_empty_page() {
        let storage = memory();
        seed_assignment(&storage, 2, AssignmentStatus::Published, None, None).await;
        let service = AssignmentService::new(storage);

        let page = service
            .list_visible(
                &student(4),
                AssignmentListParams {
                    page: Some(u64::MAX),
                    size: Some(100),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert!(page.items.is_empty());
        assert_eq!(page.pagination.total, 1);
        assert_eq!(page.pagination.page_size, 100);
    }

    #[tokio::test]
    async fn test_due_soon_window() {
        let storage = memory();
        let soon = seed_assignment(&storage, 2, AssignmentStatus::Published, Some(5), None).await;
        seed_assignment(&storage, 2, AssignmentStatus::Published, Some(100), None).await;
        seed_assignment(&storage, 2, AssignmentStatus::Published, Some(-1), None).await;
        seed_assignment(&storage, 2, AssignmentStatus::Draft, Some(5), None).await;
        let service = AssignmentService::new(storage);

        let due = service.list_due_soon(&teacher(2), Some(24)).await.unwrap();
        assert_eq!(due.len(), 1);
        assert_eq!(due[0].id, soon.id);

        let err = service.list_due_soon(&student(4), None).await.unwrap_err();
        assert!(matches!(err, AssignmentError::AccessDenied(_)));

        let err = service.list_due_soon(&teacher(2), Some(0)).await.unwrap_err();
        assert!(matches!(err, AssignmentError::Validation(_)));
    }
}
