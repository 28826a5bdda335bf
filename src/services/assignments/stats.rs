use tracing::debug;
use uuid::Uuid;

use super::AssignmentService;
use crate::errors::{AssignmentError, Result};
use crate::models::assignments::entities::Assignment;
use crate::models::assignments::responses::AssignmentStatistics;
use crate::models::submissions::entities::{Submission, SubmissionStatus};
use crate::models::users::entities::Principal;
use crate::services::permissions;

/// 作业统计，仅作业创建者与管理员可见
pub async fn get_statistics(
    service: &AssignmentService,
    principal: &Principal,
    id: Uuid,
) -> Result<AssignmentStatistics> {
    let assignment = service.load_assignment(id).await?;

    if !permissions::can_modify_assignment(principal, Some(&assignment)) {
        debug!("用户 {} 无权查看作业 {} 的统计", principal.id, id);
        return Err(AssignmentError::access_denied("没有查看该作业统计的权限"));
    }

    let submissions = service
        .storage()
        .list_submissions_by_assignment(id)
        .await?;

    Ok(compute_statistics(&assignment, &submissions))
}

pub fn compute_statistics(
    assignment: &Assignment,
    submissions: &[Submission],
) -> AssignmentStatistics {
    let total = submissions.len() as u64;
    let graded: Vec<&Submission> = submissions
        .iter()
        .filter(|s| s.status == SubmissionStatus::Graded)
        .collect();
    let scores: Vec<i32> = graded.iter().filter_map(|s| s.score).collect();

    let average_score = if scores.is_empty() {
        0.0
    } else {
        scores.iter().map(|&s| f64::from(s)).sum::<f64>() / scores.len() as f64
    };

    AssignmentStatistics {
        assignment_id: assignment.id,
        title: assignment.title.clone(),
        max_score: assignment.max_score,
        total_submissions: total,
        graded_submissions: graded.len() as u64,
        pending_submissions: total - graded.len() as u64,
        average_score,
        min_score: scores.iter().copied().min(),
        max_achieved_score: scores.iter().copied().max(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::assignments::entities::AssignmentStatus;
    use crate::models::submissions::requests::CreateSubmissionRequest;
    use crate::services::assignments::test_support::*;

    #[tokio::test]
    async fn test_statistics_over_graded_submissions() {
        let storage = memory();
        let a = seed_assignment(&storage, 2, AssignmentStatus::Published, None, Some(100)).await;
        let mut ids = Vec::new();
        for student_id in [4, 5, 6] {
            let s = storage
                .create_submission(a.id, student_id, CreateSubmissionRequest::default())
                .await
                .unwrap();
            ids.push(s.id);
        }
        storage
            .grade_submission(ids[0], Some(80), None, 2)
            .await
            .unwrap();
        storage
            .grade_submission(ids[1], Some(90), None, 2)
            .await
            .unwrap();
        let service = AssignmentService::new(storage);

        let stats = service.statistics(&teacher(2), a.id).await.unwrap();
        assert_eq!(stats.total_submissions, 3);
        assert_eq!(stats.graded_submissions, 2);
        assert_eq!(stats.pending_submissions, 1);
        assert!((stats.average_score - 85.0).abs() < f64::EPSILON);
        assert_eq!(stats.min_score, Some(80));
        assert_eq!(stats.max_achieved_score, Some(90));
        assert_eq!(stats.max_score, Some(100));
        assert_eq!(stats.title, "Essay");
    }

    #[tokio::test]
    async fn test_ten_submissions_four_graded() {
        let storage = memory();
        let a = seed_assignment(&storage, 2, AssignmentStatus::Published, None, Some(100)).await;
        let mut ids = Vec::new();
        for student_id in 10..20 {
            let s = storage
                .create_submission(a.id, student_id, CreateSubmissionRequest::default())
                .await
                .unwrap();
            ids.push(s.id);
        }
        for (id, score) in ids.iter().zip([70, 80, 90, 100]) {
            storage
                .grade_submission(*id, Some(score), None, 2)
                .await
                .unwrap();
        }
        let service = AssignmentService::new(storage);

        let stats = service.statistics(&admin(), a.id).await.unwrap();
        assert_eq!(stats.total_submissions, 10);
        assert_eq!(stats.graded_submissions, 4);
        assert_eq!(stats.pending_submissions, 6);
        assert!((stats.average_score - 85.0).abs() < f64::EPSILON);
        assert_eq!(stats.min_score, Some(70));
        assert_eq!(stats.max_achieved_score, Some(100));
    }

    #[tokio::test]
    async fn test_statistics_require_ownership() {
        let storage = memory();
        let a = seed_assignment(&storage, 2, AssignmentStatus::Published, None, None).await;
        let service = AssignmentService::new(storage);

        let err = service.statistics(&teacher(3), a.id).await.unwrap_err();
        assert!(matches!(err, AssignmentError::AccessDenied(_)));
        assert!(service.statistics(&admin(), a.id).await.is_ok());
    }

    #[tokio::test]
    async fn test_empty_statistics() {
        let storage = memory();
        let a = seed_assignment(&storage, 2, AssignmentStatus::Draft, None, None).await;
        let stats = compute_statistics(&a, &[]);
        assert_eq!(stats.total_submissions, 0);
        assert_eq!(stats.average_score, 0.0);
        assert_eq!(stats.min_score, None);
        assert_eq!(stats.max_achieved_score, None);
    }
}
