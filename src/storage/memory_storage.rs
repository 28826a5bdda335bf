//! 内存存储实现
//!
//! 基于 DashMap 的进程内存储，用于测试和本地运行。
//! 重复提交由 `(assignment_id, student_id)` 索引的 entry 锁保证原子性，
//! 批改与修改在分片写锁内完成检查与更新。

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use uuid::Uuid;

use crate::errors::{AssignmentError, Result};
use crate::models::{
    PaginationInfo,
    assignments::{
        entities::{Assignment, AssignmentStatus},
        requests::{AssignmentListQuery, CreateAssignmentRequest, UpdateAssignmentRequest},
        responses::AssignmentListResponse,
    },
    files::{entities::AssignmentFile, requests::RegisterFileRequest},
    submissions::{
        entities::{Submission, SubmissionStatus},
        requests::{CreateSubmissionRequest, UpdateSubmissionRequest},
    },
};
use crate::storage::Storage;

#[derive(Default)]
pub struct MemoryStorage {
    assignments: DashMap<Uuid, Assignment>,
    submissions: DashMap<Uuid, Submission>,
    /// (作业 ID, 学生 ID) -> 提交 ID
    submission_keys: DashMap<(Uuid, i64), Uuid>,
    files: DashMap<Uuid, AssignmentFile>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    fn sorted_by_submitted_desc(mut items: Vec<Submission>) -> Vec<Submission> {
        items.sort_by(|a, b| b.submitted_at.cmp(&a.submitted_at));
        items
    }
}

#[async_trait::async_trait]
impl Storage for MemoryStorage {
    async fn create_assignment(
        &self,
        creator_id: i64,
        req: CreateAssignmentRequest,
    ) -> Result<Assignment> {
        let now = Utc::now();
        let assignment = Assignment {
            id: Uuid::new_v4(),
            title: req.title,
            description: req.description,
            creator_id,
            due_date: req.due_date,
            max_score: req.max_score,
            status: req.status.unwrap_or_default(),
            created_at: now,
            updated_at: now,
        };
        self.assignments.insert(assignment.id, assignment.clone());
        Ok(assignment)
    }

    async fn get_assignment_by_id(&self, id: Uuid) -> Result<Option<Assignment>> {
        Ok(self.assignments.get(&id).map(|a| a.value().clone()))
    }

    async fn update_assignment(
        &self,
        id: Uuid,
        update: UpdateAssignmentRequest,
    ) -> Result<Option<Assignment>> {
        let Some(mut assignment) = self.assignments.get_mut(&id) else {
            return Ok(None);
        };

        if let Some(title) = update.title {
            assignment.title = title;
        }
        if let Some(description) = update.description {
            assignment.description = Some(description);
        }
        if let Some(due_date) = update.due_date {
            assignment.due_date = Some(due_date);
        }
        if let Some(max_score) = update.max_score {
            assignment.max_score = Some(max_score);
        }
        if let Some(status) = update.status {
            assignment.status = status;
        }
        assignment.updated_at = Utc::now();

        Ok(Some(assignment.clone()))
    }

    async fn transition_assignment_status(
        &self,
        id: Uuid,
        from: AssignmentStatus,
        to: AssignmentStatus,
    ) -> Result<Option<Assignment>> {
        let Some(mut assignment) = self.assignments.get_mut(&id) else {
            return Ok(None);
        };
        if assignment.status != from {
            return Ok(None);
        }
        assignment.status = to;
        assignment.updated_at = Utc::now();
        Ok(Some(assignment.clone()))
    }

    async fn delete_assignment(&self, id: Uuid) -> Result<bool> {
        if self.assignments.remove(&id).is_none() {
            return Ok(false);
        }
        self.submissions.retain(|_, s| s.assignment_id != id);
        self.submission_keys.retain(|(assignment_id, _), _| *assignment_id != id);
        self.files.retain(|_, f| f.assignment_id != Some(id));
        Ok(true)
    }

    async fn list_assignments_with_pagination(
        &self,
        query: AssignmentListQuery,
    ) -> Result<AssignmentListResponse> {
        let page = query.page.max(1);
        let size = query.size.max(1);
        let search = query
            .search
            .as_deref()
            .map(|s| s.trim().to_lowercase())
            .filter(|s| !s.is_empty());

        let mut matched: Vec<Assignment> = self
            .assignments
            .iter()
            .filter(|a| query.creator_id.is_none_or(|id| a.creator_id == id))
            .filter(|a| query.status.is_none_or(|s| a.status == s))
            .filter(|a| {
                search
                    .as_ref()
                    .is_none_or(|s| a.title.to_lowercase().contains(s.as_str()))
            })
            .map(|a| a.value().clone())
            .collect();
        matched.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        let total = matched.len() as u64;
        // 超出范围的页码直接返回空页
        let items = match (page - 1).checked_mul(size) {
            Some(offset) if offset < total => matched
                .into_iter()
                .skip(offset as usize)
                .take(size as usize)
                .collect(),
            _ => Vec::new(),
        };

        Ok(AssignmentListResponse {
            items,
            pagination: PaginationInfo::new(page, size, total),
        })
    }

    async fn list_published_assignments_due_between(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<Assignment>> {
        let mut items: Vec<Assignment> = self
            .assignments
            .iter()
            .filter(|a| a.status == AssignmentStatus::Published)
            .filter(|a| matches!(a.due_date, Some(due) if due > from && due <= to))
            .map(|a| a.value().clone())
            .collect();
        items.sort_by_key(|a| a.due_date);
        Ok(items)
    }

    async fn create_submission(
        &self,
        assignment_id: Uuid,
        student_id: i64,
        req: CreateSubmissionRequest,
    ) -> Result<Submission> {
        match self.submission_keys.entry((assignment_id, student_id)) {
            Entry::Occupied(_) => Err(AssignmentError::duplicate_submission(
                "该作业已提交，请修改已有提交",
            )),
            Entry::Vacant(slot) => {
                let now = Utc::now();
                let submission = Submission {
                    id: Uuid::new_v4(),
                    assignment_id,
                    student_id,
                    content: req.content,
                    file_path: req.file_path,
                    score: None,
                    feedback: None,
                    status: SubmissionStatus::Submitted,
                    submitted_at: now,
                    graded_at: None,
                    graded_by: None,
                    updated_at: now,
                };
                self.submissions.insert(submission.id, submission.clone());
                slot.insert(submission.id);
                Ok(submission)
            }
        }
    }

    async fn get_submission_by_id(&self, id: Uuid) -> Result<Option<Submission>> {
        Ok(self.submissions.get(&id).map(|s| s.value().clone()))
    }

    async fn get_submission_by_assignment_and_student(
        &self,
        assignment_id: Uuid,
        student_id: i64,
    ) -> Result<Option<Submission>> {
        let Some(id) = self
            .submission_keys
            .get(&(assignment_id, student_id))
            .map(|r| *r.value())
        else {
            return Ok(None);
        };
        Ok(self.submissions.get(&id).map(|s| s.value().clone()))
    }

    async fn submission_exists(&self, assignment_id: Uuid, student_id: i64) -> Result<bool> {
        Ok(self
            .submission_keys
            .contains_key(&(assignment_id, student_id)))
    }

    async fn update_submission_content(
        &self,
        id: Uuid,
        update: UpdateSubmissionRequest,
    ) -> Result<Option<Submission>> {
        let Some(mut submission) = self.submissions.get_mut(&id) else {
            return Ok(None);
        };
        if submission.status != SubmissionStatus::Submitted {
            return Ok(None);
        }
        submission.content = update.content;
        if let Some(file_path) = update.file_path {
            submission.file_path = Some(file_path);
        }
        submission.updated_at = Utc::now();
        Ok(Some(submission.clone()))
    }

    async fn grade_submission(
        &self,
        id: Uuid,
        score: Option<i32>,
        feedback: Option<String>,
        graded_by: i64,
    ) -> Result<Option<Submission>> {
        let Some(mut submission) = self.submissions.get_mut(&id) else {
            return Ok(None);
        };
        if submission.status != SubmissionStatus::Submitted {
            return Ok(None);
        }
        let now = Utc::now();
        submission.score = score;
        submission.feedback = feedback;
        submission.status = SubmissionStatus::Graded;
        submission.graded_at = Some(now);
        submission.graded_by = Some(graded_by);
        submission.updated_at = now;
        Ok(Some(submission.clone()))
    }

    async fn list_submissions_by_assignment(
        &self,
        assignment_id: Uuid,
    ) -> Result<Vec<Submission>> {
        let items = self
            .submissions
            .iter()
            .filter(|s| s.assignment_id == assignment_id)
            .map(|s| s.value().clone())
            .collect();
        Ok(Self::sorted_by_submitted_desc(items))
    }

    async fn list_submissions_by_student(&self, student_id: i64) -> Result<Vec<Submission>> {
        let items = self
            .submissions
            .iter()
            .filter(|s| s.student_id == student_id)
            .map(|s| s.value().clone())
            .collect();
        Ok(Self::sorted_by_submitted_desc(items))
    }

    async fn list_pending_submissions_by_creator(
        &self,
        creator_id: i64,
    ) -> Result<Vec<Submission>> {
        let owned: std::collections::HashSet<Uuid> = self
            .assignments
            .iter()
            .filter(|a| a.creator_id == creator_id)
            .map(|a| a.id)
            .collect();

        let items = self
            .submissions
            .iter()
            .filter(|s| s.status == SubmissionStatus::Submitted && owned.contains(&s.assignment_id))
            .map(|s| s.value().clone())
            .collect();
        Ok(Self::sorted_by_submitted_desc(items))
    }

    async fn create_assignment_file(
        &self,
        uploaded_by: i64,
        req: RegisterFileRequest,
    ) -> Result<AssignmentFile> {
        let file = AssignmentFile {
            id: Uuid::new_v4(),
            assignment_id: req.assignment_id,
            uploaded_by,
            file_name: req.file_name,
            file_path: req.file_path,
            file_size: req.file_size,
            file_type: req.file_type,
            file_category: req.file_category,
            created_at: Utc::now(),
        };
        self.files.insert(file.id, file.clone());
        Ok(file)
    }

    async fn get_assignment_file_by_id(&self, id: Uuid) -> Result<Option<AssignmentFile>> {
        Ok(self.files.get(&id).map(|f| f.value().clone()))
    }

    async fn list_assignment_files(&self, assignment_id: Uuid) -> Result<Vec<AssignmentFile>> {
        let mut items: Vec<AssignmentFile> = self
            .files
            .iter()
            .filter(|f| f.assignment_id == Some(assignment_id))
            .map(|f| f.value().clone())
            .collect();
        items.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(items)
    }

    async fn list_files_by_uploader(&self, uploaded_by: i64) -> Result<Vec<AssignmentFile>> {
        let mut items: Vec<AssignmentFile> = self
            .files
            .iter()
            .filter(|f| f.uploaded_by == uploaded_by)
            .map(|f| f.value().clone())
            .collect();
        items.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(items)
    }

    async fn delete_assignment_file(&self, id: Uuid) -> Result<bool> {
        Ok(self.files.remove(&id).is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_assignment(title: &str) -> CreateAssignmentRequest {
        CreateAssignmentRequest {
            title: title.to_string(),
            description: None,
            due_date: None,
            max_score: Some(100),
            status: Some(AssignmentStatus::Published),
        }
    }

    #[tokio::test]
    async fn test_duplicate_submission_rejected_by_store() {
        let storage = MemoryStorage::new();
        let assignment = storage
            .create_assignment(1, new_assignment("Essay"))
            .await
            .unwrap();

        storage
            .create_submission(assignment.id, 42, CreateSubmissionRequest::default())
            .await
            .unwrap();
        let err = storage
            .create_submission(assignment.id, 42, CreateSubmissionRequest::default())
            .await
            .unwrap_err();
        assert_eq!(err.code(), "E003");
        assert!(storage.submission_exists(assignment.id, 42).await.unwrap());
    }

    #[tokio::test]
    async fn test_grade_is_conditional_on_submitted() {
        let storage = MemoryStorage::new();
        let assignment = storage
            .create_assignment(1, new_assignment("Essay"))
            .await
            .unwrap();
        let submission = storage
            .create_submission(assignment.id, 42, CreateSubmissionRequest::default())
            .await
            .unwrap();

        let graded = storage
            .grade_submission(submission.id, Some(90), None, 1)
            .await
            .unwrap();
        assert_eq!(graded.map(|s| s.status), Some(SubmissionStatus::Graded));

        let again = storage
            .grade_submission(submission.id, Some(10), None, 1)
            .await
            .unwrap();
        assert!(again.is_none());

        let update = storage
            .update_submission_content(
                submission.id,
                UpdateSubmissionRequest {
                    content: Some("late edit".into()),
                    file_path: None,
                },
            )
            .await
            .unwrap();
        assert!(update.is_none());
    }

    #[tokio::test]
    async fn test_delete_assignment_cascades() {
        let storage = MemoryStorage::new();
        let assignment = storage
            .create_assignment(1, new_assignment("Essay"))
            .await
            .unwrap();
        let submission = storage
            .create_submission(assignment.id, 42, CreateSubmissionRequest::default())
            .await
            .unwrap();
        let file = storage
            .create_assignment_file(
                1,
                RegisterFileRequest {
                    assignment_id: Some(assignment.id),
                    file_name: "brief.pdf".into(),
                    file_path: "/files/brief.pdf".into(),
                    file_size: Some(1024),
                    file_type: Some("application/pdf".into()),
                    file_category: Default::default(),
                },
            )
            .await
            .unwrap();

        assert!(storage.delete_assignment(assignment.id).await.unwrap());
        assert!(
            storage
                .get_submission_by_id(submission.id)
                .await
                .unwrap()
                .is_none()
        );
        assert!(
            storage
                .get_assignment_file_by_id(file.id)
                .await
                .unwrap()
                .is_none()
        );
        assert!(!storage.submission_exists(assignment.id, 42).await.unwrap());
        assert!(!storage.delete_assignment(assignment.id).await.unwrap());
    }

    #[tokio::test]
    async fn test_list_pagination_and_search() {
        let storage = MemoryStorage::new();
        for i in 0..5 {
            storage
                .create_assignment(1, new_assignment(&format!("Chapter {i}")))
                .await
                .unwrap();
        }
        storage
            .create_assignment(2, new_assignment("Lab report"))
            .await
            .unwrap();

        let page = storage
            .list_assignments_with_pagination(AssignmentListQuery {
                page: 2,
                size: 2,
                creator_id: Some(1),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(page.items.len(), 2);
        assert_eq!(page.pagination.total, 5);
        assert_eq!(page.pagination.total_pages, 3);

        let found = storage
            .list_assignments_with_pagination(AssignmentListQuery {
                page: 1,
                size: 10,
                search: Some("lab".into()),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(found.items.len(), 1);
        assert_eq!(found.items[0].creator_id, 2);
    }
}
