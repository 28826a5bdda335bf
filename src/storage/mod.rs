use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::warn;
use uuid::Uuid;

use crate::config::AppConfig;
use crate::errors::{AssignmentError, Result};
use crate::models::{
    assignments::{
        entities::{Assignment, AssignmentStatus},
        requests::{AssignmentListQuery, CreateAssignmentRequest, UpdateAssignmentRequest},
        responses::AssignmentListResponse,
    },
    files::{entities::AssignmentFile, requests::RegisterFileRequest},
    submissions::{
        entities::Submission,
        requests::{CreateSubmissionRequest, UpdateSubmissionRequest},
    },
};

pub mod memory_storage;
pub mod sea_orm_storage;

#[async_trait::async_trait]
pub trait Storage: Send + Sync {
    /// 作业管理方法
    // 创建作业
    async fn create_assignment(
        &self,
        creator_id: i64,
        req: CreateAssignmentRequest,
    ) -> Result<Assignment>;
    // 通过ID获取作业
    async fn get_assignment_by_id(&self, id: Uuid) -> Result<Option<Assignment>>;
    // 更新作业，未提供的字段保持不变
    async fn update_assignment(
        &self,
        id: Uuid,
        update: UpdateAssignmentRequest,
    ) -> Result<Option<Assignment>>;
    // 仅当当前状态为 from 时切换为 to
    async fn transition_assignment_status(
        &self,
        id: Uuid,
        from: AssignmentStatus,
        to: AssignmentStatus,
    ) -> Result<Option<Assignment>>;
    // 删除作业（级联删除提交与文件）
    async fn delete_assignment(&self, id: Uuid) -> Result<bool>;
    // 列出作业（分页，按创建时间倒序）
    async fn list_assignments_with_pagination(
        &self,
        query: AssignmentListQuery,
    ) -> Result<AssignmentListResponse>;
    // 列出截止时间落在 (from, to] 内的已发布作业
    async fn list_published_assignments_due_between(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<Assignment>>;

    /// 提交管理方法
    // 创建提交，同一学生同一作业重复提交返回 DuplicateSubmission
    async fn create_submission(
        &self,
        assignment_id: Uuid,
        student_id: i64,
        req: CreateSubmissionRequest,
    ) -> Result<Submission>;
    // 通过ID获取提交
    async fn get_submission_by_id(&self, id: Uuid) -> Result<Option<Submission>>;
    // 获取学生在某作业下的提交
    async fn get_submission_by_assignment_and_student(
        &self,
        assignment_id: Uuid,
        student_id: i64,
    ) -> Result<Option<Submission>>;
    // 学生是否已提交过该作业
    async fn submission_exists(&self, assignment_id: Uuid, student_id: i64) -> Result<bool>;
    // 仅在 SUBMITTED 状态下修改内容，状态不满足时返回 None
    async fn update_submission_content(
        &self,
        id: Uuid,
        update: UpdateSubmissionRequest,
    ) -> Result<Option<Submission>>;
    // 仅在 SUBMITTED 状态下批改，状态不满足时返回 None
    async fn grade_submission(
        &self,
        id: Uuid,
        score: Option<i32>,
        feedback: Option<String>,
        graded_by: i64,
    ) -> Result<Option<Submission>>;
    // 列出作业下的所有提交（按提交时间倒序）
    async fn list_submissions_by_assignment(&self, assignment_id: Uuid)
    -> Result<Vec<Submission>>;
    // 列出学生的所有提交（按提交时间倒序）
    async fn list_submissions_by_student(&self, student_id: i64) -> Result<Vec<Submission>>;
    // 列出某教师所建作业下待批改的提交（按提交时间倒序）
    async fn list_pending_submissions_by_creator(&self, creator_id: i64)
    -> Result<Vec<Submission>>;

    /// 文件管理方法
    // 登记文件
    async fn create_assignment_file(
        &self,
        uploaded_by: i64,
        req: RegisterFileRequest,
    ) -> Result<AssignmentFile>;
    // 通过ID获取文件
    async fn get_assignment_file_by_id(&self, id: Uuid) -> Result<Option<AssignmentFile>>;
    // 列出作业关联的文件
    async fn list_assignment_files(&self, assignment_id: Uuid) -> Result<Vec<AssignmentFile>>;
    // 列出用户上传的文件
    async fn list_files_by_uploader(&self, uploaded_by: i64) -> Result<Vec<AssignmentFile>>;
    // 删除文件
    async fn delete_assignment_file(&self, id: Uuid) -> Result<bool>;
}

/// 根据配置创建存储后端
pub async fn create_storage() -> Result<Arc<dyn Storage>> {
    let config = AppConfig::get();
    match config.storage.backend.as_str() {
        "database" => {
            let storage = sea_orm_storage::SeaOrmStorage::new_async().await?;
            Ok(Arc::new(storage))
        }
        "memory" => {
            warn!("Using in-memory storage backend, data will not survive a restart");
            Ok(Arc::new(memory_storage::MemoryStorage::new()))
        }
        other => Err(AssignmentError::configuration(format!(
            "未知的存储后端: {other}. 支持: database, memory"
        ))),
    }
}
