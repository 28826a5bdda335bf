//! 提交生命周期
//!
//! ```text
//!         submit()                 grade()
//!  (none) -------> SUBMITTED -------------> GRADED
//!                    |  ^
//!                    |  | update()
//!                    v  |
//!                  SUBMITTED
//! ```
//!
//! 每次状态变更前先询问 `permissions`，写入由存储层以条件更新完成。

pub mod create;
pub mod detail;
pub mod grade;
pub mod list;
pub mod update;

use std::sync::Arc;
use uuid::Uuid;

use crate::errors::{AssignmentError, Result};
use crate::models::assignments::entities::Assignment;
use crate::models::submissions::entities::Submission;
use crate::models::submissions::responses::SubmissionResult;
use crate::models::submissions::requests::{
    CreateSubmissionRequest, GradeSubmissionRequest, UpdateSubmissionRequest,
};
use crate::models::users::entities::Principal;
use crate::storage::Storage;

pub struct SubmissionService {
    storage: Arc<dyn Storage>,
}

impl SubmissionService {
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self { storage }
    }

    pub(crate) fn storage(&self) -> &Arc<dyn Storage> {
        &self.storage
    }

    pub(crate) async fn load_submission(&self, id: Uuid) -> Result<Submission> {
        self.storage
            .get_submission_by_id(id)
            .await?
            .ok_or_else(|| AssignmentError::not_found(format!("提交不存在: {id}")))
    }

    pub(crate) async fn load_assignment(&self, id: Uuid) -> Result<Assignment> {
        self.storage
            .get_assignment_by_id(id)
            .await?
            .ok_or_else(|| AssignmentError::not_found(format!("作业不存在: {id}")))
    }

    /// 提交作业
    pub async fn submit(
        &self,
        principal: &Principal,
        assignment_id: Uuid,
        req: CreateSubmissionRequest,
    ) -> Result<Submission> {
        create::submit(self, principal, assignment_id, req).await
    }

    /// 修改提交内容
    pub async fn update(
        &self,
        principal: &Principal,
        id: Uuid,
        req: UpdateSubmissionRequest,
    ) -> Result<Submission> {
        update::update_submission(self, principal, id, req).await
    }

    /// 批改提交
    pub async fn grade(
        &self,
        principal: &Principal,
        id: Uuid,
        req: GradeSubmissionRequest,
    ) -> Result<Submission> {
        grade::grade_submission(self, principal, id, req).await
    }

    pub async fn get(&self, principal: &Principal, id: Uuid) -> Result<Submission> {
        detail::get_submission(self, principal, id).await
    }

    /// 提交结果（含作业标题与满分）
    pub async fn get_result(&self, principal: &Principal, id: Uuid) -> Result<SubmissionResult> {
        detail::get_submission_result(self, principal, id).await
    }

    /// 当前用户在某作业下的提交
    pub async fn get_mine(
        &self,
        principal: &Principal,
        assignment_id: Uuid,
    ) -> Result<Option<Submission>> {
        detail::get_my_submission(self, principal, assignment_id).await
    }

    pub async fn list_for_student(&self, principal: &Principal) -> Result<Vec<Submission>> {
        list::list_for_student(self, principal).await
    }

    pub async fn list_pending_for_teacher(
        &self,
        principal: &Principal,
    ) -> Result<Vec<Submission>> {
        list::list_pending_for_teacher(self, principal).await
    }
}
