//! 作业生命周期
//!
//! 创建、修改、状态流转、级联删除与可见性过滤。每个操作先确认作业存在，
//! 再交给 `permissions` 判定，最后落到存储层。

pub mod create;
pub mod delete;
pub mod detail;
pub mod list;
pub mod stats;
pub mod update;

use std::sync::Arc;
use uuid::Uuid;

use crate::config::AssignmentsConfig;
use crate::errors::{AssignmentError, Result};
use crate::models::assignments::entities::{Assignment, AssignmentStatus};
use crate::models::assignments::requests::{
    AssignmentListParams, CreateAssignmentRequest, UpdateAssignmentRequest,
};
use crate::models::assignments::responses::{
    AssignmentListResponse, AssignmentStatistics, StudentAssignmentListResponse,
};
use crate::models::files::entities::AssignmentFile;
use crate::models::submissions::entities::Submission;
use crate::models::users::entities::Principal;
use crate::storage::Storage;

pub struct AssignmentService {
    storage: Arc<dyn Storage>,
    config: AssignmentsConfig,
}

impl AssignmentService {
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self::with_config(storage, AssignmentsConfig::default())
    }

    pub fn with_config(storage: Arc<dyn Storage>, config: AssignmentsConfig) -> Self {
        Self { storage, config }
    }

    pub(crate) fn storage(&self) -> &Arc<dyn Storage> {
        &self.storage
    }

    /// 获取作业，不存在时返回 NotFound
    pub(crate) async fn load_assignment(&self, id: Uuid) -> Result<Assignment> {
        self.storage
            .get_assignment_by_id(id)
            .await?
            .ok_or_else(|| AssignmentError::not_found(format!("作业不存在: {id}")))
    }

    pub async fn create(
        &self,
        principal: &Principal,
        req: CreateAssignmentRequest,
    ) -> Result<Assignment> {
        create::create_assignment(self, principal, req).await
    }

    pub async fn get(&self, principal: &Principal, id: Uuid) -> Result<Assignment> {
        detail::get_assignment(self, principal, id).await
    }

    pub async fn update(
        &self,
        principal: &Principal,
        id: Uuid,
        req: UpdateAssignmentRequest,
    ) -> Result<Assignment> {
        update::update_assignment(self, principal, id, req).await
    }

    pub async fn change_status(
        &self,
        principal: &Principal,
        id: Uuid,
        status: AssignmentStatus,
    ) -> Result<Assignment> {
        update::change_status(self, principal, id, status).await
    }

    pub async fn delete(&self, principal: &Principal, id: Uuid) -> Result<()> {
        delete::delete_assignment(self, principal, id).await
    }

    pub async fn list_visible(
        &self,
        principal: &Principal,
        params: AssignmentListParams,
    ) -> Result<AssignmentListResponse> {
        list::list_visible(self, principal, params).await
    }

    /// 学生视角的作业列表
    pub async fn list_my_assignments(
        &self,
        principal: &Principal,
        params: AssignmentListParams,
    ) -> Result<StudentAssignmentListResponse> {
        list::list_my_assignments(self, principal, params).await
    }

    pub async fn list_due_soon(
        &self,
        principal: &Principal,
        hours: Option<i64>,
    ) -> Result<Vec<Assignment>> {
        list::list_due_soon(self, principal, hours).await
    }

    pub async fn list_submissions(
        &self,
        principal: &Principal,
        id: Uuid,
    ) -> Result<Vec<Submission>> {
        detail::list_submissions(self, principal, id).await
    }

    pub async fn list_files(&self, principal: &Principal, id: Uuid) -> Result<Vec<AssignmentFile>> {
        detail::list_files(self, principal, id).await
    }

    pub async fn statistics(
        &self,
        principal: &Principal,
        id: Uuid,
    ) -> Result<AssignmentStatistics> {
        stats::get_statistics(self, principal, id).await
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::sync::Arc;

    use crate::models::assignments::entities::{Assignment, AssignmentStatus};
    use crate::models::assignments::requests::CreateAssignmentRequest;
    use crate::models::users::entities::{Principal, RoleName};
    use crate::storage::Storage;
    use crate::storage::memory_storage::MemoryStorage;

    pub fn memory() -> Arc<dyn Storage> {
        Arc::new(MemoryStorage::new())
    }

    pub fn admin() -> Principal {
        Principal::new(1, [RoleName::Admin])
    }

    pub fn teacher(id: i64) -> Principal {
        Principal::new(id, [RoleName::HqTeacher])
    }

    pub fn student(id: i64) -> Principal {
        Principal::new(id, [RoleName::Student])
    }

    pub async fn seed_assignment(
        storage: &Arc<dyn Storage>,
        creator_id: i64,
        status: AssignmentStatus,
        due_in_hours: Option<i64>,
        max_score: Option<i32>,
    ) -> Assignment {
        storage
            .create_assignment(
                creator_id,
                CreateAssignmentRequest {
                    title: "Essay".into(),
                    description: Some("Write 500 words".into()),
                    due_date: due_in_hours
                        .map(|h| chrono::Utc::now() + chrono::Duration::hours(h)),
                    max_score,
                    status: Some(status),
                },
            )
            .await
            .unwrap()
    }
}
