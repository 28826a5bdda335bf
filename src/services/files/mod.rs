//! 作业文件元数据
//!
//! 只记录文件信息，文件内容由上传服务负责。

use std::sync::Arc;
use tracing::{debug, info};
use uuid::Uuid;

use crate::errors::{AssignmentError, Result};
use crate::models::assignments::entities::Assignment;
use crate::models::files::entities::AssignmentFile;
use crate::models::files::requests::RegisterFileRequest;
use crate::models::users::entities::Principal;
use crate::services::permissions;
use crate::storage::Storage;

pub struct FileService {
    storage: Arc<dyn Storage>,
}

impl FileService {
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self { storage }
    }

    async fn load_file(&self, id: Uuid) -> Result<AssignmentFile> {
        self.storage
            .get_assignment_file_by_id(id)
            .await?
            .ok_or_else(|| AssignmentError::not_found(format!("文件不存在: {id}")))
    }

    // 预先取出文件所属作业，供权限判定使用
    async fn owning_assignment(&self, file: &AssignmentFile) -> Result<Option<Assignment>> {
        match file.assignment_id {
            Some(assignment_id) => self.storage.get_assignment_by_id(assignment_id).await,
            None => Ok(None),
        }
    }

    /// 登记文件，关联作业时需要作业的修改权限
    pub async fn register(
        &self,
        principal: &Principal,
        req: RegisterFileRequest,
    ) -> Result<AssignmentFile> {
        if let Some(assignment_id) = req.assignment_id {
            let assignment = self
                .storage
                .get_assignment_by_id(assignment_id)
                .await?
                .ok_or_else(|| AssignmentError::not_found(format!("作业不存在: {assignment_id}")))?;
            if !permissions::can_modify_assignment(principal, Some(&assignment)) {
                debug!("用户 {} 无权为作业 {} 登记文件", principal.id, assignment_id);
                return Err(AssignmentError::access_denied("没有为该作业登记文件的权限"));
            }
        }

        if req.file_name.trim().is_empty() || req.file_path.trim().is_empty() {
            return Err(AssignmentError::validation("文件名和路径不能为空"));
        }
        if req.file_size.is_some_and(|size| size < 0) {
            return Err(AssignmentError::validation("文件大小不能为负数"));
        }

        let file = self.storage.create_assignment_file(principal.id, req).await?;
        info!("文件已登记: file={}, uploader={}", file.id, principal.id);
        Ok(file)
    }

    pub async fn get(&self, principal: &Principal, id: Uuid) -> Result<AssignmentFile> {
        let file = self.load_file(id).await?;
        let assignment = self.owning_assignment(&file).await?;

        if !permissions::can_access_file(principal, Some(&file), |_| assignment.as_ref()) {
            return Err(AssignmentError::access_denied("没有访问该文件的权限"));
        }
        Ok(file)
    }

    pub async fn delete(&self, principal: &Principal, id: Uuid) -> Result<()> {
        let file = self.load_file(id).await?;
        let assignment = self.owning_assignment(&file).await?;

        if !permissions::can_delete_file(principal, Some(&file), |_| assignment.as_ref()) {
            debug!("用户 {} 无权删除文件 {}", principal.id, id);
            return Err(AssignmentError::access_denied("没有删除该文件的权限"));
        }

        if !self.storage.delete_assignment_file(id).await? {
            return Err(AssignmentError::not_found(format!("文件不存在: {id}")));
        }
        info!("文件已删除: file={}, by={}", id, principal.id);
        Ok(())
    }

    pub async fn list_mine(&self, principal: &Principal) -> Result<Vec<AssignmentFile>> {
        self.storage.list_files_by_uploader(principal.id).await
    }
}
