//! 作业文件存储操作

use uuid::Uuid;

use super::SeaOrmStorage;
use crate::entity::assignment_files::{ActiveModel, Column, Entity as AssignmentFiles};
use crate::errors::{AssignmentError, Result};
use crate::models::files::{entities::AssignmentFile, requests::RegisterFileRequest};
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};

impl SeaOrmStorage {
    /// 登记文件
    pub async fn create_assignment_file_impl(
        &self,
        uploaded_by: i64,
        req: RegisterFileRequest,
    ) -> Result<AssignmentFile> {
        let now = chrono::Utc::now().timestamp();

        let model = ActiveModel {
            id: Set(Uuid::new_v4()),
            assignment_id: Set(req.assignment_id),
            uploaded_by: Set(uploaded_by),
            file_name: Set(req.file_name),
            file_path: Set(req.file_path),
            file_size: Set(req.file_size),
            file_type: Set(req.file_type),
            file_category: Set(req.file_category.to_string()),
            created_at: Set(now),
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| AssignmentError::unavailable(format!("登记文件失败: {e}")))?;

        Ok(result.into_assignment_file())
    }

    /// 通过 ID 获取文件
    pub async fn get_assignment_file_by_id_impl(&self, id: Uuid) -> Result<Option<AssignmentFile>> {
        let result = AssignmentFiles::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| AssignmentError::unavailable(format!("查询文件失败: {e}")))?;

        Ok(result.map(|m| m.into_assignment_file()))
    }

    /// 列出作业关联的文件
    pub async fn list_assignment_files_impl(&self, assignment_id: Uuid) -> Result<Vec<AssignmentFile>> {
        let results = AssignmentFiles::find()
            .filter(Column::AssignmentId.eq(assignment_id))
            .order_by_asc(Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(|e| AssignmentError::unavailable(format!("查询作业文件失败: {e}")))?;

        Ok(results.into_iter().map(|m| m.into_assignment_file()).collect())
    }

    /// 列出用户上传的文件
    pub async fn list_files_by_uploader_impl(&self, uploaded_by: i64) -> Result<Vec<AssignmentFile>> {
        let results = AssignmentFiles::find()
            .filter(Column::UploadedBy.eq(uploaded_by))
            .order_by_desc(Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(|e| AssignmentError::unavailable(format!("查询用户文件失败: {e}")))?;

        Ok(results.into_iter().map(|m| m.into_assignment_file()).collect())
    }

    /// 删除文件记录
    pub async fn delete_assignment_file_impl(&self, id: Uuid) -> Result<bool> {
        let result = AssignmentFiles::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(|e| AssignmentError::unavailable(format!("删除文件失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }
}
