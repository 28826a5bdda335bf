use serde::Deserialize;
use uuid::Uuid;

use crate::models::files::entities::FileCategory;

/// 登记作业文件请求
#[derive(Debug, Clone, Deserialize)]
pub struct RegisterFileRequest {
    pub assignment_id: Option<Uuid>,
    pub file_name: String,
    pub file_path: String,
    pub file_size: Option<i64>,
    pub file_type: Option<String>,
    #[serde(default)]
    pub file_category: FileCategory,
}
