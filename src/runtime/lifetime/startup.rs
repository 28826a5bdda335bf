use std::sync::Arc;
use tracing::{debug, warn};

use crate::config::AppConfig;
use crate::errors::Result;
use crate::services::{AssignmentService, FileService, SubmissionService};
use crate::storage::Storage;

pub struct StartupContext {
    pub storage: Arc<dyn Storage>,
    pub assignment_service: Arc<AssignmentService>,
    pub submission_service: Arc<SubmissionService>,
    pub file_service: Arc<FileService>,
}

impl StartupContext {
    /// 基于已有存储构建全部业务服务
    pub fn from_storage(storage: Arc<dyn Storage>, config: &AppConfig) -> Self {
        Self {
            assignment_service: Arc::new(AssignmentService::with_config(
                storage.clone(),
                config.assignments.clone(),
            )),
            submission_service: Arc::new(SubmissionService::new(storage.clone())),
            file_service: Arc::new(FileService::new(storage.clone())),
            storage,
        }
    }
}

/// 准备服务器启动的上下文
/// 包括存储后端与业务服务
pub async fn prepare_server_startup() -> Result<StartupContext> {
    let config = AppConfig::get();

    debug!("Selected storage backend: {}", config.storage.backend);

    let storage = crate::storage::create_storage().await?;
    warn!(
        "Storage backend '{}' initialized and migrations completed",
        config.storage.backend
    );

    Ok(StartupContext::from_storage(storage, config))
}
