//! SeaORM 存储实现
//!
//! 统一的数据库存储层，支持 SQLite、PostgreSQL 和 MySQL。

mod assignments;
mod files;
mod submissions;

use crate::config::AppConfig;
use crate::errors::{AssignmentError, Result};
use migration::{Migrator, MigratorTrait};
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use std::time::Duration;
use tracing::info;

/// SeaORM 存储实现
#[derive(Clone)]
pub struct SeaOrmStorage {
    pub(crate) db: DatabaseConnection,
}

impl SeaOrmStorage {
    /// 创建新的 SeaORM 存储实例
    pub async fn new_async() -> Result<Self> {
        let config = AppConfig::get();
        Self::connect(&config.database.url, config).await
    }

    /// 连接指定数据库并运行迁移
    pub async fn connect(url: &str, config: &AppConfig) -> Result<Self> {
        let db_url = Self::build_database_url(url)?;

        // 根据数据库类型选择连接方式
        let db = if db_url.starts_with("sqlite:") {
            Self::connect_sqlite(&db_url, config).await?
        } else {
            Self::connect_generic(&db_url, config).await?
        };

        // 运行迁移
        Migrator::up(&db, None)
            .await
            .map_err(|e| AssignmentError::unavailable(format!("数据库迁移失败: {e}")))?;

        info!("SeaORM 存储初始化完成，数据库: {}", db_url);

        Ok(Self { db })
    }

    /// SQLite 专用连接（WAL + 外键约束）
    async fn connect_sqlite(url: &str, config: &AppConfig) -> Result<DatabaseConnection> {
        use sea_orm::SqlxSqliteConnector;
        use sea_orm::sqlx::sqlite::{
            SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous,
        };
        use std::str::FromStr;

        let opt = SqliteConnectOptions::from_str(url)
            .map_err(|e| AssignmentError::configuration(format!("SQLite URL 解析失败: {e}")))?
            .create_if_missing(true)
            .foreign_keys(true)
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal)
            .busy_timeout(Duration::from_secs(5))
            .pragma("temp_store", "memory");

        let pool = SqlitePoolOptions::new()
            .max_connections(config.database.pool_size)
            .min_connections(1)
            .test_before_acquire(true)
            .acquire_timeout(Duration::from_secs(config.database.timeout))
            .idle_timeout(Duration::from_secs(300))
            .connect_with(opt)
            .await
            .map_err(|e| AssignmentError::unavailable(format!("SQLite 连接失败: {e}")))?;

        Ok(SqlxSqliteConnector::from_sqlx_sqlite_pool(pool))
    }

    /// 通用连接（PostgreSQL、MySQL 等）
    async fn connect_generic(url: &str, config: &AppConfig) -> Result<DatabaseConnection> {
        let mut opt = ConnectOptions::new(url);
        opt.max_connections(config.database.pool_size)
            .min_connections(1)
            .connect_timeout(Duration::from_secs(config.database.timeout))
            .acquire_timeout(Duration::from_secs(config.database.timeout))
            .idle_timeout(Duration::from_secs(600))
            .max_lifetime(Duration::from_secs(1800))
            .sqlx_logging(false)
            .sqlx_logging_level(tracing::log::LevelFilter::Debug);

        Database::connect(opt)
            .await
            .map_err(|e| AssignmentError::unavailable(format!("无法连接到数据库: {e}")))
    }

    /// 从 URL 自动推断数据库类型并构建连接 URL
    fn build_database_url(url: &str) -> Result<String> {
        if url.starts_with("sqlite:") {
            Ok(url.to_string())
        } else if url.ends_with(".db") || url.ends_with(".sqlite") {
            Ok(format!("sqlite://{url}?mode=rwc"))
        } else if url.starts_with("postgres://")
            || url.starts_with("postgresql://")
            || url.starts_with("mysql://")
            || url.starts_with("mariadb://")
        {
            Ok(url.to_string())
        } else {
            Err(AssignmentError::configuration(format!(
                "无法从 URL 推断数据库类型: {url}. 支持: sqlite://, postgres://, mysql://, 或 .db/.sqlite 文件路径"
            )))
        }
    }
}

// Storage trait 实现
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
use crate::storage::Storage;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

#[async_trait]
impl Storage for SeaOrmStorage {
    // 作业模块
    async fn create_assignment(
        &self,
        creator_id: i64,
        req: CreateAssignmentRequest,
    ) -> Result<Assignment> {
        self.create_assignment_impl(creator_id, req).await
    }

    async fn get_assignment_by_id(&self, id: Uuid) -> Result<Option<Assignment>> {
        self.get_assignment_by_id_impl(id).await
    }

    async fn update_assignment(
        &self,
        id: Uuid,
        update: UpdateAssignmentRequest,
    ) -> Result<Option<Assignment>> {
        self.update_assignment_impl(id, update).await
    }

    async fn transition_assignment_status(
        &self,
        id: Uuid,
        from: AssignmentStatus,
        to: AssignmentStatus,
    ) -> Result<Option<Assignment>> {
        self.transition_assignment_status_impl(id, from, to).await
    }

    async fn delete_assignment(&self, id: Uuid) -> Result<bool> {
        self.delete_assignment_impl(id).await
    }

    async fn list_assignments_with_pagination(
        &self,
        query: AssignmentListQuery,
    ) -> Result<AssignmentListResponse> {
        self.list_assignments_with_pagination_impl(query).await
    }

    async fn list_published_assignments_due_between(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<Assignment>> {
        self.list_published_assignments_due_between_impl(from, to)
            .await
    }

    // 提交模块
    async fn create_submission(
        &self,
        assignment_id: Uuid,
        student_id: i64,
        req: CreateSubmissionRequest,
    ) -> Result<Submission> {
        self.create_submission_impl(assignment_id, student_id, req)
            .await
    }

    async fn get_submission_by_id(&self, id: Uuid) -> Result<Option<Submission>> {
        self.get_submission_by_id_impl(id).await
    }

    async fn get_submission_by_assignment_and_student(
        &self,
        assignment_id: Uuid,
        student_id: i64,
    ) -> Result<Option<Submission>> {
        self.get_submission_by_assignment_and_student_impl(assignment_id, student_id)
            .await
    }

    async fn submission_exists(&self, assignment_id: Uuid, student_id: i64) -> Result<bool> {
        self.submission_exists_impl(assignment_id, student_id).await
    }

    async fn update_submission_content(
        &self,
        id: Uuid,
        update: UpdateSubmissionRequest,
    ) -> Result<Option<Submission>> {
        self.update_submission_content_impl(id, update).await
    }

    async fn grade_submission(
        &self,
        id: Uuid,
        score: Option<i32>,
        feedback: Option<String>,
        graded_by: i64,
    ) -> Result<Option<Submission>> {
        self.grade_submission_impl(id, score, feedback, graded_by)
            .await
    }

    async fn list_submissions_by_assignment(
        &self,
        assignment_id: Uuid,
    ) -> Result<Vec<Submission>> {
        self.list_submissions_by_assignment_impl(assignment_id).await
    }

    async fn list_submissions_by_student(&self, student_id: i64) -> Result<Vec<Submission>> {
        self.list_submissions_by_student_impl(student_id).await
    }

    async fn list_pending_submissions_by_creator(
        &self,
        creator_id: i64,
    ) -> Result<Vec<Submission>> {
        self.list_pending_submissions_by_creator_impl(creator_id)
            .await
    }

    // 文件模块
    async fn create_assignment_file(
        &self,
        uploaded_by: i64,
        req: RegisterFileRequest,
    ) -> Result<AssignmentFile> {
        self.create_assignment_file_impl(uploaded_by, req).await
    }

    async fn get_assignment_file_by_id(&self, id: Uuid) -> Result<Option<AssignmentFile>> {
        self.get_assignment_file_by_id_impl(id).await
    }

    async fn list_assignment_files(&self, assignment_id: Uuid) -> Result<Vec<AssignmentFile>> {
        self.list_assignment_files_impl(assignment_id).await
    }

    async fn list_files_by_uploader(&self, uploaded_by: i64) -> Result<Vec<AssignmentFile>> {
        self.list_files_by_uploader_impl(uploaded_by).await
    }

    async fn delete_assignment_file(&self, id: Uuid) -> Result<bool> {
        self.delete_assignment_file_impl(id).await
    }
}
