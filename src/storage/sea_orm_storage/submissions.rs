//! 提交存储操作

use uuid::Uuid;

use super::SeaOrmStorage;
use crate::entity::assignments::{Column as AssignmentColumn, Entity as Assignments};
use crate::entity::submissions::{ActiveModel, Column, Entity as Submissions};
use crate::errors::{AssignmentError, Result};
use crate::models::submissions::{
    entities::{Submission, SubmissionStatus},
    requests::{CreateSubmissionRequest, UpdateSubmissionRequest},
};
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, Set, SqlErr,
};

impl SeaOrmStorage {
    /// 创建提交，依赖 (assignment_id, student_id) 唯一索引防止重复
    pub async fn create_submission_impl(
        &self,
        assignment_id: Uuid,
        student_id: i64,
        req: CreateSubmissionRequest,
    ) -> Result<Submission> {
        let now = chrono::Utc::now().timestamp();

        let model = ActiveModel {
            id: Set(Uuid::new_v4()),
            assignment_id: Set(assignment_id),
            student_id: Set(student_id),
            content: Set(req.content),
            file_path: Set(req.file_path),
            score: Set(None),
            feedback: Set(None),
            status: Set(SubmissionStatus::Submitted.to_string()),
            submitted_at: Set(now),
            graded_at: Set(None),
            graded_by: Set(None),
            updated_at: Set(now),
        };

        let result = model.insert(&self.db).await.map_err(|e| {
            if let Some(SqlErr::UniqueConstraintViolation(_)) = e.sql_err() {
                AssignmentError::duplicate_submission("该作业已提交，请修改已有提交")
            } else {
                AssignmentError::unavailable(format!("创建提交失败: {e}"))
            }
        })?;

        Ok(result.into_submission())
    }

    /// 通过 ID 获取提交
    pub async fn get_submission_by_id_impl(&self, id: Uuid) -> Result<Option<Submission>> {
        let result = Submissions::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| AssignmentError::unavailable(format!("查询提交失败: {e}")))?;

        Ok(result.map(|m| m.into_submission()))
    }

    /// 获取学生某作业的提交
    pub async fn get_submission_by_assignment_and_student_impl(
        &self,
        assignment_id: Uuid,
        student_id: i64,
    ) -> Result<Option<Submission>> {
        let result = Submissions::find()
            .filter(Column::AssignmentId.eq(assignment_id))
            .filter(Column::StudentId.eq(student_id))
            .one(&self.db)
            .await
            .map_err(|e| AssignmentError::unavailable(format!("查询提交失败: {e}")))?;

        Ok(result.map(|m| m.into_submission()))
    }

    pub async fn submission_exists_impl(&self, assignment_id: Uuid, student_id: i64) -> Result<bool> {
        let count = Submissions::find()
            .filter(Column::AssignmentId.eq(assignment_id))
            .filter(Column::StudentId.eq(student_id))
            .count(&self.db)
            .await
            .map_err(|e| AssignmentError::unavailable(format!("查询提交失败: {e}")))?;

        Ok(count > 0)
    }

    /// 修改提交内容，仅当状态仍为 submitted 时生效
    pub async fn update_submission_content_impl(
        &self,
        id: Uuid,
        update: UpdateSubmissionRequest,
    ) -> Result<Option<Submission>> {
        let now = chrono::Utc::now().timestamp();

        let mut stmt = Submissions::update_many()
            .col_expr(Column::Content, Expr::value(update.content))
            .col_expr(Column::UpdatedAt, Expr::value(now));

        if let Some(file_path) = update.file_path {
            stmt = stmt.col_expr(Column::FilePath, Expr::value(Some(file_path)));
        }

        let result = stmt
            .filter(Column::Id.eq(id))
            .filter(Column::Status.eq(SubmissionStatus::Submitted.to_string()))
            .exec(&self.db)
            .await
            .map_err(|e| AssignmentError::unavailable(format!("更新提交失败: {e}")))?;

        if result.rows_affected == 0 {
            return Ok(None);
        }

        self.get_submission_by_id_impl(id).await
    }

    /// 批改提交，仅当状态仍为 submitted 时生效
    pub async fn grade_submission_impl(
        &self,
        id: Uuid,
        score: Option<i32>,
        feedback: Option<String>,
        graded_by: i64,
    ) -> Result<Option<Submission>> {
        let now = chrono::Utc::now().timestamp();

        let result = Submissions::update_many()
            .col_expr(Column::Score, Expr::value(score))
            .col_expr(Column::Feedback, Expr::value(feedback))
            .col_expr(
                Column::Status,
                Expr::value(SubmissionStatus::Graded.to_string()),
            )
            .col_expr(Column::GradedAt, Expr::value(Some(now)))
            .col_expr(Column::GradedBy, Expr::value(Some(graded_by)))
            .col_expr(Column::UpdatedAt, Expr::value(now))
            .filter(Column::Id.eq(id))
            .filter(Column::Status.eq(SubmissionStatus::Submitted.to_string()))
            .exec(&self.db)
            .await
            .map_err(|e| AssignmentError::unavailable(format!("批改提交失败: {e}")))?;

        if result.rows_affected == 0 {
            return Ok(None);
        }

        self.get_submission_by_id_impl(id).await
    }

    /// 列出作业下的提交
    pub async fn list_submissions_by_assignment_impl(
        &self,
        assignment_id: Uuid,
    ) -> Result<Vec<Submission>> {
        let results = Submissions::find()
            .filter(Column::AssignmentId.eq(assignment_id))
            .order_by_desc(Column::SubmittedAt)
            .all(&self.db)
            .await
            .map_err(|e| AssignmentError::unavailable(format!("查询作业提交失败: {e}")))?;

        Ok(results.into_iter().map(|m| m.into_submission()).collect())
    }

    /// 列出学生的提交
    pub async fn list_submissions_by_student_impl(
        &self,
        student_id: i64,
    ) -> Result<Vec<Submission>> {
        let results = Submissions::find()
            .filter(Column::StudentId.eq(student_id))
            .order_by_desc(Column::SubmittedAt)
            .all(&self.db)
            .await
            .map_err(|e| AssignmentError::unavailable(format!("查询学生提交失败: {e}")))?;

        Ok(results.into_iter().map(|m| m.into_submission()).collect())
    }

    /// 列出教师所建作业下待批改的提交
    pub async fn list_pending_submissions_by_creator_impl(
        &self,
        creator_id: i64,
    ) -> Result<Vec<Submission>> {
        let assignment_ids: Vec<Uuid> = Assignments::find()
            .select_only()
            .column(AssignmentColumn::Id)
            .filter(AssignmentColumn::CreatorId.eq(creator_id))
            .into_tuple()
            .all(&self.db)
            .await
            .map_err(|e| AssignmentError::unavailable(format!("查询教师作业失败: {e}")))?;

        if assignment_ids.is_empty() {
            return Ok(Vec::new());
        }

        let results = Submissions::find()
            .filter(Column::AssignmentId.is_in(assignment_ids))
            .filter(Column::Status.eq(SubmissionStatus::Submitted.to_string()))
            .order_by_desc(Column::SubmittedAt)
            .all(&self.db)
            .await
            .map_err(|e| AssignmentError::unavailable(format!("查询待批改提交失败: {e}")))?;

        Ok(results.into_iter().map(|m| m.into_submission()).collect())
    }
}
