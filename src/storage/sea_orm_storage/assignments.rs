//! 作业存储操作

use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::SeaOrmStorage;
use crate::entity::assignment_files::{Column as FileColumn, Entity as AssignmentFiles};
use crate::entity::assignments::{ActiveModel, Column, Entity as Assignments};
use crate::entity::submissions::{Column as SubmissionColumn, Entity as Submissions};
use crate::errors::{AssignmentError, Result};
use crate::models::{
    PaginationInfo,
    assignments::{
        entities::{Assignment, AssignmentStatus},
        requests::{AssignmentListQuery, CreateAssignmentRequest, UpdateAssignmentRequest},
        responses::AssignmentListResponse,
    },
};
use crate::utils::escape_like_pattern;
use sea_orm::sea_query::{Expr, LikeExpr};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set,
    TransactionTrait,
};

impl SeaOrmStorage {
    /// 创建作业
    pub async fn create_assignment_impl(
        &self,
        creator_id: i64,
        req: CreateAssignmentRequest,
    ) -> Result<Assignment> {
        let now = chrono::Utc::now().timestamp();

        let model = ActiveModel {
            id: Set(Uuid::new_v4()),
            title: Set(req.title),
            description: Set(req.description),
            creator_id: Set(creator_id),
            due_date: Set(req.due_date.map(|dt| dt.timestamp())),
            max_score: Set(req.max_score),
            status: Set(req.status.unwrap_or_default().to_string()),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| AssignmentError::unavailable(format!("创建作业失败: {e}")))?;

        Ok(result.into_assignment())
    }

    /// 通过 ID 获取作业
    pub async fn get_assignment_by_id_impl(&self, id: Uuid) -> Result<Option<Assignment>> {
        let result = Assignments::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| AssignmentError::unavailable(format!("查询作业失败: {e}")))?;

        Ok(result.map(|m| m.into_assignment()))
    }

    /// 更新作业
    pub async fn update_assignment_impl(
        &self,
        id: Uuid,
        update: UpdateAssignmentRequest,
    ) -> Result<Option<Assignment>> {
        // 先检查作业是否存在
        if self.get_assignment_by_id_impl(id).await?.is_none() {
            return Ok(None);
        }

        let now = chrono::Utc::now().timestamp();

        let mut model = ActiveModel {
            id: Set(id),
            updated_at: Set(now),
            ..Default::default()
        };

        if let Some(title) = update.title {
            model.title = Set(title);
        }
        if let Some(description) = update.description {
            model.description = Set(Some(description));
        }
        if let Some(due_date) = update.due_date {
            model.due_date = Set(Some(due_date.timestamp()));
        }
        if let Some(max_score) = update.max_score {
            model.max_score = Set(Some(max_score));
        }
        if let Some(status) = update.status {
            model.status = Set(status.to_string());
        }

        model
            .update(&self.db)
            .await
            .map_err(|e| AssignmentError::unavailable(format!("更新作业失败: {e}")))?;

        self.get_assignment_by_id_impl(id).await
    }

    /// 条件更新作业状态
    pub async fn transition_assignment_status_impl(
        &self,
        id: Uuid,
        from: AssignmentStatus,
        to: AssignmentStatus,
    ) -> Result<Option<Assignment>> {
        let now = chrono::Utc::now().timestamp();

        let result = Assignments::update_many()
            .col_expr(Column::Status, Expr::value(to.to_string()))
            .col_expr(Column::UpdatedAt, Expr::value(now))
            .filter(Column::Id.eq(id))
            .filter(Column::Status.eq(from.to_string()))
            .exec(&self.db)
            .await
            .map_err(|e| AssignmentError::unavailable(format!("更新作业状态失败: {e}")))?;

        if result.rows_affected == 0 {
            return Ok(None);
        }

        self.get_assignment_by_id_impl(id).await
    }

    /// 删除作业，同一事务内先删除提交与文件
    pub async fn delete_assignment_impl(&self, id: Uuid) -> Result<bool> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| AssignmentError::unavailable(format!("开启事务失败: {e}")))?;

        Submissions::delete_many()
            .filter(SubmissionColumn::AssignmentId.eq(id))
            .exec(&txn)
            .await
            .map_err(|e| AssignmentError::unavailable(format!("删除作业提交失败: {e}")))?;

        AssignmentFiles::delete_many()
            .filter(FileColumn::AssignmentId.eq(id))
            .exec(&txn)
            .await
            .map_err(|e| AssignmentError::unavailable(format!("删除作业文件失败: {e}")))?;

        let result = Assignments::delete_by_id(id)
            .exec(&txn)
            .await
            .map_err(|e| AssignmentError::unavailable(format!("删除作业失败: {e}")))?;

        txn.commit()
            .await
            .map_err(|e| AssignmentError::unavailable(format!("提交事务失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }

    /// 分页列出作业
    pub async fn list_assignments_with_pagination_impl(
        &self,
        query: AssignmentListQuery,
    ) -> Result<AssignmentListResponse> {
        let page = query.page.max(1);
        let size = query.size.max(1);

        let mut select = Assignments::find();

        // 创建者筛选
        if let Some(creator_id) = query.creator_id {
            select = select.filter(Column::CreatorId.eq(creator_id));
        }

        // 状态筛选
        if let Some(status) = query.status {
            select = select.filter(Column::Status.eq(status.to_string()));
        }

        // 搜索条件（按标题搜索）
        if let Some(ref search) = query.search
            && !search.trim().is_empty()
        {
            let escaped = escape_like_pattern(search.trim());
            select =
                select.filter(Column::Title.like(LikeExpr::new(format!("%{escaped}%")).escape('\\')));
        }

        // 排序
        select = select.order_by_desc(Column::CreatedAt);

        // 分页查询
        let paginator = select.paginate(&self.db, size);
        let total = paginator
            .num_items()
            .await
            .map_err(|e| AssignmentError::unavailable(format!("查询作业总数失败: {e}")))?;

        // 超出范围的页码不再查询
        let in_range = (page - 1).checked_mul(size).is_some_and(|offset| offset < total);
        let items: Vec<Assignment> = if in_range {
            paginator
                .fetch_page(page - 1)
                .await
                .map_err(|e| AssignmentError::unavailable(format!("查询作业列表失败: {e}")))?
                .into_iter()
                .map(|m| m.into_assignment())
                .collect()
        } else {
            Vec::new()
        };

        Ok(AssignmentListResponse {
            items,
            pagination: PaginationInfo::new(page, size, total),
        })
    }

    /// 列出截止时间在 (from, to] 内的已发布作业
    pub async fn list_published_assignments_due_between_impl(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<Assignment>> {
        let results = Assignments::find()
            .filter(Column::Status.eq(AssignmentStatus::Published.to_string()))
            .filter(Column::DueDate.gt(from.timestamp()))
            .filter(Column::DueDate.lte(to.timestamp()))
            .order_by_asc(Column::DueDate)
            .all(&self.db)
            .await
            .map_err(|e| AssignmentError::unavailable(format!("查询即将截止作业失败: {e}")))?;

        Ok(results.into_iter().map(|m| m.into_assignment()).collect())
    }
}
