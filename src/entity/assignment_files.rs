//! 作业文件实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "assignment_files")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub assignment_id: Option<Uuid>,
    pub uploaded_by: i64,
    pub file_name: String,
    pub file_path: String,
    pub file_size: Option<i64>,
    pub file_type: Option<String>,
    pub file_category: String,
    pub created_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::assignments::Entity",
        from = "Column::AssignmentId",
        to = "super::assignments::Column::Id",
        on_delete = "Cascade"
    )]
    Assignment,
}

impl Related<super::assignments::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Assignment.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_assignment_file(self) -> crate::models::files::entities::AssignmentFile {
        use crate::models::files::entities::AssignmentFile;
        use chrono::{DateTime, Utc};

        AssignmentFile {
            id: self.id,
            assignment_id: self.assignment_id,
            uploaded_by: self.uploaded_by,
            file_name: self.file_name,
            file_path: self.file_path,
            file_size: self.file_size,
            file_type: self.file_type,
            file_category: self.file_category.parse().unwrap_or_default(),
            created_at: DateTime::<Utc>::from_timestamp(self.created_at, 0).unwrap_or_default(),
        }
    }
}
