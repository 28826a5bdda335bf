//! 预导入模块，方便使用

pub use super::assignment_files::{
    ActiveModel as AssignmentFileActiveModel, Entity as AssignmentFiles,
    Model as AssignmentFileModel,
};
pub use super::assignments::{
    ActiveModel as AssignmentActiveModel, Entity as Assignments, Model as AssignmentModel,
};
pub use super::submissions::{
    ActiveModel as SubmissionActiveModel, Entity as Submissions, Model as SubmissionModel,
};
