pub mod assignments;
pub mod files;
pub mod permissions;
pub mod submissions;

pub use assignments::AssignmentService;
pub use files::FileService;
pub use submissions::SubmissionService;
