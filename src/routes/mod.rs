pub mod assignments;

pub mod submissions;

pub mod files;

pub use assignments::configure_assignments_routes;
pub use files::configure_file_routes;
pub use submissions::configure_submissions_routes;

use actix_web::{HttpResponse, http::StatusCode};
use serde::Serialize;
use tracing::warn;

use crate::errors::{AssignmentError, Result};
use crate::models::{ApiResponse, ErrorCode};

/// 错误所属的资源，决定 NotFound / InvalidState 的响应码
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Resource {
    Assignment,
    Submission,
    File,
}

pub(crate) fn error_code(err: &AssignmentError, resource: Resource) -> ErrorCode {
    match (err, resource) {
        (AssignmentError::NotFound(_), Resource::Assignment) => ErrorCode::AssignmentNotFound,
        (AssignmentError::NotFound(_), Resource::Submission) => ErrorCode::SubmissionNotFound,
        (AssignmentError::NotFound(_), Resource::File) => ErrorCode::FileNotFound,
        (AssignmentError::AccessDenied(_), _) => ErrorCode::Forbidden,
        (AssignmentError::DuplicateSubmission(_), _) => ErrorCode::SubmissionAlreadyExists,
        (AssignmentError::DeadlinePassed(_), _) => ErrorCode::SubmissionDeadlinePassed,
        (AssignmentError::InvalidState(_), Resource::Assignment) => {
            ErrorCode::AssignmentInvalidState
        }
        (AssignmentError::InvalidState(_), Resource::Submission) => {
            ErrorCode::SubmissionInvalidState
        }
        (AssignmentError::InvalidState(_), Resource::File) => ErrorCode::Conflict,
        (AssignmentError::Validation(_), Resource::Submission) => ErrorCode::SubmissionScoreInvalid,
        (AssignmentError::Validation(_), _) => ErrorCode::BadRequest,
        (AssignmentError::Unavailable(_), _) => ErrorCode::ServiceUnavailable,
        (AssignmentError::Authentication(_), _) => ErrorCode::Unauthorized,
        (AssignmentError::Configuration(_), _) | (AssignmentError::Serialization(_), _) => {
            ErrorCode::InternalServerError
        }
    }
}

pub(crate) fn error_response(err: &AssignmentError, resource: Resource) -> HttpResponse {
    let status =
        StatusCode::from_u16(err.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    if status.is_server_error() {
        warn!("{}", err.format_simple());
    }
    HttpResponse::build(status).json(ApiResponse::error_empty(
        error_code(err, resource),
        err.message(),
    ))
}

/// 把业务结果转换为统一响应
pub(crate) fn respond<T: Serialize>(
    result: Result<T>,
    resource: Resource,
    message: &str,
) -> HttpResponse {
    match result {
        Ok(data) => HttpResponse::Ok().json(ApiResponse::success(data, message)),
        Err(e) => error_response(&e, resource),
    }
}

pub(crate) fn respond_created<T: Serialize>(
    result: Result<T>,
    resource: Resource,
    message: &str,
) -> HttpResponse {
    match result {
        Ok(data) => HttpResponse::Created().json(ApiResponse::success(data, message)),
        Err(e) => error_response(&e, resource),
    }
}

pub(crate) fn respond_empty(result: Result<()>, resource: Resource, message: &str) -> HttpResponse {
    match result {
        Ok(()) => HttpResponse::Ok().json(ApiResponse::success_empty(message)),
        Err(e) => error_response(&e, resource),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes_depend_on_resource() {
        let not_found = AssignmentError::not_found("x");
        assert_eq!(
            error_code(&not_found, Resource::Assignment),
            ErrorCode::AssignmentNotFound
        );
        assert_eq!(
            error_code(&not_found, Resource::Submission),
            ErrorCode::SubmissionNotFound
        );
        assert_eq!(error_code(&not_found, Resource::File), ErrorCode::FileNotFound);

        let invalid = AssignmentError::validation("score");
        assert_eq!(
            error_code(&invalid, Resource::Submission),
            ErrorCode::SubmissionScoreInvalid
        );
        assert_eq!(error_code(&invalid, Resource::Assignment), ErrorCode::BadRequest);
    }

    #[test]
    fn test_error_response_status() {
        let resp = error_response(
            &AssignmentError::duplicate_submission("dup"),
            Resource::Submission,
        );
        assert_eq!(resp.status(), StatusCode::CONFLICT);

        let resp = error_response(&AssignmentError::deadline_passed("late"), Resource::Submission);
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let resp = error_response(&AssignmentError::unavailable("db"), Resource::File);
        assert_eq!(resp.status(), StatusCode::SERVICE_UNAVAILABLE);
    }
}
