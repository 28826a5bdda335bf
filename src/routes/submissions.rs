use actix_web::{HttpResponse, Result as ActixResult, web};
use uuid::Uuid;

use super::{Resource, respond};
use crate::middlewares;
use crate::models::submissions::requests::{GradeSubmissionRequest, UpdateSubmissionRequest};
use crate::models::submissions::responses::SubmissionListResponse;
use crate::models::users::entities::{Principal, RoleName};
use crate::services::SubmissionService;

// 我的全部提交
pub async fn list_my_submissions(
    principal: Principal,
    service: web::Data<SubmissionService>,
) -> ActixResult<HttpResponse> {
    let result = service
        .list_for_student(&principal)
        .await
        .map(SubmissionListResponse::from);
    Ok(respond(result, Resource::Submission, "获取我的提交成功"))
}

// 待批改的提交
pub async fn list_pending(
    principal: Principal,
    service: web::Data<SubmissionService>,
) -> ActixResult<HttpResponse> {
    let result = service
        .list_pending_for_teacher(&principal)
        .await
        .map(SubmissionListResponse::from);
    Ok(respond(result, Resource::Submission, "获取待批改提交成功"))
}

pub async fn get_submission(
    principal: Principal,
    service: web::Data<SubmissionService>,
    path: web::Path<Uuid>,
) -> ActixResult<HttpResponse> {
    let result = service.get(&principal, path.into_inner()).await;
    Ok(respond(result, Resource::Submission, "获取提交详情成功"))
}

pub async fn update_submission(
    principal: Principal,
    service: web::Data<SubmissionService>,
    path: web::Path<Uuid>,
    body: web::Json<UpdateSubmissionRequest>,
) -> ActixResult<HttpResponse> {
    let result = service
        .update(&principal, path.into_inner(), body.into_inner())
        .await;
    Ok(respond(result, Resource::Submission, "提交已更新"))
}

// 提交结果
pub async fn get_submission_result(
    principal: Principal,
    service: web::Data<SubmissionService>,
    path: web::Path<Uuid>,
) -> ActixResult<HttpResponse> {
    let result = service.get_result(&principal, path.into_inner()).await;
    Ok(respond(result, Resource::Submission, "获取提交结果成功"))
}

// 批改提交
pub async fn grade_submission(
    principal: Principal,
    service: web::Data<SubmissionService>,
    path: web::Path<Uuid>,
    body: web::Json<GradeSubmissionRequest>,
) -> ActixResult<HttpResponse> {
    let result = service
        .grade(&principal, path.into_inner(), body.into_inner())
        .await;
    Ok(respond(result, Resource::Submission, "批改成功"))
}

// 配置路由
pub fn configure_submissions_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/submissions")
            .wrap(middlewares::RequireJWT)
            .service(web::resource("/my").route(web::get().to(list_my_submissions)))
            .service(
                web::resource("/pending")
                    .route(web::get().to(list_pending))
                    .wrap(middlewares::RequireRole::new_any(RoleName::teacher_roles())),
            )
            .service(
                web::resource("/{id}")
                    .route(web::get().to(get_submission))
                    .route(web::put().to(update_submission)),
            )
            .service(web::resource("/{id}/result").route(web::get().to(get_submission_result)))
            .service(web::resource("/{id}/grade").route(web::post().to(grade_submission))),
    );
}
