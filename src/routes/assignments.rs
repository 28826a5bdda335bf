use actix_web::{HttpResponse, Result as ActixResult, web};
use uuid::Uuid;

use super::{Resource, respond, respond_created, respond_empty};
use crate::middlewares;
use crate::models::assignments::requests::{
    AssignmentListParams, ChangeStatusRequest, CreateAssignmentRequest, DueSoonParams,
    UpdateAssignmentRequest,
};
use crate::models::submissions::requests::CreateSubmissionRequest;
use crate::models::submissions::responses::SubmissionListResponse;
use crate::models::users::entities::{Principal, RoleName};
use crate::services::{AssignmentService, SubmissionService};

// 列出作业
pub async fn list_assignments(
    principal: Principal,
    service: web::Data<AssignmentService>,
    query: web::Query<AssignmentListParams>,
) -> ActixResult<HttpResponse> {
    let result = service.list_visible(&principal, query.into_inner()).await;
    Ok(respond(result, Resource::Assignment, "获取作业列表成功"))
}

// 创建作业
pub async fn create_assignment(
    principal: Principal,
    service: web::Data<AssignmentService>,
    body: web::Json<CreateAssignmentRequest>,
) -> ActixResult<HttpResponse> {
    let result = service.create(&principal, body.into_inner()).await;
    Ok(respond_created(result, Resource::Assignment, "作业创建成功"))
}

// 学生的作业列表（含本人提交状态）
pub async fn list_my_assignments(
    principal: Principal,
    service: web::Data<AssignmentService>,
    query: web::Query<AssignmentListParams>,
) -> ActixResult<HttpResponse> {
    let result = service
        .list_my_assignments(&principal, query.into_inner())
        .await;
    Ok(respond(result, Resource::Assignment, "获取我的作业列表成功"))
}

// 即将截止的作业
pub async fn list_due_soon(
    principal: Principal,
    service: web::Data<AssignmentService>,
    query: web::Query<DueSoonParams>,
) -> ActixResult<HttpResponse> {
    let result = service.list_due_soon(&principal, query.hours).await;
    Ok(respond(result, Resource::Assignment, "获取即将截止的作业成功"))
}

// 获取作业详情
pub async fn get_assignment(
    principal: Principal,
    service: web::Data<AssignmentService>,
    path: web::Path<Uuid>,
) -> ActixResult<HttpResponse> {
    let result = service.get(&principal, path.into_inner()).await;
    Ok(respond(result, Resource::Assignment, "获取作业详情成功"))
}

// 更新作业
pub async fn update_assignment(
    principal: Principal,
    service: web::Data<AssignmentService>,
    path: web::Path<Uuid>,
    body: web::Json<UpdateAssignmentRequest>,
) -> ActixResult<HttpResponse> {
    let result = service
        .update(&principal, path.into_inner(), body.into_inner())
        .await;
    Ok(respond(result, Resource::Assignment, "作业更新成功"))
}

// 删除作业
pub async fn delete_assignment(
    principal: Principal,
    service: web::Data<AssignmentService>,
    path: web::Path<Uuid>,
) -> ActixResult<HttpResponse> {
    let result = service.delete(&principal, path.into_inner()).await;
    Ok(respond_empty(result, Resource::Assignment, "作业删除成功"))
}

// 变更作业状态
pub async fn change_status(
    principal: Principal,
    service: web::Data<AssignmentService>,
    path: web::Path<Uuid>,
    body: web::Json<ChangeStatusRequest>,
) -> ActixResult<HttpResponse> {
    let result = service
        .change_status(&principal, path.into_inner(), body.status)
        .await;
    Ok(respond(result, Resource::Assignment, "作业状态已更新"))
}

// 作业统计
pub async fn get_statistics(
    principal: Principal,
    service: web::Data<AssignmentService>,
    path: web::Path<Uuid>,
) -> ActixResult<HttpResponse> {
    let result = service.statistics(&principal, path.into_inner()).await;
    Ok(respond(result, Resource::Assignment, "获取作业统计成功"))
}

// 作业下的提交列表
pub async fn list_submissions(
    principal: Principal,
    service: web::Data<AssignmentService>,
    path: web::Path<Uuid>,
) -> ActixResult<HttpResponse> {
    let result = service
        .list_submissions(&principal, path.into_inner())
        .await
        .map(SubmissionListResponse::from);
    Ok(respond(result, Resource::Assignment, "获取提交列表成功"))
}

// 提交作业
pub async fn submit(
    principal: Principal,
    service: web::Data<SubmissionService>,
    path: web::Path<Uuid>,
    body: web::Json<CreateSubmissionRequest>,
) -> ActixResult<HttpResponse> {
    let result = service
        .submit(&principal, path.into_inner(), body.into_inner())
        .await;
    Ok(respond_created(result, Resource::Assignment, "作业提交成功"))
}

// 我的提交
pub async fn get_my_submission(
    principal: Principal,
    service: web::Data<SubmissionService>,
    path: web::Path<Uuid>,
) -> ActixResult<HttpResponse> {
    let result = service.get_mine(&principal, path.into_inner()).await;
    Ok(respond(result, Resource::Assignment, "获取我的提交成功"))
}

// 作业附件
pub async fn list_files(
    principal: Principal,
    service: web::Data<AssignmentService>,
    path: web::Path<Uuid>,
) -> ActixResult<HttpResponse> {
    let result = service.list_files(&principal, path.into_inner()).await;
    Ok(respond(result, Resource::Assignment, "获取作业文件成功"))
}

// 配置路由
pub fn configure_assignments_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/assignments")
            .wrap(middlewares::RequireJWT)
            .service(
                web::resource("")
                    // 列出作业 - 所有登录用户（业务层按角色过滤）
                    .route(web::get().to(list_assignments))
                    // 创建作业 - 仅教师和管理员
                    .route(
                        web::post()
                            .to(create_assignment)
                            .wrap(middlewares::RequireRole::new_any(RoleName::teacher_roles())),
                    ),
            )
            // 我的作业 - 需在 /{id} 之前注册
            .service(web::resource("/my").route(web::get().to(list_my_assignments)))
            // 即将截止 - 仅教师和管理员，需在 /{id} 之前注册
            .service(
                web::resource("/due-soon")
                    .route(web::get().to(list_due_soon))
                    .wrap(middlewares::RequireRole::new_any(RoleName::teacher_roles())),
            )
            .service(
                web::resource("/{id}")
                    .route(web::get().to(get_assignment))
                    .route(web::put().to(update_assignment))
                    .route(web::delete().to(delete_assignment)),
            )
            .service(web::resource("/{id}/status").route(web::put().to(change_status)))
            .service(web::resource("/{id}/statistics").route(web::get().to(get_statistics)))
            .service(
                web::resource("/{id}/submissions")
                    .route(web::get().to(list_submissions))
                    .route(web::post().to(submit)),
            )
            .service(web::resource("/{id}/submissions/my").route(web::get().to(get_my_submission)))
            .service(web::resource("/{id}/files").route(web::get().to(list_files))),
    );
}
