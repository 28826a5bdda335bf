use actix_web::{HttpResponse, Result as ActixResult, web};
use uuid::Uuid;

use super::{Resource, respond, respond_created, respond_empty};
use crate::middlewares;
use crate::models::files::requests::RegisterFileRequest;
use crate::models::users::entities::Principal;
use crate::services::FileService;

// 登记文件
pub async fn register_file(
    principal: Principal,
    service: web::Data<FileService>,
    body: web::Json<RegisterFileRequest>,
) -> ActixResult<HttpResponse> {
    let result = service.register(&principal, body.into_inner()).await;
    Ok(respond_created(result, Resource::File, "文件登记成功"))
}

pub async fn list_my_files(
    principal: Principal,
    service: web::Data<FileService>,
) -> ActixResult<HttpResponse> {
    let result = service.list_mine(&principal).await;
    Ok(respond(result, Resource::File, "获取我的文件成功"))
}

pub async fn get_file(
    principal: Principal,
    service: web::Data<FileService>,
    path: web::Path<Uuid>,
) -> ActixResult<HttpResponse> {
    let result = service.get(&principal, path.into_inner()).await;
    Ok(respond(result, Resource::File, "获取文件信息成功"))
}

pub async fn delete_file(
    principal: Principal,
    service: web::Data<FileService>,
    path: web::Path<Uuid>,
) -> ActixResult<HttpResponse> {
    let result = service.delete(&principal, path.into_inner()).await;
    Ok(respond_empty(result, Resource::File, "文件已删除"))
}

// 配置路由
pub fn configure_file_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/files")
            .wrap(middlewares::RequireJWT)
            .service(web::resource("").route(web::post().to(register_file)))
            .service(web::resource("/my").route(web::get().to(list_my_files)))
            .service(
                web::resource("/{id}")
                    .route(web::get().to(get_file))
                    .route(web::delete().to(delete_file)),
            ),
    );
}
