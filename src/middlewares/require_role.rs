/*!
 * 基于角色的访问控制中间件
 *
 * 必须在 RequireJWT 之后使用，操作者拥有任一所需角色即可通过。
 *
 * ```rust,ignore
 * .wrap(RequireRole::new_any(RoleName::teacher_roles()))
 * .wrap(RequireJWT)
 * ```
 */

use actix_service::{Service, Transform};
use actix_web::{
    Error, HttpMessage,
    body::EitherBody,
    dev::{ServiceRequest, ServiceResponse},
    http::StatusCode,
};
use futures_util::future::{LocalBoxFuture, Ready, ready};
use std::rc::Rc;
use tracing::info;

use super::create_error_response;
use crate::models::ErrorCode;
use crate::models::users::entities::{Principal, RoleName};

#[derive(Clone)]
pub struct RequireRole {
    required_roles: Vec<RoleName>,
}

impl RequireRole {
    /// 创建需要特定角色的中间件
    pub fn new(role: RoleName) -> Self {
        Self {
            required_roles: vec![role],
        }
    }

    /// 创建需要任一角色的中间件
    pub fn new_any(roles: &[&RoleName]) -> Self {
        Self {
            required_roles: roles.iter().map(|r| **r).collect(),
        }
    }
}

impl<S, B> Transform<S, ServiceRequest> for RequireRole
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = RequireRoleMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RequireRoleMiddleware {
            service: Rc::new(service),
            required_roles: self.required_roles.clone(),
        }))
    }
}

pub struct RequireRoleMiddleware<S> {
    service: Rc<S>,
    required_roles: Vec<RoleName>,
}

impl<S, B> Service<ServiceRequest> for RequireRoleMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(
        &self,
        ctx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Result<(), Self::Error>> {
        self.service.poll_ready(ctx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let srv = self.service.clone();
        let required_roles = self.required_roles.clone();

        Box::pin(async move {
            let principal = req.extensions().get::<Principal>().cloned();

            match principal {
                Some(principal) => {
                    let refs: Vec<&RoleName> = required_roles.iter().collect();
                    if principal.has_any_role(&refs) {
                        let res = srv.call(req).await?.map_into_left_body();
                        Ok(res)
                    } else {
                        info!(
                            "Access denied for user {} (roles: {:?}). Required roles: {:?}",
                            principal.id, principal.roles, required_roles
                        );
                        Ok(req.into_response(
                            create_error_response(
                                StatusCode::FORBIDDEN,
                                ErrorCode::Forbidden,
                                "Access denied.",
                            )
                            .map_into_right_body(),
                        ))
                    }
                }
                None => {
                    info!(
                        "Role check failed: No principal found in request. Make sure RequireJWT middleware is applied first."
                    );
                    Ok(req.into_response(
                        create_error_response(
                            StatusCode::UNAUTHORIZED,
                            ErrorCode::Unauthorized,
                            "Authentication required",
                        )
                        .map_into_right_body(),
                    ))
                }
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{App, HttpResponse, dev::Service as _, test, web};

    async fn ok() -> HttpResponse {
        HttpResponse::Ok().finish()
    }

    async fn call_as(principal: Option<Principal>) -> StatusCode {
        let app = test::init_service(
            App::new().service(
                web::scope("/t")
                    .wrap(RequireRole::new_any(RoleName::teacher_roles()))
                    .route("", web::get().to(ok)),
            ),
        )
        .await;
        let req = test::TestRequest::get().uri("/t").to_request();
        if let Some(p) = principal {
            req.extensions_mut().insert(p);
        }
        app.call(req).await.unwrap().status()
    }

    #[actix_web::test]
    async fn test_teacher_roles_pass() {
        let status = call_as(Some(Principal::new(2, [RoleName::FranchiseTeacher]))).await;
        assert_eq!(status, StatusCode::OK);
    }

    #[actix_web::test]
    async fn test_student_forbidden_and_anonymous_unauthorized() {
        let status = call_as(Some(Principal::new(4, [RoleName::Student]))).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(call_as(None).await, StatusCode::UNAUTHORIZED);
    }
}
