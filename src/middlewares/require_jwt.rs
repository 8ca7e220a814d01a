/*!
 * JWT 认证中间件
 *
 * 校验 `Authorization: Bearer <token>` 中的 access token，加载对应账号并放入请求扩展。
 *
 * ```rust,ignore
 * web::scope("/api/v1/exercises")
 *     .wrap(RequireJWT)
 *     .route("", web::get().to(dashboard))
 * ```
 *
 * 处理程序中通过 `RequireJWT::extract_user(&req)` 取回账号。
 *
 * ## 认证流程
 *
 * 1. 提取并验证 access token
 * 2. 先查缓存（键为 `account:<token>`），未命中再查数据库并写回缓存
 * 3. 未激活的账号返回 403，其余失败返回 401
 */

use crate::cache::{CacheResult, ObjectCache};
use crate::models::users::entities::User;
use crate::models::ErrorCode;
use crate::storage::Storage;
use crate::utils::jwt::JwtUtils;
use actix_service::{Service, Transform};
use actix_web::{
    Error, HttpMessage, HttpResponse,
    body::EitherBody,
    dev::{ServiceRequest, ServiceResponse},
    http::StatusCode,
    web,
};
use futures_util::future::{LocalBoxFuture, Ready, ready};
use std::{rc::Rc, sync::Arc};
use tracing::{debug, info};

use super::create_error_response;

const BEARER_PREFIX: &str = "Bearer ";

#[derive(Clone)]
pub struct RequireJWT;

// 认证失败原因
enum AuthFailure {
    Unauthorized(&'static str),
    Inactive,
}

impl AuthFailure {
    fn into_response(self) -> HttpResponse {
        match self {
            AuthFailure::Unauthorized(reason) => create_error_response(
                StatusCode::UNAUTHORIZED,
                ErrorCode::Unauthorized,
                &format!("Unauthorized: {reason}"),
            ),
            AuthFailure::Inactive => create_error_response(
                StatusCode::FORBIDDEN,
                ErrorCode::AccountInactive,
                "Account is not active",
            ),
        }
    }
}

fn cache_key(token: &str) -> String {
    format!("account:{token}")
}

// 提取并验证 access token，返回对应账号
async fn authenticate(req: &ServiceRequest) -> Result<User, AuthFailure> {
    let token = req
        .headers()
        .get(actix_web::http::header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|s| s.strip_prefix(BEARER_PREFIX))
        .ok_or(AuthFailure::Unauthorized(
            "Missing or invalid Authorization header",
        ))?;

    let claims = JwtUtils::verify_access_token(token).map_err(|err| {
        info!("JWT token validation failed: {}", err);
        AuthFailure::Unauthorized("Invalid JWT token")
    })?;

    let cache = req
        .app_data::<web::Data<Arc<dyn ObjectCache>>>()
        .map(|data| data.get_ref().clone());

    if let Some(cache) = &cache
        && let CacheResult::Found(user) = cache.get::<User>(&cache_key(token)).await
    {
        return Ok(user);
    }

    let storage = req
        .app_data::<web::Data<Arc<dyn Storage>>>()
        .map(|data| data.get_ref().clone())
        .ok_or(AuthFailure::Unauthorized("Storage unavailable"))?;

    let user_id = claims
        .user_id()
        .ok_or(AuthFailure::Unauthorized("Invalid user ID in JWT"))?;

    let user = storage
        .get_user_by_id(user_id)
        .await
        .map_err(|e| {
            info!("Failed to load account {}: {}", user_id, e);
            AuthFailure::Unauthorized("Failed to retrieve account")
        })?
        .ok_or(AuthFailure::Unauthorized("Account not found"))?;

    if !user.is_active() {
        return Err(AuthFailure::Inactive);
    }

    if let Some(cache) = &cache {
        cache.insert(cache_key(token), &user).await;
    }

    Ok(user)
}

impl<S, B> Transform<S, ServiceRequest> for RequireJWT
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = RequireJWTMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RequireJWTMiddleware {
            service: Rc::new(service),
        }))
    }
}

pub struct RequireJWTMiddleware<S> {
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for RequireJWTMiddleware<S>
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
        Box::pin(async move {
            // 预检请求直接放行
            if req.method() == actix_web::http::Method::OPTIONS {
                return Ok(req.into_response(HttpResponse::NoContent().finish().map_into_right_body()));
            }

            match authenticate(&req).await {
                Ok(user) => {
                    debug!("JWT authentication successful for ID: {}", user.id);
                    req.extensions_mut().insert(user);
                    let res = srv.call(req).await?.map_into_left_body();
                    Ok(res)
                }
                Err(failure) => {
                    info!("JWT authentication failed for request to {}", req.path());
                    Ok(req.into_response(failure.into_response().map_into_right_body()))
                }
            }
        })
    }
}

// 辅助函数：从请求中提取账号信息
impl RequireJWT {
    /// 从请求扩展中提取账号，须在 RequireJWT 保护的路由中使用
    pub fn extract_user(req: &actix_web::HttpRequest) -> Option<User> {
        req.extensions().get::<User>().cloned()
    }

    pub fn extract_user_id(req: &actix_web::HttpRequest) -> Option<i64> {
        req.extensions().get::<User>().map(|user| user.id)
    }
}
