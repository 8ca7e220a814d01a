use actix_web::{HttpRequest, HttpResponse, error, web};

use crate::models::{ApiResponse, ErrorCode};

/// JSON 请求体解析失败时返回统一的错误响应
pub fn json_error_handler(err: error::JsonPayloadError, _req: &HttpRequest) -> error::Error {
    let message = match &err {
        error::JsonPayloadError::ContentType => "Content type must be application/json".to_string(),
        error::JsonPayloadError::OverflowKnownLength { .. } | error::JsonPayloadError::Overflow { .. } => {
            "Request body is too large".to_string()
        }
        other => format!("Invalid JSON body: {other}"),
    };
    tracing::debug!("JSON 参数错误: {}", err);

    let response =
        HttpResponse::BadRequest().json(ApiResponse::error_empty(ErrorCode::BadRequest, message));
    error::InternalError::from_response(err, response).into()
}

/// 查询参数解析失败时返回统一的错误响应
pub fn query_error_handler(err: error::QueryPayloadError, _req: &HttpRequest) -> error::Error {
    let message = format!("Invalid query parameters: {err}");
    tracing::debug!("查询参数错误: {}", err);

    let response =
        HttpResponse::BadRequest().json(ApiResponse::error_empty(ErrorCode::BadRequest, message));
    error::InternalError::from_response(err, response).into()
}

/// 路径参数解析失败时返回统一的错误响应
pub fn path_error_handler(err: error::PathError, _req: &HttpRequest) -> error::Error {
    let message = format!("Invalid path parameter: {err}");

    let response =
        HttpResponse::BadRequest().json(ApiResponse::error_empty(ErrorCode::BadRequest, message));
    error::InternalError::from_response(err, response).into()
}

/// 注册到 App 的参数解析配置
pub fn configure_parameter_handlers(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::QueryConfig::default().error_handler(query_error_handler))
        .app_data(web::JsonConfig::default().error_handler(json_error_handler))
        .app_data(web::PathConfig::default().error_handler(path_error_handler));
}
