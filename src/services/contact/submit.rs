use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, http::header};

use super::ContactService;
use crate::models::contact::requests::ContactRequest;
use crate::models::{ApiResponse, ErrorCode};
use crate::utils::jwt::JwtUtils;
use crate::utils::validate::validate_email;

/// 主题长度上限
pub const SUBJECT_MAX_LEN: usize = 200;

// 留言端点是公开的，携带有效 access token 时记录发送者
fn optional_sender(request: &HttpRequest) -> Option<i64> {
    let token = request
        .headers()
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")?;
    JwtUtils::verify_access_token(token).ok()?.user_id()
}

fn validate(message: &ContactRequest) -> Result<(), HttpResponse> {
    if let Some(field) = message.first_missing_field() {
        return Err(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::RequiredFieldMissing,
            format!("Field '{field}' is required"),
        )));
    }
    if let Err(msg) = validate_email(message.email.trim()) {
        return Err(HttpResponse::BadRequest()
            .json(ApiResponse::error_empty(ErrorCode::UserEmailInvalid, msg)));
    }
    if message.subject.trim().chars().count() > SUBJECT_MAX_LEN {
        return Err(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::BadRequest,
            "Subject must be at most 200 characters long",
        )));
    }
    Ok(())
}

pub async fn submit_message(
    service: &ContactService,
    request: &HttpRequest,
    message: ContactRequest,
) -> ActixResult<HttpResponse> {
    if let Err(response) = validate(&message) {
        return Ok(response);
    }

    let message = ContactRequest {
        name: message.name.trim().to_string(),
        email: message.email.trim().to_string(),
        subject: message.subject.trim().to_string(),
        message: message.message.trim().to_string(),
    };

    let storage = service.get_storage(request);
    match storage
        .create_contact_message(optional_sender(request), message)
        .await
    {
        Ok(saved) => {
            tracing::info!(
                "Contact message {} from {} <{}>: {}",
                saved.id,
                saved.name,
                saved.email,
                saved.subject
            );
            Ok(HttpResponse::Created().json(ApiResponse::success(
                saved,
                "Your message has been sent",
            )))
        }
        Err(e) => Ok(
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::ContactMessageFailed,
                format!("Failed to send message: {e}"),
            )),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::test::TestRequest;

    fn message() -> ContactRequest {
        ContactRequest {
            name: "Sarah".to_string(),
            email: "sarah@example.com".to_string(),
            subject: "Inscription".to_string(),
            message: "Bonjour, je souhaite inscrire mon fils.".to_string(),
        }
    }

    #[test]
    fn test_validate() {
        assert!(validate(&message()).is_ok());

        let mut bad_email = message();
        bad_email.email = "sarah".to_string();
        assert!(validate(&bad_email).is_err());

        let mut long_subject = message();
        long_subject.subject = "x".repeat(SUBJECT_MAX_LEN + 1);
        assert!(validate(&long_subject).is_err());
    }

    #[test]
    fn test_anonymous_sender() {
        let request = TestRequest::default().to_http_request();
        assert_eq!(optional_sender(&request), None);

        let request = TestRequest::default()
            .insert_header((header::AUTHORIZATION, "Basic abc"))
            .to_http_request();
        assert_eq!(optional_sender(&request), None);
    }
}
