use crate::config::{AppConfig, JwtConfig};
use actix_web::cookie::{Cookie, SameSite};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

pub const REFRESH_COOKIE_NAME: &str = "refresh_token";

/// token 类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenKind {
    Access,
    Refresh,
}

// JWT Claims 结构体
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,           // 账号 ID
    pub role: String,          // 账号角色
    pub token_type: TokenKind, // access / refresh
    pub exp: usize,
    pub iat: usize,
}

impl Claims {
    pub fn user_id(&self) -> Option<i64> {
        self.sub.parse().ok()
    }
}

// Token 对
#[derive(Debug, Serialize, Deserialize)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}

pub struct JwtUtils;

impl JwtUtils {
    fn config() -> &'static JwtConfig {
        &AppConfig::get().jwt
    }

    /// 使用指定密钥签发 token
    pub fn sign(
        secret: &str,
        user_id: i64,
        role: &str,
        kind: TokenKind,
        ttl: chrono::TimeDelta,
    ) -> Result<String, jsonwebtoken::errors::Error> {
        let now = chrono::Utc::now();
        let claims = Claims {
            sub: user_id.to_string(),
            role: role.to_string(),
            token_type: kind,
            exp: (now + ttl).timestamp() as usize,
            iat: now.timestamp() as usize,
        };

        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
    }

    /// 使用指定密钥校验 token 并检查类型
    pub fn verify(
        secret: &str,
        token: &str,
        expected: TokenKind,
    ) -> Result<Claims, jsonwebtoken::errors::Error> {
        let claims = decode::<Claims>(
            token,
            &DecodingKey::from_secret(secret.as_bytes()),
            &Validation::default(),
        )?
        .claims;

        if claims.token_type != expected {
            return Err(jsonwebtoken::errors::ErrorKind::InvalidToken.into());
        }
        Ok(claims)
    }

    // 生成 Access Token
    pub fn generate_access_token(
        user_id: i64,
        role: &str,
    ) -> Result<String, jsonwebtoken::errors::Error> {
        let config = Self::config();
        Self::sign(
            &config.secret,
            user_id,
            role,
            TokenKind::Access,
            chrono::TimeDelta::minutes(config.access_token_expiry),
        )
    }

    // 生成 access + refresh token 对
    pub fn generate_token_pair(
        user_id: i64,
        role: &str,
        refresh_token_expiry: Option<chrono::TimeDelta>,
    ) -> Result<TokenPair, jsonwebtoken::errors::Error> {
        let config = Self::config();
        let refresh_ttl = refresh_token_expiry
            .unwrap_or_else(|| chrono::TimeDelta::days(config.refresh_token_expiry));

        Ok(TokenPair {
            access_token: Self::generate_access_token(user_id, role)?,
            refresh_token: Self::sign(
                &config.secret,
                user_id,
                role,
                TokenKind::Refresh,
                refresh_ttl,
            )?,
        })
    }

    // 验证 Access Token
    pub fn verify_access_token(token: &str) -> Result<Claims, jsonwebtoken::errors::Error> {
        Self::verify(&Self::config().secret, token, TokenKind::Access)
    }

    // 验证 Refresh Token
    pub fn verify_refresh_token(token: &str) -> Result<Claims, jsonwebtoken::errors::Error> {
        Self::verify(&Self::config().secret, token, TokenKind::Refresh)
    }

    /// 创建 Refresh Token Cookie
    pub fn create_refresh_token_cookie(
        refresh_token: &str,
        max_age: chrono::TimeDelta,
    ) -> Cookie<'static> {
        Cookie::build(REFRESH_COOKIE_NAME, refresh_token.to_string())
            .path("/")
            .max_age(actix_web::cookie::time::Duration::seconds(
                max_age.num_seconds(),
            ))
            .same_site(SameSite::Strict)
            .http_only(true)
            .secure(AppConfig::get().is_production()) // 生产环境下使用 HTTPS
            .finish()
    }

    /// 创建空的 Refresh Token Cookie（用于注销）
    pub fn create_empty_refresh_token_cookie() -> Cookie<'static> {
        Cookie::build(REFRESH_COOKIE_NAME, "")
            .path("/")
            .max_age(actix_web::cookie::time::Duration::seconds(0))
            .same_site(SameSite::Strict)
            .http_only(true)
            .secure(AppConfig::get().is_production())
            .finish()
    }

    /// 从请求中提取 Refresh Token
    pub fn extract_refresh_token_from_cookie(req: &actix_web::HttpRequest) -> Option<String> {
        req.cookie(REFRESH_COOKIE_NAME)
            .map(|cookie| cookie.value().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "test-secret";

    #[test]
    fn test_sign_and_verify() {
        let token = JwtUtils::sign(
            SECRET,
            42,
            "student",
            TokenKind::Access,
            chrono::TimeDelta::minutes(5),
        )
        .unwrap();
        let claims = JwtUtils::verify(SECRET, &token, TokenKind::Access).unwrap();
        assert_eq!(claims.user_id(), Some(42));
        assert_eq!(claims.role, "student");
    }

    #[test]
    fn test_refresh_token_is_not_an_access_token() {
        let token = JwtUtils::sign(
            SECRET,
            1,
            "staff",
            TokenKind::Refresh,
            chrono::TimeDelta::days(1),
        )
        .unwrap();
        assert!(JwtUtils::verify(SECRET, &token, TokenKind::Access).is_err());
        assert!(JwtUtils::verify("other-secret", &token, TokenKind::Refresh).is_err());
    }

    #[test]
    fn test_expired_token_rejected() {
        let token = JwtUtils::sign(
            SECRET,
            1,
            "student",
            TokenKind::Access,
            chrono::TimeDelta::minutes(-10),
        )
        .unwrap();
        assert!(JwtUtils::verify(SECRET, &token, TokenKind::Access).is_err());
    }
}
