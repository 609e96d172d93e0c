use crate::config::AppConfig;
use actix_web::cookie::{Cookie, SameSite};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

pub const ACCESS_TOKEN_COOKIE: &str = "token";
pub const REFRESH_TOKEN_COOKIE: &str = "refresh_token";

const ACCESS: &str = "access";
const REFRESH: &str = "refresh";
const DOWNLOAD: &str = "download";

// JWT Claims 结构体
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,        // 用户 ID
    pub role: String,       // 用户角色
    pub token_type: String, // "access" 或 "refresh"
    pub exp: usize,
    pub iat: usize,
}

impl Claims {
    pub fn user_id(&self) -> Option<i64> {
        self.sub.parse::<i64>().ok()
    }
}

// 文档下载链接的签名
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DownloadClaims {
    pub doc: i64,
    pub token_type: String,
    pub exp: usize,
    pub iat: usize,
}

// Token 响应结构体
#[derive(Debug, Serialize, Deserialize)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}

pub struct JwtUtils;

impl JwtUtils {
    fn get_secret() -> &'static str {
        &AppConfig::get().jwt.secret
    }

    fn encode_claims<T: Serialize>(claims: &T) -> Result<String, jsonwebtoken::errors::Error> {
        let encoding_key = EncodingKey::from_secret(Self::get_secret().as_bytes());
        encode(&Header::default(), claims, &encoding_key)
    }

    fn decode_claims<T: for<'de> Deserialize<'de>>(
        token: &str,
    ) -> Result<T, jsonwebtoken::errors::Error> {
        let decoding_key = DecodingKey::from_secret(Self::get_secret().as_bytes());
        decode::<T>(token, &decoding_key, &Validation::default()).map(|data| data.claims)
    }

    pub fn generate_access_token(
        user_id: i64,
        role: &str,
    ) -> Result<String, jsonwebtoken::errors::Error> {
        let config = AppConfig::get();
        Self::generate_token_with_expiry(
            user_id,
            role,
            ACCESS,
            chrono::Duration::minutes(config.jwt.access_token_expiry),
        )
    }

    pub fn generate_refresh_token(
        user_id: i64,
        role: &str,
        token_expiry: Option<chrono::Duration>,
    ) -> Result<String, jsonwebtoken::errors::Error> {
        let expiry = token_expiry.unwrap_or_else(|| {
            chrono::Duration::days(AppConfig::get().jwt.refresh_token_expiry)
        });
        Self::generate_token_with_expiry(user_id, role, REFRESH, expiry)
    }

    pub fn generate_token_with_expiry(
        user_id: i64,
        role: &str,
        token_type: &str,
        expiry_duration: chrono::Duration,
    ) -> Result<String, jsonwebtoken::errors::Error> {
        let now = chrono::Utc::now();
        let claims = Claims {
            sub: user_id.to_string(),
            role: role.to_string(),
            token_type: token_type.to_string(),
            exp: (now + expiry_duration).timestamp() as usize,
            iat: now.timestamp() as usize,
        };
        Self::encode_claims(&claims)
    }

    pub fn generate_token_pair(
        user_id: i64,
        role: &str,
        refresh_token_expiry: Option<chrono::Duration>,
    ) -> Result<TokenPair, jsonwebtoken::errors::Error> {
        Ok(TokenPair {
            access_token: Self::generate_access_token(user_id, role)?,
            refresh_token: Self::generate_refresh_token(user_id, role, refresh_token_expiry)?,
        })
    }

    pub fn verify_token(token: &str) -> Result<Claims, jsonwebtoken::errors::Error> {
        Self::decode_claims::<Claims>(token)
    }

    // 验证 token 是否为指定类型
    pub fn verify_token_type(
        token: &str,
        expected_type: &str,
    ) -> Result<Claims, jsonwebtoken::errors::Error> {
        let claims = Self::verify_token(token)?;
        if claims.token_type != expected_type {
            return Err(jsonwebtoken::errors::ErrorKind::InvalidToken.into());
        }
        Ok(claims)
    }

    pub fn verify_access_token(token: &str) -> Result<Claims, jsonwebtoken::errors::Error> {
        Self::verify_token_type(token, ACCESS)
    }

    pub fn verify_refresh_token(token: &str) -> Result<Claims, jsonwebtoken::errors::Error> {
        Self::verify_token_type(token, REFRESH)
    }

    /// 为文档生成限时下载签名，返回 (token, 有效秒数)
    pub fn generate_download_token(
        document_id: i64,
    ) -> Result<(String, i64), jsonwebtoken::errors::Error> {
        let ttl = AppConfig::get().documents.signed_url_ttl;
        let now = chrono::Utc::now();
        let claims = DownloadClaims {
            doc: document_id,
            token_type: DOWNLOAD.to_string(),
            exp: (now + chrono::Duration::seconds(ttl)).timestamp() as usize,
            iat: now.timestamp() as usize,
        };
        Ok((Self::encode_claims(&claims)?, ttl))
    }

    /// 校验下载签名，返回其绑定的文档 ID
    pub fn verify_download_token(token: &str) -> Result<i64, jsonwebtoken::errors::Error> {
        let claims = Self::decode_claims::<DownloadClaims>(token)?;
        if claims.token_type != DOWNLOAD {
            return Err(jsonwebtoken::errors::ErrorKind::InvalidToken.into());
        }
        Ok(claims.doc)
    }

    fn build_cookie(name: &'static str, value: &str, max_age: chrono::Duration) -> Cookie<'static> {
        let config = AppConfig::get();
        Cookie::build(name, value.to_string())
            .path("/")
            .max_age(actix_web::cookie::time::Duration::seconds(
                max_age.num_seconds(),
            ))
            .same_site(SameSite::Strict)
            .http_only(true)
            .secure(config.is_production()) // 生产环境下使用 HTTPS
            .finish()
    }

    pub fn create_access_token_cookie(access_token: &str) -> Cookie<'static> {
        let minutes = AppConfig::get().jwt.access_token_expiry;
        Self::build_cookie(
            ACCESS_TOKEN_COOKIE,
            access_token,
            chrono::Duration::minutes(minutes),
        )
    }

    pub fn create_refresh_token_cookie(
        refresh_token: &str,
        expiry: Option<chrono::Duration>,
    ) -> Cookie<'static> {
        let expiry = expiry.unwrap_or_else(|| {
            chrono::Duration::days(AppConfig::get().jwt.refresh_token_expiry)
        });
        Self::build_cookie(REFRESH_TOKEN_COOKIE, refresh_token, expiry)
    }

    /// 注销时清空两个 Cookie
    pub fn create_empty_cookies() -> [Cookie<'static>; 2] {
        [
            Self::build_cookie(ACCESS_TOKEN_COOKIE, "", chrono::Duration::zero()),
            Self::build_cookie(REFRESH_TOKEN_COOKIE, "", chrono::Duration::zero()),
        ]
    }

    pub fn extract_refresh_token_from_cookie(req: &actix_web::HttpRequest) -> Option<String> {
        req.cookie(REFRESH_TOKEN_COOKIE)
            .map(|cookie| cookie.value().to_string())
    }

    /// 优先读取 Cookie，其次是 `Authorization: Bearer`
    pub fn extract_access_token(req: &actix_web::HttpRequest) -> Option<String> {
        if let Some(cookie) = req.cookie(ACCESS_TOKEN_COOKIE)
            && !cookie.value().is_empty()
        {
            return Some(cookie.value().to_string());
        }
        req.headers()
            .get(actix_web::http::header::AUTHORIZATION)
            .and_then(|h| h.to_str().ok())
            .and_then(|h| h.strip_prefix("Bearer "))
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_access_and_refresh_are_not_interchangeable() {
        let pair = JwtUtils::generate_token_pair(7, "GIAOVIEN", None).unwrap();

        let claims = JwtUtils::verify_access_token(&pair.access_token).unwrap();
        assert_eq!(claims.user_id(), Some(7));
        assert_eq!(claims.role, "GIAOVIEN");

        assert!(JwtUtils::verify_refresh_token(&pair.access_token).is_err());
        assert!(JwtUtils::verify_access_token(&pair.refresh_token).is_err());
    }

    #[test]
    fn test_expired_token_is_rejected() {
        let token = JwtUtils::generate_token_with_expiry(
            1,
            "TRUONGBAN",
            "access",
            chrono::Duration::minutes(-10),
        )
        .unwrap();
        assert!(JwtUtils::verify_access_token(&token).is_err());
    }

    #[test]
    fn test_download_token_binds_document() {
        let (token, ttl) = JwtUtils::generate_download_token(99).unwrap();
        assert!(ttl > 0);
        assert_eq!(JwtUtils::verify_download_token(&token).unwrap(), 99);

        // 登录令牌不能当作下载签名
        let access = JwtUtils::generate_access_token(99, "TRUONGBAN").unwrap();
        assert!(JwtUtils::verify_download_token(&access).is_err());
        assert!(JwtUtils::verify_download_token("garbage").is_err());
    }

    #[test]
    fn test_logout_cookies_expire_immediately() {
        for cookie in JwtUtils::create_empty_cookies() {
            assert_eq!(cookie.value(), "");
            assert_eq!(
                cookie.max_age(),
                Some(actix_web::cookie::time::Duration::ZERO)
            );
            assert_eq!(cookie.http_only(), Some(true));
        }
    }
}
