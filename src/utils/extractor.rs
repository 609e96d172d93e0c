use actix_web::{FromRequest, HttpRequest, HttpResponse, dev::Payload, error::InternalError};
use futures_util::future::{Ready, ready};

use crate::models::{ApiResponse, ErrorCode};

/// 路径中的 `{id}`，必须为正整数
#[derive(Debug, Clone, Copy)]
pub struct SafeIDI64(pub i64);

fn parse_positive_id(raw: &str) -> Option<i64> {
    raw.parse::<i64>().ok().filter(|id| *id > 0)
}

fn bad_path_error(message: String) -> actix_web::Error {
    InternalError::from_response(
        message.clone(),
        HttpResponse::BadRequest().json(ApiResponse::error_empty(ErrorCode::BadRequest, message)),
    )
    .into()
}

impl FromRequest for SafeIDI64 {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        // 兼容 `/{id}` 与 `/{plan_id}/stages` 这类路径
        let raw = req
            .match_info()
            .get("id")
            .or_else(|| req.match_info().iter().next().map(|(_, v)| v));

        let result = match raw {
            Some(raw) => parse_positive_id(raw)
                .map(SafeIDI64)
                .ok_or_else(|| bad_path_error(format!("Invalid id: {raw}"))),
            None => Err(bad_path_error("Missing id in path".to_string())),
        };
        ready(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_positive_id() {
        assert_eq!(parse_positive_id("42"), Some(42));
        assert_eq!(parse_positive_id("0"), None);
        assert_eq!(parse_positive_id("-1"), None);
        assert_eq!(parse_positive_id("abc"), None);
        assert_eq!(parse_positive_id("1; DROP TABLE"), None);
    }
}
