use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use crate::models::ApiResponse;
use crate::utils::jwt::JwtUtils;

/// 处理用户登出
///
/// 清空 `token` 与 `refresh_token` 两个 Cookie（max_age=0）。
/// 令牌仍然有效时顺带清除该用户的缓存。
pub async fn handle_logout(request: &HttpRequest) -> ActixResult<HttpResponse> {
    if let Some(user_id) = JwtUtils::extract_access_token(request)
        .and_then(|token| JwtUtils::verify_access_token(&token).ok())
        .and_then(|claims| claims.user_id())
    {
        crate::services::evict_cached_user(request, user_id).await;
    }

    let [access_cookie, refresh_cookie] = JwtUtils::create_empty_cookies();

    Ok(HttpResponse::Ok()
        .cookie(access_cookie)
        .cookie(refresh_cookie)
        .json(ApiResponse::success_empty("Logout successful")))
}
