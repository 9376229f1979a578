use axum::http::{HeaderMap, HeaderValue, header::COOKIE};

pub const REFRESH_COOKIE: &str = "refreshToken";
/// Header alternative to the cookie for clients without a cookie jar.
pub const REFRESH_HEADER: &str = "x-refresh-token";

pub fn parse_cookie(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .find_map(|pair| {
            let (key, value) = pair.trim().split_once('=')?;
            (key == name && !value.is_empty()).then(|| value.to_string())
        })
}

/// Refresh token sent with a request, from the cookie or the header.
pub fn presented_refresh_token(headers: &HeaderMap) -> Option<String> {
    parse_cookie(headers, REFRESH_COOKIE).or_else(|| {
        headers
            .get(REFRESH_HEADER)
            .and_then(|h| h.to_str().ok())
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .map(str::to_string)
    })
}

pub fn refresh_cookie(token: &str, max_age_secs: i64) -> Result<HeaderValue, anyhow::Error> {
    HeaderValue::from_str(&format!(
        "{}={}; HttpOnly; SameSite=Strict; Path=/; Max-Age={}",
        REFRESH_COOKIE, token, max_age_secs
    ))
    .map_err(|e| anyhow::anyhow!("Invalid cookie value: {}", e))
}

pub fn clear_refresh_cookie() -> HeaderValue {
    HeaderValue::from_static("refreshToken=; HttpOnly; SameSite=Strict; Path=/; Max-Age=0")
}
