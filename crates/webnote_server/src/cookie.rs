//! `auth` cookie formatting and parsing.

use axum::http::{header, HeaderMap};
use chrono::{DateTime, Duration, Utc};
use webnote_core::constants::{AUTH_COOKIE_CLEAR_DAYS, AUTH_COOKIE_NAME, AUTH_COOKIE_TTL_DAYS};

fn http_date(at: DateTime<Utc>) -> String {
    at.format("%a, %d %b %Y %H:%M:%S GMT").to_string()
}

/// Cookie `Path` for a note, in the form the client used to reach it.
///
/// Browsers match cookie paths against the raw request path, so the scope is
/// `request_path` with the trailing `/{action}` removed. `note_path` is
/// percent-encoded as a fallback when the request path has another shape.
pub fn cookie_scope(request_path: &str, action: &str, note_path: &str) -> String {
    request_path
        .strip_suffix(action)
        .and_then(|rest| rest.strip_suffix('/'))
        .filter(|scope| scope.len() > 1 && !scope.contains(';'))
        .map(str::to_string)
        .unwrap_or_else(|| format!("/{}", urlencoding::encode(note_path)))
}

/// `Set-Cookie` value carrying `token` for `scope`, valid for a week.
pub fn auth_cookie(scope: &str, token: &str, now: DateTime<Utc>) -> String {
    format!(
        "{}={}; Path={}; Expires={}; HttpOnly",
        AUTH_COOKIE_NAME,
        token,
        scope,
        http_date(now + Duration::days(AUTH_COOKIE_TTL_DAYS))
    )
}

/// `Set-Cookie` value that expires the auth cookie for `scope`.
pub fn cleared_auth_cookie(scope: &str, now: DateTime<Utc>) -> String {
    format!(
        "{}=; Path={}; Expires={}; HttpOnly",
        AUTH_COOKIE_NAME,
        scope,
        http_date(now - Duration::days(AUTH_COOKIE_CLEAR_DAYS))
    )
}

/// All non-empty `auth` cookie values sent with the request.
pub fn auth_cookie_values(headers: &HeaderMap) -> Vec<&str> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .filter(|(name, value)| *name == AUTH_COOKIE_NAME && !value.is_empty())
        .map(|(_, value)| value)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;
    use chrono::TimeZone;

    fn fixed_now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).single().expect("time")
    }

    #[test]
    fn auth_cookie_is_path_scoped_http_only_and_expires_in_a_week() {
        let cookie = auth_cookie("/my%20note", "tok", fixed_now());
        assert_eq!(
            cookie,
            "auth=tok; Path=/my%20note; Expires=Fri, 08 Mar 2024 12:00:00 GMT; HttpOnly"
        );
    }

    #[test]
    fn cleared_cookie_is_empty_and_in_the_past() {
        let cookie = cleared_auth_cookie("/notes1", fixed_now());
        assert_eq!(
            cookie,
            "auth=; Path=/notes1; Expires=Wed, 22 Nov 2023 12:00:00 GMT; HttpOnly"
        );
    }

    #[test]
    fn scope_keeps_the_request_path_form() {
        assert_eq!(cookie_scope("/a:b/auth", "auth", "a:b"), "/a:b");
        assert_eq!(cookie_scope("/a@b/pw", "pw", "a@b"), "/a@b");
        assert_eq!(cookie_scope("/a(b)!/auth", "auth", "a(b)!"), "/a(b)!");
        assert_eq!(cookie_scope("/a%3Ab/auth", "auth", "a:b"), "/a%3Ab");
        assert_eq!(cookie_scope("/caf%C3%A9/pw", "pw", "café"), "/caf%C3%A9");
    }

    #[test]
    fn scope_falls_back_to_encoded_note_path() {
        assert_eq!(cookie_scope("/elsewhere", "auth", "my note"), "/my%20note");
        assert_eq!(cookie_scope("/auth", "auth", "x"), "/x");
        assert_eq!(cookie_scope("/a;b/auth", "auth", "a;b"), "/a%3Bb");
    }

    #[test]
    fn cookie_values_are_collected_across_headers() {
        let mut headers = HeaderMap::new();
        headers.append(
            header::COOKIE,
            HeaderValue::from_static("theme=dark; auth=first"),
        );
        headers.append(header::COOKIE, HeaderValue::from_static("auth=; auth=second"));
        assert_eq!(auth_cookie_values(&headers), vec!["first", "second"]);
        assert!(auth_cookie_values(&HeaderMap::new()).is_empty());
    }
}
