use axum::{
    extract::State,
    http::{header, HeaderMap, HeaderValue, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};
use base64::{engine::general_purpose::STANDARD, Engine as _};

use crate::config::BasicCredentials;

pub const REALM: &str = r#"Basic realm="invoicebook""#;

#[derive(Clone)]
pub struct AuthState {
    pub credentials: BasicCredentials,
}

/// HTTP Basic authentication against the configured credentials.
pub async fn basic_auth_middleware(
    State(state): State<AuthState>,
    req: axum::http::Request<axum::body::Body>,
    next: Next,
) -> Response {
    match extract_basic(req.headers()) {
        Some((username, password))
            if username == state.credentials.username && password == state.credentials.password =>
        {
            next.run(req).await
        }
        _ => {
            tracing::warn!(path = %req.uri().path(), "rejected unauthenticated request");
            unauthorized()
        }
    }
}

fn unauthorized() -> Response {
    (
        StatusCode::UNAUTHORIZED,
        [(header::WWW_AUTHENTICATE, HeaderValue::from_static(REALM))],
    )
        .into_response()
}

fn extract_basic(headers: &HeaderMap) -> Option<(String, String)> {
    let header = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let encoded = header.strip_prefix("Basic ")?.trim();
    let decoded = STANDARD.decode(encoded).ok()?;
    let decoded = String::from_utf8(decoded).ok()?;
    let (username, password) = decoded.split_once(':')?;
    Some((username.to_string(), password.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn decodes_basic_credentials() {
        let encoded = STANDARD.encode("admin:s3cr:et");
        assert_eq!(
            extract_basic(&headers(&format!("Basic {encoded}"))),
            Some(("admin".to_string(), "s3cr:et".to_string()))
        );
    }

    #[test]
    fn rejects_other_schemes_and_garbage() {
        assert_eq!(extract_basic(&HeaderMap::new()), None);
        assert_eq!(extract_basic(&headers("Bearer abc")), None);
        assert_eq!(extract_basic(&headers("Basic !!!")), None);
        let no_colon = STANDARD.encode("admin");
        assert_eq!(extract_basic(&headers(&format!("Basic {no_colon}"))), None);
    }
}
