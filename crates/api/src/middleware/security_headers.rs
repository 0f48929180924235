//! Security headers middleware.

use axum::{
    body::Body,
    extract::State,
    http::{header, HeaderValue, Request},
    middleware::Next,
    response::Response,
};

use crate::app::AppState;

/// Security header names.
pub mod headers {
    pub const X_CONTENT_TYPE_OPTIONS: &str = "x-content-type-options";
    pub const X_FRAME_OPTIONS: &str = "x-frame-options";
    pub const X_XSS_PROTECTION: &str = "x-xss-protection";
}

/// One year, with subdomains.
const HSTS_VALUE: &str = "max-age=31536000; includeSubDomains";

/// Adds `nosniff`, `DENY` framing and the legacy XSS filter header to every
/// response. `Strict-Transport-Security` is added only when
/// `security.hsts_enabled` is set (`HR__SECURITY__HSTS_ENABLED=true`).
pub async fn security_headers_middleware(
    State(state): State<AppState>,
    req: Request<Body>,
    next: Next,
) -> Response {
    let mut response = next.run(req).await;
    apply_security_headers(&mut response, state.config.security.hsts_enabled);
    response
}

fn apply_security_headers(response: &mut Response, hsts_enabled: bool) {
    let headers = response.headers_mut();

    headers.insert(
        header::HeaderName::from_static(headers::X_CONTENT_TYPE_OPTIONS),
        HeaderValue::from_static("nosniff"),
    );
    headers.insert(
        header::HeaderName::from_static(headers::X_FRAME_OPTIONS),
        HeaderValue::from_static("DENY"),
    );
    headers.insert(
        header::HeaderName::from_static(headers::X_XSS_PROTECTION),
        HeaderValue::from_static("1; mode=block"),
    );

    if hsts_enabled {
        headers.insert(
            header::STRICT_TRANSPORT_SECURITY,
            HeaderValue::from_static(HSTS_VALUE),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_headers_added_without_hsts() {
        let mut response = Response::new(Body::empty());
        apply_security_headers(&mut response, false);

        let h = response.headers();
        assert_eq!(h[headers::X_CONTENT_TYPE_OPTIONS], "nosniff");
        assert_eq!(h[headers::X_FRAME_OPTIONS], "DENY");
        assert_eq!(h[headers::X_XSS_PROTECTION], "1; mode=block");
        assert!(h.get(header::STRICT_TRANSPORT_SECURITY).is_none());
    }

    #[test]
    fn test_hsts_added_when_enabled() {
        let mut response = Response::new(Body::empty());
        apply_security_headers(&mut response, true);

        assert_eq!(
            response.headers()[header::STRICT_TRANSPORT_SECURITY],
            HSTS_VALUE
        );
    }
}
