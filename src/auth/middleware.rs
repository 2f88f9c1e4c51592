use actix_session::SessionExt;
use actix_web::{
    Error, HttpResponse,
    body::MessageBody,
    dev::{ServiceRequest, ServiceResponse},
    middleware::Next,
};

/// Redirect anonymous requests to /login, remembering where they were going.
pub async fn require_auth(
    req: ServiceRequest,
    next: Next<impl MessageBody + 'static>,
) -> Result<ServiceResponse<impl MessageBody>, Error> {
    let session = req.get_session();
    let has_user = session.get::<i64>("user_id").unwrap_or(None).is_some();

    if !has_user {
        let is_get = req.method() == actix_web::http::Method::GET;
        let location = login_location(is_get, req.uri().path(), req.query_string());
        let response = HttpResponse::SeeOther()
            .insert_header(("Location", location))
            .finish();
        return Ok(req.into_response(response).map_into_right_body());
    }

    next.call(req).await.map(|res| res.map_into_left_body())
}

/// Only GET targets are worth returning to; a POST body is gone by then.
fn login_location(is_get: bool, path: &str, query: &str) -> String {
    if !is_get || path == "/" {
        return "/login".to_string();
    }
    let target = if query.is_empty() { path.to_string() } else { format!("{path}?{query}") };
    match serde_urlencoded::to_string([("next", target.as_str())]) {
        Ok(encoded) => format!("/login?{encoded}"),
        Err(_) => "/login".to_string(),
    }
}

/// Accept a post-login redirect only if it stays on this site.
pub fn safe_next(next: Option<&str>) -> &str {
    match next {
        Some(n) if n.starts_with('/') && !n.starts_with("//") && !n.contains('\\') => n,
        _ => "/dashboard",
    }
}
