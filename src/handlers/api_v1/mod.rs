pub mod dashboard;

use actix_session::SessionExt;
use actix_web::{
    web, Error, HttpResponse,
    body::MessageBody,
    dev::{ServiceRequest, ServiceResponse},
    middleware::Next,
};

use crate::templates_structs::ApiErrorResponse;

/// JSON clients get a 401 body instead of the login redirect.
async fn require_api_session(
    req: ServiceRequest,
    next: Next<impl MessageBody + 'static>,
) -> Result<ServiceResponse<impl MessageBody>, Error> {
    let has_user = req.get_session().get::<i64>("user_id").unwrap_or(None).is_some();

    if !has_user {
        let body = ApiErrorResponse {
            error: "Not logged in".to_string(),
            details: None,
        };
        let response = HttpResponse::Unauthorized().json(body);
        return Ok(req.into_response(response).map_into_right_body());
    }

    next.call(req).await.map(|res| res.map_into_left_body())
}

/// Configure API v1 routes.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/dashboard")
            .wrap(actix_web::middleware::from_fn(require_api_session))
            .route("/team", web::get().to(dashboard::team))
            .route("/department", web::get().to(dashboard::department))
    );
}
