use crate::auth::auth::AuthUser;
use crate::config::Config;
use actix_web::middleware::Next;
use actix_web::{
    Error, HttpMessage, HttpResponse,
    body::BoxBody,
    dev::{ServiceRequest, ServiceResponse},
    web::Data,
};
use serde_json::json;

/// Rejects requests without a valid access token and stores the resolved
/// [`AuthUser`] in the request extensions for the handlers.
pub async fn auth_middleware(
    req: ServiceRequest,
    next: Next<BoxBody>,
) -> Result<ServiceResponse<BoxBody>, Error> {
    let config = req
        .app_data::<Data<Config>>()
        .cloned()
        .ok_or_else(|| actix_web::error::ErrorInternalServerError("App config missing"))?;

    match AuthUser::authenticate(req.headers(), &config.jwt_secret) {
        Ok(user) => {
            req.extensions_mut().insert(user);
            next.call(req).await
        }
        Err(reason) => {
            tracing::debug!(path = %req.path(), %reason, "Rejected request");
            let resp = HttpResponse::Unauthorized().json(json!({ "message": reason }));
            Ok(req.into_response(resp.map_into_boxed_body()))
        }
    }
}
