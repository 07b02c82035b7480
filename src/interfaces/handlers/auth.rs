use actix_web::{get, post, web, HttpResponse, Responder};
use crate::entities::token::LoginRequest;
use crate::use_cases::extractors::AdminClaims;
use crate::AppState;

#[post("/login")]
pub async fn login(
    state: web::Data<AppState>,
    credentials: web::Json<LoginRequest>
) -> impl Responder {
    match state.auth_handler.login(credentials.into_inner()).await {
        Ok(auth_response) => HttpResponse::Ok().json(auth_response),
        Err(e) => actix_web::ResponseError::error_response(&e),
    }
}

/// Echoes the claims of the current token.
#[get("/me")]
pub async fn me(admin: AdminClaims) -> impl Responder {
    HttpResponse::Ok().json(serde_json::json!({
        "email": admin.0.email,
        "admin": admin.0.admin,
        "expires_at": admin.0.exp
    }))
}
