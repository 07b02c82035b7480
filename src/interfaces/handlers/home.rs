use actix_web::{get, web, HttpResponse, Responder};
use serde::Serialize;
use tracing::instrument;

use crate::{
    entities::{project::Project, service::ServiceResponse},
    errors::AppError,
    use_cases::projects::OVERVIEW_FEATURED_LIMIT,
    AppState,
};

#[get("/")]
pub async fn home() -> impl Responder {
    HttpResponse::Ok().json(serde_json::json!({
        "message": "Welcome to the Portfolio Site API!",
        "status": "Ok",
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": {
            "overview": "/api/v1/overview",
            "projects": "/api/v1/projects",
            "services": "/api/v1/services",
            "leads": "/api/v1/leads",
            "health": "/health"
        }
    }))
}

/// Landing page data.
#[derive(Debug, Serialize)]
pub struct Overview {
    pub featured_projects: Vec<Project>,
    pub services: Vec<ServiceResponse>,
}

#[instrument(skip(state))]
pub async fn overview(state: web::Data<AppState>) -> Result<impl Responder, AppError> {
    let featured_projects = state
        .project_handler
        .list_featured_projects(Some(OVERVIEW_FEATURED_LIMIT))
        .await?;
    let services = state.service_handler.list_active_services().await?;

    Ok(HttpResponse::Ok().json(Overview { featured_projects, services }))
}
