use actix_web::{web, HttpResponse, Responder};
use tracing::instrument;

use crate::{errors::AppError, AppState};

#[instrument(skip(state))]
pub async fn list_services(state: web::Data<AppState>) -> Result<impl Responder, AppError> {
    let services = state.service_handler.list_active_services().await?;
    Ok(HttpResponse::Ok().json(services))
}

#[instrument(skip(state))]
pub async fn services_by_category(state: web::Data<AppState>) -> Result<impl Responder, AppError> {
    let groups = state.service_handler.group_services_by_category_label().await?;
    Ok(HttpResponse::Ok().json(groups))
}

#[instrument(skip(service_id, state))]
pub async fn get_service(
    service_id: web::Path<String>,
    state: web::Data<AppState>,
) -> Result<impl Responder, AppError> {
    let service = state.service_handler.get_active_service(&service_id).await?;
    Ok(HttpResponse::Ok().json(service))
}
