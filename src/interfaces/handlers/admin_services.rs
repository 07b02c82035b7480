use actix_web::{web, HttpResponse, Responder};
use tracing::instrument;

use crate::{
    entities::service::{AdminServiceQuery, NewServiceRequest, ServiceFilter, UpdateServiceRequest},
    errors::AppError,
    use_cases::extractors::AdminClaims,
    AppState,
};

#[instrument(skip(_claims, state, query))]
pub async fn list_services(
    _claims: AdminClaims,
    state: web::Data<AppState>,
    query: web::Query<AdminServiceQuery>,
) -> Result<impl Responder, AppError> {
    let filter = ServiceFilter::from(query.into_inner());
    let rows = state.service_handler.list_admin_services(&filter).await?;
    Ok(HttpResponse::Ok().json(rows))
}

#[instrument(skip(_claims, service_id, state))]
pub async fn get_service(
    _claims: AdminClaims,
    service_id: web::Path<String>,
    state: web::Data<AppState>,
) -> Result<impl Responder, AppError> {
    let row = state.service_handler.get_service(&service_id).await?;
    Ok(HttpResponse::Ok().json(row))
}

#[instrument(skip(_claims, state, data))]
pub async fn create_service(
    _claims: AdminClaims,
    state: web::Data<AppState>,
    data: web::Json<NewServiceRequest>,
) -> Result<impl Responder, AppError> {
    let row = state.service_handler.create_service(data.into_inner()).await?;
    Ok(HttpResponse::Created().json(row))
}

#[instrument(skip(_claims, service_id, state, data))]
pub async fn update_service(
    _claims: AdminClaims,
    service_id: web::Path<String>,
    state: web::Data<AppState>,
    data: web::Json<UpdateServiceRequest>,
) -> Result<impl Responder, AppError> {
    let row = state
        .service_handler
        .update_service(&service_id, data.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(row))
}

#[instrument(skip(_claims, service_id, state))]
pub async fn delete_service(
    _claims: AdminClaims,
    service_id: web::Path<String>,
    state: web::Data<AppState>,
) -> Result<impl Responder, AppError> {
    state.service_handler.delete_service(&service_id).await?;
    Ok(HttpResponse::NoContent().finish())
}
