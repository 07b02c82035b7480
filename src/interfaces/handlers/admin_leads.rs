use actix_web::{web, HttpResponse, Responder};
use tracing::instrument;

use crate::{
    entities::lead::{AdminLeadQuery, BulkLeadRequest, LeadFilter, UpdateLeadRequest},
    errors::AppError,
    use_cases::extractors::AdminClaims,
    AppState,
};

#[instrument(skip(_claims, state, query))]
pub async fn list_leads(
    _claims: AdminClaims,
    state: web::Data<AppState>,
    query: web::Query<AdminLeadQuery>,
) -> Result<impl Responder, AppError> {
    let filter = LeadFilter::from(query.into_inner());
    let rows = state.lead_handler.list_leads(&filter).await?;
    Ok(HttpResponse::Ok().json(rows))
}

#[instrument(skip(_claims, lead_id, state))]
pub async fn get_lead(
    _claims: AdminClaims,
    lead_id: web::Path<String>,
    state: web::Data<AppState>,
) -> Result<impl Responder, AppError> {
    let row = state.lead_handler.get_lead(&lead_id).await?;
    Ok(HttpResponse::Ok().json(row))
}

#[instrument(skip(_claims, lead_id, state, data))]
pub async fn update_lead(
    _claims: AdminClaims,
    lead_id: web::Path<String>,
    state: web::Data<AppState>,
    data: web::Json<UpdateLeadRequest>,
) -> Result<impl Responder, AppError> {
    let row = state.lead_handler.update_lead(&lead_id, data.into_inner()).await?;
    Ok(HttpResponse::Ok().json(row))
}

#[instrument(skip(_claims, lead_id, state))]
pub async fn delete_lead(
    _claims: AdminClaims,
    lead_id: web::Path<String>,
    state: web::Data<AppState>,
) -> Result<impl Responder, AppError> {
    state.lead_handler.delete_lead(&lead_id).await?;
    Ok(HttpResponse::NoContent().finish())
}

#[instrument(skip(_claims, state, data))]
pub async fn mark_contacted(
    _claims: AdminClaims,
    state: web::Data<AppState>,
    data: web::Json<BulkLeadRequest>,
) -> Result<impl Responder, AppError> {
    let response = state.lead_handler.mark_contacted(data.into_inner()).await?;
    Ok(HttpResponse::Ok().json(response))
}

#[instrument(skip(_claims, state, data))]
pub async fn mark_not_contacted(
    _claims: AdminClaims,
    state: web::Data<AppState>,
    data: web::Json<BulkLeadRequest>,
) -> Result<impl Responder, AppError> {
    let response = state.lead_handler.mark_not_contacted(data.into_inner()).await?;
    Ok(HttpResponse::Ok().json(response))
}
