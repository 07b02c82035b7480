use std::collections::HashMap;

use actix_web::{web, HttpResponse, Responder};
use tracing::instrument;

use crate::{
    entities::project::{ProjectFilter, ProjectListQuery},
    errors::AppError,
    AppState,
};

const MAX_FEATURED_LIMIT: u32 = 50;

#[instrument(skip(state, query))]
pub async fn list_projects(
    state: web::Data<AppState>,
    query: web::Query<ProjectListQuery>,
) -> Result<impl Responder, AppError> {
    let filter = ProjectFilter::from(query.into_inner());
    let projects = state.project_handler.list_projects(&filter).await?;

    Ok(HttpResponse::Ok().json(projects))
}

#[instrument(skip(state, query))]
pub async fn list_featured_projects(
    state: web::Data<AppState>,
    query: web::Query<HashMap<String, String>>,
) -> Result<impl Responder, AppError> {
    let limit = match query.get("limit") {
        Some(raw) => Some(
            raw.parse::<u32>()
                .map_err(|_| AppError::InvalidInput("limit must be a non-negative integer".into()))?
                .min(MAX_FEATURED_LIMIT),
        ),
        None => None,
    };

    let projects = state.project_handler.list_featured_projects(limit).await?;
    Ok(HttpResponse::Ok().json(projects))
}

#[instrument(skip(project_id, state))]
pub async fn get_project(
    project_id: web::Path<String>,
    state: web::Data<AppState>,
) -> Result<impl Responder, AppError> {
    let project = state.project_handler.get_project(&project_id).await?;
    Ok(HttpResponse::Ok().json(project))
}
