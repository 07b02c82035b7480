use actix_web::{web, HttpRequest, HttpResponse, Responder};
use tracing::instrument;

use crate::{
    entities::lead::NewLeadForm,
    errors::AppError,
    utils::get_client_ip::get_client_ip,
    AppState,
};

/// Public lead form. The client address only selects the quota bucket.
#[instrument(skip(req, state, form))]
pub async fn submit_lead(
    req: HttpRequest,
    state: web::Data<AppState>,
    form: web::Json<NewLeadForm>,
) -> Result<impl Responder, AppError> {
    let client = get_client_ip(&req, state.trust_forwarded_for);

    let acknowledgement = state
        .lead_handler
        .submit_lead(form.into_inner(), &client)
        .await?;

    Ok(HttpResponse::Created().json(acknowledgement))
}
