use actix_web::web;

use crate::handlers::leads;

pub fn config_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/leads")
            .route(web::post().to(leads::submit_lead))
    );
}
