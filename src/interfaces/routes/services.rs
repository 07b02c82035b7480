use actix_web::web;

use crate::handlers::services;

pub fn config_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/services")
            .service(
                web::resource("")
                    .route(web::get().to(services::list_services))
            )
            .service(
                web::resource("/by-category")
                    .route(web::get().to(services::services_by_category))
            )
            .service(
                web::resource("/{service_id}")
                    .route(web::get().to(services::get_service))
            )
    );
}
