use actix_web::web;

use crate::handlers::{home, system::health_check};

mod admin;
mod auth;
mod json_error;
mod projects;
mod services;
mod leads;

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(home::home);
    cfg.service(health_check);

    cfg.service(
        web::scope("/api/v1")
            .service(web::resource("/overview").route(web::get().to(home::overview)))
            .configure(projects::config_routes)
            .configure(services::config_routes)
            .configure(leads::config_routes)
            .configure(auth::config_routes)
            .configure(admin::config_routes)
    );

    cfg.configure(json_error::config_routes);
}
