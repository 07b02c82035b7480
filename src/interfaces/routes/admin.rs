use actix_web::web;

use crate::handlers::{admin_leads, admin_projects, admin_services, auth};

pub fn config_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/admin")
            .service(auth::me)
            .service(
                web::resource("/projects")
                    .route(web::get().to(admin_projects::list_projects))
                    .route(web::post().to(admin_projects::create_project))
            )
            .service(
                web::resource("/projects/{project_id}")
                    .route(web::get().to(admin_projects::get_project))
                    .route(web::patch().to(admin_projects::update_project))
                    .route(web::delete().to(admin_projects::delete_project))
            )
            .service(
                web::resource("/services")
                    .route(web::get().to(admin_services::list_services))
                    .route(web::post().to(admin_services::create_service))
            )
            .service(
                web::resource("/services/{service_id}")
                    .route(web::get().to(admin_services::get_service))
                    .route(web::patch().to(admin_services::update_service))
                    .route(web::delete().to(admin_services::delete_service))
            )
            .service(
                web::resource("/leads")
                    .route(web::get().to(admin_leads::list_leads))
            )
            .service(
                web::resource("/leads/mark-contacted")
                    .route(web::post().to(admin_leads::mark_contacted))
            )
            .service(
                web::resource("/leads/mark-not-contacted")
                    .route(web::post().to(admin_leads::mark_not_contacted))
            )
            .service(
                web::resource("/leads/{lead_id}")
                    .route(web::get().to(admin_leads::get_lead))
                    .route(web::patch().to(admin_leads::update_lead))
                    .route(web::delete().to(admin_leads::delete_lead))
            )
    );
}
