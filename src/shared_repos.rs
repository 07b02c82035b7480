use std::sync::Arc;

use crate::repositories::{
    lead::LeadRepository,
    project::ProjectRepository,
    service::ServiceRepository,
    sqlx_repo::{SqlxLeadRepo, SqlxProjectRepo, SqlxServiceRepo},
};

/// Repository set handed to the use cases.
#[derive(Clone)]
pub struct SharedRepositories {
    pub project_repo: Arc<dyn ProjectRepository>,
    pub service_repo: Arc<dyn ServiceRepository>,
    pub lead_repo: Arc<dyn LeadRepository>,
}

impl SharedRepositories {
    pub fn new(pool: sqlx::PgPool) -> Self {
        SharedRepositories {
            project_repo: Arc::new(SqlxProjectRepo::new(pool.clone())),
            service_repo: Arc::new(SqlxServiceRepo::new(pool.clone())),
            lead_repo: Arc::new(SqlxLeadRepo::new(pool)),
        }
    }
}
