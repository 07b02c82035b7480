use std::sync::Arc;

use deadpool_redis::Pool as RedisPool;

mod domain;
mod interfaces;
mod infrastructure;
pub mod errors;
pub mod settings;
pub mod constants;
pub mod graceful_shutdown;
pub mod background_task;
pub mod shared_repos;

pub use domain::{entities, use_cases};
pub use interfaces::{handlers, repositories, middlewares, routes};
pub use infrastructure::{auth, db, limiter, utils};

use auth::jwt::JwtService;
use limiter::{InMemoryQuotaStore, QuotaPolicy, QuotaStore, RedisQuotaStore};
use shared_repos::SharedRepositories;
use use_cases::{auth::AuthHandler, leads::LeadHandler, projects::ProjectHandler, services::ServiceHandler};

pub struct AppState {
    pub auth_handler: AuthHandler,
    pub project_handler: ProjectHandler,
    pub service_handler: ServiceHandler,
    pub lead_handler: LeadHandler,
    pub redis_pool: Option<RedisPool>,
    pub trust_forwarded_for: bool,
}

impl AppState {
    /// Wires the Postgres repositories. The lead quota lives in Redis when a
    /// pool is given and in process memory otherwise.
    pub fn new(config: &settings::AppConfig, pool: sqlx::PgPool, redis_pool: Option<RedisPool>) -> Self {
        let policy = QuotaPolicy::new(config.lead_rate_limit, config.lead_rate_window_secs);

        let quota: Arc<dyn QuotaStore> = match &redis_pool {
            Some(redis) => Arc::new(RedisQuotaStore::new(redis.clone(), policy, "leads")),
            None => Arc::new(InMemoryQuotaStore::new(policy)),
        };

        Self::from_parts(config, SharedRepositories::new(pool), quota, redis_pool)
    }

    pub fn from_parts(
        config: &settings::AppConfig,
        repos: SharedRepositories,
        quota: Arc<dyn QuotaStore>,
        redis_pool: Option<RedisPool>,
    ) -> Self {
        let jwt_service = JwtService::new(config);

        AppState {
            auth_handler: AuthHandler::new(config, jwt_service),
            project_handler: ProjectHandler::new(repos.project_repo),
            service_handler: ServiceHandler::new(repos.service_repo),
            lead_handler: LeadHandler::new(repos.lead_repo, quota),
            redis_pool,
            trust_forwarded_for: config.trust_forwarded_for,
        }
    }
}
