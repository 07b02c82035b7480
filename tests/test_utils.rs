#![allow(dead_code, unused_macros)]

use std::{cmp::Ordering, sync::Arc};

use actix_web::web;
use async_trait::async_trait;
use chrono::{Duration, Utc};
use parking_lot::Mutex;
use sqlx::{postgres::PgPoolOptions, PgPool};
use portfolio_site::{
    auth::password::hash_password,
    entities::{
        category::ServiceCategory,
        option_fields::OptionField,
        lead::{Lead, LeadFilter, LeadInsert, UpdateLeadRequest},
        project::{Project, ProjectFilter, ProjectInsert, UpdateProjectRequest},
        service::{Service, ServiceFilter, ServiceInsert, ServicePatch},
        token::Claims,
    },
    errors::AppError,
    limiter::{InMemoryQuotaStore, QuotaPolicy},
    repositories::{lead::LeadRepository, project::ProjectRepository, service::ServiceRepository},
    db::postgres::run_migrations,
    settings::{AppConfig, AppEnvironment},
    shared_repos::SharedRepositories,
    AppState,
};
use uuid::Uuid;

pub const ADMIN_EMAIL: &str = "owner@example.com";
pub const ADMIN_PASSWORD: &str = "correct-horse-battery";

/// Builds the full application around the given state, as `main` does.
macro_rules! init_app {
    ($state:expr) => {
        actix_web::test::init_service(
            actix_web::App::new()
                .app_data($state.clone())
                .wrap(portfolio_site::middlewares::auth::AuthMiddleware)
                .wrap(actix_web::middleware::NormalizePath::trim())
                .configure(portfolio_site::routes::configure_routes),
        )
        .await
    };
}

fn contains_ci(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

fn patch_option(target: &mut Option<String>, field: &OptionField<String>) {
    match field {
        OptionField::Unchanged => {}
        OptionField::SetToNull => *target = None,
        OptionField::SetToValue(v) => *target = Some(v.clone()),
    }
}

fn project_matches(filter: &ProjectFilter, p: &Project) -> bool {
    filter.featured.map_or(true, |f| p.featured == f)
        && filter.tech.as_ref().map_or(true, |t| p.tech_stack.contains(t))
        && filter.search.as_deref().map_or(true, |q| {
            contains_ci(&p.title, q) || contains_ci(&p.description, q) || contains_ci(&p.role, q)
        })
}

fn project_listing_order(a: &Project, b: &Project) -> Ordering {
    b.featured.cmp(&a.featured).then(b.created_date.cmp(&a.created_date))
}

fn apply_project_patch(patch: &UpdateProjectRequest, p: &mut Project) {
    if let Some(title) = &patch.title {
        p.title = title.clone();
    }
    if let Some(description) = &patch.description {
        p.description = description.clone();
    }
    if let Some(stack) = &patch.tech_stack {
        p.tech_stack = stack.clone();
    }
    patch_option(&mut p.github_link, &patch.github_link);
    patch_option(&mut p.demo_link, &patch.demo_link);
    if let Some(role) = &patch.role {
        p.role = role.clone();
    }
    if let Some(featured) = patch.featured {
        p.featured = featured;
    }
    patch_option(&mut p.image, &patch.image);
    if let Some(created) = patch.created_date {
        p.created_date = created;
    }
}

fn service_matches(filter: &ServiceFilter, s: &Service) -> bool {
    filter.active.map_or(true, |a| s.is_active == a)
        && filter.category.map_or(true, |c| s.category == c)
        && filter.search.as_deref().map_or(true, |q| contains_ci(&s.name, q) || contains_ci(&s.description, q))
}

fn service_display_order(a: &Service, b: &Service) -> Ordering {
    a.order.cmp(&b.order).then_with(|| a.name.cmp(&b.name))
}

fn apply_service_patch(patch: &ServicePatch, s: &mut Service) {
    if let Some(name) = &patch.name {
        s.name = name.clone();
    }
    if let Some(category) = patch.category {
        s.category = category;
    }
    if let Some(description) = &patch.description {
        s.description = description.clone();
    }
    if let Some(icon) = &patch.icon {
        s.icon = icon.clone();
    }
    if let Some(is_active) = patch.is_active {
        s.is_active = is_active;
    }
    if let Some(order) = patch.order {
        s.order = order;
    }
}

fn lead_matches(filter: &LeadFilter, l: &Lead) -> bool {
    filter.contacted.map_or(true, |c| l.contacted == c)
        && filter.service_interest.map_or(true, |i| l.service_interest == Some(i))
        && filter.search.as_deref().map_or(true, |q| {
            contains_ci(&l.name, q)
                || contains_ci(&l.email, q)
                || l.company.as_deref().map_or(false, |c| contains_ci(c, q))
                || contains_ci(&l.message, q)
        })
}

#[derive(Default)]
pub struct InMemoryProjectRepo {
    pub rows: Mutex<Vec<Project>>,
}

#[async_trait]
impl ProjectRepository for InMemoryProjectRepo {
    async fn check_connection(&self) -> Result<(), AppError> {
        Ok(())
    }

    async fn list_projects(&self, filter: &ProjectFilter, limit: Option<i64>) -> Result<Vec<Project>, AppError> {
        let mut projects: Vec<Project> = self.rows.lock().iter().filter(|p| project_matches(filter, p)).cloned().collect();
        projects.sort_by(project_listing_order);
        if let Some(limit) = limit {
            projects.truncate(limit as usize);
        }
        Ok(projects)
    }

    async fn get_project_by_id(&self, id: &Uuid) -> Result<Project, AppError> {
        self.rows
            .lock()
            .iter()
            .find(|p| &p.id == id)
            .cloned()
            .ok_or_else(|| AppError::NotFound("Project not found".into()))
    }

    async fn create_project(&self, project: &ProjectInsert) -> Result<Project, AppError> {
        let created = Project {
            id: Uuid::new_v4(),
            title: project.title.clone(),
            description: project.description.clone(),
            tech_stack: project.tech_stack.clone(),
            github_link: project.github_link.clone(),
            demo_link: project.demo_link.clone(),
            role: project.role.clone(),
            featured: project.featured,
            image: project.image.clone(),
            created_date: project.created_date,
        };
        self.rows.lock().push(created.clone());
        Ok(created)
    }

    async fn update_project(&self, id: &Uuid, patch: &UpdateProjectRequest) -> Result<Project, AppError> {
        let mut rows = self.rows.lock();
        let project = rows
            .iter_mut()
            .find(|p| &p.id == id)
            .ok_or_else(|| AppError::NotFound("Project not found".into()))?;
        apply_project_patch(patch, project);
        Ok(project.clone())
    }

    async fn delete_project(&self, id: &Uuid) -> Result<(), AppError> {
        let mut rows = self.rows.lock();
        let before = rows.len();
        rows.retain(|p| &p.id != id);
        if rows.len() == before {
            return Err(AppError::NotFound("Project not found".into()));
        }
        Ok(())
    }
}

#[derive(Default)]
pub struct InMemoryServiceRepo {
    pub rows: Mutex<Vec<Service>>,
}

#[async_trait]
impl ServiceRepository for InMemoryServiceRepo {
    async fn list_services(&self, filter: &ServiceFilter) -> Result<Vec<Service>, AppError> {
        let mut services: Vec<Service> = self.rows.lock().iter().filter(|s| service_matches(filter, s)).cloned().collect();
        services.sort_by(service_display_order);
        Ok(services)
    }

    async fn get_service_by_id(&self, id: &Uuid) -> Result<Service, AppError> {
        self.rows
            .lock()
            .iter()
            .find(|s| &s.id == id)
            .cloned()
            .ok_or_else(|| AppError::NotFound("Service not found".into()))
    }

    async fn create_service(&self, service: &ServiceInsert) -> Result<Service, AppError> {
        let created = Service {
            id: Uuid::new_v4(),
            name: service.name.clone(),
            category: service.category,
            description: service.description.clone(),
            icon: service.icon.clone(),
            is_active: service.is_active,
            order: service.order,
        };
        self.rows.lock().push(created.clone());
        Ok(created)
    }

    async fn update_service(&self, id: &Uuid, patch: &ServicePatch) -> Result<Service, AppError> {
        let mut rows = self.rows.lock();
        let service = rows
            .iter_mut()
            .find(|s| &s.id == id)
            .ok_or_else(|| AppError::NotFound("Service not found".into()))?;
        apply_service_patch(patch, service);
        Ok(service.clone())
    }

    async fn delete_service(&self, id: &Uuid) -> Result<(), AppError> {
        let mut rows = self.rows.lock();
        let before = rows.len();
        rows.retain(|s| &s.id != id);
        if rows.len() == before {
            return Err(AppError::NotFound("Service not found".into()));
        }
        Ok(())
    }
}

#[derive(Default)]
pub struct InMemoryLeadRepo {
    pub rows: Mutex<Vec<Lead>>,
}

#[async_trait]
impl LeadRepository for InMemoryLeadRepo {
    async fn create_lead(&self, lead: &LeadInsert) -> Result<Lead, AppError> {
        let created = Lead {
            id: Uuid::new_v4(),
            name: lead.name.clone(),
            email: lead.email.clone(),
            company: lead.company.clone(),
            message: lead.message.clone(),
            service_interest: lead.service_interest,
            created_at: lead.created_at,
            contacted: false,
            notes: String::new(),
        };
        self.rows.lock().push(created.clone());
        Ok(created)
    }

    async fn get_lead_by_id(&self, id: &Uuid) -> Result<Lead, AppError> {
        self.rows
            .lock()
            .iter()
            .find(|l| &l.id == id)
            .cloned()
            .ok_or_else(|| AppError::NotFound("Lead not found".into()))
    }

    async fn list_leads(&self, filter: &LeadFilter) -> Result<Vec<Lead>, AppError> {
        let mut leads: Vec<Lead> = self.rows.lock().iter().filter(|l| lead_matches(filter, l)).cloned().collect();
        leads.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(leads)
    }

    async fn set_contacted(&self, ids: &[Uuid], contacted: bool) -> Result<u64, AppError> {
        let mut changed = 0;
        for lead in self.rows.lock().iter_mut() {
            if ids.contains(&lead.id) && lead.contacted != contacted {
                lead.contacted = contacted;
                changed += 1;
            }
        }
        Ok(changed)
    }

    async fn update_lead(&self, id: &Uuid, patch: &UpdateLeadRequest) -> Result<Lead, AppError> {
        let mut rows = self.rows.lock();
        let lead = rows
            .iter_mut()
            .find(|l| &l.id == id)
            .ok_or_else(|| AppError::NotFound("Lead not found".into()))?;
        if let Some(contacted) = patch.contacted {
            lead.contacted = contacted;
        }
        if let Some(notes) = &patch.notes {
            lead.notes = notes.clone();
        }
        Ok(lead.clone())
    }

    async fn delete_lead(&self, id: &Uuid) -> Result<(), AppError> {
        let mut rows = self.rows.lock();
        let before = rows.len();
        rows.retain(|l| &l.id != id);
        if rows.len() == before {
            return Err(AppError::NotFound("Lead not found".into()));
        }
        Ok(())
    }
}

pub struct TestApp {
    pub state: web::Data<AppState>,
    pub projects: Arc<InMemoryProjectRepo>,
    pub services: Arc<InMemoryServiceRepo>,
    pub leads: Arc<InMemoryLeadRepo>,
    pub quota: Arc<InMemoryQuotaStore>,
    pub config: AppConfig,
}

impl TestApp {
    pub fn new() -> Self {
        Self::with_config(test_config())
    }

    pub fn with_config(config: AppConfig) -> Self {
        let projects = Arc::new(InMemoryProjectRepo::default());
        let services = Arc::new(InMemoryServiceRepo::default());
        let leads = Arc::new(InMemoryLeadRepo::default());
        let quota = Arc::new(InMemoryQuotaStore::new(QuotaPolicy::new(
            config.lead_rate_limit,
            config.lead_rate_window_secs,
        )));

        let repos = SharedRepositories {
            project_repo: projects.clone(),
            service_repo: services.clone(),
            lead_repo: leads.clone(),
        };
        let state = web::Data::new(AppState::from_parts(&config, repos, quota.clone(), None));

        TestApp { state, projects, services, leads, quota, config }
    }

    pub fn admin_token(&self) -> String {
        self.state
            .auth_handler
            .token_service
            .create_jwt(ADMIN_EMAIL)
            .expect("Failed to create admin token")
    }

    pub fn non_admin_token(&self) -> String {
        let now = Utc::now();
        self.state
            .auth_handler
            .token_service
            .encode_claims(&Claims {
                sub: "visitor".into(),
                email: "visitor@example.com".into(),
                admin: false,
                exp: (now + Duration::minutes(5)).timestamp() as usize,
                iat: now.timestamp() as usize,
            })
            .expect("Failed to create token")
    }

    pub fn seed_project(&self, title: &str, featured: bool, tech: &[&str], age_days: i64) -> Project {
        let project = Project {
            id: Uuid::new_v4(),
            title: title.to_string(),
            description: format!("{} description", title),
            tech_stack: tech.iter().map(|t| t.to_string()).collect(),
            github_link: Some("https://github.com/example/project".into()),
            demo_link: None,
            role: "Lead developer".into(),
            featured,
            image: None,
            created_date: Utc::now() - Duration::days(age_days),
        };
        self.projects.rows.lock().push(project.clone());
        project
    }

    pub fn seed_service(&self, name: &str, category: ServiceCategory, is_active: bool, order: i32) -> Service {
        let service = Service {
            id: Uuid::new_v4(),
            name: name.to_string(),
            category,
            description: format!("{} description", name),
            icon: "⚙️".into(),
            is_active,
            order,
        };
        self.services.rows.lock().push(service.clone());
        service
    }

    pub fn lead_count(&self) -> usize {
        self.leads.rows.lock().len()
    }
}

pub fn test_config() -> AppConfig {
    AppConfig {
        env: AppEnvironment::Testing,
        name: "Portfolio Site Test".to_string(),
        port: 0,
        host: "127.0.0.1".to_string(),
        worker_count: 1,
        database_url: "postgres://localhost/portfolio_test".into(),
        database_max_connections: 1,
        redis_url: None,
        cors_allowed_origins: vec!["*".to_string()],
        jwt_secret: "test_jwt_secret_that_is_long_enough_for_hs512_1234567890".into(),
        jwt_expiration_minutes: 60,
        admin_email: ADMIN_EMAIL.into(),
        admin_password_hash: hash_password(ADMIN_PASSWORD).expect("Failed to hash password"),
        lead_rate_limit: 5,
        lead_rate_window_secs: 3600,
        quota_eviction_interval_secs: 300,
        trust_forwarded_for: false,
    }
}

/// A migrated Postgres schema private to one test.
pub struct TestDb {
    pub pool: PgPool,
    admin: PgPool,
    schema: String,
}

impl TestDb {
    /// Connects to `APP_TEST_DATABASE_URL`. Returns `None` when it is unset so
    /// the database tests are skipped on machines without Postgres.
    pub async fn connect() -> Option<Self> {
        let Ok(url) = std::env::var("APP_TEST_DATABASE_URL") else {
            eprintln!("APP_TEST_DATABASE_URL not set, skipping database test");
            return None;
        };

        let admin = PgPoolOptions::new()
            .max_connections(1)
            .connect(&url)
            .await
            .expect("Failed to connect to test database");

        let schema = format!("test_{}", Uuid::new_v4().simple());
        sqlx::query(&format!("CREATE SCHEMA {}", schema))
            .execute(&admin)
            .await
            .expect("Failed to create test schema");

        let search_path = schema.clone();
        let pool = PgPoolOptions::new()
            .max_connections(2)
            .after_connect(move |conn, _meta| {
                let statement = format!("SET search_path TO {}", search_path);
                Box::pin(async move {
                    sqlx::query(&statement).execute(&mut *conn).await?;
                    Ok(())
                })
            })
            .connect(&url)
            .await
            .expect("Failed to connect test pool");

        run_migrations(&pool).await.expect("Failed to run migrations");

        Some(TestDb { pool, admin, schema })
    }

    pub async fn drop_schema(self) {
        self.pool.close().await;
        sqlx::query(&format!("DROP SCHEMA {} CASCADE", self.schema))
            .execute(&self.admin)
            .await
            .expect("Failed to drop test schema");
    }
}
