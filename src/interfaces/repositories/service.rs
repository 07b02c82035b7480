use async_trait::async_trait;
use sqlx::{PgPool, QueryBuilder};
use uuid::Uuid;

use crate::{
    entities::service::{Service, ServiceFilter, ServiceInsert, ServicePatch},
    errors::AppError,
    repositories::sqlx_repo::{contains_pattern, SqlxServiceRepo},
};

const SERVICE_COLUMNS: &str = "id, name, category, description, icon, is_active, display_order";

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ServiceRepository: Send + Sync {
    /// Services matching `filter`, ordered by display order then name.
    async fn list_services(&self, filter: &ServiceFilter) -> Result<Vec<Service>, AppError>;
    async fn get_service_by_id(&self, id: &Uuid) -> Result<Service, AppError>;
    async fn create_service(&self, service: &ServiceInsert) -> Result<Service, AppError>;
    async fn update_service(&self, id: &Uuid, patch: &ServicePatch) -> Result<Service, AppError>;
    async fn delete_service(&self, id: &Uuid) -> Result<(), AppError>;
}

impl SqlxServiceRepo {
    pub fn new(pool: PgPool) -> Self {
        SqlxServiceRepo { pool }
    }
}

#[async_trait]
impl ServiceRepository for SqlxServiceRepo {
    async fn list_services(&self, filter: &ServiceFilter) -> Result<Vec<Service>, AppError> {
        let mut builder = QueryBuilder::new(format!("SELECT {} FROM services WHERE TRUE", SERVICE_COLUMNS));

        if let Some(active) = filter.active {
            builder.push(" AND is_active = ").push_bind(active);
        }

        if let Some(category) = filter.category {
            builder.push(" AND category = ").push_bind(category);
        }

        if let Some(q) = &filter.search {
            let pattern = contains_pattern(q);
            builder.push(" AND (name ILIKE ").push_bind(pattern.clone()).push(" ESCAPE '\\'");
            builder.push(" OR description ILIKE ").push_bind(pattern).push(" ESCAPE '\\'");
            builder.push(")");
        }

        builder.push(" ORDER BY display_order ASC, name ASC");

        let services = builder
            .build_query_as::<Service>()
            .fetch_all(&self.pool)
            .await?;

        Ok(services)
    }

    async fn get_service_by_id(&self, id: &Uuid) -> Result<Service, AppError> {
        sqlx::query_as::<_, Service>(
            &format!("SELECT {} FROM services WHERE id = $1", SERVICE_COLUMNS)
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound("Service not found".into()))
    }

    async fn create_service(&self, service: &ServiceInsert) -> Result<Service, AppError> {
        let created = sqlx::query_as::<_, Service>(&format!(
            r#"
            INSERT INTO services (name, category, description, icon, is_active, display_order)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {}
            "#,
            SERVICE_COLUMNS
        ))
        .bind(&service.name)
        .bind(service.category)
        .bind(&service.description)
        .bind(&service.icon)
        .bind(service.is_active)
        .bind(service.order)
        .fetch_one(&self.pool)
        .await?;

        Ok(created)
    }

    async fn update_service(&self, id: &Uuid, patch: &ServicePatch) -> Result<Service, AppError> {
        sqlx::query_as::<_, Service>(&format!(
            r#"
            UPDATE services SET
                name = COALESCE($1, name),
                category = COALESCE($2, category),
                description = COALESCE($3, description),
                icon = COALESCE($4, icon),
                is_active = COALESCE($5, is_active),
                display_order = COALESCE($6, display_order)
            WHERE id = $7
            RETURNING {}
            "#,
            SERVICE_COLUMNS
        ))
        .bind(&patch.name)
        .bind(patch.category)
        .bind(&patch.description)
        .bind(&patch.icon)
        .bind(patch.is_active)
        .bind(patch.order)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound("Service not found".into()))
    }

    async fn delete_service(&self, id: &Uuid) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM services WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Service not found".into()));
        }

        Ok(())
    }
}
