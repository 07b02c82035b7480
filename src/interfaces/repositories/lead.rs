use async_trait::async_trait;
use sqlx::{PgPool, QueryBuilder};
use uuid::Uuid;

use crate::{
    entities::lead::{Lead, LeadFilter, LeadInsert, UpdateLeadRequest},
    errors::AppError,
    repositories::sqlx_repo::{contains_pattern, SqlxLeadRepo},
};

const LEAD_COLUMNS: &str = "id, name, email, company, message, service_interest, created_at, contacted, notes";

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LeadRepository: Send + Sync {
    /// Inserts a new lead with `contacted = false` and empty notes.
    async fn create_lead(&self, lead: &LeadInsert) -> Result<Lead, AppError>;
    async fn get_lead_by_id(&self, id: &Uuid) -> Result<Lead, AppError>;
    /// Leads matching `filter`, newest first.
    async fn list_leads(&self, filter: &LeadFilter) -> Result<Vec<Lead>, AppError>;
    /// Sets `contacted` on the given leads and returns how many rows changed.
    async fn set_contacted(&self, ids: &[Uuid], contacted: bool) -> Result<u64, AppError>;
    async fn update_lead(&self, id: &Uuid, patch: &UpdateLeadRequest) -> Result<Lead, AppError>;
    async fn delete_lead(&self, id: &Uuid) -> Result<(), AppError>;
}

impl SqlxLeadRepo {
    pub fn new(pool: PgPool) -> Self {
        SqlxLeadRepo { pool }
    }
}

#[async_trait]
impl LeadRepository for SqlxLeadRepo {
    async fn create_lead(&self, lead: &LeadInsert) -> Result<Lead, AppError> {
        let created = sqlx::query_as::<_, Lead>(&format!(
            r#"
            INSERT INTO leads (name, email, company, message, service_interest, created_at, contacted, notes)
            VALUES ($1, $2, $3, $4, $5, $6, FALSE, '')
            RETURNING {}
            "#,
            LEAD_COLUMNS
        ))
        .bind(&lead.name)
        .bind(&lead.email)
        .bind(&lead.company)
        .bind(&lead.message)
        .bind(lead.service_interest)
        .bind(lead.created_at)
        .fetch_one(&self.pool)
        .await?;

        Ok(created)
    }

    async fn get_lead_by_id(&self, id: &Uuid) -> Result<Lead, AppError> {
        sqlx::query_as::<_, Lead>(
            &format!("SELECT {} FROM leads WHERE id = $1", LEAD_COLUMNS)
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound("Lead not found".into()))
    }

    async fn list_leads(&self, filter: &LeadFilter) -> Result<Vec<Lead>, AppError> {
        let mut builder = QueryBuilder::new(format!("SELECT {} FROM leads WHERE TRUE", LEAD_COLUMNS));

        if let Some(contacted) = filter.contacted {
            builder.push(" AND contacted = ").push_bind(contacted);
        }

        if let Some(interest) = filter.service_interest {
            builder.push(" AND service_interest = ").push_bind(interest);
        }

        if let Some(q) = &filter.search {
            let pattern = contains_pattern(q);
            builder.push(" AND (name ILIKE ").push_bind(pattern.clone()).push(" ESCAPE '\\'");
            builder.push(" OR email ILIKE ").push_bind(pattern.clone()).push(" ESCAPE '\\'");
            builder.push(" OR company ILIKE ").push_bind(pattern.clone()).push(" ESCAPE '\\'");
            builder.push(" OR message ILIKE ").push_bind(pattern).push(" ESCAPE '\\'");
            builder.push(")");
        }

        builder.push(" ORDER BY created_at DESC");

        let leads = builder
            .build_query_as::<Lead>()
            .fetch_all(&self.pool)
            .await?;

        Ok(leads)
    }

    async fn set_contacted(&self, ids: &[Uuid], contacted: bool) -> Result<u64, AppError> {
        // Rows already in the target state are skipped so the count reflects real changes
        let result = sqlx::query(
            "UPDATE leads SET contacted = $1 WHERE id = ANY($2) AND contacted IS DISTINCT FROM $1"
        )
        .bind(contacted)
        .bind(ids)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected())
    }

    async fn update_lead(&self, id: &Uuid, patch: &UpdateLeadRequest) -> Result<Lead, AppError> {
        sqlx::query_as::<_, Lead>(&format!(
            r#"
            UPDATE leads SET
                contacted = COALESCE($1, contacted),
                notes = COALESCE($2, notes)
            WHERE id = $3
            RETURNING {}
            "#,
            LEAD_COLUMNS
        ))
        .bind(patch.contacted)
        .bind(&patch.notes)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound("Lead not found".into()))
    }

    async fn delete_lead(&self, id: &Uuid) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM leads WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Lead not found".into()));
        }

        Ok(())
    }
}
