use std::sync::Arc;

use chrono::{DateTime, Utc};
use validator::Validate;

use crate::{
    entities::lead::{
        AdminLeadRow, BulkLeadRequest, BulkUpdateResponse, LeadAcknowledgement, LeadFilter, NewLeadForm,
        UpdateLeadRequest, LEAD_THANK_YOU,
    },
    errors::AppError,
    limiter::{QuotaDecision, QuotaStore},
    repositories::lead::LeadRepository,
    utils::valid_uuid::valid_uuid,
};

pub struct LeadHandler {
    pub lead_repo: Arc<dyn LeadRepository>,
    pub quota: Arc<dyn QuotaStore>,
}

impl LeadHandler {
    pub fn new(lead_repo: Arc<dyn LeadRepository>, quota: Arc<dyn QuotaStore>) -> Self {
        LeadHandler { lead_repo, quota }
    }

    /// Accepts a public lead submission from `client`.
    pub async fn submit_lead(&self, form: NewLeadForm, client: &str) -> Result<LeadAcknowledgement, AppError> {
        self.submit_lead_at(form, client, Utc::now()).await
    }

    /// Validation runs first so rejected input never uses up quota. The slot
    /// is reserved before the insert and handed back if the insert fails.
    pub async fn submit_lead_at(
        &self,
        form: NewLeadForm,
        client: &str,
        now: DateTime<Utc>,
    ) -> Result<LeadAcknowledgement, AppError> {
        let insert = form.prepare_for_insert(now)?;

        let permit = match self.quota.try_acquire(client, now).await? {
            QuotaDecision::Granted(permit) => permit,
            QuotaDecision::Denied { retry_after_secs } => {
                tracing::info!(retry_after_secs, "Lead submission rate limited");
                return Err(AppError::RateLimited { retry_after_secs });
            }
        };

        match self.lead_repo.create_lead(&insert).await {
            Ok(lead) => {
                tracing::info!(lead_id = %lead.id, "Lead captured");
                Ok(LeadAcknowledgement {
                    message: LEAD_THANK_YOU.to_string(),
                    data: lead.to_echo(),
                })
            }
            Err(e) => {
                if let Err(release_err) = self.quota.release(&permit).await {
                    tracing::warn!("Failed to release quota slot: {}", release_err);
                }
                Err(e)
            }
        }
    }

    pub async fn list_leads(&self, filter: &LeadFilter) -> Result<Vec<AdminLeadRow>, AppError> {
        let leads = self.lead_repo.list_leads(filter).await?;
        Ok(leads.into_iter().map(AdminLeadRow::from).collect())
    }

    pub async fn get_lead(&self, id: &str) -> Result<AdminLeadRow, AppError> {
        let valid_id = valid_uuid(id)?;
        let lead = self.lead_repo.get_lead_by_id(&valid_id).await?;
        Ok(AdminLeadRow::from(lead))
    }

    pub async fn mark_contacted(&self, request: BulkLeadRequest) -> Result<BulkUpdateResponse, AppError> {
        self.set_contacted(request, true).await
    }

    pub async fn mark_not_contacted(&self, request: BulkLeadRequest) -> Result<BulkUpdateResponse, AppError> {
        self.set_contacted(request, false).await
    }

    async fn set_contacted(&self, request: BulkLeadRequest, contacted: bool) -> Result<BulkUpdateResponse, AppError> {
        request.validate()?;

        let updated = self.lead_repo.set_contacted(&request.ids, contacted).await?;
        let state = if contacted { "contacted" } else { "not contacted" };
        tracing::info!(updated, state, "Bulk lead update");

        Ok(BulkUpdateResponse {
            updated,
            message: format!("{} lead(s) marked as {}.", updated, state),
        })
    }

    pub async fn update_lead(&self, id: &str, request: UpdateLeadRequest) -> Result<AdminLeadRow, AppError> {
        let valid_id = valid_uuid(id)?;
        request.validate()?;

        let lead = self.lead_repo.update_lead(&valid_id, &request).await?;
        Ok(AdminLeadRow::from(lead))
    }

    pub async fn delete_lead(&self, id: &str) -> Result<(), AppError> {
        let valid_id = valid_uuid(id)?;
        self.lead_repo.delete_lead(&valid_id).await
    }
}
