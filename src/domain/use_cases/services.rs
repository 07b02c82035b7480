use std::sync::Arc;

use crate::{
    entities::service::{
        AdminServiceRow, CategoryGroups, NewServiceRequest, Service, ServiceFilter, ServiceInsert, ServicePatch,
        ServiceResponse, UpdateServiceRequest,
    },
    errors::AppError,
    repositories::service::ServiceRepository,
    utils::valid_uuid::valid_uuid,
};

pub struct ServiceHandler {
    pub service_repo: Arc<dyn ServiceRepository>,
}

impl ServiceHandler {
    pub fn new(service_repo: Arc<dyn ServiceRepository>) -> Self {
        ServiceHandler { service_repo }
    }

    async fn active_services(&self) -> Result<Vec<Service>, AppError> {
        self.service_repo.list_services(&ServiceFilter::active_only()).await
    }

    pub async fn list_active_services(&self) -> Result<Vec<ServiceResponse>, AppError> {
        let services = self.active_services().await?;
        Ok(services.iter().map(ServiceResponse::from).collect())
    }

    /// Active services grouped by category label, keys in first-seen order.
    pub async fn group_services_by_category_label(&self) -> Result<CategoryGroups, AppError> {
        let services = self.active_services().await?;
        Ok(CategoryGroups::from_services(&services))
    }

    /// Inactive services are reported as missing.
    pub async fn get_active_service(&self, id: &str) -> Result<ServiceResponse, AppError> {
        let valid_id = valid_uuid(id)?;
        let service = self.service_repo.get_service_by_id(&valid_id).await?;

        if !service.is_active {
            return Err(AppError::NotFound("Service not found".into()));
        }
        Ok(ServiceResponse::from(&service))
    }

    pub async fn list_admin_services(&self, filter: &ServiceFilter) -> Result<Vec<AdminServiceRow>, AppError> {
        let services = self.service_repo.list_services(filter).await?;
        Ok(services.into_iter().map(AdminServiceRow::from).collect())
    }

    pub async fn get_service(&self, id: &str) -> Result<AdminServiceRow, AppError> {
        let valid_id = valid_uuid(id)?;
        let service = self.service_repo.get_service_by_id(&valid_id).await?;
        Ok(AdminServiceRow::from(service))
    }

    pub async fn create_service(&self, request: NewServiceRequest) -> Result<AdminServiceRow, AppError> {
        let insert = ServiceInsert::try_from(request)?;
        let service = self.service_repo.create_service(&insert).await?;
        tracing::info!(service_id = %service.id, "Service created");
        Ok(AdminServiceRow::from(service))
    }

    pub async fn update_service(&self, id: &str, request: UpdateServiceRequest) -> Result<AdminServiceRow, AppError> {
        let valid_id = valid_uuid(id)?;
        let patch = ServicePatch::try_from(request)?;
        let service = self.service_repo.update_service(&valid_id, &patch).await?;
        Ok(AdminServiceRow::from(service))
    }

    pub async fn delete_service(&self, id: &str) -> Result<(), AppError> {
        let valid_id = valid_uuid(id)?;
        self.service_repo.delete_service(&valid_id).await?;
        tracing::info!(service_id = %valid_id, "Service deleted");
        Ok(())
    }
}
