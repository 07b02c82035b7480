use std::sync::Arc;

use chrono::Utc;
use validator::Validate;

use crate::{
    entities::project::{AdminProjectRow, NewProjectRequest, Project, ProjectFilter, UpdateProjectRequest},
    errors::AppError,
    repositories::project::ProjectRepository,
    utils::valid_uuid::valid_uuid,
};

pub const OVERVIEW_FEATURED_LIMIT: u32 = 6;

pub struct ProjectHandler {
    pub project_repo: Arc<dyn ProjectRepository>,
}

impl ProjectHandler {
    pub fn new(project_repo: Arc<dyn ProjectRepository>) -> Self {
        ProjectHandler { project_repo }
    }

    pub async fn check_connection(&self) -> Result<(), AppError> {
        self.project_repo.check_connection().await
    }

    /// Public listing, featured first then newest first.
    pub async fn list_projects(&self, filter: &ProjectFilter) -> Result<Vec<Project>, AppError> {
        self.project_repo.list_projects(filter, None).await
    }

    /// Featured projects, newest first, optionally truncated.
    pub async fn list_featured_projects(&self, limit: Option<u32>) -> Result<Vec<Project>, AppError> {
        self.project_repo
            .list_projects(&ProjectFilter::featured_only(), limit.map(i64::from))
            .await
    }

    pub async fn get_project(&self, id: &str) -> Result<Project, AppError> {
        let valid_id = valid_uuid(id)?;
        self.project_repo.get_project_by_id(&valid_id).await
    }

    pub async fn list_admin_projects(&self, filter: &ProjectFilter) -> Result<Vec<AdminProjectRow>, AppError> {
        let projects = self.project_repo.list_projects(filter, None).await?;
        Ok(projects.into_iter().map(AdminProjectRow::from).collect())
    }

    pub async fn create_project(&self, request: NewProjectRequest) -> Result<Project, AppError> {
        request.validate()?;
        let insert = request.prepare_for_insert(Utc::now());

        let project = self.project_repo.create_project(&insert).await?;
        tracing::info!(project_id = %project.id, "Project created");
        Ok(project)
    }

    pub async fn update_project(&self, id: &str, request: UpdateProjectRequest) -> Result<Project, AppError> {
        let valid_id = valid_uuid(id)?;
        let patch = request.normalized();
        patch.validate()?;

        self.project_repo.update_project(&valid_id, &patch).await
    }

    pub async fn delete_project(&self, id: &str) -> Result<(), AppError> {
        let valid_id = valid_uuid(id)?;
        self.project_repo.delete_project(&valid_id).await?;
        tracing::info!(project_id = %valid_id, "Project deleted");
        Ok(())
    }
}
