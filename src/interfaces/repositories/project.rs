use async_trait::async_trait;
use sqlx::{PgPool, QueryBuilder, Postgres};
use uuid::Uuid;

use crate::{
    entities::project::{Project, ProjectFilter, ProjectInsert, UpdateProjectRequest},
    errors::AppError,
    repositories::sqlx_repo::{contains_pattern, SqlxProjectRepo},
};

const PROJECT_COLUMNS: &str = "id, title, description, tech_stack, github_link, demo_link, role, featured, image, created_date";

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProjectRepository: Send + Sync {
    async fn check_connection(&self) -> Result<(), AppError>;
    /// Projects matching `filter`, featured first then newest first.
    async fn list_projects(&self, filter: &ProjectFilter, limit: Option<i64>) -> Result<Vec<Project>, AppError>;
    async fn get_project_by_id(&self, id: &Uuid) -> Result<Project, AppError>;
    async fn create_project(&self, project: &ProjectInsert) -> Result<Project, AppError>;
    async fn update_project(&self, id: &Uuid, patch: &UpdateProjectRequest) -> Result<Project, AppError>;
    async fn delete_project(&self, id: &Uuid) -> Result<(), AppError>;
}

impl SqlxProjectRepo {
    pub fn new(pool: PgPool) -> Self {
        SqlxProjectRepo { pool }
    }
}

fn push_project_filter(builder: &mut QueryBuilder<'_, Postgres>, filter: &ProjectFilter) {
    builder.push(" WHERE TRUE");

    if let Some(featured) = filter.featured {
        builder.push(" AND featured = ").push_bind(featured);
    }

    if let Some(tech) = &filter.tech {
        // Whole-element containment, served by the GIN index.
        builder.push(" AND tech_stack @> ").push_bind(vec![tech.clone()]);
    }

    if let Some(q) = &filter.search {
        let pattern = contains_pattern(q);
        builder.push(" AND (title ILIKE ").push_bind(pattern.clone()).push(" ESCAPE '\\'");
        builder.push(" OR description ILIKE ").push_bind(pattern.clone()).push(" ESCAPE '\\'");
        builder.push(" OR role ILIKE ").push_bind(pattern).push(" ESCAPE '\\'");
        builder.push(")");
    }
}

#[async_trait]
impl ProjectRepository for SqlxProjectRepo {
    async fn check_connection(&self) -> Result<(), AppError> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map(|_| ())
            .map_err(AppError::from)
    }

    async fn list_projects(&self, filter: &ProjectFilter, limit: Option<i64>) -> Result<Vec<Project>, AppError> {
        let mut builder = QueryBuilder::new(format!("SELECT {} FROM projects", PROJECT_COLUMNS));
        push_project_filter(&mut builder, filter);
        builder.push(" ORDER BY featured DESC, created_date DESC");

        if let Some(limit) = limit {
            builder.push(" LIMIT ").push_bind(limit);
        }

        let projects = builder
            .build_query_as::<Project>()
            .fetch_all(&self.pool)
            .await?;

        Ok(projects)
    }

    async fn get_project_by_id(&self, id: &Uuid) -> Result<Project, AppError> {
        sqlx::query_as::<_, Project>(
            &format!("SELECT {} FROM projects WHERE id = $1", PROJECT_COLUMNS)
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound("Project not found".into()))
    }

    async fn create_project(&self, project: &ProjectInsert) -> Result<Project, AppError> {
        let created = sqlx::query_as::<_, Project>(&format!(
            r#"
            INSERT INTO projects (
                title, description, tech_stack, github_link, demo_link,
                role, featured, image, created_date
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING {}
            "#,
            PROJECT_COLUMNS
        ))
        .bind(&project.title)
        .bind(&project.description)
        .bind(&project.tech_stack)
        .bind(&project.github_link)
        .bind(&project.demo_link)
        .bind(&project.role)
        .bind(project.featured)
        .bind(&project.image)
        .bind(project.created_date)
        .fetch_one(&self.pool)
        .await?;

        Ok(created)
    }

    async fn update_project(&self, id: &Uuid, patch: &UpdateProjectRequest) -> Result<Project, AppError> {
        let (github_touched, github_link) = patch.github_link.as_sql_patch();
        let (demo_touched, demo_link) = patch.demo_link.as_sql_patch();
        let (image_touched, image) = patch.image.as_sql_patch();

        // COALESCE keeps columns the patch leaves out; nullable columns use an explicit flag
        sqlx::query_as::<_, Project>(&format!(
            r#"
            UPDATE projects SET
                title = COALESCE($1, title),
                description = COALESCE($2, description),
                tech_stack = COALESCE($3, tech_stack),
                github_link = CASE WHEN $4 THEN $5 ELSE github_link END,
                demo_link = CASE WHEN $6 THEN $7 ELSE demo_link END,
                role = COALESCE($8, role),
                featured = COALESCE($9, featured),
                image = CASE WHEN $10 THEN $11 ELSE image END,
                created_date = COALESCE($12, created_date)
            WHERE id = $13
            RETURNING {}
            "#,
            PROJECT_COLUMNS
        ))
        .bind(&patch.title)
        .bind(&patch.description)
        .bind(&patch.tech_stack)
        .bind(github_touched)
        .bind(github_link)
        .bind(demo_touched)
        .bind(demo_link)
        .bind(&patch.role)
        .bind(patch.featured)
        .bind(image_touched)
        .bind(image)
        .bind(patch.created_date)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound("Project not found".into()))
    }

    async fn delete_project(&self, id: &Uuid) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM projects WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Project not found".into()));
        }

        Ok(())
    }
}
