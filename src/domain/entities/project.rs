use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::{Validate, ValidationErrors};

use crate::{
    domain::validation::{
        check_length, collect, non_blank, validate_not_blank, validate_optional_url, validate_tech_stack,
    },
    entities::option_fields::OptionField,
};

const MAX_TITLE_LENGTH: u64 = 200;
const MAX_ROLE_LENGTH: u64 = 100;
const MAX_IMAGE_LENGTH: u64 = 255;
const TECH_DISPLAY_LIMIT: usize = 3;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Project {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub tech_stack: Vec<String>,
    pub github_link: Option<String>,
    pub demo_link: Option<String>,
    pub role: String,
    pub featured: bool,
    pub image: Option<String>,
    pub created_date: DateTime<Utc>,
}

impl Project {
    /// Comma-separated tech stack truncated to the first three entries.
    pub fn tech_stack_display(&self) -> String {
        if self.tech_stack.is_empty() {
            return "-".to_string();
        }
        let shown = self.tech_stack
            .iter()
            .take(TECH_DISPLAY_LIMIT)
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(", ");

        if self.tech_stack.len() > TECH_DISPLAY_LIMIT {
            format!("{}...", shown)
        } else {
            shown
        }
    }
}

/// Filter over the project listing. All present criteria are combined with AND.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProjectFilter {
    pub featured: Option<bool>,
    /// Exact, case-sensitive tech_stack element.
    pub tech: Option<String>,
    /// Admin search over title, description and role.
    pub search: Option<String>,
}

impl ProjectFilter {
    pub fn featured_only() -> Self {
        ProjectFilter {
            featured: Some(true),
            ..Default::default()
        }
    }
}

/// Raw `?featured=&tech=` query string of the public listing.
#[derive(Debug, Default, Deserialize)]
pub struct ProjectListQuery {
    pub featured: Option<String>,
    pub tech: Option<String>,
}

impl From<ProjectListQuery> for ProjectFilter {
    fn from(query: ProjectListQuery) -> Self {
        ProjectFilter {
            featured: query.featured.map(|v| v.trim().eq_ignore_ascii_case("true")),
            tech: query.tech.filter(|t| !t.is_empty()),
            search: None,
        }
    }
}

/// Admin listing query: `?q=&featured=`.
#[derive(Debug, Default, Deserialize)]
pub struct AdminProjectQuery {
    pub q: Option<String>,
    pub featured: Option<bool>,
}

impl From<AdminProjectQuery> for ProjectFilter {
    fn from(query: AdminProjectQuery) -> Self {
        ProjectFilter {
            featured: query.featured,
            tech: None,
            search: non_blank(query.q),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct AdminProjectRow {
    #[serde(flatten)]
    pub project: Project,
    pub tech_stack_display: String,
}

impl From<Project> for AdminProjectRow {
    fn from(project: Project) -> Self {
        let tech_stack_display = project.tech_stack_display();
        AdminProjectRow { project, tech_stack_display }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct NewProjectRequest {
    #[validate(
        length(min = 1, max = MAX_TITLE_LENGTH),
        custom(function = "validate_not_blank")
    )]
    pub title: String,

    #[validate(custom(function = "validate_not_blank"))]
    pub description: String,

    #[serde(default)]
    #[validate(custom(function = "validate_tech_stack"))]
    pub tech_stack: Vec<String>,

    #[validate(custom(function = "validate_optional_url"))]
    pub github_link: Option<String>,

    #[validate(custom(function = "validate_optional_url"))]
    pub demo_link: Option<String>,

    #[validate(
        length(min = 1, max = MAX_ROLE_LENGTH),
        custom(function = "validate_not_blank")
    )]
    pub role: String,

    #[serde(default)]
    pub featured: bool,

    #[validate(length(max = MAX_IMAGE_LENGTH))]
    pub image: Option<String>,

    pub created_date: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone)]
pub struct ProjectInsert {
    pub title: String,
    pub description: String,
    pub tech_stack: Vec<String>,
    pub github_link: Option<String>,
    pub demo_link: Option<String>,
    pub role: String,
    pub featured: bool,
    pub image: Option<String>,
    pub created_date: DateTime<Utc>,
}

impl NewProjectRequest {
    pub fn prepare_for_insert(self, now: DateTime<Utc>) -> ProjectInsert {
        ProjectInsert {
            title: self.title.trim().to_string(),
            description: self.description,
            tech_stack: self.tech_stack.into_iter().map(|t| t.trim().to_string()).collect(),
            github_link: non_blank(self.github_link),
            demo_link: non_blank(self.demo_link),
            role: self.role.trim().to_string(),
            featured: self.featured,
            image: non_blank(self.image),
            created_date: self.created_date.unwrap_or(now),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct UpdateProjectRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub tech_stack: Option<Vec<String>>,
    pub github_link: OptionField<String>,
    pub demo_link: OptionField<String>,
    pub role: Option<String>,
    pub featured: Option<bool>,
    pub image: OptionField<String>,
    pub created_date: Option<DateTime<Utc>>,
}

impl UpdateProjectRequest {
    /// Trims text fields and collapses blank links to null.
    pub fn normalized(self) -> Self {
        UpdateProjectRequest {
            title: self.title.map(|t| t.trim().to_string()),
            tech_stack: self.tech_stack
                .map(|stack| stack.into_iter().map(|t| t.trim().to_string()).collect()),
            github_link: self.github_link.normalize_blank(),
            demo_link: self.demo_link.normalize_blank(),
            role: self.role.map(|r| r.trim().to_string()),
            image: self.image.normalize_blank(),
            ..self
        }
    }
}

impl Validate for UpdateProjectRequest {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();

        if let Some(title) = &self.title {
            check_length(&mut errors, "title", title, 1, MAX_TITLE_LENGTH as usize);
        }
        if let Some(description) = &self.description {
            collect(&mut errors, "description", validate_not_blank(description));
        }
        if let Some(stack) = &self.tech_stack {
            collect(&mut errors, "tech_stack", validate_tech_stack(stack));
        }
        if let Some(link) = self.github_link.value_ref() {
            collect(&mut errors, "github_link", validate_optional_url(link));
        }
        if let Some(link) = self.demo_link.value_ref() {
            collect(&mut errors, "demo_link", validate_optional_url(link));
        }
        if let Some(role) = &self.role {
            check_length(&mut errors, "role", role, 1, MAX_ROLE_LENGTH as usize);
        }
        if let Some(image) = self.image.value_ref() {
            check_length(&mut errors, "image", image, 0, MAX_IMAGE_LENGTH as usize);
        }

        if errors.is_empty() { Ok(()) } else { Err(errors) }
    }
}
