use serde::{ser::SerializeMap, Deserialize, Serialize, Serializer};
use uuid::Uuid;
use validator::{Validate, ValidationErrors};

use crate::{
    domain::validation::{check_length, collect, non_blank, validate_not_blank},
    entities::category::{validate_category, ServiceCategory},
};

const MAX_NAME_LENGTH: u64 = 100;
const MAX_ICON_LENGTH: u64 = 50;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Service {
    pub id: Uuid,
    pub name: String,
    pub category: ServiceCategory,
    pub description: String,
    pub icon: String,
    pub is_active: bool,
    #[sqlx(rename = "display_order")]
    pub order: i32,
}

impl Service {
    pub fn category_display(&self) -> &'static str {
        self.category.label()
    }
}

/// Public representation. `is_active` is implied and not exposed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceResponse {
    pub id: Uuid,
    pub name: String,
    pub category: ServiceCategory,
    pub category_display: String,
    pub description: String,
    pub icon: String,
    pub order: i32,
}

impl From<&Service> for ServiceResponse {
    fn from(service: &Service) -> Self {
        ServiceResponse {
            id: service.id,
            name: service.name.clone(),
            category: service.category,
            category_display: service.category_display().to_string(),
            description: service.description.clone(),
            icon: service.icon.clone(),
            order: service.order,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct AdminServiceRow {
    #[serde(flatten)]
    pub service: Service,
    pub category_display: &'static str,
}

impl From<Service> for AdminServiceRow {
    fn from(service: Service) -> Self {
        let category_display = service.category_display();
        AdminServiceRow { service, category_display }
    }
}

/// Active services keyed by category label.
///
/// Serialized as a JSON object whose keys keep the order in which each
/// category was first met in the service listing.
#[derive(Debug, Default, PartialEq)]
pub struct CategoryGroups(pub Vec<(String, Vec<ServiceResponse>)>);

impl CategoryGroups {
    pub fn from_services<'a>(services: impl IntoIterator<Item = &'a Service>) -> Self {
        let mut groups: Vec<(String, Vec<ServiceResponse>)> = Vec::new();
        for service in services {
            let label = service.category_display();
            match groups.iter_mut().find(|(key, _)| key == label) {
                Some((_, members)) => members.push(service.into()),
                None => groups.push((label.to_string(), vec![service.into()])),
            }
        }
        CategoryGroups(groups)
    }

    pub fn labels(&self) -> Vec<&str> {
        self.0.iter().map(|(label, _)| label.as_str()).collect()
    }

    pub fn get(&self, label: &str) -> Option<&[ServiceResponse]> {
        self.0
            .iter()
            .find(|(key, _)| key == label)
            .map(|(_, members)| members.as_slice())
    }
}

impl Serialize for CategoryGroups {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (label, members) in &self.0 {
            map.serialize_entry(label, members)?;
        }
        map.end()
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ServiceFilter {
    pub active: Option<bool>,
    pub category: Option<ServiceCategory>,
    /// Admin search over name and description.
    pub search: Option<String>,
}

impl ServiceFilter {
    pub fn active_only() -> Self {
        ServiceFilter {
            active: Some(true),
            ..Default::default()
        }
    }
}

/// Admin listing query: `?q=&category=&is_active=`.
#[derive(Debug, Default, Deserialize)]
pub struct AdminServiceQuery {
    pub q: Option<String>,
    pub category: Option<ServiceCategory>,
    pub is_active: Option<bool>,
}

impl From<AdminServiceQuery> for ServiceFilter {
    fn from(query: AdminServiceQuery) -> Self {
        ServiceFilter {
            active: query.is_active,
            category: query.category,
            search: non_blank(query.q),
        }
    }
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct NewServiceRequest {
    #[validate(
        length(min = 1, max = MAX_NAME_LENGTH),
        custom(function = "validate_not_blank")
    )]
    pub name: String,

    #[validate(custom(function = "validate_category"))]
    pub category: String,

    #[validate(custom(function = "validate_not_blank"))]
    pub description: String,

    #[validate(length(min = 1, max = MAX_ICON_LENGTH))]
    pub icon: String,

    #[serde(default = "default_true")]
    pub is_active: bool,

    #[serde(default)]
    pub order: i32,
}

#[derive(Debug, Clone)]
pub struct ServiceInsert {
    pub name: String,
    pub category: ServiceCategory,
    pub description: String,
    pub icon: String,
    pub is_active: bool,
    pub order: i32,
}

impl TryFrom<NewServiceRequest> for ServiceInsert {
    type Error = ValidationErrors;

    fn try_from(request: NewServiceRequest) -> Result<Self, Self::Error> {
        request.validate()?;
        let category = request.category.parse::<ServiceCategory>().map_err(|_| {
            let mut errors = ValidationErrors::new();
            collect(&mut errors, "category", validate_category(&request.category));
            errors
        })?;

        Ok(ServiceInsert {
            name: request.name.trim().to_string(),
            category,
            description: request.description,
            icon: request.icon.trim().to_string(),
            is_active: request.is_active,
            order: request.order,
        })
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct UpdateServiceRequest {
    pub name: Option<String>,
    pub category: Option<String>,
    pub description: Option<String>,
    pub icon: Option<String>,
    pub is_active: Option<bool>,
    pub order: Option<i32>,
}

/// Validated form of [`UpdateServiceRequest`] with the category parsed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ServicePatch {
    pub name: Option<String>,
    pub category: Option<ServiceCategory>,
    pub description: Option<String>,
    pub icon: Option<String>,
    pub is_active: Option<bool>,
    pub order: Option<i32>,
}

impl Validate for UpdateServiceRequest {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();

        if let Some(name) = &self.name {
            check_length(&mut errors, "name", name.trim(), 1, MAX_NAME_LENGTH as usize);
        }
        if let Some(category) = &self.category {
            collect(&mut errors, "category", validate_category(category));
        }
        if let Some(description) = &self.description {
            collect(&mut errors, "description", validate_not_blank(description));
        }
        if let Some(icon) = &self.icon {
            check_length(&mut errors, "icon", icon.trim(), 1, MAX_ICON_LENGTH as usize);
        }

        if errors.is_empty() { Ok(()) } else { Err(errors) }
    }
}

impl TryFrom<UpdateServiceRequest> for ServicePatch {
    type Error = ValidationErrors;

    fn try_from(request: UpdateServiceRequest) -> Result<Self, Self::Error> {
        request.validate()?;
        Ok(ServicePatch {
            name: request.name.map(|n| n.trim().to_string()),
            // Already validated above.
            category: request.category.and_then(|c| c.parse().ok()),
            description: request.description,
            icon: request.icon.map(|i| i.trim().to_string()),
            is_active: request.is_active,
            order: request.order,
        })
    }
}
