use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use validator::ValidationError;

/// Service type shared by `Service.category` and `Lead.service_interest`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "service_category", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ServiceCategory {
    Automation,
    Trading,
    #[serde(alias = "web-development")]
    Web,
}

impl ServiceCategory {
    pub const ALL: [ServiceCategory; 3] = [
        ServiceCategory::Automation,
        ServiceCategory::Trading,
        ServiceCategory::Web,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ServiceCategory::Automation => "automation",
            ServiceCategory::Trading => "trading",
            ServiceCategory::Web => "web",
        }
    }

    /// Human-readable label used for display and grouping.
    pub fn label(&self) -> &'static str {
        match self {
            ServiceCategory::Automation => "Automation",
            ServiceCategory::Trading => "Trading",
            ServiceCategory::Web => "Web Development",
        }
    }
}

impl fmt::Display for ServiceCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ServiceCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "automation" => Ok(ServiceCategory::Automation),
            "trading" => Ok(ServiceCategory::Trading),
            "web" | "web-development" => Ok(ServiceCategory::Web),
            other => Err(format!("\"{}\" is not a valid choice.", other)),
        }
    }
}

/// Validator hook for string inputs that must name a category.
pub fn validate_category(value: &str) -> Result<(), ValidationError> {
    value.parse::<ServiceCategory>().map(|_| ()).map_err(|msg| {
        let mut err = ValidationError::new("invalid_choice");
        err.message = Some(msg.into());
        err
    })
}

/// Like [`validate_category`], but a blank value means "no category".
pub fn validate_optional_category(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Ok(());
    }
    validate_category(value)
}

/// Parses an optional category, treating blank strings as absent.
pub fn parse_optional_category(value: Option<&str>) -> Result<Option<ServiceCategory>, String> {
    match value.map(str::trim) {
        None | Some("") => Ok(None),
        Some(v) => v.parse().map(Some),
    }
}
