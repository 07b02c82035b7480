use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::{Validate, ValidationErrors};

use crate::{
    domain::validation::{non_blank, validate_not_blank},
    entities::category::{parse_optional_category, validate_optional_category, ServiceCategory},
};

const MAX_NAME_LENGTH: u64 = 200;
const MAX_COMPANY_LENGTH: u64 = 200;
const MAX_EMAIL_LENGTH: u64 = 254;
const MAX_MESSAGE_LENGTH: u64 = 5000;
const MAX_BULK_IDS: u64 = 500;

pub const LEAD_THANK_YOU: &str = "Thank you for your interest! I will get back to you soon.";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Lead {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub company: Option<String>,
    pub message: String,
    pub service_interest: Option<ServiceCategory>,
    pub created_at: DateTime<Utc>,
    pub contacted: bool,
    pub notes: String,
}

impl Lead {
    pub fn status_label(&self) -> &'static str {
        if self.contacted { "Contacted" } else { "Pending" }
    }

    pub fn service_interest_display(&self) -> &'static str {
        self.service_interest.map(|c| c.label()).unwrap_or("-")
    }

    /// The fields echoed back to the person who submitted the lead.
    pub fn to_echo(&self) -> LeadEcho {
        LeadEcho {
            id: self.id,
            name: self.name.clone(),
            email: self.email.clone(),
            company: self.company.clone(),
            message: self.message.clone(),
            service_interest: self.service_interest,
            created_at: self.created_at,
        }
    }
}

/// Public submission payload. Missing required fields deserialize as empty
/// strings so they surface as field-level validation errors.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct NewLeadForm {
    #[serde(default)]
    #[validate(
        length(max = MAX_NAME_LENGTH, message = "Ensure this field has no more than 200 characters."),
        custom(function = "validate_not_blank")
    )]
    pub name: String,

    #[serde(default)]
    #[validate(
        email(message = "Enter a valid email address."),
        length(max = MAX_EMAIL_LENGTH, message = "Ensure this field has no more than 254 characters.")
    )]
    pub email: String,

    #[validate(length(max = MAX_COMPANY_LENGTH, message = "Ensure this field has no more than 200 characters."))]
    pub company: Option<String>,

    #[serde(default)]
    #[validate(
        length(max = MAX_MESSAGE_LENGTH, message = "Ensure this field has no more than 5000 characters."),
        custom(function = "validate_not_blank")
    )]
    pub message: String,

    #[validate(custom(function = "validate_optional_category"))]
    pub service_interest: Option<String>,
}

impl NewLeadForm {
    /// Trims inputs and lower-cases the email so every later check and the
    /// stored row see the same value.
    pub fn normalized(self) -> Self {
        NewLeadForm {
            name: self.name.trim().to_string(),
            email: normalize_email(&self.email),
            company: non_blank(self.company),
            message: self.message.trim().to_string(),
            service_interest: non_blank(self.service_interest),
        }
    }

    /// Validates the normalized form and builds the row to insert.
    pub fn prepare_for_insert(self, created_at: DateTime<Utc>) -> Result<LeadInsert, ValidationErrors> {
        let form = self.normalized();
        form.validate()?;

        // validate() has already rejected unknown categories
        let service_interest = parse_optional_category(form.service_interest.as_deref())
            .unwrap_or(None);

        Ok(LeadInsert {
            name: form.name,
            email: form.email,
            company: form.company,
            message: form.message,
            service_interest,
            created_at,
        })
    }
}

pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

#[derive(Debug, Clone, PartialEq)]
pub struct LeadInsert {
    pub name: String,
    pub email: String,
    pub company: Option<String>,
    pub message: String,
    pub service_interest: Option<ServiceCategory>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeadEcho {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub company: Option<String>,
    pub message: String,
    pub service_interest: Option<ServiceCategory>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LeadAcknowledgement {
    pub message: String,
    pub data: LeadEcho,
}

#[derive(Debug, Serialize)]
pub struct AdminLeadRow {
    #[serde(flatten)]
    pub lead: Lead,
    pub status: &'static str,
    pub service_interest_display: &'static str,
}

impl From<Lead> for AdminLeadRow {
    fn from(lead: Lead) -> Self {
        AdminLeadRow {
            status: lead.status_label(),
            service_interest_display: lead.service_interest_display(),
            lead,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct LeadFilter {
    pub contacted: Option<bool>,
    pub service_interest: Option<ServiceCategory>,
    /// Case-insensitive search over name, email, company and message.
    pub search: Option<String>,
}

/// Admin listing query: `?contacted=&service_interest=&q=`.
#[derive(Debug, Default, Deserialize)]
pub struct AdminLeadQuery {
    pub contacted: Option<bool>,
    pub service_interest: Option<ServiceCategory>,
    pub q: Option<String>,
}

impl From<AdminLeadQuery> for LeadFilter {
    fn from(query: AdminLeadQuery) -> Self {
        LeadFilter {
            contacted: query.contacted,
            service_interest: query.service_interest,
            search: non_blank(query.q),
        }
    }
}

/// Follow-up edits. Submitted fields and `created_at` are never editable.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct UpdateLeadRequest {
    pub contacted: Option<bool>,

    #[validate(length(max = 10000))]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct BulkLeadRequest {
    #[validate(length(min = 1, max = MAX_BULK_IDS, message = "Select between 1 and 500 leads."))]
    pub ids: Vec<Uuid>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct BulkUpdateResponse {
    pub updated: u64,
    pub message: String,
}
