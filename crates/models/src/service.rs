use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::ModelError;

/// Fallback applied when a draft omits the duration field.
pub const DEFAULT_DURATION_MINUTES: u32 = 0;

/// Fixed set of categories a service can be offered under.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ServiceCategory {
    WebDevelopment,
    MobileDevelopment,
    Consulting,
    Maintenance,
    DataAnalysis,
    UxUiDesign,
}

impl ServiceCategory {
    pub const ALL: [Self; 6] = [
        Self::WebDevelopment,
        Self::MobileDevelopment,
        Self::Consulting,
        Self::Maintenance,
        Self::DataAnalysis,
        Self::UxUiDesign,
    ];

    /// Wire label, identical to the serde representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::WebDevelopment => "web-development",
            Self::MobileDevelopment => "mobile-development",
            Self::Consulting => "consulting",
            Self::Maintenance => "maintenance",
            Self::DataAnalysis => "data-analysis",
            Self::UxUiDesign => "ux-ui-design",
        }
    }

    /// Human-readable label for UI layers.
    pub fn label(&self) -> &'static str {
        match self {
            Self::WebDevelopment => "Web Development",
            Self::MobileDevelopment => "Mobile Development",
            Self::Consulting => "Consulting",
            Self::Maintenance => "Maintenance",
            Self::DataAnalysis => "Data Analysis",
            Self::UxUiDesign => "UX/UI Design",
        }
    }
}

impl std::str::FromStr for ServiceCategory {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| ModelError::Validation(format!("unknown category: {s}")))
    }
}

/// Lifecycle tag of a service offering.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ServiceStatus {
    #[default]
    Available,
    InProgress,
    Completed,
    Paused,
}

impl ServiceStatus {
    pub const ALL: [Self; 4] = [Self::Available, Self::InProgress, Self::Completed, Self::Paused];

    /// Wire label, identical to the serde representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Available => "available",
            Self::InProgress => "in-progress",
            Self::Completed => "completed",
            Self::Paused => "paused",
        }
    }

    /// Human-readable label for UI layers.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Available => "Available",
            Self::InProgress => "In Progress",
            Self::Completed => "Completed",
            Self::Paused => "Paused",
        }
    }

    /// The tag headline aggregates count as "active".
    pub fn is_active(&self) -> bool {
        matches!(self, Self::Available)
    }
}

impl std::str::FromStr for ServiceStatus {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|v| v.as_str() == s)
            .ok_or_else(|| ModelError::Validation(format!("unknown status: {s}")))
    }
}

/// Stored catalog record. `id` and `created_at` are assigned once and never
/// change afterwards; `updated_at` moves on every mutation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Service {
    pub id: i64,
    pub name: String,
    pub category: ServiceCategory,
    pub price: f64,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub duration_minutes: u32,
    pub status: ServiceStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Candidate payload for create/update: no id, no timestamps. Those are
/// assigned by the catalog store.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ServiceDraft {
    pub name: String,
    pub category: Option<ServiceCategory>,
    pub price: f64,
    #[serde(default)]
    pub description: String,
    pub duration_minutes: Option<u32>,
    pub status: Option<ServiceStatus>,
}

impl ServiceDraft {
    /// Check the required fields; drafts failing here must cause no state
    /// change anywhere downstream.
    pub fn validate(&self) -> Result<(), ModelError> {
        if self.name.trim().is_empty() {
            return Err(ModelError::Validation("name required".into()));
        }
        self.require_category()?;
        if !(self.price.is_finite() && self.price > 0.0) {
            return Err(ModelError::Validation("price must be a positive number".into()));
        }
        Ok(())
    }

    fn require_category(&self) -> Result<ServiceCategory, ModelError> {
        self.category
            .ok_or_else(|| ModelError::Validation("category required".into()))
    }
}

impl Service {
    /// Materialize a stored record from a validated draft.
    pub fn from_draft(id: i64, draft: ServiceDraft, now: DateTime<Utc>) -> Result<Self, ModelError> {
        draft.validate()?;
        let category = draft.require_category()?;
        Ok(Self {
            id,
            name: draft.name.trim().to_string(),
            category,
            price: draft.price,
            description: draft.description.trim().to_string(),
            duration_minutes: draft.duration_minutes.unwrap_or(DEFAULT_DURATION_MINUTES),
            status: draft.status.unwrap_or_default(),
            created_at: now,
            updated_at: now,
        })
    }

    /// Replace the mutable fields from a validated draft, preserving `id` and
    /// `created_at`. `updated_at` never moves backwards.
    pub fn apply_draft(&mut self, draft: ServiceDraft, now: DateTime<Utc>) -> Result<(), ModelError> {
        draft.validate()?;
        let category = draft.require_category()?;
        self.name = draft.name.trim().to_string();
        self.category = category;
        self.price = draft.price;
        self.description = draft.description.trim().to_string();
        self.duration_minutes = draft.duration_minutes.unwrap_or(DEFAULT_DURATION_MINUTES);
        self.status = draft.status.unwrap_or_default();
        self.updated_at = now.max(self.updated_at);
        Ok(())
    }
}
