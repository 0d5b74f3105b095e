use serde::{Deserialize, Serialize};

use models::service::{Service, ServiceStatus};

/// Query options for narrowing the catalog; absent options always match.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct CatalogFilter {
    /// Exact status match.
    pub status: Option<ServiceStatus>,
    /// Case-insensitive substring match against the service name.
    pub search: Option<String>,
}

impl CatalogFilter {
    pub fn by_status(status: ServiceStatus) -> Self {
        Self { status: Some(status), ..Self::default() }
    }

    pub fn by_search(text: impl Into<String>) -> Self {
        Self { search: Some(text.into()), ..Self::default() }
    }

    /// Whether a record passes every configured predicate (ANDed).
    pub fn matches(&self, service: &Service) -> bool {
        if let Some(status) = self.status {
            if service.status != status {
                return false;
            }
        }
        if let Some(text) = &self.search {
            let needle = text.trim().to_lowercase();
            if !needle.is_empty() && !service.name.to_lowercase().contains(&needle) {
                return false;
            }
        }
        true
    }
}
