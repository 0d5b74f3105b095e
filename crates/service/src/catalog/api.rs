use async_trait::async_trait;

use models::client::Client;
use models::service::{Service, ServiceDraft};

use crate::catalog::filter::CatalogFilter;
use crate::catalog::store::CatalogStats;
use crate::errors::ServiceError;

/// Trait abstraction over the catalog store for UI collaborators.
///
/// Presentation layers depend on this seam rather than the concrete store,
/// and consume it purely through method calls.
#[async_trait]
pub trait Catalog: Send + Sync {
    async fn list(&self) -> Vec<Service>;
    async fn filter(&self, query: &CatalogFilter) -> Vec<Service>;
    async fn create(&self, draft: ServiceDraft) -> Result<Service, ServiceError>;
    async fn update(&self, id: i64, draft: ServiceDraft) -> Result<Service, ServiceError>;
    async fn delete(&self, id: i64) -> Result<bool, ServiceError>;
    async fn begin_edit(&self, id: i64) -> Result<Service, ServiceError>;
    async fn cancel_edit(&self);
    async fn editing_id(&self) -> Option<i64>;
    async fn stats(&self) -> CatalogStats;
    async fn export_snapshot(&self) -> Result<String, ServiceError>;
    async fn clients(&self) -> Vec<Client>;
}
