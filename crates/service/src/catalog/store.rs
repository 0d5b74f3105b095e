use std::sync::Arc;

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tracing::{debug, info, instrument};

use models::client::Client;
use models::service::{Service, ServiceCategory, ServiceDraft, ServiceStatus};

use crate::catalog::api::Catalog;
use crate::catalog::filter::CatalogFilter;
use crate::errors::ServiceError;
use crate::ids;
use crate::storage::kv::KeyValueStore;

/// Storage key holding the serialized service collection.
pub const SERVICES_KEY: &str = "service_catalog.services";
/// Storage key holding the serialized client collection.
pub const CLIENTS_KEY: &str = "service_catalog.clients";

/// Headline aggregates for dashboard tiles.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct CatalogStats {
    pub count: usize,
    pub active_count: usize,
    pub total_value: f64,
}

struct CatalogState {
    services: Vec<Service>,
    clients: Vec<Client>,
    editing: Option<i64>,
}

/// Catalog store owning the service records and mirroring every mutation to
/// the key-value backend. Construct one per session and hand it to the UI
/// layer; there is no ambient instance.
pub struct CatalogStore {
    state: RwLock<CatalogState>,
    kv: Arc<dyn KeyValueStore>,
}

impl CatalogStore {
    /// Open the catalog, restoring both collections from storage. A missing
    /// or blank services key seeds the fixed default set.
    pub async fn open(kv: Arc<dyn KeyValueStore>) -> Result<Arc<Self>, ServiceError> {
        let store = Arc::new(Self {
            state: RwLock::new(CatalogState { services: Vec::new(), clients: Vec::new(), editing: None }),
            kv,
        });
        store.restore().await?;
        Ok(store)
    }

    /// Reload both collections from storage, replacing in-memory state and
    /// dropping any in-flight edit.
    pub async fn restore(&self) -> Result<(), ServiceError> {
        let services = match self.kv.get(SERVICES_KEY).await? {
            Some(text) if !text.trim().is_empty() => {
                serde_json::from_str(&text).map_err(|e| ServiceError::Storage(e.to_string()))?
            }
            _ => {
                let seeded = seed_services();
                info!(count = seeded.len(), "seeded_default_catalog");
                seeded
            }
        };
        let clients = match self.kv.get(CLIENTS_KEY).await? {
            Some(text) if !text.trim().is_empty() => {
                serde_json::from_str(&text).map_err(|e| ServiceError::Storage(e.to_string()))?
            }
            _ => Vec::new(),
        };

        let mut state = self.state.write().await;
        state.services = services;
        state.clients = clients;
        state.editing = None;
        Ok(())
    }

    /// Serialize and write both collections under their fixed keys. In-memory
    /// state stays authoritative when the write fails.
    pub async fn persist(&self) -> Result<(), ServiceError> {
        let (services, clients) = {
            let state = self.state.read().await;
            (
                serde_json::to_string(&state.services).map_err(|e| ServiceError::Storage(e.to_string()))?,
                serde_json::to_string(&state.clients).map_err(|e| ServiceError::Storage(e.to_string()))?,
            )
        };
        self.kv.set(SERVICES_KEY, &services).await?;
        self.kv.set(CLIENTS_KEY, &clients).await?;
        Ok(())
    }

    /// Create a record from a draft and persist the full catalog.
    #[instrument(skip(self, draft))]
    pub async fn create(&self, draft: ServiceDraft) -> Result<Service, ServiceError> {
        let now = Utc::now();
        let mut state = self.state.write().await;
        let id = ids::next_id(state.services.iter().map(|s| s.id).max());
        let service = Service::from_draft(id, draft, now)?;
        state.services.push(service.clone());
        drop(state);
        self.persist().await?;
        info!(id = service.id, name = %service.name, "service_created");
        Ok(service)
    }

    /// Replace an existing record's mutable fields in place and persist.
    /// Clears the editing reference on success.
    #[instrument(skip(self, draft))]
    pub async fn update(&self, id: i64, draft: ServiceDraft) -> Result<Service, ServiceError> {
        let now = Utc::now();
        let mut state = self.state.write().await;
        let Some(existing) = state.services.iter_mut().find(|s| s.id == id) else {
            return Err(ServiceError::not_found("service"));
        };
        existing.apply_draft(draft, now)?;
        let updated = existing.clone();
        state.editing = None;
        drop(state);
        self.persist().await?;
        info!(id = updated.id, "service_updated");
        Ok(updated)
    }

    /// Remove a record. A missing id is a silent no-op reported as `false`.
    /// Confirmation is the caller's concern; there is no undo.
    #[instrument(skip(self))]
    pub async fn delete(&self, id: i64) -> Result<bool, ServiceError> {
        let mut state = self.state.write().await;
        let before = state.services.len();
        state.services.retain(|s| s.id != id);
        if state.services.len() == before {
            debug!(id, "delete_ignored_missing_service");
            return Ok(false);
        }
        if state.editing == Some(id) {
            state.editing = None;
        }
        drop(state);
        self.persist().await?;
        info!(id, "service_deleted");
        Ok(true)
    }

    /// Mark a record as the edit target and return a copy for form
    /// population. Does not mutate the record.
    pub async fn begin_edit(&self, id: i64) -> Result<Service, ServiceError> {
        let mut state = self.state.write().await;
        let Some(service) = state.services.iter().find(|s| s.id == id).cloned() else {
            return Err(ServiceError::not_found("service"));
        };
        state.editing = Some(id);
        Ok(service)
    }

    /// Drop the editing reference without side effects.
    pub async fn cancel_edit(&self) {
        let mut state = self.state.write().await;
        state.editing = None;
    }

    /// Id of the record currently being edited, if any.
    pub async fn editing_id(&self) -> Option<i64> {
        self.state.read().await.editing
    }

    /// Full snapshot in insertion order.
    pub async fn list(&self) -> Vec<Service> {
        self.state.read().await.services.clone()
    }

    /// Snapshot of records passing the query, in insertion order.
    pub async fn filter(&self, query: &CatalogFilter) -> Vec<Service> {
        let state = self.state.read().await;
        state.services.iter().filter(|s| query.matches(s)).cloned().collect()
    }

    /// Headline numbers over the whole catalog.
    pub async fn stats(&self) -> CatalogStats {
        let state = self.state.read().await;
        CatalogStats {
            count: state.services.len(),
            active_count: state.services.iter().filter(|s| s.status.is_active()).count(),
            total_value: state.services.iter().map(|s| s.price).sum(),
        }
    }

    /// Full order-preserving JSON snapshot of the catalog, for download.
    pub async fn export_snapshot(&self) -> Result<String, ServiceError> {
        let state = self.state.read().await;
        serde_json::to_string_pretty(&state.services).map_err(|e| ServiceError::Storage(e.to_string()))
    }

    /// Snapshot of the secondary client collection.
    pub async fn clients(&self) -> Vec<Client> {
        self.state.read().await.clients.clone()
    }

    /// Replace the client collection wholesale and persist.
    pub async fn replace_clients(&self, clients: Vec<Client>) -> Result<(), ServiceError> {
        let mut state = self.state.write().await;
        state.clients = clients;
        drop(state);
        self.persist().await
    }
}

#[async_trait]
impl Catalog for CatalogStore {
    async fn list(&self) -> Vec<Service> {
        self.list().await
    }
    async fn filter(&self, query: &CatalogFilter) -> Vec<Service> {
        self.filter(query).await
    }
    async fn create(&self, draft: ServiceDraft) -> Result<Service, ServiceError> {
        self.create(draft).await
    }
    async fn update(&self, id: i64, draft: ServiceDraft) -> Result<Service, ServiceError> {
        self.update(id, draft).await
    }
    async fn delete(&self, id: i64) -> Result<bool, ServiceError> {
        self.delete(id).await
    }
    async fn begin_edit(&self, id: i64) -> Result<Service, ServiceError> {
        self.begin_edit(id).await
    }
    async fn cancel_edit(&self) {
        self.cancel_edit().await
    }
    async fn editing_id(&self) -> Option<i64> {
        self.editing_id().await
    }
    async fn stats(&self) -> CatalogStats {
        self.stats().await
    }
    async fn export_snapshot(&self) -> Result<String, ServiceError> {
        self.export_snapshot().await
    }
    async fn clients(&self) -> Vec<Client> {
        self.clients().await
    }
}

/// Download artifact name for a snapshot taken on `date`.
pub fn export_file_name(date: NaiveDate) -> String {
    format!("service-catalog-{}.json", date.format("%Y-%m-%d"))
}

/// Fixed starter records applied when storage holds no catalog yet.
fn seed_services() -> Vec<Service> {
    let now = Utc::now();
    let entries = [
        ("Website Audit", ServiceCategory::Consulting, 500.0, "Technical and UX review of an existing site", 120, ServiceStatus::Available),
        ("Corporate Website", ServiceCategory::WebDevelopment, 2400.0, "Design and build of a marketing site", 2400, ServiceStatus::Available),
        ("Monthly Maintenance", ServiceCategory::Maintenance, 150.0, "Updates, backups and uptime monitoring", 240, ServiceStatus::InProgress),
    ];
    entries
        .into_iter()
        .enumerate()
        .map(|(i, (name, category, price, description, duration_minutes, status))| Service {
            id: i as i64 + 1,
            name: name.into(),
            category,
            price,
            description: description.into(),
            duration_minutes,
            status,
            created_at: now,
            updated_at: now,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::kv::MemoryKvStore;

    fn draft(name: &str, price: f64) -> ServiceDraft {
        ServiceDraft {
            name: name.into(),
            category: Some(ServiceCategory::Consulting),
            price,
            description: String::new(),
            duration_minutes: None,
            status: None,
        }
    }

    async fn empty_store() -> (Arc<MemoryKvStore>, Arc<CatalogStore>) {
        let kv = MemoryKvStore::new();
        kv.set(SERVICES_KEY, "[]").await.expect("prime storage");
        let store = CatalogStore::open(kv.clone()).await.expect("open");
        (kv, store)
    }

    #[tokio::test]
    async fn create_appends_with_fresh_id_and_persists() -> Result<(), anyhow::Error> {
        let (kv, store) = empty_store().await;

        let a = store.create(draft("Site Audit", 500.0)).await?;
        let b = store.create(draft("SEO Sprint", 300.0)).await?;
        assert_ne!(a.id, b.id);
        assert_eq!(store.list().await.len(), 2);
        assert_eq!(a.status, ServiceStatus::Available);
        assert_eq!(a.created_at, a.updated_at);

        // the full catalog is mirrored to storage
        let reopened = CatalogStore::open(kv).await?;
        let names: Vec<String> = reopened.list().await.into_iter().map(|s| s.name).collect();
        assert_eq!(names, vec!["Site Audit".to_string(), "SEO Sprint".to_string()]);
        Ok(())
    }

    #[tokio::test]
    async fn invalid_drafts_leave_the_catalog_untouched() -> Result<(), anyhow::Error> {
        let (_kv, store) = empty_store().await;

        let blank_name = ServiceDraft { name: "  ".into(), ..draft("x", 10.0) };
        assert!(matches!(store.create(blank_name).await, Err(ServiceError::Validation(_))));

        let no_category = ServiceDraft { category: None, ..draft("x", 10.0) };
        assert!(matches!(store.create(no_category).await, Err(ServiceError::Validation(_))));

        let bad_price = draft("x", 0.0);
        assert!(matches!(store.create(bad_price).await, Err(ServiceError::Validation(_))));

        assert_eq!(store.stats().await.count, 0);
        Ok(())
    }

    #[tokio::test]
    async fn update_preserves_identity_and_clears_editing() -> Result<(), anyhow::Error> {
        let (_kv, store) = empty_store().await;
        let created = store.create(draft("Site Audit", 500.0)).await?;

        store.begin_edit(created.id).await?;
        assert_eq!(store.editing_id().await, Some(created.id));

        let mut change = draft("Full Audit", 750.0);
        change.status = Some(ServiceStatus::Completed);
        let updated = store.update(created.id, change).await?;

        assert_eq!(updated.id, created.id);
        assert_eq!(updated.created_at, created.created_at);
        assert!(updated.updated_at >= created.updated_at);
        assert_eq!(updated.name, "Full Audit");
        assert_eq!(store.editing_id().await, None);
        assert_eq!(store.list().await.len(), 1);
        Ok(())
    }

    #[tokio::test]
    async fn update_unknown_id_is_not_found() -> Result<(), anyhow::Error> {
        let (_kv, store) = empty_store().await;
        let res = store.update(42, draft("x", 10.0)).await;
        assert!(matches!(res, Err(ServiceError::NotFound(_))));
        Ok(())
    }

    #[tokio::test]
    async fn failed_update_keeps_record_and_editing_intact() -> Result<(), anyhow::Error> {
        let (_kv, store) = empty_store().await;
        let created = store.create(draft("Site Audit", 500.0)).await?;
        store.begin_edit(created.id).await?;

        let res = store.update(created.id, draft("", 10.0)).await;
        assert!(matches!(res, Err(ServiceError::Validation(_))));
        assert_eq!(store.list().await, vec![created.clone()]);
        assert_eq!(store.editing_id().await, Some(created.id));
        Ok(())
    }

    #[tokio::test]
    async fn delete_is_silent_on_missing_and_clears_edit_target() -> Result<(), anyhow::Error> {
        let (_kv, store) = empty_store().await;
        assert!(!store.delete(99).await?);

        let created = store.create(draft("Site Audit", 500.0)).await?;
        store.begin_edit(created.id).await?;
        assert!(store.delete(created.id).await?);
        assert_eq!(store.editing_id().await, None);

        // deleted records can no longer be edit targets
        assert!(matches!(store.begin_edit(created.id).await, Err(ServiceError::NotFound(_))));
        Ok(())
    }

    #[tokio::test]
    async fn cancel_edit_has_no_other_effect() -> Result<(), anyhow::Error> {
        let (_kv, store) = empty_store().await;
        let created = store.create(draft("Site Audit", 500.0)).await?;
        let before = store.list().await;

        store.begin_edit(created.id).await?;
        store.cancel_edit().await;
        assert_eq!(store.editing_id().await, None);
        assert_eq!(store.list().await, before);
        Ok(())
    }

    #[tokio::test]
    async fn filter_keeps_insertion_order_and_is_idempotent() -> Result<(), anyhow::Error> {
        let (_kv, store) = empty_store().await;
        let a = store.create(draft("Site Audit", 500.0)).await?;
        let mut completed = draft("Data Migration", 900.0);
        completed.status = Some(ServiceStatus::Completed);
        let b = store.create(completed).await?;
        let c = store.create(draft("Audit Follow-up", 200.0)).await?;

        let by_status = store.filter(&CatalogFilter::by_status(ServiceStatus::Completed)).await;
        assert_eq!(by_status.iter().map(|s| s.id).collect::<Vec<_>>(), vec![b.id]);

        let by_search = store.filter(&CatalogFilter::by_search("audit")).await;
        assert_eq!(by_search.iter().map(|s| s.id).collect::<Vec<_>>(), vec![a.id, c.id]);

        let again = store.filter(&CatalogFilter::by_search("audit")).await;
        assert_eq!(by_search, again);
        Ok(())
    }

    #[tokio::test]
    async fn stats_count_active_and_total_value() -> Result<(), anyhow::Error> {
        let (_kv, store) = empty_store().await;
        assert_eq!(store.stats().await, CatalogStats { count: 0, active_count: 0, total_value: 0.0 });

        store.create(draft("Site Audit", 100.0)).await?;
        let mut paused = draft("Retainer", 250.0);
        paused.status = Some(ServiceStatus::Paused);
        store.create(paused).await?;

        let stats = store.stats().await;
        assert_eq!(stats.count, 2);
        assert_eq!(stats.active_count, 1);
        assert_eq!(stats.total_value, 350.0);
        Ok(())
    }

    #[tokio::test]
    async fn export_snapshot_parses_back_in_order() -> Result<(), anyhow::Error> {
        let (_kv, store) = empty_store().await;
        store.create(draft("Site Audit", 500.0)).await?;
        store.create(draft("SEO Sprint", 300.0)).await?;

        let text = store.export_snapshot().await?;
        let parsed: Vec<Service> = serde_json::from_str(&text)?;
        assert_eq!(parsed, store.list().await);
        Ok(())
    }

    #[tokio::test]
    async fn restore_round_trips_records_and_order() -> Result<(), anyhow::Error> {
        let (_kv, store) = empty_store().await;
        store.create(draft("Site Audit", 500.0)).await?;
        store.create(draft("SEO Sprint", 300.0)).await?;
        let before = store.list().await;

        store.persist().await?;
        store.restore().await?;
        assert_eq!(store.list().await, before);
        Ok(())
    }

    #[tokio::test]
    async fn blank_storage_seeds_defaults_but_empty_catalog_stays_empty() -> Result<(), anyhow::Error> {
        let kv = MemoryKvStore::new();
        let seeded = CatalogStore::open(kv).await?;
        assert!(!seeded.list().await.is_empty());

        let (_kv, empty) = empty_store().await;
        assert!(empty.list().await.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn clients_are_loaded_and_saved_separately() -> Result<(), anyhow::Error> {
        let (kv, store) = empty_store().await;
        assert!(store.clients().await.is_empty());

        let client = Client { id: 1, name: "Acme".into(), email: "ops@acme.test".into(), created_at: Utc::now() };
        store.replace_clients(vec![client.clone()]).await?;

        let reopened = CatalogStore::open(kv).await?;
        assert_eq!(reopened.clients().await, vec![client]);
        Ok(())
    }

    #[test]
    fn export_file_name_carries_the_date() {
        let date = NaiveDate::from_ymd_opt(2026, 8, 6).expect("valid date");
        assert_eq!(export_file_name(date), "service-catalog-2026-08-06.json");
    }
}
