use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Client contact kept alongside the catalog under its own storage key.
/// The core only loads and saves this collection.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Client {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub email: String,
    pub created_at: DateTime<Utc>,
}
