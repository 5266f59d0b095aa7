//! Bakery (tenant) models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A bakery business registered on the platform
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bakery {
    pub id: Uuid,
    pub name: String,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub created_at: DateTime<Utc>,
}
