use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Index record for one stored resume. Kept in a list separate from the
/// documents themselves so profiles can be listed without loading them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileMeta {
    pub id: Uuid,
    pub name: String,
    /// Target role this resume variant is tailored for.
    #[serde(default)]
    pub role: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ProfileMeta {
    pub fn new(name: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            role: String::new(),
            created_at: now,
            updated_at: now,
        }
    }
}

/// Picks the profile to open: the requested one if it exists, otherwise the
/// most recently updated one.
pub fn select_profile(profiles: &[ProfileMeta], requested: Option<Uuid>) -> Option<ProfileMeta> {
    if let Some(id) = requested {
        if let Some(p) = profiles.iter().find(|p| p.id == id) {
            return Some(p.clone());
        }
    }
    profiles.iter().max_by_key(|p| p.updated_at).cloned()
}
