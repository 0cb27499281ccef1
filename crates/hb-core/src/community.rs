//! Community domain models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::geo::GeoPoint;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CommunityLocation {
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default)]
    pub address: String,
}

/// A community as served by the API.
///
/// The client receives full snapshots and only ever patches
/// `member_count` (server-confirmed) and `is_joined` (projected from the
/// joined-set) on an existing entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Community {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub member_count: u32,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub created_by: String,
    #[serde(default)]
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub location: CommunityLocation,
    /// Metres from the viewer, computed client-side.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub distance: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_joined: Option<bool>,
}

impl Community {
    pub fn point(&self) -> GeoPoint {
        GeoPoint::new(self.location.latitude, self.location.longitude)
    }
}

/// Payload for `POST /communities`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewCommunity {
    pub title: String,
    pub description: String,
    pub category: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

/// Listing filter for `GET /communities`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CommunityFilter {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
}

impl CommunityFilter {
    pub fn matches(&self, community: &Community) -> bool {
        if let Some(category) = &self.category {
            if &community.category != category {
                return false;
            }
        }

        match self.search.as_deref().map(str::to_lowercase) {
            Some(needle) if !needle.is_empty() => {
                community.title.to_lowercase().contains(&needle)
                    || community.description.to_lowercase().contains(&needle)
                    || community
                        .tags
                        .iter()
                        .any(|tag| tag.to_lowercase().contains(&needle))
            }
            _ => true,
        }
    }
}
