//! Device-local user preferences.

use serde::{Deserialize, Serialize};

/// A cached location is trusted for one hour.
pub const LOCATION_CACHE_TTL_MS: i64 = 3_600_000;

/// Search history keeps this many most-recent queries.
pub const SEARCH_HISTORY_LIMIT: usize = 10;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Theme {
    Light,
    Dark,
    #[default]
    System,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationPreferences {
    pub push: bool,
    pub email: bool,
    pub community_updates: bool,
    pub nearby_users: bool,
    pub event_reminders: bool,
}

impl Default for NotificationPreferences {
    fn default() -> Self {
        Self {
            push: true,
            email: true,
            community_updates: true,
            nearby_users: true,
            event_reminders: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrivacyPreferences {
    pub show_location: bool,
    pub show_online_status: bool,
    pub allow_messages: bool,
}

impl Default for PrivacyPreferences {
    fn default() -> Self {
        Self {
            show_location: true,
            show_online_status: true,
            allow_messages: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchPreferences {
    /// Kilometres.
    pub radius: u32,
    pub auto_location: bool,
}

impl Default for SearchPreferences {
    fn default() -> Self {
        Self {
            radius: 10,
            auto_location: true,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserPreferences {
    #[serde(default)]
    pub theme: Theme,
    #[serde(default)]
    pub notifications: NotificationPreferences,
    #[serde(default)]
    pub privacy: PrivacyPreferences,
    #[serde(default)]
    pub search: SearchPreferences,
}

/// Section-level partial update: a present section replaces the stored one.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PreferencesUpdate {
    pub theme: Option<Theme>,
    pub notifications: Option<NotificationPreferences>,
    pub privacy: Option<PrivacyPreferences>,
    pub search: Option<SearchPreferences>,
}

impl UserPreferences {
    pub fn merged(mut self, update: PreferencesUpdate) -> Self {
        if let Some(theme) = update.theme {
            self.theme = theme;
        }
        if let Some(notifications) = update.notifications {
            self.notifications = notifications;
        }
        if let Some(privacy) = update.privacy {
            self.privacy = privacy;
        }
        if let Some(search) = update.search {
            self.search = search;
        }
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CachedLocation {
    pub latitude: f64,
    pub longitude: f64,
    /// Unix milliseconds at which the location was cached.
    pub timestamp: i64,
}

impl CachedLocation {
    pub fn is_fresh(&self, now_ms: i64) -> bool {
        now_ms - self.timestamp < LOCATION_CACHE_TTL_MS
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_first_run_values() {
        let prefs = UserPreferences::default();
        assert_eq!(prefs.theme, Theme::System);
        assert!(prefs.notifications.push);
        assert!(prefs.privacy.allow_messages);
        assert_eq!(prefs.search.radius, 10);
    }

    #[test]
    fn partial_stored_preferences_fill_in_defaults() {
        let prefs: UserPreferences = serde_json::from_str(r#"{"theme":"dark"}"#).unwrap();
        assert_eq!(prefs.theme, Theme::Dark);
        assert_eq!(prefs.search, SearchPreferences::default());
    }

    #[test]
    fn merged_replaces_only_present_sections() {
        let update = PreferencesUpdate {
            search: Some(SearchPreferences {
                radius: 25,
                auto_location: false,
            }),
            ..Default::default()
        };

        let prefs = UserPreferences::default().merged(update);

        assert_eq!(prefs.search.radius, 25);
        assert_eq!(prefs.theme, Theme::System);
        assert_eq!(prefs.notifications, NotificationPreferences::default());
    }

    #[test]
    fn cached_location_expires_after_an_hour() {
        let cached = CachedLocation {
            latitude: 1.0,
            longitude: 2.0,
            timestamp: 1_000,
        };
        assert!(cached.is_fresh(1_000 + LOCATION_CACHE_TTL_MS - 1));
        assert!(!cached.is_fresh(1_000 + LOCATION_CACHE_TTL_MS));
    }
}
