//! Device-local preferences and small caches.
//!
//! Each value lives under its own key and falls back to its default when
//! absent or unreadable. None of this is tied to the signed-in user.

use std::sync::Arc;

use tracing::debug;

use hb_core::ports::{ClockPort, StorageError};
use hb_core::preferences::{
    CachedLocation, NotificationPreferences, PreferencesUpdate, Theme, UserPreferences,
    SEARCH_HISTORY_LIMIT,
};
use hb_core::storage_keys::{
    FAVORITE_COMMUNITIES, LOCATION_CACHE, NOTIFICATION_SETTINGS, ONBOARDING_COMPLETED,
    SEARCH_HISTORY, THEME_PREFERENCE, USER_PREFERENCES,
};
use hb_core::GeoPoint;

use crate::kv_store::PersistentStore;

#[derive(Clone)]
pub struct PreferencesService {
    storage: PersistentStore,
    clock: Arc<dyn ClockPort>,
}

impl PreferencesService {
    pub fn new(storage: PersistentStore, clock: Arc<dyn ClockPort>) -> Self {
        Self { storage, clock }
    }

    pub async fn user_preferences(&self) -> Result<UserPreferences, StorageError> {
        self.storage
            .get_or(USER_PREFERENCES, UserPreferences::default())
            .await
    }

    /// Merge `update` over the stored preferences and save the result.
    pub async fn update_preferences(
        &self,
        update: PreferencesUpdate,
    ) -> Result<UserPreferences, StorageError> {
        let merged = self.user_preferences().await?.merged(update);
        self.storage.set(USER_PREFERENCES, &merged).await?;
        Ok(merged)
    }

    pub async fn is_onboarding_completed(&self) -> Result<bool, StorageError> {
        self.storage.get_or(ONBOARDING_COMPLETED, false).await
    }

    pub async fn set_onboarding_completed(&self, completed: bool) -> Result<(), StorageError> {
        self.storage.set(ONBOARDING_COMPLETED, &completed).await
    }

    pub async fn theme(&self) -> Result<Theme, StorageError> {
        self.storage.get_or(THEME_PREFERENCE, Theme::default()).await
    }

    pub async fn set_theme(&self, theme: Theme) -> Result<(), StorageError> {
        self.storage.set(THEME_PREFERENCE, &theme).await
    }

    pub async fn notification_settings(&self) -> Result<NotificationPreferences, StorageError> {
        self.storage
            .get_or(NOTIFICATION_SETTINGS, NotificationPreferences::default())
            .await
    }

    pub async fn set_notification_settings(
        &self,
        settings: &NotificationPreferences,
    ) -> Result<(), StorageError> {
        self.storage.set(NOTIFICATION_SETTINGS, settings).await
    }

    pub async fn cache_location(&self, point: GeoPoint) -> Result<(), StorageError> {
        let cached = CachedLocation {
            latitude: point.latitude,
            longitude: point.longitude,
            timestamp: self.clock.now_ms(),
        };
        self.storage.set(LOCATION_CACHE, &cached).await
    }

    /// The cached location, if it is less than an hour old.
    pub async fn cached_location(&self) -> Result<Option<GeoPoint>, StorageError> {
        let cached: Option<CachedLocation> = self.storage.get(LOCATION_CACHE).await?;
        let now_ms = self.clock.now_ms();
        Ok(cached
            .filter(|c| c.is_fresh(now_ms))
            .map(|c| GeoPoint::new(c.latitude, c.longitude)))
    }

    /// Most recent first.
    pub async fn search_history(&self) -> Result<Vec<String>, StorageError> {
        self.storage.get_or(SEARCH_HISTORY, Vec::new()).await
    }

    /// Record a query at the front, dropping an earlier copy and anything
    /// past the history limit. Blank queries are ignored.
    pub async fn add_search_query(&self, query: &str) -> Result<Vec<String>, StorageError> {
        let query = query.trim();
        let mut history = self.search_history().await?;
        if query.is_empty() {
            return Ok(history);
        }
        history.retain(|q| q != query);
        history.insert(0, query.to_string());
        history.truncate(SEARCH_HISTORY_LIMIT);
        self.storage.set(SEARCH_HISTORY, &history).await?;
        Ok(history)
    }

    pub async fn clear_search_history(&self) -> Result<(), StorageError> {
        self.storage.remove(SEARCH_HISTORY).await
    }

    pub async fn favorite_communities(&self) -> Result<Vec<String>, StorageError> {
        self.storage.get_or(FAVORITE_COMMUNITIES, Vec::new()).await
    }

    /// Returns false when the community was already a favourite.
    pub async fn add_favorite(&self, community_id: &str) -> Result<bool, StorageError> {
        let mut favorites = self.favorite_communities().await?;
        if favorites.iter().any(|id| id == community_id) {
            return Ok(false);
        }
        favorites.push(community_id.to_string());
        self.storage.set(FAVORITE_COMMUNITIES, &favorites).await?;
        Ok(true)
    }

    /// Returns false when the community was not a favourite.
    pub async fn remove_favorite(&self, community_id: &str) -> Result<bool, StorageError> {
        let mut favorites = self.favorite_communities().await?;
        let before = favorites.len();
        favorites.retain(|id| id != community_id);
        if favorites.len() == before {
            return Ok(false);
        }
        self.storage.set(FAVORITE_COMMUNITIES, &favorites).await?;
        Ok(true)
    }

    pub async fn is_favorite(&self, community_id: &str) -> Result<bool, StorageError> {
        Ok(self
            .favorite_communities()
            .await?
            .iter()
            .any(|id| id == community_id))
    }

    pub async fn storage_keys(&self) -> Result<Vec<String>, StorageError> {
        self.storage.keys().await
    }

    pub async fn storage_size(&self) -> Result<usize, StorageError> {
        let size = self.storage.size().await?;
        debug!(bytes = size, "storage size computed");
        Ok(size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{memory_kv, ManualClock};
    use hb_core::preferences::{SearchPreferences, LOCATION_CACHE_TTL_MS};

    fn service() -> (PreferencesService, Arc<ManualClock>) {
        let clock = Arc::new(ManualClock::new(1_000_000));
        let service = PreferencesService::new(PersistentStore::new(memory_kv()), clock.clone());
        (service, clock)
    }

    #[tokio::test]
    async fn preferences_default_then_merge_sections() {
        let (prefs, _) = service();
        assert_eq!(prefs.user_preferences().await.unwrap(), UserPreferences::default());

        let updated = prefs
            .update_preferences(PreferencesUpdate {
                theme: Some(Theme::Dark),
                search: Some(SearchPreferences {
                    radius: 25,
                    auto_location: false,
                }),
                ..Default::default()
            })
            .await
            .unwrap();

        assert_eq!(prefs.user_preferences().await.unwrap(), updated);
        assert_eq!(updated.theme, Theme::Dark);
        assert_eq!(updated.search.radius, 25);
        assert_eq!(updated.notifications, NotificationPreferences::default());
    }

    #[tokio::test]
    async fn flags_and_theme_round_trip() {
        let (prefs, _) = service();

        assert!(!prefs.is_onboarding_completed().await.unwrap());
        assert_eq!(prefs.theme().await.unwrap(), Theme::System);

        prefs.set_onboarding_completed(true).await.unwrap();
        prefs.set_theme(Theme::Light).await.unwrap();

        assert!(prefs.is_onboarding_completed().await.unwrap());
        assert_eq!(prefs.theme().await.unwrap(), Theme::Light);
    }

    #[tokio::test]
    async fn location_cache_expires_after_an_hour() {
        let (prefs, clock) = service();
        prefs
            .cache_location(GeoPoint::new(34.05, -118.24))
            .await
            .unwrap();

        clock.advance(LOCATION_CACHE_TTL_MS - 1);
        assert_eq!(
            prefs.cached_location().await.unwrap(),
            Some(GeoPoint::new(34.05, -118.24))
        );

        clock.advance(1);
        assert_eq!(prefs.cached_location().await.unwrap(), None);
    }

    #[tokio::test]
    async fn search_history_is_recent_first_deduplicated_and_capped() {
        let (prefs, _) = service();

        for i in 0..12 {
            prefs.add_search_query(&format!("q{i}")).await.unwrap();
        }
        let history = prefs.add_search_query(" q5 ").await.unwrap();
        prefs.add_search_query("   ").await.unwrap();

        assert_eq!(history.len(), SEARCH_HISTORY_LIMIT);
        assert_eq!(history[0], "q5");
        assert_eq!(history[1], "q11");
        assert_eq!(history.iter().filter(|q| *q == "q5").count(), 1);
        assert_eq!(prefs.search_history().await.unwrap(), history);

        prefs.clear_search_history().await.unwrap();
        assert!(prefs.search_history().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn favorites_add_is_idempotent() {
        let (prefs, _) = service();

        assert!(prefs.add_favorite("1").await.unwrap());
        assert!(!prefs.add_favorite("1").await.unwrap());
        assert!(prefs.add_favorite("2").await.unwrap());
        assert!(prefs.is_favorite("1").await.unwrap());

        assert!(prefs.remove_favorite("1").await.unwrap());
        assert!(!prefs.remove_favorite("1").await.unwrap());
        assert_eq!(prefs.favorite_communities().await.unwrap(), vec!["2"]);
    }

    #[tokio::test]
    async fn keys_and_size_cover_stored_values() {
        let (prefs, _) = service();
        prefs.set_onboarding_completed(true).await.unwrap();
        prefs.set_theme(Theme::Dark).await.unwrap();

        let mut keys = prefs.storage_keys().await.unwrap();
        keys.sort();

        assert_eq!(keys, vec![ONBOARDING_COMPLETED, THEME_PREFERENCE]);
        // "true" + "\"dark\""
        assert_eq!(prefs.storage_size().await.unwrap(), 10);
    }
}
