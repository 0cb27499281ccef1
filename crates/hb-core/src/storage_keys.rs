//! Keys under which values live in the persistent key-value store.

/// Raw bearer token (stored as a plain string, not JSON).
pub const AUTH_TOKEN: &str = "authToken";
/// Persisted session subset `{user, interests, isOnboarded}`.
pub const SESSION: &str = "user-storage";
pub const USER_PREFERENCES: &str = "user_preferences";
pub const ONBOARDING_COMPLETED: &str = "onboarding_completed";
pub const THEME_PREFERENCE: &str = "theme_preference";
pub const LOCATION_CACHE: &str = "location_cache";
pub const SEARCH_HISTORY: &str = "search_history";
pub const FAVORITE_COMMUNITIES: &str = "favorite_communities";
pub const NOTIFICATION_SETTINGS: &str = "notification_settings";
