//! User domain models and auth payloads.

use serde::{Deserialize, Serialize};

use crate::geo::GeoPoint;

/// Where a user says they are.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserLocation {
    pub latitude: f64,
    pub longitude: f64,
    /// Older payloads send `address` instead of `city`.
    #[serde(default, alias = "address")]
    pub city: String,
}

/// A user record as returned by the API.
///
/// Owned by the session store, which replaces it wholesale on
/// sign-in, sign-up and profile fetch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    #[serde(default)]
    pub interests: Vec<String>,
    #[serde(default)]
    pub joined_communities: Vec<String>,
    /// Server-sourced onboarding flag; absent means "unknown".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_onboarded: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<UserLocation>,
}

impl User {
    pub fn point(&self) -> Option<GeoPoint> {
        self.location
            .as_ref()
            .map(|l| GeoPoint::new(l.latitude, l.longitude))
    }
}

/// Typed partial update for `PATCH /users/me`.
///
/// Only `Some` fields are sent. The server may echo back a partial
/// record, so callers must not assume the response carries every field.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interests: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_onboarded: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<UserLocation>,
}

impl ProfileUpdate {
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }

    /// Merge the present fields into `user`, leaving the rest untouched.
    pub fn apply_to(&self, user: &mut User) {
        if let Some(name) = &self.name {
            user.name = name.clone();
        }
        if let Some(avatar) = &self.avatar {
            user.avatar = Some(avatar.clone());
        }
        if let Some(bio) = &self.bio {
            user.bio = Some(bio.clone());
        }
        if let Some(interests) = &self.interests {
            user.interests = interests.clone();
        }
        if let Some(is_onboarded) = self.is_onboarded {
            user.is_onboarded = Some(is_onboarded);
        }
        if let Some(location) = &self.location {
            user.location = Some(location.clone());
        }
    }
}

/// Sign-up form payload.
#[derive(Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignUpRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub interests: Vec<String>,
}

impl std::fmt::Debug for SignUpRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SignUpRequest")
            .field("name", &self.name)
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .field("interests", &self.interests)
            .finish()
    }
}

/// Response of sign-in and sign-up.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    pub user: User,
}

/// Response of `POST /auth/refresh`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenRefresh {
    pub token: String,
}

/// Response of `POST /users/avatar`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AvatarUpload {
    pub avatar_url: String,
}
