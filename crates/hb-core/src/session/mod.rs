//! Session domain models
//!
//! The session is the device's authenticated-user context plus its
//! onboarding state. Only [`SessionSnapshot`] survives a process restart;
//! the loading flags in [`SessionState`] are always recomputed.

use serde::{Deserialize, Serialize};

use crate::user::User;

/// The persisted subset of the session.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSnapshot {
    #[serde(default)]
    pub user: Option<User>,
    #[serde(default)]
    pub interests: Vec<String>,
    #[serde(default)]
    pub is_onboarded: bool,
}

/// Lifecycle phase derived from the session state.
///
/// `Unknown` until the first rehydration check finishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    Unknown,
    Anonymous,
    AuthenticatedNotOnboarded,
    AuthenticatedOnboarded,
}

/// Full in-memory session state.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionState {
    pub user: Option<User>,
    pub interests: Vec<String>,
    pub is_onboarded: bool,
    /// True only while rehydration is in flight.
    pub is_loading: bool,
    /// Set once a rehydration check has completed in this process.
    pub checked: bool,
}

impl SessionState {
    pub fn from_snapshot(snapshot: SessionSnapshot) -> Self {
        Self {
            user: snapshot.user,
            interests: snapshot.interests,
            is_onboarded: snapshot.is_onboarded,
            is_loading: false,
            checked: false,
        }
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            user: self.user.clone(),
            interests: self.interests.clone(),
            is_onboarded: self.is_onboarded,
        }
    }

    pub fn phase(&self) -> SessionPhase {
        if self.is_loading || !self.checked {
            return SessionPhase::Unknown;
        }
        match (&self.user, self.is_onboarded) {
            (None, _) => SessionPhase::Anonymous,
            (Some(_), false) => SessionPhase::AuthenticatedNotOnboarded,
            (Some(_), true) => SessionPhase::AuthenticatedOnboarded,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }

    /// Interests, but only once onboarding is complete.
    ///
    /// Before that the list is a work in progress and must not be read as
    /// the user's choice.
    pub fn confirmed_interests(&self) -> Option<&[String]> {
        self.is_onboarded.then_some(self.interests.as_slice())
    }
}

/// Add `label` if absent, remove it if present. Order of the rest is kept.
pub fn toggle_membership(list: &mut Vec<String>, label: &str) -> bool {
    if let Some(pos) = list.iter().position(|existing| existing == label) {
        list.remove(pos);
        false
    } else {
        list.push(label.to_string());
        true
    }
}
