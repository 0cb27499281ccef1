//! Session store
//!
//! Holds the signed-in user, the interest list and the onboarding flag.
//! Mutations are synchronous and only mark the session dirty; the persisted
//! subset reaches storage when a caller awaits [`SessionStore::flush`].

use std::sync::atomic::{AtomicBool, Ordering};

use tokio::sync::watch;
use tracing::{debug, error, info, warn};

use hb_core::ports::{HobbyApiPort, StorageError};
use hb_core::session::toggle_membership;
use hb_core::storage_keys::{AUTH_TOKEN, SESSION};
use hb_core::{SessionPhase, SessionSnapshot, SessionState, User};

use crate::kv_store::PersistentStore;

pub struct SessionStore {
    state: watch::Sender<SessionState>,
    dirty: AtomicBool,
    storage: PersistentStore,
}

impl SessionStore {
    pub fn new(storage: PersistentStore) -> Self {
        let (state, _) = watch::channel(SessionState::default());
        Self {
            state,
            dirty: AtomicBool::new(false),
            storage,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.state.subscribe()
    }

    pub fn phase(&self) -> SessionPhase {
        self.state.borrow().phase()
    }

    pub fn user(&self) -> Option<User> {
        self.state.borrow().user.clone()
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty.load(Ordering::SeqCst)
    }

    fn mutate(&self, f: impl FnOnce(&mut SessionState)) {
        self.state.send_modify(f);
        self.dirty.store(true, Ordering::SeqCst);
    }

    /// Transient fields are never persisted, so touching them leaves the
    /// dirty flag alone.
    fn mutate_transient(&self, f: impl FnOnce(&mut SessionState)) {
        self.state.send_modify(f);
    }

    pub fn set_user(&self, user: Option<User>) {
        self.mutate(|s| s.user = user);
    }

    /// Replace the interest list. Repeated labels keep their first position.
    pub fn set_interests(&self, interests: Vec<String>) {
        let mut unique: Vec<String> = Vec::with_capacity(interests.len());
        for label in interests {
            if !unique.contains(&label) {
                unique.push(label);
            }
        }
        self.mutate(|s| s.interests = unique);
    }

    /// Add `label` if absent, remove it otherwise. Returns true when added.
    pub fn toggle_interest(&self, label: &str) -> bool {
        let mut added = false;
        self.mutate(|s| added = toggle_membership(&mut s.interests, label));
        added
    }

    pub fn set_onboarded(&self, onboarded: bool) {
        self.mutate(|s| s.is_onboarded = onboarded);
    }

    /// The user is known without a rehydration check, as right after a
    /// sign-in, so the phase can leave `Unknown`.
    pub fn mark_checked(&self) {
        self.mutate_transient(|s| s.checked = true);
    }

    /// Reset user, interests and onboarding. The stored auth token is not
    /// touched; sign-out goes through the auth orchestrator for that.
    pub fn clear_user(&self) {
        self.mutate(|s| {
            s.user = None;
            s.interests.clear();
            s.is_onboarded = false;
        });
    }

    /// Load the persisted subset written by a previous process.
    ///
    /// A storage failure is logged and leaves the session empty.
    pub async fn hydrate(&self) {
        let snapshot = match self.storage.get::<SessionSnapshot>(SESSION).await {
            Ok(snapshot) => snapshot.unwrap_or_default(),
            Err(e) => {
                error!(error = %e, "failed to read persisted session");
                SessionSnapshot::default()
            }
        };
        debug!(
            user = snapshot.user.is_some(),
            interests = snapshot.interests.len(),
            onboarded = snapshot.is_onboarded,
            "session hydrated"
        );
        self.state.send_replace(SessionState::from_snapshot(snapshot));
        self.dirty.store(false, Ordering::SeqCst);
    }

    /// Write the persisted subset if anything changed since the last flush.
    pub async fn flush(&self) -> Result<(), StorageError> {
        if !self.dirty.swap(false, Ordering::SeqCst) {
            return Ok(());
        }
        let snapshot = self.state.borrow().snapshot();
        if let Err(e) = self.storage.set(SESSION, &snapshot).await {
            self.dirty.store(true, Ordering::SeqCst);
            return Err(e);
        }
        debug!("session flushed");
        Ok(())
    }

    /// Rehydrate the signed-in user from the stored token.
    ///
    /// Without a token no network call is made. A rejected profile fetch
    /// drops the token and leaves the session anonymous; no error reaches
    /// the caller.
    pub async fn check_user(&self, api: &dyn HobbyApiPort) {
        self.mutate_transient(|s| s.is_loading = true);

        let token = match self.storage.get_raw(AUTH_TOKEN).await {
            Ok(token) => token.filter(|t| !t.is_empty()),
            Err(e) => {
                error!(error = %e, "failed to read auth token, treating session as anonymous");
                None
            }
        };

        match token {
            None => {
                debug!("no stored token");
                self.clear_user();
            }
            Some(_) => match fetch_profile(api).await {
                Ok(user) => {
                    info!(user_id = %user.id, "session restored");
                    let onboarded = user.is_onboarded.unwrap_or(false);
                    self.set_user(Some(user));
                    self.set_onboarded(onboarded);
                }
                Err(e) => {
                    warn!(error = %e, "stored token rejected, signing out locally");
                    if let Err(e) = self.storage.remove(AUTH_TOKEN).await {
                        error!(error = %e, "failed to remove rejected token");
                    }
                    self.clear_user();
                }
            },
        }

        self.mutate_transient(|s| {
            s.is_loading = false;
            s.checked = true;
        });

        if let Err(e) = self.flush().await {
            error!(error = %e, "failed to persist session after check");
        }
    }
}

async fn fetch_profile(api: &dyn HobbyApiPort) -> Result<User, hb_core::ports::ApiError> {
    api.init().await?;
    api.get_profile().await
}
