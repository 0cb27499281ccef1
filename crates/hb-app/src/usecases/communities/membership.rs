//! Join and leave.
//!
//! The joined-set is updated only after the API acknowledged the action,
//! and the member count is then refetched from the server rather than
//! adjusted locally. A second join or leave for a community that still
//! has one in flight is rejected.

use std::collections::HashSet;
use std::sync::{Arc, Mutex, MutexGuard};

use tracing::{debug, info, warn};

use hb_core::ports::{ApiError, HobbyApiPort};

use crate::stores::CommunityStore;

#[derive(Debug, thiserror::Error)]
pub enum CommunityActionError {
    #[error("a membership change for community `{0}` is already in progress")]
    InFlight(String),
    #[error("the server declined the membership change for community `{0}`")]
    Rejected(String),
    #[error(transparent)]
    Api(#[from] ApiError),
}

/// Outcome of a join or leave.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MembershipChange {
    pub community_id: String,
    pub joined: bool,
    /// Server-confirmed count, `None` if the refetch did not succeed.
    pub member_count: Option<u32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Action {
    Join,
    Leave,
}

pub struct CommunityMembership {
    api: Arc<dyn HobbyApiPort>,
    communities: Arc<CommunityStore>,
    in_flight: Mutex<HashSet<String>>,
}

struct InFlightGuard<'a> {
    set: &'a Mutex<HashSet<String>>,
    id: String,
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        lock(self.set).remove(&self.id);
    }
}

fn lock(set: &Mutex<HashSet<String>>) -> MutexGuard<'_, HashSet<String>> {
    set.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl CommunityMembership {
    pub fn new(api: Arc<dyn HobbyApiPort>, communities: Arc<CommunityStore>) -> Self {
        Self {
            api,
            communities,
            in_flight: Mutex::new(HashSet::new()),
        }
    }

    pub async fn join(&self, id: &str) -> Result<MembershipChange, CommunityActionError> {
        self.run(id, Action::Join).await
    }

    pub async fn leave(&self, id: &str) -> Result<MembershipChange, CommunityActionError> {
        self.run(id, Action::Leave).await
    }

    fn begin(&self, id: &str) -> Result<InFlightGuard<'_>, CommunityActionError> {
        if !lock(&self.in_flight).insert(id.to_string()) {
            return Err(CommunityActionError::InFlight(id.to_string()));
        }
        Ok(InFlightGuard {
            set: &self.in_flight,
            id: id.to_string(),
        })
    }

    async fn run(&self, id: &str, action: Action) -> Result<MembershipChange, CommunityActionError> {
        let _guard = self.begin(id)?;

        let ack = match action {
            Action::Join => self.api.join_community(id).await?,
            Action::Leave => self.api.leave_community(id).await?,
        };
        if !ack.success {
            return Err(CommunityActionError::Rejected(id.to_string()));
        }

        match action {
            Action::Join => self.communities.join_community(id),
            Action::Leave => self.communities.leave_community(id),
        }

        let member_count = self.refresh_member_count(id).await;
        info!(community_id = id, ?action, ?member_count, "membership changed");

        Ok(MembershipChange {
            community_id: id.to_string(),
            joined: action == Action::Join,
            member_count,
        })
    }

    async fn refresh_member_count(&self, id: &str) -> Option<u32> {
        match self.api.get_community(id).await {
            Ok(Some(community)) => {
                self.communities
                    .update_member_count(id, community.member_count);
                Some(community.member_count)
            }
            Ok(None) => {
                debug!(community_id = id, "community vanished before refetch");
                None
            }
            Err(e) => {
                warn!(community_id = id, error = %e, "member count refetch failed, keeping old value");
                None
            }
        }
    }
}
