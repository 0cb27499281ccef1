//! Community store
//!
//! In-memory list of communities plus the joined-set. The joined-set is
//! the single source of truth for membership: every entity's `is_joined`
//! is projected from it whenever either side changes. Nothing here is
//! persisted.

use std::collections::HashSet;

use tokio::sync::watch;

use hb_core::Community;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CommunityState {
    pub communities: Vec<Community>,
    pub joined: HashSet<String>,
}

impl CommunityState {
    fn project_membership(&mut self) {
        for community in &mut self.communities {
            community.is_joined = Some(self.joined.contains(&community.id));
        }
    }
}

pub struct CommunityStore {
    state: watch::Sender<CommunityState>,
}

impl Default for CommunityStore {
    fn default() -> Self {
        Self::new()
    }
}

impl CommunityStore {
    pub fn new() -> Self {
        let (state, _) = watch::channel(CommunityState::default());
        Self { state }
    }

    pub fn subscribe(&self) -> watch::Receiver<CommunityState> {
        self.state.subscribe()
    }

    pub fn communities(&self) -> Vec<Community> {
        self.state.borrow().communities.clone()
    }

    pub fn get(&self, id: &str) -> Option<Community> {
        self.state
            .borrow()
            .communities
            .iter()
            .find(|c| c.id == id)
            .cloned()
    }

    /// Replace the list wholesale.
    ///
    /// Entries the payload marks as joined are added to the joined-set;
    /// nothing is removed from it.
    pub fn set_communities(&self, communities: Vec<Community>) {
        self.state.send_modify(|s| {
            s.joined.extend(
                communities
                    .iter()
                    .filter(|c| c.is_joined == Some(true))
                    .map(|c| c.id.clone()),
            );
            s.communities = communities;
            s.project_membership();
        });
    }

    /// Put a freshly created community at the front of the list.
    pub fn add_community(&self, community: Community, joined: bool) {
        self.state.send_modify(|s| {
            s.communities.retain(|c| c.id != community.id);
            if joined {
                s.joined.insert(community.id.clone());
            }
            s.communities.insert(0, community);
            s.project_membership();
        });
    }

    /// Mark `id` joined. Member counts are left to the server.
    pub fn join_community(&self, id: &str) {
        self.state.send_modify(|s| {
            s.joined.insert(id.to_string());
            s.project_membership();
        });
    }

    pub fn leave_community(&self, id: &str) {
        self.state.send_modify(|s| {
            s.joined.remove(id);
            s.project_membership();
        });
    }

    pub fn is_joined(&self, id: &str) -> bool {
        self.state.borrow().joined.contains(id)
    }

    pub fn joined_ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.state.borrow().joined.iter().cloned().collect();
        ids.sort();
        ids
    }

    /// Apply a server-confirmed member count. Returns false when the
    /// community is not in the list.
    pub fn update_member_count(&self, id: &str, member_count: u32) -> bool {
        let mut found = false;
        self.state.send_if_modified(|s| {
            let Some(community) = s.communities.iter_mut().find(|c| c.id == id) else {
                return false;
            };
            found = true;
            if community.member_count == member_count {
                return false;
            }
            community.member_count = member_count;
            true
        });
        found
    }

    pub fn clear(&self) {
        self.state.send_replace(CommunityState::default());
    }
}
