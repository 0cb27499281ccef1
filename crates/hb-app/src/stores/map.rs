//! Map store: where the device is and who is around it. Transient.

use tokio::sync::watch;

use hb_core::{GeoPoint, User};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct MapState {
    pub user_location: Option<GeoPoint>,
    pub nearby_users: Vec<User>,
}

pub struct MapStore {
    state: watch::Sender<MapState>,
}

impl Default for MapStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MapStore {
    pub fn new() -> Self {
        let (state, _) = watch::channel(MapState::default());
        Self { state }
    }

    pub fn subscribe(&self) -> watch::Receiver<MapState> {
        self.state.subscribe()
    }

    pub fn state(&self) -> MapState {
        self.state.borrow().clone()
    }

    pub fn user_location(&self) -> Option<GeoPoint> {
        self.state.borrow().user_location
    }

    pub fn nearby_users(&self) -> Vec<User> {
        self.state.borrow().nearby_users.clone()
    }

    pub fn set_user_location(&self, location: Option<GeoPoint>) {
        self.state.send_if_modified(|s| {
            let changed = s.user_location != location;
            s.user_location = location;
            changed
        });
    }

    pub fn set_nearby_users(&self, users: Vec<User>) {
        self.state.send_modify(|s| s.nearby_users = users);
    }

    pub fn clear(&self) {
        self.state.send_replace(MapState::default());
    }
}
