//! Point material settings shared between a settings panel and the viewer.
//!
//! The store is an explicit object handed to the viewer at construction. The
//! viewer registers itself as an observer while it is bound and drains
//! changes once per frame.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PointShape {
    #[default]
    Square,
    Circle,
    Paraboloid,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PointColorType {
    #[default]
    Rgb,
    Color,
    Depth,
    Height,
    Intensity,
    Classification,
}

/// Material applied to every resident point cloud.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PointCloudSettings {
    pub shape: PointShape,
    pub size: f32,
    pub opacity: f32,
    pub color_type: PointColorType,
}

impl Default for PointCloudSettings {
    fn default() -> Self {
        Self {
            shape: PointShape::Square,
            size: 1.0,
            opacity: 1.0,
            color_type: PointColorType::Rgb,
        }
    }
}

/// Opaque token returned by [`SettingsStore::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionHandle(u64);

#[derive(Default)]
struct StoreState {
    settings: PointCloudSettings,
    revision: u64,
    next_id: u64,
    /// Last revision each subscriber has seen.
    observers: HashMap<SubscriptionHandle, u64>,
}

/// Cloneable handle to a single-threaded settings store.
#[derive(Clone, Default)]
pub struct SettingsStore {
    state: Rc<RefCell<StoreState>>,
}

impl SettingsStore {
    pub fn new(settings: PointCloudSettings) -> Self {
        Self {
            state: Rc::new(RefCell::new(StoreState {
                settings,
                ..Default::default()
            })),
        }
    }

    pub fn get(&self) -> PointCloudSettings {
        self.state.borrow().settings
    }

    /// Mutate the settings and mark them changed for every observer.
    pub fn update(&self, f: impl FnOnce(&mut PointCloudSettings)) {
        let mut settings = self.get();
        f(&mut settings);
        let mut state = self.state.borrow_mut();
        state.settings = settings;
        state.revision += 1;
    }

    /// Register an observer. The first [`take_change`](Self::take_change)
    /// only reports changes made after this call.
    pub fn subscribe(&self) -> SubscriptionHandle {
        let mut state = self.state.borrow_mut();
        let handle = SubscriptionHandle(state.next_id);
        state.next_id += 1;
        let revision = state.revision;
        state.observers.insert(handle, revision);
        handle
    }

    /// Returns `false` if the handle was not registered.
    pub fn unsubscribe(&self, handle: SubscriptionHandle) -> bool {
        self.state.borrow_mut().observers.remove(&handle).is_some()
    }

    /// Current settings if they changed since this observer last looked.
    pub fn take_change(&self, handle: SubscriptionHandle) -> Option<PointCloudSettings> {
        let mut state = self.state.borrow_mut();
        let revision = state.revision;
        let seen = state.observers.get_mut(&handle)?;
        if *seen == revision {
            return None;
        }
        *seen = revision;
        Some(state.settings)
    }

    pub fn observer_count(&self) -> usize {
        self.state.borrow().observers.len()
    }
}
