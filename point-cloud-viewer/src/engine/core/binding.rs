use std::rc::Rc;

use bevy::prelude::*;

use crate::engine::scene::InstalledLights;
use crate::host::{ListenerRegistry, MountPoint};
use crate::settings::SubscriptionHandle;

/// Everything the viewer acquires in `initialize` and must give back in
/// `destroy`. Exists only while the viewer is bound.
pub struct ViewportBinding {
    pub mount: Rc<dyn MountPoint>,
    /// Last applied surface size in pixels.
    pub size: Vec2,
    pub listeners: ListenerRegistry,
    pub settings: SubscriptionHandle,
    pub lights: InstalledLights,
}

impl ViewportBinding {
    pub fn bounding_rect(&self) -> Rect {
        self.mount.bounding_rect()
    }
}
