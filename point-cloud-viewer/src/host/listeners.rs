use bevy::prelude::*;

use super::{HostEventKind, HostWindow, ListenerHandle};

/// Host subscriptions made during `initialize`, released together on
/// `destroy`.
#[derive(Debug, Default)]
pub struct ListenerRegistry {
    entries: Vec<(HostEventKind, ListenerHandle)>,
}

impl ListenerRegistry {
    /// Subscribe to every kind in `kinds` that is not already registered.
    pub fn register_all(&mut self, host: &mut dyn HostWindow, kinds: &[HostEventKind]) {
        for &kind in kinds {
            if self.is_registered(kind) {
                continue;
            }
            let handle = host.subscribe(kind);
            trace!("subscribed to {:?} as {:?}", kind, handle);
            self.entries.push((kind, handle));
        }
    }

    pub fn is_registered(&self, kind: HostEventKind) -> bool {
        self.entries.iter().any(|(k, _)| *k == kind)
    }

    /// Unsubscribe every handle. Returns how many were released.
    pub fn release_all(&mut self, host: &mut dyn HostWindow) -> usize {
        let released = self.entries.len();
        for (kind, handle) in self.entries.drain(..) {
            trace!("unsubscribing {:?} ({:?})", kind, handle);
            host.unsubscribe(handle);
        }
        released
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
