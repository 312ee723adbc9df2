use bevy::input::keyboard::KeyCode;
use constants::gizmo::{ROTATE_KEY, SCALE_KEY, TRANSLATE_KEY};
use serde::{Deserialize, Serialize};

/// Manipulation mode of a transform gizmo.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GizmoMode {
    #[default]
    Translate,
    Rotate,
    Scale,
}

impl GizmoMode {
    pub fn from_key(key: KeyCode) -> Option<Self> {
        match key {
            k if k == TRANSLATE_KEY => Some(Self::Translate),
            k if k == ROTATE_KEY => Some(Self::Rotate),
            k if k == SCALE_KEY => Some(Self::Scale),
            _ => None,
        }
    }
}

/// How many objects may carry a gizmo at once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GizmoPolicy {
    /// Picking a new object releases the previous gizmo.
    #[default]
    Single,
    /// Every picked object keeps its gizmo until a miss.
    Multi,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mode_keys() {
        assert_eq!(GizmoMode::from_key(KeyCode::KeyG), Some(GizmoMode::Translate));
        assert_eq!(GizmoMode::from_key(KeyCode::KeyR), Some(GizmoMode::Rotate));
        assert_eq!(GizmoMode::from_key(KeyCode::KeyS), Some(GizmoMode::Scale));
        assert_eq!(GizmoMode::from_key(KeyCode::KeyX), None);
    }
}
