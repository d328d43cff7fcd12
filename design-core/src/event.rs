//! Pointer input delivered by the host shell.

use serde::{Deserialize, Serialize};

use crate::geometry::Point;
use crate::interaction::Handle;
use crate::selection::SelectMode;
use crate::LayerId;

/// Phase of a pointer event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PointerPhase {
    /// Button pressed.
    Down,
    /// Pointer moved.
    Move,
    /// Button released.
    Up,
    /// Gesture aborted by the host (focus loss, escape key).
    Cancel,
}

/// Keyboard modifiers held during a pointer event.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[allow(clippy::struct_excessive_bools)]
pub struct KeyModifiers {
    /// Shift key pressed.
    pub shift: bool,
    /// Control key pressed.
    pub ctrl: bool,
    /// Alt/Option key pressed.
    pub alt: bool,
    /// Meta/Command key pressed.
    pub meta: bool,
}

impl KeyModifiers {
    /// Modifiers with only shift held.
    #[must_use]
    pub const fn shift() -> Self {
        Self {
            shift: true,
            ctrl: false,
            alt: false,
            meta: false,
        }
    }

    /// How a click with these modifiers combines with the selection.
    #[must_use]
    pub const fn select_mode(self) -> SelectMode {
        if self.shift || self.ctrl || self.meta {
            SelectMode::Toggle
        } else {
            SelectMode::Replace
        }
    }
}

/// A pointer event in page coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PointerEvent {
    /// Event phase.
    pub phase: PointerPhase,
    /// X position in page pixels.
    pub x: f64,
    /// Y position in page pixels.
    pub y: f64,
    /// Modifier keys.
    #[serde(default)]
    pub modifiers: KeyModifiers,
}

impl PointerEvent {
    /// Create an event without modifiers.
    #[must_use]
    pub fn new(phase: PointerPhase, x: f64, y: f64) -> Self {
        Self {
            phase,
            x,
            y,
            modifiers: KeyModifiers::default(),
        }
    }

    /// Create a pointer-down event.
    #[must_use]
    pub fn down(x: f64, y: f64) -> Self {
        Self::new(PointerPhase::Down, x, y)
    }

    /// Create a pointer-move event.
    #[must_use]
    pub fn moved(x: f64, y: f64) -> Self {
        Self::new(PointerPhase::Move, x, y)
    }

    /// Create a pointer-up event.
    #[must_use]
    pub fn up(x: f64, y: f64) -> Self {
        Self::new(PointerPhase::Up, x, y)
    }

    /// Attach modifiers.
    #[must_use]
    pub fn with_modifiers(mut self, modifiers: KeyModifiers) -> Self {
        self.modifiers = modifiers;
        self
    }

    /// Event position.
    #[must_use]
    pub fn position(&self) -> Point {
        Point::new(self.x, self.y)
    }
}

/// What lies under the pointer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "camelCase")]
pub enum HitTarget {
    /// Empty page area.
    Background,
    /// Body of a layer.
    Layer(LayerId),
    /// Corner handle of the current selection.
    Handle(Handle),
    /// Rotate handle of the current selection.
    RotateHandle,
}
