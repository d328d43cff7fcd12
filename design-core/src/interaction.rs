//! # Transform Interactions
//!
//! Turns a pointer drag into continuous geometry updates for one or more
//! layers.
//!
//! ```text
//! pointer-down ──► Interaction::begin ──► snapshot of the dragged layers
//! pointer-move ──► Interaction::update ──► GeometryUpdate per layer
//! pointer-up   ──► Interaction::end    ──► final frame, record consumed
//! focus loss   ──► Interaction::cancel ──► snapshot geometry (rollback)
//! ```
//!
//! Every frame is computed from the snapshot taken at pointer-down, never
//! from the previous frame, so small per-event errors cannot accumulate.
//! A frame value that is NaN, infinite or degenerate is dropped and the
//! previous frame's geometry is kept for that layer.

use serde::{Deserialize, Serialize};

use crate::geometry::{
    angle_between, bounding_box, normalize_degrees, rotate_point, rotate_vector, Geometry, Point,
    Rect,
};
use crate::{EngineConfig, Layer, LayerId};

/// Corner grip used to drive a resize.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Handle {
    /// Top-left corner.
    #[serde(rename = "tl")]
    TopLeft,
    /// Top-right corner.
    #[serde(rename = "tr")]
    TopRight,
    /// Bottom-left corner.
    #[serde(rename = "bl")]
    BottomLeft,
    /// Bottom-right corner.
    #[serde(rename = "br")]
    BottomRight,
}

impl Handle {
    /// All corner handles.
    pub const ALL: [Self; 4] = [
        Self::TopLeft,
        Self::TopRight,
        Self::BottomRight,
        Self::BottomLeft,
    ];

    /// Direction in which this corner grows the box along each local axis:
    /// `+1` for the right/bottom side, `-1` for the left/top side.
    #[must_use]
    pub const fn signs(self) -> (f64, f64) {
        match self {
            Self::TopLeft => (-1.0, -1.0),
            Self::TopRight => (1.0, -1.0),
            Self::BottomLeft => (-1.0, 1.0),
            Self::BottomRight => (1.0, 1.0),
        }
    }

    /// The diagonally opposite corner, which stays fixed during a resize.
    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Self::TopLeft => Self::BottomRight,
            Self::TopRight => Self::BottomLeft,
            Self::BottomLeft => Self::TopRight,
            Self::BottomRight => Self::TopLeft,
        }
    }

    /// Position of this corner in `[tl, tr, br, bl]` corner arrays.
    #[must_use]
    pub const fn corner_index(self) -> usize {
        match self {
            Self::TopLeft => 0,
            Self::TopRight => 1,
            Self::BottomRight => 2,
            Self::BottomLeft => 3,
        }
    }

    /// Parse the short handle names used by the host shell.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "tl" => Some(Self::TopLeft),
            "tr" => Some(Self::TopRight),
            "bl" => Some(Self::BottomLeft),
            "br" => Some(Self::BottomRight),
            _ => None,
        }
    }
}

/// What a gesture does to the captured layers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum InteractionKind {
    /// Translate every layer by the pointer delta.
    Move,
    /// Resize from a corner, anchored at the opposite corner.
    Resize {
        /// Dragged corner.
        handle: Handle,
    },
    /// Rotate about the shared pivot.
    Rotate,
}

/// Geometry of one layer as captured at pointer-down.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayerSnapshot {
    /// Layer the geometry belongs to.
    pub layer_id: LayerId,
    /// Geometry at gesture start.
    pub geometry: Geometry,
}

/// New geometry for one layer, produced by a gesture frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeometryUpdate {
    /// Layer to update.
    pub layer_id: LayerId,
    /// Geometry to write.
    pub geometry: Geometry,
}

/// An in-progress gesture.
///
/// The record owns a value snapshot of the layers it drives; later changes
/// to the layer store do not affect it. [`Interaction::end`] and
/// [`Interaction::cancel`] consume the record, so no frame can be computed
/// after the gesture resolved.
#[derive(Debug, Clone)]
pub struct Interaction {
    kind: InteractionKind,
    start: Point,
    initial_layers: Vec<LayerSnapshot>,
    /// Bounding box of the snapshot.
    bounds: Rect,
    /// Rotation pivot: center of `bounds`.
    pivot: Point,
    /// Pointer angle around `pivot` at pointer-down, in degrees.
    initial_angle: f64,
    min_size: f64,
    /// Last accepted geometry, parallel to `initial_layers`.
    frame: Vec<Geometry>,
}

impl Interaction {
    /// Start a gesture over `layers` at pointer position `start`.
    ///
    /// Locked layers and layers with invalid geometry are left out of the
    /// snapshot. Returns `None` when nothing is left to transform or the
    /// start position is not finite.
    pub fn begin<'a>(
        kind: InteractionKind,
        start: Point,
        layers: impl IntoIterator<Item = &'a Layer>,
        config: &EngineConfig,
    ) -> Option<Self> {
        if !start.is_finite() {
            tracing::debug!("Ignoring gesture with non-finite start {start:?}");
            return None;
        }

        let mut initial_layers: Vec<LayerSnapshot> = Vec::new();
        for layer in layers {
            if layer.is_locked || !layer.geometry.is_valid() {
                continue;
            }
            if initial_layers.iter().any(|s| &s.layer_id == layer.id()) {
                continue;
            }
            initial_layers.push(LayerSnapshot {
                layer_id: layer.id().clone(),
                geometry: layer.geometry,
            });
        }

        let bounds = bounding_box(initial_layers.iter().map(|s| &s.geometry))?;
        let pivot = bounds.center();
        let frame = initial_layers.iter().map(|s| s.geometry).collect();

        tracing::debug!(
            "Begin {kind:?} over {} layer(s) at ({}, {})",
            initial_layers.len(),
            start.x,
            start.y
        );

        Some(Self {
            kind,
            start,
            initial_angle: angle_between(pivot, start),
            initial_layers,
            bounds,
            pivot,
            min_size: config.min_layer_size,
            frame,
        })
    }

    /// Gesture kind.
    #[must_use]
    pub const fn kind(&self) -> InteractionKind {
        self.kind
    }

    /// Pointer-down position.
    #[must_use]
    pub const fn start(&self) -> Point {
        self.start
    }

    /// Snapshot taken at pointer-down.
    #[must_use]
    pub fn initial_layers(&self) -> &[LayerSnapshot] {
        &self.initial_layers
    }

    /// Bounding box of the snapshot.
    #[must_use]
    pub const fn bounds(&self) -> Rect {
        self.bounds
    }

    /// Shared rotation pivot (center of the snapshot bounds).
    #[must_use]
    pub const fn pivot(&self) -> Point {
        self.pivot
    }

    /// Whether `id` is driven by this gesture.
    #[must_use]
    pub fn involves(&self, id: &LayerId) -> bool {
        self.initial_layers.iter().any(|s| &s.layer_id == id)
    }

    /// Compute the frame for pointer position `pointer`.
    ///
    /// Returns one update per snapshot layer, in snapshot order. Layers whose
    /// new geometry would be invalid keep the previous frame's geometry.
    pub fn update(&mut self, pointer: Point) -> Vec<GeometryUpdate> {
        if pointer.is_finite() {
            let candidates = self.compute(pointer);
            for ((accepted, candidate), snapshot) in self
                .frame
                .iter_mut()
                .zip(candidates)
                .zip(&self.initial_layers)
            {
                if candidate.is_valid() {
                    tracing::trace!(
                        "Accepted frame for layer {}: {candidate:?}",
                        snapshot.layer_id
                    );
                    *accepted = candidate;
                } else {
                    tracing::debug!(
                        "Dropped invalid frame for layer {}: {candidate:?}",
                        snapshot.layer_id
                    );
                }
            }
        } else {
            tracing::debug!("Ignoring non-finite pointer {pointer:?}");
        }
        self.current_frame()
    }

    /// Geometry of the last accepted frame.
    #[must_use]
    pub fn current_frame(&self) -> Vec<GeometryUpdate> {
        self.initial_layers
            .iter()
            .zip(&self.frame)
            .map(|(snapshot, geometry)| GeometryUpdate {
                layer_id: snapshot.layer_id.clone(),
                geometry: *geometry,
            })
            .collect()
    }

    /// Handles around the last accepted frame, for drawing during a drag.
    #[must_use]
    pub fn handle_positions(&self, config: &EngineConfig) -> Option<HandleLayout> {
        HandleLayout::for_geometries(&self.frame, config)
    }

    /// Finish the gesture, returning the final frame.
    #[must_use]
    pub fn end(self) -> Vec<GeometryUpdate> {
        tracing::debug!("End {:?}", self.kind);
        self.current_frame()
    }

    /// Abort the gesture, returning the snapshot geometry for every layer.
    #[must_use]
    pub fn cancel(self) -> Vec<GeometryUpdate> {
        tracing::debug!("Cancel {:?}", self.kind);
        self.initial_layers
            .into_iter()
            .map(|snapshot| GeometryUpdate {
                layer_id: snapshot.layer_id,
                geometry: snapshot.geometry,
            })
            .collect()
    }

    fn compute(&self, pointer: Point) -> Vec<Geometry> {
        let dx = pointer.x - self.start.x;
        let dy = pointer.y - self.start.y;
        let initial = self.initial_layers.iter().map(|s| s.geometry);

        match self.kind {
            InteractionKind::Move => initial
                .map(|g| Geometry {
                    top: g.top + dy,
                    left: g.left + dx,
                    ..g
                })
                .collect(),
            InteractionKind::Resize { handle } if self.initial_layers.len() == 1 => initial
                .map(|g| resize_single(g, handle, dx, dy, self.min_size))
                .collect(),
            InteractionKind::Resize { handle } => {
                let scale = self.group_scale(handle, dx, dy);
                initial
                    .map(|g| scale.apply(g, self.min_size))
                    .collect()
            }
            InteractionKind::Rotate => {
                let current = (pointer.y - self.pivot.y)
                    .atan2(pointer.x - self.pivot.x)
                    .to_degrees();
                let delta = current - self.initial_angle;
                initial
                    .map(|g| {
                        let center = rotate_point(g.center(), self.pivot, delta);
                        Geometry {
                            rotation: normalize_degrees(g.rotation + delta),
                            ..g
                        }
                        .centered_at(center)
                    })
                    .collect()
            }
        }
    }

    /// Scale factors for resizing the whole snapshot bounds by its corner.
    fn group_scale(&self, handle: Handle, dx: f64, dy: f64) -> GroupScale {
        let (sx, sy) = handle.signs();
        let bounds = self.bounds;
        let anchor = bounds.corners()[handle.opposite().corner_index()];
        let width = (bounds.width + sx * dx).max(self.min_size);
        let height = (bounds.height + sy * dy).max(self.min_size);
        GroupScale {
            anchor,
            fx: width / bounds.width,
            fy: height / bounds.height,
        }
    }
}

/// Resize one layer from `handle` by the world-space pointer delta.
///
/// The delta is mapped into the layer's unrotated frame, the size grows
/// along the dragged corner's axes, and the box is re-positioned so the
/// opposite corner stays on the same world point.
fn resize_single(g: Geometry, handle: Handle, dx: f64, dy: f64, min_size: f64) -> Geometry {
    let (sx, sy) = handle.signs();
    let (local_dx, local_dy) = rotate_vector(dx, dy, -g.rotation);

    let width = (g.width + sx * local_dx).max(min_size);
    let height = (g.height + sy * local_dy).max(min_size);

    let anchor = g.corners()[handle.opposite().corner_index()];
    let (cx, cy) = rotate_vector(sx * width / 2.0, sy * height / 2.0, g.rotation);

    Geometry {
        width,
        height,
        ..g
    }
    .centered_at(Point::new(anchor.x + cx, anchor.y + cy))
}

/// Non-uniform scale about a fixed anchor, applied to every layer of a
/// multi-layer resize.
struct GroupScale {
    anchor: Point,
    fx: f64,
    fy: f64,
}

impl GroupScale {
    /// Scale a layer's offset from the anchor and its extents.
    ///
    /// Extents are scaled by the length of the layer's own axes after the
    /// page-space scale, so an unrotated layer scales by exactly `fx`/`fy`
    /// and a quarter-turned layer swaps them. Rotation is preserved.
    fn apply(&self, g: Geometry, min_size: f64) -> Geometry {
        let center = g.center();
        let new_center = Point::new(
            self.anchor.x + (center.x - self.anchor.x) * self.fx,
            self.anchor.y + (center.y - self.anchor.y) * self.fy,
        );
        let (sin, cos) = g.rotation.to_radians().sin_cos();
        let width_scale = (self.fx * cos).hypot(self.fy * sin);
        let height_scale = (self.fx * sin).hypot(self.fy * cos);
        Geometry {
            width: (g.width * width_scale).max(min_size),
            height: (g.height * height_scale).max(min_size),
            ..g
        }
        .centered_at(new_center)
    }
}

/// Screen positions of the transform handles around a selection.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HandleLayout {
    /// Corner handles in `[tl, tr, br, bl]` order.
    pub corners: [(Handle, Point); 4],
    /// Rotate handle above the top edge.
    pub rotate: Point,
}

impl HandleLayout {
    /// Lay out handles for the given geometries.
    ///
    /// A single layer gets handles on its rotated corners; several layers
    /// share handles on their axis-aligned bounding box.
    #[must_use]
    pub fn for_geometries(geometries: &[Geometry], config: &EngineConfig) -> Option<Self> {
        if let [single] = geometries {
            let corners = single.corners();
            let center = single.center();
            let above = Point::new(center.x, single.top - config.rotate_handle_offset);
            return Some(Self {
                corners: Handle::ALL.map(|h| (h, corners[h.corner_index()])),
                rotate: rotate_point(above, center, single.rotation),
            });
        }
        let bounds = bounding_box(geometries)?;
        let corners = bounds.corners();
        Some(Self {
            corners: Handle::ALL.map(|h| (h, corners[h.corner_index()])),
            rotate: Point::new(
                bounds.center().x,
                bounds.top - config.rotate_handle_offset,
            ),
        })
    }
}
