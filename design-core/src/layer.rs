//! Layers - the positioned, sized and rotatable building blocks of a page.

use serde::{Deserialize, Serialize};

use crate::geometry::{normalize_degrees, Geometry};
use crate::{AssetId, GroupId, LayerId};

/// Font family used when neither the brand kit nor the brief names one.
pub const DEFAULT_FONT_FAMILY: &str = "Inter";

/// Horizontal text alignment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextAlign {
    /// Flush left.
    #[default]
    Left,
    /// Centered.
    Center,
    /// Flush right.
    Right,
    /// Justified.
    Justify,
}

/// Decorative effect applied to a text layer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase", rename_all_fields = "camelCase")]
pub enum TextEffect {
    /// Plain text.
    #[default]
    None,
    /// Drop shadow.
    Shadow {
        /// Horizontal shadow offset in pixels.
        offset_x: f64,
        /// Vertical shadow offset in pixels.
        offset_y: f64,
        /// Blur radius in pixels.
        blur: f64,
        /// Shadow color as hex.
        color: String,
    },
    /// Soft shadow directly beneath the text.
    Lift {
        /// Strength in `[0, 100]`.
        intensity: f64,
    },
    /// Outline around the glyphs.
    Stroke {
        /// Stroke width in pixels.
        width: f64,
        /// Stroke color as hex.
        color: String,
    },
    /// Glow around the glyphs.
    Neon {
        /// Strength in `[0, 100]`.
        intensity: f64,
        /// Glow color as hex.
        color: String,
    },
}

/// Text layer content.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextContent {
    /// Text content.
    pub content: String,
    /// Font family name.
    pub font_family: String,
    /// Font size in pixels.
    pub font_size: f64,
    /// Font weight (100-900).
    #[serde(default = "TextContent::default_weight")]
    pub font_weight: u16,
    /// Italic style.
    #[serde(default)]
    pub italic: bool,
    /// Text color as hex.
    pub color: String,
    /// Alignment.
    #[serde(default)]
    pub align: TextAlign,
    /// Optional effect.
    #[serde(default)]
    pub effect: TextEffect,
}

impl TextContent {
    const fn default_weight() -> u16 {
        400
    }
}

/// Image layer content: a reference into the asset library, never a copy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageContent {
    /// Library asset backing this layer.
    pub asset_id: AssetId,
}

/// Primitive shape drawn by a shape layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShapeKind {
    /// Rectangle (optionally with rounded corners).
    Rectangle,
    /// Circle or ellipse filling the layer box.
    Circle,
    /// Straight line across the layer box.
    Line,
}

/// One color stop of a gradient.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GradientStop {
    /// Position along the gradient in `[0, 1]`.
    pub offset: f64,
    /// Color as hex.
    pub color: String,
}

/// Fill of a shape layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Fill {
    /// Single color.
    Solid {
        /// Color as hex.
        color: String,
    },
    /// Linear gradient with ordered stops.
    LinearGradient {
        /// Gradient direction in degrees.
        angle: f64,
        /// Stops ordered by offset.
        stops: Vec<GradientStop>,
    },
}

impl Fill {
    /// Build a linear gradient, ordering the stops by offset.
    #[must_use]
    pub fn linear_gradient(angle: f64, mut stops: Vec<GradientStop>) -> Self {
        stops.sort_by(|a, b| a.offset.total_cmp(&b.offset));
        Self::LinearGradient {
            angle: normalize_degrees(angle),
            stops,
        }
    }
}

/// Shape layer content.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShapeContent {
    /// Which primitive to draw.
    pub shape: ShapeKind,
    /// Fill paint.
    pub fill: Fill,
    /// Stroke color as hex.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stroke_color: Option<String>,
    /// Stroke width in pixels.
    #[serde(default)]
    pub stroke_width: f64,
    /// Corner radius for rectangles.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub corner_radius: Option<f64>,
}

/// The variant-specific payload of a layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum LayerKind {
    /// Text block.
    Text(TextContent),
    /// Image backed by a library asset.
    Image(ImageContent),
    /// Vector shape.
    Shape(ShapeContent),
}

impl LayerKind {
    /// Short human-readable name of the variant.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Text(_) => "Text",
            Self::Image(_) => "Image",
            Self::Shape(_) => "Shape",
        }
    }
}

/// A layer on a page.
///
/// The identifier is fixed at construction and group membership is only
/// changed by the layer store, so neither is exposed mutably.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Layer {
    /// Hosts may omit the id of a new layer; a fresh one is issued.
    #[serde(default)]
    id: LayerId,
    /// Optional display name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Position, size and rotation.
    #[serde(flatten)]
    pub geometry: Geometry,
    /// Opacity in `[0, 1]`.
    #[serde(default = "Layer::default_opacity")]
    pub opacity: f64,
    /// Whether the layer is rendered.
    #[serde(default = "Layer::default_visible")]
    pub is_visible: bool,
    /// Locked layers are read-only to pointer interaction.
    #[serde(default)]
    pub is_locked: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    group_id: Option<GroupId>,
    /// Variant payload.
    #[serde(flatten)]
    pub kind: LayerKind,
}

impl Layer {
    const fn default_opacity() -> f64 {
        1.0
    }

    const fn default_visible() -> bool {
        true
    }

    /// Create a new layer with a fresh identifier.
    #[must_use]
    pub fn new(kind: LayerKind, geometry: Geometry) -> Self {
        Self::with_id(LayerId::new(), kind, geometry)
    }

    /// Create a layer with an identifier issued elsewhere.
    #[must_use]
    pub fn with_id(id: LayerId, kind: LayerKind, geometry: Geometry) -> Self {
        Self {
            id,
            name: None,
            geometry,
            opacity: 1.0,
            is_visible: true,
            is_locked: false,
            group_id: None,
            kind,
        }
    }

    /// Create a text layer with default styling.
    #[must_use]
    pub fn text(content: impl Into<String>, font_family: impl Into<String>) -> Self {
        Self::new(
            LayerKind::Text(TextContent {
                content: content.into(),
                font_family: font_family.into(),
                font_size: 32.0,
                font_weight: TextContent::default_weight(),
                italic: false,
                color: "#000000".to_string(),
                align: TextAlign::Left,
                effect: TextEffect::None,
            }),
            Geometry::new(0.0, 0.0, 300.0, 60.0),
        )
    }

    /// Create an image layer referencing a library asset.
    #[must_use]
    pub fn image(asset_id: AssetId, width: f64, height: f64) -> Self {
        Self::new(
            LayerKind::Image(ImageContent { asset_id }),
            Geometry::new(0.0, 0.0, width, height),
        )
    }

    /// Create a shape layer without stroke.
    #[must_use]
    pub fn shape(shape: ShapeKind, fill: Fill) -> Self {
        Self::new(
            LayerKind::Shape(ShapeContent {
                shape,
                fill,
                stroke_color: None,
                stroke_width: 0.0,
                corner_radius: None,
            }),
            Geometry::default(),
        )
    }

    /// Set the display name.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Set the geometry.
    #[must_use]
    pub fn with_geometry(mut self, geometry: Geometry) -> Self {
        self.geometry = geometry;
        self
    }

    /// Set the opacity (clamped to `[0, 1]`).
    #[must_use]
    pub fn with_opacity(mut self, opacity: f64) -> Self {
        if opacity.is_finite() {
            self.opacity = opacity.clamp(0.0, 1.0);
        }
        self
    }

    /// Set the lock flag.
    #[must_use]
    pub fn with_locked(mut self, locked: bool) -> Self {
        self.is_locked = locked;
        self
    }

    /// The layer identifier.
    #[must_use]
    pub fn id(&self) -> &LayerId {
        &self.id
    }

    /// Group this layer belongs to, if any.
    #[must_use]
    pub fn group_id(&self) -> Option<&GroupId> {
        self.group_id.as_ref()
    }

    pub(crate) fn set_group_id(&mut self, group_id: Option<GroupId>) {
        self.group_id = group_id;
    }

    /// Copy of this layer under a new identifier and outside any group.
    #[must_use]
    pub fn duplicate(&self) -> Self {
        Self {
            id: LayerId::new(),
            group_id: None,
            ..self.clone()
        }
    }

    /// Name shown in the layer panel.
    #[must_use]
    pub fn display_name(&self) -> String {
        if let Some(name) = &self.name {
            return name.clone();
        }
        match &self.kind {
            LayerKind::Text(text) if !text.content.trim().is_empty() => {
                text.content.trim().chars().take(24).collect()
            }
            kind => kind.label().to_string(),
        }
    }

    /// Whether pointer interaction may select or transform this layer.
    #[must_use]
    pub fn is_interactive(&self) -> bool {
        self.is_visible && !self.is_locked
    }

    /// Merge a partial update into this layer.
    ///
    /// Fields absent from the patch are left untouched. A field whose value
    /// would break an invariant (non-finite number, non-positive size, a
    /// different layer variant) is skipped and the current value retained.
    /// Returns `true` when anything changed.
    pub fn apply_patch(&mut self, patch: &LayerPatch) -> bool {
        let before = self.clone();

        if let Some(name) = &patch.name {
            self.name = Some(name.clone());
        }
        if let Some(top) = finite(patch.top, "top") {
            self.geometry.top = top;
        }
        if let Some(left) = finite(patch.left, "left") {
            self.geometry.left = left;
        }
        if let Some(width) = positive(patch.width, "width") {
            self.geometry.width = width;
        }
        if let Some(height) = positive(patch.height, "height") {
            self.geometry.height = height;
        }
        if let Some(rotation) = finite(patch.rotation, "rotation") {
            self.geometry.rotation = normalize_degrees(rotation);
        }
        if let Some(opacity) = finite(patch.opacity, "opacity") {
            self.opacity = opacity.clamp(0.0, 1.0);
        }
        if let Some(visible) = patch.is_visible {
            self.is_visible = visible;
        }
        if let Some(locked) = patch.is_locked {
            self.is_locked = locked;
        }
        if let Some(kind) = &patch.kind {
            if std::mem::discriminant(kind) == std::mem::discriminant(&self.kind) {
                self.kind = kind.clone();
            } else {
                tracing::debug!(
                    "Rejected variant change {} -> {} on layer {}",
                    self.kind.label(),
                    kind.label(),
                    self.id
                );
            }
        }

        *self != before
    }
}

fn finite(value: Option<f64>, field: &str) -> Option<f64> {
    let value = value?;
    if value.is_finite() {
        Some(value)
    } else {
        tracing::debug!("Rejected non-finite {field}: {value}");
        None
    }
}

fn positive(value: Option<f64>, field: &str) -> Option<f64> {
    let value = finite(value, field)?;
    if value > 0.0 {
        Some(value)
    } else {
        tracing::debug!("Rejected non-positive {field}: {value}");
        None
    }
}

/// A partial layer update. `None` fields are left unchanged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LayerPatch {
    /// New display name.
    pub name: Option<String>,
    /// New top position.
    pub top: Option<f64>,
    /// New left position.
    pub left: Option<f64>,
    /// New width.
    pub width: Option<f64>,
    /// New height.
    pub height: Option<f64>,
    /// New rotation in degrees.
    pub rotation: Option<f64>,
    /// New opacity.
    pub opacity: Option<f64>,
    /// New visibility flag.
    pub is_visible: Option<bool>,
    /// New lock flag.
    pub is_locked: Option<bool>,
    /// Replacement variant payload; must be the same variant as the layer.
    pub kind: Option<LayerKind>,
}

impl LayerPatch {
    /// Patch that overwrites position, size and rotation.
    #[must_use]
    pub fn geometry(geometry: Geometry) -> Self {
        Self {
            top: Some(geometry.top),
            left: Some(geometry.left),
            width: Some(geometry.width),
            height: Some(geometry.height),
            rotation: Some(geometry.rotation),
            ..Self::default()
        }
    }

    /// Patch that only renames.
    #[must_use]
    pub fn rename(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }

    /// Patch that only sets visibility.
    #[must_use]
    pub fn visible(visible: bool) -> Self {
        Self {
            is_visible: Some(visible),
            ..Self::default()
        }
    }

    /// Patch that only sets the lock flag.
    #[must_use]
    pub fn locked(locked: bool) -> Self {
        Self {
            is_locked: Some(locked),
            ..Self::default()
        }
    }

    /// Set the opacity.
    #[must_use]
    pub fn with_opacity(mut self, opacity: f64) -> Self {
        self.opacity = Some(opacity);
        self
    }

    /// Set the replacement variant payload.
    #[must_use]
    pub fn with_kind(mut self, kind: LayerKind) -> Self {
        self.kind = Some(kind);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_text() -> Layer {
        Layer::text("Summer Sale", "Inter")
            .with_geometry(Geometry::new(10.0, 20.0, 200.0, 50.0))
            .with_name("Headline")
    }

    #[test]
    fn test_patch_preserves_unnamed_fields() {
        let mut layer = sample_text();
        let before = layer.clone();
        assert!(layer.apply_patch(&LayerPatch {
            top: Some(99.0),
            ..LayerPatch::default()
        }));

        assert!((layer.geometry.top - 99.0).abs() < f64::EPSILON);
        assert_eq!(layer.geometry.left, before.geometry.left);
        assert_eq!(layer.geometry.width, before.geometry.width);
        assert_eq!(layer.name, before.name);
        assert_eq!(layer.kind, before.kind);
        assert_eq!(layer.id(), before.id());
    }

    #[test]
    fn test_patch_rejects_invalid_values() {
        let mut layer = sample_text();
        let before = layer.clone();
        let changed = layer.apply_patch(&LayerPatch {
            width: Some(0.0),
            height: Some(-5.0),
            top: Some(f64::NAN),
            rotation: Some(f64::INFINITY),
            ..LayerPatch::default()
        });
        assert!(!changed);
        assert_eq!(layer, before);
    }

    #[test]
    fn test_patch_normalizes_rotation_and_clamps_opacity() {
        let mut layer = sample_text();
        layer.apply_patch(&LayerPatch {
            rotation: Some(-30.0),
            opacity: Some(1.7),
            ..LayerPatch::default()
        });
        assert!((layer.geometry.rotation - 330.0).abs() < 1e-9);
        assert!((layer.opacity - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_patch_rejects_variant_change() {
        let mut layer = sample_text();
        let patch = LayerPatch::default().with_kind(LayerKind::Image(ImageContent {
            asset_id: AssetId::from_string("asset-1"),
        }));
        assert!(!layer.apply_patch(&patch));
        assert!(matches!(layer.kind, LayerKind::Text(_)));
    }

    #[test]
    fn test_display_name_falls_back_to_content() {
        let named = sample_text();
        assert_eq!(named.display_name(), "Headline");

        let unnamed = Layer::text("  Grand opening this weekend only  ", "Inter");
        assert_eq!(unnamed.display_name(), "Grand opening this weeke");

        let image = Layer::image(AssetId::from_string("a"), 10.0, 10.0);
        assert_eq!(image.display_name(), "Image");
    }

    #[test]
    fn test_duplicate_gets_new_id_and_no_group() {
        let mut layer = sample_text();
        layer.set_group_id(Some(GroupId::from_string("g")));
        let copy = layer.duplicate();
        assert_ne!(copy.id(), layer.id());
        assert!(copy.group_id().is_none());
        assert_eq!(copy.kind, layer.kind);
    }

    #[test]
    fn test_layer_json_shape() {
        let layer = Layer::shape(
            ShapeKind::Circle,
            Fill::Solid {
                color: "#ff0000".to_string(),
            },
        )
        .with_geometry(Geometry::new(1.0, 2.0, 3.0, 4.0).with_rotation(45.0));
        let json = serde_json::to_value(&layer).expect("serialize");

        assert_eq!(json["type"], "shape");
        assert_eq!(json["shape"], "circle");
        assert_eq!(json["isVisible"], true);
        assert_eq!(json["top"], 1.0);
        assert_eq!(json["rotation"], 45.0);
        assert!(json.get("groupId").is_none());

        let back: Layer = serde_json::from_value(json).expect("deserialize");
        assert_eq!(back, layer);
    }

    #[test]
    fn test_gradient_stops_are_ordered() {
        let fill = Fill::linear_gradient(
            -90.0,
            vec![
                GradientStop {
                    offset: 1.0,
                    color: "#fff".to_string(),
                },
                GradientStop {
                    offset: 0.0,
                    color: "#000".to_string(),
                },
            ],
        );
        let Fill::LinearGradient { angle, stops } = fill else {
            panic!("expected gradient");
        };
        assert!((angle - 270.0).abs() < 1e-9);
        assert!(stops[0].offset < stops[1].offset);
    }
}
