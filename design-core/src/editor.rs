//! Editor session: the active page, its selection and the gesture state
//! machine.
//!
//! ```text
//!            pointer-down on handle/layer
//!   ┌──────┐ ───────────────────────────► ┌────────┐
//!   │ Idle │                              │ Active │ ◄─┐ pointer-move
//!   └──────┘ ◄─────────────────────────── └────────┘ ──┘ (update + write-back)
//!            pointer-up (end) / cancel (rollback)
//! ```
//!
//! While Active, a new pointer-down is ignored and the active page cannot
//! change. Every frame is written back to the page's layer store; layers
//! removed mid-gesture are skipped.

use crate::event::{HitTarget, KeyModifiers, PointerEvent, PointerPhase};
use crate::geometry::{distance, Geometry, Point};
use crate::interaction::{GeometryUpdate, HandleLayout, Interaction, InteractionKind};
use crate::panel;
use crate::project::{Asset, BrandKit, DesignBrief};
use crate::selection::{SelectMode, Selection};
use crate::{
    AssetId, Document, EditorError, EditorResult, EngineConfig, Fill, GroupId, Layer, LayerId,
    LayerPatch, LayerStore, Page, PageKind, Project, ShapeKind,
};

/// Largest share of the page a newly placed image may cover per axis.
const IMAGE_FIT_RATIO: f64 = 0.8;

/// An editing session over one project.
#[derive(Debug, Clone)]
pub struct Editor {
    project: Project,
    /// Active document index.
    document: usize,
    /// Active page index within the document.
    page: usize,
    selection: Selection,
    /// The gesture in progress, if any.
    interaction: Option<Interaction>,
    config: EngineConfig,
}

impl Editor {
    /// Open a project on the first page of its first document.
    ///
    /// # Errors
    ///
    /// Returns [`EditorError::PageNotFound`] if the project has no page.
    pub fn new(project: Project) -> EditorResult<Self> {
        Self::with_config(project, EngineConfig::default())
    }

    /// Start a session on a fresh project holding one empty page.
    #[must_use]
    pub fn blank(name: impl Into<String>, kind: PageKind, width: u32, height: u32) -> Self {
        Self {
            project: Project::new(
                DesignBrief::default(),
                Document::new(name, kind, width, height),
            ),
            document: 0,
            page: 0,
            selection: Selection::new(),
            interaction: None,
            config: EngineConfig::default(),
        }
    }

    /// Open a project with a custom engine configuration.
    ///
    /// # Errors
    ///
    /// Returns [`EditorError::PageNotFound`] if the project has no page.
    pub fn with_config(project: Project, config: EngineConfig) -> EditorResult<Self> {
        let has_page = project
            .documents
            .first()
            .is_some_and(|document| !document.pages.is_empty());
        if !has_page {
            return Err(EditorError::PageNotFound {
                document: 0,
                page: 0,
            });
        }
        Ok(Self {
            project,
            document: 0,
            page: 0,
            selection: Selection::new(),
            interaction: None,
            config: config.validated(),
        })
    }

    /// The project being edited.
    #[must_use]
    pub fn project(&self) -> &Project {
        &self.project
    }

    /// Close the session and hand the project back.
    #[must_use]
    pub fn into_project(self) -> Project {
        self.project
    }

    /// Engine configuration.
    #[must_use]
    pub const fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Mutable access to the design brief.
    pub fn brief_mut(&mut self) -> &mut DesignBrief {
        &mut self.project.brief
    }

    /// Mutable access to the brand kit.
    pub fn brand_kit_mut(&mut self) -> &mut BrandKit {
        &mut self.project.brand_kit
    }

    /// Add an asset to the project library.
    pub fn add_asset(&mut self, asset: Asset) -> AssetId {
        self.project.assets.add(asset)
    }

    /// `(document, page)` indices of the active page.
    #[must_use]
    pub const fn active_page(&self) -> (usize, usize) {
        (self.document, self.page)
    }

    /// Switch to another page, clearing the selection.
    ///
    /// # Errors
    ///
    /// Returns [`EditorError::InvalidSequence`] while a gesture is active and
    /// [`EditorError::PageNotFound`] for indices out of range.
    pub fn set_active_page(&mut self, document: usize, page: usize) -> EditorResult<()> {
        if self.interaction.is_some() {
            return Err(EditorError::InvalidSequence(
                "cannot switch pages during a gesture".to_string(),
            ));
        }
        let exists = self
            .project
            .documents
            .get(document)
            .is_some_and(|d| page < d.pages.len());
        if !exists {
            return Err(EditorError::PageNotFound { document, page });
        }
        self.document = document;
        self.page = page;
        self.selection.clear();
        tracing::debug!("Active page is now {document}/{page}");
        Ok(())
    }

    /// The active page.
    #[must_use]
    pub fn page(&self) -> &Page {
        &self.project.documents[self.document].pages[self.page]
    }

    fn page_mut(&mut self) -> &mut Page {
        &mut self.project.documents[self.document].pages[self.page]
    }

    /// Layers of the active page.
    #[must_use]
    pub fn layers(&self) -> &LayerStore {
        &self.page().layers
    }

    fn layers_mut(&mut self) -> &mut LayerStore {
        &mut self.page_mut().layers
    }

    /// Current selection.
    #[must_use]
    pub const fn selection(&self) -> &Selection {
        &self.selection
    }

    // ------------------------------------------------------------------
    // Layer CRUD on the active page
    // ------------------------------------------------------------------

    /// Append a layer on top of the active page.
    pub fn add_layer(&mut self, layer: Layer) -> Option<LayerId> {
        self.layers_mut().add_layer(layer)
    }

    /// Merge a partial update into a layer.
    ///
    /// A layer that becomes locked leaves the selection.
    pub fn update_layer(&mut self, id: &LayerId, patch: &LayerPatch) -> bool {
        let changed = self.layers_mut().update_layer(id, patch);
        if changed {
            let store = &self.project.documents[self.document].pages[self.page].layers;
            self.selection.retain_existing(store);
        }
        changed
    }

    /// Remove a layer and drop it from the selection.
    pub fn remove_layer(&mut self, id: &LayerId) -> Option<Layer> {
        self.selection.remove(id);
        self.layers_mut().remove_layer(id)
    }

    /// Move a layer within the z-order.
    pub fn reorder(&mut self, id: &LayerId, new_index: usize) -> bool {
        self.layers_mut().reorder(id, new_index)
    }

    /// Duplicate a layer just above itself.
    pub fn duplicate_layer(&mut self, id: &LayerId) -> Option<LayerId> {
        self.layers_mut().duplicate_layer(id)
    }

    /// Rename a layer from the panel.
    pub fn rename_layer(&mut self, id: &LayerId, name: impl Into<String>) -> bool {
        panel::rename(self.layers_mut(), id, name)
    }

    /// Flip a layer's visibility from the panel.
    pub fn toggle_visibility(&mut self, id: &LayerId) -> bool {
        panel::toggle_visibility(self.layers_mut(), id)
    }

    /// Flip a layer's lock from the panel. Locked layers leave the selection.
    pub fn toggle_lock(&mut self, id: &LayerId) -> bool {
        let changed = panel::toggle_lock(self.layers_mut(), id);
        if changed {
            let store = &self.project.documents[self.document].pages[self.page].layers;
            self.selection.retain_existing(store);
        }
        changed
    }

    /// Point an image layer at another library asset, e.g. after an
    /// external edit produced a new file.
    ///
    /// # Errors
    ///
    /// Returns [`EditorError::AssetNotFound`] if the asset is not in the
    /// library. A missing or non-image layer is a no-op returning `false`.
    pub fn replace_image_asset(&mut self, id: &LayerId, asset_id: AssetId) -> EditorResult<bool> {
        if !self.project.assets.contains(&asset_id) {
            return Err(EditorError::AssetNotFound(asset_id.to_string()));
        }
        Ok(self.layers_mut().replace_image_asset(id, asset_id))
    }

    /// Add a text layer centered on the page, in the project's default font.
    pub fn add_text_layer(&mut self, content: impl Into<String>) -> LayerId {
        let layer = Layer::text(content, self.project.default_font_family());
        self.place_centered(layer)
    }

    /// Add an image layer for a library asset, scaled to fit the page.
    ///
    /// # Errors
    ///
    /// Returns [`EditorError::AssetNotFound`] if the asset is not in the
    /// library.
    pub fn add_image_layer(&mut self, asset_id: &AssetId) -> EditorResult<LayerId> {
        let asset = self
            .project
            .assets
            .get(asset_id)
            .ok_or_else(|| EditorError::AssetNotFound(asset_id.to_string()))?;
        let width = f64::from(asset.width.max(1));
        let height = f64::from(asset.height.max(1));
        let page = self.page();
        let scale = (f64::from(page.width) * IMAGE_FIT_RATIO / width)
            .min(f64::from(page.height) * IMAGE_FIT_RATIO / height)
            .min(1.0);
        let layer = Layer::image(asset_id.clone(), width * scale, height * scale);
        Ok(self.place_centered(layer))
    }

    /// Add a shape layer centered on the page.
    pub fn add_shape_layer(&mut self, shape: ShapeKind, fill: Fill) -> LayerId {
        self.place_centered(Layer::shape(shape, fill))
    }

    fn place_centered(&mut self, mut layer: Layer) -> LayerId {
        let page = self.page();
        let center = Point::new(f64::from(page.width) / 2.0, f64::from(page.height) / 2.0);
        layer.geometry = layer.geometry.centered_at(center);
        let id = layer.id().clone();
        self.layers_mut().add_layer(layer);
        id
    }

    // ------------------------------------------------------------------
    // Selection
    // ------------------------------------------------------------------

    /// Apply a click on a layer, or on the background when `target` is `None`.
    pub fn click(&mut self, target: Option<&LayerId>, modifiers: KeyModifiers) {
        let store = &self.project.documents[self.document].pages[self.page].layers;
        self.selection.click(store, target, modifiers.select_mode());
    }

    /// Replace the selection, e.g. from the layer panel.
    pub fn select_ids(&mut self, ids: &[LayerId]) {
        let store = &self.project.documents[self.document].pages[self.page].layers;
        self.selection.select_ids(store, ids);
    }

    /// Select every visible, unlocked layer.
    pub fn select_all(&mut self) {
        let store = &self.project.documents[self.document].pages[self.page].layers;
        self.selection.select_all(store);
    }

    /// Deselect everything.
    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }

    /// Group the selected layers.
    pub fn group_selection(&mut self) -> Option<GroupId> {
        let ids = self.selection.ids().to_vec();
        self.layers_mut().group_layers(&ids)
    }

    /// Dissolve every group touched by the selection.
    ///
    /// Returns the layers that were released.
    pub fn ungroup_selection(&mut self) -> Vec<LayerId> {
        let mut groups: Vec<GroupId> = Vec::new();
        for id in self.selection.ids() {
            if let Some(group) = self.layers().get(id).and_then(Layer::group_id) {
                if !groups.contains(group) {
                    groups.push(group.clone());
                }
            }
        }
        let store = self.layers_mut();
        groups.iter().flat_map(|group| store.ungroup(group)).collect()
    }

    // ------------------------------------------------------------------
    // Gesture state machine
    // ------------------------------------------------------------------

    /// Whether a gesture is active.
    #[must_use]
    pub const fn is_interacting(&self) -> bool {
        self.interaction.is_some()
    }

    /// The active gesture.
    #[must_use]
    pub const fn interaction(&self) -> Option<&Interaction> {
        self.interaction.as_ref()
    }

    /// Start a gesture over the selected layers.
    ///
    /// Ignored while another gesture is active. Returns `false` when no
    /// gesture started, for example because every selected layer is locked.
    pub fn begin_interaction(&mut self, kind: InteractionKind, start: Point) -> bool {
        if self.interaction.is_some() {
            tracing::debug!("Ignoring {kind:?} begin while a gesture is active");
            return false;
        }
        let store = self.layers();
        let layers = self.selection.ids().iter().filter_map(|id| store.get(id));
        self.interaction = Interaction::begin(kind, start, layers, &self.config);
        self.interaction.is_some()
    }

    /// Feed a pointer position to the active gesture and write the frame
    /// back to the page.
    ///
    /// Returns the updates that were applied.
    ///
    /// # Errors
    ///
    /// Returns [`EditorError::InvalidSequence`] if no gesture is active.
    pub fn update_interaction(&mut self, pointer: Point) -> EditorResult<Vec<GeometryUpdate>> {
        let Some(interaction) = self.interaction.as_mut() else {
            tracing::warn!("update_interaction without an active gesture");
            return Err(EditorError::InvalidSequence(
                "update without begin".to_string(),
            ));
        };
        let frame = interaction.update(pointer);
        Ok(self.write_back(frame))
    }

    /// Finish the active gesture, committing its last frame.
    ///
    /// # Errors
    ///
    /// Returns [`EditorError::InvalidSequence`] if no gesture is active.
    pub fn end_interaction(&mut self) -> EditorResult<Vec<GeometryUpdate>> {
        let Some(interaction) = self.interaction.take() else {
            tracing::warn!("end_interaction without an active gesture");
            return Err(EditorError::InvalidSequence("end without begin".to_string()));
        };
        let frame = interaction.end();
        Ok(self.write_back(frame))
    }

    /// Abort the active gesture, restoring every layer to its snapshot.
    ///
    /// A no-op returning nothing when no gesture is active.
    pub fn cancel_interaction(&mut self) -> Vec<GeometryUpdate> {
        match self.interaction.take() {
            Some(interaction) => {
                let snapshot = interaction.cancel();
                self.write_back(snapshot)
            }
            None => Vec::new(),
        }
    }

    fn write_back(&mut self, updates: Vec<GeometryUpdate>) -> Vec<GeometryUpdate> {
        let store = self.layers_mut();
        updates
            .into_iter()
            .filter(|update| {
                let applied = store.apply_geometry(&update.layer_id, update.geometry);
                if !applied {
                    tracing::debug!("Skipped write-back for layer {}", update.layer_id);
                }
                applied
            })
            .collect()
    }

    // ------------------------------------------------------------------
    // Pointer dispatch
    // ------------------------------------------------------------------

    /// Transform handles around the current selection.
    #[must_use]
    pub fn handle_layout(&self) -> Option<HandleLayout> {
        let store = self.layers();
        let geometries: Vec<Geometry> = self
            .selection
            .ids()
            .iter()
            .filter_map(|id| store.get(id))
            .map(|layer| layer.geometry)
            .collect();
        HandleLayout::for_geometries(&geometries, &self.config)
    }

    /// What lies under `point`: selection handles first, then the topmost
    /// interactive layer, then the background.
    #[must_use]
    pub fn hit_test(&self, point: Point) -> HitTarget {
        if let Some(layout) = self.handle_layout() {
            let radius = self.config.handle_radius;
            if distance(layout.rotate, point) <= radius {
                return HitTarget::RotateHandle;
            }
            if let Some((handle, _)) = layout
                .corners
                .iter()
                .find(|(_, corner)| distance(*corner, point) <= radius)
            {
                return HitTarget::Handle(*handle);
            }
        }
        self.layers()
            .layer_at(point)
            .map_or(HitTarget::Background, |layer| {
                HitTarget::Layer(layer.id().clone())
            })
    }

    /// Route a pointer event through hit testing, selection and the gesture
    /// state machine.
    ///
    /// Returns the geometry updates applied by this event. Moves and ups
    /// without an active gesture are ignored.
    pub fn handle_pointer(&mut self, event: &PointerEvent) -> Vec<GeometryUpdate> {
        let position = event.position();
        match event.phase {
            PointerPhase::Down => {
                self.pointer_down(position, event.modifiers);
                Vec::new()
            }
            PointerPhase::Move => {
                if self.interaction.is_none() {
                    return Vec::new();
                }
                self.update_interaction(position).unwrap_or_default()
            }
            PointerPhase::Up => {
                if self.interaction.is_none() {
                    return Vec::new();
                }
                let mut applied = self.update_interaction(position).unwrap_or_default();
                if let Ok(last) = self.end_interaction() {
                    applied = last;
                }
                applied
            }
            PointerPhase::Cancel => self.cancel_interaction(),
        }
    }

    fn pointer_down(&mut self, position: Point, modifiers: KeyModifiers) {
        if self.interaction.is_some() {
            tracing::debug!("Ignoring pointer-down during an active gesture");
            return;
        }
        match self.hit_test(position) {
            HitTarget::Handle(handle) => {
                self.begin_interaction(InteractionKind::Resize { handle }, position);
            }
            HitTarget::RotateHandle => {
                self.begin_interaction(InteractionKind::Rotate, position);
            }
            HitTarget::Layer(id) => {
                if !self.selection.contains(&id) || modifiers.select_mode() == SelectMode::Toggle {
                    self.click(Some(&id), modifiers);
                }
                if self.selection.contains(&id) {
                    self.begin_interaction(InteractionKind::Move, position);
                }
            }
            HitTarget::Background => self.click(None, modifiers),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interaction::Handle;
    use crate::project::{BrandFont, BrandRole, FileHandle};

    const TOL: f64 = 1e-9;

    fn editor() -> Editor {
        let project = Project::new(
            DesignBrief::default(),
            Document::new("Poster", PageKind::Poster, 1000, 800),
        );
        Editor::new(project).expect("editor")
    }

    fn square(editor: &mut Editor, top: f64, left: f64, size: f64) -> LayerId {
        editor
            .add_layer(
                Layer::shape(
                    ShapeKind::Rectangle,
                    Fill::Solid {
                        color: "#ff0000".to_string(),
                    },
                )
                .with_geometry(Geometry::new(top, left, size, size)),
            )
            .expect("add")
    }

    fn geometry(editor: &Editor, id: &LayerId) -> Geometry {
        editor.layers().get(id).expect("layer").geometry
    }

    #[test]
    fn test_new_requires_a_page() {
        let mut project = Project::new(
            DesignBrief::default(),
            Document::new("Empty", PageKind::Poster, 10, 10),
        );
        project.documents[0].pages.clear();
        assert!(matches!(
            Editor::new(project),
            Err(EditorError::PageNotFound { .. })
        ));
    }

    #[test]
    fn test_text_layer_uses_brand_font_and_is_centered() {
        let mut editor = editor();
        editor.brand_kit_mut().fonts.push(BrandFont {
            family: "Fraunces".to_string(),
            role: BrandRole::Heading,
        });
        let id = editor.add_text_layer("Summer Sale");
        let layer = editor.layers().get(&id).expect("layer");
        match &layer.kind {
            crate::LayerKind::Text(text) => assert_eq!(text.font_family, "Fraunces"),
            other => panic!("expected text, got {other:?}"),
        }
        let center = layer.geometry.center();
        assert!((center.x - 500.0).abs() < TOL);
        assert!((center.y - 400.0).abs() < TOL);
    }

    #[test]
    fn test_image_layer_fits_page() {
        let mut editor = editor();
        let asset = editor.add_asset(Asset::new(FileHandle::new("f"), "blob:p", 4000, 2000));
        let id = editor.add_image_layer(&asset).expect("image");
        let g = geometry(&editor, &id);
        assert!((g.width - 800.0).abs() < TOL);
        assert!((g.height - 400.0).abs() < TOL);

        let missing = AssetId::from_string("missing");
        assert!(matches!(
            editor.add_image_layer(&missing),
            Err(EditorError::AssetNotFound(_))
        ));
    }

    #[test]
    fn test_replace_image_asset_requires_library_entry() {
        let mut editor = editor();
        let first = editor.add_asset(Asset::new(FileHandle::new("a"), "blob:a", 100, 100));
        let second = editor.add_asset(Asset::new(FileHandle::new("b"), "blob:b", 100, 100));
        let id = editor.add_image_layer(&first).expect("image");

        assert!(editor.replace_image_asset(&id, second.clone()).expect("replace"));
        assert!(editor.project().asset_in_use(&second));
        assert!(!editor.project().asset_in_use(&first));
        assert!(editor
            .replace_image_asset(&id, AssetId::from_string("nope"))
            .is_err());
    }

    #[test]
    fn test_remove_layer_drops_selection() {
        let mut editor = editor();
        let a = square(&mut editor, 0.0, 0.0, 10.0);
        editor.click(Some(&a), KeyModifiers::default());
        assert!(editor.remove_layer(&a).is_some());
        assert!(editor.selection().is_empty());
    }

    #[test]
    fn test_locking_drops_from_selection() {
        let mut editor = editor();
        let a = square(&mut editor, 0.0, 0.0, 10.0);
        editor.select_all();
        assert!(editor.update_layer(&a, &LayerPatch::locked(true)));
        assert!(editor.selection().is_empty());
    }

    #[test]
    fn test_group_and_ungroup_selection() {
        let mut editor = editor();
        let a = square(&mut editor, 0.0, 0.0, 10.0);
        let b = square(&mut editor, 50.0, 50.0, 10.0);
        let c = square(&mut editor, 100.0, 100.0, 10.0);

        editor.select_ids(&[a.clone(), b.clone()]);
        let group = editor.group_selection().expect("group");
        editor.click(Some(&c), KeyModifiers::default());
        editor.click(Some(&a), KeyModifiers::default());
        assert_eq!(editor.selection().ids(), [a.clone(), b.clone()]);

        let released = editor.ungroup_selection();
        assert_eq!(released.len(), 2);
        assert!(editor.layers().group(&group).is_none());
    }

    #[test]
    fn test_gesture_sequencing() {
        let mut editor = editor();
        assert!(matches!(
            editor.update_interaction(Point::default()),
            Err(EditorError::InvalidSequence(_))
        ));
        assert!(editor.end_interaction().is_err());
        assert!(editor.cancel_interaction().is_empty());

        // nothing selected: stays idle
        assert!(!editor.begin_interaction(InteractionKind::Move, Point::default()));
        assert!(!editor.is_interacting());
    }

    #[test]
    fn test_begin_while_active_is_ignored() {
        let mut editor = editor();
        let a = square(&mut editor, 0.0, 0.0, 10.0);
        editor.select_ids(&[a]);
        assert!(editor.begin_interaction(InteractionKind::Move, Point::default()));
        assert!(!editor.begin_interaction(InteractionKind::Rotate, Point::new(5.0, 5.0)));
        assert_eq!(
            editor.interaction().map(Interaction::kind),
            Some(InteractionKind::Move)
        );
    }

    #[test]
    fn test_page_switch_refused_during_gesture() {
        let mut editor = editor();
        let a = square(&mut editor, 0.0, 0.0, 10.0);
        editor.select_ids(&[a]);
        editor.begin_interaction(InteractionKind::Move, Point::default());
        assert!(editor.set_active_page(0, 0).is_err());
        editor.end_interaction().expect("end");
        assert!(editor.set_active_page(0, 0).is_ok());
        assert!(editor.selection().is_empty());
        assert!(matches!(
            editor.set_active_page(0, 3),
            Err(EditorError::PageNotFound { page: 3, .. })
        ));
    }

    #[test]
    fn test_removed_layer_is_skipped_on_write_back() {
        let mut editor = editor();
        let a = square(&mut editor, 0.0, 0.0, 10.0);
        let b = square(&mut editor, 20.0, 20.0, 10.0);
        editor.select_ids(&[a.clone(), b.clone()]);
        editor.begin_interaction(InteractionKind::Move, Point::default());

        editor.remove_layer(&a);
        let applied = editor
            .update_interaction(Point::new(5.0, 5.0))
            .expect("update");
        assert_eq!(applied.len(), 1);
        assert_eq!(applied[0].layer_id, b);
        assert!((geometry(&editor, &b).left - 25.0).abs() < TOL);
    }

    #[test]
    fn test_hit_test_prefers_handles() {
        let mut editor = editor();
        let a = square(&mut editor, 100.0, 100.0, 100.0);
        assert_eq!(
            editor.hit_test(Point::new(150.0, 150.0)),
            HitTarget::Layer(a.clone())
        );
        assert_eq!(editor.hit_test(Point::new(500.0, 500.0)), HitTarget::Background);

        editor.select_ids(&[a]);
        assert_eq!(
            editor.hit_test(Point::new(201.0, 199.0)),
            HitTarget::Handle(Handle::BottomRight)
        );
        assert_eq!(
            editor.hit_test(Point::new(150.0, 70.0)),
            HitTarget::RotateHandle
        );
    }

    #[test]
    fn test_pointer_drag_moves_layer() {
        let mut editor = editor();
        let a = square(&mut editor, 100.0, 100.0, 100.0);

        editor.handle_pointer(&PointerEvent::down(150.0, 150.0));
        assert!(editor.selection().contains(&a));
        assert!(editor.is_interacting());

        editor.handle_pointer(&PointerEvent::moved(170.0, 140.0));
        editor.handle_pointer(&PointerEvent::up(180.0, 160.0));
        assert!(!editor.is_interacting());

        let g = geometry(&editor, &a);
        assert!((g.left - 130.0).abs() < TOL);
        assert!((g.top - 110.0).abs() < TOL);
    }

    #[test]
    fn test_pointer_resize_from_handle() {
        let mut editor = editor();
        let a = square(&mut editor, 100.0, 100.0, 150.0);
        editor.select_ids(&[a.clone()]);

        editor.handle_pointer(&PointerEvent::down(250.0, 250.0));
        editor.handle_pointer(&PointerEvent::up(300.0, 300.0));

        let g = geometry(&editor, &a);
        assert!((g.width - 200.0).abs() < TOL);
        assert!((g.height - 200.0).abs() < TOL);
        assert!((g.top - 100.0).abs() < TOL);
        assert!((g.left - 100.0).abs() < TOL);
    }

    #[test]
    fn test_pointer_cancel_rolls_back() {
        let mut editor = editor();
        let a = square(&mut editor, 100.0, 100.0, 100.0);
        let before = geometry(&editor, &a);

        editor.handle_pointer(&PointerEvent::down(150.0, 150.0));
        editor.handle_pointer(&PointerEvent::moved(400.0, 10.0));
        let restored = editor.handle_pointer(&PointerEvent::new(PointerPhase::Cancel, 0.0, 0.0));

        assert_eq!(restored.len(), 1);
        assert_eq!(geometry(&editor, &a), before);
        assert!(!editor.is_interacting());
    }

    #[test]
    fn test_background_click_clears_and_stray_events_are_ignored() {
        let mut editor = editor();
        let a = square(&mut editor, 100.0, 100.0, 100.0);
        editor.select_ids(&[a]);
        assert!(editor.handle_pointer(&PointerEvent::moved(1.0, 1.0)).is_empty());
        assert!(editor.handle_pointer(&PointerEvent::up(1.0, 1.0)).is_empty());

        editor.handle_pointer(&PointerEvent::down(900.0, 700.0));
        assert!(editor.selection().is_empty());
        assert!(!editor.is_interacting());
    }

    #[test]
    fn test_locked_layer_is_not_hit() {
        let mut editor = editor();
        let a = square(&mut editor, 0.0, 0.0, 50.0);
        let b = square(&mut editor, 300.0, 300.0, 50.0);
        editor.update_layer(&b, &LayerPatch::locked(true));
        editor.select_ids(&[a]);

        assert_eq!(editor.hit_test(Point::new(325.0, 325.0)), HitTarget::Background);
        let down = PointerEvent::down(325.0, 325.0).with_modifiers(KeyModifiers::shift());
        editor.handle_pointer(&down);
        assert!(editor.selection().is_empty());
        assert!(!editor.is_interacting());
        assert!(!editor.selection().contains(&b));
    }

    #[test]
    fn test_ctrl_click_on_selected_layer_toggles_it_off() {
        let mut editor = editor();
        let a = square(&mut editor, 100.0, 100.0, 100.0);
        let b = square(&mut editor, 400.0, 400.0, 100.0);
        editor.select_ids(&[a.clone(), b.clone()]);

        let ctrl = KeyModifiers {
            ctrl: true,
            ..KeyModifiers::default()
        };
        editor.handle_pointer(&PointerEvent::down(150.0, 150.0).with_modifiers(ctrl));

        assert!(!editor.selection().contains(&a));
        assert!(editor.selection().contains(&b));
        assert!(!editor.is_interacting());
    }

    #[test]
    fn test_meta_click_on_unselected_layer_adds_it() {
        let mut editor = editor();
        let a = square(&mut editor, 100.0, 100.0, 100.0);
        let b = square(&mut editor, 400.0, 400.0, 100.0);
        editor.select_ids(&[a.clone()]);

        let meta = KeyModifiers {
            meta: true,
            ..KeyModifiers::default()
        };
        editor.handle_pointer(&PointerEvent::down(450.0, 450.0).with_modifiers(meta));

        assert!(editor.selection().contains(&a));
        assert!(editor.selection().contains(&b));
        assert!(editor.is_interacting());
    }

    #[test]
    fn test_panel_edits_update_selection() {
        let mut editor = editor();
        let a = square(&mut editor, 100.0, 100.0, 100.0);
        let b = square(&mut editor, 400.0, 400.0, 100.0);
        editor.select_ids(&[a.clone(), b.clone()]);

        assert!(editor.rename_layer(&a, "Badge"));
        assert_eq!(editor.layers().get(&a).expect("a").name.as_deref(), Some("Badge"));

        assert!(editor.toggle_visibility(&a));
        assert!(!editor.layers().get(&a).expect("a").is_visible);
        assert!(editor.toggle_lock(&b));
        assert!(!editor.selection().contains(&b));
        assert!(editor.selection().contains(&a));

        assert!(editor.toggle_lock(&b));
        assert!(!editor.layers().get(&b).expect("b").is_locked);
        assert!(!editor.toggle_visibility(&LayerId::from("missing")));
    }
}
