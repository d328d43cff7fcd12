//! WebAssembly bindings for design-core.
//!
//! The host shell talks JSON: layers, patches and updates cross the boundary
//! as serialized strings and errors come back as plain messages.

use wasm_bindgen::prelude::*;

use crate::event::{KeyModifiers, PointerEvent};
use crate::geometry::Point;
use crate::interaction::{Handle, InteractionKind};
use crate::panel::LayerPanel;
use crate::project::Asset;
use crate::{
    AssetId, Editor, EditorResult, EngineConfig, Layer, LayerId, LayerPatch, PageKind, Project,
};

/// Initialize the design WASM module.
#[wasm_bindgen(start)]
pub fn init() {
    // Set up panic hook for better error messages
    #[cfg(feature = "wasm")]
    console_error_panic_hook::set_once();
}

fn to_json<T: serde::Serialize>(value: &T) -> String {
    serde_json::to_string(value).unwrap_or_default()
}

fn message<T>(result: EditorResult<T>) -> Result<T, String> {
    result.map_err(|e| e.to_string())
}

/// Editor instance for WASM.
#[wasm_bindgen]
pub struct WasmEditor {
    editor: Editor,
}

#[wasm_bindgen]
impl WasmEditor {
    /// Create an editor over a blank poster page of the given size.
    #[wasm_bindgen(constructor)]
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            editor: Editor::blank("Untitled", PageKind::Poster, width, height),
        }
    }

    /// Open a project serialized as JSON, with an optional engine config.
    ///
    /// # Errors
    ///
    /// Returns an error string if either document fails to parse.
    #[wasm_bindgen(js_name = fromProjectJson)]
    pub fn from_project_json(json: &str, config_json: Option<String>) -> Result<WasmEditor, String> {
        let project = message(Project::from_json(json))?;
        let config = match config_json {
            Some(config) => message(EngineConfig::from_json(&config))?,
            None => EngineConfig::default(),
        };
        let editor = message(Editor::with_config(project, config))?;
        Ok(Self { editor })
    }

    /// Get the whole project as JSON.
    #[wasm_bindgen(js_name = getProjectJson)]
    #[must_use]
    pub fn get_project_json(&self) -> String {
        self.editor.project().to_json().unwrap_or_default()
    }

    /// Get the active page's layers as JSON, back to front.
    #[wasm_bindgen(js_name = getLayersJson)]
    #[must_use]
    pub fn get_layers_json(&self) -> String {
        to_json(&self.editor.layers().layers())
    }

    /// Switch the active page.
    ///
    /// # Errors
    ///
    /// Returns an error string during a gesture or for unknown indices.
    #[wasm_bindgen(js_name = setActivePage)]
    pub fn set_active_page(&mut self, document: usize, page: usize) -> Result<(), String> {
        message(self.editor.set_active_page(document, page))
    }

    /// Add a layer given as JSON; returns its id.
    ///
    /// # Errors
    ///
    /// Returns an error string if parsing fails or the id is taken.
    #[wasm_bindgen(js_name = addLayerJson)]
    pub fn add_layer_json(&mut self, json: &str) -> Result<String, String> {
        let layer: Layer = serde_json::from_str(json).map_err(|e| e.to_string())?;
        self.editor
            .add_layer(layer)
            .map(|id| id.to_string())
            .ok_or_else(|| "Layer id already exists".to_string())
    }

    /// Add a text layer in the project's default font; returns its id.
    #[wasm_bindgen(js_name = addTextLayer)]
    pub fn add_text_layer(&mut self, content: &str) -> String {
        self.editor.add_text_layer(content).to_string()
    }

    /// Merge a JSON patch into a layer; returns whether it changed.
    ///
    /// # Errors
    ///
    /// Returns an error string if the patch fails to parse.
    #[wasm_bindgen(js_name = updateLayerJson)]
    pub fn update_layer_json(&mut self, id: &str, patch_json: &str) -> Result<bool, String> {
        let patch: LayerPatch = serde_json::from_str(patch_json).map_err(|e| e.to_string())?;
        Ok(self.editor.update_layer(&LayerId::from(id), &patch))
    }

    /// Remove a layer; returns whether it existed.
    #[wasm_bindgen(js_name = removeLayer)]
    pub fn remove_layer(&mut self, id: &str) -> bool {
        self.editor.remove_layer(&LayerId::from(id)).is_some()
    }

    /// Move a layer within the z-order.
    #[wasm_bindgen(js_name = reorderLayer)]
    pub fn reorder_layer(&mut self, id: &str, index: usize) -> bool {
        self.editor.reorder(&LayerId::from(id), index)
    }

    /// Rename a layer from the panel.
    #[wasm_bindgen(js_name = renameLayer)]
    pub fn rename_layer(&mut self, id: &str, name: &str) -> bool {
        self.editor.rename_layer(&LayerId::from(id), name)
    }

    /// Show or hide a layer from the panel.
    #[wasm_bindgen(js_name = toggleLayerVisibility)]
    pub fn toggle_layer_visibility(&mut self, id: &str) -> bool {
        self.editor.toggle_visibility(&LayerId::from(id))
    }

    /// Lock or unlock a layer from the panel.
    #[wasm_bindgen(js_name = toggleLayerLock)]
    pub fn toggle_layer_lock(&mut self, id: &str) -> bool {
        self.editor.toggle_lock(&LayerId::from(id))
    }

    /// Register an asset given as JSON in the project library.
    ///
    /// # Errors
    ///
    /// Returns an error string if the asset fails to parse.
    #[wasm_bindgen(js_name = addAssetJson)]
    pub fn add_asset_json(&mut self, json: &str) -> Result<String, String> {
        let asset: Asset = serde_json::from_str(json).map_err(|e| e.to_string())?;
        Ok(self.editor.add_asset(asset).to_string())
    }

    /// Point an image layer at another library asset after an external
    /// edit; returns whether the layer changed.
    ///
    /// # Errors
    ///
    /// Returns an error string if the asset is not in the library.
    #[wasm_bindgen(js_name = replaceImageAsset)]
    pub fn replace_image_asset(&mut self, id: &str, asset_id: &str) -> Result<bool, String> {
        message(
            self.editor
                .replace_image_asset(&LayerId::from(id), AssetId::from(asset_id)),
        )
    }

    /// Click a layer, or the background when `id` is absent.
    pub fn click(&mut self, id: Option<String>, shift: bool) {
        let modifiers = KeyModifiers {
            shift,
            ..KeyModifiers::default()
        };
        let target = id.map(LayerId::from_string);
        self.editor.click(target.as_ref(), modifiers);
    }

    /// Selected layer ids as a JSON array.
    #[wasm_bindgen(js_name = getSelectionJson)]
    #[must_use]
    pub fn get_selection_json(&self) -> String {
        to_json(&self.editor.selection().ids())
    }

    /// Group the selection; returns the new group id.
    #[wasm_bindgen(js_name = groupSelection)]
    pub fn group_selection(&mut self) -> Option<String> {
        self.editor.group_selection().map(|id| id.to_string())
    }

    /// Ungroup the selection; returns the number of released layers.
    #[wasm_bindgen(js_name = ungroupSelection)]
    pub fn ungroup_selection(&mut self) -> usize {
        self.editor.ungroup_selection().len()
    }

    /// Start a gesture over the selection.
    ///
    /// `kind` is `"move"`, `"resize"` or `"rotate"`; resize needs a handle
    /// name (`"tl"`, `"tr"`, `"bl"`, `"br"`). Returns whether a gesture
    /// started.
    ///
    /// # Errors
    ///
    /// Returns an error string for an unknown kind or handle.
    #[wasm_bindgen(js_name = beginInteraction)]
    pub fn begin_interaction(
        &mut self,
        kind: &str,
        handle: Option<String>,
        x: f64,
        y: f64,
    ) -> Result<bool, String> {
        let kind = match kind {
            "move" => InteractionKind::Move,
            "rotate" => InteractionKind::Rotate,
            "resize" => {
                let handle = handle
                    .as_deref()
                    .and_then(Handle::from_name)
                    .ok_or_else(|| format!("Unknown resize handle: {handle:?}"))?;
                InteractionKind::Resize { handle }
            }
            other => return Err(format!("Unknown interaction kind: {other}")),
        };
        Ok(self.editor.begin_interaction(kind, Point::new(x, y)))
    }

    /// Feed a pointer position; returns the applied updates as JSON.
    ///
    /// # Errors
    ///
    /// Returns an error string if no gesture is active.
    #[wasm_bindgen(js_name = updateInteraction)]
    pub fn update_interaction(&mut self, x: f64, y: f64) -> Result<String, String> {
        let updates = message(self.editor.update_interaction(Point::new(x, y)))?;
        Ok(to_json(&updates))
    }

    /// Finish the gesture; returns the committed updates as JSON.
    ///
    /// # Errors
    ///
    /// Returns an error string if no gesture is active.
    #[wasm_bindgen(js_name = endInteraction)]
    pub fn end_interaction(&mut self) -> Result<String, String> {
        let updates = message(self.editor.end_interaction())?;
        Ok(to_json(&updates))
    }

    /// Abort the gesture; returns the restored geometry as JSON.
    #[wasm_bindgen(js_name = cancelInteraction)]
    pub fn cancel_interaction(&mut self) -> String {
        to_json(&self.editor.cancel_interaction())
    }

    /// Check whether a gesture is active.
    #[wasm_bindgen(js_name = isInteracting)]
    #[must_use]
    pub fn is_interacting(&self) -> bool {
        self.editor.is_interacting()
    }

    /// Route a pointer event given as JSON; returns the applied updates.
    ///
    /// # Errors
    ///
    /// Returns an error string if the event fails to parse.
    #[wasm_bindgen(js_name = handlePointerJson)]
    pub fn handle_pointer_json(&mut self, json: &str) -> Result<String, String> {
        let event: PointerEvent = serde_json::from_str(json).map_err(|e| e.to_string())?;
        Ok(to_json(&self.editor.handle_pointer(&event)))
    }

    /// Hit-test a page position; returns the target as JSON.
    #[wasm_bindgen(js_name = hitTest)]
    #[must_use]
    pub fn hit_test(&self, x: f64, y: f64) -> String {
        to_json(&self.editor.hit_test(Point::new(x, y)))
    }

    /// Layer panel rows, topmost first, as JSON.
    #[wasm_bindgen(js_name = getPanelJson)]
    #[must_use]
    pub fn get_panel_json(&self) -> String {
        to_json(&LayerPanel::new(self.editor.layers()).rows())
    }
}

impl Default for WasmEditor {
    fn default() -> Self {
        Self::new(1080, 1080)
    }
}
