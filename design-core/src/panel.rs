//! Layer panel projection.
//!
//! The panel lists the topmost layer first, the reverse of store order.
//! It never reorders or copies the store; edits made from the panel are
//! plain `update_layer` calls.

use serde::{Deserialize, Serialize};

use crate::{GroupId, LayerId, LayerPatch, LayerStore};

/// One row of the layer panel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PanelRow {
    /// Layer id.
    pub id: LayerId,
    /// Display name.
    pub name: String,
    /// Variant label ("Text", "Image", "Shape").
    pub kind: String,
    /// Position in the store's z-order (0 is the bottom).
    pub z_index: usize,
    /// Visibility flag.
    pub is_visible: bool,
    /// Lock flag.
    pub is_locked: bool,
    /// Group the layer belongs to.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group_id: Option<GroupId>,
}

/// Read-only, top-first view over a layer store.
#[derive(Debug, Clone, Copy)]
pub struct LayerPanel<'a> {
    store: &'a LayerStore,
}

impl<'a> LayerPanel<'a> {
    /// Project a store.
    #[must_use]
    pub const fn new(store: &'a LayerStore) -> Self {
        Self { store }
    }

    /// Rows, topmost layer first.
    #[must_use]
    pub fn rows(&self) -> Vec<PanelRow> {
        self.store
            .layers()
            .iter()
            .enumerate()
            .rev()
            .map(|(z_index, layer)| PanelRow {
                id: layer.id().clone(),
                name: layer.display_name(),
                kind: layer.kind.label().to_string(),
                z_index,
                is_visible: layer.is_visible,
                is_locked: layer.is_locked,
                group_id: layer.group_id().cloned(),
            })
            .collect()
    }

    /// Convert a panel row position to the store's z-order index.
    #[must_use]
    pub fn store_index(&self, row: usize) -> Option<usize> {
        self.store.len().checked_sub(row + 1)
    }
}

/// Rename a layer from the panel.
pub fn rename(store: &mut LayerStore, id: &LayerId, name: impl Into<String>) -> bool {
    store.update_layer(id, &LayerPatch::rename(name))
}

/// Flip a layer's visibility from the panel.
pub fn toggle_visibility(store: &mut LayerStore, id: &LayerId) -> bool {
    let Some(visible) = store.get(id).map(|layer| layer.is_visible) else {
        return false;
    };
    store.update_layer(id, &LayerPatch::visible(!visible))
}

/// Flip a layer's lock from the panel.
pub fn toggle_lock(store: &mut LayerStore, id: &LayerId) -> bool {
    let Some(locked) = store.get(id).map(|layer| layer.is_locked) else {
        return false;
    };
    store.update_layer(id, &LayerPatch::locked(!locked))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Layer, DEFAULT_FONT_FAMILY};

    fn store() -> (LayerStore, Vec<LayerId>) {
        let mut store = LayerStore::new();
        let ids = ["back", "middle", "front"]
            .iter()
            .map(|name| {
                store
                    .add_layer(Layer::text(*name, DEFAULT_FONT_FAMILY))
                    .expect("add")
            })
            .collect();
        (store, ids)
    }

    #[test]
    fn test_rows_are_top_first() {
        let (store, _) = store();
        let rows = LayerPanel::new(&store).rows();
        let names: Vec<_> = rows.iter().map(|row| row.name.as_str()).collect();
        assert_eq!(names, ["front", "middle", "back"]);
        assert_eq!(rows[0].z_index, 2);
        assert_eq!(rows[2].z_index, 0);
    }

    #[test]
    fn test_projection_does_not_mutate_store() {
        let (store, ids) = store();
        let _ = LayerPanel::new(&store).rows();
        let order: Vec<_> = store.layers().iter().map(|l| l.id().clone()).collect();
        assert_eq!(order, ids);
    }

    #[test]
    fn test_store_index() {
        let (store, _) = store();
        let panel = LayerPanel::new(&store);
        assert_eq!(panel.store_index(0), Some(2));
        assert_eq!(panel.store_index(2), Some(0));
        assert_eq!(panel.store_index(3), None);
    }

    #[test]
    fn test_panel_edits_keep_order_and_count() {
        let (mut store, ids) = store();
        assert!(rename(&mut store, &ids[1], "Subtitle"));
        assert!(toggle_visibility(&mut store, &ids[0]));
        assert!(toggle_lock(&mut store, &ids[2]));
        assert!(!toggle_lock(&mut store, &LayerId::from_string("ghost")));

        let rows = LayerPanel::new(&store).rows();
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[1].name, "Subtitle");
        assert!(!rows[2].is_visible);
        assert!(rows[0].is_locked);
        let order: Vec<_> = store.layers().iter().map(|l| l.id().clone()).collect();
        assert_eq!(order, ids);
    }
}
