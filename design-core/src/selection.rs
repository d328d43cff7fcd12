//! Selection of layers on the active page.

use serde::{Deserialize, Serialize};

use crate::{LayerId, LayerStore};

/// How a click combines with the existing selection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SelectMode {
    /// Plain click: replace the selection.
    #[default]
    Replace,
    /// Modified click (shift): toggle the clicked layer, keep the rest.
    Toggle,
}

/// Ordered, duplicate-free set of selected layer ids.
///
/// Clicking a grouped layer selects (or deselects) every member of its
/// group. Locked layers never enter the selection through clicks.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selection {
    ids: Vec<LayerId>,
}

impl Selection {
    /// Create an empty selection.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Selected ids in selection order.
    #[must_use]
    pub fn ids(&self) -> &[LayerId] {
        &self.ids
    }

    /// Whether `id` is selected.
    #[must_use]
    pub fn contains(&self, id: &LayerId) -> bool {
        self.ids.contains(id)
    }

    /// Number of selected layers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// Whether nothing is selected.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Deselect everything.
    pub fn clear(&mut self) {
        self.ids.clear();
    }

    /// Apply a click.
    ///
    /// `None` is a click on the page background and clears the selection in
    /// either mode. A click on a locked or unknown layer leaves the selection
    /// unchanged.
    pub fn click(&mut self, store: &LayerStore, target: Option<&LayerId>, mode: SelectMode) {
        let Some(target) = target else {
            self.clear();
            return;
        };
        let Some(layer) = store.get(target) else {
            tracing::debug!("Click on unknown layer {target}");
            return;
        };
        if layer.is_locked {
            tracing::debug!("Click on locked layer {target} ignored");
            return;
        }

        let expanded = Self::expand(store, target);
        match mode {
            SelectMode::Replace => {
                self.ids.clear();
                self.extend(expanded);
            }
            SelectMode::Toggle => {
                if self.contains(target) {
                    self.ids.retain(|id| !expanded.contains(id));
                } else {
                    self.extend(expanded);
                }
            }
        }
    }

    /// Replace the selection with `ids` (and their group members).
    ///
    /// Used by the layer panel; unknown and locked ids are skipped.
    pub fn select_ids(&mut self, store: &LayerStore, ids: &[LayerId]) {
        self.ids.clear();
        for id in ids {
            if store.get(id).is_some_and(|layer| !layer.is_locked) {
                let expanded = Self::expand(store, id);
                self.extend(expanded);
            }
        }
    }

    /// Select every visible, unlocked layer of the page.
    pub fn select_all(&mut self, store: &LayerStore) {
        self.ids = store
            .layers()
            .iter()
            .filter(|layer| layer.is_interactive())
            .map(|layer| layer.id().clone())
            .collect();
    }

    /// Drop ids that no longer resolve, or whose layer has since been locked.
    pub fn retain_existing(&mut self, store: &LayerStore) {
        self.ids
            .retain(|id| store.get(id).is_some_and(|layer| !layer.is_locked));
    }

    /// Remove a single id (e.g. after the layer was deleted).
    pub fn remove(&mut self, id: &LayerId) {
        self.ids.retain(|selected| selected != id);
    }

    /// The clicked layer plus its unlocked group members.
    fn expand(store: &LayerStore, target: &LayerId) -> Vec<LayerId> {
        let group = store.get(target).and_then(|layer| layer.group_id());
        match group {
            Some(group) => store
                .members(group)
                .iter()
                .filter(|id| store.get(id).is_some_and(|layer| !layer.is_locked))
                .cloned()
                .collect(),
            None => vec![target.clone()],
        }
    }

    fn extend(&mut self, ids: Vec<LayerId>) {
        for id in ids {
            if !self.ids.contains(&id) {
                self.ids.push(id);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Fill, Layer, LayerPatch, ShapeKind};

    fn page(count: usize) -> (LayerStore, Vec<LayerId>) {
        let mut store = LayerStore::new();
        let ids = (0..count)
            .map(|_| {
                store
                    .add_layer(Layer::shape(
                        ShapeKind::Circle,
                        Fill::Solid {
                            color: "#000".to_string(),
                        },
                    ))
                    .expect("add")
            })
            .collect();
        (store, ids)
    }

    #[test]
    fn test_plain_click_replaces() {
        let (store, ids) = page(2);
        let mut selection = Selection::new();
        selection.click(&store, Some(&ids[0]), SelectMode::Replace);
        selection.click(&store, Some(&ids[1]), SelectMode::Replace);
        assert_eq!(selection.ids(), [ids[1].clone()]);
    }

    #[test]
    fn test_toggle_click_adds_and_removes() {
        let (store, ids) = page(3);
        let mut selection = Selection::new();
        selection.click(&store, Some(&ids[0]), SelectMode::Replace);
        selection.click(&store, Some(&ids[2]), SelectMode::Toggle);
        assert_eq!(selection.len(), 2);

        selection.click(&store, Some(&ids[0]), SelectMode::Toggle);
        assert_eq!(selection.ids(), [ids[2].clone()]);
    }

    #[test]
    fn test_no_duplicates() {
        let (store, ids) = page(1);
        let mut selection = Selection::new();
        selection.select_ids(&store, &[ids[0].clone(), ids[0].clone()]);
        assert_eq!(selection.len(), 1);
    }

    #[test]
    fn test_background_click_clears() {
        let (store, ids) = page(2);
        let mut selection = Selection::new();
        selection.select_ids(&store, &ids);
        selection.click(&store, None, SelectMode::Toggle);
        assert!(selection.is_empty());
    }

    #[test]
    fn test_group_click_selects_all_members() {
        let (mut store, ids) = page(4);
        store.group_layers(&ids[..3]).expect("group");
        let mut selection = Selection::new();
        selection.click(&store, Some(&ids[1]), SelectMode::Replace);
        assert_eq!(selection.len(), 3);
        for id in &ids[..3] {
            assert!(selection.contains(id));
        }
        assert!(!selection.contains(&ids[3]));

        // toggling a member drops the whole group
        selection.click(&store, Some(&ids[0]), SelectMode::Toggle);
        assert!(selection.is_empty());
    }

    #[test]
    fn test_locked_layers_cannot_be_clicked_into_selection() {
        let (mut store, ids) = page(2);
        store.update_layer(&ids[1], &LayerPatch::locked(true));
        let mut selection = Selection::new();
        selection.click(&store, Some(&ids[0]), SelectMode::Replace);
        selection.click(&store, Some(&ids[1]), SelectMode::Replace);
        assert_eq!(selection.ids(), [ids[0].clone()]);

        selection.select_all(&store);
        assert_eq!(selection.ids(), [ids[0].clone()]);
    }

    #[test]
    fn test_retain_existing_drops_removed_layers() {
        let (mut store, ids) = page(2);
        let mut selection = Selection::new();
        selection.select_ids(&store, &ids);
        store.remove_layer(&ids[0]);
        selection.retain_existing(&store);
        assert_eq!(selection.ids(), [ids[1].clone()]);
    }
}
