//! Layer store - the z-ordered layer sequence of one page.
//!
//! Sequence order is z-order: later entries render above earlier ones.
//! Every mutation goes through the operations below; none of them ever
//! changes a layer's identifier. Operations on ids that do not resolve are
//! no-ops, because a layer may legitimately disappear while a gesture or an
//! external edit still refers to it.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::geometry::{normalize_degrees, Geometry, Point};
use crate::group::{Group, GroupIndex};
use crate::{AssetId, GroupId, Layer, LayerId, LayerKind, LayerPatch};

/// Offset applied to duplicated layers so the copy is visible.
const DUPLICATE_NUDGE: f64 = 10.0;

/// The ordered layers of a page plus their groups.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "LayerStoreData", into = "LayerStoreData")]
pub struct LayerStore {
    /// Layers in z-order (back to front).
    layers: Vec<Layer>,
    /// Group records by id.
    groups: BTreeMap<GroupId, Group>,
    /// Group id -> member ids, mirrors each layer's `groupId`.
    index: GroupIndex,
}

/// Serialized form; the group index is derived on load.
#[derive(Serialize, Deserialize)]
struct LayerStoreData {
    layers: Vec<Layer>,
    #[serde(default)]
    groups: Vec<Group>,
}

impl From<LayerStoreData> for LayerStore {
    fn from(data: LayerStoreData) -> Self {
        let mut store = Self {
            groups: data
                .groups
                .into_iter()
                .map(|group| (group.id.clone(), group))
                .collect(),
            ..Self::default()
        };
        for layer in data.layers {
            store.add_layer(layer);
        }
        store.prune_empty_groups();
        store
    }
}

impl From<LayerStore> for LayerStoreData {
    fn from(store: LayerStore) -> Self {
        Self {
            layers: store.layers,
            groups: store.groups.into_values().collect(),
        }
    }
}

impl LayerStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// All layers, back to front.
    #[must_use]
    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    /// Number of layers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.layers.len()
    }

    /// Whether the page has no layers.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    /// Get a layer by id.
    #[must_use]
    pub fn get(&self, id: &LayerId) -> Option<&Layer> {
        self.layers.iter().find(|layer| layer.id() == id)
    }

    /// Z-order position of a layer.
    #[must_use]
    pub fn index_of(&self, id: &LayerId) -> Option<usize> {
        self.layers.iter().position(|layer| layer.id() == id)
    }

    /// Whether a layer with this id exists.
    #[must_use]
    pub fn contains(&self, id: &LayerId) -> bool {
        self.index_of(id).is_some()
    }

    /// Append a layer on top of the stack.
    ///
    /// A layer arriving with a `groupId` joins that group, creating the group
    /// record if needed. Returns `None` (and leaves the store untouched) if a
    /// layer with the same id already exists.
    pub fn add_layer(&mut self, layer: Layer) -> Option<LayerId> {
        let index = self.layers.len();
        self.insert_layer(index, layer)
    }

    /// Insert a layer at a z-order position (clamped to the valid range).
    pub fn insert_layer(&mut self, index: usize, layer: Layer) -> Option<LayerId> {
        if self.contains(layer.id()) {
            tracing::warn!("Refusing to add duplicate layer id {}", layer.id());
            return None;
        }
        let id = layer.id().clone();
        if let Some(group_id) = layer.group_id() {
            self.groups
                .entry(group_id.clone())
                .or_insert_with(|| Group {
                    id: group_id.clone(),
                    name: "Group".to_string(),
                });
            self.index.insert(group_id.clone(), id.clone());
        }
        let index = index.min(self.layers.len());
        self.layers.insert(index, layer);
        tracing::trace!("Added layer {id} at z-index {index}");
        Some(id)
    }

    /// Merge a partial update into a layer. No-op if the id is absent.
    ///
    /// Returns `true` if the layer changed.
    pub fn update_layer(&mut self, id: &LayerId, patch: &LayerPatch) -> bool {
        match self.layers.iter_mut().find(|layer| layer.id() == id) {
            Some(layer) => layer.apply_patch(patch),
            None => {
                tracing::debug!("update_layer: no layer {id}");
                false
            }
        }
    }

    /// Overwrite a layer's geometry.
    ///
    /// Invalid geometry (NaN, non-positive size) is rejected and the current
    /// geometry retained. Returns `true` if the write was applied.
    pub fn apply_geometry(&mut self, id: &LayerId, geometry: Geometry) -> bool {
        if let Err(e) = geometry.validate() {
            tracing::debug!("Rejected geometry for layer {id}: {e}");
            return false;
        }
        let Some(layer) = self.layers.iter_mut().find(|layer| layer.id() == id) else {
            return false;
        };
        layer.geometry = Geometry {
            rotation: normalize_degrees(geometry.rotation),
            ..geometry
        };
        true
    }

    /// Point an image layer at a different library asset.
    ///
    /// No-op for missing layers and for text or shape layers.
    pub fn replace_image_asset(&mut self, id: &LayerId, asset_id: AssetId) -> bool {
        match self.layers.iter_mut().find(|layer| layer.id() == id) {
            Some(Layer {
                kind: LayerKind::Image(image),
                ..
            }) => {
                image.asset_id = asset_id;
                true
            }
            _ => false,
        }
    }

    /// Remove a layer, pruning its group if it was the last member.
    pub fn remove_layer(&mut self, id: &LayerId) -> Option<Layer> {
        let index = self.index_of(id)?;
        let layer = self.layers.remove(index);
        if let Some(group_id) = layer.group_id() {
            self.detach_from_group(group_id, id);
        }
        tracing::trace!("Removed layer {id}");
        Some(layer)
    }

    /// Move a layer to `new_index` in the z-order, clamped to valid bounds.
    ///
    /// Returns `true` if the layer exists.
    pub fn reorder(&mut self, id: &LayerId, new_index: usize) -> bool {
        let Some(current) = self.index_of(id) else {
            return false;
        };
        let target = new_index.min(self.layers.len() - 1);
        if target != current {
            let layer = self.layers.remove(current);
            self.layers.insert(target, layer);
        }
        true
    }

    /// Move a layer one step towards the front.
    pub fn bring_forward(&mut self, id: &LayerId) -> bool {
        self.index_of(id)
            .is_some_and(|index| self.reorder(id, index + 1))
    }

    /// Move a layer one step towards the back.
    pub fn send_backward(&mut self, id: &LayerId) -> bool {
        self.index_of(id)
            .is_some_and(|index| self.reorder(id, index.saturating_sub(1)))
    }

    /// Move a layer to the top of the stack.
    pub fn bring_to_front(&mut self, id: &LayerId) -> bool {
        self.reorder(id, usize::MAX)
    }

    /// Move a layer to the bottom of the stack.
    pub fn send_to_back(&mut self, id: &LayerId) -> bool {
        self.reorder(id, 0)
    }

    /// Copy a layer under a fresh id, nudged and stacked directly above it.
    pub fn duplicate_layer(&mut self, id: &LayerId) -> Option<LayerId> {
        let index = self.index_of(id)?;
        let mut copy = self.layers[index].duplicate();
        copy.geometry.top += DUPLICATE_NUDGE;
        copy.geometry.left += DUPLICATE_NUDGE;
        self.insert_layer(index + 1, copy)
    }

    /// Put every listed layer into a freshly created group.
    ///
    /// Ids that do not resolve are ignored; layers leaving another group
    /// prune that group if they were its last members. Returns `None` when
    /// none of the ids resolve.
    pub fn group_layers(&mut self, ids: &[LayerId]) -> Option<GroupId> {
        let mut found: Vec<LayerId> = Vec::new();
        for id in ids {
            if self.contains(id) && !found.contains(id) {
                found.push(id.clone());
            }
        }
        if found.is_empty() {
            return None;
        }

        let group = Group::new(format!("Group {}", self.groups.len() + 1));
        let group_id = group.id.clone();
        self.groups.insert(group_id.clone(), group);

        for id in &found {
            let previous = self
                .layers
                .iter_mut()
                .find(|layer| layer.id() == id)
                .and_then(|layer| {
                    let previous = layer.group_id().cloned();
                    layer.set_group_id(Some(group_id.clone()));
                    previous
                });
            if let Some(previous) = previous {
                self.detach_from_group(&previous, id);
            }
            self.index.insert(group_id.clone(), id.clone());
        }

        tracing::debug!("Grouped {} layers into {group_id}", found.len());
        Some(group_id)
    }

    /// Dissolve a group, clearing `groupId` on all of its members.
    ///
    /// Returns the former members (empty for an unknown group).
    pub fn ungroup(&mut self, group_id: &GroupId) -> Vec<LayerId> {
        self.groups.remove(group_id);
        let members = self.index.remove_group(group_id);
        for layer in &mut self.layers {
            if layer.group_id() == Some(group_id) {
                layer.set_group_id(None);
            }
        }
        members
    }

    /// Get a group record.
    #[must_use]
    pub fn group(&self, id: &GroupId) -> Option<&Group> {
        self.groups.get(id)
    }

    /// All group records.
    pub fn groups(&self) -> impl Iterator<Item = &Group> {
        self.groups.values()
    }

    /// Rename a group. No-op for an unknown group.
    pub fn rename_group(&mut self, id: &GroupId, name: impl Into<String>) -> bool {
        self.groups
            .get_mut(id)
            .map(|group| group.name = name.into())
            .is_some()
    }

    /// Member ids of a group.
    #[must_use]
    pub fn members(&self, id: &GroupId) -> &[LayerId] {
        self.index.members(id)
    }

    /// Topmost visible, unlocked layer whose rotated box contains `point`.
    #[must_use]
    pub fn layer_at(&self, point: Point) -> Option<&Layer> {
        self.layers
            .iter()
            .rev()
            .find(|layer| layer.is_interactive() && layer.geometry.contains_point(point))
    }

    fn detach_from_group(&mut self, group_id: &GroupId, layer: &LayerId) {
        if self.index.remove(group_id, layer) {
            self.groups.remove(group_id);
            tracing::debug!("Pruned empty group {group_id}");
        }
    }

    fn prune_empty_groups(&mut self) {
        let index = &self.index;
        self.groups
            .retain(|id, _| index.member_count(id) > 0);
    }
}
