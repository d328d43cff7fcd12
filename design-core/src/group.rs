//! Layer groups.
//!
//! A group owns no member list of its own: membership is the set of layers
//! whose `groupId` back-reference names the group. [`GroupIndex`] mirrors
//! those back-references as a multimap so that membership queries do not
//! scan the page.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::{GroupId, LayerId};

/// A named group of layers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
    /// Group identifier.
    pub id: GroupId,
    /// Display name.
    pub name: String,
}

impl Group {
    /// Create a group with a fresh identifier.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: GroupId::new(),
            name: name.into(),
        }
    }
}

/// Multimap from group id to member layer ids, in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GroupIndex {
    members: HashMap<GroupId, Vec<LayerId>>,
}

impl GroupIndex {
    /// Record `layer` as a member of `group`.
    pub fn insert(&mut self, group: GroupId, layer: LayerId) {
        let members = self.members.entry(group).or_default();
        if !members.contains(&layer) {
            members.push(layer);
        }
    }

    /// Remove `layer` from `group`. Returns `true` if the group is now empty.
    pub fn remove(&mut self, group: &GroupId, layer: &LayerId) -> bool {
        let Some(members) = self.members.get_mut(group) else {
            return false;
        };
        members.retain(|id| id != layer);
        if members.is_empty() {
            self.members.remove(group);
            true
        } else {
            false
        }
    }

    /// Drop a group and return its former members.
    pub fn remove_group(&mut self, group: &GroupId) -> Vec<LayerId> {
        self.members.remove(group).unwrap_or_default()
    }

    /// Members of a group (empty for unknown groups).
    #[must_use]
    pub fn members(&self, group: &GroupId) -> &[LayerId] {
        self.members.get(group).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Number of members of a group.
    #[must_use]
    pub fn member_count(&self, group: &GroupId) -> usize {
        self.members(group).len()
    }
}
