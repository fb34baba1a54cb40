// Copyright 2025 the Arbor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Layer-grouped draw order.

use std::collections::BTreeMap;

use smallvec::SmallVec;

use crate::types::NodeId;

/// Nodes grouped by layer, ascending.
///
/// Within a layer, nodes keep the order of the list the buckets were built
/// from. This is a derived cache: it is rebuilt from its source list whenever
/// that list or a member's layer changes, and is never edited on its own.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LayerBuckets {
    groups: BTreeMap<i32, SmallVec<[NodeId; 4]>>,
}

impl LayerBuckets {
    /// Replace the contents with `members`, grouped by `layer_of`.
    pub(crate) fn rebuild(&mut self, members: &[NodeId], layer_of: impl Fn(NodeId) -> i32) {
        self.groups.clear();
        for &id in members {
            self.groups.entry(layer_of(id)).or_default().push(id);
        }
    }

    /// All members in draw order: ascending layer, then insertion order.
    pub fn iter(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.groups.values().flat_map(|g| g.iter().copied())
    }

    /// Each non-empty layer with its members, ascending.
    pub fn groups(&self) -> impl Iterator<Item = (i32, &[NodeId])> + '_ {
        self.groups.iter().map(|(layer, ids)| (*layer, ids.as_slice()))
    }

    /// Members of one layer.
    pub fn layer(&self, layer: i32) -> &[NodeId] {
        self.groups.get(&layer).map(|g| g.as_slice()).unwrap_or(&[])
    }

    /// Total number of members.
    pub fn len(&self) -> usize {
        self.groups.values().map(|g| g.len()).sum()
    }

    /// Whether there are no members.
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Copy of the draw order, safe to hold while the tree is mutated.
    pub(crate) fn snapshot(&self) -> SmallVec<[NodeId; 8]> {
        self.iter().collect()
    }

    pub(crate) fn clear(&mut self) {
        self.groups.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(i: u32) -> NodeId {
        NodeId::new(i, 1)
    }

    #[test]
    fn ascending_layers_keep_insertion_order() {
        let members = [id(0), id(1), id(2), id(3)];
        let layers = [2, -1, 2, 0];
        let mut buckets = LayerBuckets::default();
        buckets.rebuild(&members, |n| layers[n.idx()]);
        let order: Vec<_> = buckets.iter().collect();
        assert_eq!(order, vec![id(1), id(3), id(0), id(2)]);
        let keys: Vec<_> = buckets.groups().map(|(l, _)| l).collect();
        assert_eq!(keys, vec![-1, 0, 2]);
        assert_eq!(buckets.layer(2), &[id(0), id(2)]);
        assert_eq!(buckets.len(), 4);
    }

    #[test]
    fn rebuild_replaces_contents() {
        let mut buckets = LayerBuckets::default();
        buckets.rebuild(&[id(0), id(1)], |_| 0);
        buckets.rebuild(&[id(1)], |_| 5);
        assert_eq!(buckets.iter().collect::<Vec<_>>(), vec![id(1)]);
        assert!(buckets.layer(0).is_empty());
        buckets.rebuild(&[], |_| 0);
        assert!(buckets.is_empty());
    }
}
