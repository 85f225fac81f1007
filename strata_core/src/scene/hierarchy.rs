// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The layer hierarchy as seen by the snapshot builder.
//!
//! The hierarchy is an arena of nodes rebuilt from the scene store whenever
//! the topology changes. Node 0 is the synthetic root; every other node wraps
//! one layer. Edges are tagged with a [`Variant`]:
//!
//! - **Attached**: plain parent-child.
//! - **Detached**: the geometric edge of a relatively parented layer. It is
//!   walked when resolving geometry but skipped in z order.
//! - **Relative**: a z-order-only edge from the relative parent.
//! - **Mirror**: from a mirroring layer to the layer it mirrors.
//!
//! Children are sorted by layer stack (descending), then z, then id.

use alloc::collections::BTreeMap;
use alloc::vec::Vec;

use crate::output::LayerStack;

use super::LayerId;
use super::descriptor::LayerDescriptor;
use super::path::TraversalPath;

/// The kind of edge between two hierarchy nodes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Variant {
    /// Plain parent-child edge.
    Attached,
    /// Geometric edge of a relatively parented layer.
    Detached,
    /// Z-order-only edge from a relative parent.
    Relative,
    /// Edge from a mirroring layer to its target.
    Mirror,
}

/// An edge to a child node.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Edge {
    /// Index of the child node.
    pub node: usize,
    /// Kind of edge.
    pub variant: Variant,
}

/// One node of the hierarchy.
#[derive(Clone, Debug)]
pub struct HierarchyNode {
    layer: LayerId,
    z: i32,
    layer_stack: LayerStack,
    children: Vec<Edge>,
}

impl HierarchyNode {
    /// The wrapped layer, or [`LayerId::INVALID`] for the root.
    #[inline]
    #[must_use]
    pub fn layer(&self) -> LayerId {
        self.layer
    }

    /// Outgoing edges in z order.
    #[inline]
    #[must_use]
    pub fn children(&self) -> &[Edge] {
        &self.children
    }
}

/// Arena of hierarchy nodes.
#[derive(Clone, Debug)]
pub struct LayerHierarchy {
    nodes: Vec<HierarchyNode>,
    node_of: BTreeMap<LayerId, usize>,
}

impl Default for LayerHierarchy {
    fn default() -> Self {
        Self {
            nodes: alloc::vec![HierarchyNode {
                layer: LayerId::INVALID,
                z: 0,
                layer_stack: LayerStack::DEFAULT,
                children: Vec::new(),
            }],
            node_of: BTreeMap::new(),
        }
    }
}

impl LayerHierarchy {
    /// Index of the synthetic root node.
    pub const ROOT: usize = 0;

    /// Builds the hierarchy from live descriptors.
    pub(crate) fn build<'a>(layers: impl Iterator<Item = &'a LayerDescriptor> + Clone) -> Self {
        let mut hierarchy = Self::default();
        for layer in layers.clone() {
            let idx = hierarchy.nodes.len();
            hierarchy.nodes.push(HierarchyNode {
                layer: layer.id,
                z: layer.z,
                layer_stack: layer.layer_stack,
                children: Vec::new(),
            });
            hierarchy.node_of.insert(layer.id, idx);
        }

        for layer in layers {
            let Some(&idx) = hierarchy.node_of.get(&layer.id) else {
                continue;
            };
            let parent = layer
                .parent
                .and_then(|p| hierarchy.node_of.get(&p).copied())
                .unwrap_or(Self::ROOT);
            let relative = layer
                .relative_parent
                .and_then(|r| hierarchy.node_of.get(&r).copied());
            match relative {
                Some(relative) => {
                    hierarchy.link(parent, idx, Variant::Detached);
                    hierarchy.link(relative, idx, Variant::Relative);
                }
                None => hierarchy.link(parent, idx, Variant::Attached),
            }
            if let Some(target) = layer.mirror.and_then(|m| hierarchy.node_of.get(&m).copied()) {
                hierarchy.link(idx, target, Variant::Mirror);
            }
        }

        hierarchy.sort_children();
        hierarchy
    }

    fn link(&mut self, parent: usize, child: usize, variant: Variant) {
        self.nodes[parent].children.push(Edge {
            node: child,
            variant,
        });
    }

    fn sort_children(&mut self) {
        let keys: Vec<_> = self
            .nodes
            .iter()
            .map(|n| (core::cmp::Reverse(n.layer_stack), n.z, n.layer))
            .collect();
        for node in &mut self.nodes {
            node.children.sort_by_key(|e| keys[e.node]);
        }
    }

    /// Returns a node by index.
    ///
    /// # Panics
    ///
    /// Panics if `idx` is out of range.
    #[inline]
    #[must_use]
    pub fn node(&self, idx: usize) -> &HierarchyNode {
        &self.nodes[idx]
    }

    /// Returns the node wrapping `id`.
    #[must_use]
    pub fn node_of(&self, id: LayerId) -> Option<usize> {
        self.node_of.get(&id).copied()
    }

    /// Number of nodes, including the root.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the hierarchy holds no layers.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.len() == 1
    }

    /// Visits every occurrence in ascending z order.
    ///
    /// A node is visited after its negative-z children and before the rest.
    /// Detached edges are skipped, so relatively parented layers are visited
    /// under their relative parent. Returning `false` from the visitor when
    /// it sees a node skips that node's non-negative-z children.
    pub fn traverse_in_z_order(&self, mut visitor: impl FnMut(&TraversalPath) -> bool) {
        let mut path = TraversalPath::root();
        self.traverse_node(Self::ROOT, &mut path, &mut visitor);
    }

    fn traverse_node<F>(&self, idx: usize, path: &mut TraversalPath, visitor: &mut F)
    where
        F: FnMut(&TraversalPath) -> bool,
    {
        let mut visit_self = idx != Self::ROOT;
        for edge in &self.nodes[idx].children {
            let child = &self.nodes[edge.node];
            if visit_self && child.z >= 0 {
                visit_self = false;
                if !visitor(path) {
                    return;
                }
            }
            if edge.variant == Variant::Detached {
                continue;
            }
            let mut child_path = path.descend(child.layer, edge.variant);
            self.traverse_node(edge.node, &mut child_path, visitor);
        }
        if visit_self {
            visitor(path);
        }
    }
}

#[cfg(test)]
mod tests {
    use alloc::string::String;

    use super::*;

    fn layer(id: u32, parent: Option<u32>, z: i32) -> LayerDescriptor {
        let mut d = LayerDescriptor::new(LayerId(id), String::new());
        d.parent = parent.map(LayerId);
        d.z = z;
        d
    }

    fn z_order(h: &LayerHierarchy) -> Vec<u32> {
        let mut out = Vec::new();
        h.traverse_in_z_order(|p| {
            out.push(p.id.get());
            true
        });
        out
    }

    #[test]
    fn negative_z_children_draw_below_parent() {
        let layers = [
            layer(1, None, 0),
            layer(2, Some(1), -1),
            layer(3, Some(1), 1),
            layer(4, Some(1), 0),
        ];
        let h = LayerHierarchy::build(layers.iter());
        assert_eq!(z_order(&h), [2, 1, 4, 3]);
    }

    #[test]
    fn relative_layer_moves_in_z_order() {
        let mut rel = layer(4, Some(1), 5);
        rel.relative_parent = Some(LayerId(3));
        let layers = [
            layer(1, None, 0),
            layer(2, Some(1), 1),
            layer(3, None, 1),
            rel,
        ];
        let h = LayerHierarchy::build(layers.iter());
        assert_eq!(z_order(&h), [1, 2, 3, 4]);
        let root = h.node(LayerHierarchy::ROOT);
        assert_eq!(root.children().len(), 2);
        let one = h.node(h.node_of(LayerId(1)).unwrap());
        assert!(
            one.children()
                .iter()
                .any(|e| e.variant == Variant::Detached)
        );
    }

    #[test]
    fn mirror_visits_target_subtree_again() {
        let mut mirror = layer(3, None, 1);
        mirror.mirror = Some(LayerId(1));
        let layers = [layer(1, None, 0), layer(2, Some(1), 0), mirror];
        let h = LayerHierarchy::build(layers.iter());
        let mut paths = Vec::new();
        h.traverse_in_z_order(|p| {
            paths.push(p.clone());
            true
        });
        let ids: Vec<u32> = paths.iter().map(|p| p.id.get()).collect();
        assert_eq!(ids, [1, 2, 3, 1, 2]);
        assert!(!paths[1].is_clone());
        assert!(paths[4].is_clone());
        assert_eq!(paths[4].mirror_root_ids.as_slice(), &[LayerId(3)]);
    }

    #[test]
    fn visitor_false_skips_subtree() {
        let layers = [layer(1, None, 0), layer(2, Some(1), 0), layer(3, None, 1)];
        let h = LayerHierarchy::build(layers.iter());
        let mut out = Vec::new();
        h.traverse_in_z_order(|p| {
            out.push(p.id.get());
            p.id != LayerId(1)
        });
        assert_eq!(out, [1, 3]);
    }

    #[test]
    fn layer_stacks_sort_descending() {
        let mut a = layer(1, None, 0);
        a.layer_stack = LayerStack(0);
        let mut b = layer(2, None, 0);
        b.layer_stack = LayerStack(1);
        let h = LayerHierarchy::build([a, b].iter());
        assert_eq!(z_order(&h), [2, 1]);
    }
}
