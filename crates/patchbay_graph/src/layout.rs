// SPDX-License-Identifier: MIT OR Apache-2.0
//! Automatic and column-based node placement.

use crate::geometry::NodeMetrics;
use crate::node::NodeIndex;
use crate::patch::Patch;
use crate::wire::Wire;
use egui::Pos2;
use std::collections::{BTreeSet, HashMap};

/// Outcome of a recursive layout pass
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LayoutResult {
    /// Vertical extent taken by the laid-out subtree
    pub aggregate_height: f32,
    /// Every node positioned so far, threaded through the whole call tree
    pub consumed: BTreeSet<NodeIndex>,
}

/// Live wires grouped by destination node, sorted by destination port
type IncomingWires = HashMap<NodeIndex, Vec<Wire>>;

impl Patch {
    /// Lay out `root` at `at` and pull everything feeding it in to the left.
    ///
    /// Sources go one column (`node_width + node_spacing`) further left per
    /// hop, visited in input-port order. Each branch starts at `at.y` plus
    /// the height of the branch laid out just before it, not the sum of all
    /// earlier branches, so from the third source on a branch can overlap
    /// the one above it. Only the last incoming wire's branch is padded by
    /// `node_spacing`.
    ///
    /// A node reachable along two branches is placed once, under whichever
    /// branch reaches it first. Nodes with no path to `root` keep their
    /// positions.
    ///
    /// Recursion goes one stack frame per hop, so very deep chains (several
    /// thousand nodes) can exhaust the stack.
    pub fn recursive_layout(
        &mut self,
        root: NodeIndex,
        at: Pos2,
        metrics: &impl NodeMetrics,
    ) -> LayoutResult {
        self.recursive_layout_with(root, at, metrics, BTreeSet::new())
    }

    /// [`Patch::recursive_layout`] starting from an existing consumed set.
    ///
    /// Nodes already in `consumed` are never revisited. An out-of-range root
    /// hands `consumed` back untouched with zero height.
    pub fn recursive_layout_with(
        &mut self,
        root: NodeIndex,
        at: Pos2,
        metrics: &impl NodeMetrics,
        consumed: BTreeSet<NodeIndex>,
    ) -> LayoutResult {
        if root >= self.node_count() {
            tracing::warn!("Skipping layout of missing node {}", root);
            return LayoutResult {
                aggregate_height: 0.0,
                consumed,
            };
        }

        let incoming = self.incoming_wires();
        let result = self.layout_branch(root, at, metrics, &incoming, consumed, false);
        tracing::debug!(
            "Laid out {} node(s) from {} (height {})",
            result.consumed.len(),
            root,
            result.aggregate_height
        );
        result
    }

    /// Place columns of nodes side by side, starting at `origin`.
    ///
    /// Column `c` sits at `origin.x + c * (node_width + node_spacing)`. Within
    /// a column nodes stack downward with `node_spacing` between them.
    /// Out-of-range indices are skipped.
    pub fn stacked_layout(
        &mut self,
        origin: Pos2,
        metrics: &impl NodeMetrics,
        columns: &[Vec<NodeIndex>],
    ) {
        let column_width = metrics.node_width() + metrics.node_spacing();
        for (column, indices) in columns.iter().enumerate() {
            let x = origin.x + column as f32 * column_width;
            let mut y = origin.y;
            for &index in indices {
                let Some(node) = self.node_mut(index) else {
                    tracing::warn!("Skipping missing node {} in column {}", index, column);
                    continue;
                };
                node.position = Pos2::new(x, y);
                y += metrics.node_rect(node).height() + metrics.node_spacing();
            }
        }
    }

    fn incoming_wires(&self) -> IncomingWires {
        let mut incoming: IncomingWires = HashMap::with_capacity(self.node_count());
        for wire in self.wires().filter(|w| self.is_wire_live(w)) {
            incoming.entry(wire.input.node).or_default().push(*wire);
        }
        for wires in incoming.values_mut() {
            wires.sort_by_key(|w| (w.input.port, w.output.node, w.output.port));
        }
        incoming
    }

    fn layout_branch(
        &mut self,
        index: NodeIndex,
        at: Pos2,
        metrics: &impl NodeMetrics,
        incoming: &IncomingWires,
        mut consumed: BTreeSet<NodeIndex>,
        trailing_spacing: bool,
    ) -> LayoutResult {
        // Callers only recurse into live endpoints.
        let Some(node) = self.node_mut(index) else {
            return LayoutResult {
                aggregate_height: 0.0,
                consumed,
            };
        };
        node.position = at;
        let own_height = metrics.node_rect(node).height();
        consumed.insert(index);

        let wires = incoming.get(&index).map(Vec::as_slice).unwrap_or_default();
        let column_x = at.x - metrics.node_width() - metrics.node_spacing();
        let mut height = 0.0;

        for (i, wire) in wires.iter().enumerate() {
            let source = wire.output.node;
            if consumed.contains(&source) {
                continue;
            }
            let is_last = i + 1 == wires.len();
            let branch = self.layout_branch(
                source,
                Pos2::new(column_x, at.y + height),
                metrics,
                incoming,
                consumed,
                is_last,
            );
            consumed = branch.consumed;
            height = branch.aggregate_height;
        }

        let spacing = if trailing_spacing { metrics.node_spacing() } else { 0.0 };
        LayoutResult {
            aggregate_height: f32::max(height, own_height) + spacing,
            consumed,
        }
    }
}
