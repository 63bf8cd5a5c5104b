// SPDX-License-Identifier: MIT OR Apache-2.0
//! Change notifications for patch mutations.

use crate::node::NodeIndex;
use crate::wire::Wire;
use egui::Pos2;

/// Receives a callback for every mutation the editor commits.
///
/// All methods default to doing nothing, so implementors only override what
/// they care about.
pub trait PatchObserver {
    /// A node was moved to `position`
    fn node_moved(&mut self, _index: NodeIndex, _position: Pos2) {}

    /// A wire was inserted
    fn wire_added(&mut self, _wire: &Wire) {}

    /// A wire was removed
    fn wire_removed(&mut self, _wire: &Wire) {}

    /// Nodes were removed, listed in removal order (highest index first)
    fn nodes_deleted(&mut self, _indices: &[NodeIndex]) {}
}

/// Ignores every notification
impl PatchObserver for () {}

/// A recorded notification
#[derive(Debug, Clone, PartialEq)]
pub enum PatchEvent {
    /// See [`PatchObserver::node_moved`]
    NodeMoved(NodeIndex, Pos2),
    /// See [`PatchObserver::wire_added`]
    WireAdded(Wire),
    /// See [`PatchObserver::wire_removed`]
    WireRemoved(Wire),
    /// See [`PatchObserver::nodes_deleted`]
    NodesDeleted(Vec<NodeIndex>),
}

/// Records notifications in arrival order
impl PatchObserver for Vec<PatchEvent> {
    fn node_moved(&mut self, index: NodeIndex, position: Pos2) {
        self.push(PatchEvent::NodeMoved(index, position));
    }

    fn wire_added(&mut self, wire: &Wire) {
        self.push(PatchEvent::WireAdded(*wire));
    }

    fn wire_removed(&mut self, wire: &Wire) {
        self.push(PatchEvent::WireRemoved(*wire));
    }

    fn nodes_deleted(&mut self, indices: &[NodeIndex]) {
        self.push(PatchEvent::NodesDeleted(indices.to_vec()));
    }
}
