// SPDX-License-Identifier: MIT OR Apache-2.0
//! Patch data structure containing nodes and wires.
//!
//! The patch places no constraint between its wires and its nodes: a wire
//! may name a node or port that no longer exists. Every reader checks with
//! [`Patch::is_wire_live`] or the `Option`-returning accessors before
//! dereferencing an endpoint.

use crate::node::{Node, NodeIndex};
use crate::observer::PatchObserver;
use crate::port::{InputId, OutputId, Port};
use crate::wire::Wire;
use egui::{Pos2, Vec2};
use indexmap::IndexSet;
use serde::{Deserialize, Serialize};

/// A node graph being edited
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Patch {
    /// Nodes; a node's index here is its identity
    nodes: Vec<Node>,
    /// Unique wires, in insertion order
    wires: IndexSet<Wire>,
}

impl Patch {
    /// Create a new empty patch
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a patch from existing nodes and wires.
    ///
    /// Duplicate wires collapse to one. Wires are not checked against the nodes.
    pub fn with_contents(nodes: Vec<Node>, wires: impl IntoIterator<Item = Wire>) -> Self {
        Self {
            nodes,
            wires: wires.into_iter().collect(),
        }
    }

    /// Append a node, returning its index
    pub fn add_node(&mut self, node: Node) -> NodeIndex {
        self.nodes.push(node);
        self.nodes.len() - 1
    }

    /// Get a node by index
    pub fn node(&self, index: NodeIndex) -> Option<&Node> {
        self.nodes.get(index)
    }

    /// Get a mutable node by index
    pub fn node_mut(&mut self, index: NodeIndex) -> Option<&mut Node> {
        self.nodes.get_mut(index)
    }

    /// Get all nodes in storage order
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// Get the number of nodes
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Get a node's position
    pub fn position(&self, index: NodeIndex) -> Option<Pos2> {
        self.node(index).map(|node| node.position)
    }

    /// Overwrite a node's position, ignoring the lock flag.
    ///
    /// Returns `false` if the index is out of range.
    pub fn set_position(&mut self, index: NodeIndex, position: Pos2) -> bool {
        match self.node_mut(index) {
            Some(node) => {
                node.position = position;
                true
            }
            None => false,
        }
    }

    /// Resolve an input reference
    pub fn input(&self, id: InputId) -> Option<&Port> {
        self.node(id.node)?.input(id.port)
    }

    /// Resolve an output reference
    pub fn output(&self, id: OutputId) -> Option<&Port> {
        self.node(id.node)?.output(id.port)
    }

    /// Check that both ends of a wire resolve to existing ports
    pub fn is_wire_live(&self, wire: &Wire) -> bool {
        self.output(wire.output).is_some() && self.input(wire.input).is_some()
    }

    /// Insert a wire. Returns `false` if an equal wire is already present.
    pub fn insert_wire(&mut self, wire: Wire) -> bool {
        self.wires.insert(wire)
    }

    /// Remove a wire. Returns `false` if it was not present.
    pub fn remove_wire(&mut self, wire: &Wire) -> bool {
        self.wires.shift_remove(wire)
    }

    /// Check if a wire is present
    pub fn contains_wire(&self, wire: &Wire) -> bool {
        self.wires.contains(wire)
    }

    /// Get a wire by its insertion position
    pub fn wire(&self, index: usize) -> Option<&Wire> {
        self.wires.get_index(index)
    }

    /// Get all wires in insertion order
    pub fn wires(&self) -> impl DoubleEndedIterator<Item = &Wire> {
        self.wires.iter()
    }

    /// Get the number of wires
    pub fn wire_count(&self) -> usize {
        self.wires.len()
    }

    /// Get wires terminating at a specific input
    pub fn wires_to(&self, input: InputId) -> impl Iterator<Item = &Wire> {
        self.wires.iter().filter(move |w| w.input == input)
    }

    /// The wire feeding an input, if any (first in insertion order)
    pub fn attached_wire(&self, input: InputId) -> Option<Wire> {
        self.wires_to(input).next().copied()
    }

    /// Move a node by `offset` and report its new position.
    ///
    /// Locked nodes and out-of-range indices are left alone and produce no
    /// notification. Returns whether the node moved.
    pub fn move_node(
        &mut self,
        index: NodeIndex,
        offset: Vec2,
        observer: &mut impl PatchObserver,
    ) -> bool {
        let Some(node) = self.nodes.get_mut(index) else {
            tracing::warn!("Ignoring move of missing node {}", index);
            return false;
        };
        if node.locked {
            return false;
        }
        node.position += offset;
        observer.node_moved(index, node.position);
        true
    }

    /// Wire an output to an input, replacing whatever fed that input.
    ///
    /// This is where "one wire per input" is enforced; storage alone allows
    /// several. Port types are not checked here. Returns `false` without
    /// touching the patch if either end does not resolve.
    pub fn connect(
        &mut self,
        output: OutputId,
        input: InputId,
        observer: &mut impl PatchObserver,
    ) -> bool {
        if self.output(output).is_none() || self.input(input).is_none() {
            tracing::warn!("Ignoring connect {:?} -> {:?}: endpoint missing", output, input);
            return false;
        }

        let wire = Wire::new(output, input);
        let replaced: Vec<Wire> = self.wires_to(input).copied().collect();
        for old in &replaced {
            self.wires.shift_remove(old);
            tracing::debug!("Wire removed: {:?}", old);
            observer.wire_removed(old);
        }

        self.wires.insert(wire);
        tracing::debug!("Wire added: {:?}", wire);
        observer.wire_added(&wire);
        true
    }

    /// Remove a single node and renumber the wires that outlive it.
    ///
    /// Wires still touching the node are dropped and returned alongside it.
    /// Every remaining endpoint above `index` shifts down by one.
    pub fn remove_node(&mut self, index: NodeIndex) -> Option<(Node, Vec<Wire>)> {
        if index >= self.nodes.len() {
            return None;
        }
        let node = self.nodes.remove(index);

        let mut dropped = Vec::new();
        let wires = std::mem::take(&mut self.wires);
        self.wires = wires
            .into_iter()
            .filter(|wire| {
                let touches = wire.involves_node(index);
                if touches {
                    dropped.push(*wire);
                }
                !touches
            })
            .map(|wire| wire.renumbered_after_removal(index))
            .collect();

        tracing::debug!("Node {} ({}) removed, {} wire(s) dropped", index, node.name, dropped.len());
        Some((node, dropped))
    }
}
