// SPDX-License-Identifier: MIT OR Apache-2.0
//! Node definitions for the patch.

use crate::port::{Port, PortIndex};
use egui::{Color32, Pos2};
use serde::{Deserialize, Serialize};

/// Position of a node in the patch's node list.
///
/// This is the node's only identity. Removing node `k` shifts every node
/// after it down by one, so indices held across a deletion go stale.
pub type NodeIndex = usize;

/// A positioned box with ordered input and output ports
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    /// Display name
    pub name: String,
    /// Top-left corner in content space
    pub position: Pos2,
    /// Input ports, top to bottom
    pub inputs: Vec<Port>,
    /// Output ports, top to bottom
    pub outputs: Vec<Port>,
    /// Locked nodes ignore move requests
    pub locked: bool,
    /// Title bar colour
    pub color: Color32,
}

impl Node {
    /// Create a new node at the origin with no ports
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            position: Pos2::ZERO,
            inputs: Vec::new(),
            outputs: Vec::new(),
            locked: false,
            color: Color32::from_gray(80),
        }
    }

    /// Set the position
    pub fn with_position(mut self, x: f32, y: f32) -> Self {
        self.position = Pos2::new(x, y);
        self
    }

    /// Append an input port
    pub fn with_input(mut self, port: Port) -> Self {
        self.inputs.push(port);
        self
    }

    /// Append an output port
    pub fn with_output(mut self, port: Port) -> Self {
        self.outputs.push(port);
        self
    }

    /// Mark the node as locked in place
    pub fn locked(mut self) -> Self {
        self.locked = true;
        self
    }

    /// Set the title bar colour
    pub fn with_color(mut self, color: Color32) -> Self {
        self.color = color;
        self
    }

    /// Get an input port by index
    pub fn input(&self, index: PortIndex) -> Option<&Port> {
        self.inputs.get(index)
    }

    /// Get an output port by index
    pub fn output(&self, index: PortIndex) -> Option<&Port> {
        self.outputs.get(index)
    }

    /// Number of port rows the node body has to fit
    pub fn port_rows(&self) -> usize {
        self.inputs.len().max(self.outputs.len())
    }
}
