// SPDX-License-Identifier: MIT OR Apache-2.0
//! Port definitions for node inputs/outputs.

use crate::node::NodeIndex;
use serde::{Deserialize, Serialize};

/// Position of a port within its node's input or output list.
///
/// Stable for the lifetime of a node; ports are never removed individually.
pub type PortIndex = usize;

/// Kind of data a port carries.
///
/// The patch itself never checks types when wiring; the tag only drives
/// colouring and the compatibility hint used when dropping a dragged wire.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum PortType {
    /// Control-rate value
    #[default]
    Control,
    /// Audio-rate signal
    Signal,
    /// MIDI event stream
    Midi,
    /// Host-defined type
    Custom(String),
}

impl PortType {
    /// Check if a wire from a port of this type may land on `other`
    pub fn can_connect_to(&self, other: &PortType) -> bool {
        self == other
    }
}

/// A named, typed connection point on a node
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Port {
    /// Port name
    pub name: String,
    /// Data type
    pub port_type: PortType,
}

impl Port {
    /// Create a new port
    pub fn new(name: impl Into<String>, port_type: PortType) -> Self {
        Self {
            name: name.into(),
            port_type,
        }
    }

    /// Shorthand for a control port
    pub fn control(name: impl Into<String>) -> Self {
        Self::new(name, PortType::Control)
    }

    /// Shorthand for a signal port
    pub fn signal(name: impl Into<String>) -> Self {
        Self::new(name, PortType::Signal)
    }

    /// Shorthand for a MIDI port
    pub fn midi(name: impl Into<String>) -> Self {
        Self::new(name, PortType::Midi)
    }
}

/// Reference to an input port: (node index, input-port index)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct InputId {
    /// Owning node
    pub node: NodeIndex,
    /// Index into the node's inputs
    pub port: PortIndex,
}

impl InputId {
    /// Create a new input reference
    pub fn new(node: NodeIndex, port: PortIndex) -> Self {
        Self { node, port }
    }
}

/// Reference to an output port: (node index, output-port index)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct OutputId {
    /// Owning node
    pub node: NodeIndex,
    /// Index into the node's outputs
    pub port: PortIndex,
}

impl OutputId {
    /// Create a new output reference
    pub fn new(node: NodeIndex, port: PortIndex) -> Self {
        Self { node, port }
    }
}
