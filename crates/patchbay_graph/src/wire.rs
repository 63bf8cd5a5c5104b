// SPDX-License-Identifier: MIT OR Apache-2.0
//! Wire (edge) definitions for the patch.

use crate::node::NodeIndex;
use crate::port::{InputId, OutputId};
use serde::{Deserialize, Serialize};

/// A directed connection from an output port to an input port.
///
/// Wires have no id of their own; two wires are the same wire when both
/// endpoints match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Wire {
    /// Source output
    pub output: OutputId,
    /// Destination input
    pub input: InputId,
}

impl Wire {
    /// Create a new wire
    pub fn new(output: OutputId, input: InputId) -> Self {
        Self { output, input }
    }

    /// Check if this wire touches a specific node at either end
    pub fn involves_node(&self, node: NodeIndex) -> bool {
        self.output.node == node || self.input.node == node
    }

    /// Shift both endpoints down by one if they sit above `removed`.
    ///
    /// Endpoints equal to `removed` are left alone; callers purge those first.
    pub fn renumbered_after_removal(self, removed: NodeIndex) -> Self {
        let shift = |node: NodeIndex| if node > removed { node - 1 } else { node };
        Self {
            output: OutputId::new(shift(self.output.node), self.output.port),
            input: InputId::new(shift(self.input.node), self.input.port),
        }
    }
}
