// SPDX-License-Identifier: MIT OR Apache-2.0
//! Node, port and wire geometry.
//!
//! Everything here works in content space. Screen-space conversion belongs
//! to the editor state (see [`crate::interaction::PatchEditorState`]).

use crate::config::{LayoutConstants, WIRE_CONTROL_FACTOR};
use crate::node::Node;
use crate::port::PortIndex;
use egui::{Pos2, Rect, Vec2};

/// Measures nodes and ports.
///
/// Hosts that draw nodes differently can implement this to keep layout and
/// hit-testing in sync with what is on screen. [`LayoutConstants`] is the
/// stock implementation.
pub trait NodeMetrics {
    /// Horizontal extent of a node, used for column placement
    fn node_width(&self) -> f32;

    /// Gap left between laid-out nodes
    fn node_spacing(&self) -> f32;

    /// Bounding rectangle of a node's body
    fn node_rect(&self, node: &Node) -> Rect;

    /// Rectangle of an input port, whether or not the port exists
    fn input_rect(&self, node: &Node, port: PortIndex) -> Rect;

    /// Rectangle of an output port, whether or not the port exists
    fn output_rect(&self, node: &Node, port: PortIndex) -> Rect;
}

impl LayoutConstants {
    fn port_row_y(&self, port: PortIndex) -> f32 {
        self.title_height + port as f32 * (self.port_size.y + self.port_spacing) + self.port_spacing
    }
}

impl NodeMetrics for LayoutConstants {
    fn node_width(&self) -> f32 {
        self.node_width
    }

    fn node_spacing(&self) -> f32 {
        self.node_spacing
    }

    fn node_rect(&self, node: &Node) -> Rect {
        let rows = node.port_rows() as f32;
        let height = self.title_height + rows * (self.port_size.y + self.port_spacing) + self.port_spacing;
        Rect::from_min_size(node.position, Vec2::new(self.node_width, height))
    }

    fn input_rect(&self, node: &Node, port: PortIndex) -> Rect {
        let offset = Vec2::new(self.port_spacing, self.port_row_y(port));
        Rect::from_min_size(node.position + offset, self.port_size)
    }

    fn output_rect(&self, node: &Node, port: PortIndex) -> Rect {
        let x = self.node_width - self.port_spacing - self.port_size.x;
        let offset = Vec2::new(x, self.port_row_y(port));
        Rect::from_min_size(node.position + offset, self.port_size)
    }
}

/// Cubic Bézier used to draw and hit-test a wire
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WireCurve {
    /// Start point (output port centre)
    pub from: Pos2,
    /// First control point
    pub ctrl1: Pos2,
    /// Second control point
    pub ctrl2: Pos2,
    /// End point (input port centre)
    pub to: Pos2,
}

impl WireCurve {
    /// Build the curve between two endpoints.
    ///
    /// Control points sit horizontally `0.4 * |dx|` out from each end, so a
    /// wire always leaves an output to the right and enters an input from the left.
    pub fn new(from: Pos2, to: Pos2) -> Self {
        let d = WIRE_CONTROL_FACTOR * (to.x - from.x).abs();
        Self {
            from,
            ctrl1: Pos2::new(from.x + d, from.y),
            ctrl2: Pos2::new(to.x - d, to.y),
            to,
        }
    }

    /// Evaluate the curve at `t` in `[0, 1]`
    pub fn point_at(&self, t: f32) -> Pos2 {
        let t2 = t * t;
        let t3 = t2 * t;
        let mt = 1.0 - t;
        let mt2 = mt * mt;
        let mt3 = mt2 * mt;

        let x = mt3 * self.from.x + 3.0 * mt2 * t * self.ctrl1.x + 3.0 * mt * t2 * self.ctrl2.x + t3 * self.to.x;
        let y = mt3 * self.from.y + 3.0 * mt2 * t * self.ctrl1.y + 3.0 * mt * t2 * self.ctrl2.y + t3 * self.to.y;
        Pos2::new(x, y)
    }

    /// `samples` evenly spaced points from start to end, both included
    pub fn points(&self, samples: usize) -> Vec<Pos2> {
        match samples {
            0 => Vec::new(),
            1 => vec![self.from],
            n => {
                let segments = (n - 1) as f32;
                (0..n).map(|i| self.point_at(i as f32 / segments)).collect()
            }
        }
    }
}
