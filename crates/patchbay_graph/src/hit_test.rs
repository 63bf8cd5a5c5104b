// SPDX-License-Identifier: MIT OR Apache-2.0
//! Point and rectangle queries against the patch.
//!
//! Nodes are tested topmost first (reverse storage order) and always beat
//! wires. Among wires the most recently inserted one wins.

use crate::config::{WIRE_HIT_RADIUS, WIRE_HIT_SAMPLES};
use crate::geometry::{NodeMetrics, WireCurve};
use crate::node::NodeIndex;
use crate::patch::Patch;
use crate::port::{InputId, OutputId, PortType};
use crate::wire::Wire;
use egui::{Pos2, Rect};
use std::collections::BTreeSet;

/// The element under a point
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitTestResult {
    /// A node's body (title bar or background)
    Node(NodeIndex),
    /// An input port
    Input(InputId),
    /// An output port
    Output(OutputId),
    /// A wire, near its curve
    Wire(Wire),
}

impl Patch {
    /// Find the topmost element at a content-space point
    pub fn hit_test(&self, point: Pos2, metrics: &impl NodeMetrics) -> Option<HitTestResult> {
        self.hit_test_nodes(point, metrics)
            .or_else(|| self.hit_test_wires(point, metrics))
    }

    fn hit_test_nodes(&self, point: Pos2, metrics: &impl NodeMetrics) -> Option<HitTestResult> {
        for (index, node) in self.nodes().iter().enumerate().rev() {
            let input = (0..node.inputs.len()).find(|&port| metrics.input_rect(node, port).contains(point));
            if let Some(port) = input {
                return Some(HitTestResult::Input(InputId::new(index, port)));
            }

            let output = (0..node.outputs.len()).find(|&port| metrics.output_rect(node, port).contains(point));
            if let Some(port) = output {
                return Some(HitTestResult::Output(OutputId::new(index, port)));
            }

            if metrics.node_rect(node).contains(point) {
                return Some(HitTestResult::Node(index));
            }
        }
        None
    }

    fn hit_test_wires(&self, point: Pos2, metrics: &impl NodeMetrics) -> Option<HitTestResult> {
        self.wires()
            .rev()
            .find(|wire| {
                self.wire_curve(wire, metrics).is_some_and(|curve| {
                    curve
                        .points(WIRE_HIT_SAMPLES)
                        .into_iter()
                        .any(|sample| sample.distance(point) < WIRE_HIT_RADIUS)
                })
            })
            .map(|wire| HitTestResult::Wire(*wire))
    }

    /// Centre of an output port, if it exists
    pub fn output_point(&self, output: OutputId, metrics: &impl NodeMetrics) -> Option<Pos2> {
        let node = self.node(output.node)?;
        node.output(output.port)?;
        Some(metrics.output_rect(node, output.port).center())
    }

    /// Centre of an input port, if it exists
    pub fn input_point(&self, input: InputId, metrics: &impl NodeMetrics) -> Option<Pos2> {
        let node = self.node(input.node)?;
        node.input(input.port)?;
        Some(metrics.input_rect(node, input.port).center())
    }

    /// The drawn curve of a wire; `None` for stale wires
    pub fn wire_curve(&self, wire: &Wire, metrics: &impl NodeMetrics) -> Option<WireCurve> {
        let from = self.output_point(wire.output, metrics)?;
        let to = self.input_point(wire.input, metrics)?;
        Some(WireCurve::new(from, to))
    }

    /// Nodes whose body intersects `rect`.
    ///
    /// `rect` may have its corners in any order.
    pub fn selected_in(&self, rect: Rect, metrics: &impl NodeMetrics) -> BTreeSet<NodeIndex> {
        let rect = Rect::from_two_pos(rect.min, rect.max);
        self.nodes()
            .iter()
            .enumerate()
            .filter(|(_, node)| metrics.node_rect(node).intersects(rect))
            .map(|(index, _)| index)
            .collect()
    }

    /// Topmost input port of type `port_type` under `point`
    pub fn find_input(
        &self,
        point: Pos2,
        port_type: &PortType,
        metrics: &impl NodeMetrics,
    ) -> Option<InputId> {
        self.nodes().iter().enumerate().rev().find_map(|(index, node)| {
            node.inputs
                .iter()
                .enumerate()
                .find(|(port, input)| {
                    port_type.can_connect_to(&input.port_type)
                        && metrics.input_rect(node, *port).contains(point)
                })
                .map(|(port, _)| InputId::new(index, port))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LayoutConstants;
    use crate::node::Node;
    use crate::port::Port;

    fn patch_with_pair() -> Patch {
        let mut patch = Patch::new();
        patch.add_node(
            Node::new("osc")
                .with_position(0.0, 0.0)
                .with_input(Port::control("freq"))
                .with_output(Port::signal("out"))
                .with_output(Port::midi("gate")),
        );
        patch.add_node(
            Node::new("out")
                .with_position(600.0, 300.0)
                .with_input(Port::signal("left"))
                .with_input(Port::signal("right")),
        );
        patch
    }

    fn with_ports(inputs: usize, outputs: usize) -> Node {
        let node = (0..inputs).fold(Node::new("n"), |node, _| node.with_input(Port::signal("in")));
        (0..outputs).fold(node, |node, _| node.with_output(Port::signal("out")))
    }

    #[test]
    fn test_point_inside_output_port_hits_port() {
        let layout = LayoutConstants::default();

        for (inputs, outputs) in [(1, 3), (3, 1), (0, 2), (2, 0), (0, 0)] {
            let mut patch = Patch::new();
            patch.add_node(with_ports(inputs, outputs).with_position(30.0, 70.0));
            let node = &patch.nodes()[0];

            for port in 0..outputs {
                let rect = layout.output_rect(node, port);
                for point in [rect.center(), rect.min + egui::vec2(1.0, 1.0), rect.max - egui::vec2(1.0, 1.0)] {
                    assert_eq!(
                        patch.hit_test(point, &layout),
                        Some(HitTestResult::Output(OutputId::new(0, port))),
                        "{} in / {} out, port {}",
                        inputs,
                        outputs,
                        port
                    );
                }
            }

            if outputs == 0 {
                let centre = layout.node_rect(node).center();
                assert_eq!(patch.hit_test(centre, &layout), Some(HitTestResult::Node(0)));
            }
        }
    }

    #[test]
    fn test_later_node_body_covers_output_port() {
        let layout = LayoutConstants::default();
        let mut patch = Patch::new();
        patch.add_node(with_ports(1, 1));
        let port = layout.output_rect(&patch.nodes()[0], 0).center();
        patch.add_node(Node::new("cover").with_position(port.x - 20.0, port.y - 20.0));

        assert_eq!(patch.hit_test(port, &layout), Some(HitTestResult::Node(1)));
    }

    #[test]
    fn test_input_port_and_body() {
        let layout = LayoutConstants::default();
        let patch = patch_with_pair();
        let node = &patch.nodes()[1];

        let input = layout.input_rect(node, 1).center();
        assert_eq!(patch.hit_test(input, &layout), Some(HitTestResult::Input(InputId::new(1, 1))));

        let title = Pos2::new(700.0, 310.0);
        assert_eq!(patch.hit_test(title, &layout), Some(HitTestResult::Node(1)));
        assert_eq!(patch.hit_test(Pos2::new(-50.0, -50.0), &layout), None);
    }

    #[test]
    fn test_later_node_wins_overlap() {
        let layout = LayoutConstants::default();
        let mut patch = Patch::new();
        patch.add_node(Node::new("below").with_position(0.0, 0.0));
        patch.add_node(Node::new("above").with_position(50.0, 10.0));

        assert_eq!(patch.hit_test(Pos2::new(60.0, 20.0), &layout), Some(HitTestResult::Node(1)));
        assert_eq!(patch.hit_test(Pos2::new(10.0, 5.0), &layout), Some(HitTestResult::Node(0)));
    }

    #[test]
    fn test_wire_hit_near_curve() {
        let layout = LayoutConstants::default();
        let mut patch = patch_with_pair();
        let wire = Wire::new(OutputId::new(0, 0), InputId::new(1, 0));
        patch.insert_wire(wire);

        let curve = patch.wire_curve(&wire, &layout).unwrap();
        let middle = curve.point_at(0.5);
        assert_eq!(patch.hit_test(middle, &layout), Some(HitTestResult::Wire(wire)));
        assert_eq!(patch.hit_test(middle + egui::vec2(0.0, 3.0), &layout), Some(HitTestResult::Wire(wire)));
        assert_eq!(patch.hit_test(middle + egui::vec2(0.0, 60.0), &layout), None);
    }

    #[test]
    fn test_latest_wire_wins_tie() {
        let layout = LayoutConstants::default();
        let mut patch = patch_with_pair();
        let first = Wire::new(OutputId::new(0, 0), InputId::new(1, 0));
        let second = Wire::new(OutputId::new(0, 0), InputId::new(1, 1));
        patch.insert_wire(first);
        patch.insert_wire(second);

        // Both wires leave the same output, so just past the port they overlap.
        let near_start = patch.wire_curve(&first, &layout).unwrap().point_at(0.05);
        assert_eq!(patch.hit_test(near_start, &layout), Some(HitTestResult::Wire(second)));

        patch.remove_wire(&second);
        assert_eq!(patch.hit_test(near_start, &layout), Some(HitTestResult::Wire(first)));
    }

    #[test]
    fn test_stale_wire_never_hit() {
        let layout = LayoutConstants::default();
        let mut patch = patch_with_pair();
        let stale = Wire::new(OutputId::new(0, 0), InputId::new(5, 0));
        patch.insert_wire(stale);

        assert!(patch.wire_curve(&stale, &layout).is_none());
        let near_output = patch.output_point(OutputId::new(0, 0), &layout).unwrap() + egui::vec2(30.0, 0.0);
        assert_eq!(patch.hit_test(near_output, &layout), None);
    }

    #[test]
    fn test_selected_in_accepts_reversed_rect() {
        let layout = LayoutConstants::default();
        let patch = patch_with_pair();

        let reversed = Rect::from_min_max(Pos2::new(650.0, 350.0), Pos2::new(-10.0, -10.0));
        assert_eq!(patch.selected_in(reversed, &layout), BTreeSet::from([0, 1]));

        let only_first = Rect::from_min_max(Pos2::new(150.0, 60.0), Pos2::new(100.0, 20.0));
        assert_eq!(patch.selected_in(only_first, &layout), BTreeSet::from([0]));

        let empty_area = Rect::from_min_max(Pos2::new(300.0, 0.0), Pos2::new(400.0, 100.0));
        assert!(patch.selected_in(empty_area, &layout).is_empty());
    }

    #[test]
    fn test_find_input_matches_type() {
        let layout = LayoutConstants::default();
        let patch = patch_with_pair();
        let left = layout.input_rect(&patch.nodes()[1], 0).center();

        assert_eq!(patch.find_input(left, &PortType::Signal, &layout), Some(InputId::new(1, 0)));
        assert_eq!(patch.find_input(left, &PortType::Midi, &layout), None);
    }
}
