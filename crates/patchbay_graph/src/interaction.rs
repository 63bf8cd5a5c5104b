// SPDX-License-Identifier: MIT OR Apache-2.0
//! Pointer gesture handling for the patch editor.
//!
//! Features:
//! - Tap vs. drag disambiguation in screen space
//! - Node dragging, including group moves of the selection
//! - Wire creation from outputs and rewiring from connected inputs
//! - Rubber-band selection
//! - Deletion with index renumbering
//!
//! A gesture's meaning is fixed by what was under the pointer when it
//! began. That hit is cached until the gesture ends or is cancelled, and
//! every update reinterprets the pointer relative to it.

use crate::config::{LayoutConstants, MIN_ZOOM, TAP_THRESHOLD};
use crate::geometry::NodeMetrics;
use crate::hit_test::HitTestResult;
use crate::node::NodeIndex;
use crate::observer::PatchObserver;
use crate::patch::Patch;
use crate::port::OutputId;
use crate::wire::Wire;
use egui::{Pos2, Rect, Vec2};
use std::collections::BTreeSet;

/// What the current gesture is doing, for visual feedback
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum DragState {
    /// No drag in progress
    #[default]
    Idle,
    /// A node (and possibly its selection group) is following the pointer
    DraggingNode {
        /// Node grabbed at gesture start
        index: NodeIndex,
        /// Content-space offset from its resting position
        offset: Vec2,
    },
    /// A wire is being dragged out of an output
    DraggingWire {
        /// Output the wire leaves from
        output: OutputId,
        /// Content-space offset from the output's centre to the loose end
        offset: Vec2,
        /// Existing wire being rerouted, hidden while the drag is live
        hidden_wire: Option<Wire>,
    },
    /// Rubber-band selection
    DraggingSelection {
        /// Content-space rectangle, standardized
        rect: Rect,
    },
}

impl DragState {
    /// Check if nothing is being dragged
    pub fn is_idle(&self) -> bool {
        match self {
            Self::Idle => true,
            Self::DraggingNode { .. } | Self::DraggingWire { .. } | Self::DraggingSelection { .. } => false,
        }
    }
}

/// One pointer sample of a drag gesture, in screen space
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GestureSample {
    /// Where the gesture began
    pub start: Pos2,
    /// Where the pointer is now
    pub location: Pos2,
    /// Movement since `start`
    pub translation: Vec2,
    /// Total distance travelled
    pub distance: f32,
}

impl GestureSample {
    /// Build a sample from the start and current locations
    pub fn new(start: Pos2, location: Pos2) -> Self {
        let translation = location - start;
        Self {
            start,
            location,
            translation,
            distance: translation.length(),
        }
    }
}

/// State cached for the lifetime of one gesture
#[derive(Debug, Clone, Copy)]
struct Gesture {
    /// Element under the pointer at gesture start
    hit: Option<HitTestResult>,
    /// Gesture start in content space
    start: Pos2,
}

/// Patch editor interaction state
#[derive(Debug, Clone)]
pub struct PatchEditorState<M: NodeMetrics = LayoutConstants> {
    /// Node and port measurements
    pub metrics: M,
    /// Pan offset (content space)
    pub pan: Vec2,
    /// Zoom level; values below [`MIN_ZOOM`] are treated as `MIN_ZOOM`
    pub zoom: f32,
    /// Selected nodes
    pub selected_nodes: BTreeSet<NodeIndex>,
    /// Selected wires
    pub selected_wires: BTreeSet<Wire>,
    /// Current drag
    drag: DragState,
    /// Live gesture, if any
    gesture: Option<Gesture>,
}

impl Default for PatchEditorState<LayoutConstants> {
    fn default() -> Self {
        Self::new(LayoutConstants::default())
    }
}

impl<M: NodeMetrics> PatchEditorState<M> {
    /// Create a new editor state
    pub fn new(metrics: M) -> Self {
        Self {
            metrics,
            pan: Vec2::ZERO,
            zoom: 1.0,
            selected_nodes: BTreeSet::new(),
            selected_wires: BTreeSet::new(),
            drag: DragState::Idle,
            gesture: None,
        }
    }

    fn effective_zoom(&self) -> f32 {
        self.zoom.max(MIN_ZOOM)
    }

    /// Convert screen position to content position
    pub fn screen_to_content(&self, screen: Pos2) -> Pos2 {
        let zoom = self.effective_zoom();
        Pos2::new(screen.x / zoom, screen.y / zoom) - self.pan
    }

    /// Convert content position to screen position
    pub fn content_to_screen(&self, content: Pos2) -> Pos2 {
        let zoom = self.effective_zoom();
        let shifted = content + self.pan;
        Pos2::new(shifted.x * zoom, shifted.y * zoom)
    }

    /// Convert a screen-space offset to content space
    pub fn screen_to_content_vec(&self, screen: Vec2) -> Vec2 {
        screen / self.effective_zoom()
    }

    /// Current drag state
    pub fn drag(&self) -> &DragState {
        &self.drag
    }

    /// Check if a gesture has begun and not yet ended
    pub fn is_gesture_active(&self) -> bool {
        self.gesture.is_some()
    }

    /// Clear selection
    pub fn clear_selection(&mut self) {
        self.selected_nodes.clear();
        self.selected_wires.clear();
    }

    /// Replace the selection with a single node
    pub fn select_node(&mut self, index: NodeIndex) {
        self.selected_wires.clear();
        self.selected_nodes = BTreeSet::from([index]);
    }

    /// Replace the selection with a single wire
    pub fn select_wire(&mut self, wire: Wire) {
        self.selected_nodes.clear();
        self.selected_wires = BTreeSet::from([wire]);
    }

    /// Start a gesture.
    ///
    /// A gesture that is still live is cancelled first.
    pub fn gesture_begin(&mut self, patch: &Patch, sample: GestureSample) {
        if self.gesture.is_some() {
            tracing::trace!("Gesture began while another was live; cancelling it");
            self.cancel_gesture();
        }

        let start = self.screen_to_content(sample.start);
        let hit = patch.hit_test(start, &self.metrics);
        tracing::trace!("Gesture began at {:?}, hit {:?}", start, hit);

        let gesture = Gesture { hit, start };
        self.gesture = Some(gesture);
        self.drag = self.drag_state_for(patch, gesture, sample);
    }

    /// Feed a pointer sample. Ignored without a live gesture.
    pub fn gesture_update(&mut self, patch: &Patch, sample: GestureSample) {
        let Some(gesture) = self.gesture else {
            return;
        };
        self.drag = self.drag_state_for(patch, gesture, sample);
    }

    /// Finish the gesture and commit it to the patch.
    ///
    /// Travel under [`TAP_THRESHOLD`] screen units is a tap; anything
    /// further is a drag. Ignored without a live gesture.
    pub fn gesture_end(
        &mut self,
        patch: &mut Patch,
        sample: GestureSample,
        observer: &mut impl PatchObserver,
    ) {
        let Some(gesture) = self.gesture.take() else {
            return;
        };
        self.drag = DragState::Idle;

        if sample.distance >= TAP_THRESHOLD {
            self.commit_drag(patch, gesture, sample, observer);
        } else {
            self.apply_tap(gesture.hit);
        }
    }

    /// Abandon the live gesture without touching the patch or selection
    pub fn cancel_gesture(&mut self) {
        if self.gesture.take().is_some() {
            tracing::trace!("Gesture cancelled");
        }
        self.drag = DragState::Idle;
    }

    /// Plain click: replace the selection with whatever is under `screen`
    pub fn tap(&mut self, patch: &Patch, screen: Pos2) {
        let hit = patch.hit_test(self.screen_to_content(screen), &self.metrics);
        self.apply_tap(hit);
    }

    /// Modified click: toggle whatever node or wire is under `screen`
    pub fn modified_click(&mut self, patch: &Patch, screen: Pos2) {
        match patch.hit_test(self.screen_to_content(screen), &self.metrics) {
            Some(HitTestResult::Node(index)) => {
                if !self.selected_nodes.remove(&index) {
                    self.selected_nodes.insert(index);
                }
            }
            Some(HitTestResult::Wire(wire)) => {
                if !self.selected_wires.remove(&wire) {
                    self.selected_wires.insert(wire);
                }
            }
            Some(HitTestResult::Input(_) | HitTestResult::Output(_)) | None => {}
        }
    }

    /// Delete the selected wires and nodes, then clear the selection.
    ///
    /// Wires attached to deleted nodes go with them. Nodes are removed
    /// highest index first, renumbering the surviving wires after each one.
    pub fn delete_selected(&mut self, patch: &mut Patch, observer: &mut impl PatchObserver) {
        // Cached hits may name indices that are about to shift.
        self.cancel_gesture();

        for wire in std::mem::take(&mut self.selected_wires) {
            if patch.remove_wire(&wire) {
                observer.wire_removed(&wire);
            }
        }

        let nodes = std::mem::take(&mut self.selected_nodes);
        let attached: Vec<Wire> = patch
            .wires()
            .filter(|w| nodes.contains(&w.output.node) || nodes.contains(&w.input.node))
            .copied()
            .collect();
        for wire in &attached {
            patch.remove_wire(wire);
            observer.wire_removed(wire);
        }

        let mut removed = Vec::with_capacity(nodes.len());
        for &index in nodes.iter().rev() {
            let Some((_, dropped)) = patch.remove_node(index) else {
                tracing::warn!("Selected node {} no longer exists", index);
                continue;
            };
            for wire in &dropped {
                observer.wire_removed(wire);
            }
            removed.push(index);
        }

        if !removed.is_empty() {
            tracing::debug!("Deleted nodes {:?}", removed);
            observer.nodes_deleted(&removed);
        }
    }

    /// Offset at which to draw a node while it is being dragged.
    ///
    /// Covers the grabbed node and, when it is selected, the rest of the
    /// selection. Locked nodes never get an offset.
    pub fn node_drag_offset(&self, patch: &Patch, index: NodeIndex) -> Option<Vec2> {
        let DragState::DraggingNode { index: grabbed, offset } = self.drag else {
            return None;
        };
        if patch.node(index).map_or(true, |node| node.locked) {
            return None;
        }
        let in_group = self.selected_nodes.contains(&grabbed) && self.selected_nodes.contains(&index);
        (index == grabbed || in_group).then_some(offset)
    }

    /// Check if a wire should be left out of normal drawing
    pub fn is_wire_hidden(&self, wire: &Wire) -> bool {
        matches!(self.drag, DragState::DraggingWire { hidden_wire: Some(hidden), .. } if hidden == *wire)
    }

    /// Endpoints (content space) of the wire being dragged
    pub fn live_wire(&self, patch: &Patch) -> Option<(Pos2, Pos2)> {
        let DragState::DraggingWire { output, offset, .. } = self.drag else {
            return None;
        };
        let from = patch.output_point(output, &self.metrics)?;
        Some((from, from + offset))
    }

    /// Rubber-band rectangle (content space) while selecting
    pub fn selection_rect(&self) -> Option<Rect> {
        match self.drag {
            DragState::DraggingSelection { rect } => Some(rect),
            DragState::Idle | DragState::DraggingNode { .. } | DragState::DraggingWire { .. } => None,
        }
    }

    fn drag_state_for(&self, patch: &Patch, gesture: Gesture, sample: GestureSample) -> DragState {
        let translation = self.screen_to_content_vec(sample.translation);
        match gesture.hit {
            None => DragState::DraggingSelection {
                rect: Rect::from_two_pos(gesture.start, self.screen_to_content(sample.location)),
            },
            Some(HitTestResult::Node(index)) => DragState::DraggingNode {
                index,
                offset: translation,
            },
            Some(HitTestResult::Output(output)) => DragState::DraggingWire {
                output,
                offset: translation,
                hidden_wire: None,
            },
            Some(HitTestResult::Input(input)) => {
                let Some(wire) = patch.attached_wire(input) else {
                    return DragState::Idle;
                };
                let from = patch.output_point(wire.output, &self.metrics);
                let to = patch.input_point(input, &self.metrics);
                match (from, to) {
                    (Some(from), Some(to)) => DragState::DraggingWire {
                        output: wire.output,
                        offset: to - from + translation,
                        hidden_wire: Some(wire),
                    },
                    _ => DragState::Idle,
                }
            }
            Some(HitTestResult::Wire(_)) => DragState::Idle,
        }
    }

    fn commit_drag(
        &mut self,
        patch: &mut Patch,
        gesture: Gesture,
        sample: GestureSample,
        observer: &mut impl PatchObserver,
    ) {
        let location = self.screen_to_content(sample.location);
        let translation = self.screen_to_content_vec(sample.translation);

        match gesture.hit {
            None => {
                let rect = Rect::from_two_pos(gesture.start, location);
                self.selected_nodes = patch.selected_in(rect, &self.metrics);
                tracing::debug!("Rubber-band selected {:?}", self.selected_nodes);
            }
            Some(HitTestResult::Node(index)) => {
                patch.move_node(index, translation, observer);
                if self.selected_nodes.contains(&index) {
                    for &other in self.selected_nodes.iter().filter(|&&other| other != index) {
                        patch.move_node(other, translation, observer);
                    }
                }
            }
            Some(HitTestResult::Output(output)) => {
                let Some(port_type) = patch.output(output).map(|port| port.port_type.clone()) else {
                    return;
                };
                if let Some(input) = patch.find_input(location, &port_type, &self.metrics) {
                    patch.connect(output, input, observer);
                }
            }
            Some(HitTestResult::Input(input)) => {
                let Some(wire) = patch.attached_wire(input) else {
                    return;
                };
                let port_type = patch.input(input).map(|port| port.port_type.clone());
                patch.remove_wire(&wire);
                tracing::debug!("Wire detached: {:?}", wire);
                observer.wire_removed(&wire);

                let target = port_type.and_then(|ty| patch.find_input(location, &ty, &self.metrics));
                if let Some(target) = target {
                    patch.connect(wire.output, target, observer);
                }
            }
            Some(HitTestResult::Wire(_)) => {}
        }
    }

    fn apply_tap(&mut self, hit: Option<HitTestResult>) {
        match hit {
            None => self.clear_selection(),
            Some(HitTestResult::Node(index)) => self.select_node(index),
            Some(HitTestResult::Wire(wire)) => self.select_wire(wire),
            Some(HitTestResult::Input(_) | HitTestResult::Output(_)) => {}
        }
    }
}
