// SPDX-License-Identifier: MIT OR Apache-2.0
//! Patch editor core for `Patchbay`.
//!
//! This crate holds everything about a node-graph editor that is not
//! drawing:
//! - The patch model (positional nodes, value-identity wires)
//! - Automatic backward layout and column layout
//! - Hit-testing of ports, nodes and curved wires
//! - The gesture state machine (drag, rewire, rubber-band, delete)
//!
//! ## Architecture
//!
//! The host owns a [`Patch`] and a [`PatchEditorState`], feeds pointer
//! samples into the editor state, and reads both back every frame to draw.
//! Mutations are reported through a [`PatchObserver`]. Node identity is the
//! node's index, so deleting a node renumbers every wire above it.

pub mod config;
pub mod geometry;
pub mod hit_test;
pub mod interaction;
pub mod layout;
pub mod node;
pub mod observer;
pub mod patch;
pub mod port;
pub mod wire;

pub use config::{ConfigError, LayoutConstants};
pub use geometry::{NodeMetrics, WireCurve};
pub use hit_test::HitTestResult;
pub use interaction::{DragState, GestureSample, PatchEditorState};
pub use layout::LayoutResult;
pub use node::{Node, NodeIndex};
pub use observer::{PatchEvent, PatchObserver};
pub use patch::Patch;
pub use port::{InputId, OutputId, Port, PortIndex, PortType};
pub use wire::Wire;
