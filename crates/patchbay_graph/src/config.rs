// SPDX-License-Identifier: MIT OR Apache-2.0
//! Layout constants and their on-disk form.
//!
//! Constants are stored as RON. Missing fields fall back to the defaults,
//! so a file only needs to list what it overrides:
//!
//! ```ron
//! LayoutConstants(
//!     node_width: 240.0,
//!     port_size: (x: 16.0, y: 16.0),
//! )
//! ```

use egui::Vec2;
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Pointer travel (screen space) below which a gesture counts as a tap
pub const TAP_THRESHOLD: f32 = 5.0;

/// Maximum distance (content space) from a wire sample that still hits the wire
pub const WIRE_HIT_RADIUS: f32 = 8.0;

/// Number of points sampled along a wire for hit-testing
pub const WIRE_HIT_SAMPLES: usize = 21;

/// Horizontal Bézier control offset as a fraction of the endpoints' x distance
pub const WIRE_CONTROL_FACTOR: f32 = 0.4;

/// Smallest zoom factor used when converting screen to content space
pub const MIN_ZOOM: f32 = 0.1;

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Reading or writing the file failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The file is not valid RON for this type
    #[error("Parse error: {0}")]
    Parse(#[from] ron::error::SpannedError),

    /// Encoding to RON failed
    #[error("Serialization error: {0}")]
    Serialize(#[from] ron::Error),
}

/// Result type for configuration operations
pub type Result<T> = std::result::Result<T, ConfigError>;

/// Geometry shared by layout, hit-testing and rendering
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConstants {
    /// Width of every node
    pub node_width: f32,
    /// Gap between laid-out nodes, horizontally and vertically
    pub node_spacing: f32,
    /// Height of the title bar
    pub title_height: f32,
    /// Size of a port's square
    pub port_size: Vec2,
    /// Gap between port rows and around the port column
    pub port_spacing: f32,
    /// Node corner rounding
    pub corner_radius: f32,
}

impl Default for LayoutConstants {
    fn default() -> Self {
        Self {
            node_width: 200.0,
            node_spacing: 40.0,
            title_height: 40.0,
            port_size: Vec2::new(20.0, 20.0),
            port_spacing: 10.0,
            corner_radius: 5.0,
        }
    }
}

impl LayoutConstants {
    /// Parse constants from a RON string
    pub fn from_ron(source: &str) -> Result<Self> {
        Ok(ron::from_str(source)?)
    }

    /// Encode constants as pretty-printed RON
    pub fn to_ron(&self) -> Result<String> {
        let config = ron::ser::PrettyConfig::default()
            .struct_names(true)
            .enumerate_arrays(false);
        Ok(ron::ser::to_string_pretty(self, config)?)
    }

    /// Load constants from a RON file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let constants = Self::from_ron(&content)?;
        tracing::debug!("Loaded layout constants from {:?}", path);
        Ok(constants)
    }

    /// Save constants to a RON file
    pub fn save(&self, path: &Path) -> Result<()> {
        std::fs::write(path, self.to_ron()?)?;
        Ok(())
    }
}
