//! Editor settings

use serde::{Deserialize, Serialize};
use shared::Color;

use super::history::DEFAULT_HISTORY_LIMIT;
use crate::scene::ViewMode;

pub const MIN_POLYGON_SIDES: u32 = 3;
pub const MAX_POLYGON_SIDES: u32 = shared::MAX_POLYGON_SIDES;

/// Grid and snapping settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridSettings {
    /// Sketch grid cell size in world units
    pub size: f64,
    /// Snap sketch anchors to the grid
    pub snap: bool,
    /// Show ground grid
    pub ground_visible: bool,
    /// Show axis indicator
    pub axes_visible: bool,
}

impl Default for GridSettings {
    fn default() -> Self {
        Self {
            size: 1.0,
            snap: true,
            ground_visible: true,
            axes_visible: true,
        }
    }
}

/// Sketch tool options
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SketchSettings {
    pub hollow: bool,
    /// Side count for the polygon tool
    pub polygon_sides: u32,
    /// Commit shapes as extruded solids
    pub extrude: bool,
    pub extrude_depth: f64,
}

impl Default for SketchSettings {
    fn default() -> Self {
        Self {
            hollow: false,
            polygon_sides: 6,
            extrude: false,
            extrude_depth: 1.0,
        }
    }
}

impl SketchSettings {
    /// Polygon side count clamped to the range the toolbar offers
    pub fn clamped_sides(&self) -> u32 {
        self.polygon_sides.clamp(MIN_POLYGON_SIDES, MAX_POLYGON_SIDES)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HistorySettings {
    /// Maximum undo depth
    pub limit: usize,
}

impl Default for HistorySettings {
    fn default() -> Self {
        Self {
            limit: DEFAULT_HISTORY_LIMIT,
        }
    }
}

/// Viewport settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewportSettings {
    pub background_color: Color,
    /// Highlight tint of the selected object
    pub selection_color: Color,
    /// Color of newly created objects
    pub default_color: Color,
    pub view_mode: ViewMode,
}

impl Default for ViewportSettings {
    fn default() -> Self {
        Self {
            background_color: Color(0x2b2b2b),
            selection_color: Color(0xffaa33),
            default_color: Color::default(),
            view_mode: ViewMode::Default,
        }
    }
}

/// All editor settings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EditorSettings {
    #[serde(default)]
    pub grid: GridSettings,
    #[serde(default)]
    pub sketch: SketchSettings,
    #[serde(default)]
    pub history: HistorySettings,
    #[serde(default)]
    pub viewport: ViewportSettings,
}

impl EditorSettings {
    fn project_dirs() -> Option<directories::ProjectDirs> {
        directories::ProjectDirs::from("com", "scene-editor", "scene-editor")
    }

    /// Load settings from file, or return default if not found
    pub fn load() -> Self {
        if let Some(dirs) = Self::project_dirs() {
            let config_path = dirs.config_dir().join("settings.json");
            if let Ok(json) = std::fs::read_to_string(&config_path) {
                match serde_json::from_str::<EditorSettings>(&json) {
                    Ok(settings) => return settings.sanitized(),
                    Err(e) => tracing::warn!("ignoring {}: {}", config_path.display(), e),
                }
            }
        }
        Self::default()
    }

    /// Save settings to file
    pub fn save(&self) {
        if let Some(dirs) = Self::project_dirs() {
            let config_dir = dirs.config_dir();
            if std::fs::create_dir_all(config_dir).is_ok() {
                let config_path = config_dir.join("settings.json");
                if let Ok(json) = serde_json::to_string_pretty(self) {
                    if let Err(e) = std::fs::write(&config_path, json) {
                        tracing::warn!("could not save settings: {}", e);
                    }
                }
            }
        }
    }

    /// Replace out-of-range values with usable ones
    pub fn sanitized(mut self) -> Self {
        if !(self.grid.size.is_finite() && self.grid.size > 0.0) {
            self.grid.size = GridSettings::default().size;
        }
        self.sketch.polygon_sides = self.sketch.clamped_sides();
        if !(self.sketch.extrude_depth.is_finite() && self.sketch.extrude_depth >= 0.0) {
            self.sketch.extrude_depth = SketchSettings::default().extrude_depth;
        }
        self.history.limit = self.history.limit.max(1);
        self
    }
}
