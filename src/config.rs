//! Interaction configuration: drag mode, click mode, select direction, the
//! gesture thresholds and the dimming style.
//!
//! Everything is serde-(de)serializable so a host can keep it in a JSON or
//! YAML file next to its other settings.

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::geometry::SelectDirection;

// ─────────────────────────────────────────────────────────────────────────────
// DragMode
// ─────────────────────────────────────────────────────────────────────────────

/// What a pointer drag on the plot area does.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DragMode {
    #[default]
    Zoom,
    Pan,
    Select,
    Lasso,
    Orbit,
    Turntable,
    /// Dragging is disabled.
    #[serde(rename = "false")]
    Disabled,
}

impl DragMode {
    /// `select` or `lasso`: drags draw selection regions.
    pub fn is_selection(self) -> bool {
        matches!(self, DragMode::Select | DragMode::Lasso)
    }
}

impl fmt::Display for DragMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            DragMode::Zoom => "zoom",
            DragMode::Pan => "pan",
            DragMode::Select => "select",
            DragMode::Lasso => "lasso",
            DragMode::Orbit => "orbit",
            DragMode::Turntable => "turntable",
            DragMode::Disabled => "false",
        };
        write!(f, "{}", s)
    }
}

impl FromStr for DragMode {
    type Err = ConfigError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "zoom" => Ok(DragMode::Zoom),
            "pan" => Ok(DragMode::Pan),
            "select" => Ok(DragMode::Select),
            "lasso" => Ok(DragMode::Lasso),
            "orbit" => Ok(DragMode::Orbit),
            "turntable" => Ok(DragMode::Turntable),
            "false" => Ok(DragMode::Disabled),
            other => Err(ConfigError::InvalidDragMode(other.to_string())),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// ClickMode
// ─────────────────────────────────────────────────────────────────────────────

/// Flag list controlling what a click does: `"event"`, `"select"`,
/// `"event+select"` or `"none"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ClickMode {
    /// Clicks emit events.
    pub event: bool,
    /// Clicks change the selection.
    pub select: bool,
}

impl ClickMode {
    pub const NONE: ClickMode = ClickMode {
        event: false,
        select: false,
    };
    pub const EVENT: ClickMode = ClickMode {
        event: true,
        select: false,
    };
    pub const SELECT: ClickMode = ClickMode {
        event: false,
        select: true,
    };
    pub const EVENT_SELECT: ClickMode = ClickMode {
        event: true,
        select: true,
    };
}

impl Default for ClickMode {
    fn default() -> Self {
        ClickMode::EVENT
    }
}

impl fmt::Display for ClickMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match (self.event, self.select) {
            (true, true) => "event+select",
            (true, false) => "event",
            (false, true) => "select",
            (false, false) => "none",
        };
        write!(f, "{}", s)
    }
}

impl FromStr for ClickMode {
    type Err = ConfigError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("none") {
            return Ok(ClickMode::NONE);
        }
        let mut mode = ClickMode::NONE;
        for flag in s.split('+') {
            match flag.trim().to_lowercase().as_str() {
                "event" => mode.event = true,
                "select" => mode.select = true,
                _ => return Err(ConfigError::InvalidClickMode(s.to_string())),
            }
        }
        Ok(mode)
    }
}

impl TryFrom<String> for ClickMode {
    type Error = ConfigError;
    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<ClickMode> for String {
    fn from(m: ClickMode) -> Self {
        m.to_string()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Interaction constants
// ─────────────────────────────────────────────────────────────────────────────

/// Gesture thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InteractionConstants {
    /// Max time between two clicks of a double click. Default: `300.0`.
    pub double_click_delay_ms: f64,
    /// Pointer travel below which a press/release is a click. Default: `8.0`.
    pub min_drag_px: f32,
    /// Thickness below which an `any` box collapses into a band. Default: `12.0`.
    pub min_select_px: f32,
    /// Minimum spacing of `selecting` updates. Default: `100.0`.
    pub select_throttle_ms: f64,
    /// Click hit radius. Default: `20.0`.
    pub hover_distance_px: f32,
    /// Full width of the band drawn by `selectdirection = d`. Default: `12.0`.
    pub diagonal_band_px: f32,
}

impl Default for InteractionConstants {
    fn default() -> Self {
        Self {
            double_click_delay_ms: 300.0,
            min_drag_px: 8.0,
            min_select_px: 12.0,
            select_throttle_ms: 100.0,
            hover_distance_px: 20.0,
            diagonal_band_px: 12.0,
        }
    }
}

/// Opacity applied to items while their trace has a selection.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DimStyle {
    pub selected_opacity: f32,
    pub unselected_opacity: f32,
}

impl Default for DimStyle {
    fn default() -> Self {
        Self {
            selected_opacity: 1.0,
            unselected_opacity: 0.2,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// SelectConfig
// ─────────────────────────────────────────────────────────────────────────────

/// Complete interaction configuration of one chart.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SelectConfig {
    pub dragmode: DragMode,
    pub clickmode: ClickMode,
    pub selectdirection: SelectDirection,
    pub constants: InteractionConstants,
    pub dim: DimStyle,
}

impl SelectConfig {
    pub fn from_json_str(s: &str) -> Result<Self, ConfigError> {
        let cfg: SelectConfig = serde_json::from_str(s)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn from_yaml_str(s: &str) -> Result<Self, ConfigError> {
        let cfg: SelectConfig = serde_yaml::from_str(s)?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Load from a `.json`, `.yaml` or `.yml` file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let format = Format::of(path)?;
        let s = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let cfg = match format {
            Format::Json => Self::from_json_str(&s)?,
            Format::Yaml => Self::from_yaml_str(&s)?,
        };
        tracing::debug!(path = %path.display(), "loaded selection config");
        Ok(cfg)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();
        let s = match Format::of(path)? {
            Format::Json => serde_json::to_string_pretty(self)?,
            Format::Yaml => serde_yaml::to_string(self)?,
        };
        std::fs::write(path, s).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Reject constants that are negative or not finite, a zero drag
    /// threshold (no press could stay a click), and opacities outside
    /// `[0, 1]`.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let c = &self.constants;
        let checks: [(&'static str, f64); 6] = [
            ("double_click_delay_ms", c.double_click_delay_ms),
            ("min_drag_px", c.min_drag_px as f64),
            ("min_select_px", c.min_select_px as f64),
            ("select_throttle_ms", c.select_throttle_ms),
            ("hover_distance_px", c.hover_distance_px as f64),
            ("diagonal_band_px", c.diagonal_band_px as f64),
        ];
        for (name, value) in checks {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::InvalidConstant { name, value });
            }
        }
        if c.min_drag_px <= 0.0 {
            return Err(ConfigError::InvalidConstant {
                name: "min_drag_px",
                value: c.min_drag_px as f64,
            });
        }
        for (name, value) in [
            ("selected_opacity", self.dim.selected_opacity as f64),
            ("unselected_opacity", self.dim.unselected_opacity as f64),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::InvalidConstant { name, value });
            }
        }
        Ok(())
    }
}

enum Format {
    Json,
    Yaml,
}

impl Format {
    fn of(path: &Path) -> Result<Self, ConfigError> {
        match path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .as_deref()
        {
            Some("json") => Ok(Format::Json),
            Some("yaml") | Some("yml") => Ok(Format::Yaml),
            _ => Err(ConfigError::UnknownFormat(path.to_path_buf())),
        }
    }
}
