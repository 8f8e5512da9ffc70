use crate::EditorError;
use influence_graph::{MinimapMetrics, RenderMetrics, ScaleLimits, Vec2};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// What happens to the view when a document is loaded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoadViewPolicy {
    /// Use the stored view, or identity when the document has none.
    #[default]
    FromSnapshot,
    Reset,
    Preserve,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViewportSize {
    pub width: f64,
    pub height: f64,
}

impl Default for ViewportSize {
    fn default() -> Self {
        Self {
            width: 1000.0,
            height: 680.0,
        }
    }
}

impl From<ViewportSize> for Vec2 {
    fn from(size: ViewportSize) -> Self {
        Vec2::new(size.width, size.height)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorSettings {
    /// Node radius in screen pixels; also the pick radius.
    pub node_radius: f64,
    /// Edge pick band in screen pixels.
    pub edge_tolerance: f64,
    pub grid_step: f64,
    pub snap_enabled: bool,
    pub min_scale: f64,
    pub max_scale: f64,
    pub zoom_step: f64,
    pub weight_min: f64,
    pub weight_max: f64,
    pub default_weight: f64,
    /// Maximum undo entries; 0 keeps everything.
    pub history_limit: usize,
    pub max_prompt_attempts: u32,
    pub load_view_policy: LoadViewPolicy,
    pub viewport: ViewportSize,
    pub minimap: MinimapMetrics,
    pub grid_min_screen_step: f64,
}

impl Default for EditorSettings {
    fn default() -> Self {
        Self {
            node_radius: 12.0,
            edge_tolerance: 8.0,
            grid_step: 24.0,
            snap_enabled: true,
            min_scale: 0.2,
            max_scale: 5.0,
            zoom_step: 1.1,
            weight_min: -10.0,
            weight_max: 10.0,
            default_weight: 1.0,
            history_limit: 500,
            max_prompt_attempts: 3,
            load_view_policy: LoadViewPolicy::default(),
            viewport: ViewportSize::default(),
            minimap: MinimapMetrics::default(),
            grid_min_screen_step: 12.0,
        }
    }
}

impl EditorSettings {
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("influence").join("settings.json"))
    }

    /// Load from the user config directory, falling back to defaults.
    pub fn load() -> Self {
        let Some(path) = Self::default_path() else {
            tracing::info!("No config directory, using default settings");
            return Self::default();
        };
        if !path.exists() {
            tracing::info!("Settings file not found, using defaults");
            return Self::default();
        }
        tracing::info!("Loading settings from {:?}", path);
        match Self::load_from(&path) {
            Ok(settings) => settings,
            Err(e) => {
                tracing::warn!("Failed to load settings: {}", e);
                Self::default()
            }
        }
    }

    pub fn load_from(path: &Path) -> Result<Self, EditorError> {
        let content = std::fs::read_to_string(path)?;
        let settings = serde_json::from_str(&content).map_err(EditorError::Settings)?;
        Ok(settings)
    }

    pub fn save_to(&self, path: &Path) -> Result<(), EditorError> {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(self).map_err(EditorError::Settings)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn save(&self) -> Result<(), EditorError> {
        match Self::default_path() {
            Some(path) => self.save_to(&path),
            None => {
                tracing::warn!("No config directory, settings not saved");
                Ok(())
            }
        }
    }

    pub fn scale_limits(&self) -> ScaleLimits {
        ScaleLimits::new(self.min_scale, self.max_scale)
    }

    pub fn render_metrics(&self) -> RenderMetrics {
        RenderMetrics {
            node_radius: self.node_radius,
            grid_step: self.grid_step,
            grid_min_screen_step: self.grid_min_screen_step,
            viewport: self.viewport.into(),
        }
    }

    pub fn weight_in_range(&self, weight: f64) -> bool {
        weight.is_finite() && weight >= self.weight_min && weight <= self.weight_max
    }
}
