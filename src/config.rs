use serde::{Deserialize, Serialize};

use crate::error::PlotResult;
use crate::measure::Projection;

/// Whether the plot can be edited or only looked at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlotMode {
    Edit,
    #[default]
    View,
}

/// Construction options of a [`crate::Plot`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)] // missing fields fall back to their defaults
pub struct PlotOptions {
    pub mode: PlotMode,
    /// Projection the host map's coordinates are in, used for measuring.
    pub projection: Projection,
    /// Icon given to POINT elements drawn without one.
    pub default_icon: String,
}

impl Default for PlotOptions {
    fn default() -> Self {
        Self {
            mode: PlotMode::View,
            projection: Projection::default(),
            default_icon: "qidian".to_owned(),
        }
    }
}

impl PlotOptions {
    pub fn edit() -> Self {
        Self {
            mode: PlotMode::Edit,
            ..Self::default()
        }
    }

    pub fn with_projection(mut self, projection: Projection) -> Self {
        self.projection = projection;
        self
    }

    pub fn from_json(json: &str) -> PlotResult<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_keeps_defaults() {
        let options = PlotOptions::from_json(r#"{ "mode": "edit" }"#).unwrap();
        assert_eq!(options.mode, PlotMode::Edit);
        assert_eq!(options.projection, Projection::WebMercator);
        assert_eq!(options.default_icon, "qidian");
    }

    #[test]
    fn projection_uses_kebab_case() {
        let options = PlotOptions::from_json(r#"{ "projection": "planar" }"#).unwrap();
        assert_eq!(options.projection, Projection::Planar);
        assert_eq!(options.mode, PlotMode::View);
    }
}
