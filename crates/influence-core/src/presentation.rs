//! Presentation attributes carried by nodes and edges.
//!
//! The core never interprets these values; they travel through snapshots and
//! undo history untouched and are handed to the renderer as-is.

use crate::ModelError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum NodeShape {
    #[default]
    Ellipse,
    Rect,
    Diamond,
}

impl FromStr for NodeShape {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "ellipse" | "circle" => Ok(NodeShape::Ellipse),
            "rect" | "rectangle" => Ok(NodeShape::Rect),
            "diamond" => Ok(NodeShape::Diamond),
            _ => Err(ModelError::UnknownShape(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum EdgeStyle {
    #[default]
    Solid,
    Dashed,
}

impl FromStr for EdgeStyle {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "solid" => Ok(EdgeStyle::Solid),
            "dashed" => Ok(EdgeStyle::Dashed),
            _ => Err(ModelError::UnknownEdgeStyle(s.to_string())),
        }
    }
}

/// A `#rgb` / `#rrggbb` color string.
///
/// [`Color::parse`] validates user input. Values read back from a snapshot are
/// accepted verbatim so that documents written by other tools still load.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Color(String);

impl Color {
    pub fn parse(input: &str) -> Result<Self, ModelError> {
        let trimmed = input.trim();
        let hex = trimmed
            .strip_prefix('#')
            .ok_or_else(|| ModelError::InvalidColor(input.to_string()))?;
        let valid_len = hex.len() == 3 || hex.len() == 6;
        if !valid_len || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(ModelError::InvalidColor(input.to_string()));
        }
        Ok(Self(format!("#{}", hex.to_ascii_lowercase())))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NodePresentation {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<Color>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shape: Option<NodeShape>,
    /// Icon name or a short glyph drawn inside the node.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
}

impl NodePresentation {
    /// Build from raw dialog fields. Blank fields become `None`.
    pub fn from_input(
        color: Option<&str>,
        category: Option<&str>,
        shape: Option<&str>,
        icon: Option<&str>,
    ) -> Result<Self, ModelError> {
        Ok(Self {
            color: non_blank(color).map(Color::parse).transpose()?,
            category: non_blank(category).map(str::to_string),
            shape: non_blank(shape).map(NodeShape::from_str).transpose()?,
            icon: non_blank(icon).map(str::to_string),
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EdgePresentation {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style: Option<EdgeStyle>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

impl EdgePresentation {
    pub fn from_input(style: Option<&str>, label: Option<&str>) -> Result<Self, ModelError> {
        Ok(Self {
            style: non_blank(style).map(EdgeStyle::from_str).transpose()?,
            label: non_blank(label).map(str::to_string),
        })
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}
