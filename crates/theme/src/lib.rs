//! Visual configuration for board elements.
//!
//! Each [`ElementKind`] gets a [`KindStyle`]: default size, palette and label
//! settings. Tasks and notes share all behavior and differ only here.
//! A theme can be loaded from JSON; missing fields keep the defaults, down
//! to single fields of a family.

pub mod color;

use anyhow::{Context, Result};
use color::{serde_color, Color};
use node::{CanvasSize, ElementKind};
use palette::named;
use serde::{de, Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::path::Path;

/// Outline of a shape.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Stroke {
    #[serde(with = "serde_color")]
    pub color: Color,
    pub width: f32,
}

impl Stroke {
    pub fn new(color: Color, width: f32) -> Self {
        Self { color, width }
    }
}

/// Appearance of one element family.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct KindStyle {
    /// Used per axis when a record has no width/height.
    pub default_size: CanvasSize,
    #[serde(with = "serde_color")]
    pub fill: Color,
    pub stroke: Stroke,
    pub corner_radius: f32,
    pub font_size: f32,
    #[serde(with = "serde_color")]
    pub label_color: Color,
    /// Distance of the label from the shape's top-left corner. The label is
    /// `width - 2 * label_inset` wide.
    pub label_inset: f32,
}

impl KindStyle {
    pub fn task() -> Self {
        Self {
            default_size: CanvasSize::new(300.0, 200.0),
            fill: named::LIGHTBLUE,
            stroke: Stroke::new(named::BLUE, 2.0),
            corner_radius: 5.0,
            font_size: 16.0,
            label_color: named::BLACK,
            label_inset: 10.0,
        }
    }

    pub fn note() -> Self {
        Self {
            default_size: CanvasSize::new(250.0, 150.0),
            fill: named::LIGHTYELLOW,
            stroke: Stroke::new(named::ORANGE, 2.0),
            corner_radius: 5.0,
            font_size: 14.0,
            label_color: named::BLACK,
            label_inset: 10.0,
        }
    }

    /// Label width for a shape of the given width; never negative.
    pub fn label_width(&self, shape_width: f32) -> f32 {
        (shape_width - 2.0 * self.label_inset).max(0.0)
    }
}

/// Board theme: one style per family plus the selection outline.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Theme {
    #[serde(deserialize_with = "task_style")]
    pub task: KindStyle,
    #[serde(deserialize_with = "note_style")]
    pub note: KindStyle,
    /// Stroke applied to the primary shape of the selected element.
    pub selection: Stroke,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            task: KindStyle::task(),
            note: KindStyle::note(),
            selection: Stroke::new(named::RED, 4.0),
        }
    }
}

fn task_style<'de, D: Deserializer<'de>>(deserializer: D) -> Result<KindStyle, D::Error> {
    style_over(deserializer, KindStyle::task())
}

fn note_style<'de, D: Deserializer<'de>>(deserializer: D) -> Result<KindStyle, D::Error> {
    style_over(deserializer, KindStyle::note())
}

/// Reads a possibly partial family style, filling gaps from `base`.
fn style_over<'de, D: Deserializer<'de>>(
    deserializer: D,
    base: KindStyle,
) -> Result<KindStyle, D::Error> {
    let overrides = Map::<String, Value>::deserialize(deserializer)?;
    let mut merged = serde_json::to_value(base).map_err(de::Error::custom)?;
    if let Value::Object(fields) = &mut merged {
        fields.extend(overrides);
    }
    serde_json::from_value(merged).map_err(de::Error::custom)
}

impl Theme {
    pub fn style(&self, kind: ElementKind) -> &KindStyle {
        match kind {
            ElementKind::Task => &self.task,
            ElementKind::Note => &self.note,
        }
    }

    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).context("Failed to parse theme")
    }

    /// Loads a theme file.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read theme file: {}", path.display()))?;
        Self::from_json(&contents)
    }
}
