//! Visible children of a scene group.

use node::{CanvasPoint, CanvasSize};
use theme::color::Color;
use theme::Stroke;

/// A rounded rectangle; the primary shape of a card.
#[derive(Clone, Debug, PartialEq)]
pub struct RectShape {
    pub size: CanvasSize,
    pub fill: Color,
    pub stroke: Stroke,
    pub corner_radius: f32,
}

/// A wrapped text label positioned relative to its group.
#[derive(Clone, Debug, PartialEq)]
pub struct TextShape {
    pub text: String,
    pub offset: CanvasPoint,
    pub font_size: f32,
    pub color: Color,
    /// Wrap width.
    pub width: f32,
}

#[derive(Clone, Debug, PartialEq)]
pub enum Shape {
    Rect(RectShape),
    Text(TextShape),
}

impl Shape {
    pub fn as_rect(&self) -> Option<&RectShape> {
        match self {
            Shape::Rect(rect) => Some(rect),
            Shape::Text(_) => None,
        }
    }

    pub fn as_rect_mut(&mut self) -> Option<&mut RectShape> {
        match self {
            Shape::Rect(rect) => Some(rect),
            Shape::Text(_) => None,
        }
    }

    pub fn as_text(&self) -> Option<&TextShape> {
        match self {
            Shape::Text(text) => Some(text),
            Shape::Rect(_) => None,
        }
    }
}

impl From<RectShape> for Shape {
    fn from(rect: RectShape) -> Self {
        Shape::Rect(rect)
    }
}

impl From<TextShape> for Shape {
    fn from(text: TextShape) -> Self {
        Shape::Text(text)
    }
}
