//! Immediate-mode drawing primitives and the charts built on them.
//!
//! Charts only talk to a [`Surface`], so the same drawing code feeds the SVG
//! output served over HTTP and the recording surface used in tests.

pub mod calories;
pub mod svg;
pub mod weight;

pub use calories::CalorieChart;
pub use svg::SvgSurface;
pub use weight::{HoverPoint, Tooltip, WeightChart};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance(self, other: Point) -> f64 {
        ((self.x - other.x).powi(2) + (self.y - other.y).powi(2)).sqrt()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Paint {
    Solid(&'static str),
    /// Top-to-bottom gradient between two canvas rows.
    VerticalGradient {
        top: f64,
        bottom: f64,
        stops: Vec<(f64, &'static str)>,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Stroke {
    pub paint: Paint,
    pub width: f64,
}

impl Stroke {
    pub fn solid(color: &'static str, width: f64) -> Self {
        Self {
            paint: Paint::Solid(color),
            width,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Left,
    Center,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Baseline {
    Alphabetic,
    Middle,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TextStyle {
    pub font: &'static str,
    pub color: &'static str,
    pub align: Align,
    pub baseline: Baseline,
}

pub trait Surface {
    fn clear(&mut self, width: f64, height: f64);
    fn line(&mut self, from: Point, to: Point, stroke: &Stroke);
    fn polyline(&mut self, points: &[Point], stroke: &Stroke);
    /// Closed shape filled with `fill`, no outline.
    fn area(&mut self, points: &[Point], fill: &Paint);
    fn circle(&mut self, center: Point, radius: f64, fill: &Paint, stroke: Option<&Stroke>);
    fn text(&mut self, at: Point, text: &str, style: &TextStyle);
}
