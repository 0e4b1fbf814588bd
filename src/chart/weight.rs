use super::{Align, Baseline, Paint, Point, Stroke, Surface, TextStyle};
use crate::models::{format_short_date, Sample};
use crate::storage::KeyValueStore;
use crate::store::WeightStore;
use serde::Serialize;

pub const CANVAS_HEIGHT: f64 = 300.0;
pub const PADDING: f64 = 40.0;
pub const HIT_RADIUS: f64 = 20.0;
const BANDS: u32 = 5;
const TOOLTIP_OFFSET: f64 = 40.0;

const GRID: &str = "#f0f0f0";
const AXIS: &str = "#666";
const LINE_TOP: &str = "#646cff";
const LINE_BOTTOM: &str = "#535bf2";
const LABEL_FONT: &str = "12px Arial";

/// A sample together with where it lands on the canvas.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HoverPoint {
    pub sample: Sample,
    pub at: Point,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Tooltip {
    pub left: f64,
    pub top: f64,
    pub date: String,
    pub weight: String,
}

impl From<&HoverPoint> for Tooltip {
    fn from(point: &HoverPoint) -> Self {
        Self {
            left: point.at.x,
            top: point.at.y - TOOLTIP_OFFSET,
            date: format_short_date(point.sample.date),
            weight: format!("{} kg", point.sample.weight),
        }
    }
}

/// Linear mapping from (position, weight) to canvas pixels.
#[derive(Debug, Clone, Copy)]
struct Scale {
    min: f64,
    span: f64,
    x_step: Option<f64>,
    y_scale: f64,
    height: f64,
    padding: f64,
}

impl Scale {
    fn fit(samples: &[Sample], width: f64, height: f64, padding: f64) -> Option<Self> {
        if samples.is_empty() {
            return None;
        }

        let min = samples.iter().map(|s| s.weight).fold(f64::INFINITY, f64::min);
        let max = samples.iter().map(|s| s.weight).fold(f64::NEG_INFINITY, f64::max);
        let span = if max > min { max - min } else { 1.0 };
        let plot_width = (width - padding * 2.0).max(0.0);
        let plot_height = (height - padding * 2.0).max(0.0);
        let x_step = (samples.len() > 1).then(|| plot_width / (samples.len() - 1) as f64);

        Some(Self {
            min,
            span,
            x_step,
            y_scale: plot_height / span,
            height,
            padding,
        })
    }

    fn x(&self, index: usize) -> f64 {
        self.padding + index as f64 * self.x_step.unwrap_or(0.0)
    }

    fn y(&self, weight: f64) -> f64 {
        self.height - self.padding - (weight - self.min) * self.y_scale
    }

    fn band_y(&self, band: u32) -> f64 {
        let plot_height = self.span * self.y_scale;
        self.height - self.padding - f64::from(band) * plot_height / f64::from(BANDS)
    }

    fn band_label(&self, band: u32) -> String {
        format!("{:.1}", self.min + f64::from(band) * self.span / f64::from(BANDS))
    }
}

/// Line chart of weight over time with pointer hover.
#[derive(Debug, Clone)]
pub struct WeightChart {
    width: f64,
    height: f64,
    padding: f64,
    hovered: Option<HoverPoint>,
}

impl WeightChart {
    pub fn new(width: f64) -> Self {
        Self::with_size(width, CANVAS_HEIGHT)
    }

    pub fn with_size(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            padding: PADDING,
            hovered: None,
        }
    }

    pub fn hovered(&self) -> Option<&HoverPoint> {
        self.hovered.as_ref()
    }

    /// Pixel positions for `samples`, which must already be oldest-first.
    pub fn plot(&self, samples: &[Sample]) -> Vec<HoverPoint> {
        let Some(scale) = Scale::fit(samples, self.width, self.height, self.padding) else {
            return Vec::new();
        };

        samples
            .iter()
            .enumerate()
            .map(|(index, sample)| HoverPoint {
                sample: *sample,
                at: Point::new(scale.x(index), scale.y(sample.weight)),
            })
            .collect()
    }

    /// Nearest plotted point strictly inside the hit radius. On equal
    /// distances the older sample wins.
    pub fn hit_test(&self, samples: &[Sample], pointer: Point) -> Option<HoverPoint> {
        let mut closest: Option<(f64, HoverPoint)> = None;
        for point in self.plot(samples) {
            let distance = pointer.distance(point.at);
            let nearer = closest.map_or(true, |(best, _)| distance < best);
            if distance < HIT_RADIUS && nearer {
                closest = Some((distance, point));
            }
        }
        closest.map(|(_, point)| point)
    }

    pub fn pointer_move<S: KeyValueStore>(
        &mut self,
        store: &WeightStore<S>,
        x: f64,
        y: f64,
    ) -> Option<Tooltip> {
        self.hovered = self.hit_test(&store.ascending(), Point::new(x, y));
        self.hovered.as_ref().map(Tooltip::from)
    }

    pub fn pointer_leave(&mut self) {
        self.hovered = None;
    }

    pub fn draw<S: KeyValueStore, D: Surface>(&self, store: &WeightStore<S>, surface: &mut D) {
        self.draw_samples(&store.ascending(), surface);
    }

    pub fn draw_samples<D: Surface>(&self, samples: &[Sample], surface: &mut D) {
        let (width, height, padding) = (self.width, self.height, self.padding);
        surface.clear(width, height);

        let Some(scale) = Scale::fit(samples, width, height, padding) else {
            surface.text(
                Point::new(width / 2.0, height / 2.0),
                "No weight data yet",
                &TextStyle {
                    font: "16px Arial",
                    color: "#a0aec0",
                    align: Align::Center,
                    baseline: Baseline::Middle,
                },
            );
            return;
        };
        let points = self.plot(samples);

        let grid = Stroke::solid(GRID, 1.0);
        if scale.x_step.is_some() {
            for point in &points {
                surface.line(
                    Point::new(point.at.x, padding),
                    Point::new(point.at.x, height - padding),
                    &grid,
                );
            }
        }
        for band in 0..=BANDS {
            let y = scale.band_y(band);
            surface.line(Point::new(padding, y), Point::new(width - padding, y), &grid);
        }

        let axis = Stroke::solid(AXIS, 2.0);
        surface.line(Point::new(padding, padding), Point::new(padding, height - padding), &axis);
        surface.line(
            Point::new(padding, height - padding),
            Point::new(width - padding, height - padding),
            &axis,
        );

        let label = TextStyle {
            font: LABEL_FONT,
            color: AXIS,
            align: Align::Right,
            baseline: Baseline::Middle,
        };
        for band in 0..=BANDS {
            surface.text(
                Point::new(padding - 5.0, scale.band_y(band)),
                &scale.band_label(band),
                &label,
            );
        }

        let line = Stroke {
            paint: Paint::VerticalGradient {
                top: padding,
                bottom: height - padding,
                stops: vec![(0.0, LINE_TOP), (1.0, LINE_BOTTOM)],
            },
            width: 3.0,
        };
        let path: Vec<Point> = points.iter().map(|point| point.at).collect();
        surface.polyline(&path, &line);

        let hovered_date = self.hovered.map(|point| point.sample.date);
        for point in &points {
            if hovered_date == Some(point.sample.date) {
                surface.circle(point.at, 6.0, &Paint::Solid(LINE_BOTTOM), Some(&line));
            } else {
                surface.circle(point.at, 4.0, &Paint::Solid(LINE_TOP), Some(&line));
            }
        }
    }
}
